//! Customer profiles and preference updates.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{normalize_id, Mutation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Tier {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Preferred contact channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Communication {
    Email,
    Sms,
    Phone,
}

impl fmt::Display for Communication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Email => "email",
            Self::Sms => "sms",
            Self::Phone => "phone",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preferences {
    pub categories: Vec<String>,
    pub brands: Vec<String>,
    pub communication: Communication,
}

/// Partial update: lists are merged, the channel is replaced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreferencesUpdate {
    pub categories: Vec<String>,
    pub brands: Vec<String>,
    pub communication: Option<Communication>,
}

impl PreferencesUpdate {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.brands.is_empty() && self.communication.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub loyalty_points: u32,
    pub tier: Tier,
    pub preferences: Preferences,
    pub order_history: Vec<String>,
}

/// Concurrent customer table keyed by customer id.
#[derive(Debug, Default)]
pub struct CustomerStore {
    customers: DashMap<String, Customer>,
}

impl CustomerStore {
    pub fn from_records(records: impl IntoIterator<Item = Customer>) -> Self {
        let customers = DashMap::new();
        for customer in records {
            customers.insert(customer.id.clone(), customer);
        }
        Self { customers }
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    pub fn get(&self, customer_id: &str) -> Option<Customer> {
        self.customers.get(&normalize_id(customer_id)).map(|r| r.clone())
    }

    /// Case-insensitive email lookup.
    pub fn find_by_email(&self, email: &str) -> Option<Customer> {
        let email = email.trim();
        self.customers
            .iter()
            .find(|r| r.email.eq_ignore_ascii_case(email))
            .map(|r| r.clone())
    }

    /// All customers, by id.
    pub fn all(&self) -> Vec<Customer> {
        let mut all: Vec<Customer> = self.customers.iter().map(|r| r.clone()).collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    pub fn update_preferences(&self, customer_id: &str, update: PreferencesUpdate) -> Mutation {
        let key = normalize_id(customer_id);
        let Some(mut customer) = self.customers.get_mut(&key) else {
            return Mutation::Rejected(format!("Customer {} not found.", customer_id.trim()));
        };
        if update.is_empty() {
            return Mutation::Rejected(format!(
                "No preference changes were provided for customer {}.",
                key
            ));
        }

        let prefs = &mut customer.preferences;
        merge_unique(&mut prefs.categories, update.categories);
        merge_unique(&mut prefs.brands, update.brands);
        if let Some(channel) = update.communication {
            prefs.communication = channel;
        }

        tracing::info!(customer_id = %key, "Preferences updated");
        Mutation::Applied(format!(
            "Preferences updated for customer {}. Categories: {}; Brands: {}; Communication: {}",
            key,
            join_or_none(&prefs.categories),
            join_or_none(&prefs.brands),
            prefs.communication
        ))
    }
}

fn merge_unique(target: &mut Vec<String>, additions: Vec<String>) {
    for value in additions {
        let value = value.trim().to_string();
        if value.is_empty() || target.iter().any(|v| v.eq_ignore_ascii_case(&value)) {
            continue;
        }
        target.push(value);
    }
}

fn join_or_none(values: &[String]) -> String {
    if values.is_empty() {
        "none".to_string()
    } else {
        values.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockStores;

    #[test]
    fn test_find_by_email_is_case_insensitive() {
        let stores = MockStores::seeded();
        let customer = stores.customers.find_by_email("John.Smith@Email.com").unwrap();
        assert_eq!(customer.id, "CUST001");
        assert!(stores.customers.find_by_email("nobody@email.com").is_none());
    }

    #[test]
    fn test_update_merges_lists_and_replaces_channel() {
        let stores = MockStores::seeded();
        let outcome = stores.customers.update_preferences(
            "CUST001",
            PreferencesUpdate {
                categories: vec!["Books".into(), "electronics".into()],
                brands: vec![],
                communication: Some(Communication::Sms),
            },
        );
        assert!(outcome.is_applied());

        let prefs = stores.customers.get("CUST001").unwrap().preferences;
        assert_eq!(prefs.categories, vec!["Electronics", "Sports", "Books"]);
        assert_eq!(prefs.communication, Communication::Sms);
    }

    #[test]
    fn test_empty_update_and_unknown_customer_rejected() {
        let stores = MockStores::seeded();
        assert!(!stores
            .customers
            .update_preferences("CUST001", PreferencesUpdate::default())
            .is_applied());
        assert_eq!(
            stores
                .customers
                .update_preferences("CUST999", PreferencesUpdate::default())
                .message(),
            "Customer CUST999 not found."
        );
    }
}
