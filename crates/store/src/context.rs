//! Per-session customer context.
//!
//! An advisory key/value record attached to each session (who the customer
//! said they are). Records are created lazily and never expire.

use dashmap::DashMap;
use shopdesk_core::ContextRecord;

pub const CUSTOMER_ID_KEY: &str = "customer_id";
pub const CUSTOMER_EMAIL_KEY: &str = "customer_email";

#[derive(Debug, Default)]
pub struct CustomerContextStore {
    sessions: DashMap<String, ContextRecord>,
}

impl CustomerContextStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Context for a session; empty for sessions never seen.
    pub fn get_context(&self, session_id: &str) -> ContextRecord {
        self.sessions
            .get(session_id)
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Merge keys into the session's context, overwriting existing values.
    pub fn update_context(&self, session_id: &str, updates: ContextRecord) {
        self.sessions
            .entry(session_id.to_string())
            .or_default()
            .extend(updates);
    }

    pub fn set_customer_id(&self, session_id: &str, customer_id: &str) {
        self.set(session_id, CUSTOMER_ID_KEY, customer_id);
    }

    pub fn set_customer_email(&self, session_id: &str, email: &str) {
        self.set(session_id, CUSTOMER_EMAIL_KEY, email);
    }

    fn set(&self, session_id: &str, key: &str, value: &str) {
        tracing::debug!(session_id = session_id, key = key, "Session context updated");
        self.sessions
            .entry(session_id.to_string())
            .or_default()
            .insert(key.to_string(), value.trim().to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_session_is_empty_and_stays_unset() {
        let store = CustomerContextStore::new();
        assert!(store.get_context("s-1").is_empty());
        assert!(store.get_context("s-1").is_empty());
        assert_eq!(store.sessions.len(), 0);
    }

    #[test]
    fn test_update_then_get_returns_superset() {
        let store = CustomerContextStore::new();
        store.set_customer_id("s-1", "CUST001");

        let mut updates = ContextRecord::new();
        updates.insert("language".into(), "en".into());
        store.update_context("s-1", updates.clone());

        let ctx = store.get_context("s-1");
        for (k, v) in &updates {
            assert_eq!(ctx.get(k), Some(v));
        }
        assert_eq!(ctx.get(CUSTOMER_ID_KEY).map(String::as_str), Some("CUST001"));
    }

    #[test]
    fn test_update_round_trip_and_repeated_reads() {
        let store = CustomerContextStore::new();
        let mut updates = ContextRecord::new();
        updates.insert(CUSTOMER_ID_KEY.into(), "X".into());
        store.update_context("s-1", updates.clone());

        let first = store.get_context("s-1");
        assert_eq!(first, updates);
        assert_eq!(store.get_context("s-1"), first);
        assert_eq!(store.get_context("s-1"), first);
    }

    #[test]
    fn test_sessions_are_isolated() {
        let store = CustomerContextStore::new();
        store.set_customer_email("s-1", "john.smith@email.com");
        assert!(store.get_context("s-2").is_empty());
        assert_eq!(
            store.get_context("s-1").get(CUSTOMER_EMAIL_KEY).map(String::as_str),
            Some("john.smith@email.com")
        );
    }
}
