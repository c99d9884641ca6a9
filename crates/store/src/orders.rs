//! Order records and the order lifecycle.

use chrono::NaiveDate;
use dashmap::DashMap;
use serde::Serialize;
use std::fmt;

use crate::{money::Money, normalize_id, Mutation};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Returned,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::Returned => "returned",
        }
    }

    /// Capitalized form used in customer-facing text.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Cancelled => "Cancelled",
            Self::Returned => "Returned",
        }
    }

    /// Orders that have not left the warehouse.
    pub fn is_cancellable(&self) -> bool {
        matches!(self, Self::Pending | Self::Processing)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderItem {
    pub product_id: String,
    pub name: String,
    pub quantity: u32,
    /// Unit price.
    pub price: Money,
}

impl OrderItem {
    pub fn line_total(&self) -> Money {
        self.price * self.quantity
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    pub id: String,
    pub customer_id: String,
    pub status: OrderStatus,
    pub order_date: NaiveDate,
    pub items: Vec<OrderItem>,
    pub shipping_address: String,
    pub tracking_number: Option<String>,
}

impl Order {
    /// Sum of unit price times quantity over all items.
    pub fn total(&self) -> Money {
        self.items.iter().map(OrderItem::line_total).sum()
    }
}

/// Concurrent order table keyed by order id.
#[derive(Debug, Default)]
pub struct OrderStore {
    orders: DashMap<String, Order>,
}

impl OrderStore {
    pub fn from_records(records: impl IntoIterator<Item = Order>) -> Self {
        let orders = DashMap::new();
        for order in records {
            orders.insert(order.id.clone(), order);
        }
        Self { orders }
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn get(&self, order_id: &str) -> Option<Order> {
        self.orders.get(&normalize_id(order_id)).map(|r| r.clone())
    }

    /// Orders placed by a customer, by id.
    pub fn for_customer(&self, customer_id: &str) -> Vec<Order> {
        let customer_id = normalize_id(customer_id);
        let mut found: Vec<Order> = self
            .orders
            .iter()
            .filter(|r| r.customer_id == customer_id)
            .map(|r| r.clone())
            .collect();
        found.sort_by(|a, b| a.id.cmp(&b.id));
        found
    }

    /// Cancel an order that has not shipped yet.
    pub fn cancel(&self, order_id: &str) -> Mutation {
        let key = normalize_id(order_id);
        let Some(mut order) = self.orders.get_mut(&key) else {
            return Mutation::Rejected(format!("Order {} not found.", order_id.trim()));
        };

        let current = order.status;
        match current {
            status if status.is_cancellable() => {
                order.status = OrderStatus::Cancelled;
                tracing::info!(order_id = %key, previous = %status, "Order cancelled");
                Mutation::Applied(format!(
                    "Order {} has been cancelled successfully. A refund of {} will be processed within 3-5 business days.",
                    key,
                    order.total()
                ))
            }
            OrderStatus::Cancelled => {
                Mutation::Rejected(format!("Order {} is already cancelled.", key))
            }
            OrderStatus::Delivered | OrderStatus::Returned => Mutation::Rejected(format!(
                "Order {} has already been {} and cannot be cancelled. Please request a return instead.",
                key, current
            )),
            _ => Mutation::Rejected(format!(
                "Order {} has already been shipped and cannot be cancelled. You can request a return once it is delivered.",
                key
            )),
        }
    }

    /// Accept a return for a delivered order.
    pub fn process_return(&self, order_id: &str, reason: &str) -> Mutation {
        let key = normalize_id(order_id);
        let Some(mut order) = self.orders.get_mut(&key) else {
            return Mutation::Rejected(format!("Order {} not found.", order_id.trim()));
        };

        let current = order.status;
        match current {
            OrderStatus::Delivered => {
                order.status = OrderStatus::Returned;
                tracing::info!(order_id = %key, reason = reason, "Return accepted");
                let reason = reason.trim();
                let noted = if reason.is_empty() {
                    String::new()
                } else {
                    format!(" Reason: {}.", reason.trim_end_matches('.'))
                };
                Mutation::Applied(format!(
                    "Return for order {} has been approved.{} A refund of {} will be issued once the items are received.",
                    key,
                    noted,
                    order.total()
                ))
            }
            OrderStatus::Returned => Mutation::Rejected(format!(
                "A return for order {} has already been processed.",
                key
            )),
            status => Mutation::Rejected(format!(
                "Order {} cannot be returned because it is {}. Only delivered orders are eligible for return.",
                key, status
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockStores;

    #[test]
    fn test_ord001_total_is_sum_of_items() {
        let stores = MockStores::seeded();
        let order = stores.orders.get("ORD001").unwrap();
        assert_eq!(order.status, OrderStatus::Shipped);
        assert_eq!(order.total(), Money::from_cents(7999 + 2999));
        assert_eq!(order.total().to_string(), "$109.98");
    }

    #[test]
    fn test_lookup_ignores_case_and_whitespace() {
        let stores = MockStores::seeded();
        assert!(stores.orders.get(" ord003 ").is_some());
        assert!(stores.orders.get("ORD999").is_none());
    }

    #[test]
    fn test_second_cancel_is_rejected() {
        let stores = MockStores::seeded();
        let first = stores.orders.cancel("ORD004");
        assert!(first.is_applied());
        assert!(first.message().contains("$39.99"));

        let second = stores.orders.cancel("ORD004");
        assert_eq!(second, Mutation::Rejected("Order ORD004 is already cancelled.".into()));
    }

    #[test]
    fn test_shipped_order_cannot_be_cancelled() {
        let stores = MockStores::seeded();
        let outcome = stores.orders.cancel("ORD001");
        assert!(!outcome.is_applied());
        assert!(outcome.message().contains("already been shipped"));
        assert_eq!(stores.orders.get("ORD001").unwrap().status, OrderStatus::Shipped);
    }

    #[test]
    fn test_return_only_for_delivered() {
        let stores = MockStores::seeded();
        assert!(!stores.orders.process_return("ORD002", "").is_applied());

        let accepted = stores.orders.process_return("ORD003", "Wrong size");
        assert!(accepted.is_applied());
        assert!(accepted.message().contains("Reason: Wrong size."));
        assert_eq!(stores.orders.get("ORD003").unwrap().status, OrderStatus::Returned);

        let again = stores.orders.process_return("ORD003", "");
        assert!(again.message().contains("already been processed"));
    }

    #[test]
    fn test_concurrent_cancel_applies_once() {
        let stores = MockStores::seeded();
        let applied = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|| stores.orders.cancel("ORD002").is_applied()))
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap())
                .filter(|applied| *applied)
                .count()
        });
        assert_eq!(applied, 1);
    }

    #[test]
    fn test_for_customer() {
        let stores = MockStores::seeded();
        let ids: Vec<_> = stores
            .orders
            .for_customer("CUST001")
            .into_iter()
            .map(|o| o.id)
            .collect();
        assert_eq!(ids, vec!["ORD001", "ORD003"]);
    }
}
