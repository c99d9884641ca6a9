#![deny(unused)]
//! In-memory mock data stores for ShopDesk.
//!
//! Orders, products and customers are seeded at construction and mutated only
//! through the tool layer. Every store is a `DashMap`, so a single record is
//! updated atomically while readers on other shards proceed.

pub mod context;
pub mod customers;
pub mod money;
pub mod orders;
pub mod products;
mod seed;

use std::sync::Arc;

pub use context::{CustomerContextStore, CUSTOMER_EMAIL_KEY, CUSTOMER_ID_KEY};
pub use customers::{Communication, Customer, CustomerStore, Preferences, PreferencesUpdate, Tier};
pub use money::Money;
pub use orders::{Order, OrderItem, OrderStatus, OrderStore};
pub use products::{Availability, Product, ProductStore, WeatherCondition};

/// Result of a mutating store operation.
///
/// Both arms carry customer-facing text; a rejection is a valid outcome,
/// not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Applied(String),
    Rejected(String),
}

impl Mutation {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Applied(m) | Self::Rejected(m) => m,
        }
    }
}

/// The three mock stores, shared by every tool.
#[derive(Debug, Clone)]
pub struct MockStores {
    pub orders: Arc<OrderStore>,
    pub products: Arc<ProductStore>,
    pub customers: Arc<CustomerStore>,
}

impl MockStores {
    /// Fresh stores loaded with the demo records.
    pub fn seeded() -> Self {
        let stores = Self {
            orders: Arc::new(OrderStore::from_records(seed::orders())),
            products: Arc::new(ProductStore::from_records(seed::products())),
            customers: Arc::new(CustomerStore::from_records(seed::customers())),
        };
        tracing::debug!(
            orders = stores.orders.len(),
            products = stores.products.len(),
            customers = stores.customers.len(),
            "Mock stores seeded"
        );
        stores
    }
}

impl Default for MockStores {
    fn default() -> Self {
        Self::seeded()
    }
}

/// Lookup keys are matched without surrounding whitespace and case.
pub(crate) fn normalize_id(id: &str) -> String {
    id.trim().to_ascii_uppercase()
}
