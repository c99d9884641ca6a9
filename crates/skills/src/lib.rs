#![deny(unused)]
//! Customer-service tools for ShopDesk.
//!
//! This crate provides:
//! - The closed set of tool kinds and an immutable registry over them
//! - Order, product and customer tools backed by the mock stores
//! - A weather tool with an optional provider call and a simulated fallback

pub mod args;
pub mod customers;
pub mod kind;
pub mod orders;
pub mod products;
pub mod registry;
pub mod weather;

use std::sync::Arc;

use shopdesk_core::{config::WeatherConfig, traits::Tool, Result};
use shopdesk_store::MockStores;

pub use customers::{CustomerInfoTool, CustomerOrdersTool, SearchOrdersByEmailTool, UpdatePreferencesTool};
pub use kind::ToolKind;
pub use orders::{CancelOrderTool, OrderStatusTool, ProcessReturnTool};
pub use products::{ProductDetailsTool, ProductRecommendationsTool, SearchProductsTool};
pub use registry::{DefaultToolRegistry, ToolRegistryBuilder};
pub use weather::WeatherTool;

/// Build the registry holding every tool kind, in prompt order.
pub fn builtin_registry(stores: &MockStores, weather: &WeatherConfig) -> Result<DefaultToolRegistry> {
    let weather_tool = Arc::new(WeatherTool::from_config(weather));

    ToolKind::ALL
        .iter()
        .try_fold(DefaultToolRegistry::builder(), |builder, kind| {
            let tool: Arc<dyn Tool> = match kind {
                ToolKind::OrderStatus => Arc::new(OrderStatusTool::new(stores.orders.clone())),
                ToolKind::CancelOrder => Arc::new(CancelOrderTool::new(stores.orders.clone())),
                ToolKind::ProcessReturn => Arc::new(ProcessReturnTool::new(stores.orders.clone())),
                ToolKind::SearchProducts => {
                    Arc::new(SearchProductsTool::new(stores.products.clone()))
                }
                ToolKind::ProductDetails => {
                    Arc::new(ProductDetailsTool::new(stores.products.clone()))
                }
                ToolKind::CustomerInfo => {
                    Arc::new(CustomerInfoTool::new(stores.customers.clone()))
                }
                ToolKind::GetCustomerOrders => Arc::new(CustomerOrdersTool::new(
                    stores.customers.clone(),
                    stores.orders.clone(),
                )),
                ToolKind::SearchOrdersByEmail => Arc::new(SearchOrdersByEmailTool::new(
                    stores.customers.clone(),
                    stores.orders.clone(),
                )),
                ToolKind::UpdatePreferences => {
                    Arc::new(UpdatePreferencesTool::new(stores.customers.clone()))
                }
                ToolKind::GetWeather => weather_tool.clone(),
                ToolKind::ProductRecommendations => {
                    Arc::new(ProductRecommendationsTool::new(stores.products.clone()))
                }
            };
            builder.register(tool)
        })
        .map(ToolRegistryBuilder::build)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopdesk_core::traits::ToolRegistry;

    #[test]
    fn test_builtin_registry_matches_tool_kinds() {
        let registry = builtin_registry(&MockStores::seeded(), &WeatherConfig::default()).unwrap();
        let names: Vec<String> = registry.list().into_iter().map(|d| d.name).collect();
        let expected: Vec<String> = ToolKind::ALL.iter().map(|k| k.as_str().to_string()).collect();
        assert_eq!(names, expected);
    }
}
