//! The closed set of tools the agent can call.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    OrderStatus,
    CancelOrder,
    ProcessReturn,
    SearchProducts,
    ProductDetails,
    CustomerInfo,
    GetCustomerOrders,
    SearchOrdersByEmail,
    UpdatePreferences,
    GetWeather,
    ProductRecommendations,
}

impl ToolKind {
    /// Every kind, in the order tools are listed to the model.
    pub const ALL: [ToolKind; 11] = [
        Self::OrderStatus,
        Self::CancelOrder,
        Self::ProcessReturn,
        Self::SearchProducts,
        Self::ProductDetails,
        Self::CustomerInfo,
        Self::GetCustomerOrders,
        Self::SearchOrdersByEmail,
        Self::UpdatePreferences,
        Self::GetWeather,
        Self::ProductRecommendations,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OrderStatus => "order_status",
            Self::CancelOrder => "cancel_order",
            Self::ProcessReturn => "process_return",
            Self::SearchProducts => "search_products",
            Self::ProductDetails => "product_details",
            Self::CustomerInfo => "customer_info",
            Self::GetCustomerOrders => "get_customer_orders",
            Self::SearchOrdersByEmail => "search_orders_by_email",
            Self::UpdatePreferences => "update_preferences",
            Self::GetWeather => "get_weather",
            Self::ProductRecommendations => "product_recommendations",
        }
    }

    /// Whether invoking the tool changes store state.
    pub fn is_mutating(&self) -> bool {
        matches!(self, Self::CancelOrder | Self::ProcessReturn | Self::UpdatePreferences)
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown tool '{}'", s))
    }
}
