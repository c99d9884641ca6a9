//! Order lookup and mutation tools.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use std::fmt::Write;
use std::sync::Arc;

use shopdesk_core::{traits::Tool, types::ToolOutput, Result};
use shopdesk_store::{Mutation, Order, OrderStore};

use crate::args;
use crate::kind::ToolKind;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct OrderIdArgs {
    /// The order ID, for example ORD001.
    pub order_id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ReturnArgs {
    /// The delivered order to return.
    pub order_id: String,
    /// Why the customer is returning the items.
    #[serde(default)]
    pub reason: String,
}

/// Full order report used by `order_status`.
pub fn render_order(order: &Order) -> String {
    let mut out = format!(
        "Order Details Found\nOrder ID: {}\nStatus: {}\nOrder Date: {}\nTotal: {}\nItems:",
        order.id,
        order.status.title(),
        order.order_date.format("%Y-%m-%d"),
        order.total()
    );
    for item in &order.items {
        let _ = write!(out, "\n  - {} (Qty: {}) - {}", item.name, item.quantity, item.price);
    }
    let _ = write!(out, "\nShipping Address: {}", order.shipping_address);
    if let Some(tracking) = &order.tracking_number {
        let _ = write!(out, "\nTracking Number: {}", tracking);
    }
    out
}

/// One-line summary used by the order-listing tools.
pub fn summarize_order(order: &Order) -> String {
    format!(
        "Order {}: {} - {} (Date: {})",
        order.id,
        order.status.title(),
        order.total(),
        order.order_date.format("%Y-%m-%d")
    )
}

fn mutation_output(outcome: Mutation) -> ToolOutput {
    match outcome {
        Mutation::Applied(msg) => ToolOutput::result(msg),
        Mutation::Rejected(msg) => ToolOutput::rejected(msg),
    }
}

// =============================================================================
// Order Status Tool
// =============================================================================

pub struct OrderStatusTool {
    orders: Arc<OrderStore>,
}

impl OrderStatusTool {
    pub fn new(orders: Arc<OrderStore>) -> Self {
        Self { orders }
    }
}

#[async_trait]
impl Tool for OrderStatusTool {
    fn name(&self) -> &str {
        ToolKind::OrderStatus.as_str()
    }

    fn description(&self) -> &str {
        "Check the status of an order by order ID. Use this when customers ask about order status, tracking or delivery."
    }

    fn parameters(&self) -> Value {
        args::schema::<OrderIdArgs>()
    }

    async fn execute(&self, args: Value) -> Result<ToolOutput> {
        let args: OrderIdArgs = args::parse(self.name(), args)?;

        match self.orders.get(&args.order_id) {
            Some(order) => {
                let data = serde_json::to_value(&order).ok();
                let out = ToolOutput::result(render_order(&order));
                Ok(match data {
                    Some(data) => out.with_data(data),
                    None => out,
                })
            }
            None => Ok(ToolOutput::rejected(format!(
                "Order {} not found. This order ID does not exist in our system. Please verify the order ID or ask the customer for their email to search for their orders.",
                args.order_id.trim()
            ))),
        }
    }
}

// =============================================================================
// Cancel Order Tool
// =============================================================================

pub struct CancelOrderTool {
    orders: Arc<OrderStore>,
}

impl CancelOrderTool {
    pub fn new(orders: Arc<OrderStore>) -> Self {
        Self { orders }
    }
}

#[async_trait]
impl Tool for CancelOrderTool {
    fn name(&self) -> &str {
        ToolKind::CancelOrder.as_str()
    }

    fn description(&self) -> &str {
        "Cancel an order that has not shipped yet. Use this when customers want to cancel an order."
    }

    fn parameters(&self) -> Value {
        args::schema::<OrderIdArgs>()
    }

    async fn execute(&self, args: Value) -> Result<ToolOutput> {
        let args: OrderIdArgs = args::parse(self.name(), args)?;
        Ok(mutation_output(self.orders.cancel(&args.order_id)))
    }
}

// =============================================================================
// Process Return Tool
// =============================================================================

pub struct ProcessReturnTool {
    orders: Arc<OrderStore>,
}

impl ProcessReturnTool {
    pub fn new(orders: Arc<OrderStore>) -> Self {
        Self { orders }
    }
}

#[async_trait]
impl Tool for ProcessReturnTool {
    fn name(&self) -> &str {
        ToolKind::ProcessReturn.as_str()
    }

    fn description(&self) -> &str {
        "Process a return request for a delivered order. Use this when customers want to return items."
    }

    fn parameters(&self) -> Value {
        args::schema::<ReturnArgs>()
    }

    async fn execute(&self, args: Value) -> Result<ToolOutput> {
        let args: ReturnArgs = args::parse(self.name(), args)?;
        Ok(mutation_output(
            self.orders.process_return(&args.order_id, &args.reason),
        ))
    }
}
