//! Customer profile, order history and preference tools.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use shopdesk_core::{traits::Tool, types::ToolOutput, Result};
use shopdesk_store::{Communication, Customer, CustomerStore, Mutation, OrderStore, PreferencesUpdate};

use crate::args::{self, non_blank, OneOrMany};
use crate::kind::ToolKind;
use crate::orders::summarize_order;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CustomerLookupArgs {
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CustomerIdArgs {
    /// The customer ID, for example CUST001.
    pub customer_id: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct EmailArgs {
    pub email: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UpdatePreferencesArgs {
    pub customer_id: String,
    pub preferences: PreferenceArgs,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct PreferenceArgs {
    /// Categories to add.
    #[serde(default)]
    pub categories: Option<OneOrMany>,
    /// Brands to add.
    #[serde(default)]
    pub brands: Option<OneOrMany>,
    /// Replaces the preferred contact channel.
    #[serde(default)]
    pub communication: Option<ChannelArg>,
}

#[derive(Debug, Clone, Copy, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChannelArg {
    Email,
    Sms,
    Phone,
}

impl From<ChannelArg> for Communication {
    fn from(arg: ChannelArg) -> Self {
        match arg {
            ChannelArg::Email => Communication::Email,
            ChannelArg::Sms => Communication::Sms,
            ChannelArg::Phone => Communication::Phone,
        }
    }
}

fn join_or_none(values: &[String]) -> String {
    if values.is_empty() {
        "none".to_string()
    } else {
        values.join(", ")
    }
}

fn render_profile(customer: &Customer) -> String {
    let prefs = &customer.preferences;
    format!(
        "Customer Information\nCustomer ID: {}\nName: {}\nEmail: {}\nPhone: {}\nAddress: {}\nLoyalty Points: {}\nTier: {}\nPreferences: Categories - {}; Brands - {}; Communication - {}\nRecent Orders: {}",
        customer.id,
        customer.name,
        customer.email,
        customer.phone,
        customer.address,
        customer.loyalty_points,
        customer.tier,
        join_or_none(&prefs.categories),
        join_or_none(&prefs.brands),
        prefs.communication,
        join_or_none(&customer.order_history)
    )
}

fn order_summaries(orders: &OrderStore, customer: &Customer) -> Vec<String> {
    customer
        .order_history
        .iter()
        .filter_map(|id| orders.get(id))
        .map(|order| summarize_order(&order))
        .collect()
}

// =============================================================================
// Customer Info Tool
// =============================================================================

pub struct CustomerInfoTool {
    customers: Arc<CustomerStore>,
}

impl CustomerInfoTool {
    pub fn new(customers: Arc<CustomerStore>) -> Self {
        Self { customers }
    }
}

#[async_trait]
impl Tool for CustomerInfoTool {
    fn name(&self) -> &str {
        ToolKind::CustomerInfo.as_str()
    }

    fn description(&self) -> &str {
        "Get customer information by customer ID or email. Returns a DEFINITIVE result: do not retry if the customer is not found."
    }

    fn parameters(&self) -> Value {
        args::schema::<CustomerLookupArgs>()
    }

    async fn execute(&self, args: Value) -> Result<ToolOutput> {
        let args: CustomerLookupArgs = args::parse(self.name(), args)?;

        let customer = match (non_blank(args.customer_id), non_blank(args.email)) {
            (Some(id), _) => self.customers.get(&id),
            (None, Some(email)) => self.customers.find_by_email(&email),
            (None, None) => {
                return Ok(ToolOutput::rejected(
                    "Please provide a customer ID or an email address to look up the customer.",
                ))
            }
        };

        Ok(match customer {
            Some(customer) => ToolOutput::result(render_profile(&customer)),
            None => ToolOutput::rejected("Customer not found."),
        })
    }
}

// =============================================================================
// Customer Orders Tool
// =============================================================================

pub struct CustomerOrdersTool {
    customers: Arc<CustomerStore>,
    orders: Arc<OrderStore>,
}

impl CustomerOrdersTool {
    pub fn new(customers: Arc<CustomerStore>, orders: Arc<OrderStore>) -> Self {
        Self { customers, orders }
    }
}

#[async_trait]
impl Tool for CustomerOrdersTool {
    fn name(&self) -> &str {
        ToolKind::GetCustomerOrders.as_str()
    }

    fn description(&self) -> &str {
        "Get all orders for a customer by customer ID. Use this when customers forget their order IDs or want to see all their orders."
    }

    fn parameters(&self) -> Value {
        args::schema::<CustomerIdArgs>()
    }

    async fn execute(&self, args: Value) -> Result<ToolOutput> {
        let args: CustomerIdArgs = args::parse(self.name(), args)?;
        let id = args.customer_id.trim();

        let Some(customer) = self.customers.get(id) else {
            return Ok(ToolOutput::rejected(format!(
                "Customer ID {} not found. Cannot retrieve orders for a non-existent customer. Ask the customer for their email address to search instead.",
                id
            )));
        };

        let summaries = order_summaries(&self.orders, &customer);
        if summaries.is_empty() {
            return Ok(ToolOutput::rejected(format!(
                "No orders found for customer {}. This customer has not placed any orders yet.",
                customer.id
            )));
        }
        Ok(ToolOutput::result(format!(
            "Orders for {}:\n{}",
            customer.name,
            summaries.join("\n")
        )))
    }
}

// =============================================================================
// Search Orders By Email Tool
// =============================================================================

pub struct SearchOrdersByEmailTool {
    customers: Arc<CustomerStore>,
    orders: Arc<OrderStore>,
}

impl SearchOrdersByEmailTool {
    pub fn new(customers: Arc<CustomerStore>, orders: Arc<OrderStore>) -> Self {
        Self { customers, orders }
    }
}

#[async_trait]
impl Tool for SearchOrdersByEmailTool {
    fn name(&self) -> &str {
        ToolKind::SearchOrdersByEmail.as_str()
    }

    fn description(&self) -> &str {
        "Search for orders using the customer's email when a customer ID lookup fails."
    }

    fn parameters(&self) -> Value {
        args::schema::<EmailArgs>()
    }

    async fn execute(&self, args: Value) -> Result<ToolOutput> {
        let args: EmailArgs = args::parse(self.name(), args)?;
        let email = args.email.trim();

        let Some(customer) = self.customers.find_by_email(email) else {
            return Ok(ToolOutput::rejected(format!(
                "No customer found with email {}. This email is not registered in our system.",
                email
            )));
        };

        let summaries = order_summaries(&self.orders, &customer);
        if summaries.is_empty() {
            return Ok(ToolOutput::rejected(format!(
                "Customer with email {} exists but has no orders yet.",
                email
            )));
        }
        Ok(ToolOutput::result(format!(
            "Orders for {}:\n{}",
            email,
            summaries.join("\n")
        )))
    }
}

// =============================================================================
// Update Preferences Tool
// =============================================================================

pub struct UpdatePreferencesTool {
    customers: Arc<CustomerStore>,
}

impl UpdatePreferencesTool {
    pub fn new(customers: Arc<CustomerStore>) -> Self {
        Self { customers }
    }
}

#[async_trait]
impl Tool for UpdatePreferencesTool {
    fn name(&self) -> &str {
        ToolKind::UpdatePreferences.as_str()
    }

    fn description(&self) -> &str {
        "Update customer preferences such as preferred categories, brands or communication method (email, sms, phone)."
    }

    fn parameters(&self) -> Value {
        args::schema::<UpdatePreferencesArgs>()
    }

    async fn execute(&self, args: Value) -> Result<ToolOutput> {
        let args: UpdatePreferencesArgs = args::parse(self.name(), args)?;
        let prefs = args.preferences;
        let update = PreferencesUpdate {
            categories: prefs.categories.map(OneOrMany::into_vec).unwrap_or_default(),
            brands: prefs.brands.map(OneOrMany::into_vec).unwrap_or_default(),
            communication: prefs.communication.map(Communication::from),
        };

        Ok(match self.customers.update_preferences(&args.customer_id, update) {
            Mutation::Applied(msg) => ToolOutput::result(msg),
            Mutation::Rejected(msg) => ToolOutput::rejected(msg),
        })
    }
}
