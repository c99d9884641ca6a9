//! Canned prompts offered next to the chat box.

use serde::Serialize;

/// A one-click prompt.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct QuickAction {
    pub id: &'static str,
    pub label: &'static str,
    pub prompt: &'static str,
}

pub static QUICK_ACTIONS: [QuickAction; 6] = [
    QuickAction {
        id: "order-status",
        label: "Check Order Status",
        prompt: "I'd like to check the status of my order",
    },
    QuickAction {
        id: "track-package",
        label: "Track Package",
        prompt: "Can you help me track my package?",
    },
    QuickAction {
        id: "return-item",
        label: "Return Item",
        prompt: "I need to return an item",
    },
    QuickAction {
        id: "product-search",
        label: "Product Search",
        prompt: "I'm looking for products",
    },
    QuickAction {
        id: "recommendations",
        label: "Get Recommendations",
        prompt: "Can you recommend some products?",
    },
    QuickAction {
        id: "weather",
        label: "Weather Update",
        prompt: "What's the weather like for shipping?",
    },
];

/// Look up a quick action by id.
pub fn find(id: &str) -> Option<&'static QuickAction> {
    QUICK_ACTIONS.iter().find(|action| action.id == id)
}
