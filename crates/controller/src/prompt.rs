//! Built-in prompt template and the variables it is rendered with.

use serde::Serialize;
use shopdesk_core::types::ToolDefinition;

/// Default agent prompt. Overridable through `agent.prompt_path`.
pub const DEFAULT_PROMPT: &str = r#"You are ShopDesk, the customer service assistant of an online store. Help customers with orders, returns, products, their account and shipping questions. Be friendly, concise and specific.

Guidelines:
- Use a tool whenever you need store data (orders, products, customers, weather). Never invent order details, prices or stock levels.
- Chain tools when it helps: check an order before cancelling or returning it, look at the weather before recommending seasonal products.
- Mention order IDs, product IDs and tracking numbers when they are relevant.
- Explain cancellations, returns and refunds clearly.
- Greetings and general questions need no tool.
- If a tool reports a problem, tell the customer what you can do instead.

You have access to the following tools:
{{ tools }}

Use this format:

Thought: your reasoning about what to do next
Action: the tool to use, one of [{{ tool_names }}]
Action Input: a JSON object with the tool arguments, e.g. {"order_id": "ORD001"}
Observation: the tool result (provided by the system, never write it yourself)
... (Thought/Action/Action Input/Observation can repeat)
Thought: I now know what to tell the customer
Final Answer: your reply to the customer

When no tool is needed, write only a Thought and a Final Answer.
If you do not name an Action, your Thought is taken as the final answer.

Previous conversation:
{{ chat_history }}

Question: {{ input }}
Thought: {{ agent_scratchpad }}"#;

/// Variables the agent prompt is rendered with.
#[derive(Debug, Clone, Serialize)]
pub struct PromptVars {
    /// One `name: description` line per tool.
    pub tools: String,
    /// Comma-separated tool names.
    pub tool_names: String,
    /// `Human:` / `AI:` transcript of the recent turns.
    pub chat_history: String,
    /// The customer message plus any session context.
    pub input: String,
    /// Actions and observations of the current turn so far.
    pub agent_scratchpad: String,
}

impl PromptVars {
    /// Variables for the first call of a turn.
    pub fn new(tools: &[ToolDefinition], chat_history: String, input: String) -> Self {
        Self {
            tools: tools
                .iter()
                .map(ToolDefinition::prompt_line)
                .collect::<Vec<_>>()
                .join("\n"),
            tool_names: tools
                .iter()
                .map(|t| t.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            chat_history,
            input,
            agent_scratchpad: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shopdesk_core::template::PromptTemplate;

    fn tool(name: &str) -> ToolDefinition {
        ToolDefinition {
            name: name.into(),
            description: format!("Run {}.", name),
            parameters: json!({"type": "object", "properties": {}}),
        }
    }

    #[test]
    fn test_default_prompt_renders_every_placeholder() {
        let template = PromptTemplate::new(DEFAULT_PROMPT).unwrap();
        let mut vars = PromptVars::new(
            &[tool("order_status"), tool("get_weather")],
            "Human: hi\nAI: Hello!".into(),
            "Where is ORD001?".into(),
        );
        vars.agent_scratchpad = "Action: order_status".into();

        let rendered = template.render(&vars).unwrap();
        assert!(rendered.contains("order_status: Run order_status."));
        assert!(rendered.contains("one of [order_status, get_weather]"));
        assert!(rendered.contains("Human: hi\nAI: Hello!"));
        assert!(rendered.contains("Question: Where is ORD001?"));
        assert!(rendered.ends_with("Thought: Action: order_status"));
        assert!(!rendered.contains("{{"));
    }
}
