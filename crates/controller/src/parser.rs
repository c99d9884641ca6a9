//! Parser module for model output.
//!
//! Turns the raw text of one completion into a [`ParsedStep`]. The model is
//! asked for the `Thought / Action / Action Input / Final Answer` grammar but
//! rarely follows it to the letter, so labels are matched case-insensitively,
//! markdown emphasis around them is ignored and a hallucinated
//! `Observation:` ends the step.

use serde_json::Value;

/// Argument payload attached to an `Action`.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionInput {
    /// A JSON object (or array) of arguments.
    Json(Value),
    /// A bare value, e.g. `Action Input: ORD001`.
    Text(String),
    /// No input given.
    Empty,
}

/// A tool call requested by the model, not yet validated.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolInvocation {
    pub tool: String,
    pub input: ActionInput,
}

/// One parsed model step.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedStep {
    /// Call a tool. `log` is the model text for this step, replayed into the
    /// scratch-pad ahead of the observation.
    Act {
        thought: String,
        log: String,
        invocation: ToolInvocation,
    },
    /// The reply for the customer.
    Answer { thought: String, answer: String },
    /// Reasoning with no action marker.
    Reasoning { thought: String },
    /// Nothing usable.
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Thought,
    Action,
    ActionInput,
    FinalAnswer,
    Observation,
    /// Text following an `Action:` that named no tool.
    Reply,
}

// "action input:" must be tried before "action:".
const MARKERS: [(&str, Marker); 5] = [
    ("final answer:", Marker::FinalAnswer),
    ("action input:", Marker::ActionInput),
    ("action:", Marker::Action),
    ("thought:", Marker::Thought),
    ("observation:", Marker::Observation),
];

/// Parser for model responses, supporting the ReAct text grammar and
/// JSON function-call objects.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionParser;

impl ActionParser {
    /// Create a new parser.
    pub fn new() -> Self {
        Self
    }

    /// Parse a model response into a step.
    pub fn parse(&self, response: &str) -> ParsedStep {
        let text = response.trim();
        if text.is_empty() {
            return ParsedStep::Empty;
        }

        if let Some(invocation) = self.try_parse_function_call(text) {
            if invocation.tool.eq_ignore_ascii_case("final answer") {
                if let ActionInput::Text(answer) = invocation.input {
                    return ParsedStep::Answer {
                        thought: String::new(),
                        answer,
                    };
                }
            } else {
                return ParsedStep::Act {
                    thought: String::new(),
                    log: text.to_string(),
                    invocation,
                };
            }
        }

        self.parse_text_format(text)
    }

    /// Try to parse an OpenAI-style function call from JSON.
    fn try_parse_function_call(&self, response: &str) -> Option<ToolInvocation> {
        let body = strip_code_fence(response);
        if !(body.starts_with('{') || body.starts_with('[')) {
            return None;
        }
        let json: Value = serde_json::from_str(body).ok()?;
        if let Some(calls) = json.as_array() {
            return calls.first().and_then(extract_tool_call);
        }
        extract_tool_call(&json)
    }

    fn parse_text_format(&self, text: &str) -> ParsedStep {
        let mut current = Marker::Thought;
        let mut thought: Vec<&str> = Vec::new();
        let mut action: Option<(String, Option<String>)> = None;
        let mut input: Vec<&str> = Vec::new();
        let mut answer: Option<Vec<&str>> = None;
        let mut reply: Vec<&str> = Vec::new();
        let mut consumed: Vec<&str> = Vec::new();

        for line in text.lines() {
            // Everything after `Final Answer:` belongs to the answer.
            if let Some(lines) = answer.as_mut() {
                lines.push(line);
                continue;
            }

            match split_marker(line) {
                Some((Marker::Observation | Marker::Action | Marker::FinalAnswer, _))
                    if action.is_some() =>
                {
                    break;
                }
                Some((Marker::FinalAnswer, rest)) => {
                    current = Marker::FinalAnswer;
                    answer = Some(vec![rest]);
                }
                Some((Marker::Action, rest)) => match clean_tool_name(rest) {
                    Some(named) => {
                        current = Marker::Action;
                        action = Some(named);
                    }
                    // `Action:` alone; the name may be on the next line.
                    None if rest.is_empty() => current = Marker::Action,
                    None => current = Marker::Reply,
                },
                Some((Marker::ActionInput, _)) if current == Marker::Reply => {}
                Some((Marker::ActionInput, rest)) => {
                    current = Marker::ActionInput;
                    input.push(rest);
                }
                Some((Marker::Thought, rest)) => {
                    current = Marker::Thought;
                    thought.push(rest);
                }
                Some((Marker::Observation, _)) => {
                    current = Marker::Observation;
                }
                // `split_marker` never yields `Reply`; it is a parser state only.
                Some((Marker::Reply, _)) => unreachable!(),
                None => match current {
                    Marker::Thought => thought.push(line),
                    Marker::ActionInput => input.push(line),
                    Marker::Reply => reply.push(line),
                    Marker::Action if action.is_none() && !line.trim().is_empty() => {
                        match clean_tool_name(line) {
                            Some(named) if is_tool_identifier(&named.0) => action = Some(named),
                            Some(_) => {
                                current = Marker::Reply;
                                reply.push(line);
                            }
                            None => current = Marker::Reply,
                        }
                    }
                    _ => {}
                },
            }
            consumed.push(line);
        }

        let thought = join_lines(&thought);

        if let Some((tool, inline)) = action {
            let raw_input = join_lines(&input);
            let raw_input = if raw_input.is_empty() {
                inline.unwrap_or_default()
            } else {
                raw_input
            };
            return ParsedStep::Act {
                thought,
                log: join_lines(&consumed),
                invocation: ToolInvocation {
                    tool,
                    input: parse_action_input(&raw_input),
                },
            };
        }

        match answer {
            Some(lines) => {
                let answer = join_lines(&lines);
                if !answer.is_empty() {
                    ParsedStep::Answer { thought, answer }
                } else if !thought.is_empty() {
                    ParsedStep::Answer {
                        answer: thought.clone(),
                        thought,
                    }
                } else {
                    ParsedStep::Empty
                }
            }
            None => {
                let reply = join_lines(&reply);
                if !reply.is_empty() {
                    ParsedStep::Answer {
                        thought,
                        answer: reply,
                    }
                } else if !thought.is_empty() {
                    ParsedStep::Reasoning { thought }
                } else {
                    ParsedStep::Empty
                }
            }
        }
    }
}

/// Interpret the text after `Action Input:`.
pub fn parse_action_input(raw: &str) -> ActionInput {
    let body = strip_code_fence(raw.trim());
    if body.is_empty() {
        return ActionInput::Empty;
    }

    match serde_json::from_str::<Value>(body) {
        Ok(value @ (Value::Object(_) | Value::Array(_))) => ActionInput::Json(value),
        Ok(Value::Null) => ActionInput::Empty,
        Ok(Value::String(s)) => text_input(&s),
        Ok(_) => ActionInput::Text(body.to_string()),
        Err(_) => match embedded_object(body) {
            Some(obj) => ActionInput::Json(obj),
            None => text_input(body),
        },
    }
}

fn text_input(raw: &str) -> ActionInput {
    let text = raw
        .trim()
        .trim_matches(|c: char| matches!(c, '"' | '\'' | '`'))
        .trim();
    if text.is_empty() || text.eq_ignore_ascii_case("none") {
        ActionInput::Empty
    } else {
        ActionInput::Text(text.to_string())
    }
}

/// A JSON object surrounded by prose, e.g. `{"order_id": "ORD001"} (the order)`.
fn embedded_object(body: &str) -> Option<Value> {
    let start = body.find('{')?;
    let end = body.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str::<Value>(&body[start..=end])
        .ok()
        .filter(Value::is_object)
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

/// Extract tool call from a JSON object.
fn extract_tool_call(json: &Value) -> Option<ToolInvocation> {
    // OpenAI format: { "function": { "name": "...", "arguments": "..." } }
    if let Some(func) = json.get("function") {
        let name = func.get("name")?.as_str()?;
        return Some(ToolInvocation {
            tool: name.to_string(),
            input: json_arguments(func.get("arguments")),
        });
    }

    // Simple format: { "name": "...", "arguments": {...} }
    let name = json
        .get("name")
        .or_else(|| json.get("action"))
        .and_then(Value::as_str)?;
    let args = json
        .get("arguments")
        .or_else(|| json.get("action_input"))
        .or_else(|| json.get("parameters"));
    Some(ToolInvocation {
        tool: name.to_string(),
        input: json_arguments(args),
    })
}

fn json_arguments(args: Option<&Value>) -> ActionInput {
    match args {
        Some(Value::String(s)) => parse_action_input(s),
        Some(value @ Value::Object(_)) => ActionInput::Json(value.clone()),
        _ => ActionInput::Empty,
    }
}

fn split_marker(line: &str) -> Option<(Marker, &str)> {
    let stripped = line.trim_start_matches(|c: char| c == '*' || c == '#' || c.is_whitespace());
    for (label, marker) in MARKERS {
        if let Some(head) = stripped.get(..label.len()) {
            if head.eq_ignore_ascii_case(label) {
                let rest = stripped[label.len()..].trim_start_matches('*').trim();
                return Some((marker, rest));
            }
        }
    }
    None
}

/// Normalize the text after `Action:`. Returns `None` when no tool is named.
fn clean_tool_name(raw: &str) -> Option<(String, Option<String>)> {
    let raw = raw.trim();
    let (name, inline) = match raw.find('(') {
        Some(open) if raw.ends_with(')') => (&raw[..open], Some(raw[open + 1..raw.len() - 1].to_string())),
        _ => (raw, None),
    };
    let name = name.trim_matches(|c: char| {
        matches!(c, '`' | '"' | '\'' | '[' | ']' | '*' | '.') || c.is_whitespace()
    });
    if name.is_empty() || name.eq_ignore_ascii_case("none") || name.eq_ignore_ascii_case("n/a") {
        return None;
    }
    Some((name.to_string(), inline))
}

/// A bare tool name such as `order_status`, as opposed to a line of prose.
fn is_tool_identifier(name: &str) -> bool {
    name.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn join_lines(lines: &[&str]) -> String {
    lines.join("\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(text: &str) -> ParsedStep {
        ActionParser::new().parse(text)
    }

    #[test]
    fn test_parse_final_answer() {
        match parse("I know this one.\nFinal Answer: Your order has shipped.") {
            ParsedStep::Answer { thought, answer } => {
                assert_eq!(thought, "I know this one.");
                assert_eq!(answer, "Your order has shipped.");
            }
            other => panic!("Expected Answer, got {:?}", other),
        }
    }

    #[test]
    fn test_final_answer_keeps_trailing_lines() {
        match parse("Final Answer: Here you go:\n- Action: figures are rounded\n- Thought: none") {
            ParsedStep::Answer { answer, .. } => {
                assert!(answer.starts_with("Here you go:"));
                assert!(answer.contains("Action: figures are rounded"));
            }
            other => panic!("Expected Answer, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_text_tool_call() {
        let step = parse(
            "I should look up the order.\nAction: order_status\nAction Input: {\"order_id\": \"ORD001\"}",
        );
        match step {
            ParsedStep::Act {
                thought,
                log,
                invocation,
            } => {
                assert_eq!(thought, "I should look up the order.");
                assert!(log.ends_with("Action Input: {\"order_id\": \"ORD001\"}"));
                assert_eq!(invocation.tool, "order_status");
                assert_eq!(invocation.input, ActionInput::Json(json!({"order_id": "ORD001"})));
            }
            other => panic!("Expected Act, got {:?}", other),
        }
    }

    #[test]
    fn test_markers_are_case_insensitive_and_ignore_emphasis() {
        let step = parse("**thought:** check it\n**ACTION:** `cancel_order`\n**action input:** ORD002");
        match step {
            ParsedStep::Act { invocation, .. } => {
                assert_eq!(invocation.tool, "cancel_order");
                assert_eq!(invocation.input, ActionInput::Text("ORD002".into()));
            }
            other => panic!("Expected Act, got {:?}", other),
        }
    }

    #[test]
    fn test_hallucinated_observation_is_cut() {
        let step = parse(
            "Action: order_status\nAction Input: {\"order_id\": \"ORD003\"}\nObservation: delivered\nFinal Answer: It was delivered.",
        );
        match step {
            ParsedStep::Act { log, invocation, .. } => {
                assert_eq!(invocation.tool, "order_status");
                assert!(!log.contains("Observation"));
                assert!(!log.contains("delivered"));
            }
            other => panic!("Expected Act, got {:?}", other),
        }
    }

    #[test]
    fn test_multiline_json_input_in_code_fence() {
        let step = parse(
            "Action: update_preferences\nAction Input: ```json\n{\n  \"customer_id\": \"CUST001\",\n  \"preferences\": {\"brands\": [\"Acme\"]}\n}\n```",
        );
        match step {
            ParsedStep::Act { invocation, .. } => {
                assert_eq!(
                    invocation.input,
                    ActionInput::Json(json!({"customer_id": "CUST001", "preferences": {"brands": ["Acme"]}}))
                );
            }
            other => panic!("Expected Act, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_action_is_reasoning() {
        match parse("Hello! I can help with orders, products and returns.") {
            ParsedStep::Reasoning { thought } => assert!(thought.starts_with("Hello!")),
            other => panic!("Expected Reasoning, got {:?}", other),
        }
    }

    #[test]
    fn test_action_none_is_not_a_tool_call() {
        match parse("The customer said thanks.\nAction: None\nFinal Answer: You're welcome!") {
            ParsedStep::Answer { answer, .. } => assert_eq!(answer, "You're welcome!"),
            other => panic!("Expected Answer, got {:?}", other),
        }
        match parse("Just chatting.\nAction: N/A") {
            ParsedStep::Reasoning { thought } => assert_eq!(thought, "Just chatting."),
            other => panic!("Expected Reasoning, got {:?}", other),
        }
    }

    #[test]
    fn test_prose_after_action_none_is_the_answer() {
        let step = parse(
            "Thought: The customer is just saying hello.\nAction: None\nHello! How can I help you with your order today?",
        );
        match step {
            ParsedStep::Answer { thought, answer } => {
                assert_eq!(thought, "The customer is just saying hello.");
                assert_eq!(answer, "Hello! How can I help you with your order today?");
            }
            other => panic!("Expected Answer, got {:?}", other),
        }

        match parse("Thought: Greeting.\nAction: N/A\nAction Input: none\nHi there!") {
            ParsedStep::Answer { answer, .. } => assert_eq!(answer, "Hi there!"),
            other => panic!("Expected Answer, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_action_line() {
        match parse("Thought: Just a greeting.\nAction:\nHello! How can I help you today?") {
            ParsedStep::Answer { answer, .. } => {
                assert_eq!(answer, "Hello! How can I help you today?");
            }
            other => panic!("Expected Answer, got {:?}", other),
        }

        match parse("Thought: Look it up.\nAction:\norder_status\nAction Input: ORD001") {
            ParsedStep::Act { invocation, .. } => {
                assert_eq!(invocation.tool, "order_status");
                assert_eq!(invocation.input, ActionInput::Text("ORD001".into()));
            }
            other => panic!("Expected Act, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_final_answer_falls_back_to_thought() {
        match parse("Thought: Your order is on its way.\nFinal Answer:") {
            ParsedStep::Answer { answer, .. } => assert_eq!(answer, "Your order is on its way."),
            other => panic!("Expected Answer, got {:?}", other),
        }
        assert_eq!(parse("Final Answer:   "), ParsedStep::Empty);
        assert_eq!(parse("   \n "), ParsedStep::Empty);
    }

    #[test]
    fn test_call_style_action_name() {
        match parse("Action: get_weather(London)") {
            ParsedStep::Act { invocation, .. } => {
                assert_eq!(invocation.tool, "get_weather");
                assert_eq!(invocation.input, ActionInput::Text("London".into()));
            }
            other => panic!("Expected Act, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_json_function_call() {
        match parse(r#"{"name": "product_details", "arguments": {"product_id": "PROD001"}}"#) {
            ParsedStep::Act { invocation, .. } => {
                assert_eq!(invocation.tool, "product_details");
                assert_eq!(invocation.input, ActionInput::Json(json!({"product_id": "PROD001"})));
            }
            other => panic!("Expected Act, got {:?}", other),
        }

        let openai = r#"[{"function": {"name": "get_weather", "arguments": "{\"city\": \"Paris\"}"}}]"#;
        match parse(openai) {
            ParsedStep::Act { invocation, .. } => {
                assert_eq!(invocation.tool, "get_weather");
                assert_eq!(invocation.input, ActionInput::Json(json!({"city": "Paris"})));
            }
            other => panic!("Expected Act, got {:?}", other),
        }
    }

    #[test]
    fn test_action_input_variants() {
        assert_eq!(parse_action_input(""), ActionInput::Empty);
        assert_eq!(parse_action_input("\"ORD001\""), ActionInput::Text("ORD001".into()));
        assert_eq!(parse_action_input("12345"), ActionInput::Text("12345".into()));
        assert_eq!(
            parse_action_input(r#"{"city": "Rome"} (capital of Italy)"#),
            ActionInput::Json(json!({"city": "Rome"}))
        );
    }
}
