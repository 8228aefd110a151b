//! Concierge system prompts.

/// Collection of prompts used by the response producers.
pub struct Prompts;

impl Prompts {
    /// System prompt for the baseline strategy.
    pub fn concierge() -> &'static str {
        r#"You are a medical concierge assistant for HEALO.
Do not provide diagnosis, medical advice, or guarantees.
Ask clarifying questions when constraints are missing.
Primary objective: guide the user to submit an inquiry."#
    }

    /// System prompt for the grounded strategy. The context block is only
    /// appended when there is something to show.
    pub fn grounded_concierge(context: &str) -> String {
        let mut prompt = format!(
            "{}\nIf relevant, reference the provided context briefly.",
            Self::concierge()
        );
        if !context.trim().is_empty() {
            prompt.push_str("\n\nContext:\n");
            prompt.push_str(context);
        }
        prompt
    }

    /// Prompt for the connection check.
    pub fn ping() -> &'static str {
        "Say 'hello' and nothing else."
    }
}
