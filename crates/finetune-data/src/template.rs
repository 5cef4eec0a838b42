//! Qwen3 chat template rendering
//!
//! The `<|im_start|>` / `<|im_end|>` markers are a wire-format contract with
//! the downstream fine-tuning consumer and must be reproduced exactly.

/// Turn start marker
pub const IM_START: &str = "<|im_start|>";
/// Turn end marker
pub const IM_END: &str = "<|im_end|>";
/// Fixed system prompt used for every example
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Wrap a single conversational turn with role markers
fn render_turn(role: &str, content: &str) -> String {
    format!("{IM_START}{role}\n{content}{IM_END}\n")
}

/// Format a single example using the Qwen3 chat template
///
/// Produces exactly three turns in order: a fixed system turn, a user turn,
/// and an assistant turn carrying `response`. When `context` is non-blank
/// after trimming, the user turn is `instruction` followed by a blank line
/// and then `context`; otherwise it is `instruction` alone. Blank and missing
/// context are treated identically.
pub fn format_chat(instruction: &str, context: &str, response: &str) -> String {
    let user_content = if context.trim().is_empty() {
        instruction.to_string()
    } else {
        format!("{instruction}\n\n{context}")
    };

    let mut text = String::new();
    text.push_str(&render_turn("system", SYSTEM_PROMPT));
    text.push_str(&render_turn("user", &user_content));
    text.push_str(&render_turn("assistant", response));
    text
}
