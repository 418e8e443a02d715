//! Query builder (spec §4.8): assembles the scoring query from the current user
//! prompt plus the last three user messages, preserving source order.
use crate::types::{PromptContext, Role};

/// Builds the scoring query: `userPrompt ‖ " " ‖ join(last 3 user messages, " ")`.
/// Assistant/system messages are ignored; recent-message order follows the
/// original transcript order.
pub fn build_query(ctx: &PromptContext) -> String {
    let last_three_user: Vec<&str> = ctx
        .recent_messages
        .iter()
        .filter(|m| m.role == Role::User)
        .map(|m| m.content.as_str())
        .collect();

    let tail_start = last_three_user.len().saturating_sub(3);
    let tail = &last_three_user[tail_start..];

    if tail.is_empty() {
        ctx.user_prompt.clone()
    } else {
        format!("{} {}", ctx.user_prompt, tail.join(" "))
    }
}
