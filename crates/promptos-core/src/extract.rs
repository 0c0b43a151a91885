// ABOUTME: Extracts the PromptSet JSON payload from a model's free-text reply.
// ABOUTME: Strips optional markdown code fences before parsing.

use thiserror::Error;

use crate::prompt::PromptSet;

/// Errors produced while turning model text into a PromptSet.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no content in response")]
    NoContent,

    #[error("failed to parse generated prompts: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Remove a leading ```` ```json ```` or ```` ``` ```` fence and a trailing
/// ```` ``` ```` fence, trimming whitespace on both sides.
pub fn strip_code_fence(text: &str) -> &str {
    let mut body = text.trim();

    if let Some(rest) = body.strip_prefix("```json") {
        body = rest;
    } else if let Some(rest) = body.strip_prefix("```") {
        body = rest;
    }

    if let Some(rest) = body.strip_suffix("```") {
        body = rest;
    }

    body.trim()
}

/// Parse the model reply into a PromptSet. All four fields must be present
/// strings; unknown fields are ignored.
pub fn parse_prompt_set(text: &str) -> Result<PromptSet, ExtractError> {
    if text.trim().is_empty() {
        return Err(ExtractError::NoContent);
    }

    let body = strip_code_fence(text);
    Ok(serde_json::from_str(body)?)
}
