// ABOUTME: Defines PromptSet, the four-prompt result of a generation, and the ModelKey enum.
// ABOUTME: ModelKey carries the display metadata (labels, format names, descriptions) for each target model.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The four generated prompts, one per target model. Produced in one piece
/// from a single model reply and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptSet {
    pub claude: String,
    pub gpt4: String,
    pub gemini: String,
    pub grok: String,
}

impl PromptSet {
    /// Look up the prompt generated for the given model.
    pub fn get(&self, key: ModelKey) -> &str {
        match key {
            ModelKey::Claude => &self.claude,
            ModelKey::Gpt4 => &self.gpt4,
            ModelKey::Gemini => &self.gemini,
            ModelKey::Grok => &self.grok,
        }
    }

    /// Iterate prompts in display order, starting with `first`.
    pub fn ordered_from(&self, first: ModelKey) -> Vec<(ModelKey, &str)> {
        let mut keys = vec![first];
        keys.extend(ModelKey::ALL.into_iter().filter(|k| *k != first));
        keys.into_iter().map(|k| (k, self.get(k))).collect()
    }
}

/// A target model the meta-prompt produces a variant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKey {
    Claude,
    Gpt4,
    Gemini,
    Grok,
}

impl ModelKey {
    pub const ALL: [ModelKey; 4] = [
        ModelKey::Claude,
        ModelKey::Gpt4,
        ModelKey::Gemini,
        ModelKey::Grok,
    ];

    /// Wire key used in the JSON contract (`claude`, `gpt4`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKey::Claude => "claude",
            ModelKey::Gpt4 => "gpt4",
            ModelKey::Gemini => "gemini",
            ModelKey::Grok => "grok",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ModelKey::Claude => "Claude",
            ModelKey::Gpt4 => "GPT-4",
            ModelKey::Gemini => "Gemini",
            ModelKey::Grok => "Grok",
        }
    }

    pub fn company(&self) -> &'static str {
        match self {
            ModelKey::Claude => "Anthropic",
            ModelKey::Gpt4 => "OpenAI",
            ModelKey::Gemini => "Google",
            ModelKey::Grok => "xAI",
        }
    }

    /// Short name of the prompt style this model responds best to.
    pub fn format_name(&self) -> &'static str {
        match self {
            ModelKey::Claude => "XML Tags",
            ModelKey::Gpt4 => "Markdown + JSON Schema",
            ModelKey::Gemini => "Clean Markdown",
            ModelKey::Grok => "Direct Conversational",
        }
    }

    /// Longer explanation shown in the card's info panel.
    pub fn format_description(&self) -> &'static str {
        match self {
            ModelKey::Claude => {
                "Claude excels with XML-structured prompts using tags like <task>, <context>, <constraints>. \
                 This hierarchical format helps Claude parse complex instructions and enables superior \
                 chain-of-thought reasoning."
            }
            ModelKey::Gpt4 => {
                "GPT-4 performs best with markdown headers (##) for sections and JSON schemas for \
                 structured outputs. Step-by-step instructions leverage its strong reasoning capabilities."
            }
            ModelKey::Gemini => {
                "Gemini prefers explicit, well-formatted markdown with clear task definitions. It responds \
                 well to safety considerations and explicit output format specifications."
            }
            ModelKey::Grok => {
                "Grok works best with direct, conversational prompts that maintain precision. Its real-time \
                 knowledge means prompts can reference current events and trends."
            }
        }
    }

    /// CSS accent class used by the web UI.
    pub fn accent(&self) -> &'static str {
        match self {
            ModelKey::Claude => "accent-claude",
            ModelKey::Gpt4 => "accent-gpt4",
            ModelKey::Gemini => "accent-gemini",
            ModelKey::Grok => "accent-grok",
        }
    }
}

impl fmt::Display for ModelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "claude" => Ok(ModelKey::Claude),
            "gpt4" | "gpt-4" => Ok(ModelKey::Gpt4),
            "gemini" => Ok(ModelKey::Gemini),
            "grok" => Ok(ModelKey::Grok),
            other => Err(format!(
                "unknown model '{}', expected one of: claude, gpt4, gemini, grok",
                other
            )),
        }
    }
}

/// Reasons an intent is refused before any provider call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IntentError {
    #[error("Intent is required")]
    Empty,
}

/// Validate a user intent, returning the trimmed text.
pub fn validate_intent(intent: &str) -> Result<&str, IntentError> {
    let trimmed = intent.trim();
    if trimmed.is_empty() {
        return Err(IntentError::Empty);
    }
    Ok(trimmed)
}
