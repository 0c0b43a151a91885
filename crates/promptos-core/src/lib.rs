// ABOUTME: Core library for PromptOS, holding the domain types shared by the server and CLI.
// ABOUTME: Defines prompt sets, the meta-prompt, JSON extraction, usage accounting, and local settings.

pub mod extract;
pub mod meta_prompt;
pub mod prompt;
pub mod settings;
pub mod usage;

pub use extract::{ExtractError, parse_prompt_set, strip_code_fence};
pub use meta_prompt::{META_PROMPT, user_message};
pub use prompt::{IntentError, ModelKey, PromptSet, validate_intent};
pub use settings::{Settings, SettingsError};
pub use usage::{Pricing, TokenUsage, UsageSnapshot, UsageTotals, UsageTracker};
