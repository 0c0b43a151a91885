// ABOUTME: Provider runtimes for PromptOS, turning a user intent into four model-specific prompts.
// ABOUTME: Defines the PromptRuntime trait, its Anthropic and OpenRouter adapters, and a stub for tests.

pub mod providers;
pub mod runtime;
pub mod testing;

pub use providers::{ProviderKind, RuntimeOptions, create_runtime, model_label, runtime_with_key};
pub use runtime::{Generation, PromptRuntime, RuntimeError};
