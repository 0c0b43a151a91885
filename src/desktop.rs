// ABOUTME: Direct client mode: generates prompts with a locally stored API key, bypassing the server.
// ABOUTME: Also implements the `settings` subcommands that manage that key and display preferences.

use anyhow::{Context, anyhow};
use clap::Subcommand;
use promptos_agent::{ProviderKind, RuntimeOptions, runtime_with_key};
use promptos_core::{ModelKey, Pricing, PromptSet, Settings, TokenUsage, validate_intent};

#[derive(Debug, Subcommand)]
pub enum SettingsAction {
    /// Print the current settings (the API key is masked).
    Show,
    /// Store the Anthropic API key used by `promptos generate`.
    SetKey { key: String },
    /// Remove the stored API key.
    ClearKey,
    /// Choose which model's prompt is printed first.
    SetDefaultModel { model: ModelKey },
    /// Toggle the format description printed above each prompt.
    SetFormatInfo {
        #[arg(action = clap::ArgAction::Set, value_parser = clap::builder::BoolishValueParser::new())]
        enabled: bool,
    },
}

/// `promptos settings ...`
pub fn settings(action: SettingsAction) -> anyhow::Result<()> {
    let path = Settings::default_path();
    let mut settings = Settings::load(&path)?;

    match action {
        SettingsAction::Show => {
            let view = serde_json::json!({
                "path": path.display().to_string(),
                "api_key": settings.masked_api_key(),
                "default_model": settings.default_model,
                "show_format_info": settings.show_format_info,
            });
            println!("{}", serde_json::to_string_pretty(&view)?);
            return Ok(());
        }
        SettingsAction::SetKey { key } => {
            let key = key.trim().to_string();
            if key.is_empty() {
                return Err(anyhow!("API key must not be empty"));
            }
            settings.api_key = Some(key);
        }
        SettingsAction::ClearKey => settings.api_key = None,
        SettingsAction::SetDefaultModel { model } => settings.default_model = model,
        SettingsAction::SetFormatInfo { enabled } => settings.show_format_info = enabled,
    }

    settings.save(&path)?;
    tracing::debug!("saved settings to {}", path.display());
    println!("Settings saved to {}", path.display());
    Ok(())
}

/// `promptos generate <intent>`: call the provider directly with the stored key.
pub async fn generate(intent: &str, only: Option<ModelKey>) -> anyhow::Result<()> {
    let settings = Settings::load(&Settings::default_path())?;
    let api_key = settings
        .api_key
        .clone()
        .filter(|k| !k.is_empty())
        .ok_or_else(|| anyhow!("no API key stored; run `promptos settings set-key <KEY>` first"))?;

    let intent = validate_intent(intent)?;

    let runtime = runtime_with_key(ProviderKind::Anthropic, api_key, &RuntimeOptions::default())
        .context("failed to set up the Anthropic client")?;
    let generation = runtime
        .generate(intent)
        .await
        .context("failed to generate prompts (check your key with `promptos settings set-key`)")?;

    let cost = Pricing::CLAUDE_SONNET_4.cost(
        generation.usage.input_tokens,
        generation.usage.output_tokens,
    );

    print!("{}", render_prompts(&generation.prompts, &settings, only));
    println!("{}", render_usage(generation.usage, cost));
    Ok(())
}

/// Format the prompts for the terminal, honoring the display preferences.
pub fn render_prompts(prompts: &PromptSet, settings: &Settings, only: Option<ModelKey>) -> String {
    let entries = match only {
        Some(key) => vec![(key, prompts.get(key))],
        None => prompts.ordered_from(settings.default_model),
    };

    let mut out = String::new();
    for (key, prompt) in entries {
        out.push_str(&format!(
            "=== {} ({}) · {} ===\n",
            key.display_name(),
            key.company(),
            key.format_name()
        ));
        if settings.show_format_info {
            out.push_str(key.format_description());
            out.push_str("\n\n");
        }
        out.push_str(prompt.trim_end());
        out.push_str("\n\n");
    }
    out
}

pub fn render_usage(usage: TokenUsage, estimated_cost: f64) -> String {
    format!(
        "Usage: {} input + {} output tokens, est. ${:.4}",
        usage.input_tokens, usage.output_tokens, estimated_cost
    )
}
