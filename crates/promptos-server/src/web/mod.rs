// ABOUTME: Web UI route handler serving the single-page PromptOS interface via an Askama template.
// ABOUTME: Card metadata for each target model is rendered server-side; the page script drives the JSON API.

use askama::Template;
use askama_derive_axum::IntoResponse as AskamaIntoResponse;
use axum::extract::State;
use promptos_core::ModelKey;

use crate::app_state::SharedState;

/// Display data for one result card.
#[derive(Debug, Clone)]
pub struct CardView {
    pub key: &'static str,
    pub name: &'static str,
    pub company: &'static str,
    pub format: &'static str,
    pub description: &'static str,
    pub accent: &'static str,
}

impl From<ModelKey> for CardView {
    fn from(key: ModelKey) -> Self {
        Self {
            key: key.as_str(),
            name: key.display_name(),
            company: key.company(),
            format: key.format_name(),
            description: key.format_description(),
            accent: key.accent(),
        }
    }
}

/// Index page: login form, intent form, result cards, and usage strip.
#[derive(Template, AskamaIntoResponse)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub cards: Vec<CardView>,
    pub auth_enabled: bool,
    pub provider_name: String,
    pub model_name: String,
    pub version: &'static str,
}

/// GET / - Render the main page.
pub async fn index(State(state): State<SharedState>) -> IndexTemplate {
    IndexTemplate {
        cards: ModelKey::ALL.into_iter().map(CardView::from).collect(),
        auth_enabled: state.auth.is_enabled(),
        provider_name: state.provider.display_name().to_string(),
        model_name: state.model_label(),
        version: env!("CARGO_PKG_VERSION"),
    }
}
