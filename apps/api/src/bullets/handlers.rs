//! Axum route handlers for the bullet generation endpoint.

use axum::{extract::State, http::StatusCode, Json};
use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::bullets::extract::find_json_object;
use crate::bullets::models::{
    Entry, GenerateBulletsRequest, GeneratedBullets, OrganizedEntries,
};
use crate::bullets::prompts::build_narrative_prompt;
use crate::errors::AppError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

/// Exactly one of `bullets` or `raw` is present.
#[derive(Debug, Serialize)]
pub struct GenerateBulletsResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bullets: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl GenerateBulletsResponse {
    fn bullets(bullets: Value) -> Self {
        Self {
            success: true,
            bullets: Some(bullets),
            raw: None,
        }
    }

    fn raw(text: String) -> Self {
        Self {
            success: true,
            bullets: None,
            raw: Some(text),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/generate-bullets
///
/// Groups entries by category, asks the model for narrative statements and
/// relays the JSON object found in its reply. A reply without one is passed
/// back verbatim under `raw`.
pub async fn handle_generate_bullets(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<GenerateBulletsResponse>, AppError> {
    // Parsed by hand so a malformed body is reported like any other internal failure.
    let request: GenerateBulletsRequest = serde_json::from_slice(&body)?;

    let items = match request.entries {
        Some(items) if !items.is_empty() => items,
        _ => return Err(AppError::BadRequest("No entries provided".to_string())),
    };
    let submitted = items.len();

    let mut entries = Vec::with_capacity(submitted);
    for item in items {
        entries.extend(Entry::from_item(item)?);
    }

    let organized = OrganizedEntries::from_entries(&entries);
    debug!(
        "Organized {} of {} entries: performance={} leadership={} training={} other={}",
        organized.total(),
        submitted,
        organized.performance.len(),
        organized.leadership.len(),
        organized.training.len(),
        organized.other.len()
    );

    let prompt = build_narrative_prompt(&organized);
    let text = state.llm.complete(&prompt).await?;

    match find_json_object(&text) {
        Some(json) => {
            let bullets: Value = serde_json::from_str(json)?;
            inspect_bullets(&bullets);
            Ok(Json(GenerateBulletsResponse::bullets(bullets)))
        }
        None => {
            warn!("Model reply contained no JSON object; returning raw text");
            Ok(Json(GenerateBulletsResponse::raw(text)))
        }
    }
}

/// OPTIONS /api/generate-bullets
///
/// CORS preflight. Headers come from the router layer; the body stays empty.
pub async fn handle_preflight() -> StatusCode {
    StatusCode::OK
}

/// Any other method on the bullet endpoint.
pub async fn handle_method_not_allowed() -> Result<(), AppError> {
    Err(AppError::MethodNotAllowed)
}

/// Logs how well the reply matches the requested shape. Never rejects it.
fn inspect_bullets(bullets: &Value) {
    match serde_json::from_value::<GeneratedBullets>(bullets.clone()) {
        Ok(generated) => {
            info!("Generated {} narrative statements", generated.iter().count());
            let over = generated.over_limit();
            if over > 0 {
                warn!("{over} narrative statements exceed the character limit");
            }
            debug!("{} statements report a wrong char count", generated.miscounted());
        }
        Err(e) => warn!("Model JSON does not match the bullet schema: {e}"),
    }
}
