//! Control-plane endpoint handlers.
//!
//! Handlers are plain functions over [`App`] returning JSON values, so they
//! can be tested without sockets. The routing glue in `web::mod` maps
//! `ApiError` to status codes.

use serde_json::{Value, json};
use thiserror::Error;

use crate::board::{PanelTemplate, find_preset, presets};
use crate::core::App;
use crate::log;

/// Errors an endpoint handler can produce.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Failed session check on `/api/verify`; carries `{"valid": false}`
    /// instead of the generic error body.
    #[error("invalid session")]
    SessionInvalid,

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> u16 {
        match self {
            Self::Unauthorized | Self::InvalidCredentials | Self::SessionInvalid => 401,
            Self::BadRequest(_) => 400,
            Self::NotFound(_) => 404,
            Self::Internal(_) => 500,
        }
    }

    /// JSON body for the error response.
    pub fn body(&self) -> Value {
        match self {
            Self::SessionInvalid => json!({ "valid": false }),
            _ => json!({ "success": false, "error": self.to_string() }),
        }
    }
}

type ApiResult = Result<Value, ApiError>;

/// Check the session token carried in the Authorization header.
fn auth(app: &App, token: Option<&str>) -> Result<(), ApiError> {
    match token {
        Some(token) if app.sessions.is_valid(token) => Ok(()),
        _ => Err(ApiError::Unauthorized),
    }
}

fn parse_body(body: &str) -> Result<Value, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::BadRequest(format!("invalid JSON: {e}")))
}

// ============================================================================
// Auth endpoints
// ============================================================================

/// POST /api/login
pub fn login(app: &App, body: &str) -> ApiResult {
    let payload = parse_body(body)?;
    let username = payload["username"].as_str().unwrap_or_default();
    let password = payload["password"].as_str().unwrap_or_default();

    if username == app.config.web.username && password == app.config.web.password {
        let token = app.sessions.create();
        log!("web"; "login: {}", username);
        Ok(json!({ "success": true, "sessionId": token }))
    } else {
        Err(ApiError::InvalidCredentials)
    }
}

/// POST /api/logout
pub fn logout(app: &App, token: Option<&str>) -> ApiResult {
    if let Some(token) = token {
        app.sessions.invalidate(token);
    }
    Ok(json!({ "success": true }))
}

/// GET /api/verify
///
/// A missing or expired session is a 401 carrying `{"valid": false}`.
pub fn verify(app: &App, token: Option<&str>) -> ApiResult {
    match token {
        Some(token) if app.sessions.is_valid(token) => Ok(json!({ "valid": true })),
        _ => Err(ApiError::SessionInvalid),
    }
}

// ============================================================================
// Config endpoints
// ============================================================================

/// GET /api/config
pub fn get_config(app: &App, token: Option<&str>) -> ApiResult {
    auth(app, token)?;
    Ok(template_json(&app.store.snapshot()))
}

/// POST /api/config
///
/// Partial update: absent fields keep their current value. Every successful
/// write triggers an immediate refresh of all displays and persists the
/// `[panel]` section.
pub fn update_config(app: &App, token: Option<&str>, body: &str) -> ApiResult {
    auth(app, token)?;
    let payload = parse_body(body)?;

    let current = app.store.snapshot();
    let mut template = current.as_ref().clone();

    if let Some(enabled) = payload.get("enabled") {
        template.enabled = enabled
            .as_bool()
            .ok_or_else(|| ApiError::BadRequest("enabled must be a boolean".into()))?;
    }
    if let Some(interval) = payload.get("updateInterval") {
        let ticks = interval
            .as_u64()
            .filter(|t| *t >= 1)
            .ok_or_else(|| ApiError::BadRequest("updateInterval must be a positive integer".into()))?;
        template.update_interval = ticks;
    }
    let frames_written = payload.get("titleFrames").is_some();
    if let Some(frames) = payload.get("titleFrames") {
        template.title_frames = string_array(frames, "titleFrames")?;
    }
    if let Some(lines) = payload.get("lines") {
        template.lines = string_array(lines, "lines")?;
    }

    apply_template(app, template, &current, frames_written)?;
    Ok(json!({ "success": true }))
}

// ============================================================================
// Preset endpoints
// ============================================================================

/// GET /api/templates
pub fn list_templates(app: &App, token: Option<&str>) -> ApiResult {
    auth(app, token)?;
    let templates: Vec<Value> = presets()
        .iter()
        .map(|preset| {
            json!({
                "id": preset.id,
                "name": preset.name,
                "description": preset.description,
                "updateInterval": preset.template.update_interval,
                "titleFrames": preset.template.title_frames,
                "lines": preset.template.lines,
            })
        })
        .collect();
    Ok(json!({ "templates": templates }))
}

/// POST /api/templates/apply
///
/// Replaces frames, lines and interval in one atomic set; the enabled flag
/// is left as it is.
pub fn apply_preset(app: &App, token: Option<&str>, body: &str) -> ApiResult {
    auth(app, token)?;
    let payload = parse_body(body)?;
    let id = payload["templateId"]
        .as_str()
        .ok_or_else(|| ApiError::BadRequest("templateId is required".into()))?;

    let preset = find_preset(id).ok_or_else(|| ApiError::NotFound(format!("unknown template: {id}")))?;

    let current = app.store.snapshot();
    let mut template = preset.template.clone();
    template.enabled = current.enabled;

    apply_template(app, template, &current, true)?;
    log!("web"; "applied preset: {}", id);
    Ok(json!({ "success": true, "template": id }))
}

// ============================================================================
// Shared mutation path
// ============================================================================

/// Publish a new template: store it, poke the scheduler, persist to disk.
///
/// `frames_written` marks writes that carried a frame list; those restart
/// the title animation from frame zero.
fn apply_template(
    app: &App,
    template: PanelTemplate,
    previous: &PanelTemplate,
    frames_written: bool,
) -> Result<(), ApiError> {
    let interval_changed = template.update_interval != previous.update_interval;
    let disabled = previous.enabled && !template.enabled;

    if frames_written {
        app.store.set(template);
    } else {
        app.store.set_keep_cursor(template);
    }

    if disabled {
        // Synchronous: displays are gone before the response goes out
        app.scheduler.stop();
    } else {
        if interval_changed {
            app.scheduler.restart(app.store.snapshot().update_interval);
        }
        app.scheduler.refresh();
    }

    app.config
        .save_with_panel(&app.store.snapshot())
        .map_err(|e| ApiError::Internal(format!("failed to persist config: {e}")))
}

fn template_json(template: &PanelTemplate) -> Value {
    json!({
        "enabled": template.enabled,
        "updateInterval": template.update_interval,
        "titleFrames": template.title_frames,
        "lines": template.lines,
    })
}

fn string_array(value: &Value, field: &str) -> Result<Vec<String>, ApiError> {
    value
        .as_array()
        .ok_or_else(|| ApiError::BadRequest(format!("{field} must be an array of strings")))?
        .iter()
        .map(|v| {
            v.as_str()
                .map(str::to_string)
                .ok_or_else(|| ApiError::BadRequest(format!("{field} must be an array of strings")))
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
