//! HTTP routes
//!
//! Thin JSON layer over [`FormEngine`]. Malformed request bodies are
//! answered like any other malformed submission: with an empty, invalid form.

use crate::error::ApiError;
use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap},
    routing::{get, post},
    Json, Router,
};
use formgate::{Form, FormEngine, SendFormResponse, SubmitContext};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use tracing::debug;

pub fn router(engine: FormEngine) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/forms", get(list_forms))
        .route("/forms/validate", post(validate_form))
        .route("/forms/send", post(send_form))
        .route("/forms/{name}", get(get_form))
        .layer(TraceLayer::new_for_http())
        .with_state(engine)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": formgate::VERSION }))
}

async fn list_forms(State(engine): State<FormEngine>) -> Json<Value> {
    Json(json!({ "forms": engine.registry().names() }))
}

async fn get_form(State(engine): State<FormEngine>, Path(name): Path<String>) -> Json<Form> {
    Json(engine.get_form(&name))
}

async fn validate_form(State(engine): State<FormEngine>, body: Bytes) -> Json<Form> {
    let Some(submitted) = parse_form(&body) else {
        return Json(Form::default());
    };
    Json(engine.validate_form(&submitted))
}

async fn send_form(
    State(engine): State<FormEngine>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<SendFormResponse>, ApiError> {
    let Some(submitted) = parse_form(&body) else {
        return Ok(Json(SendFormResponse::new(Form::default())));
    };

    let ctx = submit_context(&headers);
    let response = engine.send_form(&ctx, &submitted).await?;
    Ok(Json(response))
}

fn parse_form(body: &[u8]) -> Option<Form> {
    match serde_json::from_slice(body) {
        Ok(form) => Some(form),
        Err(e) => {
            debug!(error = %e, "unparsable form body");
            None
        }
    }
}

fn submit_context(headers: &HeaderMap) -> SubmitContext {
    let mut ctx = SubmitContext::new();
    if let Some(id) = headers.get("x-request-id").and_then(|v| v.to_str().ok()) {
        ctx.set_metadata("request_id", id);
    }
    if let Some(agent) = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
    {
        ctx.set_metadata("user_agent", agent);
    }
    ctx
}
