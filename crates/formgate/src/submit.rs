//! Submit handlers
//!
//! A submit handler receives a form only after it validated cleanly. Its
//! response and its error are handed back to the caller as they are.
//!
//! # Example
//!
//! ```rust,ignore
//! use formgate::submit::{FnSubmitHandler, SendFormResponse};
//!
//! let handler = FnSubmitHandler::new(|_ctx, form| {
//!     Ok(SendFormResponse::with_data(form, serde_json::json!({"id": 7})))
//! });
//! ```

use crate::types::Form;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

// ============================================================================
// Submit Context
// ============================================================================

/// Request metadata passed through to submit handlers
#[derive(Debug, Clone, Default)]
pub struct SubmitContext {
    metadata: HashMap<String, String>,
}

impl SubmitContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`SubmitContext::set_metadata`]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_metadata(key, value);
        self
    }

    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.metadata.insert(key.into(), value.into());
    }

    pub fn get_metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(|s| s.as_str())
    }

    pub fn metadata(&self) -> &HashMap<String, String> {
        &self.metadata
    }
}

// ============================================================================
// Response and Error
// ============================================================================

/// Result of a send request
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendFormResponse {
    /// The validated (or rejected) form
    #[serde(default)]
    pub form: Form,
    /// Handler-specific payload
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub data: serde_json::Value,
}

impl SendFormResponse {
    pub fn new(form: Form) -> Self {
        Self {
            form,
            data: serde_json::Value::Null,
        }
    }

    pub fn with_data(form: Form, data: serde_json::Value) -> Self {
        Self { form, data }
    }
}

/// Failure reported by a submit handler
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// The receiving side refused the submission
    #[error("Submission rejected: {0}")]
    Rejected(String),

    /// The receiving side could not be reached
    #[error("Submit target unavailable: {0}")]
    Unavailable(String),

    #[error("Submit failed: {0}")]
    Internal(String),
}

// ============================================================================
// Submit Handler Trait
// ============================================================================

/// Side effect run for a fully valid form
#[async_trait]
pub trait SubmitHandler: Send + Sync {
    async fn send(&self, ctx: &SubmitContext, form: Form)
        -> Result<SendFormResponse, SubmitError>;
}

/// Type alias for shared submit handlers
pub type BoxedSubmitHandler = Arc<dyn SubmitHandler>;

/// Adapter for synchronous closures
pub struct FnSubmitHandler<F> {
    func: F,
}

impl<F> FnSubmitHandler<F>
where
    F: Fn(&SubmitContext, Form) -> Result<SendFormResponse, SubmitError> + Send + Sync,
{
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

#[async_trait]
impl<F> SubmitHandler for FnSubmitHandler<F>
where
    F: Fn(&SubmitContext, Form) -> Result<SendFormResponse, SubmitError> + Send + Sync,
{
    async fn send(
        &self,
        ctx: &SubmitContext,
        form: Form,
    ) -> Result<SendFormResponse, SubmitError> {
        (self.func)(ctx, form)
    }
}

/// Returns the validated form unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoSubmitHandler;

#[async_trait]
impl SubmitHandler for EchoSubmitHandler {
    async fn send(
        &self,
        _ctx: &SubmitContext,
        form: Form,
    ) -> Result<SendFormResponse, SubmitError> {
        Ok(SendFormResponse::new(form))
    }
}
