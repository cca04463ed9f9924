//! Form validation engine
//!
//! One validation pass takes a fresh schema copy, merges the submitted
//! values into it, resolves every field's status from its conditions,
//! checks the values and finally gates the buttons on overall validity.
//!
//! Malformed requests (unknown form, wrong field count, wrong field kind)
//! are answered with an empty, invalid form instead of an error.

use crate::conditions::resolve_status;
use crate::error::ShapeMismatch;
use crate::fields::{check_field, merge_value};
use crate::registry::{FormEntry, FormRegistry};
use crate::submit::{SendFormResponse, SubmitContext, SubmitError};
use crate::types::{ButtonStatus, Form};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

// ============================================================================
// Configuration
// ============================================================================

/// How far value checks go once a field has failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Check every field so each applicable error is reported
    #[default]
    CollectAll,
    /// Stop checking values after the first failing field.
    /// Statuses are still resolved for every field.
    FailFast,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EngineConfig {
    pub mode: ValidationMode,
}

impl EngineConfig {
    pub fn with_mode(mut self, mode: ValidationMode) -> Self {
        self.mode = mode;
        self
    }
}

// ============================================================================
// Validation Pass
// ============================================================================

/// Validate `submitted` against a fresh `schema`.
///
/// Returns the annotated schema copy: submitted values merged in, statuses
/// resolved, errors populated, `valid` set and buttons gated.
pub fn validate_against(
    schema: Form,
    submitted: &Form,
    mode: ValidationMode,
) -> Result<Form, ShapeMismatch> {
    check_shape(&schema, submitted)?;

    let mut out = schema;
    for (field, input) in out.fields.iter_mut().zip(&submitted.fields) {
        merge_value(&mut field.kind, &input.kind);
    }

    // Conditions read the submitted values as merged, never the statuses or
    // errors written during this pass.
    let lookup = out.fields.clone();

    let mut valid = true;
    for (position, field) in out.fields.iter_mut().enumerate() {
        let status = resolve_status(field, &lookup);
        field.status = status;
        field.error.clear();

        if mode == ValidationMode::FailFast && !valid {
            continue;
        }

        if let Err(violation) = check_field(&field.kind, status) {
            debug!(
                form = %out.name,
                field = position,
                %status,
                violation = %violation.kind,
                "field failed validation"
            );
            field.error = violation.message;
            valid = false;
        }
    }

    let button_status = if valid {
        ButtonStatus::Active
    } else {
        ButtonStatus::Inactive
    };
    for button in &mut out.buttons {
        button.status = button_status;
    }

    out.valid = valid;
    Ok(out)
}

/// Check that a submission lines up with its schema field by field
pub fn check_shape(schema: &Form, submitted: &Form) -> Result<(), ShapeMismatch> {
    if schema.fields.len() != submitted.fields.len() {
        return Err(ShapeMismatch::FieldCount {
            expected: schema.fields.len(),
            actual: submitted.fields.len(),
        });
    }

    for (index, (declared, input)) in schema.fields.iter().zip(&submitted.fields).enumerate() {
        if !declared.kind.same_kind(&input.kind) {
            return Err(ShapeMismatch::FieldKind {
                index,
                expected: declared.kind.kind_name(),
                actual: input.kind.kind_name(),
            });
        }
    }

    Ok(())
}

// ============================================================================
// Engine
// ============================================================================

/// Entry point for the three form operations, backed by a shared registry
#[derive(Debug, Clone)]
pub struct FormEngine {
    registry: Arc<FormRegistry>,
    config: EngineConfig,
}

impl FormEngine {
    pub fn new(registry: Arc<FormRegistry>) -> Self {
        Self::with_config(registry, EngineConfig::default())
    }

    pub fn with_config(registry: Arc<FormRegistry>, config: EngineConfig) -> Self {
        Self { registry, config }
    }

    pub fn registry(&self) -> &Arc<FormRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Fresh schema for `name`, or an empty form if it is not registered
    pub fn get_form(&self, name: &str) -> Form {
        self.registry.schema(name).unwrap_or_default()
    }

    /// Validate a submission against its registered schema
    pub fn validate_form(&self, submitted: &Form) -> Form {
        let entry = self.registry.entry(&submitted.name);
        self.validate_with(entry.as_deref(), submitted)
    }

    /// Validate, then hand a valid form to its submit handler.
    ///
    /// An invalid form is returned without calling the handler. The
    /// handler's response or error is returned unchanged.
    pub async fn send_form(
        &self,
        ctx: &SubmitContext,
        submitted: &Form,
    ) -> Result<SendFormResponse, SubmitError> {
        let Some(entry) = self.registry.entry(&submitted.name) else {
            debug!(form = %submitted.name, "send for unknown form");
            return Ok(SendFormResponse::new(Form::default()));
        };

        let form = self.validate_with(Some(entry.as_ref()), submitted);
        if !form.valid {
            debug!(form = %form.name, "not sending invalid form");
            return Ok(SendFormResponse::new(form));
        }

        info!(form = %form.name, "dispatching validated form");
        entry.submit_handler().send(ctx, form).await
    }

    fn validate_with(&self, entry: Option<&FormEntry>, submitted: &Form) -> Form {
        let result = match entry {
            Some(entry) => validate_against(entry.schema(), submitted, self.config.mode),
            None => Err(ShapeMismatch::UnknownForm(submitted.name.clone())),
        };

        match result {
            Ok(form) => {
                debug!(form = %form.name, valid = form.valid, "validated form");
                form
            }
            Err(reason) => {
                debug!(form = %submitted.name, %reason, "rejected submission");
                Form::default()
            }
        }
    }
}
