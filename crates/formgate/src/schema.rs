//! Structural checks for form schemas
//!
//! Run once when a schema is registered so that validation passes can rely
//! on validator indices being in range and patterns compiling.

use crate::conditions::{condition_for, condition_name, STATUS_PRIORITY};
use crate::error::{FormError, Result};
use crate::types::{Field, FieldKind, Form, Predicate};
use regex::Regex;
use tracing::warn;

/// Check a schema before it is registered
pub fn check_schema(form: &Form) -> Result<()> {
    if form.name.trim().is_empty() {
        return Err(FormError::InvalidSchema("form name is empty".to_string()));
    }

    for (position, field) in form.fields.iter().enumerate() {
        check_field(form, position, field)?;
    }

    Ok(())
}

fn check_field(form: &Form, position: usize, field: &Field) -> Result<()> {
    match &field.kind {
        FieldKind::TextField(text) => {
            if let Some(pattern) = &text.regex {
                compile(pattern).map_err(|e| {
                    invalid(form, position, field, format!("regex {:?}: {}", pattern, e))
                })?;
            }
            if let (Some(min), Some(max)) = (text.min, text.max) {
                if min > max {
                    warn!(form = %form.name, field = position, min, max, "text bounds can never be met");
                }
            }
        }
        FieldKind::NumericField(numeric) => {
            if let (Some(min), Some(max)) = (numeric.min, numeric.max) {
                if min > max {
                    warn!(form = %form.name, field = position, min, max, "numeric bounds can never be met");
                }
            }
        }
        FieldKind::SelectField(_) => {}
    }

    for status in STATUS_PRIORITY {
        let Some(condition) = condition_for(field, status) else {
            continue;
        };

        for (n, validator) in condition.validators.iter().enumerate() {
            if validator.index >= form.fields.len() {
                return Err(invalid(
                    form,
                    position,
                    field,
                    format!(
                        "{} validator #{} references field {}, form has {} fields",
                        condition_name(status),
                        n,
                        validator.index,
                        form.fields.len()
                    ),
                ));
            }

            if let Some(Predicate::MatchRegexPattern(pattern)) = &validator.predicate {
                if !pattern.is_empty() {
                    compile(pattern).map_err(|e| {
                        invalid(
                            form,
                            position,
                            field,
                            format!(
                                "{} validator #{} pattern {:?}: {}",
                                condition_name(status),
                                n,
                                pattern,
                                e
                            ),
                        )
                    })?;
                }
            }
        }
    }

    Ok(())
}

fn compile(pattern: &str) -> std::result::Result<Regex, regex::Error> {
    Regex::new(pattern)
}

fn invalid(form: &Form, position: usize, field: &Field, detail: String) -> FormError {
    FormError::InvalidSchema(format!(
        "form {:?} field {} ({:?}): {}",
        form.name, position, field.name, detail
    ))
}
