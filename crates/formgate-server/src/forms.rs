//! Form sources for the server
//!
//! Built-in demo forms plus JSON schema files loaded from a directory.

use anyhow::{Context, Result};
use async_trait::async_trait;
use formgate::{
    Button, Condition, Field, FieldStatus, Form, FormRegistry, NumericField, Predicate,
    SelectField, SendFormResponse, SubmitContext, SubmitError, SubmitHandler, TextField,
    Validator,
};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Logs the accepted submission and echoes the validated form
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingSubmitHandler;

#[async_trait]
impl SubmitHandler for LoggingSubmitHandler {
    async fn send(
        &self,
        ctx: &SubmitContext,
        form: Form,
    ) -> std::result::Result<SendFormResponse, SubmitError> {
        info!(
            form = %form.name,
            fields = form.fields.len(),
            request_id = ctx.get_metadata("request_id").unwrap_or("-"),
            "accepted submission"
        );
        Ok(SendFormResponse::with_data(
            form,
            serde_json::json!({ "accepted": true }),
        ))
    }
}

/// Demo sign-up form
pub fn signup() -> Form {
    Form::new("signup")
        .field(
            Field::text(
                "username",
                TextField::new()
                    .min(3, "Username needs at least 3 characters")
                    .max(10, "Username can have at most 10 characters")
                    .regex("^[a-z]+$", "Username may only contain lowercase letters"),
            )
            .label("Username")
            .status(FieldStatus::Required),
        )
        .field(
            Field::numeric(
                "age",
                NumericField::new()
                    .min(1, "Age must be at least 1")
                    .max(5, "Age must be at most 5"),
            )
            .label("Years of experience")
            .required_if(Condition::any([Validator::new(
                0,
                Predicate::LengthGreaterThan(3),
            )])),
        )
        .field(
            Field::select(
                "plan",
                SelectField::new()
                    .option(1, "free")
                    .option(2, "team")
                    .option(3, "enterprise")
                    .error("Choose one of the listed plans"),
            )
            .label("Plan")
            .status(FieldStatus::Active),
        )
        .field(
            Field::text(
                "company",
                TextField::new().min(2, "Company name needs at least 2 characters"),
            )
            .label("Company")
            .status(FieldStatus::Hidden)
            .required_if(Condition::any([Validator::new(
                2,
                Predicate::NumberGreaterThan(1),
            )])),
        )
        .button(Button::new("submit").label("Sign up"))
}

/// Register the built-in forms
pub fn register_builtin(registry: &FormRegistry) -> Result<()> {
    registry
        .add(signup, LoggingSubmitHandler)
        .context("registering built-in signup form")?;
    Ok(())
}

/// Read every `*.json` schema in `dir`, sorted by file name
pub fn load_forms_dir(dir: &Path) -> Result<Vec<Form>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("reading forms directory {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    paths
        .iter()
        .map(|path| Form::load(path).with_context(|| format!("loading {}", path.display())))
        .collect()
}

/// Load and register every schema in `dir`. Returns the number registered.
pub fn register_dir(registry: &FormRegistry, dir: &Path) -> Result<usize> {
    let forms = load_forms_dir(dir)?;
    let count = forms.len();
    for form in forms {
        let name = form.name.clone();
        registry
            .add_form(form, LoggingSubmitHandler)
            .with_context(|| format!("registering form {:?} from {}", name, dir.display()))?;
    }
    info!("Loaded {} form(s) from {}", count, dir.display());
    Ok(count)
}
