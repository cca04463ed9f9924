//! formgate
//!
//! Server-side validation for declarative forms.
//!
//! A registered schema describes a form's fields, their constraints and the
//! cross-field conditions that decide whether each field is active,
//! required, disabled or hidden. Callers submit values aligned with that
//! schema by position; the engine answers with the schema annotated with
//! statuses, per-field errors and an overall validity flag, and forwards
//! valid forms to the form's submit handler.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use formgate::{
//!     Button, Condition, EchoSubmitHandler, Field, Form, FormEngine, FormRegistry,
//!     NumericField, Predicate, TextField, Validator,
//! };
//!
//! fn signup() -> Form {
//!     Form::new("signup")
//!         .field(Field::text(
//!             "username",
//!             TextField::new()
//!                 .min(3, "Too short")
//!                 .max(10, "Too long")
//!                 .regex("^[a-z]+$", "Lowercase letters only"),
//!         ).status(formgate::FieldStatus::Required))
//!         .field(Field::numeric("age", NumericField::new().min(1, "Too young"))
//!             .required_if(Condition::any([
//!                 Validator::new(0, Predicate::LengthGreaterThan(3)),
//!             ])))
//!         .button(Button::new("submit"))
//! }
//!
//! let registry = Arc::new(FormRegistry::new());
//! registry.add(signup, EchoSubmitHandler).unwrap();
//! let engine = FormEngine::new(registry);
//!
//! let mut submitted = engine.get_form("signup");
//! if let formgate::FieldKind::TextField(text) = &mut submitted.fields[0].kind {
//!     text.value = "ab".to_string();
//! }
//!
//! let out = engine.validate_form(&submitted);
//! assert!(!out.valid);
//! assert_eq!(out.fields[0].error, "Too short");
//! ```

// Public modules
pub mod conditions;
pub mod engine;
pub mod error;
pub mod fields;
pub mod registry;
pub mod schema;
pub mod submit;
pub mod types;

// Re-export commonly used types
pub use conditions::{evaluate, resolve_status, STATUS_PRIORITY};
pub use engine::{check_shape, validate_against, EngineConfig, FormEngine, ValidationMode};
pub use error::{FormError, Result, ShapeMismatch};
pub use fields::{check_field, merge_value, Violation, ViolationKind};
pub use registry::{FormEntry, FormRegistry, SchemaFn};
pub use schema::check_schema;
pub use submit::{
    BoxedSubmitHandler, EchoSubmitHandler, FnSubmitHandler, SendFormResponse, SubmitContext,
    SubmitError, SubmitHandler,
};
pub use types::{
    Button, ButtonStatus, Condition, Field, FieldKind, FieldStatus, Form, NumericField, Predicate,
    SelectField, SelectOption, TextField, Validator,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
