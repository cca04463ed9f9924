//! Form data model
//!
//! These shapes are shared by registered schemas and by caller submissions.
//! A submission is aligned with its schema by field position, never by name.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

// ============================================================================
// Form
// ============================================================================

/// A named form: ordered fields, ordered buttons and the validity flag of the
/// last validation pass.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Form {
    /// Registry key
    pub name: String,
    /// Fields in declaration order
    pub fields: Vec<Field>,
    /// Submit controls, gated on overall validity
    pub buttons: Vec<Button>,
    /// Result of the last validation pass (never persisted)
    pub valid: bool,
}

impl Form {
    /// Create an empty form with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Append a field
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Append a button
    pub fn button(mut self, button: Button) -> Self {
        self.buttons.push(button);
        self
    }

    /// True for the empty form returned on rejected requests
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.fields.is_empty() && self.buttons.is_empty()
    }

    /// Parse a form from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a form schema from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

// ============================================================================
// Field
// ============================================================================

/// A single form field with its runtime status and status conditions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label: String,
    /// Exactly one of the field payloads
    #[serde(flatten)]
    pub kind: FieldKind,
    #[serde(default)]
    pub status: FieldStatus,
    /// Error message of the last pass, empty when valid
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_if: Option<Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_if: Option<Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled_if: Option<Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden_if: Option<Condition>,
}

impl Field {
    /// Create a field with the given payload and no conditions
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: String::new(),
            kind,
            status: FieldStatus::Unspecified,
            error: String::new(),
            active_if: None,
            required_if: None,
            disabled_if: None,
            hidden_if: None,
        }
    }

    pub fn text(name: impl Into<String>, text: TextField) -> Self {
        Self::new(name, FieldKind::TextField(text))
    }

    pub fn numeric(name: impl Into<String>, numeric: NumericField) -> Self {
        Self::new(name, FieldKind::NumericField(numeric))
    }

    pub fn select(name: impl Into<String>, select: SelectField) -> Self {
        Self::new(name, FieldKind::SelectField(select))
    }

    /// Set the display label
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set the declared status used when no condition matches
    pub fn status(mut self, status: FieldStatus) -> Self {
        self.status = status;
        self
    }

    pub fn active_if(mut self, condition: Condition) -> Self {
        self.active_if = Some(condition);
        self
    }

    pub fn required_if(mut self, condition: Condition) -> Self {
        self.required_if = Some(condition);
        self
    }

    pub fn disabled_if(mut self, condition: Condition) -> Self {
        self.disabled_if = Some(condition);
        self
    }

    pub fn hidden_if(mut self, condition: Condition) -> Self {
        self.hidden_if = Some(condition);
        self
    }

    /// Text payload, if this is a text field
    pub fn as_text(&self) -> Option<&TextField> {
        match &self.kind {
            FieldKind::TextField(text) => Some(text),
            _ => None,
        }
    }

    /// Numeric payload, if this is a numeric field
    pub fn as_numeric(&self) -> Option<&NumericField> {
        match &self.kind {
            FieldKind::NumericField(numeric) => Some(numeric),
            _ => None,
        }
    }

    /// Select payload, if this is a select field
    pub fn as_select(&self) -> Option<&SelectField> {
        match &self.kind {
            FieldKind::SelectField(select) => Some(select),
            _ => None,
        }
    }
}

/// Field payload variants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    TextField(TextField),
    SelectField(SelectField),
    NumericField(NumericField),
}

impl FieldKind {
    /// Wire name of the payload, used in logs and mismatch reports
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::TextField(_) => "textField",
            Self::SelectField(_) => "selectField",
            Self::NumericField(_) => "numericField",
        }
    }

    /// True when both payloads are the same variant
    pub fn same_kind(&self, other: &FieldKind) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// Runtime status of a field after condition resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldStatus {
    #[default]
    Unspecified,
    Active,
    Required,
    Disabled,
    Hidden,
}

impl FieldStatus {
    /// Only active and required fields have their values checked
    pub fn is_checked(self) -> bool {
        matches!(self, Self::Active | Self::Required)
    }
}

impl fmt::Display for FieldStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unspecified => write!(f, "UNSPECIFIED"),
            Self::Active => write!(f, "ACTIVE"),
            Self::Required => write!(f, "REQUIRED"),
            Self::Disabled => write!(f, "DISABLED"),
            Self::Hidden => write!(f, "HIDDEN"),
        }
    }
}

// ============================================================================
// Field Payloads
// ============================================================================

/// Free text input
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TextField {
    pub value: String,
    /// Minimum length in UTF-8 bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<usize>,
    /// Maximum length in UTF-8 bytes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<usize>,
    /// Pattern the value must match (unanchored unless the pattern anchors)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub min_error: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub max_error: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub regex_error: String,
}

impl TextField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn min(mut self, min: usize, error: impl Into<String>) -> Self {
        self.min = Some(min);
        self.min_error = error.into();
        self
    }

    pub fn max(mut self, max: usize, error: impl Into<String>) -> Self {
        self.max = Some(max);
        self.max_error = error.into();
        self
    }

    pub fn regex(mut self, pattern: impl Into<String>, error: impl Into<String>) -> Self {
        self.regex = Some(pattern.into());
        self.regex_error = error.into();
        self
    }
}

/// Integer input with inclusive bounds
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NumericField {
    pub value: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub min_error: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub max_error: String,
}

impl NumericField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(mut self, value: i64) -> Self {
        self.value = value;
        self
    }

    pub fn min(mut self, min: i64, error: impl Into<String>) -> Self {
        self.min = Some(min);
        self.min_error = error.into();
        self
    }

    pub fn max(mut self, max: i64, error: impl Into<String>) -> Self {
        self.max = Some(max);
        self.max_error = error.into();
        self
    }
}

/// Choice among declared options.
///
/// `index` is the selected option's key. Options are found by their own
/// `index` value, not by their position in `options`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SelectField {
    pub index: i64,
    pub options: Vec<SelectOption>,
    /// Reported when `index` names no declared option
    #[serde(skip_serializing_if = "String::is_empty")]
    pub error: String,
}

impl SelectField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(mut self, index: i64) -> Self {
        self.index = index;
        self
    }

    pub fn option(mut self, index: i64, value: impl Into<String>) -> Self {
        self.options.push(SelectOption {
            index,
            value: value.into(),
        });
        self
    }

    pub fn error(mut self, error: impl Into<String>) -> Self {
        self.error = error.into();
        self
    }

    /// Look up an option by its key
    pub fn find_option(&self, index: i64) -> Option<&SelectOption> {
        self.options.iter().find(|o| o.index == index)
    }

    /// The currently selected option, if `index` names one
    pub fn selected(&self) -> Option<&SelectOption> {
        self.find_option(self.index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectOption {
    pub index: i64,
    pub value: String,
}

// ============================================================================
// Conditions
// ============================================================================

/// A status condition: matches when any of its validators matches
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Condition {
    pub validators: Vec<Validator>,
}

impl Condition {
    /// Condition over the given validators (OR semantics)
    pub fn any(validators: impl IntoIterator<Item = Validator>) -> Self {
        Self {
            validators: validators.into_iter().collect(),
        }
    }
}

/// A predicate over another field's submitted value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Validator {
    /// Zero-based position of the referenced field in the same form
    #[serde(default)]
    pub index: usize,
    /// `None` when the validator names no comparison; it never matches
    #[serde(flatten, default)]
    pub predicate: Option<Predicate>,
}

impl Validator {
    pub fn new(index: usize, predicate: Predicate) -> Self {
        Self {
            index,
            predicate: Some(predicate),
        }
    }

    /// The predicate, if one is present with a non-zero operand
    pub fn active_predicate(&self) -> Option<&Predicate> {
        self.predicate.as_ref().filter(|p| p.is_set())
    }
}

/// Comparison applied by a [`Validator`].
///
/// A zero or empty operand means "not set": such a predicate never matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Predicate {
    TextIsEqual(String),
    LengthSmallerThan(i64),
    LengthGreaterThan(i64),
    NumberIsEqual(i64),
    NumberSmallerThan(i64),
    NumberGreaterThan(i64),
    MatchRegexPattern(String),
}

impl Predicate {
    /// False for zero/empty operands
    pub fn is_set(&self) -> bool {
        match self {
            Self::TextIsEqual(s) | Self::MatchRegexPattern(s) => !s.is_empty(),
            Self::LengthSmallerThan(n)
            | Self::LengthGreaterThan(n)
            | Self::NumberIsEqual(n)
            | Self::NumberSmallerThan(n)
            | Self::NumberGreaterThan(n) => *n != 0,
        }
    }
}

// ============================================================================
// Buttons
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Button {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub label: String,
    pub status: ButtonStatus,
}

impl Button {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ButtonStatus {
    #[default]
    Inactive,
    Active,
}
