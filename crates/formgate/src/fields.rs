//! Per-field value handling
//!
//! Copies submitted values onto the schema copy of a field and checks them
//! against the field's declared constraints once its status is known.

use crate::types::{FieldKind, FieldStatus, NumericField, SelectField, TextField};
use regex::Regex;
use std::fmt;

// ============================================================================
// Violations
// ============================================================================

/// Which declared constraint a value broke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    /// Text shorter than `min` or number below `min`
    Min,
    /// Text longer than `max` or number above `max`
    Max,
    /// Text does not match `regex`
    Regex,
    /// Select index names no declared option
    UnknownOption,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Min => write!(f, "min"),
            Self::Max => write!(f, "max"),
            Self::Regex => write!(f, "regex"),
            Self::UnknownOption => write!(f, "unknown_option"),
        }
    }
}

/// A failed field check carrying the schema's error message for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub kind: ViolationKind,
    pub message: String,
}

impl Violation {
    fn new(kind: ViolationKind, message: &str) -> Self {
        Self {
            kind,
            message: message.to_string(),
        }
    }
}

// ============================================================================
// Value Merge
// ============================================================================

/// Copy the submitted value onto `target`.
///
/// Only the value (text, number or selected index) is taken from the
/// submission; constraints and options stay as declared. Returns false and
/// leaves `target` untouched when the payload kinds differ.
pub fn merge_value(target: &mut FieldKind, submitted: &FieldKind) -> bool {
    match (target, submitted) {
        (FieldKind::TextField(out), FieldKind::TextField(input)) => {
            out.value.clone_from(&input.value);
            true
        }
        (FieldKind::NumericField(out), FieldKind::NumericField(input)) => {
            out.value = input.value;
            true
        }
        (FieldKind::SelectField(out), FieldKind::SelectField(input)) => {
            out.index = input.index;
            true
        }
        _ => false,
    }
}

// ============================================================================
// Checks
// ============================================================================

/// Check a field's current value for its resolved status.
///
/// Fields that are not active or required always pass. An active (not
/// required) field with an empty/zero value also passes.
pub fn check_field(kind: &FieldKind, status: FieldStatus) -> Result<(), Violation> {
    if !status.is_checked() {
        return Ok(());
    }

    match kind {
        FieldKind::TextField(text) => check_text(text, status),
        FieldKind::NumericField(numeric) => check_numeric(numeric, status),
        FieldKind::SelectField(select) => check_select(select, status),
    }
}

fn check_text(text: &TextField, status: FieldStatus) -> Result<(), Violation> {
    if status == FieldStatus::Active && text.value.is_empty() {
        return Ok(());
    }

    // Bounds are in UTF-8 bytes
    let len = text.value.len();

    if let Some(min) = text.min {
        if len < min {
            return Err(Violation::new(ViolationKind::Min, &text.min_error));
        }
    }

    if let Some(max) = text.max {
        if len > max {
            return Err(Violation::new(ViolationKind::Max, &text.max_error));
        }
    }

    if let Some(pattern) = &text.regex {
        // A pattern that does not compile counts as a mismatch
        let matched = Regex::new(pattern)
            .map(|re| re.is_match(&text.value))
            .unwrap_or(false);
        if !matched {
            return Err(Violation::new(ViolationKind::Regex, &text.regex_error));
        }
    }

    Ok(())
}

fn check_numeric(numeric: &NumericField, status: FieldStatus) -> Result<(), Violation> {
    if status == FieldStatus::Active && numeric.value == 0 {
        return Ok(());
    }

    if let Some(min) = numeric.min {
        if numeric.value < min {
            return Err(Violation::new(ViolationKind::Min, &numeric.min_error));
        }
    }

    if let Some(max) = numeric.max {
        if numeric.value > max {
            return Err(Violation::new(ViolationKind::Max, &numeric.max_error));
        }
    }

    Ok(())
}

fn check_select(select: &SelectField, status: FieldStatus) -> Result<(), Violation> {
    if status == FieldStatus::Active && select.index == 0 {
        return Ok(());
    }

    if select.selected().is_none() {
        return Err(Violation::new(ViolationKind::UnknownOption, &select.error));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn username() -> TextField {
        TextField::new()
            .min(3, "too short")
            .max(10, "too long")
            .regex("^[a-z]+$", "lowercase only")
    }

    fn text_kind(text: TextField, value: &str) -> FieldKind {
        FieldKind::TextField(text.value(value))
    }

    #[test]
    fn test_text_violations_in_order() {
        let check = |v: &str| check_field(&text_kind(username(), v), FieldStatus::Required);

        assert_eq!(check("ab").unwrap_err().kind, ViolationKind::Min);
        assert_eq!(check("ab").unwrap_err().message, "too short");
        assert_eq!(check("abcdefghijk").unwrap_err().kind, ViolationKind::Max);
        assert_eq!(check("abcdefghijk").unwrap_err().message, "too long");
        assert_eq!(check("abcDEF").unwrap_err().kind, ViolationKind::Regex);
        assert_eq!(check("abcDEF").unwrap_err().message, "lowercase only");
        assert!(check("abcdef").is_ok());
    }

    #[test]
    fn test_text_bounds_count_bytes() {
        let short = TextField::new().min(4, "short").max(6, "long");
        // three characters, six bytes
        assert!(check_field(&text_kind(short.clone(), "äöü"), FieldStatus::Required).is_ok());
        let err = check_field(&text_kind(short, "äöüä"), FieldStatus::Required).unwrap_err();
        assert_eq!(err.kind, ViolationKind::Max);
    }

    #[test]
    fn test_text_min_checked_before_regex() {
        // "A1" breaks both min and regex; min is reported
        let result = check_field(&text_kind(username(), "A1"), FieldStatus::Required);
        assert_eq!(result.unwrap_err().kind, ViolationKind::Min);
    }

    #[test]
    fn test_text_active_empty_is_tolerated() {
        assert!(check_field(&text_kind(username(), ""), FieldStatus::Active).is_ok());

        let required = check_field(&text_kind(username(), ""), FieldStatus::Required);
        assert_eq!(required.unwrap_err().kind, ViolationKind::Min);
    }

    #[test]
    fn test_unchecked_statuses_always_pass() {
        for status in [
            FieldStatus::Unspecified,
            FieldStatus::Disabled,
            FieldStatus::Hidden,
        ] {
            assert!(check_field(&text_kind(username(), "!"), status).is_ok());
        }
    }

    #[test]
    fn test_text_without_constraints_passes() {
        let kind = text_kind(TextField::new(), "anything at all");
        assert!(check_field(&kind, FieldStatus::Required).is_ok());
    }

    #[test]
    fn test_text_invalid_pattern_reports_regex_error() {
        let kind = text_kind(TextField::new().regex("((", "bad"), "x");
        let err = check_field(&kind, FieldStatus::Required).unwrap_err();
        assert_eq!(err.kind, ViolationKind::Regex);
        assert_eq!(err.message, "bad");
    }

    #[test]
    fn test_numeric_bounds() {
        let field = NumericField::new().min(1, "low").max(5, "high");
        let check = |v: i64, s| check_field(&FieldKind::NumericField(field.clone().value(v)), s);

        assert!(check(3, FieldStatus::Required).is_ok());
        assert!(check(1, FieldStatus::Required).is_ok());
        assert!(check(5, FieldStatus::Required).is_ok());
        assert_eq!(check(0, FieldStatus::Required).unwrap_err().message, "low");
        assert_eq!(check(6, FieldStatus::Active).unwrap_err().message, "high");
        assert_eq!(check(-2, FieldStatus::Active).unwrap_err().kind, ViolationKind::Min);
        // Active with zero value is skipped
        assert!(check(0, FieldStatus::Active).is_ok());
    }

    #[test]
    fn test_select_option_lookup() {
        let field = SelectField::new()
            .option(10, "small")
            .option(20, "large")
            .error("pick one");
        let check = |i: i64, s| check_field(&FieldKind::SelectField(field.clone().index(i)), s);

        assert!(check(10, FieldStatus::Required).is_ok());
        assert!(check(20, FieldStatus::Active).is_ok());
        // Position 1 exists but key 1 does not
        let err = check(1, FieldStatus::Required).unwrap_err();
        assert_eq!(err.kind, ViolationKind::UnknownOption);
        assert_eq!(err.message, "pick one");
        assert!(check(0, FieldStatus::Active).is_ok());
        assert!(check(0, FieldStatus::Required).is_err());
    }

    #[test]
    fn test_merge_copies_only_the_value() {
        let mut target = FieldKind::TextField(username());
        let submitted = FieldKind::TextField(TextField::new().value("bob"));
        assert!(merge_value(&mut target, &submitted));

        let FieldKind::TextField(text) = &target else {
            panic!("kind changed");
        };
        assert_eq!(text.value, "bob");
        assert_eq!(text.min, Some(3));
        assert_eq!(text.regex_error, "lowercase only");
    }

    #[test]
    fn test_merge_select_keeps_declared_options() {
        let mut target = FieldKind::SelectField(SelectField::new().option(1, "a"));
        let submitted = FieldKind::SelectField(SelectField::new().index(1));
        assert!(merge_value(&mut target, &submitted));

        let FieldKind::SelectField(select) = &target else {
            panic!("kind changed");
        };
        assert_eq!(select.index, 1);
        assert_eq!(select.options.len(), 1);
    }

    #[test]
    fn test_merge_rejects_kind_mismatch() {
        let mut target = FieldKind::NumericField(NumericField::new().value(7));
        let submitted = FieldKind::TextField(TextField::new().value("7"));
        assert!(!merge_value(&mut target, &submitted));
        assert_eq!(target, FieldKind::NumericField(NumericField::new().value(7)));
    }

    #[test]
    fn test_violation_kind_display() {
        assert_eq!(ViolationKind::Min.to_string(), "min");
        assert_eq!(ViolationKind::UnknownOption.to_string(), "unknown_option");
    }
}
