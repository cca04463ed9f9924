//! Cross-field conditions
//!
//! A field's runtime status comes from four condition blocks evaluated in a
//! fixed order. Each block holds validators that look at other fields'
//! submitted values; the last block that matches decides the status.

use crate::types::{
    Condition, Field, FieldKind, FieldStatus, NumericField, Predicate, SelectField, TextField,
    Validator,
};
use regex::Regex;
use tracing::warn;

/// Order in which condition blocks are applied. Later entries override
/// earlier ones.
pub const STATUS_PRIORITY: [FieldStatus; 4] = [
    FieldStatus::Active,
    FieldStatus::Required,
    FieldStatus::Disabled,
    FieldStatus::Hidden,
];

/// The condition block that assigns `status`, if the field declares one
pub fn condition_for(field: &Field, status: FieldStatus) -> Option<&Condition> {
    match status {
        FieldStatus::Active => field.active_if.as_ref(),
        FieldStatus::Required => field.required_if.as_ref(),
        FieldStatus::Disabled => field.disabled_if.as_ref(),
        FieldStatus::Hidden => field.hidden_if.as_ref(),
        FieldStatus::Unspecified => None,
    }
}

/// Wire name of the condition block that assigns `status`
pub fn condition_name(status: FieldStatus) -> &'static str {
    match status {
        FieldStatus::Active => "activeIf",
        FieldStatus::Required => "requiredIf",
        FieldStatus::Disabled => "disabledIf",
        FieldStatus::Hidden => "hiddenIf",
        FieldStatus::Unspecified => "",
    }
}

/// Resolve a field's status against the submitted values.
///
/// Starts from the declared status and lets every matching condition block
/// overwrite it in [`STATUS_PRIORITY`] order.
pub fn resolve_status(field: &Field, submitted: &[Field]) -> FieldStatus {
    STATUS_PRIORITY
        .iter()
        .fold(field.status, |status, &target| {
            match condition_for(field, target) {
                Some(condition) if evaluate(submitted, &condition.validators) => target,
                _ => status,
            }
        })
}

/// True if any validator matches its referenced field (short-circuit OR).
///
/// An empty list never matches.
pub fn evaluate(submitted: &[Field], validators: &[Validator]) -> bool {
    validators.iter().any(|v| matches_validator(submitted, v))
}

/// Apply one validator to the field it references
pub fn matches_validator(submitted: &[Field], validator: &Validator) -> bool {
    let Some(field) = submitted.get(validator.index) else {
        warn!(
            index = validator.index,
            fields = submitted.len(),
            "validator references a field outside the form"
        );
        return false;
    };

    let Some(predicate) = validator.active_predicate() else {
        return false;
    };

    match &field.kind {
        FieldKind::TextField(text) => matches_text(text, predicate),
        FieldKind::NumericField(numeric) => matches_numeric(numeric, predicate),
        FieldKind::SelectField(select) => matches_select(select, predicate),
    }
}

fn matches_text(text: &TextField, predicate: &Predicate) -> bool {
    // Length in UTF-8 bytes
    let len = text.value.len() as i64;
    match predicate {
        Predicate::TextIsEqual(expected) => text.value == *expected,
        Predicate::LengthSmallerThan(n) => len < *n,
        Predicate::LengthGreaterThan(n) => len > *n,
        Predicate::MatchRegexPattern(pattern) => pattern_matches(pattern, &text.value),
        Predicate::NumberIsEqual(_)
        | Predicate::NumberSmallerThan(_)
        | Predicate::NumberGreaterThan(_) => false,
    }
}

fn matches_numeric(numeric: &NumericField, predicate: &Predicate) -> bool {
    match predicate {
        Predicate::NumberIsEqual(n) => numeric.value == *n,
        Predicate::NumberSmallerThan(n) => numeric.value < *n,
        Predicate::NumberGreaterThan(n) => numeric.value > *n,
        Predicate::MatchRegexPattern(pattern) => {
            pattern_matches(pattern, &numeric.value.to_string())
        }
        Predicate::TextIsEqual(_)
        | Predicate::LengthSmallerThan(_)
        | Predicate::LengthGreaterThan(_) => false,
    }
}

fn matches_select(select: &SelectField, predicate: &Predicate) -> bool {
    match predicate {
        // Only asks whether a declared option is selected; the operand
        // itself is not compared.
        Predicate::TextIsEqual(_) => select.selected().is_some(),
        Predicate::NumberIsEqual(n) => select.index == *n,
        Predicate::NumberSmallerThan(n) => select.index < *n,
        Predicate::NumberGreaterThan(n) => select.index > *n,
        Predicate::MatchRegexPattern(pattern) => {
            let value = select.selected().map(|o| o.value.as_str()).unwrap_or("");
            pattern_matches(pattern, value)
        }
        Predicate::LengthSmallerThan(_) | Predicate::LengthGreaterThan(_) => false,
    }
}

/// A hit requires the pattern to compile and to match
fn pattern_matches(pattern: &str, haystack: &str) -> bool {
    match Regex::new(pattern) {
        Ok(re) => re.is_match(haystack),
        Err(err) => {
            warn!(pattern, error = %err, "condition pattern does not compile");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SelectField;

    fn text(value: &str) -> Field {
        Field::text("t", TextField::new().value(value))
    }

    fn numeric(value: i64) -> Field {
        Field::numeric("n", NumericField::new().value(value))
    }

    fn select(index: i64) -> Field {
        Field::select(
            "s",
            SelectField::new()
                .option(1, "red")
                .option(2, "green")
                .index(index),
        )
    }

    fn hit(field: Field, predicate: Predicate) -> bool {
        evaluate(&[field], &[Validator::new(0, predicate)])
    }

    #[test]
    fn test_text_predicates() {
        assert!(hit(text("yes"), Predicate::TextIsEqual("yes".into())));
        assert!(!hit(text("no"), Predicate::TextIsEqual("yes".into())));
        assert!(hit(text("ab"), Predicate::LengthSmallerThan(3)));
        assert!(!hit(text("abc"), Predicate::LengthSmallerThan(3)));
        assert!(hit(text("abcd"), Predicate::LengthGreaterThan(3)));
        assert!(!hit(text("abc"), Predicate::LengthGreaterThan(3)));
    }

    #[test]
    fn test_text_length_counts_bytes() {
        // three characters, six bytes
        assert!(hit(text("äöü"), Predicate::LengthGreaterThan(5)));
        assert!(!hit(text("äöü"), Predicate::LengthSmallerThan(6)));
    }

    #[test]
    fn test_validator_without_predicate_never_matches() {
        let bare = Validator {
            index: 0,
            predicate: None,
        };
        assert!(!evaluate(&[text("anything")], &[bare.clone()]));
        assert!(!evaluate(&[numeric(7)], &[bare.clone()]));

        // Other validators in the same block still count
        assert!(evaluate(
            &[text("yes")],
            &[bare, Validator::new(0, Predicate::TextIsEqual("yes".into()))]
        ));
    }

    #[test]
    fn test_zero_operands_never_match() {
        // Empty text equals empty operand, but the operand counts as unset
        assert!(!hit(text(""), Predicate::TextIsEqual(String::new())));
        assert!(!hit(numeric(0), Predicate::NumberIsEqual(0)));
        assert!(!hit(text("abc"), Predicate::LengthGreaterThan(0)));
        assert!(!hit(numeric(-5), Predicate::NumberSmallerThan(0)));
    }

    #[test]
    fn test_regex_hits_on_successful_match() {
        assert!(hit(text("hello"), Predicate::MatchRegexPattern("^h".into())));
        assert!(!hit(text("world"), Predicate::MatchRegexPattern("^h".into())));
        assert!(hit(numeric(42), Predicate::MatchRegexPattern(r"^\d{2}$".into())));
        assert!(hit(select(2), Predicate::MatchRegexPattern("^gr".into())));
    }

    #[test]
    fn test_regex_invalid_pattern_never_matches() {
        assert!(!hit(text("(("), Predicate::MatchRegexPattern("((".into())));
    }

    #[test]
    fn test_regex_on_unselected_option_sees_empty_string() {
        assert!(hit(select(9), Predicate::MatchRegexPattern("^$".into())));
        assert!(!hit(select(9), Predicate::MatchRegexPattern("red".into())));
    }

    #[test]
    fn test_numeric_predicates() {
        assert!(hit(numeric(5), Predicate::NumberIsEqual(5)));
        assert!(hit(numeric(4), Predicate::NumberSmallerThan(5)));
        assert!(hit(numeric(6), Predicate::NumberGreaterThan(5)));
        assert!(!hit(numeric(5), Predicate::NumberGreaterThan(5)));
    }

    #[test]
    fn test_cross_family_predicates_never_match() {
        assert!(!hit(text("5"), Predicate::NumberIsEqual(5)));
        assert!(!hit(numeric(123), Predicate::LengthGreaterThan(1)));
        assert!(!hit(select(1), Predicate::LengthSmallerThan(10)));
    }

    #[test]
    fn test_select_text_equal_only_checks_selection() {
        // Operand is ignored; any declared selection is a hit
        assert!(hit(select(1), Predicate::TextIsEqual("anything".into())));
        assert!(!hit(select(7), Predicate::TextIsEqual("red".into())));
    }

    #[test]
    fn test_select_index_predicates() {
        assert!(hit(select(2), Predicate::NumberIsEqual(2)));
        assert!(hit(select(1), Predicate::NumberSmallerThan(2)));
        assert!(hit(select(2), Predicate::NumberGreaterThan(1)));
    }

    #[test]
    fn test_any_validator_matches() {
        let fields = vec![text("abc"), numeric(10)];
        let validators = vec![
            Validator::new(0, Predicate::TextIsEqual("zzz".into())),
            Validator::new(1, Predicate::NumberGreaterThan(5)),
        ];
        assert!(evaluate(&fields, &validators));
        assert!(!evaluate(&fields, &[]));
    }

    #[test]
    fn test_out_of_range_index_is_no_match() {
        let fields = vec![text("abc")];
        assert!(!evaluate(
            &fields,
            &[Validator::new(5, Predicate::LengthGreaterThan(1))]
        ));
    }

    #[test]
    fn test_resolve_status_keeps_declared_when_nothing_matches() {
        let fields = vec![text("a")];
        let field = text("x")
            .status(FieldStatus::Active)
            .hidden_if(Condition::any([Validator::new(
                0,
                Predicate::TextIsEqual("hide".into()),
            )]));
        assert_eq!(resolve_status(&field, &fields), FieldStatus::Active);
    }

    #[test]
    fn test_resolve_status_last_match_wins() {
        let fields = vec![text("abcd")];
        let always = || Condition::any([Validator::new(0, Predicate::LengthGreaterThan(1))]);
        let field = text("x")
            .active_if(always())
            .required_if(always())
            .disabled_if(always());
        assert_eq!(resolve_status(&field, &fields), FieldStatus::Disabled);

        let field = field.hidden_if(always());
        assert_eq!(resolve_status(&field, &fields), FieldStatus::Hidden);
    }

    #[test]
    fn test_resolve_status_skips_non_matching_later_block() {
        let fields = vec![text("abcd")];
        let field = text("x")
            .required_if(Condition::any([Validator::new(
                0,
                Predicate::LengthGreaterThan(3),
            )]))
            .hidden_if(Condition::any([Validator::new(
                0,
                Predicate::TextIsEqual("hide".into()),
            )]));
        assert_eq!(resolve_status(&field, &fields), FieldStatus::Required);
    }

    #[test]
    fn test_condition_names() {
        let names: Vec<_> = STATUS_PRIORITY.iter().map(|s| condition_name(*s)).collect();
        assert_eq!(names, ["activeIf", "requiredIf", "disabledIf", "hiddenIf"]);
    }
}
