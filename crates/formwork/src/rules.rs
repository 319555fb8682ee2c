//! Validation rules specific to the Formwork forms.

use formwork_model::{AsyncValidator, ValidationErrors, Validator};

/// The single address the uniqueness stub treats as taken.
pub const RESERVED_EMAIL: &str = "test@example.com";

/// Login passwords must contain a literal `?`.
pub fn must_contain_question_mark() -> Validator {
    Validator::new("mustContainQuestionMark", |value| match value.as_text() {
        Some(text) if text.contains('?') => None,
        Some(_) => Some(ValidationErrors::flag("doesNotContainQuestionMark")),
        None => None,
    })
}

/// Stub uniqueness check: only [`RESERVED_EMAIL`] is taken. No lookup happens
/// anywhere; the engine still runs it on the debounced async schedule.
pub fn email_is_unique() -> AsyncValidator {
    AsyncValidator::new("emailIsUnique", |value| {
        Box::pin(async move {
            match value.as_text() {
                Some(text) if text == RESERVED_EMAIL => {
                    Some(ValidationErrors::flag("notUnique"))
                }
                _ => None,
            }
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use formwork_model::Value;

    #[test]
    fn question_mark_rule_checks_the_literal_character() {
        let rule = must_contain_question_mark();
        assert!(rule.run(&Value::text("abcdef")).unwrap().contains("doesNotContainQuestionMark"));
        assert!(rule.run(&Value::text("abcde?")).is_none());
        // The empty string has no question mark either; required() reports
        // the emptiness separately.
        assert!(rule.run(&Value::text("")).is_some());
    }

    #[tokio::test]
    async fn uniqueness_stub_rejects_only_the_reserved_literal() {
        let rule = email_is_unique();
        let taken = rule.run(Value::text(RESERVED_EMAIL)).await.unwrap();
        assert!(taken.contains("notUnique"));

        assert!(rule.run(Value::text("someone@example.com")).await.is_none());
    }
}
