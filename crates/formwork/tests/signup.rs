//! End-to-end behavior of the signup form: schema shape, aggregate validity,
//! role constraints, gated submission without auto-reset, and explicit reset.

use formwork::{Role, SignupForm};
use formwork_model::{FormError, Validity, Value};
use std::time::Duration;
use tokio::time::sleep;

fn fill_valid(signup: &SignupForm) {
    let form = signup.form();
    form.set_text("email", "new@user.org").unwrap();
    form.set_text("passwords.password", "abcdef").unwrap();
    form.set_text("passwords.confirmPassword", "abcdef").unwrap();
    form.set_text("firstName", "Ada").unwrap();
    form.set_text("lastName", "Lovelace").unwrap();
    form.set_text("address.street", "Main Street").unwrap();
    form.set_text("address.number", "12").unwrap();
    form.set_text("address.postalCode", "10115").unwrap();
    form.set_text("address.city", "Berlin").unwrap();
    signup.set_role(Role::Founder).unwrap();
    signup.set_source(1, true).unwrap();
    signup.set_agree(true).unwrap();
}

#[tokio::test]
async fn schema_has_the_declared_shape() {
    let signup = SignupForm::new().unwrap();
    let value = signup.form().value();

    let keys: Vec<&str> = match &value {
        Value::Map(entries) => entries.iter().map(|(key, _)| key.as_str()).collect(),
        _ => Vec::new(),
    };
    assert_eq!(
        keys,
        [
            "email",
            "passwords",
            "firstName",
            "lastName",
            "address",
            "role",
            "source",
            "agree"
        ]
    );

    assert_eq!(value.get("role").and_then(Value::as_text), Some("student"));
    assert_eq!(
        value.get("source"),
        Some(&Value::List(vec![Value::flag(false); 3]))
    );
    assert_eq!(value.get("agree").and_then(Value::as_flag), Some(false));
}

#[tokio::test(start_paused = true)]
async fn becomes_valid_once_every_required_field_is_filled() {
    let signup = SignupForm::new().unwrap();
    assert!(signup.form().is_invalid());

    fill_valid(&signup);
    // The uniqueness stub is still inside its quiet period.
    assert!(signup.form().is_pending());

    sleep(Duration::from_secs(1)).await;
    assert!(signup.form().is_valid());
}

#[tokio::test]
async fn role_only_accepts_the_closed_set() {
    let signup = SignupForm::new().unwrap();

    signup.set_role(Role::Teacher).unwrap();
    assert_eq!(
        signup.form().value_of("role").unwrap(),
        Value::text("teacher")
    );

    let err = signup.form().set_text("role", "wizard").unwrap_err();
    assert!(matches!(err, FormError::NotAnOption { value, .. } if value == "wizard"));
}

#[tokio::test]
async fn groups_aggregate_without_reexposing_child_errors() {
    let signup = SignupForm::new().unwrap();
    let form = signup.form();

    form.set_text("passwords.password", "abc").unwrap();
    assert_eq!(form.validity_of("passwords").unwrap(), Validity::Invalid);
    // The group reports only the aggregate; the specific kind lives on the
    // child.
    assert!(form.errors_of("passwords").unwrap().is_empty());
    assert!(form
        .errors_of("passwords.password")
        .unwrap()
        .contains("minlength"));
}

#[tokio::test]
async fn source_entries_are_index_addressed() {
    let signup = SignupForm::new().unwrap();

    signup.set_source(1, true).unwrap();
    assert_eq!(
        signup.form().value_of("source").unwrap(),
        Value::List(vec![Value::flag(false), Value::flag(true), Value::flag(false)])
    );

    assert!(signup.set_source(7, true).is_err());
}

#[tokio::test(start_paused = true)]
async fn submit_is_gated_and_keeps_state() {
    let signup = SignupForm::new().unwrap();
    assert!(signup.submit().is_none());

    fill_valid(&signup);
    sleep(Duration::from_secs(1)).await;

    let snapshot = signup.submit().expect("valid form submits");
    assert_eq!(
        snapshot.get("email").and_then(Value::as_text),
        Some("new@user.org")
    );

    // No auto-reset: the entered state survives submission.
    assert_eq!(
        signup.form().value_of("firstName").unwrap(),
        Value::text("Ada")
    );
}

#[tokio::test(start_paused = true)]
async fn explicit_reset_restores_the_initial_state() {
    let signup = SignupForm::new().unwrap();
    fill_valid(&signup);
    signup.form().mark_touched("").unwrap();
    sleep(Duration::from_secs(1)).await;

    signup.reset().unwrap();

    let form = signup.form();
    assert_eq!(form.value_of("email").unwrap(), Value::text(""));
    assert_eq!(form.value_of("role").unwrap(), Value::text("student"));
    assert_eq!(form.value_of("agree").unwrap(), Value::flag(false));
    assert_eq!(
        form.value_of("source").unwrap(),
        Value::List(vec![Value::flag(false); 3])
    );
    assert!(!form.is_touched("").unwrap());
    assert!(!form.is_dirty("").unwrap());
    assert!(form.is_invalid());
}
