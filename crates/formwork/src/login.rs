//! The login form.

use crate::autosave::Autosave;
use crate::draft::{self, LoginDraft};
use crate::rules;
use formwork_model::{
    rules as base, FieldSpec, Form, FormError, FormOptions, GroupSpec, Value,
};
use formwork_store::DraftStore;
use std::sync::Arc;
use tracing::{info, warn};

/// The login form: an email with the stubbed uniqueness check and a password
/// that must carry a question mark. Edits autosave an email-only draft, and a
/// saved draft supplies the email's initial value on construction.
pub struct LoginForm {
    form: Form,
    autosave: Option<Autosave>,
}

impl LoginForm {
    pub fn new(store: Arc<dyn DraftStore>) -> Result<Self, FormError> {
        Self::with_options(store, FormOptions::default())
    }

    pub fn with_options(
        store: Arc<dyn DraftStore>,
        options: FormOptions,
    ) -> Result<Self, FormError> {
        let initial_email = draft::load_saved_email(store.as_ref());
        let spec = GroupSpec::new()
            .field(
                "email",
                FieldSpec::text(initial_email)
                    .with_validator(base::email())
                    .with_validator(base::required())
                    .with_async_validator(rules::email_is_unique()),
            )
            .field(
                "password",
                FieldSpec::text("")
                    .with_validator(base::required())
                    .with_validator(base::min_length(6))
                    .with_validator(rules::must_contain_question_mark()),
            );
        let form = Form::with_options(spec, options)?;
        // The channel observes the whole form's stream but persists only the
        // email projection; the password never reaches the slot.
        let autosave = Autosave::attach(&form, store, draft::SAVED_LOGIN_KEY, |snapshot| {
            LoginDraft {
                email: snapshot
                    .get("email")
                    .and_then(Value::as_text)
                    .unwrap_or_default()
                    .to_string(),
            }
        });
        Ok(Self {
            form,
            autosave: Some(autosave),
        })
    }

    /// The underlying form, for path-addressed access.
    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn set_email(&self, email: impl Into<String>) -> Result<(), FormError> {
        self.form.set_text("email", email)
    }

    pub fn set_password(&self, password: impl Into<String>) -> Result<(), FormError> {
        self.form.set_text("password", password)
    }

    pub fn touch_email(&self) -> Result<(), FormError> {
        self.form.mark_touched("email")
    }

    pub fn touch_password(&self) -> Result<(), FormError> {
        self.form.mark_touched("password")
    }

    /// Whether the caller should surface the email error state.
    pub fn email_is_invalid(&self) -> bool {
        self.form
            .show_errors("email")
            .expect("login schema has an email control")
    }

    /// Whether the caller should surface the password error state.
    pub fn password_is_invalid(&self) -> bool {
        self.form
            .show_errors("password")
            .expect("login schema has a password control")
    }

    /// Gated submission. A form that is not fully valid (invalid or still
    /// pending) is a no-op. On success the snapshot is logged together with
    /// the entered credentials, the form resets to its initial state, and the
    /// snapshot is returned.
    pub fn submit(&self) -> Option<Value> {
        if !self.form.is_valid() {
            return None;
        }
        let snapshot = self.form.value();
        let email = snapshot
            .get("email")
            .and_then(Value::as_text)
            .unwrap_or_default()
            .to_string();
        let password = snapshot
            .get("password")
            .and_then(Value::as_text)
            .unwrap_or_default()
            .to_string();
        info!(form = %snapshot.to_json(), "login form submitted");
        info!(%email, %password, "entered credentials");
        if let Err(err) = self.form.reset() {
            warn!("post-submit reset failed: {err}");
        }
        Some(snapshot)
    }

    /// Tear down the form and release the autosave subscription. No draft
    /// write can occur afterwards. Idempotent.
    pub fn destroy(&mut self) {
        self.form.destroy();
        self.autosave.take();
    }
}
