//! The signup form.

use crate::rules;
use formwork_model::{
    rules as base, ArraySpec, FieldSpec, Form, FormError, FormOptions, GroupSpec, Value,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

/// The closed set of roles a signup may choose from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
    Employee,
    Founder,
    Other,
}

impl Role {
    pub const ALL: [Role; 5] = [
        Role::Student,
        Role::Teacher,
        Role::Employee,
        Role::Founder,
        Role::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Teacher => "teacher",
            Role::Employee => "employee",
            Role::Founder => "founder",
            Role::Other => "other",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when parsing a role name that is not in the closed set.
#[derive(Debug, Error)]
#[error("unknown role: {0:?}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// The signup form: email (with the uniqueness stub), a password pair, name
/// and address groups, a role choice, a multi-select source array, and an
/// agree flag. Submission is gated but never auto-resets; callers invoke
/// [`SignupForm::reset`] explicitly.
pub struct SignupForm {
    form: Form,
}

impl SignupForm {
    pub fn new() -> Result<Self, FormError> {
        Self::with_options(FormOptions::default())
    }

    pub fn with_options(options: FormOptions) -> Result<Self, FormError> {
        let spec = GroupSpec::new()
            .field(
                "email",
                FieldSpec::text("")
                    .with_validator(base::email())
                    .with_validator(base::required())
                    .with_async_validator(rules::email_is_unique()),
            )
            .group(
                "passwords",
                GroupSpec::new()
                    .field(
                        "password",
                        FieldSpec::text("")
                            .with_validator(base::required())
                            .with_validator(base::min_length(6)),
                    )
                    .field(
                        "confirmPassword",
                        FieldSpec::text("")
                            .with_validator(base::required())
                            .with_validator(base::min_length(6)),
                    ),
            )
            .field("firstName", FieldSpec::text("").with_validator(base::required()))
            .field("lastName", FieldSpec::text("").with_validator(base::required()))
            .group(
                "address",
                GroupSpec::new()
                    .field("street", FieldSpec::text("").with_validator(base::required()))
                    .field("number", FieldSpec::text("").with_validator(base::required()))
                    .field(
                        "postalCode",
                        FieldSpec::text("").with_validator(base::required()),
                    )
                    .field("city", FieldSpec::text("").with_validator(base::required())),
            )
            .field(
                "role",
                FieldSpec::choice(Role::ALL.map(Role::as_str), Role::Student.as_str())
                    .with_validator(base::required()),
            )
            .array(
                "source",
                ArraySpec::new()
                    .item(FieldSpec::flag(false))
                    .item(FieldSpec::flag(false))
                    .item(FieldSpec::flag(false)),
            )
            .field("agree", FieldSpec::flag(false));
        Ok(Self {
            form: Form::with_options(spec, options)?,
        })
    }

    /// The underlying form, for path-addressed access.
    pub fn form(&self) -> &Form {
        &self.form
    }

    pub fn set_role(&self, role: Role) -> Result<(), FormError> {
        self.form.set_text("role", role.as_str())
    }

    /// Toggle one entry of the "how did you find us" multi-select.
    pub fn set_source(&self, index: usize, checked: bool) -> Result<(), FormError> {
        self.form.set_flag(&format!("source.{index}"), checked)
    }

    pub fn set_agree(&self, agree: bool) -> Result<(), FormError> {
        self.form.set_flag("agree", agree)
    }

    /// Whether the caller should surface the error state of a field.
    pub fn show_errors(&self, path: &str) -> Result<bool, FormError> {
        self.form.show_errors(path)
    }

    /// Gated submission. The snapshot is logged and returned; the form keeps
    /// its state (reset is a separate, explicit action).
    pub fn submit(&self) -> Option<Value> {
        if !self.form.is_valid() {
            return None;
        }
        let snapshot = self.form.value();
        info!(form = %snapshot.to_json(), "signup form submitted");
        Some(snapshot)
    }

    /// Clear every field back to its initial value, along with all touched
    /// and dirty flags.
    pub fn reset(&self) -> Result<(), FormError> {
        self.form.reset()
    }

    pub fn destroy(&mut self) {
        self.form.destroy();
    }
}
