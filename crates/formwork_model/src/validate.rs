//! Validator types and the built-in rule set.
//!
//! A synchronous [`Validator`] is a named, pure check over a control's current
//! value, re-run eagerly on every change. An [`AsyncValidator`] produces a
//! deferred result; the form engine debounces its execution and discards
//! superseded runs (see `form`).

use crate::errors::ValidationErrors;
use crate::value::Value;
use regex::Regex;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, OnceLock};

/// Boxed future returned by an async validator.
pub type AsyncOutcome = Pin<Box<dyn Future<Output = Option<ValidationErrors>> + Send>>;

type SyncCheck = dyn Fn(&Value) -> Option<ValidationErrors> + Send + Sync;
type AsyncCheck = dyn Fn(Value) -> AsyncOutcome + Send + Sync;

/// A named synchronous validation rule.
///
/// The check must be deterministic and side-effect-free: it reads the value it
/// is given and nothing else.
#[derive(Clone)]
pub struct Validator {
    name: &'static str,
    check: Arc<SyncCheck>,
}

impl Validator {
    pub fn new(
        name: &'static str,
        check: impl Fn(&Value) -> Option<ValidationErrors> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name,
            check: Arc::new(check),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Run the check against a value.
    pub fn run(&self, value: &Value) -> Option<ValidationErrors> {
        (self.check)(value)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validator({})", self.name)
    }
}

/// A named asynchronous validation rule.
///
/// The engine owns the schedule: runs are debounced, and a result commits only
/// if no newer edit superseded it. While a run is outstanding the control
/// reports `Pending`.
#[derive(Clone)]
pub struct AsyncValidator {
    name: &'static str,
    check: Arc<AsyncCheck>,
}

impl AsyncValidator {
    pub fn new(
        name: &'static str,
        check: impl Fn(Value) -> AsyncOutcome + Send + Sync + 'static,
    ) -> Self {
        Self {
            name,
            check: Arc::new(check),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Start a check against a value. The form engine owns debouncing and
    /// supersession; calling this directly runs the check immediately.
    pub fn run(&self, value: Value) -> AsyncOutcome {
        (self.check)(value)
    }
}

impl fmt::Debug for AsyncValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AsyncValidator({})", self.name)
    }
}

/// Built-in rules shared by every form.
pub mod rules {
    use super::*;

    // Common user@host.tld shape; the full RFC address grammar is out of scope.
    const EMAIL_PATTERN: &str = r"^[^\s@]+@[^\s@]+\.[^\s@]+$";

    fn email_regex() -> &'static Regex {
        static RE: OnceLock<Regex> = OnceLock::new();
        RE.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern is valid"))
    }

    /// Fails with `required` when the value is absent: an empty text or an
    /// empty composite. Flags always carry a value and never fail.
    pub fn required() -> Validator {
        Validator::new("required", |value| {
            let missing = match value {
                Value::Text(text) => text.is_empty(),
                Value::Flag(_) => false,
                Value::List(items) => items.is_empty(),
                Value::Map(entries) => entries.is_empty(),
            };
            missing.then(|| ValidationErrors::flag("required"))
        })
    }

    /// Fails with `email` when a non-empty text is not a syntactically valid
    /// address. Empty values pass; pair with [`required`] to reject them.
    pub fn email() -> Validator {
        Validator::new("email", |value| match value.as_text() {
            Some(text) if !text.is_empty() && !email_regex().is_match(text) => {
                Some(ValidationErrors::flag("email"))
            }
            _ => None,
        })
    }

    /// Fails with `minlength` when a non-empty text is shorter than `min`
    /// characters. Metadata reports the required and actual lengths.
    pub fn min_length(min: usize) -> Validator {
        Validator::new("minlength", move |value| match value.as_text() {
            Some(text) if !text.is_empty() => {
                let actual = text.chars().count();
                (actual < min).then(|| {
                    ValidationErrors::of(
                        "minlength",
                        serde_json::json!({
                            "requiredLength": min,
                            "actualLength": actual,
                        }),
                    )
                })
            }
            _ => None,
        })
    }
}
