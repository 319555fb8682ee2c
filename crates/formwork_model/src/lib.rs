//! Reactive validated-form model.
//!
//! A form is a tree of fields, groups, and arrays built from a declarative
//! schema. Synchronous validators re-run eagerly on every edit; asynchronous
//! validators run on a debounced schedule with superseded results discarded.
//! Derived state (validity, touched, dirty, the combined "show errors" flag)
//! is recomputed from current state on every query, and a watch channel
//! publishes value snapshots in edit order for side-channels such as autosave.
//!
//! # Modules
//!
//! - [`value`]: typed values and snapshots
//! - [`errors`]: validation error sets and structural form errors
//! - [`validate`]: validator types and built-in rules
//! - [`schema`]: declarative schema builders
//! - [`control`]: the live control tree
//! - [`form`]: the form engine (mutation, validation scheduling, streams)
//! - [`cancel`]: the shared teardown signal

pub mod cancel;
pub mod control;
pub mod errors;
pub mod form;
pub mod schema;
pub mod validate;
pub mod value;

pub use cancel::TeardownToken;
pub use control::{Control, FieldKind, Validity};
pub use errors::{FormError, ValidationErrors};
pub use form::{Form, FormOptions, DEFAULT_ASYNC_DEBOUNCE};
pub use schema::{ArraySpec, FieldSpec, GroupSpec, NodeSpec};
pub use validate::{rules, AsyncOutcome, AsyncValidator, Validator};
pub use value::Value;
