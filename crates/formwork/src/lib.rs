//! The Formwork forms: login and signup models over `formwork_model`.
//!
//! Both forms are pure models: the rendering layer subscribes to their state
//! and forwards input events back in; the submission handlers log a snapshot
//! to the diagnostic channel. The login form additionally keeps an email-only
//! draft in a [`formwork_store::DraftStore`] slot via the debounced
//! [`autosave`] channel.
//!
//! # Modules
//!
//! - [`login`]: the login form (autosaving draft, reset-on-submit)
//! - [`signup`]: the signup form (explicit reset)
//! - [`rules`]: form-specific validators (question-mark rule, uniqueness stub)
//! - [`draft`]: the persisted `{"email": ...}` draft slot
//! - [`autosave`]: the debounced draft-writing side-channel

pub mod autosave;
pub mod draft;
pub mod login;
pub mod rules;
pub mod signup;

pub use autosave::{Autosave, AUTOSAVE_DEBOUNCE};
pub use draft::{load_saved_email, LoginDraft, SAVED_LOGIN_KEY};
pub use login::LoginForm;
pub use rules::{email_is_unique, must_contain_question_mark, RESERVED_EMAIL};
pub use signup::{Role, SignupForm, UnknownRole};
