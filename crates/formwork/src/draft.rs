//! The persisted login draft.

use formwork_store::DraftStore;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Storage key of the login draft slot.
pub const SAVED_LOGIN_KEY: &str = "saved-login-form";

/// Slot layout: `{"email": string}`, unversioned. Only the email projection
/// of the form is ever persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoginDraft {
    pub email: String,
}

/// Read the saved email for a new login form. An absent slot, an unreadable
/// store, or a malformed draft all fall back to the empty default; the
/// failure is logged, never propagated.
pub fn load_saved_email(store: &dyn DraftStore) -> String {
    match store.load(SAVED_LOGIN_KEY) {
        Ok(Some(body)) => match serde_json::from_str::<LoginDraft>(&body) {
            Ok(draft) => draft.email,
            Err(err) => {
                warn!("ignoring malformed saved draft: {err}");
                String::new()
            }
        },
        Ok(None) => String::new(),
        Err(err) => {
            warn!("could not read saved draft: {err}");
            String::new()
        }
    }
}
