//! Debounced draft autosave.
//!
//! Observes a form's value stream, waits out a quiet period, then persists a
//! projection of the latest snapshot to a draft slot. The returned guard owns
//! the channel task; dropping it releases the subscription exactly once, and
//! the form's teardown token guarantees no write lands after teardown even
//! when an emission is already inside the debounce window.

use formwork_model::{Form, TeardownToken, Value};
use formwork_store::DraftStore;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Quiet period between the last edit and a draft write.
pub const AUTOSAVE_DEBOUNCE: Duration = Duration::from_millis(500);

/// Handle to a running autosave channel.
pub struct Autosave {
    handle: JoinHandle<()>,
}

impl Autosave {
    /// Attach an autosave channel to `form`. Each debounced emission of the
    /// form's value stream is projected by `project`, serialized to JSON, and
    /// saved under `key`. Nothing is written before the first edit.
    pub fn attach<D: Serialize + 'static>(
        form: &Form,
        store: Arc<dyn DraftStore>,
        key: impl Into<String>,
        project: impl Fn(&Value) -> D + Send + Sync + 'static,
    ) -> Self {
        let subscription = form.subscribe();
        let token = form.teardown_token();
        let handle = tokio::spawn(run_channel(subscription, store, key.into(), project, token));
        Self { handle }
    }

    /// Release the subscription now. Dropping the guard does the same.
    pub fn release(self) {}
}

impl Drop for Autosave {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn run_channel<D: Serialize>(
    mut subscription: watch::Receiver<Value>,
    store: Arc<dyn DraftStore>,
    key: String,
    project: impl Fn(&Value) -> D,
    token: TeardownToken,
) {
    loop {
        // First edit of a burst. An error means the form is gone.
        if subscription.changed().await.is_err() {
            break;
        }
        // Each further edit restarts the quiet period; intermediate values
        // are discarded.
        loop {
            tokio::select! {
                _ = tokio::time::sleep(AUTOSAVE_DEBOUNCE) => break,
                changed = subscription.changed() => {
                    if changed.is_err() {
                        return;
                    }
                }
            }
        }
        if token.is_torn_down() {
            break;
        }
        let snapshot = subscription.borrow_and_update().clone();
        let draft = project(&snapshot);
        match serde_json::to_string(&draft) {
            Ok(body) => {
                if let Err(err) = store.save(&key, &body) {
                    warn!("draft autosave failed: {err}");
                } else {
                    debug!("autosaved draft under {key}");
                }
            }
            Err(err) => warn!("draft serialization failed: {err}"),
        }
    }
}
