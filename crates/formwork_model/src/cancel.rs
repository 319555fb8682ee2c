use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Teardown signal shared by a form and its side-channels.
///
/// Uses an AtomicBool internally. Clone is cheap and shares state. Once
/// tripped it never resets; consumers check it before committing results or
/// writing to storage.
#[derive(Debug, Clone, Default)]
pub struct TeardownToken {
    torn_down: Arc<AtomicBool>,
}

impl TeardownToken {
    /// Create a new token (not torn down).
    pub fn new() -> Self {
        Self {
            torn_down: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Check whether teardown has been signalled.
    pub fn is_torn_down(&self) -> bool {
        self.torn_down.load(Ordering::SeqCst)
    }

    /// Signal teardown.
    pub fn tear_down(&self) {
        self.torn_down.store(true, Ordering::SeqCst);
    }
}
