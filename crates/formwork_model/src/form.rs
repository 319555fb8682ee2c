//! The live form: path-addressed mutation, eager sync validation, debounced
//! async validation, and the value-change stream.
//!
//! # Execution model
//!
//! Edits are synchronous: `set_value` updates the field, re-runs the sync
//! validators along the edited path, and publishes the new snapshot to the
//! watch channel before returning, so subscribers observe snapshots in edit
//! order. Async validators run on a debounced schedule: every edit bumps the
//! node's generation counter, aborts any still-scheduled run for that node,
//! and schedules a fresh one; a run commits its result only if its generation
//! is still current when it completes. Superseded results are dropped, so the
//! applied result is always last-write-wins by issuance order.
//!
//! Destroying the form trips the shared [`TeardownToken`] and aborts every
//! scheduled run; edits after destroy are rejected.

use crate::cancel::TeardownToken;
use crate::control::{join_path, Control, FieldKind, Validity};
use crate::errors::{FormError, ValidationErrors};
use crate::schema::{GroupSpec, NodeSpec};
use crate::validate::AsyncValidator;
use crate::value::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

/// Default quiet period before an async validator runs.
pub const DEFAULT_ASYNC_DEBOUNCE: Duration = Duration::from_millis(250);

/// Tunables for a form instance.
#[derive(Debug, Clone)]
pub struct FormOptions {
    /// Quiet period between the last edit of a node and its async validation.
    pub async_debounce: Duration,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            async_debounce: DEFAULT_ASYNC_DEBOUNCE,
        }
    }
}

/// A scheduled async validation run for one node.
struct AsyncJob {
    path: String,
    generation: u64,
    value: Value,
    validators: Vec<AsyncValidator>,
}

/// A live, validated form built from a [`GroupSpec`].
///
/// Must be created and used within a Tokio runtime; async validation runs are
/// scheduled on it.
pub struct Form {
    state: Arc<Mutex<Control>>,
    changes: watch::Sender<Value>,
    tasks: Mutex<HashMap<String, JoinHandle<()>>>,
    token: TeardownToken,
    options: FormOptions,
}

impl Form {
    /// Build a form with default options.
    pub fn new(spec: GroupSpec) -> Result<Self, FormError> {
        Self::with_options(spec, FormOptions::default())
    }

    /// Build a form, run the initial sync validation pass, and schedule the
    /// initial async validation cycle.
    pub fn with_options(spec: GroupSpec, options: FormOptions) -> Result<Self, FormError> {
        let mut root = Control::Group(spec.build()?);
        revalidate_tree(&mut root);

        let mut jobs = Vec::new();
        collect_async_jobs(&mut root, "", &mut jobs);

        let snapshot = root.value();
        let (changes, _) = watch::channel(snapshot);
        let form = Self {
            state: Arc::new(Mutex::new(root)),
            changes,
            tasks: Mutex::new(HashMap::new()),
            token: TeardownToken::new(),
            options,
        };
        for job in jobs {
            form.spawn_async_job(job);
        }
        Ok(form)
    }

    /// Write a field's value. Sync validity along the edited path is current
    /// when this returns; async validation is (re)scheduled.
    pub fn set_value(&self, path: &str, value: Value) -> Result<(), FormError> {
        if self.token.is_torn_down() {
            return Err(FormError::Destroyed);
        }
        let (snapshot, jobs) = {
            let mut root = self.lock_state();
            let node = root
                .find_mut(path)
                .ok_or_else(|| FormError::UnknownPath(path.to_string()))?;
            let Control::Field(field) = node else {
                return Err(FormError::NotAField(path.to_string()));
            };
            if !field.kind.accepts(&value) {
                return Err(match (&field.kind, &value) {
                    (FieldKind::Choice(_), Value::Text(text)) => FormError::NotAnOption {
                        path: path.to_string(),
                        value: text.clone(),
                    },
                    _ => FormError::TypeMismatch {
                        path: path.to_string(),
                        expected: field.kind.expected(),
                    },
                });
            }
            field.value = value;
            field.dirty = true;

            revalidate_along(&mut root, path);
            let jobs = begin_async_cycles_along(&mut root, path);
            (root.value(), jobs)
        };
        self.changes.send_replace(snapshot);
        for job in jobs {
            self.spawn_async_job(job);
        }
        Ok(())
    }

    /// Convenience text write.
    pub fn set_text(&self, path: &str, text: impl Into<String>) -> Result<(), FormError> {
        self.set_value(path, Value::Text(text.into()))
    }

    /// Convenience flag write.
    pub fn set_flag(&self, path: &str, flag: bool) -> Result<(), FormError> {
        self.set_value(path, Value::Flag(flag))
    }

    /// Mark a field touched (the caller forwards focus-and-blur here).
    /// Marking a group or array touches every field below it.
    pub fn mark_touched(&self, path: &str) -> Result<(), FormError> {
        if self.token.is_torn_down() {
            return Err(FormError::Destroyed);
        }
        let mut root = self.lock_state();
        root.find_mut(path)
            .ok_or_else(|| FormError::UnknownPath(path.to_string()))?
            .mark_touched();
        Ok(())
    }

    /// Atomically restore every field to its initial value, clear touched and
    /// dirty everywhere, and start a fresh validation cycle.
    pub fn reset(&self) -> Result<(), FormError> {
        if self.token.is_torn_down() {
            return Err(FormError::Destroyed);
        }
        let (snapshot, jobs) = {
            let mut root = self.lock_state();
            root.reset();
            revalidate_tree(&mut root);
            let mut jobs = Vec::new();
            collect_async_jobs(&mut root, "", &mut jobs);
            (root.value(), jobs)
        };
        // Anything scheduled against pre-reset values is obsolete.
        {
            let mut tasks = self.lock_tasks();
            for (_, handle) in tasks.drain() {
                handle.abort();
            }
        }
        self.changes.send_replace(snapshot);
        for job in jobs {
            self.spawn_async_job(job);
        }
        debug!("form reset to initial values");
        Ok(())
    }

    /// Append an item to an array control.
    pub fn push_item(&self, path: &str, spec: impl Into<NodeSpec>) -> Result<(), FormError> {
        if self.token.is_torn_down() {
            return Err(FormError::Destroyed);
        }
        let (snapshot, jobs) = {
            let mut root = self.lock_state();
            let new_index = {
                let node = root
                    .find_mut(path)
                    .ok_or_else(|| FormError::UnknownPath(path.to_string()))?;
                let Control::Array(array) = node else {
                    return Err(FormError::NotAnArray(path.to_string()));
                };
                let mut item = spec.into().build_named(&array.items.len().to_string())?;
                revalidate_tree(&mut item);
                array.items.push(item);
                array.items.len() - 1
            };
            revalidate_along(&mut root, path);
            let mut jobs = begin_async_cycles_along(&mut root, path);
            let item_path = join_path(path, &new_index.to_string());
            if let Some(item) = root.find_mut(&item_path) {
                collect_async_jobs(item, &item_path, &mut jobs);
            }
            (root.value(), jobs)
        };
        self.changes.send_replace(snapshot);
        for job in jobs {
            self.spawn_async_job(job);
        }
        Ok(())
    }

    /// Remove an item from an array control by position.
    pub fn remove_item(&self, path: &str, index: usize) -> Result<(), FormError> {
        if self.token.is_torn_down() {
            return Err(FormError::Destroyed);
        }
        let (snapshot, jobs) = {
            let mut root = self.lock_state();
            {
                let node = root
                    .find_mut(path)
                    .ok_or_else(|| FormError::UnknownPath(path.to_string()))?;
                let Control::Array(array) = node else {
                    return Err(FormError::NotAnArray(path.to_string()));
                };
                if index >= array.items.len() {
                    return Err(FormError::IndexOutOfRange {
                        path: path.to_string(),
                        index,
                        len: array.items.len(),
                    });
                }
                array.items.remove(index);
            }
            revalidate_along(&mut root, path);
            (root.value(), begin_async_cycles_along(&mut root, path))
        };
        // Items after the removed one shift position; runs keyed by the old
        // item paths must not commit into the wrong node.
        {
            let prefix = format!("{path}.");
            let mut tasks = self.lock_tasks();
            let doomed: Vec<String> = tasks
                .keys()
                .filter(|key| key.starts_with(&prefix))
                .cloned()
                .collect();
            for key in doomed {
                if let Some(handle) = tasks.remove(&key) {
                    handle.abort();
                }
            }
        }
        self.changes.send_replace(snapshot);
        for job in jobs {
            self.spawn_async_job(job);
        }
        Ok(())
    }

    /// Snapshot of the whole form's current value.
    pub fn value(&self) -> Value {
        self.lock_state().value()
    }

    /// Overall validity of the form.
    pub fn validity(&self) -> Validity {
        self.lock_state().validity()
    }

    pub fn is_valid(&self) -> bool {
        self.validity() == Validity::Valid
    }

    pub fn is_invalid(&self) -> bool {
        self.validity() == Validity::Invalid
    }

    pub fn is_pending(&self) -> bool {
        self.validity() == Validity::Pending
    }

    /// Current value of one node.
    pub fn value_of(&self, path: &str) -> Result<Value, FormError> {
        self.with_node(path, Control::value)
    }

    /// Aggregate validity of one node.
    pub fn validity_of(&self, path: &str) -> Result<Validity, FormError> {
        self.with_node(path, Control::validity)
    }

    /// A node's own error set (sync plus resolved async). A composite never
    /// re-exposes its descendants' error kinds; descend by path for those.
    pub fn errors_of(&self, path: &str) -> Result<ValidationErrors, FormError> {
        self.with_node(path, Control::errors)
    }

    pub fn is_touched(&self, path: &str) -> Result<bool, FormError> {
        self.with_node(path, Control::touched)
    }

    pub fn is_dirty(&self, path: &str) -> Result<bool, FormError> {
        self.with_node(path, Control::dirty)
    }

    /// The UI-facing error flag: invalid, touched, and dirty all at once.
    pub fn show_errors(&self, path: &str) -> Result<bool, FormError> {
        self.with_node(path, |node| {
            node.validity() == Validity::Invalid && node.touched() && node.dirty()
        })
    }

    /// Subscribe to the value-change stream. The receiver starts with the
    /// current snapshot already seen; each edit publishes the next one.
    pub fn subscribe(&self) -> watch::Receiver<Value> {
        self.changes.subscribe()
    }

    /// The teardown signal shared with side-channels such as autosave.
    pub fn teardown_token(&self) -> TeardownToken {
        self.token.clone()
    }

    /// Tear the form down: cancel every scheduled async validation run and
    /// reject any further mutation. Idempotent.
    pub fn destroy(&self) {
        self.token.tear_down();
        let mut tasks = self.lock_tasks();
        for (_, handle) in tasks.drain() {
            handle.abort();
        }
        debug!("form destroyed, pending validation cancelled");
    }

    pub fn is_destroyed(&self) -> bool {
        self.token.is_torn_down()
    }

    fn with_node<T>(&self, path: &str, read: impl FnOnce(&Control) -> T) -> Result<T, FormError> {
        let root = self.lock_state();
        let node = root
            .find(path)
            .ok_or_else(|| FormError::UnknownPath(path.to_string()))?;
        Ok(read(node))
    }

    fn spawn_async_job(&self, job: AsyncJob) {
        let state = Arc::clone(&self.state);
        let token = self.token.clone();
        let debounce = self.options.async_debounce;
        let key = job.path.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            let mut resolved = ValidationErrors::new();
            for validator in &job.validators {
                if let Some(errors) = validator.run(job.value.clone()).await {
                    resolved.merge(errors);
                }
            }
            if token.is_torn_down() {
                return;
            }
            // A poisoned lock only means a panicked validator; the tree is
            // still usable.
            let mut root = match state.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            if let Some(node) = root.find_mut(&job.path) {
                let checks = node.checks_mut();
                if checks.generation == job.generation {
                    checks.async_pending = false;
                    checks.async_errors = resolved;
                }
            }
        });
        let mut tasks = self.lock_tasks();
        if let Some(superseded) = tasks.insert(key, handle) {
            superseded.abort();
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, Control> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn lock_tasks(&self) -> MutexGuard<'_, HashMap<String, JoinHandle<()>>> {
        match self.tasks.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Drop for Form {
    fn drop(&mut self) {
        if !self.token.is_torn_down() {
            self.destroy();
        }
    }
}

/// Recompute sync errors for a node and everything below it.
fn revalidate_tree(node: &mut Control) {
    let value = node.value();
    node.checks_mut().recompute_sync(&value);
    match node {
        Control::Group(group) => {
            for (_, child) in group.children.iter_mut() {
                revalidate_tree(child);
            }
        }
        Control::Array(array) => {
            for child in array.items.iter_mut() {
                revalidate_tree(child);
            }
        }
        Control::Field(_) => {}
    }
}

/// Recompute sync errors for the root and every node along `path`. An edit
/// changes the composed value of each of its ancestors, so their own
/// validators (cross-field rules included) re-run too.
fn revalidate_along(root: &mut Control, path: &str) {
    let value = root.value();
    root.checks_mut().recompute_sync(&value);
    if path.is_empty() {
        return;
    }
    let mut prefix = String::new();
    for segment in path.split('.') {
        if !prefix.is_empty() {
            prefix.push('.');
        }
        prefix.push_str(segment);
        if let Some(node) = root.find_mut(&prefix) {
            let value = node.value();
            node.checks_mut().recompute_sync(&value);
        }
    }
}

/// Start async cycles for the root and every node along `path` that carries
/// async validators. A node whose sync validators currently fail skips its
/// async cycle: the value is already known invalid.
fn begin_async_cycles_along(root: &mut Control, path: &str) -> Vec<AsyncJob> {
    let mut jobs = Vec::new();
    cycle_node(root, "", &mut jobs);
    if path.is_empty() {
        return jobs;
    }
    let mut prefix = String::new();
    for segment in path.split('.') {
        if !prefix.is_empty() {
            prefix.push('.');
        }
        prefix.push_str(segment);
        if let Some(node) = root.find_mut(&prefix) {
            cycle_node(node, &prefix, &mut jobs);
        }
    }
    jobs
}

/// Start async cycles for every async-bearing node in a subtree.
fn collect_async_jobs(node: &mut Control, base: &str, jobs: &mut Vec<AsyncJob>) {
    cycle_node(node, base, jobs);
    match node {
        Control::Group(group) => {
            for (name, child) in group.children.iter_mut() {
                let path = join_path(base, name);
                collect_async_jobs(child, &path, jobs);
            }
        }
        Control::Array(array) => {
            for (index, child) in array.items.iter_mut().enumerate() {
                let path = join_path(base, &index.to_string());
                collect_async_jobs(child, &path, jobs);
            }
        }
        Control::Field(_) => {}
    }
}

fn cycle_node(node: &mut Control, path: &str, jobs: &mut Vec<AsyncJob>) {
    if node.checks().async_validators.is_empty() {
        return;
    }
    if !node.checks().sync_errors.is_empty() {
        node.checks_mut().clear_async();
        return;
    }
    let value = node.value();
    let validators = node.checks().async_validators.clone();
    let generation = node.checks_mut().begin_async_cycle();
    jobs.push(AsyncJob {
        path: path.to_string(),
        generation,
        value,
        validators,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{ArraySpec, FieldSpec};
    use crate::validate::{rules, AsyncValidator, Validator};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::sleep;

    const TICK: Duration = Duration::from_millis(50);

    fn counted_stub(
        counter: Arc<AtomicUsize>,
        reserved: &'static str,
    ) -> AsyncValidator {
        AsyncValidator::new("countedStub", move |value| {
            let counter = Arc::clone(&counter);
            Box::pin(async move {
                counter.fetch_add(1, Ordering::SeqCst);
                match value.as_text() {
                    Some(text) if text == reserved => Some(ValidationErrors::flag("taken")),
                    _ => None,
                }
            })
        })
    }

    #[tokio::test]
    async fn sync_validity_is_current_after_every_write() {
        let form = Form::new(
            GroupSpec::new().field("name", FieldSpec::text("").with_validator(rules::required())),
        )
        .unwrap();

        assert!(form.is_invalid());
        assert!(form.errors_of("name").unwrap().contains("required"));

        form.set_text("name", "ada").unwrap();
        assert!(form.is_valid());
        assert!(form.errors_of("name").unwrap().is_empty());

        form.set_text("name", "").unwrap();
        assert!(form.is_invalid());
    }

    #[tokio::test]
    async fn touched_and_dirty_are_sticky_until_reset() {
        let form = Form::new(GroupSpec::new().field("name", FieldSpec::text("init"))).unwrap();

        assert!(!form.is_touched("name").unwrap());
        assert!(!form.is_dirty("name").unwrap());

        form.mark_touched("name").unwrap();
        form.set_text("name", "edited").unwrap();
        // Writing the initial value back does not clear dirtiness.
        form.set_text("name", "init").unwrap();
        assert!(form.is_touched("name").unwrap());
        assert!(form.is_dirty("name").unwrap());

        form.reset().unwrap();
        assert!(!form.is_touched("name").unwrap());
        assert!(!form.is_dirty("name").unwrap());
    }

    #[tokio::test]
    async fn show_errors_needs_all_three_flags() {
        let form = Form::new(
            GroupSpec::new().field("name", FieldSpec::text("").with_validator(rules::required())),
        )
        .unwrap();

        // Invalid but untouched and clean: stay quiet.
        assert!(!form.show_errors("name").unwrap());

        form.mark_touched("name").unwrap();
        assert!(!form.show_errors("name").unwrap());

        form.set_text("name", "x").unwrap();
        form.set_text("name", "").unwrap();
        assert!(form.show_errors("name").unwrap());
    }

    #[tokio::test]
    async fn group_validator_reads_composed_value() {
        let matching = Validator::new("matching", |value| {
            let first = value.get("password").and_then(Value::as_text);
            let second = value.get("confirm").and_then(Value::as_text);
            (first != second).then(|| ValidationErrors::flag("mismatch"))
        });
        let form = Form::new(
            GroupSpec::new().group(
                "passwords",
                GroupSpec::new()
                    .field("password", FieldSpec::text(""))
                    .field("confirm", FieldSpec::text(""))
                    .with_validator(matching),
            ),
        )
        .unwrap();

        assert!(form.is_valid());

        form.set_text("passwords.password", "secret").unwrap();
        assert_eq!(form.validity_of("passwords").unwrap(), Validity::Invalid);
        assert!(form.errors_of("passwords").unwrap().contains("mismatch"));
        // The children themselves carry no error.
        assert!(form.errors_of("passwords.password").unwrap().is_empty());

        form.set_text("passwords.confirm", "secret").unwrap();
        assert!(form.is_valid());
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_edits_run_the_async_validator_once() {
        let counter = Arc::new(AtomicUsize::new(0));
        let form = Form::new(GroupSpec::new().field(
            "email",
            FieldSpec::text("a@b.com").with_async_validator(counted_stub(
                Arc::clone(&counter),
                "taken@example.com",
            )),
        ))
        .unwrap();

        // Ride over the initial cycle first.
        sleep(DEFAULT_ASYNC_DEBOUNCE * 2).await;
        counter.store(0, Ordering::SeqCst);

        form.set_text("email", "b@b.com").unwrap();
        sleep(TICK).await;
        form.set_text("email", "c@b.com").unwrap();
        sleep(TICK).await;
        form.set_text("email", "taken@example.com").unwrap();
        assert!(form.is_pending());

        sleep(DEFAULT_ASYNC_DEBOUNCE * 2).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(form.is_invalid());
        assert!(form.errors_of("email").unwrap().contains("taken"));
    }

    #[tokio::test(start_paused = true)]
    async fn new_edit_discards_resolved_async_errors() {
        let counter = Arc::new(AtomicUsize::new(0));
        let form = Form::new(GroupSpec::new().field(
            "email",
            FieldSpec::text("taken@example.com")
                .with_async_validator(counted_stub(Arc::clone(&counter), "taken@example.com")),
        ))
        .unwrap();

        sleep(DEFAULT_ASYNC_DEBOUNCE * 2).await;
        assert!(form.is_invalid());

        form.set_text("email", "free@example.com").unwrap();
        // The stale `taken` result is gone immediately; the fresh cycle is
        // still inside its quiet period.
        assert!(form.is_pending());

        sleep(DEFAULT_ASYNC_DEBOUNCE * 2).await;
        assert!(form.is_valid());
    }

    #[tokio::test(start_paused = true)]
    async fn sync_failure_skips_the_async_cycle() {
        let counter = Arc::new(AtomicUsize::new(0));
        let form = Form::new(GroupSpec::new().field(
            "email",
            FieldSpec::text("")
                .with_validator(rules::required())
                .with_async_validator(counted_stub(Arc::clone(&counter), "x")),
        ))
        .unwrap();

        assert!(form.is_invalid());
        sleep(DEFAULT_ASYNC_DEBOUNCE * 2).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn destroy_cancels_scheduled_validation() {
        let counter = Arc::new(AtomicUsize::new(0));
        let form = Form::new(GroupSpec::new().field(
            "email",
            FieldSpec::text("a@b.com").with_async_validator(counted_stub(Arc::clone(&counter), "x")),
        ))
        .unwrap();

        form.set_text("email", "b@b.com").unwrap();
        form.destroy();
        sleep(DEFAULT_ASYNC_DEBOUNCE * 2).await;

        assert_eq!(counter.load(Ordering::SeqCst), 0);
        assert!(matches!(
            form.set_text("email", "c@b.com"),
            Err(FormError::Destroyed)
        ));
    }

    #[tokio::test]
    async fn writes_are_type_checked() {
        let form = Form::new(
            GroupSpec::new()
                .field("agree", FieldSpec::flag(false))
                .field("role", FieldSpec::choice(["student", "teacher"], "student")),
        )
        .unwrap();

        assert!(matches!(
            form.set_text("agree", "yes"),
            Err(FormError::TypeMismatch { expected: "flag", .. })
        ));
        assert!(matches!(
            form.set_text("role", "wizard"),
            Err(FormError::NotAnOption { .. })
        ));
        form.set_text("role", "teacher").unwrap();
        assert_eq!(
            form.value_of("role").unwrap(),
            Value::text("teacher")
        );
    }

    #[tokio::test]
    async fn subscribers_observe_the_latest_snapshot() {
        let form = Form::new(GroupSpec::new().field("name", FieldSpec::text(""))).unwrap();
        let mut rx = form.subscribe();

        form.set_text("name", "first").unwrap();
        form.set_text("name", "second").unwrap();

        assert!(rx.has_changed().unwrap());
        let snapshot = rx.borrow_and_update().clone();
        assert_eq!(snapshot.get("name"), Some(&Value::text("second")));
    }

    #[tokio::test]
    async fn arrays_support_push_and_remove() {
        let form = Form::new(GroupSpec::new().array(
            "source",
            ArraySpec::new().item(FieldSpec::flag(false)).item(FieldSpec::flag(false)),
        ))
        .unwrap();

        form.set_flag("source.1", true).unwrap();
        form.push_item("source", FieldSpec::flag(true)).unwrap();
        assert_eq!(
            form.value_of("source").unwrap(),
            Value::List(vec![Value::flag(false), Value::flag(true), Value::flag(true)])
        );

        form.remove_item("source", 0).unwrap();
        assert_eq!(
            form.value_of("source").unwrap(),
            Value::List(vec![Value::flag(true), Value::flag(true)])
        );

        assert!(matches!(
            form.remove_item("source", 9),
            Err(FormError::IndexOutOfRange { .. })
        ));
        assert!(matches!(
            form.push_item("source.0", FieldSpec::flag(false)),
            Err(FormError::NotAnArray(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn reset_clears_resolved_async_errors() {
        let counter = Arc::new(AtomicUsize::new(0));
        let form = Form::new(GroupSpec::new().field(
            "email",
            FieldSpec::text("")
                .with_async_validator(counted_stub(Arc::clone(&counter), "taken@example.com")),
        ))
        .unwrap();

        form.set_text("email", "taken@example.com").unwrap();
        sleep(DEFAULT_ASYNC_DEBOUNCE * 2).await;
        assert!(form.is_invalid());

        form.reset().unwrap();
        assert_eq!(form.value_of("email").unwrap(), Value::text(""));
        sleep(DEFAULT_ASYNC_DEBOUNCE * 2).await;
        assert!(form.is_valid());
    }
}
