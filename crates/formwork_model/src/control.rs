//! The control tree: fields, groups, and arrays.
//!
//! Every node exposes the same capability surface (value, validity, touched,
//! dirty, reset); groups and arrays delegate recursively to their children.
//! Nodes are addressed by dot-separated paths (`passwords.password`,
//! `source.1`), with the empty path naming the node itself.

use crate::errors::ValidationErrors;
use crate::validate::{AsyncValidator, Validator};
use crate::value::Value;
use std::fmt;

/// Aggregated validation state of a control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validity {
    Valid,
    Invalid,
    Pending,
}

impl Validity {
    pub fn is_valid(self) -> bool {
        self == Validity::Valid
    }

    /// Combine with a child's validity: invalid dominates, then pending.
    pub(crate) fn combine(self, other: Validity) -> Validity {
        use Validity::*;
        match (self, other) {
            (Invalid, _) | (_, Invalid) => Invalid,
            (Pending, _) | (_, Pending) => Pending,
            _ => Valid,
        }
    }
}

impl fmt::Display for Validity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Validity::Valid => "valid",
            Validity::Invalid => "invalid",
            Validity::Pending => "pending",
        };
        f.write_str(label)
    }
}

/// Static type of a field: what values a write may carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// Free-form text.
    Text,
    /// Boolean toggle.
    Flag,
    /// Text constrained to a closed list of options.
    Choice(Vec<String>),
}

impl FieldKind {
    pub(crate) fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (FieldKind::Text, Value::Text(_)) => true,
            (FieldKind::Flag, Value::Flag(_)) => true,
            (FieldKind::Choice(options), Value::Text(text)) => {
                options.iter().any(|option| option == text)
            }
            _ => false,
        }
    }

    pub(crate) fn expected(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Flag => "flag",
            FieldKind::Choice(_) => "choice",
        }
    }
}

/// Per-node validation state: attached rules plus their current results.
#[derive(Debug, Default)]
pub(crate) struct Checks {
    pub(crate) validators: Vec<Validator>,
    pub(crate) async_validators: Vec<AsyncValidator>,
    pub(crate) sync_errors: ValidationErrors,
    pub(crate) async_errors: ValidationErrors,
    pub(crate) async_pending: bool,
    /// Monotonic edit counter; an async run commits only if it still matches.
    pub(crate) generation: u64,
}

impl Checks {
    pub(crate) fn new(validators: Vec<Validator>, async_validators: Vec<AsyncValidator>) -> Self {
        Self {
            validators,
            async_validators,
            ..Self::default()
        }
    }

    /// Re-run every sync validator against the given value.
    pub(crate) fn recompute_sync(&mut self, value: &Value) {
        let mut errors = ValidationErrors::new();
        for validator in &self.validators {
            if let Some(found) = validator.run(value) {
                errors.merge(found);
            }
        }
        self.sync_errors = errors;
    }

    /// Start a new async validation cycle for the current value: stale
    /// resolved results are cleared and the node turns pending.
    pub(crate) fn begin_async_cycle(&mut self) -> u64 {
        self.generation += 1;
        self.async_errors = ValidationErrors::new();
        self.async_pending = !self.async_validators.is_empty();
        self.generation
    }

    /// Invalidate any outstanding async run without starting a new one.
    pub(crate) fn clear_async(&mut self) {
        self.generation += 1;
        self.async_errors = ValidationErrors::new();
        self.async_pending = false;
    }

    fn own_validity(&self) -> Validity {
        if !self.sync_errors.is_empty() || !self.async_errors.is_empty() {
            Validity::Invalid
        } else if self.async_pending {
            Validity::Pending
        } else {
            Validity::Valid
        }
    }

    fn own_errors(&self) -> ValidationErrors {
        let mut errors = self.sync_errors.clone();
        errors.merge(self.async_errors.clone());
        errors
    }
}

/// A leaf value holder.
#[derive(Debug)]
pub struct Field {
    pub(crate) kind: FieldKind,
    pub(crate) value: Value,
    pub(crate) initial: Value,
    pub(crate) touched: bool,
    pub(crate) dirty: bool,
    pub(crate) checks: Checks,
}

/// A named, ordered mapping of child controls. Carries its own validators so
/// cross-field rules can read the composed value.
#[derive(Debug)]
pub struct Group {
    pub(crate) children: Vec<(String, Control)>,
    pub(crate) checks: Checks,
}

impl Group {
    pub(crate) fn child(&self, name: &str) -> Option<&Control> {
        self.children
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, child)| child)
    }

    pub(crate) fn child_mut(&mut self, name: &str) -> Option<&mut Control> {
        self.children
            .iter_mut()
            .find(|(key, _)| key == name)
            .map(|(_, child)| child)
    }
}

/// An ordered, index-addressed sequence of child controls.
#[derive(Debug)]
pub struct ArrayControl {
    pub(crate) items: Vec<Control>,
    pub(crate) checks: Checks,
}

/// A node in the control tree.
#[derive(Debug)]
pub enum Control {
    Field(Field),
    Group(Group),
    Array(ArrayControl),
}

impl Control {
    /// The node's current value; composites compose their children.
    pub fn value(&self) -> Value {
        match self {
            Control::Field(field) => field.value.clone(),
            Control::Group(group) => Value::Map(
                group
                    .children
                    .iter()
                    .map(|(name, child)| (name.clone(), child.value()))
                    .collect(),
            ),
            Control::Array(array) => {
                Value::List(array.items.iter().map(Control::value).collect())
            }
        }
    }

    /// Aggregate validity: a composite is invalid iff it or any descendant is
    /// invalid, pending iff any is pending and none invalid.
    pub fn validity(&self) -> Validity {
        match self {
            Control::Field(field) => field.checks.own_validity(),
            Control::Group(group) => group
                .children
                .iter()
                .fold(group.checks.own_validity(), |acc, (_, child)| {
                    acc.combine(child.validity())
                }),
            Control::Array(array) => array
                .items
                .iter()
                .fold(array.checks.own_validity(), |acc, child| {
                    acc.combine(child.validity())
                }),
        }
    }

    /// The node's own error set (sync plus resolved async). Descendant errors
    /// are never re-exposed here; callers descend by path for details.
    pub fn errors(&self) -> ValidationErrors {
        self.checks().own_errors()
    }

    /// True once any field under this node has been marked touched.
    pub fn touched(&self) -> bool {
        match self {
            Control::Field(field) => field.touched,
            Control::Group(group) => group.children.iter().any(|(_, child)| child.touched()),
            Control::Array(array) => array.items.iter().any(Control::touched),
        }
    }

    /// True once any field under this node has been written since the last
    /// reset, even if written back to its initial value.
    pub fn dirty(&self) -> bool {
        match self {
            Control::Field(field) => field.dirty,
            Control::Group(group) => group.children.iter().any(|(_, child)| child.dirty()),
            Control::Array(array) => array.items.iter().any(Control::dirty),
        }
    }

    /// Mark this node (and, for composites, every field below it) touched.
    pub(crate) fn mark_touched(&mut self) {
        match self {
            Control::Field(field) => field.touched = true,
            Control::Group(group) => {
                for (_, child) in group.children.iter_mut() {
                    child.mark_touched();
                }
            }
            Control::Array(array) => {
                for child in array.items.iter_mut() {
                    child.mark_touched();
                }
            }
        }
    }

    /// Restore initial values and clear interaction flags, recursively.
    /// Validation state is recomputed by the form afterwards.
    pub(crate) fn reset(&mut self) {
        match self {
            Control::Field(field) => {
                field.value = field.initial.clone();
                field.touched = false;
                field.dirty = false;
            }
            Control::Group(group) => {
                for (_, child) in group.children.iter_mut() {
                    child.reset();
                }
            }
            Control::Array(array) => {
                for child in array.items.iter_mut() {
                    child.reset();
                }
            }
        }
    }

    pub(crate) fn checks(&self) -> &Checks {
        match self {
            Control::Field(field) => &field.checks,
            Control::Group(group) => &group.checks,
            Control::Array(array) => &array.checks,
        }
    }

    pub(crate) fn checks_mut(&mut self) -> &mut Checks {
        match self {
            Control::Field(field) => &mut field.checks,
            Control::Group(group) => &mut group.checks,
            Control::Array(array) => &mut array.checks,
        }
    }

    /// Walk a dot-separated path. The empty path names this node.
    pub(crate) fn find(&self, path: &str) -> Option<&Control> {
        if path.is_empty() {
            return Some(self);
        }
        let mut node = self;
        for segment in path.split('.') {
            node = match node {
                Control::Group(group) => group.child(segment)?,
                Control::Array(array) => array.items.get(segment.parse::<usize>().ok()?)?,
                Control::Field(_) => return None,
            };
        }
        Some(node)
    }

    pub(crate) fn find_mut(&mut self, path: &str) -> Option<&mut Control> {
        if path.is_empty() {
            return Some(self);
        }
        let mut node = self;
        for segment in path.split('.') {
            node = match node {
                Control::Group(group) => group.child_mut(segment)?,
                Control::Array(array) => array.items.get_mut(segment.parse::<usize>().ok()?)?,
                Control::Field(_) => return None,
            };
        }
        Some(node)
    }
}

/// Join a parent path with a child segment.
pub(crate) fn join_path(base: &str, segment: &str) -> String {
    if base.is_empty() {
        segment.to_string()
    } else {
        format!("{base}.{segment}")
    }
}
