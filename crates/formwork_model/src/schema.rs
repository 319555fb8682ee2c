//! Declarative form schemas.
//!
//! A schema describes the shape of a form (fields, groups, and arrays, each
//! with an initial value and attached validators) and is turned into a live
//! control tree by [`Form::new`](crate::form::Form::new). Construction
//! enforces structural constraints (unique child names, initial values
//! matching the field's static type); it never rejects an initial value for
//! failing *validation*. The tree simply starts in whatever validity state
//! the validators compute.

use crate::control::{ArrayControl, Checks, Control, Field, FieldKind, Group};
use crate::errors::FormError;
use crate::validate::{AsyncValidator, Validator};
use crate::value::Value;

/// Description of a single field.
#[derive(Debug)]
pub struct FieldSpec {
    kind: FieldKind,
    initial: Value,
    validators: Vec<Validator>,
    async_validators: Vec<AsyncValidator>,
}

impl FieldSpec {
    /// A free-form text field.
    pub fn text(initial: impl Into<String>) -> Self {
        Self {
            kind: FieldKind::Text,
            initial: Value::Text(initial.into()),
            validators: Vec::new(),
            async_validators: Vec::new(),
        }
    }

    /// A boolean toggle field.
    pub fn flag(initial: bool) -> Self {
        Self {
            kind: FieldKind::Flag,
            initial: Value::Flag(initial),
            validators: Vec::new(),
            async_validators: Vec::new(),
        }
    }

    /// A text field constrained to a closed list of options.
    pub fn choice<I, S>(options: I, initial: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind: FieldKind::Choice(options.into_iter().map(Into::into).collect()),
            initial: Value::Text(initial.into()),
            validators: Vec::new(),
            async_validators: Vec::new(),
        }
    }

    /// Attach a synchronous validator.
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    /// Attach an asynchronous validator.
    pub fn with_async_validator(mut self, validator: AsyncValidator) -> Self {
        self.async_validators.push(validator);
        self
    }

    fn build(self, name: &str) -> Result<Field, FormError> {
        if !self.kind.accepts(&self.initial) {
            return Err(match (&self.kind, &self.initial) {
                (FieldKind::Choice(_), Value::Text(text)) => FormError::NotAnOption {
                    path: name.to_string(),
                    value: text.clone(),
                },
                _ => FormError::TypeMismatch {
                    path: name.to_string(),
                    expected: self.kind.expected(),
                },
            });
        }
        Ok(Field {
            kind: self.kind,
            value: self.initial.clone(),
            initial: self.initial,
            touched: false,
            dirty: false,
            checks: Checks::new(self.validators, self.async_validators),
        })
    }
}

/// Description of a named group of child nodes.
#[derive(Debug, Default)]
pub struct GroupSpec {
    children: Vec<(String, NodeSpec)>,
    validators: Vec<Validator>,
    async_validators: Vec<AsyncValidator>,
}

impl GroupSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field child. Declaration order is display order.
    pub fn field(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.children.push((name.into(), NodeSpec::Field(spec)));
        self
    }

    /// Add a nested group child.
    pub fn group(mut self, name: impl Into<String>, spec: GroupSpec) -> Self {
        self.children.push((name.into(), NodeSpec::Group(spec)));
        self
    }

    /// Add an array child.
    pub fn array(mut self, name: impl Into<String>, spec: ArraySpec) -> Self {
        self.children.push((name.into(), NodeSpec::Array(spec)));
        self
    }

    /// Attach a group-level validator; it receives the composed map value,
    /// which is how cross-field rules read multiple children.
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    /// Attach a group-level asynchronous validator.
    pub fn with_async_validator(mut self, validator: AsyncValidator) -> Self {
        self.async_validators.push(validator);
        self
    }

    pub(crate) fn build(self) -> Result<Group, FormError> {
        let mut children: Vec<(String, Control)> = Vec::with_capacity(self.children.len());
        for (name, spec) in self.children {
            if children.iter().any(|(existing, _)| existing == &name) {
                return Err(FormError::DuplicateChild(name));
            }
            let child = spec.build_named(&name)?;
            children.push((name, child));
        }
        Ok(Group {
            children,
            checks: Checks::new(self.validators, self.async_validators),
        })
    }
}

/// Description of an ordered sequence of homogeneous-shaped items.
#[derive(Debug, Default)]
pub struct ArraySpec {
    items: Vec<NodeSpec>,
}

impl ArraySpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item.
    pub fn item(mut self, spec: impl Into<NodeSpec>) -> Self {
        self.items.push(spec.into());
        self
    }

    fn build(self) -> Result<ArrayControl, FormError> {
        let items = self
            .items
            .into_iter()
            .enumerate()
            .map(|(index, spec)| spec.build_named(&index.to_string()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ArrayControl {
            items,
            checks: Checks::default(),
        })
    }
}

/// Any node description.
#[derive(Debug)]
pub enum NodeSpec {
    Field(FieldSpec),
    Group(GroupSpec),
    Array(ArraySpec),
}

impl NodeSpec {
    pub(crate) fn build_named(self, name: &str) -> Result<Control, FormError> {
        match self {
            NodeSpec::Field(spec) => Ok(Control::Field(spec.build(name)?)),
            NodeSpec::Group(spec) => Ok(Control::Group(spec.build()?)),
            NodeSpec::Array(spec) => Ok(Control::Array(spec.build()?)),
        }
    }
}

impl From<FieldSpec> for NodeSpec {
    fn from(spec: FieldSpec) -> Self {
        NodeSpec::Field(spec)
    }
}

impl From<GroupSpec> for NodeSpec {
    fn from(spec: GroupSpec) -> Self {
        NodeSpec::Group(spec)
    }
}

impl From<ArraySpec> for NodeSpec {
    fn from(spec: ArraySpec) -> Self {
        NodeSpec::Array(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::rules;

    #[test]
    fn duplicate_child_names_are_rejected() {
        let spec = GroupSpec::new()
            .field("email", FieldSpec::text(""))
            .field("email", FieldSpec::text(""));

        let err = spec.build().unwrap_err();
        assert!(matches!(err, FormError::DuplicateChild(name) if name == "email"));
    }

    #[test]
    fn choice_initial_must_be_an_option() {
        let spec = GroupSpec::new().field(
            "role",
            FieldSpec::choice(["student", "teacher"], "wizard"),
        );

        let err = spec.build().unwrap_err();
        assert!(matches!(err, FormError::NotAnOption { value, .. } if value == "wizard"));
    }

    #[test]
    fn failing_initial_validation_is_not_a_build_error() {
        let group = GroupSpec::new()
            .field("email", FieldSpec::text("").with_validator(rules::required()))
            .build()
            .unwrap();

        // Built fine; validity is the engine's concern.
        assert_eq!(group.children.len(), 1);
    }
}
