use std::collections::HashMap;

use crate::value::{CoercionError, Value, ValueKind};

/// A bound variable. The kind is fixed by the first write and
/// afterwards only changes through [`ValueKind::coerce`].
#[derive(Clone, Debug, PartialEq)]
pub struct Variable {
    value: Value,
    kind: ValueKind,
}

impl Variable {
    pub const fn value(&self) -> &Value {
        &self.value
    }

    pub const fn kind(&self) -> ValueKind {
        self.kind
    }
}

/// Every variable the program has written to, user variables
/// and temporaries alike.
#[derive(Debug, Default)]
pub struct VariableStore {
    variables: HashMap<String, Variable>,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.variables.get(name)
    }

    /// Writes `value` into `name`, applying the coercion rules
    /// if the variable is already bound.
    pub fn write(&mut self, name: &str, value: Value) -> Result<(), CoercionError> {
        match self.variables.get_mut(name) {
            Some(variable) => {
                let (kind, value) = variable.kind.coerce(value)?;
                variable.kind = kind;
                variable.value = value;
            },

            None => {
                let kind = value.kind();
                self.variables
                    .insert(name.to_owned(), Variable { value, kind });
            },
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}
