use std::{collections::HashMap, fmt};

use crate::{errors::Span, parser::ast::DeclaredType};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Type {
    Integer,
    Real,
    String,
    /// Only produced by comparisons and logical operators.
    /// Variables can't hold booleans.
    Boolean,
}

impl Type {
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Real)
    }

    /// Whether a value of type `source` may be stored in a variable of this type.
    /// Integers widen to reals; everything else must match exactly.
    pub fn accepts(&self, source: Type) -> bool {
        *self == source || (*self == Self::Real && source == Self::Integer)
    }

    pub fn comparable_with(&self, other: Type) -> bool {
        *self == other || (self.is_numeric() && other.is_numeric())
    }

    /// The type of an arithmetic operation on two numeric operands.
    pub fn arithmetic_result(lhs: Type, rhs: Type) -> Type {
        if lhs == Self::Real || rhs == Self::Real {
            Self::Real
        } else {
            Self::Integer
        }
    }
}

impl From<DeclaredType> for Type {
    fn from(ty: DeclaredType) -> Self {
        match ty {
            DeclaredType::Integer => Self::Integer,
            DeclaredType::Real => Self::Real,
            DeclaredType::String => Self::String,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer => write!(f, "integer"),
            Self::Real => write!(f, "real"),
            Self::String => write!(f, "string"),
            Self::Boolean => write!(f, "boolean"),
        }
    }
}

/// Maps each declared variable to its type and the place it was declared.
/// Entries are never overwritten.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    symbols: HashMap<String, (Type, Span)>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name`. If it already exists, the table is left
    /// untouched and the span of the earlier declaration is returned.
    pub fn declare(&mut self, name: &str, ty: Type, span: Span) -> Result<(), Span> {
        match self.symbols.get(name) {
            Some(&(_, previous)) => Err(previous),

            None => {
                self.symbols.insert(name.to_owned(), (ty, span));
                Ok(())
            },
        }
    }

    pub fn get(&self, name: &str) -> Option<Type> {
        self.symbols.get(name).map(|&(ty, _)| ty)
    }

    pub fn declared_at(&self, name: &str) -> Option<Span> {
        self.symbols.get(name).map(|&(_, span)| span)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    /// Declared names in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.symbols.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
