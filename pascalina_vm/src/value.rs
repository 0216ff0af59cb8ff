use std::fmt;
use thiserror::Error;

/// A variable write that the coercion rules refuse.
#[derive(Clone, Debug, Error, PartialEq)]
#[error("can't store {found} value in {expected} variable")]
pub struct CoercionError {
    pub expected: ValueKind,
    pub found: ValueKind,
}

/// The runtime type tag of a value or a variable.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ValueKind {
    Integer,
    Real,
    String,
}

impl ValueKind {
    /// Decides what happens when `value` is written into a variable
    /// currently tagged `self`. Returns the variable's new tag
    /// along with the value to store.
    ///
    /// | tag \ value | integer | real | string |
    /// |---|---|---|---|
    /// | integer | keep | promote tag to real | error |
    /// | real | widen value | keep | error |
    /// | string | stringify | stringify | keep |
    pub fn coerce(self, value: Value) -> Result<(ValueKind, Value), CoercionError> {
        match (self, value) {
            (ValueKind::Integer, value @ Value::Integer(_)) => Ok((ValueKind::Integer, value)),
            (ValueKind::Integer, value @ Value::Real(_)) => Ok((ValueKind::Real, value)),
            (ValueKind::Real, Value::Integer(i)) => Ok((ValueKind::Real, Value::Real(i as f64))),
            (ValueKind::Real, value @ Value::Real(_)) => Ok((ValueKind::Real, value)),
            (ValueKind::String, value @ Value::String(_)) => Ok((ValueKind::String, value)),

            (ValueKind::String, value @ (Value::Integer(_) | Value::Real(_))) => {
                Ok((ValueKind::String, Value::String(value.to_string())))
            },

            (expected @ (ValueKind::Integer | ValueKind::Real), Value::String(_)) => {
                Err(CoercionError {
                    expected,
                    found: ValueKind::String,
                })
            },
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Integer => write!(f, "integer"),
            ValueKind::Real => write!(f, "real"),
            ValueKind::String => write!(f, "string"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Integer(i64),
    Real(f64),
    String(String),
}

impl Value {
    pub const fn kind(&self) -> ValueKind {
        match self {
            Value::Integer(_) => ValueKind::Integer,
            Value::Real(_) => ValueKind::Real,
            Value::String(_) => ValueKind::String,
        }
    }

    /// Zero and the empty string are false; everything else is true.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Integer(i) => *i != 0,
            Value::Real(x) => *x != 0.0,
            Value::String(s) => !s.is_empty(),
        }
    }

    pub fn from_bool(b: bool) -> Self {
        Value::Integer(b as i64)
    }

    /// Tries to interpret `text` as a literal. The forms are tried in
    /// order: hexadecimal (`0x1A`, `-0X1a`), octal (`017`), decimal
    /// integer (`-42`), real (anything containing `.` that parses as a
    /// float) and finally a single- or double-quoted string. The contents
    /// of a quoted string get another chance at being a number, so
    /// `"12"` decodes to the integer 12.
    pub fn resolve_literal(text: &str) -> Option<Self> {
        if let Some(res) = Self::resolve_number(text) {
            return Some(res);
        }

        let inner = strip_quotes(text)?;
        Some(Self::resolve_number(inner).unwrap_or_else(|| Value::String(inner.to_owned())))
    }

    /// Like [`resolve_literal`](Self::resolve_literal), but anything that
    /// isn't a literal becomes a string. Used for decoding input lines.
    pub fn from_input(line: &str) -> Self {
        Self::resolve_literal(line).unwrap_or_else(|| Value::String(line.to_owned()))
    }

    fn resolve_number(text: &str) -> Option<Self> {
        parse_hex(text)
            .or_else(|| parse_octal(text))
            .or_else(|| parse_decimal(text))
            .map(Value::Integer)
            .or_else(|| parse_real(text).map(Value::Real))
    }

    /// Numeric view of this value, for mixed integer/real arithmetic.
    pub(crate) fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Real(x) => Some(*x),
            Value::String(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{}", i),
            // `{:?}` keeps the trailing `.0` on whole numbers
            Value::Real(x) => write!(f, "{:?}", x),
            Value::String(ref s) => write!(f, "{}", s),
        }
    }
}

fn is_all(digits: &str, predicate: impl Fn(char) -> bool) -> bool {
    !digits.is_empty() && digits.chars().all(predicate)
}

fn parse_hex(text: &str) -> Option<i64> {
    let (negative, rest) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };

    let digits = rest
        .strip_prefix("0x")
        .or_else(|| rest.strip_prefix("0X"))?;

    if !is_all(digits, |c| c.is_ascii_hexdigit()) {
        return None;
    }

    let magnitude = i64::from_str_radix(digits, 16).ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

fn parse_octal(text: &str) -> Option<i64> {
    let digits = text.strip_prefix('0')?;

    if !is_all(digits, |c| ('0'..='7').contains(&c)) {
        return None;
    }

    i64::from_str_radix(digits, 8).ok()
}

fn parse_decimal(text: &str) -> Option<i64> {
    let digits = text.strip_prefix('-').unwrap_or(text);

    if !is_all(digits, |c| c.is_ascii_digit()) {
        return None;
    }

    text.parse().ok()
}

fn parse_real(text: &str) -> Option<f64> {
    if !text.contains('.') {
        return None;
    }

    // `f64::from_str` also accepts things like `inf` and `1e5`,
    // but those never contain a dot, so they're already excluded.
    text.parse().ok()
}

fn strip_quotes(text: &str) -> Option<&str> {
    ['"', '\''].iter().find_map(|&quote| {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            Some(&text[1..text.len() - 1])
        } else {
            None
        }
    })
}
