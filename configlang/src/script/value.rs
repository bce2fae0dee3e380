//! Runtime value type for configuration scripts.
//!
//! Unlike a dynamically-coerced scripting value, a configuration value never
//! converts between integer and string: accessors fail with a type mismatch
//! instead.

use std::fmt;

/// A typed variable value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(i64),
    Str(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Str(s) => write!(f, "{s}"),
        }
    }
}

impl Value {
    /// Name of the type, as used in type-mismatch diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Str(_) => "string",
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Int(_) => None,
            Value::Str(s) => Some(s),
        }
    }

    /// Render the value as a script literal.
    ///
    /// Integers are written in decimal.  Strings without a line break become a
    /// double-quoted literal (no escaping; an embedded `"` does not survive a
    /// reload).  Strings containing a line break are wrapped verbatim in a
    /// `#%%%` … `%%%#` block.
    pub fn to_literal(&self) -> String {
        match self {
            Value::Int(n) => n.to_string(),
            Value::Str(s) if s.contains('\n') => format!("#%%%{s}%%%#"),
            Value::Str(s) => format!("\"{s}\""),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_owned())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
