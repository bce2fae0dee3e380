//! Variable store.
//!
//! A flat, name-keyed table of typed slots shared by the interpreter and the
//! host API.  Each slot may be marked const at creation; const-ness is never
//! cleared.  The table is growable but bounded by a capacity limit, and
//! iterates in creation order so that saved output is deterministic.

use indexmap::IndexMap;

use crate::config::Limits;
use crate::error::{Error, Result};
use crate::script::value::Value;

// ── Variable ──────────────────────────────────────────────────────────────────

/// A single named slot.  The name is the store key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    value: Value,
    constant: bool,
}

impl Variable {
    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn is_const(&self) -> bool {
        self.constant
    }

    /// Replace the value (and possibly its type).
    ///
    /// No const check happens here; callers reject writes to const slots
    /// before reaching this point.
    pub fn overwrite(&mut self, value: Value) {
        self.value = value;
    }
}

// ── VarStore ──────────────────────────────────────────────────────────────────

/// Name-keyed variable table with a capacity bound.
#[derive(Debug)]
pub struct VarStore {
    vars: IndexMap<String, Variable>,
    capacity: usize,
}

impl Default for VarStore {
    fn default() -> Self {
        Self::with_capacity_limit(Limits::default().max_variables)
    }
}

impl VarStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store that holds at most `capacity` variables.
    pub fn with_capacity_limit(capacity: usize) -> Self {
        VarStore { vars: IndexMap::new(), capacity }
    }

    /// Exact-match lookup.
    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.vars.get(name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Variable> {
        self.vars.get_mut(name)
    }

    /// Lookup that reports a missing name as [`Error::VariableNotFound`].
    pub fn lookup(&self, name: &str) -> Result<&Variable> {
        self.get(name).ok_or_else(|| Error::VariableNotFound {
            name: name.to_owned(),
            line: None,
        })
    }

    /// The value of an integer-typed variable.
    pub fn get_int(&self, name: &str) -> Result<i64> {
        let value = self.lookup(name)?.value();
        value.as_int().ok_or_else(|| mismatch(name, "integer", value))
    }

    /// The value of a string-typed variable.
    pub fn get_str(&self, name: &str) -> Result<&str> {
        let value = self.lookup(name)?.value();
        value.as_str().ok_or_else(|| mismatch(name, "string", value))
    }

    /// Add a new variable.
    ///
    /// Fails with [`Error::CapacityExceeded`] when the store is full, leaving
    /// it untouched.  The name must not already exist; callers check with
    /// [`VarStore::get`] first.
    pub fn create(
        &mut self,
        name: impl Into<String>,
        value: Value,
        constant: bool,
    ) -> Result<&mut Variable> {
        let name = name.into();
        debug_assert!(!self.vars.contains_key(&name), "variable '{name}' already exists");
        if self.vars.len() >= self.capacity {
            return Err(Error::CapacityExceeded { limit: self.capacity, line: None });
        }
        tracing::debug!(%name, constant, "creating variable");
        let (index, _) = self.vars.insert_full(name, Variable { value, constant });
        Ok(&mut self.vars[index])
    }

    /// Returns `true` if the variable exists.
    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Iterate over all variables in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Variable)> {
        self.vars.iter().map(|(name, var)| (name.as_str(), var))
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

pub(crate) fn mismatch(name: &str, expected: &'static str, found: &Value) -> Error {
    Error::TypeMismatch {
        name: name.to_owned(),
        expected,
        found: found.type_name(),
        line: None,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn create_and_get() {
        let mut vars = VarStore::new();
        vars.create("wrap", Value::Int(1), false).unwrap();
        let var = vars.get("wrap").unwrap();
        assert_eq!(var.value(), &Value::Int(1));
        assert!(!var.is_const());
    }

    #[test]
    fn overwrite_changes_type() {
        let mut vars = VarStore::new();
        vars.create("x", Value::Int(1), false).unwrap();
        vars.get_mut("x").unwrap().overwrite(Value::from("new"));
        assert_eq!(vars.get_str("x").unwrap(), "new");
        assert_eq!(vars.len(), 1);
    }

    #[test]
    fn const_flag_survives_overwrite() {
        let mut vars = VarStore::new();
        vars.create("max", Value::Int(100), true).unwrap();
        vars.get_mut("max").unwrap().overwrite(Value::Int(1));
        assert!(vars.get("max").unwrap().is_const());
    }

    #[test]
    fn typed_getters() {
        let mut vars = VarStore::new();
        vars.create("tabsize", Value::Int(8), false).unwrap();
        vars.create("name", Value::from("hello"), false).unwrap();
        assert_eq!(vars.get_int("tabsize").unwrap(), 8);
        assert_eq!(vars.get_str("name").unwrap(), "hello");
        assert_eq!(vars.get_int("name").unwrap_err().kind(), ErrorKind::TypeMismatch);
        assert_eq!(vars.get_str("tabsize").unwrap_err().kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn missing_returns_none() {
        let vars = VarStore::new();
        assert!(vars.get("nope").is_none());
        assert!(!vars.contains("nope"));
        assert_eq!(vars.lookup("nope").unwrap_err().kind(), ErrorKind::VariableNotFound);
    }

    #[test]
    fn lookup_is_exact_match() {
        let mut vars = VarStore::new();
        vars.create("Name", Value::Int(1), false).unwrap();
        assert!(vars.get("name").is_none());
        assert!(vars.get("Nam").is_none());
        assert!(vars.contains("Name"));
    }

    #[test]
    fn capacity_exceeded_leaves_store_intact() {
        let mut vars = VarStore::with_capacity_limit(2);
        vars.create("a", Value::Int(1), false).unwrap();
        vars.create("b", Value::Int(2), false).unwrap();
        let err = vars.create("c", Value::Int(3), false).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CapacityExceeded);
        assert_eq!(vars.len(), 2);
        assert!(!vars.contains("c"));
        assert_eq!(vars.get_int("b").unwrap(), 2);
    }

    #[test]
    fn iterates_in_creation_order() {
        let mut vars = VarStore::new();
        for name in ["zeta", "alpha", "mid"] {
            vars.create(name, Value::Int(0), false).unwrap();
        }
        let names: Vec<&str> = vars.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn default_capacity() {
        let vars = VarStore::new();
        assert_eq!(vars.capacity(), 128);
        assert!(vars.is_empty());
    }
}
