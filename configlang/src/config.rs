//! Host-facing configuration session.
//!
//! A [`Config`] owns one variable store and runs scripts against it.  The
//! host loads scripts from text or files, reads typed values back, updates
//! mutable variables, and saves the whole store in script form:
//!
//! ```rust
//! use configlang::Config;
//!
//! let mut cfg = Config::new();
//! cfg.load_str("const set max = 100\nset value = 42\nset name = \"demo\"").unwrap();
//! cfg.set_int("value", 99).unwrap();
//! assert!(cfg.set_int("max", 1).is_err());
//! assert_eq!(
//!     cfg.to_script(),
//!     "const set max = 100\nset value = 99\nset name = \"demo\"\n",
//! );
//! ```
//!
//! Every call overwrites the last-error message ([`Config::last_error`]),
//! which is kept for diagnostics only; callers branch on the returned
//! [`Result`].

use std::mem;
use std::path::Path;

use crate::error::{Error, Result};
use crate::script::{Interpreter, Value};
use crate::var::{mismatch, VarStore};

/// Last-error text after a successful call.
pub const NO_ERROR: &str = "No error";

// ── Limits ────────────────────────────────────────────────────────────────────

/// Size bounds applied to scripts and the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum number of distinct variables.
    pub max_variables: usize,
    /// Maximum identifier length in bytes.
    pub max_name_len: usize,
    /// Maximum string value length in bytes.
    pub max_text_len: usize,
    /// Maximum nesting of executed `if` blocks.
    pub max_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_variables: 128,
            max_name_len: 31,
            max_text_len: 1023,
            max_depth: 64,
        }
    }
}

impl Limits {
    pub fn max_variables(mut self, n: usize) -> Self {
        self.max_variables = n;
        self
    }

    pub fn max_name_len(mut self, n: usize) -> Self {
        self.max_name_len = n;
        self
    }

    pub fn max_text_len(mut self, n: usize) -> Self {
        self.max_text_len = n;
        self
    }

    pub fn max_depth(mut self, n: usize) -> Self {
        self.max_depth = n;
        self
    }
}

// ── Config ────────────────────────────────────────────────────────────────────

/// An interpreter instance: variable store, limits, and last-error slot.
#[derive(Debug)]
pub struct Config {
    vars: VarStore,
    limits: Limits,
    last_error: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::with_limits(Limits::default())
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(limits: Limits) -> Self {
        Config {
            vars: VarStore::with_capacity_limit(limits.max_variables),
            limits,
            last_error: NO_ERROR.to_owned(),
        }
    }

    /// Read-only view of the store.
    pub fn vars(&self) -> &VarStore {
        &self.vars
    }

    /// Message for the most recent call, or [`NO_ERROR`] if it succeeded.
    pub fn last_error(&self) -> &str {
        &self.last_error
    }

    fn record<T>(&mut self, result: Result<T>) -> Result<T> {
        self.last_error = match &result {
            Ok(_) => NO_ERROR.to_owned(),
            Err(e) => e.to_string(),
        };
        result
    }

    // ── Loading ───────────────────────────────────────────────────────────────

    /// Execute a script.
    ///
    /// Stops at the first failing statement; variables created or changed
    /// before it are kept.
    pub fn load_str(&mut self, src: &str) -> Result<()> {
        tracing::debug!(bytes = src.len(), "loading script");
        let result = Interpreter::new(src, &mut self.vars, self.limits).run();
        match &result {
            Ok(()) => tracing::debug!(vars = self.vars.len(), "script loaded"),
            Err(e) => tracing::debug!(error = %e, "script stopped"),
        }
        self.record(result)
    }

    /// Read a script file fully into memory and execute it.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "reading script file");
        let src = std::fs::read_to_string(path).map_err(|source| Error::Io {
            action: "read",
            path: path.to_owned(),
            source,
        });
        let src = self.record(src)?;
        self.load_str(&src)
    }

    // ── Queries ───────────────────────────────────────────────────────────────

    /// The value of a variable, whatever its type.
    pub fn get(&mut self, name: &str) -> Result<&Value> {
        let status = self.vars.lookup(name).map(drop);
        self.record(status)?;
        Ok(self.vars.lookup(name)?.value())
    }

    pub fn get_int(&mut self, name: &str) -> Result<i64> {
        let result = self.vars.get_int(name);
        self.record(result)
    }

    /// The value of a string variable, borrowed until the next mutation.
    pub fn get_str(&mut self, name: &str) -> Result<&str> {
        let status = self.vars.get_str(name).map(drop);
        self.record(status)?;
        self.vars.get_str(name)
    }

    // ── Updates ───────────────────────────────────────────────────────────────

    /// Overwrite an existing, mutable, integer-typed variable.
    pub fn set_int(&mut self, name: &str, value: i64) -> Result<()> {
        let result = self.update(name, Value::Int(value));
        self.record(result)
    }

    /// Overwrite an existing, mutable, string-typed variable.
    pub fn set_str(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        let value = value.into();
        let max = self.limits.max_text_len;
        let result = if value.len() > max {
            Err(Error::InvalidArgument(format!("string longer than {max} bytes")))
        } else {
            self.update(name, Value::Str(value))
        };
        self.record(result)
    }

    /// Host-side write: the variable must exist, be mutable, and already hold
    /// a value of the same type.
    fn update(&mut self, name: &str, value: Value) -> Result<()> {
        let var = self.vars.get_mut(name).ok_or_else(|| Error::VariableNotFound {
            name: name.to_owned(),
            line: None,
        })?;
        if var.is_const() {
            return Err(Error::ConstViolation { name: name.to_owned(), line: None });
        }
        if mem::discriminant(var.value()) != mem::discriminant(&value) {
            return Err(mismatch(name, value.type_name(), var.value()));
        }
        var.overwrite(value);
        Ok(())
    }

    // ── Saving ────────────────────────────────────────────────────────────────

    /// Serialize every variable as a script, one `set` line each, in creation
    /// order.
    pub fn to_script(&self) -> String {
        let mut out = String::new();
        for (name, var) in self.vars.iter() {
            if var.is_const() {
                out.push_str("const ");
            }
            out.push_str("set ");
            out.push_str(name);
            out.push_str(" = ");
            out.push_str(&var.value().to_literal());
            out.push('\n');
        }
        out
    }

    /// Write [`Config::to_script`] to a file, replacing its contents.
    pub fn save_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), vars = self.vars.len(), "saving");
        let result = std::fs::write(path, self.to_script()).map_err(|source| Error::Io {
            action: "write",
            path: path.to_owned(),
            source,
        });
        self.record(result)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn loaded(src: &str) -> Config {
        let mut cfg = Config::new();
        cfg.load_str(src).expect("load failed");
        cfg
    }

    #[test]
    fn default_limits() {
        let limits = Limits::default();
        assert_eq!(limits.max_variables, 128);
        assert_eq!(limits.max_name_len, 31);
        assert_eq!(limits.max_text_len, 1023);
        assert_eq!(limits.max_depth, 64);
    }

    #[test]
    fn limits_builder() {
        let limits = Limits::default()
            .max_variables(4)
            .max_name_len(8)
            .max_text_len(16)
            .max_depth(2);
        assert_eq!(
            limits,
            Limits { max_variables: 4, max_name_len: 8, max_text_len: 16, max_depth: 2 }
        );
        assert_eq!(Config::with_limits(limits).vars().capacity(), 4);
    }

    #[test]
    fn fresh_config_has_no_error() {
        let cfg = Config::new();
        assert_eq!(cfg.last_error(), NO_ERROR);
        assert!(cfg.vars().is_empty());
    }

    #[test]
    fn typed_getters() {
        let mut cfg = loaded("set x = 10\nset name = \"Hello World\"");
        assert_eq!(cfg.get_int("x").unwrap(), 10);
        assert_eq!(cfg.get_str("name").unwrap(), "Hello World");
        assert_eq!(cfg.get("x").unwrap(), &Value::Int(10));
        assert_eq!(cfg.get_int("name").unwrap_err().kind(), ErrorKind::TypeMismatch);
        assert_eq!(cfg.get_str("x").unwrap_err().kind(), ErrorKind::TypeMismatch);
        assert_eq!(cfg.get("missing").unwrap_err().kind(), ErrorKind::VariableNotFound);
    }

    #[test]
    fn last_error_tracks_latest_call() {
        let mut cfg = Config::new();
        let err = cfg.load_str("set a = 1\nset b = c").unwrap_err();
        assert_eq!(cfg.last_error(), err.to_string());
        assert_eq!(cfg.last_error(), "line 2: variable 'c' not found");

        cfg.get_int("a").unwrap();
        assert_eq!(cfg.last_error(), NO_ERROR);

        cfg.get_int("zzz").unwrap_err();
        assert_eq!(cfg.last_error(), "variable 'zzz' not found");
    }

    #[test]
    fn set_int_rules() {
        let mut cfg = loaded("const set max = 100\nset value = 50\nset name = \"n\"");
        assert_eq!(cfg.set_int("max", 200).unwrap_err().kind(), ErrorKind::ConstViolation);
        assert_eq!(cfg.get_int("max").unwrap(), 100);
        assert_eq!(cfg.set_int("name", 1).unwrap_err().kind(), ErrorKind::TypeMismatch);
        assert_eq!(cfg.set_int("nope", 1).unwrap_err().kind(), ErrorKind::VariableNotFound);
        cfg.set_int("value", 75).unwrap();
        assert_eq!(cfg.get_int("value").unwrap(), 75);
    }

    #[test]
    fn set_int_checks_const_before_type() {
        let mut cfg = loaded("const set title = \"fixed\"");
        assert_eq!(cfg.set_int("title", 1).unwrap_err().kind(), ErrorKind::ConstViolation);
    }

    #[test]
    fn set_int_does_not_create() {
        let mut cfg = Config::new();
        cfg.set_int("new", 1).unwrap_err();
        assert!(cfg.vars().is_empty());
    }

    #[test]
    fn set_str_rules() {
        let mut cfg = loaded("set name = \"old\"\nconst set id = \"x\"\nset n = 1");
        cfg.set_str("name", "new").unwrap();
        assert_eq!(cfg.get_str("name").unwrap(), "new");
        assert_eq!(cfg.set_str("id", "y").unwrap_err().kind(), ErrorKind::ConstViolation);
        assert_eq!(cfg.set_str("n", "y").unwrap_err().kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn set_str_respects_text_limit() {
        let mut cfg = Config::with_limits(Limits::default().max_text_len(3));
        cfg.load_str("set s = \"abc\"").unwrap();
        let err = cfg.set_str("s", "abcd").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(cfg.get_str("s").unwrap(), "abc");
    }

    #[test]
    fn to_script_format() {
        let cfg = loaded(
            "const set max = 100\nset value = -42\nset name = \"Test Config\"\n\
             set text = #%%%\nline1\nline2\n%%%#\n",
        );
        assert_eq!(
            cfg.to_script(),
            "const set max = 100\n\
             set value = -42\n\
             set name = \"Test Config\"\n\
             set text = #%%%\nline1\nline2\n%%%#\n"
        );
    }

    #[test]
    fn to_script_reloads_to_same_state() {
        let cfg = loaded("set a = 1\nconst set b = \"two\"\nset c = #%%%x\ny%%%#");
        let again = loaded(&cfg.to_script());
        assert_eq!(again.to_script(), cfg.to_script());
        assert!(again.vars().get("b").unwrap().is_const());
    }

    #[test]
    fn empty_store_saves_nothing() {
        assert_eq!(Config::new().to_script(), "");
    }

    #[test]
    fn load_file_missing() {
        let mut cfg = Config::new();
        let err = cfg.load_file("/nonexistent/dir/config.cfg").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(cfg.last_error().starts_with("cannot read /nonexistent/dir/config.cfg"));
    }

    #[test]
    fn loads_accumulate() {
        let mut cfg = loaded("set a = 1");
        cfg.load_str("set b = a").unwrap();
        assert_eq!(cfg.get_int("b").unwrap(), 1);
    }
}
