//! The configuration scripting language.
//!
//! Scripts are executed as they are parsed: the [`Interpreter`] reads tokens
//! from the [`Lexer`](lexer::Lexer) and applies each statement to a
//! [`VarStore`](crate::var::VarStore) straight away.
//!
//! - `set name = value` / `const set name = value`
//! - values: integers, `"strings"`, `#%%%` multi-line blocks `%%%#`, or
//!   another variable's name (copied by value)
//! - `if a > 1 { statement } { else-statement }`, with chained `if`s
//! - `#` comments
//!
//! # Quick start
//!
//! ```rust
//! use configlang::config::Limits;
//! use configlang::script::Interpreter;
//! use configlang::var::VarStore;
//!
//! let mut vars = VarStore::new();
//! Interpreter::new("set x = 6\nif x > 5 { set big = 1 }", &mut vars, Limits::default())
//!     .run()
//!     .unwrap();
//! assert_eq!(vars.get_int("big").unwrap(), 1);
//! ```

pub mod interp;
pub mod lexer;
pub mod value;

// Re-exports for convenience.
pub use interp::Interpreter;
pub use value::Value;
