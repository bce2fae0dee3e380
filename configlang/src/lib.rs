//! Embeddable interpreter for a minimal configuration language.
//!
//! A script is a list of `set` statements, optionally `const`, with simple
//! `if` conditions.  Running it fills a typed variable store that the host
//! then queries and updates through [`Config`].

pub mod cli;
pub mod config;
pub mod error;
pub mod script;
pub mod var;

pub use config::{Config, Limits};
pub use error::{Error, ErrorKind, Result};
pub use script::Value;
