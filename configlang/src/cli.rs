//! Command-line front end for `cfgl`.
//!
//! Usage:
//!   cfgl [OPTIONS] [SCRIPT]...
//!
//! Scripts are loaded in order, then every `--eval` snippet, then every
//! `--set`.  `--get` prints single values; without `--get` or `--save` the
//! whole store is printed in script form.

use std::fmt::Write as _;
use std::path::PathBuf;

use clap::Parser;

use crate::config::{Config, Limits};
use crate::error::{Error, Result};
use crate::script::Value;

// ── Public types ──────────────────────────────────────────────────────────────

/// Parsed command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "cfgl", version, about = "Run configuration scripts and inspect the result")]
pub struct CliArgs {
    /// Script files, executed in order.
    #[arg(value_name = "SCRIPT")]
    pub scripts: Vec<PathBuf>,

    /// Script text to execute after the files.
    #[arg(short, long = "eval", value_name = "CODE")]
    pub eval: Vec<String>,

    /// Update an existing variable after loading.
    #[arg(short, long = "set", value_name = "NAME=VALUE", value_parser = parse_assignment)]
    pub set: Vec<(String, String)>,

    /// Print the value of a variable.
    #[arg(short, long = "get", value_name = "NAME")]
    pub get: Vec<String>,

    /// Save the final state to a file.
    #[arg(short = 'o', long = "save", value_name = "PATH")]
    pub save: Option<PathBuf>,

    /// Maximum number of variables.
    #[arg(long, env = "CFGL_MAX_VARS", default_value_t = Limits::default().max_variables)]
    pub max_vars: usize,

    /// Maximum variable name length in bytes.
    #[arg(long, env = "CFGL_MAX_NAME_LEN", default_value_t = Limits::default().max_name_len)]
    pub max_name_len: usize,

    /// Maximum string length in bytes.
    #[arg(long, env = "CFGL_MAX_TEXT_LEN", default_value_t = Limits::default().max_text_len)]
    pub max_text_len: usize,

    /// Maximum nesting of executed `if` blocks.
    #[arg(long, env = "CFGL_MAX_DEPTH", default_value_t = Limits::default().max_depth)]
    pub max_depth: usize,

    /// Log interpreter activity to stderr.
    #[arg(short, long, env = "CFGL_VERBOSE")]
    pub verbose: bool,
}

impl CliArgs {
    pub fn limits(&self) -> Limits {
        Limits::default()
            .max_variables(self.max_vars)
            .max_name_len(self.max_name_len)
            .max_text_len(self.max_text_len)
            .max_depth(self.max_depth)
    }
}

/// Split `NAME=VALUE` at the first `=`.
pub fn parse_assignment(s: &str) -> std::result::Result<(String, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{s}'"))?;
    if name.is_empty() {
        return Err("variable name cannot be empty".to_owned());
    }
    Ok((name.to_owned(), value.to_owned()))
}

// ── Running ───────────────────────────────────────────────────────────────────

/// Execute the command and return what should be printed on stdout.
pub fn run(args: &CliArgs) -> Result<String> {
    let mut cfg = Config::with_limits(args.limits());

    for path in &args.scripts {
        cfg.load_file(path)?;
    }
    for code in &args.eval {
        cfg.load_str(code)?;
    }
    for (name, value) in &args.set {
        assign(&mut cfg, name, value)?;
    }

    let mut out = String::new();
    for name in &args.get {
        let value = cfg.get(name)?;
        let _ = writeln!(out, "{value}");
    }
    if let Some(path) = &args.save {
        cfg.save_file(path)?;
    }
    if args.get.is_empty() && args.save.is_none() {
        out.push_str(&cfg.to_script());
    }
    Ok(out)
}

/// Apply `--set`: the text is parsed as an integer when the variable holds one.
fn assign(cfg: &mut Config, name: &str, text: &str) -> Result<()> {
    if matches!(cfg.get(name)?, Value::Int(_)) {
        let n = text
            .parse()
            .map_err(|_| Error::InvalidArgument(format!("'{text}' is not an integer")))?;
        cfg.set_int(name, n)
    } else {
        cfg.set_str(name, text)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
