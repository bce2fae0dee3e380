//! Streaming script interpreter.
//!
//! The [`Interpreter`] pulls tokens from the [`Lexer`] with a two-token
//! window (current + peek) and executes each statement the moment it is
//! recognised.  No syntax tree is built: a false branch is skipped token by
//! token, never parsed.
//!
//! Grammar:
//!
//! ```text
//! program    := (NEWLINE | statement)* EOF
//! statement  := ["const"] "set" IDENT "=" value
//!             | "if" condition block tail?
//! tail       := "if" condition block tail?     (chained, always evaluated)
//!             | block                          (else)
//! block      := "{" statement "}"
//! value      := INT | STRING | IDENT
//! condition  := operand comparator operand
//! operand    := INT | IDENT                    (integer variable)
//! ```

use super::lexer::{Lexeme, Lexer, Token};
use super::value::Value;
use crate::config::Limits;
use crate::error::{Error, Result};
use crate::var::{VarStore, Variable};

// ── Comparison ────────────────────────────────────────────────────────────────

/// Binary comparator of an `if` condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Gt,
    Lt,
    Ge,
    Le,
    Eq,
    Ne,
}

impl Comparison {
    pub fn from_token(token: &Token) -> Option<Self> {
        let cmp = match token {
            Token::Gt => Comparison::Gt,
            Token::Lt => Comparison::Lt,
            Token::Ge => Comparison::Ge,
            Token::Le => Comparison::Le,
            Token::Eq => Comparison::Eq,
            Token::Ne => Comparison::Ne,
            _ => return None,
        };
        Some(cmp)
    }

    pub fn holds(self, lhs: i64, rhs: i64) -> bool {
        match self {
            Comparison::Gt => lhs > rhs,
            Comparison::Lt => lhs < rhs,
            Comparison::Ge => lhs >= rhs,
            Comparison::Le => lhs <= rhs,
            Comparison::Eq => lhs == rhs,
            Comparison::Ne => lhs != rhs,
        }
    }
}

// ── Interpreter ───────────────────────────────────────────────────────────────

/// Executes one script against a variable store.
///
/// Effects are applied in place as statements complete; the first failure
/// stops execution and everything done before it stays in the store.
pub struct Interpreter<'s, 'v> {
    lexer: Lexer<'s>,
    current: Lexeme,
    peek: Lexeme,
    vars: &'v mut VarStore,
    depth: usize,
    max_depth: usize,
}

impl<'s, 'v> Interpreter<'s, 'v> {
    pub fn new(src: &'s str, vars: &'v mut VarStore, limits: Limits) -> Self {
        let mut lexer = Lexer::with_limits(src, limits);
        let current = lexer.next_lexeme();
        let peek = lexer.next_lexeme();
        Interpreter {
            lexer,
            current,
            peek,
            vars,
            depth: 0,
            max_depth: limits.max_depth,
        }
    }

    /// Run the whole program.
    pub fn run(mut self) -> Result<()> {
        loop {
            self.skip_newlines();
            if self.current.token == Token::Eof {
                return Ok(());
            }
            self.statement()?;
        }
    }

    // ── Token window ──────────────────────────────────────────────────────────

    /// Shift the window by one token and return the token that left it.
    fn advance(&mut self) -> Lexeme {
        let next = std::mem::replace(&mut self.peek, self.lexer.next_lexeme());
        std::mem::replace(&mut self.current, next)
    }

    fn expect(&mut self, token: Token, what: &str) -> Result<()> {
        if self.current.token != token {
            return Err(self.unexpected(what));
        }
        self.advance();
        Ok(())
    }

    fn skip_newlines(&mut self) {
        while self.current.token == Token::Newline {
            self.advance();
        }
    }

    /// Parse error for the current token.  Lexical errors report their own
    /// reason.
    fn unexpected(&self, expected: &str) -> Error {
        let Lexeme { token, line } = &self.current;
        match token {
            Token::Error(reason) => Error::parse(*line, reason.clone()),
            other => Error::parse(*line, format!("expected {expected}, found {}", other.describe())),
        }
    }

    // ── Statements ────────────────────────────────────────────────────────────

    fn statement(&mut self) -> Result<()> {
        self.skip_newlines();
        match self.current.token {
            Token::Set => self.assignment(false),
            Token::Const => {
                self.advance();
                if self.current.token != Token::Set {
                    return Err(self.unexpected("'set' after 'const'"));
                }
                self.assignment(true)
            }
            Token::If => self.conditional(),
            _ => Err(self.unexpected("a statement")),
        }
    }

    /// `["const"] "set" IDENT "=" value`; the `const` keyword is consumed.
    fn assignment(&mut self, constant: bool) -> Result<()> {
        self.advance();
        let Token::Ident(name) = &self.current.token else {
            return Err(self.unexpected("a variable name"));
        };
        let name = name.clone();
        let line = self.current.line;
        self.advance();
        self.expect(Token::Assign, "'='")?;

        if self.vars.get(&name).is_some_and(Variable::is_const) {
            return Err(Error::ConstViolation { name, line: Some(line) });
        }
        let value = self.value()?;

        // Constness is fixed at creation: `const set` on an existing mutable
        // variable only overwrites it.
        match self.vars.get_mut(&name) {
            Some(var) => var.overwrite(value),
            None => {
                self.vars.create(name, value, constant).map_err(|e| e.at(line))?;
            }
        }
        Ok(())
    }

    /// A literal or a copy of another variable's current value.
    fn value(&mut self) -> Result<Value> {
        let value = match &self.current.token {
            Token::Int(n) => Value::Int(*n),
            Token::Str(s) | Token::Block(s) => Value::Str(s.clone()),
            Token::Ident(name) => self
                .vars
                .lookup(name)
                .map_err(|e| e.at(self.current.line))?
                .value()
                .clone(),
            _ => return Err(self.unexpected("a value")),
        };
        self.advance();
        Ok(value)
    }

    /// `"if" condition block tail?`
    ///
    /// A chained `if` directly after a closing brace is evaluated no matter
    /// how the previous condition came out; only a bare block is an else.
    fn conditional(&mut self) -> Result<()> {
        loop {
            let line = self.advance().line;
            let holds = self.condition()?;
            tracing::trace!(line, holds, "if");
            self.block(holds)?;
            match self.current.token {
                Token::If => continue,
                Token::LBrace => return self.block(!holds),
                _ => return Ok(()),
            }
        }
    }

    fn condition(&mut self) -> Result<bool> {
        let lhs = self.operand()?;
        let Some(cmp) = Comparison::from_token(&self.current.token) else {
            return Err(self.unexpected("a comparison operator"));
        };
        self.advance();
        let rhs = self.operand()?;
        Ok(cmp.holds(lhs, rhs))
    }

    fn operand(&mut self) -> Result<i64> {
        let n = match &self.current.token {
            Token::Int(n) => *n,
            Token::Ident(name) => self
                .vars
                .get_int(name)
                .map_err(|e| e.at(self.current.line))?,
            _ => return Err(self.unexpected("an identifier or integer")),
        };
        self.advance();
        Ok(n)
    }

    /// `"{" statement "}"`, executed only when `run` is true.
    ///
    /// Taken blocks nest through recursion and are bounded by
    /// `Limits::max_depth`.
    fn block(&mut self, run: bool) -> Result<()> {
        self.expect(Token::LBrace, "'{'")?;
        if run {
            if self.depth >= self.max_depth {
                let max = self.max_depth;
                return Err(Error::parse(self.current.line, format!("nesting deeper than {max}")));
            }
            self.depth += 1;
            let result = self.statement();
            self.depth -= 1;
            result?;
            self.skip_newlines();
        } else {
            self.skip_block();
        }
        self.expect(Token::RBrace, "'}'")
    }

    /// Step over a block body up to the first `}` without evaluating it.
    ///
    /// Braces inside the body are not balanced: a nested block's `}` closes
    /// the skipped one.
    fn skip_block(&mut self) {
        let line = self.current.line;
        while !matches!(self.current.token, Token::RBrace | Token::Eof) {
            self.advance();
        }
        tracing::trace!(line, "skipped block");
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
