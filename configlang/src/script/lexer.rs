//! Script lexer.
//!
//! Turns source text into [`Lexeme`]s on demand.  The lexer knows nothing
//! about the grammar; line breaks are tokens in their own right because they
//! separate statements.  Malformed input never aborts scanning: it produces a
//! [`Token::Error`] carrying the reason, and the parser decides what to do
//! with it.
//!
//! | Input | Token |
//! |-------|-------|
//! | `# text` | comment, skipped to end of line |
//! | `#%%%` … `%%%#` | [`Token::Block`], content verbatim |
//! | `"text` … `"` | [`Token::Str`], ends early at a line break or end of input |
//! | `-12`, `42` | [`Token::Int`] |
//! | `name`, `set`, `const`, `if` | [`Token::Ident`] or a keyword |
//! | `{ } = == != > >= < <=` | punctuation |

use crate::config::Limits;

const BLOCK_OPEN: &str = "#%%%";
const BLOCK_CLOSE: &str = "%%%#";

// ── Token ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    // Literals
    Ident(String),
    Int(i64),
    Str(String),
    /// Multi-line `#%%%` … `%%%#` string.
    Block(String),

    // Keywords
    Set,
    Const,
    If,

    // Punctuation
    LBrace,
    RBrace,
    Assign, // =
    Gt,
    Lt,
    Ge, // >=
    Le, // <=
    Eq, // ==
    Ne, // !=

    Newline,
    /// Unrecognised or malformed input, with a human-readable reason.
    Error(String),
    Eof,
}

impl Token {
    /// Short description used in parser diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Token::Ident(name) => format!("identifier '{name}'"),
            Token::Int(n) => format!("integer {n}"),
            Token::Str(_) => "string literal".to_owned(),
            Token::Block(_) => "multi-line string".to_owned(),
            Token::Set => "'set'".to_owned(),
            Token::Const => "'const'".to_owned(),
            Token::If => "'if'".to_owned(),
            Token::LBrace => "'{'".to_owned(),
            Token::RBrace => "'}'".to_owned(),
            Token::Assign => "'='".to_owned(),
            Token::Gt => "'>'".to_owned(),
            Token::Lt => "'<'".to_owned(),
            Token::Ge => "'>='".to_owned(),
            Token::Le => "'<='".to_owned(),
            Token::Eq => "'=='".to_owned(),
            Token::Ne => "'!='".to_owned(),
            Token::Newline => "end of line".to_owned(),
            Token::Error(reason) => reason.clone(),
            Token::Eof => "end of input".to_owned(),
        }
    }
}

/// A token together with the 1-based line it starts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme {
    pub token: Token,
    pub line: usize,
}

// ── Lexer ─────────────────────────────────────────────────────────────────────

pub struct Lexer<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    line: usize,
    limits: Limits,
}

impl<'a> Lexer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self::with_limits(src, Limits::default())
    }

    pub fn with_limits(src: &'a str, limits: Limits) -> Self {
        Lexer {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            line: 1,
            limits,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek2(&self) -> Option<u8> {
        self.bytes.get(self.pos + 1).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let ch = self.peek();
        if let Some(c) = ch {
            self.pos += 1;
            if c == b'\n' {
                self.line += 1;
            }
        }
        ch
    }

    fn eat(&mut self, ch: u8) -> bool {
        if self.peek() == Some(ch) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\r')) {
            self.pos += 1;
        }
    }

    /// Skip a `#` comment up to (not including) the line break.
    fn skip_comment(&mut self) {
        while !matches!(self.peek(), None | Some(b'\n')) {
            self.pos += 1;
        }
    }

    /// Produce the next token.  Returns [`Token::Eof`] forever once the input
    /// is exhausted.
    pub fn next_lexeme(&mut self) -> Lexeme {
        loop {
            self.skip_ws();
            if self.peek() == Some(b'#') && !self.rest().starts_with(BLOCK_OPEN) {
                self.skip_comment();
                continue;
            }
            let line = self.line;
            let token = self.next_token();
            return Lexeme { token, line };
        }
    }

    fn next_token(&mut self) -> Token {
        let Some(ch) = self.peek() else {
            return Token::Eof;
        };

        match ch {
            b'\n' => {
                self.advance();
                Token::Newline
            }
            b'#' => {
                self.pos += BLOCK_OPEN.len();
                self.read_block()
            }
            b'"' => {
                self.pos += 1;
                self.read_string()
            }
            b'0'..=b'9' => self.read_number(),
            b'-' if matches!(self.peek2(), Some(b'0'..=b'9')) => self.read_number(),
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.read_ident(),
            b'=' => {
                self.pos += 1;
                if self.eat(b'=') {
                    Token::Eq
                } else {
                    Token::Assign
                }
            }
            b'>' => {
                self.pos += 1;
                if self.eat(b'=') {
                    Token::Ge
                } else {
                    Token::Gt
                }
            }
            b'<' => {
                self.pos += 1;
                if self.eat(b'=') {
                    Token::Le
                } else {
                    Token::Lt
                }
            }
            b'!' => {
                self.pos += 1;
                if self.eat(b'=') {
                    Token::Ne
                } else {
                    Token::Error("expected '=' after '!'".to_owned())
                }
            }
            b'{' => {
                self.pos += 1;
                Token::LBrace
            }
            b'}' => {
                self.pos += 1;
                Token::RBrace
            }
            _ => {
                // Step over the whole character so multi-byte input stays on
                // a char boundary.
                let c = self.rest().chars().next().unwrap_or(char::REPLACEMENT_CHARACTER);
                self.pos += c.len_utf8();
                Token::Error(format!("unexpected character {c:?}"))
            }
        }
    }

    /// Read the body of a `#%%%` block; the opener is already consumed.
    fn read_block(&mut self) -> Token {
        let Some(len) = self.rest().find(BLOCK_CLOSE) else {
            while self.advance().is_some() {}
            return Token::Error(format!("unterminated multi-line string (missing '{BLOCK_CLOSE}')"));
        };
        let start = self.pos;
        for _ in 0..len {
            self.advance();
        }
        let text = &self.src[start..self.pos];
        self.pos += BLOCK_CLOSE.len();
        self.check_text(text).unwrap_or_else(|| Token::Block(text.to_owned()))
    }

    /// Read a double-quoted string; the opening quote is already consumed.
    ///
    /// A line break or end of input closes the string without error.  The
    /// line break itself is left for the next token.
    fn read_string(&mut self) -> Token {
        let start = self.pos;
        while !matches!(self.peek(), None | Some(b'"' | b'\n')) {
            self.pos += 1;
        }
        let text = &self.src[start..self.pos];
        self.eat(b'"');
        self.check_text(text).unwrap_or_else(|| Token::Str(text.to_owned()))
    }

    fn check_text(&self, text: &str) -> Option<Token> {
        let max = self.limits.max_text_len;
        (text.len() > max).then(|| Token::Error(format!("string longer than {max} bytes")))
    }

    fn read_number(&mut self) -> Token {
        let start = self.pos;
        self.eat(b'-');
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
        let text = &self.src[start..self.pos];
        match text.parse() {
            Ok(n) => Token::Int(n),
            Err(_) => Token::Error(format!("integer literal {text} out of range")),
        }
    }

    fn read_ident(&mut self) -> Token {
        let start = self.pos;
        while matches!(
            self.peek(),
            Some(b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_')
        ) {
            self.pos += 1;
        }
        let text = &self.src[start..self.pos];
        match text {
            "set" => Token::Set,
            "const" => Token::Const,
            "if" => Token::If,
            _ if text.len() > self.limits.max_name_len => Token::Error(format!(
                "name '{text}' longer than {} bytes",
                self.limits.max_name_len
            )),
            _ => Token::Ident(text.to_owned()),
        }
    }

    /// Scan the whole input, ending with (and including) [`Token::Eof`].
    pub fn tokenize(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let t = self.next_lexeme().token;
            let done = t == Token::Eof;
            tokens.push(t);
            if done {
                break;
            }
        }
        tokens
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
