use crate::grammar::Symbol;
use compact_str::CompactString;
use std::fmt;

/// A token produced by the lexer and consumed by the parser.
///
/// The parser only looks at [`kind`](Token::kind), which must be a terminal
/// of the grammar or [`Symbol::Eof`]. The lexeme becomes the value of the
/// leaf node the token is matched against.
///
/// # Example
///
/// ```rust
/// use sprig::lexer::Token;
/// use sprig::grammar::Symbol;
///
/// let token = Token::new("num", "42").at(7);
/// assert_eq!(token.kind, Symbol::terminal("num"));
/// assert_eq!(token.to_string(), "num(42)");
/// assert!(Token::eof().is_eof());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    /// Terminal kind (e.g. `num`, `:=`)
    pub kind: Symbol,
    /// The source text that this token represents
    pub lexeme: CompactString,
    /// Byte offset of the token in the source text
    pub offset: usize,
}

impl Token {
    #[must_use]
    pub fn new(kind: &str, lexeme: impl Into<CompactString>) -> Self {
        Self {
            kind: Symbol::terminal(kind),
            lexeme: lexeme.into(),
            offset: 0,
        }
    }

    /// A token whose lexeme is its kind, as for keywords and punctuation.
    #[must_use]
    pub fn keyword(kind: &str) -> Self {
        Self::new(kind, kind)
    }

    /// End-of-input marker.
    #[must_use]
    pub fn eof() -> Self {
        Self {
            kind: Symbol::Eof,
            lexeme: CompactString::default(),
            offset: 0,
        }
    }

    #[must_use]
    pub fn at(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    #[must_use]
    pub const fn is_eof(&self) -> bool {
        self.kind.is_eof()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.lexeme.is_empty() || self.lexeme == self.kind.name() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}({})", self.kind, self.lexeme)
        }
    }
}
