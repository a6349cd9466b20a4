//! # Lexer Module
//!
//! Tokenization of source text into the [`Token`] stream the parser reads.
//!
//! ## Overview
//!
//! - **Pattern matching**: literal strings and anchored regex patterns
//! - **Maximal munch**: the longest match wins, the earlier rule breaks ties
//! - **Trivia handling**: whitespace and comments are dropped
//! - **End of input**: an [`Token::eof`] token is appended
//!
//! ## Usage
//!
//! ```rust
//! use sprig::{LexerBuilder, lexer::Pattern};
//!
//! let lexer = LexerBuilder::new()
//!     .token("ws", Pattern::Regex(r"\s+".into()))
//!     .keyword("if")
//!     .token("ident", Pattern::Regex("[a-z]+".into()))
//!     .token("num", Pattern::Regex(r"\d+".into()))
//!     .trivia("ws")
//!     .build()?;
//!
//! let tokens = lexer.tokenize("if iffy 42")?;
//! let kinds: Vec<_> = tokens.iter().map(|t| t.kind.to_string()).collect();
//! assert_eq!(kinds, ["if", "ident", "num", "$"]);
//! # Ok::<(), sprig::LexerError>(())
//! ```

pub mod builder;
pub mod token;

pub use builder::{LexRule, LexerBuilder, Pattern};
pub use token::*;

use crate::error::LexerError;
use crate::grammar::{Symbol, SymbolSet};
use compact_str::CompactString;

#[derive(Debug, Clone)]
pub(crate) enum Matcher {
    Literal(CompactString),
    Regex(regex::Regex),
}

impl Matcher {
    fn match_len(&self, rest: &str) -> usize {
        match self {
            Self::Literal(text) => {
                if rest.starts_with(text.as_str()) {
                    text.len()
                } else {
                    0
                }
            }
            Self::Regex(regex) => regex.find(rest).map_or(0, |m| m.end()),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Rule {
    pub(crate) kind: Symbol,
    pub(crate) matcher: Matcher,
}

/// Compiled lexer; see [`LexerBuilder`].
#[derive(Debug, Clone)]
pub struct Lexer {
    pub(crate) rules: Vec<Rule>,
    pub(crate) trivia_kinds: SymbolSet,
}

impl Lexer {
    /// Tokenize `input`, appending an end-of-input token.
    ///
    /// # Errors
    ///
    /// Returns [`LexerError::UnexpectedChar`] at the first position no rule
    /// matches.
    pub fn tokenize(&self, input: &str) -> Result<Vec<Token>, LexerError> {
        let mut tokens = Vec::new();
        let mut pos = 0;

        while pos < input.len() {
            let rest = &input[pos..];

            // Maximal munch: strictly longer matches replace earlier ones
            let mut best: Option<(&Rule, usize)> = None;
            for rule in &self.rules {
                let len = rule.matcher.match_len(rest);
                if len > 0 && best.is_none_or(|(_, best_len)| len > best_len) {
                    best = Some((rule, len));
                }
            }

            let Some((rule, len)) = best else {
                let ch = rest.chars().next().unwrap_or_default();
                return Err(LexerError::UnexpectedChar { ch, offset: pos });
            };

            if !self.trivia_kinds.contains(&rule.kind) {
                tokens.push(Token {
                    kind: rule.kind.clone(),
                    lexeme: rest[..len].into(),
                    offset: pos,
                });
            }
            pos += len;
        }

        tokens.push(Token::eof().at(input.len()));
        tracing::trace!(count = tokens.len(), "tokenized input");
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexer() -> Lexer {
        LexerBuilder::new()
            .token("ws", Pattern::Regex(r"\s+".into()))
            .keyword("while")
            .keyword(":=")
            .token("relop", Pattern::Regex("<=|<".into()))
            .token("var", Pattern::Regex("[a-z]+".into()))
            .trivia("ws")
            .build()
            .unwrap()
    }

    fn kinds(tokens: &[Token]) -> Vec<String> {
        tokens.iter().map(|t| t.kind.to_string()).collect()
    }

    #[test]
    fn test_keyword_wins_tie() {
        let tokens = lexer().tokenize("while").unwrap();
        assert_eq!(kinds(&tokens), ["while", "$"]);
    }

    #[test]
    fn test_longest_match_wins() {
        let tokens = lexer().tokenize("whilex <= y").unwrap();
        assert_eq!(kinds(&tokens), ["var", "relop", "var", "$"]);
        assert_eq!(tokens[0].lexeme, "whilex");
        assert_eq!(tokens[1].lexeme, "<=");
        assert_eq!(tokens[2].offset, 10);
    }

    #[test]
    fn test_eof_offset() {
        let tokens = lexer().tokenize("x ").unwrap();
        assert_eq!(tokens.last().unwrap().offset, 2);
        assert!(lexer().tokenize("").unwrap()[0].is_eof());
    }

    #[test]
    fn test_unexpected_char() {
        match lexer().tokenize("x := 9") {
            Err(LexerError::UnexpectedChar { ch, offset }) => {
                assert_eq!(ch, '9');
                assert_eq!(offset, 5);
            }
            other => panic!("expected UnexpectedChar, got {other:?}"),
        }
    }
}
