use crate::error::LexerError;
use crate::grammar::{Symbol, SymbolSet};
use crate::lexer::{Lexer, Matcher, Rule};
use compact_str::CompactString;
use regex::Regex;
use smallvec::SmallVec;

/// Builder for [`Lexer`]s.
///
/// Rules are tried together at every position: the longest match wins and
/// the earlier rule wins a tie, so keywords registered before an identifier
/// pattern take priority over it for equal-length matches.
#[derive(Debug, Clone, Default)]
pub struct LexerBuilder {
    rules: SmallVec<[LexRule; 16]>,
    trivia_kinds: SymbolSet,
}

#[derive(Debug, Clone)]
pub struct LexRule {
    pub pattern: Pattern,
    pub kind: CompactString,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    Literal(CompactString),
    Regex(CompactString),
}

impl LexerBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn token(mut self, kind: &str, pattern: Pattern) -> Self {
        self.rules.push(LexRule {
            pattern,
            kind: kind.into(),
        });
        self
    }

    /// A literal rule whose kind is its own text.
    #[must_use]
    pub fn keyword(self, text: &str) -> Self {
        self.token(text, Pattern::Literal(text.into()))
    }

    /// Matches of `kind` are dropped from the token stream.
    #[must_use]
    pub fn trivia(mut self, kind: &str) -> Self {
        self.trivia_kinds.insert(Symbol::terminal(kind));
        self
    }

    /// Build the lexer from the configured rules.
    ///
    /// # Errors
    ///
    /// Returns [`LexerError::InvalidPattern`] if a regex does not compile.
    pub fn build(self) -> Result<Lexer, LexerError> {
        let rules = self
            .rules
            .into_iter()
            .map(|rule| {
                let matcher = match rule.pattern {
                    Pattern::Literal(text) => Matcher::Literal(text),
                    Pattern::Regex(pattern) => Matcher::Regex(
                        Regex::new(&format!("^(?:{pattern})")).map_err(|source| {
                            LexerError::InvalidPattern {
                                kind: rule.kind.to_string(),
                                source,
                            }
                        })?,
                    ),
                };
                Ok::<_, LexerError>(Rule {
                    kind: Symbol::terminal(rule.kind),
                    matcher,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(rules = rules.len(), "compiled lexer");

        Ok(Lexer {
            rules,
            trivia_kinds: self.trivia_kinds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexer_builder_new() {
        let builder = LexerBuilder::new();
        assert!(builder.rules.is_empty());
        assert!(builder.trivia_kinds.is_empty());
    }

    #[test]
    fn test_lexer_builder_token_order() {
        let builder = LexerBuilder::new()
            .token("num", Pattern::Regex("[0-9]+".into()))
            .keyword("if");

        assert_eq!(builder.rules.len(), 2);
        assert_eq!(builder.rules[0].kind, "num");
        assert_eq!(builder.rules[1].pattern, Pattern::Literal("if".into()));
    }

    #[test]
    fn test_lexer_builder_trivia() {
        let builder = LexerBuilder::new().trivia("ws");
        assert!(builder.trivia_kinds.contains(&Symbol::terminal("ws")));
    }

    #[test]
    fn test_invalid_regex() {
        let result = LexerBuilder::new()
            .token("bad", Pattern::Regex("(".into()))
            .build();
        match result {
            Err(LexerError::InvalidPattern { kind, .. }) => assert_eq!(kind, "bad"),
            other => panic!("expected InvalidPattern, got {other:?}"),
        }
    }
}
