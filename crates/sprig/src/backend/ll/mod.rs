mod config;
mod parser;
mod table;

pub use config::LlConfig;
pub use parser::{ParseMetrics, ParseOutput, parse};
pub use table::{Cell, ParseTable, TableConflict};

use crate::error::{LlError, ParseError};
use crate::grammar::{ClosureTables, Grammar};
use crate::lexer::Token;

/// LL(1) parser for top-down predictive parsing.
///
/// Construction computes the closure tables and the parse table once and
/// rejects grammars whose table has conflicts; parsing is then a pure
/// function of the token slice.
///
/// # Example
///
/// ```rust
/// use sprig::backend::ll::{LlConfig, LlParser};
/// use sprig::grammar::parse_grammar;
/// use sprig::lexer::Token;
///
/// let grammar = parse_grammar("S -> ( S ) S | ε")?;
/// let parser = LlParser::new(grammar, LlConfig::default())?;
///
/// let tokens = [Token::keyword("("), Token::keyword(")"), Token::eof()];
/// let output = parser.parse(&tokens)?;
/// assert_eq!(output.tree.leaf_values(), ["(", ")"]);
/// # Ok::<(), sprig::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct LlParser {
    grammar: Grammar,
    closure: ClosureTables,
    table: ParseTable,
    config: LlConfig,
}

impl LlParser {
    /// Analyze `grammar` and build its parse table.
    ///
    /// # Errors
    ///
    /// Returns [`LlError::AmbiguousGrammar`] if the grammar is not LL(1).
    pub fn new(grammar: Grammar, config: LlConfig) -> Result<Self, LlError> {
        let closure = ClosureTables::compute(&grammar);
        let table = ParseTable::build(&grammar, &closure);
        table.validate()?;

        Ok(Self {
            grammar,
            closure,
            table,
            config,
        })
    }

    /// Parse a token stream.
    ///
    /// # Errors
    ///
    /// See [`parse`]. Additionally returns [`ParseError::TrailingInput`] when
    /// tokens remain and [`LlConfig::reject_trailing_input`] is set.
    pub fn parse<'t>(&self, tokens: &'t [Token]) -> Result<ParseOutput<'t>, ParseError> {
        let output = parse(&self.grammar, &self.table, tokens, &self.config)?;

        if self.config.reject_trailing_input
            && let Some(found) = output.leftover.first()
        {
            return Err(ParseError::TrailingInput {
                found: found.clone(),
                position: output.metrics.tokens_consumed,
                remaining: output.leftover.len(),
            });
        }

        Ok(output)
    }

    #[must_use]
    pub const fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    #[must_use]
    pub const fn closure(&self) -> &ClosureTables {
        &self.closure
    }

    #[must_use]
    pub const fn table(&self) -> &ParseTable {
        &self.table
    }

    #[must_use]
    pub const fn config(&self) -> &LlConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::GrammarBuilder;

    fn balanced(config: LlConfig) -> LlParser {
        let grammar = GrammarBuilder::new()
            .rule("S", ["a", "S", "b"])
            .epsilon("S")
            .build()
            .unwrap();
        LlParser::new(grammar, config).unwrap()
    }

    #[test]
    fn test_rejects_conflicting_grammar() {
        let grammar = GrammarBuilder::new()
            .rule("S", ["a"])
            .rule("S", ["a", "b"])
            .build()
            .unwrap();
        assert!(matches!(
            LlParser::new(grammar, LlConfig::default()),
            Err(LlError::AmbiguousGrammar { .. })
        ));
    }

    #[test]
    fn test_trailing_input_is_rejected_by_default() {
        let parser = balanced(LlConfig::default());
        let tokens = [Token::keyword("a"), Token::keyword("b"), Token::keyword("b")];
        match parser.parse(&tokens) {
            Err(ParseError::TrailingInput {
                position,
                remaining,
                ..
            }) => {
                assert_eq!(position, 2);
                assert_eq!(remaining, 1);
            }
            other => panic!("expected TrailingInput, got {other:?}"),
        }
    }

    #[test]
    fn test_trailing_input_can_be_returned() {
        let parser = balanced(LlConfig {
            reject_trailing_input: false,
            ..LlConfig::default()
        });
        let tokens = [Token::keyword("a"), Token::keyword("b"), Token::keyword("b")];
        let output = parser.parse(&tokens).unwrap();
        assert_eq!(output.leftover.len(), 1);
    }

    #[test]
    fn test_parser_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<LlParser>();
    }
}
