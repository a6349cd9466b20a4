//! # Toy Language
//!
//! A small imperative language: assignments, `skip`, sequencing with `;`,
//! `if … then … else … fi` and `while … do …`, over integer arithmetic and
//! boolean conditions.
//!
//! The language is defined by [`GRAMMAR`], an LL(1) grammar whose operator
//! precedence is stratified into `E`/`M`/`F` (arithmetic) and `B`/`C`
//! (booleans), with helper nonterminals `X'` for repetition. [`Pipeline`]
//! runs lexer, parser and reducer, and [`cst::Program`] is the typed result.
//!
//! ```rust
//! use sprig::lang;
//!
//! let program = lang::compile_to_cst("if x < 1 then skip else x := x - 1 fi")?;
//! assert_eq!(program.to_string(), "if x < 1 then skip else x := x - 1 fi");
//! # Ok::<(), sprig::Error>(())
//! ```

pub mod cst;

pub use cst::Program;

use crate::backend::ll::{LlConfig, LlParser};
use crate::error::{Error, GrammarError, LexerError};
use crate::grammar::{Grammar, parse_grammar};
use crate::lexer::{Lexer, LexerBuilder, Pattern, Token};
use crate::reduce::{ReduceConfig, TreeReducer};
use crate::syntax::Tree;

/// Grammar of the toy language in the textual grammar format.
pub const GRAMMAR: &str = "\
# statements
S  -> T S'
S' -> ; T S' | ε
T  -> skip | var := E | if B then S else S fi | while B do T

# conditions
B  -> C B'
B' -> bop C B' | ε
C  -> true | false | not C | E relop E

# arithmetic
E  -> M E'
E' -> aop M E' | ε
M  -> F M'
M' -> mop F M' | ε
F  -> var | num | ( E )
";

const KEYWORDS: [&str; 14] = [
    "skip", "if", "then", "else", "fi", "while", "do", "not", "true", "false", ":=", ";", "(", ")",
];

/// The toy-language grammar.
///
/// # Errors
///
/// Only fails if [`GRAMMAR`] itself is malformed.
pub fn grammar() -> Result<Grammar, GrammarError> {
    parse_grammar(GRAMMAR)
}

/// The toy-language lexer.
///
/// Keywords are registered before `var`, so an identifier spelled like a
/// keyword lexes as the keyword while longer identifiers (`done`) stay
/// identifiers.
///
/// # Errors
///
/// Only fails if one of the built-in patterns is invalid.
pub fn lexer() -> Result<Lexer, LexerError> {
    let mut builder = LexerBuilder::new()
        .token("whitespace", Pattern::Regex(r"\s+".into()))
        .trivia("whitespace");
    for keyword in KEYWORDS {
        builder = builder.keyword(keyword);
    }
    builder
        .token("relop", Pattern::Regex("<=|>=|!=|=|<|>".into()))
        .token("bop", Pattern::Regex(r"&&|\|\|".into()))
        .token("aop", Pattern::Regex("[+-]".into()))
        .token("mop", Pattern::Regex("[*/]".into()))
        .token("num", Pattern::Regex("[0-9]+".into()))
        .token("var", Pattern::Regex("[a-zA-Z]+".into()))
        .build()
}

/// An [`LlParser`] for the toy-language grammar.
///
/// # Errors
///
/// Only fails if the built-in grammar is not LL(1).
pub fn parser() -> Result<LlParser, Error> {
    Ok(LlParser::new(grammar()?, LlConfig::default())?)
}

/// Lexer, parser and reducer for the toy language, built once.
#[derive(Debug, Clone)]
pub struct Pipeline {
    lexer: Lexer,
    parser: LlParser,
    reducer: TreeReducer,
}

impl Pipeline {
    /// Build the pipeline with default configuration.
    ///
    /// # Errors
    ///
    /// Only fails if the built-in grammar or lexer is invalid.
    pub fn new() -> Result<Self, Error> {
        Self::with_config(LlConfig::default(), ReduceConfig::default())
    }

    /// # Errors
    ///
    /// Only fails if the built-in grammar or lexer is invalid.
    pub fn with_config(parser: LlConfig, reducer: ReduceConfig) -> Result<Self, Error> {
        Ok(Self {
            lexer: lexer()?,
            parser: LlParser::new(grammar()?, parser)?,
            reducer: TreeReducer::new(reducer),
        })
    }

    /// # Errors
    ///
    /// Returns [`LexerError`] for characters outside the language.
    pub fn tokenize(&self, source: &str) -> Result<Vec<Token>, LexerError> {
        self.lexer.tokenize(source)
    }

    /// Lex and parse `source` into the raw parse tree.
    ///
    /// # Errors
    ///
    /// Returns the first lexer or parser error.
    pub fn parse(&self, source: &str) -> Result<Tree, Error> {
        let tokens = self.tokenize(source)?;
        Ok(self.parser.parse(&tokens)?.tree)
    }

    /// Lex, parse and reduce `source` into its CST.
    ///
    /// # Errors
    ///
    /// Returns the first lexer, parser or reducer error.
    pub fn reduce(&self, source: &str) -> Result<Tree, Error> {
        let raw = self.parse(source)?;
        Ok(self.reducer.reduce(&raw)?)
    }

    /// Compile `source` all the way to the typed CST.
    ///
    /// # Errors
    ///
    /// Returns the first error of any stage.
    pub fn compile(&self, source: &str) -> Result<Program, Error> {
        let cst = self.reduce(source)?;
        Ok(Program::from_tree(&cst)?)
    }

    #[must_use]
    pub const fn parser(&self) -> &LlParser {
        &self.parser
    }

    #[must_use]
    pub const fn reducer(&self) -> &TreeReducer {
        &self.reducer
    }
}

/// Compile `source` to its typed CST with a freshly built [`Pipeline`].
///
/// # Errors
///
/// Returns the first error of any stage.
pub fn compile_to_cst(source: &str) -> Result<Program, Error> {
    Pipeline::new()?.compile(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Symbol;

    #[test]
    fn test_grammar_is_ll1() {
        let parser = parser().unwrap();
        assert!(parser.table().is_ll1());
        assert_eq!(parser.grammar().start(), &Symbol::non_terminal("S"));
        assert_eq!(parser.grammar().non_terminals().len(), 11);
    }

    #[test]
    fn test_lexer_keywords_and_identifiers() {
        let tokens = lexer().unwrap().tokenize("while done do x:=x*2").unwrap();
        let kinds: Vec<String> = tokens.iter().map(|t| t.kind.to_string()).collect();
        assert_eq!(
            kinds,
            ["while", "var", "do", "var", ":=", "var", "mop", "num", "$"]
        );
    }

    #[test]
    fn test_relop_prefers_longest() {
        let tokens = lexer().unwrap().tokenize("x <= 1").unwrap();
        assert_eq!(tokens[1].lexeme, "<=");
    }

    #[test]
    fn test_pipeline_rejects_trailing_tokens() {
        let pipeline = Pipeline::new().unwrap();
        assert!(matches!(
            pipeline.compile("skip fi"),
            Err(Error::Parse(crate::error::ParseError::TrailingInput { position: 1, .. }))
        ));
    }
}
