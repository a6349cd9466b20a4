//! Tests for the table-driven LL(1) parser

use sprig::backend::ll::{LlConfig, LlParser};
use sprig::grammar::{Symbol, parse_grammar};
use sprig::lexer::Token;
use sprig::{ParseError, lang};

/// `if ( 1 ) < 1 then x := 123 + 5 else while x < 10 do x := x + 1 fi`
fn conditional_loop_tokens() -> Vec<Token> {
    vec![
        Token::keyword("if"),
        Token::keyword("("),
        Token::new("num", "1"),
        Token::keyword(")"),
        Token::new("relop", "<"),
        Token::new("num", "1"),
        Token::keyword("then"),
        Token::new("var", "x"),
        Token::keyword(":="),
        Token::new("num", "123"),
        Token::new("aop", "+"),
        Token::new("num", "5"),
        Token::keyword("else"),
        Token::keyword("while"),
        Token::new("var", "x"),
        Token::new("relop", "<"),
        Token::new("num", "10"),
        Token::keyword("do"),
        Token::new("var", "x"),
        Token::keyword(":="),
        Token::new("var", "x"),
        Token::new("aop", "+"),
        Token::new("num", "1"),
        Token::keyword("fi"),
        Token::eof(),
    ]
}

fn keywords(kinds: &[&str]) -> Vec<Token> {
    let mut tokens: Vec<Token> = kinds.iter().map(|kind| Token::keyword(kind)).collect();
    tokens.push(Token::eof());
    tokens
}

#[test]
fn test_conditional_loop_consumes_everything() {
    let parser = lang::parser().unwrap();
    let tokens = conditional_loop_tokens();
    let output = parser.parse(&tokens).unwrap();

    assert!(output.leftover.is_empty());
    assert_eq!(output.metrics.tokens_consumed, tokens.len());
    assert_eq!(output.tree.root_node().symbol(), &Symbol::non_terminal("S"));

    let lexemes: Vec<&str> = tokens
        .iter()
        .filter(|token| !token.is_eof())
        .map(|token| token.lexeme.as_str())
        .collect();
    assert_eq!(output.tree.leaf_values(), lexemes);
}

#[test]
fn test_tree_links_are_consistent() {
    let parser = lang::parser().unwrap();
    let tokens = conditional_loop_tokens();
    let tree = parser.parse(&tokens).unwrap().tree;

    assert_eq!(tree.root_node().parent(), None);
    for id in tree.preorder() {
        for &child in tree[id].children() {
            assert_eq!(tree[child].parent(), Some(id));
        }
    }
}

#[test]
fn test_epsilon_prediction_needs_lookahead() {
    let parser = lang::parser().unwrap();
    let mut tokens = conditional_loop_tokens();
    tokens.pop();

    match parser.parse(&tokens) {
        Err(ParseError::UnexpectedEof { expected }) => {
            assert_eq!(expected, vec![Symbol::non_terminal("S'")]);
        }
        other => panic!("expected UnexpectedEof, got {other:?}"),
    }
}

#[test]
fn test_unexpected_terminal_reports_position_and_expectations() {
    let parser = lang::parser().unwrap();
    let tokens = vec![
        Token::new("var", "x").at(0),
        Token::keyword("then").at(2),
        Token::eof().at(6),
    ];

    match parser.parse(&tokens) {
        Err(error @ ParseError::UnexpectedTerminal { .. }) => {
            assert_eq!(error.position(), Some(1));
            assert_eq!(error.offset(), Some(2));
            if let ParseError::UnexpectedTerminal { expected, stack, .. } = error {
                assert_eq!(expected, vec![Symbol::terminal(":=")]);
                assert_eq!(stack.first(), Some(&Symbol::terminal(":=")));
            }
        }
        other => panic!("expected UnexpectedTerminal, got {other:?}"),
    }
}

#[test]
fn test_unknown_token_kind_under_nonterminal() {
    let parser = lang::parser().unwrap();

    let tokens = vec![
        Token::new("var", "x"),
        Token::keyword(":="),
        Token::new("bogus", "?"),
        Token::eof(),
    ];
    match parser.parse(&tokens) {
        Err(ParseError::UnexpectedTerminal {
            found,
            position,
            expected,
            stack,
        }) => {
            assert_eq!(found.kind, Symbol::terminal("bogus"));
            assert_eq!(position, 2);
            assert_eq!(
                expected,
                vec![Symbol::terminal("("), Symbol::terminal("num"), Symbol::terminal("var")]
            );
            assert_eq!(stack, vec![Symbol::non_terminal("E"), Symbol::non_terminal("S'")]);
        }
        other => panic!("expected UnexpectedTerminal, got {other:?}"),
    }

    let tokens = vec![Token::new("bogus", "?"), Token::eof()];
    match parser.parse(&tokens) {
        Err(ParseError::UnexpectedTerminal {
            found,
            position,
            stack,
            ..
        }) => {
            assert_eq!(found.lexeme, "?");
            assert_eq!(position, 0);
            assert_eq!(stack, vec![Symbol::non_terminal("S")]);
        }
        other => panic!("expected UnexpectedTerminal, got {other:?}"),
    }
}

#[test]
fn test_unknown_token_kind_under_terminal() {
    let parser = lang::parser().unwrap();
    let tokens = vec![Token::new("var", "x"), Token::new("bogus", "?"), Token::eof()];

    match parser.parse(&tokens) {
        Err(ParseError::UnexpectedTerminal {
            found,
            position,
            expected,
            stack,
        }) => {
            assert_eq!(found.kind, Symbol::terminal("bogus"));
            assert_eq!(position, 1);
            assert_eq!(expected, vec![Symbol::terminal(":=")]);
            assert_eq!(
                stack,
                vec![
                    Symbol::terminal(":="),
                    Symbol::non_terminal("E"),
                    Symbol::non_terminal("S'"),
                ]
            );
        }
        other => panic!("expected UnexpectedTerminal, got {other:?}"),
    }
}

#[test]
fn test_error_message_lists_expected_terminals() {
    let parser = lang::parser().unwrap();
    let tokens = keywords(&["fi"]);

    let message = parser.parse(&tokens).unwrap_err().to_string();
    assert!(message.contains("`fi`"), "{message}");
    assert!(message.contains("`if`"), "{message}");
    assert!(message.contains("`while`"), "{message}");
}

#[test]
fn test_truncated_input_is_unexpected_eof() {
    let parser = lang::parser().unwrap();
    let tokens = vec![Token::keyword("while"), Token::keyword("true"), Token::eof()];

    match parser.parse(&tokens) {
        Err(ParseError::UnexpectedEof { expected }) => {
            assert!(expected.contains(&Symbol::terminal("do")));
            assert!(expected.contains(&Symbol::non_terminal("T")));
        }
        other => panic!("expected UnexpectedEof, got {other:?}"),
    }
}

#[test]
fn test_trailing_input_policy() {
    let grammar = parse_grammar("S -> a").unwrap();
    let tokens = keywords(&["a", "a"]);

    let strict = LlParser::new(grammar.clone(), LlConfig::default()).unwrap();
    assert!(matches!(
        strict.parse(&tokens),
        Err(ParseError::TrailingInput {
            position: 1,
            remaining: 2,
            ..
        })
    ));

    let lenient = LlParser::new(
        grammar,
        LlConfig {
            reject_trailing_input: false,
            ..LlConfig::default()
        },
    )
    .unwrap();
    let output = lenient.parse(&tokens).unwrap();
    assert_eq!(output.leftover.len(), 2);
    assert_eq!(output.leftover[0].kind, Symbol::terminal("a"));
}

#[test]
fn test_deep_nesting_hits_stack_limit() {
    let grammar = parse_grammar("S -> ( S ) | x").unwrap();
    let parser = LlParser::new(
        grammar,
        LlConfig {
            max_depth: 64,
            ..LlConfig::default()
        },
    )
    .unwrap();

    let mut kinds = vec!["("; 100];
    kinds.push("x");
    kinds.extend(vec![")"; 100]);
    assert!(matches!(
        parser.parse(&keywords(&kinds)),
        Err(ParseError::StackOverflow { limit: 64 })
    ));
}

#[test]
fn test_deep_nesting_within_limit() {
    let grammar = parse_grammar("S -> ( S ) | x").unwrap();
    let parser = LlParser::new(grammar, LlConfig::default()).unwrap();

    let mut kinds = vec!["("; 500];
    kinds.push("x");
    kinds.extend(vec![")"; 500]);
    let tokens = keywords(&kinds);
    let output = parser.parse(&tokens).unwrap();
    assert_eq!(output.tree.depth(), 502);
}
