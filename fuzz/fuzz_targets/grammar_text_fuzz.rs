#![no_main]
use libfuzzer_sys::fuzz_target;
use sprig::backend::ll::{self, LlConfig};
use sprig::grammar::{ClosureTables, parse_grammar};
use sprig::lexer::Token;
use sprig::ParseTable;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(grammar) = parse_grammar(text) else {
        return;
    };

    let closure = ClosureTables::compute(&grammar);
    let table = ParseTable::build(&grammar, &closure);
    let _ = table.render(&grammar);
    assert_eq!(table.is_ll1(), table.validate().is_ok());

    // Feed the grammar its own terminals; the parser must never panic.
    let mut tokens: Vec<Token> = grammar
        .sorted_terminals()
        .into_iter()
        .map(|terminal| Token::keyword(terminal.name()))
        .collect();
    tokens.push(Token::eof());
    let config = LlConfig {
        max_depth: 256,
        ..LlConfig::default()
    };
    let _ = ll::parse(&grammar, &table, &tokens, &config);
});
