//! Balanced parentheses example
//!
//! This example demonstrates how to:
//! 1. Read a grammar from text
//! 2. Inspect its nullable, FIRST and FOLLOW sets
//! 3. Build and print the LL(1) parse table
//! 4. Parse token streams and handle errors

use sprig::backend::ll::{LlConfig, LlParser};
use sprig::grammar::parse_grammar;
use sprig::lexer::{LexerBuilder, Pattern};
use sprig::syntax::pretty;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Balanced Parentheses Example ===\n");

    println!("1. Reading grammar...");
    let grammar = parse_grammar("S -> ( S ) S | ε")?;
    print!("{grammar}");
    println!();

    println!("2. Building parser...");
    let parser = LlParser::new(grammar, LlConfig::default())?;
    print!("{}", parser.closure().render(parser.grammar()));
    println!();
    print!("{}", parser.table().render(parser.grammar()));
    println!();

    let lexer = LexerBuilder::new()
        .token("ws", Pattern::Regex(r"\s+".into()))
        .keyword("(")
        .keyword(")")
        .trivia("ws")
        .build()?;

    println!("3. Parsing...");
    for input in ["(()())", "(()", "())"] {
        let tokens = lexer.tokenize(input)?;
        match parser.parse(&tokens) {
            Ok(output) => {
                println!("   {input:?}: ok, {} nodes", output.metrics.nodes_created);
                print!("{}", pretty::render(&output.tree));
            }
            Err(error) => println!("   {input:?}: {error}"),
        }
    }

    Ok(())
}
