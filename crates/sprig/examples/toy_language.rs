//! Toy language example
//!
//! Runs a small program through the lexer, the LL(1) parser and the tree
//! reducer, printing every intermediate stage.

use sprig::lang::Pipeline;
use sprig::syntax::pretty::{self, sexpr};

const SOURCE: &str = "n := 10; acc := 0; while n > 0 do if n = 1 then acc := acc + 1 else acc := acc * 2 fi";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Toy Language Example ===\n");

    let pipeline = Pipeline::new()?;

    println!("1. Tokens:");
    for token in pipeline.tokenize(SOURCE)? {
        print!(" {token}");
    }
    println!("\n");

    let raw = pipeline.parse(SOURCE)?;
    println!("2. Derivation tree ({} nodes):", raw.len());
    print!("{}", pretty::render(&raw));
    println!();

    let cst = pipeline.reduce(SOURCE)?;
    println!("3. Reduced tree ({} nodes):", cst.len());
    println!("{}\n", sexpr(&cst));

    let program = pipeline.compile(SOURCE)?;
    println!("4. Program:");
    println!("{program}");

    Ok(())
}
