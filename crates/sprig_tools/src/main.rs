//! Sprig Tools CLI
//!
//! Command-line tools for working with sprig grammars.

use clap::Parser;
use sprig::grammar::{
    ClosureTables, Grammar, GrammarMetrics, analyze_grammar, grammar_summary, parse_grammar,
};
use sprig::lang::{Pipeline, Program};
use sprig::ParseTable;
use sprig::syntax::pretty;
use sprig_tools::cli::{Cli, Commands, OutputFormat, TreeFormat};
use sprig_tools::visualize::{grammar_dot, table_dot, tree_dot};
use std::io::Read;
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn read_input(path: &Path) -> std::io::Result<String> {
    if path.as_os_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        std::fs::read_to_string(path)
    }
}

fn load_grammar(path: &Path) -> Result<Grammar, Box<dyn std::error::Error>> {
    let grammar = parse_grammar(&read_input(path)?)?;
    tracing::info!(
        path = %path.display(),
        productions = grammar.production_count(),
        "loaded grammar"
    );
    Ok(grammar)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Sets { grammar } => {
            let grammar = load_grammar(&grammar)?;
            let closure = ClosureTables::compute(&grammar);
            print!("{}", closure.render(&grammar));
        }
        Commands::Table { grammar, format } => {
            let grammar = load_grammar(&grammar)?;
            let closure = ClosureTables::compute(&grammar);
            let table = ParseTable::build(&grammar, &closure);

            match format {
                OutputFormat::Text => print!("{}", table.render(&grammar)),
                OutputFormat::Dot => print!("{}", table_dot(&grammar, &table)),
            }

            if !table.is_ll1() {
                for conflict in table.conflicts() {
                    eprintln!("conflict {conflict}");
                }
                table.validate()?;
            }
        }
        Commands::Analyze { grammar, format } => {
            let grammar = load_grammar(&grammar)?;
            if format == OutputFormat::Dot {
                print!("{}", grammar_dot(&grammar));
                return Ok(());
            }

            let closure = ClosureTables::compute(&grammar);
            let metrics = GrammarMetrics::compute(&grammar, &closure);
            println!("{}", grammar_summary(&grammar, &closure));
            for nt in &metrics.left_recursive {
                println!("left-recursive: {nt}");
            }
            for suggestion in analyze_grammar(&grammar, &closure) {
                println!("{:?} {}: {}", suggestion.kind, suggestion.target, suggestion.message);
            }
        }
        Commands::Parse { input, raw, format } => {
            if raw && format == TreeFormat::Program {
                return Err("--raw cannot be combined with --format program".into());
            }

            let source = read_input(&input)?;
            let pipeline = Pipeline::new()?;
            let tree = if raw {
                pipeline.parse(&source)?
            } else {
                pipeline.reduce(&source)?
            };

            match format {
                TreeFormat::Text => print!("{}", pretty::render(&tree)),
                TreeFormat::Sexpr => println!("{}", pretty::sexpr(&tree)),
                TreeFormat::Dot => print!("{}", tree_dot(&tree)),
                TreeFormat::Program => println!("{}", Program::from_tree(&tree)?),
            }
        }
    }

    Ok(())
}
