use crate::backend::ll::{LlConfig, ParseTable};
use crate::error::ParseError;
use crate::grammar::{Grammar, Symbol};
use crate::lexer::Token;
use crate::syntax::{NodeId, Tree, TreeBuilder};

/// Counters collected during one parse
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseMetrics {
    /// Tokens matched, including a trailing end-of-input token
    pub tokens_consumed: usize,
    /// Nodes allocated in the parse tree
    pub nodes_created: usize,
    /// Deepest the symbol stack got
    pub max_stack_depth: usize,
    /// Stack symbols processed
    pub steps: usize,
}

/// Result of a successful parse
#[derive(Debug, Clone)]
pub struct ParseOutput<'t> {
    pub tree: Tree,
    /// Tokens after the derivation of the start symbol (and an optional `$`)
    pub leftover: &'t [Token],
    pub metrics: ParseMetrics,
}

/// A pending stack symbol, the node its subtree attaches to, and the depth
/// its node will have in the tree.
type Entry<'g> = (&'g Symbol, Option<NodeId>, usize);

/// Table-driven predictive parse of `tokens`.
///
/// The stack starts as `[start]`. A terminal on top must match the current
/// token, which is then consumed into a leaf carrying its lexeme. A
/// nonterminal on top is replaced by the right-hand side its table cell
/// predicts, pushed in reverse so the leftmost symbol is processed first.
/// Nodes are therefore allocated in leftmost-derivation order. Once the
/// stack is empty a single `$` token is consumed if present; everything after
/// it is returned as leftover.
///
/// # Errors
///
/// - [`ParseError::AmbiguousGrammar`] if the table has conflicts
/// - [`ParseError::UnexpectedEof`] if input ends while symbols are pending
/// - [`ParseError::UnexpectedTerminal`] on a token the table cannot predict
/// - [`ParseError::StackOverflow`] if the stack or the tree outgrows
///   `config.max_depth`
pub fn parse<'g, 't>(
    grammar: &'g Grammar,
    table: &ParseTable,
    tokens: &'t [Token],
    config: &LlConfig,
) -> Result<ParseOutput<'t>, ParseError> {
    if !table.is_ll1() {
        return Err(ParseError::AmbiguousGrammar {
            conflicts: table.conflicts().len(),
        });
    }

    let mut builder = TreeBuilder::with_capacity(tokens.len() * 2);
    let mut metrics = ParseMetrics::default();
    let mut stack: Vec<Entry<'g>> = vec![(grammar.start(), None, 1)];
    let mut root = None;
    let mut pos = 0;

    while let Some(&(symbol, parent, depth)) = stack.last() {
        metrics.steps += 1;
        metrics.max_stack_depth = metrics.max_stack_depth.max(stack.len());

        // Tail positions (`while B do T`) nest without growing the stack
        if depth > config.max_depth {
            return Err(ParseError::StackOverflow {
                limit: config.max_depth,
            });
        }

        if symbol.is_epsilon() {
            stack.pop();
            continue;
        }

        let Some(token) = tokens.get(pos) else {
            return Err(ParseError::UnexpectedEof {
                expected: pending(&stack),
            });
        };

        let id = match symbol {
            Symbol::NonTerminal(_) => {
                let alternatives = table.get(symbol, &token.kind);
                let production = match alternatives {
                    [] => return Err(mismatch(&stack, token, pos, table.expected(symbol))),
                    [id] => grammar.production(*id),
                    // Unreachable for tables that passed the `is_ll1` check above
                    _ => {
                        return Err(ParseError::AmbiguousParse {
                            nonterminal: symbol.clone(),
                            lookahead: token.kind.clone(),
                            alternatives: alternatives
                                .iter()
                                .map(|&id| grammar.production(id).to_string())
                                .collect(),
                        });
                    }
                };

                tracing::trace!(step = metrics.steps, %production, lookahead = %token.kind, "expand");
                stack.pop();
                let id = builder.node(symbol.clone(), "");
                stack.extend(
                    production
                        .rhs()
                        .iter()
                        .rev()
                        .filter(|s| !s.is_epsilon())
                        .map(|s| (s, Some(id), depth + 1)),
                );
                if stack.len() > config.max_depth {
                    return Err(ParseError::StackOverflow {
                        limit: config.max_depth,
                    });
                }
                id
            }
            _ => {
                if token.kind != *symbol {
                    return Err(mismatch(&stack, token, pos, vec![symbol.clone()]));
                }
                tracing::trace!(step = metrics.steps, token = %token, "match");
                stack.pop();
                pos += 1;
                builder.node(symbol.clone(), token.lexeme.clone())
            }
        };

        match parent {
            Some(parent) => builder.attach(parent, id),
            None => root = Some(id),
        }
    }

    if tokens.get(pos).is_some_and(Token::is_eof) {
        pos += 1;
    }

    let root = root.ok_or_else(|| ParseError::UnexpectedEof {
        expected: vec![grammar.start().clone()],
    })?;

    metrics.tokens_consumed = pos;
    metrics.nodes_created = builder.len();
    tracing::debug!(
        tokens = pos,
        nodes = metrics.nodes_created,
        leftover = tokens.len() - pos,
        "parse complete"
    );

    Ok(ParseOutput {
        tree: builder.finish(root),
        leftover: &tokens[pos..],
        metrics,
    })
}

/// Pending symbols, top of stack first.
fn pending(stack: &[Entry<'_>]) -> Vec<Symbol> {
    stack
        .iter()
        .rev()
        .filter(|(symbol, ..)| !symbol.is_epsilon())
        .map(|(symbol, ..)| (*symbol).clone())
        .collect()
}

fn mismatch(stack: &[Entry<'_>], token: &Token, position: usize, expected: Vec<Symbol>) -> ParseError {
    if token.is_eof() {
        ParseError::UnexpectedEof {
            expected: pending(stack),
        }
    } else {
        ParseError::UnexpectedTerminal {
            found: token.clone(),
            position,
            expected,
            stack: pending(stack),
        }
    }
}
