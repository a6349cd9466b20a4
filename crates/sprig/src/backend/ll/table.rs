use crate::error::LlError;
use crate::grammar::{ClosureTables, Grammar, Production, ProductionId, Symbol};
use hashbrown::HashMap;
use smallvec::SmallVec;
use std::fmt::{self, Write};

/// Alternatives predicted by one `(nonterminal, lookahead)` cell.
pub type Cell = SmallVec<[ProductionId; 2]>;

/// A table cell that predicts more than one alternative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConflict {
    pub nonterminal: Symbol,
    pub lookahead: Symbol,
    pub alternatives: Vec<Production>,
}

impl fmt::Display for TableConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]:", self.nonterminal, self.lookahead)?;
        for (index, alternative) in self.alternatives.iter().enumerate() {
            let sep = if index == 0 { " " } else { " | " };
            write!(f, "{sep}{alternative}")?;
        }
        Ok(())
    }
}

/// Predictive parsing table for LL(1) parsing
///
/// For every alternative `A -> α`, the alternative is entered at `[A, t]`
/// for each terminal `t` in FIRST(α), and additionally at `[A, t]` for each
/// `t` in FOLLOW(A) (which may include `$`) when α is nullable.
///
/// Construction always completes. Cells that receive more than one distinct
/// alternative are recorded as [`TableConflict`]s and clear the LL(1) flag;
/// such a table must not be used for parsing.
#[derive(Debug, Clone)]
pub struct ParseTable {
    cells: HashMap<(Symbol, Symbol), Cell, ahash::RandomState>,
    conflicts: Vec<TableConflict>,
}

impl ParseTable {
    #[must_use]
    pub fn build(grammar: &Grammar, closure: &ClosureTables) -> Self {
        let mut cells: HashMap<(Symbol, Symbol), Cell, ahash::RandomState> = HashMap::default();

        let mut insert = |nt: &Symbol, lookahead: &Symbol, id: ProductionId| {
            let cell = cells.entry((nt.clone(), lookahead.clone())).or_default();
            if !cell.contains(&id) {
                cell.push(id);
            }
        };

        for (id, production) in grammar.enumerate() {
            let lhs = production.lhs();
            let first = closure.first_of_sequence(production.rhs());

            for lookahead in first.iter().filter(|s| s.is_lookahead()) {
                insert(lhs, lookahead, id);
            }
            if first.contains(&Symbol::Epsilon) {
                for lookahead in closure.follow(lhs).into_iter().flatten() {
                    insert(lhs, lookahead, id);
                }
            }
        }

        let mut table = Self {
            cells,
            conflicts: Vec::new(),
        };
        table.conflicts = table.collect_conflicts(grammar);

        for conflict in &table.conflicts {
            tracing::warn!(
                nonterminal = %conflict.nonterminal,
                lookahead = %conflict.lookahead,
                alternatives = conflict.alternatives.len(),
                "LL(1) conflict"
            );
        }
        tracing::debug!(
            cells = table.cells.len(),
            conflicts = table.conflicts.len(),
            "built parse table"
        );

        table
    }

    fn collect_conflicts(&self, grammar: &Grammar) -> Vec<TableConflict> {
        let columns = lookahead_columns(grammar);
        let mut conflicts = Vec::new();
        for nt in grammar.non_terminals() {
            for &lookahead in &columns {
                let cell = self.get(nt, lookahead);
                if cell.len() > 1 {
                    conflicts.push(TableConflict {
                        nonterminal: nt.clone(),
                        lookahead: lookahead.clone(),
                        alternatives: cell
                            .iter()
                            .map(|&id| grammar.production(id).clone())
                            .collect(),
                    });
                }
            }
        }
        conflicts
    }

    /// Alternatives at `[nt, lookahead]`; empty when the cell is blank.
    #[must_use]
    pub fn get(&self, nt: &Symbol, lookahead: &Symbol) -> &[ProductionId] {
        self.cells
            .get(&(nt.clone(), lookahead.clone()))
            .map_or(&[], |cell| cell.as_slice())
    }

    /// Lookaheads with a non-empty cell for `nt`, sorted.
    #[must_use]
    pub fn expected(&self, nt: &Symbol) -> Vec<Symbol> {
        let mut expected: Vec<Symbol> = self
            .cells
            .iter()
            .filter(|((row, _), cell)| row == nt && !cell.is_empty())
            .map(|((_, lookahead), _)| lookahead.clone())
            .collect();
        expected.sort();
        expected
    }

    #[must_use]
    pub fn is_ll1(&self) -> bool {
        self.conflicts.is_empty()
    }

    #[must_use]
    pub fn conflicts(&self) -> &[TableConflict] {
        &self.conflicts
    }

    /// Number of non-empty cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Reject tables with conflicting cells.
    ///
    /// # Errors
    ///
    /// Returns [`LlError::AmbiguousGrammar`] listing every conflict.
    pub fn validate(&self) -> Result<(), LlError> {
        if self.is_ll1() {
            Ok(())
        } else {
            Err(LlError::AmbiguousGrammar {
                conflicts: self.conflicts.clone(),
            })
        }
    }

    /// Render the table as aligned text: one row per nonterminal, one column
    /// per lookahead, cells listing production ids.
    #[must_use]
    pub fn render(&self, grammar: &Grammar) -> String {
        let columns = lookahead_columns(grammar);

        let mut rows: Vec<Vec<String>> = Vec::new();
        let mut header = vec![String::new()];
        header.extend(columns.iter().map(ToString::to_string));
        rows.push(header);

        for nt in grammar.non_terminals() {
            let mut row = vec![nt.to_string()];
            for &lookahead in &columns {
                let cell = self.get(nt, lookahead);
                row.push(if cell.is_empty() {
                    "-".to_string()
                } else {
                    cell.iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join("/")
                });
            }
            rows.push(row);
        }

        let widths: Vec<usize> = (0..=columns.len())
            .map(|col| rows.iter().map(|row| row[col].chars().count()).max().unwrap_or(0))
            .collect();

        let mut out = String::new();
        for row in &rows {
            let line: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(text, &width)| format!("{text:<width$}"))
                .collect();
            writeln!(out, "{}", line.join(" ").trim_end()).unwrap();
        }
        out.push('\n');
        for (id, production) in grammar.enumerate() {
            writeln!(out, "{id}: {production}").unwrap();
        }
        out
    }
}

static EOF: Symbol = Symbol::Eof;

fn lookahead_columns(grammar: &Grammar) -> Vec<&Symbol> {
    let mut columns = grammar.sorted_terminals();
    columns.push(&EOF);
    columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::GrammarBuilder;

    fn table_for(grammar: &Grammar) -> ParseTable {
        ParseTable::build(grammar, &ClosureTables::compute(grammar))
    }

    #[test]
    fn test_balanced_table() {
        let grammar = GrammarBuilder::new()
            .rule("S", ["a", "S", "b"])
            .epsilon("S")
            .build()
            .unwrap();
        let table = table_for(&grammar);
        let s = Symbol::non_terminal("S");

        assert!(table.is_ll1());
        assert_eq!(table.get(&s, &Symbol::terminal("a")), &[ProductionId(0)]);
        assert_eq!(table.get(&s, &Symbol::terminal("b")), &[ProductionId(1)]);
        assert_eq!(table.get(&s, &Symbol::Eof), &[ProductionId(1)]);
        assert_eq!(
            table.expected(&s),
            vec![Symbol::terminal("a"), Symbol::terminal("b"), Symbol::Eof]
        );
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_left_recursion_conflicts() {
        let grammar = GrammarBuilder::new()
            .rule("E", ["E", "+", "T"])
            .rule("E", ["T"])
            .rule("T", ["num"])
            .build()
            .unwrap();
        let table = table_for(&grammar);

        assert!(!table.is_ll1());
        let conflict = &table.conflicts()[0];
        assert_eq!(conflict.nonterminal, Symbol::non_terminal("E"));
        assert_eq!(conflict.lookahead, Symbol::terminal("num"));
        assert_eq!(conflict.alternatives.len(), 2);
        assert_eq!(conflict.to_string(), "[E, num]: E -> E + T | E -> T");
        assert!(matches!(
            table.validate(),
            Err(LlError::AmbiguousGrammar { conflicts }) if conflicts.len() == 1
        ));
    }

    #[test]
    fn test_render() {
        let grammar = GrammarBuilder::new()
            .rule("S", ["a", "S"])
            .epsilon("S")
            .build()
            .unwrap();
        let rendered = table_for(&grammar).render(&grammar);
        assert_eq!(rendered, "  a  $\nS #0 #1\n\n#0: S -> a S\n#1: S -> ε\n");
    }
}
