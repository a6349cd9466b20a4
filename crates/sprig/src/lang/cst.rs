//! Typed CST of the toy language.
//!
//! [`Program::from_tree`] converts a reduced tree into these types. Flat
//! operator chains such as `(E a + b - c)` fold to the left, so the result
//! is `(a + b) - c`. Precedence needs no work here because the grammar has
//! already nested multiplicative chains inside additive ones.
//!
//! `Display` renders source text. For programs produced by `from_tree`, that
//! text compiles back to an equal program.

use crate::error::CstError;
use crate::grammar::Symbol;
use crate::syntax::{Node, NodeId, Tree};
use compact_str::CompactString;
use std::cell::Cell;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithOp {
    const fn precedence(self) -> u8 {
        match self {
            Self::Add | Self::Sub => 1,
            Self::Mul | Self::Div => 2,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
        }
    }
}

impl FromStr for ArithOp {
    type Err = CstError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Self::Add),
            "-" => Ok(Self::Sub),
            "*" => Ok(Self::Mul),
            "/" => Ok(Self::Div),
            _ => Err(CstError::UnknownOperator {
                operator: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoolOp {
    And,
    Or,
}

impl BoolOp {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::And => "&&",
            Self::Or => "||",
        }
    }
}

impl FromStr for BoolOp {
    type Err = CstError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "&&" => Ok(Self::And),
            "||" => Ok(Self::Or),
            _ => Err(CstError::UnknownOperator {
                operator: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelOp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl RelOp {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Eq => "=",
            Self::Ne => "!=",
        }
    }
}

impl FromStr for RelOp {
    type Err = CstError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "<" => Ok(Self::Lt),
            "<=" => Ok(Self::Le),
            ">" => Ok(Self::Gt),
            ">=" => Ok(Self::Ge),
            "=" => Ok(Self::Eq),
            "!=" => Ok(Self::Ne),
            _ => Err(CstError::UnknownOperator {
                operator: s.to_string(),
            }),
        }
    }
}

/// Arithmetic expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AExpr {
    Num(i64),
    Var(CompactString),
    Binary {
        op: ArithOp,
        lhs: Box<AExpr>,
        rhs: Box<AExpr>,
    },
}

/// Boolean expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BExpr {
    Lit(bool),
    Not(Box<BExpr>),
    Binary {
        op: BoolOp,
        lhs: Box<BExpr>,
        rhs: Box<BExpr>,
    },
    Rel {
        op: RelOp,
        lhs: AExpr,
        rhs: AExpr,
    },
}

/// Statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    Skip,
    Assign {
        target: CompactString,
        value: AExpr,
    },
    Seq(Vec<Stmt>),
    If {
        cond: BExpr,
        then_branch: Box<Stmt>,
        else_branch: Box<Stmt>,
    },
    While {
        cond: BExpr,
        body: Box<Stmt>,
    },
}

/// Deepest nesting [`Program::from_tree`] accepts. Each operator in a folded
/// chain counts as one level, since folding nests the left operand.
///
/// Conversion, `Display` and drop all recurse once per level.
pub const MAX_NESTING: usize = 256;

/// A whole program: one statement, usually a [`Stmt::Seq`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program(pub Stmt);

impl Program {
    /// Convert a reduced tree.
    ///
    /// # Errors
    ///
    /// Returns a [`CstError`] if the tree does not have the shape the
    /// toy-language reducer produces, or [`CstError::TooDeep`] if it nests
    /// deeper than [`MAX_NESTING`].
    pub fn from_tree(tree: &Tree) -> Result<Self, CstError> {
        let converter = Converter {
            tree,
            depth: Cell::new(0),
        };
        converter.stmt(tree.root()).map(Self)
    }

    #[must_use]
    pub const fn body(&self) -> &Stmt {
        &self.0
    }
}

struct Converter<'a> {
    tree: &'a Tree,
    depth: Cell<usize>,
}

impl Converter<'_> {
    /// Run `convert` `levels` deeper, failing once past [`MAX_NESTING`].
    fn descend<T>(
        &self,
        levels: usize,
        convert: impl FnOnce() -> Result<T, CstError>,
    ) -> Result<T, CstError> {
        let outer = self.depth.get();
        let depth = outer + levels;
        if depth > MAX_NESTING {
            return Err(CstError::TooDeep { limit: MAX_NESTING });
        }
        self.depth.set(depth);
        let result = convert();
        self.depth.set(outer);
        result
    }

    fn child(&self, id: NodeId, index: usize, expected: &'static str) -> Result<NodeId, CstError> {
        self.tree[id]
            .children()
            .get(index)
            .copied()
            .ok_or_else(|| CstError::MissingChild {
                node: self.tree[id].symbol().clone(),
                expected,
            })
    }

    fn unexpected(&self, id: NodeId, expected: &'static str) -> CstError {
        CstError::UnexpectedNode {
            expected,
            found: self.tree[id].symbol().clone(),
        }
    }

    fn stmt(&self, id: NodeId) -> Result<Stmt, CstError> {
        self.descend(1, || self.stmt_node(id))
    }

    fn stmt_node(&self, id: NodeId) -> Result<Stmt, CstError> {
        let node = &self.tree[id];
        match node.symbol() {
            Symbol::Terminal(name) if node.is_leaf() && name == "skip" => Ok(Stmt::Skip),
            Symbol::Terminal(name) if !node.is_leaf() && name == ":=" => {
                let target = self.child(id, 0, "assignment target")?;
                if !self.tree[target].is_leaf() || self.tree[target].symbol().name() != "var" {
                    return Err(self.unexpected(target, "variable"));
                }
                Ok(Stmt::Assign {
                    target: self.tree[target].value().into(),
                    value: self.aexpr(self.child(id, 1, "assigned expression")?)?,
                })
            }
            Symbol::Terminal(name) if !node.is_leaf() && name == "if" => Ok(Stmt::If {
                cond: self.bexpr(self.child(id, 0, "condition")?)?,
                then_branch: Box::new(self.stmt(self.child(id, 1, "then branch")?)?),
                else_branch: Box::new(self.stmt(self.child(id, 2, "else branch")?)?),
            }),
            Symbol::Terminal(name) if !node.is_leaf() && name == "while" => Ok(Stmt::While {
                cond: self.bexpr(self.child(id, 0, "condition")?)?,
                body: Box::new(self.stmt(self.child(id, 1, "body")?)?),
            }),
            Symbol::NonTerminal(_) if node.children().len() > 1 => {
                let mut statements = Vec::with_capacity(node.children().len());
                for &child in node.children() {
                    match self.stmt(child)? {
                        Stmt::Seq(inner) => statements.extend(inner),
                        stmt => statements.push(stmt),
                    }
                }
                Ok(Stmt::Seq(statements))
            }
            _ => Err(self.unexpected(id, "statement")),
        }
    }

    fn aexpr(&self, id: NodeId) -> Result<AExpr, CstError> {
        self.descend(1, || self.aexpr_node(id))
    }

    fn aexpr_node(&self, id: NodeId) -> Result<AExpr, CstError> {
        let node = &self.tree[id];
        if node.is_leaf() {
            return match node.symbol().name() {
                "num" => node
                    .value()
                    .parse()
                    .map(AExpr::Num)
                    .map_err(|_| CstError::InvalidNumber {
                        lexeme: node.value().to_string(),
                    }),
                "var" => Ok(AExpr::Var(node.value().into())),
                _ => Err(self.unexpected(id, "arithmetic operand")),
            };
        }

        if let Some(inner) = self.parenthesized(node) {
            return self.aexpr(inner);
        }

        self.fold_chain(id, |this, operand| this.aexpr(operand), |op, lhs, rhs| {
            Ok(AExpr::Binary {
                op: op.parse()?,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            })
        })
    }

    fn bexpr(&self, id: NodeId) -> Result<BExpr, CstError> {
        self.descend(1, || self.bexpr_node(id))
    }

    fn bexpr_node(&self, id: NodeId) -> Result<BExpr, CstError> {
        let node = &self.tree[id];
        let children = node.children();

        if node.is_leaf() {
            return match node.symbol().name() {
                "true" => Ok(BExpr::Lit(true)),
                "false" => Ok(BExpr::Lit(false)),
                _ => Err(self.unexpected(id, "boolean literal")),
            };
        }

        if let [not, operand] = children
            && self.tree[*not].is_leaf()
            && self.tree[*not].symbol().name() == "not"
        {
            return Ok(BExpr::Not(Box::new(self.bexpr(*operand)?)));
        }

        if let [lhs, op, rhs] = children
            && let Ok(op) = self.tree[*op].value().parse::<RelOp>()
        {
            return Ok(BExpr::Rel {
                op,
                lhs: self.aexpr(*lhs)?,
                rhs: self.aexpr(*rhs)?,
            });
        }

        self.fold_chain(id, |this, operand| this.bexpr(operand), |op, lhs, rhs| {
            Ok(BExpr::Binary {
                op: op.parse()?,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            })
        })
    }

    /// `[ ( e ) ]` yields `e`.
    fn parenthesized(&self, node: &Node) -> Option<NodeId> {
        match node.children() {
            [open, inner, close]
                if self.tree[*open].value() == "(" && self.tree[*close].value() == ")" =>
            {
                Some(*inner)
            }
            _ => None,
        }
    }

    /// Fold `operand (op operand)*` to the left.
    fn fold_chain<T>(
        &self,
        id: NodeId,
        operand: impl Fn(&Self, NodeId) -> Result<T, CstError>,
        combine: impl Fn(&str, T, T) -> Result<T, CstError>,
    ) -> Result<T, CstError> {
        let children = self.tree[id].children();
        if children.len() < 3 || children.len() % 2 == 0 {
            return Err(self.unexpected(id, "operator chain"));
        }

        self.descend(children.len() / 2, || {
            let mut acc = operand(self, children[0])?;
            for pair in children[1..].chunks_exact(2) {
                let op = &self.tree[pair[0]];
                if !op.is_leaf() {
                    return Err(self.unexpected(pair[0], "operator"));
                }
                acc = combine(op.value(), acc, operand(self, pair[1])?)?;
            }
            Ok(acc)
        })
    }
}

impl AExpr {
    const fn precedence(&self) -> u8 {
        match self {
            Self::Num(_) | Self::Var(_) => 3,
            Self::Binary { op, .. } => op.precedence(),
        }
    }
}

impl fmt::Display for AExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(n) => write!(f, "{n}"),
            Self::Var(name) => f.write_str(name),
            Self::Binary { op, lhs, rhs } => {
                let prec = op.precedence();
                if lhs.precedence() < prec {
                    write!(f, "({lhs})")?;
                } else {
                    write!(f, "{lhs}")?;
                }
                write!(f, " {} ", op.as_str())?;
                if rhs.precedence() <= prec {
                    write!(f, "({rhs})")
                } else {
                    write!(f, "{rhs}")
                }
            }
        }
    }
}

impl fmt::Display for BExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lit(value) => write!(f, "{value}"),
            Self::Not(inner) => match **inner {
                Self::Binary { .. } => write!(f, "not ({inner})"),
                _ => write!(f, "not {inner}"),
            },
            Self::Binary { op, lhs, rhs } => match **rhs {
                Self::Binary { .. } => write!(f, "{lhs} {} ({rhs})", op.as_str()),
                _ => write!(f, "{lhs} {} {rhs}", op.as_str()),
            },
            Self::Rel { op, lhs, rhs } => write!(f, "{lhs} {} {rhs}", op.as_str()),
        }
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skip => f.write_str("skip"),
            Self::Assign { target, value } => write!(f, "{target} := {value}"),
            Self::Seq(statements) => {
                for (index, stmt) in statements.iter().enumerate() {
                    if index > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{stmt}")?;
                }
                Ok(())
            }
            Self::If {
                cond,
                then_branch,
                else_branch,
            } => write!(f, "if {cond} then {then_branch} else {else_branch} fi"),
            Self::While { cond, body } => write!(f, "while {cond} do {body}"),
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
