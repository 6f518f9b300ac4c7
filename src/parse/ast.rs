//! Parse tree of the KoAT rule-based format.
//!
//! Nodes borrow the input text: terminals are kept verbatim as [`Spn`]`<&str>`, the typed IR is
//! built from the tree by [`super::koat()`].

crate::prelude!();

use super::{Span, Spn};

/// A whole KoAT document.
#[derive(Debug, Clone)]
pub struct Koat<'input> {
    /// Goal, `COMPLEXITY` or `TERMINATION`.
    pub goal: Spn<&'input str>,
    /// Start location.
    pub start: Spn<&'input str>,
    /// Optional sink location, overrides the start location.
    pub sink: Option<Spn<&'input str>>,
    /// Declared variables.
    pub vars: Vec<Spn<&'input str>>,
    /// Transitions.
    pub transs: Vec<Trans<'input>>,
}

/// A single transition `lhs -> com :|: cond`.
#[derive(Debug, Clone)]
pub struct Trans<'input> {
    /// Left-hand side.
    pub lhs: Lhs<'input>,
    /// Command.
    pub com: Com<'input>,
    /// Optional condition.
    pub cond: Option<Formula<'input>>,
    /// Span of the whole transition.
    pub span: Span,
}
impl<'input> Trans<'input> {
    /// Constructor.
    pub fn new(
        lhs: Lhs<'input>,
        com: Com<'input>,
        cond: Option<Formula<'input>>,
        span: impl Into<Span>,
    ) -> Self {
        Self {
            lhs,
            com,
            cond,
            span: span.into(),
        }
    }
}

/// Left-hand side pattern: a location applied to variables.
#[derive(Debug, Clone)]
pub struct Lhs<'input> {
    /// Location.
    pub loc: Spn<&'input str>,
    /// Parameters.
    pub args: Vec<Spn<&'input str>>,
}

/// A command: one right-hand side, or several under a `Com_k` symbol.
#[derive(Debug, Clone)]
pub struct Com<'input> {
    /// The `Com_k` symbol, if any.
    pub sym: Option<Spn<&'input str>>,
    /// Right-hand sides, never empty.
    pub rhss: Vec<Rhs<'input>>,
}

/// Right-hand side pattern: a location applied to expressions.
#[derive(Debug, Clone)]
pub struct Rhs<'input> {
    /// Location.
    pub loc: Spn<&'input str>,
    /// Updates.
    pub args: Vec<Expr<'input>>,
}

/// Formulas.
#[derive(Debug, Clone)]
pub enum Formula<'input> {
    /// A relation `lhs op rhs`.
    Lit {
        /// Left operand.
        lhs: Expr<'input>,
        /// Relational operator.
        op: Spn<&'input str>,
        /// Right operand.
        rhs: Expr<'input>,
    },
    /// Binary conjunction or disjunction.
    Bin {
        /// Connective.
        op: Spn<&'input str>,
        /// Left operand.
        lft: Box<Formula<'input>>,
        /// Right operand.
        rgt: Box<Formula<'input>>,
    },
    /// A parenthesized formula.
    Paren(Box<Formula<'input>>, Span),
}

/// Expressions.
#[derive(Debug, Clone)]
pub enum Expr<'input> {
    /// Integer literal.
    Int(Spn<&'input str>),
    /// Variable.
    Var(Spn<&'input str>),
    /// Unary minus.
    Neg(Spn<&'input str>, Box<Expr<'input>>),
    /// Binary operator application: `+`, `-`, `*` or `^`.
    Bin {
        /// Operator.
        op: Spn<&'input str>,
        /// Left operand.
        lft: Box<Expr<'input>>,
        /// Right operand.
        rgt: Box<Expr<'input>>,
    },
    /// A parenthesized expression.
    Paren(Box<Expr<'input>>, Span),
}
impl<'input> Expr<'input> {
    /// Binary application constructor.
    pub fn bin(op: Spn<&'input str>, lft: Self, rgt: Self) -> Self {
        Self::Bin {
            op,
            lft: Box::new(lft),
            rgt: Box::new(rgt),
        }
    }
    /// Unary minus constructor.
    pub fn neg(op: Spn<&'input str>, arg: Self) -> Self {
        Self::Neg(op, Box::new(arg))
    }

    /// Span of the expression.
    pub fn span(&self) -> Span {
        match self {
            Self::Int(spn) | Self::Var(spn) => spn.span,
            Self::Neg(op, arg) => op.span.merge(arg.span()),
            Self::Bin { lft, rgt, .. } => lft.span().merge(rgt.span()),
            Self::Paren(_, span) => *span,
        }
    }
}

impl<'input> Formula<'input> {
    /// Binary connective constructor.
    pub fn bin(op: Spn<&'input str>, lft: Self, rgt: Self) -> Self {
        Self::Bin {
            op,
            lft: Box::new(lft),
            rgt: Box::new(rgt),
        }
    }
}
