//! Arithmetic expressions and formulas over integer variables.
//!
//! Formulas are relations between [`Expr`]s combined with conjunctions, disjunctions, negations
//! and existential quantification. The empty conjunction is the canonical `true`, the empty
//! disjunction the canonical `false`.

crate::prelude!();

use sexp::Sexp;

#[cfg(test)]
mod test;

/// Arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ArithOp {
    /// Addition, variadic.
    Plus,
    /// Subtraction, left-associative, at least two arguments.
    Minus,
    /// Negation, exactly one argument.
    UnaryMinus,
    /// Multiplication, variadic.
    Times,
}
impl ArithOp {
    /// Minimal arity of `self`.
    pub fn min_arity(self) -> usize {
        match self {
            Self::UnaryMinus => 1,
            Self::Plus | Self::Minus | Self::Times => 2,
        }
    }
    /// Maximal arity for `self`, `None` if infinite.
    pub fn max_arity(self) -> Option<usize> {
        match self {
            Self::UnaryMinus => Some(1),
            Self::Plus | Self::Minus | Self::Times => None,
        }
    }

    /// Checks the arity of an application of `self`.
    pub fn check_arity(self, arity: usize) -> Res<()> {
        if arity < self.min_arity() {
            bail!(
                "`{}` expects at least {} argument(s), got {}",
                self,
                self.min_arity(),
                arity
            )
        }
        if let Some(max) = self.max_arity() {
            if arity > max {
                bail!("`{}` expects at most {} argument(s), got {}", self, max, arity)
            }
        }
        Ok(())
    }

    /// Infix representation, the same for unary and binary minus.
    pub fn infix_str(self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus | Self::UnaryMinus => "-",
            Self::Times => "*",
        }
    }
}

/// Relational operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RelOp {
    /// `<`
    Lt,
    /// `<=`
    Leq,
    /// `=`
    Eq,
    /// `!=`
    Neq,
    /// `>=`
    Geq,
    /// `>`
    Gt,
}
impl RelOp {
    /// Parses an infix relational operator.
    ///
    /// ```rust
    /// # use its_conv::expr::RelOp;
    /// assert_eq!(RelOp::of_infix("<="), Some(RelOp::Leq));
    /// assert_eq!(RelOp::of_infix("!="), Some(RelOp::Neq));
    /// assert_eq!(RelOp::of_infix("=="), None);
    /// ```
    pub fn of_infix(s: impl AsRef<str>) -> Option<Self> {
        let res = match s.as_ref() {
            "<" => Self::Lt,
            "<=" => Self::Leq,
            "=" => Self::Eq,
            "!=" => Self::Neq,
            ">=" => Self::Geq,
            ">" => Self::Gt,
            _ => return None,
        };
        Some(res)
    }
    /// Parses an SMT-LIB relation symbol.
    ///
    /// ```rust
    /// # use its_conv::expr::RelOp;
    /// assert_eq!(RelOp::of_smt("distinct"), Some(RelOp::Neq));
    /// assert_eq!(RelOp::of_smt("!="), None);
    /// ```
    pub fn of_smt(s: impl AsRef<str>) -> Option<Self> {
        let res = match s.as_ref() {
            "<" => Self::Lt,
            "<=" => Self::Leq,
            "=" => Self::Eq,
            "distinct" => Self::Neq,
            ">=" => Self::Geq,
            ">" => Self::Gt,
            _ => return None,
        };
        Some(res)
    }

    /// Infix representation.
    pub fn infix_str(self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Leq => "<=",
            Self::Eq => "=",
            Self::Neq => "!=",
            Self::Geq => ">=",
            Self::Gt => ">",
        }
    }
    /// SMT-LIB representation.
    pub fn smt_str(self) -> &'static str {
        match self {
            Self::Neq => "distinct",
            op => op.infix_str(),
        }
    }
}

/// Boolean connectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BoolOp {
    /// Conjunction.
    And,
    /// Disjunction.
    Or,
    /// Negation, exactly one argument.
    Not,
}
impl BoolOp {
    /// SMT-LIB representation.
    pub fn smt_str(self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
            Self::Not => "not",
        }
    }
}

/// Arithmetic expressions.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Expr {
    /// An integer constant.
    Int(Int),
    /// A variable.
    Var(String),
    /// An operator application.
    App {
        /// The operator.
        op: ArithOp,
        /// The arguments.
        args: Vec<Expr>,
    },
}
impl Expr {
    /// Integer constant constructor.
    pub fn int(i: impl Into<Int>) -> Self {
        Self::Int(i.into())
    }
    /// Variable constructor.
    pub fn var(id: impl Into<String>) -> Self {
        Self::Var(id.into())
    }
    /// Operator application constructor, does not check arities.
    pub fn app(op: ArithOp, args: Vec<Self>) -> Self {
        Self::App { op, args }
    }
    /// Operator application constructor.
    ///
    /// ```rust
    /// # use its_conv::expr::{ArithOp, Expr};
    /// let neg = Expr::new_op(ArithOp::UnaryMinus, vec![Expr::var("x")]).unwrap();
    /// assert_eq!(neg.to_string(), "(- x)");
    /// let err = Expr::new_op(ArithOp::Minus, vec![Expr::var("x")]).unwrap_err();
    /// assert_eq!(err.to_string(), "`-` expects at least 2 argument(s), got 1");
    /// ```
    pub fn new_op(op: ArithOp, args: Vec<Self>) -> Res<Self> {
        op.check_arity(args.len())?;
        Ok(Self::App { op, args })
    }

    /// Variable accessor.
    pub fn as_var(&self) -> Option<&str> {
        match self {
            Self::Var(id) => Some(id),
            Self::Int(_) | Self::App { .. } => None,
        }
    }

    /// Number of nodes in `self`.
    ///
    /// ```rust
    /// # use its_conv::build_expr;
    /// assert_eq!(build_expr!(x).size(), 1);
    /// assert_eq!(build_expr!((+ x (* 2 y))).size(), 5);
    /// ```
    pub fn size(&self) -> usize {
        match self {
            Self::Int(_) | Self::Var(_) => 1,
            Self::App { args, .. } => 1 + args.iter().map(Self::size).sum::<usize>(),
        }
    }

    /// Inserts all the variables appearing in `self` in `vars`.
    pub fn collect_vars(&self, vars: &mut Set<String>) {
        match self {
            Self::Int(_) => (),
            Self::Var(id) => {
                vars.insert(id.clone());
            }
            Self::App { args, .. } => {
                for arg in args {
                    arg.collect_vars(vars)
                }
            }
        }
    }
    /// Set of the variables appearing in `self`.
    pub fn vars(&self) -> Set<String> {
        let mut vars = Set::new();
        self.collect_vars(&mut vars);
        vars
    }

    /// S-expression representation, variables are escaped with `escape`.
    pub fn to_sexp(&self, escape: &impl Fn(&str) -> String) -> Sexp {
        match self {
            Self::Int(i) => Sexp::Atom(i.to_string()),
            Self::Var(id) => Sexp::Atom(escape(id)),
            Self::App { op, args } => {
                let mut elems = Vec::with_capacity(args.len() + 1);
                elems.push(Sexp::atom(op.infix_str()));
                elems.extend(args.iter().map(|arg| arg.to_sexp(escape)));
                Sexp::List(elems)
            }
        }
    }
}

/// An atomic constraint `lhs op rhs`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rel {
    /// Left operand.
    pub lhs: Expr,
    /// Relation.
    pub op: RelOp,
    /// Right operand.
    pub rhs: Expr,
}
impl Rel {
    /// Constructor.
    pub fn new(lhs: Expr, op: RelOp, rhs: Expr) -> Self {
        Self { lhs, op, rhs }
    }
}

/// Formulas.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Formula {
    /// A relation.
    Rel(Rel),
    /// A Boolean application.
    App {
        /// The connective.
        op: BoolOp,
        /// The arguments.
        args: Vec<Formula>,
    },
    /// Existential quantification.
    Exists {
        /// Quantified variables.
        vars: Vec<String>,
        /// Quantified formula.
        matrix: Box<Formula>,
    },
}
impl Formula {
    /// Canonical `true`, the empty conjunction.
    pub fn tru() -> Self {
        Self::and(vec![])
    }
    /// Canonical `false`, the empty disjunction.
    pub fn fls() -> Self {
        Self::or(vec![])
    }
    /// Relation constructor.
    pub fn rel(lhs: Expr, op: RelOp, rhs: Expr) -> Self {
        Self::Rel(Rel::new(lhs, op, rhs))
    }
    /// Conjunction constructor.
    pub fn and(args: Vec<Self>) -> Self {
        Self::App {
            op: BoolOp::And,
            args,
        }
    }
    /// Disjunction constructor.
    pub fn or(args: Vec<Self>) -> Self {
        Self::App {
            op: BoolOp::Or,
            args,
        }
    }
    /// Negation constructor.
    pub fn not(arg: Self) -> Self {
        Self::App {
            op: BoolOp::Not,
            args: vec![arg],
        }
    }
    /// Existential quantification constructor.
    pub fn exists(vars: Vec<String>, matrix: Self) -> Self {
        Self::Exists {
            vars,
            matrix: Box::new(matrix),
        }
    }

    /// True if `self` is the canonical `true`.
    pub fn is_true(&self) -> bool {
        matches!(self, Self::App { op: BoolOp::And, args } if args.is_empty())
    }
    /// True if `self` is the canonical `false`.
    pub fn is_false(&self) -> bool {
        matches!(self, Self::App { op: BoolOp::Or, args } if args.is_empty())
    }

    /// Inserts all the variables appearing in `self` in `vars`.
    ///
    /// Traverses quantifiers: variables bound by an [`Formula::Exists`] are collected when they
    /// appear in its matrix.
    ///
    /// ```rust
    /// # use its_conv::build_formula;
    /// let f = build_formula!((or (exists (z) (> x z)) (not (= y 0))));
    /// let mut vars = std::collections::BTreeSet::new();
    /// f.collect_vars(&mut vars);
    /// assert_eq!(vars.into_iter().collect::<Vec<_>>(), vec!["x", "y", "z"]);
    /// ```
    pub fn collect_vars(&self, vars: &mut Set<String>) {
        match self {
            Self::Rel(Rel { lhs, rhs, .. }) => {
                lhs.collect_vars(vars);
                rhs.collect_vars(vars)
            }
            Self::App { args, .. } => {
                for arg in args {
                    arg.collect_vars(vars)
                }
            }
            Self::Exists { matrix, .. } => matrix.collect_vars(vars),
        }
    }
    /// Set of the variables appearing in `self`.
    pub fn vars(&self) -> Set<String> {
        let mut vars = Set::new();
        self.collect_vars(&mut vars);
        vars
    }

    /// S-expression representation, variables are escaped with `escape`.
    ///
    /// Canonical `true` and `false` are the atoms `true` and `false`.
    pub fn to_sexp(&self, escape: &impl Fn(&str) -> String) -> Sexp {
        match self {
            Self::Rel(Rel { lhs, op, rhs }) => Sexp::List(vec![
                Sexp::atom(op.smt_str()),
                lhs.to_sexp(escape),
                rhs.to_sexp(escape),
            ]),
            _ if self.is_true() => Sexp::atom("true"),
            _ if self.is_false() => Sexp::atom("false"),
            Self::App { op, args } => {
                let mut elems = Vec::with_capacity(args.len() + 1);
                elems.push(Sexp::atom(op.smt_str()));
                elems.extend(args.iter().map(|arg| arg.to_sexp(escape)));
                Sexp::List(elems)
            }
            Self::Exists { vars, matrix } => {
                let decls = vars
                    .iter()
                    .map(|var| Sexp::List(vec![Sexp::Atom(escape(var)), Sexp::atom("Int")]))
                    .collect();
                Sexp::List(vec![
                    Sexp::atom("exists"),
                    Sexp::List(decls),
                    matrix.to_sexp(escape),
                ])
            }
        }
    }
}

/// KoAT rendering: infix operators, parenthesized only where precedence requires it.
mod koat {
    use super::*;

    /// Binding strength of an expression, higher binds tighter.
    fn expr_prec(expr: &Expr) -> u8 {
        match expr {
            Expr::Int(i) if i.sign() == Sign::Minus => 2,
            Expr::Int(_) | Expr::Var(_) => 4,
            Expr::App { op, args } => match op {
                ArithOp::Plus | ArithOp::Minus if args.len() > 1 => 1,
                ArithOp::Times if args.len() > 1 => 3,
                ArithOp::UnaryMinus => 2,
                // Nullary and unary applications print as their argument or a constant.
                ArithOp::Plus | ArithOp::Minus | ArithOp::Times => {
                    args.first().map(expr_prec).unwrap_or(4)
                }
            },
        }
    }

    /// Writes `expr`, parenthesized if it binds weaker than `min`.
    fn write_expr_min(expr: &Expr, min: u8, buf: &mut String) {
        if expr_prec(expr) < min {
            buf.push('(');
            write_expr(expr, buf);
            buf.push(')')
        } else {
            write_expr(expr, buf)
        }
    }

    pub fn write_expr(expr: &Expr, buf: &mut String) {
        match expr {
            Expr::Int(i) => buf.push_str(&i.to_string()),
            Expr::Var(id) => buf.push_str(id),
            Expr::App {
                op: ArithOp::UnaryMinus,
                args,
            } => {
                buf.push('-');
                for arg in args {
                    write_expr_min(arg, 2, buf)
                }
            }
            Expr::App { op, args } => {
                let (head_min, tail_min, neutral) = match op {
                    ArithOp::Plus | ArithOp::Minus => (1, 2, "0"),
                    ArithOp::Times | ArithOp::UnaryMinus => (3, 4, "1"),
                };
                if args.is_empty() {
                    buf.push_str(neutral)
                }
                for (idx, arg) in args.iter().enumerate() {
                    if idx == 0 {
                        write_expr_min(arg, head_min, buf)
                    } else {
                        buf.push(' ');
                        buf.push_str(op.infix_str());
                        buf.push(' ');
                        write_expr_min(arg, tail_min, buf)
                    }
                }
            }
        }
    }

    /// Binding strength of a formula, higher binds tighter.
    fn formula_prec(formula: &Formula) -> u8 {
        match formula {
            Formula::Rel(_) => 3,
            Formula::App { args, .. } if args.len() == 1 => formula_prec(&args[0]),
            Formula::App { args, .. } if args.is_empty() => 3,
            Formula::App { op: BoolOp::Or, .. } => 1,
            Formula::App { .. } => 2,
            Formula::Exists { matrix, .. } => formula_prec(matrix),
        }
    }

    fn write_formula_min(formula: &Formula, min: u8, buf: &mut String) -> Res<()> {
        if formula_prec(formula) < min {
            buf.push('(');
            write_formula(formula, buf)?;
            buf.push(')');
            Ok(())
        } else {
            write_formula(formula, buf)
        }
    }

    pub fn write_formula(formula: &Formula, buf: &mut String) -> Res<()> {
        match formula {
            Formula::Rel(Rel { lhs, op, rhs }) => {
                write_expr(lhs, buf);
                buf.push(' ');
                buf.push_str(op.infix_str());
                buf.push(' ');
                write_expr(rhs, buf);
            }
            _ if formula.is_true() => buf.push_str("0 <= 0"),
            _ if formula.is_false() => buf.push_str("1 <= 0"),
            Formula::App { op: BoolOp::Not, .. } => {
                return Err(Error::unsupported(format!(
                    "negation `{}` cannot be expressed in KoAT",
                    formula
                )))
            }
            Formula::App { op, args } => {
                let (head_min, tail_min, sep) = match op {
                    BoolOp::Or => (1, 2, " || "),
                    BoolOp::And | BoolOp::Not => (2, 3, " && "),
                };
                for (idx, arg) in args.iter().enumerate() {
                    if idx == 0 {
                        write_formula_min(arg, head_min, buf)?
                    } else {
                        buf.push_str(sep);
                        write_formula_min(arg, tail_min, buf)?
                    }
                }
            }
            // KoAT quantifies unbound condition variables implicitly.
            Formula::Exists { matrix, .. } => write_formula(matrix, buf)?,
        }
        Ok(())
    }
}

impl Expr {
    /// KoAT representation.
    ///
    /// ```rust
    /// # use its_conv::build_expr;
    /// assert_eq!(build_expr!((- x 1)).to_koat_string(), "x - 1");
    /// assert_eq!(build_expr!((* (+ x 1) (- y))).to_koat_string(), "(x + 1) * (-y)");
    /// assert_eq!(build_expr!((- x (- y z))).to_koat_string(), "x - (y - z)");
    /// ```
    pub fn to_koat_string(&self) -> String {
        let mut buf = String::new();
        koat::write_expr(self, &mut buf);
        buf
    }
}
impl Formula {
    /// KoAT representation, fails on negations.
    ///
    /// Existential binders are dropped.
    ///
    /// ```rust
    /// # use its_conv::build_formula;
    /// let f = build_formula!((exists (z) (and (or (> x 0) (< x z)) (= y 1))));
    /// assert_eq!(f.to_koat_string().unwrap(), "(x > 0 || x < z) && y = 1");
    /// let f = build_formula!((not (= x 0)));
    /// assert!(f.to_koat_string().is_err());
    /// ```
    pub fn to_koat_string(&self) -> Res<String> {
        let mut buf = String::new();
        koat::write_formula(self, &mut buf)?;
        Ok(buf)
    }
}

/// Identity escaping, used by `Display`.
fn verbatim(id: &str) -> String {
    id.to_string()
}

/// Packs basic trait implementations.
mod trait_impls {
    use super::*;

    impl fmt::Display for ArithOp {
        fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
            self.infix_str().fmt(fmt)
        }
    }
    impl fmt::Display for RelOp {
        fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
            self.smt_str().fmt(fmt)
        }
    }
    impl fmt::Display for BoolOp {
        fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
            self.smt_str().fmt(fmt)
        }
    }

    impl fmt::Display for Expr {
        fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
            self.to_sexp(&verbatim).to_compact_string().fmt(fmt)
        }
    }
    impl fmt::Display for Rel {
        fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
            write!(fmt, "({} {} {})", self.op, self.lhs, self.rhs)
        }
    }
    impl fmt::Display for Formula {
        fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
            self.to_sexp(&verbatim).to_compact_string().fmt(fmt)
        }
    }

    impl From<Rel> for Formula {
        fn from(rel: Rel) -> Self {
            Self::Rel(rel)
        }
    }
    impl From<Int> for Expr {
        fn from(i: Int) -> Self {
            Self::Int(i)
        }
    }
}
