//! Builds an ITS from a KoAT parse tree.

crate::prelude!();

use super::{ast, Span, Spn};
use expr::{ArithOp, Expr, Formula, RelOp};
use its::{Its, Lhs, Rhs, Rule};

/// Maximal size of the product `a^k` expands to, in expression nodes.
pub const MAX_POW_SIZE: usize = 1 << 16;

/// Walks KoAT parse trees, remembers the input text for error reporting.
pub struct Builder<'txt> {
    txt: &'txt str,
}
impl<'txt> Builder<'txt> {
    /// Constructor.
    pub fn new(txt: &'txt str) -> Self {
        Self { txt }
    }

    /// Parse error at some span.
    fn fail(&self, span: Span, msg: impl Into<String>) -> Error {
        span.error(self.txt, msg)
    }

    /// Builds the whole system.
    pub fn build(&self, tree: ast::Koat) -> Res<Its> {
        let init = match tree.sink {
            Some(sink) => {
                debug!("sink `{}` replaces start location `{}`", sink, tree.start);
                sink.inner
            }
            None => tree.start.inner,
        };
        let mut its = Its::new(init);
        for trans in tree.transs {
            let rule = self.trans(trans)?;
            its.rules.push(rule)
        }
        Ok(its)
    }

    /// Builds a rule, quantifying unbound condition variables existentially.
    pub fn trans(&self, trans: ast::Trans) -> Res<Rule> {
        let ast::Trans { lhs, com, cond, .. } = trans;
        let lhs = Lhs::new(
            lhs.loc.inner,
            lhs.args.into_iter().map(|arg| arg.inner.to_string()).collect(),
        );
        let rhs = self.com(com)?;
        let cond = match cond {
            Some(cond) => self.formula(cond)?,
            None => Formula::tru(),
        };
        Ok(Rule::new_synth(lhs, rhs, cond))
    }

    /// Extracts the single right-hand side of a command.
    pub fn com(&self, com: ast::Com) -> Res<Rhs> {
        let ast::Com { sym, mut rhss } = com;
        let count = rhss.len();
        match rhss.pop() {
            Some(rhs) if count == 1 => self.rhs(rhs),
            _ => {
                let (name, span) = sym
                    .map(|sym| (sym.inner, sym.span))
                    .unwrap_or(("Com", Span::new(0, 0)));
                let (_, row, col, _, _) = span.pretty_of(self.txt);
                Err(Error::unsupported(format!(
                    "`{}` at {}:{} has {} right-hand sides, Com symbols are not supported",
                    name,
                    row + 1,
                    col + 1,
                    count,
                )))
            }
        }
    }

    /// Builds a right-hand side.
    pub fn rhs(&self, rhs: ast::Rhs) -> Res<Rhs> {
        let args = rhs
            .args
            .into_iter()
            .map(|arg| self.expr(arg))
            .collect::<Res<Vec<_>>>()?;
        Ok(Rhs::new(rhs.loc.inner, args))
    }

    /// Builds a formula.
    pub fn formula(&self, formula: ast::Formula) -> Res<Formula> {
        match formula {
            ast::Formula::Lit { lhs, op, rhs } => {
                let op = self.relop(op)?;
                Ok(Formula::rel(self.expr(lhs)?, op, self.expr(rhs)?))
            }
            ast::Formula::Bin { op, lft, rgt } => {
                let args = vec![self.formula(*lft)?, self.formula(*rgt)?];
                match op.inner {
                    "&&" | "/\\" => Ok(Formula::and(args)),
                    "||" | "\\/" => Ok(Formula::or(args)),
                    _ => Err(self.fail(
                        op.span,
                        format!("unknown Boolean connective `{}`", op.inner),
                    )),
                }
            }
            ast::Formula::Paren(formula, _) => self.formula(*formula),
        }
    }

    /// Builds a relational operator.
    pub fn relop(&self, op: Spn<&str>) -> Res<RelOp> {
        RelOp::of_infix(op.inner).ok_or_else(|| {
            self.fail(
                op.span,
                format!("unknown relational operator `{}`", op.inner),
            )
        })
    }

    /// Builds an integer literal.
    fn int(&self, n: Spn<&str>) -> Res<Int> {
        Int::parse_bytes(n.inner.as_bytes(), 10)
            .ok_or_else(|| self.fail(n.span, format!("illegal integer `{}`", n.inner)))
    }

    /// Builds an expression, `a^k` becomes a `k`-fold product of `a`.
    pub fn expr(&self, expr: ast::Expr) -> Res<Expr> {
        match expr {
            ast::Expr::Int(n) => Ok(Expr::Int(self.int(n)?)),
            ast::Expr::Var(var) => Ok(Expr::var(var.inner)),
            ast::Expr::Paren(expr, _) => self.expr(*expr),
            ast::Expr::Neg(_, arg) => Ok(Expr::app(ArithOp::UnaryMinus, vec![self.expr(*arg)?])),
            ast::Expr::Bin { op, lft, rgt } => {
                let op_res = match op.inner {
                    "+" => ArithOp::Plus,
                    "-" => ArithOp::Minus,
                    "*" => ArithOp::Times,
                    "^" => return self.pow(*lft, *rgt),
                    _ => {
                        return Err(self.fail(
                            op.span,
                            format!("unknown arithmetic operator `{}`", op.inner),
                        ))
                    }
                };
                Ok(Expr::app(op_res, vec![self.expr(*lft)?, self.expr(*rgt)?]))
            }
        }
    }

    /// Expands `base^exp`, `exp` must be an integer literal.
    fn pow(&self, base: ast::Expr, exp: ast::Expr) -> Res<Expr> {
        let exp_span = exp.span();
        let k = match exp {
            ast::Expr::Int(n) => self.int(n)?,
            _ => {
                return Err(self.fail(
                    exp_span,
                    "exponents must be non-negative integer literals",
                ))
            }
        };
        let base = self.expr(base)?;
        let k = k
            .to_usize()
            .filter(|k| k.saturating_mul(base.size()) <= MAX_POW_SIZE)
            .ok_or_else(|| {
                self.fail(
                    exp_span,
                    format!(
                        "exponent `{}` is too large, expansion exceeds {} nodes",
                        k, MAX_POW_SIZE
                    ),
                )
            })?;
        let res = match k {
            0 => Expr::int(1),
            1 => base,
            _ => Expr::app(ArithOp::Times, vec![base; k]),
        };
        Ok(res)
    }
}
