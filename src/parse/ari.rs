//! ARI front end, also provides the s-expression formula and expression readers used by the
//! control-flow front end.

crate::prelude!();

use expr::{ArithOp, Expr, Formula, RelOp};
use its::{Its, Lhs, Rhs, Rule};
use sexp::Sexp;

use super::kw::unescape_ari;

/// Error for a value that is not what was expected.
pub fn malformed(expected: &str, found: &Sexp) -> Error {
    Error::malformed(format!("expected {}, found `{}`", expected, found))
}

/// Retrieves a child, fails if there is none.
pub fn child<'s>(sexp: &'s Sexp, idx: usize, what: &str) -> Res<&'s Sexp> {
    sexp.child(idx)
        .ok_or_else(|| Error::malformed(format!("missing {} in `{}`", what, sexp)))
}

/// Retrieves an atom child, bar-quotes are removed.
pub fn atom_child<'s>(sexp: &'s Sexp, idx: usize, what: &str) -> Res<&'s str> {
    let elem = child(sexp, idx, what)?;
    elem.as_atom()
        .map(unescape_ari)
        .ok_or_else(|| malformed(what, elem))
}

/// True on integer literals: an optional `-` followed by digits only.
fn is_int(atom: &str) -> bool {
    let digits = atom.strip_prefix('-').unwrap_or(atom);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Parses an expression.
///
/// `-` is a unary minus with one argument, a subtraction otherwise.
pub fn expr(sexp: &Sexp) -> Res<Expr> {
    if let Some(atom) = sexp.as_atom() {
        if is_int(atom) {
            return Int::parse_bytes(atom.as_bytes(), 10)
                .map(Expr::Int)
                .ok_or_else(|| malformed("an integer", sexp));
        }
        return Ok(Expr::var(unescape_ari(atom)));
    }
    let op = match sexp.head() {
        Some("+") => ArithOp::Plus,
        Some("*") => ArithOp::Times,
        Some("-") if sexp.args().len() == 1 => ArithOp::UnaryMinus,
        Some("-") => ArithOp::Minus,
        _ => return Err(malformed("an arithmetic expression", sexp)),
    };
    let args = sexp.args().iter().map(expr).collect::<Res<Vec<_>>>()?;
    Expr::new_op(op, args).map_err(|e| Error::malformed(format!("{} in `{}`", e, sexp)))
}

/// Parses a formula.
///
/// Supports `true`, `false`, `and`, `or`, `not`, `exists` and the relations `< <= = distinct >=
/// >`.
pub fn formula(sexp: &Sexp) -> Res<Formula> {
    match sexp.as_atom() {
        Some("true") => return Ok(Formula::tru()),
        Some("false") => return Ok(Formula::fls()),
        Some(_) => return Err(malformed("a formula", sexp)),
        None => (),
    }
    let head = sexp.head().ok_or_else(|| malformed("a formula", sexp))?;
    match head {
        "and" | "or" => {
            let args = sexp.args().iter().map(formula).collect::<Res<Vec<_>>>()?;
            if head == "and" {
                Ok(Formula::and(args))
            } else {
                Ok(Formula::or(args))
            }
        }
        "not" => match sexp.args() {
            [arg] => Ok(Formula::not(formula(arg)?)),
            _ => Err(malformed("a single argument to `not`", sexp)),
        },
        "exists" => {
            let decls = child(sexp, 1, "quantified variables")?;
            let decls = decls
                .as_list()
                .ok_or_else(|| malformed("a list of quantified variables", decls))?;
            let vars = decls
                .iter()
                .map(|decl| atom_child(decl, 0, "a quantified variable").map(String::from))
                .collect::<Res<Vec<_>>>()?;
            let matrix = formula(child(sexp, 2, "quantified formula")?)?;
            Ok(Formula::exists(vars, matrix))
        }
        _ => {
            let op = RelOp::of_smt(head)
                .ok_or_else(|| Error::malformed(format!("unknown relation `{}`", head)))?;
            match sexp.args() {
                [lhs, rhs] => Ok(Formula::rel(expr(lhs)?, op, expr(rhs)?)),
                _ => Err(malformed("two arguments", sexp)),
            }
        }
    }
}

/// Parses a location application, an atom is a nullary location.
fn application<T>(
    sexp: &Sexp,
    what: &str,
    arg: impl Fn(&Sexp) -> Res<T>,
) -> Res<(String, Vec<T>)> {
    if let Some(loc) = sexp.as_atom() {
        return Ok((unescape_ari(loc).into(), vec![]));
    }
    let loc = atom_child(sexp, 0, what)?;
    let args = sexp.args().iter().map(arg).collect::<Res<Vec<_>>>()?;
    Ok((loc.into(), args))
}

/// Parses a `(rule lhs rhs :guard cond)` declaration.
pub fn rule(sexp: &Sexp) -> Res<Rule> {
    let (loc, args) = application(child(sexp, 1, "left-hand side")?, "a location", |arg| {
        arg.as_atom()
            .map(|var| unescape_ari(var).to_string())
            .ok_or_else(|| malformed("a variable", arg))
    })?;
    let lhs = Lhs::new(loc, args);
    let (loc, args) = application(child(sexp, 2, "right-hand side")?, "a location", expr)?;
    let rhs = Rhs::new(loc, args);

    let mut cond = None;
    let mut attrs = sexp.args().iter().skip(2);
    while let Some(key) = attrs.next() {
        let val = attrs
            .next()
            .ok_or_else(|| malformed("an attribute value", sexp))?;
        match key.as_atom() {
            Some(":guard") if cond.is_none() => cond = Some(formula(val)?),
            Some(":guard") => bail!(Error::malformed(format!("duplicate guard in `{}`", sexp))),
            Some(other) => bail!(Error::unsupported(format!("rule attribute `{}`", other))),
            None => bail!(malformed("an attribute", key)),
        }
    }

    Ok(Rule::new(lhs, rhs, cond.unwrap_or_else(Formula::tru)))
}

/// Parses a list of ARI declarations.
pub fn parse(root: &Sexp) -> Res<Its> {
    let mut init = None;
    let mut rules = vec![];
    for decl in root.as_list().unwrap_or(&[]) {
        match decl.head() {
            Some("entrypoint") => init = Some(atom_child(decl, 1, "entrypoint")?.to_string()),
            Some("rule") => {
                let rule = rule(decl).chain_err(|| format!("while parsing rule #{}", rules.len() + 1))?;
                rules.push(rule)
            }
            Some(other) => debug!("skipping `{}` declaration", other),
            None => bail!(malformed("a declaration", decl)),
        }
    }
    let init = init.ok_or_else(|| Error::malformed("missing `entrypoint` declaration"))?;
    debug!("parsed ARI system with {} rule(s)", rules.len());
    Ok(Its { init, rules })
}
