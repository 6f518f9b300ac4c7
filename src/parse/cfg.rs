//! SMT-LIB control-flow front end.
//!
//! Only `init_main` and `next_main` are read, the other declarations describe the encoding and
//! are skipped.

crate::prelude!();

use expr::Expr;
use its::{Its, Lhs, Rhs, Rule};
use sexp::Sexp;

use super::ari::{atom_child, child, formula, malformed};

/// Parameters of `next_main`, without the program counters.
#[derive(Debug, Default)]
struct Scope {
    pre: Vec<String>,
    post: Vec<String>,
}
impl Scope {
    /// Reads `((pc Loc) (x Int) ... (pc1 Loc) (x1 Int) ...)`.
    fn new(params: &Sexp) -> Res<Self> {
        let params = params
            .as_list()
            .ok_or_else(|| malformed("a parameter list", params))?;
        let mut scope = Self::default();
        let mut locs = 0;
        for param in params {
            let name = atom_child(param, 0, "a parameter name")?;
            match atom_child(param, 1, "a parameter sort")? {
                "Loc" if locs < 2 => locs += 1,
                "Loc" => bail!(Error::unsupported(format!(
                    "`next_main` with more than two `Loc` parameters (`{}`)",
                    name
                ))),
                "Int" if locs == 0 => bail!(Error::malformed(format!(
                    "`next_main` parameter `{}` appears before the program counter",
                    name
                ))),
                "Int" if locs == 1 => scope.pre.push(name.into()),
                "Int" => scope.post.push(name.into()),
                other => bail!(Error::unsupported(format!(
                    "`next_main` parameter `{}` of sort `{}`",
                    name, other
                ))),
            }
        }
        if scope.pre.len() != scope.post.len() {
            bail!(Error::malformed(format!(
                "`next_main` has {} pre-state and {} post-state parameters",
                scope.pre.len(),
                scope.post.len()
            )))
        }
        Ok(scope)
    }

    /// Builds the rule encoded by a `(cfg_trans2 pc src pc1 dst cond)` term.
    fn rule(&self, term: &Sexp) -> Res<Rule> {
        let src = atom_child(term, 2, "a source location")?;
        let dst = atom_child(term, 4, "a destination location")?;
        let cond = formula(child(term, 5, "a transition condition")?)?;
        let lhs = Lhs::new(src, self.pre.clone());
        let rhs = Rhs::new(dst, self.post.iter().map(Expr::var).collect());
        Ok(Rule::new(lhs, rhs, cond))
    }
}

/// Extracts the start location from the body of `init_main`.
fn init(def: &Sexp) -> Res<String> {
    let body = child(def, 4, "`init_main` body")?;
    if body.head() != Some("cfg_init") {
        bail!(malformed("a `cfg_init` application", body))
    }
    let cond = child(body, 3, "initial condition")?;
    if cond.as_atom() != Some("true") {
        bail!(Error::unsupported(format!("conditional initial state `{}`", cond)))
    }
    Ok(atom_child(body, 2, "initial location")?.to_string())
}

/// Extracts the rules from `next_main`.
fn rules(def: &Sexp) -> Res<Vec<Rule>> {
    let scope = Scope::new(child(def, 2, "`next_main` parameters")?)?;
    let body = child(def, 4, "`next_main` body")?;
    let terms = match body.head() {
        Some("or") => body.args(),
        Some(_) => std::slice::from_ref(body),
        None if body.as_atom() == Some("false") => &[],
        None => bail!(malformed("a disjunction of transitions", body)),
    };
    let mut rules = Vec::with_capacity(terms.len());
    for term in terms {
        match term.head() {
            Some("cfg_trans2") => {
                let rule = scope
                    .rule(term)
                    .chain_err(|| format!("while parsing transition #{}", rules.len() + 1))?;
                rules.push(rule)
            }
            Some("cfg_trans3") => warn!("skipping unsupported `cfg_trans3` transition"),
            _ => bail!(malformed("a `cfg_trans2` application", term)),
        }
    }
    Ok(rules)
}

/// Parses a list of SMT-LIB control-flow declarations.
pub fn parse(root: &Sexp) -> Res<Its> {
    let mut start = None;
    let mut transs = None;
    for decl in root.as_list().unwrap_or(&[]) {
        if decl.head() != Some("define-fun") {
            trace!("skipping `{}`", decl);
            continue;
        }
        match atom_child(decl, 1, "a function name")? {
            "init_main" => start = Some(init(decl)?),
            "next_main" => transs = Some(rules(decl)?),
            other => trace!("skipping definition of `{}`", other),
        }
    }
    let init = start.ok_or_else(|| Error::malformed("missing `init_main` definition"))?;
    let rules = transs.unwrap_or_else(|| {
        warn!("no `next_main` definition, the system has no rules");
        vec![]
    });
    debug!("parsed control-flow system with {} rule(s)", rules.len());
    Ok(Its { init, rules })
}
