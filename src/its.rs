//! Integer transition systems.
//!
//! An [`Its`] is a start location and a list of [`Rule`]s `f(x_1, ...) -> g(e_1, ...) :|: cond`.
//! It can be printed in the three supported formats:
//!
//! - [`Its::to_ari`]: ARI LCTRS s-expressions;
//! - [`Its::to_koat`]: KoAT rule-based text;
//! - [`Its::to_cfg`]: SMT-LIB control-flow definitions.

crate::prelude!();

use expr::{Expr, Formula};
use parse::kw::{self, escape_ari};
use sexp::Sexp;

#[cfg(test)]
mod test;

/// Left-hand side of a rule: the pre-state location and its parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Lhs {
    /// Location.
    pub loc: String,
    /// Parameters.
    pub args: Vec<String>,
}
impl Lhs {
    /// Constructor.
    pub fn new(loc: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            loc: loc.into(),
            args,
        }
    }
}

/// Right-hand side of a rule: the post-state location and one update per parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rhs {
    /// Location.
    pub loc: String,
    /// Updates.
    pub args: Vec<Expr>,
}
impl Rhs {
    /// Constructor.
    pub fn new(loc: impl Into<String>, args: Vec<Expr>) -> Self {
        Self {
            loc: loc.into(),
            args,
        }
    }

    /// Inserts the variables of the updates in `vars`.
    pub fn collect_vars(&self, vars: &mut Set<String>) {
        for arg in &self.args {
            arg.collect_vars(vars)
        }
    }
}

/// A guarded transition between two locations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rule {
    /// Pre-state.
    pub lhs: Lhs,
    /// Post-state.
    pub rhs: Rhs,
    /// Guard.
    pub cond: Formula,
}
impl Rule {
    /// Constructor.
    pub fn new(lhs: Lhs, rhs: Rhs, cond: Formula) -> Self {
        Self { lhs, rhs, cond }
    }

    /// Constructor, existentially quantifies the condition variables bound by neither side.
    ///
    /// Quantified variables are in lexicographic order.
    ///
    /// ```rust
    /// # use its_conv::{build_expr, build_formula, its::*};
    /// let rule = Rule::new_synth(
    ///     Lhs::new("f", vec!["x".into()]),
    ///     Rhs::new("g", vec![build_expr!(y)]),
    ///     build_formula!((and (< x z) (> y w))),
    /// );
    /// assert_eq!(
    ///     rule.cond,
    ///     build_formula!((exists (w z) (and (< x z) (> y w)))),
    /// );
    /// ```
    pub fn new_synth(lhs: Lhs, rhs: Rhs, cond: Formula) -> Self {
        let mut bound: Set<String> = lhs.args.iter().cloned().collect();
        rhs.collect_vars(&mut bound);
        let extra: Vec<String> = cond
            .vars()
            .into_iter()
            .filter(|var| !bound.contains(var))
            .collect();
        let cond = if extra.is_empty() {
            cond
        } else {
            trace!("quantifying {:?} in rule from `{}`", extra, lhs.loc);
            Formula::exists(extra, cond)
        };
        Self::new(lhs, rhs, cond)
    }

    /// Inserts the variables of the rule in `vars`.
    pub fn collect_vars(&self, vars: &mut Set<String>) {
        vars.extend(self.lhs.args.iter().cloned());
        self.rhs.collect_vars(vars);
        self.cond.collect_vars(vars)
    }

    /// ARI representation `(rule lhs rhs :guard cond)`.
    pub fn to_ari(&self) -> Sexp {
        let mut lhs = Sexp::list(vec![Sexp::Atom(escape_ari(&self.lhs.loc))]);
        for arg in &self.lhs.args {
            lhs.add_child(escape_ari(arg))
        }
        let mut rhs = Sexp::list(vec![Sexp::Atom(escape_ari(&self.rhs.loc))]);
        for arg in &self.rhs.args {
            rhs.add_child(arg.to_sexp(&escape_ari))
        }
        let mut rule = Sexp::list(vec!["rule".into(), lhs, rhs]);
        if !self.cond.is_true() {
            rule.add_child(":guard");
            rule.add_child(self.cond.to_sexp(&escape_ari))
        }
        rule
    }

    /// KoAT representation `lhs -> rhs :|: cond`.
    pub fn to_koat(&self) -> Res<String> {
        let mut res = format!("{}({}) -> {}(", self.lhs.loc, self.lhs.args.join(", "), self.rhs.loc);
        for (idx, arg) in self.rhs.args.iter().enumerate() {
            if idx > 0 {
                res.push_str(", ")
            }
            res.push_str(&arg.to_koat_string())
        }
        res.push(')');
        if !self.cond.is_true() {
            res.push_str(" :|: ");
            res.push_str(&self.cond.to_koat_string()?)
        }
        Ok(res)
    }
}

/// An integer transition system.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Its {
    /// Start location.
    pub init: String,
    /// Rules, in input order.
    pub rules: Vec<Rule>,
}
impl Its {
    /// Constructor, no rules.
    pub fn new(init: impl Into<String>) -> Self {
        Self {
            init: init.into(),
            rules: vec![],
        }
    }

    /// Map from the locations of the system to their arities.
    ///
    /// The first arity seen for a location wins, conflicting arities are ignored with a warning.
    pub fn locations(&self) -> Map<String, usize> {
        let mut res = Map::new();
        for rule in &self.rules {
            let sides = [
                (&rule.lhs.loc, rule.lhs.args.len()),
                (&rule.rhs.loc, rule.rhs.args.len()),
            ];
            for (loc, arity) in sides {
                let known = *res.entry(loc.clone()).or_insert(arity);
                if known != arity {
                    warn!(
                        "location `{}` used with arity {} and {}, keeping {}",
                        loc, known, arity, known
                    )
                }
            }
        }
        res
    }

    /// All the variables of the system, including existentially quantified ones.
    pub fn vars(&self) -> Set<String> {
        let mut res = Set::new();
        for rule in &self.rules {
            rule.collect_vars(&mut res)
        }
        res
    }

    /// ARI representation, a list of top-level declarations.
    ///
    /// ```rust
    /// # use its_conv::{build_expr, build_formula, its::*, sexp::Layout};
    /// let mut its = Its::new("f");
    /// its.rules.push(Rule::new(
    ///     Lhs::new("f", vec!["x".into()]),
    ///     Rhs::new("f", vec![build_expr!((- x 1))]),
    ///     build_formula!((> x 0)),
    /// ));
    /// assert_eq!(
    ///     its.to_ari().to_document(Layout::Compact),
    ///     "\
    /// (format LCTRS)
    /// (theory Ints)
    /// (fun f (-> Int Int))
    /// (entrypoint f)
    /// (rule (f x) (f (- x 1)) :guard (> x 0))
    /// ",
    /// );
    /// ```
    pub fn to_ari(&self) -> Sexp {
        let mut res = Sexp::list(vec![
            Sexp::list(vec!["format".into(), "LCTRS".into()]),
            Sexp::list(vec!["theory".into(), "Ints".into()]),
        ]);
        for (loc, arity) in self.locations() {
            let typ = if arity == 0 {
                Sexp::atom("Int")
            } else {
                let mut typ = Sexp::list(vec!["->".into()]);
                for _ in 0..=arity {
                    typ.add_child("Int")
                }
                typ
            };
            res.add_child(Sexp::list(vec!["fun".into(), escape_ari(&loc).into(), typ]))
        }
        res.add_child(Sexp::list(vec![
            "entrypoint".into(),
            escape_ari(&self.init).into(),
        ]));
        for rule in &self.rules {
            res.add_child(rule.to_ari())
        }
        res
    }

    /// KoAT representation.
    ///
    /// Fails on negations, existential binders are dropped.
    ///
    /// ```rust
    /// # use its_conv::{build_expr, build_formula, its::*};
    /// let mut its = Its::new("f");
    /// its.rules.push(Rule::new(
    ///     Lhs::new("f", vec!["x".into()]),
    ///     Rhs::new("f", vec![build_expr!((- x 1))]),
    ///     build_formula!((> x 0)),
    /// ));
    /// assert_eq!(
    ///     its.to_koat().unwrap(),
    ///     "\
    /// (GOAL COMPLEXITY)
    /// (STARTTERM (FUNCTIONSYMBOLS f))
    /// (VAR x)
    /// (RULES
    ///   f(x) -> f(x - 1) :|: x > 0
    /// )
    /// ",
    /// );
    /// ```
    pub fn to_koat(&self) -> Res<String> {
        let mut res = format!("(GOAL COMPLEXITY)\n(STARTTERM (FUNCTIONSYMBOLS {}))\n(VAR", self.init);
        for var in self.vars() {
            res.push(' ');
            res.push_str(&var)
        }
        res.push_str(")\n(RULES\n");
        for (idx, rule) in self.rules.iter().enumerate() {
            let line = rule
                .to_koat()
                .chain_err(|| format!("while printing rule #{}", idx + 1))?;
            res.push_str("  ");
            res.push_str(&line);
            res.push('\n')
        }
        res.push_str(")\n");
        Ok(res)
    }

    /// SMT-LIB control-flow representation, a list of top-level declarations.
    ///
    /// Fails if an update is not a variable, or if the rules do not share the same pre-state
    /// and post-state parameters.
    pub fn to_cfg(&self) -> Res<Sexp> {
        let locs = self.locations();
        let first = self.rules.first();
        let pre: &[String] = first.map(|rule| &rule.lhs.args[..]).unwrap_or(&[]);
        let post: Vec<&str> = match first {
            Some(rule) => Self::post_vars(rule)?,
            None => vec![],
        };
        for (idx, rule) in self.rules.iter().enumerate() {
            let rule_post = Self::post_vars(rule)
                .chain_err(|| format!("while printing rule #{}", idx + 1))?;
            if rule.lhs.args != pre || rule_post != post {
                bail!(ErrorKind::Unsupported(format!(
                    "rule #{} from `{}` to `{}` does not use the parameters ({}) -> ({}) \
                    of the first rule",
                    idx + 1,
                    rule.lhs.loc,
                    rule.rhs.loc,
                    pre.join(" "),
                    post.join(" "),
                )))
            }
        }

        for var in pre.iter().map(String::as_str).chain(post.iter().copied()) {
            if kw::cfg::all.contains(var) {
                bail!(ErrorKind::Unsupported(format!(
                    "variable `{}` is a reserved name of the control-flow format",
                    var
                )))
            }
        }

        let typed = |id: &str, typ: &str| Sexp::list(vec![escape_ari(id).into(), typ.into()]);

        let mut names: Set<&str> = locs.keys().map(String::as_str).collect();
        names.insert(self.init.as_str());

        let mut res = Sexp::nil();
        res.add_child(Sexp::list(vec!["declare-sort".into(), "Loc".into(), "0".into()]));
        let mut distinct = Sexp::list(vec!["distinct".into()]);
        for loc in &names {
            res.add_child(Sexp::list(vec![
                "declare-const".into(),
                escape_ari(loc).into(),
                "Loc".into(),
            ]));
            distinct.add_child(escape_ari(loc))
        }
        // `distinct` needs at least two arguments.
        if names.len() > 1 {
            res.add_child(Sexp::list(vec!["assert".into(), distinct]))
        }
        for def in CFG_DEFS {
            if let Sexp::List(defs) = sexp::parse(def)? {
                for def in defs {
                    res.add_child(def)
                }
            }
        }

        let mut args = Sexp::list(vec![typed("pc", "Loc")]);
        for var in pre {
            args.add_child(typed(var, "Int"))
        }
        res.add_child(Sexp::list(vec![
            "define-fun".into(),
            "init_main".into(),
            args.clone(),
            "Bool".into(),
            Sexp::list(vec![
                "cfg_init".into(),
                "pc".into(),
                escape_ari(&self.init).into(),
                "true".into(),
            ]),
        ]));

        args.add_child(typed("pc1", "Loc"));
        for var in &post {
            args.add_child(typed(var, "Int"))
        }
        let body = if self.rules.is_empty() {
            Sexp::atom("false")
        } else {
            let mut disj = Sexp::list(vec!["or".into()]);
            for rule in &self.rules {
                disj.add_child(Sexp::list(vec![
                    "cfg_trans2".into(),
                    "pc".into(),
                    escape_ari(&rule.lhs.loc).into(),
                    "pc1".into(),
                    escape_ari(&rule.rhs.loc).into(),
                    rule.cond.to_sexp(&escape_ari),
                ]))
            }
            disj
        };
        res.add_child(Sexp::list(vec![
            "define-fun".into(),
            "next_main".into(),
            args,
            "Bool".into(),
            body,
        ]));
        Ok(res)
    }

    /// Post-state variables of a rule, fails if an update is not a variable.
    fn post_vars(rule: &Rule) -> Res<Vec<&str>> {
        rule.rhs
            .args
            .iter()
            .map(|arg| {
                arg.as_var().ok_or_else(|| {
                    Error::unsupported(format!(
                        "update `{}` of location `{}` is not a variable",
                        arg, rule.rhs.loc
                    ))
                })
            })
            .collect()
    }
}

/// Control-flow predicates shared by all the SMT-LIB outputs.
const CFG_DEFS: [&str; 3] = [
    "(define-fun cfg_init ((pc Loc) (src Loc) (rel Bool)) Bool (and (= pc src) rel))",
    "(define-fun cfg_trans2 ((pc Loc) (src Loc) (pc1 Loc) (dst Loc) (rel Bool)) Bool \
        (and (= pc src) (= pc1 dst) rel))",
    "(define-fun cfg_trans3 ((pc Loc) (exit Loc) (pc1 Loc) (call Loc) (pc2 Loc) (return Loc) \
        (rel Bool)) Bool (and (= pc exit) (= pc1 call) (= pc2 return) rel))",
];
