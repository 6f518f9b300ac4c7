//! Tests over transition systems and their printers.

crate::prelude!();

use expr::{Expr, Formula};
use its::*;
use sexp::Layout;

fn lhs(loc: &str, args: &[&str]) -> Lhs {
    Lhs::new(loc, args.iter().map(|arg| arg.to_string()).collect())
}

/// Error message with all its causes.
fn chain(e: &Error) -> String {
    e.iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Counts `x` down, `z` is an existential witness.
fn countdown() -> Its {
    let mut its = Its::new("f");
    its.rules.push(Rule::new_synth(
        lhs("f", &["x"]),
        Rhs::new("f", vec![build_expr!((- x 1))]),
        build_formula!((and (> x 0) (< z x))),
    ));
    its.rules.push(Rule::new(
        lhs("f", &["x"]),
        Rhs::new("end", vec![]),
        build_formula!((<= x 0)),
    ));
    its
}

#[test]
fn synthesis() {
    let rule = Rule::new_synth(
        lhs("f", &["x"]),
        Rhs::new("g", vec![build_expr!(y)]),
        build_formula!((and (< x z) (> y w))),
    );
    match &rule.cond {
        Formula::Exists { vars, matrix } => {
            assert_eq!(vars, &["w", "z"]);
            assert_eq!(**matrix, build_formula!((and (< x z) (> y w))));
        }
        cond => panic!("expected an existential, got `{}`", cond),
    }

    // Nothing to quantify.
    let rule = Rule::new_synth(
        lhs("f", &["x"]),
        Rhs::new("g", vec![build_expr!((+ x y))]),
        build_formula!((< x y)),
    );
    assert_eq!(rule.cond, build_formula!((< x y)));

    let rule = Rule::new_synth(lhs("f", &[]), Rhs::new("g", vec![]), Formula::tru());
    assert!(rule.cond.is_true());
}

#[test]
fn locations() {
    let mut its = Its::new("f");
    its.rules.push(Rule::new(
        lhs("f", &["x"]),
        Rhs::new("g", vec![build_expr!(x)]),
        Formula::tru(),
    ));
    its.rules.push(Rule::new(
        lhs("g", &[]),
        Rhs::new("h", vec![]),
        Formula::tru(),
    ));
    let locs: Vec<_> = its.locations().into_iter().collect();
    assert_eq!(
        locs,
        vec![("f".to_string(), 1), ("g".to_string(), 1), ("h".to_string(), 0)]
    );

    assert!(Its::new("f").locations().is_empty());
}

#[test]
fn vars() {
    let its = countdown();
    assert_eq!(
        its.vars().into_iter().collect::<Vec<_>>(),
        vec!["x".to_string(), "z".to_string()]
    );
}

#[test]
fn koat_output() {
    let its = countdown();
    assert_eq!(
        its.to_koat().unwrap(),
        "\
(GOAL COMPLEXITY)
(STARTTERM (FUNCTIONSYMBOLS f))
(VAR x z)
(RULES
  f(x) -> f(x - 1) :|: x > 0 && z < x
  f(x) -> end() :|: x <= 0
)
"
    );
}

#[test]
fn koat_end_to_end() {
    let input = "\
(GOAL COMPLEXITY)
(STARTTERM (FUNCTIONSYMBOLS f))
(VAR x)
(RULES
  f(x) -> f(x-1) :|: x > 0
)";
    println!("input:\n{}", input);
    let its = parse::koat(input).unwrap();
    assert_eq!(its.rules.len(), 1);
    let rule = &its.rules[0];
    assert_eq!(rule.lhs, lhs("f", &["x"]));
    assert_eq!(rule.rhs, Rhs::new("f", vec![build_expr!((- x 1))]));
    assert_eq!(rule.cond, build_formula!((> x 0)));

    let output = its.to_koat().unwrap();
    println!("output:\n{}", output);
    assert!(output.contains("  f(x) -> f(x - 1) :|: x > 0\n"));
    assert_eq!(parse::koat(&output).unwrap(), its);
}

#[test]
fn ari_round_trip() {
    let mut its = countdown();
    its.rules.push(Rule::new(
        lhs("end", &[]),
        Rhs::new("f'", vec![build_expr!(x)]),
        build_formula!((or (distinct x 3) (not (= x (* 2 x))))),
    ));
    its.rules.push(Rule::new(
        lhs("f'", &["x"]),
        Rhs::new("rule", vec![]),
        Formula::fls(),
    ));

    for layout in [Layout::Compact, Layout::Indented] {
        let ari = its.to_ari().to_document(layout);
        println!("{:?}:\n{}", layout, ari);
        assert!(ari.contains("(entrypoint f)"));
        assert!(ari.contains("(fun |f'| (-> Int Int))"));
        assert!(ari.contains("(fun end Int)"));
        assert!(ari.contains("(rule (|f'| x) |rule| :guard false)"));
        assert_eq!(parse::ari(&ari).unwrap(), its);
    }
}

#[test]
fn canonical_truth() {
    let mut its = Its::new("f");
    its.rules.push(Rule::new(
        lhs("f", &["x"]),
        Rhs::new("g", vec![build_expr!(x)]),
        Formula::tru(),
    ));
    its.rules.push(Rule::new(
        lhs("g", &["x"]),
        Rhs::new("f", vec![build_expr!(x)]),
        Formula::fls(),
    ));

    let koat = its.to_koat().unwrap();
    assert!(koat.contains("  f(x) -> g(x)\n"));
    assert!(koat.contains("  g(x) -> f(x) :|: 1 <= 0\n"));

    let ari = its.to_ari().to_document(Layout::Compact);
    assert!(ari.contains("(rule (f x) (g x))\n"));
    assert!(ari.contains("(rule (g x) (f x) :guard false)\n"));

    let cfg = its.to_cfg().unwrap().to_document(Layout::Compact);
    assert!(cfg.contains("(cfg_trans2 pc f pc1 g true)"));
    assert!(cfg.contains("(cfg_trans2 pc g pc1 f false)"));
}

#[test]
fn koat_rejects_negation() {
    let mut its = Its::new("f");
    its.rules.push(Rule::new(
        lhs("f", &["x"]),
        Rhs::new("f", vec![build_expr!(x)]),
        build_formula!((not (= x 0))),
    ));
    let err = its.to_koat().unwrap_err();
    assert_eq!(
        chain(&err),
        "while printing rule #1 | \
        unsupported construct: negation `(not (= x 0))` cannot be expressed in KoAT"
    );
}

#[test]
fn cfg_output() {
    let mut its = Its::new("start");
    its.rules.push(Rule::new(
        lhs("start", &["x"]),
        Rhs::new("loop", vec![build_expr!(x1)]),
        build_formula!((= x1 x)),
    ));
    its.rules.push(Rule::new(
        lhs("loop", &["x"]),
        Rhs::new("loop", vec![build_expr!(x1)]),
        build_formula!((and (> x 0) (= x1 (- x 1)))),
    ));
    let cfg = its.to_cfg().unwrap().to_document(Layout::Compact);
    println!("{}", cfg);
    assert!(cfg.starts_with(
        "\
(declare-sort Loc 0)
(declare-const loop Loc)
(declare-const start Loc)
(assert (distinct loop start))
(define-fun cfg_init ((pc Loc) (src Loc) (rel Bool)) Bool (and (= pc src) rel))
"
    ));
    assert!(cfg.contains("(define-fun init_main ((pc Loc) (x Int)) Bool (cfg_init pc start true))\n"));
    assert!(cfg.contains(
        "\
(define-fun
next_main
((pc Loc) (x Int) (pc1 Loc) (x1 Int))
Bool
(or
(cfg_trans2 pc start pc1 loop (= x1 x))
(cfg_trans2 pc loop pc1 loop (and (> x 0) (= x1 (- x 1))))"
    ));

    assert_eq!(parse::cfg(&cfg).unwrap(), its);
}

#[test]
fn cfg_without_rules() {
    let its = Its::new("f");
    let cfg = its.to_cfg().unwrap().to_document(Layout::Compact);
    println!("{}", cfg);
    assert!(cfg.contains("(declare-const f Loc)\n"));
    assert!(!cfg.contains("(assert"));
    assert!(cfg.contains("(define-fun init_main ((pc Loc)) Bool (cfg_init pc f true))\n"));
    assert!(cfg.contains("(define-fun next_main ((pc Loc) (pc1 Loc)) Bool false)\n"));
    assert_eq!(parse::cfg(&cfg).unwrap(), its);
}

#[test]
fn cfg_rejects_updates() {
    let its = parse::koat(crate::KOAT_DEMO).unwrap();
    let err = its.to_cfg().unwrap_err();
    assert_eq!(
        chain(&err),
        "while printing rule #2 | \
        unsupported construct: update `(- x 1)` of location `loop` is not a variable"
    );

    let mut its = Its::new("f");
    its.rules.push(Rule::new(
        lhs("f", &["x"]),
        Rhs::new("g", vec![build_expr!(x1)]),
        Formula::tru(),
    ));
    its.rules.push(Rule::new(
        lhs("g", &["y"]),
        Rhs::new("f", vec![build_expr!(y1)]),
        Formula::tru(),
    ));
    let err = its.to_cfg().unwrap_err();
    assert_eq!(
        err.to_string(),
        "unsupported construct: rule #2 from `g` to `f` does not use the parameters (x) -> (x1) \
        of the first rule"
    );
}

#[test]
fn cfg_rejects_reserved_vars() {
    for (pre, post) in [("pc", "x1"), ("x", "pc1"), ("true", "x1"), ("x", "Int")] {
        let mut its = Its::new("f");
        its.rules.push(Rule::new(
            lhs("f", &[pre]),
            Rhs::new("g", vec![Expr::var(post)]),
            Formula::tru(),
        ));
        let err = its.to_cfg().unwrap_err();
        let var = if pre == "x" { post } else { pre };
        assert_eq!(
            err.to_string(),
            format!(
                "unsupported construct: variable `{}` is a reserved name of the control-flow format",
                var
            )
        );
        // Other formats do not care.
        assert!(its.to_koat().is_ok());
    }
}
