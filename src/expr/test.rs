//! Tests over expressions.

crate::prelude!();

use expr::*;

#[test]
fn arity_checks() {
    let x = || Expr::var("x");

    assert!(Expr::new_op(ArithOp::Plus, vec![x(), x(), x()]).is_ok());
    assert!(Expr::new_op(ArithOp::UnaryMinus, vec![x()]).is_ok());

    let err = Expr::new_op(ArithOp::UnaryMinus, vec![x(), x()]).unwrap_err();
    assert_eq!(err.to_string(), "`-` expects at most 1 argument(s), got 2");

    let err = Expr::new_op(ArithOp::Times, vec![]).unwrap_err();
    assert_eq!(err.to_string(), "`*` expects at least 2 argument(s), got 0");
}

#[test]
fn canonical_constants() {
    assert!(Formula::tru().is_true());
    assert!(!Formula::tru().is_false());
    assert!(Formula::fls().is_false());
    assert!(!Formula::and(vec![build_formula!((> x 0))]).is_true());

    assert_eq!(Formula::tru().to_string(), "true");
    assert_eq!(Formula::fls().to_string(), "false");
    assert_eq!(
        build_formula!((or (and) (> x 0))).to_string(),
        "(or true (> x 0))"
    );
}

#[test]
fn collect_vars() {
    let expr = build_expr!((+ x (* 3 y) (- x z)));
    let mut vars = Set::new();
    expr.collect_vars(&mut vars);
    assert_eq!(vars.iter().map(String::as_str).collect::<Vec<_>>(), ["x", "y", "z"]);

    // Accumulates in the set it is given.
    let f = build_formula!((exists (w) (and (< a w) (not (= b 7)))));
    f.collect_vars(&mut vars);
    assert_eq!(
        vars.iter().map(String::as_str).collect::<Vec<_>>(),
        ["a", "b", "w", "x", "y", "z"]
    );

    assert!(build_formula!((= 1 2)).vars().is_empty());
}

#[test]
fn sexp_printing() {
    let f = build_formula!((and (distinct x 0) (<= (- y) (* 2 x)) (not (>= x y))));
    assert_eq!(
        f.to_string(),
        "(and (distinct x 0) (<= (- y) (* 2 x)) (not (>= x y)))"
    );

    let quote = |id: &str| format!("|{}|", id);
    let f = build_formula!((exists (z) (= x z)));
    assert_eq!(
        f.to_sexp(&quote).to_string(),
        "(exists ((|z| Int)) (= |x| |z|))"
    );

    assert_eq!(Expr::int(-3).to_string(), "-3");
}

#[test]
fn rel_ops() {
    for op in [RelOp::Lt, RelOp::Leq, RelOp::Eq, RelOp::Neq, RelOp::Geq, RelOp::Gt] {
        println!("{:?}", op);
        assert_eq!(RelOp::of_infix(op.infix_str()), Some(op));
        assert_eq!(RelOp::of_smt(op.smt_str()), Some(op));
    }
    assert_eq!(RelOp::Neq.to_string(), "distinct");
}

macro_rules! koat {
    ($($e:expr => $txt:expr),* $(,)?) => {$({
        let e = $e;
        println!("{} => {}", e, $txt);
        assert_eq!(e.to_koat_string(), $txt)
    })*};
}

#[test]
fn koat_expressions() {
    koat! {
        build_expr!((+ x 1)) => "x + 1",
        build_expr!((+ x y z)) => "x + y + z",
        build_expr!((- (- x y) z)) => "x - y - z",
        build_expr!((- x (+ y z))) => "x - (y + z)",
        build_expr!((+ (* 2 x) (* 3 y))) => "2 * x + 3 * y",
        build_expr!((* x (* y z))) => "x * (y * z)",
        build_expr!((- (* x y))) => "-x * y",
        build_expr!((- (+ x y))) => "-(x + y)",
        build_expr!((- x (- y))) => "x - -y",
        build_expr!((* (- x) y)) => "(-x) * y",
        Expr::app(ArithOp::Times, vec![Expr::var("x"), Expr::int(-2)]) => "x * (-2)",
        Expr::app(ArithOp::Plus, vec![]) => "0",
    }
}

#[test]
fn koat_formulas() {
    let f = build_formula!((and (> x 0) (or (= y 1) (= y 2)) (and (< z 0) (< z x))));
    assert_eq!(
        f.to_koat_string().unwrap(),
        "x > 0 && (y = 1 || y = 2) && (z < 0 && z < x)"
    );

    let f = build_formula!((or (and (> x 0) (< y 0)) (distinct x y)));
    assert_eq!(f.to_koat_string().unwrap(), "x > 0 && y < 0 || x != y");

    let f = build_formula!((and (> x 0) true (or)));
    assert_eq!(f.to_koat_string().unwrap(), "x > 0 && 0 <= 0 && 1 <= 0");

    let err = build_formula!((and (> x 0) (not (> y 0))))
        .to_koat_string()
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "unsupported construct: negation `(not (> y 0))` cannot be expressed in KoAT"
    );
}
