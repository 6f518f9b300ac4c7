//! its-conv's macros.

/// Imports its-conv's prelude.
#[macro_export]
macro_rules! prelude {
    {} => { use $crate::prelude::*; };
    { pub } => { pub use $crate::prelude::*; };
}

/// Convenience macro, provides a DSL for writing arithmetic expressions.
///
/// - variables are plain identifiers, integer constants are literals;
/// - `(- e)` is a unary minus, `(- e_1 e_2 ...)` a subtraction.
///
/// ```rust
/// # use its_conv::build_expr;
/// let expr = build_expr!((+ x (* 2 y) (- z)));
/// assert_eq!(expr.to_string(), "(+ x (* 2 y) (- z))");
/// ```
#[macro_export]
macro_rules! build_expr {
    (@op +) => ( $crate::expr::ArithOp::Plus );
    (@op -) => ( $crate::expr::ArithOp::Minus );
    (@op *) => ( $crate::expr::ArithOp::Times );

    ( (- $arg:tt) ) => (
        $crate::expr::Expr::app(
            $crate::expr::ArithOp::UnaryMinus,
            vec![ $crate::build_expr!($arg) ],
        )
    );
    ( ($op:tt $($args:tt)+) ) => (
        $crate::expr::Expr::app(
            $crate::build_expr!(@op $op),
            vec![ $($crate::build_expr!($args)),+ ],
        )
    );

    ($var:ident) => ( $crate::expr::Expr::var(stringify!($var)) );
    ($cst:expr) => ( $crate::expr::Expr::int($cst) );
}

/// Convenience macro, provides a DSL for writing formulas.
///
/// Relations take two [`build_expr!`] arguments.
///
/// ```rust
/// # use its_conv::build_formula;
/// let f = build_formula!((exists (z) (and (> x 0) (distinct x (+ z 1)))));
/// assert_eq!(f.to_string(), "(exists ((z Int)) (and (> x 0) (distinct x (+ z 1))))");
/// assert!(build_formula!(true).is_true());
/// ```
#[macro_export]
macro_rules! build_formula {
    (@rel <) => ( $crate::expr::RelOp::Lt );
    (@rel <=) => ( $crate::expr::RelOp::Leq );
    (@rel =) => ( $crate::expr::RelOp::Eq );
    (@rel distinct) => ( $crate::expr::RelOp::Neq );
    (@rel >=) => ( $crate::expr::RelOp::Geq );
    (@rel >) => ( $crate::expr::RelOp::Gt );

    (true) => ( $crate::expr::Formula::tru() );
    (false) => ( $crate::expr::Formula::fls() );

    ( (and $($args:tt)*) ) => (
        $crate::expr::Formula::and(vec![ $($crate::build_formula!($args)),* ])
    );
    ( (or $($args:tt)*) ) => (
        $crate::expr::Formula::or(vec![ $($crate::build_formula!($args)),* ])
    );
    ( (not $arg:tt) ) => (
        $crate::expr::Formula::not($crate::build_formula!($arg))
    );
    ( (exists ($($var:ident)*) $matrix:tt) ) => (
        $crate::expr::Formula::exists(
            vec![ $(stringify!($var).to_string()),* ],
            $crate::build_formula!($matrix),
        )
    );
    ( ($op:tt $lft:tt $rgt:tt) ) => (
        $crate::expr::Formula::rel(
            $crate::build_expr!($lft),
            $crate::build_formula!(@rel $op),
            $crate::build_expr!($rgt),
        )
    );
}
