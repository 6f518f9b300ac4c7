//! Front ends for the three supported formats.
//!
//! - [`koat()`]: KoAT rule-based text, parsed by the PEG [`rules`] into an [`ast`] tree and then
//!   turned into an [`its::Its`];
//! - [`ari()`]: ARI LCTRS s-expressions;
//! - [`cfg()`]: SMT-LIB control-flow definitions (`init_main`/`next_main`).

crate::prelude!();

pub mod ast;
pub mod kw;

mod ari;
mod cfg;
mod koat;


/// A span in the input text.
#[readonly::make]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Span's start (inclusive).
    pub start: usize,
    /// Span's end (exclusive).
    pub end: usize,
}
impl Span {
    /// Constructor.
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Span { start, end }
    }
    /// Merges two spans, `self`'s start and `other`'s end.
    ///
    /// - illegal if `self.start > other.end`.
    pub fn merge(self, other: Self) -> Self {
        (self.start, other.end).into()
    }

    /// Extracts the relevant line of the input, and the previous/next line if any.
    ///
    /// Returns `(prev, row, col, line, next)`, `row` and `col` start at zero. Offsets past the end
    /// of `text` point to its end.
    pub fn pretty_of(self, text: &str) -> (Option<String>, usize, usize, String, Option<String>) {
        let mut count = self.start.min(text.len());
        let mut prev_line = None;
        let mut lines = text.split('\n').enumerate().peekable();

        while let Some((row, line)) = lines.next() {
            if count <= line.len() {
                let col = line
                    .get(..count)
                    .map(|pref| pref.chars().count())
                    .unwrap_or(count);
                let next = lines
                    .peek()
                    .map(|(_, next)| next.trim_end_matches('\r'))
                    .filter(|next| !next.is_empty())
                    .map(String::from);
                let line = line.trim_end_matches('\r').to_string();
                return (prev_line, row, col, line, next);
            }
            count -= line.len() + 1;
            prev_line = Some(line.trim_end_matches('\r').to_string());
        }

        // `split` yields at least one line and the line lengths add up to `text.len()`.
        (prev_line, 0, 0, String::new(), None)
    }

    /// Builds a parse error located at `self`'s start.
    pub fn error(self, text: &str, msg: impl Into<String>) -> Error {
        let (_, row, col, line, _) = self.pretty_of(text);
        Error::parse(row, col, line, msg)
    }
}
impl From<(usize, usize)> for Span {
    fn from((start, end): (usize, usize)) -> Self {
        Self::new(start, end)
    }
}

/// Wraps something with a span.
#[derive(Debug, Clone, Copy)]
pub struct Spn<T> {
    /// Value wrapped.
    pub inner: T,
    /// Span.
    pub span: Span,
}
impl<T: PartialEq> PartialEq for Spn<T> {
    fn eq(&self, that: &Self) -> bool {
        self.inner == that.inner
    }
}
impl<T: Eq> Eq for Spn<T> {}
impl<T> Spn<T> {
    /// Constructor.
    pub fn new(inner: T, span: impl Into<Span>) -> Self {
        let span = span.into();
        Self { inner, span }
    }

    /// Applies an operation to the inner value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Spn<U> {
        Spn {
            inner: f(self.inner),
            span: self.span,
        }
    }
}
impl<T> Deref for Spn<T> {
    type Target = T;
    fn deref(&self) -> &T {
        &self.inner
    }
}
impl<T: fmt::Display> fmt::Display for Spn<T> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        self.inner.fmt(fmt)
    }
}

/// Yields `true` if `ident` is a KoAT keyword.
pub fn is_kw(ident: impl AsRef<str>) -> bool {
    kw::koat::all.contains(ident.as_ref())
}

peg::parser! {
    /// PEG parsing rules for the KoAT format.
    ///
    /// ```text
    /// (GOAL COMPLEXITY)
    /// (STARTTERM (FUNCTIONSYMBOLS f))
    /// (VAR x y)
    /// (RULES
    ///   f(x, y) -> g(x - 1, y) :|: x > 0 && y >= x
    ///   g(x, y) -{ 2, x }> f(x, y^2)
    /// )
    /// ```
    pub grammar rules() for str {
        /// Whitespace.
        rule whitespace() = quiet! {
            [ ' ' | '\n' | '\t' | '\r' ]
        }

        /// Optional whitespace.
        rule _() = quiet! { whitespace()* }

        /// Identifiers, used for locations and variables.
        ///
        /// # Examples
        ///
        /// ```rust
        /// # use its_conv::parse::rules::ident;
        /// assert_eq!(*ident("x_1").unwrap(), "x_1");
        /// assert_eq!(*ident("f'").unwrap(), "f'");
        /// assert_eq!(*ident("eval.main#3").unwrap(), "eval.main#3");
        ///
        /// assert_eq!(
        ///     ident("1x").unwrap_err().to_string(),
        ///     "error at 1:1: expected identifier",
        /// );
        /// assert!(ident("RULES").is_err());
        /// ```
        pub rule ident() -> Spn<&'input str>
        = quiet! {
            s:position!()
            ident:$(
                [ 'a'..='z' | 'A'..='Z' | '_' ]
                [ 'a'..='z' | 'A'..='Z' | '_' | '0'..='9' | '\'' | '.' | '#' ]*
            )
            e:position!() {?
                if is_kw(ident) {
                    Err("unexpected keyword")
                } else {
                    Ok(Spn::new(ident, (s, e)))
                }
            }
        }
        / expected!("identifier")

        /// Integer literals.
        pub rule number() -> Spn<&'input str>
        = quiet! {
            s:position!() n:$(['0'..='9']+) e:position!() {
                Spn::new(n, (s, e))
            }
        }
        / expected!("integer")

        /// Expressions.
        ///
        /// From lowest to highest precedence: binary `+` and `-`, unary `-`, `*`, and `^` which
        /// is right-associative.
        ///
        /// ```rust
        /// # use its_conv::parse::{rules::expr, ast::Expr};
        /// let e = expr("x - 2 * y^3").unwrap();
        /// match e {
        ///     Expr::Bin { op, lft, rgt } => {
        ///         assert_eq!(*op, "-");
        ///         assert!(matches!(*lft, Expr::Var(_)));
        ///         assert!(matches!(*rgt, Expr::Bin { .. }));
        ///     }
        ///     _ => panic!("unexpected expression"),
        /// }
        /// ```
        pub rule expr() -> ast::Expr<'input>
        = precedence! {
            lft:(@) _ s:position!() op:$("+" / "-") e:position!() _ rgt:@ {
                ast::Expr::bin(Spn::new(op, (s, e)), lft, rgt)
            }
            --
            s:position!() op:$("-") e:position!() _ arg:@ {
                ast::Expr::neg(Spn::new(op, (s, e)), arg)
            }
            --
            lft:(@) _ s:position!() op:$("*") e:position!() _ rgt:@ {
                ast::Expr::bin(Spn::new(op, (s, e)), lft, rgt)
            }
            --
            lft:@ _ s:position!() op:$("^") e:position!() _ rgt:(@) {
                ast::Expr::bin(Spn::new(op, (s, e)), lft, rgt)
            }
            --
            n:number() {
                ast::Expr::Int(n)
            }
            var:ident() {
                ast::Expr::Var(var)
            }
            s:position!() "(" _ e:expr() _ ")" end:position!() {
                ast::Expr::Paren(Box::new(e), Span::new(s, end))
            }
        }

        /// Relational operators.
        pub rule relop() -> Spn<&'input str>
        = quiet! {
            s:position!() op:$("<=" / ">=" / "!=" / "<" / ">" / "=") e:position!() {
                Spn::new(op, (s, e))
            }
        }
        / expected!("relational operator")

        /// A relation between two expressions.
        pub rule lit() -> ast::Formula<'input>
        = lhs:expr() _ op:relop() _ rhs:expr() {
            ast::Formula::Lit { lhs, op, rhs }
        }

        /// Formulas.
        ///
        /// `||` (or `\/`) binds weaker than `&&` (or `/\`).
        ///
        /// ```rust
        /// # use its_conv::parse::{rules::formula, ast::Formula};
        /// let f = formula("x > 0 && y < x || (z = 1)").unwrap();
        /// match f {
        ///     Formula::Bin { op, lft, .. } => {
        ///         assert_eq!(*op, "||");
        ///         assert!(matches!(*lft, Formula::Bin { .. }));
        ///     }
        ///     _ => panic!("unexpected formula"),
        /// }
        /// ```
        pub rule formula() -> ast::Formula<'input>
        = precedence! {
            lft:(@) _ s:position!() op:$("||" / "\\/") e:position!() _ rgt:@ {
                ast::Formula::bin(Spn::new(op, (s, e)), lft, rgt)
            }
            --
            lft:(@) _ s:position!() op:$("&&" / "/\\") e:position!() _ rgt:@ {
                ast::Formula::bin(Spn::new(op, (s, e)), lft, rgt)
            }
            --
            lit:lit() {
                lit
            }
            s:position!() "(" _ f:formula() _ ")" e:position!() {
                ast::Formula::Paren(Box::new(f), Span::new(s, e))
            }
        }

        /// Transition arrow, `->` or `-{ lb, ub }>` with the bounds ignored.
        rule to()
        = quiet! {
            "->"
            / "-{" _ expr() _ ("," _ expr() _)? "}>"
        }
        / expected!("`->`")

        /// Left-hand side: a location applied to variables, parens are optional on nullary
        /// locations.
        pub rule lhs() -> ast::Lhs<'input>
        = loc:ident() args:(
            _ "(" _ args:(ident() ** (_ "," _)) _ ")" { args }
        )? {
            ast::Lhs { loc, args: args.unwrap_or_default() }
        }

        /// Right-hand side: a location applied to expressions.
        pub rule rhs() -> ast::Rhs<'input>
        = loc:ident() args:(
            _ "(" _ args:(expr() ** (_ "," _)) _ ")" { args }
        )? {
            ast::Rhs { loc, args: args.unwrap_or_default() }
        }

        /// Command: `Com_k(rhs, ...)` or a single right-hand side.
        pub rule com() -> ast::Com<'input>
        = s:position!() sym:$("Com_" ['0'..='9']+) e:position!()
            _ "(" _ rhss:(rhs() ++ (_ "," _)) _ ")"
        {
            ast::Com { sym: Some(Spn::new(sym, (s, e))), rhss }
        }
        / rhs:rhs() {
            ast::Com { sym: None, rhss: vec![rhs] }
        }

        /// A transition.
        pub rule trans() -> ast::Trans<'input>
        = s:position!() lhs:lhs() _ to() _ com:com()
            cond:(_ ":|:" _ cond:formula() { cond })?
            e:position!()
        {
            ast::Trans::new(lhs, com, cond, (s, e))
        }

        /// `(GOAL COMPLEXITY)` or `(GOAL TERMINATION)`.
        rule goal() -> Spn<&'input str>
        = "(" _ "GOAL" _
            s:position!() goal:$("COMPLEXITY" / "TERMINATION") e:position!()
            _ ")"
        {
            Spn::new(goal, (s, e))
        }

        /// `(STARTTERM (FUNCTIONSYMBOLS f))`.
        rule start() -> Spn<&'input str>
        = "(" _ "STARTTERM" _ "(" _ "FUNCTIONSYMBOLS" _ start:ident() _ ")" _ ")" {
            start
        }

        /// `(SINK (FUNCTIONSYMBOLS f))`.
        rule sink() -> Spn<&'input str>
        = "(" _ "SINK" _ "(" _ "FUNCTIONSYMBOLS" _ sink:ident() _ ")" _ ")" {
            sink
        }

        /// `(VAR x y ...)`.
        rule vars() -> Vec<Spn<&'input str>>
        = "(" _ "VAR" vars:(_ var:ident() { var })* _ ")" {
            vars
        }

        /// `(RULES ...)`.
        rule transs() -> Vec<ast::Trans<'input>>
        = "(" _ "RULES" transs:(_ trans:trans() { trans })* _ ")" {
            transs
        }

        /// A whole KoAT document.
        pub rule koat() -> ast::Koat<'input>
        = _ goal:goal() _ start:start() _ sink:(sink:sink() _ { sink })?
            vars:vars() _ transs:transs() _
        {
            ast::Koat { goal, start, sink, vars, transs }
        }
    }
}

/// Turns a peg error into a parse error.
fn peg_error(text: &str, e: peg::error::ParseError<peg::str::LineCol>) -> Error {
    let span = Span::new(e.location.offset, e.location.offset);
    span.error(text, format!("expected {}", e.expected))
}

/// Parses a KoAT document.
///
/// Condition variables that appear neither in the left-hand side nor in the right-hand side are
/// existentially quantified.
///
/// ```rust
/// # use its_conv::parse;
/// let its = parse::koat("\
/// (GOAL COMPLEXITY)
/// (STARTTERM (FUNCTIONSYMBOLS f))
/// (VAR x)
/// (RULES
///   f(x) -> f(x - 1) :|: x > 0
/// )
/// ").unwrap();
/// assert_eq!(its.init, "f");
/// assert_eq!(its.rules.len(), 1);
/// assert_eq!(its.rules[0].cond.to_string(), "(> x 0)");
/// ```
pub fn koat(text: &str) -> Res<its::Its> {
    let tree = rules::koat(text).map_err(|e| peg_error(text, e))?;
    debug!(
        "parsed KoAT {} document with {} transition(s)",
        tree.goal,
        tree.transs.len()
    );
    koat::Builder::new(text).build(tree)
}

/// Parses an ARI document.
///
/// ```rust
/// # use its_conv::parse;
/// let its = parse::ari("\
/// (format LCTRS)
/// (theory Ints)
/// (fun f (-> Int Int))
/// (entrypoint f)
/// (rule (f x) (f (- x 1)) :guard (> x 0))
/// ").unwrap();
/// assert_eq!(its.init, "f");
/// assert_eq!(its.rules[0].rhs.args[0].to_string(), "(- x 1)");
/// ```
pub fn ari(text: &str) -> Res<its::Its> {
    let sexp = sexp::parse(text)?;
    ari::parse(&sexp)
}

/// Parses an SMT-LIB control-flow document.
///
/// ```rust
/// # use its_conv::parse;
/// let its = parse::cfg("\
/// (declare-sort Loc 0)
/// (declare-const f Loc)
/// (define-fun init_main ((pc Loc) (x Int)) Bool (cfg_init pc f true))
/// (define-fun next_main ((pc Loc) (x Int) (pc1 Loc) (x1 Int)) Bool
///   (cfg_trans2 pc f pc1 f (and (> x 0) (= x1 (- x 1)))))
/// ").unwrap();
/// assert_eq!(its.init, "f");
/// assert_eq!(its.rules[0].lhs.args, vec!["x".to_string()]);
/// assert_eq!(its.rules[0].rhs.args[0].to_string(), "x1");
/// ```
pub fn cfg(text: &str) -> Res<its::Its> {
    let sexp = sexp::parse(text)?;
    cfg::parse(&sexp)
}
