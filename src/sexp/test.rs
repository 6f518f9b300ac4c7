//! Tests over nested-list values.

use super::*;

macro_rules! parse_fails {
    ($($txt:expr => $msg:expr),* $(,)?) => {$({
        let txt = $txt;
        println!("parsing {:?}", txt);
        match parse(txt) {
            Ok(sexp) => panic!("expected parse error, got `{}`", sexp),
            Err(e) => {
                println!("-> {}", e);
                assert_eq!(e.to_string(), $msg)
            }
        }
    })*};
}

#[test]
fn parse_nested() {
    let txt = "(define-fun f ((x Int)) Bool (> x 0))\n(assert (f 7))";
    println!("parsing {:?}", txt);
    let sexp = parse(txt).unwrap();
    assert_eq!(sexp.child_count(), 2);

    let def = sexp.child(0).unwrap();
    assert_eq!(def.head(), Some("define-fun"));
    assert_eq!(def.args().len(), 4);
    assert_eq!(def.child(2).unwrap().to_string(), "((x Int))");
    assert_eq!(
        sexp.child(1).unwrap(),
        &Sexp::list(vec![
            "assert".into(),
            Sexp::list(vec!["f".into(), "7".into()])
        ]),
    );
}

#[test]
fn parse_comments_and_whitespace() {
    let txt = "; leading comment\n  (a\t b ; trailing\n c)  ; done";
    let sexp = parse(txt).unwrap();
    assert_eq!(sexp.to_string(), "((a b c))");

    assert!(parse("").unwrap().is_nil());
    assert!(parse("  ; nothing\n").unwrap().is_nil());
}

#[test]
fn parse_quoted_atoms() {
    let sexp = parse(r#"("a b" "say \"hi\"" |x(y)| "")"#).unwrap();
    let list = sexp.child(0).unwrap();
    assert_eq!(list.child(0).and_then(Sexp::as_atom), Some("a b"));
    assert_eq!(list.child(1).and_then(Sexp::as_atom), Some("say \"hi\""));
    assert_eq!(list.child(2).and_then(Sexp::as_atom), Some("x(y)"));
    assert_eq!(list.child(3).and_then(Sexp::as_atom), Some(""));
}

#[test]
fn parse_atom_boundaries() {
    let sexp = parse("(f(x)y)").unwrap();
    assert_eq!(sexp.child(0).unwrap().child_count(), 3);
    assert_eq!(sexp.child(0).unwrap().child(2), Some(&Sexp::atom("y")));
}

#[test]
fn parse_errors() {
    parse_fails! {
        "(a b))" => "parse error at 1:6: unexpected closing parenthesis | (a b))",
        "(a\n (b c" => "parse error at 2:2: unclosed parenthesis |  (b c",
        "(a \"b" => "parse error at 1:4: unterminated string literal | (a \"b",
        "(a \"b\nc\")" => "parse error at 1:6: unexpected newline in string literal | (a \"b",
        r#"("a\q")"# => r#"parse error at 1:5: invalid escape character `q` | ("a\q")"#,
        "(|abc)" => "parse error at 1:2: unterminated `|...|` symbol | (|abc)",
    }
}

#[test]
fn escaping() {
    assert_eq!(escape_atom("cfg_trans2"), "cfg_trans2");
    assert_eq!(escape_atom("|rule|"), "|rule|");
    assert_eq!(escape_atom("a;b"), r#""a;b""#);
    assert_eq!(escape_atom("f(x)"), r#""f(x)""#);
    assert_eq!(escape_atom("|a"), r#""|a""#);
    assert_eq!(escape_atom("tab\there"), r#""tab\there""#);

    for atom in ["plain", "with space", "quote\"d", "|bar", "semi;colon", ""] {
        let printed = Sexp::list(vec![Sexp::atom(atom)]).to_string();
        println!("{:?} -> {}", atom, printed);
        let reparsed = parse(&printed).unwrap();
        assert_eq!(reparsed.child(0), Some(&Sexp::atom(atom)));
    }
}

#[test]
fn single_atom_lists_elide_parens() {
    let sexp = Sexp::list(vec![
        "f".into(),
        Sexp::list(vec!["g".into()]),
        Sexp::nil(),
    ]);
    assert_eq!(sexp.to_string(), "(f g ())");
    assert_eq!(sexp.weight(), 8);
}

#[test]
fn short_lists_stay_on_one_line() {
    let sexp = parse("(define-fun init_main ((pc Loc) (x Int)) Bool (cfg_init pc l0 true))").unwrap();
    let sexp = sexp.child(0).unwrap();
    assert!(sexp.weight() <= WIDTH);
    assert!(!sexp.to_compact_string().contains('\n'));
    assert!(!sexp.to_indented_string().contains('\n'));
}

#[test]
fn long_lists_break() {
    let mut sexp = Sexp::list(vec!["or".into()]);
    for idx in 0..4 {
        sexp.add_child(Sexp::list(vec![
            "cfg_trans2".into(),
            "pc".into(),
            format!("l{}", idx).into(),
            "pc1".into(),
            format!("l{}", idx + 1).into(),
            "true".into(),
        ]));
    }
    assert!(sexp.weight() > WIDTH);

    let compact = sexp.to_compact_string();
    println!("{}", compact);
    assert_eq!(
        compact,
        "(or\n\
         (cfg_trans2 pc l0 pc1 l1 true)\n\
         (cfg_trans2 pc l1 pc1 l2 true)\n\
         (cfg_trans2 pc l2 pc1 l3 true)\n\
         (cfg_trans2 pc l3 pc1 l4 true))"
    );

    let indented = sexp.to_indented_string();
    println!("{}", indented);
    assert_eq!(
        indented,
        "(or\n  \
         (cfg_trans2 pc l0 pc1 l1 true)\n  \
         (cfg_trans2 pc l1 pc1 l2 true)\n  \
         (cfg_trans2 pc l2 pc1 l3 true)\n  \
         (cfg_trans2 pc l3 pc1 l4 true))"
    );

    // Breaking is local to the list that does not fit.
    assert_eq!(indented.lines().count(), 5);
}

#[test]
fn width_boundary() {
    // `(a ...)` adds four characters around its second child.
    let fits = Sexp::list(vec!["a".into(), "x".repeat(WIDTH - 4).into()]);
    assert_eq!(fits.weight(), WIDTH);
    assert_eq!(fits.to_compact_string(), format!("(a {})", "x".repeat(WIDTH - 4)));

    let breaks = Sexp::list(vec!["a".into(), "x".repeat(WIDTH - 3).into()]);
    assert_eq!(breaks.weight(), WIDTH + 1);
    assert_eq!(breaks.to_compact_string(), format!("(a\n{})", "x".repeat(WIDTH - 3)));
    assert_eq!(breaks.to_indented_string(), format!("(a\n  {})", "x".repeat(WIDTH - 3)));
}

#[test]
fn document_rendering() {
    let sexp = parse("(format LCTRS) (theory Ints)").unwrap();
    assert_eq!(
        sexp.to_document(Layout::Compact),
        "(format LCTRS)\n(theory Ints)\n"
    );
    assert_eq!(Layout::new(true), Layout::Indented);
    assert_eq!(Layout::new(false), Layout::Compact);
}

#[test]
fn add_child_promotes_atoms() {
    let mut sexp = Sexp::atom("f");
    sexp.add_child("x");
    sexp.add_child(Sexp::list(vec!["-".into(), "y".into(), "1".into()]));
    assert_eq!(sexp.to_string(), "(f x (- y 1))");
    assert_eq!(sexp.head(), Some("f"));
    assert_eq!(sexp.args().len(), 2);
    assert_eq!(Sexp::atom("f").child_count(), 0);
}

#[test]
fn paths() {
    let mut sexp = Sexp::list(vec!["config".into()]);
    sexp.create_path(&["solver", "timeout"]).add_child("10");
    sexp.create_path(&["solver", "name"]).add_child("z3");
    assert_eq!(sexp.to_string(), "(config (solver (timeout 10) (name z3)))");

    assert_eq!(
        sexp.get_child_by_path("solver/name").map(Sexp::to_string),
        Some("(name z3)".into()),
    );
    assert!(sexp.get_child_by_path("solver/verbose").is_none());
    assert!(sexp.get_child_by_path("timeout").is_none());
}

#[test]
fn structural_equality() {
    let lft = parse("(a (b c))").unwrap();
    let rgt = parse("( a\n(b   c) )").unwrap();
    assert_eq!(lft, rgt);
    assert_ne!(lft, parse("(a (c b))").unwrap());
}
