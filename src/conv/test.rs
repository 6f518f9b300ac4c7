//! Tests over the conversion driver.

crate::prelude!();

use conv::{convert, convert_file, Conf, Format};

use crate::{ARI_DEMO, CFG_DEMO, KOAT_DEMO};

/// Error message with all its causes.
fn chain(e: &Error) -> String {
    e.iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Drops `;` comment lines.
fn uncommented(text: &str) -> String {
    let mut res = String::new();
    for line in text.lines().filter(|line| !line.starts_with(';')) {
        res.push_str(line);
        res.push('\n')
    }
    res
}

#[test]
fn formats() {
    for fmt in Format::ALL {
        println!("{:?}", fmt);
        assert_eq!(Format::of_name(fmt.name()), Some(fmt));
        assert_eq!(fmt.to_string().parse::<Format>().unwrap(), fmt);
        assert_eq!(
            Format::of_path(format!("dir/sys.{}", fmt.extension())),
            Some(fmt)
        );
    }
    assert_eq!("smt2".parse::<Format>().unwrap(), Format::Cfg);
    assert_eq!(
        "c".parse::<Format>().unwrap_err().to_string(),
        "unknown format `c`, expected `koat`, `ari` or `its`"
    );
    assert_eq!(Format::of_path("sys.KOAT"), None);
    assert_eq!(Format::of_path("koat"), None);
}

#[test]
fn conf() {
    let conf = Conf::new(Format::Ari);
    assert_eq!(conf.from, None);
    assert!(!conf.indent);
    let conf = conf.from(Format::Koat).indent(true);
    assert_eq!(
        conf,
        Conf {
            from: Some(Format::Koat),
            to: Format::Ari,
            indent: true,
        }
    );
}

#[test]
fn koat_to_ari() {
    let conf = Conf::new(Format::Ari).from(Format::Koat);
    let ari = convert(KOAT_DEMO, &conf).unwrap();
    println!("{}", ari);
    assert_eq!(ari, uncommented(ARI_DEMO));
}

#[test]
fn ari_to_koat() {
    let conf = Conf::new(Format::Koat).from(Format::Ari);
    let koat = convert(ARI_DEMO, &conf).unwrap();
    println!("{}", koat);
    assert_eq!(koat, KOAT_DEMO);
}

#[test]
fn cfg_to_koat() {
    let conf = Conf::new(Format::Koat).from(Format::Cfg);
    let koat = convert(CFG_DEMO, &conf).unwrap();
    println!("{}", koat);
    assert_eq!(
        koat,
        "\
(GOAL COMPLEXITY)
(STARTTERM (FUNCTIONSYMBOLS start))
(VAR x x1 y y1)
(RULES
  start(x, y) -> loop(x1, y1) :|: x >= 0 && x1 = x && y1 = y
  loop(x, y) -> loop(x1, y1) :|: x > 0 && x1 = x - 1 && y1 = y + x
  loop(x, y) -> exit(x1, y1) :|: x <= 0 && y >= 0 && x1 = x && y1 = y
)
"
    );
}

#[test]
fn cfg_round_trips() {
    let its = parse::cfg(CFG_DEMO).unwrap();
    for indent in [false, true] {
        let conf = Conf::new(Format::Cfg).from(Format::Cfg).indent(indent);
        let cfg = convert(CFG_DEMO, &conf).unwrap();
        println!("{}", cfg);
        assert!(cfg.contains("(assert (distinct exit loop start))\n"));
        assert_eq!(parse::cfg(&cfg).unwrap(), its);

        let conf = Conf::new(Format::Ari).from(Format::Cfg).indent(indent);
        let ari = convert(CFG_DEMO, &conf).unwrap();
        let conf = Conf::new(Format::Cfg).from(Format::Ari).indent(indent);
        let cfg = convert(&ari, &conf).unwrap();
        assert_eq!(parse::cfg(&cfg).unwrap(), its);
    }
}

#[test]
fn indentation() {
    let conf = Conf::new(Format::Cfg).from(Format::Cfg);
    let compact = convert(CFG_DEMO, &conf).unwrap();
    let indented = convert(CFG_DEMO, &conf.indent(true)).unwrap();
    println!("{}", indented);

    let trans = "(cfg_trans2 pc start pc1 loop (and (>= x 0) (= x1 x) (= y1 y)))";
    assert!(compact.contains(&format!("\n(or\n{}\n", trans)));
    assert!(indented.contains(&format!("\n  (or\n    {}\n", trans)));

    // Short lists stay on one line.
    let init = "(define-fun init_main ((pc Loc) (x Int) (y Int)) Bool (cfg_init pc start true))\n";
    assert!(compact.contains(init));
    assert!(indented.contains(init));

    // KoAT output ignores the flag.
    let conf = Conf::new(Format::Koat).from(Format::Ari);
    assert_eq!(
        convert(ARI_DEMO, &conf).unwrap(),
        convert(ARI_DEMO, &conf.clone().indent(true)).unwrap(),
    );
}

#[test]
fn errors() {
    let err = convert(KOAT_DEMO, &Conf::new(Format::Ari)).unwrap_err();
    assert_eq!(err.to_string(), "no input format specified");

    let conf = Conf::new(Format::Cfg).from(Format::Ari);
    let err = convert(ARI_DEMO, &conf).unwrap_err();
    assert_eq!(
        chain(&err),
        "while printing its output | while printing rule #2 | \
        unsupported construct: update `(- x 1)` of location `loop` is not a variable"
    );

    let conf = Conf::new(Format::Ari).from(Format::Koat);
    let err = convert(ARI_DEMO, &conf).unwrap_err();
    let msg = chain(&err);
    println!("{}", msg);
    assert!(msg.starts_with("while parsing koat input | parse error at 1:1: expected "));

    let conf = Conf::new(Format::Koat).from(Format::Ari);
    let err = convert("(entrypoint f) (rule (f x) (f x) :guard (not (= x 0)))", &conf)
        .unwrap_err();
    assert_eq!(
        chain(&err),
        "while printing koat output | while printing rule #1 | \
        unsupported construct: negation `(not (= x 0))` cannot be expressed in KoAT"
    );
}

#[test]
fn files() {
    let conf = Conf::new(Format::Ari);
    let ari = convert_file("rsc/demo.koat", &conf).unwrap();
    assert_eq!(ari, uncommented(ARI_DEMO));

    // Explicit input format wins over the extension.
    let conf = Conf::new(Format::Koat).from(Format::Ari);
    let err = convert_file("rsc/demo.koat", &conf).unwrap_err();
    assert!(chain(&err).starts_with("while parsing ari input | "));

    let err = convert_file("rsc/demo.its", &Conf::new(Format::Koat)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "unknown input format for `rsc/demo.its`, expected a `.koat`, `.ari` or `.smt2` file"
    );

    let err = convert_file("rsc/missing.koat", &Conf::new(Format::Ari)).unwrap_err();
    assert!(chain(&err).starts_with("while reading `rsc/missing.koat` | "));
}
