//! Keywords of the supported formats.

#![allow(non_upper_case_globals)]

macro_rules! build_keywords {
    {
        $(
            $(#[$mod_meta:meta])*
            $mod_ident:ident {
                $(
                    $(#[$kw_meta:meta])*
                    $kw_ident:ident : $kw_str:expr
                ),*
                $(,)?
            }
        )*
    } => {
        $(
            $(#[$mod_meta])*
            pub mod $mod_ident {
                $(
                    $(#[$kw_meta])*
                    pub const $kw_ident: &str = $kw_str;
                )*

                lazy_static::lazy_static! {
                    /// Set of all the keywords of this format.
                    pub static ref all: std::collections::BTreeSet<&'static str> = {
                        let mut set = std::collections::BTreeSet::new();
                        $(
                            let is_new = set.insert($kw_str);
                            if !is_new {
                                panic!("[internal] keyword `{}` is defined twice", $kw_str)
                            }
                        )*
                        set
                    };
                }
            }
        )*
    };
}

build_keywords! {
    /// KoAT keywords, cannot be used as location or variable names.
    koat {
        /// Goal section.
        goal: "GOAL",
        /// Complexity goal.
        complexity: "COMPLEXITY",
        /// Termination goal.
        termination: "TERMINATION",
        /// Start-term section.
        start_term: "STARTTERM",
        /// Sink section.
        sink: "SINK",
        /// Start location wrapper.
        fun_symbols: "FUNCTIONSYMBOLS",
        /// Variable declaration section.
        var: "VAR",
        /// Rule section.
        rules: "RULES",
    }
    /// ARI keywords, identifiers equal to one of them must be bar-quoted.
    ari {
        /// Function declaration.
        fun: "fun",
        /// Rule declaration.
        rule: "rule",
        /// Format declaration.
        format: "format",
        /// Sort declaration.
        sort: "sort",
        /// Theory declaration.
        theory: "theory",
        /// Function definition.
        define_fun: "define-fun",
    }
    /// Names the control-flow format reserves, cannot be used as variable names.
    cfg {
        /// Pre-state program counter.
        pc: "pc",
        /// Post-state program counter.
        pc1: "pc1",
        /// Location sort.
        loc_sort: "Loc",
        /// Integer sort.
        int_sort: "Int",
        /// Boolean sort.
        bool_sort: "Bool",
        /// True.
        tru: "true",
        /// False.
        fls: "false",
        /// Conjunction.
        and: "and",
        /// Disjunction.
        or: "or",
        /// Negation.
        not: "not",
        /// Disequality.
        distinct: "distinct",
        /// Existential quantifier.
        exists: "exists",
        /// Universal quantifier.
        forall: "forall",
        /// Local binding.
        lett: "let",
        /// If-then-else.
        ite: "ite",
    }
}

/// Non-alphanumeric characters allowed in unquoted ARI identifiers.
const IDENT_SYMBOLS: &str = "~!@$%^&*_-+=<>.?/";

/// True if `ident` can be printed without bar-quoting in ARI.
///
/// ```rust
/// # use its_conv::parse::kw::is_ari_ident;
/// assert!(is_ari_ident("l_0"));
/// assert!(!is_ari_ident("x'"));
/// assert!(!is_ari_ident("0x"));
/// assert!(!is_ari_ident("rule"));
/// assert!(!is_ari_ident(""));
/// ```
pub fn is_ari_ident(ident: &str) -> bool {
    match ident.chars().next() {
        None => false,
        Some(c) if c.is_ascii_digit() => false,
        Some(_) => {
            !ari::all.contains(ident)
                && ident
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || IDENT_SYMBOLS.contains(c))
        }
    }
}

/// Escapes an ARI identifier, bar-quoting it if needed.
///
/// ```rust
/// # use its_conv::parse::kw::escape_ari;
/// assert_eq!(escape_ari("x_1"), "x_1");
/// assert_eq!(escape_ari("x'"), "|x'|");
/// assert_eq!(escape_ari("fun"), "|fun|");
/// ```
pub fn escape_ari(ident: &str) -> String {
    if is_ari_ident(ident) {
        ident.into()
    } else {
        format!("|{}|", ident)
    }
}

/// Removes bar-quotes, if any.
///
/// ```rust
/// # use its_conv::parse::kw::unescape_ari;
/// assert_eq!(unescape_ari("|x'|"), "x'");
/// assert_eq!(unescape_ari("x"), "x");
/// ```
pub fn unescape_ari(ident: &str) -> &str {
    if ident.len() >= 2 && ident.starts_with('|') && ident.ends_with('|') {
        &ident[1..ident.len() - 1]
    } else {
        ident
    }
}
