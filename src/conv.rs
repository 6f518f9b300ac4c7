//! Conversion driver: format detection, parsing and printing.
//!
//! ```rust
//! # use its_conv::conv::{self, Conf, Format};
//! let conf = Conf::new(Format::Koat).from(Format::Ari);
//! let koat = conv::convert(its_conv::ARI_DEMO, &conf).unwrap();
//! assert!(koat.contains("  loop(x, y) -> loop(x - 1, y + x) :|: x > 0\n"));
//! ```

crate::prelude!();

use std::path::Path;

use its::Its;
use sexp::Layout;

#[cfg(test)]
mod test;

/// Supported formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Format {
    /// KoAT rule-based text, `.koat` files.
    Koat,
    /// ARI LCTRS s-expressions, `.ari` files.
    Ari,
    /// SMT-LIB control-flow definitions, `.smt2` files.
    #[value(name = "its", alias = "smt2")]
    Cfg,
}
impl Format {
    /// All the formats.
    pub const ALL: [Self; 3] = [Self::Koat, Self::Ari, Self::Cfg];

    /// Name of the format, as accepted by [`Format::of_name`].
    pub fn name(self) -> &'static str {
        match self {
            Self::Koat => "koat",
            Self::Ari => "ari",
            Self::Cfg => "its",
        }
    }
    /// File extension of the format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Koat => "koat",
            Self::Ari => "ari",
            Self::Cfg => "smt2",
        }
    }

    /// Format from its name, `smt2` is an alias for `its`.
    ///
    /// ```rust
    /// # use its_conv::conv::Format;
    /// assert_eq!(Format::of_name("its"), Some(Format::Cfg));
    /// assert_eq!(Format::of_name("smt2"), Some(Format::Cfg));
    /// assert_eq!(Format::of_name("c"), None);
    /// ```
    pub fn of_name(name: &str) -> Option<Self> {
        match name {
            "smt2" => Some(Self::Cfg),
            _ => Self::ALL.into_iter().find(|fmt| fmt.name() == name),
        }
    }
    /// Format of a file, based on its extension.
    ///
    /// ```rust
    /// # use its_conv::conv::Format;
    /// assert_eq!(Format::of_path("rsc/demo.koat"), Some(Format::Koat));
    /// assert_eq!(Format::of_path("/tmp/sys.smt2"), Some(Format::Cfg));
    /// assert_eq!(Format::of_path("sys.its"), None);
    /// assert_eq!(Format::of_path("ari"), None);
    /// ```
    pub fn of_path(path: impl AsRef<Path>) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?;
        Self::ALL.into_iter().find(|fmt| fmt.extension() == ext)
    }

    /// Parses some text in this format.
    pub fn parse(self, text: &str) -> Res<Its> {
        match self {
            Self::Koat => parse::koat(text),
            Self::Ari => parse::ari(text),
            Self::Cfg => parse::cfg(text),
        }
    }
    /// Prints a system in this format, `layout` only applies to s-expression formats.
    pub fn print(self, its: &Its, layout: Layout) -> Res<String> {
        match self {
            Self::Koat => its.to_koat(),
            Self::Ari => Ok(its.to_ari().to_document(layout)),
            Self::Cfg => Ok(its.to_cfg()?.to_document(layout)),
        }
    }
}
impl fmt::Display for Format {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        self.name().fmt(fmt)
    }
}
impl std::str::FromStr for Format {
    type Err = Error;
    fn from_str(s: &str) -> Res<Self> {
        Self::of_name(s).ok_or_else(|| {
            format!("unknown format `{}`, expected `koat`, `ari` or `its`", s).into()
        })
    }
}

/// Conversion configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conf {
    /// Input format, deduced from the file extension if `None`.
    pub from: Option<Format>,
    /// Output format.
    pub to: Format,
    /// Indented s-expression output.
    pub indent: bool,
}
impl Conf {
    /// Constructor, compact output and extension-based input detection.
    pub fn new(to: Format) -> Self {
        Self {
            from: None,
            to,
            indent: false,
        }
    }
    /// Sets the input format.
    pub fn from(mut self, from: Format) -> Self {
        self.from = Some(from);
        self
    }
    /// Sets the indentation flag.
    pub fn indent(mut self, indent: bool) -> Self {
        self.indent = indent;
        self
    }
}

/// Converts some text, `conf.from` must be set.
pub fn convert(text: &str, conf: &Conf) -> Res<String> {
    let from = match conf.from {
        Some(from) => from,
        None => bail!("no input format specified"),
    };
    let its = from
        .parse(text)
        .chain_err(|| format!("while parsing {} input", from))?;
    info!(
        "parsed {} input: {} rule(s), {} location(s)",
        from,
        its.rules.len(),
        its.locations().len()
    );
    conf.to
        .print(&its, Layout::new(conf.indent))
        .chain_err(|| format!("while printing {} output", conf.to))
}

/// Converts a file, its format is deduced from its extension unless `conf.from` is set.
pub fn convert_file(path: impl AsRef<Path>, conf: &Conf) -> Res<String> {
    let path = path.as_ref();
    let from = match conf.from.or_else(|| Format::of_path(path)) {
        Some(from) => from,
        None => bail!(
            "unknown input format for `{}`, expected a `.koat`, `.ari` or `.smt2` file",
            path.display()
        ),
    };
    let text = std::fs::read_to_string(path)
        .chain_err(|| format!("while reading `{}`", path.display()))?;
    debug!("read {} bytes from `{}`", text.len(), path.display());
    convert(&text, &conf.clone().from(from))
}
