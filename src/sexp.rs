//! Nested-list values (s-expressions): parsing, navigation and pretty-printing.
//!
//! A [`Sexp`] is either an atom or a list of [`Sexp`]s. Parsing ignores whitespace and `;`
//! comments, decodes C-style escapes in double-quoted atoms and takes `|...|` atoms literally.
//!
//! Both printers ([`Layout::Compact`] and [`Layout::Indented`]) share the same line-fitting rule: a
//! list whose one-line rendering is wider than [`WIDTH`] characters is broken, one child per line.
//!
//! ```rust
//! # use its_conv::sexp::{self, Sexp};
//! let sexp = sexp::parse("(rule (f x) ; a comment\n (g |x y|))").unwrap();
//! let rule = sexp.child(0).unwrap();
//! assert_eq!(rule.head(), Some("rule"));
//! assert_eq!(rule.child(2).unwrap().child(1), Some(&Sexp::atom("x y")));
//! assert_eq!(rule.to_string(), r#"(rule (f x) (g "x y"))"#);
//! ```

crate::prelude!();

use std::borrow::Cow;

#[cfg(test)]
mod test;

/// Maximal width of a list rendered on a single line.
pub const WIDTH: usize = 80;

/// Escape sequences, as (escape character, actual character) pairs.
const ESCAPES: [(char, char); 10] = [
    ('"', '"'),
    ('?', '?'),
    ('\\', '\\'),
    ('a', '\x07'),
    ('b', '\x08'),
    ('f', '\x0c'),
    ('n', '\n'),
    ('r', '\r'),
    ('t', '\t'),
    ('v', '\x0b'),
];

fn unescape_char(c: char) -> Option<char> {
    ESCAPES
        .iter()
        .find(|(esc, _)| *esc == c)
        .map(|(_, actual)| *actual)
}
fn escape_char(c: char) -> Option<char> {
    ESCAPES
        .iter()
        .find(|(_, actual)| *actual == c)
        .map(|(esc, _)| *esc)
}

/// True if `atom` is a bar-quoted symbol `|...|` without inner bars.
fn is_bar_quoted(atom: &str) -> bool {
    atom.len() >= 2
        && atom.starts_with('|')
        && atom.ends_with('|')
        && !atom[1..atom.len() - 1].contains('|')
}

/// Printed representation of an atom.
///
/// Atoms are printed verbatim unless they contain whitespace, parens, `;` or an escapable
/// character, in which case they are double-quoted and escaped. Bar-quoted symbols are always
/// printed verbatim.
///
/// ```rust
/// # use its_conv::sexp::escape_atom;
/// assert_eq!(escape_atom("x_1"), "x_1");
/// assert_eq!(escape_atom("|x y|"), "|x y|");
/// assert_eq!(escape_atom("x y"), r#""x y""#);
/// assert_eq!(escape_atom("a\"b\n"), r#""a\"b\n""#);
/// assert_eq!(escape_atom(""), r#""""#);
/// ```
pub fn escape_atom(atom: &str) -> Cow<str> {
    if atom.is_empty() {
        return Cow::Borrowed("\"\"");
    }
    if is_bar_quoted(atom) {
        return Cow::Borrowed(atom);
    }
    let needs_quotes = atom.starts_with('|')
        || atom.chars().any(|c| {
            c.is_whitespace() || c == '(' || c == ')' || c == ';' || escape_char(c).is_some()
        });
    if !needs_quotes {
        return Cow::Borrowed(atom);
    }
    let mut res = String::with_capacity(atom.len() + 2);
    res.push('"');
    for c in atom.chars() {
        if let Some(esc) = escape_char(c) {
            res.push('\\');
            res.push(esc);
        } else {
            res.push(c)
        }
    }
    res.push('"');
    Cow::Owned(res)
}

/// Rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Broken lists put each child on a fresh line, without indentation.
    Compact,
    /// Broken lists put each child on a fresh line, indented by two spaces per nesting level.
    Indented,
}
impl Layout {
    /// Indented layout if `indent`, compact otherwise.
    pub fn new(indent: bool) -> Self {
        if indent {
            Self::Indented
        } else {
            Self::Compact
        }
    }
}

/// A nested-list value.
///
/// Equality is structural and order-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Sexp {
    /// An atom.
    Atom(String),
    /// A list.
    List(Vec<Sexp>),
}
impl Sexp {
    /// Atom constructor.
    pub fn atom(atom: impl Into<String>) -> Self {
        Self::Atom(atom.into())
    }
    /// List constructor.
    pub fn list(elems: Vec<Sexp>) -> Self {
        Self::List(elems)
    }
    /// Empty list.
    pub fn nil() -> Self {
        Self::List(vec![])
    }

    /// True on atoms.
    pub fn is_atom(&self) -> bool {
        matches!(self, Self::Atom(_))
    }
    /// True on lists, including the empty one.
    pub fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }
    /// True on the empty list.
    pub fn is_nil(&self) -> bool {
        matches!(self, Self::List(elems) if elems.is_empty())
    }

    /// Atom accessor.
    pub fn as_atom(&self) -> Option<&str> {
        match self {
            Self::Atom(atom) => Some(atom),
            Self::List(_) => None,
        }
    }
    /// List accessor.
    pub fn as_list(&self) -> Option<&[Sexp]> {
        match self {
            Self::List(elems) => Some(elems),
            Self::Atom(_) => None,
        }
    }

    /// Number of children, `0` for atoms.
    pub fn child_count(&self) -> usize {
        self.as_list().map(|elems| elems.len()).unwrap_or(0)
    }
    /// Child accessor, `None` for atoms and out-of-range indices.
    pub fn child(&self, idx: usize) -> Option<&Sexp> {
        self.as_list().and_then(|elems| elems.get(idx))
    }
    /// First child of a list, if it is an atom.
    pub fn head(&self) -> Option<&str> {
        self.child(0).and_then(Sexp::as_atom)
    }
    /// Children after the first one, empty for atoms and nil.
    pub fn args(&self) -> &[Sexp] {
        match self.as_list() {
            Some(elems) if !elems.is_empty() => &elems[1..],
            _ => &[],
        }
    }

    /// Appends a child.
    ///
    /// An atom is first turned into a single-element list.
    ///
    /// ```rust
    /// # use its_conv::sexp::Sexp;
    /// let mut sexp = Sexp::atom("and");
    /// sexp.add_child("a");
    /// sexp.add_child(Sexp::list(vec!["not".into(), "b".into()]));
    /// assert_eq!(sexp.to_string(), "(and a (not b))");
    /// ```
    pub fn add_child(&mut self, child: impl Into<Sexp>) {
        let child = child.into();
        match self {
            Self::List(elems) => elems.push(child),
            Self::Atom(atom) => {
                let atom = std::mem::take(atom);
                *self = Self::List(vec![Self::Atom(atom), child])
            }
        }
    }

    /// Retrieves a sub-value by path.
    ///
    /// Path components are separated by `/`. Each component selects the first child list whose
    /// head is that component; the last component can also select an atom child equal to it.
    ///
    /// ```rust
    /// # use its_conv::sexp;
    /// let sexp = sexp::parse("(config (solver (name z3) (timeout 10)) verbose)").unwrap();
    /// let sexp = sexp.child(0).unwrap();
    /// let timeout = sexp.get_child_by_path("solver/timeout").unwrap();
    /// assert_eq!(timeout.to_string(), "(timeout 10)");
    /// assert!(sexp.get_child_by_path("verbose").unwrap().is_atom());
    /// assert!(sexp.get_child_by_path("solver/verbose").is_none());
    /// ```
    pub fn get_child_by_path(&self, path: &str) -> Option<&Sexp> {
        if path.is_empty() {
            return None;
        }
        let comps: Vec<&str> = path.split('/').collect();
        let mut current = self;
        for (idx, comp) in comps.iter().enumerate() {
            let last = idx + 1 == comps.len();
            current = current.as_list()?.iter().find(|elem| match elem {
                Self::Atom(atom) => last && atom == comp,
                Self::List(_) => elem.head() == Some(*comp),
            })?;
        }
        Some(current)
    }

    /// Retrieves a sub-value by path, creating the missing `(comp)` lists along the way.
    ///
    /// ```rust
    /// # use its_conv::sexp::Sexp;
    /// let mut sexp = Sexp::list(vec!["config".into()]);
    /// sexp.create_path(&["solver", "timeout"]).add_child("10");
    /// sexp.create_path(&["solver", "name"]).add_child("z3");
    /// assert_eq!(sexp.to_string(), "(config (solver (timeout 10) (name z3)))");
    /// ```
    pub fn create_path<S: AsRef<str>>(&mut self, path: &[S]) -> &mut Sexp {
        let mut current = self;
        let mut rest = path;
        while let Some((comp, tail)) = rest.split_first() {
            let comp = comp.as_ref();
            let pos = current.as_list().and_then(|elems| {
                elems
                    .iter()
                    .position(|elem| elem.as_atom().or_else(|| elem.head()) == Some(comp))
            });
            match (pos, { current }) {
                (Some(idx), Self::List(elems)) => {
                    current = &mut elems[idx];
                    rest = tail;
                }
                (_, sexp) => {
                    current = sexp;
                    break;
                }
            }
        }
        for comp in rest {
            current.add_child(Self::List(vec![Self::atom(comp.as_ref())]));
            current = match { current } {
                Self::List(elems) => {
                    let last = elems.len() - 1;
                    &mut elems[last]
                }
                // unreachable, `add_child` always yields a list
                atom => atom,
            };
        }
        current
    }

    /// True if the list's parens are not printed.
    ///
    /// Happens for single-child lists whose only child is an atom.
    fn elides_parens(elems: &[Sexp]) -> bool {
        elems.len() == 1 && elems[0].is_atom()
    }

    /// Width of the single-line rendering of `self`.
    ///
    /// ```rust
    /// # use its_conv::sexp;
    /// let sexp = sexp::parse("(and (> x 0) (f))").unwrap();
    /// let sexp = sexp.child(0).unwrap();
    /// assert_eq!(sexp.weight(), sexp.to_string().len());
    /// ```
    pub fn weight(&self) -> usize {
        match self {
            Self::Atom(atom) => escape_atom(atom).chars().count(),
            Self::List(elems) if Self::elides_parens(elems) => elems[0].weight(),
            Self::List(elems) if elems.is_empty() => 2,
            Self::List(elems) => {
                2 + elems.len() - 1 + elems.iter().map(Sexp::weight).sum::<usize>()
            }
        }
    }

    /// Renders `self` in some layout.
    pub fn render(&self, layout: Layout) -> String {
        let mut buf = String::new();
        self.render_into(layout, 0, &mut buf);
        buf
    }
    /// Compact rendering.
    pub fn to_compact_string(&self) -> String {
        self.render(Layout::Compact)
    }
    /// Indented rendering.
    pub fn to_indented_string(&self) -> String {
        self.render(Layout::Indented)
    }

    /// Renders the children of a root list as a sequence of top-level forms, one per line.
    ///
    /// An atom is rendered as a single form.
    pub fn to_document(&self, layout: Layout) -> String {
        let mut buf = String::new();
        match self {
            Self::List(elems) => {
                for elem in elems {
                    elem.render_into(layout, 0, &mut buf);
                    buf.push('\n')
                }
            }
            Self::Atom(_) => {
                self.render_into(layout, 0, &mut buf);
                buf.push('\n')
            }
        }
        buf
    }

    fn render_into(&self, layout: Layout, depth: usize, buf: &mut String) {
        let elems = match self {
            Self::Atom(atom) => {
                buf.push_str(&escape_atom(atom));
                return;
            }
            Self::List(elems) => elems,
        };
        let parens = !Self::elides_parens(elems);
        let one_line = self.weight() <= WIDTH;
        if parens {
            buf.push('(')
        }
        for (idx, elem) in elems.iter().enumerate() {
            if idx > 0 {
                if one_line {
                    buf.push(' ')
                } else {
                    buf.push('\n');
                    if layout == Layout::Indented {
                        buf.extend(std::iter::repeat(' ').take(2 * (depth + 1)))
                    }
                }
            }
            elem.render_into(layout, depth + 1, buf)
        }
        if parens {
            buf.push(')')
        }
    }
}

impl fmt::Display for Sexp {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_compact_string().fmt(fmt)
    }
}
impl From<&str> for Sexp {
    fn from(atom: &str) -> Self {
        Self::atom(atom)
    }
}
impl From<String> for Sexp {
    fn from(atom: String) -> Self {
        Self::Atom(atom)
    }
}
impl From<Vec<Sexp>> for Sexp {
    fn from(elems: Vec<Sexp>) -> Self {
        Self::List(elems)
    }
}
impl std::str::FromStr for Sexp {
    type Err = Error;
    fn from_str(text: &str) -> Res<Self> {
        parse(text)
    }
}

/// Parses some text.
///
/// The result is a list of all the top-level values in `text`.
///
/// ```rust
/// # use its_conv::sexp::{self, Sexp};
/// let sexp = sexp::parse(r#"a "b\tc" (d)"#).unwrap();
/// assert_eq!(
///     sexp,
///     Sexp::list(vec!["a".into(), "b\tc".into(), Sexp::list(vec!["d".into()])]),
/// );
///
/// let err = sexp::parse("(a (b c)").unwrap_err();
/// assert_eq!(err.to_string(), "parse error at 1:1: unclosed parenthesis | (a (b c)");
/// ```
pub fn parse(text: &str) -> Res<Sexp> {
    let error = |pos: usize, msg: &str| parse::Span::new(pos, pos).error(text, msg);

    let bytes = text.as_bytes();
    // Positions of the open parens, and the elements of the corresponding lists.
    let mut stack: Vec<(usize, Vec<Sexp>)> = vec![(0, vec![])];
    let mut pos = 0;

    while pos < bytes.len() {
        match bytes[pos] {
            c if c.is_ascii_whitespace() => pos += 1,
            b'(' => {
                stack.push((pos, vec![]));
                pos += 1
            }
            b')' => {
                if stack.len() < 2 {
                    return Err(error(pos, "unexpected closing parenthesis"));
                }
                if let Some((_, elems)) = stack.pop() {
                    push(&mut stack, Sexp::List(elems))
                }
                pos += 1
            }
            b';' => {
                while pos < bytes.len() && bytes[pos] != b'\n' {
                    pos += 1
                }
            }
            b'"' => {
                let start = pos + 1;
                let mut chars = text[start..].char_indices();
                let mut atom = String::new();
                let end = loop {
                    match chars.next() {
                        None => return Err(error(pos, "unterminated string literal")),
                        Some((idx, '"')) => break start + idx,
                        Some((idx, '\n')) => {
                            return Err(error(start + idx, "unexpected newline in string literal"))
                        }
                        Some((idx, '\\')) => match chars.next() {
                            None => {
                                return Err(error(start + idx, "unfinished escape sequence"))
                            }
                            Some((jdx, c)) => match unescape_char(c) {
                                Some(actual) => atom.push(actual),
                                None => {
                                    return Err(error(
                                        start + jdx,
                                        &format!("invalid escape character `{}`", c),
                                    ))
                                }
                            },
                        },
                        Some((_, c)) => atom.push(c),
                    }
                };
                push(&mut stack, Sexp::Atom(atom));
                pos = end + 1
            }
            b'|' => {
                let start = pos + 1;
                let end = match text[start..].find('|') {
                    Some(len) => start + len,
                    None => return Err(error(pos, "unterminated `|...|` symbol")),
                };
                push(&mut stack, Sexp::atom(&text[start..end]));
                pos = end + 1
            }
            _ => {
                let start = pos;
                while pos < bytes.len()
                    && !bytes[pos].is_ascii_whitespace()
                    && bytes[pos] != b'('
                    && bytes[pos] != b')'
                {
                    pos += 1
                }
                push(&mut stack, Sexp::atom(&text[start..pos]))
            }
        }
    }

    if stack.len() > 1 {
        let (open, _) = stack[stack.len() - 1];
        return Err(error(open, "unclosed parenthesis"));
    }
    let elems = stack.pop().map(|(_, elems)| elems).unwrap_or_default();
    trace!("parsed {} top-level s-expression(s)", elems.len());
    Ok(Sexp::List(elems))
}

/// Pushes an element in the innermost open list.
fn push(stack: &mut [(usize, Vec<Sexp>)], elem: Sexp) {
    if let Some((_, elems)) = stack.last_mut() {
        elems.push(elem)
    }
}
