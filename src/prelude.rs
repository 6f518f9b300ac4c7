//! Common imports throughout this project.

pub use std::{
    collections::{BTreeMap as Map, BTreeSet as Set},
    fmt,
    ops::Deref,
};

pub use error_chain::bail;
pub use log::{debug, info, trace, warn};
pub use num::{bigint::Sign, BigInt as Int, ToPrimitive};

pub use crate::{conv, expr, its, parse, sexp};

error_chain::error_chain! {
    types {
        Error, ErrorKind, ResExt, Res;
    }

    foreign_links {
        Io(std::io::Error)
        /// I/O error.
        ;
    }

    errors {
        /// A parse error.
        ///
        /// **NB**: `row` and `col` start at zero.
        ParseErr(row: usize, col: usize, line: String, msg: String) {
            description("parse error")
            display("parse error at {}:{}: {} | {}", row + 1, col + 1, msg, line)
        }
        /// A recognized construct this tool has no translation for.
        Unsupported(what: String) {
            description("unsupported construct")
            display("unsupported construct: {}", what)
        }
        /// A nested-list value that does not have the expected shape.
        Malformed(what: String) {
            description("malformed input")
            display("malformed input: {}", what)
        }
    }
}

impl Error {
    /// Parse error constructor.
    pub fn parse(row: usize, col: usize, line: impl Into<String>, msg: impl Into<String>) -> Self {
        ErrorKind::ParseErr(row, col, line.into(), msg.into()).into()
    }
    /// Unsupported construct error constructor.
    pub fn unsupported(what: impl Into<String>) -> Self {
        ErrorKind::Unsupported(what.into()).into()
    }
    /// Malformed input error constructor.
    pub fn malformed(what: impl Into<String>) -> Self {
        ErrorKind::Malformed(what.into()).into()
    }
}
