//! Converts integer transition systems between three formats:
//!
//! - KoAT rule-based text (`.koat`), see [`KOAT_DEMO`];
//! - ARI LCTRS s-expressions (`.ari`), see [`ARI_DEMO`];
//! - SMT-LIB control-flow definitions (`.smt2`), see [`CFG_DEMO`].
//!
//! Each front end in [`parse`] builds an [`its::Its`], which [`its`] prints back in any of the
//! formats. [`conv`] ties both ends together.
//!
//! ```rust
//! # use its_conv::{parse, sexp::Layout};
//! let its = parse::koat(its_conv::KOAT_DEMO).unwrap();
//! assert_eq!(its.init, "start");
//! assert_eq!(its.rules.len(), 3);
//! let ari = its.to_ari().to_document(Layout::Compact);
//! assert_eq!(parse::ari(&ari).unwrap(), its);
//! ```

#![forbid(missing_docs)]

#[macro_use]
mod macros;

pub mod prelude;

pub mod conv;
pub mod expr;
pub mod its;
pub mod parse;
pub mod sexp;

/// A small KoAT system: counts `x` down to zero, accumulating in `y`.
pub const KOAT_DEMO: &str = include_str!("../rsc/demo.koat");

/// [`KOAT_DEMO`] in ARI format.
pub const ARI_DEMO: &str = include_str!("../rsc/demo.ari");

/// [`KOAT_DEMO`] in SMT-LIB control-flow format, with post-state variables `x1` and `y1`.
pub const CFG_DEMO: &str = include_str!("../rsc/demo.smt2");
