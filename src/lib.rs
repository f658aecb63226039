//! Core library for the lista-brasoft command line application.
//!
//! The library exposes the enrichment pipeline that powers the command-line
//! interface as well as the unit tests. The modules are structured to keep
//! responsibilities narrow and composable: text canonicalization in
//! [`normalize`], block splitting and field extraction in [`extract`],
//! category resolution in [`classify`], per-item math in [`quantify`],
//! report aggregation in [`aggregate`], workbook adapters under [`io`], and
//! the orchestration entry point in [`fill`].

pub mod aggregate;
pub mod classify;
pub mod config;
pub mod error;
pub mod extract;
pub mod fill;
pub mod io;
pub mod model;
pub mod normalize;
pub mod quantify;

pub use error::{ListError, Result};
