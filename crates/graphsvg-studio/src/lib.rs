//! Host side of graphsvg: `.graph` documents in, SVG and raster images out.
//!
//! - [`loader`] turns a parsed [`graphsvg_markup::Document`] into a
//!   [`graphsvg_engine::GraphDecl`], compiling backtick expressions into
//!   callable functions.
//! - [`args`] holds the small value parsers behind the command line.
//! - [`export`] rasterizes a graph (shader surfaces behind the vector
//!   layer) and talks to the clipboard.

pub mod args;
pub mod export;
pub mod loader;

pub use loader::{decl_from_document, load_str, LoadError};
