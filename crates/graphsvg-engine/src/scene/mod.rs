//! Retained vector scene.
//!
//! Responsibilities:
//! - hold the element tree primitives write into (the graph's vector output)
//! - hand out generational [`NodeId`] handles so a cleared subtree can never be
//!   confused with the nodes that replace it
//! - serialize the tree to SVG text

mod id;
mod svg;
mod tree;

pub use id::NodeId;
pub use svg::{write_svg, SVG_NS};
pub use tree::{Element, Scene, Tag};
