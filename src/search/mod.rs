//! Search tree built by repeated product update.

pub mod graph;
pub mod node;

pub use graph::SearchGraph;
pub use node::{Node, NodeId};
