//! Per-variant node behavior hooks
//!
//! Node variants supply their own reaction to incoming connections through a
//! trait object instead of subclassing. The graph guarantees the attachment
//! hook fires exactly once per successful connection, synchronously, with
//! the address of the socket now feeding the node.

use super::graph::NodeGraph;
use super::socket::SocketRef;
use std::fmt;

/// Trait for node-variant-specific connection hooks and data exposure
pub trait NodeBehavior: fmt::Debug + Send + Sync {
    /// Called after an edge attaches to one of this node's input sockets.
    ///
    /// `source` is the upstream output socket now feeding the node. The
    /// graph is passed immutably so the hook can pull upstream context
    /// (typically the column schema) but cannot nest graph mutation.
    fn on_edge_connect(&mut self, _source: SocketRef, _graph: &NodeGraph) {
        // Default: no special handling
    }

    /// Column schema this node exposes on its outputs, if known
    fn output_columns(&self) -> Option<&[String]> {
        None
    }

    /// Clone the behavior for registration
    fn clone_box(&self) -> Box<dyn NodeBehavior>;
}

impl Clone for Box<dyn NodeBehavior> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Default behavior for nodes that don't react to connections
#[derive(Debug, Clone)]
pub struct DefaultBehavior;

impl NodeBehavior for DefaultBehavior {
    fn clone_box(&self) -> Box<dyn NodeBehavior> {
        Box::new(self.clone())
    }
}
