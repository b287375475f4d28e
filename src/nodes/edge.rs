//! Edge type linking an output socket to an input socket

use super::socket::SocketRef;
use serde::{Deserialize, Serialize};

/// Unique identifier for an edge
pub type EdgeId = usize;

/// A directed link from an output socket to an input socket.
///
/// Direction is validated by the graph when the edge is created; the struct
/// itself only carries the endpoint addresses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub start: SocketRef,
    pub end: SocketRef,
}

impl Edge {
    /// Creates a new edge between two socket addresses
    pub fn new(id: EdgeId, start: SocketRef, end: SocketRef) -> Self {
        Self { id, start, end }
    }

    /// Checks if the edge touches any socket of the given node
    pub fn touches(&self, node_id: super::node::NodeId) -> bool {
        self.start.node == node_id || self.end.node == node_id
    }
}
