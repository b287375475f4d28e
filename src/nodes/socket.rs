//! Socket types and functionality for node connections

use super::edge::EdgeId;
use super::node::NodeId;
use egui::Pos2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a socket (input or output)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SocketDirection {
    Input,
    Output,
}

/// Non-owning address of a socket, resolved through the graph's node table.
///
/// Input and output sockets live in independent index spaces on a node, so
/// the direction is part of the address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SocketRef {
    pub node: NodeId,
    pub direction: SocketDirection,
    pub index: usize,
}

impl SocketRef {
    /// Creates an address for an input socket
    pub fn input(node: NodeId, index: usize) -> Self {
        Self {
            node,
            direction: SocketDirection::Input,
            index,
        }
    }

    /// Creates an address for an output socket
    pub fn output(node: NodeId, index: usize) -> Self {
        Self {
            node,
            direction: SocketDirection::Output,
            index,
        }
    }

    /// Checks if this address points at an input socket
    pub fn is_input(&self) -> bool {
        matches!(self.direction, SocketDirection::Input)
    }

    /// Checks if this address points at an output socket
    pub fn is_output(&self) -> bool {
        matches!(self.direction, SocketDirection::Output)
    }
}

impl fmt::Display for SocketRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.direction {
            SocketDirection::Input => "in",
            SocketDirection::Output => "out",
        };
        write!(f, "node {} {}#{}", self.node, tag, self.index)
    }
}

/// A connection point owned by a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Socket {
    pub index: usize,
    pub direction: SocketDirection,
    #[serde(with = "pos2_serde")]
    pub position: Pos2,
    /// Ids of the edges currently attached to this socket
    pub edges: Vec<EdgeId>,
}

impl Socket {
    /// Creates a new unconnected socket
    pub fn new(index: usize, direction: SocketDirection) -> Self {
        Self {
            index,
            direction,
            position: Pos2::ZERO,
            edges: Vec::new(),
        }
    }

    /// Registers an edge on this socket
    pub fn attach(&mut self, edge_id: EdgeId) {
        if !self.edges.contains(&edge_id) {
            self.edges.push(edge_id);
        }
    }

    /// Deregisters an edge from this socket
    pub fn detach(&mut self, edge_id: EdgeId) {
        self.edges.retain(|id| *id != edge_id);
    }

    /// Checks if any edge is attached to this socket
    pub fn has_edges(&self) -> bool {
        !self.edges.is_empty()
    }
}

// Serde helper module for Pos2
mod pos2_serde {
    use super::*;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(pos: &Pos2, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        [pos.x, pos.y].serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Pos2, D::Error>
    where
        D: Deserializer<'de>,
    {
        let [x, y] = <[f32; 2]>::deserialize(deserializer)?;
        Ok(Pos2::new(x, y))
    }
}
