//! Node graph data structures and mutation operations

use super::edge::{Edge, EdgeId};
use super::node::{Node, NodeId};
use super::socket::{Socket, SocketRef};
use log::debug;
use std::collections::HashMap;
use thiserror::Error;

/// Recoverable failures of a graph mutation.
///
/// Every failure is local and synchronous; no mutation is partially applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("node {0} does not exist")]
    NodeNotFound(NodeId),
    #[error("edge {0} does not exist")]
    EdgeNotFound(EdgeId),
    #[error("socket {0} does not resolve to a live node")]
    SocketNotFound(SocketRef),
    #[error("edges must run from an output socket to an input socket")]
    InvalidDirection,
    #[error("cannot connect a socket to itself")]
    SelfConnection,
    #[error("these sockets are already connected")]
    DuplicateConnection,
}

/// A graph owning nodes and the edges between their sockets.
///
/// Node and edge ids are assigned monotonically starting at 1 and never
/// reused. Every edge's endpoints resolve to live nodes; both removal paths
/// detach edges from their surviving sockets so no dangling references
/// remain.
#[derive(Debug, Clone)]
pub struct NodeGraph {
    pub nodes: HashMap<NodeId, Node>,
    pub edges: HashMap<EdgeId, Edge>,
    next_node_id: NodeId,
    next_edge_id: EdgeId,
}

impl NodeGraph {
    /// Creates a new empty node graph
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            edges: HashMap::new(),
            next_node_id: 1,
            next_edge_id: 1,
        }
    }

    /// Adds a node to the graph and returns its assigned id
    pub fn add_node(&mut self, mut node: Node) -> NodeId {
        let id = self.next_node_id;
        self.next_node_id += 1;
        node.id = id;
        node.update_socket_positions();
        debug!("added node {} ({})", id, node.title);
        self.nodes.insert(id, node);
        id
    }

    /// Adds a node to the graph with a specific id (for testing)
    pub fn add_node_with_id(&mut self, id: NodeId, mut node: Node) -> NodeId {
        node.id = id;
        node.update_socket_positions();
        self.nodes.insert(id, node);
        if id >= self.next_node_id {
            self.next_node_id = id + 1;
        }
        id
    }

    /// Removes a node and detaches every edge touching any of its sockets
    pub fn remove_node(&mut self, node_id: NodeId) -> Result<Node, GraphError> {
        if !self.nodes.contains_key(&node_id) {
            return Err(GraphError::NodeNotFound(node_id));
        }
        let touching: Vec<EdgeId> = self
            .edges
            .values()
            .filter(|edge| edge.touches(node_id))
            .map(|edge| edge.id)
            .collect();
        for edge_id in touching {
            self.remove_edge(edge_id)?;
        }
        debug!("removed node {}", node_id);
        self.nodes
            .remove(&node_id)
            .ok_or(GraphError::NodeNotFound(node_id))
    }

    /// Connects an output socket to an input socket.
    ///
    /// On success the new edge is registered on both endpoint sockets and
    /// the end socket's owning node receives its attachment hook exactly
    /// once, with the start socket, before this returns. On failure the
    /// graph is left untouched. Direction is never normalized: a start
    /// socket that is not an output fails with
    /// [`GraphError::InvalidDirection`].
    pub fn add_edge(&mut self, start: SocketRef, end: SocketRef) -> Result<EdgeId, GraphError> {
        if start == end {
            return Err(GraphError::SelfConnection);
        }
        if !start.is_output() || !end.is_input() {
            return Err(GraphError::InvalidDirection);
        }
        if self.socket(start).is_none() {
            return Err(GraphError::SocketNotFound(start));
        }
        if self.socket(end).is_none() {
            return Err(GraphError::SocketNotFound(end));
        }
        if self.connected(start, end) {
            return Err(GraphError::DuplicateConnection);
        }

        let edge_id = self.next_edge_id;
        self.next_edge_id += 1;
        self.edges.insert(edge_id, Edge::new(edge_id, start, end));
        self.attach(start, edge_id);
        self.attach(end, edge_id);
        debug!("added edge {} from {} to {}", edge_id, start, end);

        // Fire the attachment hook with the behavior lifted out of the node,
        // so the hook sees the graph immutably with the edge fully in place.
        let mut behavior = self
            .nodes
            .get_mut(&end.node)
            .and_then(|node| node.take_behavior());
        if let Some(behavior) = behavior.as_mut() {
            behavior.on_edge_connect(start, self);
        }
        if let Some(node) = self.nodes.get_mut(&end.node) {
            node.restore_behavior(behavior);
        }

        Ok(edge_id)
    }

    /// Removes an edge and deregisters it from both endpoint sockets
    pub fn remove_edge(&mut self, edge_id: EdgeId) -> Result<Edge, GraphError> {
        let edge = self
            .edges
            .remove(&edge_id)
            .ok_or(GraphError::EdgeNotFound(edge_id))?;
        self.detach(edge.start, edge_id);
        self.detach(edge.end, edge_id);
        debug!("removed edge {}", edge_id);
        Ok(edge)
    }

    /// Checks if an edge already links exactly this ordered socket pair.
    ///
    /// The check walks the start socket's attached-edge list, so it is cheap
    /// for the fan-outs a pipeline editor produces in practice.
    pub fn connected(&self, start: SocketRef, end: SocketRef) -> bool {
        let Some(socket) = self.socket(start) else {
            return false;
        };
        socket.edges.iter().any(|edge_id| {
            self.edges
                .get(edge_id)
                .is_some_and(|edge| edge.start == start && edge.end == end)
        })
    }

    /// The edge currently feeding an input socket, if any
    pub fn producer_of(&self, input: SocketRef) -> Option<EdgeId> {
        if !input.is_input() {
            return None;
        }
        self.socket(input)?.edges.first().copied()
    }

    /// Resolves a socket address against the node table
    pub fn socket(&self, socket_ref: SocketRef) -> Option<&Socket> {
        self.nodes
            .get(&socket_ref.node)?
            .socket(socket_ref.direction, socket_ref.index)
    }

    /// Scene-space position of a socket, if the address resolves
    pub fn socket_position(&self, socket_ref: SocketRef) -> Option<egui::Pos2> {
        self.socket(socket_ref).map(|socket| socket.position)
    }

    /// Updates cached socket positions for all nodes
    pub fn update_all_socket_positions(&mut self) {
        for node in self.nodes.values_mut() {
            node.update_socket_positions();
        }
    }

    fn attach(&mut self, socket_ref: SocketRef, edge_id: EdgeId) {
        if let Some(socket) = self.socket_mut(socket_ref) {
            socket.attach(edge_id);
        }
    }

    fn detach(&mut self, socket_ref: SocketRef, edge_id: EdgeId) {
        if let Some(socket) = self.socket_mut(socket_ref) {
            socket.detach(edge_id);
        }
    }

    fn socket_mut(&mut self, socket_ref: SocketRef) -> Option<&mut Socket> {
        self.nodes
            .get_mut(&socket_ref.node)?
            .socket_mut(socket_ref.direction, socket_ref.index)
    }
}

impl Default for NodeGraph {
    fn default() -> Self {
        Self::new()
    }
}
