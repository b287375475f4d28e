//! Node types and core node functionality

use super::hooks::NodeBehavior;
use super::socket::{Socket, SocketDirection, SocketRef};
use egui::{Pos2, Rect, Vec2};

/// Unique identifier for a node
pub type NodeId = usize;

/// Height of the title band at the top of a node
pub const TITLE_HEIGHT: f32 = 24.0;
/// Padding between the title band and the first socket row
pub const TITLE_PADDING: f32 = 4.0;
/// Corner radius of the node body
pub const CORNER_RADIUS: f32 = 10.0;
/// Vertical distance between two sockets on the same side
pub const SOCKET_SPACING: f32 = 22.0;
/// Horizontal offset of input sockets from the node's left edge
pub const INPUT_SOCKET_INSET: f32 = 6.0;
/// Horizontal offset of output sockets from the node's right edge
pub const OUTPUT_SOCKET_INSET: f32 = 14.0;

/// A processing unit in the graph with input and output sockets.
///
/// Per-variant behavior (the attachment hook and the column schema a node
/// exposes) is supplied through a boxed [`NodeBehavior`] rather than
/// subclassing.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub title: String,
    pub position: Pos2,
    pub size: Vec2,
    pub inputs: Vec<Socket>,
    pub outputs: Vec<Socket>,
    behavior: Option<Box<dyn NodeBehavior>>,
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        // `behavior` is a trait object and has no notion of equality; compare
        // the structural fields only.
        self.id == other.id
            && self.title == other.title
            && self.position == other.position
            && self.size == other.size
            && self.inputs == other.inputs
            && self.outputs == other.outputs
    }
}

impl Node {
    /// Creates a new node with the specified title at a canvas position
    pub fn new(id: NodeId, title: impl Into<String>, position: Pos2) -> Self {
        Self {
            id,
            title: title.into(),
            position,
            size: Vec2::new(180.0, 80.0),
            inputs: vec![],
            outputs: vec![],
            behavior: None,
        }
    }

    /// Adds an input socket to the node
    pub fn add_input(&mut self) -> &mut Self {
        let index = self.inputs.len();
        let mut socket = Socket::new(index, SocketDirection::Input);
        socket.position = self.socket_position(index, SocketDirection::Input);
        self.inputs.push(socket);
        self
    }

    /// Adds an output socket to the node
    pub fn add_output(&mut self) -> &mut Self {
        let index = self.outputs.len();
        let mut socket = Socket::new(index, SocketDirection::Output);
        socket.position = self.socket_position(index, SocketDirection::Output);
        self.outputs.push(socket);
        self
    }

    /// Sets the size of the node
    pub fn with_size(mut self, size: Vec2) -> Self {
        self.size = size;
        self.update_socket_positions();
        self
    }

    /// Sets the behavior variant of the node
    pub fn with_behavior(mut self, behavior: Box<dyn NodeBehavior>) -> Self {
        self.behavior = Some(behavior);
        self
    }

    /// Scene-space position of a socket on this node.
    ///
    /// Pure function of the node geometry, the socket index and the
    /// direction; the presentation layer relies on it to terminate edges on
    /// sockets. Input sockets sit at a fixed inset from the left edge,
    /// output sockets at a fixed inset from the right edge.
    pub fn socket_position(&self, index: usize, direction: SocketDirection) -> Pos2 {
        let x = match direction {
            SocketDirection::Input => INPUT_SOCKET_INSET,
            SocketDirection::Output => self.size.x - OUTPUT_SOCKET_INSET,
        };
        let y = TITLE_HEIGHT + TITLE_PADDING + CORNER_RADIUS + index as f32 * SOCKET_SPACING;
        self.position + Vec2::new(x, y)
    }

    /// Refreshes the cached positions of all sockets from the node geometry
    pub fn update_socket_positions(&mut self) {
        let origin = self.position;
        let width = self.size.x;
        for socket in &mut self.inputs {
            socket.position = origin
                + Vec2::new(
                    INPUT_SOCKET_INSET,
                    TITLE_HEIGHT
                        + TITLE_PADDING
                        + CORNER_RADIUS
                        + socket.index as f32 * SOCKET_SPACING,
                );
        }
        for socket in &mut self.outputs {
            socket.position = origin
                + Vec2::new(
                    width - OUTPUT_SOCKET_INSET,
                    TITLE_HEIGHT
                        + TITLE_PADDING
                        + CORNER_RADIUS
                        + socket.index as f32 * SOCKET_SPACING,
                );
        }
    }

    /// Moves the node and refreshes its socket positions
    pub fn set_position(&mut self, position: Pos2) {
        self.position = position;
        self.update_socket_positions();
    }

    /// Returns the bounding rectangle of the node
    pub fn rect(&self) -> Rect {
        Rect::from_min_size(self.position, self.size)
    }

    /// Resolves a socket on this node by direction and index
    pub fn socket(&self, direction: SocketDirection, index: usize) -> Option<&Socket> {
        match direction {
            SocketDirection::Input => self.inputs.get(index),
            SocketDirection::Output => self.outputs.get(index),
        }
    }

    /// Mutable variant of [`Node::socket`]
    pub fn socket_mut(&mut self, direction: SocketDirection, index: usize) -> Option<&mut Socket> {
        match direction {
            SocketDirection::Input => self.inputs.get_mut(index),
            SocketDirection::Output => self.outputs.get_mut(index),
        }
    }

    /// Address of a socket on this node
    pub fn socket_ref(&self, direction: SocketDirection, index: usize) -> SocketRef {
        SocketRef {
            node: self.id,
            direction,
            index,
        }
    }

    /// The behavior variant attached to this node, if any
    pub fn behavior(&self) -> Option<&dyn NodeBehavior> {
        self.behavior.as_deref()
    }

    /// Mutable variant of [`Node::behavior`]
    pub fn behavior_mut(&mut self) -> Option<&mut (dyn NodeBehavior + 'static)> {
        self.behavior.as_deref_mut()
    }

    /// Temporarily takes the behavior out of the node.
    ///
    /// Used by the graph to invoke the attachment hook while the node is
    /// still borrowed as part of the graph; callers must restore it with
    /// [`Node::restore_behavior`].
    pub(crate) fn take_behavior(&mut self) -> Option<Box<dyn NodeBehavior>> {
        self.behavior.take()
    }

    pub(crate) fn restore_behavior(&mut self, behavior: Option<Box<dyn NodeBehavior>>) {
        self.behavior = behavior;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn socket_position_is_deterministic() {
        let mut node = Node::new(1, "Test", Pos2::new(100.0, 50.0));
        node.add_input().add_input().add_output();

        let a = node.socket_position(1, SocketDirection::Input);
        let b = node.socket_position(1, SocketDirection::Input);
        assert_eq!(a, b);

        // Inputs hug the left edge, outputs the right edge
        assert_eq!(a.x, 100.0 + INPUT_SOCKET_INSET);
        let out = node.socket_position(0, SocketDirection::Output);
        assert_eq!(out.x, 100.0 + node.size.x - OUTPUT_SOCKET_INSET);

        // Second socket row sits one spacing step below the first
        let first = node.socket_position(0, SocketDirection::Input);
        assert_eq!(a.y - first.y, SOCKET_SPACING);
        assert_eq!(
            first.y,
            50.0 + TITLE_HEIGHT + TITLE_PADDING + CORNER_RADIUS
        );
    }

    #[test]
    fn moving_a_node_refreshes_cached_socket_positions() {
        let mut node = Node::new(1, "Test", Pos2::ZERO);
        node.add_input();
        let before = node.inputs[0].position;
        node.set_position(Pos2::new(40.0, 40.0));
        let after = node.inputs[0].position;
        assert_eq!(after - before, Vec2::new(40.0, 40.0));
        assert_eq!(after, node.socket_position(0, SocketDirection::Input));
    }

    #[test]
    fn input_and_output_index_spaces_are_independent() {
        let mut node = Node::new(2, "Test", Pos2::ZERO);
        node.add_input().add_output();
        assert_eq!(node.inputs[0].index, 0);
        assert_eq!(node.outputs[0].index, 0);
        assert!(node.socket(SocketDirection::Input, 0).is_some());
        assert!(node.socket(SocketDirection::Output, 1).is_none());
    }
}
