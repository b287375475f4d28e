//! Pipegraph - the node graph connection engine of a visual data-pipeline editor
//!
//! This library provides the entity model (nodes, typed sockets, edges), the
//! graph mutation operations and the interactive drag-to-connect protocol.
//! Rendering, widget construction and the data transforms themselves are
//! external collaborators.

pub mod editor;
pub mod nodes;

pub use editor::{ConnectionSession, GestureOutcome, HitTarget, HitTester, RadiusHitTester};
pub use nodes::{
    Edge, EdgeId, GraphError, Node, NodeBehavior, NodeGraph, NodeId, NodeRegistry, Socket,
    SocketDirection, SocketRef,
};

// Re-export commonly used egui types
pub use egui::{Pos2, Vec2};
