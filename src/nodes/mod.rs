//! Node system - entity model, graph operations and the node catalog

pub mod edge;
pub mod factory;
pub mod graph;
pub mod hooks;
pub mod node;
pub mod socket;

// Re-export core types
pub use edge::{Edge, EdgeId};
pub use graph::{GraphError, NodeGraph};
pub use hooks::{DefaultBehavior, NodeBehavior};
pub use node::{Node, NodeId};
pub use socket::{Socket, SocketDirection, SocketRef};

// Re-export factory types
pub use factory::{NodeFactory, NodeRegistry};
