//! Node factory registry and the built-in pipeline node variants
//!
//! The registry maps a catalog display name to a factory that produces a
//! fully socketed node at a canvas position. It is owned by the surrounding
//! editor, not by the graph.

use super::graph::NodeGraph;
use super::hooks::NodeBehavior;
use super::node::Node;
use super::socket::SocketRef;
use egui::Pos2;
use log::{info, warn};
use std::collections::HashMap;

/// Factory for a single node variant
pub trait NodeFactory: Send + Sync {
    /// Catalog display name of the variant
    fn type_name(&self) -> &'static str;

    /// Creates a node of this variant at a canvas position.
    ///
    /// The returned node has its sockets pre-populated; the graph assigns
    /// the id when the node is added.
    fn create(&self, position: Pos2) -> Node;
}

/// Registry of node factories keyed by display name
pub struct NodeRegistry {
    factories: HashMap<String, Box<dyn NodeFactory>>,
}

impl NodeRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Creates a registry pre-populated with the built-in pipeline variants
    pub fn with_builtin_nodes() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(CsvSourceFactory));
        registry.register(Box::new(CleanColumnsFactory));
        registry.register(Box::new(StackFactory));
        registry
    }

    /// Registers a factory under its type name
    pub fn register(&mut self, factory: Box<dyn NodeFactory>) {
        info!("registered node type '{}'", factory.type_name());
        self.factories
            .insert(factory.type_name().to_string(), factory);
    }

    /// Creates a node by catalog name at a canvas position
    pub fn create(&self, type_name: &str, position: Pos2) -> Option<Node> {
        match self.factories.get(type_name) {
            Some(factory) => Some(factory.create(position)),
            None => {
                warn!("unknown node type '{}'", type_name);
                None
            }
        }
    }

    /// All registered type names, sorted for stable catalog display
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(|name| name.as_str()).collect();
        names.sort_unstable();
        names
    }
}

impl Default for NodeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Behavior of a node that originates tabular data.
///
/// The column schema is pushed in by the import collaborator and exposed
/// downstream through `output_columns`.
#[derive(Debug, Clone, Default)]
pub struct CsvSourceBehavior {
    columns: Vec<String>,
}

impl CsvSourceBehavior {
    /// Creates a source already carrying an imported column schema
    pub fn with_columns(columns: Vec<String>) -> Self {
        Self { columns }
    }

    /// Replaces the imported column schema
    pub fn set_columns(&mut self, columns: Vec<String>) {
        self.columns = columns;
    }
}

impl NodeBehavior for CsvSourceBehavior {
    fn output_columns(&self) -> Option<&[String]> {
        Some(&self.columns)
    }

    fn clone_box(&self) -> Box<dyn NodeBehavior> {
        Box::new(self.clone())
    }
}

/// Behavior of a cleaning transform: pulls the upstream column schema when
/// an edge attaches to its input and passes it through unchanged.
#[derive(Debug, Clone, Default)]
pub struct CleanColumnsBehavior {
    upstream_columns: Vec<String>,
}

impl NodeBehavior for CleanColumnsBehavior {
    fn on_edge_connect(&mut self, source: SocketRef, graph: &NodeGraph) {
        if let Some(columns) = upstream_columns(graph, source) {
            self.upstream_columns = columns.to_vec();
        }
    }

    fn output_columns(&self) -> Option<&[String]> {
        Some(&self.upstream_columns)
    }

    fn clone_box(&self) -> Box<dyn NodeBehavior> {
        Box::new(self.clone())
    }
}

/// Behavior of a stacking combine: unions the column schemas arriving on its
/// inputs.
#[derive(Debug, Clone, Default)]
pub struct StackBehavior {
    columns: Vec<String>,
}

impl NodeBehavior for StackBehavior {
    fn on_edge_connect(&mut self, source: SocketRef, graph: &NodeGraph) {
        if let Some(columns) = upstream_columns(graph, source) {
            for column in columns {
                if !self.columns.contains(column) {
                    self.columns.push(column.clone());
                }
            }
        }
    }

    fn output_columns(&self) -> Option<&[String]> {
        Some(&self.columns)
    }

    fn clone_box(&self) -> Box<dyn NodeBehavior> {
        Box::new(self.clone())
    }
}

/// Column schema exposed by the node owning a socket, if any
fn upstream_columns(graph: &NodeGraph, source: SocketRef) -> Option<&[String]> {
    graph
        .nodes
        .get(&source.node)?
        .behavior()?
        .output_columns()
}

struct CsvSourceFactory;

impl NodeFactory for CsvSourceFactory {
    fn type_name(&self) -> &'static str {
        "Csv Source"
    }

    fn create(&self, position: Pos2) -> Node {
        let mut node = Node::new(0, self.type_name(), position);
        node.add_output();
        node.with_behavior(Box::new(CsvSourceBehavior::default()))
    }
}

struct CleanColumnsFactory;

impl NodeFactory for CleanColumnsFactory {
    fn type_name(&self) -> &'static str {
        "Clean Columns"
    }

    fn create(&self, position: Pos2) -> Node {
        let mut node = Node::new(0, self.type_name(), position);
        node.add_input().add_output();
        node.with_behavior(Box::new(CleanColumnsBehavior::default()))
    }
}

struct StackFactory;

impl NodeFactory for StackFactory {
    fn type_name(&self) -> &'static str {
        "Stack"
    }

    fn create(&self, position: Pos2) -> Node {
        let mut node = Node::new(0, self.type_name(), position);
        node.add_input().add_input().add_output();
        node.with_behavior(Box::new(StackBehavior::default()))
    }
}
