// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph data structure containing nodes and the edges between their sockets.

use crate::connection::Connection;
use crate::node::{Node, NodeId};
use crate::property::{PropertyError, PropertyValue};
use crate::socket::{InputRef, InputSocket, OutputRef};
use crate::types::{TypeRegistry, TypeSet};
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};

/// A node graph
#[derive(Debug, Clone)]
pub struct Graph {
    /// Graph name
    pub name: String,
    /// Socket compatibility table
    types: TypeRegistry,
    /// Nodes in declaration order
    nodes: IndexMap<NodeId, Node>,
}

impl Graph {
    /// Create a new empty graph using the standard type table
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_types(name, TypeRegistry::standard())
    }

    /// Create a new empty graph with a custom type table
    pub fn with_types(name: impl Into<String>, types: TypeRegistry) -> Self {
        Self {
            name: name.into(),
            types,
            nodes: IndexMap::new(),
        }
    }

    /// Socket compatibility table
    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    /// Add a node to the graph
    pub fn add_node(&mut self, node: Node) -> Result<NodeId, GraphError> {
        let id = node.id();
        if self.nodes.contains_key(&id) {
            return Err(GraphError::DuplicateNode(id));
        }
        self.nodes.insert(id, node);
        Ok(id)
    }

    /// Remove a node and every edge touching it
    pub fn remove_node(&mut self, node_id: NodeId) -> Option<Node> {
        let mut node = self.nodes.shift_remove(&node_id)?;

        for other in self.nodes.values_mut() {
            for index in 0..other.inputs().len() {
                if let Some(input) = other.input_mut(index) {
                    if input.link().is_some_and(|link| link.node == node_id) {
                        input.set_link(None);
                    }
                }
            }
        }

        for index in 0..node.inputs().len() {
            if let Some(input) = node.input_mut(index) {
                input.set_link(None);
            }
        }

        Some(node)
    }

    /// Whether a node is part of the graph
    pub fn contains(&self, node_id: NodeId) -> bool {
        self.nodes.contains_key(&node_id)
    }

    /// Get a node by ID
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    /// Get a mutable node by ID
    pub fn node_mut(&mut self, node_id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&node_id)
    }

    /// Get all nodes in declaration order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub(crate) fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.nodes.values_mut()
    }

    /// Get all node IDs in declaration order
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Set a property on a node
    pub fn set_property(
        &mut self,
        node_id: NodeId,
        name: &str,
        value: PropertyValue,
    ) -> Result<(), GraphError> {
        let node = self.nodes.get_mut(&node_id).ok_or(GraphError::NodeNotFound(node_id))?;
        node.set_property(name, value)
            .map_err(|source| GraphError::Property { node: node_id, source })
    }

    /// Connect an output to an input.
    ///
    /// The graph is left unchanged when this fails.
    pub fn connect(&mut self, from: OutputRef, to: InputRef) -> Result<Connection, ConnectionError> {
        let source_node = self.nodes.get(&from.node)
            .ok_or(ConnectionError::NodeNotFound(from.node))?;
        let target_node = self.nodes.get(&to.node)
            .ok_or(ConnectionError::NodeNotFound(to.node))?;

        let output = source_node.output(from.index)
            .ok_or(ConnectionError::OutputNotFound(from))?;
        let input = target_node.input(to.index)
            .ok_or(ConnectionError::InputNotFound(to))?;

        if !self.types.is_compatible(&output.produces, &input.accepts) {
            return Err(ConnectionError::IncompatibleTypes {
                from,
                to,
                produced: output.produces.clone(),
                accepted: input.accepts.clone(),
            });
        }

        if let Some(driver) = input.link() {
            return Err(ConnectionError::InputAlreadyConnected { input: to, driver });
        }

        if let Some(input) = self.nodes.get_mut(&to.node).and_then(|n| n.input_mut(to.index)) {
            input.set_link(Some(from));
        }

        Ok(Connection::new(from, to))
    }

    /// Remove the edge driving an input
    pub fn disconnect(&mut self, to: InputRef) -> Option<Connection> {
        let input = self.nodes.get_mut(&to.node)?.input_mut(to.index)?;
        input.set_link(None).map(|from| Connection::new(from, to))
    }

    /// Get all connections, grouped by target node in declaration order
    pub fn connections(&self) -> impl Iterator<Item = Connection> + '_ {
        self.nodes.values().flat_map(|node| {
            let node_id = node.id();
            node.inputs()
                .iter()
                .enumerate()
                .filter_map(move |(index, input)| {
                    input.link().map(|from| Connection::new(from, InputRef::new(node_id, index)))
                })
        })
    }

    /// Get connections from a specific output
    pub fn connections_from(&self, output: OutputRef) -> impl Iterator<Item = Connection> + '_ {
        self.connections().filter(move |c| c.from == output)
    }

    /// Get the connection driving an input
    pub fn connection_to(&self, input: InputRef) -> Option<Connection> {
        let link = self.nodes.get(&input.node)?.input(input.index)?.link()?;
        Some(Connection::new(link, input))
    }

    /// Get connections involving a node
    pub fn connections_for_node(&self, node_id: NodeId) -> impl Iterator<Item = Connection> + '_ {
        self.connections().filter(move |c| c.involves_node(node_id))
    }

    /// Get the number of connections
    pub fn connection_count(&self) -> usize {
        self.connections().count()
    }

    /// Nodes driving the inputs of a node, in input order without repeats
    pub fn dependencies(&self, node_id: NodeId) -> Vec<NodeId> {
        let mut deps = Vec::new();
        if let Some(node) = self.nodes.get(&node_id) {
            for link in node.inputs().iter().filter_map(InputSocket::link) {
                if !deps.contains(&link.node) {
                    deps.push(link.node);
                }
            }
        }
        deps
    }

    /// Nodes consuming any output of a node, in declaration order
    pub fn dependents(&self, node_id: NodeId) -> Vec<NodeId> {
        self.nodes
            .values()
            .filter(|node| node.inputs().iter().any(|i| i.link().is_some_and(|l| l.node == node_id)))
            .map(Node::id)
            .collect()
    }

    /// Check that every edge resolves and that the graph is acyclic
    pub fn validate(&self) -> Result<(), StructuralError> {
        for connection in self.connections() {
            let output = self
                .nodes
                .get(&connection.from.node)
                .and_then(|node| node.output(connection.from.index))
                .ok_or(StructuralError::DanglingEdge(connection))?;
            let input = self
                .nodes
                .get(&connection.to.node)
                .and_then(|node| node.input(connection.to.index))
                .ok_or(StructuralError::DanglingEdge(connection))?;

            if !self.types.is_compatible(&output.produces, &input.accepts) {
                return Err(StructuralError::IncompatibleEdge(connection));
            }
        }

        let mut visited = HashSet::new();
        let mut on_stack = HashSet::new();
        let mut path = Vec::new();

        for node_id in self.nodes.keys() {
            if !visited.contains(node_id) {
                self.visit(*node_id, &mut visited, &mut on_stack, &mut path)?;
            }
        }

        Ok(())
    }

    fn visit(
        &self,
        node_id: NodeId,
        visited: &mut HashSet<NodeId>,
        on_stack: &mut HashSet<NodeId>,
        path: &mut Vec<NodeId>,
    ) -> Result<(), StructuralError> {
        if on_stack.contains(&node_id) {
            return Err(cycle_error(node_id, path));
        }
        if visited.contains(&node_id) {
            return Ok(());
        }

        on_stack.insert(node_id);
        path.push(node_id);

        // Visit all nodes that this node depends on
        for dependency in self.dependencies(node_id) {
            self.visit(dependency, visited, on_stack, path)?;
        }

        path.pop();
        on_stack.remove(&node_id);
        visited.insert(node_id);

        Ok(())
    }

    /// Order in which every node runs during a pass.
    ///
    /// Source nodes (no connected inputs) come first in declaration order;
    /// every other node follows its dependencies.
    pub fn evaluation_order(&self) -> Result<Vec<NodeId>, StructuralError> {
        let is_source = |node: &&Node| !node.inputs().iter().any(InputSocket::is_connected);
        let sources = self.nodes.values().filter(is_source).map(Node::id);
        let others = self.nodes.values().filter(|n| !is_source(n)).map(Node::id);
        self.order_from(sources.chain(others))
    }

    /// Order in which the upstream closure of `roots` runs
    pub fn evaluation_order_from(&self, roots: &[NodeId]) -> Result<Vec<NodeId>, StructuralError> {
        if let Some(missing) = roots.iter().find(|id| !self.nodes.contains_key(*id)) {
            return Err(StructuralError::MissingNode(*missing));
        }
        self.order_from(roots.iter().copied())
    }

    fn order_from(&self, starts: impl IntoIterator<Item = NodeId>) -> Result<Vec<NodeId>, StructuralError> {
        enum Visit {
            Enter(NodeId),
            Exit(NodeId),
        }

        #[derive(PartialEq)]
        enum Mark {
            Active,
            Done,
        }

        let mut marks: HashMap<NodeId, Mark> = HashMap::with_capacity(self.nodes.len());
        let mut path: Vec<NodeId> = Vec::new();
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<Visit> = Vec::new();

        for start in starts {
            stack.push(Visit::Enter(start));

            while let Some(visit) = stack.pop() {
                let node_id = match visit {
                    Visit::Exit(node_id) => {
                        path.pop();
                        marks.insert(node_id, Mark::Done);
                        order.push(node_id);
                        continue;
                    }
                    Visit::Enter(node_id) => node_id,
                };

                match marks.get(&node_id) {
                    Some(Mark::Done) => continue,
                    Some(Mark::Active) => return Err(cycle_error(node_id, &path)),
                    None => {}
                }

                marks.insert(node_id, Mark::Active);
                path.push(node_id);
                stack.push(Visit::Exit(node_id));

                // Reversed so the first input's driver is visited first
                for dependency in self.dependencies(node_id).into_iter().rev() {
                    if marks.get(&dependency) != Some(&Mark::Done) {
                        stack.push(Visit::Enter(dependency));
                    }
                }
            }
        }

        Ok(order)
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

fn cycle_error(node: NodeId, path: &[NodeId]) -> StructuralError {
    let start = path.iter().position(|id| *id == node).unwrap_or(0);
    StructuralError::Cycle {
        node,
        path: path[start..].to_vec(),
    }
}

/// Error when creating a connection
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConnectionError {
    /// Node not found
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Output socket not found
    #[error("Output socket not found: {0:?}")]
    OutputNotFound(OutputRef),

    /// Input socket not found
    #[error("Input socket not found: {0:?}")]
    InputNotFound(InputRef),

    /// The type table rejects the pair
    #[error("Incompatible socket types: {produced} cannot drive an input accepting {accepted}")]
    IncompatibleTypes {
        /// Driving output
        from: OutputRef,
        /// Target input
        to: InputRef,
        /// Kinds produced by the output
        produced: TypeSet,
        /// Kinds accepted by the input
        accepted: TypeSet,
    },

    /// The input already has a driver; disconnect it first
    #[error("Input already connected: {input:?}")]
    InputAlreadyConnected {
        /// Target input
        input: InputRef,
        /// Output currently driving it
        driver: OutputRef,
    },
}

/// Structural problem that makes a graph unusable for execution or generation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StructuralError {
    /// Edge whose source node or socket does not exist
    #[error("Dangling edge: {0:?}")]
    DanglingEdge(Connection),

    /// Edge whose socket types are no longer compatible
    #[error("Edge connects incompatible sockets: {0:?}")]
    IncompatibleEdge(Connection),

    /// Directed cycle
    #[error("Graph contains a cycle through node {node:?}")]
    Cycle {
        /// Node on the cycle
        node: NodeId,
        /// Nodes on the cycle, starting at `node` and following dependencies
        path: Vec<NodeId>,
    },

    /// Requested node is not part of the graph
    #[error("Node not found: {0:?}")]
    MissingNode(NodeId),
}

/// Error when editing graph contents
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    /// A node with this ID already exists
    #[error("Duplicate node: {0:?}")]
    DuplicateNode(NodeId),

    /// Node not found
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Property edit rejected
    #[error("Property edit on node {node:?} failed: {source}")]
    Property {
        /// Edited node
        node: NodeId,
        /// Underlying error
        source: PropertyError,
    },
}
