// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions for the graph framework.

use crate::catalog::ResourceCatalog;
use crate::codegen::{CodeGenerationOutput, CodegenContext, GenerationError};
use crate::evaluation::ExecuteContext;
use crate::property::{Properties, PropertyError, PropertyValue};
use crate::socket::{InputSocket, OutputSocket};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Node type category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeCategory {
    /// Input nodes (constants, resources)
    Input,
    /// Output nodes (logging, side effects)
    Output,
    /// Math operations
    Math,
    /// Texture operations
    Texture,
    /// Logic/flow control
    Logic,
    /// Utility nodes
    Utility,
    /// Custom/user-defined
    Custom,
}

/// Behavior of a node kind.
///
/// Implementations only receive shared views of the graph, so they cannot
/// change its structure while a pass is running.
pub trait NodeBehavior: Send + Sync {
    /// Compute output values from the resolved inputs.
    ///
    /// Must not fail: a node that cannot produce a value writes
    /// [`Value::Null`](crate::Value::Null) and reports a diagnostic instead.
    fn execute(&self, cx: &mut ExecuteContext<'_>);

    /// Produce this node's code fragment from its properties and the
    /// references of its upstream outputs.
    fn generate_code(&self, cx: &CodegenContext<'_>) -> Result<CodeGenerationOutput, GenerationError>;

    /// Choices offered for a property that depend on the host catalog
    fn property_options(&self, _property: &str, _catalog: &dyn ResourceCatalog) -> Option<Vec<String>> {
        None
    }
}

/// Node type definition
#[derive(Clone)]
pub struct NodeType {
    /// Kind tag, unique within a registry
    pub id: String,
    /// Display name
    pub name: String,
    /// Category
    pub category: NodeCategory,
    /// Description
    pub description: String,
    /// Default input sockets
    pub inputs: Vec<InputSocket>,
    /// Default output sockets
    pub outputs: Vec<OutputSocket>,
    /// Default properties
    pub properties: Properties,
    /// Execute and code generation behavior
    pub behavior: Arc<dyn NodeBehavior>,
}

impl fmt::Debug for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeType")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("category", &self.category)
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .field("properties", &self.properties)
            .finish_non_exhaustive()
    }
}

/// A node instance in the graph
#[derive(Clone)]
pub struct Node {
    id: NodeId,
    kind: String,
    /// Display name (can be customized)
    pub name: String,
    category: NodeCategory,
    inputs: Vec<InputSocket>,
    outputs: Vec<OutputSocket>,
    properties: Properties,
    behavior: Arc<dyn NodeBehavior>,
}

impl Node {
    /// Create a new node from a type definition
    pub fn new(node_type: &NodeType) -> Self {
        Self {
            id: NodeId::new(),
            kind: node_type.id.clone(),
            name: node_type.name.clone(),
            category: node_type.category,
            inputs: node_type.inputs.clone(),
            outputs: node_type.outputs.clone(),
            properties: node_type.properties.clone(),
            behavior: Arc::clone(&node_type.behavior),
        }
    }

    /// Unique instance ID
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Kind tag of the node type
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Category of the node type
    pub fn category(&self) -> NodeCategory {
        self.category
    }

    /// Input sockets
    pub fn inputs(&self) -> &[InputSocket] {
        &self.inputs
    }

    /// Output sockets
    pub fn outputs(&self) -> &[OutputSocket] {
        &self.outputs
    }

    /// Get an input socket by index
    pub fn input(&self, index: usize) -> Option<&InputSocket> {
        self.inputs.get(index)
    }

    /// Get an output socket by index
    pub fn output(&self, index: usize) -> Option<&OutputSocket> {
        self.outputs.get(index)
    }

    /// Properties
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Current value of a property
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// Set a property value
    pub fn set_property(&mut self, name: &str, value: PropertyValue) -> Result<(), PropertyError> {
        self.properties.set(name, value)
    }

    /// Builder-style property setter
    pub fn with_property(mut self, name: &str, value: PropertyValue) -> Result<Self, PropertyError> {
        self.set_property(name, value)?;
        Ok(self)
    }

    /// Choices for a property: fixed enum choices, else catalog-driven ones
    pub fn property_options(&self, name: &str, catalog: &dyn ResourceCatalog) -> Option<Vec<String>> {
        self.properties
            .property(name)
            .and_then(|p| p.choices.clone())
            .or_else(|| self.behavior.property_options(name, catalog))
    }

    pub(crate) fn behavior(&self) -> &dyn NodeBehavior {
        self.behavior.as_ref()
    }

    pub(crate) fn input_mut(&mut self, index: usize) -> Option<&mut InputSocket> {
        self.inputs.get_mut(index)
    }

    pub(crate) fn outputs_mut(&mut self) -> &mut [OutputSocket] {
        &mut self.outputs
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("inputs", &self.inputs)
            .field("outputs", &self.outputs)
            .field("properties", &self.properties)
            .finish_non_exhaustive()
    }
}

/// Registry of available node types
#[derive(Debug, Clone, Default)]
pub struct NodeRegistry {
    /// Registered node types by kind tag
    types: indexmap::IndexMap<String, NodeType>,
}

impl NodeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            types: indexmap::IndexMap::new(),
        }
    }

    /// Register a node type, replacing any type with the same tag
    pub fn register(&mut self, node_type: NodeType) {
        self.types.insert(node_type.id.clone(), node_type);
    }

    /// Get a node type by kind tag
    pub fn get(&self, id: &str) -> Option<&NodeType> {
        self.types.get(id)
    }

    /// Get all registered types
    pub fn types(&self) -> impl Iterator<Item = &NodeType> {
        self.types.values()
    }

    /// Get types by category
    pub fn types_in_category(&self, category: NodeCategory) -> impl Iterator<Item = &NodeType> {
        self.types.values().filter(move |t| t.category == category)
    }

    /// Create a node from a kind tag
    pub fn create_node(&self, type_id: &str) -> Option<Node> {
        self.get(type_id).map(Node::new)
    }
}
