// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph execution.
//!
//! A pass runs every node once in evaluation order and keeps its results in
//! scratch storage. Output sockets only change when a finished pass is
//! committed, so a cancelled or abandoned pass leaves the graph untouched.

use crate::catalog::{ResourceCatalog, ResourceDescriptor};
use crate::graph::{Graph, StructuralError};
use crate::node::{Node, NodeId};
use crate::property::PropertyValue;
use crate::socket::{InputRef, InputSocket, OutputRef, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

static NULL: Value = Value::Null;

/// Shared flag used to stop a running pass between nodes
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create a token that is not cancelled
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation was requested
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Clear a previous request
    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Values for unconnected inputs supplied by the host
#[derive(Debug, Clone, Default)]
pub struct RootInputs {
    values: HashMap<InputRef, Value>,
}

impl RootInputs {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the value of an input
    pub fn set(&mut self, input: InputRef, value: Value) {
        self.values.insert(input, value);
    }

    /// Builder form of [`RootInputs::set`]
    pub fn with(mut self, input: InputRef, value: Value) -> Self {
        self.set(input, value);
        self
    }

    /// Value supplied for an input
    pub fn get(&self, input: InputRef) -> Option<&Value> {
        self.values.get(&input)
    }
}

/// Something worth reporting that did not stop the pass
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A node looked up a resource the catalog does not have
    ResourceNotFound {
        /// Reporting node
        node: NodeId,
        /// Requested name
        name: String,
        /// Requested kind
        kind: String,
    },
    /// Message written by a log node
    Log {
        /// Reporting node
        node: NodeId,
        /// Console level
        level: String,
        /// Message text
        message: String,
    },
}

impl Diagnostic {
    /// Node that reported the diagnostic
    pub fn node(&self) -> NodeId {
        match self {
            Self::ResourceNotFound { node, .. } | Self::Log { node, .. } => *node,
        }
    }
}

/// Result of executing a node
#[derive(Debug, Clone, Default)]
pub struct NodeOutput {
    /// Output values by socket index
    pub values: Vec<Value>,
}

impl NodeOutput {
    /// Get an output value
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }
}

/// Context passed to [`NodeBehavior::execute`](crate::NodeBehavior::execute)
pub struct ExecuteContext<'a> {
    node: &'a Node,
    inputs: Vec<Value>,
    outputs: Vec<Value>,
    catalog: &'a dyn ResourceCatalog,
    diagnostics: &'a mut Vec<Diagnostic>,
}

impl<'a> ExecuteContext<'a> {
    /// The node being executed
    pub fn node(&self) -> &Node {
        self.node
    }

    /// Current value of a property
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.node.property(name)
    }

    /// Text of a string or enum property, empty if absent
    pub fn property_str(&self, name: &str) -> &str {
        self.node.properties().get_str(name).unwrap_or_default()
    }

    /// Value of a number property
    pub fn property_number(&self, name: &str) -> Option<f64> {
        self.node.properties().get_number(name)
    }

    /// Value of a boolean property
    pub fn property_bool(&self, name: &str) -> Option<bool> {
        self.node.properties().get_bool(name)
    }

    /// Resolved value of an input; `Null` past the last socket
    pub fn input(&self, index: usize) -> &Value {
        self.inputs.get(index).unwrap_or(&NULL)
    }

    /// Write an output value
    pub fn set_output(&mut self, index: usize, value: Value) {
        match self.outputs.get_mut(index) {
            Some(slot) => *slot = value,
            None => tracing::debug!(node = ?self.node.id(), index, "ignoring write to missing output"),
        }
    }

    /// Resources available to the pass
    pub fn catalog(&self) -> &dyn ResourceCatalog {
        self.catalog
    }

    /// Look up a resource of a kind, recording a diagnostic when it is absent
    pub fn lookup_resource(&mut self, name: &str, kind: &str) -> Option<ResourceDescriptor> {
        if let Some(resource) = self.catalog.lookup(name).filter(|r| r.kind == kind) {
            return Some(resource.clone());
        }

        tracing::warn!(node = ?self.node.id(), name, kind, "resource not found");
        self.diagnostics.push(Diagnostic::ResourceNotFound {
            node: self.node.id(),
            name: name.to_string(),
            kind: kind.to_string(),
        });
        None
    }

    /// Record a message from the graph
    pub fn log(&mut self, level: &str, message: String) {
        tracing::info!(node = ?self.node.id(), level, "{message}");
        self.diagnostics.push(Diagnostic::Log {
            node: self.node.id(),
            level: level.to_string(),
            message,
        });
    }
}

/// An execution pass that can be advanced one node at a time
#[derive(Debug)]
pub struct ExecutionPass {
    order: Vec<NodeId>,
    cursor: usize,
    outputs: HashMap<NodeId, NodeOutput>,
    diagnostics: Vec<Diagnostic>,
    roots: RootInputs,
}

impl ExecutionPass {
    /// Prepare a pass over every node
    pub fn new(graph: &Graph, roots: RootInputs) -> Result<Self, ExecutionError> {
        graph.validate()?;
        Ok(Self::with_order(graph.evaluation_order()?, roots))
    }

    /// Prepare a pass over `targets` and everything upstream of them
    pub fn for_targets(graph: &Graph, targets: &[NodeId], roots: RootInputs) -> Result<Self, ExecutionError> {
        graph.validate()?;
        Ok(Self::with_order(graph.evaluation_order_from(targets)?, roots))
    }

    fn with_order(order: Vec<NodeId>, roots: RootInputs) -> Self {
        Self {
            order,
            cursor: 0,
            outputs: HashMap::new(),
            diagnostics: Vec::new(),
            roots,
        }
    }

    /// Nodes this pass runs, in order
    pub fn order(&self) -> &[NodeId] {
        &self.order
    }

    /// Nodes not yet run
    pub fn remaining(&self) -> usize {
        self.order.len() - self.cursor
    }

    /// Whether every node has run
    pub fn is_finished(&self) -> bool {
        self.cursor >= self.order.len()
    }

    /// Run the next node, returning its ID, or `None` once finished
    pub fn step(&mut self, graph: &Graph, catalog: &dyn ResourceCatalog) -> Result<Option<NodeId>, ExecutionError> {
        let Some(&node_id) = self.order.get(self.cursor) else {
            return Ok(None);
        };
        let node = graph.node(node_id).ok_or(ExecutionError::NodeNotFound(node_id))?;

        let inputs = node
            .inputs()
            .iter()
            .enumerate()
            .map(|(index, socket)| self.resolve_input(InputRef::new(node_id, index), socket))
            .collect::<Result<Vec<_>, _>>()?;

        let mut cx = ExecuteContext {
            node,
            inputs,
            outputs: vec![Value::Null; node.outputs().len()],
            catalog,
            diagnostics: &mut self.diagnostics,
        };
        node.behavior().execute(&mut cx);
        let values = cx.outputs;

        tracing::trace!(node = ?node_id, kind = node.kind(), "executed");
        self.outputs.insert(node_id, NodeOutput { values });
        self.cursor += 1;
        Ok(Some(node_id))
    }

    /// Run every remaining node
    pub fn run(&mut self, graph: &Graph, catalog: &dyn ResourceCatalog) -> Result<(), ExecutionError> {
        while self.step(graph, catalog)?.is_some() {}
        Ok(())
    }

    /// Run every remaining node, checking for cancellation before each one
    pub fn run_with_cancel(
        &mut self,
        graph: &Graph,
        catalog: &dyn ResourceCatalog,
        cancel: &CancelToken,
    ) -> Result<(), ExecutionError> {
        while !self.is_finished() {
            if cancel.is_cancelled() {
                tracing::debug!(remaining = self.remaining(), "execution pass cancelled");
                return Err(ExecutionError::Cancelled);
            }
            self.step(graph, catalog)?;
        }
        Ok(())
    }

    /// Close a finished pass
    pub fn finish(self) -> Result<PassResult, ExecutionError> {
        if !self.is_finished() {
            return Err(ExecutionError::Incomplete {
                remaining: self.remaining(),
            });
        }
        Ok(PassResult {
            order: self.order,
            outputs: self.outputs,
            diagnostics: self.diagnostics,
        })
    }

    fn resolve_input(&self, input: InputRef, socket: &InputSocket) -> Result<Value, ExecutionError> {
        if let Some(link) = socket.link() {
            return self
                .outputs
                .get(&link.node)
                .and_then(|output| output.get(link.index))
                .cloned()
                .ok_or(ExecutionError::UnresolvedInput(input));
        }

        Ok(self
            .roots
            .get(input)
            .or(socket.default_value.as_ref())
            .cloned()
            .unwrap_or_default())
    }
}

/// Outputs of a finished pass, not yet visible on the graph
#[derive(Debug, Clone)]
pub struct PassResult {
    order: Vec<NodeId>,
    outputs: HashMap<NodeId, NodeOutput>,
    diagnostics: Vec<Diagnostic>,
}

impl PassResult {
    /// Value produced on an output
    pub fn value(&self, output: OutputRef) -> Option<&Value> {
        self.outputs.get(&output.node)?.get(output.index)
    }

    /// Nodes run, in order
    pub fn order(&self) -> &[NodeId] {
        &self.order
    }

    /// Diagnostics recorded during the pass
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Write the outputs onto the graph's sockets.
    ///
    /// Nodes the pass did not run are reset to `Null`.
    pub fn commit(mut self, graph: &mut Graph) -> PassReport {
        for node in graph.nodes_mut() {
            let mut values = self.outputs.remove(&node.id()).map(|o| o.values).unwrap_or_default();
            values.resize(node.outputs().len(), Value::Null);
            for (socket, value) in node.outputs_mut().iter_mut().zip(values) {
                socket.set_value(value);
            }
        }

        PassReport {
            order: self.order,
            diagnostics: self.diagnostics,
        }
    }
}

/// Summary of a committed pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PassReport {
    /// Nodes run, in order
    pub order: Vec<NodeId>,
    /// Diagnostics recorded during the pass
    pub diagnostics: Vec<Diagnostic>,
}

/// Runs whole passes against a resource catalog
pub struct Executor<'c> {
    catalog: &'c dyn ResourceCatalog,
}

impl<'c> Executor<'c> {
    /// Create an executor reading from `catalog`
    pub fn new(catalog: &'c dyn ResourceCatalog) -> Self {
        Self { catalog }
    }

    /// Run every node and commit the outputs
    pub fn execute(&self, graph: &mut Graph, roots: RootInputs) -> Result<PassReport, ExecutionError> {
        self.execute_with_cancel(graph, roots, &CancelToken::new())
    }

    /// Run every node unless cancelled; a cancelled pass commits nothing
    pub fn execute_with_cancel(
        &self,
        graph: &mut Graph,
        roots: RootInputs,
        cancel: &CancelToken,
    ) -> Result<PassReport, ExecutionError> {
        let pass = ExecutionPass::new(graph, roots)?;
        self.complete(graph, pass, cancel)
    }

    /// Run `targets` and their upstream nodes; other outputs reset to `Null`
    pub fn execute_targets(
        &self,
        graph: &mut Graph,
        targets: &[NodeId],
        roots: RootInputs,
    ) -> Result<PassReport, ExecutionError> {
        let pass = ExecutionPass::for_targets(graph, targets, roots)?;
        self.complete(graph, pass, &CancelToken::new())
    }

    fn complete(
        &self,
        graph: &mut Graph,
        mut pass: ExecutionPass,
        cancel: &CancelToken,
    ) -> Result<PassReport, ExecutionError> {
        tracing::debug!(graph = %graph.name, nodes = pass.order().len(), "execution pass started");
        pass.run_with_cancel(graph, self.catalog, cancel)?;
        let report = pass.finish()?.commit(graph);
        tracing::debug!(
            graph = %graph.name,
            diagnostics = report.diagnostics.len(),
            "execution pass committed"
        );
        Ok(report)
    }
}

/// Error during execution
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExecutionError {
    /// Graph failed validation
    #[error("Graph is not executable: {0}")]
    NotExecutable(#[from] StructuralError),

    /// Node not found
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Input read before the node driving it ran
    #[error("Input {0:?} was read before its driver ran")]
    UnresolvedInput(InputRef),

    /// Pass was cancelled
    #[error("Execution pass cancelled")]
    Cancelled,

    /// Pass closed before every node ran
    #[error("Execution pass closed with {remaining} nodes left")]
    Incomplete {
        /// Nodes not yet run
        remaining: usize,
    },
}
