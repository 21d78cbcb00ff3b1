// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editing session around a graph.
//!
//! The authoring layer queues edits from any thread. A session drains the
//! queue only between passes, so an execution or generation pass always sees
//! one consistent graph.

use crate::catalog::ResourceCatalog;
use crate::codegen::{CodeGenerator, GeneratedProgram, GenerationError};
use crate::connection::Connection;
use crate::evaluation::{CancelToken, ExecutionError, Executor, PassReport, RootInputs};
use crate::graph::{ConnectionError, Graph, GraphError};
use crate::node::{Node, NodeId};
use crate::property::PropertyValue;
use crate::socket::{InputRef, OutputRef};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// A change requested by the authoring layer
#[derive(Debug, Clone)]
pub enum GraphEdit {
    /// Insert a node
    AddNode(Node),
    /// Remove a node and its edges
    RemoveNode(NodeId),
    /// Drive an input from an output
    Connect {
        /// Driving output
        from: OutputRef,
        /// Driven input
        to: InputRef,
    },
    /// Clear the link of an input
    Disconnect(InputRef),
    /// Change a property value
    SetProperty {
        /// Edited node
        node: NodeId,
        /// Property name
        name: String,
        /// New value
        value: PropertyValue,
    },
}

/// Error applying an edit
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditError {
    /// Node-level edit failed
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// Connection refused
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// Nothing to remove or disconnect
    #[error("Nothing to apply: {0}")]
    NoEffect(String),
}

/// A queued edit that failed when it was applied
#[derive(Debug, Clone)]
pub struct RejectedEdit {
    /// The edit as queued
    pub edit: GraphEdit,
    /// Why it failed
    pub error: EditError,
}

/// Thread-safe queue of pending edits
#[derive(Debug, Clone, Default)]
pub struct EditQueue {
    pending: Arc<Mutex<VecDeque<GraphEdit>>>,
}

impl EditQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an edit
    pub fn push(&self, edit: GraphEdit) {
        self.pending.lock().push_back(edit);
    }

    /// Number of pending edits
    pub fn len(&self) -> usize {
        self.pending.lock().len()
    }

    /// Whether no edits are pending
    pub fn is_empty(&self) -> bool {
        self.pending.lock().is_empty()
    }

    fn drain(&self) -> Vec<GraphEdit> {
        self.pending.lock().drain(..).collect()
    }
}

/// A graph together with the catalog and generator that serve it
pub struct GraphSession<C: ResourceCatalog> {
    graph: Graph,
    catalog: C,
    generator: CodeGenerator,
    queue: EditQueue,
    cancel: CancelToken,
    rejected: Vec<RejectedEdit>,
}

impl<C: ResourceCatalog> GraphSession<C> {
    /// Create a session
    pub fn new(graph: Graph, catalog: C, generator: CodeGenerator) -> Self {
        Self {
            graph,
            catalog,
            generator,
            queue: EditQueue::new(),
            cancel: CancelToken::new(),
            rejected: Vec::new(),
        }
    }

    /// The graph
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// The resource catalog
    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Mutable catalog, e.g. after the host scene loaded new assets
    pub fn catalog_mut(&mut self) -> &mut C {
        &mut self.catalog
    }

    /// Handle for queueing edits from other threads
    pub fn edit_queue(&self) -> EditQueue {
        self.queue.clone()
    }

    /// Handle for cancelling the running pass from other threads
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Apply an edit immediately
    pub fn apply(&mut self, edit: GraphEdit) -> Result<(), EditError> {
        match edit {
            GraphEdit::AddNode(node) => {
                self.graph.add_node(node)?;
            }
            GraphEdit::RemoveNode(id) => {
                self.graph
                    .remove_node(id)
                    .ok_or(GraphError::NodeNotFound(id))?;
            }
            GraphEdit::Connect { from, to } => {
                self.graph.connect(from, to)?;
            }
            GraphEdit::Disconnect(input) => {
                self.graph
                    .disconnect(input)
                    .ok_or_else(|| EditError::NoEffect(format!("input {input:?} is not connected")))?;
            }
            GraphEdit::SetProperty { node, name, value } => {
                self.graph.set_property(node, &name, value)?;
            }
        }
        Ok(())
    }

    /// Apply every queued edit in order; returns how many succeeded
    pub fn apply_pending(&mut self) -> usize {
        let mut applied = 0;
        for edit in self.queue.drain() {
            match self.apply(edit.clone()) {
                Ok(()) => applied += 1,
                Err(error) => {
                    tracing::warn!(graph = %self.graph.name, %error, "rejected queued edit");
                    self.rejected.push(RejectedEdit { edit, error });
                }
            }
        }
        applied
    }

    /// Take the edits rejected since the last call
    pub fn take_rejected_edits(&mut self) -> Vec<RejectedEdit> {
        std::mem::take(&mut self.rejected)
    }

    /// Apply pending edits, then run an execution pass
    pub fn execute(&mut self, roots: RootInputs) -> Result<PassReport, ExecutionError> {
        self.apply_pending();
        self.cancel.reset();
        Executor::new(&self.catalog).execute_with_cancel(&mut self.graph, roots, &self.cancel)
    }

    /// Apply pending edits, then generate the program
    pub fn generate(&mut self) -> Result<GeneratedProgram, GenerationError> {
        self.apply_pending();
        self.cancel.reset();
        self.generator.generate_with_cancel(&self.graph, &self.cancel)
    }

    /// Connections currently in the graph
    pub fn connections(&self) -> Vec<Connection> {
        self.graph.connections().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{InMemoryCatalog, ResourceDescriptor};
    use crate::nodes::create_standard_registry;
    use crate::socket::Value;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn session() -> GraphSession<InMemoryCatalog> {
        let catalog = InMemoryCatalog::new()
            .with(ResourceDescriptor::new("brick", "Texture", "textures/brick.png"))
            .with(ResourceDescriptor::new("grass", "Texture", "textures/grass.png"));
        GraphSession::new(Graph::new("session"), catalog, CodeGenerator::default())
    }

    fn texture_node(name: &str) -> Node {
        create_standard_registry()
            .create_node("Texture")
            .unwrap()
            .with_property("name", PropertyValue::String(name.to_string()))
            .unwrap()
    }

    #[test]
    fn test_queued_edits_apply_before_pass() {
        init_tracing();
        let mut session = session();
        let node = texture_node("brick");
        let id = node.id();

        let queue = session.edit_queue();
        std::thread::spawn(move || queue.push(GraphEdit::AddNode(node)))
            .join()
            .unwrap();
        assert_eq!(session.graph().node_count(), 0);

        session.execute(RootInputs::new()).unwrap();
        let value = session.graph().node(id).unwrap().output(0).unwrap().value().clone();
        assert!(matches!(value, Value::Resource(r) if r.name == "brick"));
        assert!(session.edit_queue().is_empty());
    }

    #[test]
    fn test_failed_edits_are_reported() {
        init_tracing();
        let mut session = session();
        let registry = create_standard_registry();
        let number = registry.create_node("Number").unwrap();
        let texture = texture_node("brick");
        let level = registry.create_node("Texture Level").unwrap();
        let (number_id, texture_id, level_id) = (number.id(), texture.id(), level.id());

        let queue = session.edit_queue();
        queue.push(GraphEdit::AddNode(number));
        queue.push(GraphEdit::AddNode(texture));
        queue.push(GraphEdit::AddNode(level));
        // Number cannot drive a texture input
        queue.push(GraphEdit::Connect {
            from: OutputRef::new(number_id, 0),
            to: InputRef::new(level_id, 0),
        });
        queue.push(GraphEdit::Connect {
            from: OutputRef::new(texture_id, 0),
            to: InputRef::new(level_id, 0),
        });
        queue.push(GraphEdit::RemoveNode(NodeId::new()));

        assert_eq!(session.apply_pending(), 4);
        let rejected = session.take_rejected_edits();
        assert_eq!(rejected.len(), 2);
        assert!(matches!(
            rejected[0].error,
            EditError::Connection(ConnectionError::IncompatibleTypes { .. })
        ));
        assert!(matches!(rejected[1].error, EditError::Graph(GraphError::NodeNotFound(_))));
        assert!(session.take_rejected_edits().is_empty());
        assert_eq!(session.connections().len(), 1);
    }

    #[test]
    fn test_property_edit_changes_only_literal() {
        init_tracing();
        let mut session = session();
        let node = texture_node("brick")
            .with_property("var_name", PropertyValue::String("tex".to_string()))
            .unwrap();
        let id = node.id();
        session.apply(GraphEdit::AddNode(node)).unwrap();

        let brick = session.generate().unwrap();
        session.edit_queue().push(GraphEdit::SetProperty {
            node: id,
            name: "name".to_string(),
            value: PropertyValue::String("grass".to_string()),
        });
        let grass = session.generate().unwrap();

        assert_ne!(brick.code, grass.code);
        assert_eq!(brick.code.replace("\"brick\"", "\"grass\""), grass.code);
        assert_eq!(brick.imports, grass.imports);
    }

    #[test]
    fn test_disconnect_without_link_has_no_effect() {
        let mut session = session();
        let node = create_standard_registry().create_node("Add").unwrap();
        let id = node.id();
        session.apply(GraphEdit::AddNode(node)).unwrap();

        let err = session.apply(GraphEdit::Disconnect(InputRef::new(id, 0))).unwrap_err();
        assert!(matches!(err, EditError::NoEffect(_)));
    }
}
