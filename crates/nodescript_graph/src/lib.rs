// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node graph IR for visual scripts.
//!
//! A graph of typed nodes is either executed live to produce preview values
//! or compiled into a standalone TypeScript class that drives a 3D runtime.
//!
//! ## Architecture
//!
//! - Nodes carry ordered input/output sockets and typed properties
//! - Edges live on the inputs they drive and are checked against a type registry
//! - Execution runs nodes in dependency order and commits results atomically
//! - Code generation merges per-node fragments, phases and imports into one program

pub mod types;
pub mod catalog;
pub mod socket;
pub mod property;
pub mod node;
pub mod connection;
pub mod graph;
pub mod evaluation;
pub mod codegen;
pub mod config;
pub mod session;
pub mod nodes;

pub use catalog::{InMemoryCatalog, ResourceCatalog, ResourceDescriptor};
pub use codegen::{CodeGenerationOutput, CodeGenerator, CodegenContext, GeneratedProgram, GenerationError};
pub use config::GeneratorConfig;
pub use connection::Connection;
pub use evaluation::{CancelToken, Diagnostic, ExecuteContext, ExecutionError, Executor, RootInputs};
pub use graph::{ConnectionError, Graph, GraphError, StructuralError};
pub use node::{Node, NodeBehavior, NodeCategory, NodeId, NodeRegistry, NodeType};
pub use property::{Properties, Property, PropertyError, PropertyValue};
pub use session::{EditQueue, GraphEdit, GraphSession};
pub use socket::{InputRef, InputSocket, OutputRef, OutputSocket, Value};
pub use types::{TypeRegistry, TypeSet};
