// SPDX-License-Identifier: MIT OR Apache-2.0
//! View of the generation pass handed to a node.

use super::fragment::{ExecutionPhase, Expr};
use super::GenerationError;
use crate::config::GeneratorConfig;
use crate::node::Node;
use crate::property::PropertyValue;
use crate::socket::OutputRef;
use std::collections::HashMap;

/// Generated reference to an output socket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// Variable name or inlinable expression
    pub expr: Expr,
    /// Earliest phase in which the reference is valid
    pub phase: ExecutionPhase,
}

/// Context passed to [`NodeBehavior::generate_code`](crate::NodeBehavior::generate_code)
pub struct CodegenContext<'a> {
    node: &'a Node,
    references: &'a HashMap<OutputRef, Reference>,
    config: &'a GeneratorConfig,
}

impl<'a> CodegenContext<'a> {
    pub(crate) fn new(
        node: &'a Node,
        references: &'a HashMap<OutputRef, Reference>,
        config: &'a GeneratorConfig,
    ) -> Self {
        Self {
            node,
            references,
            config,
        }
    }

    /// The node being generated
    pub fn node(&self) -> &Node {
        self.node
    }

    /// Generator settings
    pub fn config(&self) -> &GeneratorConfig {
        self.config
    }

    /// Current value of a property
    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.node.property(name)
    }

    /// Text of a string or enum property that must not be empty
    pub fn required_str(&self, name: &str) -> Result<&str, GenerationError> {
        match self.node.properties().get_str(name) {
            Some(value) if !value.is_empty() => Ok(value),
            Some(_) => Err(self.error(format!("property `{name}` is empty"))),
            None => Err(self.error(format!("property `{name}` is missing"))),
        }
    }

    /// Value of a number property
    pub fn number(&self, name: &str) -> Result<f64, GenerationError> {
        self.node
            .properties()
            .get_number(name)
            .ok_or_else(|| self.error(format!("property `{name}` is not a number")))
    }

    /// Reference generated for the output driving an input
    pub fn input(&self, index: usize) -> Option<&Expr> {
        let link = self.node.input(index)?.link()?;
        self.references.get(&link).map(|r| &r.expr)
    }

    /// Driving reference, else the socket's default value literal
    pub fn input_or_default(&self, index: usize) -> Result<Expr, GenerationError> {
        if let Some(expr) = self.input(index) {
            return Ok(expr.clone());
        }

        let socket = self.node.input(index).ok_or_else(|| self.missing_input(index))?;
        if socket.is_connected() {
            // Upstream output produced no reference
            return Err(self.missing_input(index));
        }

        socket
            .default_value
            .as_ref()
            .and_then(Expr::literal)
            .ok_or_else(|| self.missing_input(index))
    }

    /// Expression reaching the host scene object
    pub fn scene(&self) -> Expr {
        Expr::primary(format!("this.{}", self.config.scene_field))
    }

    /// Module providing the host runtime symbols
    pub fn runtime_module(&self) -> &str {
        &self.config.runtime_module
    }

    /// Error attributed to this node
    pub fn error(&self, reason: impl Into<String>) -> GenerationError {
        GenerationError::Node {
            node: self.node.id(),
            kind: self.node.kind().to_string(),
            reason: reason.into(),
        }
    }

    fn missing_input(&self, index: usize) -> GenerationError {
        GenerationError::MissingInput {
            node: self.node.id(),
            input: index,
            name: self
                .node
                .input(index)
                .map(|socket| socket.name.clone())
                .unwrap_or_default(),
        }
    }
}
