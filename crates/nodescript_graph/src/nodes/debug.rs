// SPDX-License-Identifier: MIT OR Apache-2.0
//! Console output.

use crate::codegen::{CodeGenerationOutput, CodegenContext, Expr, GenerationError};
use crate::evaluation::ExecuteContext;
use crate::node::{NodeBehavior, NodeCategory, NodeRegistry, NodeType};
use crate::property::{Properties, Property};
use crate::socket::InputSocket;
use crate::types::ANY;
use std::sync::Arc;

/// Kind tag of the log node
pub const LOG: &str = "Log";

/// Console methods selectable on the log node
pub const LOG_LEVELS: [&str; 3] = ["log", "warn", "error"];

/// Register the debug nodes
pub fn register(registry: &mut NodeRegistry) {
    registry.register(NodeType {
        id: LOG.to_string(),
        name: "Log".to_string(),
        category: NodeCategory::Output,
        description: "Write a value to the console".to_string(),
        inputs: vec![InputSocket::new("Message", ANY)],
        outputs: vec![],
        properties: Properties::new().with("level", Property::choice("log", &LOG_LEVELS)),
        behavior: Arc::new(LogNode),
    });
}

struct LogNode;

impl NodeBehavior for LogNode {
    fn execute(&self, cx: &mut ExecuteContext<'_>) {
        let level = cx.property_str("level").to_string();
        let message = cx.input(0).to_string();
        cx.log(&level, message);
    }

    fn generate_code(&self, cx: &CodegenContext<'_>) -> Result<CodeGenerationOutput, GenerationError> {
        let level = cx.required_str("level")?;
        let message = cx.input_or_default(0)?;
        let call = Expr::call(&format!("console.{level}"), &[message]);
        Ok(CodeGenerationOutput::statement(format!("{};", call.code())))
    }
}
