// SPDX-License-Identifier: MIT OR Apache-2.0
//! Named variables.

use crate::codegen::{CodeGenerationOutput, CodegenContext, ExecutionPhase, GenerationError};
use crate::evaluation::ExecuteContext;
use crate::node::{NodeBehavior, NodeCategory, NodeRegistry, NodeType};
use crate::property::Properties;
use crate::socket::{InputSocket, OutputSocket};
use crate::types::ANY;
use std::sync::Arc;

/// Kind tag of the variable node
pub const VARIABLE: &str = "Variable";

/// Register the variable node
pub fn register(registry: &mut NodeRegistry) {
    registry.register(NodeType {
        id: VARIABLE.to_string(),
        name: "Variable".to_string(),
        category: NodeCategory::Utility,
        description: "Store a value under a name".to_string(),
        inputs: vec![InputSocket::new("Value", ANY)],
        outputs: vec![OutputSocket::new("Value", ANY)],
        properties: Properties::new()
            .with_string("var_name", "myVariable")
            .with_bool("setup", false),
        behavior: Arc::new(VariableNode),
    });
}

struct VariableNode;

impl NodeBehavior for VariableNode {
    fn execute(&self, cx: &mut ExecuteContext<'_>) {
        let value = cx.input(0).clone();
        cx.set_output(0, value);
    }

    fn generate_code(&self, cx: &CodegenContext<'_>) -> Result<CodeGenerationOutput, GenerationError> {
        let name = cx.required_str("var_name")?;
        let value = cx.input_or_default(0)?;
        let phase = if cx.node().properties().get_bool("setup").unwrap_or(false) {
            ExecutionPhase::Setup
        } else {
            ExecutionPhase::Runtime
        };
        Ok(CodeGenerationOutput::variable(name, value).with_phase(phase))
    }
}
