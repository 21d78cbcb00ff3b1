// SPDX-License-Identifier: MIT OR Apache-2.0
//! Vector construction.

use crate::codegen::{CodeGenerationOutput, CodegenContext, Expr, GenerationError};
use crate::evaluation::ExecuteContext;
use crate::node::{NodeBehavior, NodeCategory, NodeRegistry, NodeType};
use crate::property::Properties;
use crate::socket::{InputSocket, OutputSocket, Value};
use crate::types::kinds;
use std::sync::Arc;

/// Kind tag of the vector constructor
pub const VECTOR3: &str = "Vector3";

/// Register the vector nodes
pub fn register(registry: &mut NodeRegistry) {
    registry.register(NodeType {
        id: VECTOR3.to_string(),
        name: "Vector3".to_string(),
        category: NodeCategory::Math,
        description: "Vector from three numbers".to_string(),
        inputs: ["X", "Y", "Z"]
            .into_iter()
            .map(|axis| InputSocket::new(axis, kinds::NUMBER).with_default(Value::Number(0.0)))
            .collect(),
        outputs: vec![OutputSocket::new("Vector", kinds::VECTOR3)],
        properties: Properties::new(),
        behavior: Arc::new(Vector3Node),
    });
}

struct Vector3Node;

impl NodeBehavior for Vector3Node {
    fn execute(&self, cx: &mut ExecuteContext<'_>) {
        let vector = match (cx.input(0).as_number(), cx.input(1).as_number(), cx.input(2).as_number()) {
            (Some(x), Some(y), Some(z)) => Value::Vector3([x, y, z]),
            _ => Value::Null,
        };
        cx.set_output(0, vector);
    }

    fn generate_code(&self, cx: &CodegenContext<'_>) -> Result<CodeGenerationOutput, GenerationError> {
        let args = [cx.input_or_default(0)?, cx.input_or_default(1)?, cx.input_or_default(2)?];
        Ok(CodeGenerationOutput::expression(Expr::construct("Vector3", &args))
            .requires(cx.runtime_module(), ["Vector3"]))
    }
}
