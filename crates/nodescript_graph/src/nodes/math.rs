// SPDX-License-Identifier: MIT OR Apache-2.0
//! Number constants and arithmetic.

use crate::codegen::{BinaryOp, CodeGenerationOutput, CodegenContext, Expr, GenerationError};
use crate::evaluation::ExecuteContext;
use crate::node::{NodeBehavior, NodeCategory, NodeRegistry, NodeType};
use crate::property::Properties;
use crate::socket::{InputSocket, OutputSocket, Value};
use crate::types::kinds;
use std::sync::Arc;

/// Kind tag of the number constant
pub const NUMBER: &str = "Number";

/// Register the math nodes
pub fn register(registry: &mut NodeRegistry) {
    registry.register(NodeType {
        id: NUMBER.to_string(),
        name: "Number".to_string(),
        category: NodeCategory::Input,
        description: "Constant number".to_string(),
        inputs: vec![],
        outputs: vec![OutputSocket::new("Value", kinds::NUMBER)],
        properties: Properties::new().with_number("value", 0.0),
        behavior: Arc::new(NumberNode),
    });

    for (id, description, op, default_b) in [
        ("Add", "Sum of two numbers", BinaryOp::Add, 0.0),
        ("Subtract", "Difference of two numbers", BinaryOp::Sub, 0.0),
        ("Multiply", "Product of two numbers", BinaryOp::Mul, 1.0),
        ("Divide", "Quotient of two numbers", BinaryOp::Div, 1.0),
    ] {
        registry.register(NodeType {
            id: id.to_string(),
            name: id.to_string(),
            category: NodeCategory::Math,
            description: description.to_string(),
            inputs: vec![
                InputSocket::new("A", kinds::NUMBER).with_default(Value::Number(0.0)),
                InputSocket::new("B", kinds::NUMBER).with_default(Value::Number(default_b)),
            ],
            outputs: vec![OutputSocket::new("Result", kinds::NUMBER)],
            properties: Properties::new(),
            behavior: Arc::new(BinaryMathNode { op }),
        });
    }
}

struct NumberNode;

impl NodeBehavior for NumberNode {
    fn execute(&self, cx: &mut ExecuteContext<'_>) {
        let value = cx.property_number("value").map_or(Value::Null, Value::Number);
        cx.set_output(0, value);
    }

    fn generate_code(&self, cx: &CodegenContext<'_>) -> Result<CodeGenerationOutput, GenerationError> {
        Ok(CodeGenerationOutput::expression(Expr::number(cx.number("value")?)))
    }
}

struct BinaryMathNode {
    op: BinaryOp,
}

impl NodeBehavior for BinaryMathNode {
    fn execute(&self, cx: &mut ExecuteContext<'_>) {
        let result = match (cx.input(0).as_number(), cx.input(1).as_number()) {
            (Some(a), Some(b)) => Value::Number(match self.op {
                BinaryOp::Add => a + b,
                BinaryOp::Sub => a - b,
                BinaryOp::Mul => a * b,
                BinaryOp::Div => a / b,
                _ => a % b,
            }),
            _ => Value::Null,
        };
        cx.set_output(0, result);
    }

    fn generate_code(&self, cx: &CodegenContext<'_>) -> Result<CodeGenerationOutput, GenerationError> {
        let a = cx.input_or_default(0)?;
        let b = cx.input_or_default(1)?;
        Ok(CodeGenerationOutput::expression(Expr::binary(&a, self.op, &b)))
    }
}
