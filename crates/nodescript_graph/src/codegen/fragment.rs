// SPDX-License-Identifier: MIT OR Apache-2.0
//! Code fragments produced by nodes.
//!
//! Nodes compose [`Expr`] values instead of splicing raw text, so operator
//! precedence and literal escaping are handled in one place.

use crate::socket::Value;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Binding strength of an expression, weakest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precedence {
    /// Assignment, arrow functions, anything that must always be wrapped
    Lowest,
    /// `a ? b : c`
    Conditional,
    /// `||`, `??`
    LogicalOr,
    /// `&&`
    LogicalAnd,
    /// `===`, `!==`
    Equality,
    /// `<`, `>`, `as`
    Relational,
    /// `+`, `-`
    Additive,
    /// `*`, `/`, `%`
    Multiplicative,
    /// `-a`, `!a`
    Unary,
    /// Literals, names, calls, member access
    Primary,
}

/// Binary operators available to node fragments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Rem,
    /// `===`
    Eq,
    /// `!==`
    Ne,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `&&`
    And,
    /// `||`
    Or,
}

impl BinaryOp {
    /// Source text of the operator
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
            Self::Eq => "===",
            Self::Ne => "!==",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::And => "&&",
            Self::Or => "||",
        }
    }

    /// Precedence of the operator
    pub fn precedence(self) -> Precedence {
        match self {
            Self::Add | Self::Sub => Precedence::Additive,
            Self::Mul | Self::Div | Self::Rem => Precedence::Multiplicative,
            Self::Eq | Self::Ne => Precedence::Equality,
            Self::Lt | Self::Gt => Precedence::Relational,
            Self::And => Precedence::LogicalAnd,
            Self::Or => Precedence::LogicalOr,
        }
    }
}

/// An expression with its precedence
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Expr {
    code: String,
    precedence: Precedence,
}

impl Expr {
    /// Create an expression from source text
    pub fn new(code: impl Into<String>, precedence: Precedence) -> Self {
        Self {
            code: code.into(),
            precedence,
        }
    }

    /// Name, literal, call or member access
    pub fn primary(code: impl Into<String>) -> Self {
        Self::new(code, Precedence::Primary)
    }

    /// Source text
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Precedence of the outermost operator
    pub fn precedence(&self) -> Precedence {
        self.precedence
    }

    /// Whether the expression is a single name or literal
    pub fn is_primary(&self) -> bool {
        self.precedence == Precedence::Primary
    }

    /// Source text, wrapped in parentheses if it binds weaker than `min`
    pub fn operand(&self, min: Precedence) -> String {
        if self.precedence < min {
            format!("({})", self.code)
        } else {
            self.code.clone()
        }
    }

    /// `lhs op rhs`, left-associative
    pub fn binary(lhs: &Expr, op: BinaryOp, rhs: &Expr) -> Self {
        let precedence = op.precedence();
        let left = lhs.operand(precedence);
        // The right operand of equal precedence must keep its grouping
        let right = if rhs.precedence <= precedence {
            format!("({})", rhs.code)
        } else {
            rhs.code.clone()
        };
        Self::new(format!("{left} {} {right}", op.symbol()), precedence)
    }

    /// `-operand`
    pub fn negate(operand: &Expr) -> Self {
        let inner = operand.operand(Precedence::Unary);
        // `--` would read as a decrement
        if inner.starts_with('-') {
            Self::new(format!("-({inner})"), Precedence::Unary)
        } else {
            Self::new(format!("-{inner}"), Precedence::Unary)
        }
    }

    /// `callee(args...)`
    pub fn call(callee: &str, args: &[Expr]) -> Self {
        Self::primary(format!("{callee}({})", join_args(args)))
    }

    /// `new Class(args...)`
    pub fn construct(class: &str, args: &[Expr]) -> Self {
        Self::primary(format!("new {class}({})", join_args(args)))
    }

    /// `object.member`
    pub fn member(object: &Expr, member: &str) -> Self {
        Self::primary(format!("{}.{member}", object.operand(Precedence::Primary)))
    }

    /// `expr as Type`
    pub fn cast(expr: &Expr, ty: &str) -> Self {
        Self::new(
            format!("{} as {ty}", expr.operand(Precedence::Relational)),
            Precedence::Relational,
        )
    }

    /// Quoted string literal with escapes
    pub fn string(value: &str) -> Self {
        Self::primary(string_literal(value))
    }

    /// Numeric literal
    pub fn number(value: f64) -> Self {
        if value.is_nan() {
            Self::primary("NaN")
        } else if value.is_infinite() {
            if value > 0.0 {
                Self::primary("Infinity")
            } else {
                Self::new("-Infinity", Precedence::Unary)
            }
        } else if value.is_sign_negative() {
            Self::new(format!("{value}"), Precedence::Unary)
        } else {
            Self::primary(format!("{value}"))
        }
    }

    /// `true` / `false`
    pub fn boolean(value: bool) -> Self {
        Self::primary(if value { "true" } else { "false" })
    }

    /// `null`
    pub fn null() -> Self {
        Self::primary("null")
    }

    /// Literal for a preview value; resources have no literal form
    pub fn literal(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(Self::null()),
            Value::Bool(v) => Some(Self::boolean(*v)),
            Value::Number(v) => Some(Self::number(*v)),
            Value::Vector3([x, y, z]) => Some(Self::construct(
                "Vector3",
                &[Self::number(*x), Self::number(*y), Self::number(*z)],
            )),
            Value::String(v) => Some(Self::string(v)),
            Value::Resource(_) => None,
        }
    }
}

fn join_args(args: &[Expr]) -> String {
    args.iter()
        .map(|arg| arg.operand(Precedence::Conditional))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Escape a string into a double-quoted literal
pub fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' | '\u{2029}' => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// When generated code runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ExecutionPhase {
    /// Once, while the script's properties are initialized
    Setup,
    /// Each time the script's entry method runs
    Runtime,
}

/// The reusable part of a node's code
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// Value expression inlined wherever it is used
    Expression(Expr),
    /// Named variable declared once and referenced by name
    Variable {
        /// Variable name
        name: String,
        /// Initializer
        value: Expr,
    },
    /// Side-effect statement with no reusable value
    Statement(String),
}

/// Code each output socket resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputCode {
    /// This node's own variable or expression
    Forward,
    /// Explicit expression, e.g. an upstream reference passed through
    Expr(Expr),
}

/// External module symbols a program needs
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Requirement {
    /// Module specifier
    pub module: String,
    /// Imported symbols
    pub symbols: Vec<String>,
}

impl Requirement {
    /// Create a new requirement
    pub fn new<S: Into<String>>(module: impl Into<String>, symbols: impl IntoIterator<Item = S>) -> Self {
        Self {
            module: module.into(),
            symbols: symbols.into_iter().map(Into::into).collect(),
        }
    }
}

/// Everything a node contributes to a generated program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeGenerationOutput {
    /// Declared code
    pub fragment: Fragment,
    /// When the code runs
    pub phase: ExecutionPhase,
    /// Code of each output socket, by index
    pub outputs: Vec<OutputCode>,
    /// Imports needed by the fragment
    pub requires: Vec<Requirement>,
}

impl CodeGenerationOutput {
    /// Inline expression forwarded through the first output
    pub fn expression(expr: Expr) -> Self {
        Self {
            fragment: Fragment::Expression(expr),
            phase: ExecutionPhase::Setup,
            outputs: vec![OutputCode::Forward],
            requires: Vec::new(),
        }
    }

    /// Named variable forwarded through the first output
    pub fn variable(name: impl Into<String>, value: Expr) -> Self {
        Self {
            fragment: Fragment::Variable {
                name: name.into(),
                value,
            },
            phase: ExecutionPhase::Runtime,
            outputs: vec![OutputCode::Forward],
            requires: Vec::new(),
        }
    }

    /// Statement with no outputs
    pub fn statement(code: impl Into<String>) -> Self {
        Self {
            fragment: Fragment::Statement(code.into()),
            phase: ExecutionPhase::Runtime,
            outputs: Vec::new(),
            requires: Vec::new(),
        }
    }

    /// Set the execution phase
    pub fn with_phase(mut self, phase: ExecutionPhase) -> Self {
        self.phase = phase;
        self
    }

    /// Set the output codes
    pub fn with_outputs(mut self, outputs: Vec<OutputCode>) -> Self {
        self.outputs = outputs;
        self
    }

    /// Add a module requirement
    pub fn requires<S: Into<String>>(
        mut self,
        module: impl Into<String>,
        symbols: impl IntoIterator<Item = S>,
    ) -> Self {
        self.requires.push(Requirement::new(module, symbols));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(n: &str) -> Expr {
        Expr::primary(n)
    }

    #[test]
    fn test_binary_parenthesizes_weaker_operands() {
        let sum = Expr::binary(&name("a"), BinaryOp::Add, &name("b"));
        let product = Expr::binary(&sum, BinaryOp::Mul, &name("c"));
        assert_eq!(product.code(), "(a + b) * c");

        let product = Expr::binary(&name("c"), BinaryOp::Mul, &sum);
        assert_eq!(product.code(), "c * (a + b)");
    }

    #[test]
    fn test_binary_keeps_right_grouping() {
        let inner = Expr::binary(&name("b"), BinaryOp::Sub, &name("c"));
        assert_eq!(Expr::binary(&name("a"), BinaryOp::Sub, &inner).code(), "a - (b - c)");
        // Left operand of equal precedence needs no parentheses
        assert_eq!(Expr::binary(&inner, BinaryOp::Sub, &name("a")).code(), "b - c - a");
        let product = Expr::binary(&name("a"), BinaryOp::Mul, &name("b"));
        assert_eq!(Expr::binary(&product, BinaryOp::Add, &name("c")).code(), "a * b + c");
    }

    #[test]
    fn test_number_literals() {
        assert_eq!(Expr::number(2.0).code(), "2");
        assert_eq!(Expr::number(0.25).code(), "0.25");
        assert_eq!(Expr::number(f64::NAN).code(), "NaN");
        assert_eq!(Expr::number(f64::INFINITY).code(), "Infinity");

        let negative = Expr::number(-1.5);
        assert_eq!(negative.precedence(), Precedence::Unary);
        assert_eq!(Expr::binary(&name("a"), BinaryOp::Sub, &negative).code(), "a - -1.5");
        assert_eq!(Expr::member(&negative, "toFixed").code(), "(-1.5).toFixed");
    }

    #[test]
    fn test_negation() {
        assert_eq!(Expr::negate(&name("a")).code(), "-a");
        assert_eq!(Expr::negate(&Expr::number(-1.5)).code(), "-(-1.5)");
        assert_eq!(Expr::negate(&Expr::negate(&name("a"))).code(), "-(-a)");
        let sum = Expr::binary(&name("a"), BinaryOp::Add, &name("b"));
        assert_eq!(Expr::negate(&sum).code(), "-(a + b)");
    }

    #[test]
    fn test_string_escaping() {
        assert_eq!(string_literal("brick"), "\"brick\"");
        assert_eq!(string_literal("a\"b"), "\"a\\\"b\"");
        assert_eq!(string_literal("C:\\tex\\brick"), "\"C:\\\\tex\\\\brick\"");
        assert_eq!(string_literal("line\nbreak"), "\"line\\nbreak\"");
        assert_eq!(string_literal("\u{1}"), "\"\\u0001\"");
    }

    #[test]
    fn test_calls_and_casts() {
        let sum = Expr::binary(&name("a"), BinaryOp::Add, &name("b"));
        assert_eq!(Expr::call("Math.sqrt", &[sum.clone()]).code(), "Math.sqrt(a + b)");
        // `as` binds weaker than `+`
        assert_eq!(Expr::cast(&sum, "number").code(), "a + b as number");
        assert_eq!(Expr::cast(&name("x"), "Texture").code(), "x as Texture");
        assert_eq!(
            Expr::literal(&Value::Vector3([1.0, 0.0, -2.0])).map(|e| e.code().to_string()),
            Some("new Vector3(1, 0, -2)".to_string())
        );
    }

    #[test]
    fn test_output_builders() {
        let output = CodeGenerationOutput::variable("tex", Expr::null())
            .with_phase(ExecutionPhase::Setup)
            .requires("@babylonjs/core", ["Texture"]);
        assert_eq!(output.phase, ExecutionPhase::Setup);
        assert_eq!(output.outputs, vec![OutputCode::Forward]);
        assert_eq!(output.requires, vec![Requirement::new("@babylonjs/core", ["Texture"])]);

        let statement = CodeGenerationOutput::statement("console.log(1);");
        assert!(statement.outputs.is_empty());
        assert_eq!(statement.phase, ExecutionPhase::Runtime);
    }
}
