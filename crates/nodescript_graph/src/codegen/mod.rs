// SPDX-License-Identifier: MIT OR Apache-2.0
//! Code generation.
//!
//! Walks a validated graph in evaluation order, asks each node for its
//! fragment and assembles the fragments into one TypeScript class. Values
//! produced during setup become class fields; runtime values become locals
//! of the entry method.

pub mod assemble;
pub mod context;
pub mod fragment;

pub use assemble::ImportSet;
pub use context::{CodegenContext, Reference};
pub use fragment::{
    string_literal, BinaryOp, CodeGenerationOutput, ExecutionPhase, Expr, Fragment, OutputCode, Precedence,
    Requirement,
};

use crate::config::GeneratorConfig;
use crate::evaluation::CancelToken;
use crate::graph::{Graph, StructuralError};
use crate::node::NodeId;
use crate::socket::OutputRef;
use assemble::ProgramWriter;
use std::collections::HashMap;

/// Words that cannot name a variable or class
const RESERVED_WORDS: &[&str] = &[
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete", "do",
    "else", "enum", "export", "extends", "false", "finally", "for", "function", "if", "implements", "import",
    "in", "instanceof", "interface", "let", "new", "null", "package", "private", "protected", "public",
    "return", "static", "super", "switch", "this", "throw", "true", "try", "typeof", "var", "void", "while",
    "with", "yield",
];

/// Prefix of generator-owned variable names
const GENERATED_PREFIX: &str = "__";

/// Globals referenced by node code; runtime locals must not shadow them
const RUNTIME_GLOBALS: &[&str] = &["console", "Math", "NaN", "Infinity", "undefined"];

/// Whether `name` can be used as a variable, field or class name
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    let head = first.is_ascii_alphabetic() || first == '_' || first == '$';
    let tail = chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    head && tail && !RESERVED_WORDS.contains(&name)
}

/// Error during code generation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenerationError {
    /// Graph failed validation
    #[error("Graph cannot be compiled: {0}")]
    Structural(#[from] StructuralError),

    /// A node rejected its own configuration
    #[error("Node {node:?} ({kind}) cannot generate code: {reason}")]
    Node {
        /// Failing node
        node: NodeId,
        /// Its kind tag
        kind: String,
        /// What is wrong
        reason: String,
    },

    /// Required input has neither a link nor a default
    #[error("Input {input} ({name}) of node {node:?} has no value")]
    MissingInput {
        /// Failing node
        node: NodeId,
        /// Input index
        input: usize,
        /// Input name
        name: String,
    },

    /// A consumed output has no code
    #[error("Output {output} of node {node:?} has no code")]
    UnresolvedOutput {
        /// Failing node
        node: NodeId,
        /// Output index
        output: usize,
    },

    /// Variable name is not an identifier
    #[error("Node {node:?} declares invalid identifier {name:?}")]
    InvalidIdentifier {
        /// Failing node
        node: NodeId,
        /// Offending name
        name: String,
    },

    /// Variable name collides with a generator-owned name
    #[error("Node {node:?} uses reserved identifier {name:?}")]
    ReservedIdentifier {
        /// Failing node
        node: NodeId,
        /// Offending name
        name: String,
    },

    /// Two nodes declare the same variable
    #[error("Variable {name:?} of node {node:?} is already declared by node {first:?}")]
    DuplicateVariable {
        /// Second declaring node
        node: NodeId,
        /// Variable name
        name: String,
        /// First declaring node
        first: NodeId,
    },

    /// Import with an empty module or a non-identifier symbol
    #[error("Node {node:?} requires invalid import {symbol:?} from {module:?}")]
    InvalidRequirement {
        /// Failing node
        node: NodeId,
        /// Module specifier
        module: String,
        /// Offending symbol
        symbol: String,
    },

    /// Generation was cancelled
    #[error("Code generation cancelled")]
    Cancelled,
}

/// A variable declared in a generated program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Declaring node
    pub node: NodeId,
    /// Variable name
    pub name: String,
    /// Field for setup, local for runtime
    pub phase: ExecutionPhase,
}

/// Output of a successful generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedProgram {
    /// Program text
    pub code: String,
    /// Imports, one per module, sorted
    pub imports: Vec<Requirement>,
    /// Variables in declaration order
    pub variables: Vec<Declaration>,
    /// Nodes in the order their fragments were emitted
    pub order: Vec<NodeId>,
}

/// Names already taken in the program
#[derive(Default)]
struct Scope {
    owners: HashMap<String, Option<NodeId>>,
    generated: HashMap<String, usize>,
}

impl Scope {
    fn new(config: &GeneratorConfig) -> Self {
        let mut scope = Self::default();
        for name in [&config.scene_field, &config.entry_method, &config.class_name] {
            scope.owners.insert(name.clone(), None);
        }
        scope.owners.insert("constructor".to_string(), None);
        scope
    }

    fn declare(&mut self, node: NodeId, name: &str) -> Result<(), GenerationError> {
        if !is_identifier(name) {
            return Err(GenerationError::InvalidIdentifier {
                node,
                name: name.to_string(),
            });
        }
        if name.starts_with(GENERATED_PREFIX) {
            return Err(GenerationError::ReservedIdentifier {
                node,
                name: name.to_string(),
            });
        }
        match self.owners.get(name) {
            Some(Some(first)) => Err(GenerationError::DuplicateVariable {
                node,
                name: name.to_string(),
                first: *first,
            }),
            Some(None) => Err(GenerationError::ReservedIdentifier {
                node,
                name: name.to_string(),
            }),
            None => {
                self.owners.insert(name.to_string(), Some(node));
                Ok(())
            }
        }
    }

    /// Fresh `__<kind><n>` name
    fn temporary(&mut self, kind: &str) -> String {
        let stem: String = kind
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_lowercase())
            .collect();
        let counter = self.generated.entry(stem.clone()).or_default();
        let name = format!("{GENERATED_PREFIX}{stem}{counter}");
        *counter += 1;
        name
    }
}

/// Turns graphs into programs
#[derive(Debug, Clone, Default)]
pub struct CodeGenerator {
    config: GeneratorConfig,
}

impl CodeGenerator {
    /// Create a generator with the given settings
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Generator settings
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate the program for a graph
    pub fn generate(&self, graph: &Graph) -> Result<GeneratedProgram, GenerationError> {
        self.generate_with_cancel(graph, &CancelToken::new())
    }

    /// Generate the program, checking for cancellation before each node
    pub fn generate_with_cancel(
        &self,
        graph: &Graph,
        cancel: &CancelToken,
    ) -> Result<GeneratedProgram, GenerationError> {
        graph.validate()?;
        let order = graph.evaluation_order()?;
        tracing::debug!(graph = %graph.name, nodes = order.len(), "generating code");

        let mut writer = ProgramWriter::new(&self.config);
        let mut references: HashMap<OutputRef, Reference> = HashMap::new();
        let mut scope = Scope::new(&self.config);
        let mut variables = Vec::new();

        let mut consumers: HashMap<OutputRef, usize> = HashMap::new();
        for connection in graph.connections() {
            *consumers.entry(connection.from).or_default() += 1;
        }

        for &node_id in &order {
            if cancel.is_cancelled() {
                tracing::debug!(graph = %graph.name, "code generation cancelled");
                return Err(GenerationError::Cancelled);
            }

            let node = graph.node(node_id).ok_or(StructuralError::MissingNode(node_id))?;
            let output = node
                .behavior()
                .generate_code(&CodegenContext::new(node, &references, &self.config))?;

            // A node cannot run before the values it reads exist
            let upstream = node
                .inputs()
                .iter()
                .filter_map(|input| input.link())
                .filter_map(|link| references.get(&link))
                .map(|reference| reference.phase)
                .max();
            let phase = upstream.map_or(output.phase, |p| p.max(output.phase));
            if phase != output.phase {
                tracing::debug!(node = ?node_id, kind = node.kind(), ?phase, "promoted to a later phase");
            }

            for requirement in &output.requires {
                check_requirement(node_id, requirement)?;
                writer.require(requirement);
            }

            let own = match output.fragment {
                Fragment::Expression(expr) => {
                    let hoist = self.config.hoist_shared_expressions
                        && !expr.is_primary()
                        && forwarded_consumers(&consumers, node_id, &output.outputs) >= 2;
                    if hoist {
                        let name = scope.temporary(node.kind());
                        writer.declare(phase, &name, expr.code());
                        Some(reference_to(phase, &name))
                    } else {
                        Some(expr)
                    }
                }
                Fragment::Variable { name, value } => {
                    scope.declare(node_id, &name)?;
                    writer.declare(phase, &name, value.code());
                    let reference = reference_to(phase, &name);
                    variables.push(Declaration {
                        node: node_id,
                        name,
                        phase,
                    });
                    Some(reference)
                }
                Fragment::Statement(code) => {
                    writer.statement(phase, &code);
                    None
                }
            };

            for index in 0..node.outputs().len() {
                let socket = OutputRef::new(node_id, index);
                let expr = match output.outputs.get(index) {
                    Some(OutputCode::Forward) => own.clone(),
                    Some(OutputCode::Expr(expr)) => Some(expr.clone()),
                    None => None,
                };
                match expr {
                    Some(expr) => {
                        references.insert(socket, Reference { expr, phase });
                    }
                    None if consumers.contains_key(&socket) => {
                        return Err(GenerationError::UnresolvedOutput {
                            node: node_id,
                            output: index,
                        });
                    }
                    None => {}
                }
            }
        }

        let (code, imports) = writer.finish();
        check_shadowing(&variables, &imports)?;
        tracing::debug!(graph = %graph.name, bytes = code.len(), modules = imports.len(), "code generated");

        Ok(GeneratedProgram {
            code,
            imports: imports.requirements(),
            variables,
            order,
        })
    }
}

/// Setup values live on the instance, runtime values are locals
fn reference_to(phase: ExecutionPhase, name: &str) -> Expr {
    match phase {
        ExecutionPhase::Setup => Expr::primary(format!("this.{name}")),
        ExecutionPhase::Runtime => Expr::primary(name),
    }
}

/// Number of inputs reading the node's own fragment
fn forwarded_consumers(consumers: &HashMap<OutputRef, usize>, node: NodeId, outputs: &[OutputCode]) -> usize {
    outputs
        .iter()
        .enumerate()
        .filter(|(_, code)| matches!(code, OutputCode::Forward))
        .filter_map(|(index, _)| consumers.get(&OutputRef::new(node, index)))
        .sum()
}

/// Runtime locals share the entry method with imported symbols and globals
fn check_shadowing(variables: &[Declaration], imports: &ImportSet) -> Result<(), GenerationError> {
    let shadowing = variables
        .iter()
        .filter(|v| v.phase == ExecutionPhase::Runtime)
        .find(|v| RUNTIME_GLOBALS.contains(&v.name.as_str()) || imports.contains_symbol(&v.name));
    match shadowing {
        Some(v) => Err(GenerationError::ReservedIdentifier {
            node: v.node,
            name: v.name.clone(),
        }),
        None => Ok(()),
    }
}

fn check_requirement(node: NodeId, requirement: &Requirement) -> Result<(), GenerationError> {
    let invalid = |symbol: &str| GenerationError::InvalidRequirement {
        node,
        module: requirement.module.clone(),
        symbol: symbol.to_string(),
    };

    if requirement.module.trim().is_empty() {
        return Err(invalid(""));
    }
    match requirement.symbols.iter().find(|s| !is_identifier(s)) {
        Some(symbol) => Err(invalid(symbol)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::create_standard_registry;
    use crate::property::PropertyValue;
    use crate::socket::InputRef;

    fn add(graph: &mut Graph, kind: &str) -> NodeId {
        let node = create_standard_registry().create_node(kind).unwrap();
        graph.add_node(node).unwrap()
    }

    fn set(graph: &mut Graph, node: NodeId, name: &str, value: &str) {
        graph
            .set_property(node, name, PropertyValue::String(value.to_string()))
            .unwrap();
    }

    fn number(graph: &mut Graph, value: f64) -> NodeId {
        let id = add(graph, "Number");
        graph.set_property(id, "value", PropertyValue::Number(value)).unwrap();
        id
    }

    fn link(graph: &mut Graph, from: NodeId, to: NodeId, input: usize) {
        graph.connect(OutputRef::new(from, 0), InputRef::new(to, input)).unwrap();
    }

    fn texture(graph: &mut Graph, name: &str, var_name: &str) -> NodeId {
        let id = add(graph, "Texture");
        set(graph, id, "name", name);
        set(graph, id, "var_name", var_name);
        id
    }

    #[test]
    fn test_identifiers() {
        assert!(is_identifier("brickTex"));
        assert!(is_identifier("_private$1"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("1st"));
        assert!(!is_identifier("my texture"));
        assert!(!is_identifier("class"));
    }

    #[test]
    fn test_texture_program() {
        let mut graph = Graph::new("textures");
        texture(&mut graph, "brick", "brickTex");
        texture(&mut graph, "grass", "grassTex");

        let program = CodeGenerator::default().generate(&graph).unwrap();
        assert_eq!(
            program.code,
            "import { Scene, Texture } from \"@babylonjs/core\";\n\
             \n\
             export default class GraphScript {\n\
             \x20   private brickTex = this._scene.textures.find((texture) => texture.metadata?.editorName === \"brick\") as Texture;\n\
             \x20   private grassTex = this._scene.textures.find((texture) => texture.metadata?.editorName === \"grass\") as Texture;\n\
             \n\
             \x20   public constructor(private _scene: Scene) {\n\
             \x20   }\n\
             \n\
             \x20   public onStart(): void {\n\
             \x20   }\n\
             }\n"
        );
        assert_eq!(
            program.imports,
            vec![Requirement::new("@babylonjs/core", ["Scene", "Texture"])]
        );
        assert_eq!(
            program.variables.iter().map(|v| v.name.as_str()).collect::<Vec<_>>(),
            vec!["brickTex", "grassTex"]
        );
    }

    #[test]
    fn test_output_is_deterministic() {
        let mut graph = Graph::new("stable");
        let tex = texture(&mut graph, "brick", "brickTex");
        let level = add(&mut graph, "Texture Level");
        let a = number(&mut graph, 0.5);
        link(&mut graph, tex, level, 0);
        link(&mut graph, a, level, 1);
        add(&mut graph, "Vector3");

        let generator = CodeGenerator::default();
        let first = generator.generate(&graph).unwrap();
        let second = generator.generate(&graph).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_imports_deduplicated() {
        let mut graph = Graph::new("imports");
        texture(&mut graph, "brick", "brickTex");
        texture(&mut graph, "grass", "grassTex");
        add(&mut graph, "Vector3");
        add(&mut graph, "Vector3");

        let program = CodeGenerator::default().generate(&graph).unwrap();
        assert_eq!(
            program.imports,
            vec![Requirement::new("@babylonjs/core", ["Scene", "Texture", "Vector3"])]
        );
        assert_eq!(program.code.matches("import ").count(), 1);
    }

    #[test]
    fn test_arithmetic_parenthesized() {
        let mut graph = Graph::new("math");
        let a = number(&mut graph, 1.0);
        let b = number(&mut graph, 2.0);
        let c = number(&mut graph, 3.0);
        let sum = add(&mut graph, "Add");
        let product = add(&mut graph, "Multiply");
        let variable = add(&mut graph, "Variable");
        link(&mut graph, a, sum, 0);
        link(&mut graph, b, sum, 1);
        link(&mut graph, sum, product, 0);
        link(&mut graph, c, product, 1);
        link(&mut graph, product, variable, 0);
        set(&mut graph, variable, "var_name", "result");

        let program = CodeGenerator::default().generate(&graph).unwrap();
        assert!(program.code.contains("        const result = (1 + 2) * 3;\n"));
    }

    #[test]
    fn test_unconnected_inputs_use_defaults() {
        let mut graph = Graph::new("defaults");
        let divide = add(&mut graph, "Divide");
        let variable = add(&mut graph, "Variable");
        link(&mut graph, divide, variable, 0);

        let program = CodeGenerator::default().generate(&graph).unwrap();
        assert!(program.code.contains("const myVariable = 0 / 1;"));
    }

    #[test]
    fn test_missing_input_reported() {
        let mut graph = Graph::new("missing");
        let variable = add(&mut graph, "Variable");

        let err = CodeGenerator::default().generate(&graph).unwrap_err();
        assert_eq!(
            err,
            GenerationError::MissingInput {
                node: variable,
                input: 0,
                name: "Value".to_string(),
            }
        );
    }

    #[test]
    fn test_empty_name_reported() {
        let mut graph = Graph::new("empty");
        let tex = texture(&mut graph, "", "brickTex");

        let err = CodeGenerator::default().generate(&graph).unwrap_err();
        assert!(matches!(err, GenerationError::Node { node, .. } if node == tex));
    }

    #[test]
    fn test_duplicate_variable_reported() {
        let mut graph = Graph::new("duplicate");
        let first = texture(&mut graph, "brick", "tex");
        let second = texture(&mut graph, "grass", "tex");

        let err = CodeGenerator::default().generate(&graph).unwrap_err();
        assert_eq!(
            err,
            GenerationError::DuplicateVariable {
                node: second,
                name: "tex".to_string(),
                first,
            }
        );
    }

    #[test]
    fn test_reserved_names_rejected() {
        let mut graph = Graph::new("reserved");
        texture(&mut graph, "brick", "_scene");
        let err = CodeGenerator::default().generate(&graph).unwrap_err();
        assert!(matches!(err, GenerationError::ReservedIdentifier { .. }));

        let mut graph = Graph::new("reserved");
        texture(&mut graph, "brick", "__texture0");
        let err = CodeGenerator::default().generate(&graph).unwrap_err();
        assert!(matches!(err, GenerationError::ReservedIdentifier { .. }));

        let mut graph = Graph::new("invalid");
        texture(&mut graph, "brick", "my texture");
        let err = CodeGenerator::default().generate(&graph).unwrap_err();
        assert!(matches!(err, GenerationError::InvalidIdentifier { .. }));
    }

    #[test]
    fn test_runtime_locals_cannot_shadow_imports_or_globals() {
        let mut graph = Graph::new("shadow");
        let vector = add(&mut graph, "Vector3");
        let variable = add(&mut graph, "Variable");
        link(&mut graph, vector, variable, 0);
        set(&mut graph, variable, "var_name", "Vector3");
        let err = CodeGenerator::default().generate(&graph).unwrap_err();
        assert_eq!(
            err,
            GenerationError::ReservedIdentifier {
                node: variable,
                name: "Vector3".to_string(),
            }
        );

        // Always imported for the constructor
        set(&mut graph, variable, "var_name", "Scene");
        let err = CodeGenerator::default().generate(&graph).unwrap_err();
        assert!(matches!(err, GenerationError::ReservedIdentifier { node, .. } if node == variable));

        let mut graph = Graph::new("shadow");
        let value = number(&mut graph, 0.0);
        let variable = add(&mut graph, "Variable");
        let log = add(&mut graph, "Log");
        link(&mut graph, value, variable, 0);
        link(&mut graph, variable, log, 0);
        set(&mut graph, variable, "var_name", "console");
        let err = CodeGenerator::default().generate(&graph).unwrap_err();
        assert_eq!(
            err,
            GenerationError::ReservedIdentifier {
                node: variable,
                name: "console".to_string(),
            }
        );
    }

    #[test]
    fn test_setup_field_may_reuse_imported_name() {
        let mut graph = Graph::new("field");
        let vector = add(&mut graph, "Vector3");
        let variable = add(&mut graph, "Variable");
        link(&mut graph, vector, variable, 0);
        set(&mut graph, variable, "var_name", "Vector3");
        graph.set_property(variable, "setup", PropertyValue::Bool(true)).unwrap();

        let program = CodeGenerator::default().generate(&graph).unwrap();
        assert!(program.code.contains("    private Vector3 = new Vector3(0, 0, 0);
"));
    }

    #[test]
    fn test_string_properties_escaped() {
        let mut graph = Graph::new("escape");
        texture(&mut graph, "say \"hi\"", "quoted");

        let program = CodeGenerator::default().generate(&graph).unwrap();
        assert!(program.code.contains("editorName === \"say \\\"hi\\\"\")"));
    }

    #[test]
    fn test_setup_statement_promoted_by_runtime_input() {
        let mut graph = Graph::new("phases");
        let value = number(&mut graph, 2.0);
        let variable = add(&mut graph, "Variable");
        let setup = add(&mut graph, "Variable");
        link(&mut graph, value, variable, 0);
        link(&mut graph, variable, setup, 0);
        set(&mut graph, variable, "var_name", "speed");
        set(&mut graph, setup, "var_name", "cached");
        graph.set_property(setup, "setup", PropertyValue::Bool(true)).unwrap();

        let program = CodeGenerator::default().generate(&graph).unwrap();
        // `cached` reads a runtime local, so it cannot be a field
        assert_eq!(program.variables[1].phase, ExecutionPhase::Runtime);
        assert!(program.code.contains("const speed = 2;\n        const cached = speed;\n"));
        assert!(!program.code.contains("private cached"));
    }

    #[test]
    fn test_setup_variable_referenced_through_this() {
        let mut graph = Graph::new("fields");
        let tex = texture(&mut graph, "brick", "brickTex");
        let level = add(&mut graph, "Texture Level");
        link(&mut graph, tex, level, 0);

        let program = CodeGenerator::default().generate(&graph).unwrap();
        assert!(program.code.contains("    public onStart(): void {\n        this.brickTex.level = 1;\n"));
    }

    #[test]
    fn test_pass_through_output() {
        let mut graph = Graph::new("chain");
        let tex = texture(&mut graph, "brick", "brickTex");
        let first = add(&mut graph, "Texture Level");
        let second = add(&mut graph, "Texture Level");
        link(&mut graph, tex, first, 0);
        link(&mut graph, first, second, 0);

        let program = CodeGenerator::default().generate(&graph).unwrap();
        assert_eq!(program.code.matches("this.brickTex.level = 1;").count(), 2);
    }

    #[test]
    fn test_shared_expression_hoisted() {
        let mut graph = Graph::new("shared");
        let a = number(&mut graph, 1.0);
        let b = number(&mut graph, 2.0);
        let sum = add(&mut graph, "Add");
        let product = add(&mut graph, "Multiply");
        link(&mut graph, a, sum, 0);
        link(&mut graph, b, sum, 1);
        link(&mut graph, sum, product, 0);
        link(&mut graph, sum, product, 1);
        let result = add(&mut graph, "Variable");
        link(&mut graph, product, result, 0);

        let program = CodeGenerator::default().generate(&graph).unwrap();
        assert!(program.code.contains("    private __add0 = 1 + 2;\n"));
        assert!(program.code.contains("const myVariable = this.__add0 * this.__add0;"));

        let inline = CodeGenerator::new(GeneratorConfig {
            hoist_shared_expressions: false,
            ..Default::default()
        });
        let program = inline.generate(&graph).unwrap();
        assert!(program.code.contains("const myVariable = (1 + 2) * (1 + 2);"));
    }

    #[test]
    fn test_log_statement() {
        let mut graph = Graph::new("log");
        let value = number(&mut graph, 3.0);
        let log = add(&mut graph, "Log");
        link(&mut graph, value, log, 0);
        graph
            .set_property(log, "level", PropertyValue::Enum("error".to_string()))
            .unwrap();

        let program = CodeGenerator::default().generate(&graph).unwrap();
        assert!(program.code.contains("        console.error(3);\n"));
    }

    #[test]
    fn test_cycle_rejected() {
        let mut graph = Graph::new("cycle");
        let a = add(&mut graph, "Add");
        let b = add(&mut graph, "Add");
        link(&mut graph, a, b, 0);
        link(&mut graph, b, a, 0);

        let err = CodeGenerator::default().generate(&graph).unwrap_err();
        assert!(matches!(err, GenerationError::Structural(StructuralError::Cycle { .. })));
    }

    #[test]
    fn test_cancelled_generation() {
        let mut graph = Graph::new("cancel");
        texture(&mut graph, "brick", "brickTex");
        let cancel = CancelToken::new();
        cancel.cancel();

        let err = CodeGenerator::default().generate_with_cancel(&graph, &cancel).unwrap_err();
        assert_eq!(err, GenerationError::Cancelled);
    }

    #[test]
    fn test_empty_graph() {
        let program = CodeGenerator::default().generate(&Graph::new("empty")).unwrap();
        assert!(program.variables.is_empty());
        assert!(program.code.starts_with("import { Scene } from \"@babylonjs/core\";\n"));
    }
}
