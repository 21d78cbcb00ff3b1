// SPDX-License-Identifier: MIT OR Apache-2.0
//! Assembly of node fragments into one program.

use super::fragment::{string_literal, ExecutionPhase, Requirement};
use crate::config::GeneratorConfig;
use std::collections::{BTreeMap, BTreeSet};

/// Imports merged across all nodes, unique per (module, symbol)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSet {
    modules: BTreeMap<String, BTreeSet<String>>,
}

impl ImportSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a requirement
    pub fn add(&mut self, requirement: &Requirement) {
        let symbols = self.modules.entry(requirement.module.clone()).or_default();
        symbols.extend(requirement.symbols.iter().cloned());
    }

    /// Whether a symbol is imported from a module
    pub fn contains(&self, module: &str, symbol: &str) -> bool {
        self.modules.get(module).is_some_and(|s| s.contains(symbol))
    }

    /// Whether a symbol is imported from any module
    pub fn contains_symbol(&self, symbol: &str) -> bool {
        self.modules.values().any(|s| s.contains(symbol))
    }

    /// One requirement per module, modules and symbols sorted
    pub fn requirements(&self) -> Vec<Requirement> {
        self.modules
            .iter()
            .map(|(module, symbols)| Requirement::new(module.clone(), symbols.iter().cloned()))
            .collect()
    }

    /// Number of modules
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether nothing is imported
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    fn render(&self, out: &mut String) {
        for (module, symbols) in &self.modules {
            if symbols.is_empty() {
                out.push_str(&format!("import {};\n", string_literal(module)));
                continue;
            }
            let symbols = symbols.iter().map(String::as_str).collect::<Vec<_>>().join(", ");
            out.push_str(&format!("import {{ {symbols} }} from {};\n", string_literal(module)));
        }
    }
}

/// Collects declarations and statements per phase, then lays out the class
pub(crate) struct ProgramWriter<'a> {
    config: &'a GeneratorConfig,
    imports: ImportSet,
    fields: Vec<String>,
    setup: Vec<String>,
    runtime: Vec<String>,
}

impl<'a> ProgramWriter<'a> {
    pub(crate) fn new(config: &'a GeneratorConfig) -> Self {
        let mut imports = ImportSet::new();
        // The constructor takes the host scene
        imports.add(&Requirement::new(config.runtime_module.clone(), ["Scene"]));
        Self {
            config,
            imports,
            fields: Vec::new(),
            setup: Vec::new(),
            runtime: Vec::new(),
        }
    }

    pub(crate) fn require(&mut self, requirement: &Requirement) {
        self.imports.add(requirement);
    }

    pub(crate) fn declare(&mut self, phase: ExecutionPhase, name: &str, value: &str) {
        match phase {
            ExecutionPhase::Setup => self.fields.push(format!("private {name} = {value};")),
            ExecutionPhase::Runtime => self.runtime.push(format!("const {name} = {value};")),
        }
    }

    pub(crate) fn statement(&mut self, phase: ExecutionPhase, code: &str) {
        match phase {
            ExecutionPhase::Setup => self.setup.push(code.to_string()),
            ExecutionPhase::Runtime => self.runtime.push(code.to_string()),
        }
    }

    pub(crate) fn finish(self) -> (String, ImportSet) {
        let config = self.config;
        let one = config.indent(1);
        let two = config.indent(2);
        let mut out = String::new();

        if let Some(header) = &config.header {
            for line in header.lines() {
                if line.is_empty() {
                    out.push_str("//\n");
                } else {
                    out.push_str(&format!("// {line}\n"));
                }
            }
            out.push('\n');
        }

        self.imports.render(&mut out);
        out.push('\n');

        out.push_str(&format!("export default class {} {{\n", config.class_name));

        for field in &self.fields {
            push_lines(&mut out, &one, field);
        }
        if !self.fields.is_empty() {
            out.push('\n');
        }

        out.push_str(&format!(
            "{one}public constructor(private {}: Scene) {{\n",
            config.scene_field
        ));
        for statement in &self.setup {
            push_lines(&mut out, &two, statement);
        }
        out.push_str(&format!("{one}}}\n\n"));

        out.push_str(&format!("{one}public {}(): void {{\n", config.entry_method));
        for statement in &self.runtime {
            push_lines(&mut out, &two, statement);
        }
        out.push_str(&format!("{one}}}\n"));
        out.push_str("}\n");

        (out, self.imports)
    }
}

fn push_lines(out: &mut String, indent: &str, code: &str) {
    for line in code.lines() {
        if line.is_empty() {
            out.push('\n');
        } else {
            out.push_str(indent);
            out.push_str(line);
            out.push('\n');
        }
    }
}
