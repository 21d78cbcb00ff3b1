// SPDX-License-Identifier: MIT OR Apache-2.0
//! Texture nodes.

use crate::catalog::ResourceCatalog;
use crate::codegen::{CodeGenerationOutput, CodegenContext, ExecutionPhase, Expr, GenerationError, OutputCode};
use crate::evaluation::ExecuteContext;
use crate::node::{NodeBehavior, NodeCategory, NodeRegistry, NodeType};
use crate::property::Properties;
use crate::socket::{InputSocket, OutputSocket, Value};
use crate::types::kinds;
use std::sync::Arc;

/// Kind tag of the catalog texture node
pub const TEXTURE: &str = "Texture";
/// Kind tag of the texture level node
pub const TEXTURE_LEVEL: &str = "Texture Level";

/// Register the texture nodes
pub fn register(registry: &mut NodeRegistry) {
    registry.register(NodeType {
        id: TEXTURE.to_string(),
        name: "Texture".to_string(),
        category: NodeCategory::Texture,
        description: "Texture looked up by name in the scene".to_string(),
        inputs: vec![],
        outputs: vec![OutputSocket::new("Texture", "BaseTexture,Texture")],
        properties: Properties::new()
            .with_string("name", "None")
            .with_string("var_name", "myTexture"),
        behavior: Arc::new(TextureNode),
    });

    registry.register(NodeType {
        id: TEXTURE_LEVEL.to_string(),
        name: "Texture Level".to_string(),
        category: NodeCategory::Texture,
        description: "Set the intensity level of a texture and pass it on".to_string(),
        inputs: vec![
            InputSocket::new("Texture", kinds::BASE_TEXTURE),
            InputSocket::new("Level", kinds::NUMBER).with_default(Value::Number(1.0)),
        ],
        outputs: vec![OutputSocket::new("Texture", "BaseTexture,Texture")],
        properties: Properties::new(),
        behavior: Arc::new(TextureLevelNode),
    });
}

struct TextureNode;

impl NodeBehavior for TextureNode {
    fn execute(&self, cx: &mut ExecuteContext<'_>) {
        let name = cx.property_str("name").to_string();
        let texture = cx.lookup_resource(&name, kinds::TEXTURE);
        cx.set_output(0, texture.map_or(Value::Null, Value::Resource));
    }

    fn generate_code(&self, cx: &CodegenContext<'_>) -> Result<CodeGenerationOutput, GenerationError> {
        let name = cx.required_str("name")?;
        let var_name = cx.required_str("var_name")?;

        let textures = Expr::member(&cx.scene(), "textures");
        let lookup = Expr::primary(format!(
            "{}.find((texture) => texture.metadata?.editorName === {})",
            textures.code(),
            Expr::string(name).code(),
        ));

        Ok(CodeGenerationOutput::variable(var_name, Expr::cast(&lookup, "Texture"))
            .with_phase(ExecutionPhase::Setup)
            .requires(cx.runtime_module(), ["Texture"]))
    }

    fn property_options(&self, property: &str, catalog: &dyn ResourceCatalog) -> Option<Vec<String>> {
        (property == "name").then(|| catalog.names_of_kind(kinds::TEXTURE))
    }
}

struct TextureLevelNode;

impl NodeBehavior for TextureLevelNode {
    fn execute(&self, cx: &mut ExecuteContext<'_>) {
        // Descriptors are opaque; the preview only forwards the texture
        let texture = match cx.input(0) {
            Value::Resource(texture) => Value::Resource(texture.clone()),
            _ => Value::Null,
        };
        cx.set_output(0, texture);
    }

    fn generate_code(&self, cx: &CodegenContext<'_>) -> Result<CodeGenerationOutput, GenerationError> {
        let texture = cx.input_or_default(0)?;
        let level = cx.input_or_default(1)?;
        let target = Expr::member(&texture, "level");

        Ok(CodeGenerationOutput::statement(format!("{} = {};", target.code(), level.code()))
            .with_outputs(vec![OutputCode::Expr(texture)]))
    }
}
