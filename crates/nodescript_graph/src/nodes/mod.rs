// SPDX-License-Identifier: MIT OR Apache-2.0
//! Standard node library.

pub mod debug;
pub mod math;
pub mod texture;
pub mod variable;
pub mod vector;

use crate::node::NodeRegistry;

/// Create a registry holding every standard node type
pub fn create_standard_registry() -> NodeRegistry {
    let mut registry = NodeRegistry::new();
    texture::register(&mut registry);
    math::register(&mut registry);
    vector::register(&mut registry);
    variable::register(&mut registry);
    debug::register(&mut registry);
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_registry_kinds() {
        let registry = create_standard_registry();
        let kinds: Vec<_> = registry.types().map(|t| t.id.as_str()).collect();
        assert_eq!(
            kinds,
            vec![
                "Texture",
                "Texture Level",
                "Number",
                "Add",
                "Subtract",
                "Multiply",
                "Divide",
                "Vector3",
                "Variable",
                "Log",
            ]
        );
    }

    #[test]
    fn test_divide_defaults_to_unit_divisor() {
        let registry = create_standard_registry();
        let divide = registry.create_node("Divide").unwrap();
        assert_eq!(divide.input(1).and_then(|i| i.default_value.clone()), Some(crate::socket::Value::Number(1.0)));
    }
}
