// SPDX-License-Identifier: MIT OR Apache-2.0
//! Socket data kinds and the connection compatibility table.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wildcard kind, compatible with every other kind
pub const ANY: &str = "*";

/// Built-in data kinds
pub mod kinds {
    /// Any texture, including render targets
    pub const BASE_TEXTURE: &str = "BaseTexture";
    /// Sampled image texture
    pub const TEXTURE: &str = "Texture";
    /// Floating point number
    pub const NUMBER: &str = "Number";
    /// 3D vector
    pub const VECTOR3: &str = "Vector3";
    /// Boolean value
    pub const BOOLEAN: &str = "Boolean";
    /// String value
    pub const STRING: &str = "String";
}

/// Set of data kinds declared on a socket.
///
/// Declared as a comma-separated list, e.g. `"BaseTexture,Texture"`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TypeSet(IndexSet<String>);

impl TypeSet {
    /// Parse a comma-separated declaration. Blank entries are ignored.
    pub fn parse(declared: &str) -> Self {
        Self(
            declared
                .split(',')
                .map(str::trim)
                .filter(|kind| !kind.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    /// Set holding a single kind
    pub fn single(kind: impl Into<String>) -> Self {
        let mut set = IndexSet::new();
        set.insert(kind.into());
        Self(set)
    }

    /// Set accepting anything
    pub fn any() -> Self {
        Self::single(ANY)
    }

    /// Whether the set contains the wildcard kind
    pub fn is_any(&self) -> bool {
        self.0.contains(ANY)
    }

    /// Whether a kind is declared in this set
    pub fn contains(&self, kind: &str) -> bool {
        self.0.contains(kind)
    }

    /// Declared kinds in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of declared kinds
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing is declared
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for TypeSet {
    fn from(declared: &str) -> Self {
        Self::parse(declared)
    }
}

impl fmt::Display for TypeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, kind) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(kind)?;
        }
        Ok(())
    }
}

/// Registry of data kinds and their declared supertypes.
///
/// An output may drive an input when the output's kinds, expanded through
/// the supertype table, intersect the kinds the input accepts.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    supertypes: IndexMap<String, Vec<String>>,
}

impl TypeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in kinds and aliases
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(kinds::BASE_TEXTURE);
        registry.register_alias(kinds::TEXTURE, kinds::BASE_TEXTURE);
        registry.register(kinds::NUMBER);
        registry.register(kinds::VECTOR3);
        registry.register(kinds::BOOLEAN);
        registry.register(kinds::STRING);
        registry
    }

    /// Register a kind with no supertypes
    pub fn register(&mut self, kind: impl Into<String>) {
        self.supertypes.entry(kind.into()).or_default();
    }

    /// Declare `kind` to be usable wherever `supertype` is accepted
    pub fn register_alias(&mut self, kind: impl Into<String>, supertype: impl Into<String>) {
        let supertype = supertype.into();
        self.register(supertype.clone());
        let entry = self.supertypes.entry(kind.into()).or_default();
        if !entry.contains(&supertype) {
            entry.push(supertype);
        }
    }

    /// Whether a kind has been registered
    pub fn is_known(&self, kind: &str) -> bool {
        kind == ANY || self.supertypes.contains_key(kind)
    }

    /// Registered kinds in registration order
    pub fn kinds(&self) -> impl Iterator<Item = &str> {
        self.supertypes.keys().map(String::as_str)
    }

    /// All kinds a set can stand in for, following supertypes transitively
    pub fn expand(&self, set: &TypeSet) -> IndexSet<String> {
        let mut expanded: IndexSet<String> = IndexSet::new();
        let mut pending: Vec<&str> = set.iter().collect();

        while let Some(kind) = pending.pop() {
            if !expanded.insert(kind.to_string()) {
                continue;
            }
            if let Some(supers) = self.supertypes.get(kind) {
                pending.extend(supers.iter().map(String::as_str));
            }
        }

        expanded
    }

    /// Check if an output producing `output` may drive an input accepting `input`
    pub fn is_compatible(&self, output: &TypeSet, input: &TypeSet) -> bool {
        if output.is_empty() || input.is_empty() {
            return false;
        }

        if output.is_any() || input.is_any() {
            return true;
        }

        let produced = self.expand(output);
        input.iter().any(|kind| produced.contains(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_declaration() {
        let set = TypeSet::parse("BaseTexture, Texture,,");
        assert_eq!(set.len(), 2);
        assert!(set.contains("BaseTexture"));
        assert!(set.contains("Texture"));
        assert_eq!(set.to_string(), "BaseTexture,Texture");
    }

    #[test]
    fn test_texture_output_accepted_by_texture_input() {
        let registry = TypeRegistry::standard();
        let output = TypeSet::single(kinds::TEXTURE);
        let input = TypeSet::parse("BaseTexture,Texture");
        assert!(registry.is_compatible(&output, &input));
    }

    #[test]
    fn test_subtype_satisfies_supertype_input() {
        let registry = TypeRegistry::standard();
        let output = TypeSet::single(kinds::TEXTURE);
        let input = TypeSet::single(kinds::BASE_TEXTURE);
        assert!(registry.is_compatible(&output, &input));
        // Not the other way around
        assert!(!registry.is_compatible(&input, &output));
    }

    #[test]
    fn test_number_rejected_by_texture_input() {
        let registry = TypeRegistry::standard();
        let output = TypeSet::single(kinds::NUMBER);
        let input = TypeSet::parse("Texture,BaseTexture");
        assert!(!registry.is_compatible(&output, &input));
    }

    #[test]
    fn test_wildcard_and_empty_sets() {
        let registry = TypeRegistry::standard();
        assert!(registry.is_compatible(&TypeSet::single(kinds::NUMBER), &TypeSet::any()));
        assert!(registry.is_compatible(&TypeSet::any(), &TypeSet::single(kinds::STRING)));
        assert!(!registry.is_compatible(&TypeSet::default(), &TypeSet::any()));
    }

    #[test]
    fn test_transitive_aliases() {
        let mut registry = TypeRegistry::new();
        registry.register_alias("CubeTexture", "Texture");
        registry.register_alias("Texture", "BaseTexture");

        let expanded = registry.expand(&TypeSet::single("CubeTexture"));
        assert!(expanded.contains("BaseTexture"));
        assert!(registry.is_known("BaseTexture"));
        assert!(!registry.is_known("Mesh"));
    }
}
