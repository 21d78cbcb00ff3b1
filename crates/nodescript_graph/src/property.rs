// SPDX-License-Identifier: MIT OR Apache-2.0
//! User-editable node properties.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Value of a node property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    /// Free text
    String(String),
    /// Number
    Number(f64),
    /// Boolean toggle
    Bool(bool),
    /// One entry out of a choice list
    Enum(String),
}

impl PropertyValue {
    /// Name of the variant, for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Number(_) => "number",
            Self::Bool(_) => "bool",
            Self::Enum(_) => "enum",
        }
    }

    fn same_variant(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(v) | Self::Enum(v) => f.write_str(v),
            Self::Number(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
        }
    }
}

/// A property with its default and current value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    default: PropertyValue,
    value: PropertyValue,
    /// Fixed choices for enum properties
    pub choices: Option<Vec<String>>,
}

impl Property {
    /// Create a property holding its default
    pub fn new(default: PropertyValue) -> Self {
        Self {
            value: default.clone(),
            default,
            choices: None,
        }
    }

    /// Create an enum property with a fixed choice list
    pub fn choice(default: impl Into<String>, choices: &[&str]) -> Self {
        let mut property = Self::new(PropertyValue::Enum(default.into()));
        property.choices = Some(choices.iter().map(|c| c.to_string()).collect());
        property
    }

    /// Default value
    pub fn default_value(&self) -> &PropertyValue {
        &self.default
    }

    /// Current value
    pub fn value(&self) -> &PropertyValue {
        &self.value
    }
}

/// Error when editing a property
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PropertyError {
    /// Property does not exist on the node
    #[error("Unknown property: {0}")]
    Unknown(String),

    /// Value variant differs from the declared one
    #[error("Property {name} expects a {expected} value, got {found}")]
    TypeMismatch {
        /// Property name
        name: String,
        /// Declared variant
        expected: &'static str,
        /// Supplied variant
        found: &'static str,
    },

    /// Enum value outside the choice list
    #[error("Property {name} has no choice {value:?}")]
    InvalidChoice {
        /// Property name
        name: String,
        /// Rejected value
        value: String,
    },
}

/// Ordered property map of a node
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Properties(IndexMap<String, Property>);

impl Properties {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style declaration
    pub fn with(mut self, name: impl Into<String>, property: Property) -> Self {
        self.0.insert(name.into(), property);
        self
    }

    /// Declare a string property
    pub fn with_string(self, name: impl Into<String>, default: impl Into<String>) -> Self {
        self.with(name, Property::new(PropertyValue::String(default.into())))
    }

    /// Declare a number property
    pub fn with_number(self, name: impl Into<String>, default: f64) -> Self {
        self.with(name, Property::new(PropertyValue::Number(default)))
    }

    /// Declare a bool property
    pub fn with_bool(self, name: impl Into<String>, default: bool) -> Self {
        self.with(name, Property::new(PropertyValue::Bool(default)))
    }

    /// Property by name
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.0.get(name)
    }

    /// Current value by name
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.0.get(name).map(Property::value)
    }

    /// Current text of a string or enum property
    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            PropertyValue::String(v) | PropertyValue::Enum(v) => Some(v),
            _ => None,
        }
    }

    /// Current value of a number property
    pub fn get_number(&self, name: &str) -> Option<f64> {
        match self.get(name)? {
            PropertyValue::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Current value of a bool property
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            PropertyValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Set a property, keeping its declared variant
    pub fn set(&mut self, name: &str, value: PropertyValue) -> Result<(), PropertyError> {
        let property = self
            .0
            .get_mut(name)
            .ok_or_else(|| PropertyError::Unknown(name.to_string()))?;

        if !property.default.same_variant(&value) {
            return Err(PropertyError::TypeMismatch {
                name: name.to_string(),
                expected: property.default.type_name(),
                found: value.type_name(),
            });
        }

        if let (Some(choices), PropertyValue::Enum(selected)) = (&property.choices, &value) {
            if !choices.contains(selected) {
                return Err(PropertyError::InvalidChoice {
                    name: name.to_string(),
                    value: selected.clone(),
                });
            }
        }

        property.value = value;
        Ok(())
    }

    /// Restore the default value
    pub fn reset(&mut self, name: &str) -> Result<(), PropertyError> {
        let property = self
            .0
            .get_mut(name)
            .ok_or_else(|| PropertyError::Unknown(name.to_string()))?;
        property.value = property.default.clone();
        Ok(())
    }

    /// Properties in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Property)> {
        self.0.iter().map(|(name, p)| (name.as_str(), p))
    }

    /// Number of properties
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the node has no properties
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
