// SPDX-License-Identifier: MIT OR Apache-2.0
//! Input/output sockets and the values flowing through them.

use crate::catalog::ResourceDescriptor;
use crate::node::NodeId;
use crate::types::{kinds, TypeSet};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Address of an output socket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutputRef {
    /// Owning node
    pub node: NodeId,
    /// Socket index on the node
    pub index: usize,
}

impl OutputRef {
    /// Create a new output address
    pub fn new(node: NodeId, index: usize) -> Self {
        Self { node, index }
    }
}

/// Address of an input socket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputRef {
    /// Owning node
    pub node: NodeId,
    /// Socket index on the node
    pub index: usize,
}

impl InputRef {
    /// Create a new input address
    pub fn new(node: NodeId, index: usize) -> Self {
        Self { node, index }
    }
}

/// Value produced by a node during an execution pass
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// No value; written by nodes that could not produce one
    #[default]
    Null,
    /// Boolean
    Bool(bool),
    /// Number
    Number(f64),
    /// 3D vector
    Vector3([f64; 3]),
    /// String
    String(String),
    /// Resolved host resource
    Resource(ResourceDescriptor),
}

impl Value {
    /// Whether this is the null value
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Numeric payload, if any
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Resource payload, if any
    pub fn as_resource(&self) -> Option<&ResourceDescriptor> {
        match self {
            Self::Resource(r) => Some(r),
            _ => None,
        }
    }

    /// Data kind of the payload; `None` for null
    pub fn kind(&self) -> Option<&str> {
        match self {
            Self::Null => None,
            Self::Bool(_) => Some(kinds::BOOLEAN),
            Self::Number(_) => Some(kinds::NUMBER),
            Self::Vector3(_) => Some(kinds::VECTOR3),
            Self::String(_) => Some(kinds::STRING),
            Self::Resource(r) => Some(&r.kind),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Number(v) => write!(f, "{v}"),
            Self::Vector3([x, y, z]) => write!(f, "({x}, {y}, {z})"),
            Self::String(v) => f.write_str(v),
            Self::Resource(r) => write!(f, "{} \"{}\"", r.kind, r.name),
        }
    }
}

/// An input socket on a node
#[derive(Debug, Clone)]
pub struct InputSocket {
    /// Socket name
    pub name: String,
    /// Kinds this socket accepts
    pub accepts: TypeSet,
    /// Value used when nothing drives the socket
    pub default_value: Option<Value>,
    link: Option<OutputRef>,
}

impl InputSocket {
    /// Create a new unconnected input
    pub fn new(name: impl Into<String>, accepts: impl Into<TypeSet>) -> Self {
        Self {
            name: name.into(),
            accepts: accepts.into(),
            default_value: None,
            link: None,
        }
    }

    /// Set the default value
    pub fn with_default(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Output driving this input, if connected
    pub fn link(&self) -> Option<OutputRef> {
        self.link
    }

    /// Whether an output drives this input
    pub fn is_connected(&self) -> bool {
        self.link.is_some()
    }

    pub(crate) fn set_link(&mut self, link: Option<OutputRef>) -> Option<OutputRef> {
        std::mem::replace(&mut self.link, link)
    }
}

/// An output socket on a node
#[derive(Debug, Clone)]
pub struct OutputSocket {
    /// Socket name
    pub name: String,
    /// Kinds this socket produces
    pub produces: TypeSet,
    value: Value,
}

impl OutputSocket {
    /// Create a new output
    pub fn new(name: impl Into<String>, produces: impl Into<TypeSet>) -> Self {
        Self {
            name: name.into(),
            produces: produces.into(),
            value: Value::Null,
        }
    }

    /// Value written by the last completed execution pass
    pub fn value(&self) -> &Value {
        &self.value
    }

    pub(crate) fn set_value(&mut self, value: Value) {
        self.value = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_defaults() {
        let input = InputSocket::new("A", "Number").with_default(Value::Number(1.5));
        assert!(!input.is_connected());
        assert_eq!(input.default_value, Some(Value::Number(1.5)));
        assert!(input.accepts.contains("Number"));
    }

    #[test]
    fn test_link_replacement() {
        let mut input = InputSocket::new("Texture", "BaseTexture");
        let source = OutputRef::new(NodeId::new(), 0);
        assert_eq!(input.set_link(Some(source)), None);
        assert_eq!(input.link(), Some(source));
        assert_eq!(input.set_link(None), Some(source));
        assert!(!input.is_connected());
    }

    #[test]
    fn test_value_kind_and_display() {
        let texture = Value::Resource(ResourceDescriptor::new("brick", "Texture", "brick.png"));
        assert_eq!(texture.kind(), Some("Texture"));
        assert_eq!(texture.to_string(), "Texture \"brick\"");
        assert_eq!(Value::Vector3([1.0, 2.0, 0.5]).to_string(), "(1, 2, 0.5)");
        assert!(Value::default().is_null());
        assert_eq!(Value::Number(3.0).as_number(), Some(3.0));
    }
}
