// SPDX-License-Identifier: MIT OR Apache-2.0
//! Connection (edge) definitions for the graph.
//!
//! Edges are not stored on their own: each input socket holds at most one
//! reference to the output driving it, and a [`Connection`] is a view built
//! from that reference.

use crate::node::NodeId;
use crate::socket::{InputRef, OutputRef};
use serde::{Deserialize, Serialize};

/// A connection between an output and an input socket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connection {
    /// Driving output
    pub from: OutputRef,
    /// Driven input
    pub to: InputRef,
}

impl Connection {
    /// Create a new connection
    pub fn new(from: OutputRef, to: InputRef) -> Self {
        Self { from, to }
    }

    /// Source node ID
    pub fn from_node(&self) -> NodeId {
        self.from.node
    }

    /// Target node ID
    pub fn to_node(&self) -> NodeId {
        self.to.node
    }

    /// Check if this connection involves a specific node
    pub fn involves_node(&self, node_id: NodeId) -> bool {
        self.from.node == node_id || self.to.node == node_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_involves_node() {
        let a = NodeId::new();
        let b = NodeId::new();
        let c = NodeId::new();
        let connection = Connection::new(OutputRef::new(a, 0), InputRef::new(b, 1));
        assert!(connection.involves_node(a));
        assert!(connection.involves_node(b));
        assert!(!connection.involves_node(c));
        assert_eq!(connection.from_node(), a);
        assert_eq!(connection.to_node(), b);
    }
}
