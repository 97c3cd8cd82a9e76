// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node tree containing nodes and links.

use crate::link::{Link, LinkId};
use crate::node::{Node, NodeId};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A node tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Graph {
    /// Tree name
    pub name: String,
    /// Nodes in the tree
    nodes: IndexMap<NodeId, Node>,
    /// Links between nodes
    links: IndexMap<LinkId, Link>,
}

impl Graph {
    /// Create a new empty tree
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nodes: IndexMap::new(),
            links: IndexMap::new(),
        }
    }

    /// Add a node to the tree.
    ///
    /// The node name is made unique by appending `.001`, `.002`, ... when it
    /// collides with an existing node.
    pub fn add_node(&mut self, mut node: Node) -> NodeId {
        let unique = self.unique_name(&node.name, None);
        if unique != node.name {
            tracing::debug!("Node name '{}' taken, using '{}'", node.name, unique);
            node.name = unique;
        }
        let id = node.id;
        self.nodes.insert(id, node);
        id
    }

    /// Rename a node and return the name it actually received
    pub fn rename_node(&mut self, node_id: NodeId, name: &str) -> Option<String> {
        let unique = self.unique_name(name, Some(node_id));
        let node = self.nodes.get_mut(&node_id)?;
        node.name = unique.clone();
        Some(unique)
    }

    fn unique_name(&self, wanted: &str, ignore: Option<NodeId>) -> String {
        let taken = |candidate: &str| {
            self.nodes
                .values()
                .any(|n| Some(n.id) != ignore && n.name == candidate)
        };
        if !taken(wanted) {
            return wanted.to_string();
        }
        let base = match wanted.rsplit_once('.') {
            Some((base, suffix)) if suffix.len() == 3 && suffix.bytes().all(|b| b.is_ascii_digit()) => base,
            _ => wanted,
        };
        (1..)
            .map(|i| format!("{base}.{i:03}"))
            .find(|candidate| !taken(candidate))
            .unwrap_or_else(|| wanted.to_string())
    }

    /// Remove a node and its links
    pub fn remove_node(&mut self, node_id: NodeId) -> Option<Node> {
        self.links.retain(|_, l| !l.involves_node(node_id));
        self.nodes.shift_remove(&node_id)
    }

    /// Remove every node and link
    pub fn clear(&mut self) {
        self.links.clear();
        self.nodes.clear();
    }

    /// Get a node by ID
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    /// Get a mutable node by ID
    pub fn node_mut(&mut self, node_id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&node_id)
    }

    /// Get a node by name
    pub fn node_by_name(&self, name: &str) -> Option<&Node> {
        self.nodes.values().find(|n| n.name == name)
    }

    /// Get all nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Link an output socket to an input socket, both given by identifier.
    ///
    /// A single-input socket keeps only its newest link.
    pub fn link(
        &mut self,
        from_node: NodeId,
        from_socket: &str,
        to_node: NodeId,
        to_socket: &str,
    ) -> Result<LinkId, LinkError> {
        let source = self.nodes.get(&from_node).ok_or(LinkError::NodeNotFound(from_node))?;
        let target = self.nodes.get(&to_node).ok_or(LinkError::NodeNotFound(to_node))?;

        source
            .output(from_socket)
            .ok_or_else(|| LinkError::SocketNotFound(from_socket.to_string()))?;
        let input = target
            .input(to_socket)
            .ok_or_else(|| LinkError::SocketNotFound(to_socket.to_string()))?;

        if !input.multi_input {
            self.links.retain(|_, l| !l.ends_at(to_node, to_socket));
        }

        let link = Link::new(from_node, from_socket, to_node, to_socket);
        let id = link.id;
        self.links.insert(id, link);
        Ok(id)
    }

    /// Get all links in creation order
    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.links.values()
    }

    /// Get the number of links
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Links ending in an input socket
    pub fn links_into<'a>(&'a self, node_id: NodeId, socket: &'a str) -> impl Iterator<Item = &'a Link> {
        self.links.values().filter(move |l| l.ends_at(node_id, socket))
    }

    /// Whether an input socket has at least one incoming link
    pub fn is_input_linked(&self, node_id: NodeId, socket: &str) -> bool {
        self.links_into(node_id, socket).next().is_some()
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new("NodeTree")
    }
}

/// Error when creating a link
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    /// Node not found
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Socket not found
    #[error("Socket not found: {0}")]
    SocketNotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{NodeCategory, NodeKind};
    use crate::socket::{Socket, SocketType};

    fn kind() -> NodeKind {
        NodeKind::new("TestNode", "Node", NodeCategory::Converter)
            .input(Socket::input("In", SocketType::Float))
            .input(Socket::input("Many", SocketType::Geometry).multi_input())
            .output(Socket::output("Out", SocketType::Float))
    }

    #[test]
    fn test_unique_names() {
        let mut graph = Graph::default();
        let a = graph.add_node(Node::new(&kind()));
        let b = graph.add_node(Node::new(&kind()));
        let c = graph.add_node(Node::new(&kind()));
        assert_eq!(graph.node(a).unwrap().name, "Node");
        assert_eq!(graph.node(b).unwrap().name, "Node.001");
        assert_eq!(graph.node(c).unwrap().name, "Node.002");

        // A node does not collide with its own name.
        assert_eq!(graph.rename_node(c, "Node.001").as_deref(), Some("Node.002"));
        assert_eq!(graph.rename_node(a, "Node").as_deref(), Some("Node"));
        assert_eq!(graph.rename_node(a, "Node.002").as_deref(), Some("Node.003"));
        assert!(graph.node_by_name("Node.003").is_some());
    }

    #[test]
    fn test_link_validation() {
        let mut graph = Graph::default();
        let a = graph.add_node(Node::new(&kind()));
        let b = graph.add_node(Node::new(&kind()));

        assert!(graph.link(a, "Out", b, "In").is_ok());
        assert!(matches!(graph.link(a, "In", b, "In"), Err(LinkError::SocketNotFound(_))));
        assert!(matches!(graph.link(a, "Out", NodeId::new(), "In"), Err(LinkError::NodeNotFound(_))));
        assert!(graph.is_input_linked(b, "In"));
        assert!(!graph.is_input_linked(a, "In"));
    }

    #[test]
    fn test_single_input_replaces_link() {
        let mut graph = Graph::default();
        let a = graph.add_node(Node::new(&kind()));
        let b = graph.add_node(Node::new(&kind()));
        let c = graph.add_node(Node::new(&kind()));

        graph.link(a, "Out", c, "In").unwrap();
        graph.link(b, "Out", c, "In").unwrap();
        assert_eq!(graph.link_count(), 1);
        assert_eq!(graph.links_into(c, "In").next().unwrap().from_node, b);

        graph.link(a, "Out", c, "Many").unwrap();
        graph.link(b, "Out", c, "Many").unwrap();
        assert_eq!(graph.links_into(c, "Many").count(), 2);
    }

    #[test]
    fn test_remove_node_drops_links() {
        let mut graph = Graph::default();
        let a = graph.add_node(Node::new(&kind()));
        let b = graph.add_node(Node::new(&kind()));
        graph.link(a, "Out", b, "In").unwrap();

        graph.remove_node(a);
        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.link_count(), 0);

        graph.clear();
        assert_eq!(graph.node_count(), 0);
    }
}
