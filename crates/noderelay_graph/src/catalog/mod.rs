// SPDX-License-Identifier: MIT OR Apache-2.0
//! Standard node kinds of the host editor.
//!
//! The catalog covers the group interface, layout helpers, and a working set
//! of shader and geometry nodes. Hosts with a wider vocabulary register
//! their own kinds into a [`NodeRegistry`].

pub mod geometry;
pub mod shader;

use crate::node::{NodeCategory, NodeKind, NodeRegistry};
use crate::setting::SettingDef;
use crate::socket::{Socket, SocketType};

/// Create a registry with every standard node kind
pub fn standard_registry() -> NodeRegistry {
    let mut registry = NodeRegistry::new();
    register_common(&mut registry);
    shader::register(&mut registry);
    geometry::register(&mut registry);
    registry
}

/// Register group interface and layout kinds
pub fn register_common(registry: &mut NodeRegistry) {
    registry.register(
        NodeKind::new("NodeGroupInput", "Group Input", NodeCategory::Group)
            .output(Socket::output("Geometry", SocketType::Geometry).with_identifier("Socket_0")),
    );

    registry.register(
        NodeKind::new("NodeGroupOutput", "Group Output", NodeCategory::Group)
            .setting(SettingDef::boolean("is_active_output", true))
            .input(Socket::input("Geometry", SocketType::Geometry).with_identifier("Socket_1")),
    );

    registry.register(
        NodeKind::new("NodeFrame", "Frame", NodeCategory::Layout)
            .setting(SettingDef::int("label_size", 8, 64, 20))
            .setting(SettingDef::boolean("shrink", true))
            .with_height()
            .width(150.0),
    );

    registry.register(
        NodeKind::new("NodeReroute", "Reroute", NodeCategory::Layout)
            .input(Socket::input("Input", SocketType::Color))
            .output(Socket::output("Output", SocketType::Color))
            .width(16.0),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_registry_contents() {
        let registry = standard_registry();
        for id in [
            "NodeGroupInput",
            "NodeGroupOutput",
            "ShaderNodeMath",
            "ShaderNodeMix",
            "ShaderNodeTexNoise",
            "GeometryNodeMeshCube",
        ] {
            assert!(registry.contains(id), "missing {id}");
        }
        assert!(!registry.contains("ShaderNodeTexMusgrave"));
        assert!(registry.kinds_in_category(NodeCategory::Layout).count() >= 2);
    }

    #[test]
    fn test_group_sockets_have_distinct_identifiers() {
        let registry = standard_registry();
        let input = registry.create_node("NodeGroupInput").unwrap();
        let socket = input.output_by_name("Geometry").unwrap();
        assert_eq!(socket.identifier, "Socket_0");
        assert!(registry.create_node("NodeFrame").unwrap().height.is_some());
    }
}
