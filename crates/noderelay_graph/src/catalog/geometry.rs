// SPDX-License-Identifier: MIT OR Apache-2.0
//! Geometry node kinds.

use crate::node::{NodeCategory, NodeKind, NodeRegistry};
use crate::resource::ResourceKind;
use crate::setting::SettingDef;
use crate::socket::{Socket, SocketType, SocketValue};

fn geometry_in() -> Socket {
    Socket::input("Geometry", SocketType::Geometry)
}

fn geometry_out() -> Socket {
    Socket::output("Geometry", SocketType::Geometry)
}

fn vector_in(name: &str, value: [f32; 3]) -> Socket {
    Socket::input(name, SocketType::Vector).with_default(SocketValue::Vector(value))
}

fn int_in(name: &str, value: i32) -> Socket {
    Socket::input(name, SocketType::Int).with_default(SocketValue::Int(value))
}

fn bool_in(name: &str, value: bool) -> Socket {
    Socket::input(name, SocketType::Bool).with_default(SocketValue::Bool(value))
}

/// Register all geometry node kinds
pub fn register(registry: &mut NodeRegistry) {
    registry.register(
        NodeKind::new("GeometryNodeMeshCube", "Cube", NodeCategory::Geometry)
            .input(vector_in("Size", [1.0, 1.0, 1.0]))
            .input(int_in("Vertices X", 2))
            .input(int_in("Vertices Y", 2))
            .input(int_in("Vertices Z", 2))
            .output(Socket::output("Mesh", SocketType::Geometry))
            .output(Socket::output("UV Map", SocketType::Vector)),
    );

    registry.register(
        NodeKind::new("GeometryNodeSetMaterial", "Set Material", NodeCategory::Geometry)
            .input(geometry_in())
            .input(bool_in("Selection", true))
            .input(Socket::input("Material", SocketType::Material).with_default(SocketValue::Resource {
                kind: ResourceKind::Material,
                name: None,
            }))
            .output(geometry_out()),
    );

    registry.register(
        NodeKind::new("GeometryNodeTransform", "Transform Geometry", NodeCategory::Geometry)
            .input(geometry_in())
            .input(vector_in("Translation", [0.0; 3]))
            .input(vector_in("Rotation", [0.0; 3]))
            .input(vector_in("Scale", [1.0, 1.0, 1.0]))
            .output(geometry_out()),
    );

    registry.register(
        NodeKind::new("GeometryNodeJoinGeometry", "Join Geometry", NodeCategory::Geometry)
            .input(geometry_in().multi_input())
            .output(geometry_out()),
    );

    registry.register(
        NodeKind::new("GeometryNodeObjectInfo", "Object Info", NodeCategory::Input)
            .setting(SettingDef::enumeration("transform_space", &["ORIGINAL", "RELATIVE"], "ORIGINAL"))
            .input(Socket::input("Object", SocketType::Object).with_default(SocketValue::Resource {
                kind: ResourceKind::Object,
                name: None,
            }))
            .input(bool_in("As Instance", false))
            .output(Socket::output("Location", SocketType::Vector))
            .output(Socket::output("Rotation", SocketType::Vector))
            .output(Socket::output("Scale", SocketType::Vector))
            .output(geometry_out()),
    );

    registry.register(
        NodeKind::new("GeometryNodeSubdivideMesh", "Subdivide Mesh", NodeCategory::Geometry)
            .input(Socket::input("Mesh", SocketType::Geometry))
            .input(int_in("Level", 1))
            .output(Socket::output("Mesh", SocketType::Geometry)),
    );

    registry.register(
        NodeKind::new("FunctionNodeInputString", "String", NodeCategory::Input)
            .setting(SettingDef::string("string", ""))
            .output(Socket::output("String", SocketType::String)),
    );

    registry.register(
        NodeKind::new("FunctionNodeInputVector", "Vector", NodeCategory::Input)
            .setting(SettingDef::vector("vector", &[0.0, 0.0, 0.0]))
            .output(Socket::output("Vector", SocketType::Vector)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_defaults() {
        let mut registry = NodeRegistry::new();
        register(&mut registry);
        let cube = registry.create_node("GeometryNodeMeshCube").unwrap();
        assert_eq!(
            cube.input("Size").unwrap().default_value,
            Some(SocketValue::Vector([1.0, 1.0, 1.0]))
        );
        assert_eq!(cube.input("Vertices X").unwrap().default_value, Some(SocketValue::Int(2)));
    }

    #[test]
    fn test_join_accepts_many_links() {
        let mut registry = NodeRegistry::new();
        register(&mut registry);
        let join = registry.create_node("GeometryNodeJoinGeometry").unwrap();
        assert!(join.input("Geometry").unwrap().multi_input);
    }
}
