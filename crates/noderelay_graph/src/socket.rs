// SPDX-License-Identifier: MIT OR Apache-2.0
//! Socket definitions for node inputs/outputs.

use crate::resource::ResourceKind;
use serde::{Deserialize, Serialize};

/// Socket direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SocketDirection {
    /// Input socket
    Input,
    /// Output socket
    Output,
}

/// Data type carried by a socket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SocketType {
    /// Floating point value
    Float,
    /// Integer value
    Int,
    /// Boolean value
    Bool,
    /// 3D vector
    Vector,
    /// Color (RGBA)
    Color,
    /// String value
    String,
    /// Shader closure (no literal value)
    Shader,
    /// Geometry stream (no literal value)
    Geometry,
    /// Material reference
    Material,
    /// Object reference
    Object,
    /// Image reference
    Image,
    /// Host-specific type
    Custom(String),
}

impl SocketType {
    /// Host-side type tag, as the host editor names it.
    pub fn tag(&self) -> &str {
        match self {
            Self::Float => "NodeSocketFloat",
            Self::Int => "NodeSocketInt",
            Self::Bool => "NodeSocketBool",
            Self::Vector => "NodeSocketVector",
            Self::Color => "NodeSocketColor",
            Self::String => "NodeSocketString",
            Self::Shader => "NodeSocketShader",
            Self::Geometry => "NodeSocketGeometry",
            Self::Material => "NodeSocketMaterial",
            Self::Object => "NodeSocketObject",
            Self::Image => "NodeSocketImage",
            Self::Custom(tag) => tag,
        }
    }

    /// Whether sockets of this type hold a single number
    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Float | Self::Int | Self::Bool)
    }
}

/// A socket on a node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Socket {
    /// Stable identifier, unique within the node
    pub identifier: String,
    /// Display name (may repeat across sockets)
    pub name: String,
    /// Socket direction
    pub direction: SocketDirection,
    /// Data type
    pub socket_type: SocketType,
    /// Literal value used while the socket is unlinked
    pub default_value: Option<SocketValue>,
    /// Whether the socket is currently available on the node
    pub enabled: bool,
    /// Whether multiple links may end in this socket
    pub multi_input: bool,
}

impl Socket {
    /// Create a new input socket whose identifier equals its name
    pub fn input(name: impl Into<String>, socket_type: SocketType) -> Self {
        let name = name.into();
        Self {
            identifier: name.clone(),
            name,
            direction: SocketDirection::Input,
            socket_type,
            default_value: None,
            enabled: true,
            multi_input: false,
        }
    }

    /// Create a new output socket whose identifier equals its name
    pub fn output(name: impl Into<String>, socket_type: SocketType) -> Self {
        Self {
            direction: SocketDirection::Output,
            ..Self::input(name, socket_type)
        }
    }

    /// Override the identifier
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = identifier.into();
        self
    }

    /// Set the default value
    pub fn with_default(mut self, value: SocketValue) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Allow several incoming links
    pub fn multi_input(mut self) -> Self {
        self.multi_input = true;
        self
    }

    /// Whether the socket carries a literal value at all
    pub fn has_default(&self) -> bool {
        self.default_value.is_some()
    }

    /// Whether the socket refers to a material resource.
    ///
    /// Covers both typed material sockets and hosts that only signal it by
    /// name.
    pub fn is_material_bound(&self) -> bool {
        self.socket_type == SocketType::Material
            || self.socket_type.tag().ends_with("Material")
            || self.name.contains("Material")
    }

    /// Replace the default value, checking that its shape fits this socket.
    pub fn assign(&mut self, value: SocketValue) -> Result<(), AssignError> {
        let Some(current) = &self.default_value else {
            return Err(AssignError::NoDefault(self.identifier.clone()));
        };
        if !current.same_shape(&value) {
            return Err(AssignError::ShapeMismatch {
                socket: self.identifier.clone(),
                expected: current.shape_name(),
                found: value.shape_name(),
            });
        }
        self.default_value = Some(value);
        Ok(())
    }
}

/// Literal value stored in a socket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SocketValue {
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i32),
    /// Float
    Float(f32),
    /// 3D vector
    Vector([f32; 3]),
    /// Color
    Color([f32; 4]),
    /// String
    String(String),
    /// Reference to a named resource (`None` when unset)
    Resource {
        /// Kind of resource
        kind: ResourceKind,
        /// Resource name
        name: Option<String>,
    },
    /// Host value with no literal representation
    Opaque(String),
}

impl SocketValue {
    /// Whether two values have the same shape (variant and resource kind)
    pub fn same_shape(&self, other: &SocketValue) -> bool {
        match (self, other) {
            (Self::Resource { kind: a, .. }, Self::Resource { kind: b, .. }) => a == b,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }

    /// Short name of the value shape, for messages
    pub fn shape_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Vector(_) => "vector",
            Self::Color(_) => "color",
            Self::String(_) => "string",
            Self::Resource { .. } => "resource",
            Self::Opaque(_) => "opaque",
        }
    }
}

/// Error when writing a socket value
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AssignError {
    /// The socket carries no literal value
    #[error("Socket '{0}' has no default value")]
    NoDefault(String),

    /// The value has the wrong shape
    #[error("Socket '{socket}' expects {expected}, got {found}")]
    ShapeMismatch {
        /// Socket identifier
        socket: String,
        /// Expected shape
        expected: &'static str,
        /// Supplied shape
        found: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_checks_shape() {
        let mut socket = Socket::input("Scale", SocketType::Float)
            .with_default(SocketValue::Float(5.0));
        assert!(socket.assign(SocketValue::Float(2.0)).is_ok());
        assert_eq!(socket.default_value, Some(SocketValue::Float(2.0)));

        let err = socket.assign(SocketValue::Vector([1.0, 2.0, 3.0])).unwrap_err();
        assert!(matches!(err, AssignError::ShapeMismatch { expected: "float", .. }));
    }

    #[test]
    fn test_assign_without_default() {
        let mut socket = Socket::input("Surface", SocketType::Shader);
        assert_eq!(
            socket.assign(SocketValue::Float(1.0)),
            Err(AssignError::NoDefault("Surface".to_string()))
        );
    }

    #[test]
    fn test_resource_kind_must_match() {
        let material = SocketValue::Resource { kind: ResourceKind::Material, name: None };
        let object = SocketValue::Resource { kind: ResourceKind::Object, name: Some("Cube".into()) };
        assert!(!material.same_shape(&object));
        assert!(material.same_shape(&SocketValue::Resource {
            kind: ResourceKind::Material,
            name: Some("Steel".into()),
        }));
    }

    #[test]
    fn test_material_binding() {
        assert!(Socket::input("Material", SocketType::Material).is_material_bound());
        assert!(Socket::input("Material Name", SocketType::String).is_material_bound());
        assert!(!Socket::input("Name", SocketType::String).is_material_bound());
    }
}
