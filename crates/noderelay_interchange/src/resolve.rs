// SPDX-License-Identifier: MIT OR Apache-2.0
//! Ordered resolution strategies used while rebuilding a tree.
//!
//! Each lookup is a short chain of strategies tried in turn; the first one
//! that yields a match wins.

use crate::value::{coerce_setting, describe, socket_from_json, CoerceError};
use noderelay_graph::{
    Node, ResourceKind, ResourceLibrary, SettingDef, SettingKind, SettingValue, Socket,
    SocketDirection, SocketValue,
};
use serde_json::Value;

/// Find a socket by identifier, falling back to its display name
pub fn find_socket<'a>(node: &'a Node, direction: SocketDirection, key: &str) -> Option<&'a Socket> {
    node.socket(direction, key).or_else(|| match direction {
        SocketDirection::Input => node.input_by_name(key),
        SocketDirection::Output => node.output_by_name(key),
    })
}

/// Why a document value could not be applied to a socket
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResolveError {
    /// The socket has no literal value to set
    #[error("socket has no default value")]
    NoDefault,

    /// A named resource is missing from the host
    #[error("{} '{name}' not found", .kind.display_name())]
    ResourceNotFound {
        /// Resource kind
        kind: ResourceKind,
        /// Requested name
        name: String,
    },

    /// No strategy could adapt the value
    #[error("expected {expected}, got {found}")]
    Mismatch {
        /// Shape the socket holds
        expected: &'static str,
        /// Description of the document value
        found: String,
    },

    /// Setting value could not be coerced
    #[error(transparent)]
    Coerce(#[from] CoerceError),
}

type Strategy = fn(&Socket, &SocketValue, &Value, &dyn ResourceLibrary) -> Option<SocketValue>;

/// Strategies for socket values, in the order they are tried
const SOCKET_STRATEGIES: &[(&str, Strategy)] = &[
    ("resource lookup", by_resource),
    ("direct", direct),
    ("first element", first_element),
];

/// A string naming a resource, for sockets bound to one
fn by_resource(
    socket: &Socket,
    template: &SocketValue,
    raw: &Value,
    resources: &dyn ResourceLibrary,
) -> Option<SocketValue> {
    let name = raw.as_str()?;
    match template {
        SocketValue::Resource { kind, .. } => {
            let found = resources.find(*kind, name)?;
            Some(SocketValue::Resource {
                kind: *kind,
                name: Some(found),
            })
        }
        SocketValue::String(_) if socket.is_material_bound() => resources
            .find(ResourceKind::Material, name)
            .map(SocketValue::String),
        _ => None,
    }
}

fn direct(
    _socket: &Socket,
    template: &SocketValue,
    raw: &Value,
    _resources: &dyn ResourceLibrary,
) -> Option<SocketValue> {
    socket_from_json(template, raw)
}

/// A list written against a scalar socket: its first element is used.
///
/// This applies to lists of any length, so longer lists lose their tail.
fn first_element(
    socket: &Socket,
    template: &SocketValue,
    raw: &Value,
    _resources: &dyn ResourceLibrary,
) -> Option<SocketValue> {
    if !socket.socket_type.is_scalar() {
        return None;
    }
    let first = raw.as_array()?.first()?;
    socket_from_json(template, first)
}

/// Adapt a document value to a socket
pub fn resolve_socket_value(
    socket: &Socket,
    raw: &Value,
    resources: &dyn ResourceLibrary,
) -> Result<SocketValue, ResolveError> {
    let template = socket.default_value.as_ref().ok_or(ResolveError::NoDefault)?;

    for (label, strategy) in SOCKET_STRATEGIES {
        if let Some(value) = strategy(socket, template, raw, resources) {
            tracing::trace!("Socket '{}' resolved by {}", socket.identifier, label);
            return Ok(value);
        }
    }

    match (template, raw) {
        (SocketValue::Resource { kind, .. }, Value::String(name)) => Err(ResolveError::ResourceNotFound {
            kind: *kind,
            name: name.clone(),
        }),
        _ => Err(ResolveError::Mismatch {
            expected: template.shape_name(),
            found: describe(raw),
        }),
    }
}

/// Adapt a document value to a setting
pub fn resolve_setting(
    def: &SettingDef,
    raw: &Value,
    resources: &dyn ResourceLibrary,
    normalize: impl Fn(&str, &[String]) -> String,
) -> Result<SettingValue, ResolveError> {
    if let SettingKind::Resource(kind) = def.kind {
        return match raw {
            Value::Null => Ok(SettingValue::Resource { kind, name: None }),
            Value::String(name) => resources
                .find(kind, name)
                .map(|found| SettingValue::Resource {
                    kind,
                    name: Some(found),
                })
                .ok_or_else(|| ResolveError::ResourceNotFound {
                    kind,
                    name: name.clone(),
                }),
            _ => Err(ResolveError::Mismatch {
                expected: "resource",
                found: describe(raw),
            }),
        };
    }
    Ok(coerce_setting(&def.kind, raw, normalize)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aliases::normalize_enum;
    use noderelay_graph::{standard_registry, Library, SocketType};
    use serde_json::json;

    fn library() -> Library {
        Library::new()
            .with(ResourceKind::Material, "Steel")
            .with(ResourceKind::Image, "bricks.png")
    }

    #[test]
    fn test_identifier_before_name() {
        let registry = standard_registry();
        let mix = registry.create_node("ShaderNodeMix").unwrap();

        let socket = find_socket(&mix, SocketDirection::Input, "B_Vector").unwrap();
        assert_eq!(socket.identifier, "B_Vector");

        let socket = find_socket(&mix, SocketDirection::Input, "B").unwrap();
        assert_eq!(socket.identifier, "B_Float");

        let socket = find_socket(&mix, SocketDirection::Output, "Result").unwrap();
        assert_eq!(socket.identifier, "Result_Float");

        assert!(find_socket(&mix, SocketDirection::Input, "Nope").is_none());
    }

    #[test]
    fn test_first_element_into_scalar() {
        let socket = Socket::input("Scale", SocketType::Float).with_default(SocketValue::Float(5.0));
        assert_eq!(
            resolve_socket_value(&socket, &json!([2.5]), &library()),
            Ok(SocketValue::Float(2.5))
        );
        assert_eq!(
            resolve_socket_value(&socket, &json!([3.0, 4.0, 5.0]), &library()),
            Ok(SocketValue::Float(3.0))
        );
        assert!(matches!(
            resolve_socket_value(&socket, &json!([]), &library()),
            Err(ResolveError::Mismatch { expected: "float", .. })
        ));

        let text = Socket::input("String", SocketType::String).with_default(SocketValue::String(String::new()));
        assert!(matches!(
            resolve_socket_value(&text, &json!(["a"]), &library()),
            Err(ResolveError::Mismatch { expected: "string", .. })
        ));
    }

    #[test]
    fn test_material_lookup() {
        let socket = Socket::input("Material", SocketType::Material).with_default(SocketValue::Resource {
            kind: ResourceKind::Material,
            name: None,
        });
        assert_eq!(
            resolve_socket_value(&socket, &json!("Steel"), &library()),
            Ok(SocketValue::Resource {
                kind: ResourceKind::Material,
                name: Some("Steel".into())
            })
        );
        assert_eq!(
            resolve_socket_value(&socket, &json!("Gold"), &library()),
            Err(ResolveError::ResourceNotFound {
                kind: ResourceKind::Material,
                name: "Gold".into()
            })
        );
    }

    #[test]
    fn test_material_named_string_socket_falls_back_to_literal() {
        let socket = Socket::input("Material Name", SocketType::String)
            .with_default(SocketValue::String(String::new()));
        assert_eq!(
            resolve_socket_value(&socket, &json!("Steel"), &library()),
            Ok(SocketValue::String("Steel".into()))
        );
        assert_eq!(
            resolve_socket_value(&socket, &json!("Unknown"), &library()),
            Ok(SocketValue::String("Unknown".into()))
        );
    }

    #[test]
    fn test_socket_without_default() {
        let socket = Socket::input("Surface", SocketType::Shader);
        assert_eq!(
            resolve_socket_value(&socket, &json!(1.0), &library()),
            Err(ResolveError::NoDefault)
        );
    }

    #[test]
    fn test_resource_setting() {
        let def = SettingDef::resource("image", ResourceKind::Image);
        assert_eq!(
            resolve_setting(&def, &json!("bricks.png"), &library(), normalize_enum),
            Ok(SettingValue::Resource {
                kind: ResourceKind::Image,
                name: Some("bricks.png".into())
            })
        );
        assert!(resolve_setting(&def, &json!("missing.png"), &library(), normalize_enum).is_err());

        let def = SettingDef::float("projection_blend", 0.0);
        assert_eq!(
            resolve_setting(&def, &json!(1), &library(), normalize_enum),
            Ok(SettingValue::Float(1.0))
        );
    }
}
