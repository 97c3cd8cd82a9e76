// SPDX-License-Identifier: MIT OR Apache-2.0
//! Conversion between live values and document values.

use noderelay_graph::{SettingKind, SettingValue, SocketValue};
use serde_json::{Number, Value};

/// Value that has no document representation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Unconvertible {
    /// Host type without a literal form
    #[error("opaque value of type {0}")]
    Opaque(String),

    /// NaN or infinity
    #[error("non-finite number {0}")]
    NonFinite(f64),

    /// Resource pointers are not plain values
    #[error("resource pointers are not representable")]
    Resource,
}

/// Document value that does not fit a live value
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("expected {expected}, got {found}")]
pub struct CoerceError {
    /// Shape the live value needs
    pub expected: String,
    /// Short description of the document value
    pub found: String,
}

impl CoerceError {
    fn new(expected: impl Into<String>, found: &Value) -> Self {
        Self {
            expected: expected.into(),
            found: describe(found),
        }
    }
}

/// Short description of a document value, for messages
pub fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "bool".to_string(),
        Value::Number(_) => "number".to_string(),
        Value::String(s) => format!("string '{s}'"),
        Value::Array(items) => format!("list of {}", items.len()),
        Value::Object(_) => "object".to_string(),
    }
}

/// Widen an `f32` through its shortest decimal form so that `0.1` stays `0.1`
pub fn widen(x: f32) -> f64 {
    x.to_string().parse().unwrap_or(f64::from(x))
}

/// Narrow a document number to `f32`, rejecting values that overflow it
pub fn narrow(x: f64) -> Option<f32> {
    let narrowed = x as f32;
    narrowed.is_finite().then_some(narrowed)
}

fn number(x: f32) -> Result<Value, Unconvertible> {
    Number::from_f64(widen(x))
        .map(Value::Number)
        .ok_or(Unconvertible::NonFinite(f64::from(x)))
}

fn numbers(xs: &[f32]) -> Result<Value, Unconvertible> {
    xs.iter().copied().map(number).collect::<Result<Vec<_>, _>>().map(Value::Array)
}

/// Document value of a setting
pub fn setting_to_json(value: &SettingValue) -> Result<Value, Unconvertible> {
    match value {
        SettingValue::Enum(s) | SettingValue::String(s) => Ok(Value::String(s.clone())),
        SettingValue::Bool(b) => Ok(Value::Bool(*b)),
        SettingValue::Int(i) => Ok(Value::from(*i)),
        SettingValue::Float(x) => number(*x),
        SettingValue::Vector(xs) => numbers(xs),
        SettingValue::Resource { .. } => Err(Unconvertible::Resource),
    }
}

/// Document value of a socket default.
///
/// Resource references are written by name.
pub fn socket_to_json(value: &SocketValue) -> Result<Value, Unconvertible> {
    match value {
        SocketValue::Bool(b) => Ok(Value::Bool(*b)),
        SocketValue::Int(i) => Ok(Value::from(*i)),
        SocketValue::Float(x) => number(*x),
        SocketValue::Vector(xs) => numbers(xs),
        SocketValue::Color(xs) => numbers(xs),
        SocketValue::String(s) => Ok(Value::String(s.clone())),
        SocketValue::Resource { name, .. } => Ok(name.clone().map_or(Value::Null, Value::String)),
        SocketValue::Opaque(type_name) => Err(Unconvertible::Opaque(type_name.clone())),
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::Bool(b) => Some(i64::from(*b)),
        Value::String(s) => {
            let s = s.trim();
            s.parse().ok().or_else(|| s.parse::<f64>().ok().map(|f| f.trunc() as i64))
        }
        _ => None,
    }
}

/// Coerce a document value into the native type of a setting.
///
/// Integers, floats and strings accept any value that converts cleanly.
/// Enum values are matched through `normalize` before the node validates
/// them. Resource settings are resolved separately and rejected here.
pub fn coerce_setting(
    kind: &SettingKind,
    raw: &Value,
    normalize: impl Fn(&str, &[String]) -> String,
) -> Result<SettingValue, CoerceError> {
    match kind {
        SettingKind::Enum { items } => match raw {
            Value::String(s) => Ok(SettingValue::Enum(normalize(s.as_str(), items.as_slice()))),
            _ => Err(CoerceError::new("enum identifier", raw)),
        },
        SettingKind::Bool => match raw {
            Value::Bool(b) => Ok(SettingValue::Bool(*b)),
            Value::Number(n) => match n.as_f64() {
                Some(f) if f == 0.0 => Ok(SettingValue::Bool(false)),
                Some(f) if f == 1.0 => Ok(SettingValue::Bool(true)),
                _ => Err(CoerceError::new("bool", raw)),
            },
            _ => Err(CoerceError::new("bool", raw)),
        },
        SettingKind::Int { .. } => as_i64(raw)
            .map(SettingValue::Int)
            .ok_or_else(|| CoerceError::new("integer", raw)),
        SettingKind::Float => as_f64(raw)
            .and_then(narrow)
            .map(SettingValue::Float)
            .ok_or_else(|| CoerceError::new("float", raw)),
        SettingKind::String => match raw {
            Value::String(s) => Ok(SettingValue::String(s.clone())),
            Value::Number(n) => Ok(SettingValue::String(n.to_string())),
            Value::Bool(b) => Ok(SettingValue::String(b.to_string())),
            _ => Err(CoerceError::new("string", raw)),
        },
        SettingKind::Vector { len } => match raw {
            Value::Array(items) if items.len() == *len => items
                .iter()
                .map(|item| item.as_f64().and_then(narrow))
                .collect::<Option<Vec<_>>>()
                .map(SettingValue::Vector)
                .ok_or_else(|| CoerceError::new(format!("list of {len} numbers"), raw)),
            _ => Err(CoerceError::new(format!("list of {len} numbers"), raw)),
        },
        SettingKind::Resource(kind) => Err(CoerceError::new(kind.display_name(), raw)),
    }
}

fn fixed<const N: usize>(raw: &Value) -> Option<[f32; N]> {
    let items = raw.as_array()?;
    if items.len() != N {
        return None;
    }
    let mut out = [0.0; N];
    for (slot, item) in out.iter_mut().zip(items) {
        *slot = narrow(item.as_f64()?)?;
    }
    Some(out)
}

/// Convert a document value into the shape of `template`, if the shapes
/// agree.
///
/// Resource sockets only accept `null` here (clearing the reference); names
/// are resolved against the host's resource library elsewhere.
pub fn socket_from_json(template: &SocketValue, raw: &Value) -> Option<SocketValue> {
    match template {
        SocketValue::Float(_) => match raw {
            Value::Number(n) => n.as_f64().and_then(narrow).map(SocketValue::Float),
            Value::Bool(b) => Some(SocketValue::Float(if *b { 1.0 } else { 0.0 })),
            _ => None,
        },
        SocketValue::Int(_) => match raw {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
                .and_then(|i| i32::try_from(i).ok())
                .map(SocketValue::Int),
            Value::Bool(b) => Some(SocketValue::Int(i32::from(*b))),
            _ => None,
        },
        SocketValue::Bool(_) => match raw {
            Value::Bool(b) => Some(SocketValue::Bool(*b)),
            Value::Number(n) => n.as_f64().map(|f| SocketValue::Bool(f != 0.0)),
            _ => None,
        },
        SocketValue::Vector(_) => fixed::<3>(raw).map(SocketValue::Vector),
        SocketValue::Color(_) => fixed::<4>(raw).map(SocketValue::Color),
        SocketValue::String(_) => raw.as_str().map(|s| SocketValue::String(s.to_string())),
        SocketValue::Resource { kind, .. } => raw.is_null().then_some(SocketValue::Resource {
            kind: *kind,
            name: None,
        }),
        SocketValue::Opaque(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aliases::normalize_enum;
    use noderelay_graph::ResourceKind;
    use serde_json::json;

    #[test]
    fn test_widen_keeps_short_decimals() {
        assert_eq!(widen(0.1), 0.1);
        assert_eq!(widen(-300.0), -300.0);
        assert_eq!(socket_to_json(&SocketValue::Float(0.2)).unwrap(), json!(0.2));
    }

    #[test]
    fn test_socket_to_json() {
        assert_eq!(
            socket_to_json(&SocketValue::Color([1.0, 0.5, 0.25, 1.0])).unwrap(),
            json!([1.0, 0.5, 0.25, 1.0])
        );
        assert_eq!(
            socket_to_json(&SocketValue::Resource {
                kind: ResourceKind::Material,
                name: Some("Steel".into())
            })
            .unwrap(),
            json!("Steel")
        );
        assert_eq!(
            socket_to_json(&SocketValue::Resource { kind: ResourceKind::Object, name: None }).unwrap(),
            Value::Null
        );
        assert_eq!(
            socket_to_json(&SocketValue::Opaque("bpy_struct".into())),
            Err(Unconvertible::Opaque("bpy_struct".into()))
        );
        assert!(matches!(
            socket_to_json(&SocketValue::Float(f32::NAN)),
            Err(Unconvertible::NonFinite(_))
        ));
    }

    #[test]
    fn test_setting_to_json() {
        assert_eq!(setting_to_json(&SettingValue::Enum("ADD".into())).unwrap(), json!("ADD"));
        assert_eq!(setting_to_json(&SettingValue::Int(4)).unwrap(), json!(4));
        assert_eq!(setting_to_json(&SettingValue::Vector(vec![1.0, 2.0])).unwrap(), json!([1.0, 2.0]));
        assert_eq!(
            setting_to_json(&SettingValue::Resource { kind: ResourceKind::Image, name: None }),
            Err(Unconvertible::Resource)
        );
    }

    #[test]
    fn test_coerce_numbers() {
        let int = SettingKind::Int { min: 0, max: 10 };
        assert_eq!(coerce_setting(&int, &json!(3), normalize_enum), Ok(SettingValue::Int(3)));
        assert_eq!(coerce_setting(&int, &json!(2.7), normalize_enum), Ok(SettingValue::Int(2)));
        assert_eq!(coerce_setting(&int, &json!("7"), normalize_enum), Ok(SettingValue::Int(7)));
        assert!(coerce_setting(&int, &json!([1]), normalize_enum).is_err());

        assert_eq!(
            coerce_setting(&SettingKind::Float, &json!("0.5"), normalize_enum),
            Ok(SettingValue::Float(0.5))
        );
        assert_eq!(
            coerce_setting(&SettingKind::String, &json!(12), normalize_enum),
            Ok(SettingValue::String("12".into()))
        );
    }

    #[test]
    fn test_coerce_enum_and_bool() {
        let kind = SettingKind::enumeration(&["ADD", "SUBTRACT"]);
        assert_eq!(
            coerce_setting(&kind, &json!("sub"), normalize_enum),
            Ok(SettingValue::Enum("SUBTRACT".into()))
        );
        assert!(coerce_setting(&kind, &json!(1), normalize_enum).is_err());

        assert_eq!(
            coerce_setting(&SettingKind::Bool, &json!(1), normalize_enum),
            Ok(SettingValue::Bool(true))
        );
        assert!(coerce_setting(&SettingKind::Bool, &json!("yes"), normalize_enum).is_err());
    }

    #[test]
    fn test_coerce_vector_length() {
        let kind = SettingKind::Vector { len: 3 };
        assert_eq!(
            coerce_setting(&kind, &json!([1, 2, 3]), normalize_enum),
            Ok(SettingValue::Vector(vec![1.0, 2.0, 3.0]))
        );
        assert!(coerce_setting(&kind, &json!([1, 2]), normalize_enum).is_err());
    }

    #[test]
    fn test_numbers_beyond_f32_are_rejected() {
        assert_eq!(narrow(0.5), Some(0.5));
        assert_eq!(narrow(1e39), None);
        assert_eq!(narrow(-1e300), None);

        assert!(coerce_setting(&SettingKind::Float, &json!(1e39), normalize_enum).is_err());
        assert!(coerce_setting(&SettingKind::Float, &json!("1e39"), normalize_enum).is_err());
        assert!(coerce_setting(&SettingKind::Vector { len: 2 }, &json!([0, 1e39]), normalize_enum).is_err());

        assert_eq!(socket_from_json(&SocketValue::Float(0.0), &json!(1e39)), None);
        assert_eq!(socket_from_json(&SocketValue::Vector([0.0; 3]), &json!([1, 2, 1e300])), None);
    }

    #[test]
    fn test_socket_from_json_shapes() {
        let float = SocketValue::Float(0.0);
        assert_eq!(socket_from_json(&float, &json!(2)), Some(SocketValue::Float(2.0)));
        assert_eq!(socket_from_json(&float, &json!([2])), None);

        let int = SocketValue::Int(0);
        assert_eq!(socket_from_json(&int, &json!(3.0)), Some(SocketValue::Int(3)));
        assert_eq!(socket_from_json(&int, &json!(3.5)), None);

        let vector = SocketValue::Vector([0.0; 3]);
        assert_eq!(
            socket_from_json(&vector, &json!([1, 2, 3])),
            Some(SocketValue::Vector([1.0, 2.0, 3.0]))
        );
        assert_eq!(socket_from_json(&vector, &json!([1, 2, 3, 4])), None);

        let material = SocketValue::Resource { kind: ResourceKind::Material, name: Some("A".into()) };
        assert_eq!(
            socket_from_json(&material, &Value::Null),
            Some(SocketValue::Resource { kind: ResourceKind::Material, name: None })
        );
        assert_eq!(socket_from_json(&material, &json!("A")), None);
    }
}
