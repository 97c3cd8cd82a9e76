// SPDX-License-Identifier: MIT OR Apache-2.0
//! Per-node settings and the allow-list that describes them.
//!
//! Every node kind declares the settings it exposes through [`SettingDef`]s.
//! This declaration replaces runtime reflection: the interchange layer only
//! ever sees the settings listed here, and only those whose kind is
//! representable as a primitive, string or fixed-length numeric vector.

use crate::resource::ResourceKind;
use serde::{Deserialize, Serialize};

/// Kind of value a setting accepts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SettingKind {
    /// One of a closed set of identifiers
    Enum {
        /// Allowed identifiers
        items: Vec<String>,
    },
    /// Boolean flag
    Bool,
    /// Integer in an inclusive range
    Int {
        /// Smallest accepted value
        min: i64,
        /// Largest accepted value
        max: i64,
    },
    /// Floating point number
    Float,
    /// Free text
    String,
    /// Fixed-length numeric vector
    Vector {
        /// Number of components
        len: usize,
    },
    /// Pointer to an external resource
    Resource(ResourceKind),
}

impl SettingKind {
    /// Enum kind from a list of identifiers
    pub fn enumeration(items: &[&str]) -> Self {
        Self::Enum {
            items: items.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    /// Whether values of this kind can be written as plain document values
    pub fn is_representable(&self) -> bool {
        !matches!(self, Self::Resource(_))
    }

    /// Short name, for messages
    pub fn name(&self) -> &'static str {
        match self {
            Self::Enum { .. } => "enum",
            Self::Bool => "bool",
            Self::Int { .. } => "int",
            Self::Float => "float",
            Self::String => "string",
            Self::Vector { .. } => "vector",
            Self::Resource(_) => "resource",
        }
    }
}

/// Value of a setting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SettingValue {
    /// Enum identifier
    Enum(String),
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Float
    Float(f32),
    /// String
    String(String),
    /// Numeric vector
    Vector(Vec<f32>),
    /// Resource reference
    Resource {
        /// Kind of resource
        kind: ResourceKind,
        /// Resource name, `None` when unset
        name: Option<String>,
    },
}

/// Declaration of one setting on a node kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingDef {
    /// Attribute key
    pub key: String,
    /// Accepted kind
    pub kind: SettingKind,
    /// Value on a freshly created node
    pub default: SettingValue,
}

impl SettingDef {
    /// Enum setting
    pub fn enumeration(key: &str, items: &[&str], default: &str) -> Self {
        Self {
            key: key.to_string(),
            kind: SettingKind::enumeration(items),
            default: SettingValue::Enum(default.to_string()),
        }
    }

    /// Boolean setting
    pub fn boolean(key: &str, default: bool) -> Self {
        Self {
            key: key.to_string(),
            kind: SettingKind::Bool,
            default: SettingValue::Bool(default),
        }
    }

    /// Integer setting
    pub fn int(key: &str, min: i64, max: i64, default: i64) -> Self {
        Self {
            key: key.to_string(),
            kind: SettingKind::Int { min, max },
            default: SettingValue::Int(default),
        }
    }

    /// Float setting
    pub fn float(key: &str, default: f32) -> Self {
        Self {
            key: key.to_string(),
            kind: SettingKind::Float,
            default: SettingValue::Float(default),
        }
    }

    /// String setting
    pub fn string(key: &str, default: &str) -> Self {
        Self {
            key: key.to_string(),
            kind: SettingKind::String,
            default: SettingValue::String(default.to_string()),
        }
    }

    /// Vector setting; the length is taken from the default
    pub fn vector(key: &str, default: &[f32]) -> Self {
        Self {
            key: key.to_string(),
            kind: SettingKind::Vector { len: default.len() },
            default: SettingValue::Vector(default.to_vec()),
        }
    }

    /// Resource pointer setting
    pub fn resource(key: &str, kind: ResourceKind) -> Self {
        Self {
            key: key.to_string(),
            kind: SettingKind::Resource(kind),
            default: SettingValue::Resource { kind, name: None },
        }
    }

    /// Check that a value is acceptable for this setting
    pub fn check(&self, value: &SettingValue) -> Result<(), SettingError> {
        let mismatch = || SettingError::TypeMismatch {
            key: self.key.clone(),
            expected: self.kind.name(),
        };
        match (&self.kind, value) {
            (SettingKind::Enum { items }, SettingValue::Enum(item)) => {
                if items.iter().any(|i| i == item) {
                    Ok(())
                } else {
                    Err(SettingError::InvalidEnum {
                        key: self.key.clone(),
                        value: item.clone(),
                    })
                }
            }
            (SettingKind::Int { min, max }, SettingValue::Int(v)) => {
                if (*min..=*max).contains(v) {
                    Ok(())
                } else {
                    Err(SettingError::OutOfRange {
                        key: self.key.clone(),
                        value: *v,
                    })
                }
            }
            (SettingKind::Vector { len }, SettingValue::Vector(v)) => {
                if v.len() == *len {
                    Ok(())
                } else {
                    Err(mismatch())
                }
            }
            (SettingKind::Resource(kind), SettingValue::Resource { kind: other, .. }) => {
                if kind == other {
                    Ok(())
                } else {
                    Err(mismatch())
                }
            }
            (SettingKind::Bool, SettingValue::Bool(_))
            | (SettingKind::Float, SettingValue::Float(_))
            | (SettingKind::String, SettingValue::String(_)) => Ok(()),
            _ => Err(mismatch()),
        }
    }
}

/// Error when writing a setting
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SettingError {
    /// The node kind has no such setting
    #[error("Unknown setting '{0}'")]
    UnknownSetting(String),

    /// The value has the wrong kind
    #[error("Setting '{key}' expects a {expected} value")]
    TypeMismatch {
        /// Setting key
        key: String,
        /// Expected kind name
        expected: &'static str,
    },

    /// Enum identifier not in the allowed set
    #[error("'{value}' is not a valid value for '{key}'")]
    InvalidEnum {
        /// Setting key
        key: String,
        /// Rejected identifier
        value: String,
    },

    /// Integer outside the declared range
    #[error("{value} is out of range for '{key}'")]
    OutOfRange {
        /// Setting key
        key: String,
        /// Rejected value
        value: i64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_membership() {
        let def = SettingDef::enumeration("operation", &["ADD", "SUBTRACT"], "ADD");
        assert!(def.check(&SettingValue::Enum("SUBTRACT".into())).is_ok());
        assert_eq!(
            def.check(&SettingValue::Enum("SUB".into())),
            Err(SettingError::InvalidEnum {
                key: "operation".into(),
                value: "SUB".into()
            })
        );
    }

    #[test]
    fn test_int_range_and_vector_length() {
        let def = SettingDef::int("resolution", 1, 64, 4);
        assert!(def.check(&SettingValue::Int(64)).is_ok());
        assert!(matches!(def.check(&SettingValue::Int(0)), Err(SettingError::OutOfRange { .. })));

        let def = SettingDef::vector("offset", &[0.0, 0.0, 0.0]);
        assert!(def.check(&SettingValue::Vector(vec![1.0, 2.0, 3.0])).is_ok());
        assert!(def.check(&SettingValue::Vector(vec![1.0])).is_err());
    }

    #[test]
    fn test_resource_settings_are_not_representable() {
        assert!(!SettingDef::resource("image", ResourceKind::Image).kind.is_representable());
        assert!(SettingDef::boolean("use_clamp", false).kind.is_representable());
    }
}
