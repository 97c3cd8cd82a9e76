// SPDX-License-Identifier: MIT OR Apache-2.0
//! Document schema shared by the exporter and the importer.
//!
//! Two generations of the format exist. Legacy documents carry no version
//! (or a major version below 2), key inputs and link sockets by socket name
//! and store node settings as top-level `operation` / `blend_type` keys.
//! Current documents carry `"version": "2.0"`, key sockets by identifier and
//! keep settings in a `properties` map.
//!
//! Parsing happens in two phases: the envelope must parse or the whole
//! document is rejected, while each node and link record is decoded on its
//! own so that one bad record only costs that record.

use crate::error::{ImportError, ImportWarning};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Document format version
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FormatVersion {
    /// Major version
    pub major: u32,
    /// Minor version
    pub minor: u32,
}

impl FormatVersion {
    /// Name-keyed format without a version marker
    pub const LEGACY: Self = Self { major: 1, minor: 0 };
    /// Identifier-keyed format written by this crate
    pub const CURRENT: Self = Self { major: 2, minor: 0 };

    /// Whether documents of this version use the name-keyed scheme
    pub fn is_legacy(&self) -> bool {
        self.major < Self::CURRENT.major
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for FormatVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (major, minor) = s.split_once('.').unwrap_or((s, "0"));
        let major = major.parse().map_err(|_| format!("invalid major version in '{s}'"))?;
        let minor = minor.parse().map_err(|_| format!("invalid minor version in '{s}'"))?;
        Ok(Self { major, minor })
    }
}

impl Serialize for FormatVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FormatVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Output sockets of a node record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Outputs {
    /// Socket identifiers (current format)
    Identifiers(Vec<String>),
    /// Socket name to output value (legacy format)
    Values(IndexMap<String, Value>),
}

impl Default for Outputs {
    fn default() -> Self {
        Self::Identifiers(Vec::new())
    }
}

impl Outputs {
    fn is_empty(&self) -> bool {
        match self {
            Self::Identifiers(ids) => ids.is_empty(),
            Self::Values(values) => values.is_empty(),
        }
    }
}

/// One node in a document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Node name
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Node label
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Node type tag
    #[serde(rename = "type")]
    pub kind: String,
    /// Position as `[x, y]`
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub location: Option<Vec<f64>>,
    /// Node width
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Node height, for kinds that have one
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Legacy top-level math operation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<Value>,
    /// Legacy top-level blend mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blend_type: Option<Value>,
    /// Node settings
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub properties: IndexMap<String, Value>,
    /// Unlinked input values keyed by socket identifier (or name)
    #[serde(default, deserialize_with = "lenient_or_default")]
    pub inputs: IndexMap<String, Value>,
    /// Output sockets
    #[serde(default, deserialize_with = "lenient_or_default", skip_serializing_if = "Outputs::is_empty")]
    pub outputs: Outputs,
}

impl NodeRecord {
    /// Minimal record of a type
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }

    /// Settings to apply, with legacy top-level keys folded in.
    ///
    /// Entries from `properties` win over the legacy keys.
    pub fn settings(&self) -> impl Iterator<Item = (&str, &Value)> {
        let legacy = [("operation", &self.operation), ("blend_type", &self.blend_type)]
            .into_iter()
            .filter_map(|(key, value)| value.as_ref().map(|v| (key, v)))
            .filter(|(key, _)| !self.properties.contains_key(*key));
        self.properties
            .iter()
            .map(|(k, v)| (k.as_str(), v))
            .chain(legacy)
    }

    /// Location if it holds at least two numbers
    pub fn position(&self) -> Option<[f64; 2]> {
        match self.location.as_deref() {
            Some([x, y, ..]) => Some([*x, *y]),
            _ => None,
        }
    }
}

/// One link in a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRecord {
    /// Source node name
    pub from_node: String,
    /// Source output socket identifier (or name)
    pub from_socket: String,
    /// Target node name
    pub to_node: String,
    /// Target input socket identifier (or name)
    pub to_socket: String,
}

/// A structured node tree description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Format version
    pub version: FormatVersion,
    /// Node records in tree order
    pub nodes: Vec<NodeRecord>,
    /// Link records
    pub links: Vec<LinkRecord>,
}

impl Document {
    /// Empty document in the current format
    pub fn new() -> Self {
        Self {
            version: FormatVersion::CURRENT,
            nodes: Vec::new(),
            links: Vec::new(),
        }
    }

    /// Encode as pretty JSON using `indent` spaces per level
    pub fn to_json(&self, indent: usize) -> Result<String, serde_json::Error> {
        let indent = " ".repeat(indent);
        let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
        let mut buf = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut serializer)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// A document decoded record by record
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    /// Document as far as it could be decoded
    pub document: Document,
    /// Records that were dropped while decoding
    pub warnings: Vec<ImportWarning>,
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    version: Option<Value>,
    #[serde(default)]
    nodes: Vec<Value>,
    #[serde(default)]
    links: Vec<Value>,
}

/// Parse document text.
///
/// Fails only when the text is not JSON or its top level does not have the
/// document shape. Malformed node and link records are dropped and reported
/// as warnings.
pub fn parse(text: &str) -> Result<ParsedDocument, ImportError> {
    let envelope: Envelope = serde_json::from_str(text)?;
    let mut warnings = Vec::new();

    let version = match envelope.version {
        None | Some(Value::Null) => FormatVersion::LEGACY,
        Some(Value::String(s)) => s.parse().unwrap_or_else(|_| {
            warnings.push(ImportWarning::InvalidVersion(s.clone()));
            FormatVersion::CURRENT
        }),
        Some(Value::Number(n)) => n.to_string().parse().unwrap_or_else(|_| {
            warnings.push(ImportWarning::InvalidVersion(n.to_string()));
            FormatVersion::CURRENT
        }),
        Some(other) => {
            warnings.push(ImportWarning::InvalidVersion(other.to_string()));
            FormatVersion::CURRENT
        }
    };

    let mut nodes = Vec::with_capacity(envelope.nodes.len());
    for (index, raw) in envelope.nodes.into_iter().enumerate() {
        let name = raw.get("name").and_then(Value::as_str).map(str::to_string);
        match serde_json::from_value::<NodeRecord>(raw) {
            Ok(record) => nodes.push(record),
            Err(err) => warnings.push(ImportWarning::MalformedNode {
                index,
                name,
                reason: err.to_string(),
            }),
        }
    }

    let mut links = Vec::with_capacity(envelope.links.len());
    for (index, raw) in envelope.links.into_iter().enumerate() {
        match serde_json::from_value::<LinkRecord>(raw) {
            Ok(record) => links.push(record),
            Err(err) => warnings.push(ImportWarning::MalformedLink {
                index,
                reason: err.to_string(),
            }),
        }
    }

    Ok(ParsedDocument {
        document: Document { version, nodes, links },
        warnings,
    })
}

/// Deserialize a field, treating a value of the wrong type as absent
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn lenient_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(lenient(deserializer)?.unwrap_or_default())
}
