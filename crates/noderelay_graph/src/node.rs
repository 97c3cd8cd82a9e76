// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions for the host node tree.

use crate::setting::{SettingDef, SettingError, SettingValue};
use crate::socket::{Socket, SocketDirection};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Width given to nodes whose kind does not declare one
pub const DEFAULT_NODE_WIDTH: f32 = 140.0;

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Node kind category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeCategory {
    /// Group interface nodes
    Group,
    /// Constants and scene inputs
    Input,
    /// Tree outputs
    Output,
    /// Shading closures
    Shader,
    /// Procedural and image textures
    Texture,
    /// Math and conversion
    Converter,
    /// Color mixing
    Color,
    /// Geometry operations
    Geometry,
    /// Frames and reroutes
    Layout,
}

/// Enables a socket only while an enum setting holds one of a set of values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityRule {
    /// Socket identifier
    pub socket: String,
    /// Direction of the socket
    pub direction: SocketDirection,
    /// Controlling setting key
    pub setting: String,
    /// Setting values for which the socket is enabled
    pub values: Vec<String>,
}

/// Node kind definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeKind {
    /// Type tag
    pub id: String,
    /// Display name
    pub name: String,
    /// Category
    pub category: NodeCategory,
    /// Input sockets of a fresh node
    pub inputs: Vec<Socket>,
    /// Output sockets of a fresh node
    pub outputs: Vec<Socket>,
    /// Settings allow-list
    pub settings: Vec<SettingDef>,
    /// Socket availability rules
    pub availability: Vec<AvailabilityRule>,
    /// Width of a fresh node
    pub default_width: f32,
    /// Whether nodes of this kind have a user-controlled height
    pub supports_height: bool,
}

impl NodeKind {
    /// Create an empty kind
    pub fn new(id: &str, name: &str, category: NodeCategory) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            category,
            inputs: Vec::new(),
            outputs: Vec::new(),
            settings: Vec::new(),
            availability: Vec::new(),
            default_width: DEFAULT_NODE_WIDTH,
            supports_height: false,
        }
    }

    /// Add an input socket
    pub fn input(mut self, socket: Socket) -> Self {
        self.inputs.push(socket);
        self
    }

    /// Add an output socket
    pub fn output(mut self, socket: Socket) -> Self {
        self.outputs.push(socket);
        self
    }

    /// Add a setting
    pub fn setting(mut self, def: SettingDef) -> Self {
        self.settings.push(def);
        self
    }

    /// Enable an input only for some values of an enum setting
    pub fn input_when(mut self, socket: &str, setting: &str, values: &[&str]) -> Self {
        self.availability.push(AvailabilityRule {
            socket: socket.to_string(),
            direction: SocketDirection::Input,
            setting: setting.to_string(),
            values: values.iter().map(|v| (*v).to_string()).collect(),
        });
        self
    }

    /// Enable an output only for some values of an enum setting
    pub fn output_when(mut self, socket: &str, setting: &str, values: &[&str]) -> Self {
        self.availability.push(AvailabilityRule {
            socket: socket.to_string(),
            direction: SocketDirection::Output,
            setting: setting.to_string(),
            values: values.iter().map(|v| (*v).to_string()).collect(),
        });
        self
    }

    /// Set the default width
    pub fn width(mut self, width: f32) -> Self {
        self.default_width = width;
        self
    }

    /// Give nodes of this kind a height
    pub fn with_height(mut self) -> Self {
        self.supports_height = true;
        self
    }
}

/// A node instance in the tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique instance ID
    pub id: NodeId,
    /// Type tag of the node kind
    pub kind: String,
    /// Name, unique within the tree
    pub name: String,
    /// Label shown instead of the name when non-empty
    pub label: String,
    /// Position in the editor
    pub location: [f32; 2],
    /// Width in the editor
    pub width: f32,
    /// Height, for kinds that have one
    pub height: Option<f32>,
    /// Input sockets
    pub inputs: Vec<Socket>,
    /// Output sockets
    pub outputs: Vec<Socket>,
    settings: IndexMap<String, SettingValue>,
    schema: Vec<SettingDef>,
    availability: Vec<AvailabilityRule>,
}

impl Node {
    /// Create a new node from a kind definition
    pub fn new(kind: &NodeKind) -> Self {
        let mut node = Self {
            id: NodeId::new(),
            kind: kind.id.clone(),
            name: kind.name.clone(),
            label: String::new(),
            location: [0.0, 0.0],
            width: kind.default_width,
            height: kind.supports_height.then_some(100.0),
            inputs: kind.inputs.clone(),
            outputs: kind.outputs.clone(),
            settings: kind
                .settings
                .iter()
                .map(|def| (def.key.clone(), def.default.clone()))
                .collect(),
            schema: kind.settings.clone(),
            availability: kind.availability.clone(),
        };
        node.refresh_availability();
        node
    }

    /// Set the location
    pub fn with_location(mut self, x: f32, y: f32) -> Self {
        self.location = [x, y];
        self
    }

    /// Get a setting value
    pub fn setting(&self, key: &str) -> Option<&SettingValue> {
        self.settings.get(key)
    }

    /// Get a setting declaration
    pub fn setting_def(&self, key: &str) -> Option<&SettingDef> {
        self.schema.iter().find(|def| def.key == key)
    }

    /// All settings in declaration order
    pub fn settings(&self) -> impl Iterator<Item = (&str, &SettingValue)> {
        self.settings.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Settings whose value can be written as a plain document value
    pub fn representable_settings(&self) -> impl Iterator<Item = (&str, &SettingValue)> {
        self.schema
            .iter()
            .filter(|def| def.kind.is_representable())
            .filter_map(|def| {
                self.settings
                    .get(&def.key)
                    .map(|value| (def.key.as_str(), value))
            })
    }

    /// Write a setting after validating it against the node kind.
    ///
    /// Socket availability is recomputed afterwards, since enum settings
    /// decide which sockets exist.
    pub fn set_setting(&mut self, key: &str, value: SettingValue) -> Result<(), SettingError> {
        let def = self
            .setting_def(key)
            .ok_or_else(|| SettingError::UnknownSetting(key.to_string()))?;
        def.check(&value)?;
        self.settings.insert(key.to_string(), value);
        self.refresh_availability();
        Ok(())
    }

    /// Recompute which sockets are enabled
    pub fn refresh_availability(&mut self) {
        for rule in &self.availability {
            let enabled = match self.settings.get(&rule.setting) {
                Some(SettingValue::Enum(value)) => rule.values.iter().any(|v| v == value),
                _ => true,
            };
            let sockets = match rule.direction {
                SocketDirection::Input => &mut self.inputs,
                SocketDirection::Output => &mut self.outputs,
            };
            if let Some(socket) = sockets.iter_mut().find(|s| s.identifier == rule.socket) {
                socket.enabled = enabled;
            }
        }
    }

    /// Get an input socket by identifier
    pub fn input(&self, identifier: &str) -> Option<&Socket> {
        self.inputs.iter().find(|s| s.identifier == identifier)
    }

    /// Get a mutable input socket by identifier
    pub fn input_mut(&mut self, identifier: &str) -> Option<&mut Socket> {
        self.inputs.iter_mut().find(|s| s.identifier == identifier)
    }

    /// Get an output socket by identifier
    pub fn output(&self, identifier: &str) -> Option<&Socket> {
        self.outputs.iter().find(|s| s.identifier == identifier)
    }

    /// Get a mutable output socket by identifier
    pub fn output_mut(&mut self, identifier: &str) -> Option<&mut Socket> {
        self.outputs.iter_mut().find(|s| s.identifier == identifier)
    }

    /// Get an input socket by display name, preferring enabled sockets
    pub fn input_by_name(&self, name: &str) -> Option<&Socket> {
        first_by_name(&self.inputs, name)
    }

    /// Get an output socket by display name, preferring enabled sockets
    pub fn output_by_name(&self, name: &str) -> Option<&Socket> {
        first_by_name(&self.outputs, name)
    }

    /// Get a socket by direction and identifier
    pub fn socket(&self, direction: SocketDirection, identifier: &str) -> Option<&Socket> {
        match direction {
            SocketDirection::Input => self.input(identifier),
            SocketDirection::Output => self.output(identifier),
        }
    }

    /// Get a mutable socket by direction and identifier
    pub fn socket_mut(&mut self, direction: SocketDirection, identifier: &str) -> Option<&mut Socket> {
        match direction {
            SocketDirection::Input => self.input_mut(identifier),
            SocketDirection::Output => self.output_mut(identifier),
        }
    }
}

fn first_by_name<'a>(sockets: &'a [Socket], name: &str) -> Option<&'a Socket> {
    sockets
        .iter()
        .find(|s| s.enabled && s.name == name)
        .or_else(|| sockets.iter().find(|s| s.name == name))
}

/// Registry of available node kinds
#[derive(Debug, Clone, Default)]
pub struct NodeRegistry {
    /// Registered kinds by type tag
    kinds: IndexMap<String, NodeKind>,
}

impl NodeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node kind
    pub fn register(&mut self, kind: NodeKind) {
        self.kinds.insert(kind.id.clone(), kind);
    }

    /// Get a node kind by type tag
    pub fn get(&self, id: &str) -> Option<&NodeKind> {
        self.kinds.get(id)
    }

    /// Whether a type tag is known
    pub fn contains(&self, id: &str) -> bool {
        self.kinds.contains_key(id)
    }

    /// Get kinds by category
    pub fn kinds_in_category(&self, category: NodeCategory) -> impl Iterator<Item = &NodeKind> {
        self.kinds.values().filter(move |k| k.category == category)
    }

    /// Create a node from a type tag
    pub fn create_node(&self, id: &str) -> Option<Node> {
        self.get(id).map(Node::new)
    }
}
