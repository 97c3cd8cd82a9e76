// SPDX-License-Identifier: MIT OR Apache-2.0
//! Host node-tree model for Node Relay.
//!
//! This crate stands in for the host editor's node tree: the data that the
//! interchange layer reads on export and rebuilds on import.
//!
//! ## Architecture
//!
//! - Nodes created from registered kinds, identified by a unique name
//! - Sockets with stable identifiers and (possibly repeated) display names
//! - Per-kind settings allow-lists instead of runtime reflection
//! - Socket availability driven by enum settings
//! - Links between output and input sockets
//! - Named external resources (materials, objects, images)

pub mod catalog;
pub mod graph;
pub mod link;
pub mod node;
pub mod resource;
pub mod setting;
pub mod socket;

pub use catalog::standard_registry;
pub use graph::{Graph, LinkError};
pub use link::{Link, LinkId};
pub use node::{AvailabilityRule, Node, NodeCategory, NodeId, NodeKind, NodeRegistry};
pub use resource::{Library, ResourceKind, ResourceLibrary};
pub use setting::{SettingDef, SettingError, SettingKind, SettingValue};
pub use socket::{AssignError, Socket, SocketDirection, SocketType, SocketValue};
