// SPDX-License-Identifier: MIT OR Apache-2.0
//! Errors and per-record warnings.
//!
//! Errors abort an operation. Warnings describe a single record that was
//! skipped while the operation as a whole went on.

use std::fmt;

/// Error that aborts an export
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// A value has no document representation
    #[error("Cannot serialize '{field}' of node '{node}': {reason}")]
    Unserializable {
        /// Node name
        node: String,
        /// Setting key or socket identifier
        field: String,
        /// What made the value unconvertible
        reason: String,
    },

    /// JSON encoding failed
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error that aborts an import
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// Text is not a document
    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// A record that was skipped during import
#[derive(Debug, Clone, PartialEq)]
pub enum ImportWarning {
    /// The version marker could not be read; the current format was assumed
    InvalidVersion(String),

    /// A node record could not be decoded
    MalformedNode {
        /// Position in the node list
        index: usize,
        /// Name, when one could be read
        name: Option<String>,
        /// Decoder message
        reason: String,
    },

    /// A link record could not be decoded
    MalformedLink {
        /// Position in the link list
        index: usize,
        /// Decoder message
        reason: String,
    },

    /// The host has no node kind for a type tag
    UnknownNodeType {
        /// Node name from the record
        name: String,
        /// Unsupported type tag
        kind: String,
    },

    /// Two records asked for the same node name
    DuplicateName {
        /// Requested name
        requested: String,
        /// Name the node received
        assigned: String,
    },

    /// A setting could not be applied
    SettingSkipped {
        /// Node name
        node: String,
        /// Setting key
        key: String,
        /// Why it was skipped
        reason: String,
    },

    /// A socket value could not be applied
    SocketSkipped {
        /// Node name
        node: String,
        /// Socket identifier or name from the record
        socket: String,
        /// Why it was skipped
        reason: String,
    },

    /// A link between existing nodes could not be created
    LinkDropped {
        /// Source as `node:socket`
        from: String,
        /// Target as `node:socket`
        to: String,
        /// Why it was dropped
        reason: String,
    },
}

impl fmt::Display for ImportWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidVersion(version) => {
                write!(f, "Unreadable version '{version}', assuming current format")
            }
            Self::MalformedNode { index, name, reason } => match name {
                Some(name) => write!(f, "Failed to create node '{name}': {reason}"),
                None => write!(f, "Failed to create node #{index}: {reason}"),
            },
            Self::MalformedLink { index, reason } => {
                write!(f, "Skipped link #{index}: {reason}")
            }
            Self::UnknownNodeType { name, kind } => {
                write!(f, "Failed to create node '{name}': unknown node type '{kind}'")
            }
            Self::DuplicateName { requested, assigned } => {
                write!(f, "Node name '{requested}' used twice, renamed to '{assigned}'")
            }
            Self::SettingSkipped { node, key, reason } => {
                write!(f, "Could not set {key} on '{node}': {reason}")
            }
            Self::SocketSkipped { node, socket, reason } => {
                write!(f, "Could not set socket '{socket}' on '{node}': {reason}")
            }
            Self::LinkDropped { from, to, reason } => {
                write!(f, "Failed to create link {from} -> {to}: {reason}")
            }
        }
    }
}
