// SPDX-License-Identifier: MIT OR Apache-2.0
//! Reconstruction of a live tree from a document.
//!
//! The import is best-effort. Only an unreadable document aborts; every
//! other problem costs the offending record and is reported as an
//! [`ImportWarning`]. A node that cannot be built never enters the name map,
//! so links that reference it are dropped as well.

use crate::aliases::normalize_enum;
use crate::document::{self, Document, FormatVersion, LinkRecord, NodeRecord, Outputs};
use crate::error::{ImportError, ImportWarning};
use crate::resolve::{find_socket, resolve_setting, resolve_socket_value};
use crate::value::narrow;
use noderelay_graph::{Graph, Node, NodeId, NodeRegistry, ResourceLibrary, SocketDirection};
use serde_json::Value;
use std::collections::HashMap;

/// Obsolete type tags and the kinds that replaced them
pub const TYPE_RENAMES: &[(&str, &str)] = &[("ShaderNodeTexMusgrave", "ShaderNodeTexNoise")];

/// Settings a legacy document may carry at the top level of a node
const LEGACY_SETTING_KEYS: &[&str] = &["operation", "blend_type"];

/// Import options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOptions {
    /// Map loosely spelled enum values onto valid identifiers
    pub normalize_enums: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            normalize_enums: true,
        }
    }
}

/// Outcome of a completed import
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSummary {
    /// Version the document declared
    pub version: FormatVersion,
    /// Nodes that were created
    pub nodes_created: usize,
    /// Links present after the import
    pub links_created: usize,
    /// Records that were skipped
    pub warnings: Vec<ImportWarning>,
}

/// Rebuilds trees from documents
pub struct Importer<'a> {
    registry: &'a NodeRegistry,
    resources: &'a dyn ResourceLibrary,
    options: ImportOptions,
}

impl<'a> Importer<'a> {
    /// Create an importer over the host's node kinds and resources
    pub fn new(registry: &'a NodeRegistry, resources: &'a dyn ResourceLibrary) -> Self {
        Self {
            registry,
            resources,
            options: ImportOptions::default(),
        }
    }

    /// Set the import options
    pub fn with_options(mut self, options: ImportOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the contents of `graph` with the tree described by `text`.
    ///
    /// The graph is left untouched when the text cannot be parsed.
    pub fn import_str(&self, graph: &mut Graph, text: &str) -> Result<ImportSummary, ImportError> {
        let parsed = document::parse(text)?;
        let mut summary = self.import_document(graph, &parsed.document);
        let mut warnings = parsed.warnings;
        warnings.append(&mut summary.warnings);
        summary.warnings = warnings;
        Ok(summary)
    }

    /// Replace the contents of `graph` with the tree described by `document`
    pub fn import_document(&self, graph: &mut Graph, document: &Document) -> ImportSummary {
        let legacy = document.version.is_legacy();
        let mut warnings = Vec::new();
        let mut created: HashMap<String, NodeId> = HashMap::new();

        graph.clear();

        for record in &document.nodes {
            let Some(node) = self.build_node(record, &mut warnings) else {
                continue;
            };
            let requested = node.name.clone();
            let id = graph.add_node(node);
            if let Some(assigned) = graph.node(id).map(|n| n.name.clone()) {
                if assigned != requested {
                    warnings.push(ImportWarning::DuplicateName {
                        requested: requested.clone(),
                        assigned,
                    });
                }
            }
            created.insert(record.name.clone().unwrap_or(requested), id);
        }

        for link in &document.links {
            self.build_link(graph, &created, link, &mut warnings);
        }
        // A later link into a single-input socket replaces the earlier one.
        let links_created = graph.link_count();

        tracing::info!(
            "Imported {} of {} nodes and {} of {} links ({} format {})",
            graph.node_count(),
            document.nodes.len(),
            links_created,
            document.links.len(),
            if legacy { "legacy" } else { "current" },
            document.version
        );
        for warning in &warnings {
            tracing::warn!("{warning}");
        }

        ImportSummary {
            version: document.version,
            nodes_created: graph.node_count(),
            links_created,
            warnings,
        }
    }

    /// Type tag to create for a record, applying known renames
    fn resolve_kind<'r>(&self, kind: &'r str) -> Option<&'r str> {
        if self.registry.contains(kind) {
            return Some(kind);
        }
        TYPE_RENAMES
            .iter()
            .find(|(old, new)| *old == kind && self.registry.contains(new))
            .map(|(old, new)| {
                tracing::info!("Node type '{old}' is no longer supported, using '{new}'");
                *new
            })
    }

    fn build_node(&self, record: &NodeRecord, warnings: &mut Vec<ImportWarning>) -> Option<Node> {
        let record_name = record.name.clone().unwrap_or_else(|| "?".to_string());
        let Some(mut node) = self
            .resolve_kind(&record.kind)
            .and_then(|kind| self.registry.create_node(kind))
        else {
            warnings.push(ImportWarning::UnknownNodeType {
                name: record_name,
                kind: record.kind.clone(),
            });
            return None;
        };

        if let Some(name) = &record.name {
            node.name = name.clone();
        }
        node.label = record.label.clone().unwrap_or_default();

        let mut layout = |key: &str, value: f64| {
            let narrowed = narrow(value);
            if narrowed.is_none() {
                warnings.push(ImportWarning::SettingSkipped {
                    node: node.name.clone(),
                    key: key.to_string(),
                    reason: format!("{value} is out of range"),
                });
            }
            narrowed
        };
        let location = record
            .position()
            .and_then(|[x, y]| Some([layout("location", x)?, layout("location", y)?]));
        let width = record.width.and_then(|w| layout("width", w));
        let height = record
            .height
            .filter(|_| node.height.is_some())
            .and_then(|h| layout("height", h));
        if let Some(location) = location {
            node.location = location;
        }
        if let Some(width) = width {
            node.width = width;
        }
        if height.is_some() {
            node.height = height;
        }

        // Settings first: they decide which sockets exist and what they hold.
        for (key, raw) in record.settings() {
            self.apply_setting(&mut node, key, raw, warnings);
        }

        for (key, raw) in &record.inputs {
            self.apply_socket(&mut node, SocketDirection::Input, key, raw, warnings);
        }

        if let Outputs::Values(values) = &record.outputs {
            for (key, raw) in values {
                let has_default = find_socket(&node, SocketDirection::Output, key)
                    .is_some_and(|socket| socket.has_default());
                if has_default {
                    self.apply_socket(&mut node, SocketDirection::Output, key, raw, warnings);
                }
            }
        }

        tracing::debug!("Built node '{}' ({})", node.name, node.kind);
        Some(node)
    }

    fn apply_setting(&self, node: &mut Node, key: &str, raw: &Value, warnings: &mut Vec<ImportWarning>) {
        let skipped = |reason: String| ImportWarning::SettingSkipped {
            node: node.name.clone(),
            key: key.to_string(),
            reason,
        };

        let Some(def) = node.setting_def(key) else {
            // Legacy keys are written for every node; only kinds that have
            // the attribute use them.
            if !LEGACY_SETTING_KEYS.contains(&key) {
                warnings.push(skipped("no such setting".to_string()));
            }
            return;
        };

        let normalize = |value: &str, items: &[String]| {
            if self.options.normalize_enums {
                normalize_enum(value, items)
            } else {
                value.to_string()
            }
        };
        let value = match resolve_setting(def, raw, self.resources, normalize) {
            Ok(value) => value,
            Err(err) => {
                warnings.push(skipped(err.to_string()));
                return;
            }
        };

        let result = node.set_setting(key, value);
        if let Err(err) = result {
            warnings.push(ImportWarning::SettingSkipped {
                node: node.name.clone(),
                key: key.to_string(),
                reason: err.to_string(),
            });
        }
    }

    fn apply_socket(
        &self,
        node: &mut Node,
        direction: SocketDirection,
        key: &str,
        raw: &Value,
        warnings: &mut Vec<ImportWarning>,
    ) {
        let resolved = match find_socket(node, direction, key) {
            None => Err("no such socket".to_string()),
            Some(socket) => resolve_socket_value(socket, raw, self.resources)
                .map(|value| (socket.identifier.clone(), value))
                .map_err(|err| err.to_string()),
        };

        let outcome = resolved.and_then(|(identifier, value)| {
            node.socket_mut(direction, &identifier)
                .ok_or_else(|| "no such socket".to_string())?
                .assign(value)
                .map_err(|err| err.to_string())
        });

        if let Err(reason) = outcome {
            warnings.push(ImportWarning::SocketSkipped {
                node: node.name.clone(),
                socket: key.to_string(),
                reason,
            });
        }
    }

    fn build_link(
        &self,
        graph: &mut Graph,
        created: &HashMap<String, NodeId>,
        link: &LinkRecord,
        warnings: &mut Vec<ImportWarning>,
    ) {
        let (Some(&from_id), Some(&to_id)) = (created.get(&link.from_node), created.get(&link.to_node)) else {
            tracing::debug!(
                "Dropping link {}:{} -> {}:{}, node not in document",
                link.from_node,
                link.from_socket,
                link.to_node,
                link.to_socket
            );
            return;
        };

        let dropped = |reason: String| ImportWarning::LinkDropped {
            from: format!("{}:{}", link.from_node, link.from_socket),
            to: format!("{}:{}", link.to_node, link.to_socket),
            reason,
        };

        let from_socket = graph
            .node(from_id)
            .and_then(|node| find_socket(node, SocketDirection::Output, &link.from_socket))
            .map(|socket| socket.identifier.clone());
        let to_socket = graph
            .node(to_id)
            .and_then(|node| find_socket(node, SocketDirection::Input, &link.to_socket))
            .map(|socket| socket.identifier.clone());

        let (Some(from_socket), Some(to_socket)) = (from_socket, to_socket) else {
            warnings.push(dropped("socket not found".to_string()));
            return;
        };

        if let Err(err) = graph.link(from_id, &from_socket, to_id, &to_socket) {
            warnings.push(dropped(err.to_string()));
        }
    }
}
