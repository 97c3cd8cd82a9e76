// SPDX-License-Identifier: MIT OR Apache-2.0
//! Export of a live tree into a document.

use crate::document::{Document, FormatVersion, LinkRecord, NodeRecord, Outputs};
use crate::error::ExportError;
use crate::value::{setting_to_json, socket_to_json, widen};
use noderelay_graph::{Graph, Node};

/// Indentation used when none is configured
pub const DEFAULT_INDENT: usize = 4;

/// Export options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    /// Spaces per indentation level
    pub indent: usize,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
        }
    }
}

fn node_record(graph: &Graph, node: &Node) -> Result<NodeRecord, ExportError> {
    let unserializable = |field: &str, reason: String| ExportError::Unserializable {
        node: node.name.clone(),
        field: field.to_string(),
        reason,
    };

    let mut record = NodeRecord::new(node.kind.clone());
    record.name = Some(node.name.clone());
    record.label = Some(node.label.clone());
    record.location = Some(node.location.iter().copied().map(widen).collect());
    record.width = Some(widen(node.width));
    record.height = node.height.map(widen);

    for (key, value) in node.representable_settings() {
        let json = setting_to_json(value).map_err(|e| unserializable(key, e.to_string()))?;
        record.properties.insert(key.to_string(), json);
    }

    for socket in &node.inputs {
        let Some(value) = &socket.default_value else {
            continue;
        };
        if graph.is_input_linked(node.id, &socket.identifier) {
            continue;
        }
        let json = socket_to_json(value).map_err(|e| unserializable(&socket.identifier, e.to_string()))?;
        record.inputs.insert(socket.identifier.clone(), json);
    }

    record.outputs = Outputs::Identifiers(node.outputs.iter().map(|s| s.identifier.clone()).collect());
    Ok(record)
}

/// Describe a tree as a current-format document.
///
/// Fails when a socket holds a value without a document representation.
pub fn export_document(graph: &Graph) -> Result<Document, ExportError> {
    let nodes = graph
        .nodes()
        .map(|node| node_record(graph, node))
        .collect::<Result<Vec<_>, _>>()?;

    let mut links = Vec::with_capacity(graph.link_count());
    for link in graph.links() {
        let (Some(from), Some(to)) = (graph.node(link.from_node), graph.node(link.to_node)) else {
            tracing::debug!("Skipping link {:?} with a missing node", link.id);
            continue;
        };
        if from.output(&link.from_socket).is_none() || to.input(&link.to_socket).is_none() {
            tracing::debug!("Skipping link {:?} with a missing socket", link.id);
            continue;
        }
        links.push(LinkRecord {
            from_node: from.name.clone(),
            from_socket: link.from_socket.clone(),
            to_node: to.name.clone(),
            to_socket: link.to_socket.clone(),
        });
    }

    Ok(Document {
        version: FormatVersion::CURRENT,
        nodes,
        links,
    })
}

/// Describe a tree as document text
pub fn export_to_string(graph: &Graph, options: &ExportOptions) -> Result<String, ExportError> {
    let document = export_document(graph)?;
    let text = document.to_json(options.indent)?;
    tracing::info!(
        "Exported {} nodes and {} links",
        document.nodes.len(),
        document.links.len()
    );
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use noderelay_graph::{standard_registry, SettingValue, SocketValue};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_node_record_contents() {
        let registry = standard_registry();
        let mut graph = Graph::default();

        let mut math = registry.create_node("ShaderNodeMath").unwrap().with_location(10.0, -20.5);
        math.label = "Double".to_string();
        math.set_setting("operation", SettingValue::Enum("MULTIPLY".into())).unwrap();
        math.input_mut("Value_001").unwrap().default_value = Some(SocketValue::Float(2.0));
        graph.add_node(math);

        let document = export_document(&graph).unwrap();
        let record = &document.nodes[0];
        assert_eq!(record.name.as_deref(), Some("Math"));
        assert_eq!(record.label.as_deref(), Some("Double"));
        assert_eq!(record.kind, "ShaderNodeMath");
        assert_eq!(record.location, Some(vec![10.0, -20.5]));
        assert_eq!(record.width, Some(140.0));
        assert_eq!(record.height, None);
        assert_eq!(record.properties["operation"], json!("MULTIPLY"));
        assert_eq!(record.properties["use_clamp"], json!(false));
        assert_eq!(record.inputs["Value_001"], json!(2.0));
        assert_eq!(record.inputs.len(), 3);
        assert_eq!(record.outputs, Outputs::Identifiers(vec!["Value".into()]));
    }

    #[test]
    fn test_linked_inputs_are_omitted() {
        let registry = standard_registry();
        let mut graph = Graph::default();
        let value = graph.add_node(registry.create_node("ShaderNodeValue").unwrap());
        let math = graph.add_node(registry.create_node("ShaderNodeMath").unwrap());
        graph.link(value, "Value", math, "Value").unwrap();

        let document = export_document(&graph).unwrap();
        let inputs: Vec<_> = document.nodes[1].inputs.keys().cloned().collect();
        assert_eq!(inputs, vec!["Value_001".to_string(), "Value_002".to_string()]);
        assert_eq!(
            document.links,
            vec![LinkRecord {
                from_node: "Value".into(),
                from_socket: "Value".into(),
                to_node: "Math".into(),
                to_socket: "Value".into(),
            }]
        );
    }

    #[test]
    fn test_resource_settings_are_omitted() {
        let registry = standard_registry();
        let mut graph = Graph::default();
        graph.add_node(registry.create_node("ShaderNodeTexImage").unwrap());

        let document = export_document(&graph).unwrap();
        let properties = &document.nodes[0].properties;
        assert!(!properties.contains_key("image"));
        assert_eq!(properties["interpolation"], json!("Linear"));
    }

    #[test]
    fn test_height_only_for_kinds_with_height() {
        let registry = standard_registry();
        let mut graph = Graph::default();
        graph.add_node(registry.create_node("NodeFrame").unwrap());
        let document = export_document(&graph).unwrap();
        assert_eq!(document.nodes[0].height, Some(100.0));
    }

    #[test]
    fn test_opaque_value_fails_export() {
        let registry = standard_registry();
        let mut graph = Graph::default();
        let mut node = registry.create_node("ShaderNodeMath").unwrap();
        node.input_mut("Value").unwrap().default_value = Some(SocketValue::Opaque("PyCapsule".into()));
        graph.add_node(node);

        let err = export_to_string(&graph, &ExportOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            ExportError::Unserializable { ref node, ref field, .. } if node == "Math" && field == "Value"
        ));
    }

    #[test]
    fn test_text_uses_configured_indent() {
        let mut graph = Graph::default();
        graph.add_node(standard_registry().create_node("NodeGroupInput").unwrap());
        let text = export_to_string(&graph, &ExportOptions { indent: 4 }).unwrap();
        assert!(text.starts_with("{\n    \"version\": \"2.0\",\n    \"nodes\": ["));
    }
}
