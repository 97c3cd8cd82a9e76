// SPDX-License-Identifier: MIT OR Apache-2.0
//! Human-readable description of a tree.
//!
//! The report is meant to be pasted into a conversation, so it lists nodes
//! in tree order with their settings and inputs, followed by every
//! connection as a directed pair of node names.

use noderelay_graph::{Graph, Node, SettingValue, SocketValue};
use std::fmt::Write;

/// Most decimal places a report prints
pub const MAX_PRECISION: u32 = 15;

/// Report formatting options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    /// Decimal places kept for float values, at most [`MAX_PRECISION`]
    pub precision: u32,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self { precision: 3 }
    }
}

impl ReportOptions {
    fn float(&self, x: f32) -> String {
        let precision = self.precision.min(MAX_PRECISION) as i32;
        let factor = 10f64.powi(precision);
        let rounded = (f64::from(x) * factor).round() / factor;
        format!("{rounded:?}")
    }

    fn floats(&self, xs: &[f32]) -> String {
        let items: Vec<String> = xs.iter().map(|x| self.float(*x)).collect();
        format!("[{}]", items.join(", "))
    }

    fn socket_value(&self, value: &SocketValue) -> String {
        match value {
            SocketValue::Bool(b) => bool_text(*b).to_string(),
            SocketValue::Int(i) => i.to_string(),
            SocketValue::Float(x) => self.float(*x),
            SocketValue::Vector(xs) => self.floats(xs),
            SocketValue::Color(xs) => self.floats(xs),
            SocketValue::String(s) => s.clone(),
            SocketValue::Resource { name, .. } => name.clone().unwrap_or_else(|| "None".to_string()),
            SocketValue::Opaque(type_name) => format!("<{type_name}>"),
        }
    }

    fn setting_value(&self, value: &SettingValue) -> String {
        match value {
            SettingValue::Enum(s) | SettingValue::String(s) => s.clone(),
            SettingValue::Bool(b) => bool_text(*b).to_string(),
            SettingValue::Int(i) => i.to_string(),
            SettingValue::Float(x) => self.float(*x),
            SettingValue::Vector(xs) => self.floats(xs),
            SettingValue::Resource { name, .. } => name.clone().unwrap_or_else(|| "None".to_string()),
        }
    }
}

fn bool_text(b: bool) -> &'static str {
    if b {
        "True"
    } else {
        "False"
    }
}

/// `blend_type` -> `Blend Type`
fn title_case(key: &str) -> String {
    key.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars
                .next()
                .map(|first| first.to_uppercase().chain(chars).collect::<String>())
                .unwrap_or_default()
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn write_node(out: &mut String, graph: &Graph, index: usize, node: &Node, options: &ReportOptions) {
    let _ = writeln!(out, "\nNode {}: '{}' (Type: {})", index + 1, node.name, node.kind);
    if !node.label.is_empty() {
        let _ = writeln!(out, "  - Label: {}", node.label);
    }
    for (key, value) in node.settings() {
        let _ = writeln!(
            out,
            "  - Attribute: {} = {}",
            title_case(key),
            options.setting_value(value)
        );
    }

    let inputs: Vec<_> = node.inputs.iter().filter(|s| s.enabled).collect();
    if !inputs.is_empty() {
        out.push_str("  - Inputs:\n");
    }
    for socket in inputs {
        let source = graph.links_into(node.id, &socket.identifier).find_map(|link| {
            let from = graph.node(link.from_node)?;
            let from_socket = from.output(&link.from_socket)?;
            Some((from.name.as_str(), from_socket.name.as_str()))
        });
        match (source, &socket.default_value) {
            (Some((from, from_socket)), _) => {
                let _ = writeln!(
                    out,
                    "    - '{}': Linked from '{from}' (Socket: '{from_socket}')",
                    socket.name
                );
            }
            (None, Some(value)) => {
                let _ = writeln!(out, "    - '{}': Default = {}", socket.name, options.socket_value(value));
            }
            (None, None) => {
                let _ = writeln!(out, "    - '{}'", socket.name);
            }
        }
    }

    let outputs: Vec<_> = node.outputs.iter().filter(|s| s.enabled).collect();
    if !outputs.is_empty() {
        out.push_str("  - Outputs:\n");
    }
    for socket in outputs {
        let _ = writeln!(out, "    - '{}'", socket.name);
    }
}

/// Describe `graph` as plain text
pub fn explain(graph: &Graph, options: &ReportOptions) -> String {
    let mut out = String::new();
    out.push_str("--- NODE GROUP ANALYSIS ---\n");
    let _ = writeln!(out, "Total Nodes: {}\n", graph.node_count());
    out.push_str("--- NODES ---\n");
    for (index, node) in graph.nodes().enumerate() {
        write_node(&mut out, graph, index, node, options);
    }

    out.push_str("\n--- CONNECTIONS ---\n");
    if graph.link_count() == 0 {
        out.push_str("No connections in this node group.\n");
    }
    for (index, link) in graph.links().enumerate() {
        let (Some(from), Some(to)) = (graph.node(link.from_node), graph.node(link.to_node)) else {
            continue;
        };
        let socket_name = |node: &Node, identifier: &str, output: bool| {
            let socket = if output { node.output(identifier) } else { node.input(identifier) };
            socket.map_or_else(|| identifier.to_string(), |s| s.name.clone())
        };
        let _ = writeln!(out, "\nConnection {}:", index + 1);
        let _ = writeln!(
            out,
            "  - From Node: '{}' (Socket: '{}')",
            from.name,
            socket_name(from, &link.from_socket, true)
        );
        let _ = writeln!(
            out,
            "  - To Node:   '{}' (Socket: '{}')",
            to.name,
            socket_name(to, &link.to_socket, false)
        );
    }

    tracing::debug!("Explained {} nodes", graph.node_count());
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use noderelay_graph::standard_registry;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("blend_type"), "Blend Type");
        assert_eq!(title_case("operation"), "Operation");
    }

    #[test]
    fn test_float_precision() {
        let options = ReportOptions::default();
        assert_eq!(options.float(0.123_456), "0.123");
        assert_eq!(options.float(1.0), "1.0");
        assert_eq!(options.floats(&[0.5, 0.25, 1.0]), "[0.5, 0.25, 1.0]");
        assert_eq!(ReportOptions { precision: 1 }.float(0.26), "0.3");

        let unbounded = ReportOptions { precision: u32::MAX };
        assert_eq!(unbounded.float(0.5), "0.5");
        assert!(unbounded.float(0.26).starts_with("0.2599"));
    }

    #[test]
    fn test_empty_graph() {
        let report = explain(&Graph::default(), &ReportOptions::default());
        assert_eq!(
            report,
            "--- NODE GROUP ANALYSIS ---\nTotal Nodes: 0\n\n--- NODES ---\n\n--- CONNECTIONS ---\nNo connections in this node group."
        );
    }

    #[test]
    fn test_report_lists_nodes_and_links() {
        let registry = standard_registry();
        let mut graph = Graph::default();
        let cube = graph.add_node(registry.create_node("GeometryNodeMeshCube").unwrap());
        let output = graph.add_node(registry.create_node("NodeGroupOutput").unwrap());
        graph.link(cube, "Mesh", output, "Socket_1").unwrap();

        let report = explain(&graph, &ReportOptions::default());
        assert!(report.starts_with("--- NODE GROUP ANALYSIS ---\nTotal Nodes: 2\n"));
        assert!(report.contains("\nNode 1: 'Cube' (Type: GeometryNodeMeshCube)\n  - Inputs:\n    - 'Size': Default = [1.0, 1.0, 1.0]\n"));
        assert!(report.contains("    - 'Geometry': Linked from 'Cube' (Socket: 'Mesh')"));
        assert!(report.contains("  - Outputs:\n    - 'Mesh'"));
        assert!(report.ends_with(
            "Connection 1:\n  - From Node: 'Cube' (Socket: 'Mesh')\n  - To Node:   'Group Output' (Socket: 'Geometry')"
        ));
    }

    #[test]
    fn test_settings_and_disabled_sockets() {
        let registry = standard_registry();
        let mut graph = Graph::default();
        let mut math = registry.create_node("ShaderNodeMath").unwrap();
        math.set_setting("operation", SettingValue::Enum("SUBTRACT".into())).unwrap();
        math.label = "Offset".into();
        graph.add_node(math);
        let mut mix = registry.create_node("ShaderNodeMix").unwrap();
        mix.set_setting("data_type", SettingValue::Enum("RGBA".into())).unwrap();
        graph.add_node(mix);

        let report = explain(&graph, &ReportOptions::default());
        assert!(report.contains("  - Label: Offset\n  - Attribute: Operation = SUBTRACT\n"));
        assert!(report.contains("    - 'A': Default = [0.5, 0.5, 0.5, 1.0]"));
        assert_eq!(report.matches("    - 'Result'").count(), 1);
    }
}
