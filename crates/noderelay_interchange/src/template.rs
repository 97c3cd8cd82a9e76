// SPDX-License-Identifier: MIT OR Apache-2.0
//! Starting points for writing a tree by hand.

use crate::document::{Document, NodeRecord};
use crate::error::ExportError;

/// Example report for writing instructions in the report format
pub const REPORT_TEMPLATE: &str = "--- NODES ---

Node 1: 'Group Input' (Type: NodeGroupInput)

Node 2: 'My New Node' (Type: GeometryNodeMeshCube)
  - Inputs:
    - 'Size': Default = [1.0, 1.0, 1.0]

Node 3: 'Group Output' (Type: NodeGroupOutput)


--- CONNECTIONS ---

Connection 1:
  - From Node: 'My New Node' (Socket: 'Mesh')
  - To Node:   'Group Output' (Socket: 'Geometry')
";

fn placed(name: &str, kind: &str, x: f64) -> NodeRecord {
    let mut record = NodeRecord::new(kind);
    record.name = Some(name.to_string());
    record.location = Some(vec![x, 0.0]);
    record
}

/// Minimal document holding a group input and a group output
pub fn document_template() -> Document {
    let mut document = Document::new();
    document.nodes.push(placed("Group Input", "NodeGroupInput", 0.0));
    document.nodes.push(placed("Group Output", "NodeGroupOutput", 400.0));
    document
}

/// [`document_template`] as text
pub fn document_template_text(indent: usize) -> Result<String, ExportError> {
    Ok(document_template().to_json(indent)?)
}

/// Example report text
pub fn report_template() -> &'static str {
    REPORT_TEMPLATE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::FormatVersion;

    #[test]
    fn test_document_template() {
        let document = document_template();
        assert_eq!(document.version, FormatVersion::CURRENT);
        assert_eq!(document.nodes.len(), 2);
        assert_eq!(document.nodes[1].position(), Some([400.0, 0.0]));
        assert!(document.links.is_empty());
    }

    #[test]
    fn test_template_text_is_stable() {
        let first = document_template_text(4).unwrap();
        let second = document_template_text(4).unwrap();
        assert_eq!(first, second);
        assert!(first.contains("\"type\": \"NodeGroupOutput\""));
    }

    #[test]
    fn test_report_template_shape() {
        assert!(report_template().starts_with("--- NODES ---"));
        assert!(report_template().contains("--- CONNECTIONS ---"));
    }
}
