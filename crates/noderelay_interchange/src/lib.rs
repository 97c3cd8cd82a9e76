// SPDX-License-Identifier: MIT OR Apache-2.0
//! JSON interchange and text reports for Node Relay node trees.
//!
//! A tree is exported as a structured document that can be edited outside
//! the host and imported back. Import is tolerant: documents written by
//! hand, or by older versions of the format, are reconstructed as far as
//! possible and whatever could not be applied is reported as a warning.
//!
//! ## Usage
//!
//! ```no_run
//! use noderelay_graph::{standard_registry, Graph, Library};
//! use noderelay_interchange::{export_to_string, ExportOptions, Importer};
//!
//! let registry = standard_registry();
//! let library = Library::new();
//! let mut graph = Graph::default();
//!
//! let text = r#"{"version": "2.0", "nodes": [{"name": "Cube", "type": "GeometryNodeMeshCube"}]}"#;
//! let summary = Importer::new(&registry, &library).import_str(&mut graph, text)?;
//! assert_eq!(summary.nodes_created, 1);
//!
//! let exported = export_to_string(&graph, &ExportOptions::default())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod aliases;
pub mod document;
pub mod error;
pub mod export;
pub mod import;
pub mod report;
pub mod resolve;
pub mod template;
pub mod value;

pub use document::{Document, FormatVersion, LinkRecord, NodeRecord, Outputs, ParsedDocument};
pub use error::{ExportError, ImportError, ImportWarning};
pub use export::{export_document, export_to_string, ExportOptions, DEFAULT_INDENT};
pub use import::{ImportOptions, ImportSummary, Importer, TYPE_RENAMES};
pub use report::{explain, ReportOptions, MAX_PRECISION};
pub use template::{document_template, document_template_text, report_template, REPORT_TEMPLATE};
