// SPDX-License-Identifier: MIT OR Apache-2.0
//! Relay commands.
//!
//! Each command moves one thing through the clipboard: a document out of
//! or into the active tree, a text report, or one of the templates. Commands
//! never fail outright; the outcome carries a status, a severity and the
//! message shown to the user.

use crate::clipboard::{Clipboard, ClipboardError};
use crate::settings::RelaySettings;
use noderelay_graph::{Graph, NodeRegistry, ResourceLibrary};
use noderelay_interchange::{
    document_template_text, explain, export_to_string, report_template, ExportError, ImportError, ImportWarning,
    Importer,
};

/// The commands offered by the relay panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelayCommand {
    /// Copy the active tree as a document
    ExportDocument,
    /// Rebuild the active tree from a document
    ImportDocument,
    /// Copy a minimal document
    CopyDocumentTemplate,
    /// Copy a text report of the active tree
    ExplainGraph,
    /// Copy an example report
    CopyReportTemplate,
}

impl RelayCommand {
    /// All commands, in panel order
    pub const ALL: [RelayCommand; 5] = [
        RelayCommand::ExportDocument,
        RelayCommand::ImportDocument,
        RelayCommand::CopyDocumentTemplate,
        RelayCommand::ExplainGraph,
        RelayCommand::CopyReportTemplate,
    ];

    /// Stable identifier
    pub fn id(&self) -> &'static str {
        match self {
            RelayCommand::ExportDocument => "relay.export_document",
            RelayCommand::ImportDocument => "relay.import_document",
            RelayCommand::CopyDocumentTemplate => "relay.copy_document_template",
            RelayCommand::ExplainGraph => "relay.explain_graph",
            RelayCommand::CopyReportTemplate => "relay.copy_report_template",
        }
    }

    /// Button label
    pub fn label(&self) -> &'static str {
        match self {
            RelayCommand::ExportDocument => "Export Nodes to JSON",
            RelayCommand::ImportDocument => "Import Nodes from JSON",
            RelayCommand::CopyDocumentTemplate => "Copy JSON Template",
            RelayCommand::ExplainGraph => "Explain Nodes to Text",
            RelayCommand::CopyReportTemplate => "Copy Text Template",
        }
    }

    /// Tooltip text
    pub fn description(&self) -> &'static str {
        match self {
            RelayCommand::ExportDocument => {
                "Copies the node tree as a machine-readable JSON table. Ideal for precise AI editing and backup"
            }
            RelayCommand::ImportDocument => {
                "Deletes the current tree and rebuilds it from a JSON table in the clipboard. Use with caution!"
            }
            RelayCommand::CopyDocumentTemplate => {
                "Copies a minimal JSON template to start a new node tree from scratch"
            }
            RelayCommand::ExplainGraph => {
                "Creates a detailed, human-readable text report of the node tree on the clipboard"
            }
            RelayCommand::CopyReportTemplate => "Copies a simple text template to write instructions for an AI",
        }
    }

    /// Whether the command works on the active tree
    pub fn needs_graph(&self) -> bool {
        matches!(
            self,
            RelayCommand::ExportDocument | RelayCommand::ImportDocument | RelayCommand::ExplainGraph
        )
    }
}

/// Whether a command ran to the end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    /// The command completed
    Finished,
    /// The command stopped without changing anything
    Cancelled,
}

/// Severity of the message reported to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReportLevel {
    /// Plain confirmation
    Info,
    /// Completed with skipped records
    Warning,
    /// Nothing was done
    Error,
}

/// Result of running a command
#[derive(Debug, Clone, PartialEq)]
pub struct CommandOutcome {
    /// Whether the command ran to the end
    pub status: CommandStatus,
    /// Severity of `message`
    pub level: ReportLevel,
    /// Message for the user
    pub message: String,
    /// Records skipped during an import
    pub warnings: Vec<ImportWarning>,
}

impl CommandOutcome {
    fn finished(message: impl Into<String>) -> Self {
        Self {
            status: CommandStatus::Finished,
            level: ReportLevel::Info,
            message: message.into(),
            warnings: Vec::new(),
        }
    }

    fn cancelled(message: impl Into<String>) -> Self {
        Self {
            status: CommandStatus::Cancelled,
            level: ReportLevel::Error,
            message: message.into(),
            warnings: Vec::new(),
        }
    }

    /// Whether the command completed
    pub fn is_finished(&self) -> bool {
        self.status == CommandStatus::Finished
    }
}

/// Why a command was cancelled
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The command needs a tree but none is open
    #[error("No active node tree")]
    NoActiveTree,

    /// Clipboard access failed
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),

    /// The tree could not be exported
    #[error("JSON Export Failed: {0}")]
    Export(#[from] ExportError),

    /// The clipboard does not hold a document
    #[error("Invalid JSON in clipboard.")]
    Import(#[from] ImportError),
}

/// Everything a command may touch: the active tree, the host's node kinds
/// and resources, the clipboard and the settings.
pub struct RelayHost {
    /// Tree open in the editor, if any
    pub graph: Option<Graph>,
    /// Node kinds known to the host
    pub registry: NodeRegistry,
    /// Named resources known to the host
    pub resources: Box<dyn ResourceLibrary>,
    /// Text buffer
    pub clipboard: Box<dyn Clipboard>,
    /// Relay settings
    pub settings: RelaySettings,
}

impl RelayHost {
    /// Create a host without an open tree
    pub fn new(
        registry: NodeRegistry,
        resources: Box<dyn ResourceLibrary>,
        clipboard: Box<dyn Clipboard>,
        settings: RelaySettings,
    ) -> Self {
        Self {
            graph: None,
            registry,
            resources,
            clipboard,
            settings,
        }
    }

    /// Open a tree
    pub fn with_graph(mut self, graph: Graph) -> Self {
        self.graph = Some(graph);
        self
    }

    /// Whether `command` can run now
    pub fn can_run(&self, command: RelayCommand) -> bool {
        !command.needs_graph() || self.graph.is_some()
    }

    /// Run a command
    pub fn run(&mut self, command: RelayCommand) -> CommandOutcome {
        tracing::debug!("Running {}", command.id());
        let result = match command {
            RelayCommand::ExportDocument => self.export_document(),
            RelayCommand::ImportDocument => self.import_document(),
            RelayCommand::CopyDocumentTemplate => self.copy_document_template(),
            RelayCommand::ExplainGraph => self.explain_graph(),
            RelayCommand::CopyReportTemplate => self.copy_report_template(),
        };

        match result {
            Ok(outcome) => {
                match outcome.level {
                    ReportLevel::Info => tracing::info!("{}", outcome.message),
                    _ => tracing::warn!("{}", outcome.message),
                }
                outcome
            }
            Err(err) => {
                tracing::error!("{} failed: {err}", command.id());
                CommandOutcome::cancelled(err.to_string())
            }
        }
    }

    fn export_document(&mut self) -> Result<CommandOutcome, CommandError> {
        let graph = self.graph.as_ref().ok_or(CommandError::NoActiveTree)?;
        let text = export_to_string(graph, &self.settings.export_options())?;
        self.clipboard.set_text(&text)?;
        Ok(CommandOutcome::finished("Node tree exported to clipboard as JSON."))
    }

    fn import_document(&mut self) -> Result<CommandOutcome, CommandError> {
        let graph = self.graph.as_mut().ok_or(CommandError::NoActiveTree)?;
        let text = self.clipboard.get_text()?;
        let summary = Importer::new(&self.registry, self.resources.as_ref())
            .with_options(self.settings.import_options())
            .import_str(graph, &text)?;

        let mut outcome = CommandOutcome::finished("Node tree imported from clipboard.");
        if !summary.warnings.is_empty() {
            outcome.level = ReportLevel::Warning;
            outcome.message = format!(
                "Node tree imported from clipboard with {} warning{}.",
                summary.warnings.len(),
                if summary.warnings.len() == 1 { "" } else { "s" }
            );
            outcome.warnings = summary.warnings;
        }
        Ok(outcome)
    }

    fn copy_document_template(&mut self) -> Result<CommandOutcome, CommandError> {
        let text = document_template_text(self.settings.indent)?;
        self.clipboard.set_text(&text)?;
        Ok(CommandOutcome::finished("Base JSON template copied to clipboard."))
    }

    fn explain_graph(&mut self) -> Result<CommandOutcome, CommandError> {
        let graph = self.graph.as_ref().ok_or(CommandError::NoActiveTree)?;
        let report = explain(graph, &self.settings.report_options());
        self.clipboard.set_text(&report)?;
        Ok(CommandOutcome::finished("Human-readable report copied to clipboard."))
    }

    fn copy_report_template(&mut self) -> Result<CommandOutcome, CommandError> {
        self.clipboard.set_text(report_template())?;
        Ok(CommandOutcome::finished("Human-readable template copied to clipboard."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use noderelay_graph::{standard_registry, Library};

    fn host(clipboard: MemoryClipboard) -> RelayHost {
        let settings = RelaySettings::default();
        RelayHost::new(standard_registry(), Box::new(Library::new()), Box::new(clipboard), settings)
    }

    #[test]
    fn test_command_metadata() {
        assert_eq!(RelayCommand::ALL.len(), 5);
        assert_eq!(RelayCommand::ImportDocument.label(), "Import Nodes from JSON");
        assert!(RelayCommand::ExplainGraph.needs_graph());
        assert!(!RelayCommand::CopyReportTemplate.needs_graph());
    }

    #[test]
    fn test_commands_without_tree() {
        let mut host = host(MemoryClipboard::new());
        assert!(!host.can_run(RelayCommand::ExportDocument));

        let outcome = host.run(RelayCommand::ExportDocument);
        assert_eq!(outcome.status, CommandStatus::Cancelled);
        assert_eq!(outcome.level, ReportLevel::Error);
        assert_eq!(outcome.message, "No active node tree");

        let outcome = host.run(RelayCommand::CopyReportTemplate);
        assert!(outcome.is_finished());
        assert_eq!(host.clipboard.get_text().unwrap(), report_template());
    }

    #[test]
    fn test_export_then_import() {
        let registry = standard_registry();
        let mut graph = Graph::default();
        graph.add_node(registry.create_node("GeometryNodeMeshCube").unwrap());
        let mut host = host(MemoryClipboard::new()).with_graph(graph);

        let outcome = host.run(RelayCommand::ExportDocument);
        assert_eq!(outcome.message, "Node tree exported to clipboard as JSON.");
        let text = host.clipboard.get_text().unwrap();
        assert!(text.contains("\"type\": \"GeometryNodeMeshCube\""));

        host.graph = Some(Graph::default());
        let outcome = host.run(RelayCommand::ImportDocument);
        assert_eq!(outcome.level, ReportLevel::Info);
        assert_eq!(outcome.message, "Node tree imported from clipboard.");
        assert!(host.graph.as_ref().unwrap().node_by_name("Cube").is_some());
    }

    #[test]
    fn test_invalid_clipboard_keeps_tree() {
        let registry = standard_registry();
        let mut graph = Graph::default();
        graph.add_node(registry.create_node("ShaderNodeMath").unwrap());
        let mut host = host(MemoryClipboard::with_text("not json")).with_graph(graph);

        let outcome = host.run(RelayCommand::ImportDocument);
        assert_eq!(outcome.status, CommandStatus::Cancelled);
        assert_eq!(outcome.message, "Invalid JSON in clipboard.");
        assert_eq!(host.graph.as_ref().unwrap().node_count(), 1);
    }

    #[test]
    fn test_import_with_warnings() {
        let text = r#"{"version": "2.0", "nodes": [{"name": "X", "type": "NoSuchNode"}]}"#;
        let mut host = host(MemoryClipboard::with_text(text)).with_graph(Graph::default());

        let outcome = host.run(RelayCommand::ImportDocument);
        assert!(outcome.is_finished());
        assert_eq!(outcome.level, ReportLevel::Warning);
        assert_eq!(outcome.message, "Node tree imported from clipboard with 1 warning.");
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[test]
    fn test_templates_and_report() {
        let mut host = host(MemoryClipboard::new()).with_graph(Graph::default());

        host.run(RelayCommand::CopyDocumentTemplate);
        assert!(host.clipboard.get_text().unwrap().contains("Group Output"));

        let outcome = host.run(RelayCommand::ExplainGraph);
        assert_eq!(outcome.message, "Human-readable report copied to clipboard.");
        assert!(host.clipboard.get_text().unwrap().contains("No connections in this node group."));
    }
}
