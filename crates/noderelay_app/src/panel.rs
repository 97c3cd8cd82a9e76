// SPDX-License-Identifier: MIT OR Apache-2.0
//! Relay panel - workflow guide, command buttons and status log.

use crate::commands::{CommandOutcome, RelayCommand, RelayHost, ReportLevel};
use crate::logging::StatusEvent;
use std::collections::VecDeque;
use std::sync::mpsc;
use tracing::Level;

/// Default number of status lines kept
const MAX_STATUS_LINES: usize = 200;

const JSON_GUIDE: &[&str] = &[
    "Use 'Export Nodes to JSON' to copy your node tree.",
    "Paste the JSON to an AI and ask for specific changes.",
    "Copy the AI's modified JSON.",
    "Use 'Import Nodes from JSON' to build the new tree.",
];

const TEXT_GUIDE: &[&str] = &[
    "Use 'Explain Nodes to Text' to understand a setup.",
    "Paste the text to an AI to ask for advice.",
    "Use 'Copy Text Template' to write your own instructions.",
];

/// One line of the status log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    /// Severity
    pub level: Level,
    /// Message
    pub message: String,
    /// How many times the message repeated
    pub count: usize,
}

fn level_color(level: Level) -> egui::Color32 {
    match level {
        Level::ERROR => egui::Color32::from_rgb(255, 100, 100),
        Level::WARN => egui::Color32::from_rgb(255, 200, 80),
        Level::INFO => egui::Color32::from_rgb(200, 200, 200),
        _ => egui::Color32::from_rgb(150, 150, 150),
    }
}

/// The relay panel
pub struct RelayPanel {
    lines: VecDeque<StatusLine>,
    max_lines: usize,
    status_rx: Option<mpsc::Receiver<StatusEvent>>,
    last_outcome: Option<CommandOutcome>,
}

impl Default for RelayPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl RelayPanel {
    /// Panel without a log feed
    pub fn new() -> Self {
        Self {
            lines: VecDeque::new(),
            max_lines: MAX_STATUS_LINES,
            status_rx: None,
            last_outcome: None,
        }
    }

    /// Panel fed by a [`crate::logging::StatusBridge`]
    pub fn with_status_receiver(status_rx: mpsc::Receiver<StatusEvent>) -> Self {
        Self {
            status_rx: Some(status_rx),
            ..Self::new()
        }
    }

    /// Status log, oldest first
    pub fn lines(&self) -> impl Iterator<Item = &StatusLine> {
        self.lines.iter()
    }

    /// Outcome of the last command run from the panel
    pub fn last_outcome(&self) -> Option<&CommandOutcome> {
        self.last_outcome.as_ref()
    }

    /// Add a status line, collapsing it into the previous one when equal
    pub fn push_status(&mut self, level: Level, message: impl Into<String>) {
        let message = message.into();
        if let Some(last) = self.lines.back_mut() {
            if last.level == level && last.message == message {
                last.count += 1;
                return;
            }
        }

        self.lines.push_back(StatusLine {
            level,
            message,
            count: 1,
        });
        while self.lines.len() > self.max_lines {
            self.lines.pop_front();
        }
    }

    /// Drain pending log events into the status log
    pub fn poll_status_events(&mut self) {
        let Some(rx) = &self.status_rx else {
            return;
        };
        let events: Vec<_> = rx.try_iter().collect();
        for event in events {
            self.push_status(event.level, event.message);
        }
    }

    /// Run a command and remember its outcome.
    ///
    /// Without a log feed the outcome message is added to the status log
    /// directly.
    pub fn run_command(&mut self, host: &mut RelayHost, command: RelayCommand) -> &CommandOutcome {
        let outcome = host.run(command);
        if self.status_rx.is_none() {
            let level = match outcome.level {
                ReportLevel::Info => Level::INFO,
                ReportLevel::Warning => Level::WARN,
                ReportLevel::Error => Level::ERROR,
            };
            self.push_status(level, outcome.message.clone());
            for warning in &outcome.warnings {
                self.push_status(Level::WARN, warning.to_string());
            }
        }
        self.last_outcome.insert(outcome)
    }

    fn command_button(&mut self, ui: &mut egui::Ui, host: &mut RelayHost, command: RelayCommand) {
        let button = egui::Button::new(command.label());
        if ui
            .add_enabled(host.can_run(command), button)
            .on_hover_text(command.description())
            .on_disabled_hover_text("Open a node tree first")
            .clicked()
        {
            self.run_command(host, command);
        }
    }

    fn guide(ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Workflow Guide")
            .default_open(true)
            .show(ui, |ui| {
                ui.label(egui::RichText::new("1. AI-Powered Editing (JSON):").strong());
                for line in JSON_GUIDE {
                    ui.label(format!("   - {line}"));
                }
                ui.add_space(4.0);
                ui.label(egui::RichText::new("2. Get Help or Give Instructions (Text):").strong());
                for line in TEXT_GUIDE {
                    ui.label(format!("   - {line}"));
                }
            });
    }

    /// Render the panel
    pub fn ui(&mut self, ui: &mut egui::Ui, host: &mut RelayHost) {
        self.poll_status_events();

        Self::guide(ui);
        ui.separator();

        ui.group(|ui| {
            ui.label(egui::RichText::new("Machine-Readable (JSON)").strong());
            self.command_button(ui, host, RelayCommand::ExportDocument);
            self.command_button(ui, host, RelayCommand::ImportDocument);
            self.command_button(ui, host, RelayCommand::CopyDocumentTemplate);
        });

        ui.group(|ui| {
            ui.label(egui::RichText::new("Human-Readable (Text)").strong());
            self.command_button(ui, host, RelayCommand::ExplainGraph);
            self.command_button(ui, host, RelayCommand::CopyReportTemplate);
        });

        ui.separator();
        ui.horizontal(|ui| {
            ui.label("Status");
            if ui.button("Clear").on_hover_text("Clear the status log").clicked() {
                self.lines.clear();
            }
        });

        egui::ScrollArea::vertical()
            .max_height(160.0)
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for line in &self.lines {
                    let text = if line.count > 1 {
                        format!("{} (x{})", line.message, line.count)
                    } else {
                        line.message.clone()
                    };
                    ui.colored_label(level_color(line.level), text);
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use crate::settings::RelaySettings;
    use noderelay_graph::{standard_registry, Graph, Library};

    fn host() -> RelayHost {
        RelayHost::new(
            standard_registry(),
            Box::new(Library::new()),
            Box::new(MemoryClipboard::new()),
            RelaySettings::default(),
        )
    }

    #[test]
    fn test_status_lines_collapse() {
        let mut panel = RelayPanel::new();
        panel.push_status(Level::INFO, "copied");
        panel.push_status(Level::INFO, "copied");
        panel.push_status(Level::WARN, "copied");

        let lines: Vec<_> = panel.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].count, 2);
    }

    #[test]
    fn test_status_log_is_bounded() {
        let mut panel = RelayPanel::new();
        for i in 0..(MAX_STATUS_LINES + 10) {
            panel.push_status(Level::INFO, format!("line {i}"));
        }
        assert_eq!(panel.lines().count(), MAX_STATUS_LINES);
        assert_eq!(panel.lines().next().unwrap().message, "line 10");
    }

    #[test]
    fn test_run_command_records_outcome() {
        let mut panel = RelayPanel::new();
        let mut host = host();

        let outcome = panel.run_command(&mut host, RelayCommand::ExplainGraph);
        assert!(!outcome.is_finished());
        assert_eq!(panel.lines().last().unwrap().level, Level::ERROR);

        let mut host = host.with_graph(Graph::default());
        panel.run_command(&mut host, RelayCommand::ExplainGraph);
        assert!(panel.last_outcome().unwrap().is_finished());
    }

    #[test]
    fn test_events_from_receiver() {
        let (sender, receiver) = mpsc::channel();
        let mut panel = RelayPanel::with_status_receiver(receiver);
        sender
            .send(StatusEvent {
                level: Level::WARN,
                message: "Skipped link".into(),
                target: "noderelay_interchange::import".into(),
            })
            .unwrap();

        panel.poll_status_events();
        assert_eq!(panel.lines().next().unwrap().message, "Skipped link");
    }

    #[test]
    fn test_renders_headless() {
        let ctx = egui::Context::default();
        let mut panel = RelayPanel::new();
        panel.push_status(Level::INFO, "ready");
        let mut host = host();

        for _ in 0..2 {
            let _ = ctx.run(egui::RawInput::default(), |ctx| {
                egui::CentralPanel::default().show(ctx, |ui| panel.ui(ui, &mut host));
            });
        }
        assert!(panel.last_outcome().is_none());
    }
}
