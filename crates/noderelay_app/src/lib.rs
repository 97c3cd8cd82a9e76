// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node Relay editor integration.
//!
//! Wires the interchange layer to the editor: the five relay commands, the
//! clipboard they read and write, persistent settings, log setup and the
//! panel that exposes everything to the user.
//!
//! ## Setup
//!
//! ```no_run
//! use noderelay_app::{logging, RelayHost, RelayPanel, RelaySettings};
//! use noderelay_graph::{standard_registry, Library};
//!
//! let status_rx = logging::init()?;
//! let settings = RelaySettings::default();
//! let clipboard = settings.open_clipboard();
//! let mut host = RelayHost::new(standard_registry(), Box::new(Library::new()), clipboard, settings);
//! let mut panel = RelayPanel::with_status_receiver(status_rx);
//! // Each frame: panel.ui(ui, &mut host);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod clipboard;
pub mod commands;
pub mod logging;
pub mod panel;
pub mod settings;

pub use clipboard::{Clipboard, ClipboardError, MemoryClipboard, SystemClipboard};
pub use commands::{CommandError, CommandOutcome, CommandStatus, RelayCommand, RelayHost, ReportLevel};
pub use logging::{StatusBridge, StatusEvent};
pub use panel::{RelayPanel, StatusLine};
pub use settings::{ClipboardBackend, RelaySettings, SettingsError, SETTINGS_FILE_NAME};
