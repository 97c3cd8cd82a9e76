// SPDX-License-Identifier: MIT OR Apache-2.0
//! Persistent relay settings.
//!
//! Settings are stored as RON next to the user's other editor configuration.
//! A missing file means defaults; a file written by a newer version is
//! rejected rather than half-understood.

use crate::clipboard::{Clipboard, MemoryClipboard, SystemClipboard};
use noderelay_interchange::{ExportOptions, ImportOptions, ReportOptions, DEFAULT_INDENT, MAX_PRECISION};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings file name
pub const SETTINGS_FILE_NAME: &str = "noderelay.ron";

/// Current settings format version
pub const SETTINGS_FORMAT_VERSION: u32 = 1;

/// Settings error
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// File could not be read or written
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File is not valid RON
    #[error("Invalid settings file: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Settings could not be encoded
    #[error("Failed to encode settings: {0}")]
    Encode(#[from] ron::Error),

    /// File was written by a newer version
    #[error("Settings version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version in the file
        found: u32,
        /// Newest version this build reads
        supported: u32,
    },
}

/// Where documents are copied to and read from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClipboardBackend {
    /// The operating system clipboard
    #[default]
    System,
    /// A buffer private to this process
    Memory,
}

/// Relay settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelaySettings {
    /// Settings format version
    pub version: u32,
    /// Spaces per indentation level in exported documents
    pub indent: usize,
    /// Decimal places in text reports
    pub report_precision: u32,
    /// Clipboard backend
    pub clipboard: ClipboardBackend,
    /// Map loosely written enum values onto valid identifiers on import
    pub normalize_enums: bool,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_FORMAT_VERSION,
            indent: DEFAULT_INDENT,
            report_precision: ReportOptions::default().precision,
            clipboard: ClipboardBackend::default(),
            normalize_enums: true,
        }
    }
}

impl RelaySettings {
    /// Load settings from a file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        let settings: RelaySettings = ron::from_str(&content)?;

        if settings.version > SETTINGS_FORMAT_VERSION {
            return Err(SettingsError::UnsupportedVersion {
                found: settings.version,
                supported: SETTINGS_FORMAT_VERSION,
            });
        }

        Ok(settings)
    }

    /// Load settings, falling back to defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            tracing::debug!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let config = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);
        let content = ron::ser::to_string_pretty(self, config)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Settings file inside a configuration directory
    pub fn file_path(config_dir: &Path) -> PathBuf {
        config_dir.join(SETTINGS_FILE_NAME)
    }

    /// Export options derived from these settings
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            indent: self.indent,
        }
    }

    /// Import options derived from these settings
    pub fn import_options(&self) -> ImportOptions {
        ImportOptions {
            normalize_enums: self.normalize_enums,
        }
    }

    /// Report options derived from these settings
    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            precision: self.report_precision.min(MAX_PRECISION),
        }
    }

    /// Open the configured clipboard.
    ///
    /// Falls back to an in-process buffer when the system clipboard cannot
    /// be reached (for example on a headless machine).
    pub fn open_clipboard(&self) -> Box<dyn Clipboard> {
        match self.clipboard {
            ClipboardBackend::Memory => Box::new(MemoryClipboard::new()),
            ClipboardBackend::System => match SystemClipboard::new() {
                Ok(clipboard) => Box::new(clipboard),
                Err(err) => {
                    tracing::warn!("{err}, using an in-process clipboard");
                    Box::new(MemoryClipboard::new())
                }
            },
        }
    }
}
