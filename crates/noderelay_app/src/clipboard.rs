// SPDX-License-Identifier: MIT OR Apache-2.0
//! Shared text buffer used to move documents in and out of the editor.

/// Clipboard error
#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    /// The buffer holds no text
    #[error("Clipboard is empty")]
    Empty,

    /// The system clipboard failed
    #[error("Clipboard unavailable: {0}")]
    Backend(#[from] arboard::Error),
}

/// A single text buffer
pub trait Clipboard {
    /// Read the buffer
    fn get_text(&mut self) -> Result<String, ClipboardError>;

    /// Replace the buffer
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// The operating system clipboard
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

impl SystemClipboard {
    /// Connect to the system clipboard
    pub fn new() -> Result<Self, ClipboardError> {
        Ok(Self {
            inner: arboard::Clipboard::new()?,
        })
    }
}

impl Clipboard for SystemClipboard {
    fn get_text(&mut self) -> Result<String, ClipboardError> {
        match self.inner.get_text() {
            Ok(text) => Ok(text),
            Err(arboard::Error::ContentNotAvailable) => Err(ClipboardError::Empty),
            Err(err) => Err(err.into()),
        }
    }

    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.inner.set_text(text)?;
        Ok(())
    }
}

/// In-process buffer, for headless use and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    text: Option<String>,
}

impl MemoryClipboard {
    /// Empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer holding `text`
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
        }
    }

    /// Current contents
    pub fn contents(&self) -> Option<&str> {
        self.text.as_deref()
    }
}

impl Clipboard for MemoryClipboard {
    fn get_text(&mut self) -> Result<String, ClipboardError> {
        self.text.clone().ok_or(ClipboardError::Empty)
    }

    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.text = Some(text.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_clipboard() {
        let mut clipboard = MemoryClipboard::new();
        assert!(matches!(clipboard.get_text(), Err(ClipboardError::Empty)));

        clipboard.set_text("{}").unwrap();
        assert_eq!(clipboard.get_text().unwrap(), "{}");
        assert_eq!(clipboard.contents(), Some("{}"));
    }
}
