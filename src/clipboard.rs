//! Clipboard seam used by the copy helpers and the contact form.
//!
//! Both callers only need "write this text, tell me if it worked". The
//! [`Clipboard`] trait keeps them independent of where the text goes:
//! [`MemoryClipboard`] holds it for an in-process session, [`NoClipboard`]
//! always fails (the terminal case, where the CLI prints the text instead).

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    #[error("clipboard access denied")]
    Denied,
    #[error("no clipboard available")]
    Unavailable,
}

pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Keeps the last written text; records every write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryClipboard {
    writes: Vec<String>,
    denied: bool,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard that rejects every write, like a browser without permission.
    pub fn denied() -> Self {
        Self {
            writes: Vec::new(),
            denied: true,
        }
    }

    pub fn contents(&self) -> Option<&str> {
        self.writes.last().map(String::as_str)
    }

    pub fn writes(&self) -> &[String] {
        &self.writes
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if self.denied {
            return Err(ClipboardError::Denied);
        }
        self.writes.push(text.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoClipboard;

impl Clipboard for NoClipboard {
    fn write_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_keeps_last_write() {
        let mut clip = MemoryClipboard::new();
        clip.write_text("a").unwrap();
        clip.write_text("b").unwrap();
        assert_eq!(clip.contents(), Some("b"));
        assert_eq!(clip.writes().len(), 2);
    }

    #[test]
    fn denied_and_missing_fail() {
        assert_eq!(
            MemoryClipboard::denied().write_text("a"),
            Err(ClipboardError::Denied)
        );
        assert_eq!(NoClipboard.write_text("a"), Err(ClipboardError::Unavailable));
    }
}
