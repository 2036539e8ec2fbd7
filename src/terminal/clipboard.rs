use anyhow::Result;
use crossterm::clipboard::CopyToClipboard;
use crossterm::execute;
use std::io::Write;

pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// Writes to the system clipboard through the terminal's OSC 52 sequence.
pub struct TerminalClipboard<W: Write> {
    out: W,
}

impl<W: Write> TerminalClipboard<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Clipboard for TerminalClipboard<W> {
    fn set_text(&mut self, text: &str) -> Result<()> {
        execute!(self.out, CopyToClipboard::to_clipboard_from(text))?;
        Ok(())
    }
}
