use anyhow::{Context, Result};
use arboard::Clipboard;

/// Hands the export record to the system clipboard as plain text.
pub fn write_text_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = Clipboard::new().context("cannot initialize clipboard")?;
    clipboard
        .set_text(text.to_string())
        .context("cannot write export to clipboard")
}
