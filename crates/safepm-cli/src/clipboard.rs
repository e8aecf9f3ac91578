//! OS clipboard shim
//!
//! Pipes the copied value into the platform clipboard command. No text is
//! ever passed on a command line.

use safepm_service::ClipboardSink;
use std::io::Write;
use std::process::{Command, Stdio};

/// Clipboard backed by the platform's clipboard command
pub struct OsClipboard;

#[cfg(target_os = "macos")]
const CLIPBOARD_COMMANDS: &[&[&str]] = &[&["pbcopy"]];

#[cfg(not(target_os = "macos"))]
const CLIPBOARD_COMMANDS: &[&[&str]] = &[
    &["wl-copy"],
    &["xclip", "-selection", "clipboard"],
    &["xsel", "--clipboard", "--input"],
];

fn pipe_to(command: &[&str], text: &str) -> bool {
    let mut child = match Command::new(command[0])
        .args(&command[1..])
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
    {
        Ok(child) => child,
        Err(_) => return false,
    };

    if let Some(stdin) = child.stdin.as_mut() {
        if stdin.write_all(text.as_bytes()).is_err() {
            return false;
        }
    }

    matches!(child.wait(), Ok(status) if status.success())
}

impl ClipboardSink for OsClipboard {
    fn copy(&self, text: &str) -> bool {
        CLIPBOARD_COMMANDS.iter().any(|command| pipe_to(command, text))
    }

    fn clear(&self) -> bool {
        self.copy("")
    }
}
