//! Terminal utilities for title setting, color detection and hyperlinks

use std::env;
use std::io::{IsTerminal, Write};

/// Sets the terminal title to the specified text
///
/// Nothing is written when stdout is redirected, so piped JSON stays clean.
pub fn set_terminal_title(title: &str) {
    if std::io::stdout().is_terminal() {
        // ANSI escape sequence to set terminal title
        print!("\x1b]0;{}\x07", title);
    }
}

/// Sets the terminal title and ensures it's flushed to the terminal
pub fn set_terminal_title_and_flush(title: &str) {
    set_terminal_title(title);
    // Flush stdout - ignore errors as this is non-critical
    let _ = std::io::stdout().flush();
}

/// Whether styled output should be written to stdout
///
/// `NO_COLOR` (any value) and `TERM=dumb` turn styling off; otherwise the
/// `console` crate decides from the TTY and `CLICOLOR*` variables.
pub fn use_color() -> bool {
    if env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if env::var("TERM").is_ok_and(|v| v == "dumb") {
        return false;
    }
    console::colors_enabled()
}

/// Whether a progress spinner can be drawn on stderr
///
/// Independent of the output format: JSON piped to a file still gets a
/// spinner when stderr is an interactive terminal.
pub fn show_progress() -> bool {
    let term = env::var("TERM").ok();
    progress_allowed(console::Term::stderr().is_term(), term.as_deref())
}

fn progress_allowed(stderr_is_term: bool, term: Option<&str>) -> bool {
    stderr_is_term && term != Some("dumb")
}

/// Wraps `text` in an OSC 8 hyperlink pointing at `target`
pub fn hyperlink(target: &str, text: &str) -> String {
    format!("\x1b]8;;{target}\x07{text}\x1b]8;;\x07")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_follows_stderr() {
        assert!(progress_allowed(true, Some("xterm-256color")));
        assert!(progress_allowed(true, None));
        assert!(!progress_allowed(false, Some("xterm-256color")));
        assert!(!progress_allowed(true, Some("dumb")));
    }

    #[test]
    fn test_hyperlink_escape_sequence() {
        assert_eq!(
            hyperlink("file:///w/x", "x"),
            "\x1b]8;;file:///w/x\x07x\x1b]8;;\x07"
        );
    }
}
