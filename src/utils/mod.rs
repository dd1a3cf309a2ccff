pub(crate) mod terminal;

// Public API - utilities used by commands
pub use terminal::{
    hyperlink, set_terminal_title, set_terminal_title_and_flush, show_progress, use_color,
};
