//! Terminal interface for Yakgwan

mod chat;
mod session;
mod ui;

#[cfg(test)]
mod tests;

pub use chat::{ChatCommand, ChatEntry, ERROR_APOLOGY, EXAMPLE_QUESTIONS, Speaker, Transcript};
pub use session::run_chat;
pub use ui::{
    debug_report, display_banner, format_source, handle_input_with_history, preview,
    print_examples, print_help, render_answer, render_debug_panel, render_error, render_stats,
};

// Re-export core types
pub use yakgwan_core::{Error, Result};
