//! UI primitives for the xcortz CLI.
//!
//! This module provides:
//! - **Context**: Environment detection (TTY, color, unicode)
//! - **Mode**: Output mode resolution (json, plain, pretty)
//! - **Theme**: Badge tokens and styles
//! - **Render**: Tables, headers, key-value lines, hints, errors
//! - **Progress**: Spinner shown while the key is derived

mod context;
mod mode;
pub mod progress;
pub mod render;
pub mod theme;

pub use context::UiContext;
pub use progress::Spinner;
pub use render::{badge, blank_line, header, hint, kv, print, print_error, table, Column};
pub use theme::Badge;
