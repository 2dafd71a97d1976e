//! Application-level utilities for the xcortz CLI.
//!
//! This module provides:
//! - Path resolution for config, vault and passkey files
//! - The per-invocation context shared by command handlers
//! - Master key handling with retry logic

mod context;
mod resolver;
mod unlock;

pub use context::AppContext;
pub use resolver::resolve_config_path;
