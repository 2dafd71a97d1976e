//! Command handlers, one module per command family.

pub mod credentials;
pub mod export;
pub mod generate;
pub mod init;
pub mod misc;
pub mod verify;
