//! Shared types used across the crate

mod error;
mod tool;

pub use error::{LauncherError, Result};
pub use tool::{ToolKind, ToolMetadata};
