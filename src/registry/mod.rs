//! Tool registry: discovery, metadata, persisted state, and the manager
//! that ties them together.

pub mod archive;
pub mod discovery;
pub mod manager;
pub mod metadata;
pub mod state;

pub use archive::ImportOutcome;
pub use manager::{StateChange, ToolManager, EXIT_INTERRUPTED, PRIORITY_TOOLS};
pub use state::{RegistryState, ShellSettings, StateStore, UsageStatistics, STATE_FILE_NAME};
