pub mod error;
#[cfg(feature = "full")]
pub mod settings;

/// Maximum number of steps a workflow definition may carry.
pub const MAX_WORKFLOW_STEPS: usize = 50;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
