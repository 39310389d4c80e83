pub mod core;
pub mod emit;

// Re-export commonly used types
pub use crate::core::config::SupplyChainConfig;
pub use crate::core::errors::{Result, SupplyChainError};
pub use crate::core::pipeline::{PipelineOutcome, SupplyChainPipeline};
pub use crate::core::types::Record;
