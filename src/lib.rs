pub mod codec;
pub mod error;
pub mod types;

pub use error::{Result, RingError};
pub use types::{Context, Direction, Invocation, ModeSummary, PipelineOptions};
