pub mod client;
pub mod error;
pub mod types;

pub use client::{DEFAULT_BASE_URL, LlamaClient};
pub use error::LlamaError;
pub use types::{Segment, SplitResult};
