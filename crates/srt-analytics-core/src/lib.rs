pub mod error;
pub mod srt;
pub mod types;

pub use error::SrtError;
pub use types::*;

/// Standard result type for all srt-analytics operations
pub type SrtResult<T> = Result<T, SrtError>;
