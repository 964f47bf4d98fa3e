pub mod confession;
pub mod date;
pub mod error;
pub mod journal;
pub mod mood;
pub mod realtime;
pub mod session;
pub mod sync;
pub mod truth;

// Re-export common error type
pub use error::{FiatError, Result};
