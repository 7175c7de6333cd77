//! Error types produced while declaring, reading and stubbing configuration.

mod constructors;
mod types;

pub use types::EnvError;

/// Result alias used throughout the crate.
pub type EnvResult<T> = Result<T, EnvError>;
