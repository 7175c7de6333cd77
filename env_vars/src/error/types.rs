//! Primary error enum for configuration declaration and access.

use thiserror::Error;

/// Errors raised by configuration builds, reads and test overrides.
///
/// Every failure is reported at the point of violation. Build-time variants
/// ([`EnvError::MissingVariable`], [`EnvError::DuplicateKey`],
/// [`EnvError::EmptyName`]) abort [`crate::env`]; coercion variants surface on
/// the read that triggers them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum EnvError {
    /// A mandatory variable is absent from the source.
    #[error("{name} is not defined")]
    MissingVariable {
        /// Source variable name, as declared.
        name: String,
    },

    /// A raw value could not be read as an integer.
    #[error("invalid value for integer: \"{raw}\"")]
    InvalidInteger {
        /// Raw value that failed to parse.
        raw: String,
    },

    /// A raw value could not be read as a float.
    #[error("invalid value for float: \"{raw}\"")]
    InvalidFloat {
        /// Raw value that failed to parse.
        raw: String,
    },

    /// An identifier that was never installed was read.
    #[error("\"{name}\" is not a registered configuration.")]
    UnknownKey {
        /// Identifier that was requested.
        name: String,
    },

    /// A write was attempted through the read-only guard.
    #[error("Configuration is read-only (\"{name}\" was assigned).")]
    ReadOnly {
        /// Identifier that was assigned.
        name: String,
    },

    /// Test code tried to stub an identifier that was never installed.
    #[error("You can't stub a configuration that's not defined (\"{name}\")")]
    CannotStubUndeclaredKey {
        /// Identifier passed to the stub.
        name: String,
    },

    /// Two declarations tried to install the same identifier.
    #[error("\"{name}\" is already declared")]
    DuplicateKey {
        /// Identifier installed twice.
        name: String,
    },

    /// A declaration or property was given an empty name.
    #[error("configuration names must not be empty")]
    EmptyName,

    /// A value did not have the shape requested by a typed read.
    #[error("expected {expected} value, found {found}")]
    TypeMismatch {
        /// Shape requested by the caller.
        expected: &'static str,
        /// Shape of the value actually produced.
        found: &'static str,
    },
}
