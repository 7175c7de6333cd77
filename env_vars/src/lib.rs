//! Typed, read-only configuration declared from environment variables.
//!
//! Start-up code calls [`env`] with a setup closure that declares which
//! variables are mandatory, which are optional, what [`Kind`] each decodes
//! to and which computed properties exist. The result is a [`Config`] whose
//! entries are read by their camel-case accessor names:
//!
//! ```
//! use std::collections::HashMap;
//! use env_vars::{BOOL, INT, Options, STRING, array, env_from};
//!
//! let vars = HashMap::from([
//!     ("NODE_ENV".to_owned(), "production".to_owned()),
//!     ("PORTS".to_owned(), "80, 443".to_owned()),
//! ]);
//! let config = env_from(vars, |d| {
//!     d.mandatory_with("NODE_ENV", STRING, Options::new().alias("env"))?;
//!     d.optional_or("FORCE_SSL", BOOL, true)?;
//!     d.optional("PORTS", array(INT))?;
//!     d.property("answer", || 42_i64)?;
//!     Ok(())
//! })?;
//!
//! assert_eq!(config.get_as::<String>("nodeEnv")?, "production");
//! assert_eq!(config.get_as::<String>("env")?, "production");
//! assert!(config.get_as::<bool>("forceSSL")?);
//! assert_eq!(config.get_as::<Vec<i64>>("ports")?, vec![80, 443]);
//! assert_eq!(config.get_as::<i64>("answer")?, 42);
//! # Ok::<(), env_vars::EnvError>(())
//! ```
//!
//! Mandatory variables are checked while building; malformed values are
//! reported by the read that coerces them. Every read consults the source
//! again, so a configuration follows later changes to its variables.
//! [`testing`] provides `stub`/`restore` overrides for tests.

mod config;
mod declare;
mod error;
mod kind;
mod naming;
mod source;
pub mod testing;
mod value;

pub use config::Config;
pub use declare::{Declarations, EnvBuilder, Options};
pub use error::{EnvError, EnvResult};
pub use kind::{BOOL, FLOAT, INT, Kind, STRING, TRUTHY, array, string_array};
pub use naming::{Acronyms, DEFAULT_ACRONYMS, attr_name, attr_name_with};
pub use source::{ProcessEnv, SharedVars, VarSource};
pub use value::Value;

/// Build configuration from the process environment.
///
/// Accessor names are derived with [`Acronyms::global`].
///
/// # Errors
///
/// Returns the first error raised by `setup`, such as
/// [`EnvError::MissingVariable`].
pub fn env<F>(setup: F) -> EnvResult<Config>
where
    F: FnOnce(&mut Declarations<'static>) -> EnvResult<()>,
{
    EnvBuilder::new().build(setup)
}

/// Build configuration from `source`.
///
/// # Errors
///
/// See [`env`].
pub fn env_from<S, F>(source: S, setup: F) -> EnvResult<Config>
where
    S: VarSource + 'static,
    F: FnOnce(&mut Declarations<'static>) -> EnvResult<()>,
{
    EnvBuilder::new().source(source).build(setup)
}
