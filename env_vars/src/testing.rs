//! Test overrides for built configuration.
//!
//! [`stub`] makes a name yield a fixed value; [`restore`] undoes every
//! pending stub, on every configuration, in reverse order. Overrides are
//! recorded on a single process-wide [`OverrideStack`], so one `restore()` at
//! the end of a test clears everything that test stubbed. Tests that stub
//! should therefore not run concurrently with tests that read the same
//! configuration; mark them `#[serial]`.
//!
//! ```
//! use std::collections::HashMap;
//! use env_vars::testing::{restore, stub};
//! use env_vars::{INT, env_from};
//!
//! let config = env_from(HashMap::new(), |d| {
//!     d.optional_or("NUMBER", INT, 1234_i64)?;
//!     Ok(())
//! })?;
//!
//! stub(&config, "number", 4321_i64)?;
//! assert_eq!(config.get_as::<i64>("number")?, 4321);
//!
//! restore();
//! assert_eq!(config.get_as::<i64>("number")?, 1234);
//! # Ok::<(), env_vars::EnvError>(())
//! ```

use std::sync::LazyLock;

use parking_lot::Mutex;
use tracing::debug;

use crate::config::{Accessor, Config};
use crate::{EnvError, EnvResult, Value};

static GLOBAL: LazyLock<OverrideStack> = LazyLock::new(OverrideStack::new);

/// Restores one name to the accessor it had before a stub.
#[derive(Debug)]
struct OverrideEntry {
    config: Config,
    name: String,
    previous: Accessor,
}

/// A LIFO record of pending overrides.
///
/// Entries hold the full accessor that was replaced, not its value, so a
/// restored name recomputes exactly as it did before: live variables track
/// their source again and properties resume their computation.
#[derive(Debug, Default)]
pub struct OverrideStack {
    entries: Mutex<Vec<OverrideEntry>>,
}

impl OverrideStack {
    /// An empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The stack used by [`stub`] and [`restore`].
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Make `name` on `config` yield `value` until the next [`Self::restore`].
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::CannotStubUndeclaredKey`] when `name` is not
    /// installed on `config`; nothing is recorded in that case.
    pub fn stub(&self, config: &Config, name: &str, value: impl Into<Value>) -> EnvResult<()> {
        let mut entries = self.entries.lock();
        let previous = config
            .replace(name, Accessor::Stubbed(value.into()))
            .ok_or_else(|| EnvError::cannot_stub(name))?;
        entries.push(OverrideEntry {
            config: config.clone(),
            name: name.to_owned(),
            previous,
        });
        debug!(name, depth = entries.len(), "stubbed configuration");
        Ok(())
    }

    /// Undo every pending override, most recent first.
    pub fn restore(&self) {
        let mut entries = self.entries.lock();
        let count = entries.len();
        while let Some(entry) = entries.pop() {
            // Entries only exist for installed names, so the slot is present.
            let _stub = entry.config.replace(&entry.name, entry.previous);
        }
        if count > 0 {
            debug!(count, "restored stubbed configuration");
        }
    }

    /// Number of overrides waiting to be restored.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.entries.lock().len()
    }
}

/// Stub `name` on `config` using the global stack.
///
/// # Errors
///
/// See [`OverrideStack::stub`].
pub fn stub(config: &Config, name: &str, value: impl Into<Value>) -> EnvResult<()> {
    OverrideStack::global().stub(config, name, value)
}

/// Undo every stub recorded on the global stack.
pub fn restore() {
    OverrideStack::global().restore();
}

/// Number of stubs pending on the global stack.
#[must_use]
pub fn pending() -> usize {
    OverrideStack::global().pending()
}
