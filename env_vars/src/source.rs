//! Raw-value sources that configuration is built from.
//!
//! A [`VarSource`] maps a variable name to its raw string value. Accessors
//! hold on to the source and query it on every read, so a configuration
//! reflects the state of its source at read time rather than at build time.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use std::sync::Arc;

use parking_lot::RwLock;

/// A mapping from variable name to raw string value.
pub trait VarSource: Send + Sync {
    /// Returns the raw value of `name`, or `None` when it is absent.
    fn var(&self, name: &str) -> Option<String>;

    /// Returns `true` when `name` is present, even if empty.
    fn contains(&self, name: &str) -> bool {
        self.var(name).is_some()
    }
}

/// The process environment.
///
/// Values that are not valid Unicode are converted lossily rather than
/// treated as absent, so a mandatory declaration never fails only because of
/// its encoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl VarSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var_os(name).map(|raw| raw.to_string_lossy().into_owned())
    }
}

impl<S> VarSource for HashMap<String, String, S>
where
    S: BuildHasher + Send + Sync,
{
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl VarSource for BTreeMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl<T: VarSource + ?Sized> VarSource for Arc<T> {
    fn var(&self, name: &str) -> Option<String> {
        (**self).var(name)
    }
}

/// An in-memory source that can change after a configuration is built.
///
/// Clones share the same storage, so a test can keep one handle, pass
/// another to [`crate::env_from`] and mutate variables between reads.
///
/// # Examples
///
/// ```
/// use env_vars::{INT, SharedVars, env_from};
///
/// let vars = SharedVars::from_pairs([("TIMEOUT", "10")]);
/// let config = env_from(vars.clone(), |d| {
///     d.mandatory("TIMEOUT", INT)?;
///     Ok(())
/// })?;
/// vars.set("TIMEOUT", "20");
/// assert_eq!(config.get_as::<i64>("timeout")?, 20);
/// # Ok::<(), env_vars::EnvError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct SharedVars {
    vars: Arc<RwLock<BTreeMap<String, String>>>,
}

impl SharedVars {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source seeded from `pairs`.
    #[must_use]
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars = pairs
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self {
            vars: Arc::new(RwLock::new(vars)),
        }
    }

    /// Set `name` to `value`, returning the previous value.
    pub fn set(&self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.vars.write().insert(name.into(), value.into())
    }

    /// Remove `name`, returning its previous value.
    pub fn remove(&self, name: &str) -> Option<String> {
        self.vars.write().remove(name)
    }
}

impl VarSource for SharedVars {
    fn var(&self, name: &str) -> Option<String> {
        self.vars.read().get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::{SharedVars, VarSource};

    #[test]
    fn hash_maps_distinguish_empty_from_absent() {
        let vars = HashMap::from([("EMPTY".to_owned(), String::new())]);
        assert!(vars.contains("EMPTY"));
        assert!(!vars.contains("MISSING"));
    }

    #[test]
    fn shared_vars_clones_share_storage() {
        let vars = SharedVars::new();
        let other = vars.clone();
        assert_eq!(vars.set("A", "1"), None);
        assert_eq!(other.var("A").as_deref(), Some("1"));
        assert_eq!(other.remove("A").as_deref(), Some("1"));
        assert!(!vars.contains("A"));
    }
}
