//! The read-only configuration object.
//!
//! A [`Config`] maps accessor names to accessors. Reading a name runs its
//! accessor afresh; nothing is cached. Names that were never installed are
//! rejected, and so is every write: the only ways to change what a name
//! yields are the declarations made while building and the overrides in
//! [`crate::testing`].

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::trace;

use crate::source::VarSource;
use crate::{EnvError, EnvResult, Kind, Value};

/// Computation behind a free-form property.
pub(crate) type Compute = Arc<dyn Fn() -> Value + Send + Sync>;

/// A declared variable bound to its source.
pub(crate) struct Binding {
    pub(crate) source_name: String,
    pub(crate) kind: Kind,
    pub(crate) default: Value,
    pub(crate) source: Arc<dyn VarSource>,
}

impl Binding {
    fn read(&self) -> EnvResult<Value> {
        self.source
            .var(&self.source_name)
            .map_or_else(|| Ok(self.default.clone()), |raw| self.kind.coerce(&raw))
    }
}

/// What a name yields when read.
#[derive(Clone)]
pub(crate) enum Accessor {
    /// The coerced current value of a variable, or its default when absent.
    Variable(Arc<Binding>),
    /// The result of a property computation.
    Computed(Compute),
    /// A fixed test override.
    Stubbed(Value),
}

impl Accessor {
    fn read(&self) -> EnvResult<Value> {
        match self {
            Self::Variable(binding) => binding.read(),
            Self::Computed(compute) => Ok(compute()),
            Self::Stubbed(value) => Ok(value.clone()),
        }
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Variable(binding) => f
                .debug_struct("Variable")
                .field("source_name", &binding.source_name)
                .field("kind", &binding.kind)
                .field("default", &binding.default)
                .finish_non_exhaustive(),
            Self::Computed(_) => f.write_str("Computed(<fn>)"),
            Self::Stubbed(value) => f.debug_tuple("Stubbed").field(value).finish(),
        }
    }
}

/// Immutable, typed configuration built by [`crate::env`].
///
/// Cloning is cheap and clones share their accessors, so an override applied
/// through one handle is visible through all of them.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use env_vars::{EnvError, STRING, env_from};
///
/// let vars = HashMap::from([("APP_NAME".to_owned(), "myapp".to_owned())]);
/// let config = env_from(vars, |d| {
///     d.mandatory("APP_NAME", STRING)?;
///     Ok(())
/// })?;
///
/// assert_eq!(config.get_as::<String>("appName")?, "myapp");
/// assert!(matches!(config.get("missing"), Err(EnvError::UnknownKey { .. })));
/// # Ok::<(), EnvError>(())
/// ```
#[derive(Clone)]
pub struct Config {
    accessors: Arc<RwLock<HashMap<String, Accessor>>>,
}

impl Config {
    pub(crate) fn new(accessors: HashMap<String, Accessor>) -> Self {
        Self {
            accessors: Arc::new(RwLock::new(accessors)),
        }
    }

    /// Read the current value of `name`.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::UnknownKey`] when `name` was never installed, or
    /// the coercion error of a malformed raw value.
    pub fn get(&self, name: &str) -> EnvResult<Value> {
        // The lock is released before the accessor runs so properties may
        // read other entries.
        let accessor = self
            .accessor(name)
            .ok_or_else(|| EnvError::unknown_key(name))?;
        trace!(name, "reading configuration");
        accessor.read()
    }

    /// Read `name` and convert it to `T`.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Config::get`], or [`EnvError::TypeMismatch`]
    /// when the value has another shape.
    pub fn get_as<T>(&self, name: &str) -> EnvResult<T>
    where
        T: TryFrom<Value, Error = EnvError>,
    {
        self.get(name).and_then(T::try_from)
    }

    /// Reject an assignment to `name`.
    ///
    /// Configuration cannot be written once built; this always fails and
    /// never changes what any name yields.
    ///
    /// # Errors
    ///
    /// Always returns [`EnvError::ReadOnly`].
    pub fn try_set(&self, name: &str, _value: &Value) -> EnvResult<()> {
        Err(EnvError::read_only(name))
    }

    /// Whether `name` was installed.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.accessors.read().contains_key(name)
    }

    pub(crate) fn accessor(&self, name: &str) -> Option<Accessor> {
        self.accessors.read().get(name).cloned()
    }

    /// Swap the accessor of an installed `name`, returning the previous one.
    ///
    /// Names that are not installed are left alone and yield `None`.
    pub(crate) fn replace(&self, name: &str, accessor: Accessor) -> Option<Accessor> {
        self.accessors
            .write()
            .get_mut(name)
            .map(|slot| std::mem::replace(slot, accessor))
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let accessors = self.accessors.read();
        let mut names: Vec<_> = accessors.keys().collect();
        names.sort_unstable();
        f.debug_struct("Config").field("names", &names).finish()
    }
}
