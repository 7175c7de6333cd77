//! Declarations made while building a configuration.
//!
//! The setup closure given to [`crate::env`] receives a [`Declarations`]
//! handle and calls [`Declarations::mandatory`], [`Declarations::optional`]
//! and [`Declarations::property`] in any order. Each declaration installs one
//! or more accessor names; once the closure returns, the installed names are
//! frozen into a [`Config`].

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::config::{Accessor, Binding, Compute, Config};
use crate::naming::Acronyms;
use crate::source::{ProcessEnv, VarSource};
use crate::{EnvError, EnvResult, Kind, Value};

/// Extra settings for a variable declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    aliases: Vec<String>,
}

impl Options {
    /// Options with no aliases.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            aliases: Vec::new(),
        }
    }

    /// Also install the declaration under `alias`.
    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Also install the declaration under every name in `aliases`.
    #[must_use]
    pub fn with_aliases<I, S>(aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            aliases: aliases.into_iter().map(Into::into).collect(),
        }
    }

    /// The aliases declared so far.
    #[must_use]
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }
}

/// Collects the accessors installed during a configuration build.
pub struct Declarations<'a> {
    source: Arc<dyn VarSource>,
    acronyms: &'a Acronyms,
    accessors: HashMap<String, Accessor>,
}

impl<'a> Declarations<'a> {
    fn new(source: Arc<dyn VarSource>, acronyms: &'a Acronyms) -> Self {
        Self {
            source,
            acronyms,
            accessors: HashMap::new(),
        }
    }

    /// Declare a variable that must be present.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::MissingVariable`] when `name` is absent from the
    /// source, and the naming errors described on [`Declarations::optional`].
    pub fn mandatory(&mut self, name: &str, kind: Kind) -> EnvResult<&mut Self> {
        self.mandatory_with(name, kind, Options::new())
    }

    /// Declare a variable that must be present, with aliases.
    ///
    /// # Errors
    ///
    /// See [`Declarations::mandatory`].
    pub fn mandatory_with(
        &mut self,
        name: &str,
        kind: Kind,
        options: Options,
    ) -> EnvResult<&mut Self> {
        if !name.is_empty() && !self.source.contains(name) {
            return Err(EnvError::missing(name));
        }
        self.declare(name, kind, Value::Null, options, true)
    }

    /// Declare a variable that may be absent; it reads as [`Value::Null`]
    /// when it is.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::EmptyName`] for an empty `name` and
    /// [`EnvError::DuplicateKey`] when a derived name or alias is already
    /// installed. Absence of the variable is never an error.
    pub fn optional(&mut self, name: &str, kind: Kind) -> EnvResult<&mut Self> {
        self.optional_with(name, kind, Value::Null, Options::new())
    }

    /// Declare a variable that reads as `default` when absent.
    ///
    /// The default is returned as given; it is never coerced.
    ///
    /// # Errors
    ///
    /// See [`Declarations::optional`].
    pub fn optional_or(
        &mut self,
        name: &str,
        kind: Kind,
        default: impl Into<Value>,
    ) -> EnvResult<&mut Self> {
        self.optional_with(name, kind, default, Options::new())
    }

    /// Declare a variable with a default and aliases.
    ///
    /// # Errors
    ///
    /// See [`Declarations::optional`].
    pub fn optional_with(
        &mut self,
        name: &str,
        kind: Kind,
        default: impl Into<Value>,
        options: Options,
    ) -> EnvResult<&mut Self> {
        self.declare(name, kind, default.into(), options, false)
    }

    /// Install `compute` under exactly `name`.
    ///
    /// Properties bypass the source and the type system; every read calls
    /// `compute` again.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::EmptyName`] for an empty `name` and
    /// [`EnvError::DuplicateKey`] when `name` is already installed.
    pub fn property<F, V>(&mut self, name: &str, compute: F) -> EnvResult<&mut Self>
    where
        F: Fn() -> V + Send + Sync + 'static,
        V: Into<Value>,
    {
        if name.is_empty() {
            return Err(EnvError::EmptyName);
        }
        self.ensure_vacant(name)?;
        let boxed: Compute = Arc::new(move || compute().into());
        self.accessors
            .insert(name.to_owned(), Accessor::Computed(boxed));
        debug!(name, "declared configuration property");
        Ok(self)
    }

    fn declare(
        &mut self,
        name: &str,
        kind: Kind,
        default: Value,
        options: Options,
        required: bool,
    ) -> EnvResult<&mut Self> {
        if name.is_empty() {
            return Err(EnvError::EmptyName);
        }
        let identifiers = self.identifiers(name, options);
        for identifier in &identifiers {
            self.ensure_vacant(identifier)?;
        }

        debug!(
            source = name,
            %kind,
            required,
            identifiers = ?identifiers,
            "declared configuration variable"
        );
        let binding = Arc::new(Binding {
            source_name: name.to_owned(),
            kind,
            default,
            source: Arc::clone(&self.source),
        });
        for identifier in identifiers {
            self.accessors
                .insert(identifier, Accessor::Variable(Arc::clone(&binding)));
        }
        Ok(self)
    }

    /// Aliases followed by the derived name, without repeats.
    fn identifiers(&self, name: &str, options: Options) -> Vec<String> {
        let mut identifiers = options.aliases;
        identifiers.push(self.acronyms.attr_name(name));
        let mut seen = Vec::with_capacity(identifiers.len());
        identifiers.retain(|identifier| {
            if seen.contains(identifier) {
                false
            } else {
                seen.push(identifier.clone());
                true
            }
        });
        identifiers
    }

    fn ensure_vacant(&self, identifier: &str) -> EnvResult<()> {
        if identifier.is_empty() {
            return Err(EnvError::EmptyName);
        }
        if self.accessors.contains_key(identifier) {
            return Err(EnvError::duplicate_key(identifier));
        }
        Ok(())
    }
}

impl fmt::Debug for Declarations<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Declarations")
            .field("accessors", &self.accessors)
            .finish_non_exhaustive()
    }
}

/// Builds a [`Config`] from a source and an acronym registry.
///
/// [`EnvBuilder::new`] reads the process environment and uses
/// [`Acronyms::global`]; both can be replaced.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use env_vars::{Acronyms, EnvBuilder, STRING};
///
/// let acronyms = Acronyms::from_words(["RTSP"]);
/// let vars = HashMap::from([("RTSP_SERVER".to_owned(), "rtsp://example.com".to_owned())]);
/// let config = EnvBuilder::new()
///     .source(vars)
///     .acronyms(&acronyms)
///     .build(|d| {
///         d.mandatory("RTSP_SERVER", STRING)?;
///         Ok(())
///     })?;
/// assert_eq!(config.get_as::<String>("RTSPServer")?, "rtsp://example.com");
/// # Ok::<(), env_vars::EnvError>(())
/// ```
pub struct EnvBuilder<'a> {
    source: Arc<dyn VarSource>,
    acronyms: &'a Acronyms,
}

impl EnvBuilder<'static> {
    /// A builder over the process environment and the global acronyms.
    #[must_use]
    pub fn new() -> Self {
        Self {
            source: Arc::new(ProcessEnv),
            acronyms: Acronyms::global(),
        }
    }
}

impl Default for EnvBuilder<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> EnvBuilder<'a> {
    /// Read variables from `source` instead.
    #[must_use]
    pub fn source(self, source: impl VarSource + 'static) -> Self {
        Self {
            source: Arc::new(source),
            acronyms: self.acronyms,
        }
    }

    /// Derive accessor names with `acronyms` instead.
    #[must_use]
    pub fn acronyms<'b>(self, acronyms: &'b Acronyms) -> EnvBuilder<'b> {
        EnvBuilder {
            source: self.source,
            acronyms,
        }
    }

    /// Run `setup` and freeze its declarations into a [`Config`].
    ///
    /// # Errors
    ///
    /// Returns the first error raised by `setup`; no configuration is
    /// produced in that case.
    pub fn build<F>(self, setup: F) -> EnvResult<Config>
    where
        F: FnOnce(&mut Declarations<'a>) -> EnvResult<()>,
    {
        let mut declarations = Declarations::new(self.source, self.acronyms);
        setup(&mut declarations)?;
        debug!(
            entries = declarations.accessors.len(),
            "configuration built"
        );
        Ok(Config::new(declarations.accessors))
    }
}

impl fmt::Debug for EnvBuilder<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvBuilder")
            .field("acronyms", &self.acronyms)
            .finish_non_exhaustive()
    }
}
