//! Shorthand constructors for `EnvError`.

use super::EnvError;

impl EnvError {
    /// Construct a [`EnvError::MissingVariable`] for `name`.
    ///
    /// # Examples
    ///
    /// ```
    /// use env_vars::EnvError;
    /// let err = EnvError::missing("APP_NAME");
    /// assert_eq!(err.to_string(), "APP_NAME is not defined");
    /// ```
    #[must_use]
    pub fn missing(name: impl Into<String>) -> Self {
        Self::MissingVariable { name: name.into() }
    }

    /// Construct an [`EnvError::InvalidInteger`] for `raw`.
    #[must_use]
    pub fn invalid_integer(raw: impl Into<String>) -> Self {
        Self::InvalidInteger { raw: raw.into() }
    }

    /// Construct an [`EnvError::InvalidFloat`] for `raw`.
    #[must_use]
    pub fn invalid_float(raw: impl Into<String>) -> Self {
        Self::InvalidFloat { raw: raw.into() }
    }

    /// Construct an [`EnvError::UnknownKey`] for `name`.
    #[must_use]
    pub fn unknown_key(name: impl Into<String>) -> Self {
        Self::UnknownKey { name: name.into() }
    }

    /// Construct an [`EnvError::ReadOnly`] for `name`.
    #[must_use]
    pub fn read_only(name: impl Into<String>) -> Self {
        Self::ReadOnly { name: name.into() }
    }

    /// Construct an [`EnvError::CannotStubUndeclaredKey`] for `name`.
    #[must_use]
    pub fn cannot_stub(name: impl Into<String>) -> Self {
        Self::CannotStubUndeclaredKey { name: name.into() }
    }

    /// Construct an [`EnvError::DuplicateKey`] for `name`.
    #[must_use]
    pub fn duplicate_key(name: impl Into<String>) -> Self {
        Self::DuplicateKey { name: name.into() }
    }

    /// Returns `true` when the error is raised while building a
    /// configuration rather than while reading one.
    ///
    /// # Examples
    ///
    /// ```
    /// use env_vars::EnvError;
    /// assert!(EnvError::missing("PORT").is_build_error());
    /// assert!(!EnvError::invalid_integer("x").is_build_error());
    /// ```
    #[must_use]
    pub const fn is_build_error(&self) -> bool {
        matches!(
            self,
            Self::MissingVariable { .. } | Self::DuplicateKey { .. } | Self::EmptyName
        )
    }
}
