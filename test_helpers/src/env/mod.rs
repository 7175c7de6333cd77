//! Helpers for safely mutating environment variables in tests.
//!
//! Every mutation and every restoration happens under one global re-entrant
//! mutex. [`set_var`] and [`remove_var`] return a guard that restores the
//! previous state of a single key when dropped; guards for the same key
//! restore in LIFO order. [`scope`] applies several changes at once and keeps
//! the mutex held until the scope is dropped, so other tests using these
//! helpers cannot observe the intermediate state.
//!
//! # Examples
//!
//! ```
//! use test_helpers::env;
//!
//! let _scope = env::scope([("HELPERS_DOC_A", Some("1")), ("HELPERS_DOC_B", None)]);
//! assert_eq!(std::env::var("HELPERS_DOC_A").as_deref(), Ok("1"));
//! assert!(std::env::var("HELPERS_DOC_B").is_err());
//! ```

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use std::env;
use std::ffi::OsString;
use std::fmt;
use std::sync::LazyLock;

static ENV_MUTEX: LazyLock<ReentrantMutex<()>> = LazyLock::new(ReentrantMutex::default);

/// Apply `value` to `key`, removing it for `None`.
///
/// # Safety
///
/// Callers must hold `ENV_MUTEX`.
unsafe fn apply(key: &str, value: Option<&OsString>) {
    match value {
        // SAFETY: upheld by the caller.
        Some(val) => unsafe { env::set_var(key, val) },
        // SAFETY: upheld by the caller.
        None => unsafe { env::remove_var(key) },
    }
}

fn replace(key: String, value: Option<OsString>) -> EnvVarGuard {
    let _lock = ENV_MUTEX.lock();
    let original = env::var_os(&key);
    // SAFETY: `ENV_MUTEX` is held.
    unsafe { apply(&key, value.as_ref()) };
    EnvVarGuard { key, original }
}

/// RAII guard restoring an environment variable to its prior value on drop.
#[must_use = "dropping restores the prior value"]
pub struct EnvVarGuard {
    key: String,
    original: Option<OsString>,
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        let _lock = ENV_MUTEX.lock();
        // SAFETY: `ENV_MUTEX` is held.
        unsafe { apply(&self.key, self.original.as_ref()) };
    }
}

impl fmt::Debug for EnvVarGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvVarGuard")
            .field("key", &self.key)
            .field("had_original", &self.original.is_some())
            .finish()
    }
}

/// Set `key` to `value` until the returned guard is dropped.
///
/// # Examples
///
/// ```
/// use test_helpers::env;
/// let guard = env::set_var("HELPERS_DOC_SET", "bar");
/// assert_eq!(std::env::var("HELPERS_DOC_SET").as_deref(), Ok("bar"));
/// drop(guard);
/// assert!(std::env::var("HELPERS_DOC_SET").is_err());
/// ```
pub fn set_var(key: impl Into<String>, value: impl Into<OsString>) -> EnvVarGuard {
    replace(key.into(), Some(value.into()))
}

/// Remove `key` until the returned guard is dropped.
pub fn remove_var(key: impl Into<String>) -> EnvVarGuard {
    replace(key.into(), None)
}

/// Holds the environment lock and a set of guards.
///
/// Guards are restored in reverse order of application before the lock is
/// released.
#[must_use = "dropping releases the environment lock and restores the variables"]
pub struct EnvScope {
    guards: Vec<EnvVarGuard>,
    _lock: ReentrantMutexGuard<'static, ()>,
}

impl Drop for EnvScope {
    fn drop(&mut self) {
        while let Some(guard) = self.guards.pop() {
            drop(guard);
        }
    }
}

impl fmt::Debug for EnvScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvScope")
            .field("guards", &self.guards)
            .finish_non_exhaustive()
    }
}

/// Apply every `(key, value)` change, removing keys paired with `None`.
///
/// The environment lock is held until the scope is dropped.
pub fn scope<'a, I>(changes: I) -> EnvScope
where
    I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
{
    let lock = ENV_MUTEX.lock();
    let guards = changes
        .into_iter()
        .map(|(key, value)| replace(key.to_owned(), value.map(OsString::from)))
        .collect();
    EnvScope {
        guards,
        _lock: lock,
    }
}

/// Run `f` while holding the environment lock.
pub fn with_lock<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_MUTEX.lock();
    f()
}
