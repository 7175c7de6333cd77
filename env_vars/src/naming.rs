//! Derivation of accessor names from variable names.
//!
//! `APP_NAME` becomes `appName`: the variable is split on `_`, the first word
//! is lower-cased and each following word is capitalised. Words listed in an
//! [`Acronyms`] registry keep their upper-case spelling wherever they appear,
//! so `FORCE_SSL` becomes `forceSSL`.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use parking_lot::RwLock;

/// Initialisms upper-cased by [`Acronyms::new`].
pub const DEFAULT_ACRONYMS: &[&str] = &[
    "ACL", "API", "ASCII", "CPU", "CSS", "DNS", "EOF", "GUID", "HTML", "HTTP", "HTTPS", "ID",
    "IP", "JSON", "LHS", "QPS", "RAM", "RHS", "RPC", "SLA", "SMTP", "SQL", "SSH", "SSL", "TCP",
    "TLS", "TTL", "UDP", "UI", "UID", "UUID", "URI", "URL", "UTF8", "VM", "XML", "XMPP", "XSRF",
    "XSS",
];

static GLOBAL: LazyLock<Acronyms> = LazyLock::new(Acronyms::new);

/// A set of words that keep their upper-case spelling in accessor names.
///
/// The registry is interior-mutable so it can be shared. The instance
/// returned by [`Acronyms::global`] is used by [`attr_name`] and by
/// [`crate::env`]; changes to it are visible to every later build in the
/// process and have no reset, so tests that mutate it must not run
/// concurrently with tests that depend on its contents. Prefer a private
/// registry passed to [`crate::EnvBuilder::acronyms`] when a change should
/// stay local.
#[derive(Debug)]
pub struct Acronyms {
    words: RwLock<BTreeSet<String>>,
}

impl Acronyms {
    /// Create a registry seeded with [`DEFAULT_ACRONYMS`].
    #[must_use]
    pub fn new() -> Self {
        Self::from_words(DEFAULT_ACRONYMS.iter().copied())
    }

    /// Create a registry with no entries.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            words: RwLock::new(BTreeSet::new()),
        }
    }

    /// Create a registry holding exactly `words`.
    #[must_use]
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let upper = words
            .into_iter()
            .map(|word| word.as_ref().to_uppercase())
            .collect();
        Self {
            words: RwLock::new(upper),
        }
    }

    /// The process-wide registry.
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Add `word`; returns `false` if it was already present.
    pub fn insert(&self, word: &str) -> bool {
        self.words.write().insert(word.to_uppercase())
    }

    /// Remove `word`; returns `false` if it was not present.
    pub fn remove(&self, word: &str) -> bool {
        self.words.write().remove(&word.to_uppercase())
    }

    /// Whether `word`, compared upper-cased, is registered.
    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.words.read().contains(&word.to_uppercase())
    }

    /// Number of registered words.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.read().len()
    }

    /// Whether the registry has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.read().is_empty()
    }

    /// Derive the accessor name for `name` against this registry.
    #[must_use]
    pub fn attr_name(&self, name: &str) -> String {
        let words = self.words.read();
        let mut out = String::with_capacity(name.len());
        for (index, word) in name.split('_').enumerate() {
            let upper = word.to_uppercase();
            if words.contains(&upper) {
                out.push_str(&upper);
            } else if index == 0 {
                out.push_str(&word.to_lowercase());
            } else {
                push_capitalised(&mut out, &word.to_lowercase());
            }
        }
        out
    }
}

impl Default for Acronyms {
    fn default() -> Self {
        Self::new()
    }
}

fn push_capitalised(out: &mut String, word: &str) {
    let mut chars = word.chars();
    if let Some(first) = chars.next() {
        out.extend(first.to_uppercase());
        out.push_str(chars.as_str());
    }
}

/// Derive the accessor name for `name` using the global registry.
///
/// # Examples
///
/// ```
/// use env_vars::attr_name;
/// assert_eq!(attr_name("APP_NAME"), "appName");
/// assert_eq!(attr_name("FORCE_SSL"), "forceSSL");
/// ```
#[must_use]
pub fn attr_name(name: &str) -> String {
    Acronyms::global().attr_name(name)
}

/// Derive the accessor name for `name` using `acronyms`.
#[must_use]
pub fn attr_name_with(name: &str, acronyms: &Acronyms) -> String {
    acronyms.attr_name(name)
}
