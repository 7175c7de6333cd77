//! Test helpers shared across crates in the `env_vars` workspace.
//!
//! [`env`] provides guards for mutating the process environment from tests;
//! [`vars`] builds an in-memory source map.

pub mod env;

use std::collections::HashMap;

/// Build an in-memory variable map from `pairs`.
///
/// # Examples
///
/// ```
/// let source = test_helpers::vars(&[("APP_NAME", "myapp")]);
/// assert_eq!(source.get("APP_NAME").map(String::as_str), Some("myapp"));
/// ```
#[must_use]
pub fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|&(key, value)| (key.to_owned(), value.to_owned()))
        .collect()
}
