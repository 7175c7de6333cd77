//! Type descriptors and the coercion of raw strings into typed values.
//!
//! Coercion is a pure function of a [`Kind`] and a raw string. Absent
//! variables never reach it: declarations return their default instead.
//!
//! Numbers are read from the longest numeric prefix of the raw value, so
//! `"42px"` coerces to `42` and `"1.5s"` to `1.5`; a value with no numeric
//! prefix at all is an error. Arrays are split on a comma followed by any
//! number of spaces, and each item is coerced against the element kind.

use std::fmt;

use crate::{EnvError, EnvResult, Value};

/// Raw values that coerce to `true`; everything else is `false`.
pub const TRUTHY: &[&str] = &["yes", "true", "1"];

/// Describes how a raw string is turned into a [`Value`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Kind {
    /// The raw string, unchanged.
    String,
    /// A base-10 integer.
    Int,
    /// A decimal floating-point number.
    Float,
    /// A boolean; see [`TRUTHY`].
    Bool,
    /// A comma-separated list of `element` values.
    Array(Box<Kind>),
}

/// String kind.
pub const STRING: Kind = Kind::String;
/// Integer kind.
pub const INT: Kind = Kind::Int;
/// Float kind.
pub const FLOAT: Kind = Kind::Float;
/// Boolean kind.
pub const BOOL: Kind = Kind::Bool;

/// A comma-separated list of `element` values.
///
/// # Examples
///
/// ```
/// use env_vars::{FLOAT, Value, array};
/// let numbers = array(FLOAT).coerce("1.1,1.2,1.3")?;
/// assert_eq!(numbers, Value::from(vec![1.1, 1.2, 1.3]));
/// # Ok::<(), env_vars::EnvError>(())
/// ```
#[must_use]
pub fn array(element: Kind) -> Kind {
    Kind::Array(Box::new(element))
}

/// A comma-separated list of strings.
#[must_use]
pub fn string_array() -> Kind {
    array(STRING)
}

impl Kind {
    /// Coerce `raw` into a value of this kind.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::InvalidInteger`] or [`EnvError::InvalidFloat`]
    /// when `raw`, or any item of an array, has no numeric prefix.
    pub fn coerce(&self, raw: &str) -> EnvResult<Value> {
        match self {
            Self::String => Ok(Value::String(raw.to_owned())),
            Self::Int => parse_int(raw).map(Value::Int),
            Self::Float => parse_float(raw).map(Value::Float),
            Self::Bool => Ok(Value::Bool(TRUTHY.contains(&raw))),
            Self::Array(element) => split_items(raw)
                .map(|item| element.coerce(item))
                .collect::<EnvResult<Vec<_>>>()
                .map(Value::Array),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => f.write_str("string"),
            Self::Int => f.write_str("int"),
            Self::Float => f.write_str("float"),
            Self::Bool => f.write_str("bool"),
            Self::Array(element) => write!(f, "array<{element}>"),
        }
    }
}

/// Split on `,` and drop the spaces that follow each comma.
///
/// An empty input yields a single empty item.
fn split_items(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').enumerate().map(|(index, item)| {
        if index == 0 {
            item
        } else {
            item.trim_start_matches(' ')
        }
    })
}

fn parse_int(raw: &str) -> EnvResult<i64> {
    let trimmed = raw.trim_start();
    let (sign, unsigned) = split_sign(trimmed);
    let digits = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .map_or(unsigned, |end| unsigned.get(..end).unwrap_or_default());
    if digits.is_empty() {
        return Err(EnvError::invalid_integer(raw));
    }
    format!("{sign}{digits}")
        .parse()
        .map_err(|_| EnvError::invalid_integer(raw))
}

fn parse_float(raw: &str) -> EnvResult<f64> {
    let trimmed = raw.trim_start();
    let (sign, unsigned) = split_sign(trimmed);
    if unsigned.starts_with("Infinity") {
        return Ok(if sign == "-" {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }
    let end = decimal_prefix_len(unsigned);
    let number = unsigned.get(..end).unwrap_or_default();
    if end == 0 {
        return Err(EnvError::invalid_float(raw));
    }
    format!("{sign}{number}")
        .parse()
        .map_err(|_| EnvError::invalid_float(raw))
}

fn split_sign(value: &str) -> (&'static str, &str) {
    value.strip_prefix('-').map_or_else(
        || ("", value.strip_prefix('+').unwrap_or(value)),
        |rest| ("-", rest),
    )
}

/// Length of the longest `digits? (. digits?)? ([eE] [+-]? digits)?` prefix
/// holding at least one mantissa digit, or zero.
fn decimal_prefix_len(value: &str) -> usize {
    let bytes = value.as_bytes();
    let digits_from = |start: usize| {
        bytes
            .iter()
            .skip(start)
            .take_while(|byte| byte.is_ascii_digit())
            .count()
    };

    let whole = digits_from(0);
    let mut end = whole;
    let mut mantissa = whole;
    if bytes.get(end) == Some(&b'.') {
        let fraction = digits_from(end + 1);
        mantissa += fraction;
        end += 1 + fraction;
    }
    if mantissa == 0 {
        return 0;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let signed = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exponent = digits_from(end + 1 + signed);
        if exponent > 0 {
            end += 1 + signed + exponent;
        }
    }
    end
}
