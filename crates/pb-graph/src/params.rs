//! Block parameter values.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered parameter map (name -> value). Insertion order is the display order.
pub type Params = IndexMap<String, ParamValue>;

/// A single block parameter: either numeric or free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Number(f64),
    Text(String),
}

impl ParamValue {
    /// Coerce raw user input: anything that parses as a finite number becomes
    /// a `Number`, everything else is kept verbatim as `Text`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => ParamValue::Number(v),
            _ => ParamValue::Text(raw.to_string()),
        }
    }

    /// Re-apply the numeric coercion to a `Text` value.
    pub fn coerce(self) -> Self {
        match self {
            ParamValue::Text(raw) => ParamValue::parse(&raw),
            number => number,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            ParamValue::Number(v) => Some(*v),
            ParamValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Text(s) => Some(s),
            ParamValue::Number(_) => None,
        }
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Number(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Text(v.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Text(v)
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Number(v) => write!(f, "{v}"),
            ParamValue::Text(s) => f.write_str(s),
        }
    }
}

/// Build a parameter map from `(name, value)` pairs, coercing every value.
pub fn coerce_all<I, K>(params: I) -> Params
where
    I: IntoIterator<Item = (K, ParamValue)>,
    K: Into<String>,
{
    params
        .into_iter()
        .map(|(k, v)| (k.into(), v.coerce()))
        .collect()
}
