//! Dataset year identifiers.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Identifier of one yearly dataset, as keyed in the artifact.
///
/// Years are kept as the artifact's own key text; they are compared and
/// displayed, never used for arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Year(String);

impl Year {
    pub fn new(year: impl Into<String>) -> Self {
        Year(year.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Year {
    fn from(s: &str) -> Self {
        Year(s.to_string())
    }
}

impl From<String> for Year {
    fn from(s: String) -> Self {
        Year(s)
    }
}

impl From<u16> for Year {
    fn from(y: u16) -> Self {
        Year(y.to_string())
    }
}

impl Borrow<str> for Year {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
