//! County FIPS codes.
//!
//! A county FIPS code is five ASCII digits: a two-digit state code followed
//! by a three-digit county code. Upstream tables sometimes store the code as
//! an integer, which drops the leading zero for states `01`-`09`; parsing
//! restores it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Width of a county FIPS code.
pub const FIPS_WIDTH: usize = 5;

/// Width of the state prefix of a FIPS code.
pub const STATE_CODE_WIDTH: usize = 2;

/// A validated 5-digit county FIPS code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Fips(String);

impl Fips {
    /// Build a code from its integer form, restoring leading zeros.
    pub fn from_number(code: u64) -> Result<Self, FipsError> {
        format!("{:0width$}", code, width = FIPS_WIDTH).parse()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The two-digit state code.
    pub fn state_code(&self) -> &str {
        &self.0[..STATE_CODE_WIDTH]
    }

    /// The three-digit county code within the state.
    pub fn county_code(&self) -> &str {
        &self.0[STATE_CODE_WIDTH..]
    }
}

impl FromStr for Fips {
    type Err = FipsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(FipsError(s.to_string()));
        }
        if s.len() > FIPS_WIDTH {
            return Err(FipsError(s.to_string()));
        }
        Ok(Fips(format!("{:0>width$}", s, width = FIPS_WIDTH)))
    }
}

impl TryFrom<String> for Fips {
    type Error = FipsError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Fips> for String {
    fn from(fips: Fips) -> Self {
        fips.0
    }
}

impl fmt::Display for Fips {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A value that is not a county FIPS code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a county FIPS code: '{0}'")]
pub struct FipsError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pads_leading_zero() {
        let fips: Fips = "1001".parse().unwrap();
        assert_eq!(fips.as_str(), "01001");
        assert_eq!(fips.state_code(), "01");
        assert_eq!(fips.county_code(), "001");
    }

    #[test]
    fn test_from_number() {
        assert_eq!(Fips::from_number(6037).unwrap().as_str(), "06037");
        assert_eq!(Fips::from_number(48201).unwrap().state_code(), "48");
        assert!(Fips::from_number(123456).is_err());
    }

    #[test]
    fn test_rejects_non_digits() {
        assert!("".parse::<Fips>().is_err());
        assert!("06O37".parse::<Fips>().is_err());
        assert!("060370".parse::<Fips>().is_err());
    }

    #[test]
    fn test_serde_as_string() {
        let fips: Fips = serde_json::from_str("\"06037\"").unwrap();
        assert_eq!(serde_json::to_string(&fips).unwrap(), "\"06037\"");
        assert!(serde_json::from_str::<Fips>("\"abc\"").is_err());
    }
}
