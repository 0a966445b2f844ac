//! Named sets of inset FIPS codes.
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::composite::inset::INSET_FIPS;
use crate::error::Error;

/// Every inset code.
pub fn all() -> Vec<&'static str> {
    INSET_FIPS.to_vec()
}

/// Alaska and Hawaii only.
pub fn states() -> Vec<&'static str> {
    INSET_FIPS
        .iter()
        .copied()
        .filter(|code| code.parse::<u32>().is_ok_and(|n| n < 60))
        .collect()
}

/// No insets: the contiguous states alone.
pub fn lower48() -> Vec<&'static str> {
    Vec::new()
}

/// Every inset code except those in `codes`.
pub fn exclude<S: AsRef<str>>(codes: &[S]) -> Vec<&'static str> {
    INSET_FIPS
        .iter()
        .copied()
        .filter(|code| !codes.iter().any(|c| c.as_ref() == *code))
        .collect()
}

/// The inset codes also present in `codes`, in registry order.
pub fn include<S: AsRef<str>>(codes: &[S]) -> Vec<&'static str> {
    INSET_FIPS
        .iter()
        .copied()
        .filter(|code| codes.iter().any(|c| c.as_ref() == *code))
        .collect()
}

/// A named preset of inset codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Scope {
    #[default]
    All,
    States,
    Lower48,
}

impl Scope {
    /// The FIPS codes this scope activates.
    pub fn codes(self) -> Vec<&'static str> {
        match self {
            Scope::All => all(),
            Scope::States => states(),
            Scope::Lower48 => lower48(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Scope::All => "all",
            Scope::States => "states",
            Scope::Lower48 => "lower48",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Scope::All),
            "states" => Ok(Scope::States),
            "lower48" => Ok(Scope::Lower48),
            _ => Err(Error::UnknownScope(s.to_owned())),
        }
    }
}
