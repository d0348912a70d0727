//! Opaque tokens used by the catalog.
//!
//! Archives carry a stable [`ArchiveToken`] next to their numeric id, and every
//! indexing run tags its rows with a fresh [`BatchId`]. Both are stored as the
//! hyphenated UUID string (36 characters).

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A token string that is not a UUID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdParseError {
    label: &'static str,
    input: String,
    reason: String,
}

impl IdParseError {
    /// The rejected text, as given.
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl fmt::Display for IdParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid {} '{}': {}", self.label, self.input, self.reason)
    }
}

impl std::error::Error for IdParseError {}

macro_rules! define_token {
    ($(#[$meta:meta])* $name:ident, $label:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generate a fresh random (v4) token.
            pub fn new() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Accept any UUID spelling, normalized to lowercase hyphenated form.
            pub fn parse(value: &str) -> Result<Self, IdParseError> {
                let uuid = Uuid::parse_str(value.trim()).map_err(|e| IdParseError {
                    label: $label,
                    input: value.to_string(),
                    reason: e.to_string(),
                })?;
                Ok(Self(uuid.hyphenated().to_string()))
            }

            /// Wrap a value read back from the catalog without re-validating it.
            pub fn from_stored(value: String) -> Self {
                Self(value)
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_token!(
    /// Unique token assigned to an archive when it is first created.
    ArchiveToken,
    "archive token"
);
define_token!(
    /// Groups every row written by one indexing run.
    BatchId,
    "batch ID"
);
