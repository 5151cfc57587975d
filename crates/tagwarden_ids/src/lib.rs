//! Shared identifier wrappers for Tagwarden.
//!
//! Identifiers are opaque: the only format rule is that they are not blank.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error returned when parsing an identifier fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid {label}: {reason}")]
pub struct IdParseError {
    label: &'static str,
    reason: String,
}

impl IdParseError {
    fn new(label: &'static str, reason: impl Into<String>) -> Self {
        Self {
            label,
            reason: reason.into(),
        }
    }
}

macro_rules! define_opaque_id {
    ($name:ident, $label:expr) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl TryFrom<String> for $name {
            type Error = IdParseError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(&value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl $name {
            pub fn parse(value: &str) -> Result<Self, IdParseError> {
                if value.trim().is_empty() {
                    return Err(IdParseError::new($label, "must not be empty"));
                }
                Ok(Self(value.to_string()))
            }

            /// Wraps a value that is known to be an identifier already (for
            /// example one read back from the store).
            pub fn new_unchecked(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
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

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

define_opaque_id!(ResourceId, "resource ID");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_any_non_blank_value() {
        let id = ResourceId::parse("vm-prod-001").unwrap();
        assert_eq!(id.as_str(), "vm-prod-001");
        assert_eq!(id.to_string(), "vm-prod-001");

        // No format beyond non-empty is assumed
        assert!(ResourceId::parse("/subscriptions/abc/vm 1").is_ok());
    }

    #[test]
    fn test_parse_rejects_blank() {
        let err = ResourceId::parse("").unwrap_err();
        assert_eq!(err.to_string(), "Invalid resource ID: must not be empty");
        assert!(ResourceId::parse("   ").is_err());
        assert!("".parse::<ResourceId>().is_err());
    }

    #[test]
    fn test_serde_is_a_plain_string() {
        let id = ResourceId::new_unchecked("db-1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"db-1\"");
        let back: ResourceId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, "db-1");
    }

    #[test]
    fn test_deserialize_rejects_blank() {
        let err = serde_json::from_str::<ResourceId>("\"\"").unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
        assert!(serde_json::from_str::<ResourceId>("\"  \"").is_err());
    }
}
