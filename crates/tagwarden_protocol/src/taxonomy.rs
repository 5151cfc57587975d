//! The governance tag taxonomy.
//!
//! Six keys, split into a required class and an optional class. This table is
//! the only place the keys, their classes and their allowed values are spelled
//! out; the validator and the scorer both read it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Allowed values for the `Environment` tag.
pub const ENVIRONMENT_VALUES: &[&str] = &["Production", "Staging", "Development", "Testing"];

/// Allowed values for the `BusinessUnit` tag.
pub const BUSINESS_UNIT_VALUES: &[&str] =
    &["Engineering", "Sales", "Marketing", "Finance", "Operations"];

/// Minimum number of optional tags a compliant resource carries.
pub const MIN_OPTIONAL_TAGS_FOR_COMPLIANCE: usize = 2;

/// Coverage is displayed as "X of 5".
pub const COVERAGE_DISPLAY_CAP: usize = 5;

/// One of the six recognized tag keys.
///
/// Declaration order is taxonomy order; `Ord` and the `Tags` map follow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TagKey {
    Environment,
    Owner,
    BusinessUnit,
    CostCenter,
    Project,
    Customer,
}

/// Whether a tag counts toward the required set or the optional set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagClass {
    Required,
    Optional,
}

/// What a tag value must look like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagConstraint {
    /// Value must be one of the listed strings (exact, case-sensitive).
    OneOf(&'static [&'static str]),
    /// Any non-empty string.
    FreeText,
}

#[derive(Debug, Clone, Copy)]
pub struct TagDefinition {
    pub key: TagKey,
    pub class: TagClass,
    pub constraint: TagConstraint,
}

pub const TAXONOMY: [TagDefinition; 6] = [
    TagDefinition {
        key: TagKey::Environment,
        class: TagClass::Required,
        constraint: TagConstraint::OneOf(ENVIRONMENT_VALUES),
    },
    TagDefinition {
        key: TagKey::Owner,
        class: TagClass::Required,
        constraint: TagConstraint::FreeText,
    },
    TagDefinition {
        key: TagKey::BusinessUnit,
        class: TagClass::Required,
        constraint: TagConstraint::OneOf(BUSINESS_UNIT_VALUES),
    },
    TagDefinition {
        key: TagKey::CostCenter,
        class: TagClass::Optional,
        constraint: TagConstraint::FreeText,
    },
    TagDefinition {
        key: TagKey::Project,
        class: TagClass::Optional,
        constraint: TagConstraint::FreeText,
    },
    TagDefinition {
        key: TagKey::Customer,
        class: TagClass::Optional,
        constraint: TagConstraint::FreeText,
    },
];

impl TagKey {
    pub const ALL: [TagKey; 6] = [
        TagKey::Environment,
        TagKey::Owner,
        TagKey::BusinessUnit,
        TagKey::CostCenter,
        TagKey::Project,
        TagKey::Customer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TagKey::Environment => "Environment",
            TagKey::Owner => "Owner",
            TagKey::BusinessUnit => "BusinessUnit",
            TagKey::CostCenter => "CostCenter",
            TagKey::Project => "Project",
            TagKey::Customer => "Customer",
        }
    }

    pub fn definition(&self) -> &'static TagDefinition {
        // TAXONOMY is declared in the same order as the enum
        &TAXONOMY[*self as usize]
    }

    pub fn class(&self) -> TagClass {
        self.definition().class
    }

    pub fn constraint(&self) -> TagConstraint {
        self.definition().constraint
    }

    pub fn is_required(&self) -> bool {
        self.class() == TagClass::Required
    }

    /// Allowed values for enum-constrained keys, `None` for free text.
    pub fn allowed_values(&self) -> Option<&'static [&'static str]> {
        match self.constraint() {
            TagConstraint::OneOf(values) => Some(values),
            TagConstraint::FreeText => None,
        }
    }
}

impl fmt::Display for TagKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TagKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TagKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("Invalid tag key: '{}'", s))
    }
}

/// Keys in the required class, in taxonomy order.
pub fn required_keys() -> impl Iterator<Item = TagKey> {
    TAXONOMY
        .iter()
        .filter(|def| def.class == TagClass::Required)
        .map(|def| def.key)
}

/// Keys in the optional class, in taxonomy order.
pub fn optional_keys() -> impl Iterator<Item = TagKey> {
    TAXONOMY
        .iter()
        .filter(|def| def.class == TagClass::Optional)
        .map(|def| def.key)
}

/// Case-sensitive membership test against the six-key set.
pub fn is_valid_tag_key(key: &str) -> bool {
    key.parse::<TagKey>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_taxonomy_matches_enum_order() {
        for (idx, key) in TagKey::ALL.iter().enumerate() {
            assert_eq!(TAXONOMY[idx].key, *key);
            assert_eq!(key.definition().key, *key);
        }
    }

    #[test]
    fn test_required_and_optional_split() {
        let required: Vec<_> = required_keys().collect();
        let optional: Vec<_> = optional_keys().collect();
        assert_eq!(
            required,
            vec![TagKey::Environment, TagKey::Owner, TagKey::BusinessUnit]
        );
        assert_eq!(
            optional,
            vec![TagKey::CostCenter, TagKey::Project, TagKey::Customer]
        );
    }

    #[test]
    fn test_enum_constraints() {
        assert_eq!(TagKey::Environment.allowed_values().map(|v| v.len()), Some(4));
        assert_eq!(TagKey::BusinessUnit.allowed_values().map(|v| v.len()), Some(5));
        assert_eq!(TagKey::Owner.allowed_values(), None);
        assert_eq!(TagKey::Customer.constraint(), TagConstraint::FreeText);
    }

    #[test]
    fn test_is_valid_tag_key() {
        for key in TagKey::ALL {
            assert!(is_valid_tag_key(key.as_str()));
        }
        assert!(!is_valid_tag_key("InvalidTag"));
        assert!(!is_valid_tag_key(""));
        assert!(!is_valid_tag_key("environment"));
        assert!(!is_valid_tag_key("ENVIRONMENT"));
    }
}
