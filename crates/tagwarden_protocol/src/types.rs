//! Core resource model shared by the store, the engine and the CLI.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tagwarden_ids::ResourceId;

use crate::taxonomy::TagKey;

// ============================================================================
// Provider
// ============================================================================

/// Cloud provider hosting a resource. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provider {
    Azure,
    #[serde(rename = "AWS")]
    Aws,
    #[serde(rename = "GCP")]
    Gcp,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::Azure, Provider::Aws, Provider::Gcp];

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Azure => "Azure",
            Provider::Aws => "AWS",
            Provider::Gcp => "GCP",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Provider::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "Invalid provider: '{}'. Expected one of: Azure, AWS, GCP",
                    s
                )
            })
    }
}

// ============================================================================
// Tags
// ============================================================================

/// Tag values keyed by taxonomy key.
///
/// Keys outside the taxonomy cannot be represented, so they are rejected when
/// a payload is deserialized rather than at validation time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tags(BTreeMap<TagKey, String>);

impl Tags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: TagKey) -> Option<&str> {
        self.0.get(&key).map(String::as_str)
    }

    pub fn insert(&mut self, key: TagKey, value: impl Into<String>) -> Option<String> {
        self.0.insert(key, value.into())
    }

    pub fn remove(&mut self, key: TagKey) -> Option<String> {
        self.0.remove(&key)
    }

    pub fn contains_key(&self, key: TagKey) -> bool {
        self.0.contains_key(&key)
    }

    /// A tag is present when it has a non-empty value.
    pub fn is_present(&self, key: TagKey) -> bool {
        self.get(key).is_some_and(|value| !value.is_empty())
    }

    pub fn keys(&self) -> impl Iterator<Item = TagKey> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TagKey, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns a copy with `other` merged over `self`. Values in `other` win.
    pub fn merged_with(&self, other: &Tags) -> Tags {
        let mut merged = self.clone();
        for (key, value) in other.iter() {
            merged.insert(key, value);
        }
        merged
    }

    /// Returns a copy without `key`.
    pub fn without(&self, key: TagKey) -> Tags {
        let mut remaining = self.clone();
        remaining.remove(key);
        remaining
    }
}

impl FromIterator<(TagKey, String)> for Tags {
    fn from_iter<I: IntoIterator<Item = (TagKey, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<(TagKey, &'a str)> for Tags {
    fn from_iter<I: IntoIterator<Item = (TagKey, &'a str)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k, v.to_string())).collect())
    }
}

// ============================================================================
// Tag operations
// ============================================================================

/// A tag mutation applied uniformly to every resource in a batch.
///
/// `apply` is the one place new tag state is computed; previews and commits
/// both go through it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagOperation {
    /// Merge these tags over the existing ones.
    Add(Tags),
    /// Delete this key if present.
    Remove(TagKey),
}

impl TagOperation {
    pub fn apply(&self, existing: &Tags) -> Tags {
        match self {
            TagOperation::Add(tags_to_add) => existing.merged_with(tags_to_add),
            TagOperation::Remove(key) => existing.without(*key),
        }
    }

    /// Number of distinct keys this operation adds.
    pub fn tags_to_add(&self) -> usize {
        match self {
            TagOperation::Add(tags) => tags.len(),
            TagOperation::Remove(_) => 0,
        }
    }

    /// Number of distinct keys this operation removes.
    pub fn tags_to_remove(&self) -> usize {
        match self {
            TagOperation::Add(_) => 0,
            TagOperation::Remove(_) => 1,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            TagOperation::Add(tags) => {
                let keys: Vec<&str> = tags.keys().map(|k| k.as_str()).collect();
                format!("add [{}]", keys.join(", "))
            }
            TagOperation::Remove(key) => format!("remove {}", key),
        }
    }
}

// ============================================================================
// Resource
// ============================================================================

/// A cloud resource. Only `tags` changes after the inventory is loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: ResourceId,
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub provider: Provider,
    pub region: String,
    pub monthly_cost: Decimal,
    #[serde(default)]
    pub tags: Tags,
}

/// A resource plus its coverage and compliance signal, as served to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedResource {
    #[serde(flatten)]
    pub resource: Resource,
    pub tag_coverage: usize,
    pub is_compliant: bool,
}

// ============================================================================
// Validation results
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationCode {
    InvalidKey,
    InvalidValue,
    MissingRequired,
    EmptyValue,
}

impl ValidationCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationCode::InvalidKey => "INVALID_KEY",
            ValidationCode::InvalidValue => "INVALID_VALUE",
            ValidationCode::MissingRequired => "MISSING_REQUIRED",
            ValidationCode::EmptyValue => "EMPTY_VALUE",
        }
    }
}

impl fmt::Display for ValidationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One tag-level violation. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    pub tag_key: TagKey,
    pub message: String,
    pub code: ValidationCode,
}
