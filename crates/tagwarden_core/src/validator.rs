//! Tag value rules.
//!
//! A tag set may be partial; only the keys that are present are checked, and
//! every violation is reported (one per key at most).

use tagwarden_protocol::{required_keys, TagConstraint, TagKey, Tags, ValidationCode, ValidationError};

/// Check every present key. An empty result means the set is valid.
pub fn validate(tags: &Tags) -> Vec<ValidationError> {
    tags.iter()
        .filter_map(|(key, value)| validate_value(key, value))
        .collect()
}

/// Validate and hand the tags back, or the full list of violations.
pub fn validate_payload(tags: Tags) -> Result<Tags, Vec<ValidationError>> {
    let errors = validate(&tags);
    if errors.is_empty() {
        Ok(tags)
    } else {
        Err(errors)
    }
}

/// Check a single key/value pair.
///
/// Blank values (empty after trimming) are EMPTY_VALUE for every key;
/// enum-constrained keys additionally need an exact match.
pub fn validate_value(key: TagKey, value: &str) -> Option<ValidationError> {
    if value.trim().is_empty() {
        return Some(ValidationError {
            tag_key: key,
            message: format!("Tag \"{}\" cannot be empty", key),
            code: ValidationCode::EmptyValue,
        });
    }

    match key.constraint() {
        TagConstraint::OneOf(allowed) if !allowed.contains(&value) => Some(ValidationError {
            tag_key: key,
            message: format!(
                "Invalid value \"{}\" for tag \"{}\". Expected one of: {}",
                value,
                key,
                allowed.join(", ")
            ),
            code: ValidationCode::InvalidValue,
        }),
        _ => None,
    }
}

/// True iff `value` is acceptable for `key`.
pub fn validate_single_value(key: TagKey, value: &str) -> bool {
    validate_value(key, value).is_none()
}

/// MISSING_REQUIRED for each required key without a present value.
pub fn missing_required(tags: &Tags) -> Vec<ValidationError> {
    required_keys()
        .filter(|key| !tags.is_present(*key))
        .map(|key| ValidationError {
            tag_key: key,
            message: format!("Required tag \"{}\" is missing", key),
            code: ValidationCode::MissingRequired,
        })
        .collect()
}
