//! Request and response shapes exchanged with callers of the engine.
//!
//! Request parsing is the shape boundary: anything that gets past
//! `from_pairs` / `from_json` is well-typed, and every shape problem in a
//! payload is reported at once.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use tagwarden_ids::ResourceId;
use thiserror::Error;

use crate::taxonomy::TagKey;
use crate::types::{AnnotatedResource, Provider, Resource, TagOperation, Tags, ValidationError};

// ============================================================================
// Shape errors
// ============================================================================

/// A single shape problem, located by a dotted path into the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestIssue {
    pub path: String,
    pub message: String,
}

impl RequestIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for RequestIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RequestError {
    #[error("{message}")]
    Validation {
        message: String,
        issues: Vec<RequestIssue>,
    },
}

impl RequestError {
    pub fn validation(message: impl Into<String>, issues: Vec<RequestIssue>) -> Self {
        RequestError::Validation {
            message: message.into(),
            issues,
        }
    }

    pub fn issues(&self) -> &[RequestIssue] {
        match self {
            RequestError::Validation { issues, .. } => issues,
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        match self {
            RequestError::Validation { message, issues } => ErrorResponse::new(
                ErrorCode::ValidationError,
                message.clone(),
            )
            .with_details(serde_json::to_value(issues).unwrap_or(Value::Null)),
        }
    }
}

impl From<RequestError> for ErrorResponse {
    fn from(err: RequestError) -> Self {
        err.to_response()
    }
}

/// Accumulates issues while a payload is walked once.
#[derive(Debug, Default)]
struct IssueCollector {
    issues: Vec<RequestIssue>,
}

impl IssueCollector {
    fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.issues.push(RequestIssue::new(path, message));
    }

    fn finish<T>(self, value: T, message: &str) -> Result<T, RequestError> {
        if self.issues.is_empty() {
            Ok(value)
        } else {
            Err(RequestError::validation(message, self.issues))
        }
    }
}

// ============================================================================
// Error response
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationError,
    NotFound,
    InternalError,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            error: ErrorBody {
                code,
                message: message.into(),
                details: None,
            },
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.error.details = Some(details);
        self
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    pub fn invalid_tags(errors: &[ValidationError]) -> Self {
        Self::new(ErrorCode::ValidationError, "Invalid tags data")
            .with_details(serde_json::to_value(errors).unwrap_or(Value::Null))
    }

    pub fn code(&self) -> ErrorCode {
        self.error.code
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.error.code, self.error.message)
    }
}

// ============================================================================
// List query
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Name,
    Type,
    Provider,
    Region,
    MonthlyCost,
    TagCoverage,
}

impl SortField {
    pub const ALL: [SortField; 6] = [
        SortField::Name,
        SortField::Type,
        SortField::Provider,
        SortField::Region,
        SortField::MonthlyCost,
        SortField::TagCoverage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Type => "type",
            SortField::Provider => "provider",
            SortField::Region => "region",
            SortField::MonthlyCost => "monthlyCost",
            SortField::TagCoverage => "tagCoverage",
        }
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortField::ALL
            .iter()
            .copied()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "Invalid sort field: '{}'. Expected one of: name, type, provider, region, monthlyCost, tagCoverage",
                    s
                )
            })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!(
                "Invalid sort order: '{}'. Expected one of: asc, desc",
                other
            )),
        }
    }
}

/// Filters and sort for the resource list. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceListQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<Provider>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<SortOrder>,
}

impl ResourceListQuery {
    /// Parse raw query-string pairs.
    ///
    /// Enum-valued parameters must match exactly. Empty `type`/`region`
    /// values impose no constraint, and unrecognized parameter names are
    /// ignored.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, RequestError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut query = ResourceListQuery::default();
        let mut issues = IssueCollector::default();

        for (name, value) in pairs {
            match name {
                "provider" => match value.parse::<Provider>() {
                    Ok(provider) => query.provider = Some(provider),
                    Err(msg) => issues.push("provider", msg),
                },
                "type" => query.resource_type = non_empty(value),
                "region" => query.region = non_empty(value),
                "sortBy" => match value.parse::<SortField>() {
                    Ok(field) => query.sort_by = Some(field),
                    Err(msg) => issues.push("sortBy", msg),
                },
                "sortOrder" => match value.parse::<SortOrder>() {
                    Ok(order) => query.sort_order = Some(order),
                    Err(msg) => issues.push("sortOrder", msg),
                },
                _ => {}
            }
        }

        issues.finish(query, "Invalid query parameters")
    }

    pub fn with_provider(mut self, provider: Provider) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn with_type(mut self, resource_type: impl Into<String>) -> Self {
        self.resource_type = Some(resource_type.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn sorted_by(mut self, field: SortField, order: SortOrder) -> Self {
        self.sort_by = Some(field);
        self.sort_order = Some(order);
        self
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

// ============================================================================
// Tag payloads
// ============================================================================

/// Parse a tag mapping. Keys must be in the taxonomy and values must be
/// strings; value rules (enum sets, emptiness) are left to the validator.
pub fn parse_tags_payload(value: &Value) -> Result<Tags, RequestError> {
    let mut issues = IssueCollector::default();
    let tags = collect_tags(value, "", &mut issues);
    issues.finish(tags, "Invalid tags data")
}

fn collect_tags(value: &Value, prefix: &str, issues: &mut IssueCollector) -> Tags {
    let path = |key: &str| {
        if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", prefix, key)
        }
    };

    let Some(object) = value.as_object() else {
        issues.push(prefix, "Expected an object of tag values");
        return Tags::new();
    };

    let mut tags = Tags::new();
    for (raw_key, raw_value) in object {
        let key = match raw_key.parse::<TagKey>() {
            Ok(key) => key,
            Err(_) => {
                issues.push(path(raw_key), format!("Unrecognized tag key '{}'", raw_key));
                continue;
            }
        };
        match raw_value.as_str() {
            Some(text) => {
                tags.insert(key, text);
            }
            None => issues.push(path(raw_key), "Expected string"),
        }
    }
    tags
}

/// Parse a single tag key from a path segment.
pub fn parse_tag_key(raw: &str) -> Result<TagKey, RequestError> {
    raw.parse::<TagKey>().map_err(|_| {
        RequestError::validation(
            "Invalid tag key",
            vec![RequestIssue::new("tagKey", format!("Unrecognized tag key '{}'", raw))],
        )
    })
}

/// Parse a single resource id from a path segment.
pub fn parse_resource_id(raw: &str) -> Result<ResourceId, RequestError> {
    ResourceId::parse(raw).map_err(|e| {
        RequestError::validation("Invalid resource ID", vec![RequestIssue::new("id", e.to_string())])
    })
}

// ============================================================================
// Bulk request
// ============================================================================

/// A batch tag operation. `resource_ids` is never empty and keeps caller
/// order, duplicates included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkTagRequest {
    pub resource_ids: Vec<ResourceId>,
    pub operation: TagOperation,
    pub preview: bool,
}

impl BulkTagRequest {
    pub fn add(resource_ids: Vec<ResourceId>, tags_to_add: Tags) -> Self {
        Self {
            resource_ids,
            operation: TagOperation::Add(tags_to_add),
            preview: false,
        }
    }

    pub fn remove(resource_ids: Vec<ResourceId>, tag_key: TagKey) -> Self {
        Self {
            resource_ids,
            operation: TagOperation::Remove(tag_key),
            preview: false,
        }
    }

    pub fn with_preview(mut self, preview: bool) -> Self {
        self.preview = preview;
        self
    }

    /// Parse a JSON body carrying `resourceIds`, exactly one of
    /// `tagsToAdd` / `tagKey`, and an optional `preview` flag.
    pub fn from_json(body: &Value) -> Result<Self, RequestError> {
        const MESSAGE: &str = "Invalid bulk tag request";
        let mut issues = IssueCollector::default();

        let Some(object) = body.as_object() else {
            issues.push("", "Expected a JSON object");
            return Err(RequestError::validation(MESSAGE, issues.issues));
        };

        let resource_ids = collect_resource_ids(object, &mut issues);

        let preview = match object.get("preview") {
            None | Some(Value::Null) => false,
            Some(Value::Bool(flag)) => *flag,
            Some(_) => {
                issues.push("preview", "Expected boolean");
                false
            }
        };

        let tags_to_add = object.get("tagsToAdd").filter(|v| !v.is_null());
        let tag_key = object.get("tagKey").filter(|v| !v.is_null());

        let operation = match (tags_to_add, tag_key) {
            (Some(_), Some(_)) => {
                issues.push("", "Provide either tagsToAdd or tagKey, not both");
                None
            }
            (None, None) => {
                issues.push("", "One of tagsToAdd or tagKey is required");
                None
            }
            (Some(tags), None) => Some(TagOperation::Add(collect_tags(tags, "tagsToAdd", &mut issues))),
            (None, Some(key)) => match key.as_str().map(str::parse::<TagKey>) {
                Some(Ok(key)) => Some(TagOperation::Remove(key)),
                _ => {
                    issues.push("tagKey", "Invalid tag key");
                    None
                }
            },
        };

        match operation {
            Some(operation) if issues.issues.is_empty() => Ok(Self {
                resource_ids,
                operation,
                preview,
            }),
            _ => Err(RequestError::validation(MESSAGE, issues.issues)),
        }
    }
}

fn collect_resource_ids(object: &Map<String, Value>, issues: &mut IssueCollector) -> Vec<ResourceId> {
    let Some(raw_ids) = object.get("resourceIds").and_then(Value::as_array) else {
        issues.push("resourceIds", "resourceIds must be a non-empty array");
        return Vec::new();
    };
    if raw_ids.is_empty() {
        issues.push("resourceIds", "At least one resource ID is required");
    }

    let mut ids = Vec::with_capacity(raw_ids.len());
    for (idx, raw) in raw_ids.iter().enumerate() {
        match raw.as_str().map(ResourceId::parse) {
            Some(Ok(id)) => ids.push(id),
            Some(Err(e)) => issues.push(format!("resourceIds.{}", idx), e.to_string()),
            None => issues.push(format!("resourceIds.{}", idx), "Expected string"),
        }
    }
    ids
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceListResponse {
    pub resources: Vec<AnnotatedResource>,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceDetailResponse {
    pub resource: AnnotatedResource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateResourceTagsResponse {
    pub resource: Resource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkTagPreviewItem {
    pub resource_id: ResourceId,
    pub resource_name: String,
    pub existing_tags: Tags,
    pub new_tags: Tags,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkTagSummary {
    pub total_resources: usize,
    pub resources_to_update: usize,
    pub tags_to_add: usize,
    pub tags_to_remove: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkTagPreview {
    pub items: Vec<BulkTagPreviewItem>,
    pub summary: BulkTagSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkOperationError {
    pub resource_id: ResourceId,
    pub error: String,
}

impl BulkOperationError {
    pub const NOT_FOUND: &'static str = "Resource not found";

    pub fn not_found(resource_id: ResourceId) -> Self {
        Self {
            resource_id,
            error: Self::NOT_FOUND.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkTagResponse {
    pub success: bool,
    pub updated: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<BulkOperationError>>,
}

/// Either result of a bulk request, depending on its `preview` flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BulkTagOutcome {
    Preview(BulkTagPreview),
    Commit(BulkTagResponse),
}

/// Values a caller can offer as list filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub providers: Vec<Provider>,
    pub types: Vec<String>,
    pub regions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagPresence {
    pub tag_key: TagKey,
    pub present: usize,
}

/// Inventory-wide compliance summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceReport {
    pub total_resources: usize,
    pub compliant_resources: usize,
    pub tag_presence: Vec<TagPresence>,
    pub missing_required: Vec<ResourceId>,
}
