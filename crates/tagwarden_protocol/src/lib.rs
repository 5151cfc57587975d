//! Tagwarden protocol types.
//!
//! The governance tag taxonomy, the resource model, and the request/response
//! shapes that callers exchange with the engine. Everything here is plain data
//! plus shape parsing; the rules that judge tag values live in `tagwarden_core`.

pub mod http_types;
pub mod paths;
pub mod taxonomy;
pub mod types;

pub use http_types::{
    parse_resource_id, parse_tag_key, parse_tags_payload, BulkOperationError, BulkTagOutcome,
    BulkTagPreview, BulkTagPreviewItem, BulkTagRequest, BulkTagResponse, BulkTagSummary,
    ComplianceReport, ErrorBody, ErrorCode, ErrorResponse, FilterOptions, RequestError,
    RequestIssue, ResourceDetailResponse, ResourceListQuery, ResourceListResponse, SortField,
    SortOrder, TagPresence, UpdateResourceTagsResponse,
};
pub use tagwarden_ids::{IdParseError, ResourceId};
pub use taxonomy::{
    is_valid_tag_key, optional_keys, required_keys, TagClass, TagConstraint, TagDefinition,
    TagKey, BUSINESS_UNIT_VALUES, COVERAGE_DISPLAY_CAP, ENVIRONMENT_VALUES,
    MIN_OPTIONAL_TAGS_FOR_COMPLIANCE, TAXONOMY,
};
pub use types::{
    AnnotatedResource, Provider, Resource, TagOperation, Tags, ValidationCode, ValidationError,
};
