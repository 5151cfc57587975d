//! Request orchestration over a repository.
//!
//! Raw inputs (path segments, query pairs, JSON bodies) are shape-checked
//! here, value-checked by the validator, and only then handed to the query
//! and bulk engines. Every failure comes back as an [`ErrorResponse`].

use serde_json::Value;
use tagwarden_protocol::{
    parse_resource_id, parse_tag_key, parse_tags_payload, BulkTagOutcome, BulkTagRequest,
    ComplianceReport, ErrorResponse, FilterOptions, RequestError, RequestIssue, Resource,
    ResourceDetailResponse, ResourceId, ResourceListQuery, ResourceListResponse, TagKey,
    TagOperation, Tags, UpdateResourceTagsResponse,
};
use tagwarden_store::ResourceRepository;
use tracing::{debug, info};

use crate::{bulk, coverage, query, validator};

pub const RESOURCE_NOT_FOUND: &str = "Resource not found";

pub type ServiceResult<T> = Result<T, ErrorResponse>;

pub struct TagService<'a> {
    repository: &'a mut dyn ResourceRepository,
}

impl<'a> TagService<'a> {
    pub fn new(repository: &'a mut dyn ResourceRepository) -> Self {
        Self { repository }
    }

    // ------------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------------

    pub fn list(&self, query: &ResourceListQuery) -> ResourceListResponse {
        let resources = coverage::annotate_all(query::filter_and_sort(self.repository.get_all(), query));
        debug!(total = resources.len(), "Listed resources");
        ResourceListResponse {
            total: resources.len(),
            resources,
        }
    }

    /// List from raw query-string pairs; bad enum values are rejected.
    pub fn list_from_pairs<'q, I>(&self, pairs: I) -> ServiceResult<ResourceListResponse>
    where
        I: IntoIterator<Item = (&'q str, &'q str)>,
    {
        let query = ResourceListQuery::from_pairs(pairs)?;
        Ok(self.list(&query))
    }

    pub fn get(&self, raw_id: &str) -> ServiceResult<ResourceDetailResponse> {
        let id = parse_resource_id(raw_id)?;
        let resource = self.find(&id)?;
        Ok(ResourceDetailResponse {
            resource: coverage::annotate(resource),
        })
    }

    pub fn filter_options(&self) -> FilterOptions {
        query::filter_options(&self.repository.get_all())
    }

    pub fn compliance_report(&self) -> ComplianceReport {
        coverage::compliance_report(&self.repository.get_all())
    }

    // ------------------------------------------------------------------------
    // Single-resource writes
    // ------------------------------------------------------------------------

    /// Replace a resource's tags with a JSON tag mapping.
    pub fn update_tags(&mut self, raw_id: &str, payload: &Value) -> ServiceResult<UpdateResourceTagsResponse> {
        let id = parse_resource_id(raw_id)?;
        let tags = parse_tags_payload(payload)?;
        self.replace_tags(&id, tags)
    }

    pub fn replace_tags(&mut self, id: &ResourceId, tags: Tags) -> ServiceResult<UpdateResourceTagsResponse> {
        let tags = validator::validate_payload(tags).map_err(|errors| ErrorResponse::invalid_tags(&errors))?;
        let resource = self
            .repository
            .set_tags(id, tags)
            .ok_or_else(|| ErrorResponse::not_found(RESOURCE_NOT_FOUND))?;
        info!(resource_id = %id, tags = resource.tags.len(), "Replaced tags");
        Ok(UpdateResourceTagsResponse { resource })
    }

    pub fn remove_tag(&mut self, raw_id: &str, raw_key: &str) -> ServiceResult<UpdateResourceTagsResponse> {
        let id = parse_resource_id(raw_id)?;
        let key = parse_tag_key(raw_key)?;
        self.remove_tag_key(&id, key)
    }

    pub fn remove_tag_key(&mut self, id: &ResourceId, key: TagKey) -> ServiceResult<UpdateResourceTagsResponse> {
        let resource = self
            .repository
            .remove_tag(id, key)
            .ok_or_else(|| ErrorResponse::not_found(RESOURCE_NOT_FOUND))?;
        info!(resource_id = %id, tag_key = %key, "Removed tag");
        Ok(UpdateResourceTagsResponse { resource })
    }

    // ------------------------------------------------------------------------
    // Bulk writes
    // ------------------------------------------------------------------------

    /// Bulk add or remove from a JSON body.
    pub fn bulk(&mut self, body: &Value) -> ServiceResult<BulkTagOutcome> {
        let request = BulkTagRequest::from_json(body)?;
        self.bulk_request(&request)
    }

    /// Bulk add from a JSON body; the body must carry `tagsToAdd`.
    pub fn bulk_add(&mut self, body: &Value) -> ServiceResult<BulkTagOutcome> {
        let request = BulkTagRequest::from_json(body)?;
        match request.operation {
            TagOperation::Add(_) => self.bulk_request(&request),
            TagOperation::Remove(_) => Err(bulk_shape_error("tagsToAdd is required")),
        }
    }

    /// Bulk remove from a JSON body; the body must carry `tagKey`.
    pub fn bulk_remove(&mut self, body: &Value) -> ServiceResult<BulkTagOutcome> {
        let request = BulkTagRequest::from_json(body)?;
        match request.operation {
            TagOperation::Remove(_) => self.bulk_request(&request),
            TagOperation::Add(_) => Err(bulk_shape_error("tagKey is required")),
        }
    }

    /// Validate added tag values, then preview or commit.
    pub fn bulk_request(&mut self, request: &BulkTagRequest) -> ServiceResult<BulkTagOutcome> {
        if let TagOperation::Add(tags) = &request.operation {
            let errors = validator::validate(tags);
            if !errors.is_empty() {
                return Err(ErrorResponse::invalid_tags(&errors));
            }
        }
        Ok(bulk::execute(&mut *self.repository, request))
    }

    fn find(&self, id: &ResourceId) -> ServiceResult<Resource> {
        self.repository
            .get_by_id(id)
            .ok_or_else(|| ErrorResponse::not_found(RESOURCE_NOT_FOUND))
    }
}

fn bulk_shape_error(message: &str) -> ErrorResponse {
    RequestError::validation(
        "Invalid bulk tag request",
        vec![RequestIssue::new("", message)],
    )
    .into()
}
