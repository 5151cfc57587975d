//! Bulk tag mutation: preview and commit.
//!
//! Both modes plan each item through [`TagOperation::apply`]; the preview
//! renders the plan, the commit hands the same operation to the repository.

use tagwarden_protocol::{
    BulkTagOutcome, BulkTagPreview, BulkTagPreviewItem, BulkTagRequest, BulkTagResponse,
    BulkTagSummary, ResourceId, TagOperation, Tags,
};
use tagwarden_store::ResourceRepository;
use tracing::{debug, info};

/// Name reported for ids the repository does not know.
pub const UNKNOWN_RESOURCE_NAME: &str = "Unknown";

/// One id's computed change, before anything is written.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedChange {
    pub resource_id: ResourceId,
    pub resource_name: Option<String>,
    pub existing_tags: Tags,
    pub new_tags: Tags,
}

impl PlannedChange {
    pub fn is_found(&self) -> bool {
        self.resource_name.is_some()
    }

    /// Found, and the operation would change its tags.
    pub fn changes_tags(&self) -> bool {
        self.is_found() && self.new_tags != self.existing_tags
    }

    fn into_preview_item(self) -> BulkTagPreviewItem {
        BulkTagPreviewItem {
            resource_id: self.resource_id,
            resource_name: self
                .resource_name
                .unwrap_or_else(|| UNKNOWN_RESOURCE_NAME.to_string()),
            existing_tags: self.existing_tags,
            new_tags: self.new_tags,
        }
    }
}

/// Plan `operation` for every id, in input order, without mutating anything.
/// Unknown ids plan against an empty tag set.
pub fn plan(
    repository: &dyn ResourceRepository,
    resource_ids: &[ResourceId],
    operation: &TagOperation,
) -> Vec<PlannedChange> {
    resource_ids
        .iter()
        .map(|id| match repository.get_by_id(id) {
            Some(resource) => PlannedChange {
                resource_id: id.clone(),
                resource_name: Some(resource.name),
                new_tags: operation.apply(&resource.tags),
                existing_tags: resource.tags,
            },
            None => PlannedChange {
                resource_id: id.clone(),
                resource_name: None,
                new_tags: operation.apply(&Tags::new()),
                existing_tags: Tags::new(),
            },
        })
        .collect()
}

/// Dry run. Repository state is only read.
pub fn preview(repository: &dyn ResourceRepository, request: &BulkTagRequest) -> BulkTagPreview {
    let planned = plan(repository, &request.resource_ids, &request.operation);

    let summary = BulkTagSummary {
        total_resources: request.resource_ids.len(),
        resources_to_update: planned.iter().filter(|p| p.changes_tags()).count(),
        tags_to_add: request.operation.tags_to_add(),
        tags_to_remove: request.operation.tags_to_remove(),
    };
    debug!(
        operation = %request.operation.describe(),
        total = summary.total_resources,
        to_update = summary.resources_to_update,
        "Previewed bulk operation"
    );

    BulkTagPreview {
        items: planned.into_iter().map(PlannedChange::into_preview_item).collect(),
        summary,
    }
}

/// Apply the operation. Missing ids are reported per item; every found id
/// counts as updated, changed or not.
pub fn commit(repository: &mut dyn ResourceRepository, request: &BulkTagRequest) -> BulkTagResponse {
    let outcome = repository.apply_batch(&request.resource_ids, &request.operation);
    info!(
        operation = %request.operation.describe(),
        updated = outcome.updated.len(),
        errors = outcome.errors.len(),
        "Committed bulk operation"
    );

    BulkTagResponse {
        success: outcome.errors.is_empty(),
        updated: outcome.updated.len(),
        errors: if outcome.errors.is_empty() {
            None
        } else {
            Some(outcome.errors)
        },
    }
}

/// Preview or commit, as the request's flag says.
pub fn execute(repository: &mut dyn ResourceRepository, request: &BulkTagRequest) -> BulkTagOutcome {
    if request.preview {
        BulkTagOutcome::Preview(preview(repository, request))
    } else {
        BulkTagOutcome::Commit(commit(repository, request))
    }
}
