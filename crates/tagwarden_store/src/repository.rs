//! The resource repository contract and its in-memory implementation.

use std::collections::HashMap;

use rust_decimal::Decimal;
use tagwarden_protocol::{BulkOperationError, Resource, ResourceId, TagKey, TagOperation, Tags};
use tracing::{debug, warn};

use crate::error::{Result, StoreError};

/// Per-id results of a batch mutation, in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutcome {
    pub updated: Vec<Resource>,
    pub errors: Vec<BulkOperationError>,
}

/// Owns the canonical set of resources.
///
/// Reads hand out copies; callers never hold references into stored state.
/// Unknown ids are reported as `None` (single-resource calls) or as a
/// per-id error (batch calls), never as a failure of the whole call.
pub trait ResourceRepository {
    fn get_all(&self) -> Vec<Resource>;

    fn get_by_id(&self, id: &ResourceId) -> Option<Resource>;

    /// Replace the tag map wholesale.
    fn set_tags(&mut self, id: &ResourceId, tags: Tags) -> Option<Resource>;

    /// Restore the state the repository was created with.
    fn reset(&mut self);

    /// Delete `key` if present. Absent keys are a no-op; the resource is
    /// still returned.
    fn remove_tag(&mut self, id: &ResourceId, key: TagKey) -> Option<Resource> {
        let resource = self.get_by_id(id)?;
        self.set_tags(id, resource.tags.without(key))
    }

    /// Apply `operation` to every id in order. A missing id records a
    /// NOT_FOUND error and the loop moves on; found resources count as
    /// updated whether or not their tags changed.
    fn apply_batch(&mut self, ids: &[ResourceId], operation: &TagOperation) -> BatchOutcome {
        let outcome = ids.iter().fold(BatchOutcome::default(), |mut outcome, id| {
            let updated = match self.get_by_id(id) {
                Some(resource) => self.set_tags(id, operation.apply(&resource.tags)),
                None => None,
            };
            match updated {
                Some(resource) => outcome.updated.push(resource),
                None => {
                    warn!(resource_id = %id, "Batch target not found");
                    outcome.errors.push(BulkOperationError::not_found(id.clone()));
                }
            }
            outcome
        });
        debug!(
            operation = %operation.describe(),
            updated = outcome.updated.len(),
            errors = outcome.errors.len(),
            "Applied batch"
        );
        outcome
    }

    fn merge_tags(&mut self, ids: &[ResourceId], tags_to_add: &Tags) -> BatchOutcome {
        self.apply_batch(ids, &TagOperation::Add(tags_to_add.clone()))
    }

    fn remove_tag_batch(&mut self, ids: &[ResourceId], key: TagKey) -> BatchOutcome {
        self.apply_batch(ids, &TagOperation::Remove(key))
    }
}

/// Resources held in insertion order with an id index.
#[derive(Debug, Clone, Default)]
pub struct InMemoryResourceStore {
    resources: Vec<Resource>,
    index: HashMap<ResourceId, usize>,
    seed: Vec<Resource>,
}

impl InMemoryResourceStore {
    /// Build a store from an initial resource set.
    ///
    /// Rejects duplicate ids and negative monthly costs.
    pub fn new(resources: Vec<Resource>) -> Result<Self> {
        let index = build_index(&resources)?;
        Ok(Self {
            seed: resources.clone(),
            resources,
            index,
        })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Current contents without copying.
    pub fn as_slice(&self) -> &[Resource] {
        &self.resources
    }

    fn slot_mut(&mut self, id: &ResourceId) -> Option<&mut Resource> {
        let idx = *self.index.get(id)?;
        self.resources.get_mut(idx)
    }
}

fn build_index(resources: &[Resource]) -> Result<HashMap<ResourceId, usize>> {
    let mut index = HashMap::with_capacity(resources.len());
    for (idx, resource) in resources.iter().enumerate() {
        if resource.monthly_cost < Decimal::ZERO {
            return Err(StoreError::NegativeCost {
                id: resource.id.clone(),
                cost: resource.monthly_cost,
            });
        }
        if index.insert(resource.id.clone(), idx).is_some() {
            return Err(StoreError::DuplicateId(resource.id.clone()));
        }
    }
    Ok(index)
}

impl ResourceRepository for InMemoryResourceStore {
    fn get_all(&self) -> Vec<Resource> {
        self.resources.clone()
    }

    fn get_by_id(&self, id: &ResourceId) -> Option<Resource> {
        self.index
            .get(id)
            .and_then(|idx| self.resources.get(*idx))
            .cloned()
    }

    fn set_tags(&mut self, id: &ResourceId, tags: Tags) -> Option<Resource> {
        let slot = self.slot_mut(id)?;
        slot.tags = tags;
        Some(slot.clone())
    }

    fn reset(&mut self) {
        self.resources = self.seed.clone();
        // Seed ids were checked in `new`
        self.index = self
            .resources
            .iter()
            .enumerate()
            .map(|(idx, r)| (r.id.clone(), idx))
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagwarden_protocol::Provider;

    fn resource(id: &str, tags: &[(TagKey, &str)]) -> Resource {
        Resource {
            id: ResourceId::new_unchecked(id),
            name: format!("{}-name", id),
            resource_type: "Virtual Machine".to_string(),
            provider: Provider::Azure,
            region: "eastus".to_string(),
            monthly_cost: Decimal::new(10000, 2),
            tags: tags.iter().copied().collect(),
        }
    }

    fn id(raw: &str) -> ResourceId {
        ResourceId::new_unchecked(raw)
    }

    #[test]
    fn test_get_all_returns_independent_copy() {
        let store = InMemoryResourceStore::new(vec![resource("a", &[(TagKey::Owner, "x")])]).unwrap();

        let mut snapshot = store.get_all();
        snapshot[0].tags.insert(TagKey::Owner, "mutated");
        snapshot.clear();

        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get_by_id(&id("a")).unwrap().tags.get(TagKey::Owner),
            Some("x")
        );
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let err = InMemoryResourceStore::new(vec![resource("a", &[]), resource("a", &[])]).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateId(ref dup) if dup == "a"));
    }

    #[test]
    fn test_rejects_negative_cost() {
        let mut bad = resource("a", &[]);
        bad.monthly_cost = Decimal::new(-1, 0);
        assert!(matches!(
            InMemoryResourceStore::new(vec![bad]),
            Err(StoreError::NegativeCost { .. })
        ));
    }

    #[test]
    fn test_set_tags_replaces_wholesale() {
        let mut store = InMemoryResourceStore::new(vec![resource(
            "a",
            &[(TagKey::Owner, "x"), (TagKey::Project, "p")],
        )])
        .unwrap();

        let replacement: Tags = [(TagKey::Customer, "acme")].into_iter().collect();
        let updated = store.set_tags(&id("a"), replacement.clone()).unwrap();
        assert_eq!(updated.tags, replacement);
        assert_eq!(store.get_by_id(&id("a")).unwrap().tags, replacement);

        assert!(store.set_tags(&id("missing"), Tags::new()).is_none());
    }

    #[test]
    fn test_remove_tag_single() {
        let mut store = InMemoryResourceStore::new(vec![resource("a", &[(TagKey::Owner, "x")])]).unwrap();

        let updated = store.remove_tag(&id("a"), TagKey::Owner).unwrap();
        assert!(!updated.tags.contains_key(TagKey::Owner));

        // Absent key: still returns the resource
        let again = store.remove_tag(&id("a"), TagKey::Owner).unwrap();
        assert_eq!(again.id, "a");

        assert!(store.remove_tag(&id("missing"), TagKey::Owner).is_none());
    }

    #[test]
    fn test_merge_tags_continues_past_missing_ids() {
        let mut store = InMemoryResourceStore::new(vec![
            resource("a", &[(TagKey::Project, "p")]),
            resource("b", &[(TagKey::Owner, "old")]),
        ])
        .unwrap();

        let tags: Tags = [(TagKey::Owner, "x")].into_iter().collect();
        let outcome = store.merge_tags(&[id("a"), id("missing-id"), id("b")], &tags);

        assert_eq!(outcome.updated.len(), 2);
        assert_eq!(outcome.updated[0].id, "a");
        assert_eq!(outcome.updated[1].id, "b");
        assert_eq!(
            outcome.errors,
            vec![BulkOperationError::not_found(id("missing-id"))]
        );

        let a = store.get_by_id(&id("a")).unwrap();
        assert_eq!(a.tags.get(TagKey::Owner), Some("x"));
        assert_eq!(a.tags.get(TagKey::Project), Some("p"));
        assert_eq!(store.get_by_id(&id("b")).unwrap().tags.get(TagKey::Owner), Some("x"));
    }

    #[test]
    fn test_remove_batch_counts_found_resources_even_without_key() {
        let mut store = InMemoryResourceStore::new(vec![
            resource("a", &[(TagKey::CostCenter, "cc")]),
            resource("b", &[]),
        ])
        .unwrap();

        let outcome = store.remove_tag_batch(&[id("a"), id("b"), id("zzz")], TagKey::CostCenter);
        assert_eq!(outcome.updated.len(), 2);
        assert_eq!(outcome.errors.len(), 1);
        assert!(!store.get_by_id(&id("a")).unwrap().tags.contains_key(TagKey::CostCenter));
    }

    #[test]
    fn test_duplicate_ids_in_batch_are_processed_each_time() {
        let mut store = InMemoryResourceStore::new(vec![resource("a", &[])]).unwrap();
        let tags: Tags = [(TagKey::Owner, "x")].into_iter().collect();

        let outcome = store.merge_tags(&[id("a"), id("a")], &tags);
        assert_eq!(outcome.updated.len(), 2);
        assert!(outcome.errors.is_empty());
    }

    #[test]
    fn test_reset_restores_seed() {
        let mut store = InMemoryResourceStore::new(vec![resource("a", &[(TagKey::Owner, "x")])]).unwrap();
        store.set_tags(&id("a"), Tags::new());
        store.reset();
        assert_eq!(
            store.get_by_id(&id("a")).unwrap().tags.get(TagKey::Owner),
            Some("x")
        );
    }
}
