//! Tag coverage and compliance scoring.
//!
//! A tag counts as present when its value is a non-empty string. Whitespace
//! is not trimmed here; that is the validator's concern.

use tagwarden_protocol::{
    optional_keys, required_keys, AnnotatedResource, ComplianceReport, Resource, TagKey,
    TagPresence, Tags, COVERAGE_DISPLAY_CAP, MIN_OPTIONAL_TAGS_FOR_COMPLIANCE,
};

/// Number of taxonomy keys with a present value (0..=6).
pub fn present_tag_count(tags: &Tags) -> usize {
    TagKey::ALL.iter().filter(|key| tags.is_present(**key)).count()
}

/// Present tag count, capped at [`COVERAGE_DISPLAY_CAP`].
pub fn coverage_count(tags: &Tags) -> usize {
    present_tag_count(tags).min(COVERAGE_DISPLAY_CAP)
}

/// All required tags present and at least two optional ones.
pub fn is_compliant(tags: &Tags) -> bool {
    let has_required = required_keys().all(|key| tags.is_present(key));
    let optional_present = optional_keys().filter(|key| tags.is_present(*key)).count();
    has_required && optional_present >= MIN_OPTIONAL_TAGS_FOR_COMPLIANCE
}

pub fn annotate(resource: Resource) -> AnnotatedResource {
    let tag_coverage = coverage_count(&resource.tags);
    let is_compliant = is_compliant(&resource.tags);
    AnnotatedResource {
        resource,
        tag_coverage,
        is_compliant,
    }
}

pub fn annotate_all(resources: Vec<Resource>) -> Vec<AnnotatedResource> {
    resources.into_iter().map(annotate).collect()
}

/// Summarize compliance across `resources`.
///
/// `tag_presence` lists every taxonomy key in declaration order;
/// `missing_required` keeps input order.
pub fn compliance_report(resources: &[Resource]) -> ComplianceReport {
    let compliant_resources = resources.iter().filter(|r| is_compliant(&r.tags)).count();

    let tag_presence = TagKey::ALL
        .iter()
        .map(|key| TagPresence {
            tag_key: *key,
            present: resources.iter().filter(|r| r.tags.is_present(*key)).count(),
        })
        .collect();

    let missing_required = resources
        .iter()
        .filter(|r| required_keys().any(|key| !r.tags.is_present(key)))
        .map(|r| r.id.clone())
        .collect();

    ComplianceReport {
        total_resources: resources.len(),
        compliant_resources,
        tag_presence,
        missing_required,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use tagwarden_protocol::{Provider, ResourceId};

    fn tags(pairs: &[(TagKey, &str)]) -> Tags {
        pairs.iter().copied().collect()
    }

    fn full_tags() -> Tags {
        tags(&[
            (TagKey::Environment, "Production"),
            (TagKey::Owner, "platform-team"),
            (TagKey::BusinessUnit, "Engineering"),
            (TagKey::CostCenter, "IT-001"),
            (TagKey::Project, "API-v2"),
            (TagKey::Customer, "Acme"),
        ])
    }

    fn resource(id: &str, tags: Tags) -> Resource {
        Resource {
            id: ResourceId::new_unchecked(id),
            name: id.to_string(),
            resource_type: "Storage Account".to_string(),
            provider: Provider::Gcp,
            region: "us-central1".to_string(),
            monthly_cost: Decimal::new(1999, 2),
            tags,
        }
    }

    #[test]
    fn test_coverage_counts_present_keys() {
        assert_eq!(coverage_count(&Tags::new()), 0);
        assert_eq!(
            coverage_count(&tags(&[(TagKey::Owner, "a"), (TagKey::Project, "b")])),
            2
        );
    }

    #[test]
    fn test_coverage_ignores_empty_values() {
        let t = tags(&[(TagKey::Owner, ""), (TagKey::Project, "b")]);
        assert_eq!(coverage_count(&t), 1);
        // Whitespace is present for scoring purposes
        let t = tags(&[(TagKey::Owner, " ")]);
        assert_eq!(coverage_count(&t), 1);
    }

    #[test]
    fn test_coverage_capped_at_five() {
        let all = full_tags();
        assert_eq!(present_tag_count(&all), 6);
        assert_eq!(coverage_count(&all), 5);
    }

    #[test]
    fn test_compliance_rule() {
        assert!(is_compliant(&full_tags()));
        assert!(is_compliant(&full_tags().without(TagKey::Customer)));
        assert!(!is_compliant(&full_tags().without(TagKey::Customer).without(TagKey::Project)));
        assert!(!is_compliant(&full_tags().without(TagKey::Owner)));

        let mut blank_env = full_tags();
        blank_env.insert(TagKey::Environment, "");
        assert!(!is_compliant(&blank_env));
    }

    #[test]
    fn test_annotate_keeps_resource() {
        let annotated = annotate(resource("r1", full_tags()));
        assert_eq!(annotated.resource.id, "r1");
        assert_eq!(annotated.tag_coverage, 5);
        assert!(annotated.is_compliant);
    }

    #[test]
    fn test_compliance_report() {
        let resources = vec![
            resource("ok", full_tags()),
            resource("partial", tags(&[(TagKey::Owner, "me"), (TagKey::Project, "p")])),
            resource("bare", Tags::new()),
        ];
        let report = compliance_report(&resources);

        assert_eq!(report.total_resources, 3);
        assert_eq!(report.compliant_resources, 1);
        assert_eq!(report.tag_presence.len(), 6);
        assert_eq!(report.tag_presence[0].tag_key, TagKey::Environment);
        assert_eq!(report.tag_presence[0].present, 1);
        assert_eq!(report.tag_presence[1].tag_key, TagKey::Owner);
        assert_eq!(report.tag_presence[1].present, 2);
        assert_eq!(report.missing_required, vec!["partial", "bare"]);
    }
}
