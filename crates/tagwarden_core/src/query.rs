//! Resource filtering and sorting.

use std::cmp::Ordering;

use tagwarden_protocol::{
    FilterOptions, Provider, Resource, ResourceListQuery, SortField, SortOrder,
};

use crate::collation::locale_compare;
use crate::coverage::coverage_count;

/// Apply the query's filters, then its sort.
///
/// Filters are exact, case-sensitive, and combine with AND. The sort is
/// stable; without a `sort_by` the result is ascending by name.
pub fn filter_and_sort(all: Vec<Resource>, query: &ResourceListQuery) -> Vec<Resource> {
    let mut resources: Vec<Resource> = all.into_iter().filter(|r| matches(r, query)).collect();

    match query.sort_by {
        Some(field) => {
            let order = query.sort_order.unwrap_or_default();
            resources.sort_by(|a, b| {
                let ordering = compare_by(field, a, b);
                match order {
                    SortOrder::Asc => ordering,
                    SortOrder::Desc => ordering.reverse(),
                }
            });
        }
        None => resources.sort_by(|a, b| compare_by(SortField::Name, a, b)),
    }

    resources
}

fn matches(resource: &Resource, query: &ResourceListQuery) -> bool {
    query.provider.map_or(true, |p| resource.provider == p)
        && query
            .resource_type
            .as_deref()
            .map_or(true, |t| resource.resource_type == t)
        && query.region.as_deref().map_or(true, |r| resource.region == r)
}

fn compare_by(field: SortField, a: &Resource, b: &Resource) -> Ordering {
    match field {
        SortField::Name => locale_compare(&a.name, &b.name),
        SortField::Type => locale_compare(&a.resource_type, &b.resource_type),
        SortField::Provider => locale_compare(a.provider.as_str(), b.provider.as_str()),
        SortField::Region => locale_compare(&a.region, &b.region),
        SortField::MonthlyCost => a.monthly_cost.cmp(&b.monthly_cost),
        SortField::TagCoverage => coverage_count(&a.tags).cmp(&coverage_count(&b.tags)),
    }
}

/// Distinct filter values present in `resources`.
///
/// Providers are always the full enum; types and regions are the values
/// actually in use, in locale order.
pub fn filter_options(resources: &[Resource]) -> FilterOptions {
    FilterOptions {
        providers: Provider::ALL.to_vec(),
        types: distinct_sorted(resources.iter().map(|r| r.resource_type.as_str())),
        regions: distinct_sorted(resources.iter().map(|r| r.region.as_str())),
    }
}

fn distinct_sorted<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for value in values {
        if !out.iter().any(|existing| existing == value) {
            out.push(value.to_string());
        }
    }
    out.sort_by(|a, b| locale_compare(a, b));
    out
}
