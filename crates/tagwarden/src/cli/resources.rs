//! Read-only commands: list, show, filters, report

use std::path::Path;

use tagwarden_protocol::{AnnotatedResource, TagKey};

use crate::cli::error::HelpfulError;
use crate::cli::inventory::Inventory;
use crate::cli::output::{
    compliance_cell, coverage_cell, format_cost, format_tags, print_json, print_table,
    print_table_colored,
};

/// Arguments for the list command
#[derive(Debug, clap::Args)]
pub struct ListArgs {
    /// Only this provider (Azure, AWS, GCP)
    #[arg(long)]
    pub provider: Option<String>,

    /// Only this resource type (exact match)
    #[arg(long = "type")]
    pub resource_type: Option<String>,

    /// Only this region (exact match)
    #[arg(long)]
    pub region: Option<String>,

    /// Sort field: name, type, provider, region, monthlyCost, tagCoverage
    #[arg(long)]
    pub sort_by: Option<String>,

    /// Sort direction: asc or desc
    #[arg(long)]
    pub sort_order: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl ListArgs {
    /// The flags as query-string pairs, so parsing matches the API.
    fn query_pairs(&self) -> Vec<(&str, &str)> {
        [
            ("provider", &self.provider),
            ("type", &self.resource_type),
            ("region", &self.region),
            ("sortBy", &self.sort_by),
            ("sortOrder", &self.sort_order),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.as_deref().map(|v| (name, v)))
        .collect()
    }
}

pub fn run_list(args: ListArgs, inventory_flag: Option<&Path>) -> anyhow::Result<()> {
    let mut inventory = Inventory::open(inventory_flag)?;
    let service = inventory.service();
    let response = service
        .list_from_pairs(args.query_pairs())
        .map_err(HelpfulError::from_response)?;

    if args.json {
        return print_json(&response);
    }

    if response.resources.is_empty() {
        println!("No resources match.");
        return Ok(());
    }

    let rows = response.resources.iter().map(resource_row).collect();
    print_table_colored(
        &["ID", "NAME", "TYPE", "PROVIDER", "REGION", "COST/MO", "COVERAGE", "COMPLIANT"],
        rows,
    );
    println!("{} resource(s)", response.total);
    Ok(())
}

fn resource_row(annotated: &AnnotatedResource) -> Vec<(String, Option<comfy_table::Color>)> {
    let r = &annotated.resource;
    vec![
        (r.id.to_string(), None),
        (r.name.clone(), None),
        (r.resource_type.clone(), None),
        (r.provider.to_string(), None),
        (r.region.clone(), None),
        (format_cost(r.monthly_cost), None),
        coverage_cell(annotated.tag_coverage),
        compliance_cell(annotated.is_compliant),
    ]
}

/// Arguments for the show command
#[derive(Debug, clap::Args)]
pub struct ShowArgs {
    /// Resource id
    pub id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run_show(args: ShowArgs, inventory_flag: Option<&Path>) -> anyhow::Result<()> {
    let mut inventory = Inventory::open(inventory_flag)?;
    let detail = inventory
        .service()
        .get(&args.id)
        .map_err(HelpfulError::from_response)?;

    if args.json {
        return print_json(&detail);
    }

    let annotated = &detail.resource;
    let r = &annotated.resource;
    println!("{} ({})", r.name, r.id);
    println!("  Type:      {}", r.resource_type);
    println!("  Provider:  {}", r.provider);
    println!("  Region:    {}", r.region);
    println!("  Cost/mo:   {}", format_cost(r.monthly_cost));
    println!("  Coverage:  {}", coverage_cell(annotated.tag_coverage).0);
    println!("  Compliant: {}", compliance_cell(annotated.is_compliant).0);
    println!();

    let rows = TagKey::ALL
        .iter()
        .map(|key| {
            vec![
                key.to_string(),
                if key.is_required() { "required" } else { "optional" }.to_string(),
                r.tags.get(*key).unwrap_or("-").to_string(),
            ]
        })
        .collect();
    print_table(&["TAG", "CLASS", "VALUE"], rows);
    Ok(())
}

/// Arguments for the filters and report commands
#[derive(Debug, clap::Args)]
pub struct JsonFlag {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run_filters(args: JsonFlag, inventory_flag: Option<&Path>) -> anyhow::Result<()> {
    let mut inventory = Inventory::open(inventory_flag)?;
    let options = inventory.service().filter_options();

    if args.json {
        return print_json(&options);
    }

    let providers: Vec<String> = options.providers.iter().map(|p| p.to_string()).collect();
    println!("Providers: {}", providers.join(", "));
    println!("Types:     {}", options.types.join(", "));
    println!("Regions:   {}", options.regions.join(", "));
    Ok(())
}

pub fn run_report(args: JsonFlag, inventory_flag: Option<&Path>) -> anyhow::Result<()> {
    let mut inventory = Inventory::open(inventory_flag)?;
    let report = inventory.service().compliance_report();

    if args.json {
        return print_json(&report);
    }

    println!(
        "Compliant: {} of {} resource(s)",
        report.compliant_resources, report.total_resources
    );
    println!();

    let rows = report
        .tag_presence
        .iter()
        .map(|p| {
            vec![
                p.tag_key.to_string(),
                if p.tag_key.is_required() { "required" } else { "optional" }.to_string(),
                format!("{}/{}", p.present, report.total_resources),
            ]
        })
        .collect();
    print_table(&["TAG", "CLASS", "PRESENT"], rows);

    if !report.missing_required.is_empty() {
        println!();
        println!("Missing required tags:");
        for id in &report.missing_required {
            println!("  {}", id);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_args_to_pairs() {
        let args = ListArgs {
            provider: Some("Azure".to_string()),
            resource_type: None,
            region: Some("eastus".to_string()),
            sort_by: Some("monthlyCost".to_string()),
            sort_order: None,
            json: false,
        };
        assert_eq!(
            args.query_pairs(),
            vec![("provider", "Azure"), ("region", "eastus"), ("sortBy", "monthlyCost")]
        );
    }
}
