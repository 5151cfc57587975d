//! Single-resource tag commands: set-tags, remove-tag, validate

use std::path::Path;

use serde_json::{Map, Value};
use tagwarden_core::{coverage_count, is_compliant, missing_required, validate};
use tagwarden_protocol::{
    parse_tags_payload, ErrorResponse, UpdateResourceTagsResponse, ValidationError,
};

use crate::cli::error::HelpfulError;
use crate::cli::inventory::Inventory;
use crate::cli::output::{compliance_cell, coverage_cell, format_tags, print_json};

/// Parse repeated `KEY=VALUE` arguments into a JSON tag mapping.
///
/// Splits on the first `=`; the value may be empty. Later duplicates win.
pub fn parse_tag_args(raw: &[String]) -> Result<Value, HelpfulError> {
    let mut map = Map::new();
    for arg in raw {
        let (key, value) = arg
            .split_once('=')
            .ok_or_else(|| HelpfulError::invalid_tag_argument(arg))?;
        map.insert(key.trim().to_string(), Value::String(value.to_string()));
    }
    Ok(Value::Object(map))
}

/// Arguments for the set-tags command
#[derive(Debug, clap::Args)]
pub struct SetTagsArgs {
    /// Resource id
    pub id: String,

    /// Tag as KEY=VALUE; repeat for several. Replaces all existing tags.
    #[arg(short = 't', long = "tag")]
    pub tags: Vec<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run_set(args: SetTagsArgs, inventory_flag: Option<&Path>) -> anyhow::Result<()> {
    let payload = parse_tag_args(&args.tags)?;
    let mut inventory = Inventory::open(inventory_flag)?;
    let response = inventory
        .service()
        .update_tags(&args.id, &payload)
        .map_err(HelpfulError::from_response)?;
    inventory.save()?;
    print_updated(&response, args.json)
}

/// Arguments for the remove-tag command
#[derive(Debug, clap::Args)]
pub struct RemoveTagArgs {
    /// Resource id
    pub id: String,

    /// Tag key to remove (e.g. CostCenter)
    pub key: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run_remove(args: RemoveTagArgs, inventory_flag: Option<&Path>) -> anyhow::Result<()> {
    let mut inventory = Inventory::open(inventory_flag)?;
    let response = inventory
        .service()
        .remove_tag(&args.id, &args.key)
        .map_err(HelpfulError::from_response)?;
    inventory.save()?;
    print_updated(&response, args.json)
}

fn print_updated(response: &UpdateResourceTagsResponse, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(response);
    }
    let r = &response.resource;
    println!("Updated {} ({})", r.name, r.id);
    println!("  Tags: {}", format_tags(&r.tags));
    Ok(())
}

/// Arguments for the validate command
#[derive(Debug, clap::Args)]
pub struct ValidateArgs {
    /// Tag as KEY=VALUE; repeat for several
    #[arg(short = 't', long = "tag")]
    pub tags: Vec<String>,

    /// Also require Environment, Owner and BusinessUnit
    #[arg(long)]
    pub strict: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Check a tag set without touching the inventory.
pub fn run_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let payload = parse_tag_args(&args.tags)?;
    let tags = parse_tags_payload(&payload).map_err(|e| HelpfulError::from_response(e.into()))?;

    let mut errors: Vec<ValidationError> = validate(&tags);
    if args.strict {
        errors.extend(missing_required(&tags));
    }

    if !errors.is_empty() {
        return Err(HelpfulError::from_response(ErrorResponse::invalid_tags(&errors)).into());
    }

    if args.json {
        return print_json(&serde_json::json!({
            "valid": true,
            "tagCoverage": coverage_count(&tags),
            "isCompliant": is_compliant(&tags),
        }));
    }

    println!("Tags are valid: {}", format_tags(&tags));
    println!(
        "  Coverage: {}  Compliant: {}",
        coverage_cell(coverage_count(&tags)).0,
        compliance_cell(is_compliant(&tags)).0
    );
    Ok(())
}
