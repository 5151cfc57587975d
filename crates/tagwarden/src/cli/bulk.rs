//! Bulk tag commands: bulk-add, bulk-remove
//!
//! `--preview` shows what would change and never writes the inventory.

use std::path::Path;

use serde_json::{json, Value};
use tagwarden_protocol::{BulkTagOutcome, BulkTagPreview, BulkTagResponse};

use crate::cli::error::HelpfulError;
use crate::cli::inventory::Inventory;
use crate::cli::output::{format_tags, print_json, print_table};
use crate::cli::tags::parse_tag_args;

/// Arguments for the bulk-add command
#[derive(Debug, clap::Args)]
pub struct BulkAddArgs {
    /// Resource ids (comma-separated or repeated)
    #[arg(long = "ids", value_delimiter = ',', required = true)]
    pub ids: Vec<String>,

    /// Tag as KEY=VALUE; repeat for several. Merged over existing tags.
    #[arg(short = 't', long = "tag", required = true)]
    pub tags: Vec<String>,

    /// Show the changes without applying them
    #[arg(long)]
    pub preview: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run_add(args: BulkAddArgs, inventory_flag: Option<&Path>) -> anyhow::Result<()> {
    let body = json!({
        "resourceIds": args.ids,
        "tagsToAdd": parse_tag_args(&args.tags)?,
        "preview": args.preview,
    });
    execute(body, args.json, inventory_flag, false)
}

/// Arguments for the bulk-remove command
#[derive(Debug, clap::Args)]
pub struct BulkRemoveArgs {
    /// Resource ids (comma-separated or repeated)
    #[arg(long = "ids", value_delimiter = ',', required = true)]
    pub ids: Vec<String>,

    /// Tag key to remove
    #[arg(short = 'k', long = "key")]
    pub key: String,

    /// Show the changes without applying them
    #[arg(long)]
    pub preview: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run_remove(args: BulkRemoveArgs, inventory_flag: Option<&Path>) -> anyhow::Result<()> {
    let body = json!({
        "resourceIds": args.ids,
        "tagKey": args.key,
        "preview": args.preview,
    });
    execute(body, args.json, inventory_flag, true)
}

fn execute(body: Value, json: bool, inventory_flag: Option<&Path>, remove: bool) -> anyhow::Result<()> {
    let mut inventory = Inventory::open(inventory_flag)?;
    let outcome = {
        let mut service = inventory.service();
        if remove {
            service.bulk_remove(&body)
        } else {
            service.bulk_add(&body)
        }
    }
    .map_err(HelpfulError::from_response)?;

    if let BulkTagOutcome::Commit(_) = &outcome {
        inventory.save()?;
    }

    if json {
        return print_json(&outcome);
    }
    match &outcome {
        BulkTagOutcome::Preview(preview) => print_preview(preview),
        BulkTagOutcome::Commit(response) => print_commit(response),
    }
    Ok(())
}

fn print_preview(preview: &BulkTagPreview) {
    let rows = preview
        .items
        .iter()
        .map(|item| {
            vec![
                item.resource_id.to_string(),
                item.resource_name.clone(),
                format_tags(&item.existing_tags),
                format_tags(&item.new_tags),
            ]
        })
        .collect();
    print_table(&["ID", "NAME", "CURRENT", "AFTER"], rows);

    let s = &preview.summary;
    println!(
        "PREVIEW: {} of {} resource(s) would change (+{} / -{} tag keys). Nothing was written.",
        s.resources_to_update, s.total_resources, s.tags_to_add, s.tags_to_remove
    );
}

fn print_commit(response: &BulkTagResponse) {
    println!("Updated {} resource(s).", response.updated);
    if let Some(errors) = &response.errors {
        println!();
        println!("{} error(s):", errors.len());
        for e in errors {
            println!("  {}: {}", e.resource_id, e.error);
        }
    }
}
