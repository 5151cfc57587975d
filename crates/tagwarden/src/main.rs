//! Tagwarden
//!
//! Cloud resource tag governance from the command line:
//! - **Inspect**: list, filter and sort resources with coverage and compliance
//! - **Edit**: replace or remove tags on one resource
//! - **Bulk**: add or remove tags across many resources, with `--preview`

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tagwarden_logging::{init_logging, LogConfig};
use tracing::warn;

mod cli;

#[derive(Parser, Debug)]
#[command(name = "tagwarden", version, about = "Cloud resource tag governance")]
struct Cli {
    /// Enable verbose logging (info/debug to stderr)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Inventory JSON file (overrides config.toml)
    #[arg(long, global = true, env = "TAGWARDEN_INVENTORY")]
    inventory: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List resources with optional filters and sort
    List(cli::resources::ListArgs),

    /// Show one resource and its tags
    Show(cli::resources::ShowArgs),

    /// Replace all tags on a resource
    SetTags(cli::tags::SetTagsArgs),

    /// Remove one tag from a resource
    RemoveTag(cli::tags::RemoveTagArgs),

    /// Add tags to many resources
    BulkAdd(cli::bulk::BulkAddArgs),

    /// Remove a tag from many resources
    BulkRemove(cli::bulk::BulkRemoveArgs),

    /// Check tag values without touching the inventory
    Validate(cli::tags::ValidateArgs),

    /// Inventory-wide compliance summary
    Report(cli::resources::JsonFlag),

    /// Types, regions and providers available as list filters
    Filters(cli::resources::JsonFlag),

    /// Show resolved configuration
    Config(cli::config::ConfigArgs),
}

fn command_wants_json(cmd: &Commands) -> bool {
    match cmd {
        Commands::List(args) => args.json,
        Commands::Show(args) => args.json,
        Commands::SetTags(args) => args.json,
        Commands::RemoveTag(args) => args.json,
        Commands::BulkAdd(args) => args.json,
        Commands::BulkRemove(args) => args.json,
        Commands::Validate(args) => args.json,
        Commands::Report(args) | Commands::Filters(args) => args.json,
        Commands::Config(args) => args.json,
    }
}

fn run_command(cli: Cli) -> anyhow::Result<()> {
    let inventory = cli.inventory.as_deref();
    match cli.command {
        Commands::List(args) => cli::resources::run_list(args, inventory),
        Commands::Show(args) => cli::resources::run_show(args, inventory),
        Commands::SetTags(args) => cli::tags::run_set(args, inventory),
        Commands::RemoveTag(args) => cli::tags::run_remove(args, inventory),
        Commands::BulkAdd(args) => cli::bulk::run_add(args, inventory),
        Commands::BulkRemove(args) => cli::bulk::run_remove(args, inventory),
        Commands::Validate(args) => cli::tags::run_validate(args),
        Commands::Report(args) => cli::resources::run_report(args, inventory),
        Commands::Filters(args) => cli::resources::run_filters(args, inventory),
        Commands::Config(args) => cli::config::run(args, inventory),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let json_mode = command_wants_json(&cli.command);

    match init_logging(LogConfig {
        app_name: "tagwarden",
        verbose: cli.verbose,
        json_mode,
        log_dir: None,
    }) {
        Ok(Some(reason)) => warn!("File logging disabled: {}", reason),
        Ok(None) => {}
        Err(err) => eprintln!("Warning: failed to initialize logging: {:#}", err),
    }

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if json_mode {
                cli::error::print_json_error(&err);
            } else {
                eprintln!("{:?}", err);
            }
            ExitCode::from(1)
        }
    }
}
