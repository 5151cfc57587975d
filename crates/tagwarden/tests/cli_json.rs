use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn tagwarden_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_tagwarden"))
}

fn run_cli(home: &Path, args: &[&str]) -> Output {
    let mut cmd = Command::new(tagwarden_bin());
    cmd.args(args)
        .env("TAGWARDEN_HOME", home)
        .env("RUST_LOG", "error")
        .env_remove("TAGWARDEN_INVENTORY");
    cmd.output().expect("failed to execute tagwarden CLI")
}

fn parse_json_output(output: &Output) -> Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(stdout.trim()).unwrap_or_else(|err| {
        panic!(
            "stdout is not JSON: {}\nstdout:\n{}\nstderr:\n{}",
            err,
            stdout,
            String::from_utf8_lossy(&output.stderr)
        )
    })
}

fn run_cli_json<T: DeserializeOwned>(home: &Path, args: &[&str]) -> T {
    let output = run_cli(home, args);
    assert!(
        output.status.success(),
        "command failed: {}\nstdout:\n{}\nstderr:\n{}",
        args.join(" "),
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_value(parse_json_output(&output)).expect("deserialize JSON output")
}

fn run_cli_json_error(home: &Path, args: &[&str]) -> Value {
    let output = run_cli(home, args);
    assert!(
        !output.status.success(),
        "command unexpectedly succeeded: {}\nstdout:\n{}",
        args.join(" "),
        String::from_utf8_lossy(&output.stdout)
    );
    parse_json_output(&output)
}

/// Writes the default inventory under a fresh TAGWARDEN_HOME.
fn setup() -> TempDir {
    let home = TempDir::new().expect("create temp home");
    let inventory = json!([
        {
            "id": "vm-prod-01",
            "name": "prod-web-01",
            "type": "Virtual Machine",
            "provider": "Azure",
            "region": "eastus",
            "monthlyCost": 892.30,
            "tags": {
                "Environment": "Production",
                "Owner": "platform-team",
                "BusinessUnit": "Engineering",
                "CostCenter": "IT-001",
                "Project": "Atlas"
            }
        },
        {
            "id": "db-analytics",
            "name": "analytics-db",
            "type": "SQL Database",
            "provider": "AWS",
            "region": "us-east-1",
            "monthlyCost": 245.50,
            "tags": {"Owner": "data-team"}
        },
        {
            "id": "st-backup",
            "name": "backup-store",
            "type": "Storage Account",
            "provider": "Azure",
            "region": "westeurope",
            "monthlyCost": 12,
            "tags": {}
        }
    ]);
    std::fs::write(
        home.path().join("inventory.json"),
        serde_json::to_string_pretty(&inventory).unwrap(),
    )
    .unwrap();
    home
}

fn ids(list: &Value) -> Vec<String> {
    list["resources"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn test_list_filters_sorts_and_annotates() {
    let home = setup();

    let all: Value = run_cli_json(home.path(), &["list", "--json"]);
    assert_eq!(all["total"], 3);
    assert_eq!(ids(&all), vec!["db-analytics", "st-backup", "vm-prod-01"]);
    assert_eq!(all["resources"][2]["tagCoverage"], 5);
    assert_eq!(all["resources"][2]["isCompliant"], true);

    let azure: Value = run_cli_json(
        home.path(),
        &["list", "--provider", "Azure", "--sort-by", "monthlyCost", "--sort-order", "desc", "--json"],
    );
    assert_eq!(ids(&azure), vec!["vm-prod-01", "st-backup"]);
}

#[test]
fn test_list_rejects_unknown_provider() {
    let home = setup();
    let err = run_cli_json_error(home.path(), &["list", "--provider", "IBM", "--json"]);
    assert_eq!(err["error"]["code"], "VALIDATION_ERROR");
}

#[test]
fn test_show_unknown_is_not_found() {
    let home = setup();
    let err = run_cli_json_error(home.path(), &["show", "nope", "--json"]);
    assert_eq!(err["error"]["code"], "NOT_FOUND");
    assert_eq!(err["error"]["message"], "Resource not found");
}

#[test]
fn test_set_tags_persists_and_validates() {
    let home = setup();

    let err = run_cli_json_error(
        home.path(),
        &["set-tags", "st-backup", "--tag", "Environment=Prod", "--tag", "Owner=", "--json"],
    );
    assert_eq!(err["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(err["error"]["details"].as_array().unwrap().len(), 2);

    let _: Value = run_cli_json(
        home.path(),
        &["set-tags", "st-backup", "--tag", "Environment=Staging", "--tag", "Owner=ops", "--json"],
    );
    let shown: Value = run_cli_json(home.path(), &["show", "st-backup", "--json"]);
    assert_eq!(
        shown["resource"]["tags"],
        json!({"Environment": "Staging", "Owner": "ops"})
    );
    assert_eq!(shown["resource"]["tagCoverage"], 2);
}

#[test]
fn test_remove_tag_rejects_unknown_key() {
    let home = setup();
    let err = run_cli_json_error(home.path(), &["remove-tag", "vm-prod-01", "Team", "--json"]);
    assert_eq!(err["error"]["message"], "Invalid tag key");

    let updated: Value = run_cli_json(home.path(), &["remove-tag", "vm-prod-01", "Project", "--json"]);
    assert!(updated["resource"]["tags"].get("Project").is_none());
}

#[test]
fn test_bulk_add_preview_does_not_write() {
    let home = setup();
    let before = std::fs::read_to_string(home.path().join("inventory.json")).unwrap();

    let preview: Value = run_cli_json(
        home.path(),
        &[
            "bulk-add", "--ids", "db-analytics,st-backup,ghost", "--tag", "CostCenter=FIN-9", "--preview", "--json",
        ],
    );
    assert_eq!(preview["summary"]["totalResources"], 3);
    assert_eq!(preview["summary"]["resourcesToUpdate"], 2);
    assert_eq!(preview["items"][2]["resourceName"], "Unknown");

    let after = std::fs::read_to_string(home.path().join("inventory.json")).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_bulk_add_commit_reports_missing() {
    let home = setup();
    let result: Value = run_cli_json(
        home.path(),
        &["bulk-add", "--ids", "db-analytics", "--ids", "ghost", "--tag", "Owner=x", "--json"],
    );
    assert_eq!(result["success"], false);
    assert_eq!(result["updated"], 1);
    assert_eq!(
        result["errors"],
        json!([{"resourceId": "ghost", "error": "Resource not found"}])
    );

    let shown: Value = run_cli_json(home.path(), &["show", "db-analytics", "--json"]);
    assert_eq!(shown["resource"]["tags"]["Owner"], "x");
}

#[test]
fn test_bulk_remove_preview_and_commit_counts() {
    let home = setup();
    let args = ["bulk-remove", "--ids", "vm-prod-01,db-analytics", "--key", "CostCenter"];

    let mut preview_args = args.to_vec();
    preview_args.extend(["--preview", "--json"]);
    let preview: Value = run_cli_json(home.path(), &preview_args);
    assert_eq!(preview["summary"]["resourcesToUpdate"], 1);
    assert_eq!(preview["summary"]["tagsToRemove"], 1);

    let mut commit_args = args.to_vec();
    commit_args.push("--json");
    let commit: Value = run_cli_json(home.path(), &commit_args);
    assert_eq!(commit["success"], true);
    assert_eq!(commit["updated"], 2);
    assert!(commit.get("errors").is_none());
}

#[test]
fn test_validate_command() {
    let home = setup();
    let ok: Value = run_cli_json(
        home.path(),
        &["validate", "--tag", "Environment=Testing", "--tag", "Owner=me", "--json"],
    );
    assert_eq!(ok["valid"], true);

    let err = run_cli_json_error(home.path(), &["validate", "--tag", "BusinessUnit=HR", "--json"]);
    assert_eq!(err["error"]["details"][0]["code"], "INVALID_VALUE");

    let strict = run_cli_json_error(home.path(), &["validate", "--tag", "Owner=me", "--strict", "--json"]);
    assert_eq!(strict["error"]["details"].as_array().unwrap().len(), 2);
}

#[test]
fn test_report_and_filters() {
    let home = setup();
    let report: Value = run_cli_json(home.path(), &["report", "--json"]);
    assert_eq!(report["totalResources"], 3);
    assert_eq!(report["compliantResources"], 1);
    assert_eq!(report["missingRequired"], json!(["db-analytics", "st-backup"]));

    let filters: Value = run_cli_json(home.path(), &["filters", "--json"]);
    assert_eq!(filters["providers"], json!(["Azure", "AWS", "GCP"]));
    assert_eq!(
        filters["regions"],
        json!(["eastus", "us-east-1", "westeurope"])
    );
}

#[test]
fn test_missing_inventory_is_an_error() {
    let home = TempDir::new().unwrap();
    let output = run_cli(home.path(), &["list"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Inventory not found"), "stderr: {}", stderr);
}

#[test]
fn test_inventory_flag_overrides_home() {
    let home = setup();
    let elsewhere = TempDir::new().unwrap();
    let path = elsewhere.path().join("other.json");
    std::fs::write(&path, "[]").unwrap();

    let list: Value = run_cli_json(
        home.path(),
        &["--inventory", path.to_str().unwrap(), "list", "--json"],
    );
    assert_eq!(list["total"], 0);
}
