//! Helpful error types for CLI commands
//!
//! Every error includes:
//! - What went wrong
//! - Context about the situation
//! - Suggestions for how to fix it

use std::fmt;
use std::path::Path;

use serde_json::Value;
use tagwarden_protocol::{ErrorCode, ErrorResponse, TagKey, ENVIRONMENT_VALUES};
use tagwarden_store::StoreError;

/// An error with helpful context and suggestions
#[derive(Debug)]
pub struct HelpfulError {
    /// The main error message
    pub message: String,
    /// Additional context about what was happening
    pub context: Option<String>,
    /// Suggestions for how to fix the error
    pub suggestions: Vec<String>,
    /// Structured form printed in --json mode
    pub response: Option<ErrorResponse>,
}

impl HelpfulError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
            response: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_suggestions(mut self, suggestions: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.suggestions.extend(suggestions.into_iter().map(|s| s.into()));
        self
    }

    // === Common error constructors ===

    /// Inventory file does not exist
    pub fn inventory_not_found(path: &Path) -> Self {
        Self::new(format!("Inventory not found: {}", path.display()))
            .with_context("Tagwarden reads resources from a JSON inventory file")
            .with_suggestions([
                format!("TRY: Check that the file exists: ls -la {}", path.display()),
                "TRY: Pass the file explicitly: tagwarden --inventory ./inventory.json list".to_string(),
                "TRY: Set `inventory = \"<path>\"` in ~/.tagwarden/config.toml".to_string(),
            ])
    }

    /// Any failure opening or saving the inventory
    pub fn from_store_error(err: &StoreError) -> Self {
        match err {
            StoreError::InventoryNotFound(path) => Self::inventory_not_found(path),
            StoreError::Parse { path, .. } => Self::new(err.to_string())
                .with_context(format!("Failed to read inventory: {}", path.display()))
                .with_suggestions([
                    "TRY: The file must be a JSON array of resources".to_string(),
                    format!(
                        "TRY: Tag keys must be one of: {}",
                        TagKey::ALL.map(|k| k.as_str()).join(", ")
                    ),
                ]),
            StoreError::DuplicateId(_) | StoreError::NegativeCost { .. } => Self::new(err.to_string())
                .with_context("The inventory failed consistency checks")
                .with_suggestion("TRY: Fix the offending resource in the inventory file"),
            StoreError::UnsupportedUrl(_) => Self::new(err.to_string())
                .with_context("Store URLs look like `memory:` or `json:<path>`")
                .with_suggestion("TRY: Check the `store` entry in ~/.tagwarden/config.toml"),
            StoreError::Io { .. } | StoreError::Serialize(_) => Self::new(err.to_string()),
        }
    }

    /// A service-level failure; keeps the structured response for --json.
    pub fn from_response(response: ErrorResponse) -> Self {
        let mut err = Self::new(response.error.message.clone());

        if let Some(details) = &response.error.details {
            let lines = detail_lines(details);
            if !lines.is_empty() {
                err = err.with_context(lines.join("; "));
            }
        }

        err = match response.code() {
            ErrorCode::NotFound => err.with_suggestion("TRY: List known ids: tagwarden list"),
            ErrorCode::ValidationError => err.with_suggestions([
                format!("TRY: Environment must be one of: {}", ENVIRONMENT_VALUES.join(", ")),
                "TRY: Check allowed values: tagwarden filters".to_string(),
            ]),
            ErrorCode::InternalError => err,
        };

        err.response = Some(response);
        err
    }

    /// `--tag` argument without `=`
    pub fn invalid_tag_argument(raw: &str) -> Self {
        Self::new(format!("Invalid tag argument: '{}'", raw))
            .with_context("Tags are given as KEY=VALUE")
            .with_suggestions([
                "TRY: --tag Environment=Production".to_string(),
                "TRY: --tag Owner=platform-team --tag CostCenter=IT-001".to_string(),
            ])
    }
}

/// Flatten `details` (request issues or validation errors) into short lines.
fn detail_lines(details: &Value) -> Vec<String> {
    let Some(items) = details.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| {
            let message = item.get("message")?.as_str()?;
            let label = item
                .get("tagKey")
                .or_else(|| item.get("path"))
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty());
            Some(match label {
                Some(label) => format!("{}: {}", label, message),
                None => message.to_string(),
            })
        })
        .collect()
}

impl fmt::Display for HelpfulError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ERROR: {}", self.message)?;

        if let Some(ctx) = &self.context {
            writeln!(f, "CONTEXT: {}", ctx)?;
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            for suggestion in &self.suggestions {
                writeln!(f, "  {}", suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for HelpfulError {}

/// Print a failure as an `ErrorResponse` on stdout for --json callers.
pub fn print_json_error(err: &anyhow::Error) {
    let response = match err.downcast_ref::<HelpfulError>() {
        Some(HelpfulError {
            response: Some(response),
            ..
        }) => response.clone(),
        Some(helpful) => ErrorResponse::new(ErrorCode::InternalError, helpful.message.clone()),
        None => ErrorResponse::new(ErrorCode::InternalError, format!("{:#}", err)),
    };
    match serde_json::to_string_pretty(&response) {
        Ok(json) => println!("{}", json),
        Err(_) => eprintln!("{:?}", err),
    }
}
