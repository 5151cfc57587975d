//! Tagwarden core engine.
//!
//! - [`validator`]: tag value rules
//! - [`coverage`]: coverage count, compliance flag, inventory report
//! - [`query`]: filter and sort the resource list
//! - [`bulk`]: preview and commit batch tag operations
//! - [`service`]: request-level orchestration over a repository

pub mod bulk;
pub mod collation;
pub mod coverage;
pub mod query;
pub mod service;
pub mod validator;

pub use bulk::{commit, execute, plan, preview, PlannedChange, UNKNOWN_RESOURCE_NAME};
pub use collation::locale_compare;
pub use coverage::{annotate, annotate_all, compliance_report, coverage_count, is_compliant, present_tag_count};
pub use query::{filter_and_sort, filter_options};
pub use service::{ServiceResult, TagService, RESOURCE_NOT_FOUND};
pub use tagwarden_protocol::is_valid_tag_key;
pub use validator::{missing_required, validate, validate_payload, validate_single_value, validate_value};
