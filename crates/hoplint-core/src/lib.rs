//! Core domain models and logic for hoplint
//!
//! This crate contains:
//! - Declared-rule ingestion (duplicate, over-qualified and
//!   identical-endpoint flags)
//! - Probe and resolution models
//! - Issue classification (ordered category table, first match wins)
//! - Byte-budgeted suggestion packing

pub mod classify;
pub mod error;
pub mod issue;
pub mod pack;
pub mod resolution;
pub mod rule;
pub mod urlnorm;

pub use classify::{Analysis, analyze, classify};
pub use error::Error;
pub use issue::{Issue, IssueKind};
pub use pack::{DEFAULT_SUGGESTION_BUDGET_BYTES, PackedSuggestionSet, fit_into_budget};
pub use resolution::{
    MAX_REDIRECT_HOPS, ProbeStatus, ResolutionResult, TOLERATED_REDIRECT_HOPS,
};
pub use rule::{DeclaredRedirect, RedirectRule};
