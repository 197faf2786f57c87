//! Audit orchestration for hoplint
//!
//! This crate contains:
//! - Per-rule redirect resolution and the bounded-concurrency fan-out
//! - The audit runner (fetch rules, resolve, classify, pack)
//! - Suggestion sinks for delivering the packed payload downstream

pub mod audit;
pub mod resolver;
pub mod sink;

pub use audit::{AuditOptions, AuditReport, RedirectAudit};
pub use resolver::{ResolveOptions, resolve_all, resolve_rule};
pub use sink::{JsonLinesSink, SuggestionSink};
