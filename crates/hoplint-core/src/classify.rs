//! Issue classification.
//!
//! A rule can be broken in several ways at once; classification collapses
//! the overlap to the single most actionable category via an explicit
//! ordered table. The table order is the contract, so it lives in one place
//! instead of a nested conditional.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Issue, IssueKind, RedirectRule, ResolutionResult, TOLERATED_REDIRECT_HOPS, urlnorm};

type Predicate = fn(&RedirectRule, &ResolutionResult) -> bool;

/// Priority-ordered category checks; the first match wins.
///
/// Declaration problems outrank live problems: a duplicate rule is reported
/// as a duplicate even when its chain is also broken. `redirects-to-self`
/// needs `hop_count > 0` to tell "redirected back to the start" apart from
/// a plain 200 that never redirected.
const CHECKS: &[(IssueKind, Predicate)] = &[
    (IssueKind::DuplicateSource, |rule, _| rule.is_duplicate_source),
    (IssueKind::OverQualified, |rule, _| rule.is_over_qualified),
    (IssueKind::IdenticalEndpoints, |rule, _| {
        rule.has_identical_endpoints
    }),
    (IssueKind::HttpError, |_, res| res.status.is_error()),
    (IssueKind::RedirectsToSelf, |_, res| {
        res.hop_count > 0 && urlnorm::equivalent(&res.final_url, &res.source_url)
    }),
    (IssueKind::DestinationMismatch, |_, res| {
        !res.matches_destination
    }),
    (IssueKind::TooManyRedirects, |_, res| {
        res.hop_count > TOLERATED_REDIRECT_HOPS
    }),
];

/// Assign exactly one category to a resolved rule.
pub fn classify(rule: &RedirectRule, resolution: &ResolutionResult) -> IssueKind {
    CHECKS
        .iter()
        .find(|(_, check)| check(rule, resolution))
        .map(|(kind, _)| *kind)
        .unwrap_or(IssueKind::Ok)
}

/// Classification output for a full rule list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    /// One issue per rule, in rule order.
    pub issues: Vec<Issue>,
    /// Issues per category, including `ok`.
    pub counts: BTreeMap<IssueKind, usize>,
}

impl Analysis {
    /// Issues that need fixing, in rule order.
    pub fn problems(&self) -> Vec<Issue> {
        self.issues
            .iter()
            .filter(|issue| issue.kind.is_problem())
            .cloned()
            .collect()
    }
}

/// Classify every rule against its resolution.
///
/// The slices are joined positionally; the resolver guarantees one result
/// per rule in rule order.
pub fn analyze(rules: &[RedirectRule], results: &[ResolutionResult]) -> Analysis {
    let mut issues = Vec::with_capacity(rules.len());
    let mut counts = BTreeMap::new();

    for (rule, resolution) in rules.iter().zip(results) {
        let kind = classify(rule, resolution);
        *counts.entry(kind).or_insert(0) += 1;
        issues.push(Issue {
            kind,
            rule: rule.clone(),
            resolution: resolution.clone(),
        });
    }

    Analysis { issues, counts }
}
