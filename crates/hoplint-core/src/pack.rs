//! Byte-budgeted suggestion packing.
//!
//! Downstream suggestion storage accepts a bounded payload. When the full
//! problem list is too large, a subset is chosen round-robin across
//! categories, smallest members first, so one noisy category cannot crowd
//! out the rare ones.

use std::collections::{BTreeMap, VecDeque};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{Issue, IssueKind};

/// Byte budget the packed payload must stay within.
pub const DEFAULT_SUGGESTION_BUDGET_BYTES: usize = 400 * 1024;

/// Subset of issues whose combined serialized size fits a budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackedSuggestionSet {
    /// Selected issues, in their original order.
    pub issues: Vec<Issue>,
    /// True when anything had to be dropped.
    pub was_reduced: bool,
}

/// Select issues whose summed serialized size stays within `budget_bytes`.
///
/// Under budget, the input is returned unchanged. Over budget, categories
/// take turns contributing their smallest remaining member; a category whose
/// next member no longer fits is retired while the others keep filling.
/// Selection order never leaks into the output: the packed set is in input
/// order.
pub fn fit_into_budget(issues: &[Issue], budget_bytes: usize) -> PackedSuggestionSet {
    if issues.is_empty() {
        return PackedSuggestionSet {
            issues: Vec::new(),
            was_reduced: false,
        };
    }

    let sizes: Vec<usize> = issues.iter().map(Issue::serialized_size).collect();
    let total: usize = sizes.iter().sum();
    debug!(
        "{} issues serialize to {} bytes (budget {})",
        issues.len(),
        total,
        budget_bytes
    );

    if total <= budget_bytes {
        return PackedSuggestionSet {
            issues: issues.to_vec(),
            was_reduced: false,
        };
    }

    // Queue the issue indices per category, smallest serialized size first.
    let mut by_kind: BTreeMap<IssueKind, Vec<usize>> = BTreeMap::new();
    for (index, issue) in issues.iter().enumerate() {
        by_kind.entry(issue.kind).or_default().push(index);
    }
    let mut queues: Vec<VecDeque<usize>> = by_kind
        .into_values()
        .map(|mut indices| {
            indices.sort_by_key(|&index| sizes[index]);
            VecDeque::from(indices)
        })
        .collect();

    let mut selected: Vec<usize> = Vec::new();
    let mut used = 0usize;
    loop {
        let mut next_round = Vec::with_capacity(queues.len());
        for mut queue in queues {
            let Some(&index) = queue.front() else { continue };
            if used + sizes[index] > budget_bytes {
                // Even the smallest remaining member of this category no
                // longer fits; retire it and keep filling from the others.
                continue;
            }
            queue.pop_front();
            used += sizes[index];
            selected.push(index);
            if !queue.is_empty() {
                next_round.push(queue);
            }
        }
        if next_round.is_empty() {
            break;
        }
        queues = next_round;
    }

    selected.sort_unstable();
    let kept: Vec<Issue> = selected.iter().map(|&index| issues[index].clone()).collect();
    let was_reduced = kept.len() < issues.len();
    info!(
        "reduced suggestion payload to {} of {} issues ({} of {} bytes)",
        kept.len(),
        issues.len(),
        used,
        budget_bytes
    );

    PackedSuggestionSet {
        issues: kept,
        was_reduced,
    }
}
