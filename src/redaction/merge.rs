//! Deterministic overlap resolution.
//!
//! Two spans overlap when their ranges intersect on at least one
//! character. Precedence on overlap: pass 1 beats pass 2 unconditionally;
//! within a pass, higher score wins, then the larger span, then the
//! earlier start, then rule-name lexicographic order. The output is
//! non-overlapping and ascending by start.

use crate::domain::Span;
use std::cmp::Ordering;

/// Merge pass-1 and pass-2 candidates into the accepted span set.
pub fn merge_spans(pass1: Vec<Span>, pass2: Vec<Span>) -> Vec<Span> {
    let mut candidates: Vec<(u8, Span)> = pass1
        .into_iter()
        .map(|s| (0u8, s))
        .chain(pass2.into_iter().map(|s| (1u8, s)))
        .filter(|(_, s)| !s.is_empty())
        .collect();

    candidates.sort_by(|(rank_a, a), (rank_b, b)| {
        rank_a
            .cmp(rank_b)
            .then_with(|| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal))
            .then_with(|| b.len().cmp(&a.len()))
            .then_with(|| a.start.cmp(&b.start))
            .then_with(|| a.rule_name.cmp(&b.rule_name))
    });

    let mut accepted: Vec<Span> = Vec::new();
    for (_, candidate) in candidates {
        if accepted.iter().all(|a| !a.overlaps(&candidate)) {
            accepted.push(candidate);
        }
    }

    accepted.sort_by_key(|s| (s.start, s.end));
    accepted
}
