//! Single low-result retry for text search.
//!
//! A biased first attempt that comes back with at most one venue is retried
//! once without the bias. Dropping the bias only broadens the search, and
//! the better of the two attempts is kept, so a retry never makes the
//! answer worse.

use venue_core::TextQuery;

/// Retry fires when the first attempt returned this many results or fewer.
pub const LOW_RESULT_THRESHOLD: usize = 1;

#[derive(Debug, Clone, PartialEq)]
pub enum RetryDecision {
    /// The first attempt stands.
    Keep,
    /// Run this bias-free query once more.
    Retry(TextQuery),
}

/// Decides whether a first attempt of `query` that produced `result_count`
/// venues earns one relaxed retry.
#[must_use]
pub fn decide(query: &TextQuery, result_count: usize) -> RetryDecision {
    if result_count <= LOW_RESULT_THRESHOLD && query.bias.is_some() {
        RetryDecision::Retry(query.without_bias())
    } else {
        RetryDecision::Keep
    }
}

/// Keeps whichever attempt found more venues; ties keep the original.
#[must_use]
pub fn keep_better<T>(original: Vec<T>, retry: Vec<T>) -> Vec<T> {
    if retry.len() > original.len() {
        retry
    } else {
        original
    }
}
