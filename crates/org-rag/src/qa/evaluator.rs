//! Answer quality evaluation
//!
//! Pure scoring over an answer and its supporting sources; no I/O,
//! deterministic given its inputs.

use crate::types::{AnswerSource, QualityChecks};

use super::prompt::{INSUFFICIENT_CONTEXT_MARKER_EN, INSUFFICIENT_CONTEXT_MARKER_ES};

/// Latency ceiling for the `latency_ok` check, in milliseconds
const LATENCY_CEILING_MS: u64 = 5000;

/// Score an answer against its sources and latency.
///
/// Weights: sources 30, non-empty answer 25, latency 20, grounded 25.
/// An answer is grounded when sources exist, the answer is non-empty, and
/// it is not the canonical insufficient-context refusal.
pub fn evaluate_answer(
    _question: &str,
    answer: &str,
    sources: &[AnswerSource],
    latency_ms: u64,
) -> QualityChecks {
    let normalized = answer.trim().to_lowercase();

    let has_sources = !sources.is_empty();
    let non_empty_answer = !normalized.is_empty();
    let latency_ok = latency_ms > 0 && latency_ms <= LATENCY_CEILING_MS;

    let says_insufficient_context = normalized.contains(INSUFFICIENT_CONTEXT_MARKER_ES)
        || normalized.contains(INSUFFICIENT_CONTEXT_MARKER_EN);

    let grounded = has_sources && non_empty_answer && !says_insufficient_context;

    let mut score = 0u8;
    if has_sources {
        score += 30;
    }
    if non_empty_answer {
        score += 25;
    }
    if latency_ok {
        score += 20;
    }
    if grounded {
        score += 25;
    }

    QualityChecks {
        has_sources,
        non_empty_answer,
        latency_ok,
        says_insufficient_context,
        grounded,
        score,
    }
}
