mod config;
pub mod locale;
pub mod text;

use log::info;

use std::collections::HashMap;

pub use crate::config::*;

// How many entries of the word-frequency tables are carried in the stats
// summary. The full tables remain available through [text::word_frequencies].
const TOP_WORDS: usize = 20;

/// Counts per satisfaction score, over the fixed 1-5 scale.
///
/// The result always has exactly five buckets, in score order, including
/// the scores that never occur. Every valid score maps to exactly one
/// bucket, so this is the histogram a bar chart renders directly.
pub fn satisfaction_histogram(responses: &[Response]) -> Vec<(u8, u64)> {
    let mut buckets: Vec<(u8, u64)> = (1..=5).map(|score| (score, 0)).collect();
    for r in responses.iter() {
        // The score is validated on entry and on load, it is always in range.
        buckets[(r.satisfaction - 1) as usize].1 += 1;
    }
    buckets
}

/// Counts per interaction category. Categories with no occurrence produce
/// no entry, so callers must not assume all five categories are keyed.
pub fn interaction_distribution(responses: &[Response]) -> HashMap<InteractionFrequency, u64> {
    let mut counts: HashMap<InteractionFrequency, u64> = HashMap::new();
    for r in responses.iter() {
        *counts.entry(r.interaction).or_insert(0) += 1;
    }
    counts
}

/// Mean satisfaction among the responses sharing each interaction category.
/// Empty when there are no responses.
pub fn mean_satisfaction_by_interaction(
    responses: &[Response],
) -> HashMap<InteractionFrequency, f64> {
    let mut sums: HashMap<InteractionFrequency, (u64, u64)> = HashMap::new();
    for r in responses.iter() {
        let e = sums.entry(r.interaction).or_insert((0, 0));
        e.0 += r.satisfaction as u64;
        e.1 += 1;
    }
    sums.into_iter()
        .map(|(freq, (sum, count))| (freq, sum as f64 / count as f64))
        .collect()
}

/// Mean satisfaction over all responses, or `None` when there is no data.
pub fn overall_mean_satisfaction(responses: &[Response]) -> Option<f64> {
    if responses.is_empty() {
        return None;
    }
    let sum: u64 = responses.iter().map(|r| r.satisfaction as u64).sum();
    Some(sum as f64 / responses.len() as f64)
}

/// The full descriptive summary of the accumulated responses.
///
/// The grouped metrics are carried as vectors in the fixed category order
/// (absent categories skipped) so that serialized output is stable.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyStats {
    pub num_responses: u64,
    pub mean_satisfaction: Option<f64>,
    pub satisfaction_histogram: Vec<(u8, u64)>,
    pub interaction_counts: Vec<(InteractionFrequency, u64)>,
    pub mean_satisfaction_by_interaction: Vec<(InteractionFrequency, f64)>,
    pub top_benefits_words: Vec<(String, u64)>,
    pub top_concerns_words: Vec<(String, u64)>,
}

/// Computes every aggregate over the current collection.
///
/// The aggregates are recomputed fresh on every call; nothing is cached,
/// the workload is a handful of survey responses.
pub fn run_survey_stats(responses: &[Response]) -> SurveyStats {
    info!("Processing {:?} survey responses", responses.len());

    let counts = interaction_distribution(responses);
    let means = mean_satisfaction_by_interaction(responses);
    let interaction_counts: Vec<(InteractionFrequency, u64)> = InteractionFrequency::ALL
        .iter()
        .filter_map(|freq| counts.get(freq).map(|&c| (*freq, c)))
        .collect();
    let mean_by_interaction: Vec<(InteractionFrequency, f64)> = InteractionFrequency::ALL
        .iter()
        .filter_map(|freq| means.get(freq).map(|&m| (*freq, m)))
        .collect();

    let mut top_benefits = text::word_frequencies(responses, TextField::Benefits);
    top_benefits.truncate(TOP_WORDS);
    let mut top_concerns = text::word_frequencies(responses, TextField::Concerns);
    top_concerns.truncate(TOP_WORDS);

    SurveyStats {
        num_responses: responses.len() as u64,
        mean_satisfaction: overall_mean_satisfaction(responses),
        satisfaction_histogram: satisfaction_histogram(responses),
        interaction_counts,
        mean_satisfaction_by_interaction: mean_by_interaction,
        top_benefits_words: top_benefits,
        top_concerns_words: top_concerns,
    }
}
