//! Lexical features derived from the free-text answers.
//!
//! The outputs feed external word-cloud and chart renderers. Nothing here
//! draws anything.

use std::collections::HashMap;

use crate::{Response, TextField};

/// Splits a free-text answer into the tokens kept for analysis.
///
/// The text is lowercased and split on whitespace; tokens of 3 characters
/// or fewer are dropped, which removes most stop words without a stop list.
/// The left-to-right order of the surviving tokens is preserved.
pub fn tokens(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| w.to_lowercase())
        .filter(|w| w.chars().count() > 3)
        .collect()
}

/// Concatenates the analysis text of the given field across all responses,
/// joined by single spaces. Responses without an answer for the field are
/// skipped entirely. Translated (canonical) text is preferred when present.
pub fn word_cloud_corpus(responses: &[Response], field: TextField) -> String {
    let parts: Vec<&str> = responses
        .iter()
        .filter_map(|r| r.analysis_text(field))
        .collect();
    parts.join(" ")
}

/// Token counts over the corpus of the given field, most frequent first.
/// Ties are broken alphabetically so the output is deterministic.
pub fn word_frequencies(responses: &[Response], field: TextField) -> Vec<(String, u64)> {
    let mut counts: HashMap<String, u64> = HashMap::new();
    for r in responses.iter() {
        if let Some(text) = r.analysis_text(field) {
            for token in tokens(text) {
                *counts.entry(token).or_insert(0) += 1;
            }
        }
    }
    let mut freqs: Vec<(String, u64)> = counts.into_iter().collect();
    freqs.sort_by(|(wa, ca), (wb, cb)| cb.cmp(ca).then_with(|| wa.cmp(wb)));
    freqs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InteractionFrequency, Response};

    fn response(benefits: Option<&str>, concerns: Option<&str>) -> Response {
        Response {
            locale: "en".to_string(),
            satisfaction: 3,
            interaction: InteractionFrequency::Weekly,
            benefits: benefits.map(|s| s.to_string()),
            concerns: concerns.map(|s| s.to_string()),
            benefits_canonical: benefits.map(|s| s.to_string()),
            concerns_canonical: concerns.map(|s| s.to_string()),
        }
    }

    #[test]
    fn tokens_lowercases_and_drops_short_words() {
        assert_eq!(
            tokens("The Area Has Great Food"),
            vec!["area".to_string(), "great".to_string(), "food".to_string()]
        );
    }

    #[test]
    fn tokens_of_empty_text_is_empty() {
        assert!(tokens("").is_empty());
        assert!(tokens("  \n ").is_empty());
        assert!(tokens("a an the").is_empty());
    }

    #[test]
    fn corpus_skips_absent_answers() {
        let rs = vec![
            response(Some("more jobs"), None),
            response(None, Some("noise")),
            response(Some("local business"), Some("litter")),
        ];
        assert_eq!(
            word_cloud_corpus(&rs, TextField::Benefits),
            "more jobs local business"
        );
        assert_eq!(word_cloud_corpus(&rs, TextField::Concerns), "noise litter");
        assert_eq!(word_cloud_corpus(&[], TextField::Benefits), "");
    }

    #[test]
    fn corpus_prefers_canonical_text() {
        let mut r = response(Some("mucho empleo"), None);
        r.benefits_canonical = Some("many jobs".to_string());
        assert_eq!(word_cloud_corpus(&[r], TextField::Benefits), "many jobs");
    }

    #[test]
    fn frequencies_sorted_by_count_then_token() {
        let rs = vec![
            response(Some("noise noise crowds"), None),
            response(Some("crowds prices"), None),
        ];
        assert_eq!(
            word_frequencies(&rs, TextField::Benefits),
            vec![
                ("crowds".to_string(), 2),
                ("noise".to_string(), 2),
                ("prices".to_string(), 1)
            ]
        );
    }
}
