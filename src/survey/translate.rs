// Translation of free-text answers into the canonical analysis language.
//
// This is a one-shot, best-effort call made at submission time for each
// free-text field. It is never required to succeed: the submission pipeline
// falls back to storing the original text, and the result is never retried
// or re-validated afterwards.

use std::time::Duration;

use log::{debug, warn};
use serde::Deserialize;
use serde_json::json;

// The service call must not hold up a submission indefinitely.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

const CANONICAL_LANGUAGE: &str = "en";

/// A best-effort text translation capability.
pub trait Translate {
    /// Returns the text translated to the canonical analysis language, or
    /// `None` when the translation could not be obtained.
    fn translate(&self, text: &str) -> Option<String>;
}

/// Stores answers untranslated. For offline use and tests.
pub struct Passthrough;

impl Translate for Passthrough {
    fn translate(&self, text: &str) -> Option<String> {
        Some(text.to_string())
    }
}

/// Client for a LibreTranslate-compatible HTTP endpoint.
pub struct LibreTranslate {
    endpoint: String,
    client: reqwest::blocking::Client,
}

#[derive(Debug, Deserialize)]
struct TranslatedText {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

impl LibreTranslate {
    pub fn new(endpoint: &str) -> Result<LibreTranslate, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(LibreTranslate {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            client,
        })
    }
}

impl Translate for LibreTranslate {
    fn translate(&self, text: &str) -> Option<String> {
        let url = format!("{}/translate", self.endpoint);
        debug!("translate: POST {} ({} bytes)", url, text.len());
        let res = self
            .client
            .post(url)
            .json(&json!({
                "q": text,
                "source": "auto",
                "target": CANONICAL_LANGUAGE,
                "format": "text",
            }))
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.json::<TranslatedText>());
        match res {
            Ok(t) => Some(t.translated_text),
            Err(e) => {
                warn!("translate: service call failed: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passthrough_returns_the_input() {
        assert_eq!(
            Passthrough.translate("más turismo"),
            Some("más turismo".to_string())
        );
    }
}
