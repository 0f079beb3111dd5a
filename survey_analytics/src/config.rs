// ********* Survey data structures ***********

use std::error::Error;
use std::fmt::Display;

use log::warn;

/// The locale used when the submitter did not pick one, and the fallback
/// for label lookups. Also the target language of the canonical text fields.
pub const DEFAULT_LOCALE: &str = "en";

/// How often the respondent interacts with tourists.
///
/// The set is closed and the values are stored in this canonical,
/// locale-independent form. The localized strings shown to the respondent
/// are a presentation concern, see [crate::locale].
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum InteractionFrequency {
    Daily,
    Weekly,
    Monthly,
    Rarely,
    Never,
}

impl InteractionFrequency {
    /// All the categories, in presentation order.
    pub const ALL: [InteractionFrequency; 5] = [
        InteractionFrequency::Daily,
        InteractionFrequency::Weekly,
        InteractionFrequency::Monthly,
        InteractionFrequency::Rarely,
        InteractionFrequency::Never,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionFrequency::Daily => "Daily",
            InteractionFrequency::Weekly => "Weekly",
            InteractionFrequency::Monthly => "Monthly",
            InteractionFrequency::Rarely => "Rarely",
            InteractionFrequency::Never => "Never",
        }
    }

    /// Parses the canonical form. The match is exact and case-sensitive.
    pub fn parse(s: &str) -> Option<InteractionFrequency> {
        InteractionFrequency::ALL
            .iter()
            .find(|f| f.as_str() == s)
            .copied()
    }
}

/// The two free-text questions of the questionnaire.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum TextField {
    Benefits,
    Concerns,
}

/// One completed questionnaire submission.
///
/// A response is built in memory from form input, validated once and then
/// appended to the record store. It is immutable history afterwards: the
/// store never mutates, reorders or deletes it.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Response {
    pub locale: String,
    /// Always within [1,5].
    pub satisfaction: u8,
    pub interaction: InteractionFrequency,
    pub benefits: Option<String>,
    pub concerns: Option<String>,
    /// The benefits answer translated to the canonical analysis language.
    /// Present if and only if `benefits` is present.
    pub benefits_canonical: Option<String>,
    /// Present if and only if `concerns` is present.
    pub concerns_canonical: Option<String>,
}

impl Response {
    /// The text to analyze for the given field: the canonical translation
    /// when one was stored, the original answer otherwise.
    pub fn analysis_text(&self, field: TextField) -> Option<&str> {
        let (canonical, original) = match field {
            TextField::Benefits => (&self.benefits_canonical, &self.benefits),
            TextField::Concerns => (&self.concerns_canonical, &self.concerns),
        };
        canonical.as_deref().or(original.as_deref())
    }
}

/// The raw field values gathered by a form collector, before validation.
///
/// The free-text answers are not bounded by this crate. Callers collecting
/// untrusted input should enforce their own length cap before submission.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RawResponse {
    pub locale: String,
    pub satisfaction: i64,
    pub interaction: String,
    pub benefits: String,
    pub concerns: String,
}

/// Reasons for rejecting a submission. A rejected response is never persisted.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ValidationError {
    /// The satisfaction score is outside the 1-5 scale.
    OutOfRange { value: i64 },
    /// The interaction frequency is not one of the fixed categories.
    UnknownCategory { value: String },
}

impl Error for ValidationError {}

impl Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::OutOfRange { value } => {
                write!(f, "satisfaction score {} is not between 1 and 5", value)
            }
            ValidationError::UnknownCategory { value } => {
                write!(f, "{:?} is not a known interaction frequency", value)
            }
        }
    }
}

/// Checks one raw submission and builds the canonical [Response].
///
/// Pure: no storage or translation is touched here. The canonical text
/// fields are left empty, the submission pipeline fills them. An unknown
/// locale code does not reject the submission, it falls back to
/// [DEFAULT_LOCALE] since the locale only drives presentation.
pub fn validate(raw: &RawResponse) -> Result<Response, ValidationError> {
    let satisfaction = match raw.satisfaction {
        s @ 1..=5 => s as u8,
        value => return Err(ValidationError::OutOfRange { value }),
    };
    let interaction = InteractionFrequency::parse(raw.interaction.as_str()).ok_or(
        ValidationError::UnknownCategory {
            value: raw.interaction.clone(),
        },
    )?;
    let locale = if crate::locale::known_locales().contains(&raw.locale.as_str()) {
        raw.locale.clone()
    } else {
        warn!(
            "validate: unknown locale {:?}, falling back to {:?}",
            raw.locale, DEFAULT_LOCALE
        );
        DEFAULT_LOCALE.to_string()
    };
    Ok(Response {
        locale,
        satisfaction,
        interaction,
        benefits: non_empty(&raw.benefits),
        concerns: non_empty(&raw.concerns),
        benefits_canonical: None,
        concerns_canonical: None,
    })
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(satisfaction: i64, interaction: &str) -> RawResponse {
        RawResponse {
            locale: "en".to_string(),
            satisfaction,
            interaction: interaction.to_string(),
            benefits: "".to_string(),
            concerns: "".to_string(),
        }
    }

    #[test]
    fn satisfaction_accepted_iff_in_range() {
        for v in 1..=5 {
            assert!(validate(&raw(v, "Daily")).is_ok(), "score {}", v);
        }
        for v in [-1, 0, 6, 100] {
            assert_eq!(
                validate(&raw(v, "Daily")),
                Err(ValidationError::OutOfRange { value: v })
            );
        }
    }

    #[test]
    fn interaction_must_match_exactly() {
        assert!(validate(&raw(3, "Weekly")).is_ok());
        for bad in ["weekly", "DAILY", "Sometimes", ""] {
            assert_eq!(
                validate(&raw(3, bad)),
                Err(ValidationError::UnknownCategory {
                    value: bad.to_string()
                })
            );
        }
    }

    #[test]
    fn empty_text_becomes_absent() {
        let r = validate(&raw(3, "Never")).unwrap();
        assert_eq!(r.benefits, None);
        assert_eq!(r.concerns, None);
        assert_eq!(r.benefits_canonical, None);
        assert_eq!(r.concerns_canonical, None);
    }

    #[test]
    fn unknown_locale_falls_back_to_default() {
        let mut input = raw(2, "Rarely");
        input.locale = "zz".to_string();
        let r = validate(&input).unwrap();
        assert_eq!(r.locale, DEFAULT_LOCALE);
    }

    #[test]
    fn analysis_text_prefers_canonical() {
        let mut r = validate(&RawResponse {
            locale: "es".to_string(),
            satisfaction: 4,
            interaction: "Daily".to_string(),
            benefits: "más empleo".to_string(),
            concerns: "".to_string(),
        })
        .unwrap();
        assert_eq!(r.analysis_text(TextField::Benefits), Some("más empleo"));
        r.benefits_canonical = Some("more jobs".to_string());
        assert_eq!(r.analysis_text(TextField::Benefits), Some("more jobs"));
        assert_eq!(r.analysis_text(TextField::Concerns), None);
    }
}
