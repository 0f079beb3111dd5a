//! Display labels for the questionnaire, per locale.
//!
//! This resolves the strings a rendering collaborator shows to the user.
//! It is distinct from the translation of free-text answers into the
//! canonical analysis language, which is an external service call made at
//! submission time. The selected locale never changes what is stored: the
//! interaction categories and all statistics are locale-invariant.

use std::collections::HashMap;
use std::error::Error;
use std::fmt::Display;

use crate::{InteractionFrequency, DEFAULT_LOCALE};

const EN: &[(&str, &str)] = &[
    ("title", "Tourism Perception Questionnaire"),
    (
        "intro",
        "Please answer the following questions about tourism in your area:",
    ),
    (
        "satisfaction",
        "How satisfied are you with the current level of tourism in your area?",
    ),
    ("interaction", "How often do you interact with tourists?"),
    (
        "benefits",
        "What do you think are the main benefits of tourism in your area?",
    ),
    (
        "concerns",
        "What are your main concerns about tourism in your area?",
    ),
    ("submit", "Submit"),
    ("thanks", "Thank you for your response!"),
    ("no_data", "No responses recorded yet."),
    ("freq_daily", "Daily"),
    ("freq_weekly", "Weekly"),
    ("freq_monthly", "Monthly"),
    ("freq_rarely", "Rarely"),
    ("freq_never", "Never"),
];

const ES: &[(&str, &str)] = &[
    ("title", "Cuestionario de percepción del turismo"),
    (
        "intro",
        "Responda las siguientes preguntas sobre el turismo en su zona:",
    ),
    (
        "satisfaction",
        "¿Qué tan satisfecho está con el nivel actual de turismo en su zona?",
    ),
    ("interaction", "¿Con qué frecuencia interactúa con turistas?"),
    (
        "benefits",
        "¿Cuáles cree que son los principales beneficios del turismo en su zona?",
    ),
    (
        "concerns",
        "¿Cuáles son sus principales preocupaciones sobre el turismo en su zona?",
    ),
    ("submit", "Enviar"),
    ("thanks", "¡Gracias por su respuesta!"),
    ("no_data", "Aún no hay respuestas registradas."),
    ("freq_daily", "A diario"),
    ("freq_weekly", "Semanalmente"),
    ("freq_monthly", "Mensualmente"),
    ("freq_rarely", "Rara vez"),
    ("freq_never", "Nunca"),
];

const FR: &[(&str, &str)] = &[
    ("title", "Questionnaire de perception du tourisme"),
    (
        "intro",
        "Veuillez répondre aux questions suivantes sur le tourisme dans votre région :",
    ),
    (
        "satisfaction",
        "Êtes-vous satisfait du niveau actuel de tourisme dans votre région ?",
    ),
    (
        "interaction",
        "À quelle fréquence interagissez-vous avec des touristes ?",
    ),
    (
        "benefits",
        "Quels sont selon vous les principaux avantages du tourisme dans votre région ?",
    ),
    (
        "concerns",
        "Quelles sont vos principales préoccupations concernant le tourisme dans votre région ?",
    ),
    ("submit", "Envoyer"),
    ("thanks", "Merci pour votre réponse !"),
    ("no_data", "Aucune réponse enregistrée pour le moment."),
    ("freq_daily", "Tous les jours"),
    ("freq_weekly", "Chaque semaine"),
    ("freq_monthly", "Chaque mois"),
    ("freq_rarely", "Rarement"),
    ("freq_never", "Jamais"),
];

/// The locale codes with a label table. The first entry is [DEFAULT_LOCALE].
pub fn known_locales() -> &'static [&'static str] {
    &["en", "es", "fr"]
}

/// What to do when a key is missing from the default table as well.
///
/// A missing key is a defect in the label tables, not a user error. Strict
/// mode surfaces it as an error so it fails loudly during development;
/// lenient mode shows the raw key so a production page still renders.
/// The mode is fixed at construction, so behavior is consistent across calls.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum MissingKeyMode {
    Strict,
    Lenient,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum LocaleError {
    MissingKey { key: String },
}

impl Error for LocaleError {}

impl Display for LocaleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocaleError::MissingKey { key } => {
                write!(f, "label key {:?} is missing from the default table", key)
            }
        }
    }
}

/// Looks up display labels with fallback to the default locale.
pub struct LocaleResolver {
    tables: HashMap<&'static str, HashMap<&'static str, &'static str>>,
    mode: MissingKeyMode,
}

impl LocaleResolver {
    pub fn new(mode: MissingKeyMode) -> LocaleResolver {
        let mut tables = HashMap::new();
        tables.insert("en", EN.iter().cloned().collect());
        tables.insert("es", ES.iter().cloned().collect());
        tables.insert("fr", FR.iter().cloned().collect());
        LocaleResolver { tables, mode }
    }

    /// Resolves `key` in the table for `locale`, falling back to the table
    /// for [DEFAULT_LOCALE]. An unknown locale uses the default table
    /// directly. A key absent from the default table is handled according
    /// to the [MissingKeyMode].
    pub fn resolve(&self, locale: &str, key: &str) -> Result<String, LocaleError> {
        if let Some(label) = self.tables.get(locale).and_then(|t| t.get(key)) {
            return Ok(label.to_string());
        }
        let default_table = &self.tables[DEFAULT_LOCALE];
        match (default_table.get(key), self.mode) {
            (Some(label), _) => Ok(label.to_string()),
            (None, MissingKeyMode::Lenient) => Ok(key.to_string()),
            (None, MissingKeyMode::Strict) => Err(LocaleError::MissingKey {
                key: key.to_string(),
            }),
        }
    }

    /// The localized label for an interaction category. The English table
    /// carries every category key, so this cannot fail.
    pub fn interaction_label(&self, locale: &str, freq: InteractionFrequency) -> String {
        let key = match freq {
            InteractionFrequency::Daily => "freq_daily",
            InteractionFrequency::Weekly => "freq_weekly",
            InteractionFrequency::Monthly => "freq_monthly",
            InteractionFrequency::Rarely => "freq_rarely",
            InteractionFrequency::Never => "freq_never",
        };
        self.resolve(locale, key)
            .unwrap_or_else(|_| freq.as_str().to_string())
    }
}
