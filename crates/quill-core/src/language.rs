//! Language detection.

use serde::{Deserialize, Serialize};
use whatlang::{Detector, Lang};

use crate::scrub::normalize_whitespace;

/// Returned whenever the language cannot be determined.
pub const UNKNOWN_LANGUAGE: &str = "unknown";

/// Language detection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageConfig {
    /// Texts shorter than this (after whitespace normalization) are "unknown".
    pub min_chars: usize,
    /// Only the first N characters are classified.
    pub sample_chars: usize,
    /// Codes passed through as the downstream language hint.
    pub hint_languages: Vec<String>,
    /// Hint used for every other detected code.
    pub default_hint: String,
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            min_chars: 30,
            sample_chars: 4000,
            hint_languages: vec!["en".to_string(), "ru".to_string()],
            default_hint: "en".to_string(),
        }
    }
}

/// Classifies text into an ISO 639-1 code (or ISO 639-3 where no
/// two-letter code is mapped), or `"unknown"`.
///
/// Trigram based and deterministic: identical input always yields the
/// same code.
pub struct LanguageDetector {
    detector: Detector,
    config: LanguageConfig,
}

impl LanguageDetector {
    pub fn new(config: LanguageConfig) -> Self {
        Self {
            detector: Detector::new(),
            config,
        }
    }

    /// Detect the language of `text`. Never fails.
    pub fn detect(&self, text: &str) -> String {
        let sample: String = text.chars().take(self.config.sample_chars).collect();
        let normalized = normalize_whitespace(&sample);
        if normalized.chars().count() < self.config.min_chars {
            return UNKNOWN_LANGUAGE.to_string();
        }

        match self.detector.detect(&normalized) {
            Some(info) => iso_code(info.lang()).to_string(),
            None => {
                tracing::debug!("Language detector returned no result");
                UNKNOWN_LANGUAGE.to_string()
            }
        }
    }

    /// Reduce a detected code to the hint used by summarization and
    /// keyword extraction.
    pub fn hint(&self, code: &str) -> String {
        if self.config.hint_languages.iter().any(|l| l == code) {
            code.to_string()
        } else {
            self.config.default_hint.clone()
        }
    }
}

impl Default for LanguageDetector {
    fn default() -> Self {
        Self::new(LanguageConfig::default())
    }
}

fn iso_code(lang: Lang) -> &'static str {
    match lang {
        Lang::Eng => "en",
        Lang::Rus => "ru",
        Lang::Deu => "de",
        Lang::Fra => "fr",
        Lang::Spa => "es",
        Lang::Ita => "it",
        Lang::Por => "pt",
        Lang::Ukr => "uk",
        Lang::Bel => "be",
        Lang::Pol => "pl",
        Lang::Nld => "nl",
        Lang::Ces => "cs",
        Lang::Slk => "sk",
        Lang::Swe => "sv",
        Lang::Dan => "da",
        Lang::Nob => "no",
        Lang::Fin => "fi",
        Lang::Hun => "hu",
        Lang::Ron => "ro",
        Lang::Bul => "bg",
        Lang::Ell => "el",
        Lang::Tur => "tr",
        Lang::Heb => "he",
        Lang::Ara => "ar",
        Lang::Hin => "hi",
        Lang::Cmn => "zh",
        Lang::Jpn => "ja",
        Lang::Kor => "ko",
        other => other.code(),
    }
}
