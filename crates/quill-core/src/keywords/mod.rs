//! Keyword extraction: statistical candidates, gibberish filter,
//! case-insensitive dedup and a bounded output length.

mod lexicon;
mod stopwords;
mod yake;

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::EnrichResult;
use crate::scrub::normalize_whitespace;

pub use lexicon::ZipfLexicon;
pub use stopwords::StopWords;
pub use yake::{ScoredPhrase, Yake};

static LOCAL_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\p{L}{3,}").expect("valid local token regex"));

static PHRASE_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\p{L}+").expect("valid phrase word regex"));

/// Keyword extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordConfig {
    /// Nominal keyword count; candidates requested are `top_k * candidate_factor`.
    pub top_k: usize,
    /// Longest phrase, in words.
    pub max_ngram: usize,
    pub candidate_factor: usize,
    /// Hard cap on returned keywords.
    pub max_keywords: usize,
    /// Shorter non-empty lists are padded up to this length.
    pub min_keywords: usize,
    /// Words below this Zipf frequency are rare.
    pub rarity_threshold: f64,
    /// Words shorter than this are never gibberish.
    pub min_gibberish_len: usize,
    /// Languages with stop word lists.
    pub supported_languages: Vec<String>,
    /// Used for any language outside `supported_languages`.
    pub fallback_language: String,
    /// `word zipf` list replacing the bundled English model.
    pub lexicon_path: Option<PathBuf>,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            top_k: 8,
            max_ngram: 2,
            candidate_factor: 3,
            max_keywords: 10,
            min_keywords: 5,
            rarity_threshold: 2.5,
            min_gibberish_len: 4,
            supported_languages: ["en", "ru", "de", "fr", "es", "it", "pt"]
                .into_iter()
                .map(String::from)
                .collect(),
            fallback_language: "en".to_string(),
            lexicon_path: None,
        }
    }
}

/// Keyword extractor with injected stop words and frequency corpus.
///
/// Holds only read-only data, so one instance can serve concurrent
/// documents.
pub struct KeywordExtractor {
    config: KeywordConfig,
    stopwords: StopWords,
    lexicon: Arc<ZipfLexicon>,
}

impl KeywordExtractor {
    pub fn new(config: KeywordConfig, stopwords: StopWords, lexicon: Arc<ZipfLexicon>) -> Self {
        Self {
            config,
            stopwords,
            lexicon,
        }
    }

    /// Build from config: embedded stop words, and the lexicon from
    /// `lexicon_path` when set, else the bundled English model.
    pub fn from_config(config: KeywordConfig) -> EnrichResult<Self> {
        let lexicon = match &config.lexicon_path {
            Some(path) => Arc::new(ZipfLexicon::from_path(path)?),
            None => ZipfLexicon::english()?,
        };
        Ok(Self::new(config, StopWords::embedded(), lexicon))
    }

    pub fn config(&self) -> &KeywordConfig {
        &self.config
    }

    /// Extract keywords from scrubbed text.
    ///
    /// Returns between `min_keywords` and `max_keywords` case-insensitively
    /// unique phrases, or an empty list when no candidate survives.
    pub fn extract(&self, text: &str, language: &str) -> Vec<String> {
        let language = self.resolve_language(language);
        let empty = HashSet::new();
        let stopwords = self.stopwords.get(&language).unwrap_or(&empty);

        let local = local_frequencies(text);
        let wanted = self.config.top_k * self.config.candidate_factor;
        let candidates = Yake::new(stopwords, self.config.max_ngram).extract(text, wanted);

        let mut seen = HashSet::new();
        let mut keywords: Vec<String> = Vec::new();
        for candidate in candidates {
            let phrase = normalize_whitespace(&candidate.phrase);
            if phrase.is_empty() {
                continue;
            }
            if let Some(word) = PHRASE_WORD
                .find_iter(&phrase)
                .map(|m| m.as_str())
                .find(|word| self.is_gibberish(word, &local))
            {
                debug!(phrase = %phrase, word, "Dropping keyword with gibberish word");
                continue;
            }
            if seen.insert(phrase.to_lowercase()) {
                keywords.push(phrase);
            }
        }
        keywords.truncate(self.config.max_keywords);

        pad(keywords, self.config.min_keywords)
    }

    /// Rare by corpus frequency AND not repeated in the document.
    ///
    /// Only plain lowercase ASCII words are judged; anything else (other
    /// scripts, mixed tokens) is kept.
    pub fn is_gibberish(&self, word: &str, local: &HashMap<String, usize>) -> bool {
        let word = word.to_lowercase();
        if word.chars().count() < self.config.min_gibberish_len
            || !word.chars().all(|c| c.is_ascii_lowercase())
        {
            return false;
        }
        self.lexicon.zipf(&word) < self.config.rarity_threshold
            && local.get(&word).copied().unwrap_or(0) <= 1
    }

    fn resolve_language(&self, language: &str) -> String {
        if self.config.supported_languages.iter().any(|l| l == language)
            && self.stopwords.contains_language(language)
        {
            language.to_string()
        } else {
            self.config.fallback_language.clone()
        }
    }
}

/// Case-folded counts of alphabetic tokens of three or more letters.
pub fn local_frequencies(text: &str) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for token in LOCAL_TOKEN.find_iter(text) {
        *counts.entry(token.as_str().to_lowercase()).or_insert(0) += 1;
    }
    counts
}

/// Repeat a short, non-empty list until it reaches `min` entries.
fn pad(keywords: Vec<String>, min: usize) -> Vec<String> {
    if keywords.is_empty() || keywords.len() >= min {
        return keywords;
    }
    keywords.iter().cycle().take(min).cloned().collect()
}
