//! Stop word lists, one per supported keyword language.

use std::collections::{HashMap, HashSet};

const EMBEDDED: &[(&str, &str)] = &[
    ("en", include_str!("../../data/stopwords/en.txt")),
    ("ru", include_str!("../../data/stopwords/ru.txt")),
    ("de", include_str!("../../data/stopwords/de.txt")),
    ("fr", include_str!("../../data/stopwords/fr.txt")),
    ("es", include_str!("../../data/stopwords/es.txt")),
    ("it", include_str!("../../data/stopwords/it.txt")),
    ("pt", include_str!("../../data/stopwords/pt.txt")),
];

/// Lower-cased stop word sets keyed by language code.
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    sets: HashMap<String, HashSet<String>>,
}

impl StopWords {
    /// The lists shipped with the crate.
    pub fn embedded() -> Self {
        let mut stopwords = Self::default();
        for (language, list) in EMBEDDED {
            stopwords.insert(language, list);
        }
        stopwords
    }

    /// Add or replace the list for `language` (one word per line).
    pub fn insert(&mut self, language: &str, list: &str) {
        let words = list
            .lines()
            .map(|line| line.trim().to_lowercase())
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .collect();
        self.sets.insert(language.to_string(), words);
    }

    pub fn get(&self, language: &str) -> Option<&HashSet<String>> {
        self.sets.get(language)
    }

    pub fn contains_language(&self, language: &str) -> bool {
        self.sets.contains_key(language)
    }
}
