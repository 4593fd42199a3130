//! Reference word frequencies on the Zipf scale (log10 of occurrences per
//! billion words). Used to spot rare, likely-noise tokens.

use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use wordfreq::WordFreq;
use wordfreq_model::{load_wordfreq, ModelKind};

use crate::error::{EnrichError, EnrichResult};

static ENGLISH: OnceCell<Arc<ZipfLexicon>> = OnceCell::new();

enum Source {
    /// Bundled multi-source English model.
    Model(WordFreq),
    /// Explicit `word zipf` table.
    Table(HashMap<String, f64>),
}

/// English word frequency lookup.
pub struct ZipfLexicon {
    source: Source,
}

impl fmt::Debug for ZipfLexicon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Source::Model(_) => f.write_str("ZipfLexicon(model)"),
            Source::Table(entries) => write!(f, "ZipfLexicon(table, {} words)", entries.len()),
        }
    }
}

impl ZipfLexicon {
    /// The bundled large English model, loaded once per process.
    pub fn english() -> EnrichResult<Arc<Self>> {
        ENGLISH
            .get_or_try_init(|| {
                let model = load_wordfreq(ModelKind::LargeEn).map_err(|e| {
                    EnrichError::Configuration(format!("Failed to load word frequencies: {}", e))
                })?;
                tracing::debug!("Loaded English word frequency model");
                Ok(Arc::new(Self {
                    source: Source::Model(model),
                }))
            })
            .cloned()
    }

    /// Load a `word zipf` list from disk.
    pub fn from_path(path: impl AsRef<Path>) -> EnrichResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let lexicon = Self::parse(&content);
        tracing::debug!(path = %path.as_ref().display(), words = lexicon.len(), "Loaded word frequency list");
        Ok(lexicon)
    }

    /// Parse `word<whitespace>zipf` lines. Blank lines, `#` comments and
    /// malformed lines are skipped.
    pub fn parse(content: &str) -> Self {
        let entries = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| {
                let mut fields = line.split_whitespace();
                let word = fields.next()?;
                let zipf = fields.next()?.parse::<f64>().ok()?;
                fields.next().is_none().then(|| (word.to_lowercase(), zipf))
            })
            .collect();

        Self {
            source: Source::Table(entries),
        }
    }

    /// Zipf frequency of `word`, `0.0` when unknown.
    pub fn zipf(&self, word: &str) -> f64 {
        let word = word.to_lowercase();
        match &self.source {
            Source::Model(model) => zipf_from_frequency(model.word_frequency(&word)),
            Source::Table(entries) => entries.get(&word).copied().unwrap_or(0.0),
        }
    }

    /// Number of listed words; `None` for the bundled model.
    pub fn len(&self) -> Option<usize> {
        match &self.source {
            Source::Model(_) => None,
            Source::Table(entries) => Some(entries.len()),
        }
    }
}

/// `log10(frequency * 1e9)` rounded to two decimals, `0.0` for unseen words.
fn zipf_from_frequency(frequency: f32) -> f64 {
    if frequency <= 0.0 {
        return 0.0;
    }
    let zipf = (f64::from(frequency) * 1e9).log10();
    (zipf * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_zipf_from_frequency() {
        assert_eq!(zipf_from_frequency(0.0), 0.0);
        assert_eq!(zipf_from_frequency(1e-3), 6.0);
        assert_eq!(zipf_from_frequency(1e-6), 3.0);
    }

    #[test]
    fn test_parse_table_and_case() {
        let lexicon = ZipfLexicon::parse("# header\nrevenue\t4.2\nzyx 1.1\nbroken line here\nnan x\n");
        assert_eq!(lexicon.zipf("Revenue"), 4.2);
        assert_eq!(lexicon.zipf("zyx"), 1.1);
        assert_eq!(lexicon.zipf("broken"), 0.0);
        assert_eq!(lexicon.len(), Some(2));
    }

    #[test]
    fn test_english_model_covers_domain_words() {
        let lexicon = ZipfLexicon::english().unwrap();
        for word in [
            "the", "report", "quarterly", "revenue", "shipment", "warehouse", "logistics",
            "inventory", "database", "contractor",
        ] {
            assert!(lexicon.zipf(word) > 2.5, "{word}: {}", lexicon.zipf(word));
        }
        assert!(lexicon.zipf("xqzvwkj") < 2.5);
        assert!(lexicon.zipf("the") > lexicon.zipf("warehouse"));
    }

    #[test]
    fn test_english_model_is_shared() {
        let first = ZipfLexicon::english().unwrap();
        let second = ZipfLexicon::english().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), None);
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "alpha 5.0\nbeta 3.0").unwrap();
        let lexicon = ZipfLexicon::from_path(file.path()).unwrap();
        assert_eq!(lexicon.zipf("beta"), 3.0);
    }
}
