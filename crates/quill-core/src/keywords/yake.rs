//! Unsupervised statistical keyphrase scoring (YAKE).
//!
//! Each term gets a weight `H` from five local features (casing,
//! position, frequency, context relatedness, sentence spread); a candidate
//! phrase combines the weights of its terms. Lower scores are better.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::summarize::split_sentences;

static TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\p{L}\p{N}]+(?:['’\-][\p{L}\p{N}]+)*|[^\s\p{L}\p{N}]")
        .expect("valid token regex")
});

/// Terms shorter than this are treated like stop words.
const MIN_TERM_CHARS: usize = 3;

/// Levenshtein similarity above which a lower-ranked phrase is dropped.
const DEDUP_THRESHOLD: f64 = 0.9;

/// A ranked candidate phrase.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPhrase {
    /// First surface form seen in the text.
    pub phrase: String,
    pub score: f64,
}

/// YAKE keyphrase extractor.
pub struct Yake<'a> {
    stopwords: &'a HashSet<String>,
    max_ngram: usize,
    window: usize,
}

#[derive(Default)]
struct TermStats {
    tf: usize,
    tf_acronym: usize,
    tf_capital: usize,
    sentences: Vec<usize>,
    left: HashMap<String, usize>,
    right: HashMap<String, usize>,
    stopword: bool,
}

struct Candidate {
    terms: Vec<String>,
    surface: String,
    tf: usize,
    first_seen: usize,
}

enum Token<'t> {
    Word { surface: &'t str, key: String, usable: bool },
    Punct,
}

impl<'a> Yake<'a> {
    pub fn new(stopwords: &'a HashSet<String>, max_ngram: usize) -> Self {
        Self {
            stopwords,
            max_ngram: max_ngram.max(1),
            window: 1,
        }
    }

    /// Return up to `top` phrases, best first.
    pub fn extract(&self, text: &str, top: usize) -> Vec<ScoredPhrase> {
        let sentences: Vec<Vec<Token<'_>>> = split_sentences(text)
            .into_iter()
            .map(|sentence| self.tokenize(sentence))
            .filter(|tokens| !tokens.is_empty())
            .collect();
        if sentences.is_empty() || top == 0 {
            return Vec::new();
        }

        let mut terms: HashMap<String, TermStats> = HashMap::new();
        let mut candidates: HashMap<String, Candidate> = HashMap::new();
        let mut order = 0usize;

        for (sentence_idx, tokens) in sentences.iter().enumerate() {
            let mut block: Vec<(&str, &str, bool)> = Vec::new();
            let mut position = 0usize;

            for token in tokens {
                let (surface, key, usable) = match token {
                    Token::Word {
                        surface,
                        key,
                        usable,
                    } => (*surface, key.as_str(), *usable),
                    Token::Punct => {
                        block.clear();
                        position += 1;
                        continue;
                    }
                };

                let stats = terms.entry(key.to_string()).or_default();
                stats.tf += 1;
                stats.stopword = self.is_stopword(key);
                if is_acronym(surface) {
                    stats.tf_acronym += 1;
                } else if position > 0 && starts_upper(surface) {
                    stats.tf_capital += 1;
                }
                if stats.sentences.last() != Some(&sentence_idx) {
                    stats.sentences.push(sentence_idx);
                }

                if usable {
                    let start = block.len().saturating_sub(self.window);
                    for &(_, neighbour, neighbour_usable) in &block[start..] {
                        if !neighbour_usable {
                            continue;
                        }
                        *terms
                            .entry(key.to_string())
                            .or_default()
                            .left
                            .entry(neighbour.to_string())
                            .or_insert(0) += 1;
                        *terms
                            .entry(neighbour.to_string())
                            .or_default()
                            .right
                            .entry(key.to_string())
                            .or_insert(0) += 1;
                    }
                }

                block.push((surface, key, usable));
                position += 1;

                for n in 1..=self.max_ngram.min(block.len()) {
                    let gram = &block[block.len() - n..];
                    if !self.valid_gram(gram) {
                        continue;
                    }
                    let key = gram.iter().map(|t| t.1).collect::<Vec<_>>().join(" ");
                    let candidate = candidates.entry(key).or_insert_with(|| {
                        order += 1;
                        Candidate {
                            terms: gram.iter().map(|t| t.1.to_string()).collect(),
                            surface: gram.iter().map(|t| t.0).collect::<Vec<_>>().join(" "),
                            tf: 0,
                            first_seen: order,
                        }
                    });
                    candidate.tf += 1;
                }
            }
        }

        let weights = term_weights(&terms, sentences.len());

        let mut scored: Vec<(f64, usize, String, String)> = candidates
            .into_iter()
            .filter_map(|(key, candidate)| {
                let mut product = 1.0;
                let mut sum = 0.0;
                for term in &candidate.terms {
                    let h = *weights.get(term)?;
                    product *= h;
                    sum += h;
                }
                let score = product / ((sum + 1.0) * candidate.tf as f64);
                Some((score, candidate.first_seen, key, candidate.surface))
            })
            .collect();
        scored.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        let mut kept: Vec<(String, ScoredPhrase)> = Vec::new();
        for (score, _, key, surface) in scored {
            if kept
                .iter()
                .any(|(k, _)| similarity(k, &key) > DEDUP_THRESHOLD)
            {
                continue;
            }
            kept.push((
                key,
                ScoredPhrase {
                    phrase: surface,
                    score,
                },
            ));
            if kept.len() == top {
                break;
            }
        }
        kept.into_iter().map(|(_, phrase)| phrase).collect()
    }

    fn tokenize<'t>(&self, sentence: &'t str) -> Vec<Token<'t>> {
        TOKEN
            .find_iter(sentence)
            .map(|m| {
                let surface = m.as_str();
                if surface.chars().any(char::is_alphanumeric) {
                    Token::Word {
                        surface,
                        key: surface.to_lowercase(),
                        usable: !surface.chars().any(|c| c.is_numeric()),
                    }
                } else {
                    Token::Punct
                }
            })
            .collect()
    }

    fn is_stopword(&self, key: &str) -> bool {
        key.chars().count() < MIN_TERM_CHARS || self.stopwords.contains(key)
    }

    fn valid_gram(&self, gram: &[(&str, &str, bool)]) -> bool {
        let (Some(first), Some(last)) = (gram.first(), gram.last()) else {
            return false;
        };
        gram.iter().all(|t| t.2) && !self.is_stopword(first.1) && !self.is_stopword(last.1)
    }
}

/// Per-term weight `H` for every non-stop term.
fn term_weights(terms: &HashMap<String, TermStats>, sentence_count: usize) -> HashMap<String, f64> {
    // Integer sums keep the statistics independent of map iteration order.
    let (count, sum, sum_sq) = terms
        .values()
        .filter(|t| !t.stopword)
        .fold((0usize, 0usize, 0usize), |(n, s, sq), t| (n + 1, s + t.tf, sq + t.tf * t.tf));
    if count == 0 {
        return HashMap::new();
    }

    let mean = sum as f64 / count as f64;
    let std = (sum_sq as f64 / count as f64 - mean * mean).max(0.0).sqrt();
    let max_tf = terms.values().map(|t| t.tf).max().unwrap_or(1) as f64;

    terms
        .iter()
        .filter(|(_, t)| !t.stopword)
        .map(|(key, t)| {
            let tf = t.tf as f64;

            let w_case = t.tf_acronym.max(t.tf_capital) as f64 / (1.0 + tf.ln());
            let w_pos = (3.0 + median(&t.sentences)).ln().ln();
            let w_freq = tf / (mean + std);
            let w_rel = (0.5 + side_weight(&t.left) * tf / max_tf)
                + (0.5 + side_weight(&t.right) * tf / max_tf);
            let w_spread = t.sentences.len() as f64 / sentence_count as f64;

            let h = (w_pos * w_rel) / (w_case + w_freq / w_rel + w_spread / w_rel);
            (key.clone(), h)
        })
        .collect()
}

/// Distinct neighbours over total co-occurrence weight.
fn side_weight(neighbours: &HashMap<String, usize>) -> f64 {
    let total: usize = neighbours.values().sum();
    if total == 0 {
        return 0.0;
    }
    neighbours.len() as f64 / total as f64
}

fn median(sorted: &[usize]) -> f64 {
    match sorted.len() {
        0 => 0.0,
        n if n % 2 == 1 => sorted[n / 2] as f64,
        n => (sorted[n / 2 - 1] + sorted[n / 2]) as f64 / 2.0,
    }
}

fn is_acronym(surface: &str) -> bool {
    surface.chars().count() > 1
        && surface.chars().any(char::is_alphabetic)
        && surface
            .chars()
            .filter(|c| c.is_alphabetic())
            .all(char::is_uppercase)
}

fn starts_upper(surface: &str) -> bool {
    surface.chars().next().is_some_and(char::is_uppercase)
}

/// Normalized Levenshtein similarity in `[0, 1]`.
fn similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein_distance(a, b) as f64 / max_len as f64
}

fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stopwords() -> HashSet<String> {
        ["the", "and", "of", "in", "this", "with", "for", "across", "while", "was", "were", "our"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    const REPORT: &str = "This report analyzes quarterly sales growth across all regions. \
        Quarterly sales grew in every region. Revenue increased while costs decreased. \
        The sales team expects revenue growth to continue.";

    #[test]
    fn test_extracts_ranked_phrases() {
        let stopwords = stopwords();
        let phrases = Yake::new(&stopwords, 2).extract(REPORT, 100);

        assert!(!phrases.is_empty());
        let all: Vec<String> = phrases.iter().map(|p| p.phrase.to_lowercase()).collect();
        assert!(all.iter().any(|p| p.contains("sales")), "got {all:?}");
        for pair in phrases.windows(2) {
            assert!(pair[0].score <= pair[1].score);
        }
    }

    #[test]
    fn test_candidates_do_not_start_or_end_with_stopwords() {
        let stopwords = stopwords();
        for phrase in Yake::new(&stopwords, 2).extract(REPORT, 50) {
            let words: Vec<String> = phrase
                .phrase
                .split_whitespace()
                .map(str::to_lowercase)
                .collect();
            assert!(words.len() <= 2);
            assert!(!stopwords.contains(&words[0]), "{}", phrase.phrase);
            assert!(!stopwords.contains(&words[words.len() - 1]), "{}", phrase.phrase);
        }
    }

    #[test]
    fn test_digits_and_short_terms_are_not_candidates() {
        let stopwords = stopwords();
        let phrases = Yake::new(&stopwords, 2).extract("Revenue in 2024 was up 15 percent. Revenue grew.", 20);
        for phrase in phrases {
            assert!(!phrase.phrase.chars().any(|c| c.is_ascii_digit()));
            assert_ne!(phrase.phrase.to_lowercase(), "up");
        }
    }

    #[test]
    fn test_phrases_do_not_cross_punctuation() {
        let stopwords = stopwords();
        let phrases = Yake::new(&stopwords, 2).extract("Alpha beta, gamma delta. Alpha beta again.", 20);
        assert!(phrases.iter().all(|p| p.phrase.to_lowercase() != "beta gamma"));
    }

    #[test]
    fn test_empty_and_stopword_only_text() {
        let stopwords = stopwords();
        assert!(Yake::new(&stopwords, 2).extract("", 10).is_empty());
        assert!(Yake::new(&stopwords, 2).extract("the and of", 10).is_empty());
    }

    #[test]
    fn test_deterministic() {
        let stopwords = stopwords();
        let first = Yake::new(&stopwords, 2).extract(REPORT, 24);
        let second = Yake::new(&stopwords, 2).extract(REPORT, 24);
        assert_eq!(first, second);
    }

    #[test]
    fn test_side_weight() {
        let repeated: HashMap<String, usize> = [("pump".to_string(), 4)].into_iter().collect();
        assert_eq!(side_weight(&repeated), 0.25);

        let varied: HashMap<String, usize> = [("quail", 2), ("raven", 1), ("swift", 1)]
            .into_iter()
            .map(|(w, n)| (w.to_string(), n))
            .collect();
        assert_eq!(side_weight(&varied), 0.75);
        assert_eq!(side_weight(&HashMap::new()), 0.0);
    }

    #[test]
    fn test_varied_neighbours_rank_lower() {
        // Same frequency, sentences and casing; only the right-hand
        // neighbours differ.
        let text = "Xenon pump, yarrow quail. Xenon pump, yarrow raven. \
            Xenon, yarrow swift. Xenon, yarrow quail.";
        let stopwords = stopwords();
        let keys: Vec<String> = Yake::new(&stopwords, 1)
            .extract(text, 20)
            .into_iter()
            .map(|p| p.phrase.to_lowercase())
            .collect();

        let xenon = keys.iter().position(|k| k == "xenon").unwrap();
        let yarrow = keys.iter().position(|k| k == "yarrow").unwrap();
        assert!(xenon < yarrow, "{keys:?}");
    }

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
        assert_eq!(levenshtein_distance("", "abc"), 3);
        assert!(similarity("sales growth", "sales growths") > 0.9);
        assert!(similarity("sales", "costs") < 0.9);
    }
}
