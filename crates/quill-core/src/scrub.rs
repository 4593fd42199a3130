//! Contact information scrubbing.
//!
//! Strips e-mail addresses, `@handles`, phone-number-like digit runs and
//! labelled contact prefixes (`email:`, `tel.`, `телефон:` ...) before any
//! analysis sees the text, then collapses whitespace.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[\w.\-]+@[\w.\-]+\.\w+\b").expect("valid email regex"));

static HANDLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"@\w{3,}").expect("valid handle regex"));

static PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\+?\(?\d[\d\s\-()]{7,}\d").expect("valid phone regex"));

static CONTACT_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:e-?mail|phone|tel|телефон|тел)\b\.?\s*[:\-]?\s*")
        .expect("valid label regex")
});

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Fewest digits a run needs before it is treated as a phone number.
pub const MIN_PHONE_DIGITS: usize = 9;

/// Remove contact details and normalize whitespace.
///
/// Idempotent: `scrub_contacts(&scrub_contacts(x)) == scrub_contacts(x)`.
/// A single pass can expose new matches (removing a label can join two
/// digit groups), so passes repeat until the text stops changing. Every
/// changing pass shortens the text, which bounds the loop.
pub fn scrub_contacts(text: &str) -> String {
    let mut current = scrub_once(text);
    loop {
        let next = scrub_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn scrub_once(text: &str) -> String {
    let t = EMAIL.replace_all(text, " ");
    let t = HANDLE.replace_all(&t, " ");
    let t = PHONE.replace_all(&t, |caps: &Captures| {
        let run = &caps[0];
        if run.chars().filter(char::is_ascii_digit).count() >= MIN_PHONE_DIGITS {
            " ".to_string()
        } else {
            run.to_string()
        }
    });
    let t = CONTACT_LABEL.replace_all(&t, " ");
    normalize_whitespace(&t)
}

/// Collapse whitespace runs to single spaces and trim.
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}
