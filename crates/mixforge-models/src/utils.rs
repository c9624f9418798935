//! Small text utilities shared across crates.

use regex::Regex;
use std::sync::OnceLock;

/// Convert a title to a filesystem-safe slug.
///
/// Lowercases, drops everything outside word characters / whitespace /
/// hyphens, then collapses whitespace and hyphen runs to underscores.
pub fn slugify(text: &str) -> String {
    let lower = text.to_lowercase();
    let mut cleaned = String::with_capacity(lower.len());
    for c in lower.trim().chars() {
        if c.is_alphanumeric() || c == '_' || c.is_whitespace() || c == '-' {
            cleaned.push(c);
        }
    }
    let mut slug = String::with_capacity(cleaned.len());
    let mut in_separator = false;
    for c in cleaned.chars() {
        if c.is_whitespace() || c == '-' {
            if !in_separator && !slug.is_empty() {
                slug.push('_');
            }
            in_separator = true;
        } else {
            slug.push(c);
            in_separator = false;
        }
    }
    slug.trim_end_matches('_').to_string()
}

fn tempo_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d{2,3})\s*bpm").expect("valid tempo regex"))
}

/// Extract a tempo estimate (BPM) from free text; 0 when absent.
pub fn extract_tempo(text: &str) -> u32 {
    tempo_regex()
        .captures(&text.to_lowercase())
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}
