//! Confidence Extraction
//!
//! Reads a confidence in [0, 1] out of a model's free-text answer. Explicit
//! numeric statements win; otherwise status keywords are mapped to fixed
//! scores; otherwise the answer is treated as neutral (0.5).

use regex::Regex;
use std::sync::OnceLock;

/// Confidence used when nothing in the text indicates one.
pub const NEUTRAL_CONFIDENCE: f64 = 0.5;

/// Numeric patterns, tried in order. Group 1 is the number (optionally with `%`).
const NUMERIC_PATTERNS: &[&str] = &[
    r"(?i)confidence(?:\s+(?:level|score))?\s*[:=\s]\s*(\d+(?:\.\d+)?%|\d*\.\d+|\d+)",
    r"(?i)confidence[:\s]+(\d+(?:\.\d+)?)\s*out\s*of\s*1\b",
    r"(?i)(\d+(?:\.\d+)?%?)\s*confidence",
];

/// Keyword patterns, most specific first so that "likely false" is not read
/// as "false" and "incorrect" is not read as "correct".
const KEYWORD_PATTERNS: &[(&str, f64)] = &[
    (r"(?i)\b(?:likely|probably|appears)[\s_]+true\b", 0.7),
    (r"(?i)\b(?:likely|probably|appears)[\s_]+false\b", 0.3),
    (r"(?i)\buncertain\b|\bunclear\b|\bcannot\s+verify\b", 0.5),
    (r"(?i)\bfalse\b|\bincorrect\b|\binaccurate\b|\bcontradicted\b", 0.1),
    (r"(?i)\bverified\b|\btrue\b|\baccurate\b|\bconfirmed\b|\bcorrect\b", 0.9),
];

/// Compile a static pattern table, skipping entries that fail to parse.
pub(super) fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().filter_map(|p| Regex::new(p).ok()).collect()
}

fn numeric_patterns() -> &'static Vec<Regex> {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| compile(NUMERIC_PATTERNS))
}

fn keyword_patterns() -> &'static Vec<(Regex, f64)> {
    static PATTERNS: OnceLock<Vec<(Regex, f64)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        KEYWORD_PATTERNS
            .iter()
            .filter_map(|(p, score)| Regex::new(p).ok().map(|r| (r, *score)))
            .collect()
    })
}

/// Normalize a captured number: `%` means percent, other values above 1 are
/// read on a 0-10 scale. The result is clamped to [0, 1].
fn normalize(raw: &str) -> Option<f64> {
    let (number, is_percent) = match raw.strip_suffix('%') {
        Some(n) => (n, true),
        None => (raw, false),
    };
    let mut value: f64 = number.parse().ok()?;
    if is_percent {
        value /= 100.0;
    }
    if value > 1.0 {
        value /= 10.0;
    }
    Some(value.clamp(0.0, 1.0))
}

/// Extract a confidence from `response`. Always returns a value in [0, 1].
pub fn extract_confidence(response: &str) -> f64 {
    for pattern in numeric_patterns() {
        if let Some(value) = pattern
            .captures(response)
            .and_then(|caps| caps.get(1))
            .and_then(|m| normalize(m.as_str()))
        {
            return value;
        }
    }

    keyword_patterns()
        .iter()
        .find(|(pattern, _)| pattern.is_match(response))
        .map(|(_, score)| *score)
        .unwrap_or(NEUTRAL_CONFIDENCE)
}
