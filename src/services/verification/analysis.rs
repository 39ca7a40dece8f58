//! Response Analysis
//!
//! Reads a short summary, signal words and cited sources out of a model's
//! answer. Runs on succeeded results only; the claim itself is never parsed
//! here.

use regex::Regex;
use std::sync::OnceLock;

use cyrano_verify_core::ConfidenceIndicator;

use super::confidence::compile;

/// Labelled lines that state the verdict, tried in order. Group 1 is the value.
const SUMMARY_PATTERNS: &[&str] = &[
    r"(?i)verification status[:\s]+([^\n]+)",
    r"(?i)\bstatus[:\s]+([^\n]+)",
    r"(?i)\bverdict[:\s]+([^\n]+)",
    r"(?i)\bconclusion[:\s]+([^\n]+)",
];

const INDICATOR_PATTERNS: &[(&str, ConfidenceIndicator)] = &[
    (
        r"(?i)high confidence|very confident|\bstrongly\b|\bdefinitely\b",
        ConfidenceIndicator::HighConfidence,
    ),
    (
        r"(?i)\bmoderate|\bsomewhat\b|\blikely\b",
        ConfidenceIndicator::ModerateConfidence,
    ),
    (
        r"(?i)\buncertain|\bunclear\b|\bunverified\b|cannot verify",
        ConfidenceIndicator::LowConfidence,
    ),
    (
        r"(?i)\bcontradict|\bdisput|\bfalse\b|\bincorrect\b",
        ConfidenceIndicator::ContradictoryEvidence,
    ),
    (
        r"(?i)\bsupport|\bconfirm|\bverif(?:y|ied)\b|\btrue\b|\baccurate\b",
        ConfidenceIndicator::SupportingEvidence,
    ),
];

/// Source patterns, in output order. Group 1 (when present) is the source.
const SOURCE_PATTERNS: &[&str] = &[
    r"(?i)\b(?:sources?|references?|citations?|according to)\b\s*:?\s*([^\n.]+)",
    r"https?://[^\s\])>,]+",
    r"\[([^\]]+)\]",
];

fn summary_patterns() -> &'static Vec<Regex> {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| compile(SUMMARY_PATTERNS))
}

fn indicator_patterns() -> &'static Vec<(Regex, ConfidenceIndicator)> {
    static PATTERNS: OnceLock<Vec<(Regex, ConfidenceIndicator)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        INDICATOR_PATTERNS
            .iter()
            .filter_map(|(p, indicator)| Regex::new(p).ok().map(|r| (r, *indicator)))
            .collect()
    })
}

fn source_patterns() -> &'static Vec<Regex> {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| compile(SOURCE_PATTERNS))
}

/// What was read out of one answer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResponseAnalysis {
    pub summary: String,
    pub indicators: Vec<ConfidenceIndicator>,
    pub sources: Vec<String>,
}

/// Analyze one model answer.
pub fn analyze_response(response: &str) -> ResponseAnalysis {
    ResponseAnalysis {
        summary: extract_summary(response),
        indicators: extract_indicators(response),
        sources: extract_sources(response),
    }
}

/// The value of the first labelled status/verdict/conclusion line, else the
/// first sentence of the first non-empty line.
pub fn extract_summary(response: &str) -> String {
    for pattern in summary_patterns() {
        if let Some(value) = pattern
            .captures(response)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
            .filter(|v| !v.is_empty())
        {
            return value.to_string();
        }
    }

    let line = response
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("");
    first_sentence(line).to_string()
}

/// Prefix of `line` up to and including the first `.`, `!` or `?` that is
/// followed by whitespace or the end of the line.
fn first_sentence(line: &str) -> &str {
    let mut chars = line.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            match chars.peek() {
                None => return line,
                Some((_, next)) if next.is_whitespace() => return &line[..i + c.len_utf8()],
                _ => {}
            }
        }
    }
    line
}

/// Indicators present in `response`, in table order, each at most once.
pub fn extract_indicators(response: &str) -> Vec<ConfidenceIndicator> {
    indicator_patterns()
        .iter()
        .filter(|(pattern, _)| pattern.is_match(response))
        .map(|(_, indicator)| *indicator)
        .collect()
}

/// Cited sources, URLs and bracketed references, deduplicated in first-seen
/// order.
pub fn extract_sources(response: &str) -> Vec<String> {
    let mut sources: Vec<String> = Vec::new();
    for pattern in source_patterns() {
        for caps in pattern.captures_iter(response) {
            let Some(m) = caps.get(1).or_else(|| caps.get(0)) else {
                continue;
            };
            let source = m.as_str().trim().trim_end_matches([',', ';', ':']);
            if !source.is_empty() && !sources.iter().any(|s| s == source) {
                sources.push(source.to_string());
            }
        }
    }
    sources
}
