//! Consensus analyzer
//!
//! Pure, synchronous analysis over a completed set of [`QueryResult`]s.
//! The constants here are part of the observable output and must stay
//! stable between releases.

use super::result::ComparisonSummary;
use crate::core::result::{QueryResult, QuerySuccess};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

/// Fraction of answers a keyword must appear in to count as common
const CONSENSUS_THRESHOLD: f64 = 0.6;
/// Keywords reported in the consensus line
const MAX_THEMES: usize = 5;
/// Tokens with this many characters or fewer are ignored
const MIN_KEYWORD_CHARS: usize = 4;
/// Standard deviation above this fraction of the mean flags length variance
const LENGTH_VARIANCE_RATIO: f64 = 0.3;
/// Unique topics reported per provider
const MAX_UNIQUE_TOPICS: usize = 3;

pub const NO_CONSENSUS: &str = "No clear consensus found";
pub const LENGTH_VARIANCE: &str = "Significant variation in response lengths";

const STOP_WORDS: &[&str] = &[
    "the", "is", "at", "which", "on", "and", "a", "an", "as", "are", "was", "been", "being",
    "have", "has", "had", "do", "does", "did", "will", "would", "could", "should", "may", "might",
    "must", "can", "shall", "to", "of", "in", "for", "with", "by", "from", "about", "into",
    "through", "during", "before", "after", "above", "below", "between", "under", "again",
    "further", "then",
];

static TOPIC_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Z][a-z]+(?:\s+[A-Z][a-z]+)*\b").expect("valid topic pattern")
});
static LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[0-9]+\.|^-\s|^\*").expect("valid list pattern"));
static HEADING_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#{1,6}\s").expect("valid heading pattern"));

/// Summarize agreement and divergence between successful answers.
///
/// Returns an empty summary unless at least two results are successes with
/// non-empty content.
pub fn analyze(results: &[QueryResult]) -> ComparisonSummary {
    let valid: Vec<&QuerySuccess> = results
        .iter()
        .filter_map(QueryResult::as_success)
        .filter(|s| !s.content.is_empty())
        .collect();

    if valid.len() < 2 {
        return ComparisonSummary::default();
    }

    let contents: Vec<&str> = valid.iter().map(|s| s.content.as_str()).collect();
    let keywords = common_keywords(&contents);

    let consensus = if keywords.is_empty() {
        NO_CONSENSUS.to_string()
    } else {
        let themes: Vec<&str> = keywords.iter().take(MAX_THEMES).map(String::as_str).collect();
        format!("Common themes: {}", themes.join(", "))
    };

    ComparisonSummary {
        consensus: Some(consensus),
        differences: key_differences(&valid),
        best_response: most_comprehensive(&valid).map(|s| s.provider.clone()),
    }
}

/// Keywords that appear in at least 60% of the given texts, most frequent first.
///
/// Frequency is the number of texts containing the token. Equal
/// frequencies keep first-seen order.
pub fn common_keywords(contents: &[&str]) -> Vec<String> {
    let mut order: Vec<String> = Vec::new();
    let mut frequency: HashMap<String, usize> = HashMap::new();

    for content in contents {
        let lowered = content.to_lowercase();
        let mut seen: HashSet<&str> = HashSet::new();

        for word in lowered.split_whitespace() {
            if word.chars().count() <= MIN_KEYWORD_CHARS || is_stop_word(word) {
                continue;
            }
            if !seen.insert(word) {
                continue;
            }
            let count = frequency.entry(word.to_string()).or_insert(0);
            if *count == 0 {
                order.push(word.to_string());
            }
            *count += 1;
        }
    }

    let threshold = contents.len() as f64 * CONSENSUS_THRESHOLD;
    let mut ranked: Vec<(String, usize)> = order
        .into_iter()
        .map(|word| {
            let count = frequency.get(&word).copied().unwrap_or(0);
            (word, count)
        })
        .filter(|(_, count)| *count as f64 >= threshold)
        .collect();

    // stable: ties stay in first-seen order
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.into_iter().map(|(word, _)| word).collect()
}

/// Difference statements between successful answers.
pub fn key_differences(responses: &[&QuerySuccess]) -> Vec<String> {
    let mut differences = Vec::new();
    if responses.is_empty() {
        return differences;
    }

    let lengths: Vec<f64> = responses
        .iter()
        .map(|r| r.content.chars().count() as f64)
        .collect();
    if let Some(deviation) = sample_std_dev(&lengths) {
        let mean = lengths.iter().sum::<f64>() / lengths.len() as f64;
        if deviation > mean * LENGTH_VARIANCE_RATIO {
            differences.push(LENGTH_VARIANCE.to_string());
        }
    }

    for response in responses {
        let unique: Vec<&str> = TOPIC_PATTERN
            .find_iter(&response.content)
            .map(|m| m.as_str())
            .filter(|topic| {
                responses
                    .iter()
                    .filter(|other| other.content.contains(topic))
                    .count()
                    == 1
            })
            .take(MAX_UNIQUE_TOPICS)
            .collect();

        if !unique.is_empty() {
            differences.push(format!(
                "{} uniquely mentions: {}",
                response.provider,
                unique.join(", ")
            ));
        }
    }

    differences
}

/// Sample standard deviation (`n - 1` denominator); `None` below two values.
fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let squares = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
    Some((squares / (n - 1.0)).sqrt())
}

/// Structure and length score of an answer.
///
/// | Signal | Points |
/// |--------|--------|
/// | length strictly within 100..5000 chars | `min(len / 100, 30)` |
/// | blank-line paragraph break | 5 |
/// | numbered or bulleted line | 10 |
/// | markdown heading | 5 |
/// | fenced code block | 15 |
/// | "example" | 10 |
/// | "for instance" | 5 |
pub fn score_response(content: &str) -> f64 {
    let mut score = 0.0;

    let length = content.chars().count();
    if length > 100 && length < 5000 {
        score += (length as f64 / 100.0).min(30.0);
    }

    if content.contains("\n\n") {
        score += 5.0;
    }
    if LIST_MARKER.is_match(content) {
        score += 10.0;
    }
    if HEADING_MARKER.is_match(content) {
        score += 5.0;
    }
    if content.contains("```") {
        score += 15.0;
    }

    let lowered = content.to_lowercase();
    if lowered.contains("example") {
        score += 10.0;
    }
    if lowered.contains("for instance") {
        score += 5.0;
    }

    score
}

/// First answer with the strictly highest score.
fn most_comprehensive<'a>(responses: &[&'a QuerySuccess]) -> Option<&'a QuerySuccess> {
    let mut iter = responses.iter().copied();
    let first = iter.next()?;
    let mut best = (first, score_response(&first.content));

    for candidate in iter {
        let score = score_response(&candidate.content);
        if score > best.1 {
            best = (candidate, score);
        }
    }

    Some(best.0)
}

fn is_stop_word(word: &str) -> bool {
    let lowered = word.to_lowercase();
    STOP_WORDS.contains(&lowered.as_str())
}
