//! Token-set similarity between free-text descriptions

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

fn special_char_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-zA-Z0-9]").expect("invalid special char regex"))
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("invalid whitespace regex"))
}

fn strip_punctuation(value: &str) -> String {
    let spaced = special_char_re().replace_all(value, " ");
    whitespace_re().replace_all(&spaced, " ").into_owned()
}

/// Score how likely two descriptions refer to the same event, from 0 to 100
///
/// Exact matches score 100, matches ignoring case and surrounding whitespace
/// score 98, and matches ignoring punctuation score 95. Anything else scores
/// the share of distinct words the two strings have in common.
pub fn compare_strings(left: &str, right: &str) -> u8 {
    if left == right {
        return 100;
    }

    let left = left.trim().to_lowercase();
    let right = right.trim().to_lowercase();

    if left == right {
        return 98;
    }

    let left = strip_punctuation(&left);
    let right = strip_punctuation(&right);

    if left == right {
        return 95;
    }

    let left_words: HashSet<&str> = left.split_whitespace().collect();
    let right_words: HashSet<&str> = right.split_whitespace().collect();

    let total = left_words.union(&right_words).count();
    if total == 0 {
        return 0;
    }

    let common = left_words.intersection(&right_words).count();
    (common * 100 / total) as u8
}
