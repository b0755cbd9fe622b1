//! Cheap spam heuristics. The thresholds here decide what gets through, so
//! changing them changes acceptance behaviour.

use regex::Regex;
use std::sync::LazyLock;

const VOWELS: &[char] = &['a', 'e', 'i', 'o', 'u'];
const MAX_CONSONANT_RATIO: f64 = 0.8;
const MAX_REPEAT_RUN: usize = 3;

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)([a-z][a-z0-9+.-]*://|www\.|\b[a-z0-9-]+\.(com|net|org|io|co|biz|info|ru|cn|xyz|top|site|online)\b)",
    )
    .unwrap()
});

/// Flags keyboard-mash names. Anything shorter than two characters is too
/// short to judge and passes.
pub fn is_gibberish(text: &str) -> bool {
    let lower = text.trim().to_lowercase();
    let len = lower.chars().count();
    if len < 2 {
        return false;
    }

    let vowels = lower.chars().filter(|c| VOWELS.contains(c)).count();
    if vowels == 0 {
        return true;
    }

    let consonants = lower
        .chars()
        .filter(|c| c.is_ascii_alphabetic() && !VOWELS.contains(c))
        .count();
    if consonants as f64 / len as f64 > MAX_CONSONANT_RATIO {
        return true;
    }

    has_repeat_run(&lower, MAX_REPEAT_RUN)
}

fn has_repeat_run(text: &str, run: usize) -> bool {
    let mut prev = None;
    let mut count = 0;
    for c in text.chars() {
        if Some(c) == prev {
            count += 1;
        } else {
            prev = Some(c);
            count = 1;
        }
        if count >= run {
            return true;
        }
    }
    false
}

/// Links in free text: a scheme, `www.`, or a bare domain on a common TLD.
pub fn contains_urls(text: &str) -> bool {
    URL_RE.is_match(text)
}
