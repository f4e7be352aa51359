//! Approximate string matching against the category vocabulary.
//!
//! Similarity is the Ratcliff/Obershelp "gestalt" ratio: `2 * M / T`, where
//! `M` counts the characters in matching blocks (found by recursively taking
//! the longest common substring and recursing on both sides of it) and `T`
//! is the combined length of both strings. The comparison is case-sensitive.

/// Similarity of two strings on a 0.0 - 1.0 scale, 1.0 meaning identical.
///
/// Two empty strings are identical.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    2.0 * matching_characters(&a, &b) as f64 / total as f64
}

/// Closest vocabulary entry to `value`, if its ratio reaches `threshold`.
///
/// Ties keep the candidate listed first.
pub fn best_match<'v>(value: &str, vocabulary: &[&'v str], threshold: f64) -> Option<&'v str> {
    let mut best: Option<(&'v str, f64)> = None;

    for &candidate in vocabulary {
        let ratio = similarity_ratio(value, candidate);
        match best {
            Some((_, best_ratio)) if ratio <= best_ratio => {}
            _ => best = Some((candidate, ratio)),
        }
    }

    best.filter(|(_, ratio)| *ratio >= threshold)
        .map(|(candidate, _)| candidate)
}

fn matching_characters(a: &[char], b: &[char]) -> usize {
    let (i, j, size) = longest_common_block(a, b);
    if size == 0 {
        return 0;
    }

    size + matching_characters(&a[..i], &b[..j])
        + matching_characters(&a[i + size..], &b[j + size..])
}

/// Longest common substring as `(start_in_a, start_in_b, len)`.
///
/// Among equally long blocks the one that ends first in `a`, then in `b`, wins.
fn longest_common_block(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    let mut previous = vec![0usize; b.len() + 1];

    for i in 1..=a.len() {
        let mut current = vec![0usize; b.len() + 1];
        for j in 1..=b.len() {
            if a[i - 1] == b[j - 1] {
                let run = previous[j - 1] + 1;
                current[j] = run;
                if run > best.2 {
                    best = (i - run, j - run, run);
                }
            }
        }
        previous = current;
    }

    best
}
