//! Ratcliff/Obershelp sequence similarity.
//!
//! Ratio of matched characters to total length, where matches are found
//! by recursively taking the longest common substring. Tie-breaking
//! (lowest index in `a`, then in `b`) keeps the metric deterministic.

/// Similarity of two strings in [0.0, 1.0]. Comparison is on Unicode
/// scalar values; callers case-fold beforehand if they want
/// case-insensitive results.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let matched = match_count(&a, &b);
    2.0 * matched as f64 / (a.len() + b.len()) as f64
}

fn match_count(a: &[char], b: &[char]) -> usize {
    let (i, j, size) = longest_match(a, b);
    if size == 0 {
        return 0;
    }
    size + match_count(&a[..i], &b[..j]) + match_count(&a[i + size..], &b[j + size..])
}

/// First longest common substring as (start_a, start_b, length).
fn longest_match(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    let mut prev = vec![0usize; b.len() + 1];
    let mut cur = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        for slot in cur.iter_mut() {
            *slot = 0;
        }
        for (j, cb) in b.iter().enumerate() {
            if ca == cb {
                let run = prev[j] + 1;
                cur[j + 1] = run;
                if run > best.2 {
                    best = (i + 1 - run, j + 1 - run, run);
                }
            }
        }
        std::mem::swap(&mut prev, &mut cur);
    }
    best
}
