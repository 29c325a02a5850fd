use std::collections::HashMap;

/// Longest-matching-blocks similarity between two strings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Similarity {
    matched: usize,
    total: usize,
}

impl Similarity {
    /// Raw ratio in `[0.0, 1.0]`: twice the matched length over the combined length.
    pub fn ratio(self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        (2 * self.matched) as f64 / self.total as f64
    }

    /// Integer percentage in `[0, 100]`, rounded down.
    pub fn percent(self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        ((200 * self.matched) / self.total) as u8
    }
}

/// Scores `a` against `b`. Both argument orders are matched and the larger
/// total kept, so the score is symmetric.
pub fn similarity(a: &str, b: &str) -> Similarity {
    let a_chars = a.chars().collect::<Vec<char>>();
    let b_chars = b.chars().collect::<Vec<char>>();

    let forward = matched_len(&a_chars, &b_chars);
    let backward = matched_len(&b_chars, &a_chars);

    Similarity {
        matched: forward.max(backward),
        total: a_chars.len() + b_chars.len(),
    }
}

fn matched_len(a: &[char], b: &[char]) -> usize {
    let index = BIndex::new(b);
    let mut matched = 0usize;
    let mut queue = vec![(0usize, a.len(), 0usize, b.len())];

    while let Some((a_lo, a_hi, b_lo, b_hi)) = queue.pop() {
        let (i, j, size) = longest_match(a, b, &index, a_lo, a_hi, b_lo, b_hi);
        if size == 0 {
            continue;
        }

        matched += size;
        if a_lo < i && b_lo < j {
            queue.push((a_lo, i, b_lo, j));
        }
        if i + size < a_hi && j + size < b_hi {
            queue.push((i + size, a_hi, j + size, b_hi));
        }
    }

    matched
}

/// Ascending positions of each element of `b`. Every element is indexed,
/// however frequent, so identical inputs always match in full.
struct BIndex {
    positions: HashMap<char, Vec<usize>>,
}

impl BIndex {
    fn new(b: &[char]) -> Self {
        let mut positions = HashMap::<char, Vec<usize>>::new();
        for (index, character) in b.iter().enumerate() {
            positions.entry(*character).or_default().push(index);
        }
        Self { positions }
    }

    fn get(&self, character: char) -> &[usize] {
        self.positions
            .get(&character)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Longest block with `a[i..i+size] == b[j..j+size]` inside the given window,
/// earliest in `a` (then in `b`) on ties.
#[allow(clippy::too_many_arguments)]
fn longest_match(
    a: &[char],
    b: &[char],
    index: &BIndex,
    a_lo: usize,
    a_hi: usize,
    b_lo: usize,
    b_hi: usize,
) -> (usize, usize, usize) {
    let mut best_i = a_lo;
    let mut best_j = b_lo;
    let mut best_size = 0usize;
    let mut run_lengths = HashMap::<usize, usize>::new();

    for (i, character) in a.iter().enumerate().take(a_hi).skip(a_lo) {
        let mut next_run_lengths = HashMap::<usize, usize>::new();
        for &j in index.get(*character) {
            if j < b_lo {
                continue;
            }
            if j >= b_hi {
                break;
            }

            let previous = if j == 0 {
                0
            } else {
                run_lengths.get(&(j - 1)).copied().unwrap_or(0)
            };
            let size = previous + 1;
            next_run_lengths.insert(j, size);

            if size > best_size {
                best_i = i + 1 - size;
                best_j = j + 1 - size;
                best_size = size;
            }
        }
        run_lengths = next_run_lengths;
    }

    while best_i > a_lo && best_j > b_lo && a[best_i - 1] == b[best_j - 1] {
        best_i -= 1;
        best_j -= 1;
        best_size += 1;
    }
    while best_i + best_size < a_hi
        && best_j + best_size < b_hi
        && a[best_i + best_size] == b[best_j + best_size]
    {
        best_size += 1;
    }

    (best_i, best_j, best_size)
}

#[cfg(test)]
mod tests {
    use super::similarity;
    use proptest::prelude::*;

    #[test]
    fn empty_strings_are_identical() {
        assert_eq!(similarity("", "").percent(), 100);
        assert_eq!(similarity("", "").ratio(), 1.0);
    }

    #[test]
    fn empty_against_non_empty_scores_zero() {
        assert_eq!(similarity("", "X").percent(), 0);
        assert_eq!(similarity("ACME LTD", "").percent(), 0);
    }

    #[test]
    fn known_ratio_matches_matching_blocks() {
        // "ABCD" vs "BCDA": longest block "BCD" then nothing left of it in b.
        let score = similarity("ABCD", "BCDA");
        assert_eq!(score.ratio(), 0.75);
        assert_eq!(score.percent(), 75);
    }

    #[test]
    fn percent_rounds_down() {
        // 2 * 2 / 6 = 0.666...
        assert_eq!(similarity("AB", "ABXY").percent(), 66);
    }

    #[test]
    fn comparison_is_case_sensitive() {
        assert_eq!(similarity("acme", "ACME").percent(), 0);
    }

    #[test]
    fn near_identical_company_names_clear_default_threshold() {
        let score = similarity("ACME HOLDINGS LIMITED", "ACME HOLDINGS LTD");
        assert!(score.percent() >= 80, "score was {}", score.percent());
    }

    #[test]
    fn long_repetitive_inputs_match_in_full() {
        let long = "AB ".repeat(100);
        let score = similarity(&long, &long);
        assert_eq!(score.percent(), 100);
    }

    proptest! {
        #[test]
        fn identical_strings_score_full(text in "\\PC{0,80}") {
            prop_assert_eq!(similarity(&text, &text).percent(), 100);
        }

        #[test]
        fn score_is_symmetric(a in "[A-E ]{0,40}", b in "[A-E ]{0,40}") {
            prop_assert_eq!(similarity(&a, &b), similarity(&b, &a));
        }

        #[test]
        fn percent_stays_in_range(a in "\\PC{0,60}", b in "\\PC{0,60}") {
            prop_assert!(similarity(&a, &b).percent() <= 100);
        }
    }
}
