//! Fuzzy filtering for the command palette.

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

pub struct Matcher {
    inner: SkimMatcherV2,
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Matcher {
    pub fn new() -> Self {
        Self {
            inner: SkimMatcherV2::default().ignore_case(),
        }
    }

    pub fn score(&self, text: &str, pattern: &str) -> Option<i64> {
        self.inner.fuzzy_match(text, pattern)
    }

    /// Indices of the matching items, best match first.
    ///
    /// An empty pattern keeps every item in its original order.
    pub fn rank<T>(&self, items: &[T], text: impl Fn(&T) -> String, pattern: &str) -> Vec<usize> {
        if pattern.trim().is_empty() {
            return (0..items.len()).collect();
        }

        let mut scored: Vec<(usize, i64)> = items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| self.score(&text(item), pattern).map(|score| (i, score)))
            .collect();
        // Stable sort keeps configuration order among equal scores.
        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored.into_iter().map(|(i, _)| i).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fuzzy_match_ignores_case() {
        let matcher = Matcher::new();

        assert!(matcher.score("Describe revision", "desc").is_some());
        assert!(matcher.score("jj log -r abc", "LOG").is_some());
        assert!(matcher.score("hello", "xyz").is_none());
    }

    #[test]
    fn test_rank() {
        let matcher = Matcher::new();
        let names = ["new", "describe", "abandon", "diff"];

        assert_eq!(matcher.rank(&names, |s| (*s).to_string(), ""), vec![0, 1, 2, 3]);

        let ranked = matcher.rank(&names, |s| (*s).to_string(), "di");
        assert_eq!(ranked[0], 3);
        assert!(!ranked.contains(&0));
    }
}
