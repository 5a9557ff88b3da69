use std::path::Path;

use anyhow::{Context, Result};
use regex::Regex;
use strsim::normalized_levenshtein;

use crate::model::ScoredAsset;

pub(crate) const SHORTLIST_LEN: usize = 3;

/// Token-sort fuzzy matcher over a fixed set of asset file names.
#[derive(Debug)]
pub(crate) struct AssetMatcher {
    non_word: Regex,
}

impl AssetMatcher {
    pub(crate) fn new() -> Result<Self> {
        let non_word = Regex::new(r"\W").context("failed to compile non-word regex")?;
        Ok(Self { non_word })
    }

    /// Similarity in `[0, 100]` between a title and an asset file name,
    /// insensitive to case, punctuation, word order and the file extension.
    pub(crate) fn score(&self, query: &str, candidate: &str) -> u8 {
        let candidate = file_stem(candidate);
        if query == candidate {
            return 100;
        }

        let left = self.sorted_tokens(query);
        let right = self.sorted_tokens(candidate);
        if left.is_empty() || right.is_empty() {
            return 0;
        }
        (normalized_levenshtein(&left, &right) * 100.0).round() as u8
    }

    /// Every candidate scored and ordered by descending score. Equal scores
    /// keep the universe order.
    pub(crate) fn rank(&self, query: &str, universe: &[String]) -> Vec<ScoredAsset> {
        let mut ranked = universe
            .iter()
            .map(|name| ScoredAsset {
                name: name.clone(),
                score: self.score(query, name),
            })
            .collect::<Vec<_>>();
        ranked.sort_by(|a, b| b.score.cmp(&a.score));
        ranked
    }

    pub(crate) fn best_match(&self, query: &str, universe: &[String]) -> Option<ScoredAsset> {
        self.rank(query, universe).into_iter().next()
    }

    fn sorted_tokens(&self, input: &str) -> String {
        let cleaned = self.non_word.replace_all(input, " ").to_lowercase();
        let mut tokens = cleaned.split_whitespace().collect::<Vec<_>>();
        tokens.sort_unstable();
        tokens.join(" ")
    }
}

fn file_stem(name: &str) -> &str {
    Path::new(name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(name)
}
