//! Subsequence fuzzy filter over the loaded identity snapshot.
//!
//! A query matches a candidate when every query character appears in the
//! candidate's `name <email>` text in order, case-insensitively. Among the
//! possible alignments the best-scoring one is kept:
//!
//! - each matched character earns [`MATCH`];
//! - each match directly after the previous one earns [`CONSECUTIVE`];
//! - a gap of `g` skipped characters costs `GAP_OPEN + g - 1`;
//! - the first match loses one point per leading character (capped at
//!   [`LEADING_CAP`]) and earns [`BOUNDARY`] when it starts a word.
//!
//! `CONSECUTIVE + GAP_OPEN` exceeds the combined ceiling of the boundary and
//! leading terms, so a contiguous occurrence of the query always outranks an
//! alignment that has to skip characters.

use crate::model::types::{Identity, IdentityId};

const MATCH: i64 = 16;
const CONSECUTIVE: i64 = 32;
const GAP_OPEN: i64 = 3;
const BOUNDARY: i64 = 8;
const LEADING_CAP: i64 = 16;

fn is_boundary(prev: Option<char>) -> bool {
    match prev {
        None => true,
        Some(c) => c.is_whitespace() || matches!(c, '<' | '@' | '.' | '-' | '_' | '+'),
    }
}

fn fold(text: &str) -> Vec<char> {
    text.chars().map(|c| c.to_ascii_lowercase()).collect()
}

/// Score `query` against `haystack`; `None` when it is not a subsequence.
pub fn fuzzy_score(haystack: &str, query: &str) -> Option<i64> {
    score_chars(&fold(haystack), &fold(query))
}

fn score_chars(hay: &[char], needle: &[char]) -> Option<i64> {
    if needle.is_empty() {
        return Some(0);
    }
    let n = hay.len();
    if needle.len() > n {
        return None;
    }

    // prev[j]: best score with the previous query char matched at hay[j].
    let mut prev: Vec<Option<i64>> = hay
        .iter()
        .enumerate()
        .map(|(j, &c)| {
            (c == needle[0]).then(|| {
                let boundary = if is_boundary(j.checked_sub(1).map(|k| hay[k])) {
                    BOUNDARY
                } else {
                    0
                };
                MATCH + boundary - (j as i64).min(LEADING_CAP)
            })
        })
        .collect();

    for &qc in &needle[1..] {
        let mut cur: Vec<Option<i64>> = vec![None; n];
        // Best of prev[k] + k over k <= j - 2, for the gapped transition.
        let mut best_gapped: Option<i64> = None;
        for j in 0..n {
            if j >= 2
                && let Some(s) = prev[j - 2]
            {
                let cand = s + (j as i64 - 2);
                best_gapped = Some(best_gapped.map_or(cand, |b| b.max(cand)));
            }
            if hay[j] != qc {
                continue;
            }
            let adjacent = j
                .checked_sub(1)
                .and_then(|k| prev[k])
                .map(|s| s + CONSECUTIVE);
            // gap g = j - k - 1  =>  cost GAP_OPEN + g - 1 = GAP_OPEN + j - k - 2
            let gapped = best_gapped.map(|b| b - j as i64 - GAP_OPEN + 2);
            cur[j] = match (adjacent, gapped) {
                (Some(a), Some(g)) => Some(a.max(g)),
                (a, g) => a.or(g),
            }
            .map(|s| s + MATCH);
        }
        prev = cur;
    }

    prev.into_iter().flatten().max()
}

/// Apply the filter to a snapshot, returning matches in relevance order.
pub fn filter_identities(query: &str, identities: &[Identity]) -> Vec<Identity> {
    let mut index = FuzzyIndex::default();
    index.set_source(identities.to_vec());
    index.apply(query);
    index.visible().cloned().collect()
}

/// The corpus, the active query, and the derived view.
#[derive(Debug, Clone, Default)]
pub struct FuzzyIndex {
    corpus: Vec<Identity>,
    haystacks: Vec<Vec<char>>,
    query: String,
    view: Vec<usize>,
}

impl FuzzyIndex {
    pub fn new(identities: Vec<Identity>) -> Self {
        let mut index = Self::default();
        index.set_source(identities);
        index
    }

    /// Replace the corpus and recompute the view against the current query.
    pub fn set_source(&mut self, identities: Vec<Identity>) {
        self.haystacks = identities.iter().map(|i| fold(&i.search_text())).collect();
        self.corpus = identities;
        self.recompute();
    }

    /// Store `query` and recompute the view.
    pub fn apply(&mut self, query: &str) {
        self.query = query.to_string();
        self.recompute();
    }

    fn recompute(&mut self) {
        let needle = fold(self.query.trim());
        if needle.is_empty() {
            self.view = (0..self.corpus.len()).collect();
            return;
        }
        let mut scored: Vec<(usize, i64)> = self
            .haystacks
            .iter()
            .enumerate()
            .filter_map(|(idx, hay)| score_chars(hay, &needle).map(|s| (idx, s)))
            .collect();
        // Stable: equal scores keep corpus order.
        scored.sort_by(|a, b| b.1.cmp(&a.1));
        self.view = scored.into_iter().map(|(idx, _)| idx).collect();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn corpus(&self) -> &[Identity] {
        &self.corpus
    }

    pub fn visible(&self) -> impl ExactSizeIterator<Item = &Identity> + '_ {
        self.view.iter().map(move |&idx| &self.corpus[idx])
    }

    pub fn visible_len(&self) -> usize {
        self.view.len()
    }

    pub fn visible_at(&self, pos: usize) -> Option<&Identity> {
        self.view.get(pos).map(|&idx| &self.corpus[idx])
    }

    /// Position of `id` within the visible view.
    pub fn position_of(&self, id: IdentityId) -> Option<usize> {
        self.visible().position(|i| i.id == id)
    }

    /// Position of the identity holding this (trimmed) pair, if visible.
    pub fn position_of_pair(&self, name: &str, email: &str) -> Option<usize> {
        self.visible().position(|i| i.same_pair(name, email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(id: i64, name: &str, email: &str) -> Identity {
        Identity {
            id: IdentityId(id),
            name: name.into(),
            email: email.into(),
        }
    }

    fn corpus() -> Vec<Identity> {
        vec![
            ident(1, "Alice Smith", "a@x.com"),
            ident(2, "Bob Jones", "b@x.com"),
        ]
    }

    #[test]
    fn empty_query_keeps_source_order() {
        let mut index = FuzzyIndex::new(corpus());
        index.apply("   ");
        let ids: Vec<i64> = index.visible().map(|i| i.id.0).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn ali_matches_only_alice() {
        let view = filter_identities("ali", &corpus());
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].name, "Alice Smith");
    }

    #[test]
    fn matching_is_case_insensitive_and_covers_email() {
        assert!(fuzzy_score("Alice Smith <a@x.com>", "ALICE").is_some());
        assert!(fuzzy_score("Bob Jones <b@x.com>", "b@x").is_some());
        assert!(fuzzy_score("Bob Jones <b@x.com>", "zz").is_none());
    }

    #[test]
    fn non_subsequence_is_rejected() {
        assert!(fuzzy_score("abc", "cab").is_none());
        assert!(fuzzy_score("ab", "abc").is_none());
    }

    #[test]
    fn substring_outranks_scattered_match() {
        let contiguous = fuzzy_score("xxabcxx", "abc").unwrap();
        let scattered = fuzzy_score("a b cxxx", "abc").unwrap();
        assert!(contiguous > scattered, "{contiguous} <= {scattered}");
    }

    #[test]
    fn best_alignment_is_found_past_an_early_scatter() {
        // Greedy leftmost matching would pick the scattered a..l..i.
        let with_run = fuzzy_score("a l i ali", "ali").unwrap();
        let scattered_only = fuzzy_score("a l i xyz", "ali").unwrap();
        assert!(with_run > scattered_only);
    }

    #[test]
    fn shorter_gaps_outrank_longer_gaps() {
        let short = fuzzy_score("axb", "ab").unwrap();
        let long = fuzzy_score("axxxb", "ab").unwrap();
        assert!(short > long);
    }

    #[test]
    fn ties_keep_corpus_order() {
        let items = vec![
            ident(1, "Dana", "d@x.com"),
            ident(2, "Dana", "d@y.com"),
            ident(3, "Dana", "d@z.com"),
        ];
        let mut index = FuzzyIndex::new(items);
        index.apply("dana");
        let ids: Vec<i64> = index.visible().map(|i| i.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn apply_is_idempotent() {
        let mut index = FuzzyIndex::new(corpus());
        index.apply("o");
        let first: Vec<Identity> = index.visible().cloned().collect();
        index.apply("o");
        let second: Vec<Identity> = index.visible().cloned().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn set_source_reapplies_current_query() {
        let mut index = FuzzyIndex::new(corpus());
        index.apply("bob");
        assert_eq!(index.visible_len(), 1);
        index.set_source(vec![ident(3, "Carl", "c@x.com")]);
        assert_eq!(index.query(), "bob");
        assert_eq!(index.visible_len(), 0);
    }
}
