//! Fuzzy project search with prefix boost
//!
//! Each indexed field (name, alias, path) gets a similarity in `0.0..=1.0`:
//! a case-insensitive substring hit is a perfect 1.0, anything else is the
//! nucleo score relative to the query matched against itself. Fields below
//! `1 - threshold` don't count. A project's score is its best weighted field.
//!
//! Results whose name or alias starts with the query are moved ahead of the
//! rest without otherwise changing the fuzzy order.

use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Instant;

use nucleo_matcher::pattern::Pattern;
use nucleo_matcher::{Matcher, Utf32Str};

use crate::config::SearchConfig;

use super::index::{IndexBuilder, IndexEntry, ProjectIndex};
use super::types::Project;

/// Context for nucleo fuzzy matching that reuses allocations across calls.
pub(crate) struct NucleoCtx {
    pattern: Pattern,
    matcher: Matcher,
    buf: Vec<char>,
}

impl NucleoCtx {
    /// The query is parsed with case-insensitive matching and smart normalization.
    pub fn new(query: &str) -> Self {
        let pattern = Pattern::parse(
            query,
            nucleo_matcher::pattern::CaseMatching::Ignore,
            nucleo_matcher::pattern::Normalization::Smart,
        );
        Self {
            pattern,
            matcher: Matcher::new(nucleo_matcher::Config::DEFAULT),
            buf: Vec::with_capacity(64),
        }
    }

    /// Returns Some(score) if matched, None otherwise.
    #[inline]
    pub fn score(&mut self, haystack: &str) -> Option<u32> {
        self.buf.clear();
        let utf32 = Utf32Str::new(haystack, &mut self.buf);
        self.pattern.score(utf32, &mut self.matcher)
    }
}

/// Scores one query against index entries.
struct FieldScorer {
    query_lower: String,
    nucleo: NucleoCtx,
    /// Score of the query against itself; None disables fuzzy scoring
    self_score: Option<f64>,
    min_similarity: f64,
}

impl FieldScorer {
    fn new(query_lower: &str, threshold: f64) -> Self {
        let mut nucleo = NucleoCtx::new(query_lower);
        let self_score = nucleo
            .score(query_lower)
            .filter(|s| *s > 0)
            .map(f64::from);
        Self {
            query_lower: query_lower.to_string(),
            nucleo,
            self_score,
            min_similarity: 1.0 - threshold,
        }
    }

    /// Similarity of one field, or None if below the cutoff.
    fn similarity(&mut self, field_lower: &str) -> Option<f64> {
        let similarity = if field_lower.contains(self.query_lower.as_str()) {
            1.0
        } else {
            let best = self.self_score?;
            let score = f64::from(self.nucleo.score(field_lower)?);
            (score / best).min(1.0)
        };
        (similarity >= self.min_similarity).then_some(similarity)
    }
}

/// Ranking parameters, usually taken from `SearchConfig`.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchOptions {
    pub min_match_char_length: usize,
    pub threshold: f64,
    pub name_weight: f64,
    pub alias_weight: f64,
    pub path_weight: f64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self::from(&SearchConfig::default())
    }
}

impl From<&SearchConfig> for SearchOptions {
    fn from(config: &SearchConfig) -> Self {
        Self {
            min_match_char_length: config.min_match_char_length,
            threshold: config.threshold,
            name_weight: config.name_weight,
            alias_weight: config.alias_weight,
            path_weight: config.path_weight,
        }
    }
}

impl SearchOptions {
    fn max_weight(&self) -> f64 {
        let max = self.name_weight.max(self.alias_weight).max(self.path_weight);
        if max > 0.0 {
            max
        } else {
            1.0
        }
    }
}

/// A fuzzy hit: entry position in the index and its weighted score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoredEntry {
    pub position: usize,
    pub score: f64,
}

/// Score every entry of `index` against `query_lower`.
///
/// Ordered by score descending; equal scores keep index order.
pub fn fuzzy_candidates(
    index: &ProjectIndex,
    query_lower: &str,
    options: &SearchOptions,
) -> Vec<ScoredEntry> {
    let mut scorer = FieldScorer::new(query_lower, options.threshold);
    let max_weight = options.max_weight();

    let mut matches: Vec<ScoredEntry> = index
        .entries()
        .iter()
        .enumerate()
        .filter_map(|(position, entry)| {
            entry_score(entry, &mut scorer, options, max_weight)
                .map(|score| ScoredEntry { position, score })
        })
        .collect();

    // sort_by is stable, so ties keep collection order
    matches.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    matches
}

fn entry_score(
    entry: &IndexEntry,
    scorer: &mut FieldScorer,
    options: &SearchOptions,
    max_weight: f64,
) -> Option<f64> {
    let fields = [
        (Some(entry.name_lower.as_str()), options.name_weight),
        (entry.alias_lower.as_deref(), options.alias_weight),
        (Some(entry.path_lower.as_str()), options.path_weight),
    ];

    fields
        .into_iter()
        .filter(|(_, weight)| *weight > 0.0)
        .filter_map(|(field, weight)| {
            let similarity = scorer.similarity(field?)?;
            Some(weight / max_weight * similarity)
        })
        .max_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
}

/// Rank `index` for a non-empty query.
pub fn rank_index(
    index: &ProjectIndex,
    query: &str,
    options: &SearchOptions,
) -> Vec<Arc<Project>> {
    let query_lower = query.trim().to_lowercase();
    let entries = index.entries();

    if query_lower.chars().count() < options.min_match_char_length {
        return entries
            .iter()
            .filter(|entry| entry.has_prefix(&query_lower))
            .map(|entry| Arc::clone(&entry.project))
            .collect();
    }

    let candidates = fuzzy_candidates(index, &query_lower, options);

    let (prefixed, rest): (Vec<ScoredEntry>, Vec<ScoredEntry>) = candidates
        .into_iter()
        .partition(|c| entries[c.position].has_prefix(&query_lower));

    prefixed
        .into_iter()
        .chain(rest)
        .map(|c| Arc::clone(&entries[c.position].project))
        .collect()
}

/// Live project search: an index kept current by a debounced builder.
#[derive(Debug)]
pub struct ProjectSearch {
    builder: IndexBuilder,
    options: SearchOptions,
}

impl ProjectSearch {
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            builder: IndexBuilder::new(config.debounce()),
            options: SearchOptions::from(config),
        }
    }

    /// Apply new settings. A changed debounce window affects later changes only.
    pub fn configure(&mut self, config: &SearchConfig) {
        self.builder.set_debounce(config.debounce());
        self.options = SearchOptions::from(config);
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// The project collection changed. Returns true if indexed right away.
    pub fn on_projects_changed(&mut self, snapshot: Vec<Arc<Project>>, now: Instant) -> bool {
        self.builder.on_projects_changed(snapshot, now)
    }

    /// Drive the rebuild timer. Returns true if the index was rebuilt.
    pub fn poll(&mut self, now: Instant) -> bool {
        self.builder.poll(now)
    }

    /// Rebuild from the pending snapshot without waiting.
    pub fn flush(&mut self) -> bool {
        self.builder.flush()
    }

    pub fn builder(&self) -> &IndexBuilder {
        &self.builder
    }

    /// Rank `projects` for `query`.
    ///
    /// An empty query returns `projects` as given. Otherwise results come
    /// from the live index, which may lag `projects` while a rebuild is
    /// pending; without any index the result is empty.
    pub fn rank(&self, query: &str, projects: &[Arc<Project>]) -> Vec<Arc<Project>> {
        if query.trim().is_empty() {
            return projects.to_vec();
        }

        let Some(index) = self.builder.current() else {
            tracing::debug!(category = "SEARCH", "Query before first index build");
            return Vec::new();
        };

        let results = rank_index(&index, query, &self.options);
        tracing::debug!(
            category = "SEARCH",
            query,
            generation = index.generation(),
            results = results.len(),
            "Ranked projects"
        );
        results
    }
}
