//! Fuzzy matching of free-text search terms against catalog entries.
//!
//! A candidate's score is the sum of `similarity(field value, term)` over every combination of
//! field and term. Each individual similarity is in `[0, 1]`, where `1.0` means the strings are
//! equal ignoring case.

use std::cmp::Ordering;
use std::fmt::Debug;
use tracing::{trace, warn};

/// Matches below this score are rejected by `Matcher::find_best` unless configured otherwise.
pub const DEFAULT_THRESHOLD: f64 = 0.8;

/// A string similarity measure returning a value in `[0, 1]`.
///
/// Implementations must be deterministic and must return `1.0` for strings that are equal when
/// case is ignored.
pub trait Similarity: Debug + Send + Sync {
    fn similarity(&self, a: &str, b: &str) -> f64;
}

/// Sørensen–Dice coefficient over character bigrams, ignoring case and whitespace. Strings that
/// share no bigram score `0.0`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SorensenDice;

impl Similarity for SorensenDice {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        let (a, b) = (normalize(a), normalize(b));
        if a == b {
            return 1.0;
        }
        strsim::sorensen_dice(&a, &b)
    }
}

/// Jaro-Winkler similarity, ignoring case. Favors strings that share a prefix.
#[derive(Debug, Default, Clone, Copy)]
pub struct JaroWinkler;

impl Similarity for JaroWinkler {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        strsim::jaro_winkler(&normalize(a), &normalize(b))
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Something with named text fields that can be searched, e.g. a project's `name`.
pub trait Searchable {
    /// Returns the value of the field called `name`, or `None` if there is no such field.
    fn field(&self, name: &str) -> Option<&str>;
}

impl<T> Searchable for &T
where
    T: Searchable + ?Sized,
{
    fn field(&self, name: &str) -> Option<&str> {
        (**self).field(name)
    }
}

/// A candidate together with its aggregate score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ranked<'a, T> {
    pub item: &'a T,
    pub score: f64,
}

/// Ranks and finds catalog entries using a pluggable `Similarity`.
#[derive(Debug)]
pub struct Matcher {
    threshold: f64,
    similarity: Box<dyn Similarity>,
}

impl Default for Matcher {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            similarity: Box::new(SorensenDice),
        }
    }
}

impl Matcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_similarity(mut self, similarity: impl Similarity + 'static) -> Self {
        self.similarity = Box::new(similarity);
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// The sum of similarities over every `(field, term)` pair. Fields the candidate does not
    /// have contribute nothing.
    pub fn score<T, S>(&self, candidate: &T, terms: &[S], fields: &[&str]) -> f64
    where
        T: Searchable,
        S: AsRef<str>,
    {
        fields
            .iter()
            .filter_map(|field| candidate.field(field))
            .flat_map(|value| {
                terms
                    .iter()
                    .map(move |term| self.similarity.similarity(value, term.as_ref()))
            })
            .sum()
    }

    /// Scores every candidate and sorts them by descending score. Candidates with equal scores
    /// keep their original order.
    pub fn rank<'a, T, S>(
        &self,
        candidates: &'a [T],
        terms: &[S],
        fields: &[&str],
    ) -> Vec<Ranked<'a, T>>
    where
        T: Searchable,
        S: AsRef<str>,
    {
        if candidates.is_empty() {
            let terms: Vec<&str> = terms.iter().map(AsRef::as_ref).collect();
            warn!("No items to rank for terms {terms:?}");
            return Vec::new();
        }
        let mut ranked: Vec<Ranked<'a, T>> = candidates
            .iter()
            .map(|item| Ranked {
                item,
                score: self.score(item, terms, fields),
            })
            .collect();
        ranked.sort_by(|a, b| descending(a.score, b.score));
        ranked
    }

    /// Returns the best match for `term`, but only if its score reaches the threshold. A candidate
    /// that shares nothing with `term` is never returned, whatever the threshold.
    pub fn find_best<'a, T>(
        &self,
        candidates: &'a [T],
        term: &str,
        fields: &[&str],
    ) -> Option<&'a T>
    where
        T: Searchable,
    {
        if candidates.is_empty() {
            warn!("No items to search through for term '{term}'");
            return None;
        }
        let best = self.rank(candidates, &[term], fields).into_iter().next()?;
        trace!("Best score for '{term}' is {:.3}", best.score);
        if best.score > 0.0 && best.score >= self.threshold {
            Some(best.item)
        } else {
            warn!("No matches found for search term '{term}'");
            None
        }
    }
}

fn descending(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}
