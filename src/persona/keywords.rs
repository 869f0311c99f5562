//! Keyword derivation from a persona and task description.

use std::collections::BTreeSet;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Words of four or more word characters.
    static ref WORD_RE: Regex = Regex::new(r"\b\w{4,}\b").unwrap();
}

/// Concepts and the related terms they pull into a query.
pub const CONCEPT_MAP: &[(&str, &[&str])] = &[
    (
        "form",
        &[
            "fillable",
            "sign",
            "signature",
            "interactive",
            "fields",
            "create",
            "convert",
            "manage",
        ],
    ),
    ("onboarding", &["form", "compliance", "signature", "document"]),
    ("compliance", &["form", "sign", "document", "rules"]),
    ("signatures", &["sign", "e-signatures", "request", "send"]),
    (
        "travel",
        &["guide", "cities", "tips", "packing", "plan", "itinerary", "adventures"],
    ),
    (
        "friends",
        &["group", "party", "entertainment", "nightlife", "activities", "budget"],
    ),
    (
        "food",
        &["menu", "dinner", "dish", "recipe", "cuisine", "restaurants", "ingredients"],
    ),
    (
        "vegetarian",
        &["veggie", "vegetable", "salad", "falafel", "ratatouille", "chickpea"],
    ),
    ("buffet", &["menu", "dishes", "sides", "mains", "gathering"]),
    ("gluten-free", &["gf", "quinoa", "rice", "salad"]),
];

/// Terms related to a concept, if the concept is known.
pub fn related_terms(concept: &str) -> Option<&'static [&'static str]> {
    CONCEPT_MAP
        .iter()
        .find(|(base, _)| *base == concept)
        .map(|(_, related)| *related)
}

/// Lower-case query terms, sorted and de-duplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordSet {
    words: BTreeSet<String>,
}

impl KeywordSet {
    /// Derive keywords from a persona role and a task.
    ///
    /// Base words are expanded one level through [`CONCEPT_MAP`]; related
    /// terms are not expanded further.
    pub fn from_query(role: &str, task: &str) -> Self {
        let query = format!("{} {}", role.to_lowercase(), task.to_lowercase());
        let base: BTreeSet<String> = WORD_RE
            .find_iter(&query)
            .map(|m| m.as_str().to_string())
            .collect();

        let mut words = base.clone();
        for word in &base {
            if let Some(related) = related_terms(word) {
                words.extend(related.iter().map(|t| t.to_string()));
            }
        }

        Self { words }
    }

    /// Keyword set from explicit words.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Number of keywords contained in `text` (already lower-cased).
    pub fn count_contained(&self, lowered: &str) -> usize {
        self.iter().filter(|k| lowered.contains(k)).count()
    }
}
