use crate::record::{flatten, MovieRecord};
use crate::tokenizer::tokenize_into;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// One index entry: a movie known to contain some token. Equality is on
/// both fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Posting {
    pub movie_id: String,
    pub title: String,
}

/// Token -> posting-set mapping. Built once over a full corpus and
/// read-only afterwards; concurrent readers need no synchronization.
/// Every present token maps to a non-empty set.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct InvertedIndex {
    postings: HashMap<String, HashSet<Posting>>,
    num_movies: u32,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn postings_for(&self, token: &str) -> Option<&HashSet<Posting>> {
        self.postings.get(token)
    }

    pub fn contains_token(&self, token: &str) -> bool {
        self.postings.contains_key(token)
    }

    pub fn num_tokens(&self) -> usize {
        self.postings.len()
    }

    pub fn num_movies(&self) -> u32 {
        self.num_movies
    }
}

/// Builds the inverted index over a full id->record corpus in one pass.
///
/// Per record: flatten every field value into a deduplicated bag of leaf
/// strings (duplicate field values must not multiply token generation),
/// tokenize the bag, then file the (id, title) posting under each token.
/// Posting-set ordering is unspecified; callers sort when comparing.
pub fn build_index(records: &HashMap<String, MovieRecord>) -> InvertedIndex {
    let mut index = InvertedIndex::new();
    for (i, (movie_id, record)) in records.iter().enumerate() {
        if (i + 1) % 100 == 0 {
            tracing::info!(indexed = i + 1, total = records.len(), "indexing progress");
        }
        let mut leaves: HashSet<String> = HashSet::new();
        for value in record.field_values() {
            leaves.extend(flatten(&value));
        }
        let mut tokens = HashSet::new();
        for leaf in &leaves {
            tokenize_into(leaf, &mut tokens);
        }
        for token in tokens {
            index.postings.entry(token).or_default().insert(Posting {
                movie_id: movie_id.clone(),
                title: record.title.clone(),
            });
        }
    }
    index.num_movies = records.len() as u32;
    tracing::debug!(
        num_movies = index.num_movies,
        num_tokens = index.num_tokens(),
        "index built"
    );
    index
}
