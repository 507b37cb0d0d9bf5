pub mod index;
pub mod persist;
pub mod query;
pub mod record;
pub mod tokenizer;

pub use index::{build_index, InvertedIndex, Posting};
pub use record::{flatten, FieldValue, MovieRecord};
