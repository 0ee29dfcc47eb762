pub mod error;
pub mod keyed_vectors;
mod matching;
pub mod text;

pub use keyed_vectors::KeyedVectors;

/// One ranked nearest-neighbor hit.
#[derive(Clone, Debug, PartialEq)]
pub struct Neighbor {
    pub word: String,
    pub score: f32,
}

/// Lookup-by-key with top-K similarity search over a read-only vocabulary.
///
/// Keys handed to these methods are expected to be normalized with
/// [`text::normalize`] already.
pub trait EmbeddingStore: Send + Sync {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn contains(&self, word: &str) -> bool;

    fn vector(&self, word: &str) -> Option<&[f32]>;

    /// At most `topn` other words, most similar first.
    fn most_similar(&self, word: &str, topn: usize) -> Vec<Neighbor>;
}
