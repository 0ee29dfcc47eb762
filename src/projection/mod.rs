mod pca;

pub use pca::Pca;

use anyhow::Result;

/// A point in the reduced plane.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

/// Reduces N vectors of one dimensionality to N points in two dimensions.
/// Output index `i` always corresponds to input index `i`.
pub trait Projector: Send + Sync {
    fn reduce(&self, vectors: &[&[f32]]) -> Result<Vec<Point2>>;
}
