mod font;
mod plot;

pub use font::LabelFont;
pub use plot::PlotRenderer;

use anyhow::Result;
use base64::{engine::general_purpose::STANDARD, Engine as _};

/// One labeled point of a scatter plot.
#[derive(Clone, Debug, PartialEq)]
pub struct LabeledPoint {
    pub label: String,
    pub x: f64,
    pub y: f64,
    /// Drawn in the query color instead of the neighbor color.
    pub highlighted: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScatterPlot {
    pub title: String,
    pub points: Vec<LabeledPoint>,
}

/// Draws a labeled scatter plot and returns it as encoded PNG bytes.
pub trait Renderer: Send + Sync {
    fn render(&self, plot: &ScatterPlot) -> Result<Vec<u8>>;
}

/// Text-safe transport form of a rendered image.
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}
