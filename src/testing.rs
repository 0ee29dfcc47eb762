//! Fixtures shared by unit tests: a small Tamil vocabulary and fake renderers.

use crate::explore::AppContext;
use crate::projection::Pca;
use crate::render::{Renderer, ScatterPlot};
use crate::vocab::{EmbeddingStore, KeyedVectors, Neighbor};
use anyhow::{anyhow, Result};
use std::sync::{Arc, Mutex};

pub fn sample_store() -> KeyedVectors {
    let entries = [
        ("நாய்", [1.0f32, 0.1, 0.0, 0.0]),
        ("பூனை", [0.9, 0.2, 0.0, 0.1]),
        ("பசு", [0.7, 0.0, 0.3, 0.0]),
        ("மரம்", [0.0, 1.0, 0.1, 0.0]),
        ("இலை", [0.1, 0.9, 0.3, 0.0]),
        // decomposed spelling of கொடி, composed on load
        ("\u{0B95}\u{0BC6}\u{0BBE}\u{0B9F}\u{0BBF}", [0.0, 0.7, 0.6, 0.1]),
        ("பூ", [0.2, 0.5, 0.5, 0.3]),
        ("நீர்", [0.0, 0.0, 0.2, 1.0]),
    ];
    KeyedVectors::from_entries(
        entries
            .iter()
            .map(|(word, vector)| (word.to_string(), vector.to_vec())),
    )
    .unwrap()
}

pub fn context() -> (AppContext, Arc<RecordingRenderer>) {
    let renderer = Arc::new(RecordingRenderer::default());
    let ctx = AppContext {
        store: Box::new(sample_store()),
        projector: Box::new(Pca::default()),
        renderer: Box::new(Arc::clone(&renderer)),
        max_topn: 50,
    };
    (ctx, renderer)
}

/// Keeps the last plot it was asked to draw.
#[derive(Default)]
pub struct RecordingRenderer {
    last: Mutex<Option<ScatterPlot>>,
}

impl RecordingRenderer {
    pub fn last(&self) -> Option<ScatterPlot> {
        self.last.lock().unwrap().clone()
    }
}

impl Renderer for RecordingRenderer {
    fn render(&self, plot: &ScatterPlot) -> Result<Vec<u8>> {
        *self.last.lock().unwrap() = Some(plot.clone());
        Ok(b"fake png".to_vec())
    }
}

impl<R: Renderer> Renderer for Arc<R> {
    fn render(&self, plot: &ScatterPlot) -> Result<Vec<u8>> {
        (**self).render(plot)
    }
}

pub struct FailingRenderer;

impl Renderer for FailingRenderer {
    fn render(&self, _plot: &ScatterPlot) -> Result<Vec<u8>> {
        Err(anyhow!("renderer unavailable"))
    }
}

/// Two-word store that hands back its neighbor in decomposed form.
pub struct SpellingStore;

const QUERY: &str = "\u{0B85}";
const NEIGHBOR: &str = "\u{0B95}\u{0BCA}";
static QUERY_VECTOR: [f32; 2] = [1.0, 0.0];
static NEIGHBOR_VECTOR: [f32; 2] = [0.5, 0.5];

impl EmbeddingStore for SpellingStore {
    fn len(&self) -> usize {
        2
    }

    fn contains(&self, word: &str) -> bool {
        word == QUERY || word == NEIGHBOR
    }

    fn vector(&self, word: &str) -> Option<&[f32]> {
        match word {
            QUERY => Some(QUERY_VECTOR.as_slice()),
            NEIGHBOR => Some(NEIGHBOR_VECTOR.as_slice()),
            _ => None,
        }
    }

    fn most_similar(&self, word: &str, _topn: usize) -> Vec<Neighbor> {
        if word != QUERY {
            return Vec::new();
        }
        vec![Neighbor {
            word: "\u{0B95}\u{0BC6}\u{0BBE}".to_string(),
            score: 0.7071,
        }]
    }
}
