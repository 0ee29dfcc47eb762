use crate::config::parse_topn;
use crate::projection::Projector;
use crate::render::{encode_base64, LabeledPoint, Renderer, ScatterPlot};
use crate::vocab::text::{normalize, normalize_input};
use crate::vocab::EmbeddingStore;
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::iter;
use std::time::Instant;

pub const MSG_EMPTY_WORD: &str = "Please enter a word.";
pub const MSG_UNKNOWN_WORD: &str = "Word not found in vocabulary.";

/// Read-only state shared by every request.
pub struct AppContext {
    pub store: Box<dyn EmbeddingStore>,
    pub projector: Box<dyn Projector>,
    pub renderer: Box<dyn Renderer>,
    pub max_topn: usize,
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct QueryForm {
    #[serde(default)]
    pub word: String,
    pub topn: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ScoredWord {
    pub word: String,
    /// Similarity with four decimal places.
    pub score: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Message(&'static str),
    Found {
        word: String,
        topn: usize,
        neighbors: Vec<ScoredWord>,
        /// Base64 PNG of the projected neighborhood.
        image: String,
    },
}

pub fn explore(ctx: &AppContext, form: &QueryForm) -> Result<Outcome> {
    let word = normalize_input(&form.word);
    let topn = bounded_topn(parse_topn(form.topn.as_deref()), ctx.max_topn);

    if word.is_empty() {
        info!("reject query: empty word");
        return Ok(Outcome::Message(MSG_EMPTY_WORD));
    }
    if !ctx.store.contains(&word) {
        info!("reject query: {} not in vocabulary", word);
        return Ok(Outcome::Message(MSG_UNKNOWN_WORD));
    }

    let start = Instant::now();
    let neighbors = ctx.store.most_similar(&word, topn);
    debug!("neighbors of {}: {:?}", word, neighbors);

    // index 0 is the query word, the rest follow the neighbor ranking
    let raw_words = iter::once(word.as_str()).chain(neighbors.iter().map(|n| n.word.as_str()));
    let mut labels = Vec::with_capacity(neighbors.len() + 1);
    let mut vectors = Vec::with_capacity(neighbors.len() + 1);
    for raw in raw_words {
        let label = normalize(raw);
        let vector = ctx
            .store
            .vector(&label)
            .or_else(|| ctx.store.vector(raw))
            .ok_or_else(|| anyhow!("no vector for {}", raw))?;
        labels.push(label);
        vectors.push(vector);
    }

    let projection = ctx.projector.reduce(&vectors)?;
    if projection.len() != labels.len() {
        return Err(anyhow!(
            "projection returned {} points for {} words",
            projection.len(),
            labels.len()
        ));
    }

    let plot = ScatterPlot {
        title: format!("Top {} Similar Words to '{}'", topn, word),
        points: labels
            .into_iter()
            .zip(projection)
            .enumerate()
            .map(|(i, (label, point))| LabeledPoint {
                label,
                x: point.x,
                y: point.y,
                highlighted: i == 0,
            })
            .collect(),
    };
    let png = ctx.renderer.render(&plot)?;
    let image = encode_base64(&png);

    let neighbors = neighbors
        .into_iter()
        .map(|n| ScoredWord {
            word: n.word,
            score: format!("{:.4}", n.score),
        })
        .collect::<Vec<_>>();
    info!(
        "query: {} topn: {} returned {} neighbors in {}s",
        word,
        topn,
        neighbors.len(),
        start.elapsed().as_secs_f64()
    );

    Ok(Outcome::Found {
        word,
        topn,
        neighbors,
        image,
    })
}

fn bounded_topn(requested: usize, max_topn: usize) -> usize {
    if requested > max_topn {
        info!("topn {} clamped to {}", requested, max_topn);
        return max_topn;
    }
    requested
}
