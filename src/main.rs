mod config;
mod explore;
mod page;
mod projection;
mod render;
mod routes;
#[cfg(test)]
mod testing;
mod vocab;

use anyhow::Result;
use config::Config;
use dotenv::dotenv;
use env_logger::Builder;
use explore::AppContext;
use log::LevelFilter;
use projection::Pca;
use render::{LabelFont, PlotRenderer};
use std::sync::Arc;
use vocab::{EmbeddingStore, KeyedVectors};

#[macro_use]
extern crate log;

#[tokio::main]
async fn main() -> Result<()> {
    // read .env
    dotenv().ok();

    // init logger
    let log_level = std::env::var("RUST_LOG").unwrap_or_default();

    if log_level == "debug" {
        Builder::new()
            .filter(None, LevelFilter::Off)
            .filter(Some("wordscope"), LevelFilter::Debug)
            .init();
    } else if log_level == "info" {
        Builder::new()
            .filter(None, LevelFilter::Off)
            .filter(Some("wordscope"), LevelFilter::Info)
            .init();
    } else {
        env_logger::init();
    }

    let config = Config::from_env();
    debug!("config: {:?}", config);

    // a missing model is a deployment error, refuse to start
    let store = KeyedVectors::load(&config.model_path)?;
    info!("model loaded: {}", config.model_path.display());
    info!(
        "vocabulary size: {}, dimension: {}",
        store.len(),
        store.dim()
    );

    let font = LabelFont::load(&config.font_path);

    let ctx = Arc::new(AppContext {
        store: Box::new(store),
        projector: Box::new(Pca::default()),
        renderer: Box::new(PlotRenderer::new(font)),
        max_topn: config.max_topn,
    });

    info!("server running at port: {}", config.port);
    warp::serve(routes::routes(ctx))
        .run(([0, 0, 0, 0], config.port))
        .await;

    Ok(())
}
