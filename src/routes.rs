use crate::explore::{explore, AppContext, Outcome, QueryForm, ScoredWord};
use crate::page;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::reply::Response;
use warp::{Filter, Rejection, Reply};

const BODY_LIMIT: u64 = 16 * 1024;

#[derive(Deserialize, Debug)]
pub struct SimilarRequest {
    #[serde(default)]
    word: String,
    #[serde(default)]
    topn: Option<Value>,
}

impl From<SimilarRequest> for QueryForm {
    fn from(req: SimilarRequest) -> Self {
        let topn = match req.topn {
            Some(Value::String(s)) => Some(s),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };
        QueryForm {
            word: req.word,
            topn,
        }
    }
}

#[derive(Serialize, Debug, Default)]
pub struct SimilarResponse {
    message: Option<&'static str>,
    neighbors: Vec<ScoredWord>,
    image: Option<String>,
}

impl From<Outcome> for SimilarResponse {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Message(message) => SimilarResponse {
                message: Some(message),
                ..Default::default()
            },
            Outcome::Found {
                neighbors, image, ..
            } => SimilarResponse {
                message: None,
                neighbors,
                image: Some(image),
            },
        }
    }
}

pub fn routes(
    ctx: Arc<AppContext>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let with_ctx = warp::any().map(move || Arc::clone(&ctx));

    let index_route = warp::path::end().and(warp::get()).and_then(handle_index);

    let query_route = warp::path::end()
        .and(warp::post())
        .and(warp::body::content_length_limit(BODY_LIMIT))
        .and(warp::body::form())
        .and(with_ctx.clone())
        .and_then(handle_query);

    let api_route = warp::path!("api" / "similar")
        .and(warp::post())
        .and(warp::body::content_length_limit(BODY_LIMIT))
        .and(warp::body::json())
        .and(with_ctx)
        .and_then(handle_api);

    let health_route = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .map(|| "ok");

    index_route.or(query_route).or(api_route).or(health_route)
}

async fn handle_index() -> Result<impl Reply, Rejection> {
    Ok(warp::reply::html(page::render(None)))
}

async fn handle_query(form: QueryForm, ctx: Arc<AppContext>) -> Result<Response, Rejection> {
    info!("get query request: {:?}, topn: {:?}", form.word, form.topn);
    match run(ctx, form).await {
        Ok(outcome) => Ok(warp::reply::html(page::render(Some(&outcome))).into_response()),
        Err(e) => {
            error!("handle query request failed: {:#}", e);
            Ok(warp::reply::with_status(
                warp::reply::html("Internal Server Error"),
                StatusCode::INTERNAL_SERVER_ERROR,
            )
            .into_response())
        }
    }
}

async fn handle_api(req: SimilarRequest, ctx: Arc<AppContext>) -> Result<Response, Rejection> {
    info!("get api request: {:?}", req);
    match run(ctx, req.into()).await {
        Ok(outcome) => Ok(warp::reply::json(&SimilarResponse::from(outcome)).into_response()),
        Err(e) => {
            error!("handle api request failed: {:#}", e);
            Ok(warp::reply::with_status(
                warp::reply::json(&serde_json::json!({ "error": "internal server error" })),
                StatusCode::INTERNAL_SERVER_ERROR,
            )
            .into_response())
        }
    }
}

/// Lookup, projection and rasterization are CPU bound, so they leave the reactor.
async fn run(ctx: Arc<AppContext>, form: QueryForm) -> Result<Outcome> {
    tokio::task::spawn_blocking(move || explore(&ctx, &form)).await?
}
