//! HTTP routes: the index page, the scrape endpoint, health, and static files.

use std::{convert::Infallible, path::PathBuf, sync::Arc, time::Instant};
use tracing::{error, info, instrument};
use warp::{reject::Rejection, reply::Reply, reply::Response, Filter};

use crate::fetch::{DataSource, Query};
use crate::process::parse_output;
use crate::render::{render_page, RenderContext};

const MAX_BODY_BYTES: u64 = 16 * 1024;

pub struct AppState {
    pub source: Arc<dyn DataSource>,
}

impl AppState {
    pub fn new(source: Arc<dyn DataSource>) -> Arc<Self> {
        Arc::new(Self { source })
    }
}

pub fn routes(
    state: Arc<AppState>,
    static_dir: PathBuf,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let index = warp::get()
        .and(
            warp::path::end()
                .or(warp::path!("index"))
                .unify()
                .or(warp::path!("index.html"))
                .unify(),
        )
        .and_then(index_page);

    let health = warp::path!("health").and(warp::get()).and_then(health_check);

    // each decoder checks the media type (ignoring parameters such as
    // charset) before it takes the body; bodies without one are read as forms
    let body = warp::body::form::<Query>()
        .or(warp::body::json::<Query>())
        .unify();

    let scrape = warp::path!("get-data")
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(body)
        .and(warp::header::optional::<String>("accept"))
        .and(with_state(state))
        .and_then(get_data);

    let assets = warp::get().and(warp::fs::dir(static_dir));

    index
        .or(health)
        .or(scrape)
        .or(assets)
        .with(warp::trace::request())
}

fn with_state(
    state: Arc<AppState>,
) -> impl Filter<Extract = (Arc<AppState>,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

async fn index_page() -> Result<impl Reply, Rejection> {
    Ok(warp::reply::html(render_page(&RenderContext::default())))
}

async fn health_check() -> Result<impl Reply, Rejection> {
    Ok(warp::reply::json(&serde_json::json!({
        "status": "healthy",
        "service": "finscraper"
    })))
}

#[instrument(skip_all, fields(symbol = %query.symbol, statistic = %query.statistic, format = %query.format))]
async fn get_data(
    query: Query,
    accept: Option<String>,
    state: Arc<AppState>,
) -> Result<Response, Rejection> {
    let start = Instant::now();

    // failures are shown on the page like any other output
    let raw = match state.source.fetch(&query).await {
        Ok(raw) => raw,
        Err(e) => {
            error!("scrape failed: {:#}", e);
            format!("{:#}", e)
        }
    };

    let output = parse_output(&raw, query.output_format());
    let ctx = RenderContext::from_output(query, output);
    info!(elapsed = ?start.elapsed(), "scrape rendered");

    if prefers_json(accept.as_deref()) {
        Ok(warp::reply::json(&ctx).into_response())
    } else {
        Ok(warp::reply::html(render_page(&ctx)).into_response())
    }
}

/// True when the first media range in an `Accept` header is JSON.
fn prefers_json(accept: Option<&str>) -> bool {
    accept
        .and_then(|a| a.split(',').next())
        .map(|first| first.trim().starts_with("application/json"))
        .unwrap_or(false)
}
