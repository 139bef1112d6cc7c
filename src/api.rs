//! JSON read API over the loaded launch table.
//!
//! Serves the same chart data the desktop dashboard draws, so the figures
//! can be consumed by a browser front end or scripts:
//!
//! - `GET /api/sites`   dropdown options and payload bounds
//! - `GET /api/pie`     `?site=ALL`
//! - `GET /api/scatter` `?site=ALL&low=0&high=10000`

use std::net::SocketAddr;
use std::sync::Arc;
use std::thread::JoinHandle;

use anyhow::Context;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};

use crate::data::model::LaunchDataset;
use crate::data::query::{
    self, ALL_SITES_VALUE, PayloadRange, PieSlice, RangeError, ScatterPoint, SiteOption,
    SiteSelector,
};

pub type SharedDataset = Arc<LaunchDataset>;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid payload range: {0}")]
    InvalidRange(#[from] RangeError),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::InvalidRange(_) => StatusCode::BAD_REQUEST,
        };
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SiteQuery {
    pub site: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ScatterQuery {
    pub site: Option<String>,
    pub low: Option<f64>,
    pub high: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct SitesResponse {
    pub options: Vec<SiteOption>,
    pub min_payload: f64,
    pub max_payload: f64,
}

#[derive(Debug, Serialize)]
pub struct PieResponse {
    pub title: String,
    pub slices: Vec<PieSlice>,
}

#[derive(Debug, Serialize)]
pub struct ScatterResponse {
    pub title: String,
    pub points: Vec<ScatterPoint>,
}

fn selector(site: Option<&str>) -> SiteSelector {
    SiteSelector::parse(site.unwrap_or(ALL_SITES_VALUE))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/sites
pub async fn api_sites(State(dataset): State<SharedDataset>) -> Json<SitesResponse> {
    Json(SitesResponse {
        options: query::site_options(&dataset),
        min_payload: dataset.min_payload(),
        max_payload: dataset.max_payload(),
    })
}

/// GET /api/pie
pub async fn api_pie(
    State(dataset): State<SharedDataset>,
    Query(params): Query<SiteQuery>,
) -> Json<PieResponse> {
    let site = selector(params.site.as_deref());
    Json(PieResponse {
        title: query::pie_title(&site),
        slices: query::site_outcome_pie(&dataset, &site),
    })
}

/// GET /api/scatter
pub async fn api_scatter(
    State(dataset): State<SharedDataset>,
    Query(params): Query<ScatterQuery>,
) -> Result<Json<ScatterResponse>, ApiError> {
    let site = selector(params.site.as_deref());
    // Missing bounds open the range to the slider floor / heaviest payload,
    // so a single given bound can never be reversed by its default partner.
    let low = params.low.unwrap_or(0.0);
    let high = params
        .high
        .unwrap_or_else(|| dataset.max_payload().max(low));
    let range = PayloadRange::new(low, high)?;
    Ok(Json(ScatterResponse {
        title: query::scatter_title(&site),
        points: query::payload_scatter(&dataset, &site, range),
    }))
}

// ---------------------------------------------------------------------------
// Router and server
// ---------------------------------------------------------------------------

/// Build the API router over a shared dataset.
pub fn build_router(dataset: SharedDataset) -> Router {
    Router::new()
        .route("/api/sites", get(api_sites))
        .route("/api/pie", get(api_pie))
        .route("/api/scatter", get(api_scatter))
        .with_state(dataset)
}

/// Bind `addr` now and serve on a background thread with its own runtime.
///
/// Binding happens on the caller's thread so a port conflict is reported
/// before the UI starts.
///
/// The thread yields the server's outcome, so a caller that joins it can
/// tell a clean shutdown from a failure.
pub fn spawn(
    addr: SocketAddr,
    dataset: SharedDataset,
) -> anyhow::Result<JoinHandle<anyhow::Result<()>>> {
    let listener =
        std::net::TcpListener::bind(addr).with_context(|| format!("binding {addr}"))?;
    listener
        .set_nonblocking(true)
        .context("configuring API listener")?;

    let handle = std::thread::Builder::new()
        .name("api-server".to_string())
        .spawn(move || {
            let result = run(listener, dataset);
            if let Err(e) = &result {
                log::error!("API server stopped: {e:#}");
            }
            result
        })
        .context("spawning API thread")?;

    log::info!("API listening on http://{addr}");
    Ok(handle)
}

fn run(listener: std::net::TcpListener, dataset: SharedDataset) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("building tokio runtime")?;

    runtime.block_on(async move {
        let listener = tokio::net::TcpListener::from_std(listener)?;
        axum::serve(listener, build_router(dataset)).await?;
        Ok::<(), anyhow::Error>(())
    })
}
