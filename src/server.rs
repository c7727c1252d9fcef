//! HTTP front end.
//!
//! Every request runs a fresh pipeline batch; nothing is cached between
//! requests.  Failures map to a 500 with a fixed message, the details only go
//! to the log.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use thiserror::Error;
use tracing::{error, info};

use crate::pipeline::{Pipeline, PipelineError};
use crate::render::{self, RenderError};

/// Errors that end a request early.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

impl ServeError {
    fn public_message(&self) -> &'static str {
        match self {
            ServeError::Pipeline(_) => "Failed to load top stories",
            ServeError::Render(_) => "Failed to process the template",
        }
    }
}

impl IntoResponse for ServeError {
    fn into_response(self) -> Response {
        let message = self.public_message();
        error!("request failed: {:#}", anyhow::Error::new(self));
        (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
    }
}

pub type SharedPipeline = Arc<Pipeline>;

pub fn router(pipeline: SharedPipeline) -> Router {
    Router::new()
        .route("/", get(front_page))
        .route("/rss.xml", get(rss_feed))
        .with_state(pipeline)
}

async fn front_page(State(pipeline): State<SharedPipeline>) -> Result<Html<String>, ServeError> {
    let payload = pipeline.run().await?;
    Ok(Html(render::html_page(&payload)?))
}

async fn rss_feed(State(pipeline): State<SharedPipeline>) -> Result<Response, ServeError> {
    let payload = pipeline.run().await?;
    let xml = render::rss_channel(&payload, pipeline.source_name())?;
    Ok(([(header::CONTENT_TYPE, "application/rss+xml; charset=utf-8")], xml).into_response())
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(addr: SocketAddr, pipeline: Pipeline) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    let local_addr = listener.local_addr()?;

    info!(
        "Serving top {} stories on http://{local_addr}/ (rss: /rss.xml)",
        pipeline.num_stories()
    );

    axum::serve(listener, router(Arc::new(pipeline)))
        .await
        .context("HTTP server stopped")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
