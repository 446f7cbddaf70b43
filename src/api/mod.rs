use std::path::Path;

use axum::routing::get;
use axum::Router;
use axum_template::engine::Engine;
use snafu::ResultExt;
use tera::Tera;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::error::{ApplicationError, LoadTemplatesSnafu};

mod error;
mod json;
mod pages;
mod query;
mod state;

pub use error::*;
pub use json::StatusBody;
pub use query::*;
pub use state::*;

pub type Result<T, E = ApiError> = std::result::Result<T, E>;

pub fn router(app: App) -> Router {
    Router::new()
        .route("/", get(pages::table))
        .route("/chart", get(pages::chart))
        .route("/api/status", get(json::status))
        .route("/api/groups", get(json::groups))
        .route("/api/rows", get(json::rows))
        .route("/api/series", get(json::series))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(app)
}

/// Load every `*.html` template under `dir`.
pub fn load_templates(dir: &Path) -> std::result::Result<AppEngine, ApplicationError> {
    let pattern = dir.join("**").join("*.html");
    let tera = Tera::new(&pattern.to_string_lossy()).context(LoadTemplatesSnafu { dir })?;

    Ok(Engine::from(tera))
}
