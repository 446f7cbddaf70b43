use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;
use tracing::instrument;

use super::{App, Result, ViewQuery};
use crate::model::CountryGroup;
use crate::service::source::SourceState;
use crate::view::{self, DisplayRow, Page, Series};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusBody {
    pub state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub countries: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<usize>,
}

pub async fn status(State(app): State<App>) -> Json<StatusBody> {
    let body = match app.source.current() {
        SourceState::Loading => StatusBody {
            state: "loading",
            error: None,
            countries: None,
            skipped: None,
        },
        SourceState::Ready(dataset) => StatusBody {
            state: "ready",
            error: None,
            countries: Some(dataset.groups.len()),
            skipped: Some(dataset.skipped),
        },
        SourceState::Failed(message) => StatusBody {
            state: "failed",
            error: Some(message),
            countries: None,
            skipped: None,
        },
    };

    Json(body)
}

pub async fn groups(State(app): State<App>) -> Result<Json<Vec<CountryGroup>>> {
    let dataset = app.dataset()?;
    Ok(Json(dataset.groups.clone()))
}

#[instrument(skip(app))]
pub async fn rows(
    State(app): State<App>, Query(query): Query<ViewQuery>,
) -> Result<Json<Page<DisplayRow>>> {
    let dataset = app.dataset()?;
    let range = query.date_range(app.defaults);

    let rows = view::filter(&dataset.groups, range, &query.filters());

    Ok(Json(query.pagination().slice(&rows)))
}

#[instrument(skip(app))]
pub async fn series(State(app): State<App>, Query(query): Query<ViewQuery>) -> Result<Json<Series>> {
    let dataset = app.dataset()?;
    let range = query.date_range(app.defaults);

    let period = view::filter_period(&dataset.groups, range);

    Ok(Json(view::build_series(&period, query.selected.as_deref())))
}
