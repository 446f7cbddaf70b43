use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum_template::RenderHtml;
use serde::Serialize;
use tracing::instrument;

use super::{ApiError, App, ViewQuery};
use crate::view::{self, DateRange, DisplayRow, Metric, Page, Plot, PAGE_SIZES};

const PLOT_WIDTH: f64 = 960.0;
const PLOT_HEIGHT: f64 = 360.0;

#[derive(Debug, Serialize)]
struct Status {
    state: &'static str,
    message: Option<String>,
}

impl Status {
    fn ready() -> Self {
        Self {
            state: "ready",
            message: None,
        }
    }
}

impl From<ApiError> for Status {
    fn from(error: ApiError) -> Self {
        let state = match error {
            ApiError::Loading => "loading",
            ApiError::Unavailable { .. } => "failed",
        };

        Self {
            state,
            message: Some(error.to_string()),
        }
    }
}

/// Current input values, echoed back into the form controls.
#[derive(Debug, Serialize)]
struct Form {
    start: String,
    end: String,
    metric: String,
    min: String,
    max: String,
    country: String,
    selected: String,
    page_size: usize,
}

impl Form {
    fn new(query: &ViewQuery, range: DateRange) -> Self {
        let text = |value: Option<f64>| value.map(|v| v.to_string()).unwrap_or_default();

        Self {
            start: range.start.to_string(),
            end: range.end.to_string(),
            metric: query.metric.map(|m| m.to_string()).unwrap_or_default(),
            min: text(query.min),
            max: text(query.max),
            country: query.country.clone(),
            selected: query.selected.clone().unwrap_or_default(),
            page_size: query.pagination().page_size,
        }
    }
}

#[derive(Debug, Serialize)]
struct Choice {
    value: String,
    label: String,
    selected: bool,
}

#[derive(Debug, Serialize)]
struct Links {
    table: String,
    chart: String,
    reset: String,
    previous: Option<String>,
    next: Option<String>,
}

impl Links {
    fn new(query: &ViewQuery) -> Self {
        let encoded = query.to_query_string();

        Self {
            table: format!("/?{encoded}"),
            chart: format!("/chart?{encoded}"),
            reset: format!("/?{}", query.reset().to_query_string()),
            previous: None,
            next: None,
        }
    }

    fn paged<T>(mut self, query: &ViewQuery, page: &Page<T>) -> Self {
        if page.has_previous() {
            self.previous = Some(format!("/?{}", query.with_page(page.page - 1).to_query_string()));
        }
        if page.has_next() {
            self.next = Some(format!("/?{}", query.with_page(page.page + 1).to_query_string()));
        }
        self
    }
}

#[derive(Debug, Serialize)]
struct TableView {
    status: Status,
    form: Form,
    links: Links,
    metrics: Vec<Choice>,
    page_sizes: [usize; 3],
    /// One-based, for display.
    page_number: usize,
    page: Option<Page<DisplayRow>>,
}

#[instrument(skip(app))]
pub async fn table(State(app): State<App>, Query(query): Query<ViewQuery>) -> impl IntoResponse {
    let range = query.date_range(app.defaults);
    let mut links = Links::new(&query);

    let (status, page) = match app.dataset() {
        Ok(dataset) => {
            let rows = view::filter(&dataset.groups, range, &query.filters());
            let page = query.pagination().slice(&rows);
            links = links.paged(&query, &page);
            (Status::ready(), Some(page))
        }
        Err(error) => (Status::from(error), None),
    };

    let metrics = Metric::ALL
        .into_iter()
        .map(|metric| Choice {
            value: metric.key().to_string(),
            label: metric.label().to_string(),
            selected: query.metric == Some(metric),
        })
        .collect();

    let context = TableView {
        status,
        form: Form::new(&query, range),
        links,
        metrics,
        page_sizes: PAGE_SIZES,
        page_number: query.pagination().page.saturating_add(1),
        page,
    };

    RenderHtml("table.html", app.engine, context)
}

#[derive(Debug, Serialize)]
struct ChartView {
    status: Status,
    form: Form,
    links: Links,
    countries: Vec<Choice>,
    plot: Option<Plot>,
}

#[instrument(skip(app))]
pub async fn chart(State(app): State<App>, Query(query): Query<ViewQuery>) -> impl IntoResponse {
    let range = query.date_range(app.defaults);
    let selected = query.selected.as_deref();

    let (status, countries, plot) = match app.dataset() {
        Ok(dataset) => {
            let period = view::filter_period(&dataset.groups, range);
            let series = view::build_series(&period, selected);

            let countries = period
                .iter()
                .map(|group| Choice {
                    value: group.country.clone(),
                    label: group.country.clone(),
                    selected: selected == Some(group.country.as_str()),
                })
                .collect();

            let plot = Plot::layout(&series, PLOT_WIDTH, PLOT_HEIGHT);
            (Status::ready(), countries, Some(plot))
        }
        Err(error) => (Status::from(error), Vec::new(), None),
    };

    let context = ChartView {
        status,
        form: Form::new(&query, range),
        links: Links::new(&query),
        countries,
        plot,
    };

    RenderHtml("chart.html", app.engine, context)
}
