use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use snafu::Snafu;

#[derive(Debug, Snafu, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[snafu(display("case records are still loading"))]
    Loading,

    #[snafu(display("case records are unavailable: {message}"))]
    Unavailable { message: String },
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (StatusCode::SERVICE_UNAVAILABLE, body).into_response()
    }
}
