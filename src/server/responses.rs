use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, Clone)]
pub struct InvalidLimit {
    pub value: String,
}

impl IntoResponse for InvalidLimit {
    fn into_response(self) -> Response {
        let value = self.value;

        IntoResponse::into_response((
            StatusCode::BAD_REQUEST,
            format!("`limit` must be a positive integer, got `{value}`"),
        ))
    }
}

#[derive(Debug, Clone)]
pub struct UnknownFormat {
    pub value: String,
}

impl IntoResponse for UnknownFormat {
    fn into_response(self) -> Response {
        let value = self.value;

        IntoResponse::into_response((
            StatusCode::BAD_REQUEST,
            format!("unknown feed format `{value}` (expected `rss` or `json`)"),
        ))
    }
}

#[derive(Debug, Clone)]
pub struct InvalidPageUrl {
    pub url: String,
}

impl IntoResponse for InvalidPageUrl {
    fn into_response(self) -> Response {
        let url = self.url;

        IntoResponse::into_response((StatusCode::BAD_REQUEST, format!("`{url}` is not a valid URL")))
    }
}

#[derive(Debug, Clone)]
pub struct NoMatchingFeed {
    pub url: String,
}

impl IntoResponse for NoMatchingFeed {
    fn into_response(self) -> Response {
        let url = self.url;

        IntoResponse::into_response((
            StatusCode::NOT_FOUND,
            format!("No feed is available for `{url}`"),
        ))
    }
}
