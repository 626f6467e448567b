//! HTTP helpers for Lambda functions.

use lambda_http::http::response::Builder;
use lambda_http::{Body, Response};
use serde::Serialize;

/// Error payload for non-2xx responses.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Response builder carrying the CORS headers the calendar widget expects.
pub fn cors_builder(status: u16) -> Builder {
    Response::builder()
        .status(status)
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "GET, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type")
}

/// Empty 200 answering a CORS preflight.
pub fn preflight_response() -> Result<Response<Body>, lambda_http::Error> {
    Ok(cors_builder(200).body(Body::Empty).map_err(Box::new)?)
}

/// Create a JSON response with the given status code and data.
///
/// Responses are marked non-cacheable since upstream feeds change often.
pub fn json_response<T: Serialize>(
    status: u16,
    data: &T,
) -> Result<Response<Body>, lambda_http::Error> {
    Ok(cors_builder(status)
        .header("content-type", "application/json")
        .header("cache-control", "no-store")
        .body(Body::from(serde_json::to_string(data)?))
        .map_err(Box::new)?)
}

/// Create an error response with the given status code and message.
pub fn error_response(
    status: u16,
    message: impl Into<String>,
) -> Result<Response<Body>, lambda_http::Error> {
    json_response(
        status,
        &ErrorBody {
            error: message.into(),
        },
    )
}
