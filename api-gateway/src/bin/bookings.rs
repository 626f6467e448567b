//! Bookings Lambda - Handles the bookings calendar endpoint.
//!
//! Fetches the iCalendar feeds configured for the requested calendar group,
//! normalizes the booking events (provider color, day-type classification),
//! and returns a chronologically sorted JSON list for the booking calendar
//! widget. A failing feed is reported in the `errors` array without failing
//! the request; only a bad group or all feeds failing produce a non-200.

use lambda_http::http::Method;
use lambda_http::{run, service_fn, Body, Error, Request, RequestExt, Response};
use shared::http::{error_response, json_response, preflight_response};
use shared::normalize::{display_events, normalize_events};
use shared::{BookingsResponse, CalendarConfig, CalendarGroup, FeedClient, FeedError};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Application state
struct AppState {
    config: CalendarConfig,
    feed_client: FeedClient,
}

impl AppState {
    fn new() -> Result<Self, Error> {
        Ok(Self {
            config: CalendarConfig::from_env(),
            feed_client: FeedClient::new()?,
        })
    }
}

/// Fetch, normalize, and assemble the response body for one group.
async fn build_response(
    state: &AppState,
    group: CalendarGroup,
) -> shared::Result<BookingsResponse> {
    let urls = state.config.feeds_for(group);
    if urls.is_empty() {
        return Err(shared::Error::Config(
            "No ICS urls configured for this calendar.".to_string(),
        ));
    }

    let mut raw_events = Vec::new();
    let mut errors: Vec<FeedError> = Vec::new();

    for url in urls {
        match state.feed_client.fetch_events(url).await {
            Ok(events) => {
                info!(url = url.as_str(), count = events.len(), "Fetched feed");
                raw_events.extend(events);
            }
            Err(e) => {
                warn!(url = url.as_str(), error = %e, "Feed failed");
                errors.push(FeedError {
                    url: url.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    if errors.len() == urls.len() {
        return Err(shared::Error::AllFeedsFailed);
    }

    let events = display_events(normalize_events(raw_events), state.config.display_mode);

    Ok(BookingsResponse {
        which: group.as_str().to_string(),
        count: events.len(),
        events,
        errors,
    })
}

/// Short client-facing message; details stay in the logs.
fn user_message(error: &shared::Error) -> String {
    match error {
        shared::Error::Config(message) => message.clone(),
        shared::Error::AllFeedsFailed => "Failed to load ICS".to_string(),
        _ => "Internal server error".to_string(),
    }
}

async fn handler(state: Arc<AppState>, event: Request) -> Result<Response<Body>, Error> {
    if event.method() == Method::OPTIONS {
        return preflight_response();
    }
    if event.method() != Method::GET {
        return error_response(405, "Method not allowed");
    }

    let params = event.query_string_parameters();
    let which = params.first("which").unwrap_or_default();

    let group: CalendarGroup = match which.parse() {
        Ok(group) => group,
        Err(_) => {
            return error_response(
                400,
                "Missing or invalid 'which' param. Use 'tiny' or 'studio'.",
            )
        }
    };

    match build_response(&state, group).await {
        Ok(body) => json_response(200, &body),
        Err(e) => {
            warn!(error = %e, which = group.as_str(), "Request failed");
            error_response(e.status_code(), user_message(&e))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let state = Arc::new(AppState::new()?);

    run(service_fn(move |event| {
        let state = Arc::clone(&state);
        async move { handler(state, event).await }
    }))
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::DisplayMode;
    use std::collections::HashMap;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const TEST_ICS: &str = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
BEGIN:VEVENT\r\n\
DTSTART;VALUE=DATE:20240101\r\n\
DTEND;VALUE=DATE:20240104\r\n\
UID:test@example.com\r\n\
SUMMARY:Reserved\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

    fn state_with_feeds(tiny_feeds: Vec<String>) -> Arc<AppState> {
        Arc::new(AppState {
            config: CalendarConfig {
                tiny_feeds,
                studio_feeds: Vec::new(),
                display_mode: DisplayMode::Itemized,
            },
            feed_client: FeedClient::new().unwrap(),
        })
    }

    fn get_request(which: Option<&str>) -> Request {
        let request = Request::default();
        match which {
            Some(value) => {
                let mut params: HashMap<String, Vec<String>> = HashMap::new();
                params.insert("which".to_string(), vec![value.to_string()]);
                request.with_query_string_parameters(params)
            }
            None => request,
        }
    }

    /// Serve one canned HTTP response on a loopback socket.
    async fn serve_ics_once() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();

            // Drain the request head before answering.
            let mut request = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);
                if request.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 200 OK\r\ncontent-type: text/calendar\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                TEST_ICS.len(),
                TEST_ICS
            );
            socket.write_all(response.as_bytes()).await.unwrap();
        });

        format!("http://{}/calendar.ics", addr)
    }

    #[tokio::test]
    async fn test_options_preflight() {
        let state = state_with_feeds(Vec::new());
        let mut request = Request::default();
        *request.method_mut() = Method::OPTIONS;

        let response = handler(state, request).await.unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()["Access-Control-Allow-Origin"], "*");
    }

    #[tokio::test]
    async fn test_post_is_rejected() {
        let state = state_with_feeds(Vec::new());
        let mut request = get_request(Some("tiny"));
        *request.method_mut() = Method::POST;

        let response = handler(state, request).await.unwrap();
        assert_eq!(response.status(), 405);
    }

    #[tokio::test]
    async fn test_missing_which_param() {
        let state = state_with_feeds(Vec::new());

        let response = handler(state, get_request(None)).await.unwrap();
        assert_eq!(response.status(), 400);
    }

    #[tokio::test]
    async fn test_unknown_group() {
        let state = state_with_feeds(Vec::new());

        let response = handler(state, get_request(Some("penthouse"))).await.unwrap();
        assert_eq!(response.status(), 400);
    }

    #[tokio::test]
    async fn test_group_without_feeds() {
        let state = state_with_feeds(Vec::new());

        let response = handler(state, get_request(Some("tiny"))).await.unwrap();
        assert_eq!(response.status(), 400);

        let json: serde_json::Value = serde_json::from_slice(response.body().as_ref()).unwrap();
        assert_eq!(json["error"], "No ICS urls configured for this calendar.");
    }

    #[tokio::test]
    async fn test_all_feeds_failing_is_server_error() {
        // Nothing listens on these ports, so both fetches fail fast.
        let state = state_with_feeds(vec![
            "http://127.0.0.1:1/a.ics".to_string(),
            "http://127.0.0.1:1/b.ics".to_string(),
        ]);

        let response = handler(state, get_request(Some("tiny"))).await.unwrap();
        assert_eq!(response.status(), 500);
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_good_feed() {
        let good_url = serve_ics_once().await;
        let state = state_with_feeds(vec![good_url, "http://127.0.0.1:1/bad.ics".to_string()]);

        let response = handler(state, get_request(Some("tiny"))).await.unwrap();
        assert_eq!(response.status(), 200);

        let json: serde_json::Value = serde_json::from_slice(response.body().as_ref()).unwrap();
        assert_eq!(json["which"], "tiny");
        assert_eq!(json["count"], 1);
        assert_eq!(json["events"][0]["summary"], "Reserved");
        assert_eq!(json["errors"].as_array().unwrap().len(), 1);
    }
}
