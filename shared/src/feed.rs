//! Fetching and parsing of upstream iCalendar feeds.

use std::io::BufReader;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use ical::parser::ical::component::IcalEvent;
use ical::IcalParser;
use tracing::warn;

use crate::error::{Error, Result};
use crate::models::RawEvent;

/// Per-feed request timeout, bounding total request latency when an upstream
/// provider is slow or unresponsive.
const FEED_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for upstream calendar feeds.
pub struct FeedClient {
    http_client: reqwest::Client,
}

impl FeedClient {
    pub fn new() -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(FEED_TIMEOUT)
            .user_agent(concat!("booking-calendar/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http_client })
    }

    /// Fetch one feed and extract its booking events.
    pub async fn fetch_events(&self, url: &str) -> Result<Vec<RawEvent>> {
        let response = self.http_client.get(url).send().await.map_err(|e| {
            Error::Feed {
                url: url.to_string(),
                message: format!("Request failed: {}", e),
            }
        })?;

        if !response.status().is_success() {
            return Err(Error::Feed {
                url: url.to_string(),
                message: format!("Upstream returned {}", response.status()),
            });
        }

        let body = response.text().await.map_err(|e| Error::Feed {
            url: url.to_string(),
            message: format!("Failed to read body: {}", e),
        })?;

        parse_ics(body.as_bytes(), url)
    }
}

/// Parse an iCalendar document, keeping only VEVENT components.
///
/// Events without both a parsable start and end are skipped with a warning;
/// only a malformed document as a whole is an error.
pub fn parse_ics(ics: &[u8], source: &str) -> Result<Vec<RawEvent>> {
    let reader = BufReader::new(ics);
    let mut events = Vec::new();

    for calendar in IcalParser::new(reader) {
        let calendar = calendar.map_err(|e| Error::Feed {
            url: source.to_string(),
            message: format!("Invalid iCalendar data: {}", e),
        })?;

        for event in &calendar.events {
            match raw_event(event, source) {
                Some(raw) => events.push(raw),
                None => warn!(source, "Skipping event without parsable start/end"),
            }
        }
    }

    Ok(events)
}

fn raw_event(event: &IcalEvent, source: &str) -> Option<RawEvent> {
    let start = property_value(event, "DTSTART").and_then(parse_timestamp)?;
    let end = property_value(event, "DTEND").and_then(parse_timestamp)?;

    Some(RawEvent {
        start,
        end,
        summary: property_value(event, "SUMMARY").map(str::to_string),
        location: property_value(event, "LOCATION").map(str::to_string),
        source: source.to_string(),
    })
}

fn property_value<'a>(event: &'a IcalEvent, name: &str) -> Option<&'a str> {
    event
        .properties
        .iter()
        .find(|p| p.name == name)
        .and_then(|p| p.value.as_deref())
}

/// Parse the timestamp forms seen in booking feeds: UTC datetime, floating
/// datetime (taken as UTC), and all-day date (midnight UTC).
fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%SZ") {
        return Some(DateTime::from_naive_utc_and_offset(dt, Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y%m%dT%H%M%S") {
        return Some(DateTime::from_naive_utc_and_offset(dt, Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y%m%d") {
        let midnight = date.and_hms_opt(0, 0, 0)?;
        return Some(DateTime::from_naive_utc_and_offset(midnight, Utc));
    }
    None
}
