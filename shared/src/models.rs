//! Shared data models.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A booking event as extracted from an upstream iCalendar feed.
///
/// Start and end form a half-open interval `[start, end)`; the end is the
/// checkout date as exported by the provider.
#[derive(Debug, Clone)]
pub struct RawEvent {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub summary: Option<String>,
    pub location: Option<String>,
    /// URL of the feed the event came from
    pub source: String,
}

/// UI classification of a stay boundary day.
///
/// Arrival and departure days are only partially occupied and can be shared
/// with an adjacent booking; full days block the whole cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DayType {
    Arrival,
    Departure,
    Full,
}

/// A booking ready for display on the calendar widget.
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedEvent {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub summary: String,
    pub color: String,
    pub source: String,
    #[serde(rename = "dayType", skip_serializing_if = "Option::is_none")]
    pub day_type: Option<DayType>,
    #[serde(rename = "endDayType", skip_serializing_if = "Option::is_none")]
    pub end_day_type: Option<DayType>,
}

/// A coalesced occupied range (merged display mode). Carries no per-booking
/// metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergedRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Per-feed failure reported alongside a partial result.
#[derive(Debug, Clone, Serialize)]
pub struct FeedError {
    pub url: String,
    pub error: String,
}

/// One entry in the `events` array; the shape depends on the display mode.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum EventItem {
    Booking(NormalizedEvent),
    Range(MergedRange),
}

/// Response body for the bookings endpoint.
#[derive(Debug, Serialize)]
pub struct BookingsResponse {
    pub which: String,
    pub count: usize,
    pub events: Vec<EventItem>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FeedError>,
}
