//! Booking event normalization: colors, day types, sorting, merging.

use chrono::{DateTime, Duration, Utc};

use crate::config::DisplayMode;
use crate::models::{DayType, EventItem, MergedRange, NormalizedEvent, RawEvent};

/// Shown when a feed carries no summary; Airbnb and Booking.com both strip
/// guest details from exported calendars.
pub const DEFAULT_SUMMARY: &str = "Réservé";

const AIRBNB_COLOR: &str = "#e74c3c";
const BOOKING_COLOR: &str = "#2980b9";
const DEFAULT_COLOR: &str = "#7f8c8d";

/// Which boundary of a stay a classification applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    Start,
    End,
}

/// Display color for a feed, keyed on provider markers in its URL.
pub fn color_for_source(source: &str) -> &'static str {
    let lower = source.to_ascii_lowercase();
    if lower.contains("airbnb") {
        AIRBNB_COLOR
    } else if lower.contains("booking") {
        BOOKING_COLOR
    } else {
        DEFAULT_COLOR
    }
}

/// Classify a stay boundary for half-day cell rendering.
///
/// Stays of one night or fewer block their days entirely. Longer stays have
/// an arrival day and a departure day, each shareable with an adjacent
/// booking.
pub fn day_type(start: DateTime<Utc>, end: DateTime<Utc>, boundary: Boundary) -> DayType {
    if end - start <= Duration::days(1) {
        return DayType::Full;
    }
    match boundary {
        Boundary::Start => DayType::Arrival,
        Boundary::End => DayType::Departure,
    }
}

/// Annotate raw feed events for display.
///
/// Events violating `start <= end` are dropped. The feed's end value is kept
/// as-is: providers export the checkout date, which already matches the
/// half-open convention of calendar-display libraries.
pub fn normalize_events(raw: Vec<RawEvent>) -> Vec<NormalizedEvent> {
    raw.into_iter()
        .filter(|ev| ev.start <= ev.end)
        .map(|ev| {
            let start_type = day_type(ev.start, ev.end, Boundary::Start);
            let end_type = day_type(ev.start, ev.end, Boundary::End);

            NormalizedEvent {
                start: ev.start,
                end: ev.end,
                summary: ev
                    .summary
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_SUMMARY.to_string()),
                color: color_for_source(&ev.source).to_string(),
                source: ev.source,
                day_type: Some(start_type),
                end_day_type: Some(end_type),
            }
        })
        .collect()
}

/// Sort bookings ascending by start; ties keep input order.
pub fn sort_events(events: &mut [NormalizedEvent]) {
    events.sort_by_key(|ev| ev.start);
}

/// Coalesce overlapping or touching bookings into occupied ranges.
///
/// Input must already be sorted by start. Two bookings merge when the later
/// start is not past the running end; the merged end is the later of the two.
pub fn merge_ranges(events: &[NormalizedEvent]) -> Vec<MergedRange> {
    let mut merged: Vec<MergedRange> = Vec::new();

    for ev in events {
        match merged.last_mut() {
            Some(last) if ev.start <= last.end => {
                if ev.end > last.end {
                    last.end = ev.end;
                }
            }
            _ => merged.push(MergedRange {
                start: ev.start,
                end: ev.end,
            }),
        }
    }

    merged
}

/// Produce the `events` payload for the configured display mode.
pub fn display_events(mut events: Vec<NormalizedEvent>, mode: DisplayMode) -> Vec<EventItem> {
    sort_events(&mut events);

    match mode {
        DisplayMode::Itemized => events.into_iter().map(EventItem::Booking).collect(),
        DisplayMode::Merged => merge_ranges(&events)
            .into_iter()
            .map(EventItem::Range)
            .collect(),
    }
}
