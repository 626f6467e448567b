//! Configuration for the booking calendar Lambda functions.
//!
//! Feed URLs are read from the environment once at startup and carried in an
//! explicit [`CalendarConfig`] value rather than consulted ad hoc.

use std::env;
use std::str::FromStr;

use crate::error::Error;

/// A bookable unit with its own set of upstream calendar feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarGroup {
    Tiny,
    Studio,
}

impl CalendarGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            CalendarGroup::Tiny => "tiny",
            CalendarGroup::Studio => "studio",
        }
    }
}

impl FromStr for CalendarGroup {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("tiny") {
            Ok(CalendarGroup::Tiny)
        } else if s.eq_ignore_ascii_case("studio") {
            Ok(CalendarGroup::Studio)
        } else {
            Err(Error::Config(format!("Unknown calendar group: {:?}", s)))
        }
    }
}

/// How events are presented to the widget.
///
/// `Itemized` keeps one annotated entry per booking; `Merged` coalesces
/// overlapping stays into anonymous occupied ranges. The two views never
/// coexist in one deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    #[default]
    Itemized,
    Merged,
}

/// Feed configuration, normally loaded from environment variables.
#[derive(Debug, Clone, Default)]
pub struct CalendarConfig {
    /// Feed URLs for the "tiny" unit
    pub tiny_feeds: Vec<String>,
    /// Feed URLs for the "studio" unit
    pub studio_feeds: Vec<String>,
    /// Selected presentation variant
    pub display_mode: DisplayMode,
}

impl CalendarConfig {
    /// Load configuration from environment variables.
    ///
    /// Absent or blank variables mean "no feed for this source"; a group with
    /// zero feeds is rejected at request time, not at startup.
    pub fn from_env() -> Self {
        Self {
            tiny_feeds: feeds_from(&["TINY_AIRBNB_ICAL", "TINY_BOOKING_ICAL"]),
            studio_feeds: feeds_from(&["STUDIO_AIRBNB_ICAL", "STUDIO_BOOKING_ICAL"]),
            display_mode: display_mode_from_env(),
        }
    }

    /// The usable feed URLs for a group.
    pub fn feeds_for(&self, group: CalendarGroup) -> &[String] {
        match group {
            CalendarGroup::Tiny => &self.tiny_feeds,
            CalendarGroup::Studio => &self.studio_feeds,
        }
    }
}

fn feeds_from(vars: &[&str]) -> Vec<String> {
    vars.iter()
        .filter_map(|var| env::var(var).ok())
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .collect()
}

fn display_mode_from_env() -> DisplayMode {
    match env::var("CALENDAR_VIEW") {
        Ok(value) if value.eq_ignore_ascii_case("merged") => DisplayMode::Merged,
        _ => DisplayMode::Itemized,
    }
}
