//! Shared library for the booking calendar Lambda functions.
//!
//! This crate provides the configuration, models, feed handling, and event
//! normalization used by the bookings endpoint.

pub mod config;
pub mod error;
pub mod feed;
pub mod http;
pub mod models;
pub mod normalize;

pub use config::{CalendarConfig, CalendarGroup, DisplayMode};
pub use error::{Error, Result};
pub use feed::FeedClient;
pub use models::{
    BookingsResponse, DayType, EventItem, FeedError, MergedRange, NormalizedEvent, RawEvent,
};
