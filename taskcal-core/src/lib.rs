//! Core types for taskcal.
//!
//! This crate provides the pieces shared by the `taskcal` CLI and
//! `taskcal-server`:
//! - `date` for turning loose date strings into iCalendar `DATE` values
//! - `ics` for building and reading all-day event calendars
//! - `csv_feed` for converting sectioned CSV deadline lists
//! - `cache` for the time-boxed calendar cache used by the feed service

pub mod cache;
pub mod csv_feed;
pub mod date;
pub mod error;
pub mod ics;

pub use error::{FeedError, FeedResult};
