//! When is the next departure?
//!
//! A command-line tool printing the upcoming departures for one configured
//! stop, line and destination from the SL realtime API. Results are cached on
//! disk for a configurable window so that frequent invocations (shell prompt,
//! status bar) do not hit the rate-limited API every time.

pub mod app;
pub mod cache;
pub mod config;
pub mod domain;
pub mod present;
pub mod sl;
