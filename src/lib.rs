//! Daily prayer times, fetched once per city and day and cached in SQLite.
//!
//! The library half of the `prayer-times` binary, exposed for integration tests.

pub mod cli;
pub mod config;
pub mod db;
pub mod models;
pub mod timings;
pub mod utils;
