//! `credit-risk` library crate.
//!
//! The binary (`crisk`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the scoring engine and analytics can back other front-ends
//! - code stays easy to navigate as the project grows

pub mod analytics;
pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod features;
pub mod logging;
pub mod models;
pub mod plot;
pub mod report;
pub mod scoring;
pub mod tui;
