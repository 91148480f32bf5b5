//! tidyhome - declutter a home room by room, then keep it clean.
//!
//! This crate provides the core functionality for the `tidy` CLI tool.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap
//! - [`model`] - Data types (Room, DeclutterItem, CleaningTask, StateSnapshot)
//! - [`storage`] - SQLite database layer
//! - [`manager`] - Cached domain state over the database
//! - [`schedule`] - Due dates and streaks
//! - [`parse`] - Item-name parsing and autogrouping
//! - [`services`] - Reminders and photo files
//! - [`config`] - Configuration management
//! - [`error`] - Error types and handling

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod manager;
pub mod model;
pub mod parse;
pub mod report;
pub mod schedule;
pub mod services;
pub mod storage;
pub mod validate;

pub use error::{Error, Result};

/// Global silent mode flag for `--silent` output.
///
/// When set, create/mutate commands print only the ID instead of full
/// output. Avoids threading a `silent` bool through every handler signature.
pub static SILENT: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);

/// Global CSV output flag (set when `--format csv`).
pub static CSV_OUTPUT: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);

/// Check if silent mode is active.
#[inline]
pub fn is_silent() -> bool {
    SILENT.load(std::sync::atomic::Ordering::Relaxed)
}

/// Check if CSV output is requested.
#[inline]
pub fn is_csv() -> bool {
    CSV_OUTPUT.load(std::sync::atomic::Ordering::Relaxed)
}

/// Escape a value for CSV output (wrap in quotes if it contains commas, quotes, or newlines).
pub fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_escape() {
        assert_eq!(csv_escape("Kitchen"), "Kitchen");
        assert_eq!(csv_escape("Pots, pans"), "\"Pots, pans\"");
        assert_eq!(csv_escape("12\" ruler"), "\"12\"\" ruler\"");
    }
}
