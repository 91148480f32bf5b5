//! Error types for the tidy CLI.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (2=db, 3=not_found, 4=validation, etc.)
//! - Context-aware recovery hints
//! - Structured JSON output for piped / non-TTY consumers

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for tidy operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
///
/// Each code maps to a SCREAMING_SNAKE string and a category-based
/// exit code. Scripts match on the string or the exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Database (exit 2)
    NotInitialized,
    AlreadyInitialized,
    DatabaseError,

    // Not Found (exit 3)
    RoomNotFound,
    ItemNotFound,
    TaskNotFound,

    // Validation (exit 4)
    InvalidCategory,
    InvalidFrequency,
    InvalidIcon,
    InvalidArgument,

    // Import (exit 6)
    ImportError,

    // Config (exit 7)
    ConfigError,

    // I/O (exit 8)
    IoError,
    JsonError,
    PhotoError,

    // Internal (exit 1)
    InternalError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::NotInitialized => "NOT_INITIALIZED",
            Self::AlreadyInitialized => "ALREADY_INITIALIZED",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::RoomNotFound => "ROOM_NOT_FOUND",
            Self::ItemNotFound => "ITEM_NOT_FOUND",
            Self::TaskNotFound => "TASK_NOT_FOUND",
            Self::InvalidCategory => "INVALID_CATEGORY",
            Self::InvalidFrequency => "INVALID_FREQUENCY",
            Self::InvalidIcon => "INVALID_ICON",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::ImportError => "IMPORT_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::PhotoError => "PHOTO_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Category-based exit code (1-8).
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InternalError => 1,
            Self::NotInitialized | Self::AlreadyInitialized | Self::DatabaseError => 2,
            Self::RoomNotFound | Self::ItemNotFound | Self::TaskNotFound => 3,
            Self::InvalidCategory
            | Self::InvalidFrequency
            | Self::InvalidIcon
            | Self::InvalidArgument => 4,
            Self::ImportError => 6,
            Self::ConfigError => 7,
            Self::IoError | Self::JsonError | Self::PhotoError => 8,
        }
    }

    /// Whether retrying with corrected input can succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::InvalidCategory
                | Self::InvalidFrequency
                | Self::InvalidIcon
                | Self::InvalidArgument
                | Self::DatabaseError
        )
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur in tidy operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Not initialized: run `tidy init` first")]
    NotInitialized,

    #[error("Already initialized at {path}")]
    AlreadyInitialized { path: PathBuf },

    #[error("Room not found: {room}")]
    RoomNotFound { room: String, similar: Vec<String> },

    #[error("Item not found: {id}")]
    ItemNotFound { id: i64 },

    #[error("Task not found: {id}")]
    TaskNotFound { id: i64 },

    #[error("Invalid category: {value}")]
    InvalidCategory {
        value: String,
        suggestion: Option<String>,
    },

    #[error("Invalid frequency: {value}")]
    InvalidFrequency {
        value: String,
        suggestion: Option<String>,
    },

    #[error("Invalid room icon: {value}")]
    InvalidIcon {
        value: String,
        suggestion: Option<String>,
    },

    /// User-facing import failure (empty file, unreadable file, nothing parsed).
    #[error("{0}")]
    Import(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Photo error: {0}")]
    Photo(#[from] image::ImageError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::NotInitialized => ErrorCode::NotInitialized,
            Self::AlreadyInitialized { .. } => ErrorCode::AlreadyInitialized,
            Self::Database(_) => ErrorCode::DatabaseError,
            Self::RoomNotFound { .. } => ErrorCode::RoomNotFound,
            Self::ItemNotFound { .. } => ErrorCode::ItemNotFound,
            Self::TaskNotFound { .. } => ErrorCode::TaskNotFound,
            Self::InvalidCategory { .. } => ErrorCode::InvalidCategory,
            Self::InvalidFrequency { .. } => ErrorCode::InvalidFrequency,
            Self::InvalidIcon { .. } => ErrorCode::InvalidIcon,
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::Import(_) => ErrorCode::ImportError,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::JsonError,
            Self::Photo(_) => ErrorCode::PhotoError,
            Self::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// Context-aware recovery hint.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::NotInitialized => {
                Some("Run `tidy init` to create the database and default rooms".to_string())
            }

            Self::AlreadyInitialized { path } => Some(format!(
                "Database already exists at {}. Use `--force` to reinitialize.",
                path.display()
            )),

            Self::RoomNotFound { similar, .. } if !similar.is_empty() => Some(format!(
                "Did you mean: {}?\n  Use `tidy room list` to see available rooms.",
                similar.join(", ")
            )),
            Self::RoomNotFound { room, .. } => Some(format!(
                "No room with ID or name '{room}'. Use `tidy room list` to see available rooms."
            )),
            Self::ItemNotFound { id } => Some(format!(
                "No item with ID {id}. Use `tidy item list <room>` to see a room's items."
            )),
            Self::TaskNotFound { id } => Some(format!(
                "No task with ID {id}. Use `tidy task list` to see active tasks."
            )),

            Self::InvalidCategory { suggestion, .. } => Some(with_suggestion(
                suggestion.as_deref(),
                "Valid categories: uncategorized, keep, donate, trash, sell. \
                 Synonyms: toss→trash, give→donate, stay→keep",
            )),
            Self::InvalidFrequency { suggestion, .. } => Some(with_suggestion(
                suggestion.as_deref(),
                "Valid frequencies: daily, weekly, monthly. Synonyms: day, week, month",
            )),
            Self::InvalidIcon { suggestion, .. } => Some(with_suggestion(
                suggestion.as_deref(),
                "Valid icons: kitchen, livingRoom, bedroom, bathroom, office, garage, \
                 basement, attic, diningRoom, laundry, closet, other",
            )),

            Self::Import(_) => Some(
                "Put one item per line, or separate names with commas or semicolons".to_string(),
            ),

            Self::Database(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Photo(_)
            | Self::InvalidArgument(_)
            | Self::Config(_)
            | Self::Other(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
                "retryable": code.is_retryable(),
                "exit_code": code.exit_code(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}

fn with_suggestion(suggestion: Option<&str>, valid: &str) -> String {
    match suggestion {
        Some(s) => format!("Did you mean: {s}?\n  {valid}"),
        None => valid.to_string(),
    }
}
