//! CLI definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for list/query commands.
#[derive(ValueEnum, Clone, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table (default)
    #[default]
    Table,
    /// JSON (same as --json)
    Json,
    /// Comma-separated values
    Csv,
}

pub mod commands;

/// tidy - declutter your home room by room, then keep it clean
#[derive(Parser, Debug)]
#[command(name = "tidy", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Database path (default: ~/.tidyhome/data/tidy.db)
    #[arg(long, global = true, env = "TIDY_DB")]
    pub db: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Output format (table, json, csv)
    #[arg(long, value_enum, global = true, default_value_t)]
    pub format: OutputFormat,

    /// Output only the ID of created or changed records
    #[arg(long, global = true)]
    pub silent: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the database and the default rooms
    Init {
        /// Recreate the database file even if it exists
        #[arg(long)]
        force: bool,
    },

    /// Show version information
    Version,

    /// Rooms and their declutter state
    Room {
        #[command(subcommand)]
        command: RoomCommands,
    },

    /// Items being sorted into keep / donate / trash / sell
    Item {
        #[command(subcommand)]
        command: ItemCommands,
    },

    /// Recurring cleaning tasks
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },

    /// Whole-home declutter totals, streaks and recent completions
    Progress {
        /// Days of completion history to include
        #[arg(long, default_value = "30")]
        days: u32,
    },

    /// Point-in-time room counts and how they changed
    Snapshot {
        #[command(subcommand)]
        command: SnapshotCommands,
    },

    /// Suggest which room to declutter next
    Recommend,

    /// Plain-text status of every room
    Report,

    /// Plan daily reminders for the coming week
    Remind {
        /// Write the reminders as JSON to this file
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ============================================================================
// Room Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum RoomCommands {
    /// List rooms in display order
    List,

    /// Show one room with its counts
    Show {
        /// Room ID or name
        room: String,
    },

    /// Add a room
    Add {
        /// Room name
        name: String,

        /// Icon (kitchen, livingRoom, bedroom, bathroom, office, garage, ...)
        #[arg(long, short, default_value = "other")]
        icon: String,
    },

    /// Rename a room
    Rename {
        /// Room ID or name
        room: String,

        /// New name
        name: String,
    },

    /// Change a room's icon
    Icon {
        /// Room ID or name
        room: String,

        /// New icon
        icon: String,
    },

    /// Mark a room decluttered and seed its cleaning tasks
    Declutter {
        /// Room ID or name
        room: String,
    },

    /// Move a room to a new position (0-based)
    Move {
        /// Room ID or name
        room: String,

        /// Target position
        position: usize,
    },

    /// Delete a room with its items, tasks and history
    Delete {
        /// Room ID or name
        room: String,
    },
}

// ============================================================================
// Item Commands
// ============================================================================

/// How `item list` orders its rows.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ItemSort {
    /// Newest first
    #[default]
    Recent,
    /// By name, ignoring case
    Alphabetical,
    /// Manual order
    Custom,
}

#[derive(Args, Debug)]
pub struct ItemListArgs {
    /// Room ID or name
    pub room: String,

    /// Only items in this category
    #[arg(long, short)]
    pub category: Option<String>,

    /// Row order
    #[arg(long, value_enum, default_value_t)]
    pub sort: ItemSort,

    /// Show auto-group labels
    #[arg(long)]
    pub groups: bool,
}

#[derive(Args, Debug)]
pub struct ItemAddArgs {
    /// Room ID or name
    pub room: String,

    /// Item name
    pub name: String,

    /// Category (keep, donate, trash, sell)
    #[arg(long, short)]
    pub category: Option<String>,

    /// Mark as furniture (excluded from declutter progress)
    #[arg(long)]
    pub furniture: bool,

    /// Notes
    #[arg(long, short)]
    pub notes: Option<String>,

    /// Image file to attach
    #[arg(long)]
    pub photo: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ItemEditArgs {
    /// Item ID
    pub id: i64,

    /// New name
    #[arg(long)]
    pub name: Option<String>,

    /// New category
    #[arg(long, short)]
    pub category: Option<String>,

    /// New notes
    #[arg(long, short)]
    pub notes: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ItemCommands {
    /// List a room's items
    List(ItemListArgs),

    /// Add one item
    Add(ItemAddArgs),

    /// Add several items from a list ("a, b; c" or "a and b")
    Bulk {
        /// Room ID or name
        room: String,

        /// Item names
        text: String,
    },

    /// Add items from a text file
    Import {
        /// Room ID or name
        room: String,

        /// File with one item per line (or comma separated)
        file: PathBuf,
    },

    /// Add items read from stdin
    Paste {
        /// Room ID or name
        room: String,
    },

    /// Set the category of one or more items
    Categorize {
        /// Category (keep, donate, trash, sell, uncategorized)
        category: String,

        /// Item IDs
        #[arg(required = true)]
        ids: Vec<i64>,
    },

    /// Edit an item's name, category or notes
    Edit(ItemEditArgs),

    /// Toggle the furniture flag
    Furniture {
        /// Item ID
        id: i64,
    },

    /// Move an item to a position in its room's custom order (0-based)
    Move {
        /// Item ID
        id: i64,

        /// Target position
        position: usize,
    },

    /// Attach, replace or remove an item's photo
    Photo {
        /// Item ID
        id: i64,

        /// Image file (omit with --remove)
        #[arg(required_unless_present = "remove")]
        file: Option<PathBuf>,

        /// Remove the current photo
        #[arg(long, conflicts_with = "file")]
        remove: bool,
    },

    /// Delete items
    Delete {
        /// Item IDs
        #[arg(required = true)]
        ids: Vec<i64>,
    },

    /// Group a room's items by shared words
    Autogroup {
        /// Room ID or name
        room: String,

        /// Remove the groups instead
        #[arg(long)]
        clear: bool,
    },
}

// ============================================================================
// Task Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// List tasks due today (or a room's tasks)
    List {
        /// Room ID or name
        #[arg(long, short)]
        room: Option<String>,

        /// Include tasks that are not due
        #[arg(long, short)]
        all: bool,
    },

    /// Add a cleaning task to a room
    Add {
        /// Room ID or name
        room: String,

        /// Task name
        name: String,

        /// Frequency (daily, weekly, monthly)
        #[arg(long, short, default_value = "weekly")]
        frequency: String,
    },

    /// Edit a task
    Edit {
        /// Task ID
        id: i64,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New frequency
        #[arg(long, short)]
        frequency: Option<String>,

        /// Pause the task
        #[arg(long, conflicts_with = "resume")]
        pause: bool,

        /// Resume a paused task
        #[arg(long)]
        resume: bool,
    },

    /// Log a completion now
    Complete {
        /// Task IDs
        #[arg(required = true)]
        ids: Vec<i64>,
    },

    /// Show a task's completion history
    Logs {
        /// Task ID
        id: i64,

        /// Maximum entries
        #[arg(long, short, default_value = "30")]
        limit: usize,
    },

    /// Delete a task and its history
    Delete {
        /// Task IDs
        #[arg(required = true)]
        ids: Vec<i64>,
    },
}

// ============================================================================
// Snapshot Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum SnapshotCommands {
    /// Record a room's current counts
    Take {
        /// Room ID or name
        room: String,
    },

    /// List snapshots (all rooms, or one)
    List {
        /// Room ID or name
        #[arg(long, short)]
        room: Option<String>,
    },

    /// Show how a room changed between consecutive snapshots
    Deltas {
        /// Room ID or name
        room: String,
    },
}
