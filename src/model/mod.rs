//! Data models for tidy.
//!
//! This module contains all domain models:
//! - Room
//! - DeclutterItem
//! - CleaningTask / CleaningLog
//! - StateSnapshot / SnapshotDelta
//! - DeclutterSummary
//! - RoomRecommendation

pub mod item;
pub mod recommend;
pub mod room;
pub mod snapshot;
pub mod summary;
pub mod task;

pub use item::{DeclutterItem, ItemCategory, ItemUpdate, NewItem, SortMode};
pub use recommend::{RoomRecommendation, recommend};
pub use room::{DEFAULT_ROOMS, Room, RoomIcon, RoomUpdate};
pub use snapshot::{SnapshotDelta, StateSnapshot, compute_delta, deltas};
pub use summary::{DailyCount, DeclutterSummary};
pub use task::{CleaningLog, CleaningTask, TaskFrequency, TaskUpdate};
