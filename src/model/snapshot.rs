//! Room state snapshots and the deltas between them.

use serde::{Deserialize, Serialize};

/// Point-in-time rollup of one room's item counts. Immutable once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub id: i64,
    pub room_id: i64,
    /// Moment the counts were taken (Unix milliseconds)
    pub snapshot_date: i64,
    pub total_items: i64,
    pub categorized_count: i64,
    pub keep_count: i64,
    pub donate_count: i64,
    pub trash_count: i64,
    pub sell_count: i64,
    pub furniture_count: i64,
    pub created_at: i64,
}

/// Field-wise difference between two snapshots of the same room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotDelta {
    pub from_id: i64,
    pub to_id: i64,
    pub from_date: i64,
    pub to_date: i64,
    pub items_delta: i64,
    pub categorized_delta: i64,
    pub keep_delta: i64,
    pub donate_delta: i64,
    pub trash_delta: i64,
    pub sell_delta: i64,
}

/// Difference `newer - older`, with no adjustment for elapsed time.
#[must_use]
pub fn compute_delta(older: &StateSnapshot, newer: &StateSnapshot) -> SnapshotDelta {
    SnapshotDelta {
        from_id: older.id,
        to_id: newer.id,
        from_date: older.snapshot_date,
        to_date: newer.snapshot_date,
        items_delta: newer.total_items - older.total_items,
        categorized_delta: newer.categorized_count - older.categorized_count,
        keep_delta: newer.keep_count - older.keep_count,
        donate_delta: newer.donate_count - older.donate_count,
        trash_delta: newer.trash_count - older.trash_count,
        sell_delta: newer.sell_count - older.sell_count,
    }
}

/// Deltas between each consecutive pair of a room's snapshots, oldest first.
#[must_use]
pub fn deltas(snapshots: &[StateSnapshot], room_id: i64) -> Vec<SnapshotDelta> {
    let mut history: Vec<&StateSnapshot> =
        snapshots.iter().filter(|s| s.room_id == room_id).collect();
    history.sort_by_key(|s| (s.snapshot_date, s.id));

    history
        .windows(2)
        .map(|pair| compute_delta(pair[0], pair[1]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(id: i64, room_id: i64, date: i64, total: i64, keep: i64) -> StateSnapshot {
        StateSnapshot {
            id,
            room_id,
            snapshot_date: date,
            total_items: total,
            categorized_count: keep,
            keep_count: keep,
            donate_count: 0,
            trash_count: 0,
            sell_count: 0,
            furniture_count: 0,
            created_at: date,
        }
    }

    #[test]
    fn test_compute_delta() {
        let older = snap(1, 1, 100, 10, 3);
        let newer = snap(2, 1, 200, 15, 5);
        let delta = compute_delta(&older, &newer);
        assert_eq!(delta.items_delta, 5);
        assert_eq!(delta.keep_delta, 2);
        assert_eq!(delta.categorized_delta, 2);
        assert_eq!(delta.trash_delta, 0);
        assert_eq!((delta.from_id, delta.to_id), (1, 2));
    }

    #[test]
    fn test_negative_delta() {
        let delta = compute_delta(&snap(1, 1, 0, 12, 4), &snap(2, 1, 1, 7, 4));
        assert_eq!(delta.items_delta, -5);
    }

    #[test]
    fn test_deltas_sorted_and_filtered_by_room() {
        let history = vec![
            snap(3, 1, 300, 20, 9),
            snap(1, 1, 100, 10, 3),
            snap(9, 2, 150, 99, 99),
            snap(2, 1, 200, 15, 5),
        ];
        let result = deltas(&history, 1);
        assert_eq!(result.len(), 2);
        assert_eq!((result[0].from_id, result[0].to_id), (1, 2));
        assert_eq!((result[1].from_id, result[1].to_id), (2, 3));
        assert_eq!(result[1].items_delta, 5);
        assert_eq!(result[1].keep_delta, 4);
    }

    #[test]
    fn test_deltas_need_two_snapshots() {
        assert!(deltas(&[], 1).is_empty());
        assert!(deltas(&[snap(1, 1, 0, 1, 1)], 1).is_empty());
    }
}
