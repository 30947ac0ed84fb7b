use chrono::{DateTime, Duration, Utc};

use crate::backend::TimeSlot;

/// Free slots of exactly `duration` between `range_start` and `range_end`.
///
/// Busy intervals are ordered by start (stable, so equal starts keep backend
/// order). A cursor starts at `range_start`; before each busy interval a slot
/// is emitted at the cursor if the gap reaches `duration`, then the cursor
/// moves to the interval's end. The cursor never moves backwards, which is
/// what absorbs overlapping and nested events. The gap after the last
/// interval is tested against `range_end`.
pub fn free_slots(
    range_start: DateTime<Utc>,
    range_end: DateTime<Utc>,
    mut busy: Vec<TimeSlot>,
    duration: Duration,
) -> Vec<TimeSlot> {
    busy.sort_by_key(|slot| slot.start);

    let mut slots = Vec::new();
    let mut cursor = range_start;

    for interval in &busy {
        if interval.start - cursor >= duration {
            slots.push(TimeSlot {
                start: cursor,
                end: cursor + duration,
            });
        }
        cursor = cursor.max(interval.end);
    }

    if range_end - cursor >= duration {
        slots.push(TimeSlot {
            start: cursor,
            end: cursor + duration,
        });
    }

    slots
}
