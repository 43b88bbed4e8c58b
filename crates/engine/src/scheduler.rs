//! The deferred-action scheduler.
//!
//! A min-heap of serializable actions keyed on in-game due time, with
//! insertion order breaking ties. A deferred's action is a name looked
//! up in the driver's action registry when it fires; storing names
//! instead of function pointers keeps the heap serializable for
//! savegames, and lets scheduling fail early for unknown actions.
//!
//! The heap is guarded by a mutex because asynchronous senders (I/O
//! adapter tasks) may schedule work while the driver loop owns the
//! rest of the state.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use storyloom_domain::{GameClock, ItemId, LivingId, LocationId};

/// Who owns a deferred action: a persisted world entity, or an engine
/// module (serialized as "module:<name>").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeferredOwner {
    Living(LivingId),
    Item(ItemId),
    Location(LocationId),
    Module(String),
}

impl std::fmt::Display for DeferredOwner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeferredOwner::Living(id) => write!(f, "living:{}", id),
            DeferredOwner::Item(id) => write!(f, "item:{}", id),
            DeferredOwner::Location(id) => write!(f, "location:{}", id),
            DeferredOwner::Module(name) => write!(f, "module:{}", name),
        }
    }
}

/// A callable action scheduled for a future game time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deferred {
    /// Due time, in game time.
    pub due: DateTime<Utc>,
    /// Insertion sequence; orders deferreds with the same due time.
    pub sequence: u64,
    pub owner: DeferredOwner,
    /// Action name, resolved in the action registry at fire time.
    pub action: String,
    pub args: Vec<String>,
    /// Real-time seconds between repeats; periodic deferreds
    /// reschedule themselves after firing.
    pub periodical: Option<f64>,
}

impl Deferred {
    /// How long until this deferred is due, in game time (or real
    /// time when `realtime` is set).
    pub fn when_due(&self, clock: &GameClock, realtime: bool) -> Duration {
        let game_delta = self.due - clock.clock();
        if realtime && clock.times_realtime() > 0 {
            game_delta / clock.times_realtime() as i32
        } else {
            game_delta
        }
    }
}

// the repeat interval never holds a NaN, so equality is total
impl Eq for Deferred {}

impl Ord for Deferred {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due
            .cmp(&other.due)
            .then(self.sequence.cmp(&other.sequence))
    }
}

impl PartialOrd for Deferred {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Default)]
struct SchedulerInner {
    heap: BinaryHeap<std::cmp::Reverse<Deferred>>,
    sequence: u64,
}

/// The deferred heap. Push/pop/remove are mutex-guarded.
#[derive(Default)]
pub struct Scheduler {
    inner: Mutex<SchedulerInner>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule an action at an absolute game time.
    pub fn defer_at(
        &self,
        due: DateTime<Utc>,
        owner: DeferredOwner,
        action: impl Into<String>,
        args: Vec<String>,
    ) {
        self.push(Deferred {
            due,
            sequence: 0,
            owner,
            action: action.into(),
            args,
            periodical: None,
        });
    }

    /// Schedule an action a number of real-time seconds from now; the
    /// clock's factor converts it to a game-time due.
    pub fn defer_secs(
        &self,
        clock: &GameClock,
        seconds: f64,
        owner: DeferredOwner,
        action: impl Into<String>,
        args: Vec<String>,
    ) {
        let due = clock.plus_realtime(Duration::milliseconds((seconds * 1000.0) as i64));
        self.push(Deferred {
            due,
            sequence: 0,
            owner,
            action: action.into(),
            args,
            periodical: None,
        });
    }

    /// Schedule a periodic action; it reschedules itself every
    /// `seconds` (real time) after firing.
    pub fn defer_periodical(
        &self,
        clock: &GameClock,
        seconds: f64,
        owner: DeferredOwner,
        action: impl Into<String>,
        args: Vec<String>,
    ) {
        let due = clock.plus_realtime(Duration::milliseconds((seconds * 1000.0) as i64));
        self.push(Deferred {
            due,
            sequence: 0,
            owner,
            action: action.into(),
            args,
            periodical: Some(seconds),
        });
    }

    pub fn push(&self, mut deferred: Deferred) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        deferred.sequence = inner.sequence;
        inner.sequence += 1;
        inner.heap.push(std::cmp::Reverse(deferred));
    }

    /// Pop every deferred due at or before `now`, in (due, insertion)
    /// order.
    pub fn pop_due(&self, now: DateTime<Utc>) -> Vec<Deferred> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let mut due = Vec::new();
        loop {
            let head_is_due = inner
                .heap
                .peek()
                .map(|std::cmp::Reverse(head)| head.due <= now)
                .unwrap_or(false);
            if !head_is_due {
                break;
            }
            if let Some(std::cmp::Reverse(deferred)) = inner.heap.pop() {
                due.push(deferred);
            }
        }
        due
    }

    /// Drop every deferred belonging to the owner (a destroyed entity).
    pub fn remove_for_owner(&self, owner: &DeferredOwner) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let kept: Vec<std::cmp::Reverse<Deferred>> = inner
            .heap
            .drain()
            .filter(|std::cmp::Reverse(d)| &d.owner != owner)
            .collect();
        inner.heap = kept.into_iter().collect();
    }

    pub fn len(&self) -> usize {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All pending deferreds in firing order, for savegames and the
    /// server status display.
    pub fn snapshot(&self) -> Vec<Deferred> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let mut all: Vec<Deferred> = inner
            .heap
            .iter()
            .map(|std::cmp::Reverse(d)| d.clone())
            .collect();
        all.sort();
        all
    }

    /// Replace the heap contents (savegame load).
    pub fn restore(&self, deferreds: Vec<Deferred>) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.sequence = deferreds.iter().map(|d| d.sequence + 1).max().unwrap_or(0);
        inner.heap = deferreds.into_iter().map(std::cmp::Reverse).collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn clock() -> GameClock {
        GameClock::new(Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(), 1)
    }

    fn owner() -> DeferredOwner {
        DeferredOwner::Module("test".to_string())
    }

    #[test]
    fn due_order_with_insertion_tiebreak() {
        let scheduler = Scheduler::new();
        let clock = clock();
        let t = clock.clock();
        scheduler.defer_at(t + Duration::seconds(10), owner(), "a", vec![]);
        scheduler.defer_at(t + Duration::seconds(5), owner(), "b", vec![]);
        scheduler.defer_at(t + Duration::seconds(5), owner(), "c", vec![]);
        // advance to T+5: b then c fire, in insertion order; a stays
        let due = scheduler.pop_due(t + Duration::seconds(5));
        let names: Vec<&str> = due.iter().map(|d| d.action.as_str()).collect();
        assert_eq!(names, vec!["b", "c"]);
        assert_eq!(scheduler.len(), 1);
        // advance to T+10: a fires
        let due = scheduler.pop_due(t + Duration::seconds(10));
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].action, "a");
        assert!(scheduler.is_empty());
    }

    #[test]
    fn deferred_due_exactly_now_fires() {
        let scheduler = Scheduler::new();
        let t = clock().clock();
        scheduler.defer_at(t, owner(), "now", vec![]);
        assert_eq!(scheduler.pop_due(t).len(), 1);
    }

    #[test]
    fn realtime_seconds_use_the_clock_factor() {
        let scheduler = Scheduler::new();
        let fast = GameClock::new(clock().clock(), 5);
        scheduler.defer_secs(&fast, 10.0, owner(), "later", vec![]);
        let snapshot = scheduler.snapshot();
        assert_eq!(snapshot[0].due, fast.clock() + Duration::seconds(50));
        assert_eq!(snapshot[0].when_due(&fast, true), Duration::seconds(10));
        assert_eq!(snapshot[0].when_due(&fast, false), Duration::seconds(50));
    }

    #[test]
    fn remove_for_owner_only_touches_that_owner() {
        let scheduler = Scheduler::new();
        let t = clock().clock();
        scheduler.defer_at(t, DeferredOwner::Module("keep".into()), "a", vec![]);
        scheduler.defer_at(t, DeferredOwner::Module("drop".into()), "b", vec![]);
        scheduler.remove_for_owner(&DeferredOwner::Module("drop".into()));
        let snapshot = scheduler.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].action, "a");
    }

    #[test]
    fn snapshot_restore_round_trip() {
        let scheduler = Scheduler::new();
        let t = clock().clock();
        scheduler.defer_at(t + Duration::seconds(3), owner(), "x", vec!["arg".into()]);
        scheduler.defer_at(t + Duration::seconds(1), owner(), "y", vec![]);
        let snapshot = scheduler.snapshot();
        let json = serde_json::to_string(&snapshot).unwrap();
        let restored: Vec<Deferred> = serde_json::from_str(&json).unwrap();
        let other = Scheduler::new();
        other.restore(restored);
        assert_eq!(other.snapshot(), snapshot);
    }
}
