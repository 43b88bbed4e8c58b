use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// The simulated game clock.
///
/// `times_realtime` is how much faster game time runs than real time.
/// The internal clock always tracks game time; the `*_realtime`
/// methods convert a real-time delta through the factor. A factor of
/// zero freezes the clock for real-time deltas (useful for stories
/// that only advance time explicitly).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameClock {
    clock: DateTime<Utc>,
    times_realtime: u32,
}

impl GameClock {
    pub fn new(epoch: DateTime<Utc>, times_realtime: u32) -> Self {
        Self {
            clock: epoch,
            times_realtime,
        }
    }

    pub fn clock(&self) -> DateTime<Utc> {
        self.clock
    }

    pub fn times_realtime(&self) -> u32 {
        self.times_realtime
    }

    /// Advance the clock by a delta expressed in game time.
    pub fn add_gametime(&mut self, delta: Duration) {
        self.clock += delta;
    }

    /// Rewind the clock by a delta expressed in game time.
    pub fn sub_gametime(&mut self, delta: Duration) {
        self.clock -= delta;
    }

    /// Advance the clock by a delta expressed in real time.
    pub fn add_realtime(&mut self, delta: Duration) {
        self.clock += delta * self.times_realtime as i32;
    }

    /// The clock plus a real-time delta, without advancing.
    pub fn plus_realtime(&self, delta: Duration) -> DateTime<Utc> {
        self.clock + delta * self.times_realtime as i32
    }

    /// The clock minus a real-time delta, without rewinding.
    pub fn minus_realtime(&self, delta: Duration) -> DateTime<Utc> {
        self.clock - delta * self.times_realtime as i32
    }
}

impl std::fmt::Display for GameClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.clock.format("%Y-%m-%d %H:%M:%S"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn epoch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 2, 9, 0, 0).unwrap()
    }

    #[test]
    fn realtime_is_scaled_by_the_factor() {
        let mut clock = GameClock::new(epoch(), 5);
        clock.add_realtime(Duration::seconds(10));
        assert_eq!(clock.clock(), epoch() + Duration::seconds(50));
        assert_eq!(
            clock.plus_realtime(Duration::seconds(2)),
            clock.clock() + Duration::seconds(10)
        );
    }

    #[test]
    fn gametime_is_applied_unscaled() {
        let mut clock = GameClock::new(epoch(), 5);
        clock.add_gametime(Duration::minutes(1));
        assert_eq!(clock.clock(), epoch() + Duration::minutes(1));
        clock.sub_gametime(Duration::minutes(1));
        assert_eq!(clock.clock(), epoch());
    }

    #[test]
    fn zero_factor_freezes_realtime_advance() {
        let mut clock = GameClock::new(epoch(), 0);
        clock.add_realtime(Duration::hours(3));
        assert_eq!(clock.clock(), epoch());
    }

    #[test]
    fn snapshot_round_trip() {
        let clock = GameClock::new(epoch(), 2);
        let json = serde_json::to_string(&clock).unwrap();
        let restored: GameClock = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, clock);
    }
}
