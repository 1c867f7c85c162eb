use std::time::{Duration, Instant};

/// One 60Hz tick.
pub const TICK: Duration = Duration::from_micros(16_600);

/// Source of monotonic time, so the timers can be driven without real delays.
pub trait Clock {
    fn now(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// The delay and sound counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timers {
    pub delay: u8,
    pub sound: u8,
    pub last_update: Instant,
}

impl Timers {
    pub fn new(now: Instant) -> Timers {
        Timers {
            delay: 0,
            sound: 0,
            last_update: now,
        }
    }

    /// Counts both timers down by one if a full tick has passed since the last
    /// decrement. Never goes below zero and never decrements more than once per
    /// call, however long it has been.
    pub fn advance(self, now: Instant) -> Timers {
        if now.saturating_duration_since(self.last_update) < TICK {
            return self;
        }
        Timers {
            delay: self.delay.saturating_sub(1),
            sound: self.sound.saturating_sub(1),
            last_update: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(now: Instant) -> Timers {
        Timers {
            delay: 3,
            sound: 1,
            ..Timers::new(now)
        }
    }

    #[test]
    fn no_change_inside_a_tick() {
        let start = Instant::now();
        let t = loaded(start);
        assert_eq!(t.advance(start + Duration::from_millis(16)), t);
        assert_eq!(t.advance(start), t);
    }

    #[test]
    fn one_decrement_per_tick() {
        let start = Instant::now();
        let t = loaded(start).advance(start + TICK);
        assert_eq!((t.delay, t.sound), (2, 0));
        assert_eq!(t.last_update, start + TICK);

        let t = t.advance(start + TICK * 2);
        assert_eq!((t.delay, t.sound), (1, 0));
    }

    #[test]
    fn long_gap_still_decrements_once() {
        let start = Instant::now();
        let t = loaded(start).advance(start + Duration::from_secs(1));
        assert_eq!((t.delay, t.sound), (2, 0));
    }

    #[test]
    fn cadence_measured_from_last_decrement() {
        let start = Instant::now();
        let t = loaded(start).advance(start + TICK);
        let t = t.advance(start + TICK + Duration::from_millis(10));
        assert_eq!(t.delay, 2);
    }

    #[test]
    fn clock_is_monotonic() {
        let clock = SystemClock;
        let a = clock.now();
        assert!(clock.now() >= a);
    }
}
