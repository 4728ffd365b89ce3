use crate::Timestamp;

/// The single authority for "now" during a simulation run
///
/// Every engine owns its own clock, so independent runs never observe each
/// other's time.
#[derive(Debug, Default)]
pub struct Clock {
    tick: Timestamp,
}

impl Clock {
    pub fn new() -> Clock {
        Clock::default()
    }

    /// Moves time forward by one tick
    pub fn advance(&mut self) {
        self.tick = self.tick + 1;
    }

    /// Jumps straight to `tick`, which must not be in the past
    pub fn advance_to(&mut self, tick: Timestamp) {
        assert!(tick >= self.tick, "clock cannot move back from {} to {tick}", self.tick);
        self.tick = tick;
    }

    pub fn value(&self) -> Timestamp {
        self.tick
    }

    pub fn reset(&mut self) {
        self.tick = Timestamp::new(0);
    }
}
