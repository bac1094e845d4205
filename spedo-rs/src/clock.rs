/// Converts a free-running microsecond clock into whole 1 ms ticks.
///
/// The main loop wakes roughly once per millisecond, but any iteration can
/// overrun (a flash write, a slow pin read). [`TickClock::due_ticks()`]
/// reports every millisecond that has passed since the previous call and
/// keeps the sub-millisecond remainder for the next one, so the tick count
/// tracks wall-clock time with no cumulative drift.
#[derive(Debug, Clone, Copy)]
pub struct TickClock {
    last_us: u64,
}

impl TickClock {
    const TICK_US: u64 = 1000;

    pub fn new(now_us: u64) -> Self {
        Self { last_us: now_us }
    }

    /// Number of 1 ms ticks owed at `now_us`. A clock that appears to go
    /// backwards yields 0.
    pub fn due_ticks(&mut self, now_us: u64) -> u32 {
        let owed = now_us.saturating_sub(self.last_us) / Self::TICK_US;
        self.last_us += owed * Self::TICK_US;
        owed.min(u32::MAX as u64) as u32
    }
}
