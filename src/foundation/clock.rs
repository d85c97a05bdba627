use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

/// Millisecond wall clock polled by the draw loop.
pub trait Clock {
    /// Milliseconds since an arbitrary, fixed origin.
    fn now_ms(&self) -> u64;
}

/// Monotonic clock backed by [`Instant`].
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Start a clock whose origin is "now".
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Manually advanced clock. Clones share the same time.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Rc<Cell<u64>>,
}

impl ManualClock {
    /// Clock starting at `0` ms.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward by `ms`.
    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get().saturating_add(ms));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

/// Per-word polled time budget.
///
/// The reference point is reset before every word; `exceeded` compares the time spent on the
/// current word against the threshold. A zero threshold disables the check.
pub(crate) struct TimeBudget<'a> {
    clock: &'a dyn Clock,
    threshold_ms: u64,
    word_started_ms: u64,
}

impl<'a> TimeBudget<'a> {
    pub(crate) fn new(clock: &'a dyn Clock, threshold_ms: u64) -> Self {
        Self {
            clock,
            threshold_ms,
            word_started_ms: clock.now_ms(),
        }
    }

    pub(crate) fn start_word(&mut self) {
        self.word_started_ms = self.clock.now_ms();
    }

    pub(crate) fn exceeded(&self) -> bool {
        self.threshold_ms > 0
            && self.clock.now_ms().saturating_sub(self.word_started_ms) > self.threshold_ms
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/clock.rs"]
mod tests;
