/// Cancelling a stopped timer is a no-op; only effective cancellations are
/// counted.
#[derive(Clone, Debug, Default)]
pub struct TickTimer {
    interval_ms: i64,
    next_due_ms: Option<i64>,
    cancellations: u32,
}

impl TickTimer {
    pub fn new(interval_ms: i64) -> Self {
        Self {
            interval_ms: interval_ms.max(1),
            next_due_ms: None,
            cancellations: 0,
        }
    }

    /// (Re)start from `now`, dropping any pending deadline.
    pub fn start(&mut self, now_ms: i64) {
        self.next_due_ms = Some(now_ms.saturating_add(self.interval_ms));
    }

    /// Returns whether a running timer was actually stopped.
    pub fn cancel(&mut self) -> bool {
        if self.next_due_ms.take().is_some() {
            self.cancellations += 1;
            true
        } else {
            false
        }
    }

    pub fn is_active(&self) -> bool {
        self.next_due_ms.is_some()
    }

    pub fn due(&self, now_ms: i64) -> bool {
        matches!(self.next_due_ms, Some(t) if now_ms >= t)
    }

    /// Next deadline after a fire. A late fire does not queue up extra ticks.
    pub fn reschedule(&mut self, now_ms: i64) {
        if self.next_due_ms.is_some() {
            self.start(now_ms);
        }
    }

    pub fn next_due_ms(&self) -> Option<i64> {
        self.next_due_ms
    }

    pub fn cancellations(&self) -> u32 {
        self.cancellations
    }
}
