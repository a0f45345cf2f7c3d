//! Fixed-capacity table of software timers.
//!
//! A timer is one-shot by default: once its countdown reaches zero while
//! enabled it fires on that tick and on every following tick until it is
//! reloaded or stopped. Periodic behavior is built by reloading from the
//! fire callback.

use alloc::vec::Vec;

use super::{Result, SchedError, TimerId};

/// Countdown state of one timer.
#[derive(Debug, Clone, Copy)]
struct TimerSlot {
    timeout: u32,
    count: u32,
    running: bool,
}

/// Pre-allocated timer table. Entries are never removed, only disabled.
pub struct TimerTable {
    slots: Vec<TimerSlot>,
    capacity: usize,
    tick: u32,
}

impl TimerTable {
    pub(crate) fn new(capacity: usize, tick: u32) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
            tick,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
    }

    /// Number of registered timers.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Allocate the next slot for a timer. The timeout must be a positive
    /// multiple of the tick; `timeout == tick` is accepted here, unlike
    /// [`reload`](Self::reload). New timers are stopped and must be
    /// started explicitly.
    pub(crate) fn register(&mut self, timeout: u32) -> Result<TimerId> {
        if timeout < self.tick || timeout % self.tick != 0 {
            return Err(SchedError::InvalidTimeout);
        }
        if self.slots.len() == self.capacity {
            return Err(SchedError::CapacityExceeded);
        }
        self.slots.push(TimerSlot {
            timeout,
            count: timeout,
            running: false,
        });
        Ok(TimerId::new(self.slots.len()))
    }

    /// Enable a timer and restart its countdown from the stored timeout.
    pub fn start(&mut self, id: TimerId) -> Result<()> {
        let slot = self.slot_mut(id)?;
        slot.count = slot.timeout;
        slot.running = true;
        Ok(())
    }

    /// Disable a timer. The countdown keeps its value.
    pub fn stop(&mut self, id: TimerId) -> Result<()> {
        self.slot_mut(id)?.running = false;
        Ok(())
    }

    /// Replace the timeout and restart the countdown. Requires a multiple
    /// of the tick strictly greater than it; `reload(id, tick)` fails even
    /// though `register(tick)` succeeds. The enabled flag is untouched, so
    /// a stopped timer stays stopped.
    pub fn reload(&mut self, id: TimerId, timeout: u32) -> Result<()> {
        if timeout <= self.tick || timeout % self.tick != 0 {
            return Err(SchedError::InvalidTimeout);
        }
        let slot = self.slot_mut(id)?;
        slot.timeout = timeout;
        slot.count = timeout;
        Ok(())
    }

    /// Milliseconds left on the countdown. An expired timer reports zero;
    /// an unknown id is an error, the two are never conflated.
    pub fn remaining(&self, id: TimerId) -> Result<u32> {
        Ok(self.slot(id)?.count)
    }

    pub fn is_running(&self, id: TimerId) -> Result<bool> {
        Ok(self.slot(id)?.running)
    }

    /// Advance the slot at `index` by one tick. Returns true when the fire
    /// callback is due: the tick the countdown reaches zero and every tick
    /// it stays there.
    pub(crate) fn advance(&mut self, index: usize, tick: u32) -> bool {
        let slot = &mut self.slots[index];
        if !slot.running {
            return false;
        }
        if slot.count > 0 {
            slot.count = slot.count.saturating_sub(tick);
        }
        slot.count == 0
    }

    fn slot(&self, id: TimerId) -> Result<&TimerSlot> {
        self.slots.get(id.index()).ok_or(SchedError::InvalidId)
    }

    fn slot_mut(&mut self, id: TimerId) -> Result<&mut TimerSlot> {
        self.slots.get_mut(id.index()).ok_or(SchedError::InvalidId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: u32 = 100;

    fn table() -> TimerTable {
        TimerTable::new(4, TICK)
    }

    #[test]
    fn register_validates_timeout() {
        let mut timers = table();
        assert_eq!(timers.register(50), Err(SchedError::InvalidTimeout));
        assert_eq!(timers.register(0), Err(SchedError::InvalidTimeout));
        assert_eq!(timers.register(250), Err(SchedError::InvalidTimeout));
        assert_eq!(timers.len(), 0);
        let id = timers.register(TICK).unwrap();
        assert_eq!(id.get(), 1);
    }

    #[test]
    fn registered_timer_is_stopped() {
        let mut timers = table();
        let id = timers.register(200).unwrap();
        assert_eq!(timers.is_running(id), Ok(false));
        assert_eq!(timers.remaining(id), Ok(200));
        assert!(!timers.advance(0, TICK));
        assert_eq!(timers.remaining(id), Ok(200));
    }

    #[test]
    fn start_restarts_countdown() {
        let mut timers = table();
        let id = timers.register(300).unwrap();
        timers.start(id).unwrap();
        timers.advance(0, TICK);
        assert_eq!(timers.remaining(id), Ok(200));
        timers.start(id).unwrap();
        assert_eq!(timers.remaining(id), Ok(300));
    }

    #[test]
    fn stop_keeps_countdown() {
        let mut timers = table();
        let id = timers.register(300).unwrap();
        timers.start(id).unwrap();
        timers.advance(0, TICK);
        timers.stop(id).unwrap();
        assert!(!timers.advance(0, TICK));
        assert_eq!(timers.remaining(id), Ok(200));
    }

    #[test]
    fn reload_boundary_is_strict() {
        let mut timers = table();
        let id = timers.register(TICK).unwrap();
        assert_eq!(timers.reload(id, TICK), Err(SchedError::InvalidTimeout));
        assert_eq!(timers.reload(id, 0), Err(SchedError::InvalidTimeout));
        assert_eq!(timers.reload(id, 1550), Err(SchedError::InvalidTimeout));
        assert_eq!(timers.reload(id, 900), Ok(()));
        assert_eq!(timers.remaining(id), Ok(900));
    }

    #[test]
    fn reload_does_not_start_a_stopped_timer() {
        let mut timers = table();
        let id = timers.register(200).unwrap();
        timers.reload(id, 300).unwrap();
        assert_eq!(timers.is_running(id), Ok(false));
        assert!(!timers.advance(0, TICK));
        assert_eq!(timers.remaining(id), Ok(300));
    }

    #[test]
    fn expired_timer_fires_every_tick() {
        let mut timers = table();
        let id = timers.register(200).unwrap();
        timers.start(id).unwrap();
        assert!(!timers.advance(0, TICK));
        assert!(timers.advance(0, TICK));
        assert_eq!(timers.remaining(id), Ok(0));
        // Still zero, still firing.
        assert!(timers.advance(0, TICK));
        assert!(timers.advance(0, TICK));
    }

    #[test]
    fn capacity_is_enforced() {
        let mut timers = TimerTable::new(1, TICK);
        timers.register(200).unwrap();
        assert_eq!(timers.register(200), Err(SchedError::CapacityExceeded));
    }

    #[test]
    fn dangling_ids_are_rejected_after_clear() {
        let mut timers = table();
        let id = timers.register(200).unwrap();
        timers.clear();
        assert_eq!(timers.start(id), Err(SchedError::InvalidId));
        assert_eq!(timers.remaining(id), Err(SchedError::InvalidId));
    }
}
