//! Fixed-capacity table of periodic tasks.

use alloc::vec::Vec;

use super::{Result, SchedError, TaskId};

/// Timing state of one periodic work item. The callback itself is stored
/// next to the engine so dispatch can hand callbacks a mutable view of
/// this table.
#[derive(Debug, Clone, Copy)]
struct TaskSlot {
    period: u32,
    elapsed: u32,
    running: bool,
}

/// Pre-allocated task table. Entries are never removed, only disabled.
pub struct TaskTable {
    slots: Vec<TaskSlot>,
    capacity: usize,
    tick: u32,
}

impl TaskTable {
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

    /// Number of registered tasks.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Allocate the next slot for a task with the given period. The period
    /// must be a positive multiple of the tick. New tasks start enabled
    /// with a zeroed accumulator.
    pub(crate) fn register(&mut self, period: u32) -> Result<TaskId> {
        if period < self.tick || period % self.tick != 0 {
            return Err(SchedError::InvalidPeriod);
        }
        if self.slots.len() == self.capacity {
            return Err(SchedError::CapacityExceeded);
        }
        self.slots.push(TaskSlot {
            period,
            elapsed: 0,
            running: true,
        });
        Ok(TaskId::new(self.slots.len()))
    }

    /// Enable a task. Accumulation resumes from the frozen value, not from
    /// zero.
    pub fn start(&mut self, id: TaskId) -> Result<()> {
        self.slot_mut(id)?.running = true;
        Ok(())
    }

    /// Disable a task. The elapsed accumulator keeps its value.
    pub fn stop(&mut self, id: TaskId) -> Result<()> {
        self.slot_mut(id)?.running = false;
        Ok(())
    }

    /// Replace the period without restarting the in-progress cycle, which
    /// may therefore shorten or stretch.
    pub fn set_period(&mut self, id: TaskId, period: u32) -> Result<()> {
        if period < self.tick || period % self.tick != 0 {
            return Err(SchedError::InvalidPeriod);
        }
        self.slot_mut(id)?.period = period;
        Ok(())
    }

    /// Milliseconds accumulated since the task last ran.
    pub fn elapsed(&self, id: TaskId) -> Result<u32> {
        Ok(self.slot(id)?.elapsed)
    }

    pub fn period(&self, id: TaskId) -> Result<u32> {
        Ok(self.slot(id)?.period)
    }

    pub fn is_running(&self, id: TaskId) -> Result<bool> {
        Ok(self.slot(id)?.running)
    }

    /// Advance the slot at `index` by one tick. Returns true when the task
    /// is due this tick; the accumulator is then reset to zero, never to
    /// the excess beyond the period.
    pub(crate) fn advance(&mut self, index: usize, tick: u32) -> bool {
        let slot = &mut self.slots[index];
        if !slot.running {
            return false;
        }
        slot.elapsed += tick;
        if slot.elapsed >= slot.period {
            slot.elapsed = 0;
            true
        } else {
            false
        }
    }

    fn slot(&self, id: TaskId) -> Result<&TaskSlot> {
        self.slots.get(id.index()).ok_or(SchedError::InvalidId)
    }

    fn slot_mut(&mut self, id: TaskId) -> Result<&mut TaskSlot> {
        self.slots.get_mut(id.index()).ok_or(SchedError::InvalidId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: u32 = 100;

    fn table() -> TaskTable {
        TaskTable::new(4, TICK)
    }

    #[test]
    fn register_validates_period() {
        let mut tasks = table();
        assert_eq!(tasks.register(50), Err(SchedError::InvalidPeriod));
        assert_eq!(tasks.register(120), Err(SchedError::InvalidPeriod));
        assert_eq!(tasks.register(0), Err(SchedError::InvalidPeriod));
        assert_eq!(tasks.len(), 0);
        assert!(tasks.register(200).is_ok());
        // Period equal to the tick is the accepted lower bound.
        assert!(tasks.register(TICK).is_ok());
    }

    #[test]
    fn ids_are_consecutive_from_one() {
        let mut tasks = table();
        let a = tasks.register(100).unwrap();
        let b = tasks.register(200).unwrap();
        let c = tasks.register(300).unwrap();
        assert_eq!(a.get(), 1);
        assert_eq!(b.get(), 2);
        assert_eq!(c.get(), 3);
    }

    #[test]
    fn capacity_is_enforced() {
        let mut tasks = TaskTable::new(2, TICK);
        tasks.register(100).unwrap();
        tasks.register(100).unwrap();
        assert_eq!(tasks.register(100), Err(SchedError::CapacityExceeded));
        assert_eq!(tasks.len(), 2);
    }

    #[test]
    fn start_stop_toggle_without_touching_elapsed() {
        let mut tasks = table();
        let id = tasks.register(500).unwrap();
        assert!(!tasks.advance(0, TICK));
        assert_eq!(tasks.elapsed(id), Ok(TICK));

        tasks.stop(id).unwrap();
        assert!(!tasks.advance(0, TICK));
        assert_eq!(tasks.elapsed(id), Ok(TICK));

        tasks.start(id).unwrap();
        assert!(!tasks.advance(0, TICK));
        assert_eq!(tasks.elapsed(id), Ok(2 * TICK));
    }

    #[test]
    fn dangling_ids_are_rejected_after_clear() {
        let mut tasks = table();
        let id = tasks.register(200).unwrap();
        tasks.clear();
        assert_eq!(tasks.start(id), Err(SchedError::InvalidId));
        assert_eq!(tasks.stop(id), Err(SchedError::InvalidId));
        assert_eq!(tasks.elapsed(id), Err(SchedError::InvalidId));
    }

    #[test]
    fn set_period_keeps_accumulator() {
        let mut tasks = table();
        let id = tasks.register(500).unwrap();
        tasks.advance(0, TICK);
        tasks.advance(0, TICK);
        assert_eq!(tasks.set_period(id, 50), Err(SchedError::InvalidPeriod));
        assert_eq!(tasks.set_period(id, 250), Err(SchedError::InvalidPeriod));
        tasks.set_period(id, 200).unwrap();
        assert_eq!(tasks.elapsed(id), Ok(2 * TICK));
        // The shortened period makes the running cycle due on the next tick.
        assert!(tasks.advance(0, TICK));
        assert_eq!(tasks.elapsed(id), Ok(0));
    }

    #[test]
    fn due_task_resets_to_zero() {
        let mut tasks = table();
        let id = tasks.register(200).unwrap();
        assert!(!tasks.advance(0, TICK));
        assert!(tasks.advance(0, TICK));
        assert_eq!(tasks.elapsed(id), Ok(0));
    }
}
