//! Tick-driven cooperative scheduling core.

pub mod scheduler;
pub mod task;
pub mod timer;

pub use scheduler::{SchedConfig, SchedCtl, Scheduler, TaskFn, TimerFn};
pub use task::TaskTable;
pub use timer::TimerTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedError {
    /// Period is zero, below the tick or not a multiple of it.
    InvalidPeriod,
    /// Timeout rejected by registration or reload validation.
    InvalidTimeout,
    /// The table already holds its configured number of entries.
    CapacityExceeded,
    /// Id does not name a registered entry.
    InvalidId,
}

pub type Result<T> = core::result::Result<T, SchedError>;

/// 1-based task handle, assigned in registration order and stable for the
/// scheduler's lifetime. Only [`Scheduler::reset`](scheduler::Scheduler::reset)
/// invalidates issued ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskId(usize);

impl TaskId {
    pub(crate) fn new(id: usize) -> Self {
        Self(id)
    }

    /// The 1-based slot number.
    pub fn get(self) -> usize {
        self.0
    }

    pub(crate) fn index(self) -> usize {
        self.0 - 1
    }
}

/// 1-based timer handle, assigned in registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerId(usize);

impl TimerId {
    pub(crate) fn new(id: usize) -> Self {
        Self(id)
    }

    /// The 1-based slot number.
    pub fn get(self) -> usize {
        self.0
    }

    pub(crate) fn index(self) -> usize {
        self.0 - 1
    }
}
