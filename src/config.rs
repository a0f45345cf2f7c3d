//! Configuration constants for the demo application.

/// Scheduler time base in milliseconds.
pub const TICK_MS: u32 = 100;

/// Task table capacity used by the demo.
pub const TASK_SLOTS: usize = 2;

/// Timer table capacity used by the demo.
pub const TIMER_SLOTS: usize = 4;

/// Demo run duration in milliseconds.
pub const RUN_MS: u32 = 10_000;

/// Depth of the message queue shared by the demo tasks.
pub const QUEUE_DEPTH: usize = 6;
