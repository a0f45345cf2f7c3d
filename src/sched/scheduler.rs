//! Cooperative dispatch engine.
//!
//! Each tick the engine walks the task table in registration order and
//! calls every due callback, then does the same for the timer table, so
//! tasks always observe the tick before timers do. Callbacks run to
//! completion on the caller's thread; nothing preempts them, which is the
//! whole concurrency story of this crate.

use alloc::boxed::Box;
use alloc::vec::Vec;

use embedded_hal::blocking::delay::DelayMs;

use crate::clock::Monotonic;

use super::{Result, TaskId, TaskTable, TimerId, TimerTable};

/// Periodic task callback. The control view lets a callback start, stop
/// and retune other entries mid-dispatch.
pub type TaskFn = Box<dyn FnMut(&mut SchedCtl)>;

/// Timer fire callback. Receives its own id so it can re-arm itself.
pub type TimerFn = Box<dyn FnMut(&mut SchedCtl, TimerId)>;

/// Engine parameters, fixed at construction.
#[derive(Debug, Clone, Copy)]
pub struct SchedConfig {
    /// Tick length in milliseconds. Must be non-zero.
    pub tick_ms: u32,
    /// Task table capacity.
    pub task_slots: usize,
    /// Timer table capacity.
    pub timer_slots: usize,
    /// Wall-clock duration one [`Scheduler::run`] call covers. Rounded up
    /// to a whole number of ticks.
    pub run_ms: u32,
}

/// Control view of the engine handed to callbacks.
///
/// Everything except registration lives here: starting, stopping and
/// retuning tasks and timers plus the tick counters. Registration stays on
/// [`Scheduler`] so the set of callbacks cannot change under a running
/// dispatch pass.
pub struct SchedCtl {
    tick_ms: u32,
    run_ms: u32,
    ticks: u32,
    tasks: TaskTable,
    timers: TimerTable,
}

impl SchedCtl {
    pub fn tick_ms(&self) -> u32 {
        self.tick_ms
    }

    /// Ticks fully dispatched so far, across all `run` calls.
    pub fn ticks_elapsed(&self) -> u32 {
        self.ticks
    }

    /// Scheduler time in milliseconds, a multiple of the tick.
    pub fn time_ms(&self) -> u32 {
        self.ticks.saturating_mul(self.tick_ms)
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn timer_count(&self) -> usize {
        self.timers.len()
    }

    pub fn start_task(&mut self, id: TaskId) -> Result<()> {
        self.tasks.start(id)
    }

    pub fn stop_task(&mut self, id: TaskId) -> Result<()> {
        self.tasks.stop(id)
    }

    pub fn set_task_period(&mut self, id: TaskId, period_ms: u32) -> Result<()> {
        self.tasks.set_period(id, period_ms)
    }

    pub fn task_elapsed(&self, id: TaskId) -> Result<u32> {
        self.tasks.elapsed(id)
    }

    pub fn task_period(&self, id: TaskId) -> Result<u32> {
        self.tasks.period(id)
    }

    pub fn task_running(&self, id: TaskId) -> Result<bool> {
        self.tasks.is_running(id)
    }

    pub fn start_timer(&mut self, id: TimerId) -> Result<()> {
        self.timers.start(id)
    }

    pub fn stop_timer(&mut self, id: TimerId) -> Result<()> {
        self.timers.stop(id)
    }

    pub fn reload_timer(&mut self, id: TimerId, timeout_ms: u32) -> Result<()> {
        self.timers.reload(id, timeout_ms)
    }

    pub fn timer_remaining(&self, id: TimerId) -> Result<u32> {
        self.timers.remaining(id)
    }

    pub fn timer_running(&self, id: TimerId) -> Result<bool> {
        self.timers.is_running(id)
    }
}

/// Tick-driven cooperative scheduler.
pub struct Scheduler {
    ctl: SchedCtl,
    task_fns: Vec<TaskFn>,
    timer_fns: Vec<TimerFn>,
}

impl Scheduler {
    /// Build an idle engine with empty tables.
    ///
    /// Panics if `config.tick_ms` is zero.
    pub fn new(config: SchedConfig) -> Self {
        assert!(config.tick_ms > 0, "tick must be non-zero");
        Self {
            ctl: SchedCtl {
                tick_ms: config.tick_ms,
                run_ms: config.run_ms,
                ticks: 0,
                tasks: TaskTable::new(config.task_slots, config.tick_ms),
                timers: TimerTable::new(config.timer_slots, config.tick_ms),
            },
            task_fns: Vec::new(),
            timer_fns: Vec::new(),
        }
    }

    /// Drop every registration and zero the tick counter. Previously
    /// issued ids are dangling afterwards and all operations on them fail.
    pub fn reset(&mut self) {
        self.ctl.tasks.clear();
        self.ctl.timers.clear();
        self.task_fns.clear();
        self.timer_fns.clear();
        self.ctl.ticks = 0;
    }

    pub fn ctl(&self) -> &SchedCtl {
        &self.ctl
    }

    pub fn ctl_mut(&mut self) -> &mut SchedCtl {
        &mut self.ctl
    }

    /// Register a periodic task. `init` runs exactly once, synchronously,
    /// after the slot is allocated; `periodic` then runs every `period_ms`
    /// once the scheduler is running. New tasks are enabled.
    ///
    /// On a validation or capacity error nothing is registered and `init`
    /// never runs.
    pub fn register_task<I, F>(&mut self, init: I, periodic: F, period_ms: u32) -> Result<TaskId>
    where
        I: FnOnce(&mut SchedCtl),
        F: FnMut(&mut SchedCtl) + 'static,
    {
        let id = self.ctl.tasks.register(period_ms)?;
        self.task_fns.push(Box::new(periodic));
        log::debug!("task {} registered, period {} ms", id.get(), period_ms);
        init(&mut self.ctl);
        Ok(id)
    }

    /// Register a timer. New timers hold their full countdown but are
    /// stopped until [`SchedCtl::start_timer`].
    pub fn register_timer<F>(&mut self, fire: F, timeout_ms: u32) -> Result<TimerId>
    where
        F: FnMut(&mut SchedCtl, TimerId) + 'static,
    {
        let id = self.ctl.timers.register(timeout_ms)?;
        self.timer_fns.push(Box::new(fire));
        log::debug!("timer {} registered, timeout {} ms", id.get(), timeout_ms);
        Ok(id)
    }

    /// Dispatch ticks until the configured run duration is covered,
    /// pacing each tick against `clock` by sleeping on `delay`.
    ///
    /// A tick that overruns is not compensated: the next frame starts from
    /// the late timestamp and the schedule drifts forward. Once the run
    /// duration has been reached, each further call dispatches exactly one
    /// tick; the tick counter keeps accumulating across calls.
    pub fn run<C, D>(&mut self, clock: &mut C, delay: &mut D)
    where
        C: Monotonic,
        D: DelayMs<u32>,
    {
        log::info!(
            "scheduler run: tick {} ms, {} tasks, {} timers",
            self.ctl.tick_ms,
            self.ctl.tasks.len(),
            self.ctl.timers.len()
        );
        let mut frame = clock.now_ms();
        loop {
            self.dispatch();
            self.ctl.ticks += 1;
            if self.ctl.ticks.saturating_mul(self.ctl.tick_ms) >= self.ctl.run_ms {
                break;
            }
            let deadline = frame.wrapping_add(self.ctl.tick_ms);
            let mut now = clock.now_ms();
            while now < deadline {
                delay.delay_ms(deadline - now);
                now = clock.now_ms();
            }
            frame = now;
        }
        log::info!("scheduler stopped after {} ticks", self.ctl.ticks);
    }

    /// One full tick: tasks first, in registration order, then timers.
    fn dispatch(&mut self) {
        log::trace!("tick {}", self.ctl.ticks);
        let tick = self.ctl.tick_ms;
        for index in 0..self.ctl.tasks.len() {
            if self.ctl.tasks.advance(index, tick) {
                (self.task_fns[index])(&mut self.ctl);
            }
        }
        for index in 0..self.ctl.timers.len() {
            if self.ctl.timers.advance(index, tick) {
                let id = TimerId::new(index + 1);
                (self.timer_fns[index])(&mut self.ctl, id);
            }
        }
    }
}
