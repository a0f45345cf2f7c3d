//! Simulated time shared by a clock and a delay, so paced runs finish
//! instantly and deterministically.

use std::cell::Cell;
use std::rc::Rc;

use embedded_hal::blocking::delay::DelayMs;
use ticksched::Monotonic;

pub struct SimTime(Rc<Cell<u32>>);

impl SimTime {
    pub fn new() -> Self {
        Self(Rc::new(Cell::new(0)))
    }

    pub fn clock(&self) -> SimClock {
        SimClock(Rc::clone(&self.0))
    }

    pub fn delay(&self) -> SimDelay {
        SimDelay(Rc::clone(&self.0))
    }

    #[allow(dead_code)]
    pub fn now(&self) -> u32 {
        self.0.get()
    }
}

pub struct SimClock(Rc<Cell<u32>>);

impl Monotonic for SimClock {
    fn now_ms(&mut self) -> u32 {
        self.0.get()
    }
}

/// Sleeping advances the shared time instead of blocking.
pub struct SimDelay(Rc<Cell<u32>>);

impl DelayMs<u32> for SimDelay {
    fn delay_ms(&mut self, ms: u32) {
        self.0.set(self.0.get() + ms);
    }
}
