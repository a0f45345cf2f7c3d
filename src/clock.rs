//! Monotonic time source for tick pacing.

/// Monotonic millisecond clock the tick loop paces against.
///
/// The origin is arbitrary but fixed; readings must never go backwards.
pub trait Monotonic {
    /// Milliseconds elapsed since the clock's origin.
    fn now_ms(&mut self) -> u32;
}

#[cfg(feature = "std")]
mod host {
    use std::thread;
    use std::time::{Duration, Instant};

    use embedded_hal::blocking::delay::DelayMs;

    use super::Monotonic;

    /// `Instant`-backed clock with its origin at construction.
    pub struct StdClock {
        start: Instant,
    }

    impl StdClock {
        pub fn new() -> Self {
            Self {
                start: Instant::now(),
            }
        }
    }

    impl Default for StdClock {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Monotonic for StdClock {
        fn now_ms(&mut self) -> u32 {
            self.start.elapsed().as_millis() as u32
        }
    }

    /// Blocking delay through `thread::sleep`.
    pub struct StdDelay;

    impl DelayMs<u32> for StdDelay {
        fn delay_ms(&mut self, ms: u32) {
            thread::sleep(Duration::from_millis(u64::from(ms)));
        }
    }
}

#[cfg(feature = "std")]
pub use host::{StdClock, StdDelay};
