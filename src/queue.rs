//! Bounded FIFO queue for inter-task messages.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::convert::Infallible;

/// Fixed-capacity ring buffer with strict FIFO order.
///
/// Storage is allocated once at construction and never grows. A full queue
/// refuses the write with [`nb::Error::WouldBlock`]; whether the caller
/// drops the element, reads one out first or retries later is application
/// policy, not queue policy.
pub struct Queue<T> {
    buf: Box<[Option<T>]>,
    head: usize,
    tail: usize,
    empty: bool,
    full: bool,
}

impl<T> Queue<T> {
    /// Create a queue holding at most `capacity` elements.
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "queue capacity must be non-zero");
        let mut buf = Vec::with_capacity(capacity);
        buf.resize_with(capacity, || None);
        Self {
            buf: buf.into_boxed_slice(),
            head: 0,
            tail: 0,
            empty: true,
            full: false,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    pub fn is_full(&self) -> bool {
        self.full
    }

    /// Append one element, failing with `WouldBlock` when saturated.
    pub fn write(&mut self, item: T) -> nb::Result<(), Infallible> {
        if self.full {
            return Err(nb::Error::WouldBlock);
        }
        self.buf[self.head] = Some(item);
        self.head = (self.head + 1) % self.buf.len();
        self.empty = false;
        if self.head == self.tail {
            self.full = true;
        }
        Ok(())
    }

    /// Take the oldest element, failing with `WouldBlock` when empty.
    pub fn read(&mut self) -> nb::Result<T, Infallible> {
        if self.empty {
            return Err(nb::Error::WouldBlock);
        }
        let item = self.buf[self.tail].take();
        self.tail = (self.tail + 1) % self.buf.len();
        self.full = false;
        if self.tail == self.head {
            self.empty = true;
        }
        match item {
            Some(value) => Ok(value),
            // Unreachable while the empty/full bookkeeping holds.
            None => Err(nb::Error::WouldBlock),
        }
    }

    /// Discard everything and return to the initial empty state.
    pub fn flush(&mut self) {
        for slot in self.buf.iter_mut() {
            *slot = None;
        }
        self.head = 0;
        self.tail = 0;
        self.empty = true;
        self.full = false;
    }
}
