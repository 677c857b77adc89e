//! Lock-Free Task Queue for the Cooperative Control Loop
#![allow(unsafe_code)] // Required for lock-free atomic operations
//!
//! ## Overview
//!
//! This module implements a bounded, lock-free ring buffer carrying pending
//! control tasks from the trigger layer (ticker expiry, operator commands,
//! fault detection) to the dispatch loop. Producers never block and the
//! consumer never blocks, which keeps the trigger path safe to run from an
//! interrupt context on embedded targets.
//!
//! ## Algorithm
//!
//! A ring buffer with atomic head/tail indices:
//!
//! ```text
//! ┌─────┬─────┬─────┬─────┬─────┬─────┬─────┬─────┐
//! │  0  │  1  │  2  │  3  │  4  │  5  │  6  │  7  │
//! └─────┴─────┴─────┴─────┴─────┴─────┴─────┴─────┘
//!          ↑                       ↑
//!        tail                    head
//!        (next read)          (next write)
//! ```
//!
//! Push loads the head with Acquire, writes the slot, then publishes with a
//! Release store. Pop claims the tail slot with a compare-exchange so
//! multiple consumers stay correct, though this system only runs one.
//!
//! ## Overflow
//!
//! When the queue is full the task is dropped and counted. Every task here
//! is periodic or re-triggerable, so a dropped instance is recovered on the
//! next tick; the drop counter surfaces the condition in telemetry so a
//! chronically undersized queue is visible.
//!
//! Capacity must be a power of two for the masked index arithmetic.

use core::cell::UnsafeCell;
use core::mem::MaybeUninit;
use core::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

/// One unit of control work, identified by kind only
///
/// Tasks carry no payload: each handler reads whatever state it needs at
/// dispatch time, so a task delayed in the queue acts on current data, not
/// on a stale snapshot captured at trigger time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Liveness blink and telemetry emission
    Heartbeat,
    /// Sample all sensor channels into the filter bank
    Measure,
    /// Validate the filtered measurements against the redlines
    CheckRedlines,
    /// Advance the MPPT strategy one step
    StepMppt,
    /// Close the duty-cycle loop one step
    StepPid,
    /// Re-evaluate the supervisory state machine
    UpdateStateMachine,
}

/// Default task queue capacity
pub const QUEUE_CAPACITY: usize = 32;

/// Lock-free bounded task queue
///
/// ## Example Usage
///
/// ```rust
/// use mppt_core::queue::{Task, TaskQueue};
///
/// static QUEUE: TaskQueue<32> = TaskQueue::new();
///
/// // Trigger layer (timer callback)
/// fn on_heartbeat_tick() {
///     if !QUEUE.push(Task::Heartbeat) {
///         // Dropped; counted, recovered on the next tick.
///     }
/// }
///
/// // Dispatch loop
/// fn dispatch() {
///     while let Some(task) = QUEUE.pop() {
///         // Run the matching handler.
///     }
/// }
/// ```
pub struct TaskQueue<const N: usize> {
    /// Ring buffer storage, interior-mutable behind the atomics
    buffer: UnsafeCell<[MaybeUninit<Task>; N]>,

    /// Next write position (producer owned)
    head: AtomicUsize,

    /// Next read position (consumer shared)
    tail: AtomicUsize,

    /// Tasks dropped on overflow
    dropped: AtomicU32,
}

impl<const N: usize> TaskQueue<N> {
    /// Create a new empty queue, usable in a static context
    pub const fn new() -> Self {
        assert!(N.is_power_of_two(), "queue capacity must be a power of 2");
        Self {
            buffer: UnsafeCell::new([MaybeUninit::uninit(); N]),
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
            dropped: AtomicU32::new(0),
        }
    }

    /// Push a task (single producer)
    ///
    /// Returns false and bumps the drop counter if the queue is full.
    ///
    /// ## Safety
    /// Only one producer may push at a time.
    pub fn push(&self, task: Task) -> bool {
        let head = self.head.load(Ordering::Acquire);
        let next_head = (head + 1) & (N - 1); // Fast modulo for power of 2

        if next_head == self.tail.load(Ordering::Acquire) {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        // Safe because we're the only producer.
        unsafe {
            let buffer = &mut *self.buffer.get();
            buffer[head].write(task);
        }

        // Make the write visible before updating head.
        self.head.store(next_head, Ordering::Release);
        true
    }

    /// Pop the oldest task
    ///
    /// Returns None if the queue is empty.
    pub fn pop(&self) -> Option<Task> {
        loop {
            let tail = self.tail.load(Ordering::Acquire);
            let head = self.head.load(Ordering::Acquire);

            if tail == head {
                return None;
            }

            // Claim the slot before reading it.
            let next_tail = (tail + 1) & (N - 1);
            match self.tail.compare_exchange_weak(
                tail,
                next_tail,
                Ordering::Release,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    let task = unsafe {
                        let buffer = &*self.buffer.get();
                        buffer[tail].assume_init()
                    };
                    return Some(task);
                }
                Err(_) => core::hint::spin_loop(),
            }
        }
    }

    /// Current queue length
    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);

        if head >= tail {
            head - tail
        } else {
            N - tail + head
        }
    }

    /// True when no task is pending
    pub fn is_empty(&self) -> bool {
        self.head.load(Ordering::Acquire) == self.tail.load(Ordering::Acquire)
    }

    /// True when the next push would be dropped
    pub fn is_full(&self) -> bool {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        ((head + 1) & (N - 1)) == tail
    }

    /// Tasks dropped because the queue was full
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Drain all pending tasks in FIFO order
    pub fn drain(&self) -> Drain<'_, N> {
        Drain { queue: self }
    }
}

// The atomics carry the synchronization.
unsafe impl<const N: usize> Send for TaskQueue<N> {}
unsafe impl<const N: usize> Sync for TaskQueue<N> {}

/// Iterator that pops until the queue is empty
pub struct Drain<'a, const N: usize> {
    queue: &'a TaskQueue<N>,
}

impl<const N: usize> Iterator for Drain<'_, N> {
    type Item = Task;

    fn next(&mut self) -> Option<Self::Item> {
        self.queue.pop()
    }
}
