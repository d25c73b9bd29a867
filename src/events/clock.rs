//! Event clock and time-ordered scheduler
//!
//! The clock owns logical time (minutes as `f64`) and a min-heap of pending
//! events. Events fire in ascending time; events scheduled for the same
//! instant fire in the order they were scheduled.

use crate::simulation::{SimulationError, SimulationResult};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// An event together with its firing time and insertion sequence
#[derive(Debug, Clone, PartialEq)]
pub struct Scheduled<E> {
    /// Logical firing time in minutes
    pub time: f64,
    /// Insertion sequence, used to break ties between equal times
    pub seq: u64,
    /// The event payload
    pub event: E,
}

impl<E: PartialEq> Eq for Scheduled<E> {}

impl<E: PartialEq> Ord for Scheduled<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so the BinaryHeap pops the earliest (time, seq) first.
        other.time.total_cmp(&self.time).then_with(|| other.seq.cmp(&self.seq))
    }
}

impl<E: PartialEq> PartialOrd for Scheduled<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Logical clock with a pending-event queue
#[derive(Debug)]
pub struct SimulationClock<E> {
    now: f64,
    next_seq: u64,
    events: BinaryHeap<Scheduled<E>>,
}

impl<E: PartialEq> Default for SimulationClock<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: PartialEq> SimulationClock<E> {
    /// Create a clock at time zero with no pending events
    pub fn new() -> Self {
        Self { now: 0.0, next_seq: 0, events: BinaryHeap::new() }
    }

    /// Current logical time
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Number of pending events
    pub fn pending(&self) -> usize {
        self.events.len()
    }

    /// Whether no events are pending
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Time of the earliest pending event
    pub fn peek_time(&self) -> Option<f64> {
        self.events.peek().map(|scheduled| scheduled.time)
    }

    /// Schedule `event` at absolute time `time`
    ///
    /// Returns the insertion sequence assigned to the event. Scheduling
    /// before the current time (or at a non-numeric time) is rejected.
    pub fn schedule(&mut self, time: f64, event: E) -> SimulationResult<u64> {
        if time.is_nan() || time < self.now {
            return Err(SimulationError::InvalidTime { requested: time, now: self.now });
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.events.push(Scheduled { time, seq, event });
        Ok(seq)
    }

    /// Schedule `event` after `delay` minutes
    pub fn schedule_in(&mut self, delay: f64, event: E) -> SimulationResult<u64> {
        self.schedule(self.now + delay, event)
    }

    /// Remove the earliest event and advance the clock to its time
    pub fn pop_next(&mut self) -> Option<Scheduled<E>> {
        let scheduled = self.events.pop()?;
        self.now = scheduled.time;
        Some(scheduled)
    }

    /// Deliver events to `handler` until the queue drains or the next event
    /// is at or beyond `until`
    ///
    /// The handler receives the clock so it can schedule follow-up events.
    /// The first handler error stops the run and is returned. When events
    /// remain past the bound the clock is left at `until`. Returns the
    /// number of events delivered.
    pub fn run_until<F>(&mut self, until: f64, mut handler: F) -> SimulationResult<usize>
    where
        F: FnMut(&mut Self, Scheduled<E>) -> SimulationResult<()>,
    {
        let mut delivered = 0;
        while let Some(time) = self.peek_time() {
            if time >= until {
                break;
            }
            let Some(scheduled) = self.pop_next() else {
                break;
            };
            handler(self, scheduled)?;
            delivered += 1;
        }
        if !self.events.is_empty() && until > self.now {
            self.now = until;
        }
        Ok(delivered)
    }
}
