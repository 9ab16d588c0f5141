//! Global event clock for discrete-event simulation.
//!
//! The [`EventClock`] is a min-heap of pending [`Event`]s ordered by time.
//! Simulation time advances only when an event is popped, so runs are
//! deterministic regardless of host machine speed.
//!
//! Servers never see the clock itself. They receive a [`Scheduler`], which can
//! push new events but cannot pop them; popping belongs to the driver.

use crate::event::Event;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Push-only capability handed to servers.
pub trait Scheduler {
    fn schedule(&mut self, event: Event);
}

/// A pending event plus its insertion sequence for tie-breaking.
#[derive(Debug, Clone)]
struct TimedEvent {
    sequence: u64,
    event: Event,
}

impl PartialEq for TimedEvent {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for TimedEvent {}

impl PartialOrd for TimedEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimedEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; we want min-heap. Equal times pop in
        // insertion order.
        other
            .event
            .time()
            .total_cmp(&self.event.time())
            .then(other.sequence.cmp(&self.sequence))
    }
}

/// Min-ordered priority structure over simulation events.
#[derive(Debug, Default)]
pub struct EventClock {
    queue: BinaryHeap<TimedEvent>,
    sequence: u64,
    now: f64,
}

impl EventClock {
    /// Create an empty clock at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Time of the most recently popped event.
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Remove the earliest pending event and advance the clock to it.
    ///
    /// # Panics
    ///
    /// Panics in debug mode if the popped event lies in the past.
    pub fn pop(&mut self) -> Option<Event> {
        let timed = self.queue.pop()?;
        let time = timed.event.time();
        debug_assert!(
            time >= self.now,
            "Cannot move clock backwards: current={}, target={}",
            self.now,
            time,
        );
        self.now = time;
        Some(timed.event)
    }

    /// Earliest pending event without removing it.
    pub fn peek(&self) -> Option<&Event> {
        self.queue.peek().map(|t| &t.event)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Pending departures targeting `server`.
    pub fn pending_departures(&self, server: queuesim_routing::ServerId) -> usize {
        self.queue
            .iter()
            .filter(|t| t.event.target() == Some(server))
            .count()
    }
}

impl Scheduler for EventClock {
    fn schedule(&mut self, event: Event) {
        self.queue.push(TimedEvent {
            sequence: self.sequence,
            event,
        });
        self.sequence += 1;
    }
}
