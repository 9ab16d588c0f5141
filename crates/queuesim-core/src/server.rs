//! Single-server FIFO queue with exponential service times.
//!
//! Each [`SingleQueueServer`] owns one bounded buffer whose head is the task
//! currently in service. Arrivals are admitted while the waiting room has
//! space and dropped otherwise; departures free the head and start service
//! for the next task in line.

use crate::clock::Scheduler;
use crate::event::{Event, EventKind};
use crate::random::VariateSource;
use crate::task::{CompletedTask, Task};
use queuesim_routing::{ServerId, ServerSnapshot};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::error;

/// Result of processing one event at a server.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    /// The arrival joined the buffer. `started_service` is true when the
    /// server was idle and a departure was scheduled for it.
    Admitted { seq: u64, started_service: bool },
    /// The waiting room was full; the arrival was discarded.
    Dropped,
    /// The head task finished service.
    Departed(CompletedTask),
    /// A departure reached an empty buffer. The server was forced idle.
    Violation,
}

/// Per-server counters, serializable for reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerStats {
    pub id: ServerId,
    pub capacity: usize,
    pub service_rate: f64,
    /// Arrivals routed to this server (admitted or dropped).
    pub arrivals: u64,
    pub served: u64,
    pub dropped: u64,
    pub total_wait_time: f64,
    pub total_service_time: f64,
    pub last_departure_time: f64,
    pub invariant_violations: u64,
}

/// An M/M/1 server with a bounded waiting room.
#[derive(Debug, Clone)]
pub struct SingleQueueServer {
    id: ServerId,
    /// Waiting-room size; the buffer holds at most `capacity + 1` tasks.
    capacity: usize,
    service_rate: f64,
    buffer: VecDeque<Task>,
    busy: bool,
    next_seq: u64,
    // --- Counters ---
    arrivals: u64,
    served: u64,
    dropped: u64,
    total_wait_time: f64,
    total_service_time: f64,
    last_departure_time: f64,
    invariant_violations: u64,
}

impl SingleQueueServer {
    pub fn new(id: ServerId, capacity: usize, service_rate: f64) -> Self {
        Self {
            id,
            capacity,
            service_rate,
            buffer: VecDeque::new(),
            busy: false,
            next_seq: 0,
            arrivals: 0,
            served: 0,
            dropped: 0,
            total_wait_time: 0.0,
            total_service_time: 0.0,
            last_departure_time: 0.0,
            invariant_violations: 0,
        }
    }

    pub fn id(&self) -> ServerId {
        self.id
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn service_rate(&self) -> f64 {
        self.service_rate
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Tasks in the buffer, including the one in service.
    pub fn queue_len(&self) -> usize {
        self.buffer.len()
    }

    /// Maximum buffer length: the waiting room plus the service slot.
    pub fn buffer_limit(&self) -> usize {
        self.capacity + 1
    }

    /// The task currently in service, if any.
    pub fn in_service(&self) -> Option<&Task> {
        self.buffer.front()
    }

    /// Process one event addressed to this server.
    ///
    /// Any departure this causes is pushed through `scheduler`; the server
    /// never looks at time except through `event`.
    pub fn process(
        &mut self,
        event: &Event,
        scheduler: &mut dyn Scheduler,
        variates: &mut dyn VariateSource,
    ) -> Outcome {
        match event.kind() {
            EventKind::Arrival => self.handle_arrival(event.time(), scheduler, variates),
            EventKind::Departure { .. } => self.handle_departure(event.time(), scheduler, variates),
        }
    }

    fn handle_arrival(
        &mut self,
        now: f64,
        scheduler: &mut dyn Scheduler,
        variates: &mut dyn VariateSource,
    ) -> Outcome {
        self.arrivals += 1;

        if self.buffer.len() >= self.buffer_limit() {
            self.dropped += 1;
            return Outcome::Dropped;
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        let mut task = Task::new(seq, now);

        // An idle server has an empty buffer, so the new task goes straight
        // into service.
        let started_service = !self.busy;
        if started_service {
            self.busy = true;
            task.begin_service(now);
            self.schedule_departure(now, scheduler, variates);
        }
        self.buffer.push_back(task);

        Outcome::Admitted {
            seq,
            started_service,
        }
    }

    fn handle_departure(
        &mut self,
        now: f64,
        scheduler: &mut dyn Scheduler,
        variates: &mut dyn VariateSource,
    ) -> Outcome {
        let Some(task) = self.buffer.pop_front() else {
            error!(
                server = self.id,
                time = now,
                "departure processed against an empty buffer; forcing server idle"
            );
            self.invariant_violations += 1;
            self.busy = false;
            return Outcome::Violation;
        };

        let done = task.complete(now);
        self.served += 1;
        self.total_wait_time += done.wait;
        self.total_service_time += done.service;
        self.last_departure_time = now;

        if let Some(next) = self.buffer.front_mut() {
            next.begin_service(now);
        }
        if self.buffer.is_empty() {
            self.busy = false;
        } else {
            self.schedule_departure(now, scheduler, variates);
        }

        Outcome::Departed(done)
    }

    fn schedule_departure(
        &self,
        now: f64,
        scheduler: &mut dyn Scheduler,
        variates: &mut dyn VariateSource,
    ) {
        let service = variates.exponential(self.service_rate);
        scheduler.schedule(Event::departure(now + service, self.id));
    }

    /// Read-only view handed to routing policies.
    pub fn snapshot(&self) -> ServerSnapshot {
        ServerSnapshot {
            id: self.id,
            queue_len: self.buffer.len(),
            capacity: self.capacity,
        }
    }

    pub fn stats(&self) -> ServerStats {
        ServerStats {
            id: self.id,
            capacity: self.capacity,
            service_rate: self.service_rate,
            arrivals: self.arrivals,
            served: self.served,
            dropped: self.dropped,
            total_wait_time: self.total_wait_time,
            total_service_time: self.total_service_time,
            last_departure_time: self.last_departure_time,
            invariant_violations: self.invariant_violations,
        }
    }
}
