//! Per-job lifecycle record.
//!
//! A [`Task`] is created when a job is admitted, stamped when it reaches the
//! head of its server's buffer, and consumed when it departs.

/// A job held in a server's FIFO buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    /// Admission sequence number at the owning server.
    pub seq: u64,
    pub arrival_time: f64,
    /// Set when the task reaches the head of the buffer.
    pub service_start_time: Option<f64>,
    /// Set when the task departs.
    pub service_end_time: Option<f64>,
}

/// Durations of a task that has left the system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletedTask {
    pub seq: u64,
    pub arrival_time: f64,
    pub departure_time: f64,
    /// Time spent queued before service began.
    pub wait: f64,
    /// Time spent in service.
    pub service: f64,
}

impl Task {
    pub fn new(seq: u64, arrival_time: f64) -> Self {
        Self {
            seq,
            arrival_time,
            service_start_time: None,
            service_end_time: None,
        }
    }

    pub fn in_service(&self) -> bool {
        self.service_start_time.is_some() && self.service_end_time.is_none()
    }

    pub fn begin_service(&mut self, now: f64) {
        debug_assert!(
            self.service_start_time.is_none(),
            "Task {} started service twice",
            self.seq
        );
        self.service_start_time = Some(now);
    }

    /// Stamp the departure and compute the task's wait and service durations.
    ///
    /// Only the task at the head of the buffer departs, and it always began
    /// service when it got there.
    pub fn complete(mut self, now: f64) -> CompletedTask {
        debug_assert!(
            self.service_start_time.is_some(),
            "Task {} departed without starting service",
            self.seq
        );
        self.service_end_time = Some(now);
        let start = self.service_start_time.unwrap_or(now);
        CompletedTask {
            seq: self.seq,
            arrival_time: self.arrival_time,
            departure_time: now,
            wait: start - self.arrival_time,
            service: now - start,
        }
    }
}
