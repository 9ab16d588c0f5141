//! Simulation events.
//!
//! An [`Event`] is an immutable timestamped record. Arrivals carry no target;
//! departures name the server that scheduled them.

use queuesim_routing::ServerId;

/// What happens at an event's timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A new job enters the system and must be routed.
    Arrival,
    /// The job in service at `server` finishes and leaves.
    Departure { server: ServerId },
}

/// A timestamped event in simulation time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    time: f64,
    kind: EventKind,
}

impl Event {
    pub fn arrival(time: f64) -> Self {
        Self {
            time,
            kind: EventKind::Arrival,
        }
    }

    pub fn departure(time: f64, server: ServerId) -> Self {
        Self {
            time,
            kind: EventKind::Departure { server },
        }
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn is_arrival(&self) -> bool {
        matches!(self.kind, EventKind::Arrival)
    }

    /// Target server, present only for departures.
    pub fn target(&self) -> Option<ServerId> {
        match self.kind {
            EventKind::Arrival => None,
            EventKind::Departure { server } => Some(server),
        }
    }
}
