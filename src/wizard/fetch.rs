//! Stale-response guard for service fetches.
//!
//! Each fetch or direct selection bumps a generation counter. A response is
//! applied only when its ticket still carries the current generation, so a slow
//! response for a previously chosen service is dropped on arrival.
use serde::Serialize;

/// Proof of which fetch a response belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchTicket {
    pub service_id: String,
    pub generation: u64,
}

#[derive(Debug, Default)]
pub(super) struct FetchGuard {
    generation: u64,
}

impl FetchGuard {
    pub(super) fn begin(&mut self, service_id: &str) -> FetchTicket {
        self.generation += 1;
        FetchTicket {
            service_id: service_id.to_string(),
            generation: self.generation,
        }
    }

    /// Invalidate every outstanding ticket.
    pub(super) fn invalidate(&mut self) {
        self.generation += 1;
    }

    pub(super) fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.generation == self.generation
    }
}
