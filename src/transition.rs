//! Ticketed timed overlays.
//!
//! A transition is started, a timer is armed elsewhere, and when the timer
//! fires it hands its ticket back. Only the ticket of the most recent start
//! may finish the transition, so a timer left over from an earlier start is
//! ignored.

/// Identifies one start of a [`Transition`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransitionTicket(u64);

#[derive(Debug, Default, Clone)]
pub struct Transition {
    active: Option<TransitionTicket>,
    issued: u64,
}

impl Transition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) the transition and return the ticket that ends it
    pub fn start(&mut self) -> TransitionTicket {
        self.issued += 1;
        let ticket = TransitionTicket(self.issued);
        self.active = Some(ticket);
        ticket
    }

    /// Finish the transition if `ticket` is the current one.
    /// Returns true when the overlay was cleared by this call.
    pub fn finish(&mut self, ticket: TransitionTicket) -> bool {
        if self.active == Some(ticket) {
            self.active = None;
            true
        } else {
            false
        }
    }

    /// Drop the overlay regardless of outstanding tickets
    pub fn cancel(&mut self) {
        self.active = None;
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }
}
