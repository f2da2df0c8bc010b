use std::sync::atomic::{AtomicU64, Ordering};

/// Issues monotonically increasing tickets for a single query surface so that
/// callers can apply a deterministic "last request wins" rule to responses
/// that resolve out of order.
///
/// The client performs no cancellation: once a request is issued it runs to
/// completion. When a caller re-runs the same query before the previous run
/// resolves, the earlier response may arrive last and silently overwrite the
/// newer one. Holding one `RequestSequence` per query and checking
/// [`is_latest`](Self::is_latest) before applying a response turns that race
/// into a defined outcome.
///
/// ```
/// use hrportal_rs::utils::sequence::RequestSequence;
///
/// let seq = RequestSequence::new();
/// let first = seq.issue();
/// let second = seq.issue();
/// assert!(!seq.is_latest(&first));
/// assert!(seq.is_latest(&second));
/// ```
#[derive(Debug, Default)]
pub struct RequestSequence {
    latest: AtomicU64,
}

/// A ticket identifying one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

impl RequestSequence {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a ticket for a new request, superseding all previous tickets.
    pub fn issue(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::Relaxed) + 1)
    }

    /// Whether the given ticket belongs to the most recently issued request.
    #[must_use]
    pub fn is_latest(&self, ticket: &Ticket) -> bool {
        self.latest.load(Ordering::Relaxed) == ticket.0
    }
}
