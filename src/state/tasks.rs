use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Generation counter used to cancel in-flight async work.
///
/// A task takes a [`Ticket`] before its first `.await`; once the guard is
/// cancelled the ticket goes stale and the task must drop its result.
#[derive(Clone, Debug, Default)]
pub(crate) struct TaskGuard {
    generation: Arc<AtomicU64>,
}

impl TaskGuard {
    pub fn ticket(&self) -> Ticket {
        Ticket {
            generation: Arc::clone(&self.generation),
            taken_at: self.generation.load(Ordering::SeqCst),
        }
    }

    /// Invalidate every ticket handed out so far.
    pub fn cancel_all(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Cancel older tickets and take a fresh one (last request wins).
    pub fn restart(&self) -> Ticket {
        self.cancel_all();
        self.ticket()
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Ticket {
    generation: Arc<AtomicU64>,
    taken_at: u64,
}

impl Ticket {
    pub fn is_current(&self) -> bool {
        self.generation.load(Ordering::SeqCst) == self.taken_at
    }
}
