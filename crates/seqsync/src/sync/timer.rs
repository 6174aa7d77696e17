use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

#[derive(Debug)]
struct Scheduled<T> {
    id: TaskId,
    due: Duration,
    payload: T,
}

/// Cancellable delayed tasks on a virtual clock.
///
/// Time only moves through [`DebounceTimer::advance`]; hosts call it from their own event loop
/// (or a real timer) with the wall-clock time that passed. Due tasks are returned in due order,
/// ties broken by scheduling order.
#[derive(Debug)]
pub struct DebounceTimer<T> {
    now: Duration,
    next_id: u64,
    tasks: Vec<Scheduled<T>>,
}

impl<T> Default for DebounceTimer<T> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            tasks: Vec::new(),
        }
    }
}

impl<T> DebounceTimer<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time elapsed since construction.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn schedule(&mut self, delay: Duration, payload: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        let due = self.now.saturating_add(delay);
        let at = self.tasks.partition_point(|t| t.due <= due);
        self.tasks.insert(at, Scheduled { id, due, payload });
        id
    }

    /// Returns the payload if the task was still pending.
    pub fn cancel(&mut self, id: TaskId) -> Option<T> {
        let at = self.tasks.iter().position(|t| t.id == id)?;
        Some(self.tasks.remove(at).payload)
    }

    pub fn is_pending(&self, id: TaskId) -> bool {
        self.tasks.iter().any(|t| t.id == id)
    }

    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Time left until the earliest task is due.
    pub fn next_due_in(&self) -> Option<Duration> {
        self.tasks.first().map(|t| t.due.saturating_sub(self.now))
    }

    pub fn advance(&mut self, elapsed: Duration) -> Vec<T> {
        self.now = self.now.saturating_add(elapsed);
        let now = self.now;
        let due = self.tasks.partition_point(|t| t.due <= now);
        self.tasks.drain(..due).map(|t| t.payload).collect()
    }

    /// Fires every pending task now, moving the clock to the last due time.
    pub fn drain(&mut self) -> Vec<T> {
        if let Some(last) = self.tasks.last() {
            self.now = self.now.max(last.due);
        }
        self.tasks.drain(..).map(|t| t.payload).collect()
    }
}
