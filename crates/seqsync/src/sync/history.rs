use seqsync_core::Document;
use std::collections::VecDeque;

/// Bounded undo/redo stacks of committed documents.
#[derive(Debug, Clone)]
pub struct History {
    past: VecDeque<Document>,
    future: Vec<Document>,
    limit: usize,
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            past: VecDeque::with_capacity(limit.min(64)),
            future: Vec::new(),
            limit,
        }
    }

    /// Records the state a commit is about to replace. Clears the redo stack.
    pub fn record(&mut self, previous: Document) {
        self.future.clear();
        if self.limit == 0 {
            return;
        }
        if self.past.len() == self.limit {
            self.past.pop_front();
        }
        self.past.push_back(previous);
    }

    pub fn undo(&mut self, current: Document) -> Option<Document> {
        let previous = self.past.pop_back()?;
        self.future.push(current);
        Some(previous)
    }

    pub fn redo(&mut self, current: Document) -> Option<Document> {
        let next = self.future.pop()?;
        self.past.push_back(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }
}
