//! Compute-then-apply queue for presentation writes.
//!
//! During a step every element only *queues* its write; nothing touches
//! presentation state until `apply` runs after the whole collection pass.

type Mutation = Box<dyn FnOnce()>;

#[derive(Default)]
pub struct RenderBatch {
    queue: Vec<Mutation>,
}

impl RenderBatch {
    pub fn new() -> Self {
        Self { queue: Vec::new() }
    }

    pub fn push<F>(&mut self, mutation: F)
    where
        F: FnOnce() + 'static,
    {
        self.queue.push(Box::new(mutation));
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Run every queued mutation in order and leave the queue empty
    /// (capacity is kept for the next step).
    pub fn apply(&mut self) -> usize {
        let n = self.queue.len();
        for mutation in self.queue.drain(..) {
            mutation();
        }
        n
    }

    /// Drop queued mutations without running them.
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
