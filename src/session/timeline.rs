use std::time::Duration;

#[derive(Debug)]
struct Scheduled<A> {
    due: Duration,
    seq: u64,
    action: A,
}

/// Session-local clock plus the deferred actions waiting on it.
///
/// Time only moves when the owner advances it, and dropping or clearing the
/// timeline cancels everything still queued.
#[derive(Debug)]
pub struct Timeline<A> {
    now: Duration,
    next_seq: u64,
    queue: Vec<Scheduled<A>>,
}

impl<A> Default for Timeline<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Timeline<A> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_seq: 0,
            queue: Vec::new(),
        }
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn schedule(&mut self, delay: Duration, action: A) {
        self.queue.push(Scheduled {
            due: self.now + delay,
            seq: self.next_seq,
            action,
        });
        self.next_seq += 1;
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.queue.iter().map(|s| s.due).min()
    }

    /// Remove and return the earliest action due at or before `limit`,
    /// moving the clock to its due time. Ties go to the earlier schedule.
    pub fn pop_due(&mut self, limit: Duration) -> Option<A> {
        let idx = self
            .queue
            .iter()
            .enumerate()
            .filter(|(_, s)| s.due <= limit)
            .min_by_key(|(_, s)| (s.due, s.seq))
            .map(|(i, _)| i)?;
        let scheduled = self.queue.swap_remove(idx);
        self.now = self.now.max(scheduled.due);
        Some(scheduled.action)
    }

    pub fn advance_to(&mut self, at: Duration) {
        self.now = self.now.max(at);
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
