//! Cancelable queue of clock-scheduled events
//!
//! Replaces ambient platform timers: the owner drains due events from
//! inside its tick and can purge everything when a run ends.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Scheduled<E> {
    due_ms: f64,
    /// Insertion order, breaks ties between equal due times
    seq: u64,
    event: E,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerQueue<E> {
    pending: Vec<Scheduled<E>>,
    next_seq: u64,
}

impl<E> Default for TimerQueue<E> {
    fn default() -> Self {
        Self {
            pending: Vec::new(),
            next_seq: 0,
        }
    }
}

impl<E: PartialEq> TimerQueue<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `event` at clock time `due_ms`
    pub fn schedule(&mut self, due_ms: f64, event: E) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(Scheduled { due_ms, seq, event });
    }

    /// Whether an equal event is already waiting
    pub fn contains(&self, event: &E) -> bool {
        self.pending.iter().any(|s| s.event == *event)
    }

    /// Remove and return every event due at or before `now_ms`, earliest first
    pub fn drain_due(&mut self, now_ms: f64) -> Vec<E> {
        let mut due = Vec::new();
        let mut i = 0;
        while i < self.pending.len() {
            if self.pending[i].due_ms <= now_ms {
                due.push(self.pending.swap_remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|s| s.event).collect()
    }

    /// Drop every pending event
    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
