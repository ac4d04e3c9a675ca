//! Delayed one-shot continuations advanced by the frame tick.
//!
//! Nothing here sleeps: a timer is a deadline in tick time, and
//! [`Timers::advance`] returns the payloads whose deadlines have passed.

use crate::ids::{IdAllocator, TimerId};

#[derive(Debug)]
struct Pending<E> {
    id: TimerId,
    due: f64,
    event: E,
}

#[derive(Debug)]
pub struct Timers<E> {
    ids: IdAllocator,
    /// Seconds of tick time seen so far.
    now: f64,
    pending: Vec<Pending<E>>,
}

impl<E> Default for Timers<E> {
    fn default() -> Self {
        Self {
            ids: IdAllocator::new(),
            now: 0.0,
            pending: Vec::new(),
        }
    }
}

impl<E> Timers<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire `event` once `delay_ms` of tick time has elapsed.
    pub fn schedule(&mut self, delay_ms: u32, event: E) -> TimerId {
        let id = self.ids.alloc_timer();
        self.pending.push(Pending {
            id,
            due: self.now + f64::from(delay_ms) / 1000.0,
            event,
        });
        id
    }

    /// Returns `true` if the timer was still pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        self.pending.len() != before
    }

    pub fn cancel_where(&mut self, mut pred: impl FnMut(&E) -> bool) {
        self.pending.retain(|p| !pred(&p.event));
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Move time forward and collect due events, earliest deadline first
    /// (ties in scheduling order).
    pub fn advance(&mut self, dt: f32) -> Vec<E> {
        self.now += f64::from(dt.max(0.0));
        let now = self.now;
        let (mut due, rest): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|p| p.due <= now);
        self.pending = rest;
        due.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.id.cmp(&b.id)));
        due.into_iter().map(|p| p.event).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_in_deadline_order() {
        let mut t = Timers::new();
        t.schedule(300, "late");
        t.schedule(100, "early");
        t.schedule(100, "early2");
        assert!(t.advance(0.05).is_empty());
        assert_eq!(t.advance(0.3), vec!["early", "early2", "late"]);
        assert!(t.is_empty());
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut t = Timers::new();
        let id = t.schedule(10, 1);
        t.schedule(10, 2);
        assert!(t.cancel(id));
        assert!(!t.cancel(id));
        assert_eq!(t.advance(1.0), vec![2]);
    }

    #[test]
    fn zero_delay_fires_on_next_advance() {
        let mut t = Timers::new();
        t.schedule(0, ());
        assert_eq!(t.advance(0.0).len(), 1);
    }
}
