//! Delayed world events.
//!
//! Nothing in the simulation sleeps. Anything that happens "later" is an entry
//! here with an explicit due timestamp, drained synchronously by the tick.

use crate::game::{AgentId, ObstacleId};

/// Something the world must do at a later timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimedEvent {
    /// Spawn a replacement for a deposited or destroyed spirit.
    RespawnSpirit,
    /// Return a dominated agent to its original team.
    RevertTeam {
        /// Dominated agent.
        agent: AgentId,
    },
    /// Remove a temporary clone.
    ExpireClone {
        /// The clone.
        agent: AgentId,
    },
    /// Teleport a recalling agent to its base.
    CompleteRecall {
        /// The recalling agent.
        agent: AgentId,
    },
    /// Remove an obstacle.
    ExpireObstacle {
        /// The obstacle.
        obstacle: ObstacleId,
    },
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    due_at: f64,
    seq: u64,
    event: TimedEvent,
}

/// Ordered queue of pending events.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    entries: Vec<Entry>,
    next_seq: u64,
}

impl Timeline {
    /// Create an empty timeline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `event` at `due_at`.
    pub fn schedule(&mut self, due_at: f64, event: TimedEvent) {
        self.entries.push(Entry {
            due_at,
            seq: self.next_seq,
            event,
        });
        self.next_seq += 1;
    }

    /// Drop every pending event matching `predicate`. Returns how many were dropped.
    pub fn cancel(&mut self, mut predicate: impl FnMut(&TimedEvent) -> bool) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| !predicate(&entry.event));
        before - self.entries.len()
    }

    /// Remove and return every event due at or before `now`, earliest first;
    /// ties keep scheduling order.
    pub fn drain_due(&mut self, now: f64) -> Vec<TimedEvent> {
        let (mut due, pending): (Vec<Entry>, Vec<Entry>) =
            self.entries.drain(..).partition(|entry| entry.due_at <= now);
        self.entries = pending;
        due.sort_by(|a, b| a.due_at.total_cmp(&b.due_at).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|entry| entry.event).collect()
    }

    /// Number of pending events matching `predicate`.
    #[must_use]
    pub fn count(&self, predicate: impl Fn(&TimedEvent) -> bool) -> usize {
        self.entries.iter().filter(|entry| predicate(&entry.event)).count()
    }

    /// Due timestamp of the first pending event matching `predicate`.
    #[must_use]
    pub fn due_at(&self, predicate: impl Fn(&TimedEvent) -> bool) -> Option<f64> {
        self.entries
            .iter()
            .filter(|entry| predicate(&entry.event))
            .map(|entry| entry.due_at)
            .min_by(f64::total_cmp)
    }

    /// Number of pending events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_due_orders_by_time_then_seq() {
        let mut timeline = Timeline::new();
        timeline.schedule(200.0, TimedEvent::RespawnSpirit);
        timeline.schedule(100.0, TimedEvent::ExpireClone { agent: 1 });
        timeline.schedule(100.0, TimedEvent::ExpireClone { agent: 2 });
        timeline.schedule(500.0, TimedEvent::RevertTeam { agent: 3 });

        let due = timeline.drain_due(200.0);
        assert_eq!(
            due,
            vec![
                TimedEvent::ExpireClone { agent: 1 },
                TimedEvent::ExpireClone { agent: 2 },
                TimedEvent::RespawnSpirit,
            ]
        );
        assert_eq!(timeline.len(), 1);
    }

    #[test]
    fn test_cancel() {
        let mut timeline = Timeline::new();
        timeline.schedule(100.0, TimedEvent::RevertTeam { agent: 1 });
        timeline.schedule(100.0, TimedEvent::RevertTeam { agent: 2 });
        let dropped = timeline.cancel(|e| *e == TimedEvent::RevertTeam { agent: 1 });
        assert_eq!(dropped, 1);
        assert_eq!(
            timeline.count(|e| matches!(e, TimedEvent::RevertTeam { .. })),
            1
        );
    }

    #[test]
    fn test_due_at() {
        let mut timeline = Timeline::new();
        assert!(timeline.is_empty());
        timeline.schedule(300.0, TimedEvent::RevertTeam { agent: 1 });
        let due = timeline.due_at(|e| *e == TimedEvent::RevertTeam { agent: 1 });
        assert!(due.is_some_and(|t| (t - 300.0).abs() < f64::EPSILON));
    }
}
