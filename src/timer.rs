use std::time::{Duration, Instant};

/// Handle for one scheduled continuation. Owners keep at most one live id per
/// transition point and cancel it before scheduling a replacement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerEvent {
    /// Pacing delay between a completed word and the next word's appearance.
    AdvanceWord,
    /// A flashed correct-character hint should revert to its mask.
    HintExpired,
    /// A transiently revealed meaning should re-hide.
    MeaningRevealExpired,
    /// A "new record" style banner should clear.
    BannerExpired,
}

/// Cooperative single-flow scheduler. Nothing fires on its own; the host
/// event loop pumps `poll` and routes due events back into the session.
pub struct Scheduler {
    next_id: u64,
    pending: Vec<(TimerId, Instant, TimerEvent)>,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            pending: Vec::new(),
        }
    }

    pub fn schedule(&mut self, after: Duration, event: TimerEvent) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push((id, Instant::now() + after, event));
        id
    }

    pub fn cancel(&mut self, id: TimerId) {
        self.pending.retain(|(pending_id, _, _)| *pending_id != id);
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|(pending_id, _, _)| *pending_id == id)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Remove and return every event whose deadline has passed, in deadline
    /// order.
    pub fn poll(&mut self, now: Instant) -> Vec<(TimerId, TimerEvent)> {
        let mut due: Vec<(TimerId, Instant, TimerEvent)> = Vec::new();
        self.pending.retain(|entry| {
            if entry.1 <= now {
                due.push(*entry);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|(_, deadline, _)| *deadline);
        due.into_iter().map(|(id, _, ev)| (id, ev)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_and_poll() {
        let mut sched = Scheduler::new();
        let id = sched.schedule(Duration::from_millis(50), TimerEvent::AdvanceWord);
        assert!(sched.is_pending(id));

        // Not yet due
        assert!(sched.poll(Instant::now()).is_empty());
        assert!(sched.is_pending(id));

        // Past the deadline
        let later = Instant::now() + Duration::from_millis(60);
        let fired = sched.poll(later);
        assert_eq!(fired, vec![(id, TimerEvent::AdvanceWord)]);
        assert!(!sched.is_pending(id));
    }

    #[test]
    fn test_cancel_prevents_firing() {
        let mut sched = Scheduler::new();
        let id = sched.schedule(Duration::from_millis(10), TimerEvent::HintExpired);
        sched.cancel(id);
        let later = Instant::now() + Duration::from_millis(20);
        assert!(sched.poll(later).is_empty());
    }

    #[test]
    fn test_poll_orders_by_deadline() {
        let mut sched = Scheduler::new();
        let slow = sched.schedule(Duration::from_millis(30), TimerEvent::BannerExpired);
        let fast = sched.schedule(Duration::from_millis(10), TimerEvent::HintExpired);
        let later = Instant::now() + Duration::from_millis(50);
        let fired = sched.poll(later);
        assert_eq!(
            fired,
            vec![
                (fast, TimerEvent::HintExpired),
                (slow, TimerEvent::BannerExpired)
            ]
        );
    }

    #[test]
    fn test_cancel_all() {
        let mut sched = Scheduler::new();
        sched.schedule(Duration::from_millis(1), TimerEvent::AdvanceWord);
        sched.schedule(Duration::from_millis(2), TimerEvent::BannerExpired);
        sched.cancel_all();
        assert!(!sched.has_pending());
    }
}
