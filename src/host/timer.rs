use super::{Scheduler, TimerHandle};

/// A timer that came due during `TimerManager::advance`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimerFire {
    pub handle: TimerHandle,
    /// Real time since this timer last fired (or was scheduled)
    pub elapsed: f32,
}

#[derive(Debug, Clone)]
struct RepeatingTimer {
    handle: TimerHandle,
    interval: f32,
    since_last: f32,
}

/// Frame-driven repeating timers
#[derive(Debug, Clone, Default)]
pub struct TimerManager {
    timers: Vec<RepeatingTimer>,
    next_id: u64,
}

impl TimerManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance all timers by `dt` seconds and report the ones that came due.
    ///
    /// A timer fires at most once per call; its `elapsed` carries any overshoot
    /// so callers can absorb frame jitter.
    pub fn advance(&mut self, dt: f32) -> Vec<TimerFire> {
        let mut fired = Vec::new();
        for timer in &mut self.timers {
            timer.since_last += dt.max(0.0);
            if timer.since_last >= timer.interval {
                fired.push(TimerFire {
                    handle: timer.handle,
                    elapsed: timer.since_last,
                });
                timer.since_last = 0.0;
            }
        }
        fired
    }

    pub fn is_active(&self, handle: TimerHandle) -> bool {
        self.timers.iter().any(|t| t.handle == handle)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

impl Scheduler for TimerManager {
    fn schedule_repeating(&mut self, interval: f32) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        self.timers.push(RepeatingTimer {
            handle,
            interval,
            since_last: 0.0,
        });
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.timers.retain(|t| t.handle != handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_on_interval() {
        let mut timers = TimerManager::new();
        let handle = timers.schedule_repeating(0.5);

        assert!(timers.advance(0.25).is_empty());
        let fired = timers.advance(0.25);
        assert_eq!(fired, vec![TimerFire { handle, elapsed: 0.5 }]);
        assert!(timers.advance(0.25).is_empty());
    }

    #[test]
    fn test_elapsed_absorbs_jitter() {
        let mut timers = TimerManager::new();
        timers.schedule_repeating(0.5);

        let fired = timers.advance(0.75);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].elapsed, 0.75);
    }

    #[test]
    fn test_cancel_stops_firing() {
        let mut timers = TimerManager::new();
        let handle = timers.schedule_repeating(0.25);
        timers.cancel(handle);

        assert!(!timers.is_active(handle));
        assert!(timers.advance(1.0).is_empty());

        // Cancelling twice is harmless
        timers.cancel(handle);
        assert!(timers.is_empty());
    }

    #[test]
    fn test_reschedule_gets_fresh_handle() {
        let mut timers = TimerManager::new();
        let first = timers.schedule_repeating(0.25);
        timers.cancel(first);
        let second = timers.schedule_repeating(0.25);

        assert_ne!(first, second);
        let fired = timers.advance(0.25);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].handle, second);
    }
}
