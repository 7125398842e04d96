use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Timer {
    generation: u64,
    due: Instant,
}

/// Recurring advance request. At most one timer is ever live; starting
/// always replaces the previous one.
#[derive(Debug, Clone)]
pub struct Autoplay {
    enabled: bool,
    interval: Duration,
    timer: Option<Timer>,
    generation: u64,
}

impl Autoplay {
    pub fn new(enabled: bool, interval: Duration) -> Self {
        Self {
            enabled,
            interval,
            timer: None,
            generation: 0,
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    /// Generation of the live timer, bumped on every start.
    pub fn generation(&self) -> Option<u64> {
        self.timer.map(|t| t.generation)
    }

    pub fn next_due(&self) -> Option<Instant> {
        self.timer.map(|t| t.due)
    }

    pub fn start(&mut self, now: Instant) {
        self.stop();
        self.generation += 1;
        self.timer = Some(Timer {
            generation: self.generation,
            due: now + self.interval,
        });
    }

    pub fn stop(&mut self) {
        self.timer = None;
    }

    /// Starts only when enabled; used to resume after a gesture.
    pub fn resume(&mut self, now: Instant) {
        if self.enabled {
            self.start(now);
        }
    }

    /// Replaces the settings. A running timer is always stopped first.
    pub fn reconfigure(&mut self, enabled: bool, interval: Duration, now: Instant) {
        self.stop();
        self.enabled = enabled;
        self.interval = interval;
        self.resume(now);
    }

    /// Returns true when a tick is due. Fires at most once per call; a late
    /// poll schedules the next tick a full interval from `now`.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(timer) = self.timer.as_mut() else {
            return false;
        };
        if now < timer.due {
            return false;
        }

        let next = timer.due + self.interval;
        timer.due = if next > now { next } else { now + self.interval };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECOND: Duration = Duration::from_secs(1);

    #[test]
    fn test_ticks_on_interval() {
        let t0 = Instant::now();
        let mut autoplay = Autoplay::new(true, SECOND);
        autoplay.start(t0);

        assert!(!autoplay.poll(t0 + Duration::from_millis(999)));
        assert!(autoplay.poll(t0 + SECOND));
        assert!(!autoplay.poll(t0 + SECOND));
        assert!(autoplay.poll(t0 + 2 * SECOND));
    }

    #[test]
    fn test_late_poll_fires_once() {
        let t0 = Instant::now();
        let mut autoplay = Autoplay::new(true, SECOND);
        autoplay.start(t0);

        assert!(autoplay.poll(t0 + 5 * SECOND));
        assert!(!autoplay.poll(t0 + 5 * SECOND + Duration::from_millis(10)));
        assert_eq!(autoplay.next_due(), Some(t0 + 6 * SECOND));
    }

    #[test]
    fn test_start_replaces_instead_of_stacking() {
        let t0 = Instant::now();
        let mut autoplay = Autoplay::new(true, SECOND);
        autoplay.start(t0);
        let first = autoplay.generation();
        autoplay.start(t0 + Duration::from_millis(500));

        assert_ne!(autoplay.generation(), first);
        assert!(!autoplay.poll(t0 + SECOND));
        assert!(autoplay.poll(t0 + Duration::from_millis(1500)));
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut autoplay = Autoplay::new(true, SECOND);
        autoplay.stop();
        autoplay.start(Instant::now());
        autoplay.stop();
        autoplay.stop();
        assert!(!autoplay.is_running());
    }

    #[test]
    fn test_reconfigure_restarts_with_new_interval() {
        let t0 = Instant::now();
        let mut autoplay = Autoplay::new(false, SECOND);
        autoplay.resume(t0);
        assert!(!autoplay.is_running());

        autoplay.reconfigure(true, Duration::from_millis(3500), t0);
        assert_eq!(autoplay.next_due(), Some(t0 + Duration::from_millis(3500)));

        autoplay.reconfigure(false, SECOND, t0);
        assert!(!autoplay.is_running());
    }
}
