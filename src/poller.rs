//! Timing for automatic inbox refresh.

use std::time::{Duration, Instant};

use crate::settings::Settings;

/// Delay between the last settings edit and the refresh it triggers
pub const SETTINGS_DEBOUNCE: Duration = Duration::from_millis(750);

/// At most one recurring refresh timer
#[derive(Debug, Default)]
pub struct Poller {
    schedule: Option<Schedule>,
}

#[derive(Debug, Clone, Copy)]
struct Schedule {
    interval: Duration,
    next_due: Instant,
}

impl Poller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel any existing timer, then start a fresh one if auto-refresh is on.
    /// The first firing is one full interval after `now`.
    pub fn reconcile(&mut self, settings: &Settings, now: Instant) {
        if let Some(old) = self.schedule.take() {
            log::debug!("poll timer cancelled ({}s)", old.interval.as_secs());
        }
        if settings.auto_refresh {
            let interval = settings.interval();
            self.schedule = Some(Schedule {
                interval,
                next_due: now + interval,
            });
            log::debug!("poll timer started ({}s)", interval.as_secs());
        }
    }

    #[cfg(test)]
    pub fn is_active(&self) -> bool {
        self.schedule.is_some()
    }

    pub fn interval(&self) -> Option<Duration> {
        self.schedule.map(|s| s.interval)
    }

    #[cfg(test)]
    pub fn next_due(&self) -> Option<Instant> {
        self.schedule.map(|s| s.next_due)
    }

    /// True if the timer fired since the last call. Missed periods are
    /// coalesced into a single firing; the cadence stays aligned to when
    /// the timer was armed.
    pub fn due(&mut self, now: Instant) -> bool {
        let Some(schedule) = self.schedule.as_mut() else {
            return false;
        };
        if now < schedule.next_due {
            return false;
        }
        while schedule.next_due <= now {
            schedule.next_due += schedule.interval;
        }
        true
    }
}

/// Trailing-edge debounce
#[derive(Debug)]
pub struct Debounce {
    delay: Duration,
    pending: Option<Instant>,
}

impl Debounce {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// (Re)start the delay from `now`
    pub fn schedule(&mut self, now: Instant) {
        self.pending = Some(now);
    }

    #[cfg(test)]
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// True once the delay has elapsed since the last `schedule`
    pub fn ready(&mut self, now: Instant) -> bool {
        match self.pending {
            Some(at) if now.saturating_duration_since(at) >= self.delay => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn settings(auto_refresh: bool, secs: u64) -> Settings {
        let mut s = Settings::from_config(&Config::default());
        s.auto_refresh = auto_refresh;
        s.refresh_interval_secs = secs;
        s
    }

    fn count_firings(poller: &mut Poller, start: Instant, until_ms: u64) -> usize {
        (0..=until_ms)
            .step_by(100)
            .filter(|ms| poller.due(start + Duration::from_millis(*ms)))
            .count()
    }

    #[test]
    fn test_disabled_never_fires() {
        let start = Instant::now();
        let mut poller = Poller::new();
        poller.reconcile(&settings(false, 5), start);
        assert!(!poller.is_active());
        assert_eq!(count_firings(&mut poller, start, 60_000), 0);
    }

    #[test]
    fn test_fires_once_per_interval() {
        let start = Instant::now();
        let mut poller = Poller::new();
        poller.reconcile(&settings(true, 5), start);
        assert_eq!(poller.interval(), Some(Duration::from_secs(5)));
        assert!(!poller.due(start + Duration::from_millis(4_900)));
        assert!(poller.due(start + Duration::from_secs(5)));
        assert!(!poller.due(start + Duration::from_millis(5_100)));
        // 5s .. 20s inclusive
        let mut poller = Poller::new();
        poller.reconcile(&settings(true, 5), start);
        assert_eq!(count_firings(&mut poller, start, 20_000), 4);
    }

    #[test]
    fn test_missed_periods_coalesce() {
        let start = Instant::now();
        let mut poller = Poller::new();
        poller.reconcile(&settings(true, 5), start);
        assert!(poller.due(start + Duration::from_secs(23)));
        assert!(!poller.due(start + Duration::from_secs(24)));
        assert_eq!(poller.next_due(), Some(start + Duration::from_secs(25)));
    }

    #[test]
    fn test_reconcile_replaces_timer() {
        let start = Instant::now();
        let mut poller = Poller::new();
        poller.reconcile(&settings(true, 5), start);

        let changed = start + Duration::from_secs(3);
        poller.reconcile(&settings(true, 10), changed);
        // The old 5s deadline no longer fires
        assert!(!poller.due(start + Duration::from_secs(5)));
        assert!(poller.due(changed + Duration::from_secs(10)));

        poller.reconcile(&settings(false, 10), changed);
        assert!(!poller.is_active());
        assert!(!poller.due(changed + Duration::from_secs(60)));
    }

    #[test]
    fn test_debounce_trailing_edge() {
        let start = Instant::now();
        let mut debounce = Debounce::new(SETTINGS_DEBOUNCE);
        assert!(!debounce.ready(start));

        debounce.schedule(start);
        debounce.schedule(start + Duration::from_millis(500));
        assert!(!debounce.ready(start + Duration::from_millis(900)));
        assert!(debounce.ready(start + Duration::from_millis(1_250)));
        assert!(!debounce.is_pending());
        assert!(!debounce.ready(start + Duration::from_secs(5)));

        debounce.schedule(start);
        debounce.cancel();
        assert!(!debounce.ready(start + Duration::from_secs(5)));
    }
}
