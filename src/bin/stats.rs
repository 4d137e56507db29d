use std::collections::VecDeque;
use std::time::Duration;

const WINDOW: usize = 30;

/// Round-trip times of the most recent lookups.
pub struct Stats {
    last_lookups: VecDeque<u64>,
    lookups: u64,
    stale: u64,
}

impl Stats {
    pub fn new() -> Self {
        Self {
            last_lookups: VecDeque::with_capacity(WINDOW),
            lookups: 0,
            stale: 0,
        }
    }

    pub fn capture_lookup(&mut self, elapsed: Duration, stale: bool) {
        if self.last_lookups.len() == WINDOW {
            self.last_lookups.pop_front();
        }
        self.last_lookups.push_back(elapsed.as_millis() as u64);
        self.lookups += 1;
        if stale {
            self.stale += 1;
        }
    }

    /// Average round-trip in milliseconds.
    pub fn get_average(&self) -> f64 {
        if self.last_lookups.is_empty() {
            return 0.0;
        }
        self.last_lookups.iter().sum::<u64>() as f64 / self.last_lookups.len() as f64
    }

    pub fn get_last(&self) -> Option<u64> {
        self.last_lookups.back().copied()
    }
}

impl std::fmt::Display for Stats {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} lookups ({} discarded as stale), average {:.0} ms over the last {}",
            self.lookups,
            self.stale,
            self.get_average(),
            self.last_lookups.len()
        )?;
        if let Some(last) = self.get_last() {
            write!(f, ", last {} ms", last)?;
        }
        Ok(())
    }
}

#[test]
fn keeps_a_sliding_window() {
    let mut stats = Stats::new();
    assert_eq!(stats.get_average(), 0.0);

    for ms in 0..40 {
        stats.capture_lookup(Duration::from_millis(ms), ms % 10 == 0);
    }

    assert_eq!(stats.last_lookups.len(), WINDOW);
    // 10..=39
    assert_eq!(stats.get_average(), 24.5);
    assert_eq!(stats.get_last(), Some(39));
    assert_eq!(stats.stale, 4);
}
