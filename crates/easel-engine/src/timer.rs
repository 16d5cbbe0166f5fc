use std::thread;
use std::time::{Duration, Instant};

/// Deadline-based frame timer.
///
/// [`Timer::tick`] sleeps until the next deadline and measures the real
/// duration of the step that just finished. Restarting with
/// [`Timer::start`] resets the baseline, which is how resuming from pause
/// keeps paused time out of the first resumed step.
pub struct Timer {
    frequency: f64,
    interval: Duration,
    next_deadline: Instant,
    last_start: Instant,
    last_step: Duration,
}

impl Timer {
    /// # Panics
    ///
    /// Panics if `frequency` is not positive.
    pub fn new(frequency: f64) -> Self {
        assert!(frequency > 0.0, "timer frequency must be positive");
        let interval = Duration::from_secs_f64(1.0 / frequency);
        let now = Instant::now();
        Self {
            frequency,
            interval,
            next_deadline: now + interval,
            last_start: now,
            last_step: interval,
        }
    }

    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// # Panics
    ///
    /// Panics if `frequency` is not positive.
    pub fn set_frequency(&mut self, frequency: f64) {
        assert!(frequency > 0.0, "timer frequency must be positive");
        self.frequency = frequency;
        self.interval = Duration::from_secs_f64(1.0 / frequency);
    }

    /// Resets the baseline: the next step is measured from now and the next
    /// deadline is one interval away.
    pub fn start(&mut self) {
        let now = Instant::now();
        self.last_start = now;
        self.next_deadline = now + self.interval;
        self.last_step = self.interval;
    }

    /// Sleeps until the next deadline, then records the finished step's real
    /// duration. When the loop overran its deadline the sleep is skipped and
    /// the schedule restarts from now rather than accumulating debt.
    pub fn tick(&mut self) {
        let now = Instant::now();
        if now < self.next_deadline {
            thread::sleep(self.next_deadline - now);
            self.next_deadline += self.interval;
        } else {
            self.next_deadline = now + self.interval;
        }
        let after = Instant::now();
        self.last_step = after - self.last_start;
        self.last_start = after;
    }

    /// Real duration of the most recently completed step.
    pub fn last_step_duration(&self) -> Duration {
        self.last_step
    }
}

/// Rolling one-second counter reporting the achieved tick frequency.
pub struct FrequencyMeter {
    window_start: Instant,
    ticks_in_window: u32,
    frequency: f64,
}

impl FrequencyMeter {
    pub fn new() -> Self {
        Self {
            window_start: Instant::now(),
            ticks_in_window: 0,
            frequency: 0.0,
        }
    }

    /// Records one tick. The reported frequency updates once per one-second
    /// window.
    pub fn count(&mut self) {
        self.ticks_in_window += 1;
        let elapsed = self.window_start.elapsed();
        if elapsed >= Duration::from_secs(1) {
            self.frequency = self.ticks_in_window as f64 / elapsed.as_secs_f64();
            self.ticks_in_window = 0;
            self.window_start = Instant::now();
        }
    }

    /// Most recently measured frequency in Hz; 0 until the first window
    /// completes.
    pub fn frequency(&self) -> f64 {
        self.frequency
    }
}

impl Default for FrequencyMeter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests/timer_tests.rs"]
mod tests;
