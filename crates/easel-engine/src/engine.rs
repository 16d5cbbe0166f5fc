use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use easel_event::{Event, EventQueue, EventSink, ListenerRef, TickEvent};

use crate::timer::{FrequencyMeter, Timer};

/// How long one paused-state poll sleeps before re-checking the pause flag.
const PAUSE_POLL: Duration = Duration::from_millis(100);

const DEFAULT_FREQUENCY: f64 = 60.0;

/// Flags shared between the engine loop and its handles. Frequency is
/// stored as f64 bits so handles can retarget the timer without a lock.
struct EngineControl {
    paused: AtomicBool,
    stopped: AtomicBool,
    resume_requested: AtomicBool,
    frequency_bits: AtomicU64,
}

impl EngineControl {
    fn new(frequency: f64) -> Self {
        Self {
            paused: AtomicBool::new(false),
            stopped: AtomicBool::new(false),
            resume_requested: AtomicBool::new(false),
            frequency_bits: AtomicU64::new(frequency.to_bits()),
        }
    }

    fn frequency(&self) -> f64 {
        f64::from_bits(self.frequency_bits.load(Ordering::Acquire))
    }
}

/// Cloneable, thread-safe control surface over a running [`Engine`].
#[derive(Clone)]
pub struct EngineHandle {
    control: Arc<EngineControl>,
    sink: EventSink,
}

impl EngineHandle {
    /// Suspends ticking. The engine loop falls back to bounded polling and
    /// stops delivering tick events until resumed.
    pub fn pause(&self) {
        self.control.paused.store(true, Ordering::Release);
    }

    /// Resumes ticking. The timer baseline restarts, so the first tick after
    /// resume does not report the paused duration.
    pub fn resume(&self) {
        self.control.resume_requested.store(true, Ordering::Release);
        self.control.paused.store(false, Ordering::Release);
    }

    pub fn is_paused(&self) -> bool {
        self.control.paused.load(Ordering::Acquire)
    }

    /// Stops the engine loop. Terminal: a stopped engine never ticks again.
    pub fn stop(&self) {
        self.control.stopped.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.control.stopped.load(Ordering::Acquire)
    }

    /// Posts an event to the process-wide queue.
    pub fn post(&self, event: Event) {
        self.sink.post(event);
    }

    pub fn target_frequency(&self) -> f64 {
        self.control.frequency()
    }

    /// # Panics
    ///
    /// Panics if `frequency` is not positive.
    pub fn set_target_frequency(&self, frequency: f64) {
        assert!(frequency > 0.0, "target frequency must be positive");
        self.control
            .frequency_bits
            .store(frequency.to_bits(), Ordering::Release);
    }
}

/// The tick driver: owns the process-wide event queue, the frame timer, and
/// the frequency meter, and turns them into a strictly ordered stream of
/// tick events.
///
/// Views participate by registering a [`crate::ViewDriver`] as a listener;
/// platform adapters feed input through [`Engine::sink`].
pub struct Engine {
    queue: EventQueue,
    timer: Timer,
    meter: FrequencyMeter,
    control: Arc<EngineControl>,
    tick_count: u64,
}

impl Engine {
    pub fn new() -> Self {
        Self::with_frequency(DEFAULT_FREQUENCY)
    }

    /// # Panics
    ///
    /// Panics if `frequency` is not positive.
    pub fn with_frequency(frequency: f64) -> Self {
        Self {
            queue: EventQueue::new(),
            timer: Timer::new(frequency),
            meter: FrequencyMeter::new(),
            control: Arc::new(EngineControl::new(frequency)),
            tick_count: 0,
        }
    }

    pub fn handle(&self) -> EngineHandle {
        EngineHandle {
            control: self.control.clone(),
            sink: self.queue.sink(),
        }
    }

    pub fn sink(&self) -> EventSink {
        self.queue.sink()
    }

    pub fn post(&self, event: Event) {
        self.queue.post(event);
    }

    pub fn add_listener(&mut self, listener: ListenerRef) {
        self.queue.add_listener(listener);
    }

    pub fn remove_listener(&mut self, listener: &ListenerRef) {
        self.queue.remove_listener(listener);
    }

    /// Number of completed ticks; the monotonic order over tick events.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Runs until stopped. While paused, sleeps in bounded increments and
    /// re-checks the pause flag instead of ticking.
    pub fn run(&mut self) {
        log::info!("engine loop starting at {} Hz", self.timer.frequency());
        self.timer.start();
        while !self.control.stopped.load(Ordering::Acquire) {
            if self.control.paused.load(Ordering::Acquire) {
                thread::sleep(PAUSE_POLL);
                continue;
            }
            self.tick_once();
        }
        log::info!("engine loop stopped after {} ticks", self.tick_count);
    }

    /// One loop iteration: post a tick event, drain the queue, sleep to the
    /// next deadline. Exposed for platform-driven loops and tests; `run`
    /// calls it in a loop.
    pub fn tick_once(&mut self) {
        if self.control.resume_requested.swap(false, Ordering::AcqRel) {
            self.timer.start();
        }
        let target = self.control.frequency();
        if target != self.timer.frequency() {
            self.timer.set_frequency(target);
        }
        self.meter.count();
        self.tick_count += 1;
        let event = TickEvent::new(self.timer.last_step_duration(), self.meter.frequency());
        self.queue.post(Event::Tick(event));
        self.queue.process_events();
        self.timer.tick();
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests/engine_tests.rs"]
mod tests;
