use super::*;
use std::sync::Mutex;

use easel_event::{Subscriber, TickListener};

struct TickRecorder {
    events: Arc<Mutex<Vec<TickEvent>>>,
}

impl TickListener for TickRecorder {
    fn on_tick(&mut self, event: &TickEvent) {
        self.events.lock().unwrap().push(*event);
    }
}

impl Subscriber for TickRecorder {
    fn as_tick_listener(&mut self) -> Option<&mut dyn TickListener> {
        Some(self)
    }
}

fn recorder() -> (ListenerRef, Arc<Mutex<Vec<TickEvent>>>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let listener: ListenerRef = Arc::new(Mutex::new(TickRecorder {
        events: events.clone(),
    }));
    (listener, events)
}

#[test]
fn tick_once_delivers_one_tick_event() {
    let mut engine = Engine::with_frequency(500.0);
    let (listener, events) = recorder();
    engine.add_listener(listener);
    engine.tick_once();
    assert_eq!(events.lock().unwrap().len(), 1);
    assert_eq!(engine.tick_count(), 1);
}

#[test]
fn ticks_are_strictly_ordered() {
    let mut engine = Engine::with_frequency(500.0);
    let (listener, events) = recorder();
    engine.add_listener(listener);
    for _ in 0..3 {
        engine.tick_once();
    }
    assert_eq!(engine.tick_count(), 3);
    let events = events.lock().unwrap();
    assert_eq!(events.len(), 3);
    for event in events.iter() {
        assert!(event.duration > Duration::ZERO);
    }
}

#[test]
fn resume_resets_the_timer_baseline() {
    let mut engine = Engine::with_frequency(200.0);
    let handle = engine.handle();
    let (listener, events) = recorder();
    engine.add_listener(listener);
    engine.tick_once();
    handle.pause();
    thread::sleep(Duration::from_millis(80));
    handle.resume();
    engine.tick_once();
    let events = events.lock().unwrap();
    let resumed = events.last().unwrap();
    assert!(
        resumed.duration < Duration::from_millis(60),
        "first resumed tick reported {:?}",
        resumed.duration
    );
}

#[test]
fn stop_terminates_the_run_loop() {
    let mut engine = Engine::with_frequency(500.0);
    let handle = engine.handle();
    let worker = thread::spawn(move || {
        engine.run();
        engine.tick_count()
    });
    thread::sleep(Duration::from_millis(30));
    handle.stop();
    let ticks = worker.join().unwrap();
    assert!(ticks > 0);
    assert!(handle.is_stopped());
}

#[test]
fn paused_engine_stops_delivering_ticks() {
    let mut engine = Engine::with_frequency(500.0);
    let handle = engine.handle();
    handle.pause();
    let (listener, events) = recorder();
    engine.add_listener(listener);
    let worker = thread::spawn(move || {
        engine.run();
    });
    thread::sleep(Duration::from_millis(50));
    let while_paused = events.lock().unwrap().len();
    handle.stop();
    worker.join().unwrap();
    assert_eq!(while_paused, 0);
}

#[test]
fn handle_retargets_the_frequency() {
    let engine = Engine::with_frequency(60.0);
    let handle = engine.handle();
    assert_eq!(handle.target_frequency(), 60.0);
    handle.set_target_frequency(120.0);
    assert_eq!(handle.target_frequency(), 120.0);
}

#[test]
#[should_panic(expected = "target frequency must be positive")]
fn non_positive_target_frequency_panics() {
    let engine = Engine::new();
    engine.handle().set_target_frequency(0.0);
}
