use std::sync::{Arc, Mutex};

use easel_event::{
    AnyEventListener, Event, PointerDownListener, PointerEvent, PointerMoveListener,
    PointerUpListener, Subscriber, TickEvent, TickListener,
};

/// Records every tick event it receives.
pub struct TickRecorder {
    ticks: Arc<Mutex<Vec<TickEvent>>>,
}

impl TickRecorder {
    pub fn new() -> (Self, Arc<Mutex<Vec<TickEvent>>>) {
        let ticks = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                ticks: ticks.clone(),
            },
            ticks,
        )
    }
}

impl TickListener for TickRecorder {
    fn on_tick(&mut self, event: &TickEvent) {
        self.ticks.lock().unwrap().push(*event);
    }
}

impl Subscriber for TickRecorder {
    fn as_tick_listener(&mut self) -> Option<&mut dyn TickListener> {
        Some(self)
    }
}

/// Records pointer down, move, and up events in delivery order.
pub struct PointerRecorder {
    events: Arc<Mutex<Vec<Event>>>,
}

impl PointerRecorder {
    pub fn new() -> (Self, Arc<Mutex<Vec<Event>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                events: events.clone(),
            },
            events,
        )
    }
}

impl PointerDownListener for PointerRecorder {
    fn on_pointer_down(&mut self, event: &PointerEvent) {
        self.events.lock().unwrap().push(Event::PointerDown(*event));
    }
}

impl PointerMoveListener for PointerRecorder {
    fn on_pointer_move(&mut self, event: &PointerEvent) {
        self.events.lock().unwrap().push(Event::PointerMove(*event));
    }
}

impl PointerUpListener for PointerRecorder {
    fn on_pointer_up(&mut self, event: &PointerEvent) {
        self.events.lock().unwrap().push(Event::PointerUp(*event));
    }
}

impl Subscriber for PointerRecorder {
    fn as_pointer_down_listener(&mut self) -> Option<&mut dyn PointerDownListener> {
        Some(self)
    }

    fn as_pointer_move_listener(&mut self) -> Option<&mut dyn PointerMoveListener> {
        Some(self)
    }

    fn as_pointer_up_listener(&mut self) -> Option<&mut dyn PointerUpListener> {
        Some(self)
    }
}

/// Panics on every event it receives. For fault-isolation assertions.
pub struct PanickingListener;

impl AnyEventListener for PanickingListener {
    fn on_event(&mut self, _event: &Event) {
        panic!("scripted listener panic");
    }
}

impl Subscriber for PanickingListener {
    fn as_any_event_listener(&mut self) -> Option<&mut dyn AnyEventListener> {
        Some(self)
    }
}
