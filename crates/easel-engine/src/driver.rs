use std::sync::{Arc, Mutex};

use easel_event::{
    AnyEventListener, Event, EventSink, ListenerRef, Subscriber, TickEvent, TickListener,
};
use easel_scene::View;

/// Adapter that puts a [`View`] on an engine's event stream.
///
/// Registered as a listener on the engine queue, it forwards every event
/// into the view's own queue (so attached elements receive input and ticks)
/// and then, on each tick, runs the view's commit/dispatch/draw cycle. The
/// forward happens before the tick within the same delivery, so an event
/// posted to the engine is visible to elements on that very tick.
pub struct ViewDriver {
    view: View,
    sink: EventSink,
}

impl ViewDriver {
    /// Wraps `view` for registration. Use [`ViewDriver::into_listener`] to
    /// get the handle to register with the engine.
    pub fn new(view: View) -> Self {
        let sink = view.event_sink();
        Self { view, sink }
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut View {
        &mut self.view
    }

    pub fn into_listener(self) -> (Arc<Mutex<ViewDriver>>, ListenerRef) {
        let driver = Arc::new(Mutex::new(self));
        let listener: ListenerRef = driver.clone();
        (driver, listener)
    }
}

impl AnyEventListener for ViewDriver {
    fn on_event(&mut self, event: &Event) {
        self.sink.post(event.clone());
    }
}

impl TickListener for ViewDriver {
    fn on_tick(&mut self, event: &TickEvent) {
        self.view.tick(event);
    }
}

impl Subscriber for ViewDriver {
    fn as_tick_listener(&mut self) -> Option<&mut dyn TickListener> {
        Some(self)
    }

    fn as_any_event_listener(&mut self) -> Option<&mut dyn AnyEventListener> {
        Some(self)
    }
}
