use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use hashbrown::HashMap;

use crate::event::{Event, PointerId};
use crate::listener::{Capabilities, ListenerRef, Subscriber};

/// Pending buffer shared between producers and the draining queue. One mutex
/// scope guards the event list and the coalescing index together.
struct PendingEvents {
    events: Vec<Event>,
    coalesce: bool,
    /// Index of the latest buffered motion event per pointer id, valid until
    /// the next drain.
    motion_index: HashMap<PointerId, usize>,
}

impl PendingEvents {
    fn new() -> Self {
        Self {
            events: Vec::new(),
            coalesce: false,
            motion_index: HashMap::new(),
        }
    }

    fn push(&mut self, event: Event) {
        if self.coalesce {
            if let Event::PointerMove(sample) = &event {
                if let Some(&index) = self.motion_index.get(&sample.id) {
                    if let Event::PointerMove(merged) = &mut self.events[index] {
                        merged.dx += sample.dx;
                        merged.dy += sample.dy;
                        merged.position = sample.position;
                        merged.buttons = sample.buttons;
                        return;
                    }
                }
                self.motion_index.insert(sample.id, self.events.len());
            }
        }
        self.events.push(event);
    }

    fn drain(&mut self) -> Vec<Event> {
        self.motion_index.clear();
        std::mem::take(&mut self.events)
    }
}

/// Cloneable, `Send` handle for posting events from any thread.
#[derive(Clone)]
pub struct EventSink {
    pending: Arc<Mutex<PendingEvents>>,
}

impl EventSink {
    /// Appends an event to the pending buffer. Never blocks beyond the
    /// buffer mutex.
    pub fn post(&self, event: Event) {
        lock_ignore_poison(&self.pending).push(event);
    }
}

struct Registration {
    target: ListenerRef,
    caps: Capabilities,
}

enum ListenerChange {
    Add(ListenerRef),
    Remove(ListenerRef),
}

/// Buffers posted events and delivers them to registered listeners.
///
/// Posting is safe from any thread through [`EventQueue::sink`]; listener
/// registration and [`EventQueue::process_events`] belong to the owning tick
/// context. Registration changes take effect at the start of the next
/// delivery pass.
pub struct EventQueue {
    pending: Arc<Mutex<PendingEvents>>,
    listeners: Vec<Registration>,
    changes: Vec<ListenerChange>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self {
            pending: Arc::new(Mutex::new(PendingEvents::new())),
            listeners: Vec::new(),
            changes: Vec::new(),
        }
    }

    /// Returns a `Send + Clone` posting handle backed by this queue's buffer.
    pub fn sink(&self) -> EventSink {
        EventSink {
            pending: Arc::clone(&self.pending),
        }
    }

    /// Appends an event to the pending buffer.
    pub fn post(&self, event: Event) {
        lock_ignore_poison(&self.pending).push(event);
    }

    /// Enables or disables pointer-motion coalescing. While enabled, motion
    /// samples from the same pointer id buffered between two delivery passes
    /// collapse into one event carrying the net delta.
    pub fn set_coalescing(&self, enabled: bool) {
        let mut pending = lock_ignore_poison(&self.pending);
        pending.coalesce = enabled;
        if !enabled {
            pending.motion_index.clear();
        }
    }

    pub fn coalescing(&self) -> bool {
        lock_ignore_poison(&self.pending).coalesce
    }

    /// Registers a listener; effective on the next delivery pass. Adding a
    /// listener twice is a no-op.
    pub fn add_listener(&mut self, listener: ListenerRef) {
        self.changes.push(ListenerChange::Add(listener));
    }

    /// Unregisters a listener; effective on the next delivery pass.
    pub fn remove_listener(&mut self, listener: &ListenerRef) {
        self.changes.push(ListenerChange::Remove(Arc::clone(listener)));
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Single-threaded drain: applies pending registration changes, swaps the
    /// event buffer for an empty one, then delivers each event to every
    /// listener with a matching capability, in listener-registration order
    /// within event-post order. Must only be invoked from the owning tick
    /// context.
    pub fn process_events(&mut self) {
        self.apply_listener_changes();
        let events = lock_ignore_poison(&self.pending).drain();
        for event in &events {
            let required = Capabilities::required_for(event);
            for registration in &self.listeners {
                let wants_role = registration.caps.contains(required);
                let wants_all = registration.caps.contains(Capabilities::ANY_EVENT);
                if !wants_role && !wants_all {
                    continue;
                }
                deliver(registration, event, wants_role, wants_all);
            }
        }
    }

    fn apply_listener_changes(&mut self) {
        for change in self.changes.drain(..) {
            match change {
                ListenerChange::Add(listener) => {
                    let duplicate = self
                        .listeners
                        .iter()
                        .any(|r| Arc::ptr_eq(&r.target, &listener));
                    if duplicate {
                        continue;
                    }
                    let caps = Capabilities::probe(&mut *lock_ignore_poison(&listener));
                    if caps.is_empty() {
                        log::debug!("listener registered without any event roles");
                    }
                    self.listeners.push(Registration {
                        target: listener,
                        caps,
                    });
                }
                ListenerChange::Remove(listener) => {
                    self.listeners.retain(|r| !Arc::ptr_eq(&r.target, &listener));
                }
            }
        }
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// Delivers one event to one listener, isolating panics so a faulting
/// listener cannot starve the remaining ones.
fn deliver(registration: &Registration, event: &Event, wants_role: bool, wants_all: bool) {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let mut guard = lock_ignore_poison(&registration.target);
        let subscriber: &mut dyn Subscriber = &mut *guard;
        if wants_all {
            if let Some(listener) = subscriber.as_any_event_listener() {
                listener.on_event(event);
            }
        }
        if wants_role {
            dispatch_role(subscriber, event);
        }
    }));
    if outcome.is_err() {
        log::error!("event listener panicked during delivery of {event:?}; continuing");
    }
}

fn dispatch_role(subscriber: &mut dyn Subscriber, event: &Event) {
    match event {
        Event::Tick(e) => {
            if let Some(listener) = subscriber.as_tick_listener() {
                listener.on_tick(e);
            }
        }
        Event::PointerDown(e) => {
            if let Some(listener) = subscriber.as_pointer_down_listener() {
                listener.on_pointer_down(e);
            }
        }
        Event::PointerMove(e) => {
            if let Some(listener) = subscriber.as_pointer_move_listener() {
                listener.on_pointer_move(e);
            }
        }
        Event::PointerUp(e) => {
            if let Some(listener) = subscriber.as_pointer_up_listener() {
                listener.on_pointer_up(e);
            }
        }
        Event::KeyDown(e) => {
            if let Some(listener) = subscriber.as_key_down_listener() {
                listener.on_key_down(e);
            }
        }
        Event::KeyUp(e) => {
            if let Some(listener) = subscriber.as_key_up_listener() {
                listener.on_key_up(e);
            }
        }
        Event::KeyTyped(ch) => {
            if let Some(listener) = subscriber.as_key_typed_listener() {
                listener.on_key_typed(*ch);
            }
        }
        Event::Scroll(e) => {
            if let Some(listener) = subscriber.as_scroll_listener() {
                listener.on_scroll(e);
            }
        }
        Event::Action(e) => {
            if let Some(listener) = subscriber.as_action_listener() {
                listener.on_action(e);
            }
        }
    }
}

/// Listener panics can poison the mutexes they were caught holding; the data
/// stays usable for delivery purposes, so poisoning is ignored throughout.
pub fn lock_ignore_poison<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
#[path = "tests/queue_tests.rs"]
mod tests;
