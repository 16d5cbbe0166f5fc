use std::sync::{Arc, Mutex};

use crate::event::{ActionEvent, Event, KeyEvent, PointerEvent, ScrollEvent, TickEvent};

pub trait TickListener {
    fn on_tick(&mut self, event: &TickEvent);
}

pub trait PointerDownListener {
    fn on_pointer_down(&mut self, event: &PointerEvent);
}

pub trait PointerMoveListener {
    fn on_pointer_move(&mut self, event: &PointerEvent);
}

pub trait PointerUpListener {
    fn on_pointer_up(&mut self, event: &PointerEvent);
}

pub trait KeyDownListener {
    fn on_key_down(&mut self, event: &KeyEvent);
}

pub trait KeyUpListener {
    fn on_key_up(&mut self, event: &KeyEvent);
}

pub trait KeyTypedListener {
    fn on_key_typed(&mut self, ch: char);
}

pub trait ScrollListener {
    fn on_scroll(&mut self, event: &ScrollEvent);
}

pub trait ActionListener {
    fn on_action(&mut self, event: &ActionEvent);
}

/// Receives every event before role-specific dispatch. Used to forward a
/// queue's traffic into another queue (a view subscribing to the engine).
pub trait AnyEventListener {
    fn on_event(&mut self, event: &Event);
}

/// An object that can be registered with an [`crate::EventQueue`].
///
/// Each probe defaults to `None`; implementors override the probes for the
/// roles they handle. The queue calls every probe exactly once when the
/// listener is registered and caches the answers as a [`Capabilities`]
/// bitset, so delivery never re-inspects the listener.
pub trait Subscriber {
    fn as_tick_listener(&mut self) -> Option<&mut dyn TickListener> {
        None
    }
    fn as_pointer_down_listener(&mut self) -> Option<&mut dyn PointerDownListener> {
        None
    }
    fn as_pointer_move_listener(&mut self) -> Option<&mut dyn PointerMoveListener> {
        None
    }
    fn as_pointer_up_listener(&mut self) -> Option<&mut dyn PointerUpListener> {
        None
    }
    fn as_key_down_listener(&mut self) -> Option<&mut dyn KeyDownListener> {
        None
    }
    fn as_key_up_listener(&mut self) -> Option<&mut dyn KeyUpListener> {
        None
    }
    fn as_key_typed_listener(&mut self) -> Option<&mut dyn KeyTypedListener> {
        None
    }
    fn as_scroll_listener(&mut self) -> Option<&mut dyn ScrollListener> {
        None
    }
    fn as_action_listener(&mut self) -> Option<&mut dyn ActionListener> {
        None
    }
    fn as_any_event_listener(&mut self) -> Option<&mut dyn AnyEventListener> {
        None
    }
}

/// Shared handle to a registered listener. Identity is by pointer.
pub type ListenerRef = Arc<Mutex<dyn Subscriber + Send>>;

/// Bitset of the event roles a listener declared at registration time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Capabilities(u16);

impl Capabilities {
    pub const NONE: Self = Self(0);
    pub const TICK: Self = Self(1 << 0);
    pub const POINTER_DOWN: Self = Self(1 << 1);
    pub const POINTER_MOVE: Self = Self(1 << 2);
    pub const POINTER_UP: Self = Self(1 << 3);
    pub const KEY_DOWN: Self = Self(1 << 4);
    pub const KEY_UP: Self = Self(1 << 5);
    pub const KEY_TYPED: Self = Self(1 << 6);
    pub const SCROLL: Self = Self(1 << 7);
    pub const ACTION: Self = Self(1 << 8);
    pub const ANY_EVENT: Self = Self(1 << 9);

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Probes a subscriber once for every role it implements.
    pub fn probe(subscriber: &mut dyn Subscriber) -> Self {
        let mut caps = Self::NONE;
        if subscriber.as_tick_listener().is_some() {
            caps.insert(Self::TICK);
        }
        if subscriber.as_pointer_down_listener().is_some() {
            caps.insert(Self::POINTER_DOWN);
        }
        if subscriber.as_pointer_move_listener().is_some() {
            caps.insert(Self::POINTER_MOVE);
        }
        if subscriber.as_pointer_up_listener().is_some() {
            caps.insert(Self::POINTER_UP);
        }
        if subscriber.as_key_down_listener().is_some() {
            caps.insert(Self::KEY_DOWN);
        }
        if subscriber.as_key_up_listener().is_some() {
            caps.insert(Self::KEY_UP);
        }
        if subscriber.as_key_typed_listener().is_some() {
            caps.insert(Self::KEY_TYPED);
        }
        if subscriber.as_scroll_listener().is_some() {
            caps.insert(Self::SCROLL);
        }
        if subscriber.as_action_listener().is_some() {
            caps.insert(Self::ACTION);
        }
        if subscriber.as_any_event_listener().is_some() {
            caps.insert(Self::ANY_EVENT);
        }
        caps
    }

    /// The capability a listener needs to receive `event` through its role
    /// trait.
    pub fn required_for(event: &Event) -> Self {
        match event {
            Event::Tick(_) => Self::TICK,
            Event::PointerDown(_) => Self::POINTER_DOWN,
            Event::PointerMove(_) => Self::POINTER_MOVE,
            Event::PointerUp(_) => Self::POINTER_UP,
            Event::KeyDown(_) => Self::KEY_DOWN,
            Event::KeyUp(_) => Self::KEY_UP,
            Event::KeyTyped(_) => Self::KEY_TYPED,
            Event::Scroll(_) => Self::SCROLL,
            Event::Action(_) => Self::ACTION,
        }
    }
}

#[cfg(test)]
#[path = "tests/listener_tests.rs"]
mod tests;
