use std::time::Duration;

use easel_graphics::Point;

pub type PointerId = u64;

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary = 0,
    Secondary = 1,
    Middle = 2,
    Back = 3,
    Forward = 4,
}

/// Bitset of pressed pointer buttons.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PointerButtons(u8);

impl PointerButtons {
    pub const NONE: Self = Self(0);

    pub fn new() -> Self {
        Self::NONE
    }

    pub fn with(mut self, button: PointerButton) -> Self {
        self.insert(button);
        self
    }

    pub fn insert(&mut self, button: PointerButton) {
        self.0 |= 1 << (button as u8);
    }

    pub fn remove(&mut self, button: PointerButton) {
        self.0 &= !(1 << (button as u8));
    }

    pub fn contains(&self, button: PointerButton) -> bool {
        (self.0 & (1 << (button as u8))) != 0
    }
}

/// A pointer sample: position, net delta since the previous delivered sample,
/// and the button state at sample time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub id: PointerId,
    pub position: Point,
    pub dx: f32,
    pub dy: f32,
    pub buttons: PointerButtons,
}

impl PointerEvent {
    pub fn new(id: PointerId, position: Point) -> Self {
        Self {
            id,
            position,
            dx: 0.0,
            dy: 0.0,
            buttons: PointerButtons::NONE,
        }
    }

    pub fn with_delta(mut self, dx: f32, dy: f32) -> Self {
        self.dx = dx;
        self.dy = dy;
        self
    }

    pub fn with_buttons(mut self, buttons: PointerButtons) -> Self {
        self.buttons = buttons;
        self
    }
}

/// One iteration of the frame loop: measured duration of the previous step
/// and the instantaneous achieved frequency.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickEvent {
    pub duration: Duration,
    pub frequency: f64,
}

impl TickEvent {
    pub fn new(duration: Duration, frequency: f64) -> Self {
        Self {
            duration,
            frequency,
        }
    }

    /// The frame duration in seconds, the form physics steppers consume.
    pub fn dt(&self) -> f32 {
        self.duration.as_secs_f32()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Space,
    Enter,
    Escape,
    Backspace,
    Delete,
    Tab,
    Shift,
    Ctrl,
    Alt,
    Char(char),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub repeat: bool,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self { key, repeat: false }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollEvent {
    pub dx: f32,
    pub dy: f32,
}

/// Posted by widgets and program code to signal an activation, carrying the
/// name of the source element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionEvent {
    pub name: String,
}

impl ActionEvent {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// An event buffered by an [`crate::EventQueue`]. Plain `Send` data.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Tick(TickEvent),
    PointerDown(PointerEvent),
    PointerMove(PointerEvent),
    PointerUp(PointerEvent),
    KeyDown(KeyEvent),
    KeyUp(KeyEvent),
    KeyTyped(char),
    Scroll(ScrollEvent),
    Action(ActionEvent),
}
