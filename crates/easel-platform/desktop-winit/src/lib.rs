//! Translates winit window events into Easel events. No event loop of its
//! own: callers feed `WindowEvent`s in and post the returned events to an
//! engine or view queue.

use easel_event::{
    Event, Key, KeyEvent, PointerButton, PointerButtons, PointerEvent, ScrollEvent,
};
use easel_graphics::Point;
use winit::dpi::PhysicalPosition;
use winit::event::{
    ElementState, MouseButton, MouseScrollDelta, VirtualKeyCode, WindowEvent,
};

/// Scroll lines are converted to this many logical pixels.
const LINE_HEIGHT: f32 = 16.0;

/// Stateful translator for one window: tracks the cursor position (winit
/// reports button changes without one), the pressed button set, and the
/// window's scale factor.
pub struct DesktopWinitPlatform {
    scale_factor: f64,
    cursor: Point,
    buttons: PointerButtons,
}

impl DesktopWinitPlatform {
    pub fn new(scale_factor: f64) -> Self {
        Self {
            scale_factor,
            cursor: Point::new(0.0, 0.0),
            buttons: PointerButtons::NONE,
        }
    }

    pub fn set_scale_factor(&mut self, factor: f64) {
        self.scale_factor = factor;
    }

    fn logical(&self, position: PhysicalPosition<f64>) -> Point {
        Point {
            x: (position.x / self.scale_factor) as f32,
            y: (position.y / self.scale_factor) as f32,
        }
    }

    /// Translates one window event. Returns `None` for events Easel does not
    /// model (focus, IME, resize bookkeeping).
    pub fn translate(&mut self, event: &WindowEvent<'_>) -> Option<Event> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                let logical = self.logical(*position);
                let dx = logical.x - self.cursor.x;
                let dy = logical.y - self.cursor.y;
                self.cursor = logical;
                Some(Event::PointerMove(
                    PointerEvent::new(0, logical)
                        .with_delta(dx, dy)
                        .with_buttons(self.buttons),
                ))
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let button = map_button(*button)?;
                let pressed = *state == ElementState::Pressed;
                if pressed {
                    self.buttons.insert(button);
                } else {
                    self.buttons.remove(button);
                }
                let pointer = PointerEvent::new(0, self.cursor).with_buttons(self.buttons);
                Some(if pressed {
                    Event::PointerDown(pointer)
                } else {
                    Event::PointerUp(pointer)
                })
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let (dx, dy) = match delta {
                    MouseScrollDelta::LineDelta(x, y) => (x * LINE_HEIGHT, y * LINE_HEIGHT),
                    MouseScrollDelta::PixelDelta(pos) => {
                        let logical = self.logical(*pos);
                        (logical.x, logical.y)
                    }
                };
                Some(Event::Scroll(ScrollEvent { dx, dy }))
            }
            WindowEvent::KeyboardInput { input, .. } => {
                let key = map_key(input.virtual_keycode?)?;
                Some(match input.state {
                    ElementState::Pressed => Event::KeyDown(KeyEvent::new(key)),
                    ElementState::Released => Event::KeyUp(KeyEvent::new(key)),
                })
            }
            WindowEvent::ReceivedCharacter(ch) if !ch.is_control() => {
                Some(Event::KeyTyped(*ch))
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.scale_factor = *scale_factor;
                None
            }
            _ => None,
        }
    }
}

impl Default for DesktopWinitPlatform {
    fn default() -> Self {
        Self::new(1.0)
    }
}

fn map_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Primary),
        MouseButton::Right => Some(PointerButton::Secondary),
        MouseButton::Middle => Some(PointerButton::Middle),
        MouseButton::Other(_) => None,
    }
}

fn map_key(code: VirtualKeyCode) -> Option<Key> {
    let key = match code {
        VirtualKeyCode::Left => Key::Left,
        VirtualKeyCode::Right => Key::Right,
        VirtualKeyCode::Up => Key::Up,
        VirtualKeyCode::Down => Key::Down,
        VirtualKeyCode::Space => Key::Space,
        VirtualKeyCode::Return | VirtualKeyCode::NumpadEnter => Key::Enter,
        VirtualKeyCode::Escape => Key::Escape,
        VirtualKeyCode::Back => Key::Backspace,
        VirtualKeyCode::Delete => Key::Delete,
        VirtualKeyCode::Tab => Key::Tab,
        VirtualKeyCode::LShift | VirtualKeyCode::RShift => Key::Shift,
        VirtualKeyCode::LControl | VirtualKeyCode::RControl => Key::Ctrl,
        VirtualKeyCode::LAlt | VirtualKeyCode::RAlt => Key::Alt,
        VirtualKeyCode::A => Key::Char('a'),
        VirtualKeyCode::B => Key::Char('b'),
        VirtualKeyCode::C => Key::Char('c'),
        VirtualKeyCode::D => Key::Char('d'),
        VirtualKeyCode::E => Key::Char('e'),
        VirtualKeyCode::F => Key::Char('f'),
        VirtualKeyCode::G => Key::Char('g'),
        VirtualKeyCode::H => Key::Char('h'),
        VirtualKeyCode::I => Key::Char('i'),
        VirtualKeyCode::J => Key::Char('j'),
        VirtualKeyCode::K => Key::Char('k'),
        VirtualKeyCode::L => Key::Char('l'),
        VirtualKeyCode::M => Key::Char('m'),
        VirtualKeyCode::N => Key::Char('n'),
        VirtualKeyCode::O => Key::Char('o'),
        VirtualKeyCode::P => Key::Char('p'),
        VirtualKeyCode::Q => Key::Char('q'),
        VirtualKeyCode::R => Key::Char('r'),
        VirtualKeyCode::S => Key::Char('s'),
        VirtualKeyCode::T => Key::Char('t'),
        VirtualKeyCode::U => Key::Char('u'),
        VirtualKeyCode::V => Key::Char('v'),
        VirtualKeyCode::W => Key::Char('w'),
        VirtualKeyCode::X => Key::Char('x'),
        VirtualKeyCode::Y => Key::Char('y'),
        VirtualKeyCode::Z => Key::Char('z'),
        VirtualKeyCode::Key0 | VirtualKeyCode::Numpad0 => Key::Char('0'),
        VirtualKeyCode::Key1 | VirtualKeyCode::Numpad1 => Key::Char('1'),
        VirtualKeyCode::Key2 | VirtualKeyCode::Numpad2 => Key::Char('2'),
        VirtualKeyCode::Key3 | VirtualKeyCode::Numpad3 => Key::Char('3'),
        VirtualKeyCode::Key4 | VirtualKeyCode::Numpad4 => Key::Char('4'),
        VirtualKeyCode::Key5 | VirtualKeyCode::Numpad5 => Key::Char('5'),
        VirtualKeyCode::Key6 | VirtualKeyCode::Numpad6 => Key::Char('6'),
        VirtualKeyCode::Key7 | VirtualKeyCode::Numpad7 => Key::Char('7'),
        VirtualKeyCode::Key8 | VirtualKeyCode::Numpad8 => Key::Char('8'),
        VirtualKeyCode::Key9 | VirtualKeyCode::Numpad9 => Key::Char('9'),
        _ => return None,
    };
    Some(key)
}
