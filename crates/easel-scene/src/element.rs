use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use easel_canvas::Canvas;
use easel_event::Subscriber;

use crate::view::ViewShared;

/// Shared handle to an element. Identity is by pointer; the same handle is
/// what gets added to a view and registered as an event listener.
pub type SharedElement = Arc<Mutex<dyn Element + Send>>;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// A single drawable, orderable member of a [`crate::View`].
///
/// Elements opt into event delivery through their [`Subscriber`] probes; the
/// hosting view registers them with its event queue when their insertion
/// commits. Position and rotation are read back each frame to seed the world
/// transform around [`Element::draw`].
pub trait Element: Subscriber + Send {
    fn common(&self) -> &ElementCommon;
    fn common_mut(&mut self) -> &mut ElementCommon;

    fn draw(&mut self, canvas: &mut Canvas);

    fn x(&self) -> f32 {
        0.0
    }

    fn y(&self) -> f32 {
        0.0
    }

    /// Rotation in radians, counter-clockwise.
    fn angle_rad(&self) -> f32 {
        0.0
    }
}

/// Per-element bookkeeping embedded by every element implementation.
///
/// Holds the draw-order key, the optional name, the pinned flag, and a
/// non-owning link to the hosting view's shared state. The link never
/// extends the view's lifetime; a detached or orphaned element simply stops
/// notifying anyone.
pub struct ElementCommon {
    id: u64,
    draw_order: i32,
    name: Option<String>,
    pinned: bool,
    host: Weak<ViewShared>,
}

impl ElementCommon {
    pub fn new() -> Self {
        Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            draw_order: 0,
            name: None,
            pinned: false,
            host: Weak::new(),
        }
    }

    pub fn draw_order(&self) -> i32 {
        self.draw_order
    }

    /// Mutates the key immediately but only invalidates the host's sorted
    /// cache; the re-sort is batched until the next commit.
    pub fn set_draw_order(&mut self, draw_order: i32) {
        if self.draw_order == draw_order {
            return;
        }
        self.draw_order = draw_order;
        if let Some(shared) = self.host.upgrade() {
            shared.mark_order_dirty();
        }
    }

    /// The element's name, defaulting to `"element"` when none was set.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or("element")
    }

    /// Renames the element. Re-indexes immediately when attached, so name
    /// lookups never go stale between commits.
    pub fn set_name(&mut self, name: impl Into<String>) {
        let new = name.into();
        if self.name.as_deref() == Some(new.as_str()) {
            return;
        }
        let old = self.name().to_owned();
        self.name = Some(new.clone());
        if let Some(shared) = self.host.upgrade() {
            shared.rename(self.id, &old, new);
        }
    }

    /// Whether the element positions in canvas space (true) or world space
    /// (false).
    pub fn pinned(&self) -> bool {
        self.pinned
    }

    pub fn set_pinned(&mut self, pinned: bool) {
        self.pinned = pinned;
    }

    pub fn is_attached(&self) -> bool {
        self.host.strong_count() > 0
    }

    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    pub(crate) fn host(&self) -> Weak<ViewShared> {
        self.host.clone()
    }

    pub(crate) fn attach(&mut self, host: Weak<ViewShared>) {
        self.host = host;
    }

    pub(crate) fn detach(&mut self) {
        self.host = Weak::new();
    }
}

impl Default for ElementCommon {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests/element_tests.rs"]
mod tests;
