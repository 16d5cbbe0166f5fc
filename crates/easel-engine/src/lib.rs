//! The Easel tick driver and application engine.
//!
//! An [`Engine`] runs the frame loop: each tick it posts a [`easel_event::TickEvent`]
//! to the process-wide event queue, drains the queue to all registered
//! listeners, and sleeps to the next deadline. Views join the loop through a
//! [`ViewDriver`]; pause, resume, stop, and retargeting go through the
//! cloneable [`EngineHandle`]. Resource loading never fails the caller:
//! missing images and typefaces degrade to documented fallback values.

mod assets;
mod driver;
mod engine;
mod timer;

pub use assets::{default_image, FsImageLoader, FsTypefaceLoader, ImageLoader, TypefaceLoader};
pub use driver::ViewDriver;
pub use engine::{Engine, EngineHandle};
pub use timer::{FrequencyMeter, Timer};
