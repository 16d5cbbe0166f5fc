//! Test doubles for Easel: observable surfaces, a call-recording canvas
//! backend, and scripted event listeners. Everything here is deterministic
//! and raster-backed so assertions can inspect real pixel output.

mod backend;
mod listeners;
mod surface;

pub use backend::{DrawCall, RecordingBackend};
pub use listeners::{PanickingListener, PointerRecorder, TickRecorder};
pub use surface::{TestSurface, TestSurfaceControl, TestSurfaceProvider};
