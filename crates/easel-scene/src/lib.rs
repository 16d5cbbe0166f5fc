//! Scene composition for Easel: elements, the scene container ([`View`]),
//! and the per-tick commit/dispatch/draw cycle.
//!
//! Structural mutation is asynchronous by design: [`View::add`] and
//! [`View::remove`] only queue membership changes, which become visible at
//! the next commit. Draw and event dispatch therefore always iterate a
//! stable, fully-formed element list. `add`, `remove`, and event posting are
//! the only operations safe to call from arbitrary threads; everything else
//! belongs to the single tick/draw thread.

mod element;
mod physics;
mod surface;
mod view;

pub use element::{Element, ElementCommon, SharedElement};
pub use physics::PhysicsStepper;
pub use surface::{FeatureSet, Surface, SurfaceError, SurfaceProvider, SurfaceState, ViewFeature};
pub use view::{View, ViewHandle};
