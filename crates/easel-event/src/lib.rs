//! Event model and buffered dispatch for Easel.
//!
//! Events are posted from any thread through an [`EventSink`] and delivered on
//! the tick thread by [`EventQueue::process_events`]. Listeners declare the
//! event roles they handle through the [`Subscriber`] probes; the queue caches
//! the probe results once at registration and never re-inspects a listener
//! during delivery.

mod event;
mod listener;
mod queue;

pub use event::*;
pub use listener::*;
pub use queue::*;
