use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use easel_canvas::{Canvas, RasterBackend};
use easel_event::{lock_ignore_poison, Event, EventQueue, EventSink, ListenerRef, TickEvent};
use indexmap::IndexMap;

use crate::element::SharedElement;
use crate::physics::PhysicsStepper;
use crate::surface::{
    FeatureSet, Surface, SurfaceError, SurfaceProvider, SurfaceState, ViewFeature,
};

type ElementHook = Box<dyn FnMut(&SharedElement) + Send>;

/// State shared between a [`View`], its elements, and its [`ViewHandle`]s.
///
/// Only the pending sets and the name index live behind the mutex; the
/// committed list is mutated exclusively during commit, on the tick thread.
/// Lock discipline: code holding this mutex never waits on an element's
/// mutex, so element mutators are free to call back in (rename, draw-order
/// invalidation) while locked.
pub(crate) struct ViewShared {
    sets: Mutex<ElementSets>,
    order_dirty: AtomicBool,
}

#[derive(Default)]
struct ElementSets {
    committed: Vec<SharedElement>,
    pending_insertions: Vec<SharedElement>,
    pending_removals: Vec<SharedElement>,
    names: IndexMap<String, Vec<(u64, SharedElement)>>,
}

fn contains(list: &[SharedElement], element: &SharedElement) -> bool {
    list.iter().any(|e| Arc::ptr_eq(e, element))
}

fn remove_name_entry(
    names: &mut IndexMap<String, Vec<(u64, SharedElement)>>,
    name: &str,
    id: u64,
) {
    let now_empty = match names.get_mut(name) {
        Some(bucket) => {
            bucket.retain(|(entry_id, _)| *entry_id != id);
            bucket.is_empty()
        }
        None => false,
    };
    if now_empty {
        names.shift_remove(name);
    }
}

impl ViewShared {
    fn new() -> Self {
        Self {
            sets: Mutex::new(ElementSets::default()),
            order_dirty: AtomicBool::new(false),
        }
    }

    /// Queues an insertion. Last operation wins: a pending removal of the
    /// same element is cancelled instead (the element simply stays
    /// attached). Idempotent.
    fn add(&self, element: &SharedElement) {
        let mut sets = lock_ignore_poison(&self.sets);
        if let Some(pos) = sets
            .pending_removals
            .iter()
            .position(|e| Arc::ptr_eq(e, element))
        {
            sets.pending_removals.remove(pos);
            return;
        }
        if contains(&sets.committed, element) || contains(&sets.pending_insertions, element) {
            return;
        }
        sets.pending_insertions.push(element.clone());
    }

    /// Queues a removal, symmetric to [`ViewShared::add`]: a pending
    /// insertion is cancelled, an attached element moves to pending removal,
    /// anything else is a no-op.
    fn remove(&self, element: &SharedElement) {
        let mut sets = lock_ignore_poison(&self.sets);
        if let Some(pos) = sets
            .pending_insertions
            .iter()
            .position(|e| Arc::ptr_eq(e, element))
        {
            sets.pending_insertions.remove(pos);
            return;
        }
        if contains(&sets.committed, element) && !contains(&sets.pending_removals, element) {
            sets.pending_removals.push(element.clone());
        }
    }

    pub(crate) fn mark_order_dirty(&self) {
        self.order_dirty.store(true, Ordering::Release);
    }

    /// Moves an element between name buckets. Called by
    /// [`crate::ElementCommon::set_name`] while the element's own mutex is
    /// held, which is safe under the lock discipline above.
    pub(crate) fn rename(&self, id: u64, old: &str, new: String) {
        let mut sets = lock_ignore_poison(&self.sets);
        let moved = match sets.names.get_mut(old) {
            Some(bucket) => match bucket.iter().position(|(entry_id, _)| *entry_id == id) {
                Some(pos) => Some(bucket.remove(pos)),
                None => None,
            },
            None => None,
        };
        if let Some(entry) = moved {
            if sets.names.get(old).is_some_and(|bucket| bucket.is_empty()) {
                sets.names.shift_remove(old);
            }
            sets.names.entry(new).or_default().push(entry);
        }
    }
}

/// Cloneable, thread-safe handle for mutating a view's membership and
/// posting events from producer threads (platform callbacks, worker
/// threads). Holds no strong reference to the view's surface or canvases.
#[derive(Clone)]
pub struct ViewHandle {
    shared: Arc<ViewShared>,
    sink: EventSink,
}

impl ViewHandle {
    /// Queues `element` for insertion at the next commit.
    pub fn add(&self, element: &SharedElement) {
        self.shared.add(element);
    }

    /// Queues `element` for removal at the next commit.
    pub fn remove(&self, element: &SharedElement) {
        self.shared.remove(element);
    }

    /// Posts an event to the view's queue.
    pub fn post(&self, event: Event) {
        self.sink.post(event);
    }
}

/// The scene container: owns the committed element set, the background and
/// foreground canvases, a per-view event queue, and the per-tick
/// commit/dispatch/draw cycle.
///
/// A view lives on the tick/draw thread. Cross-thread mutation goes through
/// [`ViewHandle`]; the only effects visible to other threads are queued
/// membership changes and posted events, both committed at well-defined
/// points of the next tick.
pub struct View {
    shared: Arc<ViewShared>,
    queue: EventQueue,
    background: Canvas,
    foreground: Canvas,
    surface: Box<dyn Surface>,
    provider: Box<dyn SurfaceProvider>,
    features: FeatureSet,
    title: String,
    width: u32,
    height: u32,
    state: SurfaceState,
    surface_generation: u64,
    sorted: Vec<SharedElement>,
    stepper: Option<Box<dyn PhysicsStepper>>,
    on_added: Option<ElementHook>,
    on_removed: Option<ElementHook>,
}

impl View {
    /// Creates a view backed by a fresh surface from `provider`.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn new(
        width: u32,
        height: u32,
        features: FeatureSet,
        mut provider: Box<dyn SurfaceProvider>,
    ) -> Result<Self, SurfaceError> {
        assert!(width > 0 && height > 0, "view dimensions must be positive");
        let mut surface = provider.create(width, height, &features)?;
        let foreground = Canvas::new(surface.create_backend());
        let background = Canvas::new(Box::new(RasterBackend::new(width, height)));
        let queue = EventQueue::new();
        queue.set_coalescing(features.contains(ViewFeature::Scrollable));
        Ok(Self {
            shared: Arc::new(ViewShared::new()),
            queue,
            background,
            foreground,
            surface,
            provider,
            features,
            title: String::new(),
            width,
            height,
            state: SurfaceState::Active,
            surface_generation: 0,
            sorted: Vec::new(),
            stepper: None,
            on_added: None,
            on_removed: None,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
        self.surface.set_title(&self.title);
    }

    pub fn state(&self) -> SurfaceState {
        self.state
    }

    /// Bumped every time the backing surface is recreated. Callers that
    /// cache anything derived from canvas content can watch this to learn
    /// that the canvases were reset.
    pub fn surface_generation(&self) -> u64 {
        self.surface_generation
    }

    pub fn features(&self) -> FeatureSet {
        self.features
    }

    /// The background canvas; whatever is drawn here is repainted onto the
    /// foreground at the start of every frame.
    pub fn background(&mut self) -> &mut Canvas {
        &mut self.background
    }

    pub fn handle(&self) -> ViewHandle {
        ViewHandle {
            shared: self.shared.clone(),
            sink: self.queue.sink(),
        }
    }

    pub fn event_sink(&self) -> EventSink {
        self.queue.sink()
    }

    pub fn post(&self, event: Event) {
        self.queue.post(event);
    }

    /// Registers a non-element listener on the view's queue. Elements are
    /// registered automatically when their insertion commits.
    pub fn add_listener(&mut self, listener: ListenerRef) {
        self.queue.add_listener(listener);
    }

    pub fn remove_listener(&mut self, listener: &ListenerRef) {
        self.queue.remove_listener(listener);
    }

    /// Queues `element` for insertion at the next commit. See
    /// [`ViewHandle::add`] for the cross-thread variant.
    pub fn add(&self, element: &SharedElement) {
        self.shared.add(element);
    }

    /// Queues `element` for removal at the next commit.
    pub fn remove(&self, element: &SharedElement) {
        self.shared.remove(element);
    }

    /// First committed element carrying `name`, if any.
    pub fn element(&self, name: &str) -> Option<SharedElement> {
        let sets = lock_ignore_poison(&self.shared.sets);
        sets.names
            .get(name)
            .and_then(|bucket| bucket.first())
            .map(|(_, element)| element.clone())
    }

    /// All committed elements carrying `name`, in attachment order.
    pub fn elements_named(&self, name: &str) -> Vec<SharedElement> {
        let sets = lock_ignore_poison(&self.shared.sets);
        sets.names
            .get(name)
            .map(|bucket| bucket.iter().map(|(_, e)| e.clone()).collect())
            .unwrap_or_default()
    }

    /// Snapshot of the committed element set, in insertion order.
    pub fn elements(&self) -> Vec<SharedElement> {
        lock_ignore_poison(&self.shared.sets).committed.clone()
    }

    pub fn set_physics_stepper(&mut self, stepper: Option<Box<dyn PhysicsStepper>>) {
        self.stepper = stepper;
    }

    pub fn set_on_element_added(&mut self, hook: impl FnMut(&SharedElement) + Send + 'static) {
        self.on_added = Some(Box::new(hook));
    }

    pub fn set_on_element_removed(&mut self, hook: impl FnMut(&SharedElement) + Send + 'static) {
        self.on_removed = Some(Box::new(hook));
    }

    /// Enables or disables a feature. `Scrollable` only switches drag
    /// coalescing; `Fullscreen` and `DoubleBuffered` tear down and recreate
    /// the backing surface. Membership survives recreation but both content
    /// canvases come back blank, a documented side effect.
    pub fn set_feature(&mut self, feature: ViewFeature, enabled: bool) {
        if self.features.contains(feature) == enabled {
            return;
        }
        if enabled {
            self.features.insert(feature);
        } else {
            self.features.remove(feature);
        }
        if feature == ViewFeature::Scrollable {
            self.queue.set_coalescing(enabled);
        } else if feature.requires_recreation() {
            self.recreate_surface();
        }
    }

    fn recreate_surface(&mut self) {
        if self.state != SurfaceState::Active {
            return;
        }
        self.state = SurfaceState::Recreating;
        log::info!(
            "recreating surface {}x{} (generation {})",
            self.width,
            self.height,
            self.surface_generation + 1
        );
        match self.provider.create(self.width, self.height, &self.features) {
            Ok(mut surface) => {
                surface.set_title(&self.title);
                self.foreground.set_backend(surface.create_backend());
                self.background
                    .set_backend(Box::new(RasterBackend::new(self.width, self.height)));
                self.surface = surface;
                self.surface_generation += 1;
                self.state = SurfaceState::Active;
            }
            Err(err) => {
                log::error!("surface recreation failed, view disabled: {err}");
                self.state = SurfaceState::Failed;
            }
        }
    }

    /// Shuts the view down. Subsequent ticks are no-ops; the surface is
    /// released when the view is dropped.
    pub fn close(&mut self) {
        if self.state != SurfaceState::Closed {
            log::debug!("view \"{}\" closed", self.title);
            self.state = SurfaceState::Closed;
        }
    }

    /// Runs one frame: commit membership, dispatch events, step physics,
    /// repaint background, draw elements in ascending draw order, present.
    /// Skipped entirely while the surface reports itself invisible or the
    /// view is closed or failed.
    pub fn tick(&mut self, event: &TickEvent) {
        if self.state != SurfaceState::Active || !self.surface.is_visible() {
            return;
        }
        self.commit();
        self.queue.process_events();
        if let Some(stepper) = &mut self.stepper {
            stepper.step(event.dt());
        }
        if self.shared.order_dirty.load(Ordering::Acquire) {
            self.rebuild_sorted();
        }
        self.foreground.draw_canvas(0.0, 0.0, &self.background);
        let sorted = self.sorted.clone();
        for element in &sorted {
            let mut guard = lock_ignore_poison(element);
            let pinned = guard.common().pinned();
            let (x, y, angle) = (guard.x(), guard.y(), guard.angle_rad());
            self.foreground.push_world(pinned, x, y, angle);
            guard.draw(&mut self.foreground);
            self.foreground.pop_world();
        }
        if let Err(err) = self.surface.present(&self.foreground) {
            log::error!("present failed, view disabled: {err}");
            self.state = SurfaceState::Failed;
        }
    }

    /// Applies pending membership changes. The only point at which the
    /// committed set mutates: removals first (detach, unregister, unindex,
    /// hook), then insertions (attach, register, index, hook), then the
    /// sorted cache is rebuilt.
    fn commit(&mut self) {
        let (removals, insertions) = {
            let mut sets = lock_ignore_poison(&self.shared.sets);
            (
                std::mem::take(&mut sets.pending_removals),
                std::mem::take(&mut sets.pending_insertions),
            )
        };
        if removals.is_empty() && insertions.is_empty() {
            return;
        }

        for element in &removals {
            let (id, name) = {
                let mut guard = lock_ignore_poison(element);
                let still_ours = guard
                    .common()
                    .host()
                    .upgrade()
                    .is_some_and(|host| Arc::ptr_eq(&host, &self.shared));
                if still_ours {
                    guard.common_mut().detach();
                }
                (guard.common().id(), guard.common().name().to_owned())
            };
            {
                let mut sets = lock_ignore_poison(&self.shared.sets);
                sets.committed.retain(|e| !Arc::ptr_eq(e, element));
                remove_name_entry(&mut sets.names, &name, id);
            }
            let listener: ListenerRef = element.clone();
            self.queue.remove_listener(&listener);
            if let Some(hook) = &mut self.on_removed {
                hook(element);
            }
        }

        for element in &insertions {
            let (id, name, previous) = {
                let mut guard = lock_ignore_poison(element);
                let previous = guard.common().host().upgrade();
                guard.common_mut().attach(Arc::downgrade(&self.shared));
                (guard.common().id(), guard.common().name().to_owned(), previous)
            };
            // An element committed here while attached elsewhere detaches
            // from its previous container at that container's next commit.
            if let Some(previous) = previous {
                if !Arc::ptr_eq(&previous, &self.shared) {
                    previous.remove(element);
                }
            }
            {
                let mut sets = lock_ignore_poison(&self.shared.sets);
                sets.committed.push(element.clone());
                sets.names
                    .entry(name)
                    .or_default()
                    .push((id, element.clone()));
            }
            let listener: ListenerRef = element.clone();
            self.queue.add_listener(listener);
            if let Some(hook) = &mut self.on_added {
                hook(element);
            }
        }

        self.rebuild_sorted();
    }

    /// Stable sort by ascending draw order; ties keep insertion order.
    fn rebuild_sorted(&mut self) {
        let committed = lock_ignore_poison(&self.shared.sets).committed.clone();
        let mut keyed: Vec<(i32, SharedElement)> = committed
            .into_iter()
            .map(|element| {
                let order = lock_ignore_poison(&element).common().draw_order();
                (order, element)
            })
            .collect();
        keyed.sort_by_key(|(order, _)| *order);
        self.sorted = keyed.into_iter().map(|(_, element)| element).collect();
        self.shared.order_dirty.store(false, Ordering::Release);
    }
}
