use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use easel_canvas::Canvas;
use easel_event::{
    lock_ignore_poison, Event, PointerDownListener, PointerEvent, Subscriber, TickEvent,
};
use easel_graphics::{Color, Point};
use easel_testing::{TestSurfaceControl, TestSurfaceProvider};

use easel_scene::{
    Element, ElementCommon, FeatureSet, PhysicsStepper, SharedElement, SurfaceState, View,
    ViewFeature,
};

struct Rig {
    view: View,
    control: Arc<TestSurfaceControl>,
}

fn rig() -> Rig {
    let control = TestSurfaceControl::new();
    let provider = TestSurfaceProvider::new(control.clone());
    let view = View::new(64, 48, FeatureSet::new(), Box::new(provider)).unwrap();
    Rig { view, control }
}

fn tick_event() -> TickEvent {
    TickEvent::new(Duration::from_millis(16), 60.0)
}

struct Ball {
    common: ElementCommon,
    label: &'static str,
    drawn: Arc<Mutex<Vec<&'static str>>>,
    pointer_downs: Arc<Mutex<Vec<Point>>>,
}

impl PointerDownListener for Ball {
    fn on_pointer_down(&mut self, event: &PointerEvent) {
        self.pointer_downs.lock().unwrap().push(event.position);
    }
}

impl Subscriber for Ball {
    fn as_pointer_down_listener(&mut self) -> Option<&mut dyn PointerDownListener> {
        Some(self)
    }
}

impl Element for Ball {
    fn common(&self) -> &ElementCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut ElementCommon {
        &mut self.common
    }

    fn draw(&mut self, canvas: &mut Canvas) {
        self.drawn.lock().unwrap().push(self.label);
        canvas.set_color(Color::RED);
        canvas.fill_circle(0.0, 0.0, 2.0);
    }
}

fn ball(
    label: &'static str,
    order: i32,
    drawn: &Arc<Mutex<Vec<&'static str>>>,
) -> SharedElement {
    let mut common = ElementCommon::new();
    common.set_draw_order(order);
    Arc::new(Mutex::new(Ball {
        common,
        label,
        drawn: drawn.clone(),
        pointer_downs: Arc::new(Mutex::new(Vec::new())),
    }))
}

fn draw_log() -> Arc<Mutex<Vec<&'static str>>> {
    Arc::new(Mutex::new(Vec::new()))
}

fn attached(element: &SharedElement) -> bool {
    lock_ignore_poison(element).common().is_attached()
}

#[test]
fn add_is_visible_only_after_the_next_tick() {
    let mut r = rig();
    let log = draw_log();
    let a = ball("a", 0, &log);
    r.view.add(&a);
    assert!(r.view.elements().is_empty());
    assert!(!attached(&a));
    r.view.tick(&tick_event());
    assert_eq!(r.view.elements().len(), 1);
    assert!(attached(&a));
}

#[test]
fn add_then_remove_before_commit_stays_detached() {
    let mut r = rig();
    let log = draw_log();
    let a = ball("a", 0, &log);
    r.view.add(&a);
    r.view.remove(&a);
    r.view.tick(&tick_event());
    assert!(r.view.elements().is_empty());
    assert!(!attached(&a));
}

#[test]
fn remove_then_add_cancels_the_removal() {
    let mut r = rig();
    let log = draw_log();
    let a = ball("a", 0, &log);
    r.view.add(&a);
    r.view.tick(&tick_event());
    r.view.remove(&a);
    r.view.add(&a);
    r.view.tick(&tick_event());
    assert_eq!(r.view.elements().len(), 1);
    assert!(attached(&a));
}

#[test]
fn repeated_add_is_idempotent() {
    let mut r = rig();
    let log = draw_log();
    let a = ball("a", 0, &log);
    r.view.add(&a);
    r.view.add(&a);
    r.view.tick(&tick_event());
    r.view.add(&a);
    r.view.tick(&tick_event());
    assert_eq!(r.view.elements().len(), 1);
}

#[test]
fn elements_draw_in_ascending_draw_order() {
    let mut r = rig();
    let log = draw_log();
    let a = ball("a", 5, &log);
    let b = ball("b", 2, &log);
    r.view.add(&a);
    r.view.add(&b);
    r.view.tick(&tick_event());
    assert_eq!(*log.lock().unwrap(), vec!["b", "a"]);
}

#[test]
fn equal_draw_orders_keep_insertion_order() {
    let mut r = rig();
    let log = draw_log();
    let a = ball("a", 3, &log);
    let b = ball("b", 3, &log);
    let c = ball("c", 1, &log);
    r.view.add(&a);
    r.view.add(&b);
    r.view.add(&c);
    r.view.tick(&tick_event());
    assert_eq!(*log.lock().unwrap(), vec!["c", "a", "b"]);
}

#[test]
fn draw_order_mutation_takes_effect_next_tick() {
    let mut r = rig();
    let log = draw_log();
    let a = ball("a", 5, &log);
    let b = ball("b", 2, &log);
    r.view.add(&a);
    r.view.add(&b);
    r.view.tick(&tick_event());
    lock_ignore_poison(&a).common_mut().set_draw_order(1);
    r.view.tick(&tick_event());
    assert_eq!(*log.lock().unwrap(), vec!["b", "a", "a", "b"]);
}

#[test]
fn removal_detaches_and_stops_drawing() {
    let mut r = rig();
    let log = draw_log();
    let a = ball("a", 5, &log);
    let b = ball("b", 2, &log);
    r.view.add(&a);
    r.view.add(&b);
    r.view.tick(&tick_event());
    r.view.remove(&a);
    r.view.tick(&tick_event());
    assert_eq!(r.view.elements().len(), 1);
    assert!(!attached(&a));
    assert!(attached(&b));
    assert_eq!(*log.lock().unwrap(), vec!["b", "a", "b"]);
}

#[test]
fn name_lookup_follows_membership() {
    let mut r = rig();
    let log = draw_log();
    let a = ball("a", 0, &log);
    lock_ignore_poison(&a).common_mut().set_name("player");
    r.view.add(&a);
    assert!(r.view.element("player").is_none());
    r.view.tick(&tick_event());
    let found = r.view.element("player").unwrap();
    assert!(Arc::ptr_eq(&found, &a));
    r.view.remove(&a);
    r.view.tick(&tick_event());
    assert!(r.view.element("player").is_none());
}

#[test]
fn unnamed_elements_index_under_the_default_name() {
    let mut r = rig();
    let log = draw_log();
    let a = ball("a", 0, &log);
    let b = ball("b", 0, &log);
    r.view.add(&a);
    r.view.add(&b);
    r.view.tick(&tick_event());
    assert_eq!(r.view.elements_named("element").len(), 2);
}

#[test]
fn rename_reindexes_immediately_while_attached() {
    let mut r = rig();
    let log = draw_log();
    let a = ball("a", 0, &log);
    lock_ignore_poison(&a).common_mut().set_name("old");
    r.view.add(&a);
    r.view.tick(&tick_event());
    lock_ignore_poison(&a).common_mut().set_name("new");
    assert!(r.view.element("old").is_none());
    assert!(r.view.element("new").is_some());
}

#[test]
fn attached_elements_receive_posted_events() {
    let mut r = rig();
    let log = draw_log();
    let downs = Arc::new(Mutex::new(Vec::new()));
    let a: SharedElement = Arc::new(Mutex::new(Ball {
        common: ElementCommon::new(),
        label: "a",
        drawn: log.clone(),
        pointer_downs: downs.clone(),
    }));
    r.view.add(&a);
    r.view.tick(&tick_event());
    r.view
        .post(Event::PointerDown(PointerEvent::new(1, Point::new(3.0, 4.0))));
    r.view.tick(&tick_event());
    assert_eq!(*downs.lock().unwrap(), vec![Point::new(3.0, 4.0)]);
}

#[test]
fn detached_elements_no_longer_receive_events() {
    let mut r = rig();
    let log = draw_log();
    let downs = Arc::new(Mutex::new(Vec::new()));
    let a: SharedElement = Arc::new(Mutex::new(Ball {
        common: ElementCommon::new(),
        label: "a",
        drawn: log.clone(),
        pointer_downs: downs.clone(),
    }));
    r.view.add(&a);
    r.view.tick(&tick_event());
    r.view.remove(&a);
    r.view.tick(&tick_event());
    r.view
        .post(Event::PointerDown(PointerEvent::new(1, Point::new(1.0, 1.0))));
    r.view.tick(&tick_event());
    assert!(downs.lock().unwrap().is_empty());
}

#[test]
fn invisible_surface_skips_the_whole_tick() {
    let mut r = rig();
    let log = draw_log();
    let a = ball("a", 0, &log);
    r.view.add(&a);
    r.control.set_visible(false);
    r.view.tick(&tick_event());
    assert!(r.view.elements().is_empty());
    assert_eq!(r.control.present_count(), 0);
    r.control.set_visible(true);
    r.view.tick(&tick_event());
    assert_eq!(r.view.elements().len(), 1);
    assert_eq!(r.control.present_count(), 1);
}

#[test]
fn closed_view_ignores_ticks() {
    let mut r = rig();
    r.view.tick(&tick_event());
    assert_eq!(r.control.present_count(), 1);
    r.view.close();
    assert_eq!(r.view.state(), SurfaceState::Closed);
    r.view.tick(&tick_event());
    assert_eq!(r.control.present_count(), 1);
}

#[test]
fn fullscreen_toggle_recreates_the_surface() {
    let mut r = rig();
    assert_eq!(r.view.surface_generation(), 0);
    r.view.set_feature(ViewFeature::Fullscreen, true);
    assert_eq!(r.view.surface_generation(), 1);
    assert_eq!(r.view.state(), SurfaceState::Active);
    assert_eq!(r.control.surfaces_created(), 2);
    assert!(r.view.features().contains(ViewFeature::Fullscreen));
}

#[test]
fn membership_survives_surface_recreation() {
    let mut r = rig();
    let log = draw_log();
    let a = ball("a", 0, &log);
    r.view.add(&a);
    r.view.tick(&tick_event());
    r.view.set_feature(ViewFeature::DoubleBuffered, true);
    r.view.tick(&tick_event());
    assert_eq!(r.view.elements().len(), 1);
    assert_eq!(*log.lock().unwrap(), vec!["a", "a"]);
}

#[test]
fn recreation_failure_poisons_only_this_view() {
    let mut r = rig();
    let mut other = rig();
    r.control.fail_creation();
    r.view.set_feature(ViewFeature::Fullscreen, true);
    assert_eq!(r.view.state(), SurfaceState::Failed);
    let presents = r.control.present_count();
    r.view.tick(&tick_event());
    assert_eq!(r.control.present_count(), presents);
    other.view.tick(&tick_event());
    assert_eq!(other.view.state(), SurfaceState::Active);
    assert_eq!(other.control.present_count(), 1);
}

#[test]
fn scrollable_toggle_does_not_recreate() {
    let mut r = rig();
    r.view.set_feature(ViewFeature::Scrollable, true);
    assert_eq!(r.view.surface_generation(), 0);
    assert_eq!(r.control.surfaces_created(), 1);
}

#[test]
fn committing_into_a_second_view_detaches_from_the_first() {
    let mut first = rig();
    let mut second = rig();
    let log = draw_log();
    let a = ball("a", 0, &log);
    first.view.add(&a);
    first.view.tick(&tick_event());
    assert_eq!(first.view.elements().len(), 1);
    second.view.add(&a);
    second.view.tick(&tick_event());
    first.view.tick(&tick_event());
    assert!(first.view.elements().is_empty());
    assert_eq!(second.view.elements().len(), 1);
    assert!(attached(&a));
}

#[test]
fn hooks_fire_on_commit() {
    let mut r = rig();
    let added = Arc::new(AtomicUsize::new(0));
    let removed = Arc::new(AtomicUsize::new(0));
    let added_count = added.clone();
    let removed_count = removed.clone();
    r.view
        .set_on_element_added(move |_| {
            added_count.fetch_add(1, AtomicOrdering::SeqCst);
        });
    r.view
        .set_on_element_removed(move |_| {
            removed_count.fetch_add(1, AtomicOrdering::SeqCst);
        });
    let log = draw_log();
    let a = ball("a", 0, &log);
    r.view.add(&a);
    r.view.tick(&tick_event());
    assert_eq!(added.load(AtomicOrdering::SeqCst), 1);
    r.view.remove(&a);
    r.view.tick(&tick_event());
    assert_eq!(removed.load(AtomicOrdering::SeqCst), 1);
}

struct RecordingStepper {
    steps: Arc<Mutex<Vec<f32>>>,
}

impl PhysicsStepper for RecordingStepper {
    fn step(&mut self, dt: f32) {
        self.steps.lock().unwrap().push(dt);
    }
}

#[test]
fn physics_steps_once_per_tick_with_the_frame_dt() {
    let mut r = rig();
    let steps = Arc::new(Mutex::new(Vec::new()));
    r.view
        .set_physics_stepper(Some(Box::new(RecordingStepper {
            steps: steps.clone(),
        })));
    r.view.tick(&tick_event());
    r.view.tick(&tick_event());
    let recorded = steps.lock().unwrap();
    assert_eq!(recorded.len(), 2);
    assert!((recorded[0] - 0.016).abs() < 1e-6);
}

#[test]
fn handle_mutates_membership_from_another_thread() {
    let mut r = rig();
    let handle = r.view.handle();
    let log = draw_log();
    let a = ball("a", 0, &log);
    let thread_element = a.clone();
    std::thread::spawn(move || {
        handle.add(&thread_element);
    })
    .join()
    .unwrap();
    r.view.tick(&tick_event());
    assert_eq!(r.view.elements().len(), 1);
}
