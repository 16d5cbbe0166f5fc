//! End-to-end pipeline tests: engine tick -> view commit -> event dispatch
//! -> draw -> present, observed through the easel-testing doubles.

use std::sync::{Arc, Mutex};

use easel_canvas::Canvas;
use easel_engine::{Engine, ViewDriver};
use easel_event::{
    Event, ListenerRef, PointerDownListener, PointerEvent, Subscriber,
};
use easel_graphics::{Color, Point};
use easel_scene::{Element, ElementCommon, FeatureSet, SharedElement, SurfaceState, View};
use easel_testing::{
    DrawCall, PanickingListener, PointerRecorder, TestSurfaceControl, TestSurfaceProvider,
    TickRecorder,
};

struct Sprite {
    common: ElementCommon,
    label: &'static str,
    drawn: Arc<Mutex<Vec<&'static str>>>,
    pointer_downs: Arc<Mutex<Vec<Point>>>,
}

impl PointerDownListener for Sprite {
    fn on_pointer_down(&mut self, event: &PointerEvent) {
        self.pointer_downs.lock().unwrap().push(event.position);
    }
}

impl Subscriber for Sprite {
    fn as_pointer_down_listener(&mut self) -> Option<&mut dyn PointerDownListener> {
        Some(self)
    }
}

impl Element for Sprite {
    fn common(&self) -> &ElementCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut ElementCommon {
        &mut self.common
    }

    fn draw(&mut self, canvas: &mut Canvas) {
        self.drawn.lock().unwrap().push(self.label);
        canvas.set_color(Color::WHITE);
        canvas.fill_circle(0.0, 0.0, 1.0);
    }
}

struct Fixture {
    engine: Engine,
    driver: Arc<Mutex<ViewDriver>>,
    control: Arc<TestSurfaceControl>,
    drawn: Arc<Mutex<Vec<&'static str>>>,
    downs: Arc<Mutex<Vec<Point>>>,
}

impl Fixture {
    fn new() -> Self {
        Self::build(false)
    }

    /// A fixture whose surfaces record draw calls instead of rasterizing.
    fn recording() -> Self {
        Self::build(true)
    }

    fn build(record_draws: bool) -> Self {
        let control = TestSurfaceControl::new();
        if record_draws {
            control.record_draws();
        }
        let provider = TestSurfaceProvider::new(control.clone());
        let view = View::new(32, 32, FeatureSet::new(), Box::new(provider)).unwrap();
        let mut engine = Engine::with_frequency(500.0);
        let (driver, listener) = ViewDriver::new(view).into_listener();
        engine.add_listener(listener);
        Self {
            engine,
            driver,
            control,
            drawn: Arc::new(Mutex::new(Vec::new())),
            downs: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn sprite(&self, label: &'static str, order: i32) -> SharedElement {
        let mut common = ElementCommon::new();
        common.set_draw_order(order);
        Arc::new(Mutex::new(Sprite {
            common,
            label,
            drawn: self.drawn.clone(),
            pointer_downs: self.downs.clone(),
        }))
    }

    fn add(&self, element: &SharedElement) {
        self.driver.lock().unwrap().view().add(element);
    }

    fn remove(&self, element: &SharedElement) {
        self.driver.lock().unwrap().view().remove(element);
    }

    fn attached_count(&self) -> usize {
        self.driver.lock().unwrap().view().elements().len()
    }

    fn state(&self) -> SurfaceState {
        self.driver.lock().unwrap().view().state()
    }
}

#[test]
fn elements_draw_in_order_and_removals_take_effect_next_tick() {
    let mut f = Fixture::new();
    let a = f.sprite("a", 5);
    let b = f.sprite("b", 2);
    f.add(&a);
    f.add(&b);
    f.engine.tick_once();
    assert_eq!(*f.drawn.lock().unwrap(), vec!["b", "a"]);
    assert_eq!(f.control.present_count(), 1);

    f.remove(&a);
    f.engine.tick_once();
    assert_eq!(f.attached_count(), 1);
    assert_eq!(*f.drawn.lock().unwrap(), vec!["b", "a", "b"]);
    assert_eq!(f.control.present_count(), 2);
}

#[test]
fn input_posted_to_the_engine_reaches_elements_on_the_same_tick() {
    let mut f = Fixture::new();
    let a = f.sprite("a", 0);
    f.add(&a);
    f.engine.tick_once();
    f.engine
        .post(Event::PointerDown(PointerEvent::new(1, Point::new(7.0, 9.0))));
    f.engine.tick_once();
    assert_eq!(*f.downs.lock().unwrap(), vec![Point::new(7.0, 9.0)]);
}

#[test]
fn invisible_views_do_not_present() {
    let mut f = Fixture::new();
    f.control.set_visible(false);
    f.engine.tick_once();
    f.engine.tick_once();
    assert_eq!(f.control.present_count(), 0);
    f.control.set_visible(true);
    f.engine.tick_once();
    assert_eq!(f.control.present_count(), 1);
}

#[test]
fn present_failure_disables_the_view() {
    let mut f = Fixture::new();
    let a = f.sprite("a", 0);
    f.add(&a);
    f.control.fail_present();
    f.engine.tick_once();
    assert_eq!(f.state(), SurfaceState::Failed);
    assert_eq!(f.control.present_count(), 0);
    // A failed view stops ticking; elements are not drawn again.
    f.engine.tick_once();
    f.engine.tick_once();
    assert_eq!(*f.drawn.lock().unwrap(), vec!["a"]);
    assert_eq!(f.control.present_count(), 0);
}

#[test]
fn a_failed_view_does_not_affect_its_siblings() {
    let mut f = Fixture::new();
    let healthy = Fixture::new();
    let healthy_listener: ListenerRef = healthy.driver.clone();
    f.engine.add_listener(healthy_listener);
    f.control.fail_present();
    f.engine.tick_once();
    f.engine.tick_once();
    assert_eq!(f.state(), SurfaceState::Failed);
    assert_eq!(healthy.state(), SurfaceState::Active);
    assert_eq!(healthy.control.present_count(), 2);
}

#[test]
fn pointer_sequences_deliver_in_post_order() {
    let mut f = Fixture::new();
    let (recorder, events) = PointerRecorder::new();
    let recorder: ListenerRef = Arc::new(Mutex::new(recorder));
    f.engine.add_listener(recorder);
    let down = PointerEvent::new(1, Point::new(1.0, 1.0));
    let moved = PointerEvent::new(1, Point::new(2.0, 1.0)).with_delta(1.0, 0.0);
    let up = PointerEvent::new(1, Point::new(2.0, 1.0));
    f.engine.post(Event::PointerDown(down));
    f.engine.post(Event::PointerMove(moved));
    f.engine.post(Event::PointerUp(up));
    f.engine.tick_once();
    assert_eq!(
        *events.lock().unwrap(),
        vec![
            Event::PointerDown(down),
            Event::PointerMove(moved),
            Event::PointerUp(up),
        ]
    );
}

#[test]
fn background_repaint_precedes_element_draws() {
    let mut f = Fixture::recording();
    let a = f.sprite("a", 0);
    f.add(&a);
    f.engine.tick_once();
    let calls = f.control.draw_calls();
    assert_eq!(calls.len(), 2, "calls: {calls:?}");
    assert!(matches!(calls[0], DrawCall::Raster(_)));
    assert_eq!(calls[1], DrawCall::FillCircle(Color::WHITE));
}

#[test]
fn presented_frames_carry_the_drawn_pixels() {
    let mut f = Fixture::new();
    let a = f.sprite("a", 0);
    f.add(&a);
    f.engine.tick_once();
    f.engine.tick_once();
    let frame = f.control.last_frame().unwrap();
    // Sprite draws a white dot at the origin of its world transform.
    assert_eq!(frame.pixel(0, 0), Color::WHITE);
}

#[test]
fn a_panicking_listener_does_not_starve_the_view() {
    let mut f = Fixture::new();
    let panicking: ListenerRef = Arc::new(Mutex::new(PanickingListener));
    let (recorder, ticks) = TickRecorder::new();
    let recorder: ListenerRef = Arc::new(Mutex::new(recorder));
    let mut engine = Engine::with_frequency(500.0);
    engine.add_listener(panicking);
    engine.add_listener(recorder);
    engine.tick_once();
    assert_eq!(ticks.lock().unwrap().len(), 1);
    // The original fixture engine keeps working too.
    f.engine.tick_once();
    assert_eq!(f.control.present_count(), 1);
}
