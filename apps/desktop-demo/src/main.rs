//! Bouncing-shapes demo: a fixed-size Easel view presented through a
//! `pixels` framebuffer inside a winit window.
//!
//! Space pauses and resumes the engine, clicking spawns another ball,
//! Escape quits.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use easel_canvas::{Canvas, CanvasBackend, RasterBackend};
use easel_engine::{Engine, ViewDriver};
use easel_event::{
    Event as EaselEvent, Key, ListenerRef, PointerDownListener, PointerEvent, Subscriber,
    TickEvent, TickListener,
};
use easel_graphics::Color;
use easel_platform_desktop_winit::DesktopWinitPlatform;
use easel_scene::{
    Element, ElementCommon, FeatureSet, SharedElement, Surface, SurfaceError, SurfaceProvider,
    View, ViewHandle,
};
use pixels::{Pixels, SurfaceTexture};
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

const WIDTH: u32 = 800;
const HEIGHT: u32 = 600;

/// Presents the view's foreground raster through a shared `pixels`
/// framebuffer.
struct PixelsSurface {
    pixels: Arc<Mutex<Pixels>>,
    visible: Arc<AtomicBool>,
    width: u32,
    height: u32,
}

impl Surface for PixelsSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }

    fn set_title(&mut self, _title: &str) {
        // The window owns its title; set once at startup.
    }

    fn create_backend(&mut self) -> Box<dyn CanvasBackend> {
        Box::new(RasterBackend::new(self.width, self.height))
    }

    fn present(&mut self, frame: &Canvas) -> Result<(), SurfaceError> {
        let mut pixels = self
            .pixels
            .lock()
            .map_err(|_| SurfaceError::Present("framebuffer lock poisoned".into()))?;
        if let Some(raster) = frame.raster() {
            pixels.frame_mut().copy_from_slice(raster.as_bytes());
        }
        pixels
            .render()
            .map_err(|err| SurfaceError::Present(err.to_string()))
    }
}

struct PixelsSurfaceProvider {
    pixels: Arc<Mutex<Pixels>>,
    visible: Arc<AtomicBool>,
}

impl SurfaceProvider for PixelsSurfaceProvider {
    fn create(
        &mut self,
        width: u32,
        height: u32,
        _features: &FeatureSet,
    ) -> Result<Box<dyn Surface>, SurfaceError> {
        Ok(Box::new(PixelsSurface {
            pixels: self.pixels.clone(),
            visible: self.visible.clone(),
            width,
            height,
        }))
    }
}

/// A ball that advances on each tick and bounces off the view edges.
struct Ball {
    common: ElementCommon,
    x: f32,
    y: f32,
    vx: f32,
    vy: f32,
    radius: f32,
    color: Color,
}

impl Ball {
    fn spawn(x: f32, y: f32, seed: u32) -> SharedElement {
        let angle = seed as f32 * 2.39996; // golden-angle spread
        Arc::new(Mutex::new(Ball {
            common: ElementCommon::new(),
            x,
            y,
            vx: 160.0 * angle.cos(),
            vy: 160.0 * angle.sin(),
            radius: 12.0 + (seed % 5) as f32 * 4.0,
            color: Color::rgb(
                80 + ((seed * 97) % 176) as u8,
                80 + ((seed * 53) % 176) as u8,
                80 + ((seed * 29) % 176) as u8,
            ),
        }))
    }
}

impl TickListener for Ball {
    fn on_tick(&mut self, event: &TickEvent) {
        let dt = event.dt();
        self.x += self.vx * dt;
        self.y += self.vy * dt;
        let (w, h) = (WIDTH as f32, HEIGHT as f32);
        if self.x - self.radius < 0.0 || self.x + self.radius > w {
            self.vx = -self.vx;
            self.x = self.x.clamp(self.radius, w - self.radius);
        }
        if self.y - self.radius < 0.0 || self.y + self.radius > h {
            self.vy = -self.vy;
            self.y = self.y.clamp(self.radius, h - self.radius);
        }
    }
}

impl Subscriber for Ball {
    fn as_tick_listener(&mut self) -> Option<&mut dyn TickListener> {
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

    fn x(&self) -> f32 {
        self.x
    }

    fn y(&self) -> f32 {
        self.y
    }

    fn draw(&mut self, canvas: &mut Canvas) {
        canvas.set_anti_alias(true);
        canvas.set_color(self.color);
        canvas.fill_circle(0.0, 0.0, self.radius);
    }
}

/// Spawns a new ball wherever the pointer goes down.
struct Spawner {
    view: ViewHandle,
    spawned: u32,
}

impl PointerDownListener for Spawner {
    fn on_pointer_down(&mut self, event: &PointerEvent) {
        self.spawned += 1;
        let ball = Ball::spawn(event.position.x, event.position.y, self.spawned + 3);
        self.view.add(&ball);
        log::info!("spawned ball {} at {:?}", self.spawned, event.position);
    }
}

impl Subscriber for Spawner {
    fn as_pointer_down_listener(&mut self) -> Option<&mut dyn PointerDownListener> {
        Some(self)
    }
}

fn paint_background(canvas: &mut Canvas) {
    canvas.set_color(Color::rgb(18, 18, 28));
    canvas.fill();
    canvas.set_color(Color::rgb(40, 40, 60));
    for x in (0..WIDTH).step_by(40) {
        canvas.draw_line(x as f32, 0.0, x as f32, HEIGHT as f32);
    }
    for y in (0..HEIGHT).step_by(40) {
        canvas.draw_line(0.0, y as f32, WIDTH as f32, y as f32);
    }
}

fn main() {
    env_logger::init();

    let event_loop = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title("Easel - bouncing shapes")
        .with_inner_size(LogicalSize::new(WIDTH, HEIGHT))
        .with_resizable(false)
        .build(&event_loop)
        .expect("window creation");

    let size = window.inner_size();
    let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
    let pixels = Pixels::new(WIDTH, HEIGHT, surface_texture).expect("framebuffer creation");
    let pixels = Arc::new(Mutex::new(pixels));
    let visible = Arc::new(AtomicBool::new(true));

    let provider = PixelsSurfaceProvider {
        pixels: pixels.clone(),
        visible: visible.clone(),
    };
    let mut view =
        View::new(WIDTH, HEIGHT, FeatureSet::new(), Box::new(provider)).expect("view creation");
    view.set_title("bouncing shapes");
    paint_background(view.background());

    for seed in 0..3 {
        view.add(&Ball::spawn(WIDTH as f32 / 2.0, HEIGHT as f32 / 2.0, seed));
    }
    let spawner: ListenerRef = Arc::new(Mutex::new(Spawner {
        view: view.handle(),
        spawned: 0,
    }));
    view.add_listener(spawner);

    let mut engine = Engine::with_frequency(60.0);
    let handle = engine.handle();
    let (_driver, listener) = ViewDriver::new(view).into_listener();
    engine.add_listener(listener);

    let mut platform = DesktopWinitPlatform::new(window.scale_factor());

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;
        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    handle.stop();
                    *control_flow = ControlFlow::Exit;
                }
                WindowEvent::Occluded(occluded) => {
                    visible.store(!occluded, Ordering::SeqCst);
                }
                WindowEvent::Resized(new_size) => {
                    let mut pixels = match pixels.lock() {
                        Ok(pixels) => pixels,
                        Err(poisoned) => poisoned.into_inner(),
                    };
                    if let Err(err) = pixels.resize_surface(new_size.width, new_size.height) {
                        log::error!("failed to resize surface: {err}");
                        *control_flow = ControlFlow::Exit;
                    }
                }
                other => {
                    if let Some(translated) = platform.translate(&other) {
                        match translated {
                            EaselEvent::KeyDown(key) if key.key == Key::Escape => {
                                handle.stop();
                                *control_flow = ControlFlow::Exit;
                            }
                            EaselEvent::KeyDown(key) if key.key == Key::Space && !key.repeat => {
                                if handle.is_paused() {
                                    handle.resume();
                                } else {
                                    handle.pause();
                                }
                            }
                            translated => handle.post(translated),
                        }
                    }
                }
            },
            Event::MainEventsCleared => {
                if !handle.is_paused() && !handle.is_stopped() {
                    engine.tick_once();
                }
            }
            _ => {}
        }
    });
}
