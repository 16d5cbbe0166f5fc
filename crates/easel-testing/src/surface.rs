use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use easel_canvas::{Canvas, CanvasBackend, Image, RasterBackend};
use easel_scene::{FeatureSet, Surface, SurfaceError, SurfaceProvider};

use crate::backend::{DrawCall, RecordingBackend};

/// Shared observation point for every surface a [`TestSurfaceProvider`]
/// creates: present count, scriptable visibility, the last presented frame,
/// and a failure switch for recreation tests.
pub struct TestSurfaceControl {
    visible: AtomicBool,
    presents: AtomicUsize,
    created: AtomicUsize,
    fail_creation: AtomicBool,
    fail_present: AtomicBool,
    record_draws: AtomicBool,
    last_frame: Mutex<Option<Image>>,
    draw_calls: Arc<Mutex<Vec<DrawCall>>>,
}

impl TestSurfaceControl {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            visible: AtomicBool::new(true),
            presents: AtomicUsize::new(0),
            created: AtomicUsize::new(0),
            fail_creation: AtomicBool::new(false),
            fail_present: AtomicBool::new(false),
            record_draws: AtomicBool::new(false),
            last_frame: Mutex::new(None),
            draw_calls: Arc::new(Mutex::new(Vec::new())),
        })
    }

    pub fn set_visible(&self, visible: bool) {
        self.visible.store(visible, Ordering::SeqCst);
    }

    pub fn present_count(&self) -> usize {
        self.presents.load(Ordering::SeqCst)
    }

    pub fn surfaces_created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    /// Makes the next (and every subsequent) creation attempt fail.
    pub fn fail_creation(&self) {
        self.fail_creation.store(true, Ordering::SeqCst);
    }

    /// Makes every subsequent present attempt fail.
    pub fn fail_present(&self) {
        self.fail_present.store(true, Ordering::SeqCst);
    }

    /// Snapshot of the most recently presented frame, if any.
    pub fn last_frame(&self) -> Option<Image> {
        self.last_frame.lock().unwrap().clone()
    }

    /// Makes subsequently created surfaces hand out [`RecordingBackend`]s
    /// instead of rasterizing, so tests can assert on the draw-call stream.
    pub fn record_draws(&self) {
        self.record_draws.store(true, Ordering::SeqCst);
    }

    /// The draw calls recorded so far, across every recording backend this
    /// control has handed out.
    pub fn draw_calls(&self) -> Vec<DrawCall> {
        self.draw_calls.lock().unwrap().clone()
    }
}

/// A raster-backed surface whose behavior is scripted through its
/// [`TestSurfaceControl`].
pub struct TestSurface {
    width: u32,
    height: u32,
    title: String,
    control: Arc<TestSurfaceControl>,
}

impl Surface for TestSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn is_visible(&self) -> bool {
        self.control.visible.load(Ordering::SeqCst)
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_owned();
    }

    fn create_backend(&mut self) -> Box<dyn CanvasBackend> {
        if self.control.record_draws.load(Ordering::SeqCst) {
            Box::new(RecordingBackend::with_log(
                self.width,
                self.height,
                self.control.draw_calls.clone(),
            ))
        } else {
            Box::new(RasterBackend::new(self.width, self.height))
        }
    }

    fn present(&mut self, frame: &Canvas) -> Result<(), SurfaceError> {
        if self.control.fail_present.load(Ordering::SeqCst) {
            return Err(SurfaceError::Present("scripted failure".into()));
        }
        self.control.presents.fetch_add(1, Ordering::SeqCst);
        *self.control.last_frame.lock().unwrap() = Some(frame.snapshot());
        Ok(())
    }
}

/// Provider handing out [`TestSurface`]s that all report to one control.
pub struct TestSurfaceProvider {
    control: Arc<TestSurfaceControl>,
}

impl TestSurfaceProvider {
    pub fn new(control: Arc<TestSurfaceControl>) -> Self {
        Self { control }
    }
}

impl SurfaceProvider for TestSurfaceProvider {
    fn create(
        &mut self,
        width: u32,
        height: u32,
        _features: &FeatureSet,
    ) -> Result<Box<dyn Surface>, SurfaceError> {
        if self.control.fail_creation.load(Ordering::SeqCst) {
            return Err(SurfaceError::Creation("scripted failure".into()));
        }
        self.control.created.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(TestSurface {
            width,
            height,
            title: String::new(),
            control: self.control.clone(),
        }))
    }
}
