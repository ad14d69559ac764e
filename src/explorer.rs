//! The explorer widget: viewport, palette, render back-end and input state
//! behind one per-frame `tick`.

use crate::common::colors::ColorScheme;
use crate::common::constants::{
    Location, DEFAULT_CENTER, DEFAULT_ZOOM, INTERESTING_LOCATIONS, KEY_PAN_STEP, KEY_ZOOM_STEP,
    LOCATION_FLIGHT_MS, WHEEL_ZOOM_IN, WHEEL_ZOOM_OUT,
};
use crate::common::viewport::{
    Ndc, QualitySchedule, ScreenPoint, SurfaceSize, Viewport, ViewportController, ViewportInfo,
    ViewportPatch,
};
use crate::error::Result;
use crate::frame::FpsMeter;
use crate::input::{InputEvent, KeyCommand};
use crate::render::{FrameParams, HybridRenderer, RenderBackend};

/// Receives the measured frame rate once per measurement window
pub type FrameRateCallback = Box<dyn FnMut(u32)>;

/// Construction options
pub struct ExplorerOptions {
    pub initial_center: (f64, f64),
    pub initial_zoom: f64,
    pub color_scheme: ColorScheme,
    pub schedule: QualitySchedule,
    pub on_frame_rate_sample: Option<FrameRateCallback>,
}

impl Default for ExplorerOptions {
    fn default() -> Self {
        Self {
            initial_center: DEFAULT_CENTER,
            initial_zoom: DEFAULT_ZOOM,
            color_scheme: ColorScheme::default(),
            schedule: QualitySchedule::default(),
            on_frame_rate_sample: None,
        }
    }
}

impl ExplorerOptions {
    pub fn on_frame_rate_sample(mut self, callback: impl FnMut(u32) + 'static) -> Self {
        self.on_frame_rate_sample = Some(Box::new(callback));
        self
    }
}

/// Outcome of one [`Explorer::tick`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    Rendered,
    /// The surface has zero area; nothing was drawn
    Skipped,
}

/// Pointer or touch gesture in progress
#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Idle,
    Drag(ScreenPoint),
    Pinch { distance: f64 },
}

pub struct Explorer {
    controller: ViewportController,
    scheme: ColorScheme,
    backend: Box<dyn RenderBackend>,
    size: SurfaceSize,
    pixels: Vec<u32>,
    fps: FpsMeter,
    on_frame_rate_sample: Option<FrameRateCallback>,
    gesture: Gesture,
    clock_start: Option<f64>,
    next_location: usize,
}

impl Explorer {
    pub fn new(backend: Box<dyn RenderBackend>, size: SurfaceSize, options: ExplorerOptions) -> Self {
        let controller =
            ViewportController::new(options.initial_center, options.initial_zoom, options.schedule);
        log::info!(
            "explorer {}x{} on {}: {}",
            size.width,
            size.height,
            backend.name(),
            controller.viewport()
        );
        Self {
            controller,
            scheme: options.color_scheme,
            backend,
            size,
            pixels: vec![0; size.pixel_count()],
            fps: FpsMeter::default(),
            on_frame_rate_sample: options.on_frame_rate_sample,
            gesture: Gesture::Idle,
            clock_start: None,
            next_location: 0,
        }
    }

    /// Builds an explorer on the GPU/CPU hybrid back-end.
    ///
    /// Fails when no GPU is usable or the shader does not build; the caller
    /// decides whether to fall back to [`crate::render::CpuRenderer`].
    pub fn with_gpu(size: SurfaceSize, options: ExplorerOptions) -> Result<Self> {
        let backend = HybridRenderer::new()?;
        Ok(Self::new(Box::new(backend), size, options))
    }

    // ===== frame driver =====

    /// Advances any transition and renders one frame.
    ///
    /// `now_ms` is the host clock in milliseconds; it only has to be
    /// monotonic. Returns [`FrameStatus::Skipped`] for a zero-area surface.
    pub fn tick(&mut self, now_ms: f64) -> Result<FrameStatus> {
        self.controller.advance(now_ms);

        if self.size.is_empty() {
            return Ok(FrameStatus::Skipped);
        }

        let start = *self.clock_start.get_or_insert(now_ms);
        let params = FrameParams::new(
            self.controller.viewport(),
            self.scheme,
            (now_ms - start) / 1000.0,
            self.size,
        );
        self.backend.render(&params, &mut self.pixels)?;

        if let Some(fps) = self.fps.record_frame(now_ms) {
            log::debug!("{fps} fps on {}", self.backend.name());
            if let Some(callback) = self.on_frame_rate_sample.as_mut() {
                callback(fps);
            }
        }
        Ok(FrameStatus::Rendered)
    }

    /// The last rendered frame, `0xRRGGBB`, row-major
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    pub fn fps(&self) -> u32 {
        self.fps.fps()
    }

    /// Releases the back-end's device resources
    pub fn destroy(mut self) {
        self.backend.release();
        log::info!("explorer destroyed");
    }

    // ===== public operations =====

    pub fn viewport(&self) -> ViewportInfo {
        self.controller.info()
    }

    /// Full viewport including the current supersampling factor
    pub fn current_viewport(&self) -> &Viewport {
        self.controller.viewport()
    }

    pub fn set_viewport(&mut self, patch: ViewportPatch) {
        self.controller.set_viewport(patch);
    }

    pub fn reset(&mut self) {
        self.controller.reset();
        log::debug!("reset: {}", self.controller.viewport());
    }

    pub fn color_scheme(&self) -> ColorScheme {
        self.scheme
    }

    pub fn set_color_scheme(&mut self, index: usize) {
        self.scheme = ColorScheme::from_index(index);
    }

    pub fn cycle_color_scheme(&mut self) {
        self.scheme = self.scheme.next();
        log::debug!("color scheme: {}", self.scheme);
    }

    pub fn toggle_quality(&mut self) {
        self.controller.toggle_quality();
        log::debug!("supersampling: {}", self.controller.viewport().supersampling);
    }

    pub fn is_animating(&self) -> bool {
        self.controller.is_animating()
    }

    /// Starts an eased flight, replacing any flight in progress
    pub fn animate_to(&mut self, x: f64, y: f64, zoom: f64, duration_ms: f64) {
        self.controller.animate_to((x, y), zoom, duration_ms);
    }

    /// Flies to preset `index`. Returns `None` for an unknown index.
    pub fn explore_location(&mut self, index: usize) -> Option<&'static Location> {
        (index < INTERESTING_LOCATIONS.len()).then(|| self.fly_to(index))
    }

    /// Flies to the presets in turn
    pub fn explore_next_location(&mut self) -> &'static Location {
        self.fly_to(self.next_location)
    }

    fn fly_to(&mut self, index: usize) -> &'static Location {
        let location = &INTERESTING_LOCATIONS[index];
        log::info!("flying to {}", location.name);
        self.controller
            .animate_to(location.center, location.zoom, LOCATION_FLIGHT_MS);
        self.next_location = (index + 1) % INTERESTING_LOCATIONS.len();
        location
    }

    /// Zooms keeping the plane point under `at` fixed
    pub fn zoom_at(&mut self, at: ScreenPoint, factor: f64) {
        let anchor = if self.size.is_empty() {
            Ndc::CENTER
        } else {
            self.size.to_ndc(at)
        };
        self.controller.zoom_at(anchor, factor);
    }

    /// Pans by a fraction of the surface, y up
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.controller.pan(dx, dy);
    }

    /// Adopts a new surface size. The plane-space viewport is unchanged.
    pub fn resize(&mut self, size: SurfaceSize) {
        if size == self.size {
            return;
        }
        log::info!("resize {}x{} -> {}x{}", self.size.width, self.size.height, size.width, size.height);
        self.size = size;
        self.pixels.clear();
        self.pixels.resize(size.pixel_count(), 0);
        self.gesture = Gesture::Idle;
    }

    // ===== input =====

    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerDown(p) => self.gesture = Gesture::Drag(p),
            InputEvent::PointerMove(p) => self.drag_to(p),
            InputEvent::PointerUp | InputEvent::TouchEnd => self.gesture = Gesture::Idle,
            InputEvent::Wheel { at, delta_y } => {
                if delta_y != 0.0 {
                    let factor = if delta_y > 0.0 {
                        WHEEL_ZOOM_OUT
                    } else {
                        WHEEL_ZOOM_IN
                    };
                    self.zoom_at(at, factor);
                }
            }
            InputEvent::TouchStart(points) => {
                self.gesture = match points.as_slice() {
                    [p] => Gesture::Drag(*p),
                    [a, b] => Gesture::Pinch {
                        distance: a.distance(*b),
                    },
                    _ => Gesture::Idle,
                };
            }
            InputEvent::TouchMove(points) => match points.as_slice() {
                [p] => self.drag_to(*p),
                [a, b] => self.pinch(*a, *b),
                _ => {}
            },
            InputEvent::Key(key) => {
                if let Some(command) = KeyCommand::from_key(key) {
                    self.apply(command);
                }
            }
            InputEvent::Resize(size) => self.resize(size),
        }
    }

    pub fn apply(&mut self, command: KeyCommand) {
        match command {
            KeyCommand::Reset => self.reset(),
            KeyCommand::CycleColorScheme => self.cycle_color_scheme(),
            KeyCommand::ZoomIn => self.controller.zoom_at(Ndc::CENTER, KEY_ZOOM_STEP),
            KeyCommand::ZoomOut => self.controller.zoom_at(Ndc::CENTER, 1.0 / KEY_ZOOM_STEP),
            KeyCommand::ToggleQuality => self.toggle_quality(),
            KeyCommand::Pan(sx, sy) => self
                .controller
                .pan(sx as f64 * KEY_PAN_STEP, sy as f64 * KEY_PAN_STEP),
            KeyCommand::NextLocation => {
                self.explore_next_location();
            }
            KeyCommand::Location(index) => {
                self.explore_location(index);
            }
        }
    }

    /// Drag: the plane follows the pointer
    fn drag_to(&mut self, p: ScreenPoint) {
        let Gesture::Drag(last) = self.gesture else {
            return;
        };
        self.gesture = Gesture::Drag(p);
        if self.size.is_empty() {
            return;
        }
        let dx = (p.x - last.x) / self.size.width as f64;
        let dy = (p.y - last.y) / self.size.height as f64;
        self.controller.pan(-dx, dy);
    }

    /// Two-finger zoom by the change in finger distance, anchored at their midpoint
    fn pinch(&mut self, a: ScreenPoint, b: ScreenPoint) {
        let distance = a.distance(b);
        if let Gesture::Pinch { distance: last } = self.gesture {
            if last > 0.0 && distance > 0.0 {
                self.zoom_at(a.midpoint(b), distance / last);
            }
        }
        self.gesture = Gesture::Pinch { distance };
    }
}
