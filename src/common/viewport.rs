//! Viewport state, the screen <-> plane mapping and the zoom-dependent
//! quality schedule

use super::constants::{
    DEFAULT_CENTER, DEFAULT_ZOOM, ITERATION_CEILING, PAN_SENSITIVITY, ZOOM_MAX, ZOOM_MIN,
};
use super::transition::{Transition, Waypoint};
use num_complex::Complex;

/// Pixel dimensions of the render target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SurfaceSize {
    pub width: usize,
    pub height: usize,
}

/// A position on the surface in pixels, origin top-left, y down
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

/// Normalized device coordinate, `[-1, 1]` on both axes, y up
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Ndc {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: ScreenPoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn midpoint(self, other: ScreenPoint) -> ScreenPoint {
        ScreenPoint::new((self.x + other.x) * 0.5, (self.y + other.y) * 0.5)
    }
}

impl Ndc {
    pub const CENTER: Ndc = Ndc { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl SurfaceSize {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Zero-area surfaces are never rendered
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new(self.width as f64 * 0.5, self.height as f64 * 0.5)
    }

    /// Callers must not pass an empty surface
    pub fn to_ndc(&self, p: ScreenPoint) -> Ndc {
        Ndc::new(
            p.x / self.width as f64 * 2.0 - 1.0,
            -(p.y / self.height as f64 * 2.0 - 1.0),
        )
    }

    pub fn to_screen(&self, n: Ndc) -> ScreenPoint {
        ScreenPoint::new(
            (n.x + 1.0) * 0.5 * self.width as f64,
            (1.0 - n.y) * 0.5 * self.height as f64,
        )
    }

    /// NDC of the centre of pixel `(px, py)`
    pub fn pixel_center(&self, px: usize, py: usize) -> Ndc {
        self.to_ndc(ScreenPoint::new(px as f64 + 0.5, py as f64 + 0.5))
    }
}

/// `c = n * (2 / zoom) + center`
pub fn ndc_to_plane(n: Ndc, center: Complex<f64>, zoom: f64) -> Complex<f64> {
    let scale = 2.0 / zoom;
    Complex::new(n.x * scale + center.re, n.y * scale + center.im)
}

/// Inverse of [`ndc_to_plane`]
pub fn plane_to_ndc(c: Complex<f64>, center: Complex<f64>, zoom: f64) -> Ndc {
    let scale = zoom / 2.0;
    Ndc::new((c.re - center.re) * scale, (c.im - center.im) * scale)
}

/// Allowed zoom range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomLimits {
    pub min: f64,
    pub max: f64,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            min: ZOOM_MIN,
            max: ZOOM_MAX,
        }
    }
}

impl ZoomLimits {
    /// NaN collapses to `min`
    pub fn clamp(&self, zoom: f64) -> f64 {
        zoom.max(self.min).min(self.max)
    }
}

/// Supersampling used while `zoom < below_zoom`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SupersamplingTier {
    pub below_zoom: f64,
    pub factor: f64,
}

/// Derives the iteration budget and supersampling factor from zoom.
///
/// The budget grows by `iterations_per_decade` for every factor of ten in
/// zoom, starting from `base_iterations` at zoom 1, and is kept inside
/// `[iteration_floor, iteration_ceiling]`. Supersampling drops as zoom rises
/// because the iteration cost already did.
#[derive(Debug, Clone, PartialEq)]
pub struct QualitySchedule {
    pub base_iterations: f64,
    pub iterations_per_decade: f64,
    pub iteration_floor: u32,
    pub iteration_ceiling: u32,
    /// Checked in order; the first tier whose bound exceeds zoom wins
    pub tiers: Vec<SupersamplingTier>,
    pub deep_supersampling: f64,
}

impl Default for QualitySchedule {
    fn default() -> Self {
        Self {
            base_iterations: 100.0,
            iterations_per_decade: 100.0,
            iteration_floor: 16,
            iteration_ceiling: ITERATION_CEILING,
            tiers: vec![
                SupersamplingTier {
                    below_zoom: 100.0,
                    factor: 2.0,
                },
                SupersamplingTier {
                    below_zoom: 10_000.0,
                    factor: 1.5,
                },
            ],
            deep_supersampling: 1.0,
        }
    }
}

impl QualitySchedule {
    pub fn iteration_budget(&self, zoom: f64) -> u32 {
        let raw = (self.base_iterations + zoom.log10() * self.iterations_per_decade).floor();
        let floor = self.iteration_floor.max(1);
        let ceiling = self.iteration_ceiling.max(floor);
        raw.max(floor as f64).min(ceiling as f64) as u32
    }

    pub fn supersampling(&self, zoom: f64) -> f64 {
        self.tiers
            .iter()
            .find(|tier| zoom < tier.below_zoom)
            .map_or(self.deep_supersampling, |tier| tier.factor)
    }
}

/// Camera over the complex plane plus the quality derived from its zoom
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: Complex<f64>,
    pub zoom: f64,
    pub iteration_budget: u32,
    pub supersampling: f64,
}

impl Viewport {
    pub fn to_plane(&self, n: Ndc) -> Complex<f64> {
        ndc_to_plane(n, self.center, self.zoom)
    }

    pub fn to_ndc(&self, c: Complex<f64>) -> Ndc {
        plane_to_ndc(c, self.center, self.zoom)
    }

    fn waypoint(&self) -> Waypoint {
        Waypoint {
            center: (self.center.re, self.center.im),
            zoom: self.zoom,
        }
    }
}

impl std::fmt::Display for Viewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "center ({:.6}, {:.6}i) zoom x{:.2e} iter {} ss {}",
            self.center.re, self.center.im, self.zoom, self.iteration_budget, self.supersampling
        )
    }
}

/// Snapshot returned to the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportInfo {
    pub center_x: f64,
    pub center_y: f64,
    pub zoom: f64,
    pub iteration_budget: u32,
}

/// Partial update; `None` leaves the field untouched
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportPatch {
    pub center_x: Option<f64>,
    pub center_y: Option<f64>,
    pub zoom: Option<f64>,
}

/// Owns the viewport and every mutation of it
#[derive(Debug, Clone)]
pub struct ViewportController {
    viewport: Viewport,
    schedule: QualitySchedule,
    limits: ZoomLimits,
    transition: Option<Transition>,
}

impl ViewportController {
    pub fn new(center: (f64, f64), zoom: f64, schedule: QualitySchedule) -> Self {
        let limits = ZoomLimits::default();
        let mut controller = Self {
            viewport: Viewport {
                center: Complex::new(center.0, center.1),
                zoom: limits.clamp(zoom),
                iteration_budget: 0,
                supersampling: 1.0,
            },
            schedule,
            limits,
            transition: None,
        };
        controller.set_quality();
        controller
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn schedule(&self) -> &QualitySchedule {
        &self.schedule
    }

    pub fn limits(&self) -> ZoomLimits {
        self.limits
    }

    pub fn info(&self) -> ViewportInfo {
        ViewportInfo {
            center_x: self.viewport.center.re,
            center_y: self.viewport.center.im,
            zoom: self.viewport.zoom,
            iteration_budget: self.viewport.iteration_budget,
        }
    }

    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// Moves the centre by `delta * PAN_SENSITIVITY / zoom` plane units, so a
    /// drag across the screen feels the same at every zoom level.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        let step = PAN_SENSITIVITY / self.viewport.zoom;
        self.viewport.center.re += dx * step;
        self.viewport.center.im += dy * step;
    }

    /// Zooms by `factor` keeping the plane point under `anchor` fixed on screen.
    pub fn zoom_at(&mut self, anchor: Ndc, factor: f64) {
        if factor.is_nan() {
            return;
        }
        let world = self.viewport.to_plane(anchor);
        self.viewport.zoom = self.limits.clamp(self.viewport.zoom * factor);

        let scale = 2.0 / self.viewport.zoom;
        self.viewport.center = Complex::new(world.re - anchor.x * scale, world.im - anchor.y * scale);
        self.set_quality();
    }

    /// Re-derives iteration budget and supersampling from the current zoom
    pub fn set_quality(&mut self) {
        let zoom = self.viewport.zoom;
        self.viewport.iteration_budget = self.schedule.iteration_budget(zoom);
        self.viewport.supersampling = self.schedule.supersampling(zoom);
    }

    /// Flips supersampling between 1 and 2. The next zoom change re-derives it.
    pub fn toggle_quality(&mut self) {
        self.viewport.supersampling = if self.viewport.supersampling > 1.0 {
            1.0
        } else {
            2.0
        };
    }

    /// Installs a transition, discarding any in flight
    pub fn animate_to(&mut self, center: (f64, f64), zoom: f64, duration_ms: f64) {
        let target = Waypoint {
            center,
            zoom: self.limits.clamp(zoom),
        };
        self.transition = Some(Transition::new(
            self.viewport.waypoint(),
            target,
            duration_ms,
        ));
    }

    pub fn reset(&mut self) {
        self.transition = None;
        self.viewport.center = Complex::new(DEFAULT_CENTER.0, DEFAULT_CENTER.1);
        self.viewport.zoom = self.limits.clamp(DEFAULT_ZOOM);
        self.set_quality();
    }

    pub fn set_viewport(&mut self, patch: ViewportPatch) {
        if let Some(x) = patch.center_x.filter(|v| v.is_finite()) {
            self.viewport.center.re = x;
        }
        if let Some(y) = patch.center_y.filter(|v| v.is_finite()) {
            self.viewport.center.im = y;
        }
        if let Some(zoom) = patch.zoom.filter(|v| !v.is_nan()) {
            self.viewport.zoom = self.limits.clamp(zoom);
        }
        self.set_quality();
    }

    /// Steps the active transition, if any. Returns whether the viewport moved.
    pub fn advance(&mut self, now_ms: f64) -> bool {
        let Some(transition) = self.transition.as_mut() else {
            return false;
        };
        let step = transition.advance(now_ms);
        if step.finished {
            self.transition = None;
        }

        let Waypoint { center, zoom } = step.waypoint;
        self.viewport.center = Complex::new(center.0, center.1);
        self.viewport.zoom = self.limits.clamp(zoom);
        self.set_quality();
        true
    }
}

impl Default for ViewportController {
    fn default() -> Self {
        Self::new(DEFAULT_CENTER, DEFAULT_ZOOM, QualitySchedule::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn controller_at(x: f64, y: f64, zoom: f64) -> ViewportController {
        ViewportController::new((x, y), zoom, QualitySchedule::default())
    }

    fn assert_close(a: Complex<f64>, b: Complex<f64>, tol: f64) {
        assert!(
            (a.re - b.re).abs() <= tol && (a.im - b.im).abs() <= tol,
            "{a} != {b}"
        );
    }

    #[test]
    fn zoom_at_keeps_anchor_fixed() {
        let anchors = [
            Ndc::new(0.0, 0.0),
            Ndc::new(0.9, -0.3),
            Ndc::new(-1.0, 1.0),
            Ndc::new(0.25, 0.75),
        ];
        for &anchor in &anchors {
            for factor in [1.1, 0.9, 3.0, 0.25, 1.5] {
                let mut c = controller_at(-0.743, 0.131, 37.0);
                let before = c.viewport().to_plane(anchor);
                c.zoom_at(anchor, factor);
                let after = c.viewport().to_plane(anchor);
                let tol = 1e-12 * (1.0 + 2.0 / c.viewport().zoom);
                assert_close(before, after, tol);
            }
        }
    }

    #[test]
    fn zoom_is_always_clamped() {
        let mut c = controller_at(0.0, 0.0, 1.0);
        c.zoom_at(Ndc::new(0.3, 0.3), 1e300);
        assert_eq!(c.viewport().zoom, ZOOM_MAX);
        c.zoom_at(Ndc::new(0.3, 0.3), f64::INFINITY);
        assert_eq!(c.viewport().zoom, ZOOM_MAX);
        c.zoom_at(Ndc::CENTER, 0.0);
        assert_eq!(c.viewport().zoom, ZOOM_MIN);
        c.zoom_at(Ndc::CENTER, -5.0);
        assert_eq!(c.viewport().zoom, ZOOM_MIN);

        c.set_viewport(ViewportPatch {
            zoom: Some(1e40),
            ..Default::default()
        });
        assert_eq!(c.viewport().zoom, ZOOM_MAX);

        let c = controller_at(0.0, 0.0, 0.0001);
        assert_eq!(c.viewport().zoom, ZOOM_MIN);
    }

    #[test]
    fn nan_factor_is_ignored() {
        let mut c = controller_at(0.1, 0.2, 5.0);
        let before = *c.viewport();
        c.zoom_at(Ndc::new(0.5, 0.5), f64::NAN);
        assert_eq!(*c.viewport(), before);
    }

    #[test]
    fn mapping_is_an_inverse_pair() {
        let center = Complex::new(-0.75, 0.1);
        for zoom in [0.1, 0.7, 42.0, 1e6] {
            for &(x, y) in &[(0.0, 0.0), (0.5, -0.5), (-0.99, 0.99), (0.123, 0.456)] {
                let n = Ndc::new(x, y);
                let back = plane_to_ndc(ndc_to_plane(n, center, zoom), center, zoom);
                assert!((back.x - x).abs() < 1e-6 && (back.y - y).abs() < 1e-6);

                let c = Complex::new(center.re + x / zoom, center.im + y / zoom);
                let again = ndc_to_plane(plane_to_ndc(c, center, zoom), center, zoom);
                assert_close(again, c, 1e-12);
            }
        }
    }

    #[test]
    fn screen_ndc_round_trip_and_orientation() {
        let size = SurfaceSize::new(800, 600);
        let p = ScreenPoint::new(123.0, 456.0);
        let back = size.to_screen(size.to_ndc(p));
        assert!((back.x - p.x).abs() < EPS && (back.y - p.y).abs() < EPS);

        assert_eq!(size.to_ndc(size.center()), Ndc::CENTER);
        assert_eq!(size.to_ndc(ScreenPoint::new(0.0, 0.0)), Ndc::new(-1.0, 1.0));
        assert_eq!(size.to_ndc(ScreenPoint::new(800.0, 600.0)), Ndc::new(1.0, -1.0));
    }

    #[test]
    fn iteration_budget_is_monotonic_and_capped() {
        let schedule = QualitySchedule::default();
        let mut zoom = ZOOM_MIN;
        let mut last = 0;
        while zoom <= ZOOM_MAX {
            let budget = schedule.iteration_budget(zoom);
            assert!(budget >= last, "budget fell at zoom {zoom}");
            assert!(budget <= ITERATION_CEILING);
            assert!(budget >= 1);
            last = budget;
            zoom *= 1.07;
        }
        assert_eq!(schedule.iteration_budget(3e11), 1247);
        assert_eq!(schedule.iteration_budget(1e30), ITERATION_CEILING);
    }

    #[test]
    fn schedule_reference_values() {
        let schedule = QualitySchedule::default();
        assert_eq!(schedule.iteration_budget(0.7), 84);
        assert_eq!(schedule.iteration_budget(1.0), 100);
        assert_eq!(schedule.iteration_budget(ZOOM_MIN), 16);
        assert_eq!(schedule.supersampling(0.7), 2.0);
        assert_eq!(schedule.supersampling(500.0), 1.5);
        assert_eq!(schedule.supersampling(10_000.0), 1.0);
    }

    #[test]
    fn pan_distance_shrinks_with_zoom() {
        let mut near = controller_at(0.0, 0.0, 1.0);
        let mut deep = controller_at(0.0, 0.0, 1000.0);
        near.pan(0.1, -0.2);
        deep.pan(0.1, -0.2);
        assert_close(near.viewport().center, Complex::new(0.3, -0.6), EPS);
        assert_close(deep.viewport().center, Complex::new(0.0003, -0.0006), EPS);
    }

    #[test]
    fn pan_does_not_touch_quality() {
        let mut c = controller_at(0.0, 0.0, 5.0);
        c.toggle_quality();
        let ss = c.viewport().supersampling;
        c.pan(1.0, 1.0);
        assert_eq!(c.viewport().supersampling, ss);
    }

    #[test]
    fn toggle_quality_flips_until_next_zoom() {
        let mut c = controller_at(0.0, 0.0, 0.7);
        assert_eq!(c.viewport().supersampling, 2.0);
        c.toggle_quality();
        assert_eq!(c.viewport().supersampling, 1.0);
        c.toggle_quality();
        assert_eq!(c.viewport().supersampling, 2.0);
        c.toggle_quality();
        c.zoom_at(Ndc::CENTER, 1.1);
        assert_eq!(c.viewport().supersampling, 2.0);
    }

    #[test]
    fn reset_restores_defaults_and_cancels_transition() {
        let mut c = controller_at(0.3, 0.3, 5000.0);
        c.pan(0.4, 0.1);
        c.animate_to((1.0, 1.0), 10.0, 500.0);
        c.reset();
        assert!(!c.is_animating());
        let info = c.info();
        assert_eq!((info.center_x, info.center_y, info.zoom), (-0.5, 0.0, 0.7));
        assert_eq!(info.iteration_budget, 84);
        assert_eq!(c.viewport().supersampling, 2.0);
        assert!(!c.advance(10_000.0));
    }

    #[test]
    fn set_viewport_is_partial() {
        let mut c = controller_at(0.25, -0.25, 3.0);
        c.set_viewport(ViewportPatch {
            center_y: Some(0.0),
            ..Default::default()
        });
        let info = c.info();
        assert_eq!((info.center_x, info.center_y, info.zoom), (0.25, 0.0, 3.0));

        c.set_viewport(ViewportPatch {
            center_x: Some(0.0),
            zoom: Some(2000.0),
            ..Default::default()
        });
        let info = c.info();
        assert_eq!((info.center_x, info.center_y, info.zoom), (0.0, 0.0, 2000.0));
        assert_eq!(info.iteration_budget, 430);
    }

    #[test]
    fn advance_applies_transition_and_requalifies() {
        let mut c = controller_at(-0.5, 0.0, 0.7);
        c.animate_to((0.0, 0.0), 2000.0, 100.0);
        assert!(c.advance(0.0));
        assert!(c.advance(50.0));
        assert!(c.is_animating());
        assert!(c.advance(100.0));
        assert!(!c.is_animating());
        assert_eq!(c.info().zoom, 2000.0);
        assert_eq!(c.info().iteration_budget, 430);
        assert_eq!(c.viewport().supersampling, 1.5);
        assert!(!c.advance(200.0));
    }
}
