//! End-to-end behaviour of the explorer driven with synthetic timestamps.

use mandelview::common::viewport::ScreenPoint;
use mandelview::explorer::{Explorer, ExplorerOptions, FrameStatus};
use mandelview::input::InputEvent;
use mandelview::render::{CpuRenderer, FrameParams, RenderBackend};
use mandelview::{ColorScheme, QualitySchedule, SurfaceSize, ViewportInfo, ViewportPatch};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

const EPS: f64 = 1e-9;

fn cpu_explorer(size: SurfaceSize, options: ExplorerOptions) -> Explorer {
    Explorer::new(Box::new(CpuRenderer::new()), size, options)
}

fn small() -> SurfaceSize {
    SurfaceSize::new(16, 12)
}

/// Records what the explorer uploads each frame
struct RecordingBackend {
    frames: Rc<RefCell<Vec<FrameParams>>>,
    released: Rc<Cell<bool>>,
}

impl RenderBackend for RecordingBackend {
    fn name(&self) -> &str {
        "recording"
    }

    fn render(&mut self, params: &FrameParams, out: &mut [u32]) -> mandelview::Result<()> {
        assert_eq!(out.len(), params.size.pixel_count());
        self.frames.borrow_mut().push(*params);
        Ok(())
    }

    fn release(&mut self) {
        self.released.set(true);
    }
}

#[test]
fn construction_reports_the_initial_viewport() {
    let explorer = cpu_explorer(small(), ExplorerOptions::default());
    let expected_budget = QualitySchedule::default().iteration_budget(0.7);
    assert_eq!(
        explorer.viewport(),
        ViewportInfo {
            center_x: -0.5,
            center_y: 0.0,
            zoom: 0.7,
            iteration_budget: expected_budget,
        }
    );
    assert_eq!(expected_budget, 84);
    assert_eq!(explorer.backend_name(), "CPU (f64)");
}

#[test]
fn ten_wheel_steps_at_the_centre_compound() {
    let size = SurfaceSize::new(100, 80);
    let mut explorer = cpu_explorer(
        size,
        ExplorerOptions {
            initial_zoom: 1.0,
            ..Default::default()
        },
    );
    for _ in 0..10 {
        explorer.zoom_at(size.center(), 1.1);
    }
    let info = explorer.viewport();
    assert!((info.zoom - 1.1f64.powi(10)).abs() < 1e-9);
    assert!((info.center_x + 0.5).abs() < EPS);
    assert!(info.center_y.abs() < EPS);
}

#[test]
fn zoom_keeps_the_point_under_the_cursor() {
    let size = SurfaceSize::new(64, 48);
    for &(x, y) in &[(3.0, 7.0), (60.0, 2.0), (32.0, 24.0), (10.5, 40.25)] {
        for factor in [1.1, 0.9, 4.0, 0.2] {
            let mut explorer = cpu_explorer(size, ExplorerOptions::default());
            let at = ScreenPoint::new(x, y);
            let before = explorer.current_viewport().to_plane(size.to_ndc(at));
            explorer.zoom_at(at, factor);
            let after = explorer.current_viewport().to_plane(size.to_ndc(at));
            assert!((before - after).norm() < 1e-12, "({x}, {y}) x{factor}");
        }
    }
}

#[test]
fn newest_transition_wins() {
    let mut explorer = cpu_explorer(small(), ExplorerOptions::default());
    explorer.animate_to(0.0, 0.0, 1000.0, 1000.0);
    explorer.animate_to(1.0, 1.0, 1.0, 1000.0);

    let mut now = 0.0;
    while explorer.is_animating() {
        explorer.tick(now).unwrap();
        now += 100.0;
        assert!(now < 5000.0, "transition never finished");
    }
    let info = explorer.viewport();
    assert_eq!((info.center_x, info.center_y, info.zoom), (1.0, 1.0, 1.0));
    assert_eq!(info.iteration_budget, 100);
}

#[test]
fn interrupted_transition_leaves_no_residue() {
    let mut explorer = cpu_explorer(small(), ExplorerOptions::default());
    explorer.animate_to(0.0, 0.0, 1000.0, 1000.0);
    explorer.tick(0.0).unwrap();
    explorer.tick(400.0).unwrap();
    assert!(explorer.viewport().zoom > 0.7);

    explorer.animate_to(1.0, 1.0, 1.0, 1000.0);
    explorer.tick(500.0).unwrap();
    explorer.tick(1000.0).unwrap();
    explorer.tick(1500.0).unwrap();
    assert!(!explorer.is_animating());
    let info = explorer.viewport();
    assert_eq!((info.center_x, info.center_y, info.zoom), (1.0, 1.0, 1.0));
}

#[test]
fn reset_after_arbitrary_mutation() {
    let mut explorer = cpu_explorer(small(), ExplorerOptions::default());
    explorer.pan(0.3, -0.7);
    explorer.zoom_at(ScreenPoint::new(2.0, 3.0), 37.0);
    explorer.set_viewport(ViewportPatch {
        center_y: Some(0.25),
        ..Default::default()
    });
    explorer.toggle_quality();
    explorer.animate_to(0.1, 0.1, 5e5, 2000.0);
    explorer.tick(0.0).unwrap();

    explorer.reset();
    assert!(!explorer.is_animating());
    let info = explorer.viewport();
    assert_eq!((info.center_x, info.center_y, info.zoom), (-0.5, 0.0, 0.7));
    assert_eq!(info.iteration_budget, 84);
    assert_eq!(explorer.current_viewport().supersampling, 2.0);
}

#[test]
fn zero_area_frames_are_skipped() {
    let mut explorer = cpu_explorer(SurfaceSize::new(0, 10), ExplorerOptions::default());
    assert_eq!(explorer.tick(0.0).unwrap(), FrameStatus::Skipped);
    assert!(explorer.pixels().is_empty());

    // input on an empty surface must not produce NaN
    explorer.handle_input(InputEvent::PointerDown(ScreenPoint::new(1.0, 1.0)));
    explorer.handle_input(InputEvent::PointerMove(ScreenPoint::new(5.0, 5.0)));
    explorer.handle_input(InputEvent::Wheel {
        at: ScreenPoint::new(3.0, 3.0),
        delta_y: -1.0,
    });
    let info = explorer.viewport();
    assert!(info.center_x.is_finite() && info.center_y.is_finite());

    let before = explorer.viewport();
    explorer.handle_input(InputEvent::Resize(SurfaceSize::new(8, 6)));
    assert_eq!(explorer.viewport(), before);
    assert_eq!(explorer.tick(16.0).unwrap(), FrameStatus::Rendered);
    assert_eq!(explorer.pixels().len(), 48);
}

#[test]
fn frame_rate_is_reported_once_per_second() {
    let samples = Rc::new(RefCell::new(Vec::new()));
    let sink = samples.clone();
    let mut explorer = cpu_explorer(
        SurfaceSize::new(4, 4),
        ExplorerOptions::default().on_frame_rate_sample(move |fps| sink.borrow_mut().push(fps)),
    );

    for frame in 1..=130 {
        explorer.tick(frame as f64 * 1000.0 / 60.0).unwrap();
    }
    assert_eq!(*samples.borrow(), vec![60, 60]);
    assert_eq!(explorer.fps(), 60);
}

#[test]
fn each_frame_uploads_the_latest_state() {
    let frames = Rc::new(RefCell::new(Vec::new()));
    let released = Rc::new(Cell::new(false));
    let backend = RecordingBackend {
        frames: frames.clone(),
        released: released.clone(),
    };
    let size = SurfaceSize::new(20, 10);
    let mut explorer = Explorer::new(Box::new(backend), size, ExplorerOptions::default());

    // several wheel ticks between two frames: only the final state is drawn
    for _ in 0..3 {
        explorer.handle_input(InputEvent::Wheel {
            at: size.center(),
            delta_y: -1.0,
        });
    }
    explorer.set_color_scheme(3);
    explorer.tick(1000.0).unwrap();
    explorer.tick(3500.0).unwrap();

    {
        let frames = frames.borrow();
        assert_eq!(frames.len(), 2);
        let first = frames[0];
        assert!((first.zoom - 0.7 * 1.1f64.powi(3)).abs() < EPS);
        assert_eq!(first.scheme, ColorScheme::Psychedelic);
        assert_eq!(first.size, size);
        assert_eq!(first.time, 0.0);
        assert_eq!(frames[1].time, 2.5);
        assert_eq!(first.iteration_budget, explorer.viewport().iteration_budget);
    }

    explorer.destroy();
    assert!(released.get());
}

#[test]
fn psychedelic_palette_moves_with_time() {
    let mut explorer = cpu_explorer(small(), ExplorerOptions::default());
    explorer.set_color_scheme(3);
    explorer.tick(0.0).unwrap();
    let early = explorer.pixels().to_vec();
    explorer.tick(5000.0).unwrap();
    assert_ne!(explorer.pixels(), early.as_slice());

    explorer.set_color_scheme(0);
    explorer.tick(6000.0).unwrap();
    let classic = explorer.pixels().to_vec();
    explorer.tick(9000.0).unwrap();
    assert_eq!(explorer.pixels(), classic.as_slice());
}

#[test]
fn preset_flight_lands_on_the_location() {
    let mut explorer = cpu_explorer(small(), ExplorerOptions::default());
    let location = explorer.explore_location(1).unwrap();
    explorer.tick(0.0).unwrap();
    explorer.tick(1000.0).unwrap();
    assert!(explorer.is_animating());
    explorer.tick(2000.0).unwrap();
    assert!(!explorer.is_animating());

    let info = explorer.viewport();
    assert_eq!((info.center_x, info.center_y), location.center);
    assert_eq!(info.zoom, location.zoom);
}
