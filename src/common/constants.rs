//! Shared constants

/// Plane coordinate shown at the screen centre on start-up and after reset
pub const DEFAULT_CENTER: (f64, f64) = (-0.5, 0.0);
/// Zoom on start-up and after reset
pub const DEFAULT_ZOOM: f64 = 0.7;

/// Zoom is clamped into `[ZOOM_MIN, ZOOM_MAX]` after every mutation
pub const ZOOM_MIN: f64 = 0.1;
pub const ZOOM_MAX: f64 = 1e12;

/// Hard upper bound on the per-sample iteration budget
pub const ITERATION_CEILING: u32 = 2048;

/// Squared escape radius. Must stay well above 4 for the smooth count.
pub const ESCAPE_THRESHOLD: f64 = 256.0;

/// Output gamma
pub const GAMMA: f64 = 2.2;

/// Number of selectable palettes
pub const COLOR_SCHEME_COUNT: usize = 5;

/// Plane units moved per screen width of drag, at zoom 1
pub const PAN_SENSITIVITY: f64 = 3.0;

/// Screen fraction moved by one arrow-key press
pub const KEY_PAN_STEP: f64 = 0.05 / PAN_SENSITIVITY;

/// Wheel zoom factors (one tick)
pub const WHEEL_ZOOM_IN: f64 = 1.1;
pub const WHEEL_ZOOM_OUT: f64 = 0.9;

/// Keyboard `+` / `-` zoom step
pub const KEY_ZOOM_STEP: f64 = 1.5;

/// Frame-rate measurement window in milliseconds
pub const FPS_WINDOW_MS: f64 = 1000.0;

/// Above this zoom f32 no longer resolves neighbouring pixels and the
/// hybrid renderer switches from the GPU to the CPU f64 path
pub const GPU_PRECISION_LIMIT: f64 = 1e5;

/// Default window size of the interactive viewer
pub const WINDOW_WIDTH: usize = 800;
pub const WINDOW_HEIGHT: usize = 600;

/// Duration of the animated flight to a preset location
pub const LOCATION_FLIGHT_MS: f64 = 2000.0;

/// A named spot worth flying to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub name: &'static str,
    pub center: (f64, f64),
    pub zoom: f64,
}

pub static INTERESTING_LOCATIONS: [Location; 5] = [
    Location {
        name: "Seahorse Valley",
        center: (-0.7269, 0.1889),
        zoom: 1000.0,
    },
    Location {
        name: "Spiral Arm",
        center: (-0.8, 0.156),
        zoom: 500.0,
    },
    Location {
        name: "Double Spiral",
        center: (-0.74529, 0.11307),
        zoom: 2000.0,
    },
    Location {
        name: "Antenna Mini-brot",
        center: (-1.25066, 0.02012),
        zoom: 5000.0,
    },
    Location {
        name: "Seahorse Tail",
        center: (-0.7533, 0.1138),
        zoom: 10000.0,
    },
];
