//! Palettes and colour conversion

use super::constants::{COLOR_SCHEME_COUNT, GAMMA};

/// Linear RGB in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    pub fn scale(self, k: f64) -> Self {
        Self::new(self.r * k, self.g * k, self.b * k)
    }

    fn mix(self, other: Rgb, t: f64) -> Self {
        Self::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
        )
    }

    /// Packs into `0xRRGGBB`
    pub fn to_u32(self) -> u32 {
        let channel = |v: f64| (v.clamp(0.0, 1.0) * 255.0) as u8 as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }
}

impl std::ops::Add for Rgb {
    type Output = Rgb;

    fn add(self, rhs: Rgb) -> Rgb {
        Rgb::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b)
    }
}

impl std::ops::AddAssign for Rgb {
    fn add_assign(&mut self, rhs: Rgb) {
        *self = *self + rhs;
    }
}

/// Selectable palette. The index order is part of the public API
/// (`set_color_scheme(index)`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorScheme {
    /// Blue through purple to gold
    #[default]
    Classic,
    Fire,
    Ocean,
    /// Rainbow whose hue drifts with time
    Psychedelic,
    Monochrome,
}

impl ColorScheme {
    pub const ALL: [ColorScheme; COLOR_SCHEME_COUNT] = [
        ColorScheme::Classic,
        ColorScheme::Fire,
        ColorScheme::Ocean,
        ColorScheme::Psychedelic,
        ColorScheme::Monochrome,
    ];

    /// Out-of-range indices clamp to the nearest palette
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index.min(COLOR_SCHEME_COUNT - 1)]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % COLOR_SCHEME_COUNT]
    }

    pub fn name(self) -> &'static str {
        match self {
            ColorScheme::Classic => "classic",
            ColorScheme::Fire => "fire",
            ColorScheme::Ocean => "ocean",
            ColorScheme::Psychedelic => "psychedelic",
            ColorScheme::Monochrome => "monochrome",
        }
    }
}

impl std::fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// HSV (all components in `[0, 1]`, hue wraps) to linear RGB
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> Rgb {
    let channel = |offset: f64| {
        let p = ((h + offset).rem_euclid(1.0) * 6.0 - 3.0).abs();
        let k = (p - 1.0).clamp(0.0, 1.0);
        v * (1.0 + (k - 1.0) * s)
    };
    Rgb::new(channel(1.0), channel(2.0 / 3.0), channel(1.0 / 3.0))
}

/// Maps a continuous escape count to a linear colour.
///
/// `count >= max_iter` is inside the set and always black. Otherwise the count
/// is normalised to `t = (count / max_iter)^0.5`, which stretches the low
/// iteration bands, and fed through the palette. `time` is in seconds and only
/// affects `Psychedelic`.
pub fn colorize(count: f64, max_iter: u32, scheme: ColorScheme, time: f64) -> Rgb {
    let max = max_iter as f64;
    if count >= max {
        return Rgb::BLACK;
    }
    let t = (count.max(0.0) / max).sqrt();

    match scheme {
        ColorScheme::Classic => hsv_to_rgb(0.66 - t * 0.4, 0.7 + t * 0.3, t * 0.9 + 0.1),
        ColorScheme::Fire => {
            let red = Rgb::new(1.0, 0.0, 0.0);
            if t < 0.5 {
                Rgb::BLACK.mix(red, t * 2.0)
            } else {
                red.mix(Rgb::new(1.0, 1.0, 0.0), (t - 0.5) * 2.0)
            }
        }
        ColorScheme::Ocean => hsv_to_rgb(0.55 + t * 0.15, 0.8 - t * 0.3, 0.2 + t * 0.8),
        ColorScheme::Psychedelic => hsv_to_rgb(
            (t * 3.0 + time * 0.1).rem_euclid(1.0),
            0.8 + (t * 10.0).sin() * 0.2,
            0.5 + t * 0.5,
        ),
        ColorScheme::Monochrome => {
            let brightness = t.powf(0.4);
            Rgb::new(brightness, brightness, brightness)
        }
    }
}

/// Display gamma, applied once per pixel after sub-samples are averaged
pub fn gamma_correct(color: Rgb) -> Rgb {
    let encode = |v: f64| v.max(0.0).powf(1.0 / GAMMA);
    Rgb::new(encode(color.r), encode(color.g), encode(color.b))
}
