//! Escape-time evaluation of the Mandelbrot iteration

use super::constants::ESCAPE_THRESHOLD;
use num_complex::Complex;

/// Result of evaluating one complex-plane coordinate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Continuous escape count; equals the budget for points that never escaped
    pub count: f64,
    pub escaped: bool,
}

impl Sample {
    fn inside(max_iter: u32) -> Self {
        Self {
            count: max_iter as f64,
            escaped: false,
        }
    }
}

/// Iterates `z <- z^2 + c` from `z = 0` for at most `max_iter` steps.
///
/// On escape at iteration `i` the normalized count
/// `i + 1 - log2(log2(|z|^2) / 2)` is returned, which removes the banding an
/// integer count produces. Points that survive the whole budget report
/// `count == max_iter` and `escaped == false`.
pub fn evaluate(c: Complex<f64>, max_iter: u32) -> Sample {
    let mut z = Complex::new(0.0, 0.0);

    for i in 0..max_iter {
        z = z * z + c;
        let mag2 = z.norm_sqr();
        if mag2 > ESCAPE_THRESHOLD {
            return Sample {
                count: i as f64 + 1.0 - (mag2.log2() * 0.5).log2(),
                escaped: true,
            };
        }
    }
    Sample::inside(max_iter)
}
