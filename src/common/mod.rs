//! Pure math shared by every renderer: no surfaces, no GPU

pub mod colors;
pub mod constants;
pub mod mandelbrot;
pub mod transition;
pub mod viewport;
