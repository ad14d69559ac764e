//! Renders a single frame of a viewport to PNG without opening a window.

use clap::Parser;
use mandelview::common::constants::{WINDOW_HEIGHT, WINDOW_WIDTH};
use mandelview::common::viewport::ViewportController;
use mandelview::render::{CpuRenderer, FrameParams, HybridRenderer, RenderBackend};
use mandelview::snapshot::save_png;
use mandelview::{ColorScheme, QualitySchedule, Result, SurfaceSize};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "mandelview-still")]
#[command(about = "Render one Mandelbrot frame to a PNG file")]
struct Args {
    #[arg(long, default_value_t = -0.5, allow_hyphen_values = true)]
    center_x: f64,

    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    center_y: f64,

    #[arg(short, long, default_value_t = 0.7)]
    zoom: f64,

    #[arg(long, default_value_t = WINDOW_WIDTH)]
    width: usize,

    #[arg(long, default_value_t = WINDOW_HEIGHT)]
    height: usize,

    /// Colour scheme index (0 classic, 1 fire, 2 ocean, 3 psychedelic, 4 monochrome)
    #[arg(short, long, default_value_t = 0)]
    scheme: usize,

    /// Animation time in seconds, only visible with the psychedelic scheme
    #[arg(long, default_value_t = 0.0)]
    time: f64,

    /// Override the zoom-derived supersampling factor
    #[arg(long)]
    supersampling: Option<f64>,

    /// Render on the CPU only
    #[arg(long)]
    cpu: bool,

    #[arg(short, long, default_value = "mandelbrot.png")]
    output: PathBuf,
}

fn backend(cpu_only: bool) -> Box<dyn RenderBackend> {
    if cpu_only {
        return Box::new(CpuRenderer::new());
    }
    match HybridRenderer::new() {
        Ok(hybrid) => Box::new(hybrid),
        Err(err) => {
            log::warn!("GPU unavailable ({err}), rendering on the CPU");
            Box::new(CpuRenderer::new())
        }
    }
}

fn run(args: Args) -> Result<()> {
    let size = SurfaceSize::new(args.width, args.height);
    let controller = ViewportController::new(
        (args.center_x, args.center_y),
        args.zoom,
        QualitySchedule::default(),
    );

    let mut params = FrameParams::new(
        controller.viewport(),
        ColorScheme::from_index(args.scheme),
        args.time,
        size,
    );
    if let Some(ss) = args.supersampling {
        params.supersampling = ss;
    }

    let mut backend = backend(args.cpu);
    let mut pixels = vec![0u32; size.pixel_count()];

    let start = Instant::now();
    backend.render(&params, &mut pixels)?;
    println!(
        "rendered {}x{} in {:.2?} on {} | {}",
        size.width,
        size.height,
        start.elapsed(),
        backend.name(),
        controller.viewport()
    );

    save_png(&args.output, &pixels, size)?;
    println!("saved {}", args.output.display());
    backend.release();
    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(err) = run(Args::parse()) {
        log::error!("{err}");
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
