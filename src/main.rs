//! Interactive Mandelbrot explorer window.
//!
//! Renders on the GPU while f32 is precise enough and switches to CPU f64
//! beyond that. Without a usable GPU it falls back to the CPU renderer and
//! says so in the window title.
//!
//! Controls:
//!   - Mouse wheel: zoom at the cursor
//!   - Left drag: pan
//!   - Arrow keys: pan
//!   - + / -: zoom at the centre
//!   - C: next colour scheme
//!   - Q: toggle supersampling
//!   - E: fly to the next interesting location, 1-5: fly to a specific one
//!   - R: reset
//!   - S: save the current frame as PNG
//!   - Escape: quit

use clap::Parser;
use mandelview::common::constants::{WINDOW_HEIGHT, WINDOW_WIDTH};
use mandelview::common::viewport::ScreenPoint;
use mandelview::explorer::{Explorer, ExplorerOptions};
use mandelview::input::{InputEvent, Key as ExplorerKey};
use mandelview::render::CpuRenderer;
use mandelview::snapshot::{save_png, SnapshotNamer};
use mandelview::{ColorScheme, ExplorerError, SurfaceSize};
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};
use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "mandelview")]
#[command(about = "Interactive Mandelbrot explorer")]
struct Args {
    /// Real part of the initial centre
    #[arg(long, default_value_t = -0.5, allow_hyphen_values = true)]
    center_x: f64,

    /// Imaginary part of the initial centre
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    center_y: f64,

    /// Initial zoom
    #[arg(short, long, default_value_t = 0.7)]
    zoom: f64,

    #[arg(long, default_value_t = WINDOW_WIDTH)]
    width: usize,

    #[arg(long, default_value_t = WINDOW_HEIGHT)]
    height: usize,

    /// Colour scheme index (0 classic, 1 fire, 2 ocean, 3 psychedelic, 4 monochrome)
    #[arg(short, long, default_value_t = 0)]
    scheme: usize,

    /// Skip the GPU and render on the CPU only
    #[arg(long)]
    cpu: bool,

    /// Directory for snapshots taken with S
    #[arg(long, default_value = ".")]
    snapshot_dir: PathBuf,
}

/// Keys forwarded to the explorer
fn explorer_key(key: Key) -> Option<ExplorerKey> {
    let mapped = match key {
        Key::Left => ExplorerKey::Left,
        Key::Right => ExplorerKey::Right,
        Key::Up => ExplorerKey::Up,
        Key::Down => ExplorerKey::Down,
        Key::R => ExplorerKey::Char('r'),
        Key::C => ExplorerKey::Char('c'),
        Key::Q => ExplorerKey::Char('q'),
        Key::E => ExplorerKey::Char('e'),
        Key::Equal | Key::NumPadPlus => ExplorerKey::Char('+'),
        Key::Minus | Key::NumPadMinus => ExplorerKey::Char('-'),
        Key::Key1 => ExplorerKey::Char('1'),
        Key::Key2 => ExplorerKey::Char('2'),
        Key::Key3 => ExplorerKey::Char('3'),
        Key::Key4 => ExplorerKey::Char('4'),
        Key::Key5 => ExplorerKey::Char('5'),
        _ => return None,
    };
    Some(mapped)
}

/// Tracks minifb's polled mouse state and turns it into pointer events
#[derive(Default)]
struct PointerTracker {
    left_down: bool,
    last_pos: Option<ScreenPoint>,
    last_scroll: Option<(f32, f32)>,
}

impl PointerTracker {
    fn poll(&mut self, window: &Window) -> Vec<InputEvent> {
        let mut events = Vec::new();
        let Some((mx, my)) = window.get_mouse_pos(MouseMode::Discard) else {
            if self.left_down {
                events.push(InputEvent::PointerUp);
                self.left_down = false;
            }
            return events;
        };
        let pos = ScreenPoint::new(mx as f64, my as f64);

        if let Some(scroll) = window.get_scroll_wheel() {
            if self.last_scroll != Some(scroll) && scroll.1 != 0.0 {
                // minifb reports wheel-up as positive
                events.push(InputEvent::Wheel {
                    at: pos,
                    delta_y: -(scroll.1 as f64),
                });
            }
            self.last_scroll = Some(scroll);
        } else {
            self.last_scroll = None;
        }

        let left_down = window.get_mouse_down(MouseButton::Left);
        match (self.left_down, left_down) {
            (false, true) => events.push(InputEvent::PointerDown(pos)),
            (true, true) if self.last_pos != Some(pos) => events.push(InputEvent::PointerMove(pos)),
            (true, false) => events.push(InputEvent::PointerUp),
            _ => {}
        }
        self.left_down = left_down;
        self.last_pos = Some(pos);
        events
    }
}

fn build_explorer(args: &Args, fps: Rc<Cell<u32>>) -> (Explorer, Option<String>) {
    let size = SurfaceSize::new(args.width, args.height);
    let options = || {
        let fps = fps.clone();
        ExplorerOptions {
            initial_center: (args.center_x, args.center_y),
            initial_zoom: args.zoom,
            color_scheme: ColorScheme::from_index(args.scheme),
            ..Default::default()
        }
        .on_frame_rate_sample(move |sample| fps.set(sample))
    };

    if args.cpu {
        return (Explorer::new(Box::new(CpuRenderer::new()), size, options()), None);
    }

    match Explorer::with_gpu(size, options()) {
        Ok(explorer) => (explorer, None),
        Err(err) => {
            log::error!("GPU renderer unavailable: {err}");
            let notice = format!("GPU unavailable ({err}), using CPU");
            let explorer = Explorer::new(Box::new(CpuRenderer::new()), size, options());
            (explorer, Some(notice))
        }
    }
}

fn run(args: Args) -> Result<(), ExplorerError> {
    println!("Mandelbrot explorer");
    println!();
    println!("Controls:");
    println!("  - Mouse wheel: zoom at the cursor");
    println!("  - Left drag / arrow keys: pan");
    println!("  - + / -: zoom at the centre");
    println!("  - C: colour scheme   Q: supersampling on/off");
    println!("  - E: next interesting location   1-5: a specific one");
    println!("  - R: reset   S: save PNG   Escape: quit");
    println!();

    let fps = Rc::new(Cell::new(0));
    let (mut explorer, notice) = build_explorer(&args, fps.clone());
    if let Some(notice) = &notice {
        println!("{notice}");
    }

    let mut window = Window::new(
        "Mandelbrot",
        args.width,
        args.height,
        WindowOptions {
            resize: true,
            ..WindowOptions::default()
        },
    )
    .map_err(|e| ExplorerError::Window(e.to_string()))?;
    window.set_target_fps(60);

    let mut pointer = PointerTracker::default();
    let mut namer = SnapshotNamer::new(&args.snapshot_dir);
    let mut title = String::new();
    let clock = Instant::now();

    while window.is_open() && !window.is_key_down(Key::Escape) {
        let (width, height) = window.get_size();
        explorer.handle_input(InputEvent::Resize(SurfaceSize::new(width, height)));

        for key in window.get_keys_pressed(KeyRepeat::Yes) {
            if key == Key::S {
                let path = namer.next_path();
                if let Err(err) = save_png(&path, explorer.pixels(), explorer.size()) {
                    log::error!("snapshot failed: {err}");
                }
            } else if let Some(key) = explorer_key(key) {
                explorer.handle_input(InputEvent::Key(key));
            }
        }

        for event in pointer.poll(&window) {
            explorer.handle_input(event);
        }

        let now_ms = clock.elapsed().as_secs_f64() * 1000.0;
        if explorer.tick(now_ms)? == mandelview::FrameStatus::Skipped {
            window.update();
            continue;
        }

        let info = explorer.viewport();
        let next_title = format!(
            "Mandelbrot [{}] x{:.2e} iter {} | {} fps{}",
            explorer.backend_name(),
            info.zoom,
            info.iteration_budget,
            fps.get(),
            notice.as_deref().map(|n| format!(" | {n}")).unwrap_or_default()
        );
        if next_title != title {
            window.set_title(&next_title);
            title = next_title;
        }

        let size = explorer.size();
        window
            .update_with_buffer(explorer.pixels(), size.width, size.height)
            .map_err(|e| ExplorerError::Window(e.to_string()))?;
    }

    explorer.destroy();
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
