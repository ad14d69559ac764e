//! Host-independent input events and keyboard shortcuts

use crate::common::viewport::{ScreenPoint, SurfaceSize};

/// A key as the explorer sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Left,
    Right,
    Up,
    Down,
}

/// Events the host forwards from its window. Positions are surface pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown(ScreenPoint),
    PointerMove(ScreenPoint),
    PointerUp,
    /// Positive `delta_y` scrolls down, i.e. zooms out
    Wheel { at: ScreenPoint, delta_y: f64 },
    TouchStart(Vec<ScreenPoint>),
    TouchMove(Vec<ScreenPoint>),
    TouchEnd,
    Key(Key),
    Resize(SurfaceSize),
}

/// What a single-key shortcut does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Reset,
    CycleColorScheme,
    ZoomIn,
    ZoomOut,
    ToggleQuality,
    /// Screen-fraction pan, y up
    Pan(i8, i8),
    NextLocation,
    Location(usize),
}

impl KeyCommand {
    pub fn from_key(key: Key) -> Option<Self> {
        let command = match key {
            Key::Left => KeyCommand::Pan(-1, 0),
            Key::Right => KeyCommand::Pan(1, 0),
            Key::Up => KeyCommand::Pan(0, 1),
            Key::Down => KeyCommand::Pan(0, -1),
            Key::Char(c) => match c.to_ascii_lowercase() {
                'r' => KeyCommand::Reset,
                'c' => KeyCommand::CycleColorScheme,
                '+' | '=' => KeyCommand::ZoomIn,
                '-' | '_' => KeyCommand::ZoomOut,
                'q' => KeyCommand::ToggleQuality,
                'e' => KeyCommand::NextLocation,
                d @ '1'..='9' => KeyCommand::Location(d as usize - '1' as usize),
                _ => return None,
            },
        };
        Some(command)
    }
}
