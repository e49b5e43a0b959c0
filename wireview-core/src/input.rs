/// Input events fed into the viewer by the host loop
use std::path::PathBuf;

/// Movement axes controlled by the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

/// Movement key states, held between events.
#[derive(Debug, Clone, Copy, Default)]
pub struct MovementFlags {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl MovementFlags {
    pub fn set(&mut self, direction: MoveDirection, pressed: bool) {
        match direction {
            MoveDirection::Forward => self.forward = pressed,
            MoveDirection::Backward => self.backward = pressed,
            MoveDirection::Left => self.left = pressed,
            MoveDirection::Right => self.right = pressed,
            MoveDirection::Up => self.up = pressed,
            MoveDirection::Down => self.down = pressed,
        }
    }
}

/// One input event, delivered by the host loop each tick. The core
/// never registers callbacks with the windowing layer; the host polls
/// its event source and forwards whatever maps onto these.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A movement key changed state.
    Move { direction: MoveDirection, pressed: bool },
    /// Relative look deltas in pixels (mouse or equivalent).
    Look { dx: f32, dy: f32 },
    /// Pointer button pressed (the host typically captures the pointer).
    PointerPressed,
    /// A mesh file was dropped onto or selected in the host window.
    FileDrop(PathBuf),
}
