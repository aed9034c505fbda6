//! Pointer input: an abstract event stream plus per-frame pointer state.
//!
//! Mouse and touch both arrive as `PointerEvent`s keyed by `PointerId`, the same
//! shape browsers use, so the client never looks at window-system types.

use glam::Vec2;
use std::collections::HashMap;
use winit::event::{ElementState, MouseButton, TouchPhase, WindowEvent};

/// Identifies one pointer (the mouse, or one finger).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointerId(pub u64);

impl PointerId {
    /// The one mouse pointer.
    pub const MOUSE: PointerId = PointerId(0);

    /// Touch ids are offset so they never collide with the mouse.
    pub fn touch(id: u64) -> Self {
        PointerId(id.wrapping_add(1))
    }
}

/// Which button a press or release is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
    Other(u16),
}

impl From<MouseButton> for PointerButton {
    fn from(button: MouseButton) -> Self {
        match button {
            MouseButton::Left => PointerButton::Primary,
            MouseButton::Right => PointerButton::Secondary,
            MouseButton::Middle => PointerButton::Middle,
            MouseButton::Back => PointerButton::Other(3),
            MouseButton::Forward => PointerButton::Other(4),
            MouseButton::Other(n) => PointerButton::Other(n),
        }
    }
}

/// What happened to the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEventKind {
    Down(PointerButton),
    Move,
    Up(PointerButton),
    Cancel,
    Leave,
}

/// One pointer event, positioned in viewport pixels (origin top-left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub id: PointerId,
    pub position: Vec2,
    pub kind: PointerEventKind,
}

impl PointerEvent {
    pub fn down(id: PointerId, position: Vec2, button: PointerButton) -> Self {
        Self { id, position, kind: PointerEventKind::Down(button) }
    }

    pub fn moved(id: PointerId, position: Vec2) -> Self {
        Self { id, position, kind: PointerEventKind::Move }
    }

    pub fn up(id: PointerId, position: Vec2, button: PointerButton) -> Self {
        Self { id, position, kind: PointerEventKind::Up(button) }
    }

    pub fn cancel(id: PointerId, position: Vec2) -> Self {
        Self { id, position, kind: PointerEventKind::Cancel }
    }

    pub fn leave(id: PointerId, position: Vec2) -> Self {
        Self { id, position, kind: PointerEventKind::Leave }
    }

    /// Whether this event ends any gesture the pointer had in progress.
    pub fn is_release(&self) -> bool {
        matches!(
            self.kind,
            PointerEventKind::Up(_) | PointerEventKind::Cancel | PointerEventKind::Leave
        )
    }
}

/// Where each pointer is, and which one was active last.
#[derive(Debug, Default)]
pub struct PointerState {
    /// Last known position of every pointer seen over the canvas.
    positions: HashMap<PointerId, Vec2>,
    /// Pointer that most recently moved or pressed.
    last_active: Option<PointerId>,
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event. Cancel and leave forget the pointer entirely.
    pub fn process(&mut self, event: &PointerEvent) {
        let id = event.id;
        match event.kind {
            PointerEventKind::Down(_) | PointerEventKind::Move => {
                self.positions.insert(id, event.position);
                self.last_active = Some(id);
            }
            PointerEventKind::Up(_) => {
                self.positions.insert(id, event.position);
            }
            PointerEventKind::Cancel | PointerEventKind::Leave => {
                self.positions.remove(&id);
                if self.last_active == Some(id) {
                    self.last_active = None;
                }
            }
        }
    }

    /// Last known position of `id`, if it is still over the canvas.
    pub fn position(&self, id: PointerId) -> Option<Vec2> {
        self.positions.get(&id).copied()
    }

    /// Position of the pointer most recently active over the canvas.
    pub fn hover_position(&self) -> Option<Vec2> {
        self.last_active.and_then(|id| self.position(id))
    }
}

/// Turns window events into pointer events. Mouse buttons carry no position in
/// winit, so the last cursor position is remembered here.
#[derive(Debug, Default)]
pub struct WindowPointer {
    cursor: Vec2,
}

impl WindowPointer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The pointer event for `event`, or `None` for non-pointer window events.
    pub fn translate(&mut self, event: &WindowEvent) -> Option<PointerEvent> {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Vec2::new(position.x as f32, position.y as f32);
                Some(PointerEvent::moved(PointerId::MOUSE, self.cursor))
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let button = PointerButton::from(*button);
                Some(match state {
                    ElementState::Pressed => PointerEvent::down(PointerId::MOUSE, self.cursor, button),
                    ElementState::Released => PointerEvent::up(PointerId::MOUSE, self.cursor, button),
                })
            }
            WindowEvent::CursorLeft { .. } => Some(PointerEvent::leave(PointerId::MOUSE, self.cursor)),
            WindowEvent::Touch(touch) => {
                let id = PointerId::touch(touch.id);
                let position = Vec2::new(touch.location.x as f32, touch.location.y as f32);
                Some(match touch.phase {
                    TouchPhase::Started => PointerEvent::down(id, position, PointerButton::Primary),
                    TouchPhase::Moved => PointerEvent::moved(id, position),
                    TouchPhase::Ended => PointerEvent::up(id, position, PointerButton::Primary),
                    TouchPhase::Cancelled => PointerEvent::cancel(id, position),
                })
            }
            _ => None,
        }
    }
}
