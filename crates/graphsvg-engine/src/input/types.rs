use crate::coords::Vec2;

/// Mouse button identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ButtonState {
    Pressed,
    Released,
}

/// Platform-agnostic pointer events.
///
/// Positions are device units relative to the graph's top-left corner.
/// Hosts translate their window system events into these.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PointerEvent {
    Moved { position: Vec2 },
    Button { button: MouseButton, state: ButtonState, position: Vec2 },
    /// Pointer left the output surface.
    Left,
    /// Host focus change.
    Focused(bool),
}

impl PointerEvent {
    #[inline]
    pub fn moved(x: f64, y: f64) -> Self {
        PointerEvent::Moved { position: Vec2::new(x, y) }
    }

    #[inline]
    pub fn pressed(x: f64, y: f64) -> Self {
        PointerEvent::Button { button: MouseButton::Left, state: ButtonState::Pressed, position: Vec2::new(x, y) }
    }

    #[inline]
    pub fn released(x: f64, y: f64) -> Self {
        PointerEvent::Button { button: MouseButton::Left, state: ButtonState::Released, position: Vec2::new(x, y) }
    }

    /// Device position carried by the event, if any.
    pub fn position(&self) -> Option<Vec2> {
        match self {
            PointerEvent::Moved { position } | PointerEvent::Button { position, .. } => Some(*position),
            PointerEvent::Left | PointerEvent::Focused(_) => None,
        }
    }
}
