use crate::coords::{DeviceSize, Extent, Vec2};

use super::types::{ButtonState, MouseButton, PointerEvent};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum PanState {
    #[default]
    Idle,
    Pressed,
}

/// Outcome of one pointer event.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct PointerResponse {
    /// The extent moved; the graph must redraw.
    pub panned: bool,
    /// Last known device position.
    pub position: Option<Vec2>,
}

/// Drag-to-pan over an [`Extent`].
///
/// While the primary button is held, each move offsets the extent by the
/// device delta scaled to logical units. X is negated so dragging right
/// reveals content to the left; Y is not, because device and logical Y point
/// in opposite directions.
#[derive(Debug, Default)]
pub struct PanPointer {
    state: PanState,
    last: Option<Vec2>,
}

impl PanPointer {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn state(&self) -> PanState {
        self.state
    }

    #[inline]
    pub fn position(&self) -> Option<Vec2> {
        self.last
    }

    pub fn handle(&mut self, event: &PointerEvent, extent: &mut Extent, size: DeviceSize) -> PointerResponse {
        let mut panned = false;
        match *event {
            PointerEvent::Moved { position } => {
                // The first observed position is only a baseline.
                if let (PanState::Pressed, Some(last)) = (self.state, self.last) {
                    panned = Self::pan(extent, size, position - last);
                }
                self.last = Some(position);
            }
            PointerEvent::Button { button: MouseButton::Left, state, position } => {
                self.state = match state {
                    ButtonState::Pressed => PanState::Pressed,
                    ButtonState::Released => PanState::Idle,
                };
                self.last = Some(position);
            }
            PointerEvent::Button { .. } => {}
            PointerEvent::Left | PointerEvent::Focused(false) => {
                self.state = PanState::Idle;
            }
            PointerEvent::Focused(true) => {}
        }
        PointerResponse { panned, position: self.last }
    }

    fn pan(extent: &mut Extent, size: DeviceSize, delta: Vec2) -> bool {
        if !size.is_valid() || (delta.x == 0.0 && delta.y == 0.0) {
            return false;
        }
        let dx = -delta.x / size.width_f() * extent.width;
        let dy = delta.y / size.height_f() * extent.height;
        extent.offset(dx, dy);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> (PanPointer, Extent, DeviceSize) {
        (PanPointer::new(), Extent::new(0.0, 0.0, 10.0, 10.0), DeviceSize::new(100, 100))
    }

    #[test]
    fn drag_right_pans_left() {
        let (mut p, mut e, size) = fixture();
        p.handle(&PointerEvent::pressed(50.0, 50.0), &mut e, size);
        let r = p.handle(&PointerEvent::moved(60.0, 50.0), &mut e, size);
        assert!(r.panned);
        assert_eq!(e.x, -1.0);
        assert_eq!(e.y, 0.0);
    }

    #[test]
    fn drag_down_pans_up() {
        let (mut p, mut e, size) = fixture();
        p.handle(&PointerEvent::pressed(50.0, 50.0), &mut e, size);
        p.handle(&PointerEvent::moved(50.0, 60.0), &mut e, size);
        assert_eq!(e.x, 0.0);
        assert_eq!(e.y, 1.0);
    }

    #[test]
    fn moves_without_press_do_nothing() {
        let (mut p, mut e, size) = fixture();
        p.handle(&PointerEvent::moved(10.0, 10.0), &mut e, size);
        let r = p.handle(&PointerEvent::moved(40.0, 40.0), &mut e, size);
        assert!(!r.panned);
        assert_eq!(e, Extent::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(r.position, Some(Vec2::new(40.0, 40.0)));
    }

    #[test]
    fn release_stops_panning() {
        let (mut p, mut e, size) = fixture();
        p.handle(&PointerEvent::pressed(0.0, 0.0), &mut e, size);
        p.handle(&PointerEvent::released(0.0, 0.0), &mut e, size);
        p.handle(&PointerEvent::moved(20.0, 0.0), &mut e, size);
        assert_eq!(e.x, 0.0);
        assert_eq!(p.state(), PanState::Idle);
    }

    #[test]
    fn leaving_resets_to_idle() {
        let (mut p, mut e, size) = fixture();
        p.handle(&PointerEvent::pressed(0.0, 0.0), &mut e, size);
        p.handle(&PointerEvent::Left, &mut e, size);
        assert_eq!(p.state(), PanState::Idle);

        p.handle(&PointerEvent::pressed(0.0, 0.0), &mut e, size);
        p.handle(&PointerEvent::Focused(false), &mut e, size);
        assert_eq!(p.state(), PanState::Idle);
    }

    #[test]
    fn secondary_button_does_not_pan() {
        let (mut p, mut e, size) = fixture();
        let press = PointerEvent::Button {
            button: MouseButton::Right,
            state: ButtonState::Pressed,
            position: Vec2::new(0.0, 0.0),
        };
        p.handle(&press, &mut e, size);
        p.handle(&PointerEvent::moved(0.0, 0.0), &mut e, size);
        p.handle(&PointerEvent::moved(30.0, 0.0), &mut e, size);
        assert_eq!(e.x, 0.0);
    }
}
