//! Value parsers for command-line options.

use graphsvg_engine::coords::{DeviceSize, Vec2};
use graphsvg_engine::input::PointerEvent;

/// A scripted primary-button drag in device coordinates.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Drag {
    pub from: Vec2,
    pub to: Vec2,
}

impl Drag {
    /// Press at `from`, move to `to`, release there.
    pub fn events(self) -> [PointerEvent; 3] {
        [
            PointerEvent::pressed(self.from.x, self.from.y),
            PointerEvent::moved(self.to.x, self.to.y),
            PointerEvent::released(self.to.x, self.to.y),
        ]
    }
}

/// `WIDTHxHEIGHT`, e.g. `640x480`.
pub fn parse_size(s: &str) -> Result<DeviceSize, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got `{s}`"))?;
    let width: u32 = w.trim().parse().map_err(|e| format!("bad width `{w}`: {e}"))?;
    let height: u32 = h.trim().parse().map_err(|e| format!("bad height `{h}`: {e}"))?;
    let size = DeviceSize::new(width, height);
    if !size.is_valid() {
        return Err(format!("size must be non-zero, got {width}x{height}"));
    }
    Ok(size)
}

/// `x0,y0,x1,y1` in device pixels.
pub fn parse_drag(s: &str) -> Result<Drag, String> {
    let values = s
        .split(',')
        .map(|v| v.trim().parse::<f64>().map_err(|e| format!("bad coordinate `{v}`: {e}")))
        .collect::<Result<Vec<_>, _>>()?;
    match values.as_slice() {
        &[x0, y0, x1, y1] => Ok(Drag { from: Vec2::new(x0, y0), to: Vec2::new(x1, y1) }),
        _ => Err(format!("expected x0,y0,x1,y1, got `{s}`")),
    }
}
