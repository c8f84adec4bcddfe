//! Built-in primitives.
//!
//! Every primitive has the same shape: it reads the [`RenderFrame`], appends
//! to the frame's container (or the raster stack) and returns a handle to
//! what it produced. None of them keep state between calls.

use std::fmt::Write;

use crate::error::{DrawError, ShaderError};
use crate::scene::{NodeId, Scene, Tag};
use crate::shader::ShaderUniforms;

use super::frame::{DrawTarget, Handle, RenderFrame};
use super::params::{Param, Props};
use super::range::{grid_steps, samples};

pub mod defaults {
    pub const STROKE: &str = "black";
    pub const GRID_STEP: f64 = 1.0;
    pub const GRID_OPACITY: f64 = 0.1;
    /// Grid lines closer than this to zero count as the axis.
    pub const ZERO_EPSILON: f64 = 1e-6;
    /// Device-space distance between `func` samples.
    pub const SAMPLE_STEP: f64 = 3.0;
    pub const POINT_RADIUS: f64 = 4.0;
    pub const LABEL_OFFSET: f64 = 5.0;
    pub const LABEL_STYLE: &str = "font-size: 8px;";
}

fn number(primitive: &'static str, params: &[Param], index: usize) -> Result<f64, DrawError> {
    match params.get(index) {
        Some(Param::Number(v)) => Ok(*v),
        Some(other) => Err(DrawError::params(
            primitive,
            format!("argument {} must be a number, got {}", index + 1, other.kind()),
        )),
        None => Err(DrawError::params(primitive, format!("missing argument {}", index + 1))),
    }
}

fn optional_number(primitive: &'static str, params: &[Param], index: usize) -> Result<Option<f64>, DrawError> {
    match params.get(index) {
        None => Ok(None),
        Some(_) => number(primitive, params, index).map(Some),
    }
}

/// Copies every prop not in `skip` onto `id`.
fn apply_props(scene: &mut Scene, id: NodeId, props: &Props, skip: &[&str]) {
    for (key, value) in props.iter_except(skip) {
        scene.set_attr(id, key, value);
    }
}

fn child(scene: &mut Scene, parent: NodeId, tag: Tag) -> NodeId {
    let id = scene.create(tag);
    scene.append(parent, id);
    id
}

fn vertical(scene: &mut Scene, frame: &RenderFrame, x: f64, props: &Props) -> NodeId {
    let x = frame.device_x(x);
    let line = child(scene, frame.container, Tag::Line);
    scene.set_attr(line, "x1", x);
    scene.set_attr(line, "x2", x);
    scene.set_attr(line, "y1", 0);
    scene.set_attr(line, "y2", frame.size.height);
    scene.set_attr(line, "stroke", props.get("stroke").unwrap_or(defaults::STROKE));
    apply_props(scene, line, props, &["stroke"]);
    line
}

fn horizontal(scene: &mut Scene, frame: &RenderFrame, y: f64, props: &Props) -> NodeId {
    let y = frame.device_y(y);
    let line = child(scene, frame.container, Tag::Line);
    scene.set_attr(line, "x1", 0);
    scene.set_attr(line, "x2", frame.size.width);
    scene.set_attr(line, "y1", y);
    scene.set_attr(line, "y2", y);
    scene.set_attr(line, "stroke", props.get("stroke").unwrap_or(defaults::STROKE));
    apply_props(scene, line, props, &["stroke"]);
    line
}

/// `lineX x`: vertical guide at logical `x`, spanning the device height.
pub fn line_x(
    target: &mut DrawTarget<'_>,
    frame: &RenderFrame,
    params: &[Param],
    props: &Props,
) -> Result<Option<Handle>, DrawError> {
    let x = number("lineX", params, 0)?;
    Ok(Some(Handle::Node(vertical(target.scene, frame, x, props))))
}

/// `lineY y`: horizontal guide at logical `y`, spanning the device width.
pub fn line_y(
    target: &mut DrawTarget<'_>,
    frame: &RenderFrame,
    params: &[Param],
    props: &Props,
) -> Result<Option<Handle>, DrawError> {
    let y = number("lineY", params, 0)?;
    Ok(Some(Handle::Node(horizontal(target.scene, frame, y, props))))
}

/// `grid step`: one guide per multiple of `step` in view, inside its own group.
///
/// The step comes from the first argument, then the `step` prop, then
/// [`defaults::GRID_STEP`]. Lines at zero are drawn opaque; all others use the
/// `opacity` prop or [`defaults::GRID_OPACITY`].
pub fn grid(
    target: &mut DrawTarget<'_>,
    frame: &RenderFrame,
    params: &[Param],
    props: &Props,
) -> Result<Option<Handle>, DrawError> {
    let step = match optional_number("grid", params, 0)? {
        Some(step) => step,
        None => props.get_f64("step").unwrap_or(defaults::GRID_STEP),
    };
    if !(step > 0.0 && step.is_finite()) {
        return Err(DrawError::params("grid", format!("step must be positive, got {step}")));
    }

    let color = props.get("color").unwrap_or(defaults::STROKE);
    let faint = props.get_f64("opacity").unwrap_or(defaults::GRID_OPACITY);
    let line_props = |v: f64| {
        let opacity = if v.abs() > defaults::ZERO_EPSILON { faint } else { 1.0 };
        Props::new().with("stroke", color).with("stroke-opacity", opacity)
    };

    let scene = &mut *target.scene;
    let g = child(scene, frame.container, Tag::Group);
    let inner = frame.with_container(g);
    let e = frame.extent;

    for x in grid_steps(e.x, e.max_x(), step) {
        vertical(scene, &inner, x, &line_props(x));
    }
    for y in grid_steps(e.y, e.max_y(), step) {
        horizontal(scene, &inner, y, &line_props(y));
    }

    Ok(Some(Handle::Node(g)))
}

/// `func f`: polyline through `f` sampled every few device units across the
/// full width plus a stroke-sized margin on each side.
pub fn func(
    target: &mut DrawTarget<'_>,
    frame: &RenderFrame,
    params: &[Param],
    props: &Props,
) -> Result<Option<Handle>, DrawError> {
    let f = match params.first() {
        Some(Param::Function(f)) => f,
        Some(other) => {
            return Err(DrawError::params("func", format!("argument 1 must be a function, got {}", other.kind())));
        }
        None => return Err(DrawError::params("func", "missing function argument")),
    };

    let width = frame.size.width_f();
    let margin = 1.0 + props.get_length("stroke-width").unwrap_or(0.0) / 2.0;

    let mut points = String::new();
    for x in samples(-margin, width + margin, defaults::SAMPLE_STEP, true) {
        let y = f.call(frame.extent.local_x(x / width));
        let y = frame.device_y(y);
        if !(x.is_finite() && y.is_finite()) {
            continue;
        }
        if !points.is_empty() {
            points.push(' ');
        }
        let _ = write!(points, "{x:.1},{y:.1}");
    }

    let scene = &mut *target.scene;
    let line = child(scene, frame.container, Tag::Polyline);
    scene.set_attr(line, "points", points);
    scene.set_attr(line, "stroke", props.get("stroke").unwrap_or(defaults::STROKE));
    scene.set_attr(line, "fill", "none");
    apply_props(scene, line, props, &["stroke", "blend"]);
    Ok(Some(Handle::Node(line)))
}

/// `point x, y`: fixed-radius marker, grouped with a text label when the
/// `label` prop is present.
pub fn point(
    target: &mut DrawTarget<'_>,
    frame: &RenderFrame,
    params: &[Param],
    props: &Props,
) -> Result<Option<Handle>, DrawError> {
    let x = number("point", params, 0)?;
    let y = number("point", params, 1)?;
    let color = props.get("color").unwrap_or(defaults::STROKE);
    let cx = frame.device_x(x);
    let cy = frame.device_y(y);

    let scene = &mut *target.scene;
    let label = props.get("label").filter(|l| !l.is_empty());
    let parent = match label {
        Some(_) => child(scene, frame.container, Tag::Group),
        None => frame.container,
    };

    let marker = child(scene, parent, Tag::Circle);
    scene.set_attr(marker, "cx", cx);
    scene.set_attr(marker, "cy", cy);
    scene.set_attr(marker, "r", defaults::POINT_RADIUS);
    scene.set_attr(marker, "fill", color);
    scene.set_attr(marker, "stroke", "none");

    let Some(label) = label else {
        return Ok(Some(Handle::Node(marker)));
    };

    let text = child(scene, parent, Tag::Text);
    scene.set_attr(text, "x", cx + defaults::LABEL_OFFSET);
    scene.set_attr(text, "y", cy);
    scene.set_attr(text, "style", defaults::LABEL_STYLE);
    scene.set_attr(text, "fill", color);
    scene.set_attr(text, "stroke", "none");
    scene.set_text(text, label);
    Ok(Some(Handle::Node(parent)))
}

/// `shader source`: full-surface fragment pass behind the vector scene.
///
/// Reuses the surface from a previous pass when the frame carries one.
/// Allocation failures are fatal.
pub fn shader(
    target: &mut DrawTarget<'_>,
    frame: &RenderFrame,
    params: &[Param],
    _props: &Props,
) -> Result<Option<Handle>, DrawError> {
    if let Some(Handle::Surface(id)) = frame.current {
        if target.rasters.contains(id) {
            return Ok(Some(Handle::Surface(id)));
        }
    }

    let source = match params.first() {
        Some(Param::Text(source)) => source,
        Some(other) => {
            return Err(DrawError::params("shader", format!("argument 1 must be text, got {}", other.kind())));
        }
        None => return Err(DrawError::params("shader", "missing fragment source")),
    };

    let backend = target.backend.as_mut().ok_or(ShaderError::NoBackend)?;
    let mut program = backend.create_program(source, frame.size)?;
    program.render(&ShaderUniforms::new(frame.extent, 0.0));
    let id = target.rasters.insert(source.as_str(), frame.size, program);
    log::debug!("shader surface {id:?} created");
    Ok(Some(Handle::Surface(id)))
}
