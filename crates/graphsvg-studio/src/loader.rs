//! `.graph` document → [`GraphDecl`].
//!
//! The root node must be `graph`. Its `view`, `size` and `grid` properties
//! configure the graph; every child becomes one command, routed to the
//! `main` layer unless it carries a `layer:` property.
//!
//! ```text
//! graph view: -4, -4, 8, 8  size: 400, 400  grid: 1 {
//!     func `1.5 * sin(x * 2)` { stroke: "#fe3"  blend: multiply }
//!     point 1, 2 { label: "A" }
//!     shader "..." { layer: background }
//! }
//! ```

use std::fmt;

use exmex::prelude::*;
use graphsvg_engine::coords::{DeviceSize, Extent};
use graphsvg_engine::draw::{Func, Param, Props};
use graphsvg_engine::{CommandDecl, GraphDecl};
use graphsvg_markup::{parse_str, Document, Node, ParseError, Prop, Value};
use log::{debug, warn};

/// Layer that receives commands without a `layer:` property.
pub const MAIN_LAYER: &str = "main";

/// Layer that receives the background grid.
pub const GRID_LAYER: &str = "grid";

/// Error while turning a document into a graph description.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadError {
    /// The source did not parse.
    Parse(ParseError),
    /// The document parsed but does not describe a graph.
    Invalid { message: String, line: usize, col: usize },
}

impl LoadError {
    fn invalid(node: &Node, message: impl Into<String>) -> Self {
        LoadError::Invalid { message: message.into(), line: node.line, col: node.col }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Parse(err) => err.fmt(f),
            LoadError::Invalid { message, line, col } => write!(f, "{line}:{col}: {message}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Parse(err) => Some(err),
            LoadError::Invalid { .. } => None,
        }
    }
}

impl From<ParseError> for LoadError {
    fn from(err: ParseError) -> Self {
        LoadError::Parse(err)
    }
}

/// Parses `src` and converts it in one step.
pub fn load_str(src: &str) -> Result<GraphDecl, LoadError> {
    let doc = parse_str(src)?;
    decl_from_document(&doc)
}

pub fn decl_from_document(doc: &Document) -> Result<GraphDecl, LoadError> {
    let root = &doc.root;
    if root.name != "graph" {
        return Err(LoadError::invalid(root, format!("expected a `graph` root, found `{}`", root.name)));
    }
    if !root.args.is_empty() {
        warn!("graph at {}:{} ignores its {} argument(s)", root.line, root.col, root.args.len());
    }

    let mut decl = GraphDecl::default();

    if let Some(prop) = root.prop("view") {
        let [x, y, width, height] = numbers::<4>(root, prop)?;
        decl.view = Some(Extent::new(x, y, width, height));
    }

    if let Some(prop) = root.prop("size") {
        let [width, height] = numbers::<2>(root, prop)?;
        decl.size = Some(DeviceSize::new(pixels(root, width)?, pixels(root, height)?));
    }

    if let Some(step) = grid_step(root)? {
        decl.commands.push(CommandDecl::new(GRID_LAYER, "grid", vec![Param::Number(step)], Props::new()));
    }

    for key in root.props.iter().map(|p| p.key.as_str()) {
        if !matches!(key, "view" | "size" | "grid") {
            warn!("graph at {}:{} ignores unknown property `{key}`", root.line, root.col);
        }
    }

    for child in &root.children {
        decl.commands.push(command(child)?);
    }

    debug!("loaded graph with {} command(s)", decl.commands.len());
    Ok(decl)
}

/// `grid: <step>` or `grid: none`. Defaults to a unit grid.
fn grid_step(root: &Node) -> Result<Option<f64>, LoadError> {
    let Some(prop) = root.prop("grid") else { return Ok(Some(1.0)) };
    match prop.single() {
        Some(Value::Ident(s)) if s == "none" => Ok(None),
        Some(Value::Number(step)) if *step > 0.0 && step.is_finite() => Ok(Some(*step)),
        _ => Err(LoadError::invalid(root, "`grid` must be a positive number or `none`")),
    }
}

fn command(node: &Node) -> Result<CommandDecl, LoadError> {
    if !node.children.is_empty() {
        return Err(LoadError::invalid(node, format!("`{}` cannot contain nodes", node.name)));
    }

    let params = node.args.iter().map(|arg| param(node, arg)).collect::<Result<Vec<_>, _>>()?;

    let mut layer = MAIN_LAYER.to_string();
    let mut props = Props::new();
    for prop in &node.props {
        if prop.key == "layer" {
            layer = match prop.single() {
                Some(Value::Ident(name) | Value::Str(name)) if !name.is_empty() => name.clone(),
                _ => return Err(LoadError::invalid(node, "`layer` must be a single name")),
            };
        } else {
            props.set(prop.key.as_str(), prop_text(prop));
        }
    }

    Ok(CommandDecl::new(layer, node.name.as_str(), params, props))
}

fn param(node: &Node, arg: &Value) -> Result<Param, LoadError> {
    Ok(match arg {
        Value::Number(n) => Param::Number(*n),
        Value::Str(s) => Param::Text(dedent(s)),
        Value::Expr(src) => Param::Function(compile(node, src)?),
        Value::Ident(s) | Value::Color(s) => Param::Text(s.clone()),
    })
}

/// Multi-value properties join with commas, as in `stroke-dasharray: 4, 2`.
fn prop_text(prop: &Prop) -> String {
    prop.values.iter().map(Value::to_string).collect::<Vec<_>>().join(",")
}

/// Compiles a backtick expression over the single variable `x`.
///
/// Evaluation errors at a sample yield `NaN`, which `func` skips.
fn compile(node: &Node, src: &str) -> Result<Func, LoadError> {
    let expr = exmex::parse::<f64>(src)
        .map_err(|e| LoadError::invalid(node, format!("bad expression `{src}`: {e}")))?;

    let vars = expr.var_names().to_vec();
    match vars.as_slice() {
        [] => {
            let value = expr.eval(&[]).unwrap_or(f64::NAN);
            Ok(Func::new(move |_| value))
        }
        [var] if var == "x" => Ok(Func::new(move |x| expr.eval(&[x]).unwrap_or(f64::NAN))),
        vars => Err(LoadError::invalid(
            node,
            format!("expression `{src}` may only use `x`, found {}", vars.join(", ")),
        )),
    }
}

fn numbers<const N: usize>(node: &Node, prop: &Prop) -> Result<[f64; N], LoadError> {
    prop.numbers()
        .and_then(|values| <[f64; N]>::try_from(values).ok())
        .ok_or_else(|| LoadError::invalid(node, format!("`{}` takes {N} numbers", prop.key)))
}

fn pixels(node: &Node, value: f64) -> Result<u32, LoadError> {
    if value.fract() == 0.0 && value >= 1.0 && value <= f64::from(u32::MAX) {
        Ok(value as u32)
    } else {
        Err(LoadError::invalid(node, format!("`size` needs positive whole pixels, got {value}")))
    }
}

/// Drops blank lines and strips the first line's indentation from every
/// line that starts with it.
pub fn dedent(s: &str) -> String {
    let lines: Vec<&str> = s.lines().filter(|l| !l.trim().is_empty()).collect();
    let Some(first) = lines.first() else { return String::new() };
    let heading = &first[..first.len() - first.trim_start().len()];
    lines
        .iter()
        .map(|l| l.strip_prefix(heading).unwrap_or(*l))
        .collect::<Vec<_>>()
        .join("\n")
}
