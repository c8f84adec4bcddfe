//! Error types.
//!
//! Two classes reach callers:
//! - [`ShaderError`]: host/environment incapability (no backend, bad shader).
//!   Fatal, reported where the surface is created, never retried.
//! - [`DrawError::Params`] / [`DrawError::Unknown`]: a single command is
//!   malformed. Layers log it and skip the command; it never leaves
//!   `Layer::add`/`draw`.

use std::fmt;

/// Failure to create or drive a shader-backed raster surface.
#[derive(Debug, Clone, PartialEq)]
pub enum ShaderError {
    /// A `shader` command ran on a graph without a raster backend.
    NoBackend,
    /// The fragment source failed to parse or validate.
    Compile { message: String },
    /// The backend could not allocate GPU resources.
    Device { message: String },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::NoBackend => write!(f, "no raster backend available for shader surfaces"),
            ShaderError::Compile { message } => write!(f, "could not compile fragment shader:\n{message}"),
            ShaderError::Device { message } => write!(f, "shader surface device error: {message}"),
        }
    }
}

impl std::error::Error for ShaderError {}

/// Failure of a single primitive invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawError {
    /// Wrong number or kind of arguments. Non-fatal.
    Params { primitive: &'static str, message: String },
    /// No primitive is registered under `key`. Non-fatal.
    Unknown { key: String },
    /// Fatal shader/backend failure.
    Shader(ShaderError),
}

impl DrawError {
    pub(crate) fn params(primitive: &'static str, message: impl Into<String>) -> Self {
        DrawError::Params { primitive, message: message.into() }
    }

    #[inline]
    pub fn is_fatal(&self) -> bool {
        matches!(self, DrawError::Shader(_))
    }
}

impl fmt::Display for DrawError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawError::Params { primitive, message } => write!(f, "{primitive}: {message}"),
            DrawError::Unknown { key } => write!(f, "unknown primitive \"{key}\""),
            DrawError::Shader(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for DrawError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DrawError::Shader(err) => Some(err),
            DrawError::Params { .. } | DrawError::Unknown { .. } => None,
        }
    }
}

impl From<ShaderError> for DrawError {
    fn from(err: ShaderError) -> Self {
        DrawError::Shader(err)
    }
}

/// Error surfaced by [`Layer`](crate::layer::Layer) and [`Graph`](crate::graph::Graph)
/// operations. Only fatal conditions make it this far.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphError {
    Shader { layer: String, key: String, source: ShaderError },
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::Shader { layer, key, source } => {
                write!(f, "layer \"{layer}\" failed to draw [{key}]: {source}")
            }
        }
    }
}

impl std::error::Error for GraphError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GraphError::Shader { source, .. } => Some(source),
        }
    }
}
