use crate::error::ShaderError;

pub const VERTEX_ENTRY: &str = "vs_main";
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// Declarations shared by every shader surface, followed by the full-surface
/// vertex stage. Clip-space corners map onto the view corners, so `uv` is the
/// logical coordinate (+Y up) of each fragment.
const PRELUDE: &str = r#"
struct ShaderUniforms {
    viewport: vec4<f32>,
    time: f32,
};

@group(0) @binding(0) var<uniform> u: ShaderUniforms;

struct VertexOut {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(@builtin(vertex_index) index: u32) -> VertexOut {
    var corners = array<vec2<f32>, 4>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(-1.0, 1.0),
        vec2<f32>(1.0, -1.0),
        vec2<f32>(1.0, 1.0),
    );
    let c = corners[index];
    var out: VertexOut;
    out.position = vec4<f32>(c, 0.0, 1.0);
    out.uv = mix(u.viewport.xy, u.viewport.zw, c * 0.5 + vec2<f32>(0.5, 0.5));
    return out;
}
"#;

/// Assembles the full WGSL module for `fragment_source` and validates it.
///
/// Returns the complete module text on success. Parse and validation failures
/// come back as [`ShaderError::Compile`] with a rendered diagnostic; a missing
/// `fs_main` fragment entry point is reported the same way.
pub fn compile_fragment(fragment_source: &str) -> Result<String, ShaderError> {
    let source = format!("{PRELUDE}\n{fragment_source}\n");

    let module = naga::front::wgsl::parse_str(&source)
        .map_err(|err| ShaderError::Compile { message: err.emit_to_string(&source) })?;

    let has_fragment = module
        .entry_points
        .iter()
        .any(|ep| ep.name == FRAGMENT_ENTRY && ep.stage == naga::ShaderStage::Fragment);
    if !has_fragment {
        return Err(ShaderError::Compile {
            message: format!("missing `@fragment fn {FRAGMENT_ENTRY}` entry point"),
        });
    }

    naga::valid::Validator::new(naga::valid::ValidationFlags::all(), naga::valid::Capabilities::all())
        .validate(&module)
        .map_err(|err| ShaderError::Compile { message: err.emit_to_string(&source) })?;

    Ok(source)
}
