//! Raster export and clipboard.
//!
//! Shader surfaces are stacked in creation order first, then the SVG output
//! is rendered over them, matching how the graph presents them live.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use graphsvg_engine::Graph;
use image::{DynamicImage, ImageFormat, RgbaImage};
use log::{debug, warn};
use resvg::tiny_skia::{IntSize, Pixmap, PixmapPaint, Transform};
use resvg::usvg;

/// Renders the graph's current frame to an RGBA image.
pub fn rasterize(graph: &Graph) -> Result<RgbaImage> {
    let size = graph.size();
    let mut pixmap = Pixmap::new(size.width, size.height)
        .ok_or_else(|| anyhow!("cannot allocate a {}x{} image", size.width, size.height))?;

    for (id, surface) in graph.rasters().iter() {
        let Some(pixels) = surface.read_pixels() else {
            warn!("shader surface {id:?} cannot be read back; leaving it out");
            continue;
        };
        let layer = surface_pixmap(pixels, surface.size().width, surface.size().height)
            .with_context(|| format!("shader surface {id:?} returned a malformed frame"))?;
        pixmap.draw_pixmap(0, 0, layer.as_ref(), &PixmapPaint::default(), Transform::identity(), None);
    }

    let mut options = usvg::Options::default();
    options.fontdb_mut().load_system_fonts();
    let svg = graph.to_svg();
    let tree = usvg::Tree::from_str(&svg, &options).context("failed to parse generated SVG")?;
    resvg::render(&tree, Transform::identity(), &mut pixmap.as_mut());

    let data = demultiply(&pixmap);
    RgbaImage::from_raw(size.width, size.height, data)
        .ok_or_else(|| anyhow!("image buffer does not match {}x{}", size.width, size.height))
}

/// Saves with the format implied by the extension. JPEG drops alpha.
pub fn save_image(image: RgbaImage, path: &Path) -> Result<()> {
    let format = ImageFormat::from_path(path)
        .with_context(|| format!("cannot tell the image format of {}", path.display()))?;
    let image = DynamicImage::ImageRgba8(image);
    let result = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(image.to_rgb8()).save_with_format(path, format),
        _ => image.save_with_format(path, format),
    };
    result.with_context(|| format!("failed to write {}", path.display()))?;
    debug!("wrote {}", path.display());
    Ok(())
}

/// Places `text` on the system clipboard.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new().context("clipboard unavailable")?;
    clipboard.set_text(text.to_owned()).context("failed to set clipboard text")?;
    Ok(())
}

/// Straight RGBA8 rows from a shader readback to a premultiplied pixmap.
fn surface_pixmap(mut pixels: Vec<u8>, width: u32, height: u32) -> Result<Pixmap> {
    for px in pixels.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * a + 127) / 255) as u8;
        }
    }
    let size = IntSize::from_wh(width, height).ok_or_else(|| anyhow!("empty surface"))?;
    Pixmap::from_vec(pixels, size).ok_or_else(|| anyhow!("expected {} bytes", width as usize * height as usize * 4))
}

fn demultiply(pixmap: &Pixmap) -> Vec<u8> {
    let mut out = Vec::with_capacity(pixmap.data().len());
    for px in pixmap.pixels() {
        let c = px.demultiply();
        out.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    out
}
