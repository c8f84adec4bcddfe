use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use graphsvg_engine::coords::DeviceSize;
use graphsvg_engine::device::{Gpu, GpuInit};
use graphsvg_engine::logging::{init_logging, LoggingConfig};
use graphsvg_engine::shader::GpuBackend;
use graphsvg_engine::time::FrameTime;
use graphsvg_engine::{Graph, GraphConfig};
use graphsvg_studio::args::{parse_drag, parse_size, Drag};
use graphsvg_studio::{export, load_str};
use log::{info, warn};

/// Animation frames advance at this fixed rate when `--frames` is given.
const FRAME_DT: f32 = 1.0 / 60.0;

#[derive(Parser)]
#[command(author, version, about = "Render .graph documents to SVG and raster images", long_about = None)]
struct Cli {
    /// `.graph` document to render.
    input: PathBuf,
    /// Write the SVG here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Rasterize to this file (png, jpg or bmp, by extension).
    #[arg(long)]
    png: Option<PathBuf>,
    /// Override the document size, as WIDTHxHEIGHT.
    #[arg(long, value_parser = parse_size)]
    size: Option<DeviceSize>,
    /// Primary-button drag x0,y0,x1,y1 in device pixels. Repeatable.
    #[arg(long = "drag", value_parser = parse_drag)]
    drags: Vec<Drag>,
    /// Advance shader animations by this many frames.
    #[arg(long, default_value_t = 0)]
    frames: u64,
    /// Enable shader surfaces on a headless GPU.
    #[arg(long)]
    gpu: bool,
    /// Also copy the SVG to the clipboard.
    #[arg(long)]
    copy: bool,
    /// More log output (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(LoggingConfig::verbosity(cli.verbose));

    let src = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let decl = load_str(&src).with_context(|| format!("failed to load {}", cli.input.display()))?;

    let mut graph = Graph::new(GraphConfig::default());
    if cli.gpu {
        let gpu = Gpu::headless(GpuInit::default()).context("--gpu needs a usable adapter")?;
        graph = graph.with_backend(Box::new(GpuBackend::new(&gpu)));
    }

    graph.init(decl).context("failed to initialize graph")?;

    if let Some(size) = cli.size {
        graph.set_size(size.width, size.height);
    }

    for drag in &cli.drags {
        for event in drag.events() {
            graph.handle_pointer(event);
        }
    }
    if !cli.drags.is_empty() {
        let [x0, y0, x1, y1] = graph.view().corners();
        info!("view after {} drag(s): [{x0}, {y0}] .. [{x1}, {y1}]", cli.drags.len());
    }

    for frame in 1..=cli.frames {
        graph.tick(&FrameTime::fixed(frame, FRAME_DT));
    }

    let svg = graph.to_svg();
    match &cli.out {
        Some(path) => {
            fs::write(path, &svg).with_context(|| format!("failed to write {}", path.display()))?;
            info!("wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(svg.as_bytes()).context("failed to write SVG to stdout")?;
            stdout.write_all(b"\n")?;
        }
    }

    if let Some(path) = &cli.png {
        let image = export::rasterize(&graph)?;
        export::save_image(image, path)?;
        info!("wrote {}", path.display());
    }

    if cli.copy {
        match export::copy_to_clipboard(&svg) {
            Ok(()) => info!("SVG copied to clipboard"),
            Err(err) => warn!("{err:#}"),
        }
    }

    Ok(())
}
