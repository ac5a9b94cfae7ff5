//! Lumen command-line renderer.
//!
//! Loads an OBJ scene (or the built-in demo), renders it in the background
//! and writes the finished frame as a PNG.

mod demo;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use lumen_core::obj::load_obj;
use lumen_core::{Projection, RenderParameters, Scene};
use lumen_renderer::{FrameOutcome, Raytracer};

#[derive(Parser, Debug)]
#[command(name = "lumen", version, about = "Whitted-style CPU ray tracer")]
struct Args {
    /// Wavefront OBJ scene to render (the demo scene if omitted)
    #[arg(long)]
    obj: Option<PathBuf>,

    /// JSON render parameters
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 800)]
    width: u32,

    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Maximum mirror bounce depth
    #[arg(long)]
    bounces: Option<u32>,

    /// Pixel worker threads (0 = one per core)
    #[arg(long)]
    threads: Option<usize>,

    #[arg(long)]
    no_shadows: bool,

    /// Local shading only, no mirror bounces
    #[arg(long)]
    no_reflections: bool,

    /// Parallel camera rays
    #[arg(long)]
    ortho: bool,

    /// Shade by interpolated surface normal
    #[arg(long)]
    normals: bool,

    /// Output PNG
    #[arg(short, long, default_value = "render.png")]
    output: PathBuf,
}

impl Args {
    fn apply(&self, params: &mut RenderParameters) {
        if let Some(bounces) = self.bounces {
            params.bounces = bounces;
        }
        if let Some(threads) = self.threads {
            params.threads = threads;
        }
        if self.no_shadows {
            params.shadows_enabled = false;
        }
        if self.no_reflections {
            params.reflection_enabled = false;
        }
        if self.ortho {
            params.projection = Projection::Orthographic;
        }
        if self.normals {
            params.interpolation_rendering = true;
        }
    }
}

fn load_scene(args: &Args) -> Result<Scene> {
    match &args.obj {
        Some(path) => load_obj(path).with_context(|| format!("Failed to load {}", path.display())),
        None => {
            log::info!("No OBJ given, rendering the demo scene");
            demo::scene().context("Failed to build demo scene")
        }
    }
}

fn load_params(args: &Args) -> Result<RenderParameters> {
    let mut params = match &args.config {
        Some(path) => RenderParameters::load(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => {
            let mut params = RenderParameters::default();
            if args.obj.is_none() {
                params.camera = demo::camera();
                params.lights = demo::lights();
            }
            params
        }
    };
    args.apply(&mut params);
    Ok(params)
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();
    if args.width == 0 || args.height == 0 {
        bail!("Image size must be non-zero, got {}x{}", args.width, args.height);
    }

    let scene = load_scene(&args)?;
    let params = load_params(&args)?;
    log::info!(
        "Scene '{}': {} models, {} triangles",
        scene.name,
        scene.model_count(),
        scene.total_triangle_count()
    );

    let start = Instant::now();
    let mut raytracer = Raytracer::with_size(args.width, args.height);
    raytracer
        .start_render(&scene, &params)
        .context("Failed to start render")?;

    match raytracer.wait() {
        Some(FrameOutcome::Completed) => {}
        other => bail!("Render did not complete: {:?}", other),
    }
    log::info!("Finished in {:?}", start.elapsed());

    raytracer
        .frame()
        .to_image()
        .save(&args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    log::info!("Saved {}", args.output.display());

    Ok(())
}
