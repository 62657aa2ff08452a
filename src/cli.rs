use std::{
    num::{NonZeroU32, NonZeroUsize},
    path::PathBuf,
    sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use indicatif::ProgressBar;
use minitrace::{
    RenderManager, RenderSettings, WorkerCount, World,
    demo::{showcase_builder, showcase_camera, showcase_lights},
    geometry::{FloatType, ScreenSize, scaling, translation},
    renderer::{DEFAULT_MAX_DEPTH, DEFAULT_TILE_SIZE},
    scene::{DEFAULT_BVH_THRESHOLD, NodeKind},
    shading::Material,
};
use tracing::info;

#[derive(Parser)]
#[command(name = "minitrace")]
#[command(about = "Renders the showcase scene with a Whitted ray tracer", long_about = None)]
struct Cli {
    /// Output image (format determined by extension: .png, .ppm, .jpg, ...)
    #[arg(default_value = "showcase.png")]
    output: PathBuf,

    #[arg(long, default_value_t = 800)]
    width: u32,

    #[arg(long, default_value_t = 600)]
    height: u32,

    /// Horizontal field of view in degrees
    #[arg(long, default_value_t = 60.0)]
    fov: FloatType,

    /// Edge length of render tiles in pixels
    #[arg(long, default_value_t = DEFAULT_TILE_SIZE)]
    tile_size: NonZeroU32,

    /// Maximum number of reflection and refraction bounces
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    depth: u32,

    /// Number of render threads (default: one per CPU)
    #[arg(long)]
    workers: Option<NonZeroUsize>,

    /// Maximum number of children in a BVH leaf
    #[arg(long, default_value_t = DEFAULT_BVH_THRESHOLD)]
    bvh_threshold: usize,

    /// Wavefront OBJ model to place in the scene
    #[arg(long)]
    model: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let mut builder = showcase_builder()?;
    let model = cli
        .model
        .as_ref()
        .map(|path| {
            builder
                .add_obj(
                    path,
                    &Material::builder().reflective(0.2).build(),
                    translation(-1.2, 0.0, -2.2) * scaling(0.4, 0.4, 0.4),
                )
                .with_context(|| format!("Loading {}", path.display()))
        })
        .transpose()?;

    let world = World::new(builder.build(cli.bvh_threshold), showcase_lights());
    info!(nodes = world.scene.len(), "Scene ready");
    if let Some(NodeKind::Group(bvh)) = model.map(|idx| world.scene.node(idx).kind()) {
        let statistics = bvh.statistics();
        info!(
            node_count = statistics.node_count,
            depth = %statistics.depth,
            leaf_size = %statistics.leaf_size,
            "Model BVH"
        );
    }

    let camera = showcase_camera(
        ScreenSize::new(cli.width, cli.height),
        cli.fov.to_radians(),
    )?;

    let settings = RenderSettings {
        tile_size: cli.tile_size,
        max_depth: cli.depth,
        workers: cli.workers.map_or(WorkerCount::Auto, WorkerCount::Manual),
    };
    let manager = RenderManager::new(settings)?;

    let bar = ProgressBar::no_length();
    let canvas = manager.render_with_progress(Arc::new(world), Arc::new(camera), |progress| {
        bar.update(|ps| {
            ps.set_len(progress.total as u64);
            ps.set_pos(progress.finished as u64)
        })
    })?;
    bar.finish();

    canvas
        .save(&cli.output)
        .with_context(|| format!("Saving {}", cli.output.display()))?;
    info!(path = %cli.output.display(), "Image saved");

    Ok(())
}
