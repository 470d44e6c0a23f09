use anyhow::{Context, Result};
use clap::Parser;
use log::info;

mod cli;
mod logger;

use cli::Args;
use logger::init_logger;
use phongtrace::config::{demo_scene, load_scene, LoadedScene};
use phongtrace::output::{save_image, send_image_to_tev, OutputFormat};
use phongtrace::tracer::TraceSettings;

fn main() -> Result<()> {
    let args = Args::parse();

    init_logger(args.debug_level.clone().into());

    info!("phongtrace - Git Version {} ({})", env!("GIT_HASH"), env!("GIT_DATE"));

    // Fail on a bad output path before spending time rendering
    OutputFormat::from_path(&args.output)?;

    if args.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(args.threads)
            .build_global()
            .context("failed to build the render thread pool")?;
    }

    let LoadedScene {
        scene,
        mut camera,
        mut settings,
    } = match &args.scene {
        Some(path) => load_scene(path)?,
        None => {
            info!("No scene file given, rendering the built-in demo scene");
            demo_scene()
        }
    };

    if let Some(bounces) = args.bounces {
        settings = TraceSettings::new(bounces);
    }
    camera.image_width = args.width;
    camera.image_height = args.height;
    camera.samples_per_pixel = args.samples_per_pixel;

    let image = camera.render(&scene, &settings);

    let should_send_to_tev = args.tev || args.tev_address.is_some();
    if should_send_to_tev {
        let tev_address = args.tev_address.as_deref().unwrap_or("localhost");
        send_image_to_tev(&image, tev_address, "phongtrace_output");
    }

    save_image(&image, &args.output)
}
