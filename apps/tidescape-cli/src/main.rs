mod config;
mod demo;

use std::path::PathBuf;

use anyhow::{Context, bail};
use serde_json::Value;
use clap::{Parser, Subcommand};
use tidescape_input::{Action, CameraController};
use tidescape_render::{DebugTextRenderer, Frame, Renderer, ShadingModel};
use tidescape_terrain::{HeightPalette, NoiseFunction, TerrainGenerator, TerrainOptions, TerrainOptionsInput};
use tracing_subscriber::EnvFilter;

use crate::config::SceneConfig;
use crate::demo::DemoScene;

#[derive(Parser)]
#[command(name = "tidescape-cli", about = "CLI tool for tidescape scenes")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Generate a terrain mesh and report its shape
    Terrain {
        /// JSON options file; flags below override its fields
        #[arg(long)]
        options: Option<PathBuf>,
        #[arg(long)]
        width: Option<u32>,
        #[arg(long)]
        height: Option<f64>,
        #[arg(long)]
        depth: Option<u32>,
        /// wave, simplex or perlin
        #[arg(long)]
        noise: Option<NoiseFunction>,
        #[arg(long)]
        seed: Option<i64>,
        #[arg(long)]
        roughness: Option<f64>,
        /// Start from the demo seabed instead of an empty description
        #[arg(long)]
        demo: bool,
    },
    /// Read an OBJ file and list its groups
    Obj {
        path: PathBuf,
    },
    /// Run the demo scene headless and print the final frame
    Simulate {
        /// YAML scene config
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Number of ticks to simulate
        #[arg(short, long, default_value = "120")]
        ticks: u32,
        /// Keys held for the whole run, e.g. `-k w -k r`
        #[arg(short, long = "key")]
        keys: Vec<String>,
        /// Press the focus key this many times before the first tick
        #[arg(long, default_value = "0")]
        focus: u32,
        /// Horizontal pointer motion per tick, in pixels
        #[arg(long, default_value = "0")]
        pan: f32,
        /// Override the configured shading model
        #[arg(long)]
        shading: Option<ShadingModel>,
        /// Print each draw's composed pose
        #[arg(long)]
        poses: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("tidescape-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("algebra: {}", tidescape_algebra::crate_info());
            println!("scene: {}", tidescape_scene::crate_info());
            println!("terrain: {}", tidescape_terrain::crate_info());
            println!("input: {}", tidescape_input::crate_info());
            println!("render: {}", tidescape_render::crate_info());
            println!("assets: {}", tidescape_assets::crate_info());
        }
        Commands::Terrain {
            options,
            width,
            height,
            depth,
            noise,
            seed,
            roughness,
            demo,
        } => {
            let mut input = match options {
                Some(path) => {
                    let text = std::fs::read_to_string(&path)
                        .with_context(|| format!("reading {}", path.display()))?;
                    TerrainOptionsInput::from_json(&text).unwrap_or_else(|error| {
                        tracing::error!(%error, path = %path.display(), "terrain options document rejected");
                        TerrainOptionsInput::default()
                    })
                }
                None if demo => TerrainOptions::demo().into(),
                None => TerrainOptionsInput::default(),
            };
            override_field(&mut input.width, width);
            override_field(&mut input.height, height);
            override_field(&mut input.depth, depth);
            override_field(&mut input.noisefn, noise.map(|n| n.as_str()));
            override_field(&mut input.seed, seed);
            override_field(&mut input.roughness, roughness);

            let mesh = TerrainGenerator::new().generate_terrain_mesh(&input);
            println!("vertices: {}", mesh.vertex_count());
            println!("triangles: {}", mesh.triangle_count());
            let Ok(options) = input.validate() else {
                println!("no terrain generated; see the logged error");
                return Ok(());
            };
            println!("fingerprint: {:#018x}", mesh.fingerprint());
            if let Some((lo, hi)) = mesh.height_range() {
                println!("height range: {lo:.3} .. {hi:.3}");
            }
            let palette = HeightPalette::default();
            if let (Some(first), Some(last)) = (mesh.vertices().first(), mesh.vertices().last()) {
                println!("first color: {:?}", palette.shade(first[1], options.height));
                println!("last color: {:?}", palette.shade(last[1], options.height));
            }
        }
        Commands::Obj { path } => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            let groups = tidescape_assets::read_obj_by_group(&text)
                .with_context(|| format!("parsing {}", path.display()))?;
            println!("{}: {} group(s)", path.display(), groups.len());
            for (name, mesh) in groups.iter() {
                let label = if name.is_empty() { "(default)" } else { name };
                println!(
                    "  {label}: {} vertices, {} triangles, uv={}",
                    mesh.vertex_count(),
                    mesh.vertex_count() / 3,
                    !mesh.texcoords.is_empty()
                );
            }
        }
        Commands::Simulate {
            config,
            ticks,
            keys,
            focus,
            pan,
            shading,
            poses,
        } => {
            let config = SceneConfig::load(config.as_deref())?;
            let mut scene = DemoScene::build(&config)?;
            let mut camera = CameraController::new(config.camera);
            let shading = shading.unwrap_or(config.shading);
            let projection = config.projection.matrix().context("projection")?;

            for key in &keys {
                match Action::from_key(key, true) {
                    Action::Press(_) => camera.handle_key(key, true),
                    _ => bail!("{key:?} is not a held camera key (w a s d r f i j k l)"),
                }
            }
            for _ in 0..focus {
                camera.apply(Action::CycleFocus);
            }

            println!(
                "Simulating {ticks} ticks of {} ms, shading={shading}",
                config.tick_ms
            );
            for tick in 0..ticks {
                if pan != 0.0 {
                    camera.handle_pointer_delta(pan, 0.0);
                }
                let targets = scene.focus_targets()?;
                camera.tick(config.tick_ms, &targets);
                scene.animate(config.tick_ms)?;
                tracing::trace!(tick, focusing = camera.is_focusing(), "tick done");
            }

            let frame = Frame::capture(
                &scene.graph,
                &camera.view_matrix(),
                &projection,
                scene.light()?,
                shading,
            )?;
            let renderer = DebugTextRenderer { verbose: poses };
            print!("{}", renderer.render(&frame));
            println!(
                "Camera: yaw={:.2} pitch={:.2} front={} focusing={}",
                camera.yaw(),
                camera.pitch(),
                camera.front(),
                camera.is_focusing()
            );
            let layout = scene.pool.layout();
            println!(
                "Vertex pool: {} vertices, colors at byte {}, normals at byte {}",
                scene.pool.vertex_count(),
                layout.colors,
                layout.normals
            );
        }
    }

    Ok(())
}

/// Replace a terrain option with a command-line value when one was given.
fn override_field<T: Into<Value>>(field: &mut Option<Value>, flag: Option<T>) {
    if let Some(value) = flag {
        *field = Some(value.into());
    }
}
