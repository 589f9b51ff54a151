use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use glam::Vec2;
use tileworld_input::{PointerEvent, PointerState};
use tileworld_kernel::{TileKind, TilePercentages, WorldConfig, WorldGrid, WorldSize};
use tileworld_persist::{JsonSettingsFile, MemorySettings, SettingsStore};
use tileworld_render::{
    Camera, FOG_INTENSITY_KEY, RENDER_DISTANCE_KEY, RecordingSurface, RenderSettings, RenderStats,
    ViewportRenderer,
};
use tileworld_stream::FixedTimestep;
use tracing_subscriber::EnvFilter;

/// Walker footprint and per-tick speed, in world units.
const WALKER_SIZE: f32 = 12.0;
const WALKER_SPEED: f32 = 3.0;
/// Ticks before the walker turns on its own.
const TURN_EVERY: u64 = 90;

#[derive(Parser)]
#[command(name = "tileworld-cli", about = "CLI tool for tileworld operations")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum SizeArg {
    Small,
    Medium,
    Large,
}

impl From<SizeArg> for WorldSize {
    fn from(size: SizeArg) -> Self {
        match size {
            SizeArg::Small => WorldSize::Small,
            SizeArg::Medium => WorldSize::Medium,
            SizeArg::Large => WorldSize::Large,
        }
    }
}

#[derive(clap::Args)]
struct WorldArgs {
    /// World config JSON (worldSize, seed, tilePercentages). Overrides the flags below
    #[arg(long)]
    config: Option<PathBuf>,
    /// World size preset
    #[arg(long, value_enum, default_value = "medium")]
    size: SizeArg,
    /// Generation seed
    #[arg(short, long, default_value = "DEFAULT")]
    seed: String,
    #[arg(long, default_value = "85")]
    grass: f64,
    #[arg(long, default_value = "10")]
    water: f64,
    #[arg(long, default_value = "3")]
    wall: f64,
    #[arg(long, default_value = "2")]
    cave: f64,
    /// Load an editor world instead of generating: path under --root
    #[arg(long)]
    world: Option<String>,
    /// Folder containing the `worlds/` directory
    #[arg(long, default_value = ".")]
    root: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Generate a world and print its statistics
    Generate {
        #[command(flatten)]
        world: WorldArgs,
    },
    /// Load an editor world file and print its statistics
    Load {
        /// Relative path of the form worlds/<name>/world.json
        path: String,
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
    /// Walk an anchor through a world, following it with the camera and
    /// rendering every frame headlessly
    Simulate {
        #[command(flatten)]
        world: WorldArgs,
        /// Frames to render
        #[arg(short, long, default_value = "120")]
        frames: u32,
        /// Simulation tick rate
        #[arg(long, default_value = "60")]
        fps: u32,
        /// Wall time per rendered frame, in milliseconds
        #[arg(long, default_value = "16")]
        frame_ms: u64,
        #[arg(long, default_value = "800")]
        canvas_width: f32,
        #[arg(long, default_value = "600")]
        canvas_height: f32,
        /// Wheel steps applied on the first frames; positive zooms in
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        zoom_steps: i32,
        /// Settings file holding renderDistance and fogIntensity
        #[arg(long)]
        settings: Option<PathBuf>,
        #[arg(long)]
        render_distance: Option<u32>,
        #[arg(long)]
        fog_intensity: Option<u32>,
        /// Write the effective render settings back to --settings
        #[arg(long)]
        save_settings: bool,
        /// Folder with grass.png, water.png and cave.png
        #[arg(long)]
        textures: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    match cli.command {
        Commands::Info => {
            println!("tileworld-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("tile size: {}", tileworld_kernel::TILE_SIZE);
            println!("stream: {}", tileworld_stream::crate_info());
            println!("persist: {}", tileworld_persist::crate_info());
            println!("render: {}", tileworld_render::crate_info());
        }
        Commands::Generate { world } => {
            let grid = build_world(&world)?;
            print_world(&grid);
        }
        Commands::Load { path, root } => {
            let data = tileworld_persist::load_custom_world(&root, &path)
                .with_context(|| format!("loading {path}"))?;
            let grid = WorldGrid::from_custom(&data)?;
            println!("name: {}", data.name().unwrap_or("unnamed"));
            println!("authored tiles: {}", data.tiles.len());
            print_world(&grid);
        }
        Commands::Simulate {
            world,
            frames,
            fps,
            frame_ms,
            canvas_width,
            canvas_height,
            zoom_steps,
            settings,
            render_distance,
            fog_intensity,
            save_settings,
            textures,
        } => {
            let grid = build_world(&world)?;

            let mut store: Box<dyn SettingsStore> = match &settings {
                Some(path) => Box::new(JsonSettingsFile::open(path)?),
                None => Box::new(MemorySettings::new()),
            };
            if let Some(d) = render_distance {
                store.set(RENDER_DISTANCE_KEY, d.to_string());
            }
            if let Some(f) = fog_intensity {
                store.set(FOG_INTENSITY_KEY, f.to_string());
            }
            let render_settings = RenderSettings::load(store.as_ref());
            if save_settings {
                let path = settings.context("--save-settings needs --settings")?;
                let mut file = JsonSettingsFile::open(&path)?;
                render_settings.save(&mut file);
                file.save()?;
                println!("settings saved to {}", path.display());
            }

            let mut renderer = ViewportRenderer::new(render_settings);
            if let Some(dir) = textures {
                for (kind, file) in [
                    (TileKind::Grass, "grass.png"),
                    (TileKind::Water, "water.png"),
                    (TileKind::Cave, "cave.png"),
                ] {
                    renderer.textures_mut().request(kind, dir.join(file));
                }
            }

            let sim = Simulation {
                frames,
                fps,
                frame_time: Duration::from_millis(frame_ms),
                canvas: Vec2::new(canvas_width, canvas_height),
                zoom_steps,
            };
            sim.run(&grid, &mut renderer);
        }
    }

    Ok(())
}

fn build_world(args: &WorldArgs) -> anyhow::Result<WorldGrid> {
    if let Some(path) = &args.world {
        let data = tileworld_persist::load_custom_world(&args.root, path)
            .with_context(|| format!("loading {path}"))?;
        return Ok(WorldGrid::from_custom(&data)?);
    }

    let config = match &args.config {
        Some(path) => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening {}", path.display()))?;
            serde_json::from_reader::<_, WorldConfig>(file)?
        }
        None => WorldConfig {
            world_size: args.size.into(),
            seed: args.seed.clone(),
            tile_percentages: TilePercentages {
                grass: args.grass,
                water: args.water,
                wall: args.wall,
                cave: args.cave,
            },
        },
    };
    Ok(WorldGrid::generate(&config.or_default()))
}

fn print_world(grid: &WorldGrid) {
    let dims = grid.dimensions();
    let counts = grid.kind_counts();
    let pct = counts.percentages();
    println!("size: {}x{} px", dims.width, dims.height);
    println!("tiles: {}x{} = {}", grid.tiles_x(), grid.tiles_y(), counts.total());
    for kind in TileKind::ALL {
        println!(
            "  {kind:<5} {:>7} ({:5.2}%)",
            counts.get(kind),
            pct.get(kind)
        );
    }
    println!("state hash: {:#018x}", grid.state_hash());
}

struct Simulation {
    frames: u32,
    fps: u32,
    frame_time: Duration,
    canvas: Vec2,
    zoom_steps: i32,
}

impl Simulation {
    fn run(&self, grid: &WorldGrid, renderer: &mut ViewportRenderer) {
        let dims = grid.dimensions();
        let world_size = Vec2::new(dims.width as f32, dims.height as f32);
        let mut walker = Walker::spawn(grid, world_size / 2.0);
        let mut camera = Camera::new(self.canvas.x, self.canvas.y);
        let mut pointer = PointerState::new();
        let mut timestep = FixedTimestep::new(self.fps);
        let mut surface = RecordingSurface::new(self.canvas.x, self.canvas.y);
        let mut totals = RenderStats::default();

        println!(
            "simulating {} frames, mode {:?}, walker at ({:.0}, {:.0})",
            self.frames,
            renderer.mode(),
            walker.pos.x,
            walker.pos.y
        );

        for frame in 0..self.frames {
            renderer.textures_mut().poll();

            let step = timestep.advance(self.frame_time);
            for _ in 0..step.ticks {
                walker.tick(grid, world_size);
            }

            if (frame as i32) < self.zoom_steps.abs() {
                // Wheel up zooms in.
                pointer.apply(PointerEvent::Wheel(-self.zoom_steps.signum() as f32));
            }
            camera.update(walker.anchor(), world_size, Some(&mut pointer));

            surface.clear();
            let stats = camera.with_transform(&mut surface, |s| {
                renderer.render(s, &camera, grid, Some(walker.anchor()))
            });
            tracing::debug!(frame, ticks = step.ticks, ?stats, "frame rendered");
            accumulate(&mut totals, &stats);
        }

        let info = camera.debug_info(walker.anchor());
        println!("ticks: {}", timestep.total_ticks());
        println!(
            "walker: ({:.1}, {:.1}) on {}",
            walker.pos.x,
            walker.pos.y,
            grid.tile_kind_at(walker.anchor().x, walker.anchor().y)
        );
        println!(
            "camera: ({:.1}, {:.1}) zoom {:.2}, anchor on screen ({:.1}, {:.1}) vs center ({:.1}, {:.1})",
            info.position.x,
            info.position.y,
            info.zoom,
            info.anchor_screen.x,
            info.anchor_screen.y,
            info.canvas_center.x,
            info.canvas_center.y
        );
        let frames = self.frames.max(1) as usize;
        println!("per frame (avg over {} frames):", self.frames);
        println!("  candidates   {}", totals.candidates / frames);
        println!("  textured     {}", totals.textured / frames);
        println!("  colored      {}", totals.colored / frames);
        println!("  open water   {}", totals.open_water / frames);
        println!("  fog overlays {}", totals.fog_overlays / frames);
        println!("  pure fog     {}", totals.pure_fog / frames);
        println!("  grid lines   {}", totals.grid_lines / frames);
        println!("  culled       {}", totals.culled / frames);
        println!("  draw calls (last frame) {}", surface.commands().len());
    }
}

fn accumulate(totals: &mut RenderStats, frame: &RenderStats) {
    totals.candidates += frame.candidates;
    totals.culled += frame.culled;
    totals.pure_fog += frame.pure_fog;
    totals.textured += frame.textured;
    totals.colored += frame.colored;
    totals.open_water += frame.open_water;
    totals.fog_overlays += frame.fog_overlays;
    totals.grid_lines += frame.grid_lines;
}

/// Anchor that wanders the world, turning when blocked.
struct Walker {
    pos: Vec2,
    heading: usize,
    ticks: u64,
}

const HEADINGS: [Vec2; 4] = [
    Vec2::new(1.0, 0.0),
    Vec2::new(0.0, 1.0),
    Vec2::new(-1.0, 0.0),
    Vec2::new(0.0, -1.0),
];

impl Walker {
    /// Start at `near`, sliding right until the footprint is free.
    fn spawn(grid: &WorldGrid, near: Vec2) -> Self {
        let ts = grid.tile_size() as f32;
        let mut pos = near;
        for _ in 0..grid.tiles_x() {
            if grid.can_move(pos.x, pos.y, WALKER_SIZE) {
                break;
            }
            pos.x += ts;
        }
        Self {
            pos,
            heading: 0,
            ticks: 0,
        }
    }

    fn anchor(&self) -> Vec2 {
        self.pos + Vec2::splat(WALKER_SIZE / 2.0)
    }

    fn tick(&mut self, grid: &WorldGrid, world_size: Vec2) {
        self.ticks += 1;
        if self.ticks % TURN_EVERY == 0 {
            self.heading = (self.heading + 1) % HEADINGS.len();
        }
        let limit = world_size - Vec2::splat(WALKER_SIZE);
        for _ in 0..HEADINGS.len() {
            let next = self.pos + HEADINGS[self.heading] * WALKER_SPEED;
            let inside = next.cmpge(Vec2::ZERO).all() && next.cmple(limit).all();
            if inside && grid.can_move(next.x, next.y, WALKER_SIZE) {
                self.pos = next;
                return;
            }
            self.heading = (self.heading + 1) % HEADINGS.len();
        }
        tracing::trace!(pos = ?self.pos, "walker boxed in");
    }
}
