use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::LevelFilter;

use antmaze::colors::Palette;
use antmaze::report::RunReport;
use antmaze::snapshot::render_png;
use antmaze::{AntColonyOptimization, AppConfig, Maze, PathSpecification};

#[derive(Parser)]
#[command(name = "antmaze")]
#[command(author, version, about = "Ant colony shortest-path search through grid mazes", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the colony and report the best route
    Solve {
        /// Maze file
        #[arg(short, long)]
        maze: PathBuf,

        /// Coordinates file with the start and end cell
        #[arg(short, long)]
        coordinates: PathBuf,

        /// TOML config file
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        ants: Option<usize>,

        #[arg(short, long)]
        generations: Option<usize>,

        /// Deposit normalisation factor
        #[arg(long)]
        q: Option<f64>,

        /// Fraction of pheromone kept per generation
        #[arg(short, long)]
        evaporation: Option<f64>,

        #[arg(long)]
        max_steps: Option<usize>,

        #[arg(short, long)]
        seed: Option<u64>,

        /// Write the best route here
        #[arg(long)]
        route_out: Option<PathBuf>,

        /// Write a PNG of the final pheromone field here
        #[arg(long)]
        snapshot: Option<PathBuf>,

        /// Write a JSON run report here
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Parse a maze (and optionally coordinates) without solving
    Check {
        #[arg(short, long)]
        maze: PathBuf,

        #[arg(short, long)]
        coordinates: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { LevelFilter::Debug } else { LevelFilter::Info };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match cli.command {
        Commands::Solve {
            maze,
            coordinates,
            config,
            ants,
            generations,
            q,
            evaporation,
            max_steps,
            seed,
            route_out,
            snapshot,
            report,
        } => {
            let mut app = match config {
                Some(path) => AppConfig::load(&path)
                    .with_context(|| format!("Failed to load config: {}", path.display()))?,
                None => AppConfig::default(),
            };
            let colony = &mut app.colony;
            colony.ants_per_generation = ants.unwrap_or(colony.ants_per_generation);
            colony.generations = generations.unwrap_or(colony.generations);
            colony.q = q.unwrap_or(colony.q);
            colony.evaporation = evaporation.unwrap_or(colony.evaporation);
            colony.max_steps = max_steps.unwrap_or(colony.max_steps);
            colony.seed = seed.or(colony.seed);
            colony.validate().context("Invalid colony parameters")?;

            let output = &mut app.output;
            output.route_file = route_out.or(output.route_file.take());
            output.snapshot_file = snapshot.or(output.snapshot_file.take());
            output.report_file = report.or(output.report_file.take());

            solve(&maze, &coordinates, app)
        }
        Commands::Check { maze, coordinates } => check(&maze, coordinates.as_deref()),
    }
}

fn load_inputs(maze_path: &Path, coordinates: &Path) -> Result<(Maze, PathSpecification)> {
    let maze = Maze::from_file(maze_path)
        .with_context(|| format!("Failed to read maze: {}", maze_path.display()))?;
    let spec = PathSpecification::read_coordinates(coordinates)
        .with_context(|| format!("Failed to read coordinates: {}", coordinates.display()))?;
    maze.validate_spec(&spec)
        .with_context(|| format!("Coordinates do not fit the maze: {}", coordinates.display()))?;
    Ok((maze, spec))
}

fn solve(maze_path: &Path, coordinates: &Path, app: AppConfig) -> Result<()> {
    let (maze, spec) = load_inputs(maze_path, coordinates)?;
    let size = (maze.width(), maze.length());

    let started = std::time::Instant::now();
    let mut colony = AntColonyOptimization::new(maze, app.colony.clone());
    let best = colony.find_shortest_route(&spec);
    let elapsed = started.elapsed();

    match &best {
        Some(route) => println!(
            "Best route: {} moves from ({}) to ({}) in {:.2?}",
            route.len(),
            spec.start(),
            spec.end(),
            elapsed
        ),
        None => println!("No route found after {} generations", app.colony.generations),
    }

    let output = &app.output;
    if let (Some(path), Some(route)) = (&output.route_file, &best) {
        route
            .write_to_file(path)
            .with_context(|| format!("Failed to write route: {}", path.display()))?;
        println!("Route written to {}", path.display());
    }
    if let Some(path) = &output.snapshot_file {
        render_png(colony.maze(), best.as_ref(), &Palette::default(), output.cell_size, path)
            .with_context(|| format!("Failed to write snapshot: {}", path.display()))?;
    }
    if let Some(path) = &output.report_file {
        RunReport::new(size, spec, app.colony.clone(), best.as_ref(), colony.generation_stats())
            .write_json(path)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
    }
    Ok(())
}

fn check(maze_path: &Path, coordinates: Option<&Path>) -> Result<()> {
    let maze = Maze::from_file(maze_path)
        .with_context(|| format!("Failed to read maze: {}", maze_path.display()))?;
    println!(
        "Maze {}x{}: {} open cells, {} walls",
        maze.width(),
        maze.length(),
        maze.open_cells(),
        maze.width() * maze.length() - maze.open_cells()
    );

    if let Some(path) = coordinates {
        let spec = PathSpecification::read_coordinates(path)
            .with_context(|| format!("Failed to read coordinates: {}", path.display()))?;
        maze.validate_spec(&spec)
            .with_context(|| format!("Coordinates do not fit the maze: {}", path.display()))?;
        println!("Start ({}) and end ({}) are open cells", spec.start(), spec.end());
    }
    Ok(())
}
