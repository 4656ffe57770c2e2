use clap::Parser;
use nalgebra::Vector3;
use smoke_sim_core::{ExecutionMode, SmokeGrid, SmokeSolver, SolverConfig, SolverStats};
use tracing_subscriber::EnvFilter;

/// Reference room edge the demo scene is laid out for
const SCENE_SIZE: usize = 50;

/// Smoke-in-a-room demo with configurable parameters
#[derive(Parser, Debug)]
#[command(name = "smoke-sim-demo")]
#[command(about = "Headless smoke simulation in a closed room", long_about = None)]
struct Args {
    /// Room edge length in cells (cubic room)
    #[arg(short, long, default_value_t = SCENE_SIZE)]
    size: usize,

    /// Number of ticks to simulate
    #[arg(short = 'n', long, default_value_t = 100)]
    steps: u64,

    /// Timestep per tick in seconds
    #[arg(short, long, default_value_t = 0.1)]
    time_step: f32,

    /// Speed of smoke leaving a source
    #[arg(long, default_value_t = 3.0)]
    source_velocity: f32,

    /// Density pinned at sources
    #[arg(long, default_value_t = 100.0)]
    source_density: f32,

    /// Diffusion rate for velocity and density
    #[arg(long, default_value_t = 0.00001)]
    diffusion: f32,

    /// Density decay per tick outside sources
    #[arg(long, default_value_t = 0.02)]
    decay: f32,

    /// Gauss-Seidel sweeps per solve
    #[arg(long, default_value_t = 4)]
    iterations: usize,

    /// Velocity retained when bouncing off barriers (0-1)
    #[arg(long, default_value_t = 0.9)]
    restitution: f32,

    /// Speed of the wind injector along +z
    #[arg(short, long, default_value_t = 3.0)]
    wind_speed: f32,

    /// Tick at which the first source is moved (0 = never)
    #[arg(long, default_value_t = 30)]
    move_source_at: u64,

    /// Run sweeps on a worker pool with this many threads (0 = all cores)
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    /// Report interval in ticks
    #[arg(short, long, default_value_t = 10)]
    report_interval: u64,

    /// Print the classification and density cross-section at this depth
    #[arg(long)]
    slice: Option<usize>,
}

/// Map a coordinate of the 50³ reference layout onto the actual room
fn scaled(coord: usize, size: usize) -> usize {
    (coord * size / SCENE_SIZE).min(size - 1)
}

/// Density cross-section at depth `z`, laid out like `render_slice`
fn density_slice(grid: &SmokeGrid, z: usize, source_density: f32) -> String {
    const SHADES: [char; 5] = [' ', '.', ':', '*', '#'];
    let dims = grid.dims();
    let mut out = String::with_capacity(dims.nx * (dims.ny * 2 + 1));
    for x in 0..dims.nx {
        for y in 0..dims.ny {
            let level = (grid.density(x, y, z) / source_density).clamp(0.0, 1.0);
            let shade = SHADES[(level * (SHADES.len() - 1) as f32).round() as usize];
            out.push(shade);
            out.push(' ');
        }
        out.push('\n');
    }
    out
}

fn print_stats(stats: &SolverStats) {
    println!(
        "[t={:6.2}s tick {:4}] total density {:10.2} | peak {:7.2} | max speed {:6.3}",
        stats.simulated_time, stats.tick, stats.total_density, stats.peak_density, stats.max_speed
    );
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("=== Smoke Simulation Demo ===\n");

    let execution = match args.threads {
        Some(threads) => ExecutionMode::Parallel { threads },
        None => ExecutionMode::Sequential,
    };
    let config = SolverConfig {
        relaxation_iterations: args.iterations,
        restitution: args.restitution,
        execution,
        ..SolverConfig::new(
            args.size,
            args.size,
            args.size,
            args.time_step,
            args.source_velocity,
            args.source_density,
            args.diffusion,
            args.decay,
        )
    };

    let mut solver = SmokeSolver::new(config)?;
    let n = args.size;
    println!("Created {n}x{n}x{n} room, dt={}s, {execution:?}", args.time_step);

    // Scene: a source near the floor, a wind jet at the back wall and two
    // partition walls
    let first_source = (scaled(15, n), scaled(48, n), scaled(15, n));
    solver.add_source(first_source.0, first_source.1, first_source.2);
    solver.add_wind(
        scaled(48, n),
        scaled(15, n),
        scaled(1, n),
        Vector3::new(0.0, 0.0, args.wind_speed),
    );
    solver.add_barrier_range(
        scaled(15, n)..=scaled(31, n),
        scaled(24, n)..=scaled(24, n),
        0..=scaled(31, n),
    );
    solver.add_barrier_range(
        scaled(40, n)..=scaled(46, n),
        scaled(10, n)..=scaled(10, n),
        0..=n - 1,
    );

    let initial = solver.stats();
    println!(
        "Scene: {} barrier cells, {} sources, {} wind cells\n",
        initial.barrier_cells, initial.source_cells, initial.wind_cells
    );

    for _ in 0..args.steps {
        if args.move_source_at > 0 && solver.tick() == args.move_source_at {
            solver.remove_source(first_source.0, first_source.1, first_source.2);
            solver.add_source(scaled(48, n), scaled(48, n), scaled(1, n));
            println!("Moved smoke source to the far corner");
        }

        solver.advance();

        if args.report_interval > 0 && solver.tick().is_multiple_of(args.report_interval) {
            print_stats(&solver.stats());
        }
    }

    println!("\n=== Final State ===");
    print_stats(&solver.stats());

    if let Some(z) = args.slice {
        let z = z.min(n - 1);
        println!("\nClassification at z={z} (rows x, columns y):");
        print!("{}", solver.grid().render_slice(z));
        println!("\nDensity at z={z}:");
        print!("{}", density_slice(solver.grid(), z, args.source_density));
    }

    Ok(())
}
