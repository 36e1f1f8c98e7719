//! Game of Life CLI - Run a simulation from an NPY grid.

use std::fs;
use std::path::PathBuf;
use std::process;
use std::time::Instant;

use npy_life::{
    compute::{Grid, LifePropagator},
    npy, platform, report,
    schema::{Seed, SimulationConfig},
};

/// Largest grid rendered to the log at debug level.
const MAX_RENDER_CELLS: usize = 80 * 40;

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    let config = match args.get(1).map(String::as_str) {
        Some("-h") | Some("--help") => {
            print_usage(&args[0]);
            return;
        }
        Some("--example") => {
            print_example_config();
            return;
        }
        Some("--generate") => {
            generate(&args);
            return;
        }
        Some("--config") => {
            let path = args.get(2).unwrap_or_else(|| {
                print_usage(&args[0]);
                process::exit(1);
            });
            load_config(path)
        }
        _ => config_from_args(&args),
    };

    run(&config);
}

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", msg);
    process::exit(1);
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} [iterations] [input.npy output.npy]", program);
    eprintln!("       {} --config <config.json>", program);
    eprintln!(
        "       {} --generate <seed.json> <rows> <cols> <output.npy>",
        program
    );
    eprintln!("       {} --example", program);
    eprintln!();
    eprintln!("Run Conway's Game of Life on a 2-D NPY grid and save every generation.");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  iterations   Number of generations to simulate (default: 3)");
    eprintln!("  input.npy    Starting grid (default: examples/input.npy)");
    eprintln!("  output.npy   Output stack (default: output/out.npy)");
}

fn parse_iterations(arg: &str) -> usize {
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => n,
        _ => fail("Must specify a positive number of iterations"),
    }
}

/// Apply positional arguments over the defaults.
fn config_from_args(args: &[String]) -> SimulationConfig {
    let mut config = SimulationConfig::default();
    match &args[1..] {
        [] => {}
        [iterations] => config.iterations = parse_iterations(iterations),
        [input, output] => {
            config.input = PathBuf::from(input);
            config.output = PathBuf::from(output);
        }
        [iterations, input, output] => {
            config.iterations = parse_iterations(iterations);
            config.input = PathBuf::from(input);
            config.output = PathBuf::from(output);
        }
        _ => {
            eprintln!("Wrong number of arguments!");
            print_usage(&args[0]);
            process::exit(1);
        }
    }
    config
}

fn load_config(path: &str) -> SimulationConfig {
    let config_str = fs::read_to_string(path)
        .unwrap_or_else(|e| fail(format!("reading config file {}: {}", path, e)));
    serde_json::from_str(&config_str)
        .unwrap_or_else(|e| fail(format!("parsing config {}: {}", path, e)))
}

fn log_grid(label: &str, grid: &Grid) {
    if grid.len() <= MAX_RENDER_CELLS {
        log::debug!("{}:\n{}", label, grid);
    }
}

fn run(config: &SimulationConfig) {
    if let Err(e) = config.validate() {
        fail(e);
    }

    let grid = npy::load(&config.input).unwrap_or_else(|e| fail(e));

    println!("Game of Life");
    println!("============");
    println!("Input: {}", config.input.display());
    println!("Grid: {}x{}", grid.rows(), grid.cols());
    println!("Iterations: {}", config.iterations);
    println!(
        "Cores: {} physical, {} logical, {} available",
        platform::physical_core_count(),
        platform::logical_core_count(),
        platform::available_core_count()
    );
    println!();
    log_grid("Initial grid", &grid);

    let propagator = LifePropagator::new(config).unwrap_or_else(|e| fail(e));

    let start = Instant::now();
    let stack = propagator
        .run(&grid, config.iterations)
        .unwrap_or_else(|e| fail(e));
    let elapsed = start.elapsed();

    println!(
        "Time: {} ({} threads)",
        report::format_duration(elapsed.as_secs_f64()),
        propagator.threads()
    );

    if let Some(parent) = config.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).unwrap_or_else(|e| {
                fail(format!("creating output directory {}: {}", parent.display(), e))
            });
        }
    }

    let bytes = npy::save(&config.output, &stack).unwrap_or_else(|e| fail(e));

    let populations = stack.populations();
    if let Some(last) = stack.last() {
        log_grid("Final grid", &last);
    }
    println!(
        "Population: {} -> {}",
        populations.first().copied().unwrap_or(0),
        populations.last().copied().unwrap_or(0)
    );
    println!(
        "Wrote {} snapshots to {} ({})",
        stack.depth(),
        config.output.display(),
        report::format_bytes(bytes)
    );
}

/// `--generate <seed.json> <rows> <cols> <output.npy>`
fn generate(args: &[String]) {
    let [_, _, seed_path, rows, cols, output] = args else {
        print_usage(&args[0]);
        process::exit(1);
    };

    let seed_str = fs::read_to_string(seed_path)
        .unwrap_or_else(|e| fail(format!("reading seed file {}: {}", seed_path, e)));
    let seed: Seed = serde_json::from_str(&seed_str)
        .unwrap_or_else(|e| fail(format!("parsing seed {}: {}", seed_path, e)));
    let rows: usize = rows
        .parse()
        .unwrap_or_else(|_| fail(format!("invalid row count: {}", rows)));
    let cols: usize = cols
        .parse()
        .unwrap_or_else(|_| fail(format!("invalid column count: {}", cols)));

    let grid = seed.generate(rows, cols).unwrap_or_else(|e| fail(e));
    let bytes = npy::save_grid(output, &grid).unwrap_or_else(|e| fail(e));
    log_grid("Generated grid", &grid);

    println!(
        "Wrote {}x{} grid ({} alive) to {} ({})",
        rows,
        cols,
        grid.population(),
        output,
        report::format_bytes(bytes)
    );
}

fn print_example_config() {
    let config = serde_json::to_string_pretty(&SimulationConfig::default())
        .unwrap_or_else(|e| fail(e));
    let seed = serde_json::to_string_pretty(&Seed::default()).unwrap_or_else(|e| fail(e));

    println!("Example configuration (config.json):");
    println!("{}", config);
    println!();
    println!("Example seed (seed.json):");
    println!("{}", seed);
}
