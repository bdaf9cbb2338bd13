//! Neural worms CLI - Run a headless session from JSON configuration.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::time::Instant;

use neural_worms::{
    compute::{FieldStats, Simulator},
    render::Renderer,
    schema::SessionConfig,
};

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <config.json> [steps]", args[0]);
        eprintln!();
        eprintln!("Run a neural worms session without a window.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json  Path to session configuration file");
        eprintln!("  steps        Number of frames to simulate (default: 600)");
        eprintln!();
        eprintln!("Print the default configuration with --example.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let steps: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(600);

    let config = SessionConfig::load(&args[1]).unwrap_or_else(|e| {
        eprintln!("Error loading config: {}", e);
        std::process::exit(1);
    });

    println!("Neural Worms");
    println!("============");
    println!(
        "Field: {}x{} (screen {}x{})",
        config.screen.backdrop_width(),
        config.screen.backdrop_height(),
        config.screen.width,
        config.screen.height
    );
    println!("Activation: {}", config.simulation.activation);
    println!("Terrain alpha: {}", config.simulation.terrain_alpha);
    println!("Steps: {}", steps);
    println!();

    let mut simulator = Simulator::new(&config);
    let mut renderer = Renderer::new(&config.screen);

    print_stats("Initial field", &simulator.stats());
    println!("Kernel: {:?}", simulator.kernel().rows);
    println!();

    println!("Running simulation...");
    let start = Instant::now();

    for i in 0..steps {
        simulator.step();

        // Print progress every 10%
        if (i + 1) % (steps / 10).max(1) == 0 {
            let stats = simulator.stats();
            let elapsed = start.elapsed().as_secs_f32();
            println!(
                "  Frame {}/{}: mean={:.4}, active={}, {:.1} frames/s",
                i + 1,
                steps,
                stats.mean,
                stats.active_pixels,
                (i + 1) as f32 / elapsed
            );
        }
    }

    let elapsed = start.elapsed();
    println!();
    print_stats("Final field", &simulator.stats());

    let frame = renderer.compose(simulator.backdrop(), &simulator.kernel(), (-1, -1));
    let lit = frame.data().chunks_exact(3).filter(|p| p.iter().any(|&v| v > 0)).count();
    println!("  Lit screen pixels: {}", lit);
    println!();
    println!(
        "Time: {:.2}s ({:.1} frames/s)",
        elapsed.as_secs_f32(),
        steps as f32 / elapsed.as_secs_f32()
    );
}

fn print_stats(label: &str, stats: &FieldStats) {
    println!("{}:", label);
    println!("  Mean: {:.6}", stats.mean);
    println!("  Active pixels: {}", stats.active_pixels);
    println!("  Value range: [{:.6}, {:.6}]", stats.min, stats.max);
}

fn print_example_config() {
    let config = SessionConfig::default();

    println!("Example configuration (config.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing config: {}", e);
            std::process::exit(1);
        }
    }
}
