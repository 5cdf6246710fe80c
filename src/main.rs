use std::collections::HashSet;
use std::path::PathBuf;

use log::info;
use rasterwerk::{Color, PixelBuffer, Recipe};

struct Args {
    recipe: Option<PathBuf>,
    save: Option<PathBuf>,
}

/// Parse command line arguments
fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut parsed = Args {
        recipe: None,
        save: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--recipe" | "-r" => {
                if i + 1 < args.len() {
                    parsed.recipe = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            },
            "--save" | "-s" => {
                if i + 1 < args.len() {
                    parsed.save = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            },
            "--help" | "-h" => {
                println!("Usage: rasterwerk [OPTIONS]");
                println!();
                println!("Options:");
                println!("  --recipe FILE, -r FILE  Run a JSON recipe (default: built-in demo)");
                println!("  --save FILE, -s FILE    Write the recipe that was run as JSON");
                println!("  --help, -h              Show this help message");
                println!();
                println!("Set RUST_LOG=debug to trace each step.");
                std::process::exit(0);
            },
            other => eprintln!("ignoring unknown argument '{}'", other),
        }
        i += 1;
    }

    parsed
}

/// Mean colour and number of distinct colours
fn summarize(buffer: &PixelBuffer) -> (Color, usize) {
    let mut sums = [0u64; 4];
    let mut distinct = HashSet::new();
    for &p in buffer.pixels() {
        let c = Color::from_argb(p);
        sums[0] += c.a as u64;
        sums[1] += c.r as u64;
        sums[2] += c.g as u64;
        sums[3] += c.b as u64;
        distinct.insert(p);
    }
    let n = buffer.pixels().len().max(1) as u64;
    let mean = Color::argb(
        (sums[0] / n) as u8,
        (sums[1] / n) as u8,
        (sums[2] / n) as u8,
        (sums[3] / n) as u8,
    );
    (mean, distinct.len())
}

fn main() -> Result<(), rasterwerk::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = parse_args();

    let recipe = match &args.recipe {
        Some(path) => {
            info!("loading recipe from {}", path.display());
            Recipe::load(path)?
        },
        None => Recipe::demo(),
    };

    let out = recipe.run()?;
    let (mean, distinct) = summarize(&out);

    println!("=== rasterwerk ===");
    println!("Recipe:     {} ({} steps)", recipe.name, recipe.steps.len());
    println!("Size:       {}x{}", out.width(), out.height());
    println!(
        "Mean ARGB:  ({}, {}, {}, {})",
        mean.a, mean.r, mean.g, mean.b
    );
    println!("Colours:    {}", distinct);

    if let Some(path) = &args.save {
        recipe.save(path)?;
        info!("recipe written to {}", path.display());
    }

    Ok(())
}
