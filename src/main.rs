use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use planet_chunks::ascii::{self, AsciiMode};
use planet_chunks::encoding::encode_chunk;
use planet_chunks::request::ChunkRequest;
use planet_chunks::seeds::normalize_seed;
use planet_chunks::{WorldConfig, WorldGenerator};

#[derive(Parser, Debug)]
#[command(name = "planet_chunks")]
#[command(about = "Generate chunks of a procedural planet surface")]
struct Args {
    /// World seed (integer, or any string to hash)
    #[arg(short, long, default_value = "12345", global = true)]
    seed: String,

    /// TOML configuration file (defaults are used when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print one chunk in compact encoding as JSON
    Chunk {
        #[arg(allow_hyphen_values = true)]
        x: i32,
        #[arg(allow_hyphen_values = true)]
        y: i32,
        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Render a rectangle of chunks as ASCII
    Preview {
        /// Top-left chunk x
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        x: i32,
        /// Top-left chunk y
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        y: i32,
        /// Width in chunks
        #[arg(short = 'W', long, default_value = "6")]
        width: u32,
        /// Height in chunks
        #[arg(short = 'H', long, default_value = "4")]
        height: u32,
        /// biome, height, temperature or moisture
        #[arg(short, long, default_value = "biome")]
        mode: String,
        /// Print the legend below the map
        #[arg(long)]
        legend: bool,
    },

    /// Ocean, river, lake and biome statistics over a rectangle of chunks
    Survey {
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        x: i32,
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        y: i32,
        #[arg(short = 'W', long, default_value = "20")]
        width: u32,
        #[arg(short = 'H', long, default_value = "20")]
        height: u32,
    },

    /// Summary of the seed's river and lake network
    Rivers {
        /// Also list every standalone lake
        #[arg(long)]
        lakes: bool,
    },
}

fn parse_mode(mode: &str) -> Option<AsciiMode> {
    match mode.to_ascii_lowercase().as_str() {
        "biome" | "b" => Some(AsciiMode::Biome),
        "height" | "h" => Some(AsciiMode::Height),
        "temperature" | "temp" | "t" => Some(AsciiMode::Temperature),
        "moisture" | "m" => Some(AsciiMode::Moisture),
        _ => None,
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("Error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), String> {
    let config = match &args.config {
        Some(path) => WorldConfig::load(path).map_err(|e| e.to_string())?,
        None => WorldConfig::default(),
    };
    let generator = WorldGenerator::new(config);

    match args.command {
        Command::Chunk { x, y, pretty } => {
            let chunk = generator
                .handle_request(&ChunkRequest::new(x, y, args.seed.as_str()))
                .map_err(|e| e.to_string())?;
            let compact = encode_chunk(&chunk).map_err(|e| e.to_string())?;
            let json = if pretty {
                serde_json::to_string_pretty(&compact)
            } else {
                serde_json::to_string(&compact)
            }
            .map_err(|e| e.to_string())?;
            println!("{json}");
        }

        Command::Preview { x, y, width, height, mode, legend } => {
            let mode = parse_mode(&mode).ok_or_else(|| format!("unknown preview mode '{mode}'"))?;
            let seed = normalize_seed(&args.seed).map_err(|e| e.to_string())?;
            let chunks = generator
                .generate_region(x, y, width, height, seed)
                .map_err(|e| e.to_string())?;

            println!("Seed {seed}, chunks ({x}, {y}) +{width}x{height}, {} view", mode.name());
            print!("{}", ascii::render_chunks(&chunks, width as usize, mode));
            if legend {
                match mode {
                    AsciiMode::Height => print!("{}", ascii::height_legend()),
                    _ => print!("{}", ascii::biome_legend()),
                }
            }
        }

        Command::Survey { x, y, width, height } => {
            let seed = normalize_seed(&args.seed).map_err(|e| e.to_string())?;
            let report = generator
                .survey_region(x, y, width, height, seed)
                .map_err(|e| e.to_string())?;

            println!("Seed {seed}: {} chunks, {} tiles", report.chunks, report.tiles);
            println!("  Ocean: {:.1}%", report.ocean_fraction() * 100.0);
            println!("  River: {:.2}%", report.river_fraction() * 100.0);
            println!("  Lake:  {:.2}%", report.lake_fraction() * 100.0);
            println!("Biomes:");
            let mut biomes = report.biomes.clone();
            biomes.sort_by(|a, b| b.1.cmp(&a.1));
            for (biome, count) in biomes {
                println!(
                    "  {:<18} {:>8} ({:.1}%)",
                    biome.display_name(),
                    count,
                    100.0 * count as f64 / report.tiles.max(1) as f64
                );
            }
        }

        Command::Rivers { lakes } => {
            let seed = normalize_seed(&args.seed).map_err(|e| e.to_string())?;
            let rivers = generator.rivers(seed);
            let stats = rivers.stats();

            println!("Seed {seed} river network:");
            println!("  Sources:          {}", stats.sources);
            println!("  Rivers:           {} ({} tiles)", stats.rivers, stats.river_tiles);
            println!("  Reached ocean:    {}", stats.reached_ocean);
            println!("  Confluences:      {}", stats.confluences);
            println!("  River lakes:      {} ({} tiles)", stats.river_lakes, stats.river_lake_tiles);
            println!(
                "  Standalone lakes: {} ({} tiles)",
                stats.standalone_lakes, stats.standalone_lake_tiles
            );
            if lakes {
                for lake in rivers.standalone_lakes() {
                    println!(
                        "    ({:>6}, {:>6})  radius {:.1}",
                        lake.center.0, lake.center.1, lake.radius
                    );
                }
            }
            log::debug!("{}", generator.cache_stats().rivers.summary());
        }
    }

    Ok(())
}
