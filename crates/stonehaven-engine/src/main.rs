//! # Stonehaven
//!
//! Command-line terrain generator for Project Stonehaven.
//!
//! Subcommands:
//! - `generate`: build a world from settings and a tile catalog, then export it
//! - `derive`: recompute a catalog's sockets and adjacency from module ids
//! - `template`: write the built-in grass/water catalog

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod export;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use stonehaven_wfc::{templates, Catalog, SocketDeriver};
use stonehaven_worldgen::{GenerationSettings, Scheduling, WorldGenerator};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "stonehaven")]
#[command(about = "Generate tile terrain with chunked wave function collapse")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a world and export it
    Generate(GenerateArgs),
    /// Recompute sockets and adjacency of a catalog from its module ids
    Derive(DeriveArgs),
    /// Write the built-in grass/water catalog
    Template(TemplateArgs),
}

#[derive(clap::Args, Debug)]
struct GenerateArgs {
    /// Generation settings (TOML); defaults are used if the file is missing
    #[arg(short, long, default_value = "stonehaven.toml")]
    config: PathBuf,

    /// Tile catalog (TOML); the built-in grass/water catalog if omitted
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Re-derive the catalog's adjacency from module ids before generating
    #[arg(long)]
    derive: bool,

    /// Random seed (random if not specified; a non-zero seed in the settings wins)
    #[arg(short, long)]
    seed: Option<u64>,

    /// World width in tiles
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// World height in tiles
    #[arg(short = 'H', long)]
    height: Option<usize>,

    /// Chunk edge in tiles
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Solve chunks in parallel
    #[arg(long)]
    parallel: bool,

    /// Fail instead of filling chunks that never collapse
    #[arg(long)]
    strict: bool,

    /// Write a PNG preview
    #[arg(long)]
    png: Option<PathBuf>,

    /// Pixel size of one tile in the PNG preview
    #[arg(long)]
    tile_px: Option<u32>,

    /// Write the id grid as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Print an ASCII preview
    #[arg(long)]
    ascii: bool,
}

#[derive(clap::Args, Debug)]
struct DeriveArgs {
    /// Catalog to read
    input: PathBuf,

    /// Where to write the result (defaults to overwriting the input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Extra base pairings as `land:water`
    #[arg(long = "pair", value_parser = parse_pair)]
    pairs: Vec<(String, String)>,
}

#[derive(clap::Args, Debug)]
struct TemplateArgs {
    /// Where to write the catalog
    output: PathBuf,

    /// Which adjacency to include
    #[arg(long, value_enum, default_value_t = TemplateVariant::Derived)]
    variant: TemplateVariant,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum TemplateVariant {
    /// Modules only, no adjacency
    Bare,
    /// Adjacency derived from sockets
    Derived,
    /// Hand-authored adjacency
    Authored,
}

fn parse_pair(s: &str) -> Result<(String, String), String> {
    match s.split_once(':') {
        Some((a, b)) if !a.is_empty() && !b.is_empty() => Ok((a.to_string(), b.to_string())),
        _ => Err(format!("expected `land:water`, got `{s}`")),
    }
}

/// Main entry point.
fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("stonehaven=info".parse()?))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Generate(args) => generate(&args),
        Command::Derive(args) => derive(&args),
        Command::Template(args) => template(&args),
    }
}

fn generate(args: &GenerateArgs) -> Result<()> {
    let generator = build_generator(args)?;
    let seed = args.seed.unwrap_or_else(|| fastrand::u64(1..));
    let world = generator.generate(seed).context("Generation failed")?;
    world.stats().log();

    if let Some(path) = &args.png {
        export::write_png(&world, path, generator.settings().tile_pixel_size)?;
    }
    if let Some(path) = &args.json {
        export::write_json(&world, path)?;
    }
    if args.ascii {
        print!("{}", export::render_ascii(&world));
    }
    Ok(())
}

/// Loads settings and catalog, applies command-line overrides and validates
/// the result.
fn build_generator(args: &GenerateArgs) -> Result<WorldGenerator> {
    let mut settings = GenerationSettings::load_from(&args.config)
        .with_context(|| format!("Failed to load settings from {}", args.config.display()))?;
    apply_overrides(&mut settings, args);

    let mut catalog = match &args.catalog {
        Some(path) => Catalog::<String>::load_from(path)
            .with_context(|| format!("Failed to load catalog from {}", path.display()))?,
        None => templates::grass_water_derived(),
    };
    if args.derive {
        let deriver = SocketDeriver::default().with_pairing(&settings.land_base, &settings.water_base);
        let report = deriver.derive(&mut catalog.modules);
        info!("Derived sockets for {} modules", report.derived);
    }

    WorldGenerator::new(settings, catalog).context("Invalid generation setup")
}

fn apply_overrides(settings: &mut GenerationSettings, args: &GenerateArgs) {
    if let Some(width) = args.width {
        settings.width = width;
    }
    if let Some(height) = args.height {
        settings.height = height;
    }
    if let Some(chunk_size) = args.chunk_size {
        settings.chunk_size = chunk_size;
    }
    if let Some(tile_px) = args.tile_px {
        settings.tile_pixel_size = tile_px;
    }
    if args.parallel {
        settings.scheduling = Scheduling::Parallel;
    }
    if args.strict {
        settings.strict = true;
    }
}

fn derive(args: &DeriveArgs) -> Result<()> {
    let mut catalog = Catalog::<String>::load_from(&args.input)
        .with_context(|| format!("Failed to load catalog from {}", args.input.display()))?;

    let deriver = args
        .pairs
        .iter()
        .fold(SocketDeriver::default(), |d, (a, b)| d.with_pairing(a, b));
    let report = deriver.derive(&mut catalog.modules);
    if !report.is_clean() {
        warn!(
            "{} of {} modules did not match the naming convention",
            report.mismatches.len(),
            catalog.len()
        );
    }

    let output: &Path = args.output.as_deref().unwrap_or(args.input.as_path());
    catalog
        .save_to(output)
        .with_context(|| format!("Failed to save catalog to {}", output.display()))?;
    info!("Derived {} modules into {}", report.derived, output.display());
    Ok(())
}

fn template(args: &TemplateArgs) -> Result<()> {
    let catalog = match args.variant {
        TemplateVariant::Bare => templates::grass_water(),
        TemplateVariant::Derived => templates::grass_water_derived(),
        TemplateVariant::Authored => templates::grass_water_authored(),
    };
    catalog
        .save_to(&args.output)
        .with_context(|| format!("Failed to write template to {}", args.output.display()))?;
    Ok(())
}
