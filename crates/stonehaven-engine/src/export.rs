//! World exporters: PNG preview, ASCII preview and JSON dump.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use image::{Rgb, RgbImage};
use serde::Serialize;
use stonehaven_common::Direction;
use stonehaven_wfc::{parse_id, Category, ParsedId};
use stonehaven_worldgen::{ChunkReport, GeneratedWorld, GenerationSettings, WorldStats};
use tracing::info;

const WATER_COLOR: Rgb<u8> = Rgb([38, 92, 196]);
const LAND_COLOR: Rgb<u8> = Rgb([86, 168, 72]);
const UNKNOWN_COLOR: Rgb<u8> = Rgb([128, 128, 128]);

/// Fill color of a terrain base.
fn base_color(base: &str, settings: &GenerationSettings) -> Rgb<u8> {
    if base == settings.water_base {
        return WATER_COLOR;
    }
    if base == settings.land_base {
        return LAND_COLOR;
    }
    // Stable color per unknown base
    let hash = base
        .bytes()
        .fold(0x811c_9dc5_u32, |h, b| (h ^ u32::from(b)).wrapping_mul(0x0100_0193));
    let [r, g, b, _] = hash.to_le_bytes();
    Rgb([r / 2 + 64, g / 2 + 64, b / 2 + 64])
}

/// Color of the terrain across the exterior edges of a `base` tile.
fn exterior_color(base: &str, settings: &GenerationSettings) -> Rgb<u8> {
    if base == settings.land_base {
        WATER_COLOR
    } else if base == settings.water_base {
        LAND_COLOR
    } else {
        let Rgb([r, g, b]) = base_color(base, settings);
        Rgb([r / 2, g / 2, b / 2])
    }
}

/// Draws every cell as a `tile_px` square in its base color, with a band of
/// the exterior color along each exterior side.
pub fn render_png<T>(world: &GeneratedWorld<'_, T>, tile_px: u32) -> RgbImage {
    let settings = world.settings();
    let tile_px = tile_px.max(1);
    let band = (tile_px / 4).max(1);
    let ids = world.id_grid();
    let mut img = RgbImage::new(world.width() as u32 * tile_px, world.height() as u32 * tile_px);

    for (at, id) in ids.iter() {
        let parsed = parse_id(id).ok();
        let fill = parsed
            .as_ref()
            .map_or(UNKNOWN_COLOR, |p| base_color(&p.base, settings));
        let (x0, y0) = (at.x as u32 * tile_px, at.y as u32 * tile_px);

        for dy in 0..tile_px {
            for dx in 0..tile_px {
                let color = match &parsed {
                    Some(p) if in_exterior_band(p, dx, dy, tile_px, band) => {
                        exterior_color(&p.base, settings)
                    }
                    _ => fill,
                };
                img.put_pixel(x0 + dx, y0 + dy, color);
            }
        }
    }
    img
}

fn in_exterior_band(parsed: &ParsedId, dx: u32, dy: u32, tile_px: u32, band: u32) -> bool {
    parsed.exterior.iter().any(|dir| match dir {
        Direction::North => dy < band,
        Direction::South => dy >= tile_px - band,
        Direction::West => dx < band,
        Direction::East => dx >= tile_px - band,
    })
}

/// Renders the PNG preview and writes it to `path`.
pub fn write_png<T>(world: &GeneratedWorld<'_, T>, path: &Path, tile_px: u32) -> Result<()> {
    let img = render_png(world, tile_px);
    img.save(path)
        .with_context(|| format!("Failed to write PNG to {}", path.display()))?;
    info!(
        "Wrote {}x{} preview to {}",
        img.width(),
        img.height(),
        path.display()
    );
    Ok(())
}

/// One character per cell.
fn glyph(id: &str, settings: &GenerationSettings) -> char {
    let Ok(parsed) = parse_id(id) else {
        return '?';
    };
    match parsed.kind {
        Category::Center if parsed.base == settings.water_base => '~',
        Category::Center if parsed.base == settings.land_base => '.',
        Category::Center => parsed.base.chars().next().unwrap_or('#'),
        Category::Edge => match parsed.exterior.first() {
            Some(Direction::North) => '^',
            Some(Direction::East) => '>',
            Some(Direction::South) => 'v',
            Some(Direction::West) => '<',
            None => '?',
        },
        Category::Corner => '+',
    }
}

/// ASCII preview, one line per row.
pub fn render_ascii<T>(world: &GeneratedWorld<'_, T>) -> String {
    let settings = world.settings();
    let ids = world.id_grid();
    let mut out = String::with_capacity((world.width() + 1) * world.height());
    for row in ids.rows() {
        out.extend(row.iter().map(|id| glyph(id, settings)));
        out.push('\n');
    }
    out
}

#[derive(Serialize)]
struct WorldDump<'a> {
    seed: u64,
    width: usize,
    height: usize,
    stats: WorldStats,
    chunks: &'a [ChunkReport],
    rows: Vec<&'a [&'a str]>,
}

/// Writes the id grid, chunk reports and stats as JSON.
pub fn write_json<T>(world: &GeneratedWorld<'_, T>, path: &Path) -> Result<()> {
    let ids = world.id_grid();
    let dump = WorldDump {
        seed: world.seed(),
        width: world.width(),
        height: world.height(),
        stats: world.stats(),
        chunks: world.reports(),
        rows: ids.rows().collect(),
    };

    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &dump).context("Failed to encode world JSON")?;
    writer.flush()?;
    info!("Wrote world JSON to {}", path.display());
    Ok(())
}
