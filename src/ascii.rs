//! ASCII rendering for chunk previews
//!
//! Renders a rectangle of generated chunks as text, one character per tile.

use crate::biomes::Biome;
use crate::chunk::{Chunk, Tile, CHUNK_SIZE};

/// ASCII rendering modes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AsciiMode {
    /// Biome characters with rivers and lakes drawn on top
    Biome,
    /// Elevation gradient
    Height,
    /// Temperature gradient
    Temperature,
    /// Moisture gradient
    Moisture,
}

impl AsciiMode {
    pub fn name(&self) -> &'static str {
        match self {
            AsciiMode::Biome => "Biome",
            AsciiMode::Height => "Height",
            AsciiMode::Temperature => "Temperature",
            AsciiMode::Moisture => "Moisture",
        }
    }
}

/// Get ASCII character for a biome
pub fn biome_char(biome: Biome) -> char {
    match biome {
        // Water biomes
        Biome::DeepOcean => '~',
        Biome::ShallowOcean => '.',

        // Cold biomes
        Biome::SnowyPeaks => 'A',
        Biome::Ice => '#',
        Biome::Tundra => ':',
        Biome::Alpine => '^',
        Biome::Taiga => 'B',

        // Temperate biomes
        Biome::Shrubland => 's',
        Biome::Grassland => '"',
        Biome::TemperateForest => 'T',
        Biome::Swamp => 'S',

        // Warm biomes
        Biome::Desert => 'd',
        Biome::Savanna => ';',
        Biome::TropicalForest => 't',
        Biome::Rainforest => 'r',
        Biome::Mangrove => 'G',
    }
}

const LAKE_CHAR: char = 'o';

/// Get ASCII character for elevation (11-level gradient over [0, 1])
pub fn height_char(elevation: f64) -> char {
    const CHARS: &[char] = &['~', '.', '-', '=', '+', '*', '#', '%', '^', 'A', 'M'];
    gradient_char(CHARS, elevation)
}

/// Get ASCII character for temperature
pub fn temperature_char(temperature: f64) -> char {
    const CHARS: &[char] = &['#', '=', '-', '.', ',', ';', ':', '+', '*', '@'];
    gradient_char(CHARS, temperature)
}

/// Get ASCII character for moisture
pub fn moisture_char(moisture: f64) -> char {
    const CHARS: &[char] = &['_', '.', '-', ':', ';', '=', '+', '#', '%', '~'];
    gradient_char(CHARS, moisture)
}

fn gradient_char(chars: &[char], value: f64) -> char {
    let idx = (value.clamp(0.0, 1.0) * (chars.len() - 1) as f64) as usize;
    chars[idx.min(chars.len() - 1)]
}

/// Character for one tile in the given mode.
pub fn tile_char(tile: &Tile, mode: AsciiMode) -> char {
    match mode {
        AsciiMode::Biome => {
            if tile.lake {
                LAKE_CHAR
            } else if let Some(segment) = tile.river_segment {
                segment.glyph()
            } else {
                biome_char(tile.biome)
            }
        }
        AsciiMode::Height => height_char(tile.elevation),
        AsciiMode::Temperature => temperature_char(tile.temperature),
        AsciiMode::Moisture => moisture_char(tile.moisture),
    }
}

/// Render a row-major rectangle of chunks, `chunks_wide` chunks per row.
pub fn render_chunks(chunks: &[Chunk], chunks_wide: usize, mode: AsciiMode) -> String {
    let chunks_wide = chunks_wide.max(1);
    let width = chunks_wide * CHUNK_SIZE;
    let mut result = String::new();

    for chunk_row in chunks.chunks(chunks_wide) {
        for ly in 0..CHUNK_SIZE {
            let mut line = String::with_capacity(width);
            for chunk in chunk_row {
                for lx in 0..CHUNK_SIZE {
                    line.push(chunk.tile(lx, ly).map_or(' ', |tile| tile_char(tile, mode)));
                }
            }
            result.push_str(line.trim_end());
            result.push('\n');
        }
    }

    result
}

/// Generate legend for biome mode
pub fn biome_legend() -> String {
    let mut legend = String::new();
    legend.push_str("=== BIOME LEGEND ===\n");
    legend.push_str("WATER:\n");
    legend.push_str("  ~ DeepOcean    . Shallow     o Lake        - | / \\ River\n");
    legend.push_str("COLD:\n");
    legend.push_str("  A SnowyPeaks   # Ice         : Tundra      ^ Alpine     B Taiga\n");
    legend.push_str("TEMPERATE:\n");
    legend.push_str("  s Shrubland    \" Grassland   T TempForest  S Swamp\n");
    legend.push_str("WARM:\n");
    legend.push_str("  d Desert       ; Savanna     t TropForest  r Rainforest G Mangrove\n");
    legend
}

/// Generate height legend
pub fn height_legend() -> String {
    "=== HEIGHT LEGEND ===\n\
     Deep ocean -> High peaks:\n\
     ~ . - = + * # % ^ A M\n\
     (0.0)   (0.5)   (1.0)\n"
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FrameConfig;
    use crate::rivers::{RiverSegment, RiverSystem};
    use crate::terrain::TerrainModel;

    #[test]
    fn test_biome_chars_are_distinct() {
        let mut seen: Vec<char> = Biome::ALL.iter().map(|&b| biome_char(b)).collect();
        seen.push(LAKE_CHAR);
        let count = seen.len();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), count);
    }

    #[test]
    fn test_overlay_priority() {
        let terrain = TerrainModel::new(3, &FrameConfig::default());
        let mut tile = Tile::assemble(&terrain, &RiverSystem::default(), 500, 500);
        tile.river_segment = Some(RiverSegment::Vertical);
        assert_eq!(tile_char(&tile, AsciiMode::Biome), '|');
        tile.lake = true;
        assert_eq!(tile_char(&tile, AsciiMode::Biome), LAKE_CHAR);
        assert_eq!(tile_char(&tile, AsciiMode::Height), height_char(tile.elevation));
    }

    #[test]
    fn test_render_dimensions() {
        let terrain = TerrainModel::new(8, &FrameConfig::default());
        let rivers = RiverSystem::default();
        let chunks: Vec<Chunk> = (0..6)
            .map(|i| Chunk::assemble(i % 3, i / 3, &terrain, &rivers))
            .collect();
        let text = render_chunks(&chunks, 3, AsciiMode::Height);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2 * CHUNK_SIZE);
        assert!(lines.iter().all(|l| l.chars().count() == 3 * CHUNK_SIZE));
        // Second chunk row starts with chunk (0, 1)
        let first = chunks[3].tile(0, 0).map(|t| tile_char(t, AsciiMode::Height));
        assert_eq!(lines[CHUNK_SIZE].chars().next(), first);
    }

    #[test]
    fn test_gradients_clamp() {
        assert_eq!(height_char(-1.0), '~');
        assert_eq!(height_char(2.0), 'M');
        assert_eq!(moisture_char(1.0), '~');
    }
}
