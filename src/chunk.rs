//! Chunk assembly: the finished tile block for one chunk coordinate.
//!
//! A tile is a pure function of (seed, absolute coordinate), so a chunk is just its
//! 16x16 window onto the world, evaluated against the per-seed terrain and river
//! models.

use serde::{Deserialize, Serialize};

use crate::biomes::{Biome, ElevationCategory};
use crate::rivers::{RiverSegment, RiverSystem};
use crate::terrain::TerrainModel;
use crate::tilemap::Tilemap;

/// Side length of a chunk in tiles
pub const CHUNK_SIZE: usize = 16;

/// One generated surface tile.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    /// Absolute world x
    pub x: i32,
    /// Absolute world y
    pub y: i32,
    pub elevation: f64,
    pub temperature: f64,
    pub moisture: f64,
    pub biome: Biome,
    pub elevation_category: ElevationCategory,
    pub river_segment: Option<RiverSegment>,
    pub lake: bool,
}

impl Tile {
    /// Evaluate every layer at one absolute coordinate.
    pub fn assemble(terrain: &TerrainModel, rivers: &RiverSystem, x: i32, y: i32) -> Self {
        let fields = terrain.fields(x, y);
        let land = fields.is_land();
        Tile {
            x,
            y,
            elevation: fields.elevation,
            temperature: fields.temperature,
            moisture: fields.moisture,
            biome: Biome::classify(fields.elevation, fields.temperature, fields.moisture),
            elevation_category: ElevationCategory::classify(fields.elevation),
            river_segment: if land { rivers.river_segment_at(x, y) } else { None },
            lake: land && rivers.is_lake(x, y),
        }
    }

    pub fn is_ocean(&self) -> bool {
        self.biome.is_ocean()
    }
}

/// A 16x16 block of tiles addressed by chunk coordinate and seed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub chunk_x: i32,
    pub chunk_y: i32,
    pub seed: i64,
    pub tiles: Tilemap<Tile>,
}

impl Chunk {
    /// Absolute coordinate of the chunk's top-left tile.
    pub fn origin(chunk_x: i32, chunk_y: i32) -> (i32, i32) {
        let size = CHUNK_SIZE as i32;
        (chunk_x * size, chunk_y * size)
    }

    /// Build a chunk. Chunk coordinates are expected to be within the validated
    /// request bounds.
    pub fn assemble(
        chunk_x: i32,
        chunk_y: i32,
        terrain: &TerrainModel,
        rivers: &RiverSystem,
    ) -> Self {
        let (ox, oy) = Self::origin(chunk_x, chunk_y);
        let tiles = Tilemap::from_fn(CHUNK_SIZE, CHUNK_SIZE, |lx, ly| {
            Tile::assemble(terrain, rivers, ox + lx as i32, oy + ly as i32)
        });

        Chunk {
            chunk_x,
            chunk_y,
            seed: terrain.seeds().master,
            tiles,
        }
    }

    /// Tile at local coordinate `(lx, ly)`.
    pub fn tile(&self, lx: usize, ly: usize) -> Option<&Tile> {
        self.tiles.get_checked(lx, ly)
    }

    /// Tiles in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter().map(|(_, _, tile)| tile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FrameConfig;

    fn chunk(chunk_x: i32, chunk_y: i32) -> Chunk {
        let terrain = TerrainModel::new(12345, &FrameConfig::default());
        Chunk::assemble(chunk_x, chunk_y, &terrain, &RiverSystem::default())
    }

    #[test]
    fn test_local_to_absolute_mapping() {
        let c = chunk(1, 1);
        assert_eq!((c.tiles.width, c.tiles.height), (CHUNK_SIZE, CHUNK_SIZE));
        let first = c.tile(0, 0).unwrap();
        assert_eq!((first.x, first.y), (16, 16));
        let last = c.tile(15, 15).unwrap();
        assert_eq!((last.x, last.y), (31, 31));
        assert!(c.tile(16, 0).is_none());
    }

    #[test]
    fn test_negative_chunk_origin() {
        assert_eq!(Chunk::origin(-1, -2), (-16, -32));
        let c = chunk(-1, 0);
        assert_eq!(c.tile(15, 0).map(|t| (t.x, t.y)), Some((-1, 0)));
    }

    #[test]
    fn test_biome_agrees_with_sea_level() {
        let c = chunk(20, 30);
        for tile in c.iter() {
            assert_eq!(tile.is_ocean(), tile.elevation < 0.5);
            assert!((0.0..=1.0).contains(&tile.temperature));
            assert!((0.0..=1.0).contains(&tile.moisture));
        }
    }
}
