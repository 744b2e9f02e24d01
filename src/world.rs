//! World generator: per-seed caches plus chunk, tile and region entry points.
//!
//! The terrain model and river system for a seed are built lazily on first use and
//! then shared read-only by every request for that seed. Chunks are never cached;
//! they are cheap to recompute and always come out the same.

use std::sync::{Arc, OnceLock};
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::biomes::Biome;
use crate::cache::{CacheStats, SeedCache};
use crate::chunk::{Chunk, Tile};
use crate::config::WorldConfig;
use crate::error::RequestResult;
use crate::request::{check_bounds, ChunkRequest};
use crate::rivers::RiverSystem;
use crate::terrain::TerrainModel;

/// Counts over a rectangle of chunks.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SurveyReport {
    pub chunks: usize,
    pub tiles: usize,
    pub ocean_tiles: usize,
    pub river_tiles: usize,
    pub lake_tiles: usize,
    /// Tile count per biome, in `Biome::ALL` order, zero counts omitted
    pub biomes: Vec<(Biome, usize)>,
}

impl SurveyReport {
    pub fn ocean_fraction(&self) -> f64 {
        self.fraction(self.ocean_tiles)
    }

    pub fn river_fraction(&self) -> f64 {
        self.fraction(self.river_tiles)
    }

    pub fn lake_fraction(&self) -> f64 {
        self.fraction(self.lake_tiles)
    }

    fn fraction(&self, count: usize) -> f64 {
        if self.tiles == 0 {
            0.0
        } else {
            count as f64 / self.tiles as f64
        }
    }
}

/// Cache statistics for both per-seed caches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GeneratorStats {
    pub terrain: CacheStats,
    pub rivers: CacheStats,
}

/// Chunk generator holding the per-seed caches.
pub struct WorldGenerator {
    config: WorldConfig,
    terrain: SeedCache<TerrainModel>,
    rivers: SeedCache<RiverSystem>,
}

impl WorldGenerator {
    pub fn new(config: WorldConfig) -> Self {
        let capacity = config.cache.capacity;
        Self {
            config,
            terrain: SeedCache::new(capacity),
            rivers: SeedCache::new(capacity),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(WorldConfig::default())
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Terrain model for `seed`, built on first use.
    pub fn terrain(&self, seed: i64) -> Arc<TerrainModel> {
        self.terrain.get_or_build(seed, || {
            let start = Instant::now();
            let model = TerrainModel::new(seed, &self.config.frame);
            log::info!(
                "seed {seed}: terrain model with {} continents built in {:.2?}",
                model.continent().centers().len(),
                start.elapsed()
            );
            model
        })
    }

    /// River system for `seed`, built on first use.
    pub fn rivers(&self, seed: i64) -> Arc<RiverSystem> {
        self.rivers.get_or_build(seed, || {
            let terrain = self.terrain(seed);
            RiverSystem::build(&terrain, &self.config)
        })
    }

    /// Evaluate one absolute coordinate.
    pub fn tile_at(&self, x: i32, y: i32, seed: i64) -> Tile {
        let terrain = self.terrain(seed);
        let rivers = self.rivers(seed);
        Tile::assemble(&terrain, &rivers, x, y)
    }

    /// Generate one chunk. Coordinates are not bounds-checked here; use
    /// [`WorldGenerator::handle_request`] for caller-supplied input.
    pub fn generate_chunk(&self, chunk_x: i32, chunk_y: i32, seed: i64) -> Chunk {
        let terrain = self.terrain(seed);
        let rivers = self.rivers(seed);
        Chunk::assemble(chunk_x, chunk_y, &terrain, &rivers)
    }

    /// Validate a raw request and generate its chunk.
    pub fn handle_request(&self, request: &ChunkRequest) -> RequestResult<Chunk> {
        let valid = request.validate(&self.config.bounds)?;
        Ok(self.generate_chunk(valid.chunk_x, valid.chunk_y, valid.seed))
    }

    /// Generate a `width` x `height` rectangle of chunks starting at
    /// `(chunk_x, chunk_y)`, row-major. Every corner is bounds-checked first.
    pub fn generate_region(
        &self,
        chunk_x: i32,
        chunk_y: i32,
        width: u32,
        height: u32,
        seed: i64,
    ) -> RequestResult<Vec<Chunk>> {
        let last_x = chunk_x.saturating_add(width.saturating_sub(1) as i32);
        let last_y = chunk_y.saturating_add(height.saturating_sub(1) as i32);
        check_bounds(chunk_x, chunk_y, &self.config.bounds)?;
        check_bounds(last_x, last_y, &self.config.bounds)?;

        let terrain = self.terrain(seed);
        let rivers = self.rivers(seed);
        let (width, height) = (width as i32, height as i32);
        Ok((0..width * height)
            .into_par_iter()
            .map(|i| Chunk::assemble(chunk_x + i % width, chunk_y + i / width, &terrain, &rivers))
            .collect())
    }

    /// Ocean, river, lake and biome counts over a rectangle of chunks.
    pub fn survey_region(
        &self,
        chunk_x: i32,
        chunk_y: i32,
        width: u32,
        height: u32,
        seed: i64,
    ) -> RequestResult<SurveyReport> {
        let chunks = self.generate_region(chunk_x, chunk_y, width, height, seed)?;
        let mut per_biome = vec![0usize; Biome::ALL.len()];
        let mut report = SurveyReport { chunks: chunks.len(), ..Default::default() };

        for tile in chunks.iter().flat_map(Chunk::iter) {
            report.tiles += 1;
            report.ocean_tiles += usize::from(tile.is_ocean());
            report.river_tiles += usize::from(tile.river_segment.is_some());
            report.lake_tiles += usize::from(tile.lake);
            if let Some(i) = Biome::ALL.iter().position(|&b| b == tile.biome) {
                per_biome[i] += 1;
            }
        }
        report.biomes = Biome::ALL
            .iter()
            .zip(per_biome)
            .filter(|(_, count)| *count > 0)
            .map(|(&biome, count)| (biome, count))
            .collect();

        log::debug!(
            "seed {seed}: surveyed {} chunks, ocean {:.1}%",
            report.chunks,
            report.ocean_fraction() * 100.0
        );
        Ok(report)
    }

    /// Drop all cached per-seed state. Later requests rebuild identical models.
    pub fn clear_caches(&self) {
        self.terrain.clear();
        self.rivers.clear();
        log::debug!("per-seed caches cleared");
    }

    pub fn cache_stats(&self) -> GeneratorStats {
        GeneratorStats {
            terrain: self.terrain.stats(),
            rivers: self.rivers.stats(),
        }
    }
}

impl Default for WorldGenerator {
    fn default() -> Self {
        Self::with_defaults()
    }
}

static DEFAULT_GENERATOR: OnceLock<WorldGenerator> = OnceLock::new();

/// Process-wide generator with the default configuration.
pub fn default_generator() -> &'static WorldGenerator {
    DEFAULT_GENERATOR.get_or_init(WorldGenerator::with_defaults)
}

/// Generate a chunk with the process-wide default generator.
pub fn generate_chunk(chunk_x: i32, chunk_y: i32, seed: i64) -> Chunk {
    default_generator().generate_chunk(chunk_x, chunk_y, seed)
}

/// Clear the process-wide default generator's caches.
pub fn clear_caches() {
    default_generator().clear_caches();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::CHUNK_SIZE;
    use crate::encoding::encode_chunk;
    use crate::error::RequestError;

    #[test]
    fn test_chunk_is_deterministic() {
        let generator = WorldGenerator::with_defaults();
        let a = generator.generate_chunk(3, -2, 12345);
        let b = generator.generate_chunk(3, -2, 12345);
        assert_eq!(a, b);
        assert_eq!(a.tiles.len(), CHUNK_SIZE * CHUNK_SIZE);
    }

    #[test]
    fn test_chunk_agrees_with_single_tiles() {
        let generator = WorldGenerator::with_defaults();
        let chunk = generator.generate_chunk(25, 31, 777);
        for (lx, ly) in [(0, 0), (7, 3), (15, 15)] {
            let tile = chunk.tile(lx, ly).unwrap();
            assert_eq!(*tile, generator.tile_at(tile.x, tile.y, 777));
        }
    }

    #[test]
    fn test_region_matches_individual_chunks() {
        let generator = WorldGenerator::with_defaults();
        let region = generator.generate_region(30, 30, 3, 2, 4242).unwrap();
        assert_eq!(region.len(), 6);
        assert_eq!((region[4].chunk_x, region[4].chunk_y), (31, 31));
        for chunk in &region {
            assert_eq!(*chunk, generator.generate_chunk(chunk.chunk_x, chunk.chunk_y, 4242));
        }
    }

    #[test]
    fn test_independent_of_request_order_and_cache_state() {
        let fresh = WorldGenerator::with_defaults();
        let expected = fresh.generate_chunk(10, 10, 99);

        let busy = WorldGenerator::new(WorldConfig {
            cache: crate::config::CacheConfig { capacity: 1 },
            ..WorldConfig::default()
        });
        busy.generate_chunk(-5, 8, 1);
        busy.generate_chunk(10, 11, 99);
        busy.generate_chunk(0, 0, 2);
        assert_eq!(busy.generate_chunk(10, 10, 99), expected);
        assert!(busy.cache_stats().terrain.evictions > 0);

        busy.clear_caches();
        assert_eq!(busy.generate_chunk(10, 10, 99), expected);
    }

    #[test]
    fn test_no_water_features_on_ocean() {
        let generator = WorldGenerator::with_defaults();
        let chunks = generator.generate_region(20, 20, 6, 6, 12345).unwrap();
        for tile in chunks.iter().flat_map(Chunk::iter) {
            assert_eq!(tile.is_ocean(), tile.elevation < 0.5);
            if tile.is_ocean() {
                assert!(tile.river_segment.is_none());
                assert!(!tile.lake);
            }
        }
    }

    #[test]
    fn test_rivers_show_up_in_chunks() {
        let generator = WorldGenerator::with_defaults();
        let rivers = generator.rivers(12345);
        let &(x, y) = rivers
            .sources()
            .iter()
            .map(|s| &s.position)
            .find(|&&(x, y)| rivers.river_segment_at(x, y).is_some())
            .expect("seed 12345 has at least one river");
        let tile = generator.tile_at(x, y, 12345);
        assert_eq!(tile.river_segment, rivers.river_segment_at(x, y));
        assert!(!tile.is_ocean());
    }

    #[test]
    fn test_seed_sensitivity() {
        let generator = WorldGenerator::with_defaults();
        let a = generator.generate_chunk(0, 0, 12345);
        let b = generator.generate_chunk(0, 0, 54321);
        assert!(a.iter().zip(b.iter()).any(|(ta, tb)| ta.elevation != tb.elevation));
    }

    #[test]
    fn test_compact_encoding_is_stable() {
        let generator = WorldGenerator::with_defaults();
        let first = serde_json::to_string(&encode_chunk(&generator.generate_chunk(0, 0, 12345)).unwrap())
            .unwrap();
        generator.clear_caches();
        let second = serde_json::to_string(&encode_chunk(&generator.generate_chunk(0, 0, 12345)).unwrap())
            .unwrap();
        assert_eq!(first, second);

        let a = encode_chunk(&generator.generate_chunk(0, 0, 12345)).unwrap();
        let b = encode_chunk(&generator.generate_chunk(0, 0, 54321)).unwrap();
        let biome_differs = a
            .tiles
            .iter()
            .flatten()
            .zip(b.tiles.iter().flatten())
            .any(|(ta, tb)| ta.biome != tb.biome);
        assert!(biome_differs, "chunk (0, 0) encodes the same biomes for both seeds");
    }

    #[test]
    fn test_distinct_seeds_differ_in_biomes() {
        let generator = WorldGenerator::with_defaults();
        let a = generator.generate_chunk(0, 0, 12345);
        let b = generator.generate_chunk(0, 0, 54321);
        assert!(a.iter().zip(b.iter()).any(|(ta, tb)| ta.biome != tb.biome));
    }

    #[test]
    fn test_origin_chunk_is_mostly_land() {
        let generator = WorldGenerator::with_defaults();
        for seed in [12345, 54321] {
            let chunk = generator.generate_chunk(0, 0, seed);
            let land = chunk.iter().filter(|t| !t.is_ocean()).count();
            assert!(land * 2 > CHUNK_SIZE * CHUNK_SIZE, "seed {seed}: {land} land tiles");
        }
    }

    #[test]
    fn test_request_validation_happens_first() {
        let generator = WorldGenerator::with_defaults();
        let err = generator.handle_request(&ChunkRequest::new(0, 20_000, "1")).unwrap_err();
        assert!(matches!(err, RequestError::ChunkOutOfBounds { chunk_y: 20_000, .. }));
        assert_eq!(generator.cache_stats().terrain.misses, 0);

        let chunk = generator.handle_request(&ChunkRequest::new(1, 1, "12345")).unwrap();
        assert_eq!(chunk, generator.generate_chunk(1, 1, 12345));
    }

    #[test]
    fn test_region_bounds_are_checked() {
        let generator = WorldGenerator::with_defaults();
        assert!(generator.generate_region(9_999, 0, 4, 1, 1).is_err());
        assert!(generator.generate_region(9_997, 0, 4, 1, 1).is_ok());
    }

    #[test]
    fn test_survey_counts() {
        let generator = WorldGenerator::with_defaults();
        let report = generator.survey_region(0, 0, 4, 4, 12345).unwrap();
        assert_eq!(report.chunks, 16);
        assert_eq!(report.tiles, 16 * CHUNK_SIZE * CHUNK_SIZE);
        assert_eq!(report.biomes.iter().map(|(_, n)| n).sum::<usize>(), report.tiles);
        assert!((0.0..=1.0).contains(&report.ocean_fraction()));
    }

    #[test]
    fn test_default_generator_functions() {
        let chunk = generate_chunk(2, 2, 31337);
        clear_caches();
        assert_eq!(generate_chunk(2, 2, 31337), chunk);
    }

    /// Full survey over the reference frame; slow in debug builds.
    #[test]
    #[ignore]
    fn test_ocean_fraction_over_large_regions() {
        let generator = WorldGenerator::with_defaults();
        let seeds = [1, 42, 12345, 54321, 99, 2024, 777];
        let within = seeds
            .iter()
            .filter(|&&seed| {
                let report = generator.survey_region(-31, -31, 62, 62, seed).unwrap();
                let fraction = report.ocean_fraction();
                println!("seed {seed}: ocean {:.1}%", fraction * 100.0);
                (0.25..=0.35).contains(&fraction)
            })
            .count();
        assert_eq!(within, seeds.len(), "{within}/{} seeds in range", seeds.len());
    }
}
