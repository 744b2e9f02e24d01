//! World generation configuration.
//!
//! Every reference extent the generator depends on lives here instead of being baked
//! into the algorithms, so a world's shape is a parameter rather than a global.
//! Loadable from TOML; missing sections and keys fall back to the defaults below.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level generator configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub frame: FrameConfig,
    pub rivers: RiverConfig,
    pub lakes: LakeConfig,
    pub bounds: BoundsConfig,
    pub cache: CacheConfig,
}

/// Reference frame used for continent placement, sea level calibration and the
/// temperature gradient. Centered on the origin.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Frame width in tiles
    pub width: f64,
    /// Frame height in tiles (centered on the origin, the equator sits at y = 0)
    pub height: f64,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self { width: 1000.0, height: 1000.0 }
    }
}

/// River network parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiverConfig {
    /// Inclusive lower corner of the square region scanned for sources
    pub region_min: i32,
    /// Exclusive upper corner of the scanned region
    pub region_max: i32,
    /// Distance between sampled candidates in the source scan
    pub source_stride: i32,
    /// Minimum score a candidate needs to be kept
    pub source_threshold: f64,
    /// Minimum distance between accepted sources
    pub min_source_spacing: f64,
    /// Hard cap on accepted sources
    pub max_sources: usize,
    /// Shortest path that may end in a lake at a local minimum
    pub min_lake_path: usize,
}

impl Default for RiverConfig {
    fn default() -> Self {
        Self {
            region_min: -2500,
            region_max: 2500,
            source_stride: 25,
            source_threshold: 0.55,
            min_source_spacing: 60.0,
            max_sources: 300,
            min_lake_path: 8,
        }
    }
}

/// Standalone lake scatter parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LakeConfig {
    /// Maximum number of standalone lakes
    pub max_standalone: usize,
    /// Placement attempts before giving up
    pub attempts: usize,
    /// Lowest elevation a standalone lake center may sit at
    pub min_elevation: f64,
    /// Highest elevation a standalone lake center may sit at
    pub max_elevation: f64,
    /// Minimum distance from any river tile
    pub river_clearance: i32,
    /// Minimum gap between standalone lake rims
    pub min_spacing: f64,
}

impl Default for LakeConfig {
    fn default() -> Self {
        Self {
            max_standalone: 40,
            attempts: 400,
            min_elevation: 0.55,
            max_elevation: 0.75,
            river_clearance: 12,
            min_spacing: 30.0,
        }
    }
}

/// Accepted chunk coordinate range, checked before any generation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundsConfig {
    pub min_chunk: i32,
    pub max_chunk: i32,
}

impl Default for BoundsConfig {
    fn default() -> Self {
        Self { min_chunk: -10_000, max_chunk: 10_000 }
    }
}

/// Per-seed cache sizing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Number of seeds kept before the least recently used one is evicted
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { capacity: 8 }
    }
}

impl WorldConfig {
    /// Parse a TOML document and validate it.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: WorldConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Reject values the generator cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame.width <= 0.0 || self.frame.height <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "frame must have positive size, got {}x{}",
                self.frame.width, self.frame.height
            )));
        }
        if self.rivers.region_min >= self.rivers.region_max {
            return Err(ConfigError::Invalid(format!(
                "river region is empty: [{}, {})",
                self.rivers.region_min, self.rivers.region_max
            )));
        }
        if self.rivers.source_stride <= 0 {
            return Err(ConfigError::Invalid("rivers.source_stride must be positive".into()));
        }
        if self.lakes.min_elevation < 0.5 || self.lakes.min_elevation > self.lakes.max_elevation {
            return Err(ConfigError::Invalid(format!(
                "lake elevation band [{}, {}] must lie on land",
                self.lakes.min_elevation, self.lakes.max_elevation
            )));
        }
        if self.bounds.min_chunk > self.bounds.max_chunk {
            return Err(ConfigError::Invalid(format!(
                "chunk bounds inverted: [{}, {}]",
                self.bounds.min_chunk, self.bounds.max_chunk
            )));
        }
        if self.cache.capacity == 0 {
            return Err(ConfigError::Invalid("cache.capacity must be at least 1".into()));
        }
        Ok(())
    }
}
