//! Per-seed terrain model: continents plus the tile field layers.
//!
//! Everything here is a pure function of (seed, coordinate). The model is built once
//! per seed and shared read-only between chunk requests.

use crate::climate::ClimateField;
use crate::config::FrameConfig;
use crate::continent::{ContinentModel, SEA_LEVEL};
use crate::heightmap::ElevationField;
use crate::seeds::WorldSeeds;

/// Continuous fields of one tile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileFields {
    pub elevation: f64,
    pub temperature: f64,
    pub moisture: f64,
}

impl TileFields {
    pub fn is_land(&self) -> bool {
        self.elevation >= SEA_LEVEL
    }
}

#[derive(Clone, Debug)]
pub struct TerrainModel {
    seeds: WorldSeeds,
    continent: ContinentModel,
    elevation: ElevationField,
    climate: ClimateField,
}

impl TerrainModel {
    pub fn new(seed: i64, frame: &FrameConfig) -> Self {
        let seeds = WorldSeeds::from_master(seed);
        Self {
            continent: ContinentModel::new(&seeds, frame),
            elevation: ElevationField::new(&seeds),
            climate: ClimateField::new(&seeds, frame.height),
            seeds,
        }
    }

    pub fn seeds(&self) -> &WorldSeeds {
        &self.seeds
    }

    pub fn continent(&self) -> &ContinentModel {
        &self.continent
    }

    pub fn elevation(&self, x: i32, y: i32) -> f64 {
        let (fx, fy) = (f64::from(x), f64::from(y));
        self.elevation.elevation(self.continent.land_strength(fx, fy), fx, fy)
    }

    pub fn fields(&self, x: i32, y: i32) -> TileFields {
        let elevation = self.elevation(x, y);
        let (fx, fy) = (f64::from(x), f64::from(y));
        TileFields {
            elevation,
            temperature: self.climate.temperature(fx, fy, elevation),
            moisture: self.climate.moisture(fx, fy),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_are_pure() {
        let a = TerrainModel::new(12345, &FrameConfig::default());
        let b = TerrainModel::new(12345, &FrameConfig::default());
        for i in -50..50 {
            let (x, y) = (i * 17, 500 - i * 9);
            assert_eq!(a.fields(x, y), b.fields(x, y));
        }
    }

    #[test]
    fn test_elevation_agrees_with_land_strength() {
        let t = TerrainModel::new(99, &FrameConfig::default());
        for i in 0..1000 {
            let (x, y) = ((i % 40) * 25, (i / 40) * 40);
            let strength = t.continent().land_strength(f64::from(x), f64::from(y));
            assert_eq!(t.elevation(x, y) >= SEA_LEVEL, strength >= SEA_LEVEL);
        }
    }
}
