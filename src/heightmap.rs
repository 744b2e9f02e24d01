//! Per-tile elevation.
//!
//! Land strength from the continent model already sits on the right side of sea
//! level; this layer only adds texture and clamps so the texture never pushes a tile
//! across the line.

use crate::continent::{LAND_MIN, OCEAN_MAX, SEA_LEVEL};
use crate::noise_field::NoiseField;
use crate::seeds::WorldSeeds;

// =============================================================================
// TERRAIN PARAMETERS
// =============================================================================

const TERRAIN_FREQUENCY: f64 = 0.05;
const TERRAIN_OCTAVES: u32 = 3;
/// Land texture amplitude, further scaled by land strength
const TERRAIN_AMPLITUDE: f64 = 0.08;

const SEAFLOOR_FREQUENCY: f64 = 0.03;
/// Seafloor texture is always a small upward offset
const SEAFLOOR_AMPLITUDE: f64 = 0.03;

/// Texture layers applied on top of land strength.
#[derive(Clone, Debug)]
pub struct ElevationField {
    terrain: NoiseField,
    seafloor: NoiseField,
}

impl ElevationField {
    pub fn new(seeds: &WorldSeeds) -> Self {
        Self {
            terrain: NoiseField::new(seeds.terrain),
            seafloor: NoiseField::new(seeds.seafloor),
        }
    }

    /// Final elevation in `[0.1, 1.0]` given the land strength at `(x, y)`.
    pub fn elevation(&self, land_strength: f64, x: f64, y: f64) -> f64 {
        if land_strength >= SEA_LEVEL {
            let texture = self.terrain.octave_sample(
                x * TERRAIN_FREQUENCY,
                y * TERRAIN_FREQUENCY,
                TERRAIN_OCTAVES,
                0.5,
            );
            (land_strength + texture * TERRAIN_AMPLITUDE * land_strength).clamp(LAND_MIN, 1.0)
        } else {
            let texture = self.seafloor.octave_sample_unit(
                x * SEAFLOOR_FREQUENCY,
                y * SEAFLOOR_FREQUENCY,
                2,
                0.5,
            );
            (land_strength + texture * SEAFLOOR_AMPLITUDE).min(OCEAN_MAX)
        }
    }
}
