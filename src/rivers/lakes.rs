//! Lake carving and standalone lake scatter.

use std::collections::HashSet;
use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use super::sources::ScanSample;
use super::Coord;
use crate::config::LakeConfig;
use crate::continent::SEA_LEVEL;
use crate::noise_field::NoiseField;
use crate::sequence::ScalarSequence;
use crate::terrain::TerrainModel;
use crate::tilemap::Tilemap;

/// Tiles above this never hold water
pub const LAKE_MAX_ELEVATION: f64 = 0.8;

/// Extra reach, in tiles per unit of elevation, for tiles below the carve center
const BASIN_BONUS: f64 = 60.0;

const ANGULAR_WEIGHT: f64 = 0.3;
const LOBE_WEIGHT: f64 = 0.12;
const LOBE_COUNT: f64 = 3.0;
const RADIAL_WEIGHT: f64 = 0.2;
const RADIAL_FREQUENCY: f64 = 0.25;

/// Lakes traced from rivers keep their full irregularity
pub const RIVER_LAKE_IRREGULARITY: f64 = 1.0;
/// Standalone lakes stay closer to circular
pub const STANDALONE_IRREGULARITY: f64 = 0.4;

/// Suitability above which a standalone site may hold a lake
const SITE_SUITABILITY: f64 = 0.5;
const SITE_FREQUENCY: f64 = 0.01;
/// Chance that a suitable site actually gets a lake
const SITE_ACCEPTANCE: f64 = 0.6;
const STANDALONE_MIN_RADIUS: f64 = 2.0;
const STANDALONE_MAX_RADIUS: f64 = 6.0;

/// A standalone lake: not connected to any river.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LakeDescriptor {
    pub center: Coord,
    pub radius: f64,
}

/// Noise layers that shape lake rims.
#[derive(Clone, Debug)]
pub struct LakeShaper {
    shape: NoiseField,
    edge: NoiseField,
}

impl LakeShaper {
    pub fn new(shape_seed: u32, edge_seed: u32) -> Self {
        Self {
            shape: NoiseField::new(shape_seed),
            edge: NoiseField::new(edge_seed),
        }
    }

    /// Tiles of the lake carved around `center`.
    ///
    /// The rim is the base radius perturbed by two angular terms (a noise sample taken
    /// on a circle and a phase-shifted lobe pattern) and one radial noise term, all
    /// scaled by `irregularity`. Tiles lower than the center reach further out, so
    /// lakes spill into basins. Only land tiles up to `LAKE_MAX_ELEVATION` qualify.
    pub fn carve(
        &self,
        terrain: &TerrainModel,
        center: Coord,
        radius: f64,
        irregularity: f64,
    ) -> Vec<Coord> {
        let (cx, cy) = (f64::from(center.0), f64::from(center.1));
        let center_elevation = terrain.elevation(center.0, center.1);
        let max_bonus = radius * 0.5;
        let reach = (radius * (1.0 + ANGULAR_WEIGHT + LOBE_WEIGHT + RADIAL_WEIGHT) + max_bonus)
            .ceil() as i32
            + 1;
        let phase = self.shape.sample(cx * 0.07 + 0.5, cy * 0.07 + 0.5) * PI;

        let mut tiles = Vec::new();
        for dy in -reach..=reach {
            for dx in -reach..=reach {
                let distance = f64::from(dx).hypot(f64::from(dy));
                if distance > f64::from(reach) {
                    continue;
                }

                let (x, y) = (center.0 + dx, center.1 + dy);
                let elevation = terrain.elevation(x, y);
                if !(SEA_LEVEL..=LAKE_MAX_ELEVATION).contains(&elevation) {
                    continue;
                }

                let theta = f64::from(dy).atan2(f64::from(dx));
                let angular = self.shape.sample(
                    theta.cos() * 1.3 + cx * 0.05,
                    theta.sin() * 1.3 + cy * 0.05,
                ) * ANGULAR_WEIGHT;
                let lobes = (LOBE_COUNT * theta + phase).sin() * LOBE_WEIGHT;
                let radial = self.edge.sample(
                    f64::from(x) * RADIAL_FREQUENCY,
                    f64::from(y) * RADIAL_FREQUENCY,
                ) * RADIAL_WEIGHT;
                let boundary = radius * (1.0 + (angular + lobes + radial) * irregularity);

                let basin = ((center_elevation - elevation).max(0.0) * BASIN_BONUS).min(max_bonus);

                if distance <= boundary + basin {
                    tiles.push((x, y));
                }
            }
        }
        tiles
    }
}

/// Scatter standalone lakes over land samples of the source scan.
///
/// Each attempt picks a land sample, jitters it inside its scan cell and accepts it
/// if the site sits in the configured elevation band, passes the suitability noise
/// and a coin flip, and keeps clear of rivers and of other standalone lakes.
pub fn scatter_standalone_lakes(
    terrain: &TerrainModel,
    scan: &Tilemap<ScanSample>,
    stride: i32,
    river_tiles: &HashSet<Coord>,
    suitability: &NoiseField,
    shaper: &LakeShaper,
    config: &LakeConfig,
    seq: &mut ScalarSequence,
) -> Vec<(LakeDescriptor, Vec<Coord>)> {
    let land: Vec<Coord> = scan
        .iter()
        .filter(|(_, _, sample)| sample.elevation >= SEA_LEVEL)
        .map(|(_, _, sample)| (sample.x, sample.y))
        .collect();
    if land.is_empty() {
        return Vec::new();
    }

    let half = (stride / 2).max(1);
    let mut lakes: Vec<(LakeDescriptor, Vec<Coord>)> = Vec::new();

    for _ in 0..config.attempts {
        if lakes.len() >= config.max_standalone {
            break;
        }

        let pick = ((seq.next() * land.len() as f64) as usize).min(land.len() - 1);
        let (bx, by) = land[pick];
        let center = (
            bx + seq.range_inclusive(-half, half),
            by + seq.range_inclusive(-half, half),
        );
        let radius = seq.range(STANDALONE_MIN_RADIUS, STANDALONE_MAX_RADIUS);
        let accepted = seq.chance(SITE_ACCEPTANCE);

        let elevation = terrain.elevation(center.0, center.1);
        if elevation < config.min_elevation || elevation > config.max_elevation {
            continue;
        }
        let site = suitability.octave_sample_unit(
            f64::from(center.0) * SITE_FREQUENCY,
            f64::from(center.1) * SITE_FREQUENCY,
            2,
            0.5,
        );
        if site <= SITE_SUITABILITY || !accepted {
            continue;
        }
        if near_river(center, radius, config.river_clearance, river_tiles) {
            continue;
        }
        let crowded = lakes.iter().any(|(other, _)| {
            let d = f64::from(center.0 - other.center.0).hypot(f64::from(center.1 - other.center.1));
            d < radius + other.radius + config.min_spacing
        });
        if crowded {
            continue;
        }

        let tiles = shaper.carve(terrain, center, radius, STANDALONE_IRREGULARITY);
        if tiles.is_empty() {
            continue;
        }
        lakes.push((LakeDescriptor { center, radius }, tiles));
    }

    lakes
}

/// Whether any river tile lies within the lake's reach plus the clearance.
fn near_river(center: Coord, radius: f64, clearance: i32, river_tiles: &HashSet<Coord>) -> bool {
    if river_tiles.is_empty() {
        return false;
    }
    let reach = radius.ceil() as i32 * 2 + clearance;
    (-reach..=reach).any(|dy| {
        (-reach..=reach).any(|dx| river_tiles.contains(&(center.0 + dx, center.1 + dy)))
    })
}
