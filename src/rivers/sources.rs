//! River source scan and selection.

use rayon::prelude::*;

use super::Coord;
use crate::config::RiverConfig;
use crate::continent::{LAND_MIN, SEA_LEVEL};
use crate::noise_field::NoiseField;
use crate::terrain::TerrainModel;
use crate::tilemap::Tilemap;

const ELEVATION_WEIGHT: f64 = 0.7;
const SUITABILITY_WEIGHT: f64 = 0.3;
const SUITABILITY_FREQUENCY: f64 = 0.02;

/// One sample of the coarse scan grid.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScanSample {
    pub x: i32,
    pub y: i32,
    pub elevation: f64,
    /// Source score; `None` for ocean samples
    pub score: Option<f64>,
}

/// A scan sample that scored above the source threshold.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SourceCandidate {
    pub position: Coord,
    pub elevation: f64,
    pub score: f64,
}

/// Elevation mapped from the land range `[LAND_MIN, 1]` onto `[0, 1]`.
pub fn land_relative_elevation(elevation: f64) -> f64 {
    ((elevation - LAND_MIN) / (1.0 - LAND_MIN)).clamp(0.0, 1.0)
}

/// Sample the reference region on the configured stride. Rows are evaluated in
/// parallel and assembled in row order.
pub fn scan_region(
    terrain: &TerrainModel,
    suitability: &NoiseField,
    config: &RiverConfig,
) -> Tilemap<ScanSample> {
    let stride = config.source_stride.max(1);
    let span = i64::from(config.region_max) - i64::from(config.region_min);
    let cells = ((span + i64::from(stride) - 1) / i64::from(stride)).max(0) as usize;

    let rows: Vec<Vec<ScanSample>> = (0..cells)
        .into_par_iter()
        .map(|row| {
            let y = config.region_min + row as i32 * stride;
            (0..cells)
                .map(|col| {
                    let x = config.region_min + col as i32 * stride;
                    sample_site(terrain, suitability, x, y)
                })
                .collect()
        })
        .collect();

    let data: Vec<ScanSample> = rows.into_iter().flatten().collect();
    Tilemap::from_vec(cells, cells, data).unwrap_or_else(|| Tilemap::new(0, 0))
}

fn sample_site(terrain: &TerrainModel, suitability: &NoiseField, x: i32, y: i32) -> ScanSample {
    let elevation = terrain.elevation(x, y);
    let score = (elevation >= SEA_LEVEL).then(|| {
        let site = suitability.octave_sample_unit(
            f64::from(x) * SUITABILITY_FREQUENCY,
            f64::from(y) * SUITABILITY_FREQUENCY,
            2,
            0.5,
        );
        ELEVATION_WEIGHT * land_relative_elevation(elevation) + SUITABILITY_WEIGHT * site
    });
    ScanSample { x, y, elevation, score }
}

/// Scan samples whose score clears the threshold.
pub fn candidates(scan: &Tilemap<ScanSample>, threshold: f64) -> Vec<SourceCandidate> {
    scan.iter()
        .filter_map(|(_, _, sample)| {
            sample
                .score
                .filter(|&score| score > threshold)
                .map(|score| SourceCandidate {
                    position: (sample.x, sample.y),
                    elevation: sample.elevation,
                    score,
                })
        })
        .collect()
}

/// Best-first greedy selection with minimum spacing and a hard cap.
pub fn select_sources(
    mut candidates: Vec<SourceCandidate>,
    min_spacing: f64,
    max_sources: usize,
) -> Vec<SourceCandidate> {
    candidates.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| (a.position.1, a.position.0).cmp(&(b.position.1, b.position.0)))
    });

    let min_sq = min_spacing * min_spacing;
    let mut accepted: Vec<SourceCandidate> = Vec::new();
    for candidate in candidates {
        if accepted.len() >= max_sources {
            break;
        }
        let spaced = accepted.iter().all(|other| {
            let dx = f64::from(candidate.position.0 - other.position.0);
            let dy = f64::from(candidate.position.1 - other.position.1);
            dx * dx + dy * dy >= min_sq
        });
        if spaced {
            accepted.push(candidate);
        }
    }
    accepted
}
