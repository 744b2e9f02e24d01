//! Continent shaping.
//!
//! A seed gets one to three continent centers placed inside the reference frame and
//! four noise fields. Together they define `land_strength`, the pre-detail elevation
//! signal that already sits on the correct side of the 0.5 land/ocean line.
//!
//! The frame is centered on the origin: it spans `[-width/2, width/2)` horizontally and
//! `[-height/2, height/2)` vertically, so chunk (0, 0) lies at the heart of the world.
//! Each seed stretches its blend so that `TARGET_OCEAN_FRACTION` of the frame falls
//! below the ocean threshold, whatever its center count and noise draw.

use log::debug;

use crate::config::FrameConfig;
use crate::noise_field::NoiseField;
use crate::seeds::WorldSeeds;
use crate::sequence::ScalarSequence;

// =============================================================================
// CONTINENT PARAMETERS
// =============================================================================

/// Land/ocean line every downstream component agrees on
pub const SEA_LEVEL: f64 = 0.5;

/// Normalized blend value splitting ocean from land before the remap
pub const OCEAN_THRESHOLD: f64 = 0.495;
/// Remap targets: ocean lands in [OCEAN_MIN, OCEAN_MAX], land in [LAND_MIN, 1.0]
pub const OCEAN_MIN: f64 = 0.1;
pub const OCEAN_MAX: f64 = 0.49;
pub const LAND_MIN: f64 = 0.51;

/// Share of the reference frame that ends up below sea level
pub const TARGET_OCEAN_FRACTION: f64 = 0.3;
/// Calibration samples per frame axis
const CALIBRATION_GRID: usize = 48;
/// Bounds on the scaled blend value that normalizes onto `OCEAN_THRESHOLD`
const MIN_BLEND_PIVOT: f64 = 0.3;
const MAX_BLEND_PIVOT: f64 = 0.7;

/// Centers are kept within this fraction of the frame size from the origin
const CENTER_SPREAD: f64 = 0.3;
/// Minimum center separation as a fraction of frame width
const MIN_SEPARATION: f64 = 0.05;
/// Placement attempts per center before using a fallback slot
pub const PLACEMENT_ATTEMPTS: usize = 100;

/// Center influence reaches half strength at this fraction of frame width
const INFLUENCE_RADIUS: f64 = 0.3;
const INFLUENCE_EXPONENT: f64 = 1.8;

const WARP_FREQUENCY: f64 = 0.004;
const WARP_STRENGTH: f64 = 40.0;
const LARGE_FREQUENCY: f64 = 0.003;
const MEDIUM_FREQUENCY: f64 = 0.012;
const DETAIL_FREQUENCY: f64 = 0.045;

const LARGE_WEIGHT: f64 = 0.6;
const MEDIUM_WEIGHT: f64 = 0.3;
const DETAIL_WEIGHT: f64 = 0.1;

const RAW_WEIGHT: f64 = 0.65;
const INFLUENCE_WEIGHT: f64 = 0.18;
const LAND_BOOST: f64 = 0.35;
/// Largest possible blend, reached at a center where the raw signal is 1
const BLEND_MAX: f64 = RAW_WEIGHT + INFLUENCE_WEIGHT + LAND_BOOST;

/// Per-seed continent model. Immutable once built.
#[derive(Clone, Debug)]
pub struct ContinentModel {
    centers: Vec<(f64, f64)>,
    influence_radius: f64,
    blend_pivot: f64,
    shape: NoiseField,
    detail: NoiseField,
    warp_x: NoiseField,
    warp_y: NoiseField,
}

impl ContinentModel {
    pub fn new(seeds: &WorldSeeds, frame: &FrameConfig) -> Self {
        let mut seq = ScalarSequence::new(seeds.continents);
        let count = 1 + (seq.next() * 3.0) as usize;
        let centers = place_centers(&mut seq, frame, count.min(3), PLACEMENT_ATTEMPTS);

        let mut model = Self {
            centers,
            influence_radius: frame.width * INFLUENCE_RADIUS,
            blend_pivot: OCEAN_THRESHOLD,
            shape: NoiseField::new(seeds.shape),
            detail: NoiseField::new(seeds.detail),
            warp_x: NoiseField::new(seeds.warp_x),
            warp_y: NoiseField::new(seeds.warp_y),
        };
        model.blend_pivot = model.calibrate_pivot(frame);
        debug!(
            "seed {}: {} continent center(s) at {:?}, blend pivot {:.3}",
            seeds.master,
            model.centers.len(),
            model.centers,
            model.blend_pivot
        );
        model
    }

    pub fn centers(&self) -> &[(f64, f64)] {
        &self.centers
    }

    /// Scaled blend value this seed maps onto `OCEAN_THRESHOLD`.
    pub fn blend_pivot(&self) -> f64 {
        self.blend_pivot
    }

    /// Pre-detail elevation in `[0.1, 1.0]`, never inside `(0.49, 0.51)`.
    pub fn land_strength(&self, x: f64, y: f64) -> f64 {
        remap_land_strength(normalize_blend(self.blend(x, y), self.blend_pivot))
    }

    pub fn is_land(&self, x: f64, y: f64) -> bool {
        self.land_strength(x, y) >= SEA_LEVEL
    }

    /// Noise and center influence combined, scaled by the blend's full range into `[0, 1]`.
    fn blend(&self, x: f64, y: f64) -> f64 {
        let (wx, wy) = self.warp(x, y);

        let large = self.shape.octave_sample(wx * LARGE_FREQUENCY, wy * LARGE_FREQUENCY, 4, 0.5);
        // Offset decorrelates the medium layer from the large one sharing its table
        let medium = self.shape.octave_sample(
            wx * MEDIUM_FREQUENCY + 57.3,
            wy * MEDIUM_FREQUENCY + 91.7,
            3,
            0.5,
        );
        let fine = self.detail.octave_sample(wx * DETAIL_FREQUENCY, wy * DETAIL_FREQUENCY, 2, 0.5);

        let raw = LARGE_WEIGHT * large + MEDIUM_WEIGHT * medium + DETAIL_WEIGHT * fine;
        let raw = (raw + 1.0) * 0.5;

        let influence = self.center_influence(wx, wy);
        let blended = RAW_WEIGHT * raw + INFLUENCE_WEIGHT * influence + LAND_BOOST * influence;

        (blended / BLEND_MAX).clamp(0.0, 1.0)
    }

    /// Blend quantile at `TARGET_OCEAN_FRACTION` over a regular grid on the frame.
    fn calibrate_pivot(&self, frame: &FrameConfig) -> f64 {
        let step_x = frame.width / CALIBRATION_GRID as f64;
        let step_y = frame.height / CALIBRATION_GRID as f64;
        let mut samples: Vec<f64> = (0..CALIBRATION_GRID * CALIBRATION_GRID)
            .map(|i| {
                let x = -0.5 * frame.width + ((i % CALIBRATION_GRID) as f64 + 0.5) * step_x;
                let y = -0.5 * frame.height + ((i / CALIBRATION_GRID) as f64 + 0.5) * step_y;
                self.blend(x, y)
            })
            .collect();
        samples.sort_unstable_by(f64::total_cmp);

        let index = (TARGET_OCEAN_FRACTION * samples.len() as f64) as usize;
        samples[index.min(samples.len() - 1)].clamp(MIN_BLEND_PIVOT, MAX_BLEND_PIVOT)
    }

    /// Domain warp to break up axis-aligned noise artifacts.
    fn warp(&self, x: f64, y: f64) -> (f64, f64) {
        let sx = x * WARP_FREQUENCY;
        let sy = y * WARP_FREQUENCY;
        (
            x + self.warp_x.octave_sample(sx, sy, 3, 0.5) * WARP_STRENGTH,
            y + self.warp_y.octave_sample(sx, sy, 3, 0.5) * WARP_STRENGTH,
        )
    }

    /// Strongest pull toward land from any center, in `(0, 1]`.
    fn center_influence(&self, x: f64, y: f64) -> f64 {
        self.centers
            .iter()
            .map(|&(cx, cy)| {
                let t = ((x - cx).powi(2) + (y - cy).powi(2)).sqrt() / self.influence_radius;
                1.0 / (1.0 + t.powf(INFLUENCE_EXPONENT))
            })
            .fold(0.0, f64::max)
    }
}

/// Piecewise-linear stretch of `[0, 1]` that moves `pivot` onto `OCEAN_THRESHOLD`.
pub fn normalize_blend(blend: f64, pivot: f64) -> f64 {
    if blend < pivot {
        OCEAN_THRESHOLD * blend / pivot
    } else {
        OCEAN_THRESHOLD + (1.0 - OCEAN_THRESHOLD) * (blend - pivot) / (1.0 - pivot)
    }
}

/// Split `[0, 1]` at the ocean threshold into the two disjoint output bands.
pub fn remap_land_strength(normalized: f64) -> f64 {
    if normalized < OCEAN_THRESHOLD {
        OCEAN_MIN + (normalized / OCEAN_THRESHOLD) * (OCEAN_MAX - OCEAN_MIN)
    } else {
        let t = (normalized - OCEAN_THRESHOLD) / (1.0 - OCEAN_THRESHOLD);
        LAND_MIN + t.min(1.0) * (1.0 - LAND_MIN)
    }
}

/// Rejection-sample `count` separated centers around the frame's middle.
///
/// A center that cannot be placed within `attempts` tries takes the first free
/// fallback slot at a quarter of the frame from the origin on each axis.
pub fn place_centers(
    seq: &mut ScalarSequence,
    frame: &FrameConfig,
    count: usize,
    attempts: usize,
) -> Vec<(f64, f64)> {
    let min_distance = frame.width * MIN_SEPARATION;
    let far_enough = |placed: &[(f64, f64)], (x, y): (f64, f64)| {
        placed
            .iter()
            .all(|&(px, py)| ((x - px).powi(2) + (y - py).powi(2)).sqrt() >= min_distance)
    };

    let (qx, qy) = (0.25 * frame.width, 0.25 * frame.height);
    let slots = [(-qx, -qy), (qx, qy), (qx, -qy), (-qx, qy)];
    let (sx, sy) = (CENTER_SPREAD * frame.width, CENTER_SPREAD * frame.height);

    let mut centers: Vec<(f64, f64)> = Vec::with_capacity(count);
    for index in 0..count {
        let mut placed = None;
        for _ in 0..attempts {
            let candidate = (seq.range(-sx, sx), seq.range(-sy, sy));
            if far_enough(&centers, candidate) {
                placed = Some(candidate);
                break;
            }
        }

        let center = placed.unwrap_or_else(|| {
            slots
                .iter()
                .copied()
                .find(|&slot| far_enough(&centers, slot))
                .unwrap_or(slots[index % slots.len()])
        });
        centers.push(center);
    }
    centers
}
