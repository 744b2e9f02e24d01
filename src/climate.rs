//! Temperature and moisture fields.
//!
//! Both are normalized to `[0, 1]`. Temperature follows latitude inside the
//! reference frame (warmest on the equator at y = 0, zero at the poles), cooled by height
//! above sea level. Moisture is plain octave noise.

use crate::continent::SEA_LEVEL;
use crate::noise_field::NoiseField;
use crate::seeds::WorldSeeds;

// =============================================================================
// TEMPERATURE
// =============================================================================

const TEMPERATURE_NOISE_FREQUENCY: f64 = 0.01;
/// Temperature noise is scaled into `[-TEMPERATURE_NOISE, TEMPERATURE_NOISE]`
const TEMPERATURE_NOISE: f64 = 0.1;
/// Cooling per unit of elevation above sea level (lapse rate)
const ELEVATION_LAPSE: f64 = 0.6;

// =============================================================================
// MOISTURE
// =============================================================================

const MOISTURE_FREQUENCY: f64 = 0.008;
const MOISTURE_OCTAVES: u32 = 4;

/// Climate noise layers for one seed.
#[derive(Clone, Debug)]
pub struct ClimateField {
    temperature: NoiseField,
    moisture: NoiseField,
    reference_height: f64,
}

impl ClimateField {
    pub fn new(seeds: &WorldSeeds, reference_height: f64) -> Self {
        Self {
            temperature: NoiseField::new(seeds.temperature),
            moisture: NoiseField::new(seeds.moisture),
            reference_height,
        }
    }

    /// Latitude term alone: 1 on the equator row, 0 at and beyond the poles.
    ///
    /// The poles sit at `y = ±reference_height / 2`.
    pub fn latitude_factor(&self, y: f64) -> f64 {
        (1.0 - 2.0 * (y / self.reference_height).abs()).max(0.0)
    }

    pub fn temperature(&self, x: f64, y: f64, elevation: f64) -> f64 {
        let noise = self.temperature.octave_sample(
            x * TEMPERATURE_NOISE_FREQUENCY,
            y * TEMPERATURE_NOISE_FREQUENCY,
            2,
            0.5,
        );
        let lapse = (elevation - SEA_LEVEL).max(0.0) * ELEVATION_LAPSE;

        (self.latitude_factor(y) + noise * TEMPERATURE_NOISE - lapse).clamp(0.0, 1.0)
    }

    pub fn moisture(&self, x: f64, y: f64) -> f64 {
        self.moisture
            .octave_sample_unit(x * MOISTURE_FREQUENCY, y * MOISTURE_FREQUENCY, MOISTURE_OCTAVES, 0.5)
            .clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn climate() -> ClimateField {
        ClimateField::new(&WorldSeeds::from_master(42), 1000.0)
    }

    #[test]
    fn test_latitude_peaks_at_equator() {
        let c = climate();
        assert!((c.latitude_factor(0.0) - 1.0).abs() < 1e-12);
        assert!(c.latitude_factor(-500.0).abs() < 1e-12);
        assert!(c.latitude_factor(500.0).abs() < 1e-12);
        assert_eq!(c.latitude_factor(-4000.0), 0.0);
        assert_eq!(c.latitude_factor(120.0), c.latitude_factor(-120.0));
        assert!(c.latitude_factor(-250.0) < c.latitude_factor(-100.0));
    }

    #[test]
    fn test_fields_bounded() {
        let c = climate();
        for i in 0..3000 {
            let x = (i % 60) as f64 * 31.0 - 900.0;
            let y = (i / 60) as f64 * 41.0 - 500.0;
            let t = c.temperature(x, y, 0.3 + (i % 8) as f64 * 0.09);
            let m = c.moisture(x, y);
            assert!((0.0..=1.0).contains(&t));
            assert!((0.0..=1.0).contains(&m));
        }
    }

    #[test]
    fn test_higher_ground_is_colder() {
        let c = climate();
        for i in 0..50 {
            let (x, y) = (i as f64 * 13.0, i as f64 - 20.0);
            let low = c.temperature(x, y, 0.52);
            let high = c.temperature(x, y, 0.95);
            assert!(high <= low);
        }
    }

    #[test]
    fn test_ocean_depth_does_not_cool() {
        let c = climate();
        assert_eq!(c.temperature(10.0, 0.0, 0.2), c.temperature(10.0, 0.0, 0.45));
    }
}
