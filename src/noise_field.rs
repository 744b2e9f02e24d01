//! Coherent 2D noise, the numeric base of every spatial pattern.

use noise::{NoiseFn, Perlin};

/// Deterministic continuous noise over the plane.
///
/// The permutation table is fixed at construction from the seed; sampling is a pure
/// function of the coordinate afterwards, so a field can be shared across threads.
#[derive(Clone, Debug)]
pub struct NoiseField {
    perlin: Perlin,
}

impl NoiseField {
    pub fn new(seed: u32) -> Self {
        Self { perlin: Perlin::new(seed) }
    }

    /// Single-octave sample in `[-1, 1]`.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        self.perlin.get([x, y]).clamp(-1.0, 1.0)
    }

    /// Fractional Brownian motion: `octaves` samples at doubling frequency, each
    /// weighted by `persistence` relative to the previous one, normalized by the total
    /// amplitude so the result stays in `[-1, 1]`.
    pub fn octave_sample(&self, x: f64, y: f64, octaves: u32, persistence: f64) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut max_value = 0.0;

        for _ in 0..octaves.max(1) {
            total += amplitude * self.sample(x * frequency, y * frequency);
            max_value += amplitude;
            amplitude *= persistence;
            frequency *= 2.0;
        }

        (total / max_value).clamp(-1.0, 1.0)
    }

    /// `octave_sample` remapped to `[0, 1]`.
    pub fn octave_sample_unit(&self, x: f64, y: f64, octaves: u32, persistence: f64) -> f64 {
        (self.octave_sample(x, y, octaves, persistence) + 1.0) * 0.5
    }
}
