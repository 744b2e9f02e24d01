//! Seed management for world generation
//!
//! A world is identified by one integer seed. Each generation system gets its own
//! sub-seed derived from it, so noise layers stay independent of each other while the
//! whole world remains a pure function of the master seed.

use crate::error::{RequestError, RequestResult};

/// Seeds for all generation systems, derived from one master seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorldSeeds {
    /// Master seed (the world's identity)
    pub master: i64,
    /// Continent count and center placement draws
    pub continents: u64,
    /// Large and medium scale continent shape noise
    pub shape: u32,
    /// Fine continent detail noise
    pub detail: u32,
    /// Domain warp, x displacement
    pub warp_x: u32,
    /// Domain warp, y displacement
    pub warp_y: u32,
    /// Land terrain texture
    pub terrain: u32,
    /// Seafloor texture
    pub seafloor: u32,
    /// Temperature perturbation
    pub temperature: u32,
    /// Moisture field
    pub moisture: u32,
    /// River source suitability
    pub river_sites: u32,
    /// Per-source river draws
    pub rivers: u64,
    /// Meander perturbation while tracing
    pub meander: u32,
    /// Lake rim angular perturbation
    pub lake_shape: u32,
    /// Lake rim radial perturbation
    pub lake_edge: u32,
    /// Standalone lake suitability
    pub lake_sites: u32,
    /// Standalone lake placement draws
    pub lakes: u64,
}

impl WorldSeeds {
    /// Derive every sub-seed from the master seed.
    pub fn from_master(master: i64) -> Self {
        Self {
            master,
            continents: derive_stream(master, 0x01),
            shape: derive_noise(master, 1_000),
            detail: derive_noise(master, 2_000),
            warp_x: derive_noise(master, 3_000),
            warp_y: derive_noise(master, 4_000),
            terrain: derive_noise(master, 5_000),
            seafloor: derive_noise(master, 6_000),
            temperature: derive_noise(master, 7_000),
            moisture: derive_noise(master, 8_000),
            river_sites: derive_noise(master, 9_000),
            rivers: derive_stream(master, 0x02),
            meander: derive_noise(master, 10_000),
            lake_shape: derive_noise(master, 11_000),
            lake_edge: derive_noise(master, 12_000),
            lake_sites: derive_noise(master, 13_000),
            lakes: derive_stream(master, 0x03),
        }
    }

    /// Sequence seed for one river source, independent of tracing order.
    pub fn river_source(&self, index: usize) -> u64 {
        splitmix64(self.rivers ^ (index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
    }
}

/// Noise table seed: the master seed mixed with a per-layer offset, folded to 32 bits.
///
/// The offset goes through the mixer rather than being added, so layer `a` of one
/// seed never shares a table with layer `b` of a nearby seed.
fn derive_noise(master: i64, offset: u64) -> u32 {
    let mixed = splitmix64((master as u64) ^ offset.wrapping_mul(0x9E37_79B9_7F4A_7C15));
    (mixed ^ (mixed >> 32)) as u32
}

/// Sequence seed: the master seed mixed with a stream tag.
fn derive_stream(master: i64, tag: u64) -> u64 {
    splitmix64((master as u64) ^ tag.wrapping_mul(0xD1B5_4A32_D192_ED03))
}

/// SplitMix64 finalizer, stable across platforms and compiler versions.
fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Turn a user-supplied seed into the integer the generator accepts.
///
/// Integer strings are taken as-is. Anything else goes through the order-sensitive
/// 32-bit string hash `h = 31 * h + c` with wrapping overflow.
pub fn normalize_seed(input: &str) -> RequestResult<i64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(RequestError::EmptySeed);
    }
    if let Ok(value) = trimmed.parse::<i64>() {
        return Ok(value);
    }
    Ok(i64::from(string_hash(trimmed)))
}

/// 32-bit polynomial string hash over UTF-16 code units.
pub fn string_hash(text: &str) -> i32 {
    text.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

impl std::fmt::Display for WorldSeeds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "WorldSeeds {{ master: {}, continents: {}, shape: {}, terrain: {}, rivers: {}, lakes: {} }}",
            self.master, self.continents, self.shape, self.terrain, self.rivers, self.lakes,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_derivation() {
        let seeds1 = WorldSeeds::from_master(12345);
        let seeds2 = WorldSeeds::from_master(12345);
        assert_eq!(seeds1, seeds2);
    }

    #[test]
    fn test_different_systems_get_different_seeds() {
        let seeds = WorldSeeds::from_master(12345);

        assert_ne!(seeds.shape, seeds.detail);
        assert_ne!(seeds.warp_x, seeds.warp_y);
        assert_ne!(seeds.terrain, seeds.moisture);
        assert_ne!(seeds.continents, seeds.rivers);
        assert_ne!(seeds.rivers, seeds.lakes);
    }

    #[test]
    fn test_noise_layers_do_not_alias_across_seeds() {
        // Layer offsets are 1_000 apart
        let a = WorldSeeds::from_master(0);
        let b = WorldSeeds::from_master(1_000);
        assert_ne!(a.detail, b.shape);
        assert_ne!(a.warp_y, b.warp_x);

        let mut all = Vec::new();
        for master in (0..20_000).step_by(1_000) {
            let s = WorldSeeds::from_master(master);
            all.extend([s.shape, s.detail, s.warp_x, s.warp_y, s.terrain, s.seafloor]);
        }
        let count = all.len();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), count);
    }

    #[test]
    fn test_river_source_seeds_differ() {
        let seeds = WorldSeeds::from_master(7);
        assert_ne!(seeds.river_source(0), seeds.river_source(1));
        assert_eq!(seeds.river_source(3), WorldSeeds::from_master(7).river_source(3));
    }

    #[test]
    fn test_string_hash_matches_polynomial() {
        assert_eq!(string_hash(""), 0);
        assert_eq!(string_hash("a"), 97);
        assert_eq!(string_hash("ab"), 97 * 31 + 98);
        // Order-sensitive
        assert_ne!(string_hash("ab"), string_hash("ba"));
        // Wraps instead of overflowing
        let long = "the quick brown fox jumps over the lazy dog".repeat(8);
        let _ = string_hash(&long);
    }

    #[test]
    fn test_normalize_seed() {
        assert_eq!(normalize_seed("12345"), Ok(12345));
        assert_eq!(normalize_seed(" -42 "), Ok(-42));
        assert_eq!(normalize_seed("hello"), Ok(i64::from(string_hash("hello"))));
        assert_eq!(normalize_seed(""), Err(RequestError::EmptySeed));
        assert_eq!(normalize_seed("   "), Err(RequestError::EmptySeed));
    }
}
