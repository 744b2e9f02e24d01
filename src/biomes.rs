//! Biome classification from elevation, temperature and moisture.
//!
//! The decision order is fixed: ocean check, then temperature band, then moisture
//! band, then elevation tie-breaks. The thresholds below can be tuned freely as long
//! as that order and full coverage are kept.

use serde::{Deserialize, Serialize};

use crate::continent::SEA_LEVEL;

/// Below this, ocean is deep rather than shallow
const DEEP_OCEAN_CUT: f64 = 0.3;

// Temperature bands (upper bounds)
const VERY_COLD: f64 = 0.15;
const COLD: f64 = 0.35;
const TEMPERATE: f64 = 0.6;
const WARM: f64 = 0.8;

// Moisture bands (upper bounds)
const ARID: f64 = 0.38;
const DRY: f64 = 0.46;
const HUMID: f64 = 0.56;

/// Land at or below this is low enough to waterlog into wetland
const LOWLAND: f64 = 0.56;
/// Land at or above this is alpine in the cold bands
const ALPINE: f64 = 0.8;

// Elevation category bands (upper bounds)
const FLAT_MAX: f64 = 0.6;
const HILLS_MAX: f64 = 0.75;

/// Surface biome of a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Biome {
    // Ocean biomes
    DeepOcean,
    ShallowOcean,

    // Very cold
    SnowyPeaks,
    Ice,
    Tundra,

    // Cold
    Alpine,
    Taiga,

    // Temperate
    Shrubland,
    Grassland,
    TemperateForest,
    Swamp,

    // Warm and hot
    Desert,
    Savanna,
    TropicalForest,
    Rainforest,
    Mangrove,
}

impl Biome {
    /// Every biome, in compact-encoding index order.
    pub const ALL: [Biome; 16] = [
        Biome::DeepOcean,
        Biome::ShallowOcean,
        Biome::SnowyPeaks,
        Biome::Ice,
        Biome::Tundra,
        Biome::Alpine,
        Biome::Taiga,
        Biome::Shrubland,
        Biome::Grassland,
        Biome::TemperateForest,
        Biome::Swamp,
        Biome::Desert,
        Biome::Savanna,
        Biome::TropicalForest,
        Biome::Rainforest,
        Biome::Mangrove,
    ];

    /// Classify a tile. First match wins.
    pub fn classify(elevation: f64, temperature: f64, moisture: f64) -> Biome {
        if elevation < SEA_LEVEL {
            return if elevation < DEEP_OCEAN_CUT {
                Biome::DeepOcean
            } else {
                Biome::ShallowOcean
            };
        }

        match temperature {
            t if t < VERY_COLD => {
                if elevation >= ALPINE {
                    Biome::SnowyPeaks
                } else if moisture < DRY {
                    Biome::Tundra
                } else {
                    Biome::Ice
                }
            }
            t if t < COLD => {
                if moisture < ARID {
                    Biome::Tundra
                } else if elevation >= ALPINE {
                    Biome::Alpine
                } else {
                    Biome::Taiga
                }
            }
            t if t < TEMPERATE => {
                if moisture < ARID {
                    Biome::Shrubland
                } else if moisture < DRY {
                    Biome::Grassland
                } else if moisture < HUMID || elevation > LOWLAND {
                    Biome::TemperateForest
                } else {
                    Biome::Swamp
                }
            }
            t if t < WARM => {
                if moisture < ARID {
                    Biome::Desert
                } else if moisture < DRY {
                    Biome::Savanna
                } else if moisture < HUMID {
                    Biome::TropicalForest
                } else if elevation > LOWLAND {
                    Biome::Rainforest
                } else {
                    Biome::Swamp
                }
            }
            _ => {
                if moisture < DRY {
                    Biome::Desert
                } else if moisture < HUMID {
                    Biome::Savanna
                } else if elevation > LOWLAND {
                    Biome::Rainforest
                } else {
                    Biome::Mangrove
                }
            }
        }
    }

    pub fn is_ocean(&self) -> bool {
        matches!(self, Biome::DeepOcean | Biome::ShallowOcean)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Biome::DeepOcean => "Deep Ocean",
            Biome::ShallowOcean => "Shallow Ocean",
            Biome::SnowyPeaks => "Snowy Peaks",
            Biome::Ice => "Ice",
            Biome::Tundra => "Tundra",
            Biome::Alpine => "Alpine",
            Biome::Taiga => "Taiga",
            Biome::Shrubland => "Shrubland",
            Biome::Grassland => "Grassland",
            Biome::TemperateForest => "Temperate Forest",
            Biome::Swamp => "Swamp",
            Biome::Desert => "Desert",
            Biome::Savanna => "Savanna",
            Biome::TropicalForest => "Tropical Forest",
            Biome::Rainforest => "Rainforest",
            Biome::Mangrove => "Mangrove",
        }
    }
}

impl std::fmt::Display for Biome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Coarse relief band, independent of biome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElevationCategory {
    Flat,
    Hills,
    Mountains,
}

impl ElevationCategory {
    pub fn classify(elevation: f64) -> Self {
        if elevation < FLAT_MAX {
            ElevationCategory::Flat
        } else if elevation < HILLS_MAX {
            ElevationCategory::Hills
        } else {
            ElevationCategory::Mountains
        }
    }
}
