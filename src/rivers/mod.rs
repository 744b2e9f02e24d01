//! River and lake network for one world seed.
//!
//! Sources are picked on a coarse scan of a fixed reference region, traced downhill
//! independently and then merged in source order: a later river that runs into an
//! earlier one is cut off at the confluence. Lakes form where rivers pool (local
//! minima, occasional mid-path basins, dead ends) plus a scatter of standalone lakes
//! away from the river network.

pub mod lakes;
pub mod segments;
pub mod sources;
pub mod trace;

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::WorldConfig;
use crate::noise_field::NoiseField;
use crate::sequence::ScalarSequence;
use crate::terrain::TerrainModel;

pub use lakes::{LakeDescriptor, LakeShaper};
pub use segments::{classify_path, classify_segment, RiverSegment};
pub use sources::{SourceCandidate, ScanSample};
pub use trace::{RiverTier, StopReason, TracedRiver};

/// World tile coordinate `(x, y)`.
pub type Coord = (i32, i32);

/// Where a river starts and how far it may run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RiverSource {
    pub position: Coord,
    pub tier: RiverTier,
}

/// Summary counts for a built river system.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiverStats {
    pub sources: usize,
    pub rivers: usize,
    pub river_tiles: usize,
    pub confluences: usize,
    pub reached_ocean: usize,
    pub river_lakes: usize,
    pub river_lake_tiles: usize,
    pub standalone_lakes: usize,
    pub standalone_lake_tiles: usize,
}

/// Lake to carve at the end of a river or along it.
struct LakeRequest {
    center: Coord,
    radius: f64,
}

/// The finished river and lake layout for one seed.
#[derive(Clone, Debug, Default)]
pub struct RiverSystem {
    sources: Vec<RiverSource>,
    segments: HashMap<Coord, RiverSegment>,
    river_lakes: HashSet<Coord>,
    standalone_lakes: Vec<LakeDescriptor>,
    standalone_tiles: HashSet<Coord>,
    stats: RiverStats,
}

impl RiverSystem {
    /// Build the whole network for the terrain's seed.
    pub fn build(terrain: &TerrainModel, config: &WorldConfig) -> Self {
        let start = Instant::now();
        let seeds = *terrain.seeds();
        let river_config = &config.rivers;

        let suitability = NoiseField::new(seeds.river_sites);
        let scan = sources::scan_region(terrain, &suitability, river_config);
        let candidates = sources::candidates(&scan, river_config.source_threshold);
        let selected = sources::select_sources(
            candidates,
            river_config.min_source_spacing,
            river_config.max_sources,
        );
        log::debug!(
            "seed {}: {} scan samples, {} sources selected",
            seeds.master,
            scan.len(),
            selected.len()
        );

        // Every source draws from its own sequence, so parallel tracing stays
        // deterministic.
        let meander = NoiseField::new(seeds.meander);
        let traced: Vec<TracedRiver> = selected
            .par_iter()
            .enumerate()
            .map(|(index, candidate)| {
                let mut seq = ScalarSequence::new(seeds.river_source(index));
                trace::trace_river(
                    terrain,
                    &meander,
                    index,
                    candidate.position,
                    sources::land_relative_elevation(candidate.elevation),
                    &mut seq,
                )
            })
            .collect();

        let mut system = RiverSystem {
            sources: traced
                .iter()
                .map(|river| RiverSource {
                    position: selected[river.source_index].position,
                    tier: river.tier,
                })
                .collect(),
            ..Default::default()
        };
        system.stats.sources = system.sources.len();

        let requests = system.merge_rivers(traced, river_config.min_lake_path);

        let shaper = LakeShaper::new(seeds.lake_shape, seeds.lake_edge);
        let carved: Vec<Vec<Coord>> = requests
            .par_iter()
            .map(|request| {
                shaper.carve(
                    terrain,
                    request.center,
                    request.radius,
                    lakes::RIVER_LAKE_IRREGULARITY,
                )
            })
            .collect();
        for tiles in carved.into_iter().filter(|tiles| !tiles.is_empty()) {
            system.stats.river_lakes += 1;
            system.river_lakes.extend(tiles);
        }
        system.stats.river_lake_tiles = system.river_lakes.len();

        let river_tiles: HashSet<Coord> = system.segments.keys().copied().collect();
        let lake_sites = NoiseField::new(seeds.lake_sites);
        let mut lake_seq = ScalarSequence::new(seeds.lakes);
        let standalone = lakes::scatter_standalone_lakes(
            terrain,
            &scan,
            river_config.source_stride,
            &river_tiles,
            &lake_sites,
            &shaper,
            &config.lakes,
            &mut lake_seq,
        );
        for (descriptor, tiles) in standalone {
            system.standalone_lakes.push(descriptor);
            system.standalone_tiles.extend(tiles);
        }
        system.stats.standalone_lakes = system.standalone_lakes.len();
        system.stats.standalone_lake_tiles = system.standalone_tiles.len();

        log::info!(
            "seed {}: {} rivers ({} tiles), {} river lakes, {} standalone lakes in {:.2?}",
            seeds.master,
            system.stats.rivers,
            system.stats.river_tiles,
            system.stats.river_lakes,
            system.stats.standalone_lakes,
            start.elapsed()
        );

        system
    }

    /// Record traced rivers in source order and collect the lakes they ask for.
    fn merge_rivers(&mut self, traced: Vec<TracedRiver>, min_lake_path: usize) -> Vec<LakeRequest> {
        let mut requests = Vec::new();

        for mut river in traced {
            let mut joined = None;
            if let Some(hit) = river.path.iter().position(|c| self.segments.contains_key(c)) {
                joined = Some(river.path[hit]);
                river.truncate_at_confluence(hit);
                self.stats.confluences += 1;
            }
            log::trace!(
                "source {}: {:?}, {} tiles, stopped by {:?}",
                river.source_index,
                river.tier,
                river.path.len(),
                river.stop
            );
            if river.path.len() < 2 {
                continue;
            }

            for (coord, segment) in classify_path(&river.path) {
                self.segments.insert(coord, segment);
            }
            // The last kept tile flows into the river it joined
            if let (Some(join), [.., prev, last]) = (joined, river.path.as_slice()) {
                if let Some(segment) = classify_segment(Some(*prev), *last, Some(join)) {
                    self.segments.insert(*last, segment);
                }
            }
            self.stats.rivers += 1;
            if river.stop == StopReason::Ocean {
                self.stats.reached_ocean += 1;
            }

            let small = river.tier.small_lake_radius();
            for &index in &river.mid_lakes {
                requests.push(LakeRequest { center: river.path[index], radius: small });
            }

            let Some(&end) = river.path.last() else {
                continue;
            };
            if river.stop == StopReason::LocalMinimum && river.path.len() >= min_lake_path {
                requests.push(LakeRequest { center: end, radius: river.tier.lake_radius() });
            } else if river.end_lake
                && !matches!(river.stop, StopReason::Ocean | StopReason::Confluence)
            {
                requests.push(LakeRequest { center: end, radius: small });
            }
        }

        self.stats.river_tiles = self.segments.len();
        requests
    }

    /// River shape at a tile, if a river runs through it.
    pub fn river_segment_at(&self, x: i32, y: i32) -> Option<RiverSegment> {
        self.segments.get(&(x, y)).copied()
    }

    /// Whether a tile belongs to any lake.
    pub fn is_lake(&self, x: i32, y: i32) -> bool {
        self.river_lakes.contains(&(x, y)) || self.standalone_tiles.contains(&(x, y))
    }

    pub fn sources(&self) -> &[RiverSource] {
        &self.sources
    }

    /// Lakes placed away from the river network, in placement order.
    pub fn standalone_lakes(&self) -> &[LakeDescriptor] {
        &self.standalone_lakes
    }

    pub fn stats(&self) -> RiverStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::continent::SEA_LEVEL;

    fn small_config() -> WorldConfig {
        let mut config = WorldConfig::default();
        config.rivers.region_min = -700;
        config.rivers.region_max = 700;
        config.rivers.max_sources = 40;
        config
    }

    fn build(seed: i64) -> (TerrainModel, RiverSystem) {
        let config = small_config();
        let terrain = TerrainModel::new(seed, &config.frame);
        let rivers = RiverSystem::build(&terrain, &config);
        (terrain, rivers)
    }

    #[test]
    fn test_build_is_deterministic() {
        let (_, a) = build(12345);
        let (_, b) = build(12345);
        assert_eq!(a.segments, b.segments);
        assert_eq!(a.river_lakes, b.river_lakes);
        assert_eq!(a.standalone_lakes, b.standalone_lakes);
        assert_eq!(a.stats(), b.stats());
    }

    #[test]
    fn test_rivers_and_lakes_stay_on_land() {
        let (terrain, rivers) = build(12345);
        assert!(rivers.stats().rivers > 0);
        for &(x, y) in rivers.segments.keys() {
            assert!(terrain.elevation(x, y) >= SEA_LEVEL, "river on ocean at ({x}, {y})");
        }
        for &(x, y) in rivers.river_lakes.iter().chain(&rivers.standalone_tiles) {
            let e = terrain.elevation(x, y);
            assert!((SEA_LEVEL..=lakes::LAKE_MAX_ELEVATION).contains(&e));
            assert!(rivers.is_lake(x, y));
        }
    }

    #[test]
    fn test_standalone_lakes_match_stats() {
        let (_, rivers) = build(12345);
        let lakes = rivers.standalone_lakes();
        assert_eq!(lakes.len(), rivers.stats().standalone_lakes);
        for lake in lakes {
            assert!(rivers.is_lake(lake.center.0, lake.center.1));
            assert!(rivers.river_segment_at(lake.center.0, lake.center.1).is_none());
        }
    }

    #[test]
    fn test_sources_respect_spacing_and_cap() {
        let config = small_config();
        let (_, rivers) = build(777);
        let sources = rivers.sources();
        assert!(sources.len() <= config.rivers.max_sources);
        let min_sq = config.rivers.min_source_spacing * config.rivers.min_source_spacing;
        for (i, a) in sources.iter().enumerate() {
            for b in &sources[i + 1..] {
                let dx = f64::from(a.position.0 - b.position.0);
                let dy = f64::from(a.position.1 - b.position.1);
                assert!(dx * dx + dy * dy >= min_sq);
            }
        }
    }

    #[test]
    fn test_merge_truncates_at_confluence() {
        let first = TracedRiver {
            source_index: 0,
            tier: RiverTier::Medium,
            path: vec![(0, 0), (1, 0), (2, 0), (3, 0)],
            stop: StopReason::Ocean,
            mid_lakes: Vec::new(),
            end_lake: false,
        };
        let second = TracedRiver {
            source_index: 1,
            tier: RiverTier::Stream,
            path: vec![(2, -3), (2, -2), (2, -1), (2, 0), (2, 1)],
            stop: StopReason::LocalMinimum,
            mid_lakes: Vec::new(),
            end_lake: true,
        };
        let mut system = RiverSystem::default();
        let requests = system.merge_rivers(vec![first, second], 2);

        assert!(requests.is_empty());
        assert_eq!(system.stats.confluences, 1);
        assert_eq!(system.stats.rivers, 2);
        assert_eq!(system.river_segment_at(2, 0), Some(RiverSegment::Horizontal));
        assert_eq!(system.river_segment_at(2, -1), Some(RiverSegment::Vertical));
        assert_eq!(system.river_segment_at(2, 1), None);
    }

    #[test]
    fn test_confluence_tile_bends_toward_join() {
        let first = TracedRiver {
            source_index: 0,
            tier: RiverTier::Medium,
            path: vec![(0, 0), (1, 0), (2, 0), (3, 0)],
            stop: StopReason::Ocean,
            mid_lakes: Vec::new(),
            end_lake: false,
        };
        // Runs south, then steps diagonally south-west onto the first river
        let second = TracedRiver {
            source_index: 1,
            tier: RiverTier::Stream,
            path: vec![(4, -3), (4, -2), (4, -1), (3, 0), (2, 1)],
            stop: StopReason::LocalMinimum,
            mid_lakes: Vec::new(),
            end_lake: false,
        };
        let mut system = RiverSystem::default();
        system.merge_rivers(vec![first, second], 2);

        assert_eq!(system.stats.confluences, 1);
        assert_eq!(system.river_segment_at(4, -2), Some(RiverSegment::Vertical));
        assert_eq!(system.river_segment_at(4, -1), Some(RiverSegment::SouthWest));
        assert_eq!(system.river_segment_at(3, 0), Some(RiverSegment::Horizontal));
    }

    #[test]
    fn test_local_minimum_requests_lake() {
        let river = TracedRiver {
            source_index: 0,
            tier: RiverTier::Regional,
            path: (0..10).map(|i| (i, 0)).collect(),
            stop: StopReason::LocalMinimum,
            mid_lakes: vec![4],
            end_lake: false,
        };
        let mut system = RiverSystem::default();
        let requests = system.merge_rivers(vec![river], 8);
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[1].center, (9, 0));
        assert_eq!(requests[1].radius, RiverTier::Regional.lake_radius());
    }

    #[test]
    fn test_single_tile_paths_are_dropped() {
        let river = TracedRiver {
            source_index: 0,
            tier: RiverTier::Stream,
            path: vec![(5, 5)],
            stop: StopReason::LocalMinimum,
            mid_lakes: Vec::new(),
            end_lake: true,
        };
        let mut system = RiverSystem::default();
        assert!(system.merge_rivers(vec![river], 1).is_empty());
        assert_eq!(system.stats.rivers, 0);
        assert_eq!(system.river_segment_at(5, 5), None);
    }
}
