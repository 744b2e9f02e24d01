//! Downhill path tracing from a river source.
//!
//! Each step moves to the 8-connected neighbor with the greatest positive drop. A
//! meander noise term nudges the choice so rivers do not run in straight lines and
//! near-equal drops do not all resolve the same way.

use std::collections::HashSet;

use super::Coord;
use crate::continent::SEA_LEVEL;
use crate::noise_field::NoiseField;
use crate::sequence::ScalarSequence;
use crate::terrain::TerrainModel;

/// Neighbor offsets, clockwise from north
/// 7 0 1
/// 6 X 2
/// 5 4 3
pub const DX: [i32; 8] = [0, 1, 1, 1, 0, -1, -1, -1];
pub const DY: [i32; 8] = [-1, -1, 0, 1, 1, 1, 0, -1];

const MEANDER_FREQUENCY: f64 = 0.15;
const MEANDER_WEIGHT: f64 = 0.0015;

/// Steps between mid-path lake checks
const MID_LAKE_INTERVAL: usize = 20;

/// Length/behavior class of a river, fixed at its source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RiverTier {
    Stream,
    Medium,
    Regional,
    Continental,
}

impl RiverTier {
    /// Tier from the source's land-relative elevation and a per-source draw.
    pub fn classify(relative_elevation: f64, draw: f64) -> Self {
        if relative_elevation > 0.6 && draw < 0.2 {
            RiverTier::Continental
        } else if relative_elevation > 0.45 && draw < 0.45 {
            RiverTier::Regional
        } else if draw < 0.75 {
            RiverTier::Medium
        } else {
            RiverTier::Stream
        }
    }

    pub fn max_steps(&self) -> usize {
        match self {
            RiverTier::Stream => 40,
            RiverTier::Medium => 100,
            RiverTier::Regional => 200,
            RiverTier::Continental => 400,
        }
    }

    /// Chance of a lake at each mid-path check
    pub fn mid_lake_chance(&self) -> f64 {
        match self {
            RiverTier::Stream => 0.0,
            RiverTier::Medium => 0.05,
            RiverTier::Regional => 0.08,
            RiverTier::Continental => 0.1,
        }
    }

    /// Chance of a lake where a river dies out without reaching the sea
    pub fn end_lake_chance(&self) -> f64 {
        match self {
            RiverTier::Stream => 0.1,
            RiverTier::Medium => 0.2,
            RiverTier::Regional => 0.3,
            RiverTier::Continental => 0.4,
        }
    }

    /// Radius of the lake filling a local minimum
    pub fn lake_radius(&self) -> f64 {
        match self {
            RiverTier::Stream => 2.0,
            RiverTier::Medium => 3.0,
            RiverTier::Regional => 4.0,
            RiverTier::Continental => 6.0,
        }
    }

    /// Radius of mid-path and terminal lakes
    pub fn small_lake_radius(&self) -> f64 {
        (self.lake_radius() * 0.6).max(1.5)
    }
}

/// Why tracing stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StopReason {
    /// Next step would enter the ocean
    Ocean,
    /// No neighbor is lower
    LocalMinimum,
    /// Next step revisits a tile of this path
    Cycle,
    /// Step budget used up
    StepLimit,
    /// Ran into a river traced earlier
    Confluence,
}

/// Result of tracing one source, before merging with other rivers.
#[derive(Clone, Debug, PartialEq)]
pub struct TracedRiver {
    pub source_index: usize,
    pub tier: RiverTier,
    pub path: Vec<Coord>,
    pub stop: StopReason,
    /// Path indices where a mid-path lake was drawn
    pub mid_lakes: Vec<usize>,
    /// Whether a terminal lake was drawn
    pub end_lake: bool,
}

impl TracedRiver {
    /// Cut the river at `len` tiles because it ran into another river.
    pub fn truncate_at_confluence(&mut self, len: usize) {
        self.path.truncate(len);
        self.stop = StopReason::Confluence;
        self.mid_lakes.retain(|&i| i < len);
        self.end_lake = false;
    }
}

/// Follow the steepest descent from `source` for at most `max_steps` steps.
pub fn trace_path(
    terrain: &TerrainModel,
    meander: &NoiseField,
    source: Coord,
    max_steps: usize,
) -> (Vec<Coord>, StopReason) {
    let mut path = vec![source];
    let mut visited: HashSet<Coord> = HashSet::from([source]);
    let mut current = source;
    let mut current_elevation = terrain.elevation(source.0, source.1);

    for _ in 0..max_steps {
        let mut best: Option<(Coord, f64, f64)> = None;
        for dir in 0..8 {
            let next = (current.0 + DX[dir], current.1 + DY[dir]);
            let elevation = terrain.elevation(next.0, next.1);
            let drop = current_elevation - elevation;
            if drop <= 0.0 {
                continue;
            }
            let score = drop
                + meander.sample(
                    f64::from(next.0) * MEANDER_FREQUENCY,
                    f64::from(next.1) * MEANDER_FREQUENCY,
                ) * MEANDER_WEIGHT;
            if best.map_or(true, |(_, _, s)| score > s) {
                best = Some((next, elevation, score));
            }
        }

        let Some((next, elevation, _)) = best else {
            return (path, StopReason::LocalMinimum);
        };
        if elevation < SEA_LEVEL {
            return (path, StopReason::Ocean);
        }
        if !visited.insert(next) {
            return (path, StopReason::Cycle);
        }

        path.push(next);
        current = next;
        current_elevation = elevation;
    }

    (path, StopReason::StepLimit)
}

/// Trace one source and draw its lake decisions from a per-source sequence, so the
/// result does not depend on which thread traced it or in what order.
pub fn trace_river(
    terrain: &TerrainModel,
    meander: &NoiseField,
    source_index: usize,
    source: Coord,
    relative_elevation: f64,
    seq: &mut ScalarSequence,
) -> TracedRiver {
    let tier = RiverTier::classify(relative_elevation, seq.next());
    let (path, stop) = trace_path(terrain, meander, source, tier.max_steps());

    let mut mid_lakes = Vec::new();
    let mut index = MID_LAKE_INTERVAL;
    while index + 1 < path.len() {
        if seq.chance(tier.mid_lake_chance()) {
            mid_lakes.push(index);
        }
        index += MID_LAKE_INTERVAL;
    }

    let end_lake = seq.chance(tier.end_lake_chance());

    TracedRiver { source_index, tier, path, stop, mid_lakes, end_lake }
}
