//! Local shape of a river tile, derived from its neighbors along the path.
//!
//! Coordinates grow east in x and south in y.

use serde::{Deserialize, Serialize};

use super::Coord;

/// Shape of the river through one tile. Bends are named after the two sides of the
/// tile the river touches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiverSegment {
    Horizontal,
    Vertical,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl RiverSegment {
    /// Every segment type, in compact-encoding order (index 0 is reserved for "none").
    pub const ALL: [RiverSegment; 6] = [
        RiverSegment::Horizontal,
        RiverSegment::Vertical,
        RiverSegment::NorthEast,
        RiverSegment::NorthWest,
        RiverSegment::SouthEast,
        RiverSegment::SouthWest,
    ];

    /// ASCII glyph for previews.
    pub fn glyph(&self) -> char {
        match self {
            RiverSegment::Horizontal => '-',
            RiverSegment::Vertical => '|',
            RiverSegment::NorthEast | RiverSegment::SouthWest => '/',
            RiverSegment::NorthWest | RiverSegment::SouthEast => '\\',
        }
    }
}

/// Classify `current` from its path neighbors.
///
/// The outgoing direction takes precedence; the incoming one fills in whichever axis
/// the outgoing step does not move along. Endpoints pass `None` for the missing side
/// and are classified from their single direction. Returns `None` for an isolated
/// tile.
pub fn classify_segment(
    prev: Option<Coord>,
    current: Coord,
    next: Option<Coord>,
) -> Option<RiverSegment> {
    let offset = |c: Coord| ((c.0 - current.0).signum(), (c.1 - current.1).signum());
    let directions: Vec<(i32, i32)> = next.into_iter().chain(prev).map(offset).collect();

    let horizontal = directions.iter().map(|d| d.0).find(|&dx| dx != 0);
    let vertical = directions.iter().map(|d| d.1).find(|&dy| dy != 0);

    match (horizontal, vertical) {
        (None, None) => None,
        (Some(_), None) => Some(RiverSegment::Horizontal),
        (None, Some(_)) => Some(RiverSegment::Vertical),
        (Some(dx), Some(dy)) => Some(match (dx > 0, dy < 0) {
            (true, true) => RiverSegment::NorthEast,
            (false, true) => RiverSegment::NorthWest,
            (true, false) => RiverSegment::SouthEast,
            (false, false) => RiverSegment::SouthWest,
        }),
    }
}

/// Classify every tile of a path in order.
pub fn classify_path(path: &[Coord]) -> Vec<(Coord, RiverSegment)> {
    path.iter()
        .enumerate()
        .filter_map(|(i, &current)| {
            let prev = i.checked_sub(1).map(|p| path[p]);
            let next = path.get(i + 1).copied();
            classify_segment(prev, current, next).map(|segment| (current, segment))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_straight_runs() {
        assert_eq!(
            classify_segment(Some((-1, 0)), (0, 0), Some((1, 0))),
            Some(RiverSegment::Horizontal)
        );
        assert_eq!(
            classify_segment(Some((0, -1)), (0, 0), Some((0, 1))),
            Some(RiverSegment::Vertical)
        );
    }

    #[test]
    fn test_bends() {
        // Enters from the west, leaves to the south
        assert_eq!(
            classify_segment(Some((-1, 0)), (0, 0), Some((0, 1))),
            Some(RiverSegment::SouthWest)
        );
        // Enters from the south, leaves to the east
        assert_eq!(
            classify_segment(Some((0, 1)), (0, 0), Some((1, 0))),
            Some(RiverSegment::SouthEast)
        );
        // Enters from the north, leaves to the west
        assert_eq!(
            classify_segment(Some((0, -1)), (0, 0), Some((-1, 0))),
            Some(RiverSegment::NorthWest)
        );
        // Diagonal step toward the north-east
        assert_eq!(
            classify_segment(None, (5, 5), Some((6, 4))),
            Some(RiverSegment::NorthEast)
        );
    }

    #[test]
    fn test_endpoints_use_single_direction() {
        assert_eq!(classify_segment(None, (0, 0), Some((1, 0))), Some(RiverSegment::Horizontal));
        assert_eq!(classify_segment(Some((0, 1)), (0, 0), None), Some(RiverSegment::Vertical));
        assert_eq!(classify_segment(None, (0, 0), None), None);
    }

    #[test]
    fn test_classify_path_covers_every_tile() {
        let path = [(0, 0), (1, 0), (2, 1), (2, 2), (2, 3)];
        let classified = classify_path(&path);
        assert_eq!(classified.len(), path.len());
        assert_eq!(classified[0].1, RiverSegment::Horizontal);
        assert_eq!(classified[4].1, RiverSegment::Vertical);
        assert!(classify_path(&[(3, 3)]).is_empty());
    }
}
