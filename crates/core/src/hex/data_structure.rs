use crate::hex::{HexCoord, HexVector};
use fnv::FnvBuildHasher;
use indexmap::{IndexMap, IndexSet};
use std::{
    cmp,
    collections::{HashMap, HashSet},
};

/// A set of hex coordinates
pub type HexCoordSet = HashSet<HexCoord, FnvBuildHasher>;
/// A map of hex coordinates to some `T`
pub type HexCoordMap<T> = HashMap<HexCoord, T, FnvBuildHasher>;
/// An ORDERED map of hex coordinates to some `T`. This has some extra memory
/// overhead, so we should only use it when we actually need the ordering.
pub type HexCoordIndexMap<T> = IndexMap<HexCoord, T, FnvBuildHasher>;
/// An ORDERED set of hex coordinates
pub type HexCoordIndexSet = IndexSet<HexCoord, FnvBuildHasher>;

impl HexCoord {
    /// Get every coordinate within `distance` steps of this one, **excluding
    /// this coordinate itself**. The output will always contain exactly
    /// `3d(d+1)` coordinates, where `d` is the distance.
    ///
    /// Use [Self::hexagon] if you want the center included.
    pub fn region(self, distance: u16) -> HexCoordSet {
        let mut region = HexCoordSet::with_capacity_and_hasher(
            region_len(distance),
            FnvBuildHasher::default(),
        );
        region.extend(
            Self::offsets(distance)
                .filter(|offset| *offset != HexVector::ZERO)
                .map(|offset| self + offset),
        );
        debug_assert_eq!(region.len(), region_len(distance));
        region
    }

    /// Get every coordinate within `radius` steps of this one, **including
    /// this coordinate**. The coordinates make up a larger hexagon, hence the
    /// name. For a radius `r`, the output always contains exactly `3r²+3r+1`
    /// coordinates. Output is ordered by `q`, then `r`.
    pub fn hexagon(self, radius: u16) -> HexCoordIndexSet {
        let mut hexagon = HexCoordIndexSet::with_capacity_and_hasher(
            hexagon_len(radius),
            FnvBuildHasher::default(),
        );
        hexagon.extend(Self::offsets(radius).map(|offset| self + offset));
        debug_assert_eq!(hexagon.len(), hexagon_len(radius));
        hexagon
    }

    /// Get the region around this coordinate, sorted by distance to `target`.
    /// Coordinates that are equidistant from the target are sorted by their
    /// own ordering, so the output is deterministic.
    pub fn region_sorted(
        self,
        target: HexCoord,
        distance: u16,
    ) -> Vec<HexCoord> {
        let mut region: Vec<HexCoord> =
            self.region(distance).into_iter().collect();
        region.sort_by_key(|coord| (target.distance_to(*coord), *coord));
        region
    }

    /// All offsets within `distance` steps of the origin, including the zero
    /// vector
    fn offsets(distance: u16) -> impl Iterator<Item = HexVector> {
        let d = distance as i32;
        (-d..=d).flat_map(move |q| {
            // If we just do [-d,d] for r as well, then we end up with a diamond
            // pattern instead of a hexagon
            // https://www.redblobgames.com/grids/hexagons/#range
            let r_min = cmp::max(-d, -q - d);
            let r_max = cmp::min(d, -q + d);
            (r_min..=r_max).map(move |r| HexVector::new_qr(q, r))
        })
    }
}

/// Get the set of coordinates that are directly adjacent to at least one
/// coordinate in the given set, but NOT in the set themselves.
pub fn border<'a>(
    coords: impl IntoIterator<Item = &'a HexCoord>,
) -> HexCoordSet {
    let coords: HexCoordSet = coords.into_iter().copied().collect();
    coords
        .iter()
        .flat_map(|coord| coord.adjacents())
        .filter(|adj| !coords.contains(adj))
        .collect()
}

/// Number of coordinates in a [HexCoord::region] of the given distance.
pub fn region_len(distance: u16) -> usize {
    hexagon_len(distance) - 1
}

/// Calculate the number of cells in a hexagon of the given radius. Radius 0
/// means 1 cell, 1 is 7 cells, 2 is 19, etc.
pub fn hexagon_len(radius: u16) -> usize {
    // We'll always have 3r^2+3r+1 cells (a reduction of a geometric sum).
    // f(0) = 1, and we add 6r cells for every step after that, so:
    // 1, (+6) 7, (+12) 19, (+18) 37, ...
    let r = radius as usize;
    3 * r * r + 3 * r + 1
}
