//! A* pathfinding over any unit-step grid. The search is generic over
//! [PathNode], so it works for [HexCoord] as well as any other grid type
//! that can list its neighbors and measure distance.

use crate::{error::PathError, hex::HexCoord};
use fnv::FnvBuildHasher;
use log::trace;
use std::{
    cmp::Reverse,
    collections::{BinaryHeap, HashMap, HashSet},
    fmt::{Debug, Display},
    hash::{BuildHasher, Hash},
};

/// Any type that can be searched by [find_path]. Every step between a node
/// and one of its neighbors costs exactly 1.
///
/// The ordering on nodes is used to break ties in the search, which keeps
/// results deterministic.
pub trait PathNode: Copy + Eq + Hash + Ord + Debug + Display {
    type Neighbors: IntoIterator<Item = Self>;

    /// All nodes that are one step away from this one
    fn neighbors(&self) -> Self::Neighbors;

    /// Minimum number of steps between two nodes, ignoring obstacles. This is
    /// the search heuristic, so it must never overestimate the true cost.
    fn distance(&self, other: &Self) -> usize;
}

impl PathNode for HexCoord {
    type Neighbors = [HexCoord; 6];

    fn neighbors(&self) -> Self::Neighbors {
        let mut neighbors = [*self; 6];
        for (slot, adj) in neighbors.iter_mut().zip(self.adjacents()) {
            *slot = adj;
        }
        neighbors
    }

    fn distance(&self, other: &Self) -> usize {
        self.distance_to(*other)
    }
}

/// Find a shortest path from `start` to `goal`, using A*.
///
/// ## Arguments
///
/// - `allowed`: If given, only nodes in this set can be stepped onto. The
///   start node doesn't need to be in it, but every other node in the path
///   (including the goal) does.
/// - `max_cost`: If given, any path longer than this many steps is ignored.
///
/// ## Output
///
/// The path includes both endpoints, in order from start to goal. So a path
/// between two adjacent nodes has a length of 2. Because the heuristic is
/// exact on an open grid, the path is always optimal.
///
/// When multiple open nodes have the same estimated cost, the smallest one
/// (according to its [Ord]) gets expanded first. The output for any given
/// input is always the same.
///
/// ## Errors
///
/// - [PathError::SourceEqualsDestination] if `start == goal`
/// - [PathError::NoPathFound] if the goal can't be reached
pub fn find_path<N: PathNode, S: BuildHasher>(
    start: N,
    goal: N,
    allowed: Option<&HashSet<N, S>>,
    max_cost: Option<usize>,
) -> Result<Vec<N>, PathError<N>> {
    if start == goal {
        return Err(PathError::SourceEqualsDestination(start));
    }

    // The open set is a min-heap keyed on (f_score, node). Nodes can be
    // pushed more than once if we find a cheaper route to them later, so
    // stale entries get skipped on the way out.
    let mut open_set: BinaryHeap<Reverse<(usize, N)>> = BinaryHeap::new();
    let mut came_from: HashMap<N, N, FnvBuildHasher> = HashMap::default();
    let mut g_score: HashMap<N, usize, FnvBuildHasher> = HashMap::default();
    let mut closed: HashSet<N, FnvBuildHasher> = HashSet::default();

    g_score.insert(start, 0);
    open_set.push(Reverse((start.distance(&goal), start)));

    while let Some(Reverse((_, current))) = open_set.pop() {
        if current == goal {
            let path = reconstruct_path(&came_from, current);
            trace!(
                "Found path {} -> {} of length {} ({} nodes expanded)",
                start,
                goal,
                path.len(),
                closed.len()
            );
            return Ok(path);
        }

        // The heuristic is consistent, so the first time a node is popped we
        // already have its best score
        if !closed.insert(current) {
            continue;
        }

        let tentative_g_score = g_score[&current] + 1;
        if matches!(max_cost, Some(max_cost) if tentative_g_score > max_cost) {
            continue;
        }

        for neighbor in current.neighbors() {
            if let Some(allowed) = allowed {
                if !allowed.contains(&neighbor) {
                    continue;
                }
            }

            let improved = match g_score.get(&neighbor) {
                Some(known) => tentative_g_score < *known,
                None => true,
            };
            if improved {
                came_from.insert(neighbor, current);
                g_score.insert(neighbor, tentative_g_score);
                let f_score = tentative_g_score + neighbor.distance(&goal);
                open_set.push(Reverse((f_score, neighbor)));
            }
        }
    }

    trace!(
        "No path {} -> {} ({} nodes expanded)",
        start,
        goal,
        closed.len()
    );
    Err(PathError::NoPathFound { start, goal })
}

/// Follow back-pointers from the end of a path back to the start, then flip
/// the result so it goes start -> end
fn reconstruct_path<N: PathNode, S: BuildHasher>(
    came_from: &HashMap<N, N, S>,
    end: N,
) -> Vec<N> {
    let mut path = vec![end];
    let mut current = end;
    while let Some(previous) = came_from.get(&current) {
        path.push(*previous);
        current = *previous;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex::HexCoordSet;

    fn assert_valid_path(path: &[HexCoord], start: HexCoord, goal: HexCoord) {
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&goal));
        for pair in path.windows(2) {
            assert_eq!(pair[0].distance_to(pair[1]), 1, "path {:?}", path);
        }
    }

    #[test]
    fn test_adjacent() {
        let start = HexCoord::ORIGIN;
        let goal = HexCoord::new_qr(1, -1);
        let path =
            find_path::<_, FnvBuildHasher>(start, goal, None, None).unwrap();
        assert_eq!(path, vec![start, goal]);
    }

    #[test]
    fn test_optimal_unconstrained() {
        let start = HexCoord::new_qr(-3, 1);
        for goal in start.region(4) {
            let path = find_path::<_, FnvBuildHasher>(start, goal, None, None)
                .unwrap();
            assert_valid_path(&path, start, goal);
            assert_eq!(path.len() - 1, start.distance_to(goal));
        }
    }

    #[test]
    fn test_source_equals_destination() {
        let start = HexCoord::new_qr(2, 2);
        assert_eq!(
            find_path::<_, FnvBuildHasher>(start, start, None, None),
            Err(PathError::SourceEqualsDestination(start))
        );
    }

    #[test]
    fn test_deterministic() {
        let start = HexCoord::ORIGIN;
        let goal = HexCoord::new_qr(3, -3);
        let allowed: HexCoordSet = start.hexagon(4).into_iter().collect();
        let first = find_path(start, goal, Some(&allowed), None).unwrap();
        for _ in 0..10 {
            assert_eq!(
                find_path(start, goal, Some(&allowed), None).unwrap(),
                first
            );
        }
    }

    #[test]
    fn test_wall() {
        // Build a wall along q=1, with a single gap at the far end
        let domain = HexCoord::ORIGIN.hexagon(3);
        let gap = HexCoord::new_qr(1, 2);
        let allowed: HexCoordSet = domain
            .iter()
            .copied()
            .filter(|coord| coord.q() != 1 || *coord == gap)
            .collect();
        let start = HexCoord::ORIGIN;
        let goal = HexCoord::new_qr(2, -1);

        let path = find_path(start, goal, Some(&allowed), None).unwrap();
        assert_valid_path(&path, start, goal);
        assert!(path.contains(&gap));
        for coord in &path[1..] {
            assert!(allowed.contains(coord), "{} is blocked", coord);
        }
        assert!(path.len() - 1 > start.distance_to(goal));

        // Close the gap, now there's no way through
        let mut sealed = allowed.clone();
        sealed.remove(&gap);
        assert_eq!(
            find_path(start, goal, Some(&sealed), None),
            Err(PathError::NoPathFound { start, goal })
        );
    }

    #[test]
    fn test_start_outside_allowed() {
        let start = HexCoord::ORIGIN;
        let goal = HexCoord::new_qr(2, 0);
        let allowed: HexCoordSet = start.region(2);
        assert!(!allowed.contains(&start));
        let path = find_path(start, goal, Some(&allowed), None).unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path[0], start);
    }

    #[test]
    fn test_goal_not_allowed() {
        let start = HexCoord::ORIGIN;
        let goal = HexCoord::new_qr(1, 0);
        let allowed: HexCoordSet = start
            .region(2)
            .into_iter()
            .filter(|coord| *coord != goal)
            .collect();
        assert_eq!(
            find_path(start, goal, Some(&allowed), None),
            Err(PathError::NoPathFound { start, goal })
        );
    }

    #[test]
    fn test_max_cost() {
        let start = HexCoord::ORIGIN;
        let goal = HexCoord::new_qr(3, 0);
        let allowed: HexCoordSet = start.hexagon(5).into_iter().collect();

        let path = find_path(start, goal, Some(&allowed), Some(3)).unwrap();
        assert_eq!(path.len(), 4);
        assert_eq!(
            find_path(start, goal, Some(&allowed), Some(2)),
            Err(PathError::NoPathFound { start, goal })
        );
    }
}
