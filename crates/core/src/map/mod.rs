//! The spatial index. A [HexMap] owns a fixed set of [Location]s and tracks
//! which agents are standing where.
//!
//! The map keeps two indexes that always mirror each other:
//! - Agent ID -> coordinate
//! - Coordinate -> set of agent IDs (stored on each [Location])
//!
//! For every agent `a` at position `p`, `a` is in `location(p).agents()`, and
//! every agent in any location's set has that location as its position. All
//! mutations validate their inputs before touching either index, so a failed
//! operation leaves the map exactly as it was.

mod agent;
mod location;

pub use self::{agent::*, location::*};

use crate::{
    config::MapConfig,
    error::MapError,
    hex::{self, HexCoord, HexCoordIndexMap, HexCoordSet, Orientation},
    path, timed,
};
use anyhow::{ensure, Context};
use fnv::FnvHashMap;
use log::{debug, trace};
use validator::Validate;

/// A finite hex grid that agents can be placed on. `S` is the state stored on
/// each location, e.g. terrain.
///
/// The set of legal coordinates (the domain) is fixed at construction. Agents
/// are identified purely by [AgentId]; the map never owns agent data, just
/// positions. See [AgentPool] for holding agent data alongside a map.
#[derive(Clone, Debug)]
pub struct HexMap<S> {
    orientation: Orientation,
    /// Ordered so iteration is deterministic
    locations: HexCoordIndexMap<Location<S>>,
    positions: FnvHashMap<AgentId, HexCoord>,
}

impl<S: Clone> HexMap<S> {
    /// Create a new map over the given domain. Every location starts with a
    /// clone of `default_state` and no agents. Duplicate coordinates in the
    /// domain are collapsed.
    pub fn new(
        domain: impl IntoIterator<Item = HexCoord>,
        default_state: S,
    ) -> Self {
        let locations: HexCoordIndexMap<Location<S>> = domain
            .into_iter()
            .map(|coord| (coord, Location::new(coord, default_state.clone())))
            .collect();
        debug!("Created map with {} locations", locations.len());
        Self {
            orientation: Orientation::default(),
            locations,
            positions: FnvHashMap::default(),
        }
    }

    /// Create a map whose domain is a hexagon of the given radius, centered on
    /// the origin. See [HexCoord::hexagon].
    pub fn hexagon(radius: u16, default_state: S) -> Self {
        timed!(format!("Building radius {} map", radius), {
            Self::new(HexCoord::ORIGIN.hexagon(radius), default_state)
        })
    }

    /// Build a hexagonal map from a config. Returns an error if the config is
    /// invalid.
    pub fn from_config(
        config: &MapConfig,
        default_state: S,
    ) -> anyhow::Result<Self> {
        config.validate().context("invalid map config")?;
        Ok(Self::hexagon(config.radius, default_state)
            .with_orientation(config.orientation))
    }
}

impl<S> HexMap<S> {
    /// Set the orientation used when converting locations into the plane.
    /// This is purely for presentation, it has no effect on the grid.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Number of locations in the domain
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Number of agents on the map
    pub fn num_agents(&self) -> usize {
        self.positions.len()
    }

    /// Is the coordinate part of this map's domain?
    pub fn contains(&self, pos: HexCoord) -> bool {
        self.locations.contains_key(&pos)
    }

    pub fn contains_agent(&self, id: AgentId) -> bool {
        self.positions.contains_key(&id)
    }

    /// Every location in the map, in a stable order
    pub fn locations(&self) -> impl Iterator<Item = &Location<S>> {
        self.locations.values()
    }

    /// Mutable access to the state of every location, along with each
    /// location's coordinate. Same order as [Self::locations].
    pub fn states_mut(
        &mut self,
    ) -> impl Iterator<Item = (HexCoord, &mut S)> + '_ {
        self.locations
            .iter_mut()
            .map(|(coord, location)| (*coord, location.state_mut()))
    }

    /// Every coordinate in the domain, in the same order as [Self::locations]
    pub fn coords(&self) -> impl Iterator<Item = HexCoord> + '_ {
        self.locations.keys().copied()
    }

    /// Every agent on the map, in no particular order
    pub fn agents(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.positions.keys().copied()
    }

    /// Every agent on the map along with its position, in no particular order
    pub fn positions(&self) -> impl Iterator<Item = (AgentId, HexCoord)> + '_ {
        self.positions.iter().map(|(id, pos)| (*id, *pos))
    }

    pub fn location(&self, pos: HexCoord) -> Result<&Location<S>, MapError> {
        self.locations.get(&pos).ok_or(MapError::OutOfBounds(pos))
    }

    /// Get mutable access to the state of a location. Agents on the location
    /// can only be changed through [Self::add], [Self::move_agent], and
    /// [Self::remove].
    pub fn state_mut(&mut self, pos: HexCoord) -> Result<&mut S, MapError> {
        self.locations
            .get_mut(&pos)
            .map(Location::state_mut)
            .ok_or(MapError::OutOfBounds(pos))
    }

    pub fn position_of(&self, id: AgentId) -> Result<HexCoord, MapError> {
        self.positions
            .get(&id)
            .copied()
            .ok_or(MapError::AgentNotFound(id))
    }

    pub fn location_of(&self, id: AgentId) -> Result<&Location<S>, MapError> {
        let pos = self.position_of(id)?;
        self.location(pos)
    }

    /// Place a new agent on the map. Fails if the agent is already on the map
    /// or the position is outside the domain.
    pub fn add(&mut self, id: AgentId, pos: HexCoord) -> Result<(), MapError> {
        if self.positions.contains_key(&id) {
            return Err(MapError::AgentAlreadyRegistered(id));
        }
        let location = self
            .locations
            .get_mut(&pos)
            .ok_or(MapError::OutOfBounds(pos))?;

        location.insert_agent(id);
        self.positions.insert(id, pos);
        trace!("Added {} at {}", id, pos);
        Ok(())
    }

    /// Take an agent off the map, returning its last position
    pub fn remove(&mut self, id: AgentId) -> Result<HexCoord, MapError> {
        let pos = self
            .positions
            .remove(&id)
            .ok_or(MapError::AgentNotFound(id))?;
        if let Some(location) = self.locations.get_mut(&pos) {
            location.remove_agent(id);
        }
        trace!("Removed {} from {}", id, pos);
        Ok(pos)
    }

    /// Move an agent to a new position. The new position doesn't have to be
    /// adjacent to the old one. Moving an agent onto its current position is
    /// a no-op.
    pub fn move_agent(
        &mut self,
        id: AgentId,
        new_pos: HexCoord,
    ) -> Result<(), MapError> {
        let old_pos = self.position_of(id)?;
        if !self.contains(new_pos) {
            return Err(MapError::OutOfBounds(new_pos));
        }
        if old_pos == new_pos {
            return Ok(());
        }

        if let Some(location) = self.locations.get_mut(&old_pos) {
            location.remove_agent(id);
        }
        if let Some(location) = self.locations.get_mut(&new_pos) {
            location.insert_agent(id);
        }
        self.positions.insert(id, new_pos);
        trace!("Moved {} {} -> {}", id, old_pos, new_pos);
        Ok(())
    }

    /// Get every in-domain coordinate within `distance` steps of `center`,
    /// **excluding the center**. Coordinates outside the domain are dropped.
    /// The center itself doesn't need to be in the domain.
    pub fn region(&self, center: HexCoord, distance: u16) -> HexCoordSet {
        center
            .region(distance)
            .into_iter()
            .filter(|coord| self.contains(*coord))
            .collect()
    }

    /// Same as [Self::region], but get the locations instead of coordinates.
    /// Output is sorted by distance from the center, then coordinate.
    pub fn region_locations(
        &self,
        center: HexCoord,
        distance: u16,
    ) -> Vec<&Location<S>> {
        center
            .region_sorted(center, distance)
            .into_iter()
            .filter_map(|coord| self.locations.get(&coord))
            .collect()
    }

    /// Get every coordinate that's adjacent to the domain, but not in it
    pub fn border(&self) -> HexCoordSet {
        hex::border(self.locations.keys())
    }

    /// Find a path for an agent from its current position to `target`. Only
    /// locations that pass the `traversable` filter can be stepped on (the
    /// agent's current location doesn't need to pass). See [path::find_path]
    /// for the details of the search.
    ///
    /// Returns [MapError::AgentNotFound] if the agent isn't on the map, or
    /// [MapError::Path] if the search fails. A target outside the domain is
    /// never reachable.
    pub fn find_path(
        &self,
        id: AgentId,
        target: HexCoord,
        traversable: impl Fn(&Location<S>) -> bool,
        max_cost: Option<usize>,
    ) -> Result<Vec<HexCoord>, MapError> {
        let start = self.position_of(id)?;
        self.find_path_between(start, target, traversable, max_cost)
    }

    /// Same as [Self::find_path], but between two arbitrary coordinates
    pub fn find_path_between(
        &self,
        start: HexCoord,
        target: HexCoord,
        traversable: impl Fn(&Location<S>) -> bool,
        max_cost: Option<usize>,
    ) -> Result<Vec<HexCoord>, MapError> {
        let allowed: HexCoordSet = self
            .locations
            .values()
            .filter(|location| traversable(location))
            .map(Location::coord)
            .collect();
        let path = path::find_path(start, target, Some(&allowed), max_cost)?;
        Ok(path)
    }

    /// Get every agent that passes the filter, sorted by distance from `pos`
    /// (closest first). Agents at equal distance are sorted by ID.
    pub fn nearest_agents(
        &self,
        pos: HexCoord,
        filter: impl Fn(AgentId) -> bool,
    ) -> Vec<AgentId> {
        let mut agents: Vec<(usize, AgentId)> = self
            .positions
            .iter()
            .filter(|(id, _)| filter(**id))
            .map(|(id, agent_pos)| (pos.distance_to(*agent_pos), *id))
            .collect();
        agents.sort_unstable();
        agents.into_iter().map(|(_, id)| id).collect()
    }

    /// Get every location that passes the filter, sorted by distance from
    /// `pos` (closest first). Locations at equal distance are sorted by
    /// coordinate.
    pub fn nearest_locations(
        &self,
        pos: HexCoord,
        filter: impl Fn(&Location<S>) -> bool,
    ) -> Vec<&Location<S>> {
        let mut locations: Vec<&Location<S>> = self
            .locations
            .values()
            .filter(|location| filter(location))
            .collect();
        locations.sort_by_key(|location| {
            (pos.distance_to(location.coord()), location.coord())
        });
        locations
    }

    /// Verify that the position index and the per-location agent sets agree
    /// with each other. This should never fail; it's here to catch bugs.
    pub fn check_invariants(&self) -> anyhow::Result<()> {
        for (id, pos) in &self.positions {
            let location = self.locations.get(pos).with_context(|| {
                format!("{} is out of bounds at {}", id, pos)
            })?;
            ensure!(
                location.contains(*id),
                "{} is at {} but missing from that location",
                id,
                pos
            );
        }

        let mut total = 0;
        for location in self.locations.values() {
            for id in location.agents() {
                ensure!(
                    self.positions.get(id) == Some(&location.coord()),
                    "{} is listed at {} but positioned at {:?}",
                    id,
                    location.coord(),
                    self.positions.get(id)
                );
            }
            total += location.num_agents();
        }
        ensure!(
            total == self.positions.len(),
            "{} agents on locations but {} positioned",
            total,
            self.positions.len()
        );
        Ok(())
    }
}
