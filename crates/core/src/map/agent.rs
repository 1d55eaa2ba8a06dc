use crate::{
    error::MapError,
    hex::HexCoord,
    map::{HexMap, Location},
};
use derive_more::{Display, From};
use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};
use std::collections::{btree_map, BTreeMap};

/// Unique identifier for an agent. IDs are assigned by whoever creates the
/// agents; the map only requires that they're unique.
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    From,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
#[display(fmt = "A{}", _0)]
#[serde(transparent)]
pub struct AgentId(pub u64);

/// An entity that can be placed on a [HexMap]. An agent doesn't know where
/// it is on its own; its position is always looked up from the map, so the
/// map is the single source of truth.
#[derive(Clone, Debug)]
pub struct Agent<A> {
    id: AgentId,
    pub state: A,
}

impl<A> Agent<A> {
    pub fn new(id: AgentId, state: A) -> Self {
        Self { id, state }
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    /// Where this agent is on the given map
    pub fn position<S>(&self, map: &HexMap<S>) -> Result<HexCoord, MapError> {
        map.position_of(self.id)
    }

    /// The location this agent is standing on in the given map
    pub fn location<'a, S>(
        &self,
        map: &'a HexMap<S>,
    ) -> Result<&'a Location<S>, MapError> {
        map.location_of(self.id)
    }
}

/// A collection of agents, keyed by ID. Iteration is always in ID order.
#[derive(Clone, Debug)]
pub struct AgentPool<A> {
    agents: BTreeMap<AgentId, Agent<A>>,
}

impl<A> AgentPool<A> {
    pub fn new() -> Self {
        Self {
            agents: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn contains(&self, id: AgentId) -> bool {
        self.agents.contains_key(&id)
    }

    pub fn add(&mut self, agent: Agent<A>) -> Result<(), MapError> {
        match self.agents.entry(agent.id) {
            btree_map::Entry::Occupied(_) => {
                Err(MapError::AgentAlreadyRegistered(agent.id))
            }
            btree_map::Entry::Vacant(entry) => {
                entry.insert(agent);
                Ok(())
            }
        }
    }

    pub fn remove(&mut self, id: AgentId) -> Result<Agent<A>, MapError> {
        self.agents.remove(&id).ok_or(MapError::AgentNotFound(id))
    }

    pub fn get(&self, id: AgentId) -> Result<&Agent<A>, MapError> {
        self.agents.get(&id).ok_or(MapError::AgentNotFound(id))
    }

    pub fn get_mut(&mut self, id: AgentId) -> Result<&mut Agent<A>, MapError> {
        self.agents.get_mut(&id).ok_or(MapError::AgentNotFound(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Agent<A>> {
        self.agents.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Agent<A>> {
        self.agents.values_mut()
    }

    pub fn ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.agents.keys().copied()
    }

    /// Get every agent ID in a random order, for activating agents one at a
    /// time. The order depends only on the RNG state, so a seeded RNG gives
    /// a reproducible order.
    pub fn random_activation<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Vec<AgentId> {
        let mut ids: Vec<AgentId> = self.ids().collect();
        ids.shuffle(rng);
        ids
    }
}

impl<A> Default for AgentPool<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> FromIterator<Agent<A>> for AgentPool<A> {
    /// Build a pool from a list of agents. If any IDs are duplicated, the
    /// last one wins.
    fn from_iter<T: IntoIterator<Item = Agent<A>>>(iter: T) -> Self {
        Self {
            agents: iter.into_iter().map(|agent| (agent.id, agent)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    #[test]
    fn test_agent_id_display() {
        assert_eq!(AgentId(12).to_string(), "A12");
        assert_eq!(AgentId::from(4), AgentId(4));
    }

    #[test]
    fn test_pool_add_remove() {
        let mut pool = AgentPool::new();
        pool.add(Agent::new(AgentId(2), "b")).unwrap();
        pool.add(Agent::new(AgentId(1), "a")).unwrap();
        assert_eq!(
            pool.add(Agent::new(AgentId(1), "c")).unwrap_err(),
            MapError::AgentAlreadyRegistered(AgentId(1))
        );
        // Failed add didn't overwrite anything
        assert_eq!(pool.get(AgentId(1)).unwrap().state, "a");
        assert_eq!(pool.len(), 2);

        // Iteration is in ID order, not insertion order
        assert_eq!(
            pool.ids().collect::<Vec<_>>(),
            vec![AgentId(1), AgentId(2)]
        );

        pool.get_mut(AgentId(2)).unwrap().state = "bb";
        assert_eq!(pool.remove(AgentId(2)).unwrap().state, "bb");
        assert_eq!(
            pool.remove(AgentId(2)).unwrap_err(),
            MapError::AgentNotFound(AgentId(2))
        );
        assert_eq!(
            pool.get(AgentId(5)).unwrap_err(),
            MapError::AgentNotFound(AgentId(5))
        );
    }

    #[test]
    fn test_random_activation() {
        let pool: AgentPool<()> =
            (0..20).map(|i| Agent::new(AgentId(i), ())).collect();

        let order = pool.random_activation(&mut Pcg64::seed_from_u64(7));
        let mut sorted = order.clone();
        sorted.sort();
        assert_eq!(sorted, pool.ids().collect::<Vec<_>>());

        // Same seed, same order
        assert_eq!(
            pool.random_activation(&mut Pcg64::seed_from_u64(7)),
            order
        );
    }

    #[test]
    fn test_position_lookup() {
        let mut map = HexMap::hexagon(1, ());
        let agent = Agent::new(AgentId(1), ());
        assert_eq!(
            agent.position(&map).unwrap_err(),
            MapError::AgentNotFound(AgentId(1))
        );

        let coord = HexCoord::new_qr(0, 1);
        map.add(agent.id(), coord).unwrap();
        assert_eq!(agent.position(&map).unwrap(), coord);
        assert!(agent.location(&map).unwrap().contains(agent.id()));
    }
}
