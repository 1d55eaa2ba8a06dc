use crate::{hex::HexCoord, map::AgentId};
use std::collections::BTreeSet;

/// A single cell in a [HexMap](crate::HexMap). Each location has a fixed
/// coordinate, some user-defined state `S`, and the set of agents currently
/// standing on it.
///
/// The agent set can only be modified by the map that owns the location,
/// which keeps it in sync with the map's position index.
#[derive(Clone, Debug)]
pub struct Location<S> {
    coord: HexCoord,
    state: S,
    agents: BTreeSet<AgentId>,
}

impl<S> Location<S> {
    pub(super) fn new(coord: HexCoord, state: S) -> Self {
        Self {
            coord,
            state,
            agents: BTreeSet::new(),
        }
    }

    pub fn coord(&self) -> HexCoord {
        self.coord
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub(super) fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    /// Every agent on this location, in ID order
    pub fn agents(&self) -> &BTreeSet<AgentId> {
        &self.agents
    }

    pub fn num_agents(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn contains(&self, id: AgentId) -> bool {
        self.agents.contains(&id)
    }

    /// Returns false if the agent was already here
    pub(super) fn insert_agent(&mut self, id: AgentId) -> bool {
        self.agents.insert(id)
    }

    /// Returns false if the agent wasn't here
    pub(super) fn remove_agent(&mut self, id: AgentId) -> bool {
        self.agents.remove(&id)
    }
}
