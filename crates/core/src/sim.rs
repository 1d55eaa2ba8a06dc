//! A simple random-walk simulation built on top of [HexMap]. Some cells are
//! blocked off, and a population of walkers wander between random goals,
//! routing around obstacles with A*.

use crate::{
    config::SimulationConfig,
    error::MapError,
    hex::{HexCoord, Orientation},
    map::{Agent, AgentId, AgentPool, HexMap, Location},
    timed,
};
use anyhow::{bail, Context};
use log::{debug, info};
use rand::{seq::SliceRandom, SeedableRng};
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Per-location state for a simulation map
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize,
)]
pub struct Terrain {
    /// Blocked cells can't be stood on or walked through
    pub blocked: bool,
}

impl Terrain {
    pub fn is_open(location: &Location<Self>) -> bool {
        !location.state().blocked
    }
}

/// Per-agent state for a simulation
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Walker {
    /// Where the walker is currently headed
    pub goal: HexCoord,
}

/// What happened during a single tick
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// Number of walkers that moved one cell
    pub moved: usize,
    /// Number of walkers that reached their goal
    pub arrived: usize,
    /// Number of walkers that gave up on an unreachable goal
    pub rerouted: usize,
}

/// A running simulation. All randomness comes from a single RNG seeded from
/// the config, so the same config always produces the same sequence of
/// states.
#[derive(Clone, Debug)]
pub struct Simulation {
    config: SimulationConfig,
    rng: Pcg64,
    map: HexMap<Terrain>,
    walkers: AgentPool<Walker>,
    /// Every cell that isn't blocked, in map order
    open: Vec<HexCoord>,
    tick: u32,
}

impl Simulation {
    /// Set up a new simulation: build the map, block off some cells, and
    /// place the walkers. Returns an error if the config is invalid, or if
    /// there isn't enough open space for all the walkers.
    pub fn new(config: SimulationConfig) -> anyhow::Result<Self> {
        info!("Initializing simulation with config {:#?}", config);
        config.validate().context("invalid config")?;

        let mut rng = Pcg64::seed_from_u64(config.seed);
        let mut map = HexMap::from_config(&config.map, Terrain::default())?;

        let coords: Vec<HexCoord> = map.coords().collect();
        let num_blocked =
            (coords.len() as f64 * config.obstacle_fraction).floor() as usize;
        for coord in coords.choose_multiple(&mut rng, num_blocked) {
            map.state_mut(*coord)?.blocked = true;
        }
        let open: Vec<HexCoord> = map
            .locations()
            .filter(|location| Terrain::is_open(location))
            .map(Location::coord)
            .collect();
        debug!("Blocked {} cells, {} open", num_blocked, open.len());

        if config.agents > open.len() {
            bail!(
                "cannot place {} agents on a map with only {} open cells",
                config.agents,
                open.len()
            );
        }

        let starts: Vec<HexCoord> = open
            .choose_multiple(&mut rng, config.agents)
            .copied()
            .collect();
        let mut walkers = AgentPool::new();
        for (i, start) in starts.into_iter().enumerate() {
            let id = AgentId(i as u64);
            let goal = choose_goal(&open, &mut rng).unwrap_or(start);
            map.add(id, start)?;
            walkers.add(Agent::new(id, Walker { goal }))?;
        }

        Ok(Self {
            config,
            rng,
            map,
            walkers,
            open,
            tick: 0,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn map(&self) -> &HexMap<Terrain> {
        &self.map
    }

    pub fn walkers(&self) -> &AgentPool<Walker> {
        &self.walkers
    }

    /// Number of ticks run so far
    pub fn tick(&self) -> u32 {
        self.tick
    }

    /// Run a single tick. Walkers are activated one at a time, in a random
    /// order. Each one takes a single step along the shortest open path to
    /// its goal. A walker that arrives, or that can't reach its goal, picks a
    /// new goal.
    pub fn step(&mut self) -> Result<TickSummary, MapError> {
        let mut summary = TickSummary::default();
        let max_cost = self.config.max_path_cost;

        for id in self.walkers.random_activation(&mut self.rng) {
            let pos = self.map.position_of(id)?;
            let goal = self.walkers.get(id)?.state.goal;

            let next_goal = match self.map.find_path_between(
                pos,
                goal,
                Terrain::is_open,
                max_cost,
            ) {
                Ok(path) => {
                    // Path includes the start, so the next cell is index 1
                    let next = path[1];
                    self.map.move_agent(id, next)?;
                    summary.moved += 1;
                    if next == goal {
                        summary.arrived += 1;
                        choose_goal(&self.open, &mut self.rng)
                    } else {
                        None
                    }
                }
                // Already there, or there's no way to get there
                Err(MapError::Path(_)) => {
                    summary.rerouted += 1;
                    choose_goal(&self.open, &mut self.rng)
                }
                Err(err) => return Err(err),
            };

            if let Some(next_goal) = next_goal {
                self.walkers.get_mut(id)?.state.goal = next_goal;
            }
        }

        self.tick += 1;
        debug!("Tick {}: {:?}", self.tick, summary);
        Ok(summary)
    }

    /// Run the configured number of ticks
    pub fn run(&mut self) -> Result<(), MapError> {
        let ticks = self.config.ticks;
        timed!(
            format!("Simulating {} ticks", ticks),
            log::Level::Info,
            {
                for _ in 0..ticks {
                    self.step()?;
                }
            }
        );
        Ok(())
    }

    /// Capture the current state of the map in a serializable form
    pub fn snapshot(&self) -> MapSnapshot {
        MapSnapshot::new(&self.map, self.tick)
    }
}

fn choose_goal(open: &[HexCoord], rng: &mut Pcg64) -> Option<HexCoord> {
    open.choose(rng).copied()
}

/// A serializable view of a simulation map at a single point in time. This
/// is intended for external consumers (e.g. a renderer), so every location
/// includes its plane-space position as well.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapSnapshot {
    pub tick: u32,
    pub orientation: Orientation,
    pub locations: Vec<LocationSnapshot>,
}

/// A single location in a [MapSnapshot]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LocationSnapshot {
    pub q: i32,
    pub r: i32,
    pub s: i32,
    pub x: f64,
    pub y: f64,
    pub blocked: bool,
    pub agents: Vec<AgentId>,
}

impl MapSnapshot {
    pub fn new(map: &HexMap<Terrain>, tick: u32) -> Self {
        let orientation = map.orientation();
        let locations = map
            .locations()
            .map(|location| {
                let coord = location.coord();
                let xy = coord.to_cartesian(orientation);
                LocationSnapshot {
                    q: coord.q(),
                    r: coord.r(),
                    s: coord.s(),
                    x: xy.x,
                    y: xy.y,
                    blocked: location.state().blocked,
                    agents: location.agents().iter().copied().collect(),
                }
            })
            .collect();
        Self {
            tick,
            orientation,
            locations,
        }
    }

    /// Serialize the snapshot into JSON
    #[cfg(feature = "json")]
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Load a snapshot from JSON, as produced by [MapSnapshot::to_json]
    #[cfg(feature = "json")]
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
