//! Hexsim is a toolkit for agent-based simulations on hexagonal grids. This
//! crate contains the grid math, the pathfinder, and a spatial index that
//! tracks which agents are where. Presentation layers are implemented
//! elsewhere.
//!
//! ```
//! use hexsim::{AgentId, HexCoord, HexMap};
//!
//! let mut map = HexMap::hexagon(2, ());
//! let id = AgentId(1);
//! map.add(id, HexCoord::ORIGIN).unwrap();
//! map.move_agent(id, HexCoord::new_qr(1, -1)).unwrap();
//!
//! let path = map
//!     .find_path(id, HexCoord::new_qr(2, -2), |_| true, None)
//!     .unwrap();
//! assert_eq!(path.len(), 2);
//! ```
//!
//! See [SimulationConfig] for details on how a full simulation can be
//! customized.

mod config;
mod error;
pub mod hex;
pub mod map;
pub mod path;
mod sim;
mod util;

pub use crate::{
    config::{MapConfig, SimulationConfig},
    error::{CoordError, MapError, PathError},
    hex::{
        CartesianCoord, FractionalHex, HexCoord, HexDirection, Orientation,
        RadialCoord,
    },
    map::{Agent, AgentId, AgentPool, HexMap, Location},
    path::{find_path, PathNode},
    sim::{
        LocationSnapshot, MapSnapshot, Simulation, Terrain, TickSummary, Walker,
    },
    util::is_close,
};
