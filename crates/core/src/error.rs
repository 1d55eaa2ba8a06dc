//! Error types for every fallible operation in the crate. Each error is a
//! deterministic function of the inputs and current state, so nothing in
//! here is worth retrying without changing the arguments.

use crate::{hex::HexCoord, map::AgentId};
use std::fmt::{Debug, Display};
use thiserror::Error;

/// An error constructing a coordinate from raw components
#[derive(Copy, Clone, Debug, PartialEq, Error)]
pub enum CoordError {
    /// The components don't fall on the plane `q + r + s = 0`
    #[error(
        "invalid hex coordinate ({q}, {r}, {s}); must be on the plane q+r+s=0"
    )]
    Malformed { q: f64, r: f64, s: f64 },
}

/// An error from the pathfinder. These are both expected outcomes that a
/// caller has to handle ("already there" vs "can't get there"), not faults.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum PathError<N: Debug + Display> {
    /// Asked for a path from a node to itself. This usually means the caller
    /// forgot to check whether it already arrived.
    #[error("cannot find path from {0} to itself")]
    SourceEqualsDestination(N),

    /// Every reachable node was searched without finding the goal
    #[error("no path found from {start} to {goal}")]
    NoPathFound { start: N, goal: N },
}

/// An error from a [crate::HexMap] operation
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum MapError {
    /// Position is outside the map's domain
    #[error("position {0} is out of bounds")]
    OutOfBounds(HexCoord),

    /// Tried to add an agent that's already on the map
    #[error("agent {0} is already registered")]
    AgentAlreadyRegistered(AgentId),

    /// Referenced an agent that isn't on the map (or in the pool)
    #[error("agent {0} does not exist")]
    AgentNotFound(AgentId),

    #[error(transparent)]
    Path(#[from] PathError<HexCoord>),
}
