//! This module holds basic types and data structures related to hexagon grids.
//!
//! ## Coordinate Systems
//!
//! There are three coordinate systems in play here. Only the first is used
//! for anything beyond display.
//!
//! ### Hex Coordinates
//!
//! Hex coordinates address cells in an infinite grid of hexagons. The system
//! we use is the [cube coordinate system defined by Amit
//! Patel](https://www.redblobgames.com/grids/hexagons/#coordinates-cube).
//!
//! Each coordinate has three components (`q`, `r`, and `s`). **For any cell
//! coordinate, all three components are integers and `q + r + s = 0`.** Even
//! though the grid is two-dimensional, using three components makes the math
//! around neighbors and distance much simpler. Cells are addressed by
//! [HexCoord], which can never violate the invariant once constructed.
//!
//! Conversions out of plane space produce points that aren't necessarily
//! cell centers, so those are represented by [FractionalHex], which has float
//! components. Float coordinates are only ever compared with a tolerance
//! ([FractionalHex::is_close]), while cell coordinates always use exact
//! equality.
//!
//! ### Cartesian Coordinates
//!
//! Plane space is what a renderer would draw in. `o` (the origin) is the
//! center of the cell `(0, 0, 0)`:
//!
//! +-------------------+
//! |        +y         |
//! |         ^         |
//! |         |         |
//! | -x <----o----> +x |
//! |         |         |
//! |         v         |
//! |        -y         |
//! +-------------------+
//!
//! How cells map into the plane depends on the [Orientation]. With flat-top
//! cells, `x = 1.5q` and `y = √3(r + q/2)`. With pointy-top cells,
//! `x = √3(q + r/2)` and `y = 1.5r`. Both conversions are exactly invertible
//! (up to float error), see [CartesianCoord::to_hex].
//!
//! ### Radial Coordinates
//!
//! A polar `(ρ, θ)` view of a hex coordinate, for laying things out in rings.
//! This is one-way only; see [RadialCoord].
//!
//! ## Regions
//!
//! [HexCoord::region] gives every coordinate within some number of steps,
//! **not including the center**. [HexCoord::hexagon] is the same thing but
//! with the center included. Map domains are typically built from the latter.

mod data_structure;
mod plane;
mod unit;

pub use self::{data_structure::*, plane::*, unit::*};
