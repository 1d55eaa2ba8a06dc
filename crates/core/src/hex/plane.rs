//! Conversions between the hex grid and plane-space coordinate systems. See
//! the parent module documentation for a description of each system.

use crate::hex::{FractionalHex, HexCoord};
use derive_more::{Add, AddAssign, Display, Mul, Sub};
use serde::{Deserialize, Serialize};
use strum::{Display as StrumDisplay, EnumIter, EnumString};

const SQRT_3: f64 = 1.732_050_807_568_877_2_f64;

/// How cells are laid out in plane space. This determines which formula is
/// used to convert between hex and cartesian coordinates.
/// https://www.redblobgames.com/grids/hexagons/#hex-to-pixel
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    EnumString,
    StrumDisplay,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Orientation {
    /// Cells have a flat edge on top, and neighbors in the `q` direction sit
    /// to the left and right
    #[default]
    FlatTop,
    /// Cells have a vertex on top, and neighbors in the `r` direction sit
    /// above and below
    PointyTop,
}

/// A point in plane space. One unit is the distance from a cell's center to
/// any of its vertices.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Display,
    Add,
    Sub,
    Mul,
    AddAssign,
    Serialize,
    Deserialize,
)]
#[display(fmt = "({}, {})", x, y)]
pub struct CartesianCoord {
    pub x: f64,
    pub y: f64,
}

impl CartesianCoord {
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Convert a (possibly fractional) hex coordinate into plane space
    pub fn from_hex(
        hex: impl Into<FractionalHex>,
        orientation: Orientation,
    ) -> Self {
        let hex = hex.into();
        let (q, r) = (hex.q(), hex.r());
        match orientation {
            Orientation::FlatTop => Self::new(1.5 * q, SQRT_3 * (r + q / 2.0)),
            Orientation::PointyTop => {
                Self::new(SQRT_3 * (q + r / 2.0), 1.5 * r)
            }
        }
    }

    /// Convert this point back into hex space. This is the exact inverse of
    /// [Self::from_hex] (up to float error), so the output is fractional. Use
    /// [FractionalHex::round] to get the cell that contains this point.
    pub fn to_hex(self, orientation: Orientation) -> FractionalHex {
        let Self { x, y } = self;
        match orientation {
            Orientation::FlatTop => {
                FractionalHex::new_qr(2.0 / 3.0 * x, y / SQRT_3 - x / 3.0)
            }
            Orientation::PointyTop => {
                FractionalHex::new_qr(x / SQRT_3 - y / 3.0, 2.0 / 3.0 * y)
            }
        }
    }

    /// Euclidean distance between two points
    pub fn distance_to(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<RadialCoord> for CartesianCoord {
    fn from(radial: RadialCoord) -> Self {
        Self::new(
            radial.rho * radial.theta.cos(),
            radial.rho * radial.theta.sin(),
        )
    }
}

/// A polar point, derived from a hex coordinate. This is only intended for
/// display purposes (e.g. laying things out in rings), so there's no way to
/// go from radial back into hex space directly. `theta` is the angle in the
/// [Orientation::FlatTop] plane, in radians.
#[derive(Copy, Clone, Debug, PartialEq, Display, Serialize, Deserialize)]
#[display(fmt = "(ρ={}, θ={})", rho, theta)]
pub struct RadialCoord {
    pub rho: f64,
    pub theta: f64,
}

impl RadialCoord {
    pub fn from_hex(hex: impl Into<FractionalHex>) -> Self {
        let hex = hex.into();
        let (q, r) = (hex.q(), hex.r());
        Self {
            rho: (3.0 * (q * q + q * r + r * r)).sqrt(),
            theta: (SQRT_3 * (q + 2.0 * r)).atan2(3.0 * q),
        }
    }
}

impl HexCoord {
    /// Get the center of this cell in plane space
    pub fn to_cartesian(self, orientation: Orientation) -> CartesianCoord {
        CartesianCoord::from_hex(self, orientation)
    }

    pub fn to_radial(self) -> RadialCoord {
        RadialCoord::from_hex(self)
    }
}

impl FractionalHex {
    pub fn to_cartesian(self, orientation: Orientation) -> CartesianCoord {
        CartesianCoord::from_hex(self, orientation)
    }

    pub fn to_radial(self) -> RadialCoord {
        RadialCoord::from_hex(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use strum::IntoEnumIterator;

    #[test]
    fn test_to_cartesian() {
        let coord = HexCoord::new_qr(2, -1);
        let flat = coord.to_cartesian(Orientation::FlatTop);
        assert_approx_eq!(flat.x, 3.0);
        assert_approx_eq!(flat.y, 0.0);

        let pointy = coord.to_cartesian(Orientation::PointyTop);
        assert_approx_eq!(pointy.x, SQRT_3 * 1.5);
        assert_approx_eq!(pointy.y, -1.5);

        assert_eq!(
            HexCoord::ORIGIN.to_cartesian(Orientation::FlatTop),
            CartesianCoord::ORIGIN
        );
    }

    #[test]
    fn test_round_trip() {
        let coords = [
            FractionalHex::from(HexCoord::ORIGIN),
            FractionalHex::from(HexCoord::new_qr(5, -3)),
            FractionalHex::from(HexCoord::new_qr(-100, 42)),
            FractionalHex::new_qr(0.25, 0.5),
            FractionalHex::new_qr(-3.7, 1.1),
        ];
        for orientation in Orientation::iter() {
            for coord in coords {
                let round_trip =
                    coord.to_cartesian(orientation).to_hex(orientation);
                assert!(
                    round_trip.is_close_default(&coord),
                    "{} != {} ({})",
                    round_trip,
                    coord,
                    orientation
                );
            }
        }
    }

    #[test]
    fn test_neighbor_spacing() {
        // Adjacent cell centers are always √3 apart in plane space
        for orientation in Orientation::iter() {
            let center = HexCoord::new_qr(1, 2);
            for adj in center.adjacents() {
                assert_approx_eq!(
                    center
                        .to_cartesian(orientation)
                        .distance_to(adj.to_cartesian(orientation)),
                    SQRT_3
                );
            }
        }
    }

    #[test]
    fn test_to_radial() {
        let radial = HexCoord::new_qr(1, 0).to_radial();
        assert_approx_eq!(radial.rho, SQRT_3);

        // Radial distance matches plane distance from the origin, and the
        // angle matches the flat top layout
        let coord = HexCoord::new_qr(-2, 3);
        let radial = coord.to_radial();
        let flat = coord.to_cartesian(Orientation::FlatTop);
        assert_approx_eq!(radial.rho, flat.distance_to(CartesianCoord::ORIGIN));
        let back = CartesianCoord::from(radial);
        assert_approx_eq!(back.x, flat.x);
        assert_approx_eq!(back.y, flat.y);
    }

    #[test]
    fn test_orientation_parse() {
        assert_eq!(
            "pointy_top".parse::<Orientation>().unwrap(),
            Orientation::PointyTop
        );
        assert_eq!(Orientation::FlatTop.to_string(), "flat_top");
        assert_eq!(Orientation::default(), Orientation::FlatTop);
    }
}
