//! This sub-module contains the basic unit types of the hex coordinate
//! system. See the parent module documentation for more info on the coordinate
//! system.

use crate::{error::CoordError, util::is_close};
use derive_more::{Add, AddAssign, Display, Mul, MulAssign, Neg, Sub};
use serde::{Deserialize, Serialize};
use std::ops;
use strum::{EnumIter, IntoEnumIterator};

/// A single cell in an infinite hex grid, in cube coordinates. See this page
/// for info on how the cube coordinate system works:
/// https://www.redblobgames.com/grids/hexagons/#coordinates-cube
///
/// Every coordinate satisfies `q + r + s = 0`, so we only store `q` and `r`
/// and derive `s` as needed. This means the invariant can never be broken
/// after construction, and we save a third of the memory.
///
/// Ordering is lexicographic on `(q, r, s)`. Since `s` is derived from the
/// other two, comparing `(q, r)` gives the same result.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    Serialize,
    Deserialize,
)]
#[display(fmt = "({}, {}, {})", "self.q()", "self.r()", "self.s()")]
pub struct HexCoord {
    q: i32,
    r: i32,
}

impl HexCoord {
    pub const ORIGIN: Self = Self::new_qr(0, 0);

    /// Construct a coordinate from a raw cube triple. Returns an error if the
    /// triple doesn't fall on the plane `q + r + s = 0`. We never try to
    /// correct a bad triple, since that always indicates a bug in the caller.
    pub fn new(q: i32, r: i32, s: i32) -> Result<Self, CoordError> {
        // Summed wide so extreme components can't overflow
        if i64::from(q) + i64::from(r) + i64::from(s) != 0 {
            Err(CoordError::Malformed {
                q: q.into(),
                r: r.into(),
                s: s.into(),
            })
        } else {
            Ok(Self::new_qr(q, r))
        }
    }

    /// Construct a new coordinate with the given q and r. Since q+r+s=0 for
    /// all coordinates, we can derive s from q & r.
    pub const fn new_qr(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Construct a new coordinate with the given q and s.
    pub const fn new_qs(q: i32, s: i32) -> Self {
        Self::new_qr(q, -q - s)
    }

    /// Construct a new coordinate with the given r and s.
    pub const fn new_rs(r: i32, s: i32) -> Self {
        Self::new_qr(-r - s, r)
    }

    pub fn q(&self) -> i32 {
        self.q
    }

    pub fn r(&self) -> i32 {
        self.r
    }

    pub fn s(&self) -> i32 {
        -(self.q + self.r)
    }

    /// All three components as a tuple, in `(q, r, s)` order
    pub fn as_tuple(&self) -> (i32, i32, i32) {
        (self.q(), self.r(), self.s())
    }

    /// Get the coordinate one step away in the given direction
    pub fn adjacent(self, direction: HexDirection) -> Self {
        self + direction.to_vector()
    }

    /// Get an iterator of all the coordinates directly adjacent to this one.
    /// The iterator will always contain exactly 6 distinct values, in the
    /// order defined by [HexDirection].
    pub fn adjacents(self) -> impl Iterator<Item = HexCoord> {
        HexDirection::iter().map(move |dir| self.adjacent(dir))
    }

    /// Calculate the path distance between two coordinates, meaning the number
    /// of unit steps it takes to get from one to the other. 0 if the
    /// coordinates are equal, 1 if they are adjacent, etc.
    pub fn distance_to(self, other: HexCoord) -> usize {
        // https://www.redblobgames.com/grids/hexagons/#distances
        let (q1, r1, s1) = self.as_wide_tuple();
        let (q2, r2, s2) = other.as_wide_tuple();
        let total = (q1 - q2).abs() + (r1 - r2).abs() + (s1 - s2).abs();
        // Each unit step changes exactly two components by 1
        (total / 2) as usize
    }

    /// Components widened to `i64`, so differences and sums can't overflow
    fn as_wide_tuple(&self) -> (i64, i64, i64) {
        let q = i64::from(self.q);
        let r = i64::from(self.r);
        (q, r, -(q + r))
    }
}

impl ops::Add<HexVector> for HexCoord {
    type Output = HexCoord;

    fn add(self, rhs: HexVector) -> Self::Output {
        Self::new_qr(self.q + rhs.q(), self.r + rhs.r())
    }
}

impl ops::Sub for HexCoord {
    type Output = HexVector;

    fn sub(self, rhs: HexCoord) -> Self::Output {
        HexVector::new_qr(self.q - rhs.q, self.r - rhs.r)
    }
}

/// A translation in the hex grid. This is the same shape as a [HexCoord], but
/// by denoting some values explicitly as vectors rather than coordinates it
/// makes it a bit clearer when shifting coordinates around. Like coordinates,
/// `q + r + s = 0` for all vectors, which means adding a vector to a
/// coordinate always produces another valid coordinate.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Display,
    Add,
    Sub,
    Mul,
    Neg,
    AddAssign,
    MulAssign,
)]
#[display(fmt = "({}, {}, {})", "self.q()", "self.r()", "self.s()")]
pub struct HexVector {
    q: i32,
    r: i32,
}

impl HexVector {
    pub const ZERO: Self = Self::new_qr(0, 0);

    pub const fn new_qr(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    pub fn q(&self) -> i32 {
        self.q
    }

    pub fn r(&self) -> i32 {
        self.r
    }

    pub fn s(&self) -> i32 {
        -(self.q + self.r)
    }
}

/// The 6 directions in which cells line up side-to-side. Iteration order is
/// fixed, and matches the order of [HexCoord::adjacents].
#[derive(
    Copy, Clone, Debug, EnumIter, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum HexDirection {
    /// `(+1, -1, 0)`
    QPosRNeg,
    /// `(+1, 0, -1)`
    QPosSNeg,
    /// `(0, +1, -1)`
    RPosSNeg,
    /// `(-1, +1, 0)`
    QNegRPos,
    /// `(-1, 0, +1)`
    QNegSPos,
    /// `(0, -1, +1)`
    RNegSPos,
}

impl HexDirection {
    /// Get a vector offset that would move a coordinate one cell in this
    /// direction
    pub fn to_vector(self) -> HexVector {
        match self {
            Self::QPosRNeg => HexVector::new_qr(1, -1),
            Self::QPosSNeg => HexVector::new_qr(1, 0),
            Self::RPosSNeg => HexVector::new_qr(0, 1),
            Self::QNegRPos => HexVector::new_qr(-1, 1),
            Self::QNegSPos => HexVector::new_qr(-1, 0),
            Self::RNegSPos => HexVector::new_qr(0, -1),
        }
    }

    /// Get the direction that points directly the other way
    pub fn opposite(self) -> Self {
        match self {
            Self::QPosRNeg => Self::QNegRPos,
            Self::QPosSNeg => Self::QNegSPos,
            Self::RPosSNeg => Self::RNegSPos,
            Self::QNegRPos => Self::QPosRNeg,
            Self::QNegSPos => Self::QPosSNeg,
            Self::RNegSPos => Self::RPosSNeg,
        }
    }
}

/// A cube coordinate with float components. These come out of conversions
/// from other coordinate systems (see [crate::CartesianCoord]), and can refer
/// to any point in the grid, not just cell centers.
///
/// Like [HexCoord], `s` is derived from `q` and `r`, so the components always
/// sum to 0 (within float precision). Because of float error, these values
/// should only be compared with [FractionalHex::is_close], never `==`.
#[derive(Copy, Clone, Debug, PartialEq, Display, Serialize, Deserialize)]
#[display(fmt = "({}, {}, {})", "self.q()", "self.r()", "self.s()")]
pub struct FractionalHex {
    q: f64,
    r: f64,
}

impl FractionalHex {
    /// Default tolerance for [Self::is_close_default], both relative and
    /// absolute
    pub const DEFAULT_TOLERANCE: f64 = 1e-9;

    /// Construct a coordinate from a raw cube triple. Components are allowed
    /// to miss the plane by [Self::DEFAULT_TOLERANCE], to account for float
    /// error.
    pub fn new(q: f64, r: f64, s: f64) -> Result<Self, CoordError> {
        if !is_close(
            q + r + s,
            0.0,
            Self::DEFAULT_TOLERANCE,
            Self::DEFAULT_TOLERANCE,
        ) {
            Err(CoordError::Malformed { q, r, s })
        } else {
            Ok(Self::new_qr(q, r))
        }
    }

    pub const fn new_qr(q: f64, r: f64) -> Self {
        Self { q, r }
    }

    pub fn q(&self) -> f64 {
        self.q
    }

    pub fn r(&self) -> f64 {
        self.r
    }

    pub fn s(&self) -> f64 {
        -(self.q + self.r)
    }

    pub fn as_tuple(&self) -> (f64, f64, f64) {
        (self.q(), self.r(), self.s())
    }

    /// Check if two coordinates are close to each other. Each component is
    /// compared individually, using both a relative and an absolute
    /// tolerance. See [crate::util::is_close] for the exact formula.
    pub fn is_close(&self, other: &Self, rel_tol: f64, abs_tol: f64) -> bool {
        is_close(self.q(), other.q(), rel_tol, abs_tol)
            && is_close(self.r(), other.r(), rel_tol, abs_tol)
            && is_close(self.s(), other.s(), rel_tol, abs_tol)
    }

    /// [Self::is_close] with the default tolerances
    pub fn is_close_default(&self, other: &Self) -> bool {
        self.is_close(
            other,
            Self::DEFAULT_TOLERANCE,
            Self::DEFAULT_TOLERANCE,
        )
    }

    /// Round to the cell that contains this point. Rounding each component
    /// individually can break the `q + r + s = 0` invariant, so we throw away
    /// the component that moved the most and derive it from the other two.
    /// https://www.redblobgames.com/grids/hexagons/#rounding
    pub fn round(&self) -> HexCoord {
        let (q, r, s) = self.as_tuple();
        let (rq, rr, rs) = (q.round(), r.round(), s.round());
        let q_diff = (rq - q).abs();
        let r_diff = (rr - r).abs();
        let s_diff = (rs - s).abs();

        if q_diff > r_diff && q_diff > s_diff {
            HexCoord::new_rs(rr as i32, rs as i32)
        } else if r_diff > s_diff {
            HexCoord::new_qs(rq as i32, rs as i32)
        } else {
            HexCoord::new_qr(rq as i32, rr as i32)
        }
    }

    /// Distance between two float coordinates. Same formula as
    /// [HexCoord::distance_to].
    pub fn distance_to(&self, other: &Self) -> f64 {
        ((self.q() - other.q()).abs()
            + (self.r() - other.r()).abs()
            + (self.s() - other.s()).abs())
            / 2.0
    }
}

impl From<HexCoord> for FractionalHex {
    fn from(other: HexCoord) -> Self {
        Self::new_qr(other.q().into(), other.r().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_new_validation() {
        assert_eq!(HexCoord::new(1, -1, 0).unwrap(), HexCoord::new_qr(1, -1));
        assert_eq!(HexCoord::new(0, 0, 0).unwrap(), HexCoord::ORIGIN);
        assert!(matches!(
            HexCoord::new(1, 1, 1),
            Err(CoordError::Malformed { .. })
        ));
        // Components that would overflow if summed as i32
        assert_eq!(
            HexCoord::new(i32::MAX, i32::MAX, 0),
            Err(CoordError::Malformed {
                q: i32::MAX.into(),
                r: i32::MAX.into(),
                s: 0.0,
            })
        );
        assert!(HexCoord::new(i32::MIN, i32::MIN, i32::MIN).is_err());
        assert_eq!(
            HexCoord::new(i32::MAX, i32::MIN, 1).unwrap(),
            HexCoord::new_qr(i32::MAX, i32::MIN)
        );
        assert!(FractionalHex::new(0.5, 0.25, -0.75).is_ok());
        assert!(FractionalHex::new(0.5, 0.25, 0.75).is_err());
    }

    #[test]
    fn test_alternate_constructors() {
        let c = HexCoord::new_qr(2, -3);
        assert_eq!(c.s(), 1);
        assert_eq!(HexCoord::new_qs(2, 1), c);
        assert_eq!(HexCoord::new_rs(-3, 1), c);
        assert_eq!(c.to_string(), "(2, -3, 1)");
    }

    #[test]
    fn test_distance_to() {
        let p0 = HexCoord::ORIGIN;
        let p1 = HexCoord::new_qr(-1, 1);
        let p2 = HexCoord::new_qr(2, -1);
        let p3 = HexCoord::new_qr(2, -3);

        assert_eq!(p0.distance_to(p0), 0);
        assert_eq!(p3.distance_to(p3), 0);

        assert_eq!(p0.distance_to(p1), 1);
        assert_eq!(p0.distance_to(p2), 2);
        assert_eq!(p0.distance_to(p3), 3);

        assert_eq!(p1.distance_to(p2), 3);
        assert_eq!(p1.distance_to(p3), 4);
        assert_eq!(p2.distance_to(p3), 2);
    }

    #[test]
    fn test_distance_to_large() {
        let far = 1_000_000_000;
        let a = HexCoord::new_qr(far, 0);
        let b = HexCoord::new_qr(-far, 0);
        assert_eq!(a.distance_to(b), 2_000_000_000);
        assert_eq!(b.distance_to(a), 2_000_000_000);

        let corner = HexCoord::new_qr(i32::MAX, i32::MIN);
        assert_eq!(corner.distance_to(HexCoord::ORIGIN), 2_147_483_648);
    }

    #[test]
    fn test_adjacents() {
        let center = HexCoord::new_qr(3, -7);
        let adjacents: Vec<HexCoord> = center.adjacents().collect();
        assert_eq!(adjacents.len(), 6);
        assert_eq!(adjacents.iter().collect::<HashSet<_>>().len(), 6);
        for adj in adjacents {
            assert_eq!(adj.q() + adj.r() + adj.s(), 0);
            assert_eq!(center.distance_to(adj), 1);
        }

        // First direction is (1, -1, 0)
        assert_eq!(
            HexCoord::ORIGIN.adjacents().next(),
            Some(HexCoord::new(1, -1, 0).unwrap())
        );
    }

    #[test]
    fn test_opposite() {
        for dir in HexDirection::iter() {
            assert_eq!(dir.opposite().opposite(), dir);
            assert_eq!(
                dir.to_vector() + dir.opposite().to_vector(),
                HexVector::ZERO
            );
        }
    }

    #[test]
    fn test_ordering() {
        let mut coords = vec![
            HexCoord::new_qr(1, -1),
            HexCoord::new_qr(-1, 0),
            HexCoord::new_qr(0, 1),
            HexCoord::new_qr(0, -1),
        ];
        coords.sort();
        assert_eq!(
            coords,
            vec![
                HexCoord::new_qr(-1, 0),
                HexCoord::new_qr(0, -1),
                HexCoord::new_qr(0, 1),
                HexCoord::new_qr(1, -1),
            ]
        );
    }

    #[test]
    fn test_round() {
        assert_eq!(
            FractionalHex::new_qr(0.1, -0.2).round(),
            HexCoord::ORIGIN
        );
        // (1, 0, -1) is 0.6 away, (1, -1, 0) is 0.8 away
        assert_eq!(
            FractionalHex::new_qr(1.4, -0.6).round(),
            HexCoord::new_qr(1, 0)
        );
        // s moves furthest: (2.1, -0.8, -1.3) rounds to (2, -1, -1)
        assert_eq!(
            FractionalHex::new_qr(2.1, -0.8).round(),
            HexCoord::new_qr(2, -1)
        );
        // r moves furthest: (0.9, 0.45, -1.35) rounds to (1, 0, -1)
        assert_eq!(
            FractionalHex::new_qr(0.9, 0.45).round(),
            HexCoord::new_qr(1, 0)
        );
        // q moves furthest, so it gets derived from r and s
        let rounded = FractionalHex::new_qr(0.5, 0.4).round();
        assert_eq!(rounded.q() + rounded.r() + rounded.s(), 0);
        assert_eq!(
            rounded,
            HexCoord::ORIGIN.adjacent(HexDirection::QPosSNeg)
        );
    }

    #[test]
    fn test_serde() {
        use serde_test::{assert_tokens, Token};
        assert_tokens(
            &HexCoord::new_qr(1, -2),
            &[
                Token::Struct {
                    name: "HexCoord",
                    len: 2,
                },
                Token::Str("q"),
                Token::I32(1),
                Token::Str("r"),
                Token::I32(-2),
                Token::StructEnd,
            ],
        );
    }
}
