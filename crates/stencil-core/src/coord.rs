//! Fixed-point design coordinates.
//!
//! Library components store every location and length as a [`Coord`]: a
//! signed integer where one unit is 1/10000 mil. Arithmetic on coordinates is
//! integer-exact; floating point only appears in the explicit unit
//! conversions and in the rotation helpers that produce screen-bound values.
//!
//! # Overview
//!
//! - [`Coord`] - A single fixed-point value
//! - [`CoordPoint`] - An `(x, y)` pair of coordinates
//! - [`CoordRect`] - A normalized rectangle between two points
//!
//! # Coordinate System
//!
//! Design space uses the mathematical orientation: X grows to the right and
//! Y grows upward. The renderer flips Y when mapping to the screen.
//!
//! ```text
//!    +Y
//!     ▲
//!     │
//!     │
//!   (0,0) ────────► +X
//! ```

use std::{
    fmt,
    ops::{Add, Div, Mul, Neg, Sub},
};

use serde::{Deserialize, Serialize};

/// Raw units per mil.
pub const UNITS_PER_MIL: i32 = 10_000;

/// Millimeters per mil.
const MM_PER_MIL: f64 = 0.0254;

/// Mils per inch.
const MILS_PER_INCH: f64 = 1000.0;

/// A fixed-point design coordinate; one unit is 1/10000 mil.
///
/// # Examples
///
/// ```
/// # use stencil_core::coord::Coord;
/// let pitch = Coord::from_mils(100.0);
/// assert_eq!(pitch.raw(), 1_000_000);
/// assert_eq!((pitch + pitch).to_mils(), 200.0);
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Coord(i32);

impl Coord {
    /// The zero coordinate.
    pub const ZERO: Coord = Coord(0);

    /// Creates a coordinate from raw fixed-point units.
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    /// Returns the raw fixed-point value.
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Creates a coordinate from mils, rounding to the nearest unit.
    pub fn from_mils(mils: f64) -> Self {
        Self((mils * f64::from(UNITS_PER_MIL)).round() as i32)
    }

    /// Creates a coordinate from millimeters, rounding to the nearest unit.
    pub fn from_mm(mm: f64) -> Self {
        Self::from_mils(mm / MM_PER_MIL)
    }

    /// Creates a coordinate from inches, rounding to the nearest unit.
    pub fn from_inches(inches: f64) -> Self {
        Self::from_mils(inches * MILS_PER_INCH)
    }

    /// Converts to mils.
    pub fn to_mils(self) -> f64 {
        f64::from(self.0) / f64::from(UNITS_PER_MIL)
    }

    /// Converts to millimeters.
    pub fn to_mm(self) -> f64 {
        self.to_mils() * MM_PER_MIL
    }

    /// Converts to inches.
    pub fn to_inches(self) -> f64 {
        self.to_mils() / MILS_PER_INCH
    }

    /// Returns the value as `f64` raw units, for screen mapping.
    pub fn to_f64(self) -> f64 {
        f64::from(self.0)
    }

    /// Returns the absolute value.
    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    /// Returns the smaller of two coordinates.
    pub fn min(self, other: Self) -> Self {
        Self(self.0.min(other.0))
    }

    /// Returns the larger of two coordinates.
    pub fn max(self, other: Self) -> Self {
        Self(self.0.max(other.0))
    }
}

impl Add for Coord {
    type Output = Coord;

    fn add(self, rhs: Coord) -> Coord {
        Coord(self.0 + rhs.0)
    }
}

impl Sub for Coord {
    type Output = Coord;

    fn sub(self, rhs: Coord) -> Coord {
        Coord(self.0 - rhs.0)
    }
}

impl Neg for Coord {
    type Output = Coord;

    fn neg(self) -> Coord {
        Coord(-self.0)
    }
}

impl Mul<i32> for Coord {
    type Output = Coord;

    fn mul(self, rhs: i32) -> Coord {
        Coord(self.0 * rhs)
    }
}

impl Div<i32> for Coord {
    type Output = Coord;

    fn div(self, rhs: i32) -> Coord {
        Coord(self.0 / rhs)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}mil", self.to_mils())
    }
}

/// A point in design space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CoordPoint {
    pub x: Coord,
    pub y: Coord,
}

impl CoordPoint {
    /// Creates a point from two coordinates.
    pub const fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }

    /// Creates a point from mil values.
    pub fn from_mils(x: f64, y: f64) -> Self {
        Self::new(Coord::from_mils(x), Coord::from_mils(y))
    }

    /// Creates a point from raw units.
    pub const fn from_raw(x: i32, y: i32) -> Self {
        Self::new(Coord::from_raw(x), Coord::from_raw(y))
    }

    /// Returns this point offset by another.
    pub fn offset(self, dx: Coord, dy: Coord) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Rotates this point about `anchor` by `degrees` (counter-clockwise).
    ///
    /// The result is returned in floating point raw units since a rotated
    /// point rarely lands on the integer grid.
    pub fn rotate_about(self, anchor: CoordPoint, degrees: f64) -> (f64, f64) {
        let (sin, cos) = degrees.to_radians().sin_cos();
        let dx = (self.x - anchor.x).to_f64();
        let dy = (self.y - anchor.y).to_f64();
        (
            anchor.x.to_f64() + dx * cos - dy * sin,
            anchor.y.to_f64() + dx * sin + dy * cos,
        )
    }
}

impl Add for CoordPoint {
    type Output = CoordPoint;

    fn add(self, rhs: CoordPoint) -> CoordPoint {
        CoordPoint::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for CoordPoint {
    type Output = CoordPoint;

    fn sub(self, rhs: CoordPoint) -> CoordPoint {
        CoordPoint::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// A rectangle in design space.
///
/// A `CoordRect` is always normalized: `location1` holds the minimum X/Y and
/// `location2` the maximum, whatever order the corners were given in.
///
/// # Examples
///
/// ```
/// # use stencil_core::coord::{CoordPoint, CoordRect};
/// let rect = CoordRect::new(CoordPoint::from_raw(10, 40), CoordPoint::from_raw(-10, 0));
/// assert_eq!(rect.location1(), CoordPoint::from_raw(-10, 0));
/// assert_eq!(rect.width().raw(), 20);
/// assert_eq!(rect.height().raw(), 40);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "CoordRectRepr", into = "CoordRectRepr")]
pub struct CoordRect {
    location1: CoordPoint,
    location2: CoordPoint,
}

/// Serialized form of [`CoordRect`], normalized on the way in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct CoordRectRepr {
    location1: CoordPoint,
    location2: CoordPoint,
}

impl From<CoordRectRepr> for CoordRect {
    fn from(repr: CoordRectRepr) -> Self {
        CoordRect::new(repr.location1, repr.location2)
    }
}

impl From<CoordRect> for CoordRectRepr {
    fn from(rect: CoordRect) -> Self {
        CoordRectRepr {
            location1: rect.location1,
            location2: rect.location2,
        }
    }
}

impl CoordRect {
    /// Creates a normalized rectangle from two opposite corners.
    pub fn new(a: CoordPoint, b: CoordPoint) -> Self {
        Self {
            location1: CoordPoint::new(a.x.min(b.x), a.y.min(b.y)),
            location2: CoordPoint::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Creates a rectangle centered on `center` with the given size.
    pub fn from_center(center: CoordPoint, width: Coord, height: Coord) -> Self {
        let half = CoordPoint::new(width / 2, height / 2);
        Self::new(center - half, center + half)
    }

    /// Creates the smallest rectangle containing every point, or `None` if
    /// `points` is empty.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = CoordPoint>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self::new(first, first), |rect, point| {
            rect.union(&Self::new(point, point))
        }))
    }

    /// Creates the smallest rectangle containing the given floating point raw
    /// unit coordinates, rounding outward.
    pub fn from_f64_points(points: &[(f64, f64)]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.0, first.1, first.0, first.1);
        for &(x, y) in rest {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }
        // Rotation noise must not widen the rect by a unit.
        let snap = |v: f64, outward: fn(f64) -> f64| {
            if (v - v.round()).abs() < 1e-6 {
                v.round() as i32
            } else {
                outward(v) as i32
            }
        };
        Some(Self::new(
            CoordPoint::from_raw(snap(min_x, f64::floor), snap(min_y, f64::floor)),
            CoordPoint::from_raw(snap(max_x, f64::ceil), snap(max_y, f64::ceil)),
        ))
    }

    /// Returns the minimum corner.
    pub fn location1(&self) -> CoordPoint {
        self.location1
    }

    /// Returns the maximum corner.
    pub fn location2(&self) -> CoordPoint {
        self.location2
    }

    /// Returns the width.
    pub fn width(&self) -> Coord {
        self.location2.x - self.location1.x
    }

    /// Returns the height.
    pub fn height(&self) -> Coord {
        self.location2.y - self.location1.y
    }

    /// Returns the center point (rounded toward negative infinity on odd sizes).
    pub fn center(&self) -> CoordPoint {
        CoordPoint::new(
            self.location1.x + self.width() / 2,
            self.location1.y + self.height() / 2,
        )
    }

    /// Returns `true` if both width and height are zero.
    pub fn is_empty(&self) -> bool {
        self.width() == Coord::ZERO && self.height() == Coord::ZERO
    }

    /// Returns `true` if `point` lies inside or on the edge of the rectangle.
    pub fn contains(&self, point: CoordPoint) -> bool {
        point.x >= self.location1.x
            && point.x <= self.location2.x
            && point.y >= self.location1.y
            && point.y <= self.location2.y
    }

    /// Returns the smallest rectangle containing both rectangles.
    pub fn union(&self, other: &CoordRect) -> CoordRect {
        CoordRect {
            location1: CoordPoint::new(
                self.location1.x.min(other.location1.x),
                self.location1.y.min(other.location1.y),
            ),
            location2: CoordPoint::new(
                self.location2.x.max(other.location2.x),
                self.location2.y.max(other.location2.y),
            ),
        }
    }

    /// Returns this rectangle grown by `amount` on every side.
    pub fn inflate(&self, amount: Coord) -> CoordRect {
        CoordRect::new(
            self.location1.offset(-amount, -amount),
            self.location2.offset(amount, amount),
        )
    }

    /// Returns the four corners in counter-clockwise order starting at
    /// `location1`.
    pub fn corners(&self) -> [CoordPoint; 4] {
        [
            self.location1,
            CoordPoint::new(self.location2.x, self.location1.y),
            self.location2,
            CoordPoint::new(self.location1.x, self.location2.y),
        ]
    }

    /// Rotates the four corners about `anchor` by `degrees`
    /// (counter-clockwise), in the order of [`CoordRect::corners`].
    pub fn rotated_corners(&self, anchor: CoordPoint, degrees: f64) -> [(f64, f64); 4] {
        self.corners()
            .map(|corner| corner.rotate_about(anchor, degrees))
    }

    /// Returns the normalized rectangle enclosing the rotated corners.
    pub fn rotated_bounds(&self, anchor: CoordPoint, degrees: f64) -> CoordRect {
        let corners = self.rotated_corners(anchor, degrees);
        CoordRect::from_f64_points(&corners).unwrap_or(*self)
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_coord_unit_conversions() {
        assert_eq!(Coord::from_mils(1.0).raw(), 10_000);
        assert_eq!(Coord::from_inches(1.0).raw(), 10_000_000);
        assert_approx_eq!(f64, Coord::from_mm(2.54).to_mils(), 100.0, epsilon = 0.0001);
        assert_approx_eq!(f64, Coord::from_mils(100.0).to_mm(), 2.54, epsilon = 1e-9);
        assert_approx_eq!(f64, Coord::from_mils(500.0).to_inches(), 0.5);
    }

    #[test]
    fn test_coord_arithmetic_is_exact() {
        let a = Coord::from_raw(7);
        let b = Coord::from_raw(3);
        assert_eq!((a + b).raw(), 10);
        assert_eq!((a - b).raw(), 4);
        assert_eq!((-a).raw(), -7);
        assert_eq!((a * 3).raw(), 21);
        assert_eq!((a / 2).raw(), 3);
    }

    #[test]
    fn test_coord_rect_normalizes_corners() {
        let rect = CoordRect::new(CoordPoint::from_raw(50, -5), CoordPoint::from_raw(-50, 5));
        assert_eq!(rect.location1(), CoordPoint::from_raw(-50, -5));
        assert_eq!(rect.location2(), CoordPoint::from_raw(50, 5));
        assert_eq!(rect.width().raw(), 100);
        assert_eq!(rect.height().raw(), 10);
        assert_eq!(rect.center(), CoordPoint::from_raw(0, 0));
    }

    #[test]
    fn test_coord_rect_is_empty() {
        assert!(CoordRect::default().is_empty());
        let line = CoordRect::new(CoordPoint::from_raw(0, 0), CoordPoint::from_raw(10, 0));
        assert!(!line.is_empty());
    }

    #[test]
    fn test_coord_rect_deserialize_normalizes() {
        let json = r#"{"location1":{"x":10,"y":10},"location2":{"x":0,"y":0}}"#;
        let rect: CoordRect = serde_json::from_str(json).unwrap();
        assert_eq!(rect.location1(), CoordPoint::from_raw(0, 0));
        assert_eq!(rect.location2(), CoordPoint::from_raw(10, 10));
    }

    #[test]
    fn test_coord_rect_from_points() {
        let rect = CoordRect::from_points([
            CoordPoint::from_raw(3, 9),
            CoordPoint::from_raw(-1, 2),
            CoordPoint::from_raw(5, -4),
        ])
        .unwrap();
        assert_eq!(rect.location1(), CoordPoint::from_raw(-1, -4));
        assert_eq!(rect.location2(), CoordPoint::from_raw(5, 9));
        assert!(CoordRect::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn test_rotated_corners_quarter_turn() {
        let rect = CoordRect::new(CoordPoint::from_raw(0, 0), CoordPoint::from_raw(20, 10));
        let corners = rect.rotated_corners(CoordPoint::from_raw(0, 0), 90.0);
        // (20, 0) rotates onto the positive Y axis.
        assert_approx_eq!(f64, corners[1].0, 0.0, epsilon = 1e-9);
        assert_approx_eq!(f64, corners[1].1, 20.0, epsilon = 1e-9);

        let bounds = rect.rotated_bounds(CoordPoint::from_raw(0, 0), 90.0);
        assert_eq!(bounds.width().raw(), 10);
        assert_eq!(bounds.height().raw(), 20);
    }
}
