//! Strongly-typed grid algebra for positions and orientations on the plate grid.
//!
//! The grid uses the same coordinate convention as the source raster: origin in
//! the top left, y increasing downwards. The type system enforces a strict
//! separation between absolute and relative measurements: absolute positions
//! can be subtracted to get a relative displacement but cannot be added to each
//! other, and a displacement can never stand in where an absolute position is
//! expected. All rotation is exact integer arithmetic in 90° steps.

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// A rotation by a multiple of 90 degrees.
///
/// Forms a cyclic group of order four under addition; `Angle::R0` is the
/// additive identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Angle {
    R0,
    R90,
    R180,
    R270,
}

impl Angle {
    fn from_index(index: i32) -> Angle {
        match index.rem_euclid(4) {
            0 => Angle::R0,
            1 => Angle::R90,
            2 => Angle::R180,
            _ => Angle::R270,
        }
    }

    fn index(self) -> i32 {
        match self {
            Angle::R0 => 0,
            Angle::R90 => 1,
            Angle::R180 => 2,
            Angle::R270 => 3,
        }
    }
}

impl Add for Angle {
    type Output = Angle;
    fn add(self, rhs: Angle) -> Angle {
        Angle::from_index(self.index() + rhs.index())
    }
}

impl Sub for Angle {
    type Output = Angle;
    fn sub(self, rhs: Angle) -> Angle {
        Angle::from_index(self.index() - rhs.index())
    }
}

impl Neg for Angle {
    type Output = Angle;
    fn neg(self) -> Angle {
        Angle::from_index(-self.index())
    }
}

/// Integer-multiple scaling, reduced mod 4.
impl Mul<i32> for Angle {
    type Output = Angle;
    fn mul(self, rhs: i32) -> Angle {
        Angle::from_index(self.index().wrapping_mul(rhs))
    }
}

impl Mul<Angle> for i32 {
    type Output = Angle;
    fn mul(self, rhs: Angle) -> Angle {
        rhs * self
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.index() * 90)
    }
}

/// An absolute direction on the grid.
///
/// Bijective with [`Angle`] through a fixed base mapping (`Up` ↔ `R0`,
/// `Right` ↔ `R90`, and so on), which is what makes `Direction ± Angle`
/// and `Direction - Direction` well defined.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub fn from_angle(angle: Angle) -> Direction {
        match angle {
            Angle::R0 => Direction::Up,
            Angle::R90 => Direction::Right,
            Angle::R180 => Direction::Down,
            Angle::R270 => Direction::Left,
        }
    }

    pub fn to_angle(self) -> Angle {
        match self {
            Direction::Up => Angle::R0,
            Direction::Right => Angle::R90,
            Direction::Down => Angle::R180,
            Direction::Left => Angle::R270,
        }
    }
}

/// Rotate a direction: `Direction + Angle -> Direction`.
impl Add<Angle> for Direction {
    type Output = Direction;
    fn add(self, rhs: Angle) -> Direction {
        Direction::from_angle(self.to_angle() + rhs)
    }
}

/// The angle between two directions: `Direction - Direction -> Angle`.
impl Sub for Direction {
    type Output = Angle;
    fn sub(self, rhs: Direction) -> Angle {
        self.to_angle() - rhs.to_angle()
    }
}

/// Rotate a direction backwards: `Direction - Angle -> Direction`.
impl Sub<Angle> for Direction {
    type Output = Direction;
    fn sub(self, rhs: Angle) -> Direction {
        Direction::from_angle(self.to_angle() - rhs)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A relative displacement between two grid coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Vector2 {
    pub x: i32,
    pub y: i32,
}

impl Vector2 {
    pub const fn new(x: i32, y: i32) -> Vector2 {
        Vector2 { x, y }
    }

    /// Rotate by a multiple of 90°. Exact: a 90° step maps (x, y) to (y, -x).
    pub fn rotate(self, angle: Angle) -> Vector2 {
        match angle {
            Angle::R0 => self,
            Angle::R90 => Vector2::new(self.y, -self.x),
            Angle::R180 => Vector2::new(-self.x, -self.y),
            Angle::R270 => Vector2::new(-self.y, self.x),
        }
    }

    /// The unit displacement for a direction.
    ///
    /// Note the raster convention: y grows downwards, so `Up` is +y here,
    /// matching the original description format.
    pub const fn unit(direction: Direction) -> Vector2 {
        match direction {
            Direction::Up => Vector2::new(0, 1),
            Direction::Right => Vector2::new(1, 0),
            Direction::Down => Vector2::new(0, -1),
            Direction::Left => Vector2::new(-1, 0),
        }
    }
}

impl Neg for Vector2 {
    type Output = Vector2;
    fn neg(self) -> Vector2 {
        Vector2::new(-self.x, -self.y)
    }
}

impl Add for Vector2 {
    type Output = Vector2;
    fn add(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector2 {
    type Output = Vector2;
    fn sub(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Component-wise product.
impl Mul for Vector2 {
    type Output = Vector2;
    fn mul(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x * rhs.x, self.y * rhs.y)
    }
}

impl Mul<i32> for Vector2 {
    type Output = Vector2;
    fn mul(self, rhs: i32) -> Vector2 {
        Vector2::new(self.x * rhs, self.y * rhs)
    }
}

impl Mul<Vector2> for i32 {
    type Output = Vector2;
    fn mul(self, rhs: Vector2) -> Vector2 {
        rhs * self
    }
}

impl fmt::Display for Vector2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// An absolute position on the plate grid.
///
/// `Coordinate2 + Coordinate2` and `Vector2 - Coordinate2` are deliberately
/// not implemented: absolute positions only combine with displacements.
/// Ordering is lexicographic on (x, y), i.e. left to right, then top to
/// bottom in raster terms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coordinate2 {
    pub x: i32,
    pub y: i32,
}

impl Coordinate2 {
    pub const fn new(x: i32, y: i32) -> Coordinate2 {
        Coordinate2 { x, y }
    }

    /// The position in grid units as float coordinates, for traced geometry.
    pub fn as_dvec2(self) -> glam::DVec2 {
        glam::dvec2(f64::from(self.x), f64::from(self.y))
    }
}

/// Translate a position: `Coordinate2 + Vector2 -> Coordinate2`.
impl Add<Vector2> for Coordinate2 {
    type Output = Coordinate2;
    fn add(self, rhs: Vector2) -> Coordinate2 {
        Coordinate2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// The displacement between two positions: `Coordinate2 - Coordinate2 -> Vector2`.
impl Sub for Coordinate2 {
    type Output = Vector2;
    fn sub(self, rhs: Coordinate2) -> Vector2 {
        Vector2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Translate a position backwards: `Coordinate2 - Vector2 -> Coordinate2`.
impl Sub<Vector2> for Coordinate2 {
    type Output = Coordinate2;
    fn sub(self, rhs: Vector2) -> Coordinate2 {
        Coordinate2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl fmt::Display for Coordinate2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
