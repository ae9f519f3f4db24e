use std::ops::{Add, Div, Mul, Neg, Sub};

/// Two lines are treated as parallel when the cross product of their
/// direction vectors stays below this threshold.
pub const INTERSECTION_EPS: f64 = 1e-12;

// ─────────────────────────────────────────────────────────────────────────────
// Vec2
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    /// Zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    #[must_use]
    pub const fn length_squared(self) -> f64 {
        self.dot(self)
    }

    #[must_use]
    pub const fn dot(self, rhs: Self) -> f64 {
        self.x * rhs.x + self.y * rhs.y
    }

    /// Z component of the 2D cross product.
    #[must_use]
    pub const fn cross(self, rhs: Self) -> f64 {
        self.x * rhs.y - self.y * rhs.x
    }

    #[must_use]
    pub const fn mul_scalar(self, s: f64) -> Self {
        Self::new(self.x * s, self.y * s)
    }
}

impl Default for Vec2 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Vec2 {
    type Output = Self;
    fn div(self, rhs: f64) -> Self::Output {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Vec2 {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Point2
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    /// Origin.
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn distance_to(self, rhs: Self) -> f64 {
        (rhs - self).length()
    }

    /// Point halfway between `self` and `rhs`.
    #[must_use]
    pub fn midpoint(self, rhs: Self) -> Self {
        Self::new((self.x + rhs.x) / 2.0, (self.y + rhs.y) / 2.0)
    }
}

impl Default for Point2 {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl Sub for Point2 {
    type Output = Vec2;
    fn sub(self, rhs: Self) -> Self::Output {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Add<Vec2> for Point2 {
    type Output = Self;
    fn add(self, rhs: Vec2) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub<Vec2> for Point2 {
    type Output = Self;
    fn sub(self, rhs: Vec2) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Line2
// ─────────────────────────────────────────────────────────────────────────────

/// A directed line segment in image pixel space.
///
/// The coordinate system is the screen convention of the markup canvas:
/// x grows to the right, y grows downwards. All angle helpers follow that
/// convention, so an angle of 90 degrees points towards the top of the
/// image. Angles are in degrees in `[0, 360)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line2 {
    pub p1: Point2,
    pub p2: Point2,
}

impl Line2 {
    #[must_use]
    pub const fn new(p1: Point2, p2: Point2) -> Self {
        Self { p1, p2 }
    }

    /// Line of `length` starting at `p1` under `angle` degrees.
    #[must_use]
    pub fn from_angle(p1: Point2, angle: f64, length: f64) -> Self {
        let radians = angle.to_radians();
        let direction = Vec2::new(radians.cos(), -radians.sin());
        Self::new(p1, p1 + direction * length)
    }

    #[must_use]
    pub const fn dx(self) -> f64 {
        self.p2.x - self.p1.x
    }

    #[must_use]
    pub const fn dy(self) -> f64 {
        self.p2.y - self.p1.y
    }

    #[must_use]
    pub fn length(self) -> f64 {
        self.p1.distance_to(self.p2)
    }

    /// Angle of the line in degrees, counter-clockwise from the positive
    /// x-axis with y pointing down. Zero-length lines report 0.
    #[must_use]
    pub fn angle(self) -> f64 {
        let degrees = (-self.dy()).atan2(self.dx()).to_degrees();
        degrees.rem_euclid(360.0)
    }

    /// Directed angle from `self` to `rhs` in degrees, in `[0, 360)`.
    #[must_use]
    pub fn angle_to(self, rhs: Self) -> f64 {
        (rhs.angle() - self.angle()).rem_euclid(360.0)
    }

    /// Angle of the normal vector, 90 degrees counter-clockwise from the
    /// line direction.
    #[must_use]
    pub fn normal_angle(self) -> f64 {
        (self.angle() + 90.0).rem_euclid(360.0)
    }

    /// Intersection point of two lines, both treated as infinite.
    ///
    /// Returns `None` for parallel or degenerate (zero-length) lines.
    #[must_use]
    pub fn intersection(self, rhs: Self) -> Option<Point2> {
        let d1 = self.p2 - self.p1;
        let d2 = rhs.p2 - rhs.p1;
        let denominator = d1.cross(d2);
        if !denominator.is_finite() || denominator.abs() < INTERSECTION_EPS {
            return None;
        }
        let offset = rhs.p1 - self.p1;
        let t = offset.cross(d2) / denominator;
        Some(self.p1 + d1 * t)
    }
}

/// Line through `point` perpendicular to `line`.
///
/// The probe is a short segment anchored at `point` under the angle of the
/// line's normal vector; callers intersect it with other lines treating it
/// as infinite.
#[must_use]
pub fn perpendicular_through(point: Point2, line: Line2) -> Line2 {
    Line2::from_angle(point, line.normal_angle(), 1.0)
}

/// Foot of the perpendicular dropped from `point` onto `line`.
///
/// The line is treated as infinite. Returns `None` when the construction is
/// degenerate (zero-length line).
#[must_use]
pub fn perpendicular_foot(point: Point2, line: Line2) -> Option<Point2> {
    line.intersection(perpendicular_through(point, line))
}
