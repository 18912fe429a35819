use std::fmt;
use std::ops::{Add, Index, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

use crate::{AlgebraError, float_nearly_equal};

/// Tolerance used by [`Vector3::nearly_equals`] and [`Vector4::nearly_equals`]
/// when callers have no better figure.
pub const VECTOR_TOLERANCE: f32 = 1e-8;

/// Three packed floats: a position, direction or RGB triple.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const UP: Self = Self::new(0.0, 1.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Build from exactly three floats.
    pub fn from_slice(src: &[f32]) -> Result<Self, AlgebraError> {
        match src {
            [x, y, z] => Ok(Self::new(*x, *y, *z)),
            _ => Err(AlgebraError::ElementCount {
                expected: 3,
                found: src.len(),
            }),
        }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    pub fn magnitude(&self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Scale to unit length in place. A vector whose length is nearly zero
    /// becomes the zero vector instead of NaN.
    pub fn normalize(&mut self) -> &mut Self {
        let len = self.magnitude();
        if float_nearly_equal(len, 0.0, VECTOR_TOLERANCE) {
            *self = Self::ZERO;
        } else {
            *self = self.scaled(1.0 / len);
        }
        self
    }

    /// Unit-length copy; see [`Vector3::normalize`].
    pub fn normalized(mut self) -> Self {
        self.normalize();
        self
    }

    pub fn scaled(&self, s: f32) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s)
    }

    pub fn dot(&self, other: &Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn nearly_equals(&self, other: &Self, tolerance: f32) -> bool {
        float_nearly_equal(self.x, other.x, tolerance)
            && float_nearly_equal(self.y, other.y, tolerance)
            && float_nearly_equal(self.z, other.z, tolerance)
    }
}

impl From<[f32; 3]> for Vector3 {
    fn from([x, y, z]: [f32; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl From<Vector4> for Vector3 {
    /// Drops `w`.
    fn from(v: Vector4) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl Add for Vector3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vector3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for Vector3 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<f32> for Vector3 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        self.scaled(rhs)
    }
}

impl Index<usize> for Vector3 {
    type Output = f32;

    fn index(&self, i: usize) -> &f32 {
        match i {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Vector3 index {i} out of range"),
        }
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vector3({:.5}, {:.5}, {:.5})", self.x, self.y, self.z)
    }
}

/// Four packed floats: a homogeneous point (`w = 1`) or direction (`w = 0`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Vector4 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    pub fn point(v: Vector3) -> Self {
        Self::new(v.x, v.y, v.z, 1.0)
    }

    pub fn direction(v: Vector3) -> Self {
        Self::new(v.x, v.y, v.z, 0.0)
    }

    /// Build from exactly four floats.
    pub fn from_slice(src: &[f32]) -> Result<Self, AlgebraError> {
        match src {
            [x, y, z, w] => Ok(Self::new(*x, *y, *z, *w)),
            _ => Err(AlgebraError::ElementCount {
                expected: 4,
                found: src.len(),
            }),
        }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }

    pub fn magnitude(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w).sqrt()
    }

    /// Scale to unit length in place; nearly-zero vectors become zero.
    pub fn normalize(&mut self) -> &mut Self {
        let len = self.magnitude();
        if float_nearly_equal(len, 0.0, VECTOR_TOLERANCE) {
            *self = Self::ZERO;
        } else {
            *self = self.scaled(1.0 / len);
        }
        self
    }

    pub fn scaled(&self, s: f32) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s, self.w * s)
    }

    /// Four-component dot product. Dotting two points (both `w` non-zero) is
    /// usually a mistake, so it is logged.
    pub fn dot(&self, other: &Self) -> f32 {
        if self.w != 0.0 && other.w != 0.0 {
            tracing::warn!(lhs = %self, rhs = %other, "dot product of two points");
        }
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    pub fn nearly_equals(&self, other: &Self, tolerance: f32) -> bool {
        float_nearly_equal(self.x, other.x, tolerance)
            && float_nearly_equal(self.y, other.y, tolerance)
            && float_nearly_equal(self.z, other.z, tolerance)
            && float_nearly_equal(self.w, other.w, tolerance)
    }
}

impl From<[f32; 4]> for Vector4 {
    fn from([x, y, z, w]: [f32; 4]) -> Self {
        Self::new(x, y, z, w)
    }
}

impl Add for Vector4 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.x + rhs.x,
            self.y + rhs.y,
            self.z + rhs.z,
            self.w + rhs.w,
        )
    }
}

impl Index<usize> for Vector4 {
    type Output = f32;

    fn index(&self, i: usize) -> &f32 {
        match i {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            3 => &self.w,
            _ => panic!("Vector4 index {i} out of range"),
        }
    }
}

impl fmt::Display for Vector4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Vector4({:.5}, {:.5}, {:.5}, {:.5})",
            self.x, self.y, self.z, self.w
        )
    }
}
