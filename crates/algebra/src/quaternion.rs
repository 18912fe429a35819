use std::f32::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{AlgebraError, Matrix4, Vector3, float_nearly_equal};

/// Rotation quaternion `(x, y, z, w)` with `w` the real part.
///
/// Matrix conversion and vector rotation assume unit length; other lengths
/// produce meaningless results.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quaternion {
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Default tolerance for [`Quaternion::nearly_equals`].
    pub const TOLERANCE: f32 = 1e-4;

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    pub fn set(&mut self, x: f32, y: f32, z: f32, w: f32) -> &mut Self {
        *self = Self::new(x, y, z, w);
        self
    }

    /// Reset to the identity rotation.
    pub fn clear(&mut self) -> &mut Self {
        *self = Self::IDENTITY;
        self
    }

    /// Recompute `w` so the quaternion has unit length, keeping the sign of
    /// the current `w`.
    pub fn calculate_w(&mut self) -> &mut Self {
        let sign = if self.w > -1e-16 { 1.0 } else { -1.0 };
        self.w = sign * (1.0 - self.x * self.x - self.y * self.y - self.z * self.z).abs().sqrt();
        self
    }

    /// Conjugate in place; the inverse of a unit quaternion.
    pub fn invert(&mut self) -> &mut Self {
        self.x = -self.x;
        self.y = -self.y;
        self.z = -self.z;
        self
    }

    pub fn length(&self) -> f32 {
        self.dot(self).sqrt()
    }

    pub fn dot(&self, other: &Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    /// Scale to unit length; a quaternion of nearly zero length becomes all zeros.
    pub fn normalize(&mut self) -> &mut Self {
        let len = self.length();
        if float_nearly_equal(len, 0.0, 1e-8) {
            self.set(0.0, 0.0, 0.0, 0.0);
        } else {
            let r = 1.0 / len;
            *self = Self::new(self.x * r, self.y * r, self.z * r, self.w * r);
        }
        self
    }

    /// Hamilton product `self * other`: rotating by `other` first, then `self`.
    pub fn multiply(&self, other: &Self) -> Self {
        let (x1, y1, z1, w1) = (self.x, self.y, self.z, self.w);
        let (x2, y2, z2, w2) = (other.x, other.y, other.z, other.w);
        Self::new(
            x1 * w2 + y1 * z2 - z1 * y2 + w1 * x2,
            -x1 * z2 + y1 * w2 + z1 * x2 + w1 * y2,
            x1 * y2 - y1 * x2 + z1 * w2 + w1 * z2,
            -x1 * x2 - y1 * y2 - z1 * z2 + w1 * w2,
        )
    }

    /// Rotation of `angle` degrees about `axis`; the axis need not be unit length.
    pub fn from_axis_angle(axis: &Vector3, angle: f32) -> Self {
        let mut q = Self::IDENTITY;
        q.set_from_axis_angle(axis, angle);
        q
    }

    pub fn set_from_axis_angle(&mut self, axis: &Vector3, angle: f32) -> &mut Self {
        let a = axis.normalized();
        let half = angle * PI / 360.0;
        let s = half.sin();
        self.set(a.x * s, a.y * s, a.z * s, half.cos())
    }

    /// Intrinsic yaw (about Z), then pitch (about Y), then roll (about X), in degrees.
    pub fn from_euler(yaw: f32, pitch: f32, roll: f32) -> Self {
        let mut q = Self::IDENTITY;
        q.set_from_euler(yaw, pitch, roll);
        q
    }

    pub fn set_from_euler(&mut self, yaw: f32, pitch: f32, roll: f32) -> &mut Self {
        let (sy, cy) = (yaw * PI / 360.0).sin_cos();
        let (sp, cp) = (pitch * PI / 360.0).sin_cos();
        let (sr, cr) = (roll * PI / 360.0).sin_cos();
        self.set(
            sr * cp * cy - cr * sp * sy,
            cr * sp * cy + sr * cp * sy,
            cr * cp * sy - sr * sp * cy,
            cr * cp * cy + sr * sp * sy,
        )
    }

    /// Extract the rotation held in the upper 3x3 block of `m`, which must be
    /// free of scale and shear.
    pub fn from_rotation_matrix(m: &Matrix4) -> Self {
        let mut q = Self::IDENTITY;
        q.set_from_rotation_matrix(m);
        q
    }

    pub fn set_from_rotation_matrix(&mut self, m: &Matrix4) -> &mut Self {
        let e = m.elements();
        let (m00, m11, m22) = (e[0], e[5], e[10]);
        self.w = (1.0 + m00 + m11 + m22).max(0.0).sqrt() / 2.0;
        self.x = (1.0 + m00 - m11 - m22).max(0.0).sqrt() / 2.0;
        self.y = (1.0 - m00 + m11 - m22).max(0.0).sqrt() / 2.0;
        self.z = (1.0 - m00 - m11 + m22).max(0.0).sqrt() / 2.0;
        self.x = self.x.copysign(e[6] - e[9]);
        self.y = self.y.copysign(e[8] - e[2]);
        self.z = self.z.copysign(e[1] - e[4]);
        self.normalize()
    }

    /// Rotate `v` by this quaternion (`q v q⁻¹`).
    pub fn multiply_vector3(&self, v: &Vector3) -> Vector3 {
        let (qx, qy, qz, qw) = (self.x, self.y, self.z, self.w);
        let ix = qw * v.x + qy * v.z - qz * v.y;
        let iy = qw * v.y + qz * v.x - qx * v.z;
        let iz = qw * v.z + qx * v.y - qy * v.x;
        let iw = -qx * v.x - qy * v.y - qz * v.z;
        Vector3::new(
            ix * qw + iw * -qx + iy * -qz - iz * -qy,
            iy * qw + iw * -qy + iz * -qx - ix * -qz,
            iz * qw + iw * -qz + ix * -qy - iy * -qx,
        )
    }

    pub fn nearly_equals(&self, other: &Self, tolerance: f32) -> bool {
        float_nearly_equal(self.x, other.x, tolerance)
            && float_nearly_equal(self.y, other.y, tolerance)
            && float_nearly_equal(self.z, other.z, tolerance)
            && float_nearly_equal(self.w, other.w, tolerance)
    }

    /// Spherical linear interpolation from `qa` (`t = 0`) to `qb` (`t = 1`).
    ///
    /// `t` may stray to `[-0.01, 1.01]` for numerical slack. The shorter arc is
    /// taken by negating `qb` when the operands point apart. When the half-angle
    /// cosine reaches 1 in magnitude `qa` is returned as is, and a vanishing
    /// half-angle sine falls back to a component-wise linear blend.
    pub fn slerp(qa: &Self, qb: &Self, t: f32) -> Result<Self, AlgebraError> {
        if !(-0.01..=1.01).contains(&t) {
            return Err(AlgebraError::InterpolantOutOfRange(t));
        }

        let mut cos_half = qa.dot(qb);
        let qm = if cos_half < 0.0 {
            cos_half = -cos_half;
            Self::new(-qb.x, -qb.y, -qb.z, -qb.w)
        } else {
            *qb
        };

        if cos_half.abs() >= 1.0 {
            return Ok(*qa);
        }

        let half_theta = cos_half.acos();
        let sin_half = (1.0 - cos_half * cos_half).sqrt();
        if sin_half.abs() < 0.0001 {
            return Ok(Self::new(
                qa.x + (qm.x - qa.x) * t,
                qa.y + (qm.y - qa.y) * t,
                qa.z + (qm.z - qa.z) * t,
                qa.w + (qm.w - qa.w) * t,
            ));
        }

        let ratio_a = ((1.0 - t) * half_theta).sin() / sin_half;
        let ratio_b = (t * half_theta).sin() / sin_half;
        Ok(Self::new(
            qa.x * ratio_a + qm.x * ratio_b,
            qa.y * ratio_a + qm.y * ratio_b,
            qa.z * ratio_a + qm.z * ratio_b,
            qa.w * ratio_a + qm.w * ratio_b,
        ))
    }
}

impl fmt::Display for Quaternion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Quaternion({:.5}, {:.5}, {:.5}, {:.5})",
            self.x, self.y, self.z, self.w
        )
    }
}
