use std::f32::consts::PI;
use std::fmt;
use std::ops::{Index, Mul};

use serde::{Deserialize, Serialize};

use crate::{AlgebraError, Quaternion, Vector3, Vector4, float_nearly_equal};

const IDENTITY_ELEMENTS: [f32; 16] = [
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, 0.0, 0.0, 1.0,
];

/// 4x4 transform stored column-major: element `(row, col)` is `elements[col * 4 + row]`.
///
/// Setters (`set_*`) overwrite the whole matrix. The matching convenience
/// methods without the prefix build the elementary matrix and left-multiply
/// it, so `m.translate(..).rotate(..)` translates first and rotates second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix4 {
    elements: [f32; 16],
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix4 {
    pub const IDENTITY: Self = Self {
        elements: IDENTITY_ELEMENTS,
    };

    /// Default tolerance for [`Matrix4::nearly_equals`].
    pub const TOLERANCE: f32 = 1e-4;

    pub fn new() -> Self {
        Self::IDENTITY
    }

    pub const fn from_cols_array(elements: [f32; 16]) -> Self {
        Self { elements }
    }

    /// Build from exactly sixteen column-major floats.
    pub fn from_slice(src: &[f32]) -> Result<Self, AlgebraError> {
        let elements: [f32; 16] = src.try_into().map_err(|_| AlgebraError::ElementCount {
            expected: 16,
            found: src.len(),
        })?;
        Ok(Self { elements })
    }

    pub fn elements(&self) -> &[f32; 16] {
        &self.elements
    }

    pub fn to_cols_array(&self) -> [f32; 16] {
        self.elements
    }

    /// Columns as four arrays, the layout GPU uniform blocks expect.
    pub fn to_cols_array_2d(&self) -> [[f32; 4]; 4] {
        let e = &self.elements;
        [
            [e[0], e[1], e[2], e[3]],
            [e[4], e[5], e[6], e[7]],
            [e[8], e[9], e[10], e[11]],
            [e[12], e[13], e[14], e[15]],
        ]
    }

    pub fn nearly_equals(&self, other: &Self, tolerance: f32) -> bool {
        self.elements
            .iter()
            .zip(other.elements.iter())
            .all(|(a, b)| float_nearly_equal(*a, *b, tolerance))
    }

    pub fn set_identity(&mut self) -> &mut Self {
        self.elements = IDENTITY_ELEMENTS;
        self
    }

    pub fn set(&mut self, src: &Self) -> &mut Self {
        self.elements = src.elements;
        self
    }

    /// `self = self * other`.
    pub fn multiply(&mut self, other: &Self) -> &mut Self {
        let a = self.elements;
        let b = other.elements;
        let e = &mut self.elements;
        for row in 0..4 {
            let (a0, a1, a2, a3) = (a[row], a[row + 4], a[row + 8], a[row + 12]);
            for col in 0..4 {
                let c = col * 4;
                e[c + row] = a0 * b[c] + a1 * b[c + 1] + a2 * b[c + 2] + a3 * b[c + 3];
            }
        }
        self
    }

    /// `self = other * self`.
    pub fn multiply_left(&mut self, other: &Self) -> &mut Self {
        let mut product = *other;
        product.multiply(self);
        self.elements = product.elements;
        self
    }

    /// Transform a point (`w = 1`); no perspective divide is applied.
    pub fn multiply_vector3(&self, p: &Vector3) -> Vector3 {
        let e = &self.elements;
        Vector3::new(
            p.x * e[0] + p.y * e[4] + p.z * e[8] + e[12],
            p.x * e[1] + p.y * e[5] + p.z * e[9] + e[13],
            p.x * e[2] + p.y * e[6] + p.z * e[10] + e[14],
        )
    }

    pub fn multiply_vector4(&self, p: &Vector4) -> Vector4 {
        let e = &self.elements;
        Vector4::new(
            p.x * e[0] + p.y * e[4] + p.z * e[8] + p.w * e[12],
            p.x * e[1] + p.y * e[5] + p.z * e[9] + p.w * e[13],
            p.x * e[2] + p.y * e[6] + p.z * e[10] + p.w * e[14],
            p.x * e[3] + p.y * e[7] + p.z * e[11] + p.w * e[15],
        )
    }

    pub fn determinant(&self) -> f32 {
        let s = &self.elements;
        let inv = adjugate(s);
        s[0] * inv[0] + s[1] * inv[4] + s[2] * inv[8] + s[3] * inv[12]
    }

    pub fn transpose(&mut self) -> &mut Self {
        let e = &mut self.elements;
        for (a, b) in [(1, 4), (2, 8), (3, 12), (6, 9), (7, 13), (11, 14)] {
            e.swap(a, b);
        }
        self
    }

    /// Overwrite with the inverse of `other`. A singular `other` leaves
    /// `self` untouched.
    pub fn set_inverse_of(&mut self, other: &Self) -> &mut Self {
        let s = &other.elements;
        let inv = adjugate(s);
        let det = s[0] * inv[0] + s[1] * inv[4] + s[2] * inv[8] + s[3] * inv[12];
        if det == 0.0 {
            return self;
        }
        let rdet = 1.0 / det;
        for (d, v) in self.elements.iter_mut().zip(inv.iter()) {
            *d = v * rdet;
        }
        self
    }

    pub fn invert(&mut self) -> &mut Self {
        let src = *self;
        self.set_inverse_of(&src)
    }

    /// Inverse-transpose of this matrix, used to carry normals through
    /// non-uniform scale.
    pub fn normal_matrix(&self) -> Self {
        let mut m = *self;
        m.invert().transpose();
        m
    }

    pub fn set_scale(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.elements = IDENTITY_ELEMENTS;
        self.elements[0] = x;
        self.elements[5] = y;
        self.elements[10] = z;
        self
    }

    /// Left-multiply a scale.
    pub fn scale(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        let e = &mut self.elements;
        for c in [0, 4, 8, 12] {
            e[c] *= x;
            e[c + 1] *= y;
            e[c + 2] *= z;
        }
        self
    }

    pub fn set_translate(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.elements = IDENTITY_ELEMENTS;
        self.elements[12] = x;
        self.elements[13] = y;
        self.elements[14] = z;
        self
    }

    /// Left-multiply a translation.
    pub fn translate(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        let e = &mut self.elements;
        for c in [0, 4, 8, 12] {
            let w = e[c + 3];
            e[c] += w * x;
            e[c + 1] += w * y;
            e[c + 2] += w * z;
        }
        self
    }

    /// Rotation of `angle` degrees about the axis `(x, y, z)`.
    ///
    /// Pure X, Y and Z axes take a fast path; any other axis is normalized
    /// first. A zero axis yields the identity.
    pub fn set_rotate(&mut self, angle: f32, x: f32, y: f32, z: f32) -> &mut Self {
        let radians = PI * angle / 180.0;
        let mut s = radians.sin();
        let c = radians.cos();
        self.elements = IDENTITY_ELEMENTS;
        let e = &mut self.elements;

        if x != 0.0 && y == 0.0 && z == 0.0 {
            if x < 0.0 {
                s = -s;
            }
            e[5] = c;
            e[9] = -s;
            e[6] = s;
            e[10] = c;
        } else if x == 0.0 && y != 0.0 && z == 0.0 {
            if y < 0.0 {
                s = -s;
            }
            e[0] = c;
            e[8] = s;
            e[2] = -s;
            e[10] = c;
        } else if x == 0.0 && y == 0.0 && z != 0.0 {
            if z < 0.0 {
                s = -s;
            }
            e[0] = c;
            e[4] = -s;
            e[1] = s;
            e[5] = c;
        } else {
            let len = (x * x + y * y + z * z).sqrt();
            if len == 0.0 {
                return self;
            }
            let (x, y, z) = (x / len, y / len, z / len);
            let nc = 1.0 - c;
            let (xy, yz, zx) = (x * y, y * z, z * x);
            let (xs, ys, zs) = (x * s, y * s, z * s);

            e[0] = x * x * nc + c;
            e[1] = xy * nc + zs;
            e[2] = zx * nc - ys;

            e[4] = xy * nc - zs;
            e[5] = y * y * nc + c;
            e[6] = yz * nc + xs;

            e[8] = zx * nc + ys;
            e[9] = yz * nc - xs;
            e[10] = z * z * nc + c;
        }
        self
    }

    /// Left-multiply a rotation of `angle` degrees about `(x, y, z)`.
    pub fn rotate(&mut self, angle: f32, x: f32, y: f32, z: f32) -> &mut Self {
        let mut r = Self::new();
        r.set_rotate(angle, x, y, z);
        self.multiply_left(&r)
    }

    /// Orthographic projection.
    pub fn set_ortho(
        &mut self,
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) -> Result<&mut Self, AlgebraError> {
        check_extents("ortho", left, right, bottom, top, near, far)?;
        let rw = 1.0 / (right - left);
        let rh = 1.0 / (top - bottom);
        let rd = 1.0 / (far - near);

        self.elements = [0.0; 16];
        let e = &mut self.elements;
        e[0] = 2.0 * rw;
        e[5] = 2.0 * rh;
        e[10] = -2.0 * rd;
        e[12] = -(right + left) * rw;
        e[13] = -(top + bottom) * rh;
        e[14] = -(far + near) * rd;
        e[15] = 1.0;
        Ok(self)
    }

    pub fn ortho(
        &mut self,
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) -> Result<&mut Self, AlgebraError> {
        let mut p = Self::new();
        p.set_ortho(left, right, bottom, top, near, far)?;
        Ok(self.multiply_left(&p))
    }

    /// Perspective projection from an arbitrary (possibly off-axis) frustum.
    pub fn set_frustum(
        &mut self,
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) -> Result<&mut Self, AlgebraError> {
        check_extents("frustum", left, right, bottom, top, near, far)?;
        if near <= 0.0 || far <= 0.0 {
            return Err(AlgebraError::NonPositiveClip { near, far });
        }
        let rw = 1.0 / (right - left);
        let rh = 1.0 / (top - bottom);
        let rd = 1.0 / (far - near);

        self.elements = [0.0; 16];
        let e = &mut self.elements;
        e[0] = 2.0 * near * rw;
        e[5] = 2.0 * near * rh;
        e[8] = (right + left) * rw;
        e[9] = (top + bottom) * rh;
        e[10] = -(far + near) * rd;
        e[11] = -1.0;
        e[14] = -2.0 * near * far * rd;
        Ok(self)
    }

    pub fn frustum(
        &mut self,
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) -> Result<&mut Self, AlgebraError> {
        let mut p = Self::new();
        p.set_frustum(left, right, bottom, top, near, far)?;
        Ok(self.multiply_left(&p))
    }

    /// Symmetric perspective projection; `fovy` is the vertical field of view
    /// in degrees.
    pub fn set_perspective(
        &mut self,
        fovy: f32,
        aspect: f32,
        near: f32,
        far: f32,
    ) -> Result<&mut Self, AlgebraError> {
        if near == far {
            return Err(AlgebraError::EmptyExtent {
                projection: "perspective",
                axis: "depth",
            });
        }
        if aspect == 0.0 {
            return Err(AlgebraError::ZeroAspect);
        }
        if near <= 0.0 || far <= 0.0 {
            return Err(AlgebraError::NonPositiveClip { near, far });
        }
        let half = PI * fovy / 360.0;
        let s = half.sin();
        if s == 0.0 {
            return Err(AlgebraError::ZeroFieldOfView(fovy));
        }
        let rd = 1.0 / (far - near);
        let ct = half.cos() / s;

        self.elements = [0.0; 16];
        let e = &mut self.elements;
        e[0] = ct / aspect;
        e[5] = ct;
        e[10] = -(far + near) * rd;
        e[11] = -1.0;
        e[14] = -2.0 * near * far * rd;
        Ok(self)
    }

    pub fn perspective(
        &mut self,
        fovy: f32,
        aspect: f32,
        near: f32,
        far: f32,
    ) -> Result<&mut Self, AlgebraError> {
        let mut p = Self::new();
        p.set_perspective(fovy, aspect, near, far)?;
        Ok(self.multiply_left(&p))
    }

    /// Right-handed view matrix looking from `eye` toward `target`.
    pub fn set_look_at(&mut self, eye: &Vector3, target: &Vector3, up: &Vector3) -> &mut Self {
        let f = (*target - *eye).normalized();
        let s = f.cross(up).normalized();
        let u = s.cross(&f);

        self.elements = [
            s.x, u.x, -f.x, 0.0, //
            s.y, u.y, -f.y, 0.0, //
            s.z, u.z, -f.z, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ];
        let mut t = Self::new();
        t.set_translate(-eye.x, -eye.y, -eye.z);
        self.multiply(&t)
    }

    pub fn look_at(&mut self, eye: &Vector3, target: &Vector3, up: &Vector3) -> &mut Self {
        let mut v = Self::new();
        v.set_look_at(eye, target, up);
        self.multiply_left(&v)
    }

    /// Left-multiply a projection onto `plane` (`ax + by + cz + d = 0`) from a
    /// point light (`w = 1`) or a directional light (`w = 0`).
    pub fn drop_shadow(&mut self, plane: [f32; 4], light: &Vector4) -> &mut Self {
        let l = light.to_array();
        let dot = plane[0] * l[0] + plane[1] * l[1] + plane[2] * l[2] + plane[3] * l[3];

        let mut shadow = Self::new();
        for (col, p) in plane.iter().enumerate() {
            for (row, lr) in l.iter().enumerate() {
                let diagonal = if row == col { dot } else { 0.0 };
                shadow.elements[col * 4 + row] = diagonal - lr * p;
            }
        }
        self.multiply_left(&shadow)
    }

    /// Left-multiply a projection onto the plane through `point` with
    /// `normal`, cast by parallel light travelling along `light`.
    pub fn drop_shadow_directionally(
        &mut self,
        normal: &Vector3,
        point: &Vector3,
        light: &Vector3,
    ) -> &mut Self {
        let d = point.dot(normal);
        self.drop_shadow(
            [normal.x, normal.y, normal.z, -d],
            &Vector4::direction(*light),
        )
    }

    /// Rotation matrix from a unit quaternion given as raw components.
    pub fn set_from_quat_xyzw(&mut self, x: f32, y: f32, z: f32, w: f32) -> &mut Self {
        let (x2, y2, z2) = (x * x, y * y, z * z);
        self.elements = [
            1.0 - 2.0 * (y2 + z2),
            2.0 * (x * y + w * z),
            2.0 * (x * z - w * y),
            0.0,
            2.0 * (x * y - w * z),
            1.0 - 2.0 * (x2 + z2),
            2.0 * (y * z + w * x),
            0.0,
            2.0 * (x * z + w * y),
            2.0 * (y * z - w * x),
            1.0 - 2.0 * (x2 + y2),
            0.0,
            0.0,
            0.0,
            0.0,
            1.0,
        ];
        self
    }

    pub fn set_from_quaternion(&mut self, q: &Quaternion) -> &mut Self {
        self.set_from_quat_xyzw(q.x, q.y, q.z, q.w)
    }

    /// Translation column of an affine transform.
    pub fn translation(&self) -> Vector3 {
        Vector3::new(self.elements[12], self.elements[13], self.elements[14])
    }
}

fn check_extents(
    projection: &'static str,
    left: f32,
    right: f32,
    bottom: f32,
    top: f32,
    near: f32,
    far: f32,
) -> Result<(), AlgebraError> {
    let axis = if left == right {
        "horizontal"
    } else if bottom == top {
        "vertical"
    } else if near == far {
        "depth"
    } else {
        return Ok(());
    };
    Err(AlgebraError::EmptyExtent { projection, axis })
}

/// Classical adjoint of a column-major 4x4 matrix.
fn adjugate(s: &[f32; 16]) -> [f32; 16] {
    let mut inv = [0.0f32; 16];

    inv[0] = s[5] * s[10] * s[15] - s[5] * s[11] * s[14] - s[9] * s[6] * s[15]
        + s[9] * s[7] * s[14]
        + s[13] * s[6] * s[11]
        - s[13] * s[7] * s[10];
    inv[4] = -s[4] * s[10] * s[15] + s[4] * s[11] * s[14] + s[8] * s[6] * s[15]
        - s[8] * s[7] * s[14]
        - s[12] * s[6] * s[11]
        + s[12] * s[7] * s[10];
    inv[8] = s[4] * s[9] * s[15] - s[4] * s[11] * s[13] - s[8] * s[5] * s[15]
        + s[8] * s[7] * s[13]
        + s[12] * s[5] * s[11]
        - s[12] * s[7] * s[9];
    inv[12] = -s[4] * s[9] * s[14] + s[4] * s[10] * s[13] + s[8] * s[5] * s[14]
        - s[8] * s[6] * s[13]
        - s[12] * s[5] * s[10]
        + s[12] * s[6] * s[9];

    inv[1] = -s[1] * s[10] * s[15] + s[1] * s[11] * s[14] + s[9] * s[2] * s[15]
        - s[9] * s[3] * s[14]
        - s[13] * s[2] * s[11]
        + s[13] * s[3] * s[10];
    inv[5] = s[0] * s[10] * s[15] - s[0] * s[11] * s[14] - s[8] * s[2] * s[15]
        + s[8] * s[3] * s[14]
        + s[12] * s[2] * s[11]
        - s[12] * s[3] * s[10];
    inv[9] = -s[0] * s[9] * s[15] + s[0] * s[11] * s[13] + s[8] * s[1] * s[15]
        - s[8] * s[3] * s[13]
        - s[12] * s[1] * s[11]
        + s[12] * s[3] * s[9];
    inv[13] = s[0] * s[9] * s[14] - s[0] * s[10] * s[13] - s[8] * s[1] * s[14]
        + s[8] * s[2] * s[13]
        + s[12] * s[1] * s[10]
        - s[12] * s[2] * s[9];

    inv[2] = s[1] * s[6] * s[15] - s[1] * s[7] * s[14] - s[5] * s[2] * s[15]
        + s[5] * s[3] * s[14]
        + s[13] * s[2] * s[7]
        - s[13] * s[3] * s[6];
    inv[6] = -s[0] * s[6] * s[15] + s[0] * s[7] * s[14] + s[4] * s[2] * s[15]
        - s[4] * s[3] * s[14]
        - s[12] * s[2] * s[7]
        + s[12] * s[3] * s[6];
    inv[10] = s[0] * s[5] * s[15] - s[0] * s[7] * s[13] - s[4] * s[1] * s[15]
        + s[4] * s[3] * s[13]
        + s[12] * s[1] * s[7]
        - s[12] * s[3] * s[5];
    inv[14] = -s[0] * s[5] * s[14] + s[0] * s[6] * s[13] + s[4] * s[1] * s[14]
        - s[4] * s[2] * s[13]
        - s[12] * s[1] * s[6]
        + s[12] * s[2] * s[5];

    inv[3] = -s[1] * s[6] * s[11] + s[1] * s[7] * s[10] + s[5] * s[2] * s[11]
        - s[5] * s[3] * s[10]
        - s[9] * s[2] * s[7]
        + s[9] * s[3] * s[6];
    inv[7] = s[0] * s[6] * s[11] - s[0] * s[7] * s[10] - s[4] * s[2] * s[11]
        + s[4] * s[3] * s[10]
        + s[8] * s[2] * s[7]
        - s[8] * s[3] * s[6];
    inv[11] = -s[0] * s[5] * s[11] + s[0] * s[7] * s[9] + s[4] * s[1] * s[11]
        - s[4] * s[3] * s[9]
        - s[8] * s[1] * s[7]
        + s[8] * s[3] * s[5];
    inv[15] = s[0] * s[5] * s[10] - s[0] * s[6] * s[9] - s[4] * s[1] * s[10]
        + s[4] * s[2] * s[9]
        + s[8] * s[1] * s[6]
        - s[8] * s[2] * s[5];

    inv
}

impl Mul for Matrix4 {
    type Output = Self;

    fn mul(mut self, rhs: Self) -> Self {
        self.multiply(&rhs);
        self
    }
}

impl Index<usize> for Matrix4 {
    type Output = f32;

    fn index(&self, i: usize) -> &f32 {
        &self.elements[i]
    }
}

impl fmt::Display for Matrix4 {
    /// Row by row, five decimals.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let e = &self.elements;
        writeln!(f, "-------------------------")?;
        for row in 0..4 {
            writeln!(
                f,
                "{:.5}\t{:.5}\t{:.5}\t{:.5}",
                e[row],
                e[row + 4],
                e[row + 8],
                e[row + 12]
            )?;
        }
        write!(f, "-------------------------")
    }
}
