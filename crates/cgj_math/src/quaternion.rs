//! Rotation quaternions.
//!
//! A quaternion is stored as `(t, x, y, z)`: `t` is the real (scalar) part and
//! `(x, y, z)` the vector part. Only unit quaternions represent rotations;
//! `normalize` restores that invariant after arithmetic.

use std::fmt;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg};

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::{
    approx_eq, clean_float, deg_to_rad, rad_to_deg, MathResult, Matrix4, Vector3, Vector4,
    QUATERNION_THRESHOLD,
};

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable, Serialize, Deserialize)]
pub struct Quaternion {
    pub t: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// A rotation expressed as an angle in degrees about a unit axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleAxis {
    pub angle: f32,
    pub axis: Vector3,
}

impl Quaternion {
    /// No rotation.
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 0.0);

    pub const fn new(t: f32, x: f32, y: f32, z: f32) -> Self {
        Self { t, x, y, z }
    }

    /// Every component set to `value`.
    pub const fn splat(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    /// Rotation of `angle` degrees about `axis`.
    ///
    /// A zero-length axis has no direction to rotate about; it is logged and
    /// treated as no rotation. Use [`Self::try_from_angle_axis`] to get the
    /// error instead.
    pub fn from_angle_axis(angle: f32, axis: Vector3) -> Self {
        match Self::try_from_angle_axis(angle, axis) {
            Ok(q) => q,
            Err(err) => {
                log::warn!("from_angle_axis({angle}, {axis}): {err}; using identity");
                Self::IDENTITY
            }
        }
    }

    pub fn try_from_angle_axis(angle: f32, axis: Vector3) -> MathResult<Self> {
        let axis = axis.try_normalize()?;
        let (sin, cos) = (deg_to_rad(angle) / 2.0).sin_cos();
        let mut q = Self::new(cos, axis.x * sin, axis.y * sin, axis.z * sin);
        q.clean();
        Ok(q.normalize())
    }

    /// Angle (degrees) and unit axis of this rotation.
    ///
    /// Near the identity the axis is undefined; `(1, 0, 0)` is returned when
    /// `sqrt(1 - t²)` drops below the quaternion threshold.
    pub fn to_angle_axis(&self) -> AngleAxis {
        let qn = self.normalize();
        let t = qn.t.clamp(-1.0, 1.0);
        let angle = rad_to_deg(2.0 * t.acos());
        let s = (1.0 - t * t).max(0.0).sqrt();
        let axis = if s < QUATERNION_THRESHOLD {
            Vector3::X
        } else {
            Vector3::new(qn.x / s, qn.y / s, qn.z / s)
        };
        AngleAxis { angle, axis }
    }

    pub fn dot(&self, other: &Self) -> f32 {
        self.t * other.t + self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Norm, snapped to the nearest integer within the quaternion threshold.
    pub fn length(&self) -> f32 {
        clean_float(self.dot(self).sqrt(), QUATERNION_THRESHOLD)
    }

    /// Unit quaternion; the zero quaternion normalizes to the identity.
    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len == 0.0 || !len.is_finite() {
            return Self::IDENTITY;
        }
        *self * (1.0 / len)
    }

    pub fn conjugate(&self) -> Self {
        Self::new(self.t, -self.x, -self.y, -self.z)
    }

    /// Multiplicative inverse, `conjugate / |q|²`.
    ///
    /// For unit quaternions this is the conjugate. The zero quaternion has no
    /// inverse and yields the identity.
    pub fn inverse(&self) -> Self {
        let norm = self.dot(self);
        if norm == 0.0 || !norm.is_finite() {
            return Self::IDENTITY;
        }
        let mut q = self.conjugate() * (1.0 / norm);
        q.clean();
        q
    }

    /// Normalized linear interpolation along the shorter arc.
    pub fn lerp(&self, other: &Self, k: f32) -> Self {
        let k0 = 1.0 - k;
        let k1 = if self.dot(other) > 0.0 { k } else { -k };
        let q = *self * clean_float(k0, QUATERNION_THRESHOLD)
            + *other * clean_float(k1, QUATERNION_THRESHOLD);
        q.normalize()
    }

    /// Spherical interpolation along the shorter arc.
    ///
    /// When both rotations coincide `sin(angle)` is zero; that case falls back
    /// to [`Self::lerp`].
    pub fn slerp(&self, other: &Self, k: f32) -> Self {
        let mut cos_angle = self.dot(other);
        let mut target = *other;
        if cos_angle < 0.0 {
            cos_angle = -cos_angle;
            target = -target;
        }
        let angle = cos_angle.clamp(-1.0, 1.0).acos();
        let sin_angle = angle.sin();
        if sin_angle.abs() < QUATERNION_THRESHOLD {
            return self.lerp(&target, k);
        }
        let k0 = ((1.0 - k) * angle).sin() / sin_angle;
        let k1 = (k * angle).sin() / sin_angle;
        (*self * k0 + target * k1).normalize()
    }

    /// Snap components within the quaternion threshold of an integer.
    pub fn clean(&mut self) {
        self.t = clean_float(self.t, QUATERNION_THRESHOLD);
        self.x = clean_float(self.x, QUATERNION_THRESHOLD);
        self.y = clean_float(self.y, QUATERNION_THRESHOLD);
        self.z = clean_float(self.z, QUATERNION_THRESHOLD);
    }

    /// Rotate `v` by conjugation: `q · (0, v) · q*`.
    pub fn rotate_vector(&self, v: Vector3) -> Vector3 {
        let q = self.normalize();
        let p = q * Self::new(0.0, v.x, v.y, v.z) * q.conjugate();
        Vector3::new(p.x, p.y, p.z)
    }

    /// Equivalent 4×4 rotation matrix (column-vector convention).
    ///
    /// Agrees with `MatrixFactory::rodrigues4(axis, angle)` for the same
    /// angle-axis pair and with [`Self::rotate_vector`].
    pub fn to_matrix(&self) -> Matrix4 {
        let Self { t, x, y, z } = self.normalize();
        let (xx, yy, zz) = (x * x, y * y, z * z);
        let (xy, xz, yz) = (x * y, x * z, y * z);
        let (tx, ty, tz) = (t * x, t * y, t * z);

        Matrix4::from_rows([
            Vector4::new(1.0 - 2.0 * (yy + zz), 2.0 * (xy - tz), 2.0 * (xz + ty), 0.0),
            Vector4::new(2.0 * (xy + tz), 1.0 - 2.0 * (xx + zz), 2.0 * (yz - tx), 0.0),
            Vector4::new(2.0 * (xz - ty), 2.0 * (yz + tx), 1.0 - 2.0 * (xx + yy), 0.0),
            Vector4::new(0.0, 0.0, 0.0, 1.0),
        ])
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl PartialEq for Quaternion {
    fn eq(&self, other: &Self) -> bool {
        approx_eq(self.t, other.t, QUATERNION_THRESHOLD)
            && approx_eq(self.x, other.x, QUATERNION_THRESHOLD)
            && approx_eq(self.y, other.y, QUATERNION_THRESHOLD)
            && approx_eq(self.z, other.z, QUATERNION_THRESHOLD)
    }
}

/// `w` becomes the scalar part.
impl From<Vector4> for Quaternion {
    fn from(v: Vector4) -> Self {
        Self::new(v.w, v.x, v.y, v.z)
    }
}

impl From<Quaternion> for Vector4 {
    fn from(q: Quaternion) -> Self {
        Vector4::new(q.x, q.y, q.z, q.t)
    }
}

impl From<Quaternion> for Matrix4 {
    fn from(q: Quaternion) -> Self {
        q.to_matrix()
    }
}

impl Neg for Quaternion {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.t, -self.x, -self.y, -self.z)
    }
}

impl Add for Quaternion {
    type Output = Self;

    fn add(self, q: Self) -> Self {
        Self::new(self.t + q.t, self.x + q.x, self.y + q.y, self.z + q.z)
    }
}

impl AddAssign for Quaternion {
    fn add_assign(&mut self, q: Self) {
        *self = *self + q;
    }
}

impl Mul<f32> for Quaternion {
    type Output = Self;

    fn mul(self, scalar: f32) -> Self {
        Self::new(self.t * scalar, self.x * scalar, self.y * scalar, self.z * scalar)
    }
}

impl MulAssign<f32> for Quaternion {
    fn mul_assign(&mut self, scalar: f32) {
        *self = *self * scalar;
    }
}

/// Hamilton product. `a * b` applies `b` first, then `a`.
impl Mul for Quaternion {
    type Output = Self;

    fn mul(self, q: Self) -> Self {
        Self::new(
            self.t * q.t - self.x * q.x - self.y * q.y - self.z * q.z,
            self.t * q.x + self.x * q.t + self.y * q.z - self.z * q.y,
            self.t * q.y + self.y * q.t + self.z * q.x - self.x * q.z,
            self.t * q.z + self.z * q.t + self.x * q.y - self.y * q.x,
        )
    }
}

impl MulAssign for Quaternion {
    fn mul_assign(&mut self, q: Self) {
        *self = *self * q;
    }
}

impl fmt::Display for Quaternion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.t, self.x, self.y, self.z)
    }
}

impl fmt::Display for AngleAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "angle = {}, axis = {}", self.angle, self.axis)
    }
}
