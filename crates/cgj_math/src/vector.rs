//! Fixed-size single-precision vectors.
//!
//! Equality is approximate: two vectors compare equal when every component
//! differs by less than [`EPSILON`](crate::EPSILON).

use std::fmt;
use std::ops::{Add, AddAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign};

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::{approx_eq, clean_float, MathError, MathResult, EPSILON};

/// A 2-component vector.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

/// A 3-component vector.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// A 4-component vector, defaulting to the homogeneous point `(0, 0, 0, 1)`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vector4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

macro_rules! impl_vector {
    ($name:ident, $len:literal, $($field:ident),+) => {
        impl $name {
            /// Number of components.
            pub const LEN: usize = $len;

            /// All components zero.
            pub const ZERO: Self = Self::splat(0.0);

            /// All components one.
            pub const ONE: Self = Self::splat(1.0);

            pub const fn new($($field: f32),+) -> Self {
                Self { $($field),+ }
            }

            /// Create a vector with every component set to `value`.
            pub const fn splat(value: f32) -> Self {
                Self { $($field: value),+ }
            }

            pub fn to_array(self) -> [f32; $len] {
                [$(self.$field),+]
            }

            /// Bounds-checked component access.
            pub fn get(&self, index: usize) -> MathResult<f32> {
                self.to_array()
                    .get(index)
                    .copied()
                    .ok_or(MathError::InvalidIndex { index, len: $len })
            }

            pub fn dot(self, other: Self) -> f32 {
                0.0 $(+ self.$field * other.$field)+
            }

            pub fn length_squared(self) -> f32 {
                self.dot(self)
            }

            /// Euclidean norm.
            pub fn length(self) -> f32 {
                self.length_squared().sqrt()
            }

            /// Unit vector in the same direction.
            ///
            /// A zero-length vector normalizes to the zero vector instead of
            /// producing NaN. Use [`Self::try_normalize`] to detect that case.
            pub fn normalize(self) -> Self {
                self.try_normalize().unwrap_or(Self::ZERO)
            }

            /// Unit vector in the same direction, or `ZeroLength`.
            pub fn try_normalize(self) -> MathResult<Self> {
                let len = self.length();
                if len == 0.0 || !len.is_finite() {
                    return Err(MathError::ZeroLength);
                }
                Ok(Self { $($field: self.$field / len),+ })
            }

            /// Linear interpolation: `self * (1 - t) + other * t`.
            pub fn lerp(self, other: Self, t: f32) -> Self {
                self * (1.0 - t) + other * t
            }

            /// Spherical-linear interpolation between two directions.
            ///
            /// Falls back to [`Self::lerp`] when the vectors are (anti)parallel
            /// or zero-length, where `sin(angle)` would be a zero divisor.
            pub fn slerp(self, other: Self, t: f32) -> Self {
                let lengths = self.length() * other.length();
                if lengths == 0.0 {
                    return self.lerp(other, t);
                }
                let angle = (self.dot(other) / lengths).clamp(-1.0, 1.0).acos();
                let sin_angle = angle.sin();
                if sin_angle.abs() < EPSILON {
                    return self.lerp(other, t);
                }
                let k0 = ((1.0 - t) * angle).sin() / sin_angle;
                let k1 = (t * angle).sin() / sin_angle;
                self * k0 + other * k1
            }

            /// Snap components that are within `EPSILON` of an integer.
            pub fn clean(&mut self) {
                $(self.$field = clean_float(self.$field, EPSILON);)+
            }

            pub fn as_slice(&self) -> &[f32] {
                bytemuck::cast_slice(std::slice::from_ref(self))
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                true $(&& approx_eq(self.$field, other.$field, EPSILON))+
            }
        }

        impl Index<usize> for $name {
            type Output = f32;

            fn index(&self, index: usize) -> &f32 {
                match self.as_slice().get(index) {
                    Some(value) => value,
                    None => panic!("{}", MathError::InvalidIndex { index, len: $len }),
                }
            }
        }

        impl IndexMut<usize> for $name {
            fn index_mut(&mut self, index: usize) -> &mut f32 {
                let components: &mut [f32; $len] = bytemuck::cast_mut(self);
                match components.get_mut(index) {
                    Some(value) => value,
                    None => panic!("{}", MathError::InvalidIndex { index, len: $len }),
                }
            }
        }

        impl From<[f32; $len]> for $name {
            fn from(array: [f32; $len]) -> Self {
                bytemuck::cast(array)
            }
        }

        impl Neg for $name {
            type Output = Self;

            fn neg(self) -> Self {
                Self { $($field: -self.$field),+ }
            }
        }

        impl Add for $name {
            type Output = Self;

            fn add(self, other: Self) -> Self {
                Self { $($field: self.$field + other.$field),+ }
            }
        }

        impl AddAssign for $name {
            fn add_assign(&mut self, other: Self) {
                *self = *self + other;
            }
        }

        impl Sub for $name {
            type Output = Self;

            fn sub(self, other: Self) -> Self {
                Self { $($field: self.$field - other.$field),+ }
            }
        }

        impl SubAssign for $name {
            fn sub_assign(&mut self, other: Self) {
                *self = *self - other;
            }
        }

        impl Mul<f32> for $name {
            type Output = Self;

            fn mul(self, scalar: f32) -> Self {
                Self { $($field: self.$field * scalar),+ }
            }
        }

        impl Mul<$name> for f32 {
            type Output = $name;

            fn mul(self, vector: $name) -> $name {
                vector * self
            }
        }

        impl MulAssign<f32> for $name {
            fn mul_assign(&mut self, scalar: f32) {
                *self = *self * scalar;
            }
        }
    };
}

impl_vector!(Vector2, 2, x, y);
impl_vector!(Vector3, 3, x, y, z);
impl_vector!(Vector4, 4, x, y, z, w);

impl Vector3 {
    pub const X: Self = Self::new(1.0, 0.0, 0.0);
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    /// Right-handed cross product.
    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Rotate around `axis` by `angle` radians (Rodrigues' formula).
    ///
    /// `axis` must be unit length for a rigid rotation; it is not normalized
    /// here.
    pub fn rodrigues(self, axis: Vector3, angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        self * cos + axis.cross(self) * sin + axis * (axis.dot(self) * (1.0 - cos))
    }
}

impl Vector4 {
    /// A homogeneous point (`w = 1`).
    pub const fn point(x: f32, y: f32, z: f32) -> Self {
        Self::new(x, y, z, 1.0)
    }

    /// A homogeneous direction (`w = 0`).
    pub const fn direction(x: f32, y: f32, z: f32) -> Self {
        Self::new(x, y, z, 0.0)
    }

    /// Drop `w` without dividing by it.
    pub fn truncate(self) -> Vector3 {
        Vector3::new(self.x, self.y, self.z)
    }
}

impl Default for Vector4 {
    fn default() -> Self {
        Self::point(0.0, 0.0, 0.0)
    }
}

impl From<Vector2> for Vector3 {
    fn from(v: Vector2) -> Self {
        Self::new(v.x, v.y, 0.0)
    }
}

impl From<Vector3> for Vector2 {
    fn from(v: Vector3) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<Vector3> for Vector4 {
    fn from(v: Vector3) -> Self {
        Self::point(v.x, v.y, v.z)
    }
}

impl From<Vector4> for Vector3 {
    fn from(v: Vector4) -> Self {
        v.truncate()
    }
}

impl fmt::Display for Vector2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vec2 ({}, {})", self.x, self.y)
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vec3 ({}, {}, {})", self.x, self.y, self.z)
    }
}

impl fmt::Display for Vector4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vec4 ({}, {}, {}, {})", self.x, self.y, self.z, self.w)
    }
}
