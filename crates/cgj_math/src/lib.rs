//! CGJ Math - vector, matrix and quaternion types for the CGJ engine.
//!
//! This crate provides:
//!
//! - **Vectors**: `Vector2`, `Vector3`, `Vector4` with epsilon equality
//! - **Matrices**: `Matrix2`, `Matrix3`, `Matrix4`, stored column-major
//! - **Builders**: `MatrixFactory` for scale/translate/rotate/view/projection
//! - **Rotations**: `Quaternion` with angle-axis conversion and slerp
//!
//! All types are plain `Copy` values laid out as `#[repr(C)]` float arrays so
//! they can be handed to a GPU buffer through `bytemuck`.
//!
//! # Example
//!
//! ```
//! use cgj_math::{MatrixFactory, Vector4};
//!
//! let m = MatrixFactory::translate(1.0, 2.0, 3.0);
//! let p = m * Vector4::new(0.0, 0.0, 0.0, 1.0);
//! assert_eq!(p, Vector4::new(1.0, 2.0, 3.0, 1.0));
//! ```

mod error;
mod factory;
mod interop;
mod matrix;
mod quaternion;
mod vector;

pub use error::{MathError, MathResult};
pub use factory::MatrixFactory;
pub use matrix::{Matrix2, Matrix3, Matrix4};
pub use quaternion::{AngleAxis, Quaternion};
pub use vector::{Vector2, Vector3, Vector4};

/// Tolerance used by vector/matrix equality and `clean()`.
pub const EPSILON: f32 = 1.0e-4;

/// Tolerance used by quaternion equality, cleaning and the angle-axis guard.
pub const QUATERNION_THRESHOLD: f32 = 1.0e-5;

/// Convert degrees to radians.
#[inline]
pub fn deg_to_rad(degrees: f32) -> f32 {
    degrees * (std::f32::consts::PI / 180.0)
}

/// Convert radians to degrees.
#[inline]
pub fn rad_to_deg(radians: f32) -> f32 {
    radians * (180.0 / std::f32::consts::PI)
}

/// Snap `value` to the nearest integer when it lies within `threshold` of it.
///
/// Negative zero is normalized to `0.0` so cleaned output prints cleanly.
pub fn clean_float(value: f32, threshold: f32) -> f32 {
    let nearest = value.round();
    if (value - nearest).abs() < threshold {
        if nearest == 0.0 {
            0.0
        } else {
            nearest
        }
    } else {
        value
    }
}

/// Absolute-difference comparison used by every `PartialEq` in this crate.
#[inline]
pub(crate) fn approx_eq(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() < epsilon
}
