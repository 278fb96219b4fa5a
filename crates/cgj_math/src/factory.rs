//! Stateless builders for transform, view and projection matrices.
//!
//! Angles are in degrees throughout, matching the scene and camera APIs.

use crate::{deg_to_rad, Matrix2, Matrix3, Matrix4, Vector3, Vector4};

/// Namespace for matrix constructors.
pub struct MatrixFactory;

impl MatrixFactory {
    /// 2×2 identity.
    pub fn identity2() -> Matrix2 {
        Matrix2::IDENTITY
    }

    /// 3×3 identity.
    pub fn identity3() -> Matrix3 {
        Matrix3::IDENTITY
    }

    /// 4×4 identity.
    pub fn identity4() -> Matrix4 {
        Matrix4::IDENTITY
    }

    /// Counter-clockwise 2D rotation by `angle` degrees.
    pub fn rotate2(angle: f32) -> Matrix2 {
        let (sin, cos) = deg_to_rad(angle).sin_cos();
        let mut rot = Matrix2::IDENTITY;
        rot.set(0, 0, cos);
        rot.set(1, 0, sin);
        rot.set(0, 1, -sin);
        rot.set(1, 1, cos);
        rot
    }

    /// Non-uniform 2D scale.
    pub fn scale2(x: f32, y: f32) -> Matrix2 {
        let mut scale = Matrix2::ZERO;
        scale.set(0, 0, x);
        scale.set(1, 1, y);
        scale
    }

    /// 2D translation in homogeneous 3×3 form.
    pub fn translate2(x: f32, y: f32) -> Matrix3 {
        let mut trans = Matrix3::IDENTITY;
        trans.set_col(2, Vector3::new(x, y, 1.0));
        trans
    }

    /// Skew-symmetric matrix `K` with `K * v == axis × v`.
    pub fn dual_matrix(axis: Vector3) -> Matrix3 {
        Matrix3::from_rows([
            Vector3::new(0.0, -axis.z, axis.y),
            Vector3::new(axis.z, 0.0, -axis.x),
            Vector3::new(-axis.y, axis.x, 0.0),
        ])
    }

    /// Rotation about one of the unit axes `X`, `Y` or `Z`.
    ///
    /// Any other axis yields the identity: this is a fast path for
    /// axis-aligned rotations only. Use [`Self::rodrigues3`] for an arbitrary
    /// axis.
    pub fn rotate3(angle: f32, axis: Vector3) -> Matrix3 {
        let (sin, cos) = deg_to_rad(angle).sin_cos();
        let mut rot = Matrix3::IDENTITY;
        if axis == Vector3::Z {
            rot.set(0, 0, cos);
            rot.set(1, 0, sin);
            rot.set(0, 1, -sin);
            rot.set(1, 1, cos);
        } else if axis == Vector3::Y {
            rot.set(0, 0, cos);
            rot.set(2, 0, -sin);
            rot.set(0, 2, sin);
            rot.set(2, 2, cos);
        } else if axis == Vector3::X {
            rot.set(1, 1, cos);
            rot.set(2, 1, sin);
            rot.set(1, 2, -sin);
            rot.set(2, 2, cos);
        } else {
            log::warn!("rotate3 only handles unit axes, got {axis}; returning identity");
        }
        rot
    }

    /// Diagonal 3×3 scale.
    pub fn scale3(x: f32, y: f32, z: f32) -> Matrix3 {
        let mut scale = Matrix3::ZERO;
        scale.set(0, 0, x);
        scale.set(1, 1, y);
        scale.set(2, 2, z);
        scale
    }

    /// Identity with `(x, y, z)` in the last column.
    ///
    /// Only a true translation for 2D homogeneous points when `z` is 1; use
    /// [`Self::translate`] for 3D.
    pub fn translate3(x: f32, y: f32, z: f32) -> Matrix3 {
        let mut trans = Matrix3::IDENTITY;
        trans.set_col(2, Vector3::new(x, y, z));
        trans
    }

    /// Rotation by `angle` degrees about any axis: `I + sin·K + (1 - cos)·K²`.
    ///
    /// `axis` should be unit length; it is used as given.
    pub fn rodrigues3(axis: Vector3, angle: f32) -> Matrix3 {
        let (sin, cos) = deg_to_rad(angle).sin_cos();
        let dual = Self::dual_matrix(axis);
        Matrix3::IDENTITY + dual * sin + (dual * dual) * (1.0 - cos)
    }

    /// Homogeneous form of [`Self::rodrigues3`].
    pub fn rodrigues4(axis: Vector3, angle: f32) -> Matrix4 {
        Matrix4::from(Self::rodrigues3(axis, angle))
    }

    /// Homogeneous 3D translation.
    pub fn translate(x: f32, y: f32, z: f32) -> Matrix4 {
        let mut trans = Matrix4::IDENTITY;
        trans.set_col(3, Vector4::point(x, y, z));
        trans
    }

    /// [`Self::translate`] taking a vector.
    pub fn translate_vec(position: Vector3) -> Matrix4 {
        Self::translate(position.x, position.y, position.z)
    }

    /// 4×4 form of [`Self::rotate3`]; same axis-aligned restriction.
    pub fn rotate(angle: f32, axis: Vector3) -> Matrix4 {
        Matrix4::from(Self::rotate3(angle, axis))
    }

    /// Rotation of `angle` degrees about +X.
    pub fn rotate_x(angle: f32) -> Matrix4 {
        Self::rotate(angle, Vector3::X)
    }

    /// Rotation of `angle` degrees about +Y.
    pub fn rotate_y(angle: f32) -> Matrix4 {
        Self::rotate(angle, Vector3::Y)
    }

    /// Rotation of `angle` degrees about +Z.
    pub fn rotate_z(angle: f32) -> Matrix4 {
        Self::rotate(angle, Vector3::Z)
    }

    /// Homogeneous non-uniform scale.
    pub fn scale(x: f32, y: f32, z: f32) -> Matrix4 {
        Matrix4::from(Self::scale3(x, y, z))
    }

    /// [`Self::scale`] taking a vector.
    pub fn scale_vec(scale: Vector3) -> Matrix4 {
        Self::scale(scale.x, scale.y, scale.z)
    }

    /// OpenGL-style orthographic projection mapping the box to the NDC cube.
    pub fn orthographic(left: f32, right: f32, top: f32, bottom: f32, near: f32, far: f32) -> Matrix4 {
        let mut ortho = Matrix4::IDENTITY;
        ortho.set(0, 0, 2.0 / (right - left));
        ortho.set(1, 1, 2.0 / (top - bottom));
        ortho.set(2, 2, 2.0 / (near - far));
        ortho.set(0, 3, (left + right) / (left - right));
        ortho.set(1, 3, (bottom + top) / (bottom - top));
        ortho.set(2, 3, (near + far) / (near - far));
        ortho
    }

    /// OpenGL-style perspective projection; `fov` is the vertical angle in
    /// degrees.
    pub fn perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Matrix4 {
        let d = 1.0 / deg_to_rad(fov / 2.0).tan();
        let mut persp = Matrix4::ZERO;
        persp.set(0, 0, d / aspect);
        persp.set(1, 1, d);
        persp.set(2, 2, (near + far) / (near - far));
        persp.set(3, 2, -1.0);
        persp.set(2, 3, 2.0 * near * far / (near - far));
        persp
    }

    /// Right-handed view matrix looking from `eye` towards `center`.
    pub fn look_at(eye: Vector3, center: Vector3, up: Vector3) -> Matrix4 {
        let v = (center - eye).normalize();
        let s = v.cross(up).normalize();
        let u = s.cross(v);
        let rot = Matrix4::from(Matrix3::from_rows([s, u, -v]));
        rot * Self::translate(-eye.x, -eye.y, -eye.z)
    }
}
