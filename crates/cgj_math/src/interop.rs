// Conversions to and from glam.
//
// Renderers built on wgpu/winit usually speak glam; these impls let a scene
// built with CGJ types be handed over without re-deriving any layout. Both
// libraries store matrices column-major, so matrices convert element for
// element. glam orders quaternion components (x, y, z, w); ours are
// (t, x, y, z).

use crate::{Matrix2, Matrix3, Matrix4, Quaternion, Vector2, Vector3, Vector4};

impl From<glam::Vec2> for Vector2 {
    fn from(v: glam::Vec2) -> Self {
        Self::from(v.to_array())
    }
}

impl From<Vector2> for glam::Vec2 {
    fn from(v: Vector2) -> Self {
        glam::Vec2::from_array(v.to_array())
    }
}

impl From<glam::Vec3> for Vector3 {
    fn from(v: glam::Vec3) -> Self {
        Self::from(v.to_array())
    }
}

impl From<Vector3> for glam::Vec3 {
    fn from(v: Vector3) -> Self {
        glam::Vec3::from_array(v.to_array())
    }
}

impl From<glam::Vec4> for Vector4 {
    fn from(v: glam::Vec4) -> Self {
        Self::from(v.to_array())
    }
}

impl From<Vector4> for glam::Vec4 {
    fn from(v: Vector4) -> Self {
        glam::Vec4::from_array(v.to_array())
    }
}

impl From<glam::Mat2> for Matrix2 {
    fn from(m: glam::Mat2) -> Self {
        Self::from_elements(m.to_cols_array())
    }
}

impl From<Matrix2> for glam::Mat2 {
    fn from(m: Matrix2) -> Self {
        glam::Mat2::from_cols_array(&m.elements)
    }
}

impl From<glam::Mat3> for Matrix3 {
    fn from(m: glam::Mat3) -> Self {
        Self::from_elements(m.to_cols_array())
    }
}

impl From<Matrix3> for glam::Mat3 {
    fn from(m: Matrix3) -> Self {
        glam::Mat3::from_cols_array(&m.elements)
    }
}

impl From<glam::Mat4> for Matrix4 {
    fn from(m: glam::Mat4) -> Self {
        Self::from_elements(m.to_cols_array())
    }
}

impl From<Matrix4> for glam::Mat4 {
    fn from(m: Matrix4) -> Self {
        glam::Mat4::from_cols_array(&m.elements)
    }
}

impl From<glam::Quat> for Quaternion {
    fn from(q: glam::Quat) -> Self {
        let [x, y, z, w] = q.to_array();
        Self::new(w, x, y, z)
    }
}

impl From<Quaternion> for glam::Quat {
    fn from(q: Quaternion) -> Self {
        glam::Quat::from_xyzw(q.x, q.y, q.z, q.t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MatrixFactory;

    #[test]
    fn test_matrix_layout_matches_glam() {
        let ours = MatrixFactory::translate(1.0, 2.0, 3.0);
        let theirs = glam::Mat4::from_translation(glam::Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(ours, Matrix4::from(theirs));
        assert_eq!(glam::Mat4::from(ours), theirs);
    }

    #[test]
    fn test_quaternion_matrix_matches_glam() {
        let axis = Vector3::new(0.3, -0.5, 0.8).normalize();
        for angle in [15.0_f32, 90.0, 135.0, -60.0] {
            let ours = Quaternion::from_angle_axis(angle, axis);
            let theirs = glam::Quat::from_axis_angle(axis.into(), angle.to_radians());
            assert_eq!(ours, Quaternion::from(theirs));
            assert_eq!(ours.to_matrix(), Matrix4::from(glam::Mat4::from_quat(theirs)));
        }
    }

    #[test]
    fn test_perspective_matches_glam_gl() {
        let ours = MatrixFactory::perspective(45.0, 16.0 / 9.0, 0.1, 100.0);
        let theirs = glam::Mat4::perspective_rh_gl(45.0_f32.to_radians(), 16.0 / 9.0, 0.1, 100.0);
        assert_eq!(ours, Matrix4::from(theirs));
    }

    #[test]
    fn test_look_at_matches_glam() {
        let eye = Vector3::new(5.0, 5.0, 5.0);
        let ours = MatrixFactory::look_at(eye, Vector3::ZERO, Vector3::Y);
        let theirs = glam::Mat4::look_at_rh(eye.into(), glam::Vec3::ZERO, glam::Vec3::Y);
        assert_eq!(ours, Matrix4::from(theirs));
    }

    #[test]
    fn test_vector_roundtrip() {
        let v = Vector4::new(1.0, -2.0, 3.5, 0.0);
        assert_eq!(Vector4::from(glam::Vec4::from(v)), v);
        let q = Quaternion::from_angle_axis(30.0, Vector3::Y);
        assert_eq!(Quaternion::from(glam::Quat::from(q)), q);
    }
}
