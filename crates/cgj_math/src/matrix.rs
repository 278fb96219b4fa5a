//! Square matrices stored column-major.
//!
//! Element `(row, col)` of an N×N matrix lives at `elements[row + col * N]`,
//! so each run of N floats is one column. This is the layout OpenGL/wgpu
//! expect for uniform uploads. All indexing in this module goes through
//! [`at`](Matrix4::at)/[`set`](Matrix4::set) so that row and column are never
//! swapped by accident.

use std::fmt;
use std::ops::{Add, Index, IndexMut, Mul, Sub};

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::{approx_eq, clean_float, MathError, MathResult, Vector2, Vector3, Vector4, EPSILON};

/// A 2×2 column-major matrix.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable, Serialize, Deserialize)]
pub struct Matrix2 {
    pub elements: [f32; 4],
}

/// A 3×3 column-major matrix.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable, Serialize, Deserialize)]
pub struct Matrix3 {
    pub elements: [f32; 9],
}

/// A 4×4 column-major matrix.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable, Serialize, Deserialize)]
pub struct Matrix4 {
    pub elements: [f32; 16],
}

macro_rules! impl_matrix {
    ($name:ident, $vector:ident, $n:literal) => {
        impl $name {
            /// Number of rows (and columns).
            pub const SIZE: usize = $n;

            pub const ZERO: Self = Self::diagonal(0.0);
            pub const IDENTITY: Self = Self::diagonal(1.0);

            /// The zero matrix.
            pub const fn zero() -> Self {
                Self::ZERO
            }

            /// The identity matrix.
            pub const fn identity() -> Self {
                Self::IDENTITY
            }

            /// A matrix with `value` on the diagonal and zero elsewhere.
            pub const fn diagonal(value: f32) -> Self {
                let mut elements = [0.0; $n * $n];
                let mut i = 0;
                while i < $n {
                    elements[i + i * $n] = value;
                    i += 1;
                }
                Self { elements }
            }

            /// Wrap a column-major element array.
            pub const fn from_elements(elements: [f32; $n * $n]) -> Self {
                Self { elements }
            }

            /// Build from columns.
            pub fn from_cols(cols: [$vector; $n]) -> Self {
                let mut m = Self::ZERO;
                for (col, vector) in cols.iter().enumerate() {
                    for (row, value) in vector.to_array().into_iter().enumerate() {
                        m.set(row, col, value);
                    }
                }
                m
            }

            /// Build from rows, as matrices are usually written on paper.
            pub fn from_rows(rows: [$vector; $n]) -> Self {
                Self::from_cols(rows).transpose()
            }

            #[inline]
            pub fn at(&self, row: usize, col: usize) -> f32 {
                self.elements[row + col * $n]
            }

            #[inline]
            pub fn set(&mut self, row: usize, col: usize, value: f32) {
                self.elements[row + col * $n] = value;
            }

            /// Bounds-checked element access.
            pub fn get(&self, row: usize, col: usize) -> MathResult<f32> {
                if row >= $n {
                    return Err(MathError::InvalidIndex { index: row, len: $n });
                }
                if col >= $n {
                    return Err(MathError::InvalidIndex { index: col, len: $n });
                }
                Ok(self.at(row, col))
            }

            pub fn col(&self, col: usize) -> $vector {
                let mut out = [0.0; $n];
                for (row, value) in out.iter_mut().enumerate() {
                    *value = self.at(row, col);
                }
                $vector::from(out)
            }

            pub fn row(&self, row: usize) -> $vector {
                let mut out = [0.0; $n];
                for (col, value) in out.iter_mut().enumerate() {
                    *value = self.at(row, col);
                }
                $vector::from(out)
            }

            pub fn set_col(&mut self, col: usize, vector: $vector) {
                for (row, value) in vector.to_array().into_iter().enumerate() {
                    self.set(row, col, value);
                }
            }

            pub fn transpose(&self) -> Self {
                let mut m = Self::ZERO;
                for row in 0..$n {
                    for col in 0..$n {
                        m.set(col, row, self.at(row, col));
                    }
                }
                m
            }

            /// Snap elements that are within `EPSILON` of an integer.
            pub fn clean(&mut self) {
                for value in self.elements.iter_mut() {
                    *value = clean_float(*value, EPSILON);
                }
            }

            /// The raw column-major elements, ready for a uniform upload.
            pub fn as_slice(&self) -> &[f32] {
                &self.elements
            }

            /// Size of the matrix in bytes.
            pub const fn byte_size() -> usize {
                std::mem::size_of::<Self>()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::IDENTITY
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                self.elements
                    .iter()
                    .zip(other.elements.iter())
                    .all(|(a, b)| approx_eq(*a, *b, EPSILON))
            }
        }

        impl Index<(usize, usize)> for $name {
            type Output = f32;

            fn index(&self, (row, col): (usize, usize)) -> &f32 {
                if let Err(err) = self.get(row, col) {
                    panic!("{}", err);
                }
                &self.elements[row + col * $n]
            }
        }

        impl IndexMut<(usize, usize)> for $name {
            fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f32 {
                if let Err(err) = self.get(row, col) {
                    panic!("{}", err);
                }
                &mut self.elements[row + col * $n]
            }
        }

        impl Add for $name {
            type Output = Self;

            fn add(self, other: Self) -> Self {
                let mut m = self;
                for (a, b) in m.elements.iter_mut().zip(other.elements.iter()) {
                    *a += b;
                }
                m
            }
        }

        impl Sub for $name {
            type Output = Self;

            fn sub(self, other: Self) -> Self {
                let mut m = self;
                for (a, b) in m.elements.iter_mut().zip(other.elements.iter()) {
                    *a -= b;
                }
                m
            }
        }

        impl Mul<f32> for $name {
            type Output = Self;

            fn mul(self, scalar: f32) -> Self {
                let mut m = self;
                for value in m.elements.iter_mut() {
                    *value *= scalar;
                }
                m
            }
        }

        impl Mul<$name> for f32 {
            type Output = $name;

            fn mul(self, matrix: $name) -> $name {
                matrix * self
            }
        }

        impl Mul for $name {
            type Output = Self;

            fn mul(self, other: Self) -> Self {
                let mut m = Self::ZERO;
                for row in 0..$n {
                    for col in 0..$n {
                        let mut sum = 0.0;
                        for k in 0..$n {
                            sum += self.at(row, k) * other.at(k, col);
                        }
                        m.set(row, col, sum);
                    }
                }
                m
            }
        }

        /// `M * v` treats `v` as a column vector.
        impl Mul<$vector> for $name {
            type Output = $vector;

            fn mul(self, vector: $vector) -> $vector {
                let v = vector.to_array();
                let mut out = [0.0; $n];
                for (row, value) in out.iter_mut().enumerate() {
                    for (col, component) in v.iter().enumerate() {
                        *value += self.at(row, col) * component;
                    }
                }
                $vector::from(out)
            }
        }

        /// `v * M` treats `v` as a row vector.
        impl Mul<$name> for $vector {
            type Output = $vector;

            fn mul(self, matrix: $name) -> $vector {
                let v = self.to_array();
                let mut out = [0.0; $n];
                for (col, value) in out.iter_mut().enumerate() {
                    for (row, component) in v.iter().enumerate() {
                        *value += component * matrix.at(row, col);
                    }
                }
                $vector::from(out)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                for row in 0..$n {
                    write!(f, "[")?;
                    for col in 0..$n {
                        if col > 0 {
                            write!(f, " ")?;
                        }
                        write!(f, "{}", self.at(row, col))?;
                    }
                    writeln!(f, "]")?;
                }
                Ok(())
            }
        }
    };
}

impl_matrix!(Matrix2, Vector2, 2);
impl_matrix!(Matrix3, Vector3, 3);
impl_matrix!(Matrix4, Vector4, 4);

/// Rejects a near-zero or non-finite determinant before it is used as a divisor.
fn checked_reciprocal(det: f32) -> MathResult<f32> {
    if det.abs() < f32::EPSILON || !det.is_finite() {
        log::debug!("refusing to invert matrix with determinant {det}");
        return Err(MathError::SingularMatrix);
    }
    Ok(1.0 / det)
}

impl Matrix2 {
    pub fn new(col0: Vector2, col1: Vector2) -> Self {
        Self::from_cols([col0, col1])
    }

    pub fn determinant(&self) -> f32 {
        self.at(0, 0) * self.at(1, 1) - self.at(0, 1) * self.at(1, 0)
    }

    /// `[[d, -b], [-c, a]]` for `[[a, b], [c, d]]`.
    pub fn adjugate(&self) -> Self {
        Self::from_rows([
            Vector2::new(self.at(1, 1), -self.at(0, 1)),
            Vector2::new(-self.at(1, 0), self.at(0, 0)),
        ])
    }

    /// Inverse, or `SingularMatrix` when the determinant is zero.
    pub fn inverse(&self) -> MathResult<Self> {
        let inv_det = checked_reciprocal(self.determinant())?;
        Ok(self.adjugate() * inv_det)
    }
}

impl Matrix3 {
    pub fn new(col0: Vector3, col1: Vector3, col2: Vector3) -> Self {
        Self::from_cols([col0, col1, col2])
    }

    /// Determinant of the 2×2 block left after deleting `row` and `col`.
    pub fn minor(&self, row: usize, col: usize) -> f32 {
        let mut block = [0.0; 4];
        let mut i = 0;
        for c in (0..3).filter(|&c| c != col) {
            for r in (0..3).filter(|&r| r != row) {
                block[i] = self.at(r, c);
                i += 1;
            }
        }
        Matrix2::from_elements(block).determinant()
    }

    /// Cofactor expansion along the first column.
    pub fn determinant(&self) -> f32 {
        self.at(0, 0) * self.minor(0, 0) - self.at(1, 0) * self.minor(1, 0)
            + self.at(2, 0) * self.minor(2, 0)
    }

    /// Matrix of unsigned 2×2 minors.
    pub fn minors(&self) -> Self {
        let mut m = Self::ZERO;
        for row in 0..3 {
            for col in 0..3 {
                m.set(row, col, self.minor(row, col));
            }
        }
        m
    }

    /// Negate the elements where `row + col` is odd.
    ///
    /// These are storage indices 1, 3, 5 and 7.
    pub fn checkerboard(&self) -> Self {
        let mut m = *self;
        for index in [1, 3, 5, 7] {
            m.elements[index] = -m.elements[index];
        }
        m
    }

    /// Matrix of signed minors.
    pub fn cofactors(&self) -> Self {
        self.minors().checkerboard()
    }

    /// Classical adjugate: the transposed cofactor matrix.
    pub fn adjugate(&self) -> Self {
        self.cofactors().transpose()
    }

    /// Inverse via transpose → minors → sign flip → `1/det` scale.
    pub fn inverse(&self) -> MathResult<Self> {
        let inv_det = checked_reciprocal(self.determinant())?;
        Ok(self.transpose().minors().checkerboard() * inv_det)
    }
}

impl Matrix4 {
    pub fn new(col0: Vector4, col1: Vector4, col2: Vector4, col3: Vector4) -> Self {
        Self::from_cols([col0, col1, col2, col3])
    }

    /// The 3×3 matrix left after deleting `row` and `col`.
    pub fn submatrix(&self, row: usize, col: usize) -> Matrix3 {
        let mut block = [0.0; 9];
        let mut i = 0;
        for c in (0..4).filter(|&c| c != col) {
            for r in (0..4).filter(|&r| r != row) {
                block[i] = self.at(r, c);
                i += 1;
            }
        }
        Matrix3::from_elements(block)
    }

    pub fn cofactor(&self, row: usize, col: usize) -> f32 {
        let sign = if (row + col) % 2 == 0 { 1.0 } else { -1.0 };
        sign * self.submatrix(row, col).determinant()
    }

    /// Expansion along the first row into four 3×3 minors.
    pub fn determinant(&self) -> f32 {
        (0..4).map(|col| self.at(0, col) * self.cofactor(0, col)).sum()
    }

    pub fn cofactors(&self) -> Self {
        let mut m = Self::ZERO;
        for row in 0..4 {
            for col in 0..4 {
                m.set(row, col, self.cofactor(row, col));
            }
        }
        m
    }

    pub fn adjugate(&self) -> Self {
        self.cofactors().transpose()
    }

    pub fn inverse(&self) -> MathResult<Self> {
        let inv_det = checked_reciprocal(self.determinant())?;
        Ok(self.adjugate() * inv_det)
    }

    /// Translation column as a 3-vector.
    pub fn translation(&self) -> Vector3 {
        self.col(3).truncate()
    }

    /// Apply to a point (`w = 1`), ignoring the resulting `w`.
    pub fn transform_point(&self, point: Vector3) -> Vector3 {
        (*self * Vector4::from(point)).truncate()
    }

    /// Apply to a direction (`w = 0`); translation has no effect.
    pub fn transform_vector(&self, vector: Vector3) -> Vector3 {
        (*self * Vector4::direction(vector.x, vector.y, vector.z)).truncate()
    }
}

/// Embed in the top-left block; the new diagonal entry is 1.
impl From<Matrix2> for Matrix3 {
    fn from(m: Matrix2) -> Self {
        let mut out = Self::IDENTITY;
        for row in 0..2 {
            for col in 0..2 {
                out.set(row, col, m.at(row, col));
            }
        }
        out
    }
}

/// Keep the top-left block.
impl From<Matrix3> for Matrix2 {
    fn from(m: Matrix3) -> Self {
        let mut out = Self::ZERO;
        for row in 0..2 {
            for col in 0..2 {
                out.set(row, col, m.at(row, col));
            }
        }
        out
    }
}

/// Embed in the top-left block; the new diagonal entry is 1.
impl From<Matrix3> for Matrix4 {
    fn from(m: Matrix3) -> Self {
        let mut out = Self::IDENTITY;
        for row in 0..3 {
            for col in 0..3 {
                out.set(row, col, m.at(row, col));
            }
        }
        out
    }
}

/// Keep the top-left block, dropping translation and the homogeneous row.
impl From<Matrix4> for Matrix3 {
    fn from(m: Matrix4) -> Self {
        let mut out = Self::ZERO;
        for row in 0..3 {
            for col in 0..3 {
                out.set(row, col, m.at(row, col));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample3() -> Matrix3 {
        Matrix3::from_rows([
            Vector3::new(2.0, 3.0, 1.0),
            Vector3::new(3.0, 4.0, 1.0),
            Vector3::new(3.0, 7.0, 2.0),
        ])
    }

    fn sample4() -> Matrix4 {
        Matrix4::from_rows([
            Vector4::new(2.0, 0.0, 1.0, 3.0),
            Vector4::new(1.0, 1.0, 0.0, -1.0),
            Vector4::new(0.0, 4.0, 2.0, 1.0),
            Vector4::new(1.0, 0.0, 0.0, 1.0),
        ])
    }

    #[test]
    fn test_column_major_storage() {
        let m = Matrix2::from_rows([Vector2::new(1.0, 2.0), Vector2::new(3.0, 4.0)]);
        assert_eq!(m.elements, [1.0, 3.0, 2.0, 4.0]);
        assert_eq!(m.at(0, 1), 2.0);
        assert_eq!(m.col(1), Vector2::new(2.0, 4.0));
        assert_eq!(m.row(1), Vector2::new(3.0, 4.0));
        assert_eq!(m[(1, 0)], 3.0);
    }

    #[test]
    fn test_constructors() {
        assert_eq!(Matrix3::zero().elements, [0.0; 9]);
        let d = Matrix4::diagonal(2.0);
        assert_eq!(d.at(3, 3), 2.0);
        assert_eq!(d.at(0, 1), 0.0);
        assert_eq!(Matrix4::default(), Matrix4::IDENTITY);

        let m = Matrix3::new(Vector3::X, Vector3::Y, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(m.col(2), Vector3::new(1.0, 2.0, 3.0));
        let copy = m;
        assert_eq!(copy, m);
    }

    #[test]
    fn test_multiply_non_commuting_pair() {
        let a = Matrix2::from_rows([Vector2::new(1.0, 2.0), Vector2::new(3.0, 4.0)]);
        let b = Matrix2::from_rows([Vector2::new(0.0, 1.0), Vector2::new(1.0, 0.0)]);

        // b swaps columns when applied on the right, rows on the left.
        let ab = Matrix2::from_rows([Vector2::new(2.0, 1.0), Vector2::new(4.0, 3.0)]);
        let ba = Matrix2::from_rows([Vector2::new(3.0, 4.0), Vector2::new(1.0, 2.0)]);
        assert_eq!(a * b, ab);
        assert_eq!(b * a, ba);
        assert_ne!(a * b, b * a);
    }

    #[test]
    fn test_multiply_3x3_known_product() {
        let a = Matrix3::from_rows([
            Vector3::new(1.0, 2.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
        ]);
        let b = Matrix3::from_rows([
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(3.0, 1.0, 0.0),
            Vector3::new(0.0, 0.0, 2.0),
        ]);
        let expected = Matrix3::from_rows([
            Vector3::new(7.0, 2.0, 0.0),
            Vector3::new(3.0, 1.0, 0.0),
            Vector3::new(0.0, 0.0, 2.0),
        ]);
        assert_eq!(a * b, expected);
    }

    #[test]
    fn test_identity_is_neutral() {
        let m = sample4();
        assert_eq!(Matrix4::identity() * m, m);
        assert_eq!(m * Matrix4::identity(), m);
    }

    #[test]
    fn test_elementwise_ops() {
        let a = sample3();
        assert_eq!(a + a, a * 2.0);
        assert_eq!(a - a, Matrix3::ZERO);
        assert_eq!(0.5 * (a + a), a);
    }

    #[test]
    fn test_vector_products_follow_convention() {
        let m = Matrix3::from_rows([
            Vector3::new(1.0, 2.0, 3.0),
            Vector3::new(4.0, 5.0, 6.0),
            Vector3::new(7.0, 8.0, 9.0),
        ]);
        let v = Vector3::new(1.0, 0.0, -1.0);
        assert_eq!(m * v, Vector3::new(-2.0, -2.0, -2.0));
        assert_eq!(v * m, Vector3::new(-6.0, -6.0, -6.0));
        assert_eq!(v * m, m.transpose() * v);
    }

    #[test]
    fn test_double_transpose() {
        let m = sample4();
        assert_eq!(m.transpose().transpose(), m);
        assert_eq!(m.transpose().at(0, 3), m.at(3, 0));
    }

    #[test]
    fn test_determinants() {
        let m2 = Matrix2::from_rows([Vector2::new(4.0, 7.0), Vector2::new(2.0, 6.0)]);
        assert_eq!(m2.determinant(), 10.0);
        assert_eq!(sample3().determinant(), 2.0);
        assert_eq!(sample4().determinant(), 7.0);
        assert_eq!(Matrix4::diagonal(2.0).determinant(), 16.0);
    }

    #[test]
    fn test_cofactors_and_adjugate() {
        let m = sample3();
        let cof = m.cofactors();
        assert_eq!(cof.at(0, 0), 1.0);
        assert_eq!(cof.at(0, 1), -3.0);
        assert_eq!(cof.at(1, 0), -(3.0 * 2.0 - 1.0 * 7.0));
        assert_eq!(m.adjugate(), cof.transpose());
        assert_eq!(m * m.adjugate(), Matrix3::diagonal(m.determinant()));
    }

    #[test]
    fn test_inverse_roundtrip() {
        let m2 = Matrix2::from_rows([Vector2::new(4.0, 7.0), Vector2::new(2.0, 6.0)]);
        let m3 = sample3();
        let m4 = sample4();

        assert_eq!(m2 * m2.inverse().unwrap(), Matrix2::IDENTITY);
        assert_eq!(m3 * m3.inverse().unwrap(), Matrix3::IDENTITY);
        assert_eq!(m4 * m4.inverse().unwrap(), Matrix4::IDENTITY);
        assert_eq!(m4.inverse().unwrap() * m4, Matrix4::IDENTITY);

        assert_eq!(m3.inverse().unwrap().inverse().unwrap(), m3);
        assert_eq!(m4.inverse().unwrap().inverse().unwrap(), m4);
    }

    #[test]
    fn test_singular_inverse_reports_failure() {
        let singular = Matrix3::from_rows([
            Vector3::new(1.0, 2.0, 3.0),
            Vector3::new(1.0, 2.0, 3.0),
            Vector3::new(0.0, 1.0, 4.0),
        ]);
        assert_eq!(singular.determinant(), 0.0);
        assert_eq!(singular.inverse(), Err(MathError::SingularMatrix));
        assert_eq!(Matrix2::ZERO.inverse(), Err(MathError::SingularMatrix));
        assert_eq!(Matrix4::ZERO.inverse(), Err(MathError::SingularMatrix));
    }

    #[test]
    fn test_near_singular_inverse_is_rejected() {
        // Rows are linearly dependent; rounding leaves a tiny nonzero determinant.
        let m = Matrix3::from_rows([
            Vector3::new(0.1, 0.2, 0.3),
            Vector3::new(0.4, 0.5, 0.6),
            Vector3::new(0.7, 0.8, 0.9),
        ]);
        assert!(m.determinant().abs() < f32::EPSILON);
        assert_eq!(m.inverse(), Err(MathError::SingularMatrix));
    }

    #[test]
    fn test_determinant_first_column_expansion() {
        let m = Matrix3::from_rows([
            Vector3::new(2.0, 0.0, 1.0),
            Vector3::new(3.0, 1.0, 0.0),
            Vector3::new(0.0, 4.0, 5.0),
        ]);
        // 2*(5-0) - 3*(0-4) + 0 = 22
        assert!((m.determinant() - 22.0).abs() < 1e-5);
        assert!((m.transpose().determinant() - 22.0).abs() < 1e-5);
    }

    #[test]
    fn test_dimension_conversions_preserve_block() {
        let m3 = sample3();
        let m4 = Matrix4::from(m3);
        assert_eq!(m4.at(3, 3), 1.0);
        assert_eq!(m4.at(0, 3), 0.0);
        assert_eq!(m4.at(3, 0), 0.0);
        assert_eq!(Matrix3::from(m4), m3);

        let m2 = Matrix2::from(m3);
        assert_eq!(m2.at(1, 0), 3.0);
        let back = Matrix3::from(m2);
        assert_eq!(back.at(2, 2), 1.0);
        assert_eq!(back.at(0, 2), 0.0);
    }

    #[test]
    fn test_clean() {
        let mut m = Matrix2::from_elements([0.99999, 0.00001, -0.00003, 0.5]);
        m.clean();
        assert_eq!(m.elements, [1.0, 0.0, 0.0, 0.5]);
    }

    #[test]
    fn test_display_rows() {
        let m = Matrix2::from_rows([Vector2::new(1.0, 2.0), Vector2::new(3.0, 4.0)]);
        assert_eq!(m.to_string(), "[1 2]\n[3 4]\n");
    }

    #[test]
    fn test_bounds_checked_access() {
        let m = Matrix3::IDENTITY;
        assert_eq!(m.get(2, 2), Ok(1.0));
        assert_eq!(m.get(3, 0), Err(MathError::InvalidIndex { index: 3, len: 3 }));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_index_out_of_range_panics() {
        let m = Matrix4::IDENTITY;
        let _ = m[(0, 4)];
    }

    #[test]
    fn test_bytes_match_column_layout() {
        let m = Matrix4::from_cols([
            Vector4::new(1.0, 2.0, 3.0, 4.0),
            Vector4::ZERO,
            Vector4::ZERO,
            Vector4::ZERO,
        ]);
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&m));
        assert_eq!(&floats[..4], &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(Matrix4::byte_size(), 64);
    }
}
