use alloc::vec;
use core::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use crate::traits::Scalar;

use super::DynMatrix;

#[inline]
fn assert_same_shape<T>(a: &DynMatrix<T>, b: &DynMatrix<T>, op: &str) {
    assert_eq!(
        (a.nrows, a.ncols),
        (b.nrows, b.ncols),
        "dimension mismatch: {}x{} {} {}x{}",
        a.nrows,
        a.ncols,
        op,
        b.nrows,
        b.ncols,
    );
}

// ── Element-wise addition / subtraction ─────────────────────────────

impl<T: Scalar> AddAssign<&DynMatrix<T>> for DynMatrix<T> {
    fn add_assign(&mut self, rhs: &DynMatrix<T>) {
        assert_same_shape(self, rhs, "+=");
        for (a, &b) in self.data.iter_mut().zip(rhs.data.iter()) {
            *a = *a + b;
        }
    }
}

impl<T: Scalar> SubAssign<&DynMatrix<T>> for DynMatrix<T> {
    fn sub_assign(&mut self, rhs: &DynMatrix<T>) {
        assert_same_shape(self, rhs, "-=");
        for (a, &b) in self.data.iter_mut().zip(rhs.data.iter()) {
            *a = *a - b;
        }
    }
}

/// Owned and borrowed forms of an element-wise binary operator, all routed
/// through the corresponding `*Assign<&DynMatrix<T>>` impl.
macro_rules! impl_elementwise {
    ($trait:ident, $method:ident, $assign:ident) => {
        impl<T: Scalar> $trait for DynMatrix<T> {
            type Output = DynMatrix<T>;
            fn $method(mut self, rhs: DynMatrix<T>) -> DynMatrix<T> {
                self.$assign(&rhs);
                self
            }
        }

        impl<T: Scalar> $trait<&DynMatrix<T>> for DynMatrix<T> {
            type Output = DynMatrix<T>;
            fn $method(mut self, rhs: &DynMatrix<T>) -> DynMatrix<T> {
                self.$assign(rhs);
                self
            }
        }

        impl<T: Scalar> $trait<&DynMatrix<T>> for &DynMatrix<T> {
            type Output = DynMatrix<T>;
            fn $method(self, rhs: &DynMatrix<T>) -> DynMatrix<T> {
                let mut out = self.clone();
                out.$assign(rhs);
                out
            }
        }
    };
}

impl_elementwise!(Add, add, add_assign);
impl_elementwise!(Sub, sub, sub_assign);

// ── Negation ────────────────────────────────────────────────────────

impl<T: Scalar> Neg for &DynMatrix<T> {
    type Output = DynMatrix<T>;

    fn neg(self) -> DynMatrix<T> {
        self.map(|x| T::zero() - x)
    }
}

impl<T: Scalar> Neg for DynMatrix<T> {
    type Output = DynMatrix<T>;

    fn neg(self) -> DynMatrix<T> {
        -&self
    }
}

// ── Scalar multiplication ───────────────────────────────────────────

impl<T: Scalar> Mul<T> for &DynMatrix<T> {
    type Output = DynMatrix<T>;

    fn mul(self, rhs: T) -> DynMatrix<T> {
        self.map(|x| x * rhs)
    }
}

impl<T: Scalar> Mul<T> for DynMatrix<T> {
    type Output = DynMatrix<T>;

    fn mul(mut self, rhs: T) -> DynMatrix<T> {
        for x in self.data.iter_mut() {
            *x = *x * rhs;
        }
        self
    }
}

// ── Matrix multiplication: (M×N) * (N×P) → (M×P) ──────────────────

impl<T: Scalar> Mul<&DynMatrix<T>> for &DynMatrix<T> {
    type Output = DynMatrix<T>;

    fn mul(self, rhs: &DynMatrix<T>) -> DynMatrix<T> {
        assert_eq!(
            self.ncols, rhs.nrows,
            "dimension mismatch: {}x{} * {}x{}",
            self.nrows, self.ncols, rhs.nrows, rhs.ncols,
        );
        let (m, n, p) = (self.nrows, self.ncols, rhs.ncols);
        let mut data = vec![T::zero(); m * p];
        // Column-major: C[:, j] += A[:, k] * B[k, j], contiguous in both A and C.
        for j in 0..p {
            let c_col = &mut data[j * m..(j + 1) * m];
            for k in 0..n {
                let b_kj = rhs.data[j * n + k];
                if b_kj == T::zero() {
                    continue;
                }
                let a_col = &self.data[k * m..(k + 1) * m];
                for (c, &a) in c_col.iter_mut().zip(a_col) {
                    *c = *c + a * b_kj;
                }
            }
        }
        DynMatrix {
            data,
            nrows: m,
            ncols: p,
        }
    }
}

impl<T: Scalar> Mul for DynMatrix<T> {
    type Output = DynMatrix<T>;

    fn mul(self, rhs: DynMatrix<T>) -> DynMatrix<T> {
        &self * &rhs
    }
}

// ── Accumulation helpers ────────────────────────────────────────────

impl<T: Scalar> DynMatrix<T> {
    /// `self += alpha * x`.
    ///
    /// ```
    /// use padexp::DynMatrix;
    /// let mut y = DynMatrix::eye(2, 0.0_f64);
    /// let x = DynMatrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    /// y.axpy(2.0, &x);
    /// assert_eq!(y[(0, 0)], 3.0);
    /// assert_eq!(y[(1, 0)], 6.0);
    /// ```
    pub fn axpy(&mut self, alpha: T, x: &DynMatrix<T>) {
        assert_same_shape(self, x, "axpy");
        for (y, &xi) in self.data.iter_mut().zip(x.data.iter()) {
            *y = *y + alpha * xi;
        }
    }

    /// `self += alpha * I`. Panics if not square.
    pub fn add_identity(&mut self, alpha: T) {
        assert!(self.is_square(), "add_identity requires a square matrix");
        for i in 0..self.nrows {
            self[(i, i)] = self[(i, i)] + alpha;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_sub_neg() {
        let a = DynMatrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
        let b = DynMatrix::from_rows(2, 2, &[4.0, 3.0, 2.0, 1.0]);
        let s = &a + &b;
        assert_eq!(s, DynMatrix::from_rows(2, 2, &[5.0; 4]));
        let d = a.clone() - &b;
        assert_eq!(d, DynMatrix::from_rows(2, 2, &[-3.0, -1.0, 1.0, 3.0]));
        assert_eq!(-&d, &b - &a);
    }

    #[test]
    #[should_panic(expected = "dimension mismatch")]
    fn add_shape_mismatch() {
        let a = DynMatrix::zeros(2, 2, 0.0_f64);
        let b = DynMatrix::zeros(2, 3, 0.0_f64);
        let _ = &a + &b;
    }

    #[test]
    fn matmul_rect() {
        // (2x3) * (3x2)
        let a = DynMatrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let b = DynMatrix::from_rows(3, 2, &[7.0, 8.0, 9.0, 10.0, 11.0, 12.0]);
        let c = &a * &b;
        assert_eq!(c, DynMatrix::from_rows(2, 2, &[58.0, 64.0, 139.0, 154.0]));
    }

    #[test]
    fn matmul_identity() {
        let a = DynMatrix::from_fn(4, 4, |i, j| (i * 4 + j) as f64 - 3.5);
        let id = DynMatrix::eye(4, 0.0_f64);
        assert_eq!(&a * &id, a);
        assert_eq!(&id * &a, a);
    }

    #[test]
    fn scale_and_add_identity() {
        let mut a = DynMatrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]) * 0.5;
        assert_eq!(a[(1, 1)], 2.0);
        a.add_identity(10.0);
        assert_eq!(a[(0, 0)], 10.5);
        assert_eq!(a[(0, 1)], 1.0);
    }
}
