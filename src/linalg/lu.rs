use alloc::vec;
use alloc::vec::Vec;

use num_traits::Zero;

use crate::dynmatrix::DynMatrix;
use crate::linalg::LinalgError;
use crate::traits::{LinalgScalar, MatrixMut, MatrixRef};

/// Perform LU decomposition with partial pivoting, in place.
///
/// On return, `a` contains both L and U packed together:
/// - Upper triangle (including diagonal): U
/// - Lower triangle (excluding diagonal): L (diagonal of L is implicitly 1)
///
/// `perm` is filled with the row permutation indices. A pivot whose modulus
/// falls below `epsilon * max|a_ij|` is reported as [`LinalgError::Singular`].
pub fn lu_in_place<T: LinalgScalar>(
    a: &mut impl MatrixMut<T>,
    perm: &mut [usize],
) -> Result<(), LinalgError> {
    let n = a.nrows();
    assert_eq!(n, a.ncols(), "LU decomposition requires a square matrix");
    assert_eq!(n, perm.len(), "permutation slice length must match matrix size");

    let mut scale = <T::Real as Zero>::zero();
    for col in 0..n {
        for &x in a.col_as_slice(col, 0) {
            if x.modulus() > scale {
                scale = x.modulus();
            }
        }
    }
    let tol = scale * T::lepsilon();

    for (i, p) in perm.iter_mut().enumerate() {
        *p = i;
    }

    for col in 0..n {
        // Partial pivoting: find row with largest modulus in this column
        let mut max_row = col;
        let mut max_val = a.get(col, col).modulus();
        for row in (col + 1)..n {
            let val = a.get(row, col).modulus();
            if val > max_val {
                max_val = val;
                max_row = row;
            }
        }

        if !(max_val > tol) {
            return Err(LinalgError::Singular);
        }

        if max_row != col {
            perm.swap(col, max_row);
            for j in 0..n {
                let tmp = *a.get(col, j);
                *a.get_mut(col, j) = *a.get(max_row, j);
                *a.get_mut(max_row, j) = tmp;
            }
        }

        // Scale sub-column by 1/pivot, then rank-1 update of the trailing block.
        let inv_pivot = T::one() / *a.get(col, col);
        for x in a.col_as_mut_slice(col, col + 1).iter_mut() {
            *x = *x * inv_pivot;
        }
        for j in (col + 1)..n {
            let a_col_j = *a.get(col, j);
            if a_col_j == T::zero() {
                continue;
            }
            for row in (col + 1)..n {
                let l = *a.get(row, col);
                let v = a.get_mut(row, j);
                *v = *v - l * a_col_j;
            }
        }
    }

    Ok(())
}

/// Solve Ax = b given the packed LU decomposition and permutation.
///
/// `b` (input) and `x` (output) are separate slices of length n.
pub fn lu_solve<T: LinalgScalar>(lu: &impl MatrixRef<T>, perm: &[usize], b: &[T], x: &mut [T]) {
    let n = lu.nrows();

    // Forward substitution: Ly = Pb
    for i in 0..n {
        let mut sum = b[perm[i]];
        for j in 0..i {
            sum = sum - *lu.get(i, j) * x[j];
        }
        x[i] = sum;
    }

    // Back substitution: Ux = y
    for i in (0..n).rev() {
        let mut sum = x[i];
        for j in (i + 1)..n {
            sum = sum - *lu.get(i, j) * x[j];
        }
        x[i] = sum / *lu.get(i, i);
    }
}

/// LU decomposition of a dynamically-sized square matrix.
///
/// # Example
///
/// ```
/// use padexp::DynMatrix;
/// use padexp::linalg::DynLu;
///
/// let a = DynMatrix::from_rows(2, 2, &[2.0_f64, 1.0, 5.0, 3.0]);
/// let lu = DynLu::new(&a).unwrap();
///
/// let x = lu.solve(&[4.0, 11.0]);
/// assert!((x[0] - 1.0).abs() < 1e-12);
/// assert!((x[1] - 2.0).abs() < 1e-12);
/// ```
#[derive(Debug)]
pub struct DynLu<T> {
    lu: DynMatrix<T>,
    perm: Vec<usize>,
}

impl<T: LinalgScalar> DynLu<T> {
    /// Decompose a matrix. Returns an error if the matrix is singular.
    pub fn new(a: &DynMatrix<T>) -> Result<Self, LinalgError> {
        assert!(a.is_square(), "LU decomposition requires a square matrix");
        let mut lu = a.clone();
        let mut perm = vec![0usize; a.nrows()];
        lu_in_place(&mut lu, &mut perm)?;
        Ok(Self { lu, perm })
    }

    /// Solve Ax = b for x.
    pub fn solve(&self, b: &[T]) -> Vec<T> {
        let n = self.lu.nrows();
        assert_eq!(b.len(), n, "rhs length mismatch");
        let mut x = vec![T::zero(); n];
        lu_solve(&self.lu, &self.perm, b, &mut x);
        x
    }

    /// Solve AX = B for X, one column of B at a time.
    pub fn solve_matrix(&self, b: &DynMatrix<T>) -> DynMatrix<T> {
        let n = self.lu.nrows();
        assert_eq!(b.nrows(), n, "rhs row count mismatch");
        let mut data = vec![T::zero(); n * b.ncols()];
        for (col, x) in data.chunks_exact_mut(n.max(1)).enumerate() {
            lu_solve(&self.lu, &self.perm, b.col_as_slice(col, 0), x);
        }
        DynMatrix::from_vec(n, b.ncols(), data)
    }
}
