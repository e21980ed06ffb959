use num_traits::{Float, Zero};

use crate::traits::LinalgScalar;

use super::DynMatrix;

impl<T: LinalgScalar> DynMatrix<T> {
    /// One norm (maximum column sum of moduli).
    ///
    /// NaN if any column sum is NaN.
    ///
    /// ```
    /// use padexp::DynMatrix;
    /// let m = DynMatrix::from_rows(2, 2, &[1.0_f64, -2.0, 3.0, 4.0]);
    /// assert!((m.norm_one() - 6.0).abs() < 1e-12);
    /// ```
    pub fn norm_one(&self) -> T::Real {
        let mut max = <T::Real as Zero>::zero();
        if self.nrows == 0 {
            return max;
        }
        for col in self.data.chunks_exact(self.nrows) {
            let col_sum = col
                .iter()
                .fold(<T::Real as Zero>::zero(), |acc, &x| acc + x.modulus());
            if Float::is_nan(col_sum) {
                return col_sum;
            }
            if col_sum > max {
                max = col_sum;
            }
        }
        max
    }
}
