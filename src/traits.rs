use core::fmt::Debug;
use num_traits::{Float, Num, NumCast, One, Zero};

#[cfg(feature = "complex")]
use num_complex::Complex;

/// Trait for types that can be used as matrix elements.
///
/// Blanket-implemented for all types satisfying the bounds.
pub trait Scalar: Copy + PartialEq + Debug + Zero + One + Num {}

impl<T: Copy + PartialEq + Debug + Zero + One + Num> Scalar for T {}

/// Real floating-point scalar (`f32`, `f64`).
///
/// Norms, error bounds and scaling factors live in this type.
/// Implies `LinalgScalar<Real = Self>` since real floats are their own real type.
pub trait FloatScalar: Scalar + Float + LinalgScalar<Real = Self> {}

impl<T: Scalar + Float + LinalgScalar<Real = T>> FloatScalar for T {}

/// Matrix elements the exponential is defined for.
///
/// Covers real floats (`f32`, `f64`) and, with the `complex` feature,
/// `Complex<f32>` / `Complex<f64>`.
pub trait LinalgScalar: Scalar {
    /// The real component type (`Self` for reals, `T` for `Complex<T>`).
    type Real: FloatScalar;

    /// Absolute value / modulus: `|z|` for complex, `.abs()` for real.
    fn modulus(self) -> Self::Real;

    /// Machine epsilon of the underlying real type.
    fn lepsilon() -> Self::Real;

    /// Promote a real value into `Self`.
    fn from_real(r: Self::Real) -> Self;
}

macro_rules! impl_linalg_scalar_real {
    ($($t:ty),*) => {
        $(
            impl LinalgScalar for $t {
                type Real = $t;

                #[inline] fn modulus(self) -> $t { Float::abs(self) }
                #[inline] fn lepsilon() -> $t { <$t as Float>::epsilon() }
                #[inline] fn from_real(r: $t) -> $t { r }
            }
        )*
    };
}

impl_linalg_scalar_real!(f32, f64);

#[cfg(feature = "complex")]
impl<T: FloatScalar> LinalgScalar for Complex<T> {
    type Real = T;

    #[inline]
    fn modulus(self) -> T {
        self.norm()
    }

    #[inline]
    fn lepsilon() -> T {
        T::epsilon()
    }

    #[inline]
    fn from_real(r: T) -> Self {
        Complex::new(r, T::zero())
    }
}

/// Convert an `f64` literal into the working real type.
///
/// Only used for mathematical constants, which are representable (possibly
/// rounded) in every `FloatScalar`.
#[inline]
pub(crate) fn real<R: FloatScalar>(x: f64) -> R {
    <R as NumCast>::from(x).unwrap()
}

/// Read-only access to a column-major matrix.
///
/// Lets the decomposition kernels in [`crate::linalg`] run on any storage
/// that exposes contiguous columns.
pub trait MatrixRef<T> {
    fn nrows(&self) -> usize;
    fn ncols(&self) -> usize;
    fn get(&self, row: usize, col: usize) -> &T;
    /// Contiguous slice `m[row_start..nrows, col]`.
    fn col_as_slice(&self, col: usize, row_start: usize) -> &[T];
}

/// Mutable access to a column-major matrix.
pub trait MatrixMut<T>: MatrixRef<T> {
    fn get_mut(&mut self, row: usize, col: usize) -> &mut T;
    /// Mutable contiguous slice `m[row_start..nrows, col]`.
    fn col_as_mut_slice(&mut self, col: usize, row_start: usize) -> &mut [T];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn real_modulus() {
        assert_eq!((-3.0_f64).modulus(), 3.0);
        assert_eq!(2.5_f32.modulus(), 2.5);
    }

    #[test]
    fn real_constant_conversion() {
        let x: f32 = real(0.25);
        assert_eq!(x, 0.25);
        let y: f64 = real(1.495585217958292e-2);
        assert_eq!(y, 1.495585217958292e-2);
    }

    #[cfg(feature = "complex")]
    #[test]
    fn complex_modulus() {
        let z = Complex::new(3.0_f64, -4.0);
        assert!((z.modulus() - 5.0).abs() < 1e-15);
        assert_eq!(Complex::<f64>::from_real(2.0), Complex::new(2.0, 0.0));
    }
}
