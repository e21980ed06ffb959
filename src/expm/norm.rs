use alloc::vec;

use num_traits::{Float, ToPrimitive};

use crate::dynmatrix::DynMatrix;
use crate::traits::{real, FloatScalar, LinalgScalar, MatrixRef};

use super::ExpmError;

/// Matrix one-norm: maximum absolute column sum.
///
/// ```
/// use padexp::DynMatrix;
/// use padexp::expm::onenorm;
///
/// let m = DynMatrix::from_rows(2, 2, &[1.0_f64, -2.0, 3.0, 4.0]);
/// assert_eq!(onenorm(&m), 6.0);
/// ```
#[inline]
pub fn onenorm<T: LinalgScalar>(m: &DynMatrix<T>) -> T::Real {
    m.norm_one()
}

/// One-norm of `A^p` for an entrywise non-negative matrix `A`, without
/// forming the power.
///
/// Since `A ≥ 0`, `‖A^p‖₁ = max(Aᵀ^p · 1)`, so `p` matrix-vector products
/// suffice. `p` must be a non-negative integer value.
///
/// ```
/// use padexp::DynMatrix;
/// use padexp::expm::onenorm_matrix_power_nnm;
///
/// let a = DynMatrix::from_rows(2, 2, &[1.0_f64, 2.0, 3.0, 4.0]);
/// // A^3 = [[37, 54], [81, 118]]
/// assert_eq!(onenorm_matrix_power_nnm(&a, 3.0).unwrap(), 172.0);
/// assert!(onenorm_matrix_power_nnm(&a, 2.5).is_err());
/// ```
pub fn onenorm_matrix_power_nnm<R: FloatScalar>(a: &DynMatrix<R>, p: f64) -> Result<R, ExpmError> {
    if !(p >= 0.0) || !p.is_finite() || Float::fract(p) != 0.0 {
        return Err(ExpmError::InvalidArgument("expected non-negative integer p"));
    }
    if !a.is_square() {
        return Err(ExpmError::InvalidArgument("expected A to be a square matrix"));
    }
    let (v, exp) = power_norm_nnm(a, p as usize);
    Ok(scale_pow2(v, exp))
}

/// `‖A^p‖₁` of a non-negative square matrix as `v · 2^exp`.
///
/// `A` is first scaled by a power of two so that its largest entry lies in
/// `(1/2, 1]`, and the iterate is renormalised to a maximum in `[1, 2)` after
/// every step. Both scalings are exact in binary floating point, so no step
/// can overflow or underflow as a whole. A zero result is returned as
/// `(0, 0)`; non-finite entries in `A` propagate as `(inf | NaN, 0)`.
pub(crate) fn power_norm_nnm<R: FloatScalar>(a: &DynMatrix<R>, p: usize) -> (R, i64) {
    let n = a.nrows();
    let mut v = vec![R::one(); n];
    let mut next = vec![R::zero(); n];
    if p == 0 {
        return (max_of(&v), 0);
    }

    let top = max_of(a.as_slice());
    let (a, mut exp) = if top > R::zero() && top.is_finite() {
        let k = top.log2().ceil().to_i64().unwrap_or(0);
        let scaled = a.map(|x| scale_pow2(x, -k));
        (scaled, k.saturating_mul(p as i64))
    } else {
        (a.clone(), 0)
    };

    for _ in 0..p {
        // next = Aᵀ v: entry i is column i of A dotted with v.
        for (i, out) in next.iter_mut().enumerate() {
            *out = a
                .col_as_slice(i, 0)
                .iter()
                .zip(v.iter())
                .fold(R::zero(), |acc, (&x, &y)| acc + x * y);
        }
        core::mem::swap(&mut v, &mut next);

        let max = max_of(&v);
        if !max.is_finite() || max == R::zero() {
            return (max, 0);
        }
        let e = max.log2().floor().to_i64().unwrap_or(0);
        if e != 0 {
            for x in v.iter_mut() {
                *x = scale_pow2(*x, -e);
            }
            exp = exp.saturating_add(e);
        }
    }

    (max_of(&v), exp)
}

/// Largest element, or NaN if any element is NaN.
#[inline]
fn max_of<R: FloatScalar>(v: &[R]) -> R {
    v.iter()
        .fold(R::zero(), |m, &x| if x > m || x.is_nan() { x } else { m })
}

/// `x · 2^e` in steps of at most `2^64`, so the factor itself never
/// overflows in `f32` or `f64`.
fn scale_pow2<R: FloatScalar>(mut x: R, e: i64) -> R {
    if x == R::zero() || !x.is_finite() {
        return x;
    }
    let two = real::<R>(2.0);
    let up = two.powi(64);
    let down = two.powi(-64);
    let mut e = e.clamp(-2400, 2400);
    while e > 64 {
        x = x * up;
        e -= 64;
    }
    while e < -64 {
        x = x * down;
        e += 64;
    }
    x * two.powi(e as i32)
}

/// `C(2m, m) · (2m+1)!`, the reciprocal of the leading coefficient of the
/// degree-`m` Padé remainder.
fn abs_c_recip(m: u32) -> f64 {
    let mut choose = 1.0_f64;
    for i in 1..=m {
        choose = choose * f64::from(m + i) / f64::from(i);
    }
    let mut fact = 1.0_f64;
    for i in 2..=(2 * m + 1) {
        fact *= f64::from(i);
    }
    choose * fact
}

/// Number of extra halvings of `A` needed before the degree-`m` Padé
/// approximant reaches double precision (Higham 2009, eq. 1.2).
///
/// Returns 0 when `‖|A|^(2m+1)‖₁` vanishes.
///
/// ```
/// use padexp::DynMatrix;
/// use padexp::expm::ell;
///
/// let small = DynMatrix::from_diag(&[0.01_f64, 0.02]);
/// assert_eq!(ell(&small, 3).unwrap(), 0);
/// ```
pub fn ell<T: LinalgScalar>(a: &DynMatrix<T>, m: u32) -> Result<u32, ExpmError> {
    if m == 0 {
        return Err(ExpmError::InvalidArgument("expected a positive Padé degree"));
    }
    if !a.is_square() {
        return Err(ExpmError::InvalidArgument("expected A to be a square matrix"));
    }
    if !a.is_finite() {
        return Err(ExpmError::InvalidArgument("matrix has non-finite entries"));
    }
    let (nap, exp) = power_norm_nnm(&a.modulus(), (2 * m + 1) as usize);
    if nap == <T::Real as num_traits::Zero>::zero() {
        return Ok(0);
    }

    // log2(alpha / u) with u = 2^-53, evaluated in the log domain.
    let log2_alpha = nap.log2() + real::<T::Real>(exp as f64)
        - onenorm(a).log2()
        - real::<T::Real>(Float::log2(abs_c_recip(m)));
    let log2_alpha_div_u = log2_alpha + real::<T::Real>(53.0);
    let value = (log2_alpha_div_u / real::<T::Real>(f64::from(2 * m))).ceil();
    Ok(value.max(<T::Real as num_traits::Zero>::zero()).to_u32().unwrap_or(u32::MAX))
}
