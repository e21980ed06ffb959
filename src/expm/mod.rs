//! Matrix exponential by scaling and squaring with diagonal Padé approximants.
//!
//! Implements the algorithm of Al-Mohy & Higham (2009), itself a refinement
//! of Higham (2005): the cheapest Padé degree `m ∈ {3, 5, 7, 9}` whose error
//! bound holds is used directly; otherwise degree 13 is applied to
//! `A / 2^s` and the result squared `s` times.
//!
//! Degree selection uses `d_k = ‖A^k‖₁^(1/k)` rather than `‖A‖₁`, which
//! avoids over-scaling strongly non-normal matrices, plus the backward error
//! correction [`ell`].
//!
//! # Example
//!
//! ```
//! use padexp::DynMatrix;
//! use padexp::expm::{expm_with_info, PadeDegree};
//!
//! // Rotation generator: exp(t·J) = [[cos t, sin t], [-sin t, cos t]]
//! let t = 20.0_f64;
//! let a = DynMatrix::from_rows(2, 2, &[0.0, t, -t, 0.0]);
//! let (x, info) = expm_with_info(&a).unwrap();
//!
//! assert_eq!(info.degree, PadeDegree::Thirteen);
//! assert_eq!(info.squarings, 3);
//! assert!((x[(0, 0)] - t.cos()).abs() < 1e-10);
//! assert!((x[(0, 1)] - t.sin()).abs() < 1e-10);
//! ```

mod helper;
mod norm;
mod pade;

pub use norm::{ell, onenorm, onenorm_matrix_power_nnm};

use num_traits::Float;

use crate::dynmatrix::DynMatrix;
use crate::linalg::LinalgError;
use crate::traits::{real, FloatScalar, LinalgScalar};

use helper::PadeHelper;
use pade::{pade13_scaled, pade_unscaled, solve_p_q};

// Largest `max(d_{2k}, d_{2k+2})` for which each degree meets unit roundoff
// (Al-Mohy & Higham 2009, Table 3.1).
const THETA3: f64 = 1.495585217958292e-2;
const THETA5: f64 = 2.539398330063230e-1;
const THETA7: f64 = 9.504178996162932e-1;
const THETA9: f64 = 2.097847961257068e0;
const THETA13: f64 = 4.25;

/// Degree of the diagonal Padé approximant used for one exponential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PadeDegree {
    Three,
    Five,
    Seven,
    Nine,
    Thirteen,
}

impl PadeDegree {
    /// Numerator/denominator polynomial degree `m`.
    pub fn order(self) -> u32 {
        match self {
            PadeDegree::Three => 3,
            PadeDegree::Five => 5,
            PadeDegree::Seven => 7,
            PadeDegree::Nine => 9,
            PadeDegree::Thirteen => 13,
        }
    }
}

impl core::fmt::Display for PadeDegree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "[{}/{}]", self.order(), self.order())
    }
}

/// How an exponential was computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpmInfo {
    /// Padé degree that was selected.
    pub degree: PadeDegree,
    /// Number of squarings `s` applied; always 0 below degree 13.
    pub squarings: u32,
}

/// Errors from the matrix exponential.
///
/// ```
/// use padexp::DynMatrix;
/// use padexp::expm::{expm, ExpmError};
///
/// let rect = DynMatrix::zeros(2, 3, 0.0_f64);
/// assert!(matches!(expm(&rect), Err(ExpmError::InvalidArgument(_))));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExpmError {
    /// Non-square, empty or non-finite input, or an invalid helper argument.
    InvalidArgument(&'static str),
    /// The Padé denominator `V - U` could not be factored.
    NumericalFailure(LinalgError),
    /// The power-norm bounds overflowed, so no finite scaling exists.
    NormOverflow,
}

impl core::fmt::Display for ExpmError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ExpmError::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            ExpmError::NumericalFailure(e) => write!(f, "numerical failure: {}", e),
            ExpmError::NormOverflow => write!(f, "matrix power norms overflow"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ExpmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExpmError::NumericalFailure(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LinalgError> for ExpmError {
    fn from(e: LinalgError) -> Self {
        ExpmError::NumericalFailure(e)
    }
}

/// Matrix exponential `e^A` of a square real or complex matrix.
///
/// See [`expm_with_info`] for the selected degree and scaling.
///
/// ```
/// use padexp::DynMatrix;
/// use padexp::expm::expm;
///
/// let a = DynMatrix::from_diag(&[1.0_f64, -2.0]);
/// let x = expm(&a).unwrap();
/// assert!((x[(0, 0)] - 1.0_f64.exp()).abs() < 1e-14);
/// assert!((x[(1, 1)] - (-2.0_f64).exp()).abs() < 1e-15);
/// assert_eq!(x[(0, 1)], 0.0);
/// ```
pub fn expm<T: LinalgScalar>(a: &DynMatrix<T>) -> Result<DynMatrix<T>, ExpmError> {
    expm_with_info(a).map(|(x, _)| x)
}

/// Matrix exponential together with the Padé degree and squaring count used.
pub fn expm_with_info<T: LinalgScalar>(
    a: &DynMatrix<T>,
) -> Result<(DynMatrix<T>, ExpmInfo), ExpmError> {
    if !a.is_square() {
        return Err(ExpmError::InvalidArgument("expected a square matrix"));
    }
    if a.nrows() == 0 {
        return Err(ExpmError::InvalidArgument("expected a non-empty matrix"));
    }
    if !a.is_finite() {
        return Err(ExpmError::InvalidArgument("matrix has non-finite entries"));
    }

    let h = PadeHelper::new(a);

    let eta1 = bound_max(h.d4_loose(), h.d6_loose());
    log::trace!("expm: eta1 = {:?}", eta1);
    // A4 and A6 feed every approximant, degree 13 included.
    if !eta1.is_finite() {
        return Err(ExpmError::NormOverflow);
    }
    if eta1 < real::<T::Real>(THETA3) && ell(a, 3)? == 0 {
        return unscaled(&h, PadeDegree::Three);
    }

    let eta2 = bound_max(h.d4_tight(), h.d6_loose());
    if eta2 < real::<T::Real>(THETA5) && ell(a, 5)? == 0 {
        return unscaled(&h, PadeDegree::Five);
    }

    let eta3 = bound_max(h.d6_tight(), h.d8_loose());
    log::trace!("expm: eta3 = {:?}", eta3);
    if eta3 < real::<T::Real>(THETA7) && ell(a, 7)? == 0 {
        return unscaled(&h, PadeDegree::Seven);
    }
    if eta3 < real::<T::Real>(THETA9) && ell(a, 9)? == 0 {
        return unscaled(&h, PadeDegree::Nine);
    }

    let eta4 = bound_max(h.d8_loose(), h.d10_loose());
    let eta5 = bound_min(eta3, eta4);
    log::trace!("expm: eta4 = {:?}, eta5 = {:?}", eta4, eta5);

    let mut s = scaling_exponent(eta5)?;
    let two = real::<T::Real>(2.0);
    s += ell(&(a * T::from_real(two.powi(-(s as i32)))), 13)?;

    let (u, v) = pade13_scaled(&h, s);
    let mut x = solve_p_q(u, v)?;
    for _ in 0..s {
        x = &x * &x;
    }

    let info = ExpmInfo {
        degree: PadeDegree::Thirteen,
        squarings: s,
    };
    log::debug!("expm: n = {}, Padé {}, {} squarings", a.nrows(), info.degree, s);
    Ok((x, info))
}

fn unscaled<T: LinalgScalar>(
    h: &PadeHelper<'_, T>,
    degree: PadeDegree,
) -> Result<(DynMatrix<T>, ExpmInfo), ExpmError> {
    let (u, v) = pade_unscaled(h, degree);
    let x = solve_p_q(u, v)?;
    log::debug!("expm: n = {}, Padé {}, no scaling", h.dim(), degree);
    Ok((x, ExpmInfo { degree, squarings: 0 }))
}

/// `max` that returns NaN if either bound is NaN.
fn bound_max<R: FloatScalar>(x: R, y: R) -> R {
    if x.is_nan() || y.is_nan() {
        R::nan()
    } else {
        x.max(y)
    }
}

/// `min` that returns NaN if either bound is NaN.
fn bound_min<R: FloatScalar>(x: R, y: R) -> R {
    if x.is_nan() || y.is_nan() {
        R::nan()
    } else {
        x.min(y)
    }
}

/// Smallest `s ≥ 0` with `2^-s · eta5 ≤ θ13`.
///
/// `eta5 == 0` only happens for nilpotent input and yields `s = 0`.
fn scaling_exponent<R: FloatScalar>(eta5: R) -> Result<u32, ExpmError> {
    if eta5 == R::zero() {
        return Ok(0);
    }
    if !eta5.is_finite() {
        return Err(ExpmError::NormOverflow);
    }
    let s = (eta5 / real::<R>(THETA13)).log2().ceil().max(R::zero());
    s.to_u32().ok_or(ExpmError::NormOverflow)
}

impl<T: LinalgScalar> DynMatrix<T> {
    /// Matrix exponential `e^A`; see [`expm`](crate::expm::expm).
    ///
    /// ```
    /// use padexp::DynMatrix;
    ///
    /// let z = DynMatrix::zeros(3, 3, 0.0_f64);
    /// assert_eq!(z.expm().unwrap(), DynMatrix::eye(3, 0.0));
    /// ```
    pub fn expm(&self) -> Result<Self, ExpmError> {
        expm(self)
    }
}
