use num_traits::Float;

use crate::dynmatrix::DynMatrix;
use crate::linalg::{DynLu, LinalgError};
use crate::traits::{real, LinalgScalar};

use super::helper::PadeHelper;
use super::PadeDegree;

// Coefficients b_0..b_m of the degree-m diagonal Padé approximant of exp,
// lowest order first (Higham 2005, Table 2.3).

const PADE3: [f64; 4] = [120.0, 60.0, 12.0, 1.0];

const PADE5: [f64; 6] = [30240.0, 15120.0, 3360.0, 420.0, 30.0, 1.0];

const PADE7: [f64; 8] = [
    17297280.0, 8648640.0, 1995840.0, 277200.0, 25200.0, 1512.0, 56.0, 1.0,
];

const PADE9: [f64; 10] = [
    17643225600.0,
    8821612800.0,
    2075673600.0,
    302702400.0,
    30270240.0,
    2162160.0,
    110880.0,
    3960.0,
    90.0,
    1.0,
];

const PADE13: [f64; 14] = [
    64764752532480000.0,
    32382376266240000.0,
    7771770303897600.0,
    1187353796428800.0,
    129060195264000.0,
    10559470521600.0,
    670442572800.0,
    33522128640.0,
    1323241920.0,
    40840800.0,
    960960.0,
    16380.0,
    182.0,
    1.0,
];

impl PadeDegree {
    /// Coefficient table `b_0..b_m` for this degree.
    pub(crate) fn coefficients(self) -> &'static [f64] {
        match self {
            PadeDegree::Three => &PADE3,
            PadeDegree::Five => &PADE5,
            PadeDegree::Seven => &PADE7,
            PadeDegree::Nine => &PADE9,
            PadeDegree::Thirteen => &PADE13,
        }
    }
}

#[inline]
fn coef<T: LinalgScalar>(b: f64) -> T {
    T::from_real(real(b))
}

/// `acc + Σ b_i · M_i + b_I · I`
fn accumulate<T: LinalgScalar>(
    mut acc: DynMatrix<T>,
    terms: &[(f64, &DynMatrix<T>)],
    b_ident: f64,
) -> DynMatrix<T> {
    for &(b, m) in terms {
        acc.axpy(coef(b), m);
    }
    if b_ident != 0.0 {
        acc.add_identity(coef(b_ident));
    }
    acc
}

/// Numerator odd part `U` and even part `V` for degrees 3, 5, 7 and 9.
///
/// `U = A · (b_m A^(m-1) + … + b_3 A^2 + b_1 I)`,
/// `V = b_(m-1) A^(m-1) + … + b_2 A^2 + b_0 I`, using only the cached even
/// powers of `A`.
pub(crate) fn pade_unscaled<T: LinalgScalar>(
    h: &PadeHelper<'_, T>,
    degree: PadeDegree,
) -> (DynMatrix<T>, DynMatrix<T>) {
    debug_assert!(degree != PadeDegree::Thirteen, "degree 13 is evaluated scaled");
    let b = degree.coefficients();
    let n = h.dim();
    let zero = DynMatrix::zeros(n, n, T::zero());

    let mut odd = accumulate(zero.clone(), &[], b[1]);
    let mut even = accumulate(zero, &[], b[0]);
    for k in (2..b.len()).step_by(2) {
        let pk = h.even_power(k);
        odd.axpy(coef(b[k + 1]), pk);
        even.axpy(coef(b[k]), pk);
    }

    (h.a() * &odd, even)
}

/// `U`, `V` of the degree-13 approximant evaluated at `B = 2^-s · A`.
///
/// `B^k = 2^(-ks) · A^k` reuses the cached powers. The nesting
/// `U = B·(B6·(b13 B6 + b11 B4 + b9 B2) + b7 B6 + b5 B4 + b3 B2 + b1 I)` needs
/// only three products beyond `A6`.
pub(crate) fn pade13_scaled<T: LinalgScalar>(
    h: &PadeHelper<'_, T>,
    s: u32,
) -> (DynMatrix<T>, DynMatrix<T>) {
    let b = &PADE13;
    let n = h.dim();
    let two = real::<T::Real>(2.0);
    let s = s as i32;
    let scale = |k: i32| T::from_real(two.powi(-k * s));

    let b1 = h.a() * scale(1);
    let b2 = h.a2() * scale(2);
    let b4 = h.a4() * scale(4);
    let b6 = h.a6() * scale(6);
    let zero = || DynMatrix::zeros(n, n, T::zero());

    let u2 = &b6 * &accumulate(zero(), &[(b[13], &b6), (b[11], &b4), (b[9], &b2)], 0.0);
    let u = &b1 * &accumulate(u2, &[(b[7], &b6), (b[5], &b4), (b[3], &b2)], b[1]);
    let v2 = &b6 * &accumulate(zero(), &[(b[12], &b6), (b[10], &b4), (b[8], &b2)], 0.0);
    let v = accumulate(v2, &[(b[6], &b6), (b[4], &b4), (b[2], &b2)], b[0]);
    (u, v)
}

/// Solve `(V - U) X = (U + V)` for the Padé approximant `X`.
pub(crate) fn solve_p_q<T: LinalgScalar>(
    u: DynMatrix<T>,
    v: DynMatrix<T>,
) -> Result<DynMatrix<T>, LinalgError> {
    let p = &u + &v;
    let q = v - &u;
    Ok(DynLu::new(&q)?.solve_matrix(&p))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// b_j = (2m - j)! / (j! (m - j)!), scaled so that b_m = 1.
    fn pade_coefficient(m: u32, j: u32) -> f64 {
        let fact = |k: u32| (1..=k).fold(1.0_f64, |acc, i| acc * f64::from(i));
        fact(2 * m - j) / (fact(j) * fact(m - j))
    }

    #[test]
    fn tables_match_closed_form() {
        for degree in [
            PadeDegree::Three,
            PadeDegree::Five,
            PadeDegree::Seven,
            PadeDegree::Nine,
            PadeDegree::Thirteen,
        ] {
            let m = degree.order();
            let b = degree.coefficients();
            assert_eq!(b.len() as u32, m + 1);
            for j in 0..=m {
                let expected = pade_coefficient(m, j);
                assert!(
                    (b[j as usize] - expected).abs() <= 1e-13 * expected,
                    "degree {} b[{}] = {} vs {}",
                    m,
                    j,
                    b[j as usize],
                    expected
                );
            }
        }
    }

    #[test]
    fn pade3_scalar() {
        // 1x1: r(x) = (120 + 60x + 12x^2 + x^3) / (120 - 60x + 12x^2 - x^3)
        let x = 0.3_f64;
        let a = DynMatrix::from_diag(&[x]);
        let h = PadeHelper::new(&a);
        let (u, v) = pade_unscaled(&h, PadeDegree::Three);
        assert!((u[(0, 0)] - (60.0 * x + x * x * x)).abs() < 1e-12);
        assert!((v[(0, 0)] - (120.0 + 12.0 * x * x)).abs() < 1e-12);
        let r = solve_p_q(u, v).unwrap();
        let num = 120.0 + 60.0 * x + 12.0 * x * x + x * x * x;
        let den = 120.0 - 60.0 * x + 12.0 * x * x - x * x * x;
        assert!((r[(0, 0)] - num / den).abs() < 1e-14);
    }

    #[test]
    fn pade13_unscaled_equals_direct_polynomials() {
        let a = DynMatrix::from_rows(2, 2, &[0.3_f64, -0.2, 0.1, 0.4]);
        let h = PadeHelper::new(&a);
        let (u, v) = pade13_scaled(&h, 0);

        // Horner on the odd and even parts.
        let b = &PADE13;
        let a2 = &a * &a;
        let mut odd = DynMatrix::zeros(2, 2, 0.0);
        let mut even = DynMatrix::zeros(2, 2, 0.0);
        for j in (0..=6).rev() {
            odd = &odd * &a2;
            odd.add_identity(b[2 * j + 1]);
            even = &even * &a2;
            even.add_identity(b[2 * j]);
        }
        let odd = &a * &odd;
        for i in 0..2 {
            for j in 0..2 {
                assert!((u[(i, j)] - odd[(i, j)]).abs() <= 1e-14 * b[0]);
                assert!((v[(i, j)] - even[(i, j)]).abs() <= 1e-14 * b[0]);
            }
        }
    }

    #[test]
    fn pade13_scaling_matches_scaled_input() {
        let a = DynMatrix::from_rows(2, 2, &[3.0_f64, -2.0, 1.0, 4.0]);
        let h = PadeHelper::new(&a);
        let (u, v) = pade13_scaled(&h, 3);

        let b = a.clone() * 0.125;
        let hb = PadeHelper::new(&b);
        let (ub, vb) = pade13_scaled(&hb, 0);
        for i in 0..2 {
            for j in 0..2 {
                assert!((u[(i, j)] - ub[(i, j)]).abs() <= 1e-14 * PADE13[0]);
                assert!((v[(i, j)] - vb[(i, j)]).abs() <= 1e-14 * PADE13[0]);
            }
        }
    }

    #[test]
    fn singular_denominator() {
        // U = V makes Q = 0.
        let u = DynMatrix::eye(2, 0.0_f64);
        assert_eq!(solve_p_q(u.clone(), u).unwrap_err(), LinalgError::Singular);
    }
}
