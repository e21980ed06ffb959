use core::cell::OnceCell;

use num_traits::{Float, One};

use crate::dynmatrix::DynMatrix;
use crate::traits::{real, LinalgScalar};

/// Lazily evaluated powers and norm bounds of one input matrix.
///
/// Every field is computed on first access and reused afterwards. Even
/// powers are chained so that reaching `A^10` costs five products:
/// `A2 = A·A`, `A4 = A2·A2`, `A6 = A4·A2`, `A8 = A6·A2`, `A10 = A4·A6`.
///
/// The "loose" bounds of Higham's algorithm equal the "tight" ones here:
/// exact one-norms are always used.
pub(crate) struct PadeHelper<'a, T: LinalgScalar> {
    a: &'a DynMatrix<T>,
    a2: OnceCell<DynMatrix<T>>,
    a4: OnceCell<DynMatrix<T>>,
    a6: OnceCell<DynMatrix<T>>,
    a8: OnceCell<DynMatrix<T>>,
    a10: OnceCell<DynMatrix<T>>,
    d4: OnceCell<T::Real>,
    d6: OnceCell<T::Real>,
    d8: OnceCell<T::Real>,
    d10: OnceCell<T::Real>,
}

/// `‖M‖₁^(1/k)`
fn root_norm<T: LinalgScalar>(m: &DynMatrix<T>, k: u32) -> T::Real {
    let inv_k = <T::Real as One>::one() / real::<T::Real>(f64::from(k));
    m.norm_one().powf(inv_k)
}

impl<'a, T: LinalgScalar> PadeHelper<'a, T> {
    pub(crate) fn new(a: &'a DynMatrix<T>) -> Self {
        Self {
            a,
            a2: OnceCell::new(),
            a4: OnceCell::new(),
            a6: OnceCell::new(),
            a8: OnceCell::new(),
            a10: OnceCell::new(),
            d4: OnceCell::new(),
            d6: OnceCell::new(),
            d8: OnceCell::new(),
            d10: OnceCell::new(),
        }
    }

    #[inline]
    pub(crate) fn a(&self) -> &'a DynMatrix<T> {
        self.a
    }

    #[inline]
    pub(crate) fn dim(&self) -> usize {
        self.a.nrows()
    }

    // ── Matrix powers ───────────────────────────────────────────────

    pub(crate) fn a2(&self) -> &DynMatrix<T> {
        self.a2.get_or_init(|| self.a * self.a)
    }

    pub(crate) fn a4(&self) -> &DynMatrix<T> {
        self.a4.get_or_init(|| self.a2() * self.a2())
    }

    pub(crate) fn a6(&self) -> &DynMatrix<T> {
        self.a6.get_or_init(|| self.a4() * self.a2())
    }

    pub(crate) fn a8(&self) -> &DynMatrix<T> {
        self.a8.get_or_init(|| self.a6() * self.a2())
    }

    pub(crate) fn a10(&self) -> &DynMatrix<T> {
        self.a10.get_or_init(|| self.a4() * self.a6())
    }

    /// `A^k` for even `k` in `2..=8`.
    pub(crate) fn even_power(&self, k: usize) -> &DynMatrix<T> {
        match k {
            2 => self.a2(),
            4 => self.a4(),
            6 => self.a6(),
            8 => self.a8(),
            _ => unreachable!("no cached power A^{}", k),
        }
    }

    // ── Norm bounds d_k = ‖A^k‖₁^(1/k) ──────────────────────────────

    pub(crate) fn d4_tight(&self) -> T::Real {
        *self.d4.get_or_init(|| root_norm(self.a4(), 4))
    }

    pub(crate) fn d6_tight(&self) -> T::Real {
        *self.d6.get_or_init(|| root_norm(self.a6(), 6))
    }

    pub(crate) fn d8_tight(&self) -> T::Real {
        *self.d8.get_or_init(|| root_norm(self.a8(), 8))
    }

    pub(crate) fn d10_tight(&self) -> T::Real {
        *self.d10.get_or_init(|| root_norm(self.a10(), 10))
    }

    #[inline]
    pub(crate) fn d4_loose(&self) -> T::Real {
        self.d4_tight()
    }

    #[inline]
    pub(crate) fn d6_loose(&self) -> T::Real {
        self.d6_tight()
    }

    #[inline]
    pub(crate) fn d8_loose(&self) -> T::Real {
        self.d8_tight()
    }

    #[inline]
    pub(crate) fn d10_loose(&self) -> T::Real {
        self.d10_tight()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DynMatrix<f64> {
        DynMatrix::from_rows(3, 3, &[0.5, -1.0, 0.25, 2.0, 0.0, -0.5, 1.0, 1.5, -0.75])
    }

    #[test]
    fn powers_are_lazy() {
        let a = sample();
        let h = PadeHelper::new(&a);
        assert!(h.a2.get().is_none());
        let _ = h.a6();
        assert!(h.a2.get().is_some());
        assert!(h.a4.get().is_some());
        assert!(h.a8.get().is_none());
        assert!(h.a10.get().is_none());
        assert!(h.d4.get().is_none());
    }

    #[test]
    fn powers_are_memoised() {
        let a = sample();
        let h = PadeHelper::new(&a);
        let first: *const DynMatrix<f64> = h.a10();
        let second: *const DynMatrix<f64> = h.a10();
        assert!(core::ptr::eq(first, second));
        assert!(core::ptr::eq(h.even_power(4), h.a4()));
        assert_eq!(h.d8_tight(), h.d8_tight());
    }

    #[test]
    fn powers_match_repeated_multiplication() {
        let a = sample();
        let h = PadeHelper::new(&a);
        let mut p = a.clone();
        for k in 2..=10 {
            p = &p * &a;
            let cached = match k {
                2 => h.a2(),
                4 => h.a4(),
                6 => h.a6(),
                8 => h.a8(),
                10 => h.a10(),
                _ => continue,
            };
            for i in 0..3 {
                for j in 0..3 {
                    assert!(
                        (cached[(i, j)] - p[(i, j)]).abs() < 1e-12 * (1.0 + p[(i, j)].abs()),
                        "A^{}[({},{})]",
                        k,
                        i,
                        j
                    );
                }
            }
        }
    }

    #[test]
    fn bounds() {
        let a = DynMatrix::from_diag(&[2.0_f64, -0.5]);
        let h = PadeHelper::new(&a);
        // ‖A^k‖₁ = 2^k, so every d_k is 2.
        for d in [h.d4_tight(), h.d6_tight(), h.d8_tight(), h.d10_tight()] {
            assert!((d - 2.0).abs() < 1e-14);
        }
        assert_eq!(h.d4_loose(), h.d4_tight());
        assert_eq!(h.d10_loose(), h.d10_tight());
    }
}
