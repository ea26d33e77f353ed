use std::cmp::Ordering;
use std::convert::Infallible;

use num_traits::ToPrimitive;

use crate::debug::debug;
use crate::error::{Error, Result};
use crate::matrix::Matrix;
use crate::traits::Scalar;
use crate::unpack::unpack;

/// Pivot magnitude below which the checked factorizations give up.
pub const DEFAULT_PIVOT_TOLERANCE: f64 = 1e-10;

// Doolittle scheme, for k := 0 to n-1:
// 1.   u_ki := a_ki - sum_{j<k} l_kj u_ji        (i >= k)
// 2.   l_ik := (a_ik - sum_{j<k} l_ij u_jk) / u_kk (i > k)
//
// L (without its unit diagonal) and U share the storage of A.
pub(crate) fn doolittle<S: Scalar, E>(
    n: usize,
    a: &mut [S],
    mut check: impl FnMut(usize, S) -> std::result::Result<(), E>,
) -> std::result::Result<(), E> {
    for k in 0..n {
        for i in k..n {
            for j in 0..k {
                let (lkj, uji) = (a[k * n + j], a[j * n + i]);
                a[k * n + i] -= lkj * uji;
            }
        }

        let d = a[k * n + k];
        debug!("k = {}, u_kk = {}", k, d);
        check(k, d)?;

        for i in k + 1..n {
            for j in 0..k {
                let (lij, ujk) = (a[i * n + j], a[j * n + k]);
                a[i * n + k] -= lij * ujk;
            }
            // A zero pivot yields inf/NaN here, which is left to propagate.
            a[i * n + k] /= d;
        }
    }

    #[cfg(feature = "debug")]
    print!("LU =\n{}", crate::debug::buffer_table(n, a));

    Ok(())
}

/// Rejects a pivot whose magnitude is below `tol` (or is NaN).
pub(crate) fn check_pivot<S: Scalar>(step: usize, d: S, tol: S::Norm) -> Result<()> {
    let magnitude = d.norm();
    match magnitude.partial_cmp(&tol) {
        Some(Ordering::Greater) | Some(Ordering::Equal) => Ok(()),
        _ => Err(Error::SingularPivot {
            step,
            magnitude: magnitude.to_f64().unwrap_or(f64::NAN),
        }),
    }
}

pub(crate) fn permissive<S>(_step: usize, _pivot: S) -> std::result::Result<(), Infallible> {
    Ok(())
}

/// Overwrites `a` with its combined LU factors, without pivoting.
///
/// Strictly-lower entries of `a` become those of L (whose diagonal is
/// implicitly one), the diagonal and above become U. A zero pivot is not
/// an error: the division follows IEEE semantics and the resulting
/// infinities or NaNs end up in the factors.
pub fn lu_in_place<S: Scalar>(a: &mut Matrix<S>) {
    let n = a.n();
    match doolittle(n, a.as_mut_slice(), permissive) {
        Ok(()) => {}
        Err(never) => match never {},
    }
}

/// Like [`lu_in_place`] but fails with [`Error::SingularPivot`] as soon as
/// a pivot with magnitude below `tol` is produced. `a` is left partially
/// factorized in that case.
pub fn lu_in_place_checked<S: Scalar>(a: &mut Matrix<S>, tol: S::Norm) -> Result<()> {
    let n = a.n();
    doolittle(n, a.as_mut_slice(), |k, d| check_pivot(k, d, tol))
}

/// LU decomposition `A = LU` without pivoting.
///
/// Consumes `a`; clone it first if the original is still needed.
pub fn lu_decomposition<S: Scalar>(mut a: Matrix<S>) -> (Matrix<S>, Matrix<S>) {
    lu_in_place(&mut a);
    unpack(&a)
}
