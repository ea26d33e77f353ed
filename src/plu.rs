use crate::debug::debug;
use crate::error::Result;
use crate::lu::{check_pivot, permissive};
use crate::matrix::{swap_rows, Matrix};
use crate::permutation::Permutation;
use crate::traits::{Int, Scalar};
use crate::unpack::unpack;

// Gaussian elimination with partial pivoting, for k := 0 to n-1:
// 1. Pivot: first row p >= k with the largest |a_pk|;
// 2. Swap rows k and p of A and entries k and p of perm;
// 3. l_ik := a_ik / a_kk, a_ij -= l_ik a_kj   (i, j > k)
//
// perm[i] is the original row that ends up at row i, so PA = LU.
pub(crate) fn partial_pivot<S: Scalar, I: Int, E>(
    n: usize,
    a: &mut [S],
    perm: &mut [I],
    mut check: impl FnMut(usize, S) -> std::result::Result<(), E>,
) -> std::result::Result<(), E> {
    for (i, p) in perm.iter_mut().enumerate() {
        *p = I::from_usize(i);
    }

    for k in 0..n {
        // Strict comparison keeps the first maximal row on ties.
        let mut pivot = k;
        for i in k + 1..n {
            if a[i * n + k].norm() > a[pivot * n + k].norm() {
                pivot = i;
            }
        }

        if pivot != k {
            swap_rows(n, a, k, pivot);
            perm.swap(k, pivot);
        }

        let d = a[k * n + k];
        debug!("k = {}, pivrow = {}, u_kk = {}", k, pivot, d);
        check(k, d)?;

        for i in k + 1..n {
            a[i * n + k] /= d;
            let lik = a[i * n + k];
            for j in k + 1..n {
                let ukj = a[k * n + j];
                a[i * n + j] -= lik * ukj;
            }
        }
    }

    #[cfg(feature = "debug")]
    print!("PLU =\n{}", crate::debug::buffer_table(n, a));
    debug!("perm = {:?}", perm);

    Ok(())
}

/// Overwrites `a` with the combined factors of `PA = LU` and returns the
/// row permutation.
///
/// As with [`crate::lu_in_place`], a zero pivot (only possible when `a` is
/// singular) is not trapped and its inf/NaN results propagate.
pub fn plu_in_place<S: Scalar>(a: &mut Matrix<S>) -> Permutation {
    let n = a.n();
    let mut perm = vec![0usize; n];
    match partial_pivot(n, a.as_mut_slice(), &mut perm, permissive) {
        Ok(()) => {}
        Err(never) => match never {},
    }
    Permutation::from_vec_unchecked(perm)
}

/// Like [`plu_in_place`] but stops with [`crate::Error::SingularPivot`] on
/// the first pivot whose magnitude is below `tol`.
pub fn plu_in_place_checked<S: Scalar>(a: &mut Matrix<S>, tol: S::Norm) -> Result<Permutation> {
    let n = a.n();
    let mut perm = vec![0usize; n];
    partial_pivot(n, a.as_mut_slice(), &mut perm, |k, d| check_pivot(k, d, tol))?;
    Ok(Permutation::from_vec_unchecked(perm))
}

/// PLU decomposition `PA = LU` with partial pivoting.
///
/// Consumes `a`; clone it first if the original is still needed.
pub fn plu_decomposition<S: Scalar>(mut a: Matrix<S>) -> (Permutation, Matrix<S>, Matrix<S>) {
    let perm = plu_in_place(&mut a);
    let (l_mat, u_mat) = unpack(&a);
    (perm, l_mat, u_mat)
}
