use crate::debug::debug;
use crate::error::{Error, Result};
use crate::matrix::Matrix;
use crate::plu::plu_decomposition;
use crate::traits::Scalar;

fn check_len<S>(n: usize, b: &[S]) -> Result<()> {
    if b.len() != n {
        return Err(Error::DimensionMismatch {
            expected: n,
            got: b.len(),
        });
    }
    Ok(())
}

/// Solve `Ax=b` by partial-pivot LU decomposition, overwriting `b` with x.
/// With `trans` set, solves `A'x=b` instead.
pub fn solve<S: Scalar>(a_mat: Matrix<S>, b: &mut [S], trans: bool) -> Result<()> {
    let n = a_mat.n();
    check_len(n, b)?;

    let (perm, l_mat, u_mat) = plu_decomposition(a_mat);

    if !trans {
        // LUx = Pb
        let mut x: Vec<S> = perm.iter().map(|&p| b[p]).collect();
        lsolve(&l_mat, &mut x);
        usolve(&u_mat, &mut x);
        b.copy_from_slice(&x);
    } else {
        // U'L'Px = b
        let mut x = b.to_vec();
        utsolve(&u_mat, &mut x);
        ltsolve(&l_mat, &mut x);
        for (i, &p) in perm.iter().enumerate() {
            b[p] = x[i];
        }
    }
    Ok(())
}

/// Forward substitution with a unit lower-triangular L.
pub fn lsolve<S: Scalar>(l_mat: &Matrix<S>, b: &mut [S]) {
    for i in 0..b.len() {
        for j in 0..i {
            let (lij, bj) = (l_mat[(i, j)], b[j]);
            b[i] -= lij * bj;
        }
    }
}

/// Back substitution with L' (unit upper-triangular).
pub fn ltsolve<S: Scalar>(l_mat: &Matrix<S>, b: &mut [S]) {
    for i in (0..b.len()).rev() {
        for j in i + 1..b.len() {
            let (lji, bj) = (l_mat[(j, i)], b[j]);
            b[i] -= lji * bj;
        }
    }
}

/// Back substitution with an upper-triangular U.
pub fn usolve<S: Scalar>(u_mat: &Matrix<S>, b: &mut [S]) {
    for i in (0..b.len()).rev() {
        for j in i + 1..b.len() {
            let (uij, bj) = (u_mat[(i, j)], b[j]);
            b[i] -= uij * bj;
        }
        b[i] /= u_mat[(i, i)];
    }
}

/// Forward substitution with U' (lower-triangular).
pub fn utsolve<S: Scalar>(u_mat: &Matrix<S>, b: &mut [S]) {
    for i in 0..b.len() {
        for j in 0..i {
            let (uji, bj) = (u_mat[(j, i)], b[j]);
            b[i] -= uji * bj;
        }
        b[i] /= u_mat[(i, i)];
    }
}

/// Solves `Ax=b` by Gaussian elimination without pivoting, overwriting `b`
/// with x.
///
/// The multipliers are kept below the diagonal of `a_mat` and the
/// eliminated upper triangle above it, the same layout
/// [`crate::lu_in_place`] produces.
pub fn gauss_solve_in_place<S: Scalar>(a_mat: &mut Matrix<S>, b: &mut [S]) -> Result<()> {
    let n = a_mat.n();
    check_len(n, b)?;
    let a = a_mat.as_mut_slice();

    for k in 0..n {
        let d = a[k * n + k];
        for i in k + 1..n {
            a[i * n + k] /= d;
            let lik = a[i * n + k];
            for j in k + 1..n {
                let ukj = a[k * n + j];
                a[i * n + j] -= lik * ukj;
            }
            let bk = b[k];
            b[i] -= lik * bk;
        }
    }
    debug!("y = {:?}", b);

    for i in (0..n).rev() {
        for j in i + 1..n {
            let (uij, bj) = (a[i * n + j], b[j]);
            b[i] -= uij * bj;
        }
        b[i] /= a[i * n + i];
    }
    Ok(())
}

/// Inverse of [`crate::lu_in_place`]: multiplies the combined factors back
/// together, restoring A in place.
pub fn lu_reconstruct_in_place<S: Scalar>(a_mat: &mut Matrix<S>) {
    let n = a_mat.n();
    let a = a_mat.as_mut_slice();

    for k in (0..n).rev() {
        let ukk = a[k * n + k];
        for i in k + 1..n {
            a[i * n + k] *= ukk;
            for j in 0..k {
                let (lij, ujk) = (a[i * n + j], a[j * n + k]);
                a[i * n + k] += lij * ujk;
            }
        }
        for i in k..n {
            for j in 0..k {
                let (lkj, uji) = (a[k * n + j], a[j * n + i]);
                a[k * n + i] += lkj * uji;
            }
        }
    }
}
