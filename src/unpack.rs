use std::cmp::Ordering;

use crate::matrix::Matrix;
use crate::traits::Scalar;

/// Splits a combined in-place factorization into explicit factors.
///
/// Entries strictly below the diagonal of `a` go to the unit
/// lower-triangular L; the diagonal and everything above go to the
/// upper-triangular U. Both are freshly allocated and `a` is not modified.
pub fn unpack<S: Scalar>(a: &Matrix<S>) -> (Matrix<S>, Matrix<S>) {
    let n = a.n();

    let l_mat = Matrix::from_fn(n, |i, j| match j.cmp(&i) {
        Ordering::Less => a[(i, j)],
        Ordering::Equal => S::one(),
        Ordering::Greater => S::zero(),
    });
    let u_mat = Matrix::from_fn(n, |i, j| if j < i { S::zero() } else { a[(i, j)] });

    (l_mat, u_mat)
}
