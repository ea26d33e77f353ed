use std::ops::Index;

use crate::error::{Error, Result};
use crate::matrix::Matrix;
use crate::traits::{Int, Scalar};

/// Row permutation produced by partial pivoting.
///
/// `perm[i]` is the row of the original matrix that ends up at row `i`,
/// so row `i` of `PA` is row `perm[i]` of `A`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Permutation(Vec<usize>);

impl Permutation {
    pub fn identity(n: usize) -> Self {
        Self((0..n).collect())
    }

    /// Validates that `indices` is a bijection on `0..indices.len()`.
    pub fn from_indices<I: Int>(indices: &[I]) -> Result<Self> {
        let n = indices.len();
        let invalid = || Error::InvalidPermutation {
            n,
            indices: indices.iter().map(|i| i.to_i64().unwrap_or(i64::MAX)).collect(),
        };

        let mut seen = vec![false; n];
        let mut perm = Vec::with_capacity(n);
        for i in indices {
            let j = i.try_index().filter(|&j| j < n).ok_or_else(invalid)?;
            if seen[j] {
                return Err(invalid());
            }
            seen[j] = true;
            perm.push(j);
        }
        Ok(Self(perm))
    }

    pub(crate) fn from_vec_unchecked(perm: Vec<usize>) -> Self {
        Self(perm)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<usize> {
        self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, usize> {
        self.0.iter()
    }

    /// `inv[perm[i]] == i`.
    pub fn inverse(&self) -> Self {
        let mut inv = vec![0; self.0.len()];
        for (i, &p) in self.0.iter().enumerate() {
            inv[p] = i;
        }
        Self(inv)
    }

    /// The permutation matrix P with a one at `(i, perm[i])`.
    pub fn to_matrix<S: Scalar>(&self) -> Matrix<S> {
        Matrix::from_fn(self.0.len(), |i, j| {
            if self.0[i] == j {
                S::one()
            } else {
                S::zero()
            }
        })
    }

    /// Computes `PA` without forming P.
    pub fn permute_rows<S: Scalar>(&self, a: &Matrix<S>) -> Result<Matrix<S>> {
        if a.n() != self.0.len() {
            return Err(Error::DimensionMismatch {
                expected: self.0.len(),
                got: a.n(),
            });
        }
        Ok(Matrix::from_fn(a.n(), |i, j| a[(self.0[i], j)]))
    }
}

impl Index<usize> for Permutation {
    type Output = usize;

    fn index(&self, i: usize) -> &usize {
        &self.0[i]
    }
}

impl<'a> IntoIterator for &'a Permutation {
    type Item = &'a usize;
    type IntoIter = std::slice::Iter<'a, usize>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_indices_accepts_bijection() {
        let p = Permutation::from_indices(&[2i32, 0, 1]).unwrap();
        assert_eq!(p.as_slice(), &[2, 0, 1]);
        assert_eq!(p.inverse().as_slice(), &[1, 2, 0]);
        assert_eq!(p[0], 2);
    }

    #[test]
    fn from_indices_rejects_repeats_and_out_of_range() {
        for bad in [vec![0i32, 0, 1], vec![0, 1, 3], vec![-1, 0, 1]] {
            match Permutation::from_indices(&bad) {
                Err(Error::InvalidPermutation { n, indices }) => {
                    assert_eq!(n, 3);
                    assert_eq!(indices, bad.iter().map(|&i| i as i64).collect::<Vec<_>>());
                }
                r => panic!("{:?} accepted: {:?}", bad, r),
            }
        }
    }

    #[test]
    fn matrix_form_matches_permute_rows() {
        let p = Permutation::from_indices(&[1usize, 2, 0]).unwrap();
        let a = Matrix::from_fn(3, |i, j| (i * 3 + j) as f64);

        let pa = p.to_matrix::<f64>().matmul(&a).unwrap();
        assert_eq!(pa, p.permute_rows(&a).unwrap());
        assert_eq!(pa.row(0), a.row(1));
    }

    #[test]
    fn identity_is_noop() {
        let a = Matrix::from_fn(2, |i, j| (i + 2 * j) as f64);
        assert_eq!(Permutation::identity(2).permute_rows(&a).unwrap(), a);
        assert_eq!(Permutation::identity(2).to_matrix::<f64>(), Matrix::identity(2));
    }

    #[test]
    fn permute_rows_rejects_other_dimension() {
        let a = Matrix::<f64>::identity(3);
        match Permutation::identity(2).permute_rows(&a) {
            Err(Error::DimensionMismatch { expected, got }) => {
                assert_eq!(expected, 2);
                assert_eq!(got, 3);
            }
            r => panic!("unexpected result: {:?}", r),
        }
    }
}
