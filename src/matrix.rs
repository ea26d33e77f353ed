use std::ops::{Index, IndexMut};

use crate::error::{Error, Result};
use crate::traits::Scalar;

/// Square dense matrix stored row-major in a single buffer with stride `n`.
///
/// The shape is checked once, at construction, so the factorization kernels
/// never see ragged or rectangular input.
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix<S> {
    n: usize,
    data: Vec<S>,
}

impl<S: Scalar> Matrix<S> {
    pub fn zeros(n: usize) -> Self {
        Self {
            n,
            data: vec![S::zero(); n * n],
        }
    }

    pub fn identity(n: usize) -> Self {
        Self::from_fn(n, |i, j| if i == j { S::one() } else { S::zero() })
    }

    pub fn from_fn<F: FnMut(usize, usize) -> S>(n: usize, mut f: F) -> Self {
        let mut data = Vec::with_capacity(n * n);
        for i in 0..n {
            for j in 0..n {
                data.push(f(i, j));
            }
        }
        Self { n, data }
    }

    /// Builds a matrix from nested rows, rejecting ragged and non-square input.
    pub fn from_rows(rows: Vec<Vec<S>>) -> Result<Self> {
        let n = rows.len();
        let mut data = Vec::with_capacity(n * n);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n {
                return Err(if i == 0 {
                    Error::NotSquare {
                        rows: n,
                        cols: row.len(),
                    }
                } else {
                    Error::Ragged {
                        row: i,
                        len: row.len(),
                        expected: n,
                    }
                });
            }
            data.extend(row);
        }
        Ok(Self { n, data })
    }

    /// Wraps a flat row-major buffer of length `n * n`.
    pub fn from_row_major(n: usize, data: Vec<S>) -> Result<Self> {
        if data.len() != n * n {
            return Err(Error::BufferLength {
                expected: n * n,
                got: data.len(),
            });
        }
        Ok(Self { n, data })
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn row(&self, i: usize) -> &[S] {
        &self.data[i * self.n..(i + 1) * self.n]
    }

    pub fn to_rows(&self) -> Vec<Vec<S>> {
        (0..self.n).map(|i| self.row(i).to_vec()).collect()
    }

    pub fn as_slice(&self) -> &[S] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [S] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<S> {
        self.data
    }

    pub fn swap_rows(&mut self, r1: usize, r2: usize) {
        swap_rows(self.n, &mut self.data, r1, r2);
    }

    pub fn matmul(&self, rhs: &Matrix<S>) -> Result<Matrix<S>> {
        if rhs.n != self.n {
            return Err(Error::DimensionMismatch {
                expected: self.n,
                got: rhs.n,
            });
        }
        let n = self.n;
        let mut c = Matrix::zeros(n);
        for i in 0..n {
            for k in 0..n {
                let aik = self.data[i * n + k];
                for j in 0..n {
                    c.data[i * n + j] += aik * rhs.data[k * n + j];
                }
            }
        }
        Ok(c)
    }

    /// Largest entrywise magnitude of `self - rhs`.
    pub fn max_abs_diff(&self, rhs: &Matrix<S>) -> Option<S::Norm> {
        if rhs.n != self.n {
            return None;
        }
        self.data
            .iter()
            .zip(&rhs.data)
            .map(|(&a, &b)| (a - b).norm())
            .reduce(nan_max)
    }

    /// Largest entrywise magnitude, NaN if any entry is NaN.
    pub fn max_abs(&self) -> Option<S::Norm> {
        self.data.iter().map(|x| x.norm()).reduce(nan_max)
    }
}

impl<S> Index<(usize, usize)> for Matrix<S> {
    type Output = S;

    fn index(&self, (i, j): (usize, usize)) -> &S {
        &self.data[i * self.n + j]
    }
}

impl<S> IndexMut<(usize, usize)> for Matrix<S> {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut S {
        &mut self.data[i * self.n + j]
    }
}

fn is_nan<N: PartialOrd>(x: &N) -> bool {
    x.partial_cmp(x).is_none()
}

// Maximum that lets a NaN on either side win.
fn nan_max<N: PartialOrd>(m: N, d: N) -> N {
    if is_nan(&m) || (!is_nan(&d) && d <= m) {
        m
    } else {
        d
    }
}

/// Exchanges rows `r1` and `r2` of a row-major buffer with stride `n`.
pub(crate) fn swap_rows<S>(n: usize, a: &mut [S], r1: usize, r2: usize) {
    if r1 == r2 {
        return;
    }
    let (lo, hi) = if r1 < r2 { (r1, r2) } else { (r2, r1) };
    let (head, tail) = a.split_at_mut(hi * n);
    head[lo * n..(lo + 1) * n].swap_with_slice(&mut tail[..n]);
}
