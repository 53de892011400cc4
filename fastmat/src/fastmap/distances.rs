//! The symmetric pairwise-distance matrix that FastMap works on, and the row-partitioned
//! parallel writes used to build and deflate it.

use std::marker::PhantomData;
use std::ptr::NonNull;

use log::trace;
use num::Float;
use rayon::prelude::*;

use crate::{matrix::Matrix, scalar::Scalar, LinalgError, Result};

use super::{argmax, euclidean_distance};

/// Square, symmetric, non-negative and zero on the diagonal.
/// Every mutation writes `(i, j)` and `(j, i)` together so symmetry holds after each pass.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix<T> {
    distances: Matrix<T>,
}

impl<T: Scalar + Float> DistanceMatrix<T> {
    /// Euclidean distances between every pair of rows of `points`.
    pub fn from_points(points: &Matrix<T>) -> Self {
        let n = points.num_rows();
        let mut distances = Matrix::zeros(n, n);

        let writer = SymmetricWriter::new(&mut distances);
        (0..n).into_par_iter().for_each(|i| {
            let row_i = points.row_slice(i);
            for j in (i + 1)..n {
                let distance = euclidean_distance(row_i, points.row_slice(j));
                // SAFETY: i < j < n and iteration i is the only one touching (i, j) or (j, i)
                unsafe { writer.write_pair(i, j, distance) };
            }
        });

        trace!("Built {n}x{n} distance matrix");
        Self { distances }
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.distances.num_rows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, i: usize, j: usize) -> T {
        self.distances[(i, j)]
    }

    pub fn as_matrix(&self) -> &Matrix<T> {
        &self.distances
    }

    pub fn into_matrix(self) -> Matrix<T> {
        self.distances
    }

    /// The point furthest from `point`, lowest index on ties.
    /// `None` if `point` is out of range.
    pub fn farthest_from(&self, point: usize) -> Option<usize> {
        if point >= self.len() {
            return None;
        }
        argmax(self.distances.row_slice(point))
    }

    /// Approximates the two most distant points with two rounds of [`farthest_from`](Self::farthest_from),
    /// starting from point `0`. Returns `(a, b)` where `b` is furthest from `0` and `a` is furthest from `b`.
    pub fn pivot_pair(&self) -> Option<(usize, usize)> {
        let b = self.farthest_from(0)?;
        let a = self.farthest_from(b)?;
        Some((a, b))
    }

    /// Removes the component of every distance explained by one axis, where `coords[i]` is the
    /// coordinate of point `i` on that axis.
    ///
    /// `D[i][l] <- sqrt(|D[i][l]^2 - (coords[i] - coords[l])^2|)`, the absolute value absorbs
    /// small negative residues from rounding.
    pub fn deflate(&mut self, coords: &[T]) -> Result<()> {
        if coords.len() != self.len() {
            return Err(LinalgError::LengthMismatch {
                left: self.len(),
                right: coords.len(),
            });
        }
        self.deflate_unchecked(coords);
        Ok(())
    }

    /// [`deflate`](Self::deflate) for callers that already hold one coordinate per point.
    pub(crate) fn deflate_unchecked(&mut self, coords: &[T]) {
        let n = self.len();
        debug_assert_eq!(coords.len(), n);

        let writer = SymmetricWriter::new(&mut self.distances);
        (0..n).into_par_iter().for_each(|i| {
            for l in (i + 1)..n {
                // SAFETY: i < l < n, and (i, l), (l, i) are only read or written by iteration i
                unsafe {
                    let distance = writer.read(i, l);
                    let along_axis = coords[i] - coords[l];
                    let residue = (distance * distance - along_axis * along_axis).abs();
                    writer.write_pair(i, l, residue.sqrt());
                }
            }
        });
    }
}

/// Raw write access to a square matrix shared across the workers of one parallel loop.
///
/// Callers partition by row: the worker for row `i` owns `(i, j)` and `(j, i)` for every `j > i`.
/// With that partition no cell is touched by two workers, so no locking is required.
struct SymmetricWriter<'a, T> {
    ptr: NonNull<T>,
    n: usize,
    _lifetime: PhantomData<&'a mut [T]>,
}

// SAFETY: the writer only hands out copies of `T`, and the row partition documented above
// keeps concurrent accesses on disjoint cells.
unsafe impl<T: Send + Sync> Send for SymmetricWriter<'_, T> {}

// SAFETY: see `Send`.
unsafe impl<T: Send + Sync> Sync for SymmetricWriter<'_, T> {}

impl<'a, T: Scalar> SymmetricWriter<'a, T> {
    fn new(matrix: &'a mut Matrix<T>) -> Self {
        debug_assert!(matrix.is_square());
        let n = matrix.num_rows();
        Self {
            ptr: NonNull::from(matrix.data_mut()).cast(),
            n,
            _lifetime: PhantomData,
        }
    }

    /// # Safety
    /// `i, j < n`, and no other thread may be writing `(i, j)`.
    unsafe fn read(&self, i: usize, j: usize) -> T {
        debug_assert!(i < self.n && j < self.n);
        *self.ptr.as_ptr().add(i * self.n + j)
    }

    /// # Safety
    /// `i, j < n`, and the calling worker must own both `(i, j)` and `(j, i)`.
    unsafe fn write_pair(&self, i: usize, j: usize, value: T) {
        debug_assert!(i < self.n && j < self.n);
        *self.ptr.as_ptr().add(i * self.n + j) = value;
        *self.ptr.as_ptr().add(j * self.n + i) = value;
    }
}
