// ======== Dense row-major matrix =============================

use std::ops::{Index, IndexMut};

use itertools::{iproduct, izip};

use crate::{scalar::Scalar, LinalgError, Result};

mod display;
#[cfg(test)]
mod tests;

/// A dense matrix whose entries live in one contiguous buffer.
/// Entry `(r, c)` sits at offset `r * num_cols + c`.
///
/// Cloning is a deep copy, no two matrices ever share storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T> {
    data: Vec<T>,
    num_rows: usize,
    num_cols: usize,
}

// ======== Construction =======================================

impl<T: Scalar> Matrix<T> {
    /// Wraps `data` as a `num_rows x num_cols` matrix.
    ///
    /// The length of `data` is trusted to be `num_rows * num_cols`, this is only asserted in debug builds.
    pub fn from_flat(num_rows: usize, num_cols: usize, data: Vec<T>) -> Self {
        debug_assert_eq!(
            data.len(),
            num_rows * num_cols,
            "Flat data should hold num_rows * num_cols entries"
        );
        Self {
            data,
            num_rows,
            num_cols,
        }
    }

    /// Builds a matrix from nested rows, all of which must have the same length.
    /// An empty outer vector produces a `0 x 0` matrix.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self> {
        let num_rows = rows.len();
        let num_cols = rows.first().map_or(0, Vec::len);

        let mut data = Vec::with_capacity(num_rows * num_cols);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != num_cols {
                return Err(LinalgError::NonUniformRows {
                    row,
                    expected: num_cols,
                    found: values.len(),
                });
            }
            data.extend(values);
        }

        Ok(Self {
            data,
            num_rows,
            num_cols,
        })
    }

    pub fn zeros(num_rows: usize, num_cols: usize) -> Self {
        Self {
            data: vec![T::zero(); num_rows * num_cols],
            num_rows,
            num_cols,
        }
    }

    pub fn identity(n: usize) -> Self {
        let mut matrix = Self::zeros(n, n);
        for i in 0..n {
            matrix[(i, i)] = T::one();
        }
        matrix
    }
}

// ======== Accessors ==========================================

impl<T: Scalar> Matrix<T> {
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    /// `(num_rows, num_cols)`
    pub fn shape(&self) -> (usize, usize) {
        (self.num_rows, self.num_cols)
    }

    pub fn is_square(&self) -> bool {
        self.num_rows == self.num_cols
    }

    /// The row-major backing storage.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    /// Unchecked access to entry `(row, col)`, used on the hot paths.
    ///
    /// # Safety
    /// The caller must guarantee `row < num_rows` and `col < num_cols`.
    #[inline]
    pub unsafe fn at(&self, row: usize, col: usize) -> &T {
        self.data.get_unchecked(row * self.num_cols + col)
    }

    /// Mutable counterpart of [`at`](Self::at).
    ///
    /// # Safety
    /// The caller must guarantee `row < num_rows` and `col < num_cols`.
    #[inline]
    pub unsafe fn at_mut(&mut self, row: usize, col: usize) -> &mut T {
        let offset = row * self.num_cols + col;
        self.data.get_unchecked_mut(offset)
    }

    /// Checked access, `None` if either index is out of range.
    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        if row < self.num_rows && col < self.num_cols {
            self.data.get(row * self.num_cols + col)
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut T> {
        if row < self.num_rows && col < self.num_cols {
            self.data.get_mut(row * self.num_cols + col)
        } else {
            None
        }
    }

    /// A fresh copy of row `i`.
    pub fn row(&self, i: usize) -> Vec<T> {
        self.row_slice(i).to_vec()
    }

    /// Borrows row `i` straight out of the backing storage.
    /// Panics if `i >= num_rows`.
    pub fn row_slice(&self, i: usize) -> &[T] {
        assert!(i < self.num_rows, "Row {i} out of range for {} rows", self.num_rows);
        &self.data[i * self.num_cols..(i + 1) * self.num_cols]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        (0..self.num_rows).map(|i| self.row_slice(i))
    }

    /// Copies the diagonal, which has `min(num_rows, num_cols)` entries.
    pub fn diagonal(&self) -> Vec<T> {
        (0..self.num_rows.min(self.num_cols))
            .map(|i| self[(i, i)])
            .collect()
    }
}

/// Checked indexing, panics if either index is out of range.
/// Use [`Matrix::at`] where the bounds are already known to hold.
impl<T: Scalar> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    fn index(&self, (row, col): (usize, usize)) -> &Self::Output {
        self.get(row, col).unwrap_or_else(|| {
            panic!(
                "Index ({row}, {col}) out of range for {}x{} matrix",
                self.num_rows, self.num_cols
            )
        })
    }
}

impl<T: Scalar> IndexMut<(usize, usize)> for Matrix<T> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Self::Output {
        let (num_rows, num_cols) = self.shape();
        self.get_mut(row, col).unwrap_or_else(|| {
            panic!("Index ({row}, {col}) out of range for {num_rows}x{num_cols} matrix")
        })
    }
}

// ======== Arithmetic =========================================

impl<T: Scalar> Matrix<T> {
    fn check_same_shape(&self, rhs: &Self) -> Result<()> {
        if self.shape() != rhs.shape() {
            return Err(LinalgError::DimensionMismatch {
                lhs: self.shape(),
                rhs: rhs.shape(),
            });
        }
        Ok(())
    }

    /// Element-wise sum, fails if the shapes differ.
    pub fn try_add(&self, rhs: &Self) -> Result<Self> {
        self.check_same_shape(rhs)?;
        let data = izip!(&self.data, &rhs.data).map(|(&a, &b)| a + b).collect();
        Ok(Self::from_flat(self.num_rows, self.num_cols, data))
    }

    /// Element-wise difference, fails if the shapes differ.
    pub fn try_sub(&self, rhs: &Self) -> Result<Self> {
        self.check_same_shape(rhs)?;
        let data = izip!(&self.data, &rhs.data).map(|(&a, &b)| a - b).collect();
        Ok(Self::from_flat(self.num_rows, self.num_cols, data))
    }

    /// The product `self * rhs`, of shape `(self.num_rows, rhs.num_cols)`.
    pub fn matmul(&self, rhs: &Self) -> Result<Self> {
        if self.num_cols != rhs.num_rows {
            return Err(LinalgError::DimensionMismatch {
                lhs: self.shape(),
                rhs: rhs.shape(),
            });
        }

        // m runs over rows of self, p over cols of rhs, n over the shared dimension
        let data = iproduct!(0..self.num_rows, 0..rhs.num_cols)
            .map(|(m, p)| {
                (0..self.num_cols).fold(T::zero(), |acc, n| {
                    // SAFETY: m < self.num_rows, n < self.num_cols == rhs.num_rows, p < rhs.num_cols
                    acc + unsafe { *self.at(m, n) * *rhs.at(n, p) }
                })
            })
            .collect();

        Ok(Self::from_flat(self.num_rows, rhs.num_cols, data))
    }

    /// Multiplies every entry by `factor`.
    pub fn scale(&self, factor: T) -> Self {
        let data = self.data.iter().map(|&x| x * factor).collect();
        Self::from_flat(self.num_rows, self.num_cols, data)
    }
}

/// Free-function form of [`Matrix::matmul`].
pub fn matmul<T: Scalar>(a: &Matrix<T>, b: &Matrix<T>) -> Result<Matrix<T>> {
    a.matmul(b)
}

pub fn dot_product<T: Scalar>(v: &[T], u: &[T]) -> Result<T> {
    if v.len() != u.len() {
        return Err(LinalgError::LengthMismatch {
            left: v.len(),
            right: u.len(),
        });
    }
    Ok(izip!(v, u).fold(T::zero(), |acc, (&a, &b)| acc + a * b))
}
