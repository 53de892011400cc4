//! No-pivoting Doolittle LU decomposition, echelon forms and determinants.
//!
//! The decomposition is stored packed into a single square matrix:
//! `U` on and above the diagonal, the sub-diagonal multipliers of `L` below it
//! (the unit diagonal of `L` is implicit).
//!
//! Rows are never exchanged. A zero pivot that would need to be divided by is reported as
//! [`LinalgError::ZeroPivot`] rather than silently pivoting, which would change the factorisation.
//! For integer scalars every division truncates, so these routines are meant for floating point.

use crate::{matrix::Matrix, scalar::Scalar, LinalgError, Result};

/// Packed `L\U` factors of a square matrix, see the [module docs](self).
#[derive(Debug, Clone, PartialEq)]
pub struct LuDecomposition<T> {
    packed: Matrix<T>,
}

impl<T: Scalar> LuDecomposition<T> {
    /// Decomposes `matrix`, reusing its storage for the packed factors.
    pub fn new(mut matrix: Matrix<T>) -> Result<Self> {
        decompose_in_place(&mut matrix)?;
        Ok(Self { packed: matrix })
    }

    /// The combined storage, `U` on and above the diagonal and `L` strictly below.
    pub fn packed(&self) -> &Matrix<T> {
        &self.packed
    }

    pub fn into_packed(self) -> Matrix<T> {
        self.packed
    }

    pub fn dimension(&self) -> usize {
        self.packed.num_rows()
    }

    /// The echelon form `U`, with zeros strictly below the diagonal.
    pub fn upper_triangular(&self) -> Matrix<T> {
        let mut upper = self.packed.clone();
        take_upper(&mut upper);
        upper
    }

    /// The unit lower triangular factor `L`.
    pub fn lower_triangular(&self) -> Matrix<T> {
        let mut lower = self.packed.clone();
        take_lower(&mut lower);
        lower
    }

    /// Product of the diagonal of `U`.
    /// No rows were exchanged so there is no sign to correct.
    pub fn determinant(&self) -> T {
        (0..self.dimension()).fold(T::one(), |acc, i| {
            // SAFETY: packed is square with i < dimension
            acc * unsafe { *self.packed.at(i, i) }
        })
    }
}

impl<T: Scalar> Matrix<T> {
    fn check_square(&self) -> Result<()> {
        if !self.is_square() {
            return Err(LinalgError::NonSquareMatrix {
                rows: self.num_rows(),
                cols: self.num_cols(),
            });
        }
        Ok(())
    }

    /// Decomposes a deep copy of this matrix, leaving `self` untouched.
    pub fn lu(&self) -> Result<LuDecomposition<T>> {
        self.check_square()?;
        LuDecomposition::new(self.clone())
    }

    /// Decomposes this matrix without copying it.
    pub fn into_lu(self) -> Result<LuDecomposition<T>> {
        LuDecomposition::new(self)
    }

    /// Overwrites this matrix with its LU decomposition.
    ///
    /// * `take_upper` zeros everything below the diagonal, leaving the echelon form `U`.
    /// * `take_lower` sets the diagonal to one and zeros everything above it, leaving `L`.
    ///
    /// Flags are applied in that order, so requesting both leaves the identity.
    /// Requesting neither leaves the packed `L\U` storage described in the [module docs](self).
    ///
    /// No copy is made. A non-square matrix is rejected untouched, but on
    /// [`LinalgError::ZeroPivot`] the rows and columns before the failing pivot have already been
    /// decomposed. Use [`lu`](Self::lu) to keep the original on failure.
    pub fn echelon_form(&mut self, take_upper_part: bool, take_lower_part: bool) -> Result<()> {
        self.check_square()?;
        decompose_in_place(self)?;
        if take_upper_part {
            take_upper(self);
        }
        if take_lower_part {
            take_lower(self);
        }
        Ok(())
    }

    /// Determinant via the diagonal of `U`, computed on a copy.
    /// The empty `0 x 0` matrix has determinant one.
    pub fn determinant(&self) -> Result<T> {
        Ok(self.lu()?.determinant())
    }
}

fn decompose_in_place<T: Scalar>(a: &mut Matrix<T>) -> Result<()> {
    a.check_square()?;
    let n = a.num_rows();

    // SAFETY (all accesses below): every index is drawn from 0..n on an n x n matrix
    for i in 0..n {
        // Row i of U: subtract the contributions of the earlier pivot rows, weighted by
        // the multipliers already stored to the left of the diagonal
        for k in i..n {
            let sum = (0..i).fold(T::zero(), |acc, j| unsafe { acc + *a.at(i, j) * *a.at(j, k) });
            unsafe {
                let updated = *a.at(i, k) - sum;
                *a.at_mut(i, k) = updated;
            }
        }

        if i + 1 == n {
            break;
        }

        let pivot = unsafe { *a.at(i, i) };
        if pivot == T::zero() {
            return Err(LinalgError::ZeroPivot { index: i });
        }

        // Column i of L: store the multiplier that would eliminate (k, i) in place of the zero
        for k in (i + 1)..n {
            let sum = (0..i).fold(T::zero(), |acc, j| unsafe { acc + *a.at(k, j) * *a.at(j, i) });
            unsafe {
                let multiplier = (*a.at(k, i) - sum) / pivot;
                *a.at_mut(k, i) = multiplier;
            }
        }
    }

    Ok(())
}

fn take_upper<T: Scalar>(packed: &mut Matrix<T>) {
    for i in 0..packed.num_rows() {
        for j in 0..i {
            packed[(i, j)] = T::zero();
        }
    }
}

fn take_lower<T: Scalar>(packed: &mut Matrix<T>) {
    let n = packed.num_rows();
    for i in 0..n {
        packed[(i, i)] = T::one();
        for j in (i + 1)..n {
            packed[(i, j)] = T::zero();
        }
    }
}
