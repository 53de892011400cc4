//! FastMap: projects the rows of a matrix onto `k` axes using only their pairwise distances.
//!
//! For each axis a pair of far-apart pivot points is chosen, every point is projected onto the
//! line through them with the law of cosines, and the distance matrix is deflated so the next
//! axis only sees what the previous ones left unexplained.
//! Axes depend on each other through the deflated distances so they are extracted in order,
//! the work within an axis is spread over rayon's pool.

use itertools::izip;
use log::debug;
use num::Float;
use rayon::prelude::*;

use crate::{matrix::Matrix, scalar::Scalar};

pub mod distances;

pub use distances::DistanceMatrix;

pub fn euclidean_distance<T: Scalar + Float>(a: &[T], b: &[T]) -> T {
    izip!(a, b)
        .fold(T::zero(), |acc, (&x, &y)| {
            let diff = x - y;
            acc + diff * diff
        })
        .sqrt()
}

/// Index of the largest value, `None` if `values` is empty.
///
/// Uses a strict comparison so the first (lowest) index wins ties.
pub fn argmax<T: PartialOrd>(values: &[T]) -> Option<usize> {
    let (first, rest) = values.split_first()?;
    let mut max = first;
    let mut max_idx = 0;
    for (idx, value) in rest.iter().enumerate() {
        if value > max {
            max = value;
            max_idx = idx + 1;
        }
    }
    Some(max_idx)
}

/// The pivots chosen for one extracted axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PivotAxis<T> {
    pub a: usize,
    pub b: usize,
    /// Residual distance between the pivots when the axis was extracted.
    pub distance: T,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FastMapOutput<T> {
    /// One row per input point, one column per requested axis.
    /// Columns after the last extracted axis are zero.
    pub embedding: Matrix<T>,
    /// One entry per axis that was actually extracted, in order.
    pub axes: Vec<PivotAxis<T>>,
}

impl<T> FastMapOutput<T> {
    pub fn axes_extracted(&self) -> usize {
        self.axes.len()
    }
}

/// FastMap reduction to a fixed number of axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FastMap {
    target_dim: usize,
}

impl FastMap {
    pub fn new(target_dim: usize) -> Self {
        Self { target_dim }
    }

    pub fn target_dim(&self) -> usize {
        self.target_dim
    }

    /// Embeds the rows of `points` into `target_dim` axes.
    ///
    /// Extraction stops early once the pivots coincide, i.e. every remaining residual distance is
    /// zero. The remaining columns of the embedding stay zero, this is not an error.
    pub fn reduce<T: Scalar + Float>(&self, points: &Matrix<T>) -> FastMapOutput<T> {
        let n = points.num_rows();
        let mut embedding = Matrix::zeros(n, self.target_dim);
        let mut axes = Vec::with_capacity(self.target_dim);

        // TODO: Store only the upper triangle, the full n x n buffer is the memory ceiling here
        let mut distances = DistanceMatrix::from_points(points);
        let two = T::one() + T::one();

        for axis in 0..self.target_dim {
            let Some((a, b)) = distances.pivot_pair() else {
                // No points at all
                break;
            };
            let pivot_distance = distances.get(a, b);
            if pivot_distance == T::zero() {
                debug!(
                    "FastMap: pivots coincide, stopping after {axis} of {} axes",
                    self.target_dim
                );
                break;
            }
            debug!("FastMap axis {axis}: pivots ({a}, {b}) at distance {pivot_distance}");

            let pivots = distances.as_matrix();
            let coords: Vec<T> = (0..n)
                .into_par_iter()
                .map(|i| {
                    // SAFETY: a, b and i are all below n, the side of the distance matrix
                    let (d_ai, d_bi) = unsafe { (*pivots.at(a, i), *pivots.at(b, i)) };
                    (d_ai * d_ai + pivot_distance * pivot_distance - d_bi * d_bi)
                        / (two * pivot_distance)
                })
                .collect();

            embedding
                .data_mut()
                .par_chunks_mut(self.target_dim)
                .zip(coords.par_iter())
                .for_each(|(row, &coord)| row[axis] = coord);

            distances.deflate_unchecked(&coords);
            axes.push(PivotAxis {
                a,
                b,
                distance: pivot_distance,
            });
        }

        FastMapOutput { embedding, axes }
    }
}

/// Embeds the rows of `points` into `target_dim` axes, see [`FastMap::reduce`].
pub fn reduce_with_fastmap<T: Scalar + Float>(points: &Matrix<T>, target_dim: usize) -> Matrix<T> {
    FastMap::new(target_dim).reduce(points).embedding
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use crate::matrix::Matrix;

    use super::{argmax, euclidean_distance, reduce_with_fastmap, FastMap};

    fn rectangle_corners() -> Matrix<f64> {
        Matrix::from_rows(vec![
            vec![0.0, 0.0],
            vec![4.0, 0.0],
            vec![0.0, 3.0],
            vec![4.0, 3.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_argmax_first_index_wins() {
        assert_eq!(argmax(&[1.0, 3.0, 3.0, 2.0]), Some(1));
        assert_eq!(argmax(&[2, 2, 2]), Some(0));
        assert_eq!(argmax(&[0.0, 1.0, 5.0]), Some(2));
        assert_eq!(argmax(&[7]), Some(0));
        assert_eq!(argmax::<f64>(&[]), None);
    }

    #[test]
    fn test_euclidean_distance() {
        assert_eq!(euclidean_distance(&[0.0, 0.0], &[3.0, 4.0]), 5.0);
        assert_eq!(euclidean_distance::<f32>(&[], &[]), 0.0);
    }

    #[test]
    fn test_collinear_points() {
        let points =
            Matrix::from_rows(vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![3.0, 0.0]]).unwrap();
        let reduced = reduce_with_fastmap(&points, 1);
        assert_eq!(reduced.shape(), (3, 1));
        assert_abs_diff_eq!(reduced[(0, 0)], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(reduced[(1, 0)], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(reduced[(2, 0)], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_collinear_points_stop_after_one_axis() {
        let points =
            Matrix::from_rows(vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![3.0, 0.0]]).unwrap();
        let output = FastMap::new(3).reduce(&points);
        assert_eq!(output.axes_extracted(), 1);
        assert_eq!(output.axes[0].a, 0);
        assert_eq!(output.axes[0].b, 2);
        assert_eq!(output.embedding.shape(), (3, 3));
        for i in 0..3 {
            assert_eq!(output.embedding[(i, 1)], 0.0);
            assert_eq!(output.embedding[(i, 2)], 0.0);
        }
    }

    #[test]
    fn test_identical_points_are_degenerate() {
        let points = Matrix::from_rows(vec![vec![1.5, -2.0, 4.0]; 5]).unwrap();
        let output = FastMap::new(2).reduce(&points);
        assert_eq!(output.axes_extracted(), 0);
        assert_eq!(output.embedding, Matrix::zeros(5, 2));
    }

    #[test]
    fn test_output_shape() {
        let points = rectangle_corners();
        for k in 1..=4 {
            assert_eq!(reduce_with_fastmap(&points, k).shape(), (4, k));
        }
        assert_eq!(reduce_with_fastmap(&points, 0).shape(), (4, 0));
        assert_eq!(reduce_with_fastmap(&Matrix::<f32>::zeros(0, 3), 2).shape(), (0, 2));
    }

    #[test]
    fn test_planar_points_keep_their_distances() {
        let points = rectangle_corners();
        let output = FastMap::new(2).reduce(&points);
        assert_eq!(output.axes_extracted(), 2);
        // Diagonal first, then the two off-diagonal corners
        assert_eq!((output.axes[0].a, output.axes[0].b), (0, 3));
        let mut second = [output.axes[1].a, output.axes[1].b];
        second.sort_unstable();
        assert_eq!(second, [1, 2]);
        assert_abs_diff_eq!(output.axes[0].distance, 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(output.axes[1].distance, 4.8, epsilon = 1e-9);

        for i in 0..4 {
            for j in 0..4 {
                let original = euclidean_distance(points.row_slice(i), points.row_slice(j));
                let embedded = euclidean_distance(
                    output.embedding.row_slice(i),
                    output.embedding.row_slice(j),
                );
                assert_abs_diff_eq!(original, embedded, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_single_precision() {
        let points = Matrix::from_rows(vec![vec![0.0_f32], vec![2.0], vec![5.0]]).unwrap();
        let reduced = reduce_with_fastmap(&points, 1);
        assert_abs_diff_eq!(reduced[(1, 0)], 2.0, epsilon = 1e-5);
        assert_abs_diff_eq!(reduced[(2, 0)], 5.0, epsilon = 1e-5);
    }
}
