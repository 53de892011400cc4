// ======== Tests ==============================================

use approx::assert_relative_eq;

use crate::matrix::{dot_product, matmul, Matrix};
use crate::LinalgError;

fn example_2x3() -> Matrix<i32> {
    Matrix::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]).unwrap()
}

fn example_3x3() -> Matrix<i32> {
    Matrix::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9]]).unwrap()
}

#[test]
fn test_from_rows_is_row_major() {
    let m = example_2x3();
    assert_eq!(m.shape(), (2, 3));
    assert_eq!(m.data(), &[1, 2, 3, 4, 5, 6]);
    assert_eq!(m[(1, 0)], 4);
    assert_eq!(unsafe { *m.at(0, 2) }, 3);
}

#[test]
fn test_from_rows_non_uniform() {
    let err = Matrix::from_rows(vec![vec![1, 2], vec![3]]).unwrap_err();
    assert_eq!(
        err,
        LinalgError::NonUniformRows {
            row: 1,
            expected: 2,
            found: 1
        }
    );
}

#[test]
fn test_from_rows_empty() {
    let m = Matrix::<f32>::from_rows(vec![]).unwrap();
    assert_eq!(m.shape(), (0, 0));
    assert!(m.data().is_empty());
}

#[test]
fn test_from_flat_and_zeros() {
    let m = Matrix::from_flat(2, 2, vec![1.0, 2.0, 3.0, 4.0]);
    assert_eq!(m.row(1), vec![3.0, 4.0]);

    let z = Matrix::<f64>::zeros(3, 2);
    assert_eq!(z.shape(), (3, 2));
    assert!(z.data().iter().all(|&x| x == 0.0));
}

#[test]
fn test_checked_access() {
    let mut m = example_2x3();
    assert_eq!(m.get(1, 2), Some(&6));
    assert_eq!(m.get(2, 0), None);
    // Flat offset would be in range, but the column is not
    assert_eq!(m.get(0, 3), None);

    *m.get_mut(0, 0).unwrap() = 10;
    unsafe {
        *m.at_mut(1, 1) = 50;
    }
    assert_eq!(m.data(), &[10, 2, 3, 4, 50, 6]);
}

#[test]
#[should_panic]
fn test_index_panics_on_bad_column() {
    let m = example_2x3();
    let _ = m[(0, 3)];
}

#[test]
fn test_row_is_a_copy() {
    let mut m = example_2x3();
    let mut row = m.row(0);
    row[0] = 100;
    assert_eq!(m[(0, 0)], 1);

    m[(0, 0)] = 7;
    assert_eq!(row, vec![100, 2, 3]);
    assert_eq!(m.row_slice(0), &[7, 2, 3]);
    assert_eq!(m.rows().count(), 2);
}

#[test]
fn test_add_then_subtract() {
    let a = Matrix::from_rows(vec![vec![0.1, 2.5], vec![-3.0, 4.25]]).unwrap();
    let b = Matrix::from_rows(vec![vec![1.7, -0.3], vec![8.0, 0.01]]).unwrap();

    let sum = a.try_add(&b).unwrap();
    assert_relative_eq!(sum[(0, 0)], 1.8, epsilon = 1e-12);

    let back = sum.try_sub(&b).unwrap();
    for (x, y) in back.data().iter().zip(a.data()) {
        assert_relative_eq!(*x, *y, epsilon = 1e-12);
    }
}

#[test]
fn test_add_shape_mismatch() {
    let err = example_2x3().try_add(&example_3x3()).unwrap_err();
    assert_eq!(
        err,
        LinalgError::DimensionMismatch {
            lhs: (2, 3),
            rhs: (3, 3)
        }
    );
    assert!(example_2x3().try_sub(&example_3x3()).is_err());
}

#[test]
fn test_matrix_product() {
    let c = matmul(&example_2x3(), &example_3x3()).unwrap();
    assert_eq!(c.shape(), (2, 3));
    assert_eq!(c.data(), &[30, 36, 42, 66, 81, 96]);
}

#[test]
fn test_identity_is_neutral() {
    let a = example_2x3();
    assert_eq!(a.matmul(&Matrix::identity(3)).unwrap(), a);
    assert_eq!(Matrix::identity(2).matmul(&a).unwrap(), a);
}

#[test]
fn test_matrix_product_mismatch() {
    let a = example_2x3();
    let b = Matrix::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
    assert_eq!(
        a.matmul(&b).unwrap_err(),
        LinalgError::DimensionMismatch {
            lhs: (2, 3),
            rhs: (2, 2)
        }
    );
}

#[test]
fn test_dot_product() {
    assert_eq!(dot_product(&[1, 2, 3], &[4, 5, 6]).unwrap(), 32);
    assert_eq!(dot_product::<f32>(&[], &[]).unwrap(), 0.0);
    assert_eq!(
        dot_product(&[1, 2], &[1]).unwrap_err(),
        LinalgError::LengthMismatch { left: 2, right: 1 }
    );
}

#[test]
fn test_scale_and_diagonal() {
    let m = example_3x3().scale(2);
    assert_eq!(m.diagonal(), vec![2, 10, 18]);
    assert_eq!(example_2x3().diagonal(), vec![1, 5]);
}
