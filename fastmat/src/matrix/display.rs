use std::fmt::{self, Display};

use crate::scalar::Scalar;

use super::Matrix;

/// Renders as
/// ```text
/// Matrix([
///     [ 1, 20],
///     [-3,  4]
/// ])
/// ```
/// with every column right-aligned to its widest entry.
impl<T: Scalar> Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.num_rows() == 0 {
            return f.write_str("Matrix([])");
        }

        let cells: Vec<String> = self.data().iter().map(ToString::to_string).collect();
        let widths: Vec<usize> = (0..self.num_cols())
            .map(|col| {
                (0..self.num_rows())
                    .map(|row| cells[row * self.num_cols() + col].len())
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        writeln!(f, "Matrix([")?;
        for row in 0..self.num_rows() {
            f.write_str("    [")?;
            for (col, &width) in widths.iter().enumerate() {
                if col > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{:>width$}", cells[row * self.num_cols() + col])?;
            }
            if row + 1 == self.num_rows() {
                writeln!(f, "]")?;
            } else {
                writeln!(f, "],")?;
            }
        }
        f.write_str("])")
    }
}
