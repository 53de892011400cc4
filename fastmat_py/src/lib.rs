use fastmat::{fastmap::FastMap, LinalgError, Matrix};
use log::debug;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

fn to_py_err(err: LinalgError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

/// A dense single-precision matrix, stored row-major.
#[pyclass(name = "Matrix")]
#[derive(Clone)]
struct PyMatrix(Matrix<f32>);

#[pymethods]
impl PyMatrix {
    #[new]
    fn new(rows: Vec<Vec<f32>>) -> PyResult<Self> {
        Matrix::from_rows(rows).map(PyMatrix).map_err(to_py_err)
    }

    fn num_rows(&self) -> usize {
        self.0.num_rows()
    }

    fn num_cols(&self) -> usize {
        self.0.num_cols()
    }

    /// The flat row-major data.
    fn data(&self) -> Vec<f32> {
        self.0.data().to_vec()
    }

    fn get_row(&self, i: usize) -> PyResult<Vec<f32>> {
        if i >= self.0.num_rows() {
            return Err(PyValueError::new_err(format!(
                "row {i} out of range for {} rows",
                self.0.num_rows()
            )));
        }
        Ok(self.0.row(i))
    }

    fn __str__(&self) -> String {
        self.0.to_string()
    }

    fn __add__(&self, other: &PyMatrix) -> PyResult<PyMatrix> {
        self.0.try_add(&other.0).map(PyMatrix).map_err(to_py_err)
    }

    fn __sub__(&self, other: &PyMatrix) -> PyResult<PyMatrix> {
        self.0.try_sub(&other.0).map(PyMatrix).map_err(to_py_err)
    }

    fn __matmul__(&self, other: &PyMatrix) -> PyResult<PyMatrix> {
        self.0.matmul(&other.0).map(PyMatrix).map_err(to_py_err)
    }

    /// Get the row-echelon form of Matrix using LU decomposition, performed in-place.
    /// `take_upper=True` leaves the upper triangular matrix U, which is Matrix in row-echelon form,
    /// while `take_lower=True` leaves the lower triangular matrix L.
    /// `take_upper=False, take_lower=False` leaves L and U packed together in one matrix.
    #[pyo3(signature = (take_upper=true, take_lower=false))]
    fn echelon_form(&mut self, take_upper: bool, take_lower: bool) -> PyResult<()> {
        self.0
            .echelon_form(take_upper, take_lower)
            .map_err(to_py_err)
    }

    fn determinant(&self) -> PyResult<f32> {
        self.0.determinant().map_err(to_py_err)
    }

    fn det(&self) -> PyResult<f32> {
        self.determinant()
    }
}

#[pyfunction]
fn matmul(a: &PyMatrix, b: &PyMatrix) -> PyResult<PyMatrix> {
    fastmat::matmul(&a.0, &b.0).map(PyMatrix).map_err(to_py_err)
}

#[pyfunction]
fn dot_product(v: Vec<f32>, u: Vec<f32>) -> PyResult<f32> {
    fastmat::dot_product(&v, &u).map_err(to_py_err)
}

/// Reduce the rows of `x` to `target_dim` columns with FastMap.
#[pyfunction]
fn reduce_with_fastmap(py: Python<'_>, x: &PyMatrix, target_dim: usize) -> PyMatrix {
    let points = &x.0;
    let output = py.allow_threads(|| FastMap::new(target_dim).reduce(points));
    debug!(
        "Extracted {} of {target_dim} FastMap axes",
        output.axes_extracted()
    );
    PyMatrix(output.embedding)
}

#[pymodule(name = "fastmat")]
fn fastmat_py(m: &Bound<'_, PyModule>) -> PyResult<()> {
    pyo3_log::init();

    m.add_class::<PyMatrix>()?;
    m.add_function(wrap_pyfunction!(matmul, m)?)?;
    m.add_function(wrap_pyfunction!(dot_product, m)?)?;
    m.add_function(wrap_pyfunction!(reduce_with_fastmap, m)?)?;
    Ok(())
}
