use pyo3::exceptions::{PyIndexError, PyMemoryError, PyValueError, PyZeroDivisionError};
use pyo3::prelude::*;
use pyo3::types::PyType;

use crate::config::MatrixConfig;
use crate::error::MatrixError;
use crate::matrix::matrix_dense::Matrix;
use crate::matrix::traits::ListConvert;
use crate::matrix::vector::Vector;

impl From<MatrixError> for PyErr {
    fn from(error: MatrixError) -> PyErr {
        let message = error.to_string();
        match error {
            MatrixError::Index { .. } => PyIndexError::new_err(message),
            MatrixError::DivideByZero { .. } | MatrixError::ZeroDenominator => {
                PyZeroDivisionError::new_err(message)
            }
            MatrixError::Allocation { .. } => PyMemoryError::new_err(message),
            MatrixError::Dimension { .. }
            | MatrixError::SingularMatrix { .. }
            | MatrixError::NotRepresentable { .. } => PyValueError::new_err(message),
        }
    }
}

// --------------------------------------------------
//                      MATRIX
// --------------------------------------------------

#[derive(Debug, Clone)]
#[pyclass(frozen, name = "Matrix")]
pub struct PyMatrix {
    inner: Matrix<f64>,
}

#[derive(FromPyObject)]
pub enum MatrixOperand<'a> {
    Matrix(Bound<'a, PyMatrix>),
    Vector(Bound<'a, PyVector>),
    Scalar(f64),
}

impl From<Matrix<f64>> for PyMatrix {
    fn from(inner: Matrix<f64>) -> Self {
        PyMatrix { inner }
    }
}

#[pymethods]
impl PyMatrix {
    #[new]
    pub fn new(elements: Vec<f64>, rows: usize, cols: usize) -> PyResult<Self> {
        Ok(Matrix::new(&elements, rows, cols)?.into())
    }

    #[classmethod]
    pub fn from_list(_cls: &Bound<PyType>, lines: Vec<Vec<f64>>) -> PyResult<Self> {
        Ok(<Matrix<f64> as ListConvert<f64>>::from_list(lines)?.into())
    }

    #[staticmethod]
    pub fn identity(n: usize) -> Self {
        Matrix::identity(n).into()
    }

    pub fn to_list(&self) -> Vec<Vec<f64>> {
        self.inner.to_list()
    }

    #[getter]
    pub fn rows(&self) -> usize {
        self.inner.rows()
    }

    #[getter]
    pub fn cols(&self) -> usize {
        self.inner.cols()
    }

    #[getter]
    #[allow(non_snake_case)]
    pub fn T(&self) -> PyMatrix {
        self.inner.transpose().into()
    }

    pub fn get(&self, row: usize, col: usize) -> PyResult<f64> {
        Ok(*self.inner.get(row, col)?)
    }

    pub fn __add__(&self, rhs: MatrixOperand) -> PyResult<PyMatrix> {
        match rhs {
            MatrixOperand::Matrix(rhs) => Ok((&self.inner + &rhs.get().inner)?.into()),
            MatrixOperand::Scalar(s) => Ok(self.inner.scalar_add(s).into()),
            MatrixOperand::Vector(_) => Err(PyValueError::new_err("Cannot add a vector to a matrix")),
        }
    }

    pub fn __sub__(&self, rhs: MatrixOperand) -> PyResult<PyMatrix> {
        match rhs {
            MatrixOperand::Matrix(rhs) => Ok((&self.inner - &rhs.get().inner)?.into()),
            MatrixOperand::Scalar(s) => Ok(self.inner.scalar_sub(s).into()),
            MatrixOperand::Vector(_) => {
                Err(PyValueError::new_err("Cannot subtract a vector from a matrix"))
            }
        }
    }

    pub fn __mul__(&self, py: Python<'_>, rhs: MatrixOperand) -> PyResult<PyObject> {
        match rhs {
            MatrixOperand::Matrix(rhs) => {
                let product: PyMatrix = (&self.inner * &rhs.get().inner)?.into();
                Ok(Py::new(py, product)?.into_any())
            }
            MatrixOperand::Vector(rhs) => {
                let product: PyVector = (&self.inner * &rhs.get().inner)?.into();
                Ok(Py::new(py, product)?.into_any())
            }
            MatrixOperand::Scalar(s) => {
                let product: PyMatrix = self.inner.scalar_mul(s).into();
                Ok(Py::new(py, product)?.into_any())
            }
        }
    }

    pub fn decompose_lu(&self) -> PyResult<(PyMatrix, PyMatrix)> {
        let (l, u) = self.inner.decompose_lu()?;
        Ok((l.into(), u.into()))
    }

    /// Returns `(P, L, U)` with `P·A = L·U`.
    pub fn decompose_plu(&self) -> PyResult<(PyMatrix, PyMatrix, PyMatrix)> {
        let plu = self.inner.decompose_plu()?;
        Ok((
            plu.permutation_matrix().into(),
            plu.lower.into(),
            plu.upper.into(),
        ))
    }

    pub fn determinant(&self) -> PyResult<f64> {
        Ok(self.inner.determinant()?)
    }

    pub fn determinant_pivoted(&self) -> PyResult<f64> {
        Ok(self.inner.determinant_pivoted()?)
    }

    pub fn solve(&self, b: &PyVector) -> PyResult<PyVector> {
        Ok(self.inner.solve(&b.inner)?.into())
    }

    pub fn rank(&self) -> PyResult<usize> {
        Ok(self.inner.rank_with(MatrixConfig::global())?)
    }

    pub fn defect(&self) -> PyResult<usize> {
        Ok(self.inner.defect_with(MatrixConfig::global())?)
    }

    pub fn is_linearly_dependent(&self) -> PyResult<bool> {
        Ok(self.inner.is_linearly_dependent_with(MatrixConfig::global())?)
    }

    pub fn is_square(&self) -> bool {
        self.inner.is_square()
    }

    pub fn frobenius_norm(&self) -> f64 {
        self.inner.frobenius_norm()
    }

    #[pyo3(signature = (other, tolerance=None))]
    pub fn approx_eq(&self, other: &PyMatrix, tolerance: Option<f64>) -> bool {
        let tolerance = tolerance.unwrap_or(MatrixConfig::global().tolerance);
        self.inner.approx_eq(&other.inner, tolerance)
    }

    pub fn __eq__(&self, other: &PyMatrix) -> bool {
        self.inner == other.inner
    }

    pub fn __lt__(&self, other: &PyMatrix) -> bool {
        self.inner.norm_lt(&other.inner)
    }

    pub fn __gt__(&self, other: &PyMatrix) -> bool {
        self.inner.norm_gt(&other.inner)
    }

    pub fn __str__(&self) -> String {
        self.inner.to_string()
    }

    pub fn __repr__(&self) -> String {
        format!("Matrix.from_list({:?})", self.inner.to_list())
    }
}

// --------------------------------------------------
//                      VECTOR
// --------------------------------------------------

#[derive(Debug, Clone)]
#[pyclass(frozen, name = "Vector")]
pub struct PyVector {
    inner: Vector<f64>,
}

impl From<Vector<f64>> for PyVector {
    fn from(inner: Vector<f64>) -> Self {
        PyVector { inner }
    }
}

#[pymethods]
impl PyVector {
    #[new]
    pub fn new(elements: Vec<f64>) -> Self {
        Vector::from_vec(elements).into()
    }

    pub fn to_list(&self) -> Vec<f64> {
        self.inner.to_list()
    }

    pub fn __len__(&self) -> usize {
        self.inner.len()
    }

    pub fn __getitem__(&self, i: usize) -> PyResult<f64> {
        Ok(*self.inner.get(i)?)
    }

    pub fn __add__(&self, rhs: &PyVector) -> PyResult<PyVector> {
        Ok((&self.inner + &rhs.inner)?.into())
    }

    pub fn __sub__(&self, rhs: &PyVector) -> PyResult<PyVector> {
        Ok((&self.inner - &rhs.inner)?.into())
    }

    pub fn __mul__(&self, rhs: &PyVector) -> PyResult<PyVector> {
        Ok((&self.inner * &rhs.inner)?.into())
    }

    pub fn __truediv__(&self, rhs: &PyVector) -> PyResult<PyVector> {
        Ok((&self.inner / &rhs.inner)?.into())
    }

    pub fn inner_product(&self, rhs: &PyVector) -> PyResult<f64> {
        Ok(self.inner.inner_product(&rhs.inner)?)
    }

    pub fn __eq__(&self, other: &PyVector) -> bool {
        self.inner == other.inner
    }

    pub fn __str__(&self) -> String {
        self.inner.to_string()
    }

    pub fn __repr__(&self) -> String {
        format!("Vector({:?})", self.inner.to_list())
    }
}
