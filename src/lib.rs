use pyo3::prelude::*;

pub mod matrix {
    pub mod echelon;
    pub mod lu;
    pub mod matrix_dense;
    pub mod traits;
    pub mod vector;
}
pub mod rings {
    pub mod rational;
}

pub mod config;
pub mod error;
pub mod python;

pub use config::MatrixConfig;
pub use error::{MatrixError, Result};
pub use matrix::lu::PluDecomposition;
pub use matrix::matrix_dense::Matrix;
pub use matrix::traits::{Element, ListConvert};
pub use matrix::vector::{inner_product, Vector};
pub use rings::rational::Rational;

/// A Python module implemented in Rust.
#[pymodule]
fn rust_matrix(_py: Python, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<python::PyMatrix>()?;
    m.add_class::<python::PyVector>()?;
    Ok(())
}
