use itertools::Itertools;
use log::debug;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::fmt;
use std::ops;

use crate::config::MatrixConfig;
use crate::error::{MatrixError, Result};
use crate::matrix::traits::{Element, ListConvert};
use crate::matrix::vector::Vector;

/// Row-major dense matrix. Element `(i, j)` lives at `cells[i * cols + j]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Matrix<T> {
    rows: usize,
    cols: usize,
    cells: Vec<T>,
}

impl<T: Element> Matrix<T> {
    /// Copies `rows * cols` elements from a row-major buffer.
    pub fn new(elements: &[T], rows: usize, cols: usize) -> Result<Matrix<T>> {
        let len = element_count(rows, cols)?;
        if elements.len() < len {
            return Err(MatrixError::dimension(
                "matrix construction",
                (rows, cols),
                (elements.len(), 1),
            ));
        }

        let mut cells = Vec::new();
        cells
            .try_reserve_exact(len)
            .map_err(|_| MatrixError::Allocation { requested: len })?;
        cells.extend_from_slice(&elements[..len]);
        Ok(Matrix { rows, cols, cells })
    }

    /// # Panics
    ///
    /// Panics if `rows * cols` overflows `usize`. Use [`Matrix::new`] for a
    /// fallible constructor.
    pub fn zeros(rows: usize, cols: usize) -> Matrix<T> {
        let len = expect_element_count(rows, cols);
        Matrix {
            rows,
            cols,
            cells: (0..len).map(|_| T::zero()).collect(),
        }
    }

    pub fn identity(n: usize) -> Matrix<T> {
        Matrix::from_fn(n, n, |i, j| if i == j { T::one() } else { T::zero() })
    }

    /// Builds a matrix from `f(row, col)`, called in row-major order.
    ///
    /// # Panics
    ///
    /// Panics if `rows * cols` overflows `usize`.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> T) -> Matrix<T> {
        expect_element_count(rows, cols);
        Matrix {
            rows,
            cols,
            cells: (0..rows)
                .flat_map(|i| (0..cols).map(move |j| (i, j)))
                .map(|(i, j)| f(i, j))
                .collect(),
        }
    }

    pub(crate) fn from_parts(rows: usize, cols: usize, cells: Vec<T>) -> Matrix<T> {
        debug_assert_eq!(cells.len(), rows * cols);
        Matrix { rows, cols, cells }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.cells
    }

    pub fn into_vec(self) -> Vec<T> {
        self.cells
    }

    pub fn get(&self, row: usize, col: usize) -> Result<&T> {
        self.check_bounds(row, col)?;
        Ok(&self.cells[row * self.cols + col])
    }

    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        self.check_bounds(row, col)?;
        self.cells[row * self.cols + col] = value;
        Ok(())
    }

    pub fn row(&self, row: usize) -> Result<&[T]> {
        self.check_bounds(row, 0).or_else(|e| self.empty_row(row, e))?;
        Ok(&self.cells[row * self.cols..(row + 1) * self.cols])
    }

    pub fn row_mut(&mut self, row: usize) -> Result<&mut [T]> {
        self.check_bounds(row, 0).or_else(|e| self.empty_row(row, e))?;
        let cols = self.cols;
        Ok(&mut self.cells[row * cols..(row + 1) * cols])
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        (0..self.rows).map(move |r| &self.cells[r * self.cols..(r + 1) * self.cols])
    }

    pub fn transpose(&self) -> Matrix<T> {
        Matrix::from_fn(self.cols, self.rows, |i, j| self.at(j, i))
    }

    pub fn map<U>(&self, f: impl Fn(&T) -> U) -> Matrix<U> {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            cells: self.cells.iter().map(f).collect(),
        }
    }

    pub fn scalar_add(&self, scalar: T) -> Matrix<T> {
        self.map(|x| x.clone() + scalar.clone())
    }

    pub fn scalar_sub(&self, scalar: T) -> Matrix<T> {
        self.map(|x| x.clone() - scalar.clone())
    }

    pub fn scalar_mul(&self, scalar: T) -> Matrix<T> {
        self.map(|x| x.clone() * scalar.clone())
    }

    /// Matrix product, fanning rows out to rayon once the work reaches
    /// `config.parallel_threshold` multiply-adds.
    pub fn mul_with(&self, rhs: &Matrix<T>, config: &MatrixConfig) -> Result<Matrix<T>> {
        if self.cols != rhs.rows {
            return Err(MatrixError::dimension("mul", self.shape(), rhs.shape()));
        }

        let mut result = Matrix::zeros(self.rows, rhs.cols);
        if result.is_empty() {
            return Ok(result);
        }

        let fill_row = |(i, row): (usize, &mut [T])| {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = (0..self.cols).map(|k| self.at(i, k) * rhs.at(k, j)).sum();
            }
        };

        let work = self.rows.saturating_mul(self.cols).saturating_mul(rhs.cols);
        if work >= config.parallel_threshold {
            debug!(
                "parallel product {}x{} * {}x{}",
                self.rows, self.cols, rhs.rows, rhs.cols
            );
            result
                .cells
                .par_chunks_mut(rhs.cols)
                .enumerate()
                .for_each(fill_row);
        } else {
            result.cells.chunks_mut(rhs.cols).enumerate().for_each(fill_row);
        }

        Ok(result)
    }

    /// Frobenius norm, `sqrt(sum of x^2)`. `NaN` if an element has no `f64` value.
    pub fn frobenius_norm(&self) -> f64 {
        self.cells
            .iter()
            .map(|x| x.to_f64().unwrap_or(f64::NAN))
            .map(|x| x * x)
            .sum::<f64>()
            .sqrt()
    }

    /// Orders matrices by their Frobenius norm.
    pub fn norm_cmp(&self, other: &Matrix<T>) -> Option<Ordering> {
        self.frobenius_norm().partial_cmp(&other.frobenius_norm())
    }

    pub fn norm_lt(&self, other: &Matrix<T>) -> bool {
        self.norm_cmp(other) == Some(Ordering::Less)
    }

    pub fn norm_gt(&self, other: &Matrix<T>) -> bool {
        self.norm_cmp(other) == Some(Ordering::Greater)
    }

    /// Same shape and every pair of elements within `tolerance` as `f64`.
    pub fn approx_eq(&self, other: &Matrix<T>, tolerance: f64) -> bool {
        self.shape() == other.shape()
            && self.cells.iter().zip(other.cells.iter()).all(|(a, b)| {
                match (a.to_f64(), b.to_f64()) {
                    (Some(a), Some(b)) => (a - b).abs() <= tolerance,
                    _ => false,
                }
            })
    }

    pub(crate) fn to_f64(&self) -> Result<Matrix<f64>> {
        let cells = self
            .cells
            .iter()
            .enumerate()
            .map(|(index, x)| x.to_f64().ok_or(MatrixError::NotRepresentable { index }))
            .collect::<Result<Vec<f64>>>()?;
        Ok(Matrix::from_parts(self.rows, self.cols, cells))
    }

    pub(crate) fn cells_swap(&mut self, a: (usize, usize), b: (usize, usize)) {
        self.cells.swap(a.0 * self.cols + a.1, b.0 * self.cols + b.1);
    }

    #[inline(always)]
    pub(crate) fn at(&self, row: usize, col: usize) -> T {
        self.cells[row * self.cols + col].clone()
    }

    fn check_bounds(&self, row: usize, col: usize) -> Result<()> {
        if row >= self.rows || col >= self.cols {
            return Err(MatrixError::Index {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }

    // A matrix with zero columns still has addressable (empty) rows.
    fn empty_row(&self, row: usize, err: MatrixError) -> Result<()> {
        if self.cols == 0 && row < self.rows {
            Ok(())
        } else {
            Err(err)
        }
    }

    fn zip_with(
        &self,
        op: &'static str,
        rhs: &Matrix<T>,
        f: impl Fn(T, T) -> T,
    ) -> Result<Matrix<T>> {
        if self.shape() != rhs.shape() {
            return Err(MatrixError::dimension(op, self.shape(), rhs.shape()));
        }

        Ok(Matrix {
            rows: self.rows,
            cols: self.cols,
            cells: self
                .cells
                .iter()
                .zip(rhs.cells.iter())
                .map(|(a, b)| f(a.clone(), b.clone()))
                .collect(),
        })
    }
}

fn element_count(rows: usize, cols: usize) -> Result<usize> {
    rows.checked_mul(cols)
        .ok_or(MatrixError::Allocation { requested: usize::MAX })
}

fn expect_element_count(rows: usize, cols: usize) -> usize {
    rows.checked_mul(cols)
        .unwrap_or_else(|| panic!("matrix dimensions {rows}x{cols} overflow usize"))
}

impl<T: Element> ListConvert<T> for Matrix<T> {
    type List = Vec<Vec<T>>;

    fn from_list(lines: Vec<Vec<T>>) -> Result<Matrix<T>> {
        let rows = lines.len();
        let cols = lines.first().map(|l| l.len()).unwrap_or(0);
        if let Some(bad) = lines.iter().find(|l| l.len() != cols) {
            return Err(MatrixError::dimension(
                "from_list",
                (rows, cols),
                (1, bad.len()),
            ));
        }

        Ok(Matrix {
            rows,
            cols,
            cells: lines.into_iter().flatten().collect(),
        })
    }

    fn to_list(&self) -> Vec<Vec<T>> {
        self.iter_rows().map(|row| row.to_vec()).collect()
    }
}

impl<T> ops::Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    fn index(&self, (row, col): (usize, usize)) -> &T {
        assert!(row < self.rows && col < self.cols, "matrix index out of bounds");
        &self.cells[row * self.cols + col]
    }
}

impl<T> ops::IndexMut<(usize, usize)> for Matrix<T> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        assert!(row < self.rows && col < self.cols, "matrix index out of bounds");
        &mut self.cells[row * self.cols + col]
    }
}

impl<T: Element> ops::Add<&Matrix<T>> for &Matrix<T> {
    type Output = Result<Matrix<T>>;

    fn add(self, rhs: &Matrix<T>) -> Result<Matrix<T>> {
        self.zip_with("add", rhs, |a, b| a + b)
    }
}

impl<T: Element> ops::Sub<&Matrix<T>> for &Matrix<T> {
    type Output = Result<Matrix<T>>;

    fn sub(self, rhs: &Matrix<T>) -> Result<Matrix<T>> {
        self.zip_with("sub", rhs, |a, b| a - b)
    }
}

impl<T: Element> ops::Mul<&Matrix<T>> for &Matrix<T> {
    type Output = Result<Matrix<T>>;

    fn mul(self, rhs: &Matrix<T>) -> Result<Matrix<T>> {
        self.mul_with(rhs, MatrixConfig::global())
    }
}

impl<T: Element> ops::Mul<&Vector<T>> for &Matrix<T> {
    type Output = Result<Vector<T>>;

    fn mul(self, rhs: &Vector<T>) -> Result<Vector<T>> {
        if self.cols != rhs.len() {
            return Err(MatrixError::dimension(
                "matrix-vector mul",
                self.shape(),
                (rhs.len(), 1),
            ));
        }

        Ok(Vector::from_vec(
            self.iter_rows()
                .map(|row| {
                    row.iter()
                        .zip(rhs.iter())
                        .map(|(a, b)| a.clone() * b.clone())
                        .sum()
                })
                .collect(),
        ))
    }
}

impl<T: fmt::Display> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} x {} matrix", self.rows, self.cols)?;
        for r in 0..self.rows {
            let row = &self.cells[r * self.cols..(r + 1) * self.cols];
            writeln!(f, "{}", row.iter().join(" "))?;
        }
        Ok(())
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------
