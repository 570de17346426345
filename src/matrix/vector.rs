use std::fmt;
use std::ops;

use crate::error::{MatrixError, Result};
use crate::matrix::traits::{Element, ListConvert};

/// Dense 1D container.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Vector<T> {
    cells: Vec<T>,
}

impl<T: Element> Vector<T> {
    /// Copies the first `n` entries of `elements`.
    pub fn new(elements: &[T], n: usize) -> Result<Vector<T>> {
        if elements.len() < n {
            return Err(MatrixError::dimension(
                "vector construction",
                (n, 1),
                (elements.len(), 1),
            ));
        }

        let mut cells = Vec::new();
        cells
            .try_reserve_exact(n)
            .map_err(|_| MatrixError::Allocation { requested: n })?;
        cells.extend_from_slice(&elements[..n]);
        Ok(Vector { cells })
    }

    pub fn from_vec(cells: Vec<T>) -> Vector<T> {
        Vector { cells }
    }

    pub fn zeros(n: usize) -> Vector<T> {
        Vector {
            cells: vec![T::zero(); n],
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
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

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.cells.iter()
    }

    pub fn get(&self, i: usize) -> Result<&T> {
        self.cells.get(i).ok_or_else(|| self.out_of_bounds(i))
    }

    pub fn set(&mut self, i: usize, value: T) -> Result<()> {
        let err = self.out_of_bounds(i);
        let cell = self.cells.get_mut(i).ok_or(err)?;
        *cell = value;
        Ok(())
    }

    /// Sum of the elementwise products.
    pub fn inner_product(&self, other: &Vector<T>) -> Result<T> {
        self.check_len("inner product", other)?;
        Ok(self
            .cells
            .iter()
            .zip(other.cells.iter())
            .map(|(a, b)| a.clone() * b.clone())
            .sum())
    }

    fn out_of_bounds(&self, i: usize) -> MatrixError {
        MatrixError::Index {
            row: i,
            col: 0,
            rows: self.len(),
            cols: 1,
        }
    }

    fn check_len(&self, op: &'static str, other: &Vector<T>) -> Result<()> {
        if self.len() != other.len() {
            return Err(MatrixError::dimension(
                op,
                (self.len(), 1),
                (other.len(), 1),
            ));
        }
        Ok(())
    }

    fn zip_with(
        &self,
        op: &'static str,
        other: &Vector<T>,
        f: impl Fn(T, T) -> T,
    ) -> Result<Vector<T>> {
        self.check_len(op, other)?;
        Ok(Vector {
            cells: self
                .cells
                .iter()
                .zip(other.cells.iter())
                .map(|(a, b)| f(a.clone(), b.clone()))
                .collect(),
        })
    }
}

/// Free-function form of [`Vector::inner_product`].
pub fn inner_product<T: Element>(a: &Vector<T>, b: &Vector<T>) -> Result<T> {
    a.inner_product(b)
}

impl<T: Element> ListConvert<T> for Vector<T> {
    type List = Vec<T>;

    fn from_list(list: Vec<T>) -> Result<Vector<T>> {
        Ok(Vector::from_vec(list))
    }

    fn to_list(&self) -> Vec<T> {
        self.cells.clone()
    }
}

impl<T> ops::Index<usize> for Vector<T> {
    type Output = T;

    fn index(&self, i: usize) -> &T {
        &self.cells[i]
    }
}

impl<T> ops::IndexMut<usize> for Vector<T> {
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.cells[i]
    }
}

impl<T: Element> ops::Add<&Vector<T>> for &Vector<T> {
    type Output = Result<Vector<T>>;

    fn add(self, rhs: &Vector<T>) -> Result<Vector<T>> {
        self.zip_with("vector add", rhs, |a, b| a + b)
    }
}

impl<T: Element> ops::Sub<&Vector<T>> for &Vector<T> {
    type Output = Result<Vector<T>>;

    fn sub(self, rhs: &Vector<T>) -> Result<Vector<T>> {
        self.zip_with("vector sub", rhs, |a, b| a - b)
    }
}

impl<T: Element> ops::Mul<&Vector<T>> for &Vector<T> {
    type Output = Result<Vector<T>>;

    fn mul(self, rhs: &Vector<T>) -> Result<Vector<T>> {
        self.zip_with("vector mul", rhs, |a, b| a * b)
    }
}

impl<T: Element> ops::Div<&Vector<T>> for &Vector<T> {
    type Output = Result<Vector<T>>;

    fn div(self, rhs: &Vector<T>) -> Result<Vector<T>> {
        self.check_len("vector div", rhs)?;
        // All divisors are checked before any quotient is computed.
        if let Some(index) = rhs.cells.iter().position(|x| x.is_zero()) {
            return Err(MatrixError::DivideByZero { index });
        }
        self.zip_with("vector div", rhs, |a, b| a / b)
    }
}

impl<T: fmt::Display> fmt::Display for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} x 1 Vector", self.cells.len())?;
        for cell in &self.cells {
            writeln!(f, "{}", cell)?;
        }
        Ok(())
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------
