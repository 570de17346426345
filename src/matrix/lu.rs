//! LU factorizations and determinants.
//!
//! [`Matrix::decompose_lu`] is the plain (Crout-style) factorization without
//! pivoting: `L` carries the computed diagonal and `U` has a unit diagonal.
//! Matrices that need a row interchange to find a non-zero pivot are rejected
//! with [`MatrixError::SingularMatrix`].
//!
//! [`Matrix::decompose_plu`] adds partial pivoting and uses the opposite
//! convention (unit-diagonal `L`), with `P·A = L·U`.

use log::{debug, warn};

use crate::error::{MatrixError, Result};
use crate::matrix::matrix_dense::Matrix;
use crate::matrix::traits::Element;
use crate::matrix::vector::Vector;

/// Result of an LU factorization with partial pivoting.
#[derive(Debug, Clone, PartialEq)]
pub struct PluDecomposition<T> {
    /// Unit lower triangular factor
    pub lower: Matrix<T>,
    /// Upper triangular factor
    pub upper: Matrix<T>,
    /// Row `i` of `P·A` is row `permutation[i]` of `A`
    pub permutation: Vec<usize>,
    /// Number of row interchanges performed
    pub swaps: usize,
}

impl<T: Element> PluDecomposition<T> {
    /// The permutation matrix `P`.
    pub fn permutation_matrix(&self) -> Matrix<T> {
        let n = self.permutation.len();
        Matrix::from_fn(n, n, |i, j| {
            if self.permutation[i] == j {
                T::one()
            } else {
                T::zero()
            }
        })
    }

    /// `+1` for an even number of row swaps, `-1` otherwise.
    pub fn sign(&self) -> f64 {
        if self.swaps % 2 == 0 {
            1.0
        } else {
            -1.0
        }
    }

    /// Solves `A·x = b` by forward then backward substitution.
    pub fn solve(&self, b: &Vector<T>) -> Result<Vector<T>> {
        let n = self.permutation.len();
        if b.len() != n {
            return Err(MatrixError::dimension("solve", (n, n), (b.len(), 1)));
        }

        // L·y = P·b
        let mut y: Vec<T> = Vec::with_capacity(n);
        for i in 0..n {
            let acc = (0..i).fold(b[self.permutation[i]].clone(), |acc, k| {
                acc - self.lower.at(i, k) * y[k].clone()
            });
            y.push(acc);
        }

        // U·x = y
        let mut x = vec![T::zero(); n];
        for i in (0..n).rev() {
            let acc = (i + 1..n).fold(y[i].clone(), |acc, k| {
                acc - self.upper.at(i, k) * x[k].clone()
            });
            let diag = self.upper.at(i, i);
            if diag.is_zero() {
                return Err(MatrixError::SingularMatrix { pivot: i });
            }
            x[i] = acc / diag;
        }

        Ok(Vector::from_vec(x))
    }
}

impl<T: Element> Matrix<T> {
    fn require_square(&self, op: &'static str) -> Result<usize> {
        if !self.is_square() {
            return Err(MatrixError::dimension(op, self.shape(), self.shape()));
        }
        Ok(self.rows())
    }

    /// Factors a square matrix into `(L, U)` with `L·U == self`, without pivoting.
    ///
    /// `L` is lower triangular with the computed diagonal, `U` is upper
    /// triangular with ones on the diagonal. Fails with
    /// [`MatrixError::SingularMatrix`] on the first zero `L[i][i]`.
    pub fn decompose_lu(&self) -> Result<(Matrix<T>, Matrix<T>)> {
        let n = self.require_square("decompose_lu")?;
        debug!("LU decomposition of {n}x{n} matrix");

        let mut l = Matrix::zeros(n, n);
        let mut u = Matrix::zeros(n, n);

        for i in 0..n {
            // Column i of L; entries above the diagonal stay zero.
            for j in i..n {
                let acc = (0..i).fold(self.at(j, i), |acc, k| acc - l.at(j, k) * u.at(k, i));
                l[(j, i)] = acc;
            }

            let pivot = l.at(i, i);
            if pivot.is_zero() {
                warn!("zero pivot at {i} in {n}x{n} LU decomposition");
                return Err(MatrixError::SingularMatrix { pivot: i });
            }

            // Row i of U; entries left of the diagonal stay zero.
            u[(i, i)] = T::one();
            for j in i + 1..n {
                let acc = (0..i).fold(self.at(i, j), |acc, k| acc - l.at(i, k) * u.at(k, j));
                u[(i, j)] = acc / pivot.clone();
            }
        }

        Ok((l, u))
    }

    /// Determinant as `det(L)·det(U)` from [`Matrix::decompose_lu`], computed in `f64`.
    ///
    /// A zero pivot on the last row means the matrix is singular and yields
    /// `0.0`. A zero pivot on an earlier row would need pivoting and is
    /// reported as [`MatrixError::SingularMatrix`]; see
    /// [`Matrix::determinant_pivoted`] for a version that always succeeds on
    /// square input.
    pub fn determinant(&self) -> Result<f64> {
        let n = self.require_square("determinant")?;
        let values = self.to_f64()?;

        match values.decompose_lu() {
            Ok((l, u)) => Ok((0..n).map(|i| l.at(i, i) * u.at(i, i)).product()),
            Err(MatrixError::SingularMatrix { pivot }) if pivot + 1 == n => Ok(0.0),
            Err(e) => Err(e),
        }
    }

    /// LU factorization with partial pivoting: `P·self = L·U`.
    ///
    /// The pivot of each column is the remaining entry with the largest
    /// magnitude (as `f64`), ties going to the upper row.
    pub fn decompose_plu(&self) -> Result<PluDecomposition<T>> {
        let n = self.require_square("decompose_plu")?;
        debug!("PLU decomposition of {n}x{n} matrix");

        let mut upper = self.clone();
        let mut lower = Matrix::<T>::zeros(n, n);
        let mut permutation: Vec<usize> = (0..n).collect();
        let mut swaps = 0;

        for k in 0..n {
            let magnitude = |r: usize| upper.at(r, k).to_f64().map_or(0.0, f64::abs);
            let mut pivot_row = k;
            for r in k + 1..n {
                if magnitude(r) > magnitude(pivot_row) {
                    pivot_row = r;
                }
            }

            if upper.at(pivot_row, k).is_zero() {
                warn!("singular column {k} in {n}x{n} PLU decomposition");
                return Err(MatrixError::SingularMatrix { pivot: k });
            }

            if pivot_row != k {
                for j in 0..n {
                    upper.cells_swap((k, j), (pivot_row, j));
                }
                for j in 0..k {
                    lower.cells_swap((k, j), (pivot_row, j));
                }
                permutation.swap(k, pivot_row);
                swaps += 1;
            }

            let pivot = upper.at(k, k);
            for r in k + 1..n {
                let factor = upper.at(r, k) / pivot.clone();
                upper[(r, k)] = T::zero();
                for j in k + 1..n {
                    let value = upper.at(r, j) - factor.clone() * upper.at(k, j);
                    upper[(r, j)] = value;
                }
                lower[(r, k)] = factor;
            }
            lower[(k, k)] = T::one();
        }

        Ok(PluDecomposition {
            lower,
            upper,
            permutation,
            swaps,
        })
    }

    /// Determinant via [`Matrix::decompose_plu`] in `f64`. Singular input gives `0.0`.
    pub fn determinant_pivoted(&self) -> Result<f64> {
        self.require_square("determinant_pivoted")?;
        match self.to_f64()?.decompose_plu() {
            Ok(plu) => {
                let diag: f64 = (0..plu.upper.rows()).map(|i| plu.upper.at(i, i)).product();
                Ok(plu.sign() * diag)
            }
            Err(MatrixError::SingularMatrix { .. }) => Ok(0.0),
            Err(e) => Err(e),
        }
    }

    /// Solves `self·x = b` for a square, non-singular matrix.
    pub fn solve(&self, b: &Vector<T>) -> Result<Vector<T>> {
        let n = self.require_square("solve")?;
        if b.len() != n {
            return Err(MatrixError::dimension("solve", self.shape(), (b.len(), 1)));
        }
        self.decompose_plu()?.solve(b)
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::traits::ListConvert;
    use crate::rings::rational::Rational;

    fn mf(lines: Vec<Vec<f64>>) -> Matrix<f64> {
        Matrix::from_list(lines).unwrap()
    }

    fn mq(lines: Vec<Vec<i64>>) -> Matrix<Rational> {
        Matrix::from_list(
            lines
                .into_iter()
                .map(|l| l.into_iter().map(Rational::from).collect())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_lu_shape_of_factors() {
        let a = mf(vec![vec![4.0, 3.0], vec![6.0, 3.0]]);
        let (l, u) = a.decompose_lu().unwrap();

        assert_eq!(l, mf(vec![vec![4.0, 0.0], vec![6.0, -1.5]]));
        assert_eq!(u, mf(vec![vec![1.0, 0.75], vec![0.0, 1.0]]));
        assert!((&l * &u).unwrap().approx_eq(&a, 1e-12));
    }

    #[test]
    fn test_lu_round_trip_exact() {
        let a = mq(vec![vec![2, -1, 3], vec![4, 1, 0], vec![-2, 5, 7]]);
        let (l, u) = a.decompose_lu().unwrap();
        assert_eq!((&l * &u).unwrap(), a);

        for i in 0..3 {
            assert_eq!(u[(i, i)], 1);
            for j in 0..i {
                assert_eq!(u[(i, j)], 0);
                assert_eq!(l[(j, i)], 0);
            }
        }
    }

    #[test]
    fn test_lu_round_trip_float() {
        let a = mf(vec![
            vec![5.0, 2.0, -1.0, 3.0],
            vec![1.0, 7.0, 2.0, 0.5],
            vec![-2.0, 1.0, 6.0, 1.0],
            vec![0.5, -1.0, 2.0, 9.0],
        ]);
        let (l, u) = a.decompose_lu().unwrap();
        assert!((&l * &u).unwrap().approx_eq(&a, 1e-10));
    }

    #[test]
    fn test_lu_rejects_non_square() {
        let a = Matrix::<f64>::zeros(2, 3);
        assert!(matches!(
            a.decompose_lu(),
            Err(MatrixError::Dimension { .. })
        ));
        assert!(matches!(a.determinant(), Err(MatrixError::Dimension { .. })));
        assert!(matches!(
            a.decompose_plu(),
            Err(MatrixError::Dimension { .. })
        ));
    }

    #[test]
    fn test_lu_zero_pivot() {
        let a = mf(vec![vec![0.0, 1.0], vec![1.0, 0.0]]);
        assert_eq!(
            a.decompose_lu(),
            Err(MatrixError::SingularMatrix { pivot: 0 })
        );
        assert_eq!(
            a.determinant(),
            Err(MatrixError::SingularMatrix { pivot: 0 })
        );
        assert_eq!(a.determinant_pivoted().unwrap(), -1.0);
    }

    #[test]
    fn test_determinant() {
        for n in 0..6 {
            assert_eq!(Matrix::<i64>::identity(n).determinant().unwrap(), 1.0);
        }

        let a = Matrix::from_list(vec![vec![1, 2], vec![3, 4]]).unwrap();
        assert!((a.determinant().unwrap() + 2.0).abs() < 1e-12);

        let b = Matrix::from_list(vec![vec![2, -1, 3], vec![4, 1, 0], vec![-2, 5, 7]]).unwrap();
        assert!((b.determinant().unwrap() - 108.0).abs() < 1e-9);
        assert!((b.determinant_pivoted().unwrap() - 108.0).abs() < 1e-9);
    }

    #[test]
    fn test_determinant_singular() {
        let a = Matrix::from_list(vec![vec![1, 2], vec![2, 4]]).unwrap();
        assert_eq!(a.determinant().unwrap(), 0.0);
        assert_eq!(a.determinant_pivoted().unwrap(), 0.0);
    }

    #[test]
    fn test_plu_reconstructs() {
        let a = mq(vec![vec![0, 2, 1], vec![3, -1, 4], vec![6, 5, -2]]);
        let plu = a.decompose_plu().unwrap();

        let pa = (&plu.permutation_matrix() * &a).unwrap();
        assert_eq!((&plu.lower * &plu.upper).unwrap(), pa);
        assert_eq!(plu.permutation, vec![2, 1, 0]);
        assert_eq!(plu.swaps, 1);

        let f = a.to_f64().unwrap();
        let det = f.determinant_pivoted().unwrap();
        assert!((det - 81.0).abs() < 1e-9, "{det}");
    }

    #[test]
    fn test_solve() {
        let a = mq(vec![vec![2, 1, -1], vec![-3, -1, 2], vec![-2, 1, 2]]);
        let b = Vector::from_vec(vec![Rational::from(8), Rational::from(-11), Rational::from(-3)]);
        let x = a.solve(&b).unwrap();
        assert_eq!(x.to_list(), vec![Rational::from(2), Rational::from(3), Rational::from(-1)]);

        let singular = mq(vec![vec![1, 2], vec![2, 4]]);
        let b2 = Vector::from_vec(vec![Rational::from(1), Rational::from(2)]);
        assert!(matches!(
            singular.solve(&b2),
            Err(MatrixError::SingularMatrix { .. })
        ));
        assert!(matches!(a.solve(&b2), Err(MatrixError::Dimension { .. })));
    }
}
