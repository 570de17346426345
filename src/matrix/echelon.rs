use log::debug;
use num_bigint::BigInt;

use crate::config::MatrixConfig;
use crate::error::Result;
use crate::matrix::matrix_dense::Matrix;
use crate::matrix::traits::Element;

impl<T: Element> Matrix<T> {
    /// Row echelon form by Bareiss fraction-free elimination, along with the
    /// pivot column of each non-zero row.
    ///
    /// After step `k` every entry below the pivots is a `(k + 1)`-minor of the
    /// row-permuted input, so the division by the previous pivot is exact for
    /// integer and rational elements and entries never grow past those minors.
    /// For a square non-singular input the last pivot is the determinant, up to
    /// the sign of the row swaps. Zero tests are exact.
    pub fn echelon_form(&self) -> (Matrix<T>, Vec<usize>) {
        let mut mat = self.clone();
        let pivots = bareiss(&mut mat);
        (mat, pivots)
    }

    /// Exact rank. Integer-valued inputs are eliminated over `BigInt`, so
    /// fixed-width integers cannot overflow here.
    pub fn rank(&self) -> usize {
        match self.to_bigint() {
            Some(mut lifted) => bareiss(&mut lifted).len(),
            None => bareiss(&mut self.clone()).len(),
        }
    }

    /// Dimension of the kernel, `cols - rank`.
    pub fn defect(&self) -> usize {
        self.cols() - self.rank()
    }

    /// Whether the columns are linearly dependent.
    pub fn is_linearly_dependent(&self) -> bool {
        self.rank() < self.cols()
    }

    /// Numerical rank by Gaussian elimination with partial pivoting over `f64`.
    ///
    /// A column whose largest remaining magnitude is at most
    /// `config.tolerance * max(1, max |a_ij|)` has no pivot.
    pub fn rank_with(&self, config: &MatrixConfig) -> Result<usize> {
        let mut mat = self.to_f64()?;
        let scale = mat.as_slice().iter().fold(1.0_f64, |acc, x| acc.max(x.abs()));
        let threshold = config.tolerance * scale;
        debug!(
            "numerical rank of {}x{} matrix, threshold {threshold:e}",
            mat.rows(),
            mat.cols()
        );

        let mut rank = 0;
        for col in 0..mat.cols() {
            if rank >= mat.rows() {
                break;
            }

            let (pivot_row, magnitude) = (rank..mat.rows())
                .map(|r| (r, mat.at(r, col).abs()))
                .fold((rank, 0.0), |best, cur| if cur.1 > best.1 { cur } else { best });
            if magnitude <= threshold {
                continue;
            }

            if pivot_row != rank {
                for k in 0..mat.cols() {
                    mat.cells_swap((rank, k), (pivot_row, k));
                }
            }

            let pivot = mat.at(rank, col);
            for r in rank + 1..mat.rows() {
                let factor = mat.at(r, col) / pivot;
                for k in col + 1..mat.cols() {
                    let delta = factor * mat.at(rank, k);
                    mat[(r, k)] -= delta;
                }
                mat[(r, col)] = 0.0;
            }
            rank += 1;
        }

        Ok(rank)
    }

    pub fn defect_with(&self, config: &MatrixConfig) -> Result<usize> {
        Ok(self.cols() - self.rank_with(config)?)
    }

    pub fn is_linearly_dependent_with(&self, config: &MatrixConfig) -> Result<bool> {
        Ok(self.rank_with(config)? < self.cols())
    }

    /// Exact integer copy, if every element is an integer that fits in `i64`.
    fn to_bigint(&self) -> Option<Matrix<BigInt>> {
        let cells = self
            .as_slice()
            .iter()
            .map(|x| {
                let int = x.to_i64()?;
                (T::from_i64(int)? == *x).then(|| BigInt::from(int))
            })
            .collect::<Option<Vec<_>>>()?;
        Some(Matrix::from_parts(self.rows(), self.cols(), cells))
    }
}

/// In-place Bareiss elimination, returning the pivot columns.
fn bareiss<E: Element>(mat: &mut Matrix<E>) -> Vec<usize> {
    let mut pivots = vec![];
    let mut prev = E::one();
    let mut row = 0;

    for col in 0..mat.cols() {
        if row >= mat.rows() {
            break;
        }

        let pivot_row = match (row..mat.rows()).find(|&r| !mat.at(r, col).is_zero()) {
            Some(r) => r,
            None => continue,
        };

        if pivot_row != row {
            for k in 0..mat.cols() {
                mat.cells_swap((row, k), (pivot_row, k));
            }
        }

        // Rows with a zero factor are still rescaled by pivot / prev.
        let pivot_val = mat.at(row, col);
        for r in row + 1..mat.rows() {
            let factor = mat.at(r, col);
            for k in col + 1..mat.cols() {
                let a = mat.at(r, k) * pivot_val.clone();
                let b = mat.at(row, k) * factor.clone();
                mat[(r, k)] = (a - b) / prev.clone();
            }
            mat[(r, col)] = E::zero();
        }

        prev = pivot_val;
        pivots.push(col);
        row += 1;
    }

    pivots
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::traits::ListConvert;
    use crate::rings::rational::Rational;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_echelon_form() {
        let m = Matrix::<i64>::from_list(vec![vec![0, 2, 4], vec![1, 1, 1], vec![2, 4, 6]]).unwrap();
        let (echelon, pivots) = m.echelon_form();

        assert_eq!(pivots, vec![0, 1]);
        assert_eq!(
            echelon.to_list(),
            vec![vec![1, 1, 1], vec![0, 2, 4], vec![0, 0, 0]]
        );
        assert_eq!(m.rank(), 2);
        assert_eq!(m.defect(), 1);
        assert!(m.is_linearly_dependent());
    }

    #[test]
    fn test_rank_full_and_wide() {
        let m = Matrix::<i64>::from_list(vec![
            vec![1, 2, 5, 77],
            vec![3, 4, 7, 11],
            vec![4, 8, 9, 1],
        ])
        .unwrap();
        assert_eq!(m.rank(), 3);
        assert_eq!(m.defect(), 1);
        assert!(m.is_linearly_dependent());
        assert_eq!(m.transpose().rank(), 3);
        assert!(!m.transpose().is_linearly_dependent());

        assert_eq!(Matrix::<i64>::identity(4).rank(), 4);
        assert_eq!(Matrix::<i64>::zeros(3, 2).rank(), 0);
        assert_eq!(Matrix::<i64>::zeros(0, 0).rank(), 0);
        assert!(!Matrix::<i64>::zeros(0, 0).is_linearly_dependent());
    }

    #[test]
    fn test_rank_rational() {
        let q = |s: &str| s.parse::<Rational>().unwrap();
        let m = Matrix::from_list(vec![
            vec![q("1/2"), q("1/3")],
            vec![q("3/2"), q("1")],
        ])
        .unwrap();
        assert_eq!(m.rank(), 1);
        assert_eq!(m.defect(), 1);
    }

    #[test]
    fn test_echelon_form_minors() {
        let m = Matrix::<i64>::from_list(vec![vec![2, 1, 1], vec![1, 3, 2], vec![1, 0, 0]]).unwrap();
        let (echelon, pivots) = m.echelon_form();

        assert_eq!(pivots, vec![0, 1, 2]);
        assert_eq!(
            echelon.to_list(),
            vec![vec![2, 1, 1], vec![0, 5, 3], vec![0, 0, -1]]
        );
    }

    #[test]
    fn test_echelon_form_no_overflow() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            let m = Matrix::<i64>::from_fn(8, 8, |_, _| rng.gen_range(-5..=5));
            let (echelon, pivots) = m.echelon_form();
            let (wide, wide_pivots) = m.map(|&x| BigInt::from(x)).echelon_form();

            assert_eq!(pivots, wide_pivots);
            assert_eq!(echelon.map(|&x| BigInt::from(x)), wide);
        }
    }

    #[test]
    fn test_rank_integer_matches_rational() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let m = Matrix::<i64>::from_fn(8, 8, |_, _| rng.gen_range(-1000..=1000));
            let exact = m.map(|&x| Rational::new(x.into(), 7.into()).unwrap());

            assert_eq!(m.rank(), exact.rank());
            assert_eq!(m.rank(), 8);
        }

        let left = Matrix::<i64>::from_fn(10, 4, |_, _| rng.gen_range(-1000..=1000));
        let right = Matrix::<i64>::from_fn(4, 10, |_, _| rng.gen_range(-1000..=1000));
        let m = (&left * &right).unwrap();
        let exact = m.map(|&x| Rational::new(x.into(), 3.into()).unwrap());

        assert_eq!(m.rank(), 4);
        assert_eq!(exact.rank(), 4);
        assert_eq!(m.defect(), 6);
    }

    #[test]
    fn test_rank_with_tolerance() {
        let config = MatrixConfig::default();
        let mut rng = StdRng::seed_from_u64(11);
        let base = Matrix::<f64>::from_fn(6, 3, |_, _| rng.gen_range(-1.0..1.0));
        let mix = Matrix::<f64>::from_fn(3, 6, |_, _| rng.gen_range(-1.0..1.0));
        let m = (&base * &mix).unwrap();

        assert_eq!(m.rank_with(&config).unwrap(), 3);
        assert_eq!(m.defect_with(&config).unwrap(), 3);
        assert!(m.is_linearly_dependent_with(&config).unwrap());

        let full = Matrix::<f64>::from_fn(6, 6, |_, _| rng.gen_range(-1.0..1.0));
        assert_eq!(full.rank_with(&config).unwrap(), 6);
        assert!(!full.is_linearly_dependent_with(&config).unwrap());

        let ints = Matrix::<i64>::from_list(vec![vec![1, 2], vec![2, 4]]).unwrap();
        assert_eq!(ints.rank_with(&config).unwrap(), 1);
        assert_eq!(Matrix::<f64>::zeros(0, 3).rank_with(&config).unwrap(), 0);
    }
}
