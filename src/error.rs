use thiserror::Error;

/// Errors reported by matrix and vector operations.
///
/// Every fallible operation returns one of these instead of logging and
/// carrying on with stale data. Operands are borrowed, so a failure never
/// leaves either of them modified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixError {
    /// Operand shapes are incompatible for the requested operation.
    #[error("{op}: incompatible dimensions {left:?} and {right:?}")]
    Dimension {
        /// Name of the operation that failed
        op: &'static str,
        /// Shape of the left operand (rows, cols)
        left: (usize, usize),
        /// Shape of the right operand (rows, cols)
        right: (usize, usize),
    },

    /// Element access outside of the container.
    #[error("index ({row}, {col}) out of bounds for {rows}x{cols}")]
    Index {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// Backing storage could not be obtained.
    #[error("cannot allocate storage for {requested} elements")]
    Allocation { requested: usize },

    /// LU decomposition hit a zero pivot.
    #[error("zero pivot at index {pivot}, matrix is singular or needs pivoting")]
    SingularMatrix { pivot: usize },

    /// Elementwise division with a zero divisor.
    #[error("division by zero at index {index}")]
    DivideByZero { index: usize },

    /// A rational was built with a zero denominator.
    #[error("zero denominator")]
    ZeroDenominator,

    /// An element has no `f64` representation.
    #[error("element at flat index {index} cannot be represented as f64")]
    NotRepresentable { index: usize },
}

/// A specialized `Result` type for matrix operations.
pub type Result<T> = std::result::Result<T, MatrixError>;

impl MatrixError {
    pub(crate) fn dimension(op: &'static str, left: (usize, usize), right: (usize, usize)) -> Self {
        MatrixError::Dimension { op, left, right }
    }

    /// Returns `true` for shape and bounds errors.
    pub fn is_dimension_error(&self) -> bool {
        matches!(
            self,
            MatrixError::Dimension { .. } | MatrixError::Index { .. }
        )
    }

    /// Returns `true` for errors caused by the values rather than the shapes.
    pub fn is_numeric_error(&self) -> bool {
        matches!(
            self,
            MatrixError::SingularMatrix { .. }
                | MatrixError::DivideByZero { .. }
                | MatrixError::ZeroDenominator
                | MatrixError::NotRepresentable { .. }
        )
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MatrixError::dimension("add", (2, 3), (3, 2));
        assert_eq!(err.to_string(), "add: incompatible dimensions (2, 3) and (3, 2)");

        let err = MatrixError::Index {
            row: 4,
            col: 0,
            rows: 2,
            cols: 2,
        };
        assert_eq!(err.to_string(), "index (4, 0) out of bounds for 2x2");

        let err = MatrixError::DivideByZero { index: 1 };
        assert_eq!(err.to_string(), "division by zero at index 1");
        assert_eq!(MatrixError::ZeroDenominator.to_string(), "zero denominator");
    }

    #[test]
    fn test_error_categories() {
        assert!(MatrixError::dimension("mul", (1, 2), (3, 4)).is_dimension_error());
        assert!(!MatrixError::SingularMatrix { pivot: 0 }.is_dimension_error());
        assert!(MatrixError::SingularMatrix { pivot: 0 }.is_numeric_error());
        assert!(MatrixError::DivideByZero { index: 3 }.is_numeric_error());
        assert!(MatrixError::ZeroDenominator.is_numeric_error());
        assert!(!MatrixError::Allocation { requested: 1 }.is_numeric_error());
    }
}
