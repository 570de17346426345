use log::warn;
use std::str::FromStr;
use std::sync::OnceLock;

pub const PARALLEL_THRESHOLD_VAR: &str = "RUST_MATRIX_PARALLEL_THRESHOLD";
pub const TOLERANCE_VAR: &str = "RUST_MATRIX_TOLERANCE";

static GLOBAL: OnceLock<MatrixConfig> = OnceLock::new();

/// Tunables shared by every matrix in the process.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixConfig {
    /// Number of multiply-adds from which a product is split across rayon tasks.
    pub parallel_threshold: usize,
    /// Tolerance used by approximate comparisons and numerical rank.
    pub tolerance: f64,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        MatrixConfig {
            parallel_threshold: 1 << 15,
            tolerance: 1e-9,
        }
    }
}

impl MatrixConfig {
    /// Builds a config from the environment, keeping defaults for unset or
    /// malformed variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let default = MatrixConfig::default();
        MatrixConfig {
            parallel_threshold: parse_or(
                &lookup,
                PARALLEL_THRESHOLD_VAR,
                default.parallel_threshold,
            ),
            tolerance: parse_or(&lookup, TOLERANCE_VAR, default.tolerance),
        }
    }

    /// Process-wide config, read from the environment on first use.
    pub fn global() -> &'static MatrixConfig {
        GLOBAL.get_or_init(MatrixConfig::from_env)
    }
}

fn parse_or<T: FromStr + Copy + std::fmt::Debug>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("ignoring {key}={raw:?}, using {default:?}");
            default
        }),
    }
}

// --------------------------------------------------
//                      TESTS
// --------------------------------------------------
