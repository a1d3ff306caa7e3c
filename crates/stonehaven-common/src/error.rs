//! Error types for Project Stonehaven.

use thiserror::Error;

/// Top-level error type for Stonehaven operations.
#[derive(Debug, Error)]
pub enum StonehavenError {
    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Collapse failure surfaced to the caller
    #[error("Collapse error: {0}")]
    Collapse(#[from] CollapseError),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Fatal configuration problems, reported before any cell is touched.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The catalog has no modules
    #[error("Tile catalog is empty")]
    EmptyCatalog,

    /// Two modules share an id
    #[error("Duplicate module id: {0}")]
    DuplicateModuleId(String),

    /// A module weight is not a positive finite number
    #[error("Module {id} has invalid weight {weight}")]
    InvalidWeight {
        /// Module id
        id: String,
        /// Offending weight
        weight: f32,
    },

    /// Grid or chunk dimensions are zero
    #[error("Invalid grid dimensions {width}x{height}")]
    InvalidDimensions {
        /// Requested width
        width: usize,
        /// Requested height
        height: usize,
    },

    /// An allowed-id grid does not match the grid being solved
    #[error("Restriction grid is {actual:?}, expected {expected:?}")]
    RestrictionSize {
        /// Solved grid size
        expected: (usize, usize),
        /// Restriction grid size
        actual: (usize, usize),
    },

    /// Any other invalid setting
    #[error("Invalid setting: {0}")]
    InvalidSetting(String),
}

/// Reasons a single collapse attempt (or a whole solve) failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollapseError {
    /// Propagation emptied a cell
    #[error("Contradiction at ({x}, {y})")]
    Contradiction {
        /// Cell column
        x: usize,
        /// Cell row
        y: usize,
    },

    /// The allowed-id restriction left a cell with no candidates
    #[error("No candidates left at ({x}, {y}) after restriction")]
    EmptyCandidateSet {
        /// Cell column
        x: usize,
        /// Cell row
        y: usize,
    },

    /// The weighted pick found no weight to draw from
    #[error("Zero total weight at ({x}, {y})")]
    ZeroWeight {
        /// Cell column
        x: usize,
        /// Cell row
        y: usize,
    },

    /// Every attempt contradicted and strict mode is on
    #[error("All {attempts} collapse attempts failed, last: {last}")]
    RetriesExhausted {
        /// Attempts made
        attempts: usize,
        /// Failure of the final attempt
        last: Box<CollapseError>,
    },
}

/// Result type alias for Stonehaven operations.
pub type StonehavenResult<T> = Result<T, StonehavenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = StonehavenError::from(ConfigError::EmptyCatalog);
        assert_eq!(
            err.to_string(),
            "Configuration error: Tile catalog is empty"
        );

        let err = CollapseError::RetriesExhausted {
            attempts: 3,
            last: Box::new(CollapseError::Contradiction { x: 1, y: 2 }),
        };
        assert_eq!(
            err.to_string(),
            "All 3 collapse attempts failed, last: Contradiction at (1, 2)"
        );
    }
}
