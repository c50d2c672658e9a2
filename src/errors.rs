//! Errors
//!
//! Custom error types used throughout the `treerules` crate.
use thiserror::Error;

/// Errors that can occur while importing a tree or extracting its rules.
#[derive(Debug, Error)]
pub enum RuleError {
    /// A node breaks the strict binary tree structure, or was revisited while walking a path.
    #[error("Node {0} is malformed: {1}.")]
    MalformedTree(usize, String),
    /// No training row is routed to this leaf, so its constraints cannot be derived.
    #[error("Leaf {0} is not reached by any row of the training data.")]
    UnreachableLeaf(usize),
    /// Training rows are routed through the tree and must not hold NaN values.
    #[error("NaN value found in row {0}, column {1} of the training data.")]
    NaNValueFound(usize, usize),
    /// First value is what was measured, second is expected, third is what was found.
    #[error("Shape mismatch for {0}, expected {1} but found {2}.")]
    MismatchedShape(String, usize, usize),
    /// Unable to write an object to file or string.
    #[error("Unable to write object: {0}")]
    UnableToWrite(String),
    /// Unable to read an object from file or string.
    #[error("Unable to read object: {0}")]
    UnableToRead(String),
    /// Invalid value parsing.
    #[error("Invalid value {0} passed for {1}, expected one of {2}.")]
    ParseString(String, String, String),
    /// First value is the name of the parameter, second is expected, third is what was passed.
    #[error("Invalid parameter value passed for {0}, expected {1} but {2} provided.")]
    InvalidParameter(String, String, String),
}
