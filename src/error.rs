//!
//! Error kinds of the consensus model
//!
use crate::common::Move;
use thiserror::Error;

///
/// Failures surfaced by model loading, template materialization,
/// emission queries and counter-weight calibration.
///
/// All of them are deterministic functions of the inputs, so none of
/// them is worth retrying.
///
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// structural or type problem in a parameter document
    #[error("malformed model file")]
    MalformedModel,
    /// a template or read contains a symbol outside `ACGT`
    #[error("invalid character {base:?} at position {pos} in template")]
    InvalidTemplate { base: char, pos: usize },
    /// emission or expected log-likelihood queried for a move that cannot emit
    #[error("invalid move {0:?}")]
    InvalidMove(Move),
    /// the counter-weight root finder did not converge
    #[error("counter-weight calibration did not converge: {0}")]
    CalibrationNonconvergence(String),
    /// no chemistry or model form is registered under the tag
    #[error("unknown chemistry `{0}`")]
    UnknownChemistry(String),
}
