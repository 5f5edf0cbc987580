//!
//! Emission probabilities of the SNR model
//!
//! * match and branch: `1 - eps` for the template base, `eps / 3` otherwise
//! * stick: `1 / 3` for each base other than the template base
//! * deletion: emits nothing
//!
use super::params::SnrParams;
use crate::common::{Moment, Move};
use crate::error::ModelError;
use crate::prob::p_ln_p;

///
/// Probability that `move` emits `emission` at a template base `curr`.
/// `prev` is accepted for the shared oracle signature and unused here.
///
pub fn emission_pr(
    params: &SnrParams,
    m: Move,
    emission: u8,
    _prev: u8,
    curr: u8,
) -> Result<f64, ModelError> {
    match m {
        Move::Deletion => Err(ModelError::InvalidMove(m)),
        _ => Ok(params.emission_pmf()[m.index()][(curr != emission) as usize]),
    }
}

///
/// `E[ln p]` or `E[(ln p)^2]` of one emission of the move, where the
/// expectation is over the emitted base drawn from the move's row.
///
pub fn expected_ll_for_emission(
    params: &SnrParams,
    m: Move,
    moment: Moment,
) -> Result<f64, ModelError> {
    match m {
        Move::Match | Move::Branch => {
            let p_mismatch = params.substitution_rate();
            let p_match = 1.0 - p_mismatch;
            // p ln(p/3) summed over the 3 mismatching bases
            let lg_match = p_match.ln();
            let lg_mismatch = (p_mismatch / 3.0).ln();
            Ok(match moment {
                Moment::First => p_ln_p(p_match) + p_ln_p(p_mismatch / 3.0) * 3.0,
                Moment::Second => {
                    weighted_square(p_match, lg_match) + weighted_square(p_mismatch, lg_mismatch)
                }
            })
        }
        Move::Stick => {
            let lg_third = -(3f64.ln());
            Ok(match moment {
                Moment::First => lg_third,
                Moment::Second => lg_third * lg_third,
            })
        }
        Move::Deletion => Err(ModelError::InvalidMove(m)),
    }
}

/// `p (ln q)^2`, zero when `p` is zero
fn weighted_square(p: f64, lg: f64) -> f64 {
    if p == 0.0 {
        0.0
    } else {
        p * lg * lg
    }
}
