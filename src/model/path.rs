//!
//! Probability of one alignment path
//!
//! A path is the move sequence of the read simulator. Replaying it over the
//! populated template gives the joint probability of the moves and the read,
//! optionally with every emission scaled by the counter-weight.
//!
use super::counter_weight::CounterWeight;
use super::registry::ChemistryModel;
use crate::common::{encode_read, Move};
use crate::error::ModelError;
use crate::prob::Prob;
use log::trace;

///
/// Score `read` aligned to `tpl` along `moves`.
///
/// Returns `InvalidMove` if the moves do not consume exactly the template and
/// the read, or use an insertion at the terminal position.
///
pub fn score_path(
    model: &dyn ChemistryModel,
    tpl: &[u8],
    read: &[u8],
    moves: &[Move],
    counter_weight: Option<&CounterWeight>,
) -> Result<Prob, ModelError> {
    let positions = model.populate(tpl)?;
    let read = encode_read(read)?;
    let mut p = Prob::one();
    let (mut i, mut j) = (0, 0);

    for &m in moves {
        let pos = positions.get(i).ok_or(ModelError::InvalidMove(m))?;
        p *= Prob::from_prob(pos.prob(m));
        let (prev, curr) = match m {
            Move::Match => {
                let prev = if i > 0 { positions[i - 1].idx } else { pos.idx };
                i += 1;
                (prev, pos.idx)
            }
            Move::Branch | Move::Stick => {
                let next = positions.get(i + 1).ok_or(ModelError::InvalidMove(m))?;
                (pos.idx, next.idx)
            }
            Move::Deletion => {
                i += 1;
                continue;
            }
        };
        let emission = *read.get(j).ok_or(ModelError::InvalidMove(m))?;
        j += 1;
        let pe = model.emission_pr(m, emission, prev, curr)?;
        p *= match counter_weight {
            Some(cw) => cw.weighted_prob(Prob::from_prob(pe)),
            None => Prob::from_prob(pe),
        };
        trace!("{} {} {}", m, j, p);
    }

    if i != positions.len() || j != read.len() {
        let last = moves.last().copied().unwrap_or(Move::Match);
        return Err(ModelError::InvalidMove(last));
    }
    Ok(p)
}
