//!
//! Sampling reads from a template
//!
//! The driver walks template positions and picks a move at each of them:
//!
//! * `Match` emits against template base `i` and advances
//! * `Branch`/`Stick` emit against the upcoming base `i + 1` and stay
//! * `Deletion` advances without emission
//!
//! How covariates are drawn and how bases are emitted is left to the
//! `InitializeModel` and `GenerateReadData` strategies of each chemistry.
//!
use super::template::TemplatePosition;
use crate::common::{sequence_to_string, Move, Sequence, Snr};
use crate::error::ModelError;
use log::{debug, trace};
use rand::prelude::*;
use serde::{Serialize, Serializer};

///
/// One emitted base with its auxiliary kinetics
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseData {
    pub base: u8,
    /// pulse width
    pub pw: u8,
    /// inter-pulse duration
    pub ipd: u8,
}

///
/// Draws covariates and materializes the template
///
pub trait InitializeModel {
    fn initialize<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        tpl: &[u8],
    ) -> Result<(Snr, Vec<TemplatePosition>), ModelError>;
}

///
/// Draws one emission for a move at `(prev, curr)` template codes
///
pub trait GenerateReadData {
    fn generate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        m: Move,
        prev: u8,
        curr: u8,
    ) -> Result<BaseData, ModelError>;
}

///
/// Simulated read with per-base kinetics
///
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulatedRead {
    pub name: String,
    pub chemistry: String,
    #[serde(serialize_with = "serialize_seq")]
    pub seq: Sequence,
    pub pw: Vec<u8>,
    pub ipd: Vec<u8>,
    pub snr: Snr,
}

fn serialize_seq<S: Serializer>(seq: &Sequence, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(sequence_to_string(seq))
}

impl SimulatedRead {
    pub fn len(&self) -> usize {
        self.seq.len()
    }
    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }
    fn push(&mut self, data: BaseData) {
        self.seq.push(data.base);
        self.pw.push(data.pw);
        self.ipd.push(data.ipd);
    }
}

impl std::fmt::Display for SimulatedRead {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} {} snr={} {}",
            self.name,
            self.chemistry,
            self.snr,
            sequence_to_string(&self.seq)
        )
    }
}

///
/// pick randomly from the choices with its own weight.
///
/// Weights that are not a distribution (all zero, negative or NaN) give
/// `MalformedModel`. Rows of `TransitionTable` and the emission pmf are always
/// finite and sum to 1, so for them this is a programming error.
///
pub fn pick_with_prob<R: Rng + ?Sized, T: Copy>(
    rng: &mut R,
    choices: &[(T, f64)],
) -> Result<T, ModelError> {
    choices
        .choose_weighted(rng, |item| item.1)
        .map(|item| item.0)
        .map_err(|e| {
            trace!("invalid weights: {}", e);
            ModelError::MalformedModel
        })
}

fn pick_move<R: Rng + ?Sized>(rng: &mut R, pos: &TemplatePosition) -> Result<Move, ModelError> {
    let choices = [
        (Move::Match, pos.p_match),
        (Move::Branch, pos.p_branch),
        (Move::Stick, pos.p_stick),
        (Move::Deletion, pos.p_deletion),
    ];
    pick_with_prob(rng, &choices)
}

///
/// Run one simulation with the chemistry's strategies.
///
pub fn simulate_read_impl<R, I, G>(
    rng: &mut R,
    tpl: &[u8],
    name: &str,
    chemistry: &str,
    init: &I,
    generate: &G,
) -> Result<(SimulatedRead, Vec<Move>), ModelError>
where
    R: Rng + ?Sized,
    I: InitializeModel,
    G: GenerateReadData,
{
    let (snr, positions) = init.initialize(rng, tpl)?;
    let mut read = SimulatedRead {
        name: name.to_string(),
        chemistry: chemistry.to_string(),
        seq: Vec::with_capacity(positions.len()),
        pw: Vec::with_capacity(positions.len()),
        ipd: Vec::with_capacity(positions.len()),
        snr,
    };
    let mut moves = Vec::with_capacity(positions.len());

    let mut i = 0;
    while i < positions.len() {
        let curr = positions[i].idx;
        if !(positions[i].p_match + positions[i].p_deletion > 0.0) {
            // only insertions are possible, so the read would never end
            debug!("position {} ({}) is never left", i, positions[i].base as char);
            return Err(ModelError::MalformedModel);
        }
        let m = pick_move(rng, &positions[i])?;
        trace!("#{} {} {}", i, positions[i].base as char, m);
        match m {
            Move::Match => {
                let prev = if i > 0 { positions[i - 1].idx } else { curr };
                read.push(generate.generate(rng, m, prev, curr)?);
                i += 1;
            }
            Move::Branch | Move::Stick => {
                let next = positions.get(i + 1).ok_or(ModelError::InvalidMove(m))?;
                read.push(generate.generate(rng, m, curr, next.idx)?);
            }
            Move::Deletion => {
                i += 1;
            }
        }
        moves.push(m);
    }
    Ok((read, moves))
}
