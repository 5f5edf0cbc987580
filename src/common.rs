//!
//! Shared vocabulary: bases, moves, contexts and covariates
//!
use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Type of DNA sequence
pub type Sequence = Vec<u8>;

/// Convert Sequence(Vec<u8>) into &str
/// useful in displaying
pub fn sequence_to_string(seq: &[u8]) -> &str {
    std::str::from_utf8(seq).unwrap_or("<non-utf8>")
}

///
/// Array of valid DNA bases, indexed by 2-bit code
///
pub const VALID_BASES: [u8; 4] = [b'A', b'C', b'G', b'T'];

///
/// Number of sequence contexts (4 bases x homopolymer flag)
///
pub const N_CONTEXTS: usize = 8;

/// marker for a symbol outside the alphabet
const INVALID_CODE: u8 = 4;

///
/// Byte to 2-bit code translation. `ACGT` in either case map to `0..4`,
/// everything else to `INVALID_CODE`.
///
static TRANSLATION_TABLE: [u8; 256] = {
    let mut table = [INVALID_CODE; 256];
    table[b'A' as usize] = 0;
    table[b'C' as usize] = 1;
    table[b'G' as usize] = 2;
    table[b'T' as usize] = 3;
    table[b'a' as usize] = 0;
    table[b'c' as usize] = 1;
    table[b'g' as usize] = 2;
    table[b't' as usize] = 3;
    table
};

///
/// 2-bit code of the base, or None if the base is not one of `ACGTacgt`
///
#[inline]
pub fn encode_base(base: u8) -> Option<u8> {
    match TRANSLATION_TABLE[base as usize] {
        INVALID_CODE => None,
        code => Some(code),
    }
}

///
/// Convert a read into 2-bit codes
///
pub fn encode_read(seq: &[u8]) -> Result<Vec<u8>, ModelError> {
    seq.iter()
        .enumerate()
        .map(|(pos, &base)| {
            encode_base(base).ok_or(ModelError::InvalidTemplate {
                base: base as char,
                pos,
            })
        })
        .collect()
}

///
/// State transition categories of the alignment model.
///
/// * `Match`: emit a base against the template base and advance
/// * `Branch`: insert a copy of the upcoming template base
/// * `Stick`: insert a base different from the upcoming template base
/// * `Deletion`: advance without emission
///
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    Match,
    Branch,
    Stick,
    Deletion,
}

impl Move {
    pub const ALL: [Move; 4] = [Move::Match, Move::Branch, Move::Stick, Move::Deletion];

    /// column index in a transition row
    pub fn index(self) -> usize {
        match self {
            Move::Match => 0,
            Move::Branch => 1,
            Move::Stick => 2,
            Move::Deletion => 3,
        }
    }
    /// Match/Branch/Stick emit a base, Deletion does not.
    pub fn is_emitting(self) -> bool {
        self != Move::Deletion
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let c = match self {
            Move::Match => 'M',
            Move::Branch => 'B',
            Move::Stick => 'S',
            Move::Deletion => 'D',
        };
        write!(f, "{}", c)
    }
}

///
/// Which moment of the emission log-likelihood is requested
///
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Moment {
    /// `E[ln p]`
    First,
    /// `E[(ln p)^2]`
    Second,
}

///
/// Sequence context in `[0, 8)`: the current base code plus a flag
/// telling whether it repeats the previous base.
///
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Context(u8);

impl Context {
    ///
    /// `((prev == curr) ? 4 : 0) | curr` for 2-bit codes
    ///
    pub fn new(prev: u8, curr: u8) -> Context {
        debug_assert!(prev < 4 && curr < 4);
        Context((((prev == curr) as u8) << 2) | curr)
    }
    pub fn from_index(index: usize) -> Context {
        assert!(index < N_CONTEXTS);
        Context(index as u8)
    }
    pub fn index(self) -> usize {
        self.0 as usize
    }
    /// channel (base code) of this context
    pub fn base(self) -> u8 {
        self.0 & 3
    }
    pub fn is_homopolymer(self) -> bool {
        self.0 & 4 != 0
    }
    pub fn all() -> impl Iterator<Item = Context> {
        (0..N_CONTEXTS).map(Context::from_index)
    }
}

impl std::fmt::Display for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let base = VALID_BASES[self.base() as usize] as char;
        if self.is_homopolymer() {
            write!(f, "{}{}", base, base)
        } else {
            write!(f, "N{}", base)
        }
    }
}

///
/// Signal-to-noise ratio of each channel `A, C, G, T`.
///
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snr(pub [f64; 4]);

impl Snr {
    pub fn new(a: f64, c: f64, g: f64, t: f64) -> Snr {
        Snr([a, c, g, t])
    }
    pub fn uniform(value: f64) -> Snr {
        Snr([value; 4])
    }
}

impl std::ops::Index<usize> for Snr {
    type Output = f64;
    fn index(&self, channel: usize) -> &f64 {
        &self.0[channel]
    }
}

impl std::fmt::Display for Snr {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{:.3},{:.3},{:.3},{:.3}",
            self.0[0], self.0[1], self.0[2], self.0[3]
        )
    }
}

///
/// Error in from_str of Snr
///
#[derive(Clone, Debug, PartialEq, Error)]
#[error("expected four comma separated numbers")]
pub struct SnrParseError;

impl std::str::FromStr for Snr {
    type Err = SnrParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values: Vec<f64> = s
            .split(',')
            .map(|v| v.trim().parse::<f64>())
            .collect::<Result<_, _>>()
            .map_err(|_| SnrParseError)?;
        match values.as_slice() {
            &[a, c, g, t] => Ok(Snr::new(a, c, g, t)),
            _ => Err(SnrParseError),
        }
    }
}

//
// tests
//
