//!
//! Context-conditioned move probabilities
//!
//! For context `c` with channel `b = c % 4` and clipped covariate `x`,
//! the weight of each non-match move `j` is
//!
//! ```text
//! w_j = exp(a_j0 + a_j1 x + a_j2 x^2 + a_j3 x^3)
//! ```
//!
//! and the match weight is pinned to 1, so that
//! `p = (1, w_branch, w_stick, w_deletion) / (1 + sum_j w_j)`.
//!
//! The row is normalized in log space (log-sum-exp), so that any finite
//! coefficients give a distribution.
//!
use super::params::{SnrParams, N_NON_MATCH};
use crate::common::{Context, Move, Snr, N_CONTEXTS};

///
/// Normalized `(match, branch, stick, deletion)` probabilities of every context
///
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionTable([[f64; 4]; N_CONTEXTS]);

impl TransitionTable {
    ///
    /// Evaluate the 8 context rows for the covariates.
    ///
    pub fn new(params: &SnrParams, snr: &Snr) -> TransitionTable {
        let mut table = [[0.0; 4]; N_CONTEXTS];
        for (ctx, row) in table.iter_mut().enumerate() {
            let channel = Context::from_index(ctx).base() as usize;
            *row = context_row(params, ctx, params.clip(channel, snr[channel]));
        }
        TransitionTable(table)
    }
    pub fn row(&self, ctx: Context) -> &[f64; 4] {
        &self.0[ctx.index()]
    }
    pub fn prob(&self, ctx: Context, m: Move) -> f64 {
        self.0[ctx.index()][m.index()]
    }
}

///
/// Softmax with match as the reference category
///
fn context_row(params: &SnrParams, ctx: usize, snr1: f64) -> [f64; 4] {
    let snr2 = snr1 * snr1;
    let snr3 = snr2 * snr1;
    let mut log_weights = [0.0; 4];
    for j in 0..N_NON_MATCH {
        let a = params.coefficients(ctx, j);
        let lw = a[0] + a[1] * snr1 + a[2] * snr2 + a[3] * snr3;
        // an overflowing polynomial saturates; NaN (inf - inf) gets no weight
        log_weights[j + 1] = if lw.is_nan() {
            f64::MIN
        } else {
            lw.max(f64::MIN).min(f64::MAX)
        };
    }
    let max = log_weights.iter().copied().fold(f64::MIN, f64::max);
    let mut row = [0.0; 4];
    for (p, lw) in row.iter_mut().zip(log_weights.iter()) {
        *p = (lw - max).exp();
    }
    // the maximum contributes exp(0) = 1, so sum >= 1
    let sum: f64 = row.iter().sum();
    for p in row.iter_mut() {
        *p /= sum;
    }
    row
}

impl std::fmt::Display for TransitionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for ctx in Context::all() {
            let r = self.row(ctx);
            writeln!(
                f,
                "{}\t{:.6}\t{:.6}\t{:.6}\t{:.6}",
                ctx, r[0], r[1], r[2], r[3]
            )?;
        }
        Ok(())
    }
}
