//!
//! Counter-weight calibration
//!
//! Longer reads collect more emission terms, and each emission lowers the
//! log-likelihood. Scaling every emission probability by `w` (and undoing
//! it afterwards with `undo(n)`) removes the bias that template composition
//! puts on expected scores.
//!
//! # Equation
//!
//! For context `c` with moves `(m, b, s, d)`, insertions repeat before the
//! template position is left by a match or a deletion:
//!
//! ```text
//! E_n(c)  = (m + b + s) / (m + d)
//! E_ll(c) = [m (ln m + l_M) + b (ln b + l_B) + s (ln s + l_S) + d ln d] / (m + d)
//! ```
//!
//! where `l_X` is the expected emission log-likelihood of move `X`.
//! `ln w` is the root of the increasing function
//!
//! ```text
//! F(lw) = 1/N sum_c [E_ll(c) + lw E_n(c)]
//! ```
//!
use crate::common::{Context, Move, N_CONTEXTS};
use crate::error::ModelError;
use crate::optimizer::Bisection;
use crate::prob::{p_ln_p, Prob};
use log::debug;

///
/// Emission weight `w` with its cached `-ln w`
///
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CounterWeight {
    w: f64,
    neg_log_w: f64,
}

impl CounterWeight {
    pub fn from_weight(w: f64) -> CounterWeight {
        assert!(w > 0.0 && w.is_finite());
        CounterWeight {
            w,
            neg_log_w: -w.ln(),
        }
    }
    pub fn weight(&self) -> f64 {
        self.w
    }
    pub fn neg_log_weight(&self) -> f64 {
        self.neg_log_w
    }
    ///
    /// Log-domain correction removing the weight of `n_emissions` emissions
    ///
    pub fn undo(&self, n_emissions: usize) -> f64 {
        self.neg_log_w * n_emissions as f64
    }
    ///
    /// Emission probability as seen by the weighted recursion
    ///
    pub fn weighted(&self, p: f64) -> f64 {
        p * self.w
    }
    pub fn weighted_prob(&self, p: Prob) -> Prob {
        p * Prob::from_log_prob(-self.neg_log_w)
    }
}

impl std::fmt::Display for CounterWeight {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "w={} -lnw={}", self.w, self.neg_log_w)
    }
}

///
/// Expected emissions and expected log-likelihood of one template position
/// in the context.
///
fn position_expectation<T, L>(
    trans: &T,
    expected_ll: &L,
    ctx: Context,
) -> Result<(f64, f64), ModelError>
where
    T: Fn(Context, Move) -> f64,
    L: Fn(Context, Move) -> f64,
{
    let [m, b, s, d] = [
        trans(ctx, Move::Match),
        trans(ctx, Move::Branch),
        trans(ctx, Move::Stick),
        trans(ctx, Move::Deletion),
    ];
    let leave = m + d;
    if !(leave > 0.0) {
        return Err(ModelError::CalibrationNonconvergence(format!(
            "context {} never leaves its template position",
            ctx
        )));
    }
    let n = (m + b + s) / leave;
    let ll = (p_ln_p(m)
        + m * expected_ll(ctx, Move::Match)
        + p_ln_p(b)
        + b * expected_ll(ctx, Move::Branch)
        + p_ln_p(s)
        + s * expected_ll(ctx, Move::Stick)
        + p_ln_p(d))
        / leave;
    Ok((n, ll))
}

///
/// Solve for the counter-weight.
///
/// * `trans(ctx, move)` transition probability of the context
/// * `expected_ll(ctx, move)` expected log-likelihood of one emission
///   (0 for deletion)
/// * `n_contexts` contexts `0..n_contexts` are averaged (at most `N_CONTEXTS`)
///
pub fn calibrate<T, L>(
    trans: T,
    expected_ll: L,
    n_contexts: usize,
) -> Result<CounterWeight, ModelError>
where
    T: Fn(Context, Move) -> f64,
    L: Fn(Context, Move) -> f64,
{
    if n_contexts == 0 || n_contexts > N_CONTEXTS {
        return Err(ModelError::CalibrationNonconvergence(format!(
            "{} contexts requested, expected 1..={}",
            n_contexts, N_CONTEXTS
        )));
    }
    let mut n_sum = 0.0;
    let mut ll_sum = 0.0;
    for ctx in (0..n_contexts).map(Context::from_index) {
        let (n, ll) = position_expectation(&trans, &expected_ll, ctx)?;
        n_sum += n;
        ll_sum += ll;
    }
    let (n_mean, ll_mean) = (n_sum / n_contexts as f64, ll_sum / n_contexts as f64);
    if !(n_mean > 0.0) || !n_mean.is_finite() || !ll_mean.is_finite() {
        return Err(ModelError::CalibrationNonconvergence(format!(
            "degenerate expectations E_n={} E_ll={}",
            n_mean, ll_mean
        )));
    }

    let lw = Bisection::default()
        .find_root(|lw| ll_mean + lw * n_mean)
        .map_err(|e| ModelError::CalibrationNonconvergence(e.to_string()))?;
    let w = lw.exp();
    if !(w > 0.0 && w.is_finite()) {
        return Err(ModelError::CalibrationNonconvergence(format!(
            "weight exp({}) is not representable",
            lw
        )));
    }
    let cw = CounterWeight::from_weight(w);
    debug!("calibrated E_n={} E_ll={} {}", n_mean, ll_mean, cw);
    Ok(cw)
}
