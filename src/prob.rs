//!
//! Log-domain probability
//!
//! Path scores are products of many small transition and emission
//! probabilities, so they are kept as `ln p`.
//!
use approx::AbsDiffEq;

///
/// Wrapper of `ln p` for a probability `0 <= p <= 1`
/// (or a counter-weighted score, which may exceed 1)
///
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Prob(f64);

///
/// short-hand of `Prob::from_prob`
///
pub fn p(p: f64) -> Prob {
    Prob::from_prob(p)
}

///
/// short-hand of `Prob::from_log_prob`
///
pub fn lp(lp: f64) -> Prob {
    Prob::from_log_prob(lp)
}

///
/// `p ln p` with the convention `0 ln 0 = 0`
///
/// Used for expectations of log-probabilities over a distribution
/// that has zero-mass entries.
///
pub fn p_ln_p(p: f64) -> f64 {
    if p == 0.0 {
        0.0
    } else {
        p * p.ln()
    }
}

impl Prob {
    pub fn from_prob(value: f64) -> Prob {
        Prob(value.ln())
    }
    pub fn from_log_prob(log_value: f64) -> Prob {
        Prob(log_value)
    }
    ///
    /// Get the probability
    pub fn to_value(self) -> f64 {
        self.0.exp()
    }
    ///
    /// Get the log probability
    pub fn to_log_value(self) -> f64 {
        self.0
    }
    ///
    /// Is `p == 0` or not? (log p = -inf)
    ///
    pub fn is_zero(self) -> bool {
        self.0.is_infinite() && self.0.is_sign_negative()
    }
    ///
    /// Is `p == 1`? (log p = 0)
    ///
    pub fn is_one(self) -> bool {
        self.0 == 0.0
    }
    pub fn zero() -> Prob {
        Prob(f64::NEG_INFINITY)
    }
    pub fn one() -> Prob {
        Prob(0.0)
    }
}

/// p=0 (Prob(-inf)) as a default value
impl Default for Prob {
    fn default() -> Self {
        Prob::zero()
    }
}

impl num_traits::One for Prob {
    fn one() -> Self {
        Prob::one()
    }
}

impl num_traits::Zero for Prob {
    fn zero() -> Self {
        Prob::zero()
    }
    fn is_zero(&self) -> bool {
        Prob::is_zero(*self)
    }
}

impl std::fmt::Display for Prob {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}({:.4})", self.0, self.to_value())
    }
}

/// Addition of two probabilities `px + py` in log space
///
/// ```text
/// log(exp(x) + exp(y)) = x + log(1 + exp(y-x))   (x >= y)
/// ```
impl std::ops::Add for Prob {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        let (x, y) = if self.0 >= other.0 {
            (self.0, other.0)
        } else {
            (other.0, self.0)
        };
        if y == f64::NEG_INFINITY {
            Prob(x)
        } else {
            Prob(x + (y - x).exp().ln_1p())
        }
    }
}

/// Multiplication `px * py` in log space
impl std::ops::Mul for Prob {
    type Output = Self;
    fn mul(self, other: Self) -> Self {
        Prob(self.0 + other.0)
    }
}

/// Division `px / py` in log space
impl std::ops::Div for Prob {
    type Output = Self;
    fn div(self, other: Self) -> Self {
        Prob(self.0 - other.0)
    }
}

impl std::ops::AddAssign for Prob {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}
impl std::ops::MulAssign for Prob {
    fn mul_assign(&mut self, other: Self) {
        *self = *self * other;
    }
}
impl std::iter::Sum for Prob {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Prob::zero(), |a, b| a + b)
    }
}
impl std::iter::Product for Prob {
    fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Prob::one(), |a, b| a * b)
    }
}

/// for approx `assert_abs_diff_eq`
impl AbsDiffEq for Prob {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        if self.is_zero() || other.is_zero() {
            self.is_zero() && other.is_zero()
        } else {
            f64::abs_diff_eq(&self.0, &other.0, epsilon)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prob_add_mul() {
        assert_eq!(p(0.0) + p(1.0), p(1.0));
        assert_eq!(p(0.0) * p(1.0), p(0.0));
        assert_abs_diff_eq!(p(0.3) + p(0.3), p(0.6), epsilon = 1e-12);
        assert_abs_diff_eq!(p(0.3) * p(0.3), p(0.09), epsilon = 1e-12);
        assert_abs_diff_eq!(p(0.5) + p(0.00001), p(0.50001), epsilon = 1e-12);
        assert_abs_diff_eq!(p(0.6) / p(0.3), p(2.0), epsilon = 1e-12);
    }
    #[test]
    fn prob_sum_prod() {
        let xs: Vec<Prob> = vec![];
        assert_eq!(xs.iter().copied().sum::<Prob>(), p(0.0));
        assert_eq!(xs.iter().copied().product::<Prob>(), p(1.0));

        let xs = vec![p(0.1), p(0.2), p(0.7)];
        assert_abs_diff_eq!(xs.iter().copied().sum::<Prob>(), Prob::one(), epsilon = 1e-12);
        assert_abs_diff_eq!(
            xs.iter().copied().product::<Prob>(),
            p(0.014),
            epsilon = 1e-12
        );
    }
    #[test]
    fn prob_assign() {
        let mut x = p(0.4);
        x += p(0.2);
        assert_abs_diff_eq!(x, p(0.6), epsilon = 1e-12);
        x *= p(0.5);
        assert_abs_diff_eq!(x, p(0.3), epsilon = 1e-12);
        x *= p(0.0);
        assert!(x.is_zero());
        assert!(!x.is_one());
    }
    #[test]
    fn prob_zero_and_log_terms() {
        assert!(Prob::default().is_zero());
        assert!(Prob::one().is_one());
        assert!(abs_diff_eq!(p(0.0), p(0.0)));
        assert!(!abs_diff_eq!(p(0.0), p(0.1)));
        assert_eq!(p_ln_p(0.0), 0.0);
        assert_eq!(p_ln_p(1.0), 0.0);
        assert_abs_diff_eq!(p_ln_p(0.5), 0.5 * 0.5f64.ln());
        assert_eq!(lp(-1.0).to_log_value(), -1.0);
    }
}
