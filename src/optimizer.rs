//! bracketing root finder for monotone scalar functions
//!
//! 1. start from an initial bracket `[lo, hi]`
//! 2. double the bracket until `f(lo)` and `f(hi)` differ in sign
//! 3. bisect until the bracket is narrower than the tolerance
use log::{debug, trace};
use thiserror::Error;

///
/// Why the root search stopped without a root
///
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RootError {
    /// `f` returned NaN or infinity at `x`
    #[error("objective is not finite at {x}")]
    NotFinite { x: f64 },
    /// no sign change inside the widest allowed bracket
    #[error("no sign change in [{lo}, {hi}]")]
    NotBracketed { lo: f64, hi: f64 },
    /// bracket still wider than the tolerance after the iteration cap
    #[error("iteration limit reached with bracket [{lo}, {hi}]")]
    MaxIteration { lo: f64, hi: f64 },
}

///
/// Bisection with bracket expansion
///
#[derive(Debug, Clone, Copy)]
pub struct Bisection {
    /// half width of the initial bracket around zero
    init_width: f64,
    /// the bracket is never expanded past `[-max_width, max_width]`
    max_width: f64,
    /// stop when `hi - lo < tolerance`
    tolerance: f64,
    max_iteration: usize,
}

impl Default for Bisection {
    fn default() -> Self {
        Bisection::new(1.0, 1e3, 1e-12, 200)
    }
}

impl Bisection {
    pub fn new(init_width: f64, max_width: f64, tolerance: f64, max_iteration: usize) -> Self {
        assert!(init_width > 0.0 && max_width >= init_width);
        assert!(tolerance > 0.0);
        Bisection {
            init_width,
            max_width,
            tolerance,
            max_iteration,
        }
    }
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }
    fn eval<F: Fn(f64) -> f64>(f: &F, x: f64) -> Result<f64, RootError> {
        let y = f(x);
        if y.is_finite() {
            Ok(y)
        } else {
            Err(RootError::NotFinite { x })
        }
    }
    ///
    /// Find `x` with `f(x) = 0` for monotone `f`.
    ///
    pub fn find_root<F: Fn(f64) -> f64>(&self, f: F) -> Result<f64, RootError> {
        let mut width = self.init_width;
        let (mut lo, mut hi) = (-width, width);
        let (mut f_lo, mut f_hi) = (Self::eval(&f, lo)?, Self::eval(&f, hi)?);
        while f_lo.signum() == f_hi.signum() && f_lo != 0.0 && f_hi != 0.0 {
            width *= 2.0;
            if width > self.max_width {
                return Err(RootError::NotBracketed { lo, hi });
            }
            lo = -width;
            hi = width;
            f_lo = Self::eval(&f, lo)?;
            f_hi = Self::eval(&f, hi)?;
        }
        if f_lo == 0.0 {
            return Ok(lo);
        }
        if f_hi == 0.0 {
            return Ok(hi);
        }

        for iteration in 0..self.max_iteration {
            let mid = 0.5 * (lo + hi);
            let f_mid = Self::eval(&f, mid)?;
            trace!("bisect #{} [{}, {}] f({})={}", iteration, lo, hi, mid, f_mid);
            if f_mid == 0.0 || hi - lo < self.tolerance {
                debug!("root {} found after {} iterations", mid, iteration);
                return Ok(mid);
            }
            if f_mid.signum() == f_lo.signum() {
                lo = mid;
                f_lo = f_mid;
            } else {
                hi = mid;
            }
        }
        Err(RootError::MaxIteration { lo, hi })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bisection_linear_and_nonlinear() {
        let b = Bisection::default();
        assert_abs_diff_eq!(b.find_root(|x| 2.0 * x - 1.0).unwrap(), 0.5, epsilon = 1e-10);
        // decreasing function needs expansion to [-8, 8]
        assert_abs_diff_eq!(b.find_root(|x| 5.0 - x).unwrap(), 5.0, epsilon = 1e-10);
        assert_abs_diff_eq!(
            b.find_root(|x| x.exp() - 3.0).unwrap(),
            3f64.ln(),
            epsilon = 1e-10
        );
        assert_eq!(b.find_root(|x| x).unwrap(), 0.0);
    }

    #[test]
    fn bisection_failures() {
        let b = Bisection::default();
        assert!(matches!(
            b.find_root(|x| x * x + 1.0),
            Err(RootError::NotBracketed { .. })
        ));
        assert!(matches!(
            b.find_root(|_| f64::NAN),
            Err(RootError::NotFinite { .. })
        ));
        let short = Bisection::new(1.0, 1e3, 1e-12, 3);
        assert!(matches!(
            short.find_root(|x| x - 0.3),
            Err(RootError::MaxIteration { .. })
        ));
    }

    #[test]
    fn root_error_messages() {
        assert_eq!(
            RootError::NotBracketed { lo: -2.0, hi: 2.0 }.to_string(),
            "no sign change in [-2, 2]"
        );
        assert_eq!(
            RootError::NotFinite { x: 0.5 }.to_string(),
            "objective is not finite at 0.5"
        );
        let e: Box<dyn std::error::Error> = Box::new(RootError::MaxIteration { lo: 0.0, hi: 1.0 });
        assert_eq!(e.to_string(), "iteration limit reached with bracket [0, 1]");
    }
}
