//!
//! Chemistry parameter set of the SNR-conditioned model
//!
use crate::common::N_CONTEXTS;
use crate::error::ModelError;
use log::debug;
use serde::{Deserialize, Serialize};

/// number of non-match moves carrying polynomial coefficients
pub const N_NON_MATCH: usize = 3;

/// cubic polynomial: constant, x, x^2, x^3
pub const N_COEFFICIENTS: usize = 4;

///
/// Raw parameter document. Shapes are checked by the fixed-size arrays.
///
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SnrDocument {
    snr_ranges: [[f64; 2]; 4],
    transition_parameters: [[[f64; N_COEFFICIENTS]; N_NON_MATCH]; N_CONTEXTS],
    substitution_rate: f64,
}

///
/// Per-chemistry constants, immutable once loaded
///
/// * `snr_ranges[channel] = [min, max]`
/// * `transition_params[ctx][move - 1]` cubic coefficients of
///   branch/stick/deletion log-weights relative to match
/// * `emission_pmf[move][is_mismatch]` for match/branch/stick
///
#[derive(Debug, Clone, PartialEq)]
pub struct SnrParams {
    snr_ranges: [[f64; 2]; 4],
    transition_params: [[[f64; N_COEFFICIENTS]; N_NON_MATCH]; N_CONTEXTS],
    substitution_rate: f64,
    emission_pmf: [[f64; 2]; 3],
}

impl SnrParams {
    ///
    /// Validate and load a parameter document.
    ///
    /// Every structural problem is reported as `MalformedModel`; the reason
    /// only goes to the debug log.
    ///
    pub fn from_json(doc: &serde_json::Value) -> Result<SnrParams, ModelError> {
        let raw: SnrDocument = serde_json::from_value(doc.clone()).map_err(|e| {
            debug!("rejected parameter document: {}", e);
            ModelError::MalformedModel
        })?;
        SnrParams::new(
            raw.snr_ranges,
            raw.transition_parameters,
            raw.substitution_rate,
        )
    }
    pub fn new(
        snr_ranges: [[f64; 2]; 4],
        transition_params: [[[f64; N_COEFFICIENTS]; N_NON_MATCH]; N_CONTEXTS],
        substitution_rate: f64,
    ) -> Result<SnrParams, ModelError> {
        for (channel, &[lo, hi]) in snr_ranges.iter().enumerate() {
            // the width is sampled from in simulation, so it must be finite too
            if !lo.is_finite() || !hi.is_finite() || lo > hi || !(hi - lo).is_finite() {
                debug!("invalid snr range [{}, {}] of channel {}", lo, hi, channel);
                return Err(ModelError::MalformedModel);
            }
        }
        if transition_params
            .iter()
            .flatten()
            .flatten()
            .any(|x| !x.is_finite())
        {
            debug!("non-finite transition parameter");
            return Err(ModelError::MalformedModel);
        }
        if !(0.0..=1.0).contains(&substitution_rate) {
            debug!("substitution rate {} out of [0, 1]", substitution_rate);
            return Err(ModelError::MalformedModel);
        }
        let match_row = [1.0 - substitution_rate, substitution_rate / 3.0];
        Ok(SnrParams {
            snr_ranges,
            transition_params,
            substitution_rate,
            emission_pmf: [match_row, match_row, [0.0, 1.0 / 3.0]],
        })
    }
    pub fn snr_range(&self, channel: usize) -> [f64; 2] {
        self.snr_ranges[channel]
    }
    pub fn coefficients(&self, ctx: usize, non_match: usize) -> &[f64; N_COEFFICIENTS] {
        &self.transition_params[ctx][non_match]
    }
    pub fn substitution_rate(&self) -> f64 {
        self.substitution_rate
    }
    pub fn emission_pmf(&self) -> &[[f64; 2]; 3] {
        &self.emission_pmf
    }
    ///
    /// Clamp the covariate of the channel into its stored range.
    ///
    pub fn clip(&self, channel: usize, value: f64) -> f64 {
        let [lo, hi] = self.snr_ranges[channel];
        value.max(lo).min(hi)
    }
}

impl std::fmt::Display for SnrParams {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (channel, range) in self.snr_ranges.iter().enumerate() {
            writeln!(f, "snr_range[{}]: [{}, {}]", channel, range[0], range[1])?;
        }
        write!(f, "substitution_rate: {}", self.substitution_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::mocks::mock_snr_document;

    #[test]
    fn load_document() {
        let params = SnrParams::from_json(&mock_snr_document(0.01, 0.0, 20.0)).unwrap();
        assert_eq!(params.substitution_rate(), 0.01);
        assert_eq!(params.snr_range(2), [0.0, 20.0]);
        let pmf = params.emission_pmf();
        assert_abs_diff_eq!(pmf[0][0], 0.99);
        assert_abs_diff_eq!(pmf[0][1], 0.01 / 3.0);
        assert_eq!(pmf[0], pmf[1]);
        assert_eq!(pmf[2], [0.0, 1.0 / 3.0]);
        for row in pmf.iter() {
            // one correct symbol and three incorrect ones
            assert_abs_diff_eq!(row[0] + 3.0 * row[1], 1.0, epsilon = 1e-12);
        }
        println!("{}", params);
    }

    #[test]
    fn clip_into_range() {
        let params = SnrParams::from_json(&mock_snr_document(0.01, 2.0, 12.0)).unwrap();
        assert_eq!(params.clip(0, -5.0), 2.0);
        assert_eq!(params.clip(1, 7.5), 7.5);
        assert_eq!(params.clip(3, 100.0), 12.0);
    }

    #[test]
    fn missing_substitution_rate_is_malformed() {
        let mut doc = mock_snr_document(0.01, 0.0, 20.0);
        doc.as_object_mut().unwrap().remove("SubstitutionRate");
        assert_eq!(SnrParams::from_json(&doc), Err(ModelError::MalformedModel));
    }

    #[test]
    fn wrong_shapes_are_malformed() {
        let mut doc = mock_snr_document(0.01, 0.0, 20.0);
        doc["SnrRanges"] = serde_json::json!([[0.0, 20.0], [0.0, 20.0], [0.0, 20.0]]);
        assert_eq!(SnrParams::from_json(&doc), Err(ModelError::MalformedModel));

        let mut doc = mock_snr_document(0.01, 0.0, 20.0);
        doc["TransitionParameters"][7][2] = serde_json::json!([0.0, 1.0, "x", 0.0]);
        assert_eq!(SnrParams::from_json(&doc), Err(ModelError::MalformedModel));

        let mut doc = mock_snr_document(0.01, 0.0, 20.0);
        doc["SubstitutionRate"] = serde_json::json!("0.01");
        assert_eq!(SnrParams::from_json(&doc), Err(ModelError::MalformedModel));
    }

    #[test]
    fn invalid_values_are_malformed() {
        assert_eq!(
            SnrParams::from_json(&mock_snr_document(1.5, 0.0, 20.0)),
            Err(ModelError::MalformedModel)
        );
        assert_eq!(
            SnrParams::from_json(&mock_snr_document(0.01, 20.0, 0.0)),
            Err(ModelError::MalformedModel)
        );
        // both bounds finite, but the width overflows
        assert_eq!(
            SnrParams::from_json(&mock_snr_document(0.01, -1e308, 1e308)),
            Err(ModelError::MalformedModel)
        );
        assert!(SnrParams::from_json(&mock_snr_document(0.01, -1e307, 1e307)).is_ok());
    }
}
