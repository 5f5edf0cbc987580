//!
//! Parameter documents for tests and benchmarks
//!
use super::registry::ModelCreator;
use super::snr::{SnrModel, SnrModelCreator};
use crate::common::Snr;
use serde_json::{json, Value};
use std::sync::Arc;

///
/// Cubic coefficients (constant, x, x^2, x^3) of branch/stick/deletion
/// log-weights for each of the 8 contexts.
///
/// Non-homopolymer contexts (0-3) insert and delete less than
/// homopolymer contexts (4-7), and every error mode decays with snr.
///
const TRANSITION_PARAMETERS: [[[f64; 4]; 3]; 8] = [
    [
        [-2.45, -0.135, 0.0068, -0.00013],
        [-3.10, -0.101, 0.0049, -0.00009],
        [-2.87, -0.122, 0.0057, -0.00011],
    ],
    [
        [-2.61, -0.118, 0.0061, -0.00012],
        [-3.02, -0.095, 0.0044, -0.00008],
        [-3.05, -0.109, 0.0052, -0.00010],
    ],
    [
        [-2.53, -0.127, 0.0065, -0.00012],
        [-3.21, -0.092, 0.0041, -0.00008],
        [-2.95, -0.114, 0.0055, -0.00011],
    ],
    [
        [-2.49, -0.131, 0.0066, -0.00013],
        [-3.15, -0.097, 0.0046, -0.00009],
        [-2.90, -0.119, 0.0056, -0.00011],
    ],
    [
        [-1.92, -0.104, 0.0051, -0.00010],
        [-3.40, -0.088, 0.0039, -0.00007],
        [-2.10, -0.097, 0.0047, -0.00009],
    ],
    [
        [-2.05, -0.098, 0.0048, -0.00009],
        [-3.33, -0.085, 0.0037, -0.00007],
        [-2.24, -0.091, 0.0044, -0.00008],
    ],
    [
        [-1.99, -0.101, 0.0050, -0.00010],
        [-3.37, -0.087, 0.0038, -0.00007],
        [-2.17, -0.094, 0.0045, -0.00009],
    ],
    [
        [-1.88, -0.107, 0.0053, -0.00010],
        [-3.45, -0.090, 0.0040, -0.00008],
        [-2.06, -0.099, 0.0048, -0.00009],
    ],
];

///
/// Parameter document with the same `[lo, hi]` snr range on every channel
///
pub fn mock_snr_document(substitution_rate: f64, lo: f64, hi: f64) -> Value {
    json!({
        "ChemistryName": "mock",
        "ModelForm": "Snr",
        "ConsensusModelVersion": "3.0.0",
        "SnrRanges": [[lo, hi], [lo, hi], [lo, hi], [lo, hi]],
        "TransitionParameters": TRANSITION_PARAMETERS,
        "SubstitutionRate": substitution_rate,
    })
}

///
/// Model instance of the mock chemistry (`eps=0.01`, snr range `[0, 20]`)
///
pub fn mock_snr_model(snr: Snr) -> SnrModel {
    SnrModelCreator::from_json(&mock_snr_document(0.01, 0.0, 20.0))
        .expect("mock document is well-formed")
        .create_snr(snr)
}

///
/// Loaded mock chemistry behind the registry contract
///
pub fn mock_snr_creator() -> Arc<dyn ModelCreator> {
    Arc::new(
        SnrModelCreator::from_json(&mock_snr_document(0.01, 0.0, 20.0))
            .expect("mock document is well-formed"),
    )
}
