//!
//! Context-conditioned chemistry models
//!
//! ## Structure
//!
//! * `params`: parameter document of the SNR chemistry
//! * `transition`: 8 context rows of move probabilities for one snr vector
//! * `emission`: emission pmf and its expected log-likelihood
//! * `counter_weight`: per-emission weight calibration
//! * `template`: per-base move probabilities of a template
//! * `simulate`: read simulation driver and its strategies
//! * `path`: probability of one alignment path
//! * `snr`: the SNR chemistry
//! * `registry`: model contract, forms and loaded chemistries
//!
pub mod counter_weight;
pub mod emission;
pub mod mocks;
pub mod params;
pub mod path;
pub mod registry;
pub mod simulate;
pub mod snr;
pub mod template;
pub mod transition;

pub use counter_weight::CounterWeight;
pub use params::SnrParams;
pub use path::score_path;
pub use registry::{ChemistryModel, FormConstructor, ModelCreator, Registry};
pub use simulate::{BaseData, SimulatedRead};
pub use snr::{SnrModel, SnrModelCreator, SNR_FORM};
pub use template::TemplatePosition;
pub use transition::TransitionTable;
