//!
//! SNR-conditioned chemistry model
//!
//! Transition probabilities depend on the per-channel snr through a cubic
//! polynomial per context; emissions depend only on the substitution rate.
//!
use super::counter_weight::{calibrate, CounterWeight};
use super::emission::{emission_pr, expected_ll_for_emission};
use super::params::SnrParams;
use super::registry::{ChemistryModel, ModelCreator};
use super::simulate::{
    pick_with_prob, simulate_read_impl, BaseData, GenerateReadData, InitializeModel,
    SimulatedRead,
};
use super::template::{populate, TemplatePosition};
use super::transition::TransitionTable;
use crate::common::{Context, Moment, Move, Snr, N_CONTEXTS, VALID_BASES};
use crate::error::ModelError;
use log::info;
use once_cell::sync::OnceCell;
use rand::prelude::*;
use std::sync::Arc;

/// name under which the form is registered
pub const SNR_FORM: &str = "Snr";

///
/// Loaded SNR chemistry; creates one `SnrModel` per snr vector.
///
#[derive(Debug, Clone)]
pub struct SnrModelCreator {
    name: String,
    params: Arc<SnrParams>,
}

impl SnrModelCreator {
    pub fn new(name: &str, params: SnrParams) -> SnrModelCreator {
        SnrModelCreator {
            name: name.to_string(),
            params: Arc::new(params),
        }
    }
    ///
    /// Load from a parameter document, naming the chemistry by its
    /// `ChemistryName` key (or the form name if absent).
    ///
    pub fn from_json(doc: &serde_json::Value) -> Result<SnrModelCreator, ModelError> {
        let name = doc
            .get("ChemistryName")
            .and_then(|v| v.as_str())
            .unwrap_or(SNR_FORM);
        Ok(SnrModelCreator::new(name, SnrParams::from_json(doc)?))
    }
    ///
    /// `FormConstructor` of the registry
    ///
    pub fn construct(
        name: &str,
        doc: &serde_json::Value,
    ) -> Result<Arc<dyn ModelCreator>, ModelError> {
        let creator = SnrModelCreator::new(name, SnrParams::from_json(doc)?);
        info!("loaded chemistry {} (form {})", name, SNR_FORM);
        Ok(Arc::new(creator))
    }
    pub fn params(&self) -> &SnrParams {
        &self.params
    }
    ///
    /// Build the model instance; the transition table is evaluated here.
    ///
    pub fn create_snr(&self, snr: Snr) -> SnrModel {
        SnrModel {
            chemistry: self.name.clone(),
            ctx_trans: TransitionTable::new(&self.params, &snr),
            params: Arc::clone(&self.params),
            snr,
            counter_weight: OnceCell::new(),
        }
    }
}

impl ModelCreator for SnrModelCreator {
    fn name(&self) -> &str {
        &self.name
    }
    fn form(&self) -> &'static str {
        SNR_FORM
    }
    fn create(&self, snr: Snr) -> Box<dyn ChemistryModel> {
        Box::new(self.create_snr(snr))
    }
}

///
/// SNR model bound to one covariate vector
///
#[derive(Debug)]
pub struct SnrModel {
    chemistry: String,
    params: Arc<SnrParams>,
    snr: Snr,
    ctx_trans: TransitionTable,
    counter_weight: OnceCell<CounterWeight>,
}

impl SnrModel {
    pub fn transition_table(&self) -> &TransitionTable {
        &self.ctx_trans
    }
}

impl ChemistryModel for SnrModel {
    fn chemistry(&self) -> &str {
        &self.chemistry
    }
    fn snr(&self) -> &Snr {
        &self.snr
    }
    fn transition_pr(&self, ctx: Context, m: Move) -> f64 {
        self.ctx_trans.prob(ctx, m)
    }
    fn emission_pr(&self, m: Move, emission: u8, prev: u8, curr: u8) -> Result<f64, ModelError> {
        emission_pr(&self.params, m, emission, prev, curr)
    }
    fn expected_ll_for_emission(
        &self,
        m: Move,
        _prev: u8,
        _curr: u8,
        moment: Moment,
    ) -> Result<f64, ModelError> {
        expected_ll_for_emission(&self.params, m, moment)
    }
    fn counter_weight(&self) -> Result<CounterWeight, ModelError> {
        self.counter_weight
            .get_or_try_init(|| {
                let mut expected_ll = [0.0; 4];
                for &m in &[Move::Match, Move::Branch, Move::Stick] {
                    expected_ll[m.index()] =
                        expected_ll_for_emission(&self.params, m, Moment::First)?;
                }
                calibrate(
                    |ctx, m| self.ctx_trans.prob(ctx, m),
                    |_, m| expected_ll[m.index()],
                    N_CONTEXTS,
                )
            })
            .map(|cw| *cw)
    }
    fn populate(&self, tpl: &[u8]) -> Result<Vec<TemplatePosition>, ModelError> {
        populate(&self.ctx_trans, tpl)
    }
    fn simulate_read(
        &self,
        rng: &mut dyn RngCore,
        tpl: &[u8],
        name: &str,
    ) -> Result<(SimulatedRead, Vec<Move>), ModelError> {
        simulate_read_impl(
            rng,
            tpl,
            name,
            &self.chemistry,
            &SnrInitializeModel { model: self },
            &SnrGenerateReadData {
                params: &self.params,
            },
        )
    }
}

///
/// Draws snr uniformly from each channel's range, then materializes the
/// template with a model built for those covariates.
///
struct SnrInitializeModel<'a> {
    model: &'a SnrModel,
}

impl<'a> InitializeModel for SnrInitializeModel<'a> {
    fn initialize<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        tpl: &[u8],
    ) -> Result<(Snr, Vec<TemplatePosition>), ModelError> {
        let params = &self.model.params;
        let mut snr = [0.0; 4];
        for (channel, value) in snr.iter_mut().enumerate() {
            let [lo, hi] = params.snr_range(channel);
            *value = rng.gen_range(lo..=hi);
        }
        let snr = Snr(snr);
        let table = TransitionTable::new(params, &snr);
        Ok((snr, populate(&table, tpl)?))
    }
}

struct SnrGenerateReadData<'a> {
    params: &'a SnrParams,
}

impl<'a> GenerateReadData for SnrGenerateReadData<'a> {
    fn generate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        m: Move,
        prev: u8,
        curr: u8,
    ) -> Result<BaseData, ModelError> {
        let mut choices = [(0u8, 0.0); 4];
        for (emission, choice) in choices.iter_mut().enumerate() {
            let emission = emission as u8;
            *choice = (emission, emission_pr(self.params, m, emission, prev, curr)?);
        }
        let code = pick_with_prob(rng, &choices)?;
        // kinetics are not covariates of this model
        let pw = rng.gen_range(1..=3);
        let ipd = rng.gen_range(1..=5);
        Ok(BaseData {
            base: VALID_BASES[code as usize],
            pw,
            ipd,
        })
    }
}
