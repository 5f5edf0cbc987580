//!
//! Chemistry models behind one contract
//!
//! * `ChemistryModel`: a model instance bound to one covariate vector
//! * `ModelCreator`: a loaded (immutable) chemistry parameter set
//! * `Registry`: model forms by name, loaded chemistries by tag
//!
use super::counter_weight::CounterWeight;
use super::simulate::SimulatedRead;
use super::snr::{SnrModelCreator, SNR_FORM};
use super::template::TemplatePosition;
use crate::common::{Context, Moment, Move, Snr};
use crate::error::ModelError;
use log::{debug, info};
use rand::RngCore;
use std::collections::HashMap;
use std::sync::Arc;

///
/// Oracles consumed by the alignment recursion and the read simulator
///
pub trait ChemistryModel: Send + Sync + std::fmt::Debug {
    /// tag of the chemistry this instance was built from
    fn chemistry(&self) -> &str;
    /// covariates the instance is bound to
    fn snr(&self) -> &Snr;
    fn transition_pr(&self, ctx: Context, m: Move) -> f64;
    fn emission_pr(&self, m: Move, emission: u8, prev: u8, curr: u8) -> Result<f64, ModelError>;
    fn expected_ll_for_emission(
        &self,
        m: Move,
        prev: u8,
        curr: u8,
        moment: Moment,
    ) -> Result<f64, ModelError>;
    fn counter_weight(&self) -> Result<CounterWeight, ModelError>;
    fn populate(&self, tpl: &[u8]) -> Result<Vec<TemplatePosition>, ModelError>;
    fn simulate_read(
        &self,
        rng: &mut dyn RngCore,
        tpl: &[u8],
        name: &str,
    ) -> Result<(SimulatedRead, Vec<Move>), ModelError>;
}

///
/// A loaded chemistry that builds model instances
///
pub trait ModelCreator: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &str;
    /// form (variant) name the chemistry was loaded with
    fn form(&self) -> &'static str;
    fn create(&self, snr: Snr) -> Box<dyn ChemistryModel>;
}

///
/// Constructor of a model form: `(chemistry tag, document) -> chemistry`
///
pub type FormConstructor =
    fn(&str, &serde_json::Value) -> Result<Arc<dyn ModelCreator>, ModelError>;

///
/// Registered forms and loaded chemistries.
///
/// Load every chemistry before sharing the registry between workers;
/// loaded chemistries are never mutated afterwards.
///
pub struct Registry {
    forms: HashMap<String, FormConstructor>,
    chemistries: HashMap<String, Arc<dyn ModelCreator>>,
}

impl Default for Registry {
    /// Registry with the built-in forms
    fn default() -> Self {
        let mut registry = Registry::empty();
        registry.register_form(SNR_FORM, SnrModelCreator::construct);
        registry
    }
}

impl Registry {
    pub fn empty() -> Self {
        Registry {
            forms: HashMap::new(),
            chemistries: HashMap::new(),
        }
    }
    ///
    /// Register (or replace) the constructor of a form
    ///
    pub fn register_form(&mut self, form: &str, constructor: FormConstructor) {
        debug!("register form {}", form);
        self.forms.insert(form.to_string(), constructor);
    }
    /// sorted names of registered forms
    pub fn forms(&self) -> Vec<&str> {
        let mut forms: Vec<&str> = self.forms.keys().map(|f| f.as_str()).collect();
        forms.sort_unstable();
        forms
    }
    /// sorted tags of loaded chemistries
    pub fn chemistries(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.chemistries.keys().map(|t| t.as_str()).collect();
        tags.sort_unstable();
        tags
    }
    fn constructor(&self, form: &str) -> Result<FormConstructor, ModelError> {
        self.forms
            .get(form)
            .copied()
            .ok_or_else(|| ModelError::UnknownChemistry(form.to_string()))
    }
    ///
    /// Load a chemistry under `tag`. The form is read from the `ModelForm`
    /// key of the document (`Snr` if absent).
    ///
    pub fn load(
        &mut self,
        tag: &str,
        doc: &serde_json::Value,
    ) -> Result<Arc<dyn ModelCreator>, ModelError> {
        let form = match doc.get("ModelForm") {
            None => SNR_FORM,
            Some(v) => v.as_str().ok_or(ModelError::MalformedModel)?,
        };
        let creator = self.constructor(form)?(tag, doc)?;
        info!("chemistry {} ready (form {})", tag, creator.form());
        self.chemistries
            .insert(tag.to_string(), Arc::clone(&creator));
        Ok(creator)
    }
    ///
    /// Load a chemistry under its `ChemistryName`
    ///
    pub fn load_document(
        &mut self,
        doc: &serde_json::Value,
    ) -> Result<Arc<dyn ModelCreator>, ModelError> {
        let tag = doc
            .get("ChemistryName")
            .and_then(|v| v.as_str())
            .ok_or(ModelError::MalformedModel)?
            .to_string();
        self.load(&tag, doc)
    }
    pub fn chemistry(&self, tag: &str) -> Result<Arc<dyn ModelCreator>, ModelError> {
        self.chemistries
            .get(tag)
            .cloned()
            .ok_or_else(|| ModelError::UnknownChemistry(tag.to_string()))
    }
    ///
    /// Model instance of a loaded chemistry
    ///
    pub fn model(&self, tag: &str, snr: Snr) -> Result<Box<dyn ChemistryModel>, ModelError> {
        Ok(self.chemistry(tag)?.create(snr))
    }
    ///
    /// One-shot construction: parse `doc` with the form registered under
    /// `form` and bind the result to `snr`. Nothing is cached.
    ///
    pub fn create(
        &self,
        form: &str,
        doc: &serde_json::Value,
        snr: Snr,
    ) -> Result<Box<dyn ChemistryModel>, ModelError> {
        let creator = self.constructor(form)?(form, doc)?;
        Ok(creator.create(snr))
    }
}
