//!
//! Commands of the `ctxhmm` binary
//!
use crate::common::{Move, Snr};
use crate::io::{load_document, IoError, Template};
use crate::model::{ChemistryModel, CounterWeight, Registry, SimulatedRead, TemplatePosition};
use itertools::Itertools;
use log::info;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;
use std::path::Path;

///
/// Load the parameter file into a fresh registry and bind it to `snr`.
///
/// The chemistry is cached under its `ChemistryName`, or under the file stem
/// if the document has none.
///
pub fn load_model<P: AsRef<Path>>(params: P, snr: Snr) -> Result<Box<dyn ChemistryModel>, IoError> {
    let doc = load_document(params.as_ref())?;
    let mut registry = Registry::default();
    let creator = if doc.get("ChemistryName").is_some() {
        registry.load_document(&doc)?
    } else {
        let tag = params
            .as_ref()
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("default");
        registry.load(tag, &doc)?
    };
    info!("model {} snr={}", creator.name(), snr);
    Ok(registry.model(creator.name(), snr)?)
}

///
/// Template positions of every template
///
pub fn populate(
    model: &dyn ChemistryModel,
    templates: &[Template],
) -> Result<Vec<(String, Vec<TemplatePosition>)>, IoError> {
    templates
        .iter()
        .map(|t| -> Result<_, IoError> { Ok((t.id.clone(), model.populate(&t.seq)?)) })
        .collect()
}

///
/// Tab separated rows `id, index, base, context, match, branch, stick, deletion`
///
pub fn format_positions(id: &str, positions: &[TemplatePosition]) -> String {
    positions
        .iter()
        .enumerate()
        .map(|(i, pos)| format!("{}\t{}\t{}", id, i, pos))
        .join("\n")
}

pub fn counter_weight(model: &dyn ChemistryModel) -> Result<CounterWeight, IoError> {
    let cw = model.counter_weight()?;
    info!("counter-weight of {} at snr={}: {}", model.chemistry(), model.snr(), cw);
    Ok(cw)
}

///
/// Simulate `n_reads` reads in parallel.
///
/// Read `i` is sampled from template `i mod n_templates` with a generator
/// seeded by `seed + i` (wrapping), so the output does not depend on the thread count.
///
pub fn simulate(
    model: &dyn ChemistryModel,
    templates: &[Template],
    n_reads: usize,
    seed: u64,
) -> Result<Vec<SimulatedRead>, IoError> {
    if templates.is_empty() {
        return Ok(Vec::new());
    }
    let reads: Vec<(SimulatedRead, Vec<Move>)> = (0..n_reads)
        .into_par_iter()
        .map(|i| {
            let template = &templates[i % templates.len()];
            let seed_for_a_read = seed.wrapping_add(i as u64);
            let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed_for_a_read);
            let name = format!("{}/{}/{}", template.id, i, seed_for_a_read);
            model.simulate_read(&mut rng, &template.seq, &name)
        })
        .collect::<Result<_, _>>()?;

    let n_moves = reads.iter().map(|(_, moves)| moves.len()).sum::<usize>();
    let n_bases = reads.iter().map(|(read, _)| read.len()).sum::<usize>();
    info!(
        "simulated n_reads={} n_bases={} n_moves={}",
        reads.len(),
        n_bases,
        n_moves
    );
    Ok(reads.into_iter().map(|(read, _)| read).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::mocks::{mock_snr_document, mock_snr_model};
    use std::io::Write;

    fn templates() -> Vec<Template> {
        vec![
            Template {
                id: "t0".to_string(),
                seq: b"ACGTTGCAAGGT".to_vec(),
            },
            Template {
                id: "t1".to_string(),
                seq: b"GGGATTACA".to_vec(),
            },
        ]
    }

    #[test]
    fn load_model_from_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        let mut doc = mock_snr_document(0.01, 0.0, 20.0);
        doc.as_object_mut().unwrap().remove("ChemistryName");
        serde_json::to_writer(&mut file, &doc).unwrap();
        file.flush().unwrap();

        let model = load_model(file.path(), Snr::uniform(10.0)).unwrap();
        let stem = file.path().file_stem().unwrap().to_str().unwrap();
        assert_eq!(model.chemistry(), stem);
        assert_eq!(model.snr(), &Snr::uniform(10.0));
    }

    #[test]
    fn populate_rows() {
        let model = mock_snr_model(Snr::uniform(10.0));
        let templates = vec![Template {
            id: "t".to_string(),
            seq: b"AC".to_vec(),
        }];
        let positions = populate(&model, &templates).unwrap();
        let text = format_positions(&positions[0].0, &positions[0].1);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("t\t0\tA\tNC\t"));
        assert_eq!(lines[1], "t\t1\tC\t-\t1.000000\t0.000000\t0.000000\t0.000000");
    }

    #[test]
    fn simulate_is_independent_of_thread_count() {
        let model = mock_snr_model(Snr::uniform(10.0));
        let templates = templates();
        let reads = simulate(&model, &templates, 16, 100).unwrap();
        assert_eq!(reads.len(), 16);
        assert_eq!(reads[3].name, "t1/3/103");

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(1)
            .build()
            .unwrap();
        let serial = pool.install(|| simulate(&model, &templates, 16, 100).unwrap());
        assert_eq!(reads, serial);
    }

    #[test]
    fn simulate_seeds_wrap_around() {
        let model = mock_snr_model(Snr::uniform(10.0));
        let templates = &templates()[..1];
        let reads = simulate(&model, templates, 3, u64::MAX).unwrap();
        let names: Vec<String> = reads.iter().map(|r| r.name.clone()).collect();
        assert_eq!(
            names,
            vec![format!("t0/0/{}", u64::MAX), "t0/1/0".to_string(), "t0/2/1".to_string()]
        );
        // read 1 uses the same seed as read 0 of a run started from seed 0
        let again = simulate(&model, templates, 1, 0).unwrap();
        assert_eq!(reads[1].seq, again[0].seq);
        assert_eq!(reads[1].pw, again[0].pw);
    }

    #[test]
    fn simulate_reports_invalid_templates() {
        let model = mock_snr_model(Snr::uniform(10.0));
        let templates = vec![Template {
            id: "bad".to_string(),
            seq: b"ACNT".to_vec(),
        }];
        assert!(matches!(
            simulate(&model, &templates, 4, 0),
            Err(IoError::Model(_))
        ));
        assert!(simulate(&model, &[], 4, 0).unwrap().is_empty());
    }
}
