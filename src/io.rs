//!
//! File input and output of the binary
//!
//! * parameter documents (JSON)
//! * templates (FASTA, or a literal sequence)
//! * simulated reads (FASTA or JSON lines)
//!
use crate::common::{sequence_to_string, Sequence};
use crate::error::ModelError;
use crate::model::SimulatedRead;
use bio::io::fasta;
use log::{info, warn};
use std::io::Write;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("no template found in {0}")]
    EmptyInput(String),
}

///
/// Parameter document stored in the json file
///
pub fn load_document<P: AsRef<Path>>(path: P) -> Result<serde_json::Value, IoError> {
    let file = std::fs::File::open(path.as_ref())?;
    let doc = serde_json::from_reader(std::io::BufReader::new(file))?;
    info!("parameter document {} loaded", path.as_ref().display());
    Ok(doc)
}

///
/// One named template
///
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub id: String,
    pub seq: Sequence,
}

///
/// Read all records of a FASTA file as templates
///
pub fn read_templates_fasta<P: AsRef<Path>>(path: P) -> Result<Vec<Template>, IoError> {
    let reader = fasta::Reader::from_file(path.as_ref()).map_err(|e| {
        warn!("cannot open {}: {}", path.as_ref().display(), e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;
    let mut templates = Vec::new();
    for record in reader.records() {
        let record = record?;
        templates.push(Template {
            id: record.id().to_string(),
            seq: record.seq().to_vec(),
        });
    }
    if templates.is_empty() {
        return Err(IoError::EmptyInput(path.as_ref().display().to_string()));
    }
    Ok(templates)
}

///
/// Templates from a command-line argument: the records of the FASTA file if
/// `arg` names an existing file, the literal sequence otherwise.
///
pub fn read_templates(arg: &str) -> Result<Vec<Template>, IoError> {
    if Path::new(arg).is_file() {
        read_templates_fasta(arg)
    } else {
        Ok(vec![Template {
            id: "template".to_string(),
            seq: arg.as_bytes().to_vec(),
        }])
    }
}

///
/// Write reads as FASTA records. The description carries the chemistry and
/// the drawn snr.
///
pub fn write_reads_fasta<W: Write>(writer: W, reads: &[SimulatedRead]) -> Result<(), IoError> {
    let mut writer = fasta::Writer::new(writer);
    for read in reads {
        let desc = format!("chemistry={} snr={}", read.chemistry, read.snr);
        writer.write(&read.name, Some(&desc), &read.seq)?;
    }
    writer.flush()?;
    Ok(())
}

///
/// Write reads as one json object per line
///
pub fn write_reads_json<W: Write>(mut writer: W, reads: &[SimulatedRead]) -> Result<(), IoError> {
    for read in reads {
        serde_json::to_writer(&mut writer, read)?;
        writeln!(writer)?;
    }
    writer.flush()?;
    Ok(())
}

impl std::fmt::Display for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} {}", self.id, sequence_to_string(&self.seq))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Snr;
    use crate::model::mocks::mock_snr_document;
    use std::io::Write;

    fn reads() -> Vec<SimulatedRead> {
        vec![
            SimulatedRead {
                name: "r0".to_string(),
                chemistry: "mock".to_string(),
                seq: b"ACGT".to_vec(),
                pw: vec![1, 1, 2, 3],
                ipd: vec![5, 4, 3, 2],
                snr: Snr::uniform(10.0),
            },
            SimulatedRead {
                name: "r1".to_string(),
                chemistry: "mock".to_string(),
                seq: b"GG".to_vec(),
                pw: vec![1, 1],
                ipd: vec![1, 1],
                snr: Snr::new(1.0, 2.0, 3.0, 4.0),
            },
        ]
    }

    #[test]
    fn load_document_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let doc = mock_snr_document(0.01, 0.0, 20.0);
        serde_json::to_writer(&mut file, &doc).unwrap();
        file.flush().unwrap();
        assert_eq!(load_document(file.path()).unwrap(), doc);

        let mut broken = tempfile::NamedTempFile::new().unwrap();
        write!(broken, "{{\"SnrRanges\": [").unwrap();
        broken.flush().unwrap();
        assert!(matches!(
            load_document(broken.path()),
            Err(IoError::Json(_))
        ));
        assert!(matches!(
            load_document("/nonexistent/params.json"),
            Err(IoError::Io(_))
        ));
    }

    #[test]
    fn templates_from_fasta_or_literal() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, ">t1 first\nACGT\nAC\n>t2\nggtt\n").unwrap();
        file.flush().unwrap();
        let path = file.path().to_str().unwrap().to_string();
        let templates = read_templates(&path).unwrap();
        assert_eq!(templates.len(), 2);
        assert_eq!(templates[0].id, "t1");
        assert_eq!(templates[0].seq, b"ACGTAC");
        assert_eq!(templates[1].seq, b"ggtt");

        let literal = read_templates("AACGT").unwrap();
        assert_eq!(literal.len(), 1);
        assert_eq!(literal[0].seq, b"AACGT");
    }

    #[test]
    fn empty_fasta_is_an_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(matches!(
            read_templates_fasta(file.path()),
            Err(IoError::EmptyInput(_))
        ));
    }

    #[test]
    fn write_reads_as_fasta() {
        let mut buf = Vec::new();
        write_reads_fasta(&mut buf, &reads()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            ">r0 chemistry=mock snr=10.000,10.000,10.000,10.000\nACGT\n\
             >r1 chemistry=mock snr=1.000,2.000,3.000,4.000\nGG\n"
        );
    }

    #[test]
    fn write_reads_as_json_lines() {
        let mut buf = Vec::new();
        write_reads_json(&mut buf, &reads()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let r1: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(r1["seq"], "GG");
        assert_eq!(r1["snr"], serde_json::json!([1.0, 2.0, 3.0, 4.0]));
    }
}
