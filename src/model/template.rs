//!
//! Template materialization
//!
//! Position `i` carries the probabilities of leaving template base `i`,
//! selected by the context of base `i + 1`:
//!
//! ```text
//! tpl:  A    A    C    G    T
//! ctx:  AA   NC   NG   NT   -
//! ```
//!
//! The last position is a forced match, as no move follows the last base.
//!
use super::transition::TransitionTable;
use crate::common::{encode_base, Context, Move};
use crate::error::ModelError;
use serde::Serialize;

///
/// Per-base move probabilities of a template
///
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TemplatePosition {
    /// template base as given (case preserved)
    pub base: u8,
    /// 2-bit code of `base`
    pub idx: u8,
    /// context selecting the row; None for the terminal position
    pub ctx: Option<Context>,
    pub p_match: f64,
    pub p_branch: f64,
    pub p_stick: f64,
    pub p_deletion: f64,
}

impl TemplatePosition {
    fn new(base: u8, idx: u8, ctx: Context, row: &[f64; 4]) -> TemplatePosition {
        TemplatePosition {
            base,
            idx,
            ctx: Some(ctx),
            p_match: row[0],
            p_branch: row[1],
            p_stick: row[2],
            p_deletion: row[3],
        }
    }
    fn terminal(base: u8, idx: u8) -> TemplatePosition {
        TemplatePosition {
            base,
            idx,
            ctx: None,
            p_match: 1.0,
            p_branch: 0.0,
            p_stick: 0.0,
            p_deletion: 0.0,
        }
    }
    pub fn prob(&self, m: Move) -> f64 {
        match m {
            Move::Match => self.p_match,
            Move::Branch => self.p_branch,
            Move::Stick => self.p_stick,
            Move::Deletion => self.p_deletion,
        }
    }
    pub fn is_terminal(&self) -> bool {
        self.ctx.is_none()
    }
}

impl std::fmt::Display for TemplatePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let ctx = match self.ctx {
            Some(ctx) => ctx.to_string(),
            None => "-".to_string(),
        };
        write!(
            f,
            "{}\t{}\t{:.6}\t{:.6}\t{:.6}\t{:.6}",
            self.base as char, ctx, self.p_match, self.p_branch, self.p_stick, self.p_deletion
        )
    }
}

fn code_at(tpl: &[u8], pos: usize) -> Result<u8, ModelError> {
    encode_base(tpl[pos]).ok_or(ModelError::InvalidTemplate {
        base: tpl[pos] as char,
        pos,
    })
}

///
/// Materialize the template with the context rows of `table`.
/// Any base outside `ACGTacgt` aborts the whole call.
///
pub fn populate(table: &TransitionTable, tpl: &[u8]) -> Result<Vec<TemplatePosition>, ModelError> {
    if tpl.is_empty() {
        return Ok(Vec::new());
    }
    let mut result = Vec::with_capacity(tpl.len());
    let mut prev = code_at(tpl, 0)?;
    for i in 1..tpl.len() {
        let curr = code_at(tpl, i)?;
        let ctx = Context::new(prev, curr);
        result.push(TemplatePosition::new(tpl[i - 1], prev, ctx, table.row(ctx)));
        prev = curr;
    }
    result.push(TemplatePosition::terminal(tpl[tpl.len() - 1], prev));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Snr;
    use crate::model::mocks::mock_snr_document;
    use crate::model::params::SnrParams;

    fn mock_table() -> TransitionTable {
        let params = SnrParams::from_json(&mock_snr_document(0.01, 0.0, 20.0)).unwrap();
        TransitionTable::new(&params, &Snr::uniform(10.0))
    }

    #[test]
    fn populate_acgt() {
        let table = mock_table();
        let tpl = populate(&table, b"ACGT").unwrap();
        assert_eq!(tpl.len(), 4);
        let last = tpl[3];
        assert_eq!(
            [last.p_match, last.p_branch, last.p_stick, last.p_deletion],
            [1.0, 0.0, 0.0, 0.0]
        );
        assert!(last.is_terminal());
        assert_eq!(last.base, b'T');
        for (i, pos) in tpl.iter().enumerate().take(3) {
            let ctx = pos.ctx.unwrap();
            assert_eq!(ctx.base() as usize, i + 1);
            assert!(!ctx.is_homopolymer());
            let sum: f64 = Move::ALL.iter().map(|&m| pos.prob(m)).sum();
            assert_abs_diff_eq!(sum, 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn populate_rejects_invalid_base() {
        let table = mock_table();
        assert_eq!(
            populate(&table, b"ACGX"),
            Err(ModelError::InvalidTemplate { base: 'X', pos: 3 })
        );
        assert_eq!(
            populate(&table, b"NACG"),
            Err(ModelError::InvalidTemplate { base: 'N', pos: 0 })
        );
    }

    #[test]
    fn populate_keeps_case_and_edges() {
        let table = mock_table();
        assert!(populate(&table, b"").unwrap().is_empty());

        let single = populate(&table, b"g").unwrap();
        assert_eq!(single.len(), 1);
        assert!(single[0].is_terminal());
        assert_eq!(single[0].idx, 2);

        let lower = populate(&table, b"aacgt").unwrap();
        let upper = populate(&table, b"AACGT").unwrap();
        assert_eq!(lower[0].base, b'a');
        for (l, u) in lower.iter().zip(upper.iter()) {
            assert_eq!(l.ctx, u.ctx);
            assert_eq!(l.p_match, u.p_match);
        }
    }

    #[test]
    fn positions_share_context_rows() {
        let table = mock_table();
        let tpl = populate(&table, b"ACACAC").unwrap();
        // A->C and C->A contexts repeat
        assert_eq!(tpl[0], tpl[2]);
        assert_eq!(tpl[1], tpl[3]);
    }
}
