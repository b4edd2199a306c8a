//! Page fill analysis: how much of each column fragment's budget is used.
//!
//! # Verdicts
//! - `Empty`    → no blocks (padding fragment of a shorter column)
//! - `Sparse`   → under 50% of the budget used
//! - `Filled`   → 50–100%
//! - `Overflow` → over budget; only a lone oversized block can cause this

use serde::{Deserialize, Serialize};

use crate::layout::blocks::MeasuredBlock;

const SPARSE_BELOW: f32 = 0.50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillVerdict {
    Empty,
    Sparse,
    Filled,
    Overflow,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FillReport {
    pub used: f32,
    pub budget: f32,
    /// `used / budget`; 0 when the budget is 0.
    pub ratio: f32,
    pub verdict: FillVerdict,
}

pub fn analyze_fill(blocks: &[MeasuredBlock], budget: f32) -> FillReport {
    let used: f32 = blocks.iter().map(|b| b.height).sum();
    let ratio = if budget > 0.0 { used / budget } else { 0.0 };

    let verdict = if blocks.is_empty() {
        FillVerdict::Empty
    } else if used > budget {
        FillVerdict::Overflow
    } else if ratio < SPARSE_BELOW {
        FillVerdict::Sparse
    } else {
        FillVerdict::Filled
    };

    FillReport {
        used,
        budget,
        ratio,
        verdict,
    }
}
