//! Smith-Waterman local alignment score: every cell floors at 0, and the
//! answer is the maximum cell the walker ever wrote rather than the
//! bottom-right corner.

use super::diagonal::{diagonal_walk_affine, diagonal_walk_linear, Flavor};
use super::vectorized::{diagonal_walk_affine_vectorized, diagonal_walk_linear_vectorized};
use super::Scratch;
use crate::cost::CostModel;
use crate::error::Error;
use crate::gap::GapModel;

pub fn score(
    a: &[u8],
    b: &[u8],
    cost: &CostModel,
    gap: GapModel,
    scratch: &mut Scratch,
) -> Result<i32, Error> {
    let sub_cost = |x, y| cost.sub_cost(x, y);
    let raw = if let Some(linear) = gap.as_linear() {
        diagonal_walk_linear(a, b, sub_cost, linear, Flavor::LocalAlign, scratch)?
    } else {
        match gap {
            GapModel::Affine { open, extend } => {
                diagonal_walk_affine(a, b, sub_cost, open, extend, Flavor::LocalAlign, scratch)?
            }
            GapModel::Linear(_) => unreachable!("as_linear() already handles the linear case"),
        }
    };
    Ok(raw as i32)
}

/// Vectorized-tier counterpart to [`score`].
pub fn score_vectorized(
    a: &[u8],
    b: &[u8],
    cost: &CostModel,
    gap: GapModel,
    scratch: &mut Scratch,
) -> Result<i32, Error> {
    let sub_cost = |x, y| cost.sub_cost(x, y);
    let raw = if let Some(linear) = gap.as_linear() {
        diagonal_walk_linear_vectorized(a, b, sub_cost, linear, Flavor::LocalAlign, scratch)?
    } else {
        match gap {
            GapModel::Affine { open, extend } => {
                diagonal_walk_affine_vectorized(a, b, sub_cost, open, extend, Flavor::LocalAlign, scratch)?
            }
            GapModel::Linear(_) => unreachable!("as_linear() already handles the linear case"),
        }
    };
    Ok(raw as i32)
}
