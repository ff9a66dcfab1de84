//! Needleman-Wunsch global alignment score: the same diagonal walker as
//! Levenshtein, but maximizing under an arbitrary substitution matrix and
//! returning a signed score instead of an unsigned distance.

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
        diagonal_walk_linear(a, b, sub_cost, linear, Flavor::GlobalAlign, scratch)?
    } else {
        match gap {
            GapModel::Affine { open, extend } => {
                diagonal_walk_affine(a, b, sub_cost, open, extend, Flavor::GlobalAlign, scratch)?
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
        diagonal_walk_linear_vectorized(a, b, sub_cost, linear, Flavor::GlobalAlign, scratch)?
    } else {
        match gap {
            GapModel::Affine { open, extend } => {
                diagonal_walk_affine_vectorized(a, b, sub_cost, open, extend, Flavor::GlobalAlign, scratch)?
            }
            GapModel::Linear(_) => unreachable!("as_linear() already handles the linear case"),
        }
    };
    Ok(raw as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::DenseMatrix;

    #[test]
    fn identical_sequences_score_length_under_diagonal_matrix() {
        let mut scratch = Scratch::new();
        let matrix = DenseMatrix::diagonal(1, 0);
        let s = score(
            b"abcdefg",
            b"abcdefg",
            &CostModel::dense(matrix),
            GapModel::linear(0),
            &mut scratch,
        )
        .unwrap();
        assert_eq!(s, 7);
    }

    #[test]
    fn distance_similarity_duality_holds_for_linear_gap() {
        let mut scratch = Scratch::new();
        let matrix = DenseMatrix::diagonal(1, 0);
        let s = score(
            b"abcdefg",
            b"abc_efg",
            &CostModel::dense(matrix),
            GapModel::linear(0),
            &mut scratch,
        )
        .unwrap();
        assert_eq!(s, 6);

        let mut scratch2 = Scratch::new();
        let dist = super::super::levenshtein::distance(
            b"abcdefg",
            b"abc_efg",
            &CostModel::default_distance(),
            GapModel::linear(1),
            &mut scratch2,
        )
        .unwrap();
        assert_eq!(7 - s, dist as i32);
        assert_eq!(dist, 1);
    }

    #[test]
    fn affine_collapses_to_linear_when_equal() {
        let mut scratch_linear = Scratch::new();
        let mut scratch_affine = Scratch::new();
        let cost = CostModel::uniform(2, -1);
        let linear = score(b"abcdef", b"abcxef", &cost, GapModel::linear(-2), &mut scratch_linear).unwrap();
        let affine = score(
            b"abcdef",
            b"abcxef",
            &cost,
            GapModel::affine(-2, -2),
            &mut scratch_affine,
        )
        .unwrap();
        assert_eq!(linear, affine);
    }
}
