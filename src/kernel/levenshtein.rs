//! Levenshtein edit distance over bytes: linear and affine (Gotoh) gap
//! variants, both built on the shared diagonal walker. The core recurrence
//! is generic over [`Symbol`](super::diagonal::Symbol) so the UTF-8 adapter
//! in [`super::utf8`] can reuse it over `char` rather than `u8`.

use super::diagonal::{diagonal_walk_affine, diagonal_walk_linear, Flavor, Symbol};
use super::vectorized::{diagonal_walk_affine_vectorized, diagonal_walk_linear_vectorized};
use super::Scratch;
use crate::cost::CostModel;
use crate::error::Error;
use crate::gap::GapModel;

/// Computes the edit distance between `a` and `b` under `cost` and `gap`.
/// Distances are unsigned; the walker's internal accumulator is signed but
/// never goes negative for [`Flavor::Distance`] since gap/substitution
/// costs are non-negative magnitudes by convention.
pub fn distance(
    a: &[u8],
    b: &[u8],
    cost: &CostModel,
    gap: GapModel,
    scratch: &mut Scratch,
) -> Result<u32, Error> {
    let raw = distance_generic(a, b, |x, y| cost.sub_cost(x, y), gap, scratch)?;
    Ok(raw as u32)
}

/// Vectorized-tier counterpart to [`distance`]. Both linear and affine gaps
/// run through a lane-chunked walker and must match [`distance`] bit-for-bit.
pub fn distance_vectorized(
    a: &[u8],
    b: &[u8],
    cost: &CostModel,
    gap: GapModel,
    scratch: &mut Scratch,
) -> Result<u32, Error> {
    let sub_cost = |x: u8, y: u8| cost.sub_cost(x, y);
    let raw = if let Some(linear) = gap.as_linear() {
        diagonal_walk_linear_vectorized(a, b, sub_cost, linear, Flavor::Distance, scratch)?
    } else {
        match gap {
            GapModel::Affine { open, extend } => {
                diagonal_walk_affine_vectorized(a, b, sub_cost, open, extend, Flavor::Distance, scratch)?
            }
            GapModel::Linear(_) => unreachable!("as_linear() already handles the linear case"),
        }
    };
    Ok(raw as u32)
}

/// The shared core: generic over the symbol type so byte and code-point
/// kernels can share one implementation.
pub(crate) fn distance_generic<T: Symbol>(
    a: &[T],
    b: &[T],
    sub_cost: impl Fn(T, T) -> i32,
    gap: GapModel,
    scratch: &mut Scratch,
) -> Result<i64, Error> {
    if let Some(linear) = gap.as_linear() {
        diagonal_walk_linear(a, b, sub_cost, linear, Flavor::Distance, scratch)
    } else {
        match gap {
            GapModel::Affine { open, extend } => {
                diagonal_walk_affine(a, b, sub_cost, open, extend, Flavor::Distance, scratch)
            }
            GapModel::Linear(_) => unreachable!("as_linear() already handles the linear case"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listen_silent_is_four() {
        let mut scratch = Scratch::new();
        let d = distance(
            b"LISTEN",
            b"SILENT",
            &CostModel::default_distance(),
            GapModel::linear(1),
            &mut scratch,
        )
        .unwrap();
        assert_eq!(d, 4);
    }

    #[test]
    fn atca_vs_ctactcaccc_is_six() {
        let mut scratch = Scratch::new();
        let d = distance(
            b"ATCA",
            b"CTACTCACCC",
            &CostModel::default_distance(),
            GapModel::linear(1),
            &mut scratch,
        )
        .unwrap();
        assert_eq!(d, 6);
    }

    #[test]
    fn single_character_difference_near_unicode_braces() {
        let mut scratch = Scratch::new();
        let d = distance(
            b"ggbuzgjux{}l",
            b"gbuzgjux{}l",
            &CostModel::default_distance(),
            GapModel::linear(1),
            &mut scratch,
        )
        .unwrap();
        assert_eq!(d, 1);
    }

    #[test]
    fn empty_against_abc_is_three() {
        let mut scratch = Scratch::new();
        let d = distance(
            b"",
            b"ABC",
            &CostModel::default_distance(),
            GapModel::linear(1),
            &mut scratch,
        )
        .unwrap();
        assert_eq!(d, 3);
    }

    #[test]
    fn is_symmetric() {
        let mut scratch = Scratch::new();
        let cost = CostModel::default_distance();
        let forward = distance(b"kitten", b"sitting", &cost, GapModel::linear(1), &mut scratch).unwrap();
        let backward = distance(b"sitting", b"kitten", &cost, GapModel::linear(1), &mut scratch).unwrap();
        assert_eq!(forward, backward);
    }

    #[test]
    fn satisfies_triangle_inequality() {
        let mut scratch = Scratch::new();
        let cost = CostModel::default_distance();
        let gap = GapModel::linear(1);
        let (a, b, c) = (b"flaw".as_slice(), b"lawn".as_slice(), b"claws".as_slice());
        let ab = distance(a, b, &cost, gap, &mut scratch).unwrap();
        let bc = distance(b, c, &cost, gap, &mut scratch).unwrap();
        let ac = distance(a, c, &cost, gap, &mut scratch).unwrap();
        assert!(ac <= ab + bc);
    }

    #[test]
    fn vectorized_tier_matches_scalar_tier() {
        let cost = CostModel::default_distance();
        let gap = GapModel::linear(1);
        let mut scratch_scalar = Scratch::new();
        let mut scratch_vector = Scratch::new();
        let scalar = distance(b"kitten", b"sitting", &cost, gap, &mut scratch_scalar).unwrap();
        let vectorized = distance_vectorized(b"kitten", b"sitting", &cost, gap, &mut scratch_vector).unwrap();
        assert_eq!(scalar, vectorized);
    }

    #[test]
    fn affine_with_equal_open_extend_matches_linear() {
        let mut scratch_linear = Scratch::new();
        let mut scratch_affine = Scratch::new();
        let cost = CostModel::default_distance();
        let linear = distance(b"kitten", b"sitting", &cost, GapModel::linear(1), &mut scratch_linear).unwrap();
        let affine = distance(
            b"kitten",
            b"sitting",
            &cost,
            GapModel::affine(1, 1),
            &mut scratch_affine,
        )
        .unwrap();
        assert_eq!(linear, affine);
    }
}
