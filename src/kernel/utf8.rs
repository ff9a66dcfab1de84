//! UTF-8 Levenshtein adapter: decodes both inputs into code points and runs
//! the same generic core as the byte kernel, comparing `char`s instead of
//! bytes. A combining sequence therefore compares unequal to its
//! precomposed form — no normalization is performed.

use super::levenshtein::distance_generic;
use super::Scratch;
use crate::error::Error;
use crate::gap::GapModel;

/// Computes the edit distance between `a` and `b` counted in Unicode code
/// points rather than bytes, under a uniform `(match, mismatch)` cost.
pub fn distance(
    a: &str,
    b: &str,
    matching: i32,
    mismatching: i32,
    gap: GapModel,
    scratch: &mut Scratch,
) -> Result<u32, Error> {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let sub_cost = move |x: char, y: char| if x == y { matching } else { mismatching };
    let raw = distance_generic(&a_chars, &b_chars, sub_cost, gap, scratch)?;
    Ok(raw as u32)
}
