//! Substitution cost models: uniform match/mismatch, a dense 256x256 table
//! for arbitrary alphabets (BLOSUM-like matrices), and a compact 26x26 ASCII
//! form that decompresses losslessly into the dense table.

use std::io::{self, Read, Write};

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Sentinel written into [`DenseMatrix`] entries that the compact form does
/// not cover. Chosen so it reads as an obvious "not meant to be hit" value
/// rather than a plausible score.
pub const UNMAPPED_SENTINEL: i8 = i8::MIN;

/// A 256x256 row-major table of substitution scores, small enough to sit in
/// L1 and be passed by reference on the hot path.
///
/// `serde` has no blanket impl for arrays this large, so the row-major blob
/// is (de)serialized as a plain `Vec<i8>` instead of deriving through the
/// fixed-size array.
#[derive(Clone)]
pub struct DenseMatrix(Box<[i8; 256 * 256]>);

impl Serialize for DenseMatrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.as_slice().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DenseMatrix {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let values = Vec::<i8>::deserialize(deserializer)?;
        let table: Box<[i8; 256 * 256]> = values
            .into_boxed_slice()
            .try_into()
            .map_err(|_| D::Error::custom("expected a 256x256 row-major blob"))?;
        Ok(Self(table))
    }
}

impl DenseMatrix {
    /// Builds a dense matrix with `matching` on the diagonal and
    /// `mismatching` everywhere else. This expresses a distance as a score:
    /// with `diagonal(1, 0)` and gap 0, `max(|a|,|b|) - score(a,b)` equals
    /// the corresponding edit distance.
    pub fn diagonal(matching: i8, mismatching: i8) -> Self {
        let mut table = Box::new([mismatching; 256 * 256]);
        for i in 0..256usize {
            table[i * 256 + i] = matching;
        }
        Self(table)
    }

    /// Builds a dense matrix from a caller-supplied row-major 256x256 blob,
    /// the same layout used to persist a matrix for offline tools.
    pub fn from_row_major(table: Box<[i8; 256 * 256]>) -> Self {
        Self(table)
    }

    #[inline(always)]
    pub fn get(&self, a: u8, b: u8) -> i8 {
        self.0[a as usize * 256 + b as usize]
    }

    pub fn as_row_major(&self) -> &[i8; 256 * 256] {
        &self.0
    }

    /// Serializes the row-major blob to any `Write` sink (file, socket,
    /// memory buffer), for offline tools that want to ship a substitution
    /// matrix alongside a dataset.
    pub fn save<W: Write>(&self, writer: W) -> io::Result<()> {
        bincode::serialize_into(writer, self).map_err(io::Error::other)
    }

    /// Deserializes a matrix previously written by [`DenseMatrix::save`].
    pub fn load<R: Read>(reader: R) -> io::Result<Self> {
        bincode::deserialize_from(reader).map_err(io::Error::other)
    }
}

impl std::fmt::Debug for DenseMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DenseMatrix").field("len", &self.0.len()).finish()
    }
}

/// A space-saving 26x26 ASCII (A-Z, case-folded) substitution table, meant
/// for crossing memory-constrained boundaries (e.g. an accelerator's
/// constant memory) where the full 256x256 form would not fit.
#[derive(Clone, Copy, Debug)]
pub struct CompactMatrix([[i8; 26]; 26]);

impl CompactMatrix {
    pub const fn new(rows: [[i8; 26]; 26]) -> Self {
        Self(rows)
    }

    /// Expands the 26x26 form into a 256x256 [`DenseMatrix`] by mapping
    /// ASCII A-Z (case-folded) entries and leaving every other byte pair at
    /// [`UNMAPPED_SENTINEL`].
    pub fn decompress(&self) -> DenseMatrix {
        let mut table = Box::new([UNMAPPED_SENTINEL; 256 * 256]);
        for (ai, row) in self.0.iter().enumerate() {
            for (bi, &score) in row.iter().enumerate() {
                let a_upper = b'A' + ai as u8;
                let b_upper = b'A' + bi as u8;
                let a_lower = b'a' + ai as u8;
                let b_lower = b'a' + bi as u8;
                for &a in &[a_upper, a_lower] {
                    for &b in &[b_upper, b_lower] {
                        table[a as usize * 256 + b as usize] = score;
                    }
                }
            }
        }
        DenseMatrix(table)
    }
}

/// Exactly one substitution cost model is selected per invocation.
#[derive(Clone, Debug)]
pub enum CostModel {
    /// Integers `(match, mismatch)`, typically used for distance kernels.
    Uniform { matching: i32, mismatching: i32 },
    /// A 256x256 table of small signed integers, for arbitrary alphabets.
    Dense(DenseMatrix),
}

impl CostModel {
    pub fn uniform(matching: i32, mismatching: i32) -> Self {
        Self::Uniform { matching, mismatching }
    }

    pub fn dense(matrix: DenseMatrix) -> Self {
        Self::Dense(matrix)
    }

    /// The default Levenshtein cost model: match=0, mismatch=1.
    pub fn default_distance() -> Self {
        Self::uniform(0, 1)
    }

    #[inline(always)]
    pub fn sub_cost(&self, a: u8, b: u8) -> i32 {
        match self {
            Self::Uniform { matching, mismatching } => {
                if a == b {
                    *matching
                } else {
                    *mismatching
                }
            }
            Self::Dense(matrix) => matrix.get(a, b) as i32,
        }
    }
}
