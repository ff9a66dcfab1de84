//! Arrow-style tape: contiguous storage for a batch of variable-length byte
//! sequences, plus a read-only view over it.
//!
//! Layout: one flat `payload: Vec<u8>` holding every sequence concatenated,
//! and `offsets: Vec<u32>` of length `K+1` such that sequence `i` occupies
//! `payload[offsets[i]..offsets[i+1]]`. This mirrors the teacher's flat SoA
//! `Vec<f32>` + parallel `ids: Vec<u64>` layout (one contiguous slab instead
//! of `K` individual heap allocations), generalized to variable-length rows.

use std::io::{self, Read, Write};

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Append-only, resettable container owning `K` concatenated byte sequences.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Tape {
    payload: Vec<u8>,
    offsets: Vec<u32>,
}

impl Tape {
    /// Creates an empty tape. The invariant `offsets[0] == 0` holds from
    /// construction onward.
    pub fn new() -> Self {
        Self {
            payload: Vec::new(),
            offsets: vec![0],
        }
    }

    /// Number of sequences currently stored.
    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total payload size in bytes.
    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }

    /// Drops all sequences, retaining allocated capacity.
    pub fn reset(&mut self) {
        self.payload.clear();
        self.offsets.clear();
        self.offsets.push(0);
    }

    /// Appends one sequence. On failure the tape is left exactly as it was
    /// (strong exception guarantee), realized here via `try_reserve` rather
    /// than an infallible `push` that would abort the process on OOM.
    pub fn try_append(&mut self, sequence: &[u8]) -> Result<(), Error> {
        self.payload
            .try_reserve(sequence.len())
            .map_err(|_| Error::AllocationFailed)?;
        self.offsets
            .try_reserve(1)
            .map_err(|_| Error::AllocationFailed)?;

        let new_offset = self.payload.len() as u64 + sequence.len() as u64;
        if new_offset > u32::MAX as u64 {
            return Err(Error::InvalidArgument(
                "tape payload would exceed u32 offset range".to_string(),
            ));
        }

        self.payload.extend_from_slice(sequence);
        self.offsets.push(new_offset as u32);
        Ok(())
    }

    /// Equivalent to `reset()` followed by `try_append` for each element.
    /// On the first failure the tape is reset to empty rather than left
    /// half-populated, keeping the "prior valid state" contract simple.
    pub fn try_assign<'a, I>(&mut self, sequences: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        self.reset();
        for sequence in sequences {
            if let Err(e) = self.try_append(sequence) {
                self.reset();
                return Err(e);
            }
        }
        Ok(())
    }

    /// O(1) read-only projection, valid until the next mutation.
    pub fn view(&self) -> TapeView<'_> {
        TapeView {
            payload: &self.payload,
            offsets: &self.offsets,
        }
    }

    /// Indexed access to sequence `i`. Panics if `i >= len()`, matching the
    /// spec's `operator[]`.
    pub fn get(&self, i: usize) -> &[u8] {
        self.view().get(i)
    }

    /// Serializes the payload and offset index to any `Write` sink, so a
    /// prepared batch (e.g. a tokenized corpus) can be cached between runs
    /// instead of re-tokenized every time.
    pub fn save<W: Write>(&self, writer: W) -> io::Result<()> {
        bincode::serialize_into(writer, self).map_err(io::Error::other)
    }

    /// Deserializes a tape previously written by [`Tape::save`].
    pub fn load<R: Read>(reader: R) -> io::Result<Self> {
        bincode::deserialize_from(reader).map_err(io::Error::other)
    }
}

/// A read-only, non-owning projection of a [`Tape`].
#[derive(Clone, Copy, Debug)]
pub struct TapeView<'a> {
    payload: &'a [u8],
    offsets: &'a [u32],
}

impl<'a> TapeView<'a> {
    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, i: usize) -> &'a [u8] {
        let start = self.offsets[i] as usize;
        let end = self.offsets[i + 1] as usize;
        &self.payload[start..end]
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a [u8]> + '_ {
        (0..self.len()).map(move |i| self.get(i))
    }
}
