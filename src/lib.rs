//! # tapedist — batched string-similarity engine
//!
//! Computes edit distances (Levenshtein, byte and UTF-8 code-point) and
//! alignment scores (Needleman-Wunsch global, Smith-Waterman local) over
//! large batches of string pairs, under linear or affine (Gotoh) gap
//! models.
//!
//! ## Architecture
//!
//! Inputs live in an arrow-style [`tape::Tape`]: one contiguous payload plus
//! an offset index, so a batch of K variable-length sequences is a single
//! allocation rather than K heap-allocated `Vec<u8>`s. [`batch`] dispatches
//! each pair to a worker via an injected [`executor::Executor`]
//! (rayon-backed by default); each worker evaluates its pair with the
//! [`kernel`] diagonal walker, which keeps only a handful of rolling
//! "anti-diagonal" buffers resident instead of materializing the full
//! `(|a|+1) x (|b|+1)` DP matrix.
//!
//! ## Global allocator
//!
//! mimalloc replaces the system allocator for the whole process: batch
//! calls allocate and free per-worker scratch and per-pair small buffers at
//! a rate where a general-purpose allocator's per-thread heaps pay off.

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

pub mod batch;
pub mod cost;
pub mod error;
pub mod executor;
pub mod gap;
pub mod harness;
pub mod kernel;
pub mod tape;

pub use cost::{CompactMatrix, CostModel, DenseMatrix};
pub use error::{Error, Status};
pub use executor::{Executor, InlineExecutor, RayonExecutor, ScratchAllocator, SystemAllocator};
pub use gap::GapModel;
pub use kernel::{Scratch, Tier};
pub use tape::{Tape, TapeView};
