//! Corpus loading and tokenization: turns a dataset file into the sequence
//! of byte-string tokens the differential harness feeds into the kernels.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// How a dataset file is split into tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Tokenization {
    /// The whole file is a single token.
    File,
    /// One token per line.
    #[default]
    Lines,
    /// One token per whitespace-separated word.
    Words,
    /// Only tokens of exactly `len` bytes (a sliding, non-overlapping split
    /// of `words`-style tokens truncated/filtered to the target length).
    ExactLen { len: usize },
}

impl From<usize> for Tokenization {
    fn from(len: usize) -> Self {
        Tokenization::ExactLen { len }
    }
}

pub fn load_corpus(path: &Path) -> Result<String, Error> {
    fs::read_to_string(path).map_err(|e| Error::InvalidArgument(format!("reading dataset {path:?}: {e}")))
}

/// Splits `content` into tokens per `mode`. Never returns an empty token
/// unless `content` itself is empty (a `File`-mode token on empty input).
pub fn tokenize(content: &str, mode: Tokenization) -> Vec<&str> {
    match mode {
        Tokenization::File => vec![content],
        Tokenization::Lines => content.lines().filter(|l| !l.is_empty()).collect(),
        Tokenization::Words => content.split_whitespace().collect(),
        Tokenization::ExactLen { len } => content
            .split_whitespace()
            .filter(|w| w.len() == len)
            .collect(),
    }
}
