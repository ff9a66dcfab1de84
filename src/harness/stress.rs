//! Stress logging: on a differential mismatch between an accelerated
//! backend and the scalar baseline, a failure record is appended to the
//! stress directory. Writes are write-then-rename so a process abort mid-
//! write never leaves a partial file behind.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::harness::corpus::Tokenization;

/// One differential-test mismatch, persisted as a flat text file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureRecord {
    pub name: String,
    pub dataset_path: PathBuf,
    pub tokenization: Tokenization,
    pub seed: u64,
    pub token_index: Option<usize>,
    pub expected: String,
    pub actual: String,
}

impl FailureRecord {
    fn render(&self) -> String {
        format!(
            "name={}\ndataset_path={}\ntokenization={:?}\nseed={}\ntoken_index={}\nexpected={}\nactual={}\n",
            self.name,
            self.dataset_path.display(),
            self.tokenization,
            self.seed,
            self.token_index.map(|i| i.to_string()).unwrap_or_else(|| "-".to_string()),
            self.expected,
            self.actual,
        )
    }
}

/// Counts failures observed this run and aborts the process once
/// `stress_limit` is exceeded, to preserve the first failing artifact per
/// the spec's "no graceful continuation past the limit" contract.
pub struct StressLog {
    dir: PathBuf,
    limit: usize,
    count: usize,
}

impl StressLog {
    pub fn new(dir: impl Into<PathBuf>, limit: usize) -> Self {
        Self {
            dir: dir.into(),
            limit,
            count: 0,
        }
    }

    /// Records one failure. Returns `Ok(())` if the run may continue, or an
    /// error if the stress limit was hit (callers that want the documented
    /// "terminate the process" behavior should follow an error here with
    /// `std::process::exit`).
    pub fn record(&mut self, failure: &FailureRecord, timestamp: u64) -> Result<(), Error> {
        write_failure_file(&self.dir, failure, timestamp)?;
        self.count += 1;
        if self.count > self.limit {
            return Err(Error::InvalidArgument(format!(
                "stress limit exceeded: {} failures recorded (limit {})",
                self.count, self.limit
            )));
        }
        Ok(())
    }
}

fn write_failure_file(dir: &Path, failure: &FailureRecord, timestamp: u64) -> Result<(), Error> {
    fs::create_dir_all(dir).map_err(|e| Error::InvalidArgument(format!("creating stress dir {dir:?}: {e}")))?;

    let final_path = dir.join(format!("failed_{timestamp}_{}.txt", failure.name));
    let tmp_path = dir.join(format!(".failed_{timestamp}_{}.txt.tmp", failure.name));

    let mut tmp_file =
        fs::File::create(&tmp_path).map_err(|e| Error::InvalidArgument(format!("creating {tmp_path:?}: {e}")))?;
    tmp_file
        .write_all(failure.render().as_bytes())
        .map_err(|e| Error::InvalidArgument(format!("writing {tmp_path:?}: {e}")))?;
    tmp_file
        .sync_all()
        .map_err(|e| Error::InvalidArgument(format!("syncing {tmp_path:?}: {e}")))?;

    fs::rename(&tmp_path, &final_path)
        .map_err(|e| Error::InvalidArgument(format!("renaming {tmp_path:?} to {final_path:?}: {e}")))?;
    Ok(())
}
