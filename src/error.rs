//! Status/error taxonomy for the tape and batch-executor fallible operations.
//!
//! Kernels themselves are total over valid inputs and never produce an
//! `Error` — only allocation and argument-validation at the tape/executor
//! boundary can fail, per the failure semantics in the design doc.

/// The `Status` sum type returned by fallible public operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Scratch, tape, or result-buffer growth could not obtain memory.
    #[error("allocation failed")]
    AllocationFailed,

    /// Batch length mismatch, empty required slice, or similar caller error.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Reserved for accelerator backends; never returned by CPU-only flows.
    #[error("device error")]
    DeviceError,
}

/// Alias matching the spec's `Status` naming; `Ok(())` is `success`.
pub type Status = Result<(), Error>;
