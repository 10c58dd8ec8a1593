#![deny(missing_docs)]
#![doc = "Evaluation of the KWW spectral density, the Fourier transform of `exp(-t^beta)`."]

/// Batched and grid evaluation on rayon pools.
pub mod batch;
/// Failure reasons of the individual regimes.
pub mod breakdown;
/// Regime selection and evaluation entry points.
pub mod evaluator;
/// Canonical hashing helpers.
pub mod hash;
/// Frequency limits between the series and quadrature regimes.
pub mod limits;
mod quadrature;
/// Continuity scans across regime changes.
pub mod scan;
/// Canonical JSON serde helpers.
pub mod serde;
mod series;

pub use batch::{evaluate_batch, evaluate_grid, BatchOpts, GridRow};
pub use breakdown::Breakdown;
pub use evaluator::{
    evaluate, evaluate_imag, evaluate_primitive, evaluate_real, evaluate_with, Evaluator, Strategy,
};
pub use hash::stable_hash_string;
pub use kww_core::{
    EvalConfig, Evaluation, ErrorInfo, KwwError, Regime, ShapeExponent, SpectralResult, Transform,
};
pub use limits::{switch_points, SwitchPoints};
pub use scan::{
    scan_continuity, ScanAxis, ScanIssue, ScanReport, ScanSpec, Signature, SliceMode, SliceReport,
    Transition,
};
