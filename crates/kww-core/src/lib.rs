#![deny(missing_docs)]
#![doc = "Core types, input validation and error taxonomy for the KWW spectral density evaluator."]

pub mod config;
pub mod domain;
pub mod errors;
pub mod rng;
mod types;

pub use config::{EvalConfig, QUADRATURE_LEVEL_LIMIT};
pub use domain::{validate, ReducedFrequency, ShapeExponent, BETA_CLAMP_ULPS};
pub use errors::{ErrorInfo, KwwError};
pub use rng::{derive_substream_seed, RngHandle};
pub use types::{Evaluation, Regime, SpectralResult, Transform};
