//! Parallel evaluation over many frequencies or exponents.

use kww_core::{ErrorInfo, KwwError, SpectralResult, Transform};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::evaluator::Evaluator;

fn pool_error(err: impl ToString) -> KwwError {
    KwwError::Config(ErrorInfo::new("thread-pool", err.to_string()))
}

/// Options governing batched evaluation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BatchOpts {
    /// Worker threads; zero lets rayon pick the number of logical cores.
    #[serde(default)]
    pub concurrency: usize,
}

/// One row of a `(beta, omega)` grid evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridRow {
    /// Exponent shared by the row.
    pub beta: f64,
    /// Results in the order of the frequency axis.
    pub values: Vec<SpectralResult>,
}

fn build_pool(opts: &BatchOpts) -> Result<rayon::ThreadPool, KwwError> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(opts.concurrency)
        .build()
        .map_err(pool_error)
}

impl Evaluator {
    /// Evaluates both components at every frequency, preserving input order.
    ///
    /// The first invalid input or convergence failure aborts the batch.
    pub fn evaluate_batch(
        &self,
        beta: f64,
        omegas: &[f64],
        opts: &BatchOpts,
    ) -> Result<Vec<SpectralResult>, KwwError> {
        let pool = build_pool(opts)?;
        pool.install(|| {
            omegas
                .par_iter()
                .map(|&omega| self.evaluate(beta, omega))
                .collect()
        })
    }

    /// Evaluates a single component at every frequency, preserving input order.
    pub fn evaluate_component_batch(
        &self,
        transform: Transform,
        beta: f64,
        omegas: &[f64],
        opts: &BatchOpts,
    ) -> Result<Vec<f64>, KwwError> {
        let pool = build_pool(opts)?;
        pool.install(|| {
            omegas
                .par_iter()
                .map(|&omega| match transform {
                    Transform::Cosine => self.evaluate_real(beta, omega),
                    Transform::Sine => self.evaluate_imag(beta, omega),
                    Transform::Primitive => self.evaluate_primitive(beta, omega),
                })
                .collect()
        })
    }

    /// Evaluates the outer product of exponents and frequencies, one row per exponent.
    pub fn evaluate_grid(
        &self,
        betas: &[f64],
        omegas: &[f64],
        opts: &BatchOpts,
    ) -> Result<Vec<GridRow>, KwwError> {
        let pool = build_pool(opts)?;
        pool.install(|| {
            betas
                .par_iter()
                .map(|&beta| -> Result<GridRow, KwwError> {
                    let values = omegas
                        .par_iter()
                        .map(|&omega| self.evaluate(beta, omega))
                        .collect::<Result<Vec<_>, _>>()?;
                    Ok(GridRow { beta, values })
                })
                .collect()
        })
    }
}

/// Batched evaluation with the default configuration.
pub fn evaluate_batch(
    beta: f64,
    omegas: &[f64],
    opts: &BatchOpts,
) -> Result<Vec<SpectralResult>, KwwError> {
    Evaluator::default().evaluate_batch(beta, omegas, opts)
}

/// Grid evaluation with the default configuration.
pub fn evaluate_grid(
    betas: &[f64],
    omegas: &[f64],
    opts: &BatchOpts,
) -> Result<Vec<GridRow>, KwwError> {
    Evaluator::default().evaluate_grid(betas, omegas, opts)
}
