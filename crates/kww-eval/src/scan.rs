//! Continuity scans across regime and term-count changes.
//!
//! A scan walks one parameter upward by doubling while the other stays
//! fixed. Whenever the producing regime or the number of summed terms changes
//! between two points, the change is localized by bisection and the values
//! just below and just above it are compared for steps and kinks. Series
//! results next to the change are also recomputed by forced quadrature.

use kww_core::{Evaluation, ErrorInfo, KwwError, Regime, RngHandle, Transform};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::evaluator::{Evaluator, Strategy};
use crate::hash::stable_hash_string;

const BISECTION_LIMIT: usize = 100;

/// Parameter varied within one slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanAxis {
    /// Scan the reduced frequency at fixed `beta`.
    Omega,
    /// Scan the stretching exponent at fixed `omega`.
    Beta,
}

impl ScanAxis {
    /// Default limits of this parameter, used for both scan and slice ranges.
    pub fn default_range(self) -> [f64; 2] {
        match self {
            ScanAxis::Omega => [1e-20, 1e10],
            ScanAxis::Beta => [0.1, 1.0],
        }
    }

    fn other(self) -> Self {
        match self {
            ScanAxis::Omega => ScanAxis::Beta,
            ScanAxis::Beta => ScanAxis::Omega,
        }
    }
}

/// How the values of the fixed parameter are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SliceMode {
    /// A single slice at the given value.
    Fixed {
        /// Value of the fixed parameter.
        value: f64,
    },
    /// `count` log-spaced slices covering the slice range, end points included.
    Regular {
        /// Number of slices, at least two.
        count: usize,
    },
    /// `count` slices drawn log-uniformly from the slice range.
    Random {
        /// Number of slices.
        count: usize,
        /// Master seed; slice `j` draws from substream `j`.
        seed: u64,
    },
}

fn default_resolution() -> f64 {
    1e-9
}

fn default_true() -> bool {
    true
}

/// Description of a continuity scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanSpec {
    /// Component under test.
    pub transform: Transform,
    /// Parameter varied within each slice.
    pub axis: ScanAxis,
    /// Limits of the scanned parameter; defaults to the axis range.
    #[serde(default)]
    pub range: Option<[f64; 2]>,
    /// Limits of the fixed parameter; defaults to the other axis range.
    #[serde(default)]
    pub slice_range: Option<[f64; 2]>,
    /// Choice of fixed-parameter values.
    pub slices: SliceMode,
    /// Relative resolution of bisection, straddle offsets and comparisons.
    #[serde(default = "default_resolution")]
    pub resolution: f64,
    /// Treat a change in the number of summed terms as a transition.
    #[serde(default = "default_true")]
    pub track_terms: bool,
    /// Recompute series results next to each transition by forced quadrature.
    #[serde(default = "default_true")]
    pub cross_check: bool,
}

impl ScanSpec {
    /// Scan of `omega` over the default range with one fixed `beta`.
    pub fn omega_at(transform: Transform, beta: f64) -> Self {
        Self {
            transform,
            axis: ScanAxis::Omega,
            range: None,
            slice_range: None,
            slices: SliceMode::Fixed { value: beta },
            resolution: default_resolution(),
            track_terms: true,
            cross_check: true,
        }
    }

    /// Scan of `beta` over the default range with one fixed `omega`.
    pub fn beta_at(transform: Transform, omega: f64) -> Self {
        Self {
            axis: ScanAxis::Beta,
            slices: SliceMode::Fixed { value: omega },
            ..Self::omega_at(transform, 1.0)
        }
    }

    fn scan_range(&self) -> [f64; 2] {
        self.range.unwrap_or_else(|| self.axis.default_range())
    }

    fn fixed_range(&self) -> [f64; 2] {
        self.slice_range
            .unwrap_or_else(|| self.axis.other().default_range())
    }

    /// Checks ranges, slice counts and resolution.
    pub fn validate(&self) -> Result<(), KwwError> {
        if !(self.resolution.is_finite() && self.resolution > 0.0 && self.resolution < 0.1) {
            return Err(scan_error(
                ErrorInfo::new("invalid-resolution", "resolution must lie in (0, 0.1)")
                    .with_context("resolution", format!("{:e}", self.resolution)),
            ));
        }
        let limits = [
            ("range", self.scan_range()),
            ("slice_range", self.fixed_range()),
        ];
        for (field, [lo, hi]) in limits {
            if !(lo.is_finite() && hi.is_finite() && lo > 0.0 && lo <= hi) {
                return Err(scan_error(
                    ErrorInfo::new("invalid-range", "limits must be finite, positive and ordered")
                        .with_context("field", field)
                        .with_context("lo", format!("{lo:e}"))
                        .with_context("hi", format!("{hi:e}")),
                ));
            }
        }
        let (count, minimum) = match self.slices {
            SliceMode::Fixed { value } => {
                let [lo, hi] = self.fixed_range();
                if !(value >= lo && value <= hi) {
                    return Err(scan_error(
                        ErrorInfo::new(
                            "slice-outside-range",
                            "fixed value lies outside the slice range",
                        )
                        .with_context("value", format!("{value:e}")),
                    ));
                }
                return Ok(());
            }
            SliceMode::Regular { count } => (count, 2),
            SliceMode::Random { count, .. } => (count, 1),
        };
        if count < minimum {
            return Err(scan_error(
                ErrorInfo::new("invalid-slice-count", "too few slices for the slice mode")
                    .with_context("count", count.to_string())
                    .with_context("minimum", minimum.to_string()),
            ));
        }
        Ok(())
    }

    fn slice_values(&self) -> Vec<f64> {
        let [lo, hi] = self.fixed_range();
        match self.slices {
            SliceMode::Fixed { value } => vec![value],
            SliceMode::Regular { count } => (0..count)
                .map(|j| {
                    let x = j as f64 / (count - 1) as f64;
                    ((1.0 - x) * lo.ln() + x * hi.ln()).exp()
                })
                .collect(),
            SliceMode::Random { count, seed } => (0..count)
                .map(|j| RngHandle::substream(seed, j as u64).log_uniform(lo, hi))
                .collect(),
        }
    }
}

fn scan_error(info: ErrorInfo) -> KwwError {
    KwwError::Config(info)
}

/// Regime and term count at one side of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// Producing regime.
    pub regime: Regime,
    /// Terms or quadrature nodes summed.
    pub terms: usize,
}

/// A localized change of regime or term count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    /// Scan-variable value where the change was localized.
    pub at: f64,
    /// Signature just below `at`.
    pub before: Signature,
    /// Signature just above `at`.
    pub after: Signature,
    /// Differences between consecutive straddle points, the middle one
    /// crossing the change.
    pub steps: [f64; 3],
}

/// Outcome of one slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliceReport {
    /// Value of the fixed parameter.
    pub fixed: f64,
    /// Number of evaluator calls spent on the slice.
    pub evaluations: usize,
    /// Changes found, in scan order.
    pub transitions: Vec<Transition>,
}

/// Anomaly found during a scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "issue")]
pub enum ScanIssue {
    /// The value steps by more than its neighbourhood explains.
    Step {
        /// Fixed parameter of the slice.
        fixed: f64,
        /// Location of the change.
        at: f64,
        /// Straddle differences.
        steps: [f64; 3],
    },
    /// The differences alternate in sign across the change.
    NonMonotone {
        /// Fixed parameter of the slice.
        fixed: f64,
        /// Location of the change.
        at: f64,
        /// Straddle differences.
        steps: [f64; 3],
    },
    /// A further change sits between two straddle points on one side.
    UnexpectedChange {
        /// Fixed parameter of the slice.
        fixed: f64,
        /// Location of the change.
        at: f64,
    },
    /// Bisection did not resolve the change within its iteration cap.
    BisectionFailed {
        /// Fixed parameter of the slice.
        fixed: f64,
        /// Last lower bound of the bracket.
        at: f64,
    },
    /// A series result disagrees with forced quadrature.
    Discrepancy {
        /// Fixed parameter of the slice.
        fixed: f64,
        /// Scan-variable value.
        at: f64,
        /// Result of the automatic strategy.
        value: f64,
        /// Result of forced quadrature.
        quadrature: f64,
        /// `(quadrature - value) / value`.
        relative_error: f64,
    },
    /// Forced quadrature failed where a series succeeded.
    QuadratureFailed {
        /// Fixed parameter of the slice.
        fixed: f64,
        /// Scan-variable value.
        at: f64,
        /// Breakdown code of the failure.
        code: String,
    },
    /// The automatic strategy failed; the rest of the slice was skipped.
    EvaluationFailed {
        /// Fixed parameter of the slice.
        fixed: f64,
        /// Scan-variable value.
        at: f64,
        /// The returned error.
        error: KwwError,
    },
}

/// Result of [`Evaluator::scan`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    /// The scan that was run.
    pub spec: ScanSpec,
    /// One report per slice, in slice order.
    pub slices: Vec<SliceReport>,
    /// All anomalies, grouped by slice.
    pub issues: Vec<ScanIssue>,
    /// SHA-256 of the canonical JSON of `spec`, `slices` and `issues`.
    pub report_hash: String,
}

impl ScanReport {
    /// Whether the scan found no anomaly.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

#[derive(Serialize)]
struct HashView<'a> {
    spec: &'a ScanSpec,
    slices: &'a [SliceReport],
    issues: &'a [ScanIssue],
}

struct Point {
    v: f64,
    y: f64,
    signature: Signature,
}

struct Slice<'a> {
    evaluator: &'a Evaluator,
    spec: &'a ScanSpec,
    fixed: f64,
    evaluations: usize,
    transitions: Vec<Transition>,
    issues: Vec<ScanIssue>,
}

impl<'a> Slice<'a> {
    fn call(&mut self, v: f64, strategy: Strategy) -> Result<Evaluation, KwwError> {
        self.evaluations += 1;
        let (beta, omega) = match self.spec.axis {
            ScanAxis::Omega => (self.fixed, v),
            ScanAxis::Beta => (v, self.fixed),
        };
        self.evaluator
            .evaluate_with(beta, omega, self.spec.transform, strategy)
    }

    fn point(&mut self, v: f64) -> Option<Point> {
        match self.call(v, Strategy::Auto) {
            Ok(evaluation) => Some(Point {
                v,
                y: evaluation.value,
                signature: Signature {
                    regime: evaluation.regime,
                    terms: if self.spec.track_terms {
                        evaluation.terms
                    } else {
                        0
                    },
                },
            }),
            Err(error) => {
                self.issues.push(ScanIssue::EvaluationFailed {
                    fixed: self.fixed,
                    at: v,
                    error,
                });
                None
            }
        }
    }

    fn run(mut self) -> (SliceReport, Vec<ScanIssue>) {
        let [lo, hi] = self.spec.scan_range();
        tracing::debug!(fixed = self.fixed, lo, hi, axis = ?self.spec.axis, "scanning slice");
        self.walk(lo, hi);
        let report = SliceReport {
            fixed: self.fixed,
            evaluations: self.evaluations,
            transitions: self.transitions,
        };
        (report, self.issues)
    }

    fn walk(&mut self, lo: f64, hi: f64) -> Option<()> {
        let mut upper = self.point(lo)?;
        while upper.v < hi {
            let lower = upper;
            upper = self.point((2.0 * lower.v).min(hi))?;
            if upper.signature != lower.signature {
                let at = self.bisect(&lower, &upper)?;
                self.inspect(at, lo, hi)?;
            }
        }
        Some(())
    }

    /// Narrows `[lower, upper]` onto the earliest change of signature.
    fn bisect(&mut self, lower: &Point, upper: &Point) -> Option<f64> {
        let res = self.spec.resolution;
        let (mut v0, mut v1) = (lower.v, upper.v);
        let reference = lower.signature;
        for _ in 0..BISECTION_LIMIT {
            let v2 = 0.5 * (v0 + v1);
            if v1 - v0 < res * v2 {
                return Some(v2);
            }
            let mid = self.point(v2)?;
            if mid.signature == reference {
                v0 = v2;
            } else {
                v1 = v2;
            }
        }
        self.issues.push(ScanIssue::BisectionFailed {
            fixed: self.fixed,
            at: v0,
        });
        Some(0.5 * (v0 + v1))
    }

    fn inspect(&mut self, at: f64, lo: f64, hi: f64) -> Option<()> {
        let res = self.spec.resolution;
        let offsets = [-6.0, -2.0, 2.0, 6.0];
        let mut straddle = Vec::with_capacity(offsets.len());
        for offset in offsets {
            let v = (at * (1.0 + offset * res)).clamp(lo, hi);
            straddle.push(self.point(v)?);
        }
        let [p3, p4, p5, p6] = [&straddle[0], &straddle[1], &straddle[2], &straddle[3]];

        if p3.signature != p4.signature || p5.signature != p6.signature {
            self.issues.push(ScanIssue::UnexpectedChange {
                fixed: self.fixed,
                at,
            });
        }

        let steps = [p4.y - p3.y, p5.y - p4.y, p6.y - p5.y];
        let [s3, s4, s5] = steps;
        let slack = res * (p4.y.abs() + p5.y.abs());
        let alternating = (s3 < 0.0 && s5 < 0.0 && s4 > 0.0) || (s3 > 0.0 && s5 > 0.0 && s4 < 0.0);
        if alternating && s4.abs() > slack {
            self.issues.push(ScanIssue::NonMonotone {
                fixed: self.fixed,
                at,
                steps,
            });
        } else if s4.abs() > s3.abs() + s5.abs() + slack {
            self.issues.push(ScanIssue::Step {
                fixed: self.fixed,
                at,
                steps,
            });
        }

        let transition = Transition {
            at,
            before: p4.signature,
            after: p5.signature,
            steps,
        };
        let sides = [(p4.v, p4.y, p4.signature), (p5.v, p5.y, p5.signature)];
        self.transitions.push(transition);

        if self.spec.cross_check {
            for (v, y, signature) in sides {
                if matches!(signature.regime, Regime::LowSeries | Regime::HighSeries) {
                    self.cross_check(v, y);
                }
            }
        }
        Some(())
    }

    fn cross_check(&mut self, v: f64, y: f64) {
        match self.call(v, Strategy::Force(Regime::Quadrature)) {
            Ok(evaluation) => {
                let relative_error = (evaluation.value - y) / y;
                if relative_error.abs() > self.spec.resolution {
                    self.issues.push(ScanIssue::Discrepancy {
                        fixed: self.fixed,
                        at: v,
                        value: y,
                        quadrature: evaluation.value,
                        relative_error,
                    });
                }
            }
            Err(error) => self.issues.push(ScanIssue::QuadratureFailed {
                fixed: self.fixed,
                at: v,
                code: error.info().code.clone(),
            }),
        }
    }
}

impl Evaluator {
    /// Runs a continuity scan, one rayon task per slice.
    ///
    /// Only an invalid `spec` is an error; numerical anomalies, including
    /// failed evaluations, are collected in the report.
    pub fn scan(&self, spec: &ScanSpec) -> Result<ScanReport, KwwError> {
        spec.validate()?;
        let outcomes: Vec<(SliceReport, Vec<ScanIssue>)> = spec
            .slice_values()
            .into_par_iter()
            .map(|fixed| {
                Slice {
                    evaluator: self,
                    spec,
                    fixed,
                    evaluations: 0,
                    transitions: Vec::new(),
                    issues: Vec::new(),
                }
                .run()
            })
            .collect();

        let mut slices = Vec::with_capacity(outcomes.len());
        let mut issues = Vec::new();
        for (slice, slice_issues) in outcomes {
            slices.push(slice);
            issues.extend(slice_issues);
        }
        let report_hash = stable_hash_string(&HashView {
            spec,
            slices: &slices,
            issues: &issues,
        })?;
        tracing::debug!(
            slices = slices.len(),
            issues = issues.len(),
            hash = %report_hash,
            "scan finished"
        );
        Ok(ScanReport {
            spec: spec.clone(),
            slices,
            issues,
            report_hash,
        })
    }
}

/// Continuity scan with the default configuration.
pub fn scan_continuity(spec: &ScanSpec) -> Result<ScanReport, KwwError> {
    Evaluator::default().scan(spec)
}
