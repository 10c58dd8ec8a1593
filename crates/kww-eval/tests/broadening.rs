//! Shape of the loss peak as the relaxation is stretched.

use kww_eval::{evaluate_imag, evaluate_real};

const POINTS_PER_DECADE: i32 = 40;

struct Peak {
    omega: f64,
    height: f64,
    width_decades: f64,
}

fn loss_peak(beta: f64) -> Peak {
    let grid: Vec<f64> = (-6 * POINTS_PER_DECADE..=2 * POINTS_PER_DECADE)
        .map(|i| 10f64.powf(f64::from(i) / f64::from(POINTS_PER_DECADE)))
        .collect();
    let values: Vec<f64> = grid
        .iter()
        .map(|&omega| evaluate_imag(beta, omega).expect("loss"))
        .collect();
    let (top, &height) = values
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .expect("non-empty grid");
    let half = height / 2.0;
    let lo = (0..=top).rev().find(|&k| values[k] < half).expect("left flank");
    let hi = (top..values.len()).find(|&k| values[k] < half).expect("right flank");
    Peak {
        omega: grid[top],
        height,
        width_decades: (hi - lo) as f64 / f64::from(POINTS_PER_DECADE),
    }
}

#[test]
fn debye_peak_sits_at_unit_frequency() {
    let peak = loss_peak(1.0);
    assert!((peak.omega - 1.0).abs() < 1e-12);
    assert!((peak.height - 0.5).abs() < 1e-12);
    assert!((peak.width_decades - 1.15).abs() < 0.05);
}

#[test]
fn stretching_lowers_broadens_and_shifts_the_peak() {
    let betas = [1.0, 0.8, 0.5, 0.3];
    let peaks: Vec<(f64, Peak)> = betas.iter().map(|&beta| (beta, loss_peak(beta))).collect();
    for pair in peaks.windows(2) {
        let (beta_a, a) = (&pair[0].0, &pair[0].1);
        let (beta_b, b) = (&pair[1].0, &pair[1].1);
        assert!(b.omega < a.omega, "peak frequency beta {beta_a} -> {beta_b}");
        assert!(
            b.width_decades > a.width_decades + 0.1,
            "peak width beta {beta_a} -> {beta_b}"
        );
        // heights compared relative to the static value, which fixes the
        // area under the loss curve on a logarithmic axis
        let norm_a = a.height / evaluate_real(*beta_a, 0.0).expect("static");
        let norm_b = b.height / evaluate_real(*beta_b, 0.0).expect("static");
        assert!(norm_b < norm_a, "normalized height beta {beta_a} -> {beta_b}");
    }
}
