//! Published double-precision values of the KWW transforms.

use kww_eval::{evaluate_imag, evaluate_primitive, evaluate_real};

const TOLERANCE: f64 = 1e-10;

fn check(label: &str, found: f64, expected: f64) {
    let relative = ((found - expected) / expected).abs();
    assert!(
        relative <= TOLERANCE,
        "{label}: found {found:e}, expected {expected:e}, relative error {relative:e}"
    );
}

#[test]
fn cosine_transform_reference_table() {
    // (omega, beta, value)
    let table = [
        (1e-6, 1.0, 0.999_999_999_999_000_022_1),
        (1e-3, 1.0, 0.999_999_000_000_999_949_1),
        (1.0, 1.0, 0.5),
        (1e3, 1.0, 9.999_990_000_010_000_613e-7),
        (1e6, 1.0, 9.999_999_999_989_999_315e-13),
        (1e-8, 0.623, 1.435_159_133_351_523_009),
        (1e-6, 0.623, 1.435_159_133_336_882_054),
        (1e-4, 0.623, 1.435_158_986_927_334_901),
        (1e-2, 0.623, 1.433_698_427_082_435_778),
        (1e-1, 0.623, 1.314_878_935_071_708_499),
        (1.0, 0.623, 0.330_832_368_709_959_412_4),
        (1e2, 0.623, 4.053_330_090_102_800_066e-4),
        (1e4, 0.623, 2.390_040_041_093_056_597e-7),
        (2e-5, 0.314, 7.602_900_889_248_060_956),
        (2e-4, 0.314, 7.594_626_504_743_104_078),
        (2e-3, 0.314, 7.148_958_376_075_823_296),
        (2e-2, 0.314, 3.922_292_835_319_648_674),
        (2e-1, 0.314, 0.817_267_826_027_595_067_9),
        (2.0, 0.314, 0.083_719_739_290_163_422_4),
    ];
    for (omega, beta, expected) in table {
        let found = evaluate_real(beta, omega).expect("cosine transform");
        check(&format!("cosine({beta}, {omega:e})"), found, expected);
    }
}

#[test]
fn sine_transform_reference_table() {
    let table = [
        (2e-5, 0.314, 0.014_529_054_983_500_095_18),
        (2e-3, 0.314, 1.114_725_403_689_666_55),
        (2e-1, 0.314, 1.202_467_631_193_444_353),
    ];
    for (omega, beta, expected) in table {
        let found = evaluate_imag(beta, omega).expect("sine transform");
        check(&format!("sine({beta}, {omega:e})"), found, expected);
    }
}

#[test]
fn primitive_reference_table() {
    let table = [
        (3e-3, 0.459, 0.007_116_055_704_011_668_009),
        (5e-3, 0.459, 0.011_851_306_851_639_757_67),
        (2e-2, 0.459, 0.046_682_856_808_955_515_43),
    ];
    for (omega, beta, expected) in table {
        let found = evaluate_primitive(beta, omega).expect("primitive");
        check(&format!("primitive({beta}, {omega:e})"), found, expected);
    }
}
