//! Accuracy and behaviour tests for the quadratic exp approximation.

use common::FloatExt;

use super::*;
use crate::sweep::Sweep;

/// Max acceptable relative error (percent) on the softmax range.
/// Observed maximum is 0.307% at x = -7.5.
const MAX_REL_ERROR_PCT: f64 = 0.35;

fn rel_error_pct(actual: f64, expected: f64) -> f64 {
    actual.relative_diff(expected) * 100.0
}

#[test]
fn test_exp_poly_at_zero_is_close_to_one() {
    let result = exp_poly(0.0, &FitConstants::default());
    let err = rel_error_pct(result, 1.0);

    // The fit does not pass exactly through 1.
    assert_ne!(result, 1.0);
    assert!(
        err < MAX_REL_ERROR_PCT,
        "exp_poly(0) = {}, rel_error = {:.5}%",
        result,
        err
    );
}

#[test]
fn test_exp_poly_softmax_range_accuracy() {
    let constants = FitConstants::default();

    let mut max_err = 0.0f64;
    for x in Sweep::softmax().iter() {
        let approx = exp_poly(x, &constants);
        let exact = x.exp();
        let err = rel_error_pct(approx, exact);
        max_err = max_err.max(err);
        assert!(
            err < MAX_REL_ERROR_PCT,
            "exp_poly({}) = {}, expected {}, rel_error = {:.5}%",
            x,
            approx,
            exact,
            err
        );
    }
    println!("exp_poly max relative error: {:.5}%", max_err);
}

#[test]
fn test_exp_poly_decays_monotonically() {
    let constants = FitConstants::default();
    let values: Vec<(f64, f64)> = Sweep::softmax()
        .iter()
        .map(|x| (x, exp_poly(x, &constants)))
        .collect();

    for pair in values.windows(2) {
        let (x_lo, lo) = pair[0];
        let (x_hi, hi) = pair[1];
        assert!(
            lo < hi,
            "exp_poly({}) = {} should be below exp_poly({}) = {}",
            x_lo,
            lo,
            x_hi,
            hi
        );
    }
}

#[test]
fn test_exp_poly_is_deterministic() {
    let constants = FitConstants::default();
    for x in Sweep::softmax().iter() {
        let first = exp_poly(x, &constants);
        let second = exp_poly(x, &constants);
        assert_eq!(first.to_bits(), second.to_bits(), "x = {}", x);
    }
}

#[test]
fn test_exp_poly_minus_one() {
    let result = exp_poly(-1.0, &FitConstants::default());
    let err = rel_error_pct(result, (-1.0f64).exp());

    assert!((result - 0.37).abs() < 0.01, "exp_poly(-1) = {}", result);
    assert!(err < 5.0);
    assert!(err < MAX_REL_ERROR_PCT, "rel_error = {:.5}%", err);
}

#[test]
fn test_exp_poly_minus_five_uses_range_reduction() {
    let constants = FitConstants::default();
    let reduction = reduce(-5.0, &constants);
    assert_eq!(reduction.z, 7.0);

    let result = exp_poly(-5.0, &constants);
    let err = rel_error_pct(result, (-5.0f64).exp());
    assert!(
        err < MAX_REL_ERROR_PCT,
        "exp_poly(-5) = {}, rel_error = {:.5}%",
        result,
        err
    );
}

#[test]
fn test_reduce_keeps_p_within_one_ln2() {
    let constants = FitConstants::default();
    for x in Sweep::softmax().iter() {
        let Reduction { z, p } = reduce(x, &constants);
        assert!(z >= 0.0 && z.fract() == 0.0, "z = {} for x = {}", z, x);
        assert!(
            p <= 0.0 && p > -constants.ln2 - 1e-12,
            "p = {} out of (-ln2, 0] for x = {}",
            p,
            x
        );
    }
}

#[test]
fn test_reduce_known_values() {
    let constants = FitConstants::default();

    let r = reduce(-1.0, &constants);
    assert_eq!(r.z, 1.0);
    assert!(r.p.approximately_eq(-0.306_852_8));

    let r = reduce(-9.0, &constants);
    assert_eq!(r.z, 12.0);
    assert!((r.p - -0.68223).abs() < 1e-5, "p = {}", r.p);

    let r = reduce(-0.5, &constants);
    assert_eq!(r.z, 0.0);
    assert_eq!(r.p, -0.5);
}

#[test]
fn test_traced_matches_plain_evaluation() {
    let constants = FitConstants::default();
    for x in Sweep::softmax().iter() {
        let trace = exp_poly_traced(x, &constants);
        assert_eq!(trace.x, x);
        assert_eq!(trace.reduction, reduce(x, &constants));
        assert_eq!(trace.value.to_bits(), exp_poly(x, &constants).to_bits());
        assert_eq!(
            trace.value.to_bits(),
            (trace.poly / 2.0_f64.powf(trace.reduction.z)).to_bits()
        );
    }
}

#[test]
fn test_observer_sees_every_reduction() {
    let constants = FitConstants::default();
    let mut seen: Vec<Reduction> = Vec::new();

    let values: Vec<f64> = [-3.0, -1.0, -0.5]
        .iter()
        .map(|&x| exp_poly_observed(x, &constants, &mut seen))
        .collect();

    assert_eq!(seen.len(), 3);
    assert_eq!(seen[1], reduce(-1.0, &constants));
    assert_eq!(values[1], exp_poly(-1.0, &constants));
}

#[test]
fn test_observers_do_not_change_the_result() {
    let constants = FitConstants::default();
    let plain = exp_poly(-2.5, &constants);

    assert_eq!(exp_poly_observed(-2.5, &constants, &mut NoopObserver), plain);
    assert_eq!(exp_poly_observed(-2.5, &constants, &mut LogObserver), plain);

    let observer: &mut dyn ReductionObserver = &mut NoopObserver;
    assert_eq!(exp_poly_observed(-2.5, &constants, observer), plain);
}

#[test]
fn test_injected_constants_drive_the_result() {
    // A flat polynomial leaves only the 2^-z staircase.
    let constants = FitConstants {
        k1: 0.0,
        bias2: 1.0,
        ..Default::default()
    };
    assert_eq!(exp_poly(-0.5, &constants), 1.0);
    assert_eq!(exp_poly(-1.0, &constants), 0.5);
    assert_eq!(exp_poly(-1.4, &constants), 0.25);
}

#[test]
fn test_exp_poly_struct_matches_free_function() {
    let kernel = ExpPoly::default();
    assert_eq!(kernel.constants(), &FitConstants::default());
    for x in Sweep::softmax().iter() {
        assert_eq!(kernel.eval(x), exp_poly(x, kernel.constants()));
        assert_eq!(kernel.trace(x).value, kernel.eval(x));
    }
}

#[test]
fn test_very_negative_input_underflows_to_zero() {
    let constants = FitConstants::default();
    for x in [-100.0, -745.0, -1000.0] {
        let result = exp_poly(x, &constants);
        assert!(
            result.is_finite() && result >= 0.0,
            "exp_poly({}) = {}",
            x,
            result
        );
        assert!(result < 1e-40, "exp_poly({}) = {}", x, result);
    }
}

#[test]
fn test_positive_input_underestimates() {
    // Outside the fitted domain the rescale still divides by 2^z.
    let constants = FitConstants::default();
    let result = exp_poly(1.0, &constants);
    assert!((result - 1.835_263).abs() < 1e-5, "exp_poly(1) = {}", result);
    assert!(result < 1.0f64.exp());
}

#[test]
fn test_reduce_at_exact_multiples_of_ln2() {
    let constants = FitConstants::default();
    let x = -3.0 * constants.ln2;
    assert_eq!(x, -2.0794415416798357);

    let r = reduce(x, &constants);
    assert_eq!(r.z, 2.0, "floored quotient must not round up to 3");
    assert!((r.p + constants.ln2).abs() < 1e-12, "p = {}", r.p);

    let result = exp_poly(x, &constants);
    assert!(
        (result - 0.125_023_239_745).abs() < 1e-10,
        "exp_poly(-3·ln2) = {}",
        result
    );
}

#[test]
fn test_reduce_never_overshoots_multiples_of_ln2() {
    let constants = FitConstants::default();
    for n in 1..=2000 {
        let x = -(n as f64 * constants.ln2);
        let Reduction { z, p } = reduce(x, &constants);
        assert!(
            z == n as f64 || z == (n - 1) as f64,
            "z = {} for x = -{}·ln2",
            z,
            n
        );
        assert!(z * constants.ln2 <= x.abs(), "z·ln2 exceeds |x| at n = {}", n);
        assert!(
            p <= 0.0 && p >= -constants.ln2 - 1e-12,
            "p = {} for x = -{}·ln2",
            p,
            n
        );
    }
}

#[test]
fn test_traced_observed_reports_and_returns_trace() {
    let constants = FitConstants::default();
    let mut seen: Vec<Reduction> = Vec::new();

    let trace = exp_poly_traced_observed(-4.0, &constants, &mut seen);

    assert_eq!(trace, exp_poly_traced(-4.0, &constants));
    assert_eq!(seen, vec![trace.reduction]);
    assert_eq!(ExpPoly::new(constants).trace_observed(-4.0, &mut seen), trace);
    assert_eq!(seen.len(), 2);
}
