//! Quadratic exp(x) approximation for softmax inputs.
//!
//! # Algorithm
//! 1. Compute z = floor(|x| / ln2), the number of halvings to take out
//! 2. Reduce p = x + z·ln2, so p lies in [-ln2, 0] for x ≤ 0
//! 3. Evaluate exp(p) ≈ k1·(p + bias1)² + bias2
//! 4. Reconstruct exp(x) ≈ that / 2^z
//!
//! The rescale is a plain division by `2^z`, not exponent-field manipulation.
//! Very negative inputs underflow to zero once `2^z` overflows.
//!
//! # Accuracy
//! Maximum relative error ≈ 0.31% on the softmax range [-10.5, 0).
//!
//! Positive inputs are outside the fitted domain: `z` comes from `|x|` but the
//! result is always divided by `2^z`, so `exp_poly(x)` underestimates `exp(x)`
//! there.

use log::trace;

use crate::constants::FitConstants;

/// Result of range reduction: `x = p - z·ln2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reduction {
    /// Non-negative, integer-valued halving count.
    pub z: f64,
    /// Reduced argument.
    pub p: f64,
}

/// Every intermediate of a single `exp_poly` evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpPolyTrace {
    pub x: f64,
    pub reduction: Reduction,
    /// Polynomial value before the `2^z` rescale.
    pub poly: f64,
    pub value: f64,
}

/// Floored division of `|x|` by `ln2`, taken from the fmod remainder.
///
/// `(|x| / ln2).floor()` rounds the quotient before flooring and lands one
/// step high at floating-point multiples of `ln2`; subtracting the exact
/// remainder first keeps `z·ln2 ≤ |x|`.
#[inline]
pub fn reduce(x: f64, constants: &FitConstants) -> Reduction {
    let a = x.abs();
    let z = ((a - a % constants.ln2) / constants.ln2).round();
    let p = x + z * constants.ln2;
    Reduction { z, p }
}

#[inline]
fn poly(p: f64, constants: &FitConstants) -> f64 {
    let shifted = p + constants.bias1;
    constants.k1 * shifted * shifted + constants.bias2
}

#[inline]
fn rescale(poly: f64, z: f64) -> f64 {
    poly / 2.0_f64.powf(z)
}

/// Approximates `exp(x)` for `x ≤ 0`.
#[inline]
pub fn exp_poly(x: f64, constants: &FitConstants) -> f64 {
    let Reduction { z, p } = reduce(x, constants);
    rescale(poly(p, constants), z)
}

/// Same computation as [`exp_poly`], returning the intermediates alongside.
pub fn exp_poly_traced(x: f64, constants: &FitConstants) -> ExpPolyTrace {
    let reduction = reduce(x, constants);
    let poly = poly(reduction.p, constants);
    ExpPolyTrace {
        x,
        reduction,
        poly,
        value: rescale(poly, reduction.z),
    }
}

/// Receives the reduced argument of every observed evaluation.
pub trait ReductionObserver {
    fn on_reduced(&mut self, x: f64, reduction: &Reduction);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ReductionObserver for NoopObserver {
    fn on_reduced(&mut self, _x: f64, _reduction: &Reduction) {}
}

/// Emits `p: <reduced>` at trace level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl ReductionObserver for LogObserver {
    fn on_reduced(&mut self, x: f64, reduction: &Reduction) {
        trace!("p: {:.5} (x: {:.5}, z: {})", reduction.p, x, reduction.z);
    }
}

impl ReductionObserver for Vec<Reduction> {
    fn on_reduced(&mut self, _x: f64, reduction: &Reduction) {
        self.push(*reduction);
    }
}

/// [`exp_poly_traced`] with the reduction reported to `observer`.
pub fn exp_poly_traced_observed<O>(
    x: f64,
    constants: &FitConstants,
    observer: &mut O,
) -> ExpPolyTrace
where
    O: ReductionObserver + ?Sized,
{
    let trace = exp_poly_traced(x, constants);
    observer.on_reduced(x, &trace.reduction);
    trace
}

/// [`exp_poly`] with the reduction reported to `observer`.
pub fn exp_poly_observed<O>(x: f64, constants: &FitConstants, observer: &mut O) -> f64
where
    O: ReductionObserver + ?Sized,
{
    exp_poly_traced_observed(x, constants, observer).value
}

/// `exp_poly` bound to a fixed set of constants.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ExpPoly {
    constants: FitConstants,
}

impl ExpPoly {
    pub fn new(constants: FitConstants) -> Self {
        Self { constants }
    }

    pub fn constants(&self) -> &FitConstants {
        &self.constants
    }

    #[inline]
    pub fn eval(&self, x: f64) -> f64 {
        exp_poly(x, &self.constants)
    }

    pub fn trace(&self, x: f64) -> ExpPolyTrace {
        exp_poly_traced(x, &self.constants)
    }

    pub fn trace_observed<O>(&self, x: f64, observer: &mut O) -> ExpPolyTrace
    where
        O: ReductionObserver + ?Sized,
    {
        exp_poly_traced_observed(x, &self.constants, observer)
    }
}

#[cfg(test)]
mod tests;
