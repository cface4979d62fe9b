//! Finite, restartable arithmetic input sequences.

use std::iter::FusedIterator;

use crate::error::{Error, Result};

pub const SOFTMAX_START: f64 = -10.5;
pub const SOFTMAX_END: f64 = 0.0;
pub const SOFTMAX_STEP: f64 = 0.5;

/// Half-open range `[start, end)` walked in increments of `step`.
///
/// The i-th value is `start + i·step`, computed from the index so that
/// long sweeps do not accumulate rounding drift.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sweep {
    start: f64,
    end: f64,
    step: f64,
}

impl Default for Sweep {
    fn default() -> Self {
        Self::softmax()
    }
}

impl Sweep {
    pub fn new(start: f64, end: f64, step: f64) -> Result<Self> {
        let invalid = |reason| Error::InvalidSweep {
            start,
            end,
            step,
            reason,
        };

        if !start.is_finite() || !end.is_finite() {
            return Err(invalid("bounds must be finite"));
        }
        if !step.is_finite() || step <= 0.0 {
            return Err(invalid("step must be finite and positive"));
        }

        Ok(Self { start, end, step })
    }

    /// `-10.5, -10.0, ..., -0.5`: the 21 inputs the approximation is validated on.
    pub fn softmax() -> Self {
        Self {
            start: SOFTMAX_START,
            end: SOFTMAX_END,
            step: SOFTMAX_STEP,
        }
    }

    pub fn start(&self) -> f64 {
        self.start
    }

    pub fn end(&self) -> f64 {
        self.end
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn len(&self) -> usize {
        let count = ((self.end - self.start) / self.step).ceil();
        if count > 0.0 {
            count as usize
        } else {
            0
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn value_at(&self, index: usize) -> f64 {
        self.start + index as f64 * self.step
    }

    pub fn iter(&self) -> SweepIter {
        SweepIter {
            sweep: *self,
            front: 0,
            back: self.len(),
        }
    }
}

impl IntoIterator for Sweep {
    type Item = f64;
    type IntoIter = SweepIter;

    fn into_iter(self) -> SweepIter {
        self.iter()
    }
}

impl IntoIterator for &Sweep {
    type Item = f64;
    type IntoIter = SweepIter;

    fn into_iter(self) -> SweepIter {
        self.iter()
    }
}

#[derive(Debug, Clone)]
pub struct SweepIter {
    sweep: Sweep,
    front: usize,
    back: usize,
}

impl Iterator for SweepIter {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.front >= self.back {
            return None;
        }
        let value = self.sweep.value_at(self.front);
        self.front += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl DoubleEndedIterator for SweepIter {
    fn next_back(&mut self) -> Option<f64> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        Some(self.sweep.value_at(self.back))
    }
}

impl ExactSizeIterator for SweepIter {}

impl FusedIterator for SweepIter {}
