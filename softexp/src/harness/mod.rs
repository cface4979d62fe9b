//! Compares `exp_poly` against `f64::exp` over an input sweep.
//!
//! The report is one block per input:
//!
//! ```text
//! p: -0.30685
//! x: -1.00000, exp(x): 0.36788, exp_poly(x): 0.36818, miss: 0.08047%
//!
//! ```

use std::fmt;
use std::io::{self, Write};

use log::debug;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::constants::FitConstants;
use crate::kernel::{ExpPoly, LogObserver, ReductionObserver};
use crate::sweep::Sweep;

/// `|reference - approximation| / reference · 100`.
#[inline]
pub fn relative_error_pct(reference: f64, approximation: f64) -> f64 {
    (reference - approximation).abs() / reference * 100.0
}

/// Outcome of evaluating a single input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record {
    pub x: f64,
    pub reference: f64,
    pub approximation: f64,
    /// Reduced argument `p` the kernel evaluated its polynomial at.
    pub reduced: f64,
    pub relative_error_pct: f64,
}

impl Record {
    pub fn write_block<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "p: {:.5}", self.reduced)?;
        writeln!(out, "{}", self)?;
        writeln!(out)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "x: {:.5}, exp(x): {:.5}, exp_poly(x): {:.5}, miss: {:.5}%",
            self.x, self.reference, self.approximation, self.relative_error_pct
        )
    }
}

/// Running aggregate over reported records.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub max_error_pct: f64,
    /// Input at which `max_error_pct` occurred.
    pub max_error_x: Option<f64>,
    pub total_error_pct: f64,
}

impl Summary {
    pub fn add(&mut self, record: &Record) {
        self.count += 1;
        self.total_error_pct += record.relative_error_pct;
        if self.max_error_x.is_none() || record.relative_error_pct > self.max_error_pct {
            self.max_error_pct = record.relative_error_pct;
            self.max_error_x = Some(record.x);
        }
    }

    pub fn mean_error_pct(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total_error_pct / self.count as f64
        }
    }
}

impl<'a> FromIterator<&'a Record> for Summary {
    fn from_iter<I: IntoIterator<Item = &'a Record>>(iter: I) -> Self {
        let mut summary = Summary::default();
        for record in iter {
            summary.add(record);
        }
        summary
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max_error_x {
            Some(x) => write!(
                f,
                "{} inputs, max miss {:.5}% at x = {:.5}, mean miss {:.5}%",
                self.count,
                self.max_error_pct,
                x,
                self.mean_error_pct()
            ),
            None => write!(f, "no inputs"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Harness {
    kernel: ExpPoly,
}

impl Harness {
    pub fn new(constants: FitConstants) -> Self {
        Self {
            kernel: ExpPoly::new(constants),
        }
    }

    pub fn kernel(&self) -> &ExpPoly {
        &self.kernel
    }

    /// Evaluates `x`, logging the reduction at trace level.
    pub fn evaluate(&self, x: f64) -> Record {
        self.evaluate_observed(x, &mut LogObserver)
    }

    pub fn evaluate_observed<O>(&self, x: f64, observer: &mut O) -> Record
    where
        O: ReductionObserver + ?Sized,
    {
        let trace = self.kernel.trace_observed(x, observer);
        let reference = x.exp();

        Record {
            x,
            reference,
            approximation: trace.value,
            reduced: trace.reduction.p,
            relative_error_pct: relative_error_pct(reference, trace.value),
        }
    }

    /// Lazily evaluates every input of `sweep`, in order.
    pub fn records(&self, sweep: &Sweep) -> impl Iterator<Item = Record> + '_ {
        sweep.iter().map(move |x| self.evaluate(x))
    }

    /// Evaluates `sweep` on the rayon pool. Same records, same order as [`Self::records`].
    pub fn records_par(&self, sweep: &Sweep) -> Vec<Record> {
        let sweep = *sweep;
        (0..sweep.len())
            .into_par_iter()
            .map(|index| self.evaluate(sweep.value_at(index)))
            .collect()
    }

    /// Writes the block of every input to `out` and returns the aggregate.
    pub fn report<W: Write + ?Sized>(&self, sweep: &Sweep, out: &mut W) -> io::Result<Summary> {
        let mut summary = Summary::default();
        for record in self.records(sweep) {
            record.write_block(out)?;
            summary.add(&record);
        }

        debug!("Reported {}", summary);

        Ok(summary)
    }
}
