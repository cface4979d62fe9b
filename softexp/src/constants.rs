//! Fit constants of the quadratic exp approximation.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Natural log of 2, the range-reduction unit.
pub const LN2: f64 = std::f64::consts::LN_2;
/// Leading coefficient of the fitted quadratic.
pub const K1: f64 = 0.3585;
/// Argument shift of the fitted quadratic.
pub const BIAS1: f64 = 1.353;
/// Constant offset of the fitted quadratic.
pub const BIAS2: f64 = 0.344;

/// Parameters of `k1·(p + bias1)² + bias2` and the reduction unit `ln2`.
///
/// Missing fields fall back to the default fit when deserializing, so a
/// constants file only needs to list the values it overrides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitConstants {
    pub ln2: f64,
    pub k1: f64,
    pub bias1: f64,
    pub bias2: f64,
}

impl Default for FitConstants {
    fn default() -> Self {
        Self {
            ln2: LN2,
            k1: K1,
            bias1: BIAS1,
            bias2: BIAS2,
        }
    }
}

impl FitConstants {
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("ln2", self.ln2),
            ("k1", self.k1),
            ("bias1", self.bias1),
            ("bias2", self.bias2),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(Error::NonFiniteConstant { name, value });
            }
        }
        if self.ln2 <= 0.0 {
            return Err(Error::NonPositiveLn2(self.ln2));
        }

        Ok(())
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fit constants from {}", path.display()))?;

        Self::from_yaml(&yaml)
            .with_context(|| format!("Invalid fit constants in {}", path.display()))
    }

    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        let constants: FitConstants = serde_yml::from_str(yaml)?;

        constants.validate()?;

        Ok(constants)
    }

    pub fn to_yaml(&self) -> String {
        serde_yml::to_string(self).expect("fit constants should always serialize")
    }
}
