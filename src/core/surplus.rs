use crate::domain::fraction::Fraction;
use crate::domain::model::EstateAmount;
use crate::utils::error::{FaraidError, Result};

/// Keeps whatever no rule claimed. No radd: the surplus is reported, never
/// returned to the fixed-share heirs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurplusTracker {
    unclaimed: Fraction,
}

impl Default for SurplusTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl SurplusTracker {
    pub fn new() -> Self {
        Self {
            unclaimed: Fraction::ZERO,
        }
    }

    pub fn record(&mut self, fraction: Fraction) -> Result<()> {
        self.unclaimed = self.unclaimed.checked_add(fraction).ok_or_else(|| {
            FaraidError::ComputationIntegrity {
                message: "fraction overflow while recording surplus".to_string(),
            }
        })?;
        Ok(())
    }

    pub fn unclaimed(&self) -> Fraction {
        self.unclaimed
    }

    /// Minor units left over once `allocated` has been paid out. This covers
    /// both the unclaimed fraction and any rounding remainder.
    pub fn settle(&self, estate: EstateAmount, allocated: u64) -> Result<u64> {
        estate.minor_units().checked_sub(allocated).ok_or_else(|| {
            FaraidError::ComputationIntegrity {
                message: format!(
                    "allocated {} minor units out of an estate of {}",
                    allocated, estate
                ),
            }
        })
    }
}
