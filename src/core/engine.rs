use crate::core::fixed_share::{Allotment, FixedShareCalculator};
use crate::core::residuary::ResiduaryAllocator;
use crate::core::surplus::SurplusTracker;
use crate::domain::fraction::Fraction;
use crate::domain::model::{DistributionResult, EstateAmount, HeirCensus, ShareEntry};
use crate::utils::error::{FaraidError, Result};
use crate::utils::validation::Validate;
use rust_decimal::Decimal;

/// Runs fixed shares, then the residue, then the surplus, and turns the exact
/// fractions into money. Stateless: every call builds a fresh result.
#[derive(Debug, Default, Clone, Copy)]
pub struct FaraidEngine {
    fixed: FixedShareCalculator,
    residuary: ResiduaryAllocator,
}

impl FaraidEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn compute(&self, census: &HeirCensus, estate: EstateAmount) -> Result<DistributionResult> {
        census.validate()?;

        tracing::debug!(
            decedent_sex = %census.decedent_sex,
            heirs = census.total_heirs(),
            estate = %estate,
            "computing distribution"
        );

        self.distribute(census, estate).inspect_err(|e| {
            if let FaraidError::ComputationIntegrity { message } = e {
                tracing::error!(census = ?census, estate = %estate, "integrity violation: {}", message);
            }
        })
    }

    fn distribute(&self, census: &HeirCensus, estate: EstateAmount) -> Result<DistributionResult> {
        let fixed = self.fixed.calculate(census)?;
        let remainder = fixed.remainder()?;

        let mut allotments = fixed.allotments;
        let unallocated = self.residuary.allocate(census, &mut allotments, remainder)?;

        let mut surplus = SurplusTracker::new();
        surplus.record(unallocated)?;

        let entries = round_allotments(&allotments, estate)?;
        let allocated: u64 = entries.iter().map(|e| e.group_amount).sum();
        let surplus_amount = surplus.settle(estate, allocated)?;

        let result = DistributionResult {
            total_estate: estate,
            entries,
            surplus_amount,
            unclaimed_share: surplus.unclaimed(),
        };

        if !result.is_conserved() {
            return Err(FaraidError::ComputationIntegrity {
                message: "allocated amounts and surplus do not add up to the estate".to_string(),
            });
        }

        tracing::info!(
            entries = result.entries.len(),
            allocated = allocated,
            surplus = result.surplus_amount,
            "distribution computed"
        );

        Ok(result)
    }
}

/// Converts exact shares into minor units.
///
/// Every line starts at the whole-unit floor of its exact amount. The units
/// still owed to the claimed part of the estate (rounded half up) then go to
/// the lines with the largest leftover fractions. Lines holding the same
/// share are paid together or not at all, so equal shares always get equal
/// amounts. Each line stays within one minor unit of its exact value, and
/// whatever is not handed out ends up in the surplus.
fn round_allotments(allotments: &[Allotment], estate: EstateAmount) -> Result<Vec<ShareEntry>> {
    let overflow = || FaraidError::ComputationIntegrity {
        message: "amount overflow while rounding shares".to_string(),
    };

    let mut claimed = Fraction::ZERO;
    let mut amounts = Vec::with_capacity(allotments.len());
    let mut leftovers = Vec::with_capacity(allotments.len());
    for allotment in allotments {
        claimed = claimed
            .checked_add(allotment.share)
            .filter(|c| !c.exceeds_one())
            .ok_or_else(|| FaraidError::ComputationIntegrity {
                message: format!("shares exceed the estate at the {} line", allotment.category),
            })?;
        let (whole, rest) = allotment
            .share
            .split_minor_units(estate.minor_units())
            .ok_or_else(overflow)?;
        amounts.push(whole);
        leftovers.push(rest);
    }

    let owed = claimed.of_minor_units(estate.minor_units()).ok_or_else(overflow)?;
    let mut spare = owed.saturating_sub(amounts.iter().sum());

    let mut order: Vec<usize> = (0..allotments.len())
        .filter(|&i| !leftovers[i].is_zero())
        .collect();
    order.sort_by(|&a, &b| {
        leftovers[b]
            .cmp(&leftovers[a])
            .then_with(|| allotments[b].share.cmp(&allotments[a].share))
    });
    for tied in order.chunk_by(|&a, &b| allotments[a].share == allotments[b].share) {
        let needed = tied.len() as u64;
        if needed > spare {
            continue;
        }
        for &i in tied {
            amounts[i] += 1;
        }
        spare -= needed;
    }

    Ok(allotments
        .iter()
        .zip(amounts)
        .map(|(allotment, group_amount)| ShareEntry {
            heir: allotment.heir,
            category: allotment.category.clone(),
            headcount: allotment.headcount,
            fraction_label: allotment.fraction_label.clone(),
            share: allotment.share,
            group_amount,
            per_person_amount: per_person(group_amount, allotment.headcount),
        })
        .collect())
}

fn per_person(group_amount: u64, headcount: u32) -> Decimal {
    if headcount == 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(group_amount) / Decimal::from(headcount)).round_dp(6)
}

/// Convenience wrapper around [`FaraidEngine::compute`].
pub fn compute(census: &HeirCensus, estate: EstateAmount) -> Result<DistributionResult> {
    FaraidEngine::new().compute(census, estate)
}
