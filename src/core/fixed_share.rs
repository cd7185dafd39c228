use crate::domain::fraction::Fraction;
use crate::domain::model::{DecedentSex, HeirCategory, HeirCensus};
use crate::utils::error::{FaraidError, Result};

/// A share of the estate held as an exact fraction, not yet turned into money.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allotment {
    pub heir: HeirCategory,
    pub category: String,
    pub headcount: u32,
    pub fraction_label: String,
    pub share: Fraction,
    /// Set on the father's fixed line when he also takes the residue.
    pub awaits_residue: bool,
}

impl Allotment {
    fn fixed(heir: HeirCategory, headcount: u32, share: Fraction) -> Self {
        Self {
            heir,
            category: heir.as_str().to_string(),
            headcount,
            fraction_label: share.to_string(),
            share,
            awaits_residue: false,
        }
    }
}

/// Fixed-share (Ashab al-Furud) rules, evaluated in `PRECEDENCE` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixedShareRule {
    Spouse,
    Mother,
    Father,
    Daughters,
}

impl FixedShareRule {
    pub const PRECEDENCE: [FixedShareRule; 4] = [
        FixedShareRule::Spouse,
        FixedShareRule::Mother,
        FixedShareRule::Father,
        FixedShareRule::Daughters,
    ];

    /// The allotment this rule claims for `census`, if its heirs are present.
    pub fn evaluate(self, census: &HeirCensus) -> Option<Allotment> {
        let has_descendant = census.has_descendant();

        match self {
            FixedShareRule::Spouse => {
                let heir = census.decedent_sex.spouse_category();
                let count = census.count(heir);
                if count == 0 {
                    return None;
                }
                let share = match (census.decedent_sex, has_descendant) {
                    (DecedentSex::Male, true) => ratio(1, 8),
                    (DecedentSex::Male, false) => ratio(1, 4),
                    (DecedentSex::Female, true) => ratio(1, 4),
                    (DecedentSex::Female, false) => ratio(1, 2),
                };
                Some(Allotment::fixed(heir, count, share))
            }
            FixedShareRule::Mother => {
                if census.mother == 0 {
                    return None;
                }
                let share = if has_descendant { ratio(1, 6) } else { ratio(1, 3) };
                Some(Allotment::fixed(HeirCategory::Mother, 1, share))
            }
            FixedShareRule::Father => {
                if census.father == 0 || !has_descendant {
                    // Without descendants the father is purely residuary.
                    return None;
                }
                let mut allotment = Allotment::fixed(HeirCategory::Father, 1, ratio(1, 6));
                allotment.awaits_residue = census.son == 0;
                Some(allotment)
            }
            FixedShareRule::Daughters => {
                if census.son > 0 || census.daughter == 0 {
                    return None;
                }
                let share = if census.daughter == 1 {
                    ratio(1, 2)
                } else {
                    ratio(2, 3)
                };
                Some(Allotment::fixed(
                    HeirCategory::Daughter,
                    census.daughter,
                    share,
                ))
            }
        }
    }
}

fn ratio(num: u128, den: u128) -> Fraction {
    // Only ever called with the literal Qur'anic denominators above.
    Fraction::new(num, den).unwrap_or(Fraction::ZERO)
}

/// Output of the fixed-share step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedShares {
    pub allotments: Vec<Allotment>,
    pub used: Fraction,
}

impl FixedShares {
    /// What is left for the residuary step.
    pub fn remainder(&self) -> Result<Fraction> {
        Fraction::ONE
            .checked_sub(self.used)
            .ok_or_else(|| FaraidError::ComputationIntegrity {
                message: format!("fixed shares use {} of the estate", self.used),
            })
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FixedShareCalculator;

impl FixedShareCalculator {
    pub fn new() -> Self {
        Self
    }

    pub fn calculate(&self, census: &HeirCensus) -> Result<FixedShares> {
        let mut allotments = Vec::new();
        let mut used = Fraction::ZERO;

        for rule in FixedShareRule::PRECEDENCE {
            let Some(allotment) = rule.evaluate(census) else {
                continue;
            };

            used = used.checked_add(allotment.share).ok_or_else(|| {
                FaraidError::ComputationIntegrity {
                    message: format!("fraction overflow while applying {:?} rule", rule),
                }
            })?;

            tracing::debug!(
                rule = ?rule,
                heir = %allotment.heir,
                headcount = allotment.headcount,
                share = %allotment.share,
                used = %used,
                "fixed share claimed"
            );

            if used.exceeds_one() {
                return Err(FaraidError::ComputationIntegrity {
                    message: format!(
                        "fixed shares reach {} of the estate after the {:?} rule",
                        used, rule
                    ),
                });
            }

            allotments.push(allotment);
        }

        Ok(FixedShares { allotments, used })
    }
}
