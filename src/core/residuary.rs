use crate::core::fixed_share::Allotment;
use crate::domain::fraction::Fraction;
use crate::domain::model::{HeirCategory, HeirCensus};
use crate::utils::error::{FaraidError, Result};

/// Which residuary (Asabah) branch applies. Exactly one per census.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResiduaryBranch {
    /// Sons, optionally with daughters, share the residue 2:1.
    Children { sons: u32, daughters: u32 },
    /// No descendants: the father takes the whole residue.
    FatherAlone,
    /// Daughters only: the father's 1/6 line is topped up with the residue.
    FatherTopUp,
    /// Nobody qualifies; the residue becomes surplus.
    Unclaimed,
}

impl ResiduaryBranch {
    pub fn select(census: &HeirCensus) -> Self {
        match (census.son, census.father, census.daughter) {
            (sons @ 1.., _, daughters) => ResiduaryBranch::Children { sons, daughters },
            (0, 1.., 0) => ResiduaryBranch::FatherAlone,
            (0, 1.., _) => ResiduaryBranch::FatherTopUp,
            (0, 0, _) => ResiduaryBranch::Unclaimed,
        }
    }
}

fn integrity(message: impl Into<String>) -> FaraidError {
    FaraidError::ComputationIntegrity {
        message: message.into(),
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ResiduaryAllocator;

impl ResiduaryAllocator {
    pub fn new() -> Self {
        Self
    }

    /// Distributes `remainder` among the residuary heirs of `census`,
    /// appending to or updating `allotments`. Returns the part nobody took.
    pub fn allocate(
        &self,
        census: &HeirCensus,
        allotments: &mut Vec<Allotment>,
        remainder: Fraction,
    ) -> Result<Fraction> {
        let branch = ResiduaryBranch::select(census);
        tracing::debug!(branch = ?branch, remainder = %remainder, "allocating residue");

        match branch {
            ResiduaryBranch::Children { sons, daughters } => {
                let parts = 2 * u128::from(sons) + u128::from(daughters);
                let label = if daughters > 0 { "residue 2:1" } else { "residue" };

                let son_share = Fraction::new(2 * u128::from(sons), parts)
                    .and_then(|f| f.checked_mul(remainder))
                    .ok_or_else(|| integrity("cannot split residue among sons"))?;
                allotments.push(Allotment {
                    heir: HeirCategory::Son,
                    category: "son (residuary)".to_string(),
                    headcount: sons,
                    fraction_label: label.to_string(),
                    share: son_share,
                    awaits_residue: false,
                });

                if daughters > 0 {
                    let daughter_share = remainder
                        .checked_sub(son_share)
                        .ok_or_else(|| integrity("sons' residue exceeds the remainder"))?;
                    allotments.push(Allotment {
                        heir: HeirCategory::Daughter,
                        category: "daughter (residuary)".to_string(),
                        headcount: daughters,
                        fraction_label: label.to_string(),
                        share: daughter_share,
                        awaits_residue: false,
                    });
                }

                Ok(Fraction::ZERO)
            }
            ResiduaryBranch::FatherAlone => {
                allotments.push(Allotment {
                    heir: HeirCategory::Father,
                    category: "father (residuary)".to_string(),
                    headcount: 1,
                    fraction_label: "residue".to_string(),
                    share: remainder,
                    awaits_residue: false,
                });
                Ok(Fraction::ZERO)
            }
            ResiduaryBranch::FatherTopUp => {
                let father = allotments
                    .iter_mut()
                    .find(|a| a.heir == HeirCategory::Father && a.awaits_residue)
                    .ok_or_else(|| integrity("father's fixed share is missing"))?;

                father.share = father
                    .share
                    .checked_add(remainder)
                    .ok_or_else(|| integrity("fraction overflow merging father's residue"))?;
                father.category = format!("father (residuary + {})", father.fraction_label);
                father.fraction_label = format!("{} + residue", father.fraction_label);
                father.awaits_residue = false;
                Ok(Fraction::ZERO)
            }
            ResiduaryBranch::Unclaimed => Ok(remainder),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fixed_share::FixedShareCalculator;
    use crate::domain::model::DecedentSex;

    fn frac(n: u128, d: u128) -> Fraction {
        Fraction::new(n, d).unwrap()
    }

    #[test]
    fn test_branch_selection() {
        let base = HeirCensus::new(DecedentSex::Male);
        assert_eq!(
            ResiduaryBranch::select(&base.clone().with(HeirCategory::Son, 2)),
            ResiduaryBranch::Children {
                sons: 2,
                daughters: 0
            }
        );
        assert_eq!(
            ResiduaryBranch::select(&base.clone().with(HeirCategory::Father, 1)),
            ResiduaryBranch::FatherAlone
        );
        assert_eq!(
            ResiduaryBranch::select(
                &base
                    .clone()
                    .with(HeirCategory::Father, 1)
                    .with(HeirCategory::Daughter, 1)
            ),
            ResiduaryBranch::FatherTopUp
        );
        assert_eq!(
            ResiduaryBranch::select(&base.with(HeirCategory::Daughter, 3)),
            ResiduaryBranch::Unclaimed
        );
    }

    #[test]
    fn test_sons_and_daughters_split_two_to_one() {
        let census = HeirCensus::new(DecedentSex::Male)
            .with(HeirCategory::Son, 2)
            .with(HeirCategory::Daughter, 1);
        let mut allotments = Vec::new();

        let left = ResiduaryAllocator::new()
            .allocate(&census, &mut allotments, Fraction::ONE)
            .unwrap();

        assert!(left.is_zero());
        assert_eq!(allotments.len(), 2);
        assert_eq!(allotments[0].share, frac(4, 5));
        assert_eq!(allotments[0].headcount, 2);
        assert_eq!(allotments[1].share, frac(1, 5));
        assert_eq!(allotments[1].fraction_label, "residue 2:1");
    }

    #[test]
    fn test_father_top_up_merges_into_one_line() {
        let census = HeirCensus::new(DecedentSex::Male)
            .with(HeirCategory::Father, 1)
            .with(HeirCategory::Daughter, 1);
        let fixed = FixedShareCalculator::new().calculate(&census).unwrap();
        let mut allotments = fixed.allotments.clone();

        let left = ResiduaryAllocator::new()
            .allocate(&census, &mut allotments, fixed.remainder().unwrap())
            .unwrap();

        assert!(left.is_zero());
        let fathers: Vec<&Allotment> = allotments
            .iter()
            .filter(|a| a.heir == HeirCategory::Father)
            .collect();
        assert_eq!(fathers.len(), 1);
        assert_eq!(fathers[0].share, frac(1, 2));
        assert_eq!(fathers[0].category, "father (residuary + 1/6)");
    }

    #[test]
    fn test_unclaimed_residue_is_returned() {
        let census = HeirCensus::new(DecedentSex::Male).with(HeirCategory::Mother, 1);
        let mut allotments = Vec::new();
        let left = ResiduaryAllocator::new()
            .allocate(&census, &mut allotments, frac(2, 3))
            .unwrap();
        assert_eq!(left, frac(2, 3));
        assert!(allotments.is_empty());
    }
}
