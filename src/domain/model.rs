use crate::domain::fraction::Fraction;
use crate::utils::error::{FaraidError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The heir categories this engine knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeirCategory {
    Husband,
    Wife,
    Son,
    Daughter,
    Father,
    Mother,
}

impl HeirCategory {
    pub const ALL: [HeirCategory; 6] = [
        HeirCategory::Husband,
        HeirCategory::Wife,
        HeirCategory::Son,
        HeirCategory::Daughter,
        HeirCategory::Father,
        HeirCategory::Mother,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HeirCategory::Husband => "husband",
            HeirCategory::Wife => "wife",
            HeirCategory::Son => "son",
            HeirCategory::Daughter => "daughter",
            HeirCategory::Father => "father",
            HeirCategory::Mother => "mother",
        }
    }

    /// Upper bound on how many heirs of this category may be counted.
    pub fn max_count(&self) -> Option<u32> {
        match self {
            HeirCategory::Husband | HeirCategory::Father | HeirCategory::Mother => Some(1),
            HeirCategory::Wife => Some(4),
            HeirCategory::Son | HeirCategory::Daughter => None,
        }
    }
}

impl fmt::Display for HeirCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum DecedentSex {
    Male,
    Female,
}

impl DecedentSex {
    /// The spouse category a survivor of this decedent falls under.
    pub fn spouse_category(&self) -> HeirCategory {
        match self {
            DecedentSex::Male => HeirCategory::Wife,
            DecedentSex::Female => HeirCategory::Husband,
        }
    }
}

impl fmt::Display for DecedentSex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecedentSex::Male => f.write_str("male"),
            DecedentSex::Female => f.write_str("female"),
        }
    }
}

/// Surviving heirs of one decedent. Validated at the engine boundary
/// (see `Validate for HeirCensus`) and never mutated by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeirCensus {
    pub decedent_sex: DecedentSex,
    #[serde(default)]
    pub husband: u32,
    #[serde(default)]
    pub wife: u32,
    #[serde(default)]
    pub son: u32,
    #[serde(default)]
    pub daughter: u32,
    #[serde(default)]
    pub father: u32,
    #[serde(default)]
    pub mother: u32,
}

impl HeirCensus {
    pub fn new(decedent_sex: DecedentSex) -> Self {
        Self {
            decedent_sex,
            husband: 0,
            wife: 0,
            son: 0,
            daughter: 0,
            father: 0,
            mother: 0,
        }
    }

    pub fn with(mut self, category: HeirCategory, count: u32) -> Self {
        *self.count_mut(category) = count;
        self
    }

    pub fn count(&self, category: HeirCategory) -> u32 {
        match category {
            HeirCategory::Husband => self.husband,
            HeirCategory::Wife => self.wife,
            HeirCategory::Son => self.son,
            HeirCategory::Daughter => self.daughter,
            HeirCategory::Father => self.father,
            HeirCategory::Mother => self.mother,
        }
    }

    fn count_mut(&mut self, category: HeirCategory) -> &mut u32 {
        match category {
            HeirCategory::Husband => &mut self.husband,
            HeirCategory::Wife => &mut self.wife,
            HeirCategory::Son => &mut self.son,
            HeirCategory::Daughter => &mut self.daughter,
            HeirCategory::Father => &mut self.father,
            HeirCategory::Mother => &mut self.mother,
        }
    }

    pub fn has_descendant(&self) -> bool {
        self.son > 0 || self.daughter > 0
    }

    pub fn spouse_count(&self) -> u32 {
        self.count(self.decedent_sex.spouse_category())
    }

    pub fn total_heirs(&self) -> u64 {
        HeirCategory::ALL
            .iter()
            .map(|c| u64::from(self.count(*c)))
            .sum()
    }
}

pub const MAX_MINOR_DIGITS: u32 = 8;

/// A non-negative amount in minor currency units (e.g. cents).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EstateAmount(u64);

impl EstateAmount {
    pub const fn from_minor_units(units: u64) -> Self {
        Self(units)
    }

    pub const fn minor_units(&self) -> u64 {
        self.0
    }

    /// Parses a major-unit string such as `"8000.50"` into minor units,
    /// `minor_digits` being the currency's number of decimal places.
    pub fn from_major_units(value: &str, minor_digits: u32) -> Result<Self> {
        let invalid = |reason: String| FaraidError::InvalidAmount {
            value: value.to_string(),
            reason,
        };

        if minor_digits > MAX_MINOR_DIGITS {
            return Err(invalid(format!(
                "currencies with more than {} decimal places are not supported",
                MAX_MINOR_DIGITS
            )));
        }

        let amount: Decimal = value
            .trim()
            .parse()
            .map_err(|e| invalid(format!("not a decimal number: {}", e)))?;

        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(invalid("the estate cannot be negative".to_string()));
        }
        if amount.normalize().scale() > minor_digits {
            return Err(invalid(format!(
                "more than {} decimal places",
                minor_digits
            )));
        }

        let factor = Decimal::from_i128_with_scale(10_i128.pow(minor_digits), 0);
        let minor = amount
            .checked_mul(factor)
            .and_then(|m| u64::try_from(m.normalize()).ok())
            .ok_or_else(|| invalid("amount is too large".to_string()))?;

        Ok(Self(minor))
    }
}

impl fmt::Display for EstateAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One line of a distribution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareEntry {
    pub heir: HeirCategory,
    pub category: String,
    pub headcount: u32,
    pub fraction_label: String,
    /// Exact share of the estate before rounding.
    pub share: Fraction,
    pub group_amount: u64,
    /// `group_amount / headcount`; display only, not necessarily integral.
    pub per_person_amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionResult {
    pub total_estate: EstateAmount,
    pub entries: Vec<ShareEntry>,
    pub surplus_amount: u64,
    /// Exact estate fraction no heir claimed (rounding remainders excluded).
    pub unclaimed_share: Fraction,
}

impl DistributionResult {
    pub fn allocated_total(&self) -> u64 {
        self.entries.iter().map(|e| e.group_amount).sum()
    }

    pub fn is_conserved(&self) -> bool {
        self.allocated_total()
            .checked_add(self.surplus_amount)
            .is_some_and(|total| total == self.total_estate.minor_units())
    }

    pub fn entries_for(&self, heir: HeirCategory) -> impl Iterator<Item = &ShareEntry> {
        self.entries.iter().filter(move |e| e.heir == heir)
    }

    pub fn amount_for(&self, heir: HeirCategory) -> u64 {
        self.entries_for(heir).map(|e| e.group_amount).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
}

/// The blob handed to the persistence collaborator.
///
/// Amounts inside `result` are minor units, so the currency scale they were
/// computed with travels alongside them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedResult {
    pub saved_at: DateTime<Utc>,
    pub minor_digits: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    pub census: HeirCensus,
    pub result: DistributionResult,
}

impl SavedResult {
    pub fn new(census: HeirCensus, result: DistributionResult, minor_digits: u32) -> Self {
        Self {
            saved_at: Utc::now(),
            minor_digits,
            currency: None,
            census,
            result,
        }
    }

    pub fn with_currency(mut self, currency: Option<String>) -> Self {
        self.currency = currency;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_census_counts_by_category() {
        let census = HeirCensus::new(DecedentSex::Male)
            .with(HeirCategory::Wife, 2)
            .with(HeirCategory::Son, 3);

        assert_eq!(census.count(HeirCategory::Wife), 2);
        assert_eq!(census.count(HeirCategory::Son), 3);
        assert_eq!(census.count(HeirCategory::Husband), 0);
        assert_eq!(census.spouse_count(), 2);
        assert_eq!(census.total_heirs(), 5);
        assert!(census.has_descendant());
    }

    #[test]
    fn test_census_deserializes_with_defaults() {
        let census: HeirCensus =
            serde_json::from_str(r#"{"decedent_sex":"female","husband":1,"daughter":2}"#)
                .unwrap();
        assert_eq!(census.decedent_sex, DecedentSex::Female);
        assert_eq!(census.husband, 1);
        assert_eq!(census.daughter, 2);
        assert_eq!(census.son, 0);

        let unknown = serde_json::from_str::<HeirCensus>(
            r#"{"decedent_sex":"male","brother":1}"#,
        );
        assert!(unknown.is_err());
    }

    #[test]
    fn test_estate_from_major_units() {
        assert_eq!(
            EstateAmount::from_major_units("8000.00", 2).unwrap(),
            EstateAmount::from_minor_units(800_000)
        );
        assert_eq!(
            EstateAmount::from_major_units("12.5", 2).unwrap().minor_units(),
            1250
        );
        assert_eq!(EstateAmount::from_major_units("0", 2).unwrap().minor_units(), 0);
        assert_eq!(EstateAmount::from_major_units("1500", 0).unwrap().minor_units(), 1500);
    }

    #[test]
    fn test_estate_rejects_bad_input() {
        assert!(matches!(
            EstateAmount::from_major_units("-1", 2),
            Err(FaraidError::InvalidAmount { .. })
        ));
        assert!(EstateAmount::from_major_units("1.234", 2).is_err());
        assert!(EstateAmount::from_major_units("abc", 2).is_err());
    }

    #[test]
    fn test_spouse_category_follows_decedent_sex() {
        assert_eq!(DecedentSex::Male.spouse_category(), HeirCategory::Wife);
        assert_eq!(DecedentSex::Female.spouse_category(), HeirCategory::Husband);
        assert_eq!(HeirCategory::Wife.max_count(), Some(4));
        assert_eq!(HeirCategory::Son.max_count(), None);
    }
}
