use crate::domain::model::{HeirCategory, HeirCensus};
use crate::utils::error::{FaraidError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(FaraidError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(FaraidError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(FaraidError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(FaraidError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

pub fn validate_heir_count(category: HeirCategory, count: u32) -> Result<()> {
    match category.max_count() {
        Some(max) if count > max => Err(FaraidError::InvalidCensus {
            field: category.as_str().to_string(),
            value: count.to_string(),
            reason: format!("at most {} {} may be counted", max, category),
        }),
        _ => Ok(()),
    }
}

impl Validate for HeirCensus {
    fn validate(&self) -> Result<()> {
        for category in HeirCategory::ALL {
            validate_heir_count(category, self.count(category))?;
        }

        // Only the spouse category matching the decedent may be counted.
        let foreign_spouse = match self.decedent_sex.spouse_category() {
            HeirCategory::Wife => HeirCategory::Husband,
            _ => HeirCategory::Wife,
        };
        let count = self.count(foreign_spouse);
        if count > 0 {
            return Err(FaraidError::InvalidCensus {
                field: foreign_spouse.as_str().to_string(),
                value: count.to_string(),
                reason: format!(
                    "a {} decedent cannot leave a surviving {}",
                    self.decedent_sex, foreign_spouse
                ),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::DecedentSex;

    #[test]
    fn test_validate_range() {
        assert!(validate_range("minor_digits", 2, 0, 8).is_ok());
        assert!(validate_range("minor_digits", 9, 0, 8).is_err());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("state_dir", "./.faraid").is_ok());
        assert!(validate_path("state_dir", "").is_err());
        assert!(validate_path("state_dir", "bad\0path").is_err());
    }

    #[test]
    fn test_census_caps() {
        let ok = HeirCensus::new(DecedentSex::Male)
            .with(HeirCategory::Wife, 4)
            .with(HeirCategory::Son, 12)
            .with(HeirCategory::Father, 1)
            .with(HeirCategory::Mother, 1);
        assert!(ok.validate().is_ok());

        let five_wives = HeirCensus::new(DecedentSex::Male).with(HeirCategory::Wife, 5);
        match five_wives.validate() {
            Err(FaraidError::InvalidCensus { field, value, .. }) => {
                assert_eq!(field, "wife");
                assert_eq!(value, "5");
            }
            other => panic!("expected InvalidCensus, got {:?}", other),
        }

        let two_fathers = HeirCensus::new(DecedentSex::Female).with(HeirCategory::Father, 2);
        assert!(two_fathers.validate().is_err());
    }

    #[test]
    fn test_spouse_must_match_decedent_sex() {
        let husband_of_man = HeirCensus::new(DecedentSex::Male).with(HeirCategory::Husband, 1);
        match husband_of_man.validate() {
            Err(FaraidError::InvalidCensus { field, .. }) => assert_eq!(field, "husband"),
            other => panic!("expected InvalidCensus, got {:?}", other),
        }

        let wife_of_woman = HeirCensus::new(DecedentSex::Female).with(HeirCategory::Wife, 1);
        assert!(wife_of_woman.validate().is_err());

        let husband_of_woman = HeirCensus::new(DecedentSex::Female).with(HeirCategory::Husband, 1);
        assert!(husband_of_woman.validate().is_ok());
    }
}
