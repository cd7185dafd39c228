use thiserror::Error;

#[derive(Error, Debug)]
pub enum FaraidError {
    #[error("Invalid heir census: field `{field}` = {value}: {reason}")]
    InvalidCensus {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Computation integrity violated: {message}")]
    ComputationIntegrity { message: String },

    #[error("Invalid estate amount `{value}`: {reason}")]
    InvalidAmount { value: String, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV rendering error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error in `{field}`: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid configuration value for `{field}` ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Internal,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl FaraidError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            FaraidError::InvalidCensus { .. } | FaraidError::InvalidAmount { .. } => {
                ErrorCategory::Input
            }
            FaraidError::ConfigValidationError { .. }
            | FaraidError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            FaraidError::ComputationIntegrity { .. } => ErrorCategory::Internal,
            FaraidError::IoError(_)
            | FaraidError::SerializationError(_)
            | FaraidError::CsvError(_) => ErrorCategory::Storage,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Medium,
            ErrorCategory::Internal => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            FaraidError::InvalidCensus { .. } => {
                "Check the heir counts: at most one father, mother and husband, at most four wives, and a spouse matching the decedent's sex"
            }
            FaraidError::InvalidAmount { .. } => {
                "Enter a non-negative estate amount with no more decimal places than the currency allows"
            }
            FaraidError::ComputationIntegrity { .. } => {
                "The fixed shares for this family exceed the estate; this case needs proportional reduction (awl), which is not supported"
            }
            FaraidError::ConfigValidationError { .. }
            | FaraidError::InvalidConfigValueError { .. } => {
                "Review the scenario file or command line flags"
            }
            FaraidError::IoError(_) => "Check that the state directory exists and is writable",
            FaraidError::SerializationError(_) => {
                "The saved result could not be read; delete it and compute again"
            }
            FaraidError::CsvError(_) => "Try a different output format",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            FaraidError::InvalidCensus { field, reason, .. } => {
                format!("The heir census is invalid ({}): {}", field, reason)
            }
            FaraidError::InvalidAmount { value, reason } => {
                format!("The estate amount '{}' is invalid: {}", value, reason)
            }
            FaraidError::ComputationIntegrity { .. } => {
                "The distribution could not be computed for this family".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FaraidError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integrity_errors_are_critical() {
        let err = FaraidError::ComputationIntegrity {
            message: "used fraction 5/4 exceeds the estate".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Internal);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_census_error_names_field() {
        let err = FaraidError::InvalidCensus {
            field: "wife".to_string(),
            value: "5".to_string(),
            reason: "at most 4 wives".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Input);
        assert!(err.to_string().contains("`wife`"));
        assert!(err.user_friendly_message().contains("wife"));
    }

    #[test]
    fn test_every_error_maps_to_a_failing_severity() {
        let storage = FaraidError::IoError(std::io::Error::other("disk full"));
        assert_eq!(storage.severity(), ErrorSeverity::Medium);

        let config = FaraidError::ConfigValidationError {
            field: "scenario.name".to_string(),
            message: "empty".to_string(),
        };
        assert_eq!(config.severity(), ErrorSeverity::High);
        assert!(ErrorSeverity::Medium < ErrorSeverity::High);
        assert!(ErrorSeverity::High < ErrorSeverity::Critical);
    }
}
