use crate::domain::model::{EstateAmount, HeirCensus, OutputFormat, MAX_MINOR_DIGITS};
use crate::domain::ports::ScenarioProvider;
use crate::utils::error::{FaraidError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_MINOR_DIGITS: u32 = 2;
const DEFAULT_STATE_DIR: &str = "./.faraid";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub scenario: ScenarioInfo,
    pub estate: EstateConfig,
    pub census: HeirCensus,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioInfo {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstateConfig {
    pub amount: AmountValue,
    pub currency: Option<String>,
    pub minor_digits: Option<u32>,
}

/// Either a quoted decimal (`"8000.50"`) or a bare integer (`8000`).
/// Bare floats are rejected so no amount passes through binary floating point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountValue {
    Integer(u64),
    Text(String),
}

impl AmountValue {
    fn as_text(&self) -> String {
        match self {
            AmountValue::Integer(value) => value.to_string(),
            AmountValue::Text(value) => value.clone(),
        }
    }
}

impl EstateConfig {
    pub fn amount_text(&self) -> String {
        self.amount.as_text()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: Option<OutputFormat>,
    pub state_dir: Option<String>,
    pub save: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入情境
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(FaraidError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析情境
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| FaraidError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${ESTATE_AMOUNT})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| FaraidError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("scenario.name", &self.scenario.name)?;
        validation::validate_range(
            "estate.minor_digits",
            self.minor_digits(),
            0,
            MAX_MINOR_DIGITS,
        )?;
        if let Some(currency) = &self.estate.currency {
            validation::validate_non_empty_string("estate.currency", currency)?;
        }
        validation::validate_path("output.state_dir", &self.state_dir())?;

        self.census.validate()?;
        self.estate().map(|_| ())
    }

    pub fn currency(&self) -> Option<&str> {
        self.estate.currency.as_deref()
    }

    pub fn state_dir(&self) -> String {
        self.output
            .as_ref()
            .and_then(|o| o.state_dir.clone())
            .unwrap_or_else(|| DEFAULT_STATE_DIR.to_string())
    }

    pub fn save_enabled(&self) -> bool {
        self.output.as_ref().and_then(|o| o.save).unwrap_or(false)
    }
}

impl ScenarioProvider for TomlConfig {
    fn census(&self) -> HeirCensus {
        self.census.clone()
    }

    fn estate(&self) -> Result<EstateAmount> {
        EstateAmount::from_major_units(&self.estate.amount_text(), self.minor_digits())
    }

    fn minor_digits(&self) -> u32 {
        self.estate.minor_digits.unwrap_or(DEFAULT_MINOR_DIGITS)
    }

    fn output_format(&self) -> OutputFormat {
        self.output
            .as_ref()
            .and_then(|o| o.format)
            .unwrap_or_default()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
