use crate::domain::model::{DecedentSex, EstateAmount, HeirCensus, OutputFormat, MAX_MINOR_DIGITS};
use crate::domain::ports::ScenarioProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "faraid-calc")]
#[command(about = "Compute Islamic inheritance (Faraid) shares for a nuclear family")]
pub struct CliConfig {
    /// Sex of the decedent
    #[arg(long, value_enum, default_value = "male")]
    pub sex: DecedentSex,

    #[arg(long, default_value = "0")]
    pub husband: u32,

    #[arg(long, default_value = "0")]
    pub wife: u32,

    #[arg(long, default_value = "0")]
    pub son: u32,

    #[arg(long, default_value = "0")]
    pub daughter: u32,

    #[arg(long, default_value = "0")]
    pub father: u32,

    #[arg(long, default_value = "0")]
    pub mother: u32,

    /// Estate value in major units, e.g. 8000.00
    #[arg(long, default_value = "0")]
    pub estate: String,

    /// Decimal places of the currency's minor unit
    #[arg(long, default_value = "2")]
    pub minor_digits: u32,

    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Directory holding the last saved result
    #[arg(long, default_value = "./.faraid")]
    pub state_dir: String,

    /// Save the computed result to the state directory
    #[arg(long)]
    pub save: bool,

    /// Print the last saved result instead of computing
    #[arg(long)]
    pub show_last: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}

impl ScenarioProvider for CliConfig {
    fn census(&self) -> HeirCensus {
        HeirCensus {
            decedent_sex: self.sex,
            husband: self.husband,
            wife: self.wife,
            son: self.son,
            daughter: self.daughter,
            father: self.father,
            mother: self.mother,
        }
    }

    fn estate(&self) -> Result<EstateAmount> {
        EstateAmount::from_major_units(&self.estate, self.minor_digits)
    }

    fn minor_digits(&self) -> u32 {
        self.minor_digits
    }

    fn output_format(&self) -> OutputFormat {
        self.format
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_range("minor_digits", self.minor_digits, 0, MAX_MINOR_DIGITS)?;
        validation::validate_path("state_dir", &self.state_dir)?;
        if self.show_last {
            return Ok(());
        }
        validation::validate_non_empty_string("estate", &self.estate)?;
        self.census().validate()?;
        self.estate().map(|_| ())
    }
}
