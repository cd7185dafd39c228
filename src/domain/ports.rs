use crate::domain::model::{EstateAmount, HeirCensus, OutputFormat, SavedResult};
use crate::utils::error::Result;

/// Where the last computed result lives between sessions.
/// The engine never calls this; callers hand it results explicitly.
pub trait ResultStore: Send + Sync {
    fn save_last(&self, saved: &SavedResult) -> Result<()>;
    fn load_last(&self) -> Result<Option<SavedResult>>;
}

/// An input surface that can describe one calculation request.
pub trait ScenarioProvider {
    fn census(&self) -> HeirCensus;
    fn estate(&self) -> Result<EstateAmount>;
    fn minor_digits(&self) -> u32;
    fn output_format(&self) -> OutputFormat;
}
