pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::{storage::LocalStorage, toml_config::TomlConfig};

pub use crate::app::report::render;
pub use crate::core::engine::{compute, FaraidEngine};
pub use crate::domain::fraction::Fraction;
pub use crate::domain::model::{
    DecedentSex, DistributionResult, EstateAmount, HeirCategory, HeirCensus, OutputFormat,
    SavedResult, ShareEntry,
};
pub use crate::utils::error::{FaraidError, Result};
