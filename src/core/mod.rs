pub mod engine;
pub mod fixed_share;
pub mod residuary;
pub mod surplus;

pub use crate::domain::fraction::Fraction;
pub use crate::domain::model::{
    DecedentSex, DistributionResult, EstateAmount, HeirCategory, HeirCensus, ShareEntry,
};
pub use crate::domain::ports::{ResultStore, ScenarioProvider};
pub use crate::utils::error::Result;
