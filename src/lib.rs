pub mod augment;
pub mod catalog;
pub mod clean;
pub mod cli;
pub mod config;
pub mod error;
pub mod finalize;
pub mod frame;
pub mod join;
pub mod loader;
pub mod logging;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod rolling;
pub mod shift;
pub mod spreads;
pub mod store;
pub mod trim;
pub mod window;

pub use config::PipelineConfig;
pub use error::{DropReason, PipelineError};
pub use frame::{GameFrame, RowKey};
pub use loader::{RawTeamGame, RawValue};
pub use pipeline::{PipelineOutput, PipelineReport, run};
