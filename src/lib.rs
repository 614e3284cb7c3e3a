pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::{CliConfig, Command};

pub use adapters::state_file::FileStateStore;
pub use config::{manifest::Manifest, ProviderConfig};
pub use core::{
    client::HttpVpcClient,
    engine::{PlannedChange, ProviderEngine},
    provider::Provider,
    resource::{plan, PlanAction, VpcResource},
    session::{configure, Session},
};
pub use domain::diagnostics::{Diagnostic, Diagnostics, Severity};
pub use domain::model::VpcState;
pub use utils::casing::SnakeCaseJson;
pub use utils::error::{ProviderError, Result};
