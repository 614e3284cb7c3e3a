pub mod client;
pub mod data_source;
pub mod engine;
pub mod mapping;
pub mod provider;
pub mod resource;
pub mod session;

pub use crate::domain::ports::{StateStore, VpcApi};
pub use crate::utils::error::Result;
