//! armory-import library
//!
//! Guild roster ingestion: Battle.net client, record mapper, import pipeline
//! and console rendering. The `armory-import` binary is a thin CLI over this.

pub mod client;
pub mod config;
pub mod display;
pub mod error;
pub mod mapper;
pub mod pipeline;

pub use crate::client::{ApiError, BattleNetClient, BattleNetEndpoints, ProfileSource};
pub use crate::error::{ImportError, ImportResult};
pub use crate::pipeline::{import_guild, ImportReport};
