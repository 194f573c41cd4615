//! # Armory Common Library
//!
//! Shared code for the armory binaries including:
//! - Character record model
//! - SQLite store for the `characters` table
//! - Configuration loading and root folder resolution
//! - Slug normalization for Battle.net request paths

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod slug;

pub use error::{Error, Result};
pub use models::Character;
