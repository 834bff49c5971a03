#![warn(clippy::unwrap_used)]

//! TOML configuration for the mdio loader and saver.

pub mod config;
pub mod error;
pub mod settings;

pub use config::*;
pub use error::*;
pub use settings::*;
