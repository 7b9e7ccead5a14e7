//! IEDB Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared infrastructure for the IEDB export tools.
//!
//! # Overview
//!
//! - **Logging**: `tracing` subscriber setup driven by a [`logging::LogConfig`]
//!   that can be built in code and overridden from the environment.
//!
//! # Example
//!
//! ```no_run
//! use iedb_common::logging::{init_logging, LogConfig, LogLevel};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = LogConfig::builder().level(LogLevel::Debug).build().merge_env()?;
//!     let _guard = init_logging(&config)?;
//!     tracing::info!("ready");
//!     Ok(())
//! }
//! ```

pub mod logging;

pub use logging::{init_logging, LogConfig, LogGuard};
