//! The `acsoap` command line.
//!
//! - `gm` / `batch-gm` run on a game-server host and talk to its SOAP port
//! - `remote` fans commands out to a configured host as a job
//! - `canned` wraps common GM operations

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod styles;
