//! Library half of the `flux` binary: settings, logging and command runners.

pub mod commands;
pub mod config;
pub mod logging;
