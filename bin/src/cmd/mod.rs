//! CLI subcommand modules.
//!
//! This module contains the implementations for all laggard CLI subcommands.

pub(crate) mod backtest;
pub(crate) mod config;
pub(crate) mod fetch;
pub(crate) mod indicators;
pub(crate) mod screen;
pub(crate) mod variants;
