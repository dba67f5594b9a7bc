//! `bot-or-top` library crate.
//!
//! The binary is a thin wrapper around this library so that:
//!
//! - page building and formatting are testable without a terminal
//! - the TUI and the text commands share one data layer

pub mod app;
pub mod chart;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod export;
pub mod pages;
pub mod report;
pub mod tui;
