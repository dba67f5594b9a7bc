//! Domain types used throughout the viewer.
//!
//! This module defines:
//!
//! - the typed JSON documents (`SummaryStats`, `HypothesisTests`, `ModelResults`, ...)
//! - presentation options (`FeatureImportanceOptions`)
//! - run configuration (`DataLocation`, `ReportConfig`)

pub mod types;

pub use types::*;
