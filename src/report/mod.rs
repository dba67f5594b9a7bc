//! Report presentation: formatting rules, page content model, text output.
//!
//! We keep formatting code in one place so:
//! - page builders stay declarative
//! - every front-end formats numbers identically

pub mod format;
pub mod text;
pub mod view;

pub use format::*;
pub use view::{Bar, Block, Card, PageBody, PageView, Section, Table, Tone};
