//! Core module for fathom
//!
//! Data model shared by the extractors, the locator and the engine.

mod types;

pub use types::*;
