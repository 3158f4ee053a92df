pub mod analysis;
pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod format;
pub mod fs;
pub mod lang;
pub mod runner;

// Re-export key items for convenience
pub use analysis::{RiskAssessment, RiskLevel};
pub use config::{EngineConfig, OutputFormat};
pub use core::{
    AnalysisEvent, DependencyMap, DependentFile, DependentScan, ExportedSymbol, ImpactReport,
    ImpactSummary, ImportCategory, ImportReference, SymbolKind, SymbolUsage,
};
pub use engine::Engine;
pub use error::{AnalysisError, Result};
pub use runner::{Request, run};
