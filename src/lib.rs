//! ROI Calculator - capital equipment investment and five-year return projection
//!
//! This library provides:
//! - Landed investment and per-procedure consumable cost derivation
//! - Five-year procedure, revenue, cost and profit schedule
//! - IRR via Newton-Raphson (plus an opt-in guarded solver)
//! - A two-state flow controller for the investment and projection screens
//! - Sensitivity sweeps over procedure volume and billing

pub mod error;
pub mod input;
pub mod investment;
pub mod projection;
pub mod flow;
pub mod format;
pub mod report;
pub mod scenario;
pub mod config;
pub mod ui_cli;

// Re-export commonly used types
pub use error::{Result, RoiError};
pub use investment::{derive_investment, InvestmentDerived, InvestmentHandoff, InvestmentInputs};
pub use projection::{
    compute_irr, project, ProjectionConfig, ProjectionEngine, ProjectionInputs, ProjectionResult,
    ProjectionTotals, YearRow,
};
pub use flow::{Field, FlowController, FlowState};
pub use scenario::ScenarioRunner;
