//! Five-year revenue, cost and profit projection with IRR

mod engine;
mod schedule;
pub mod irr;

pub use engine::{
    project, ProjectionConfig, ProjectionEngine, ProjectionInputs, DEFAULT_ANNUAL_CMC_INR,
    DEFAULT_CMC_START_YEAR, DEFAULT_HORIZON_YEARS,
};
pub use irr::{compute_irr, solve_irr_guarded, IrrMethod};
pub use schedule::{ProjectionResult, ProjectionTotals, YearRow};
