//! Scenario runner for sensitivity sweeps
//!
//! Freezes one investment handoff and projects a grid of procedure volumes
//! and billing rates against it. Each scenario is an independent pure
//! projection, so the grid is fanned out with rayon.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Result, RoiError};
use crate::investment::InvestmentHandoff;
use crate::projection::{ProjectionConfig, ProjectionEngine, ProjectionInputs, ProjectionTotals};

/// Most values a single range may expand to
pub const MAX_SWEEP_POINTS: usize = 10_000;

/// Most scenarios a grid may hold
pub const MAX_GRID_SCENARIOS: usize = 1_000_000;

/// Inclusive range of values stepped by a fixed increment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepRange {
    pub start: f64,
    pub end: f64,
    pub step: f64,
}

impl SweepRange {
    pub fn single(value: f64) -> Self {
        Self { start: value, end: value, step: 1.0 }
    }

    /// Expand into values; a non-positive step yields only `start`
    pub fn values(&self) -> Result<Vec<f64>> {
        if !self.start.is_finite() || !self.end.is_finite() {
            return Err(RoiError::InvalidSweep(format!(
                "range bounds must be finite, got {}:{}",
                self.start, self.end
            )));
        }
        if self.step <= 0.0 || !self.step.is_finite() || self.end < self.start {
            return Ok(vec![self.start]);
        }

        let span = (self.end - self.start) / self.step + 1e-9;
        if !span.is_finite() || span >= MAX_SWEEP_POINTS as f64 {
            return Err(RoiError::InvalidSweep(format!(
                "{}:{}:{} expands to more than {} points",
                self.start, self.end, self.step, MAX_SWEEP_POINTS
            )));
        }

        let count = span.floor() as usize + 1;
        Ok((0..count).map(|i| self.start + self.step * i as f64).collect())
    }
}

/// One point of the sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub inputs: ProjectionInputs,
    pub totals: ProjectionTotals,
}

#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    handoff: InvestmentHandoff,
    engine: ProjectionEngine,
}

impl ScenarioRunner {
    pub fn new(handoff: InvestmentHandoff, config: ProjectionConfig) -> Self {
        Self {
            handoff,
            engine: ProjectionEngine::new(config),
        }
    }

    /// Run a single scenario
    pub fn run(&self, inputs: &ProjectionInputs) -> ScenarioOutcome {
        ScenarioOutcome {
            inputs: *inputs,
            totals: self.engine.project(&self.handoff, inputs).totals,
        }
    }

    /// Run many scenarios; output order matches input order
    pub fn run_batch(&self, scenarios: &[ProjectionInputs]) -> Vec<ScenarioOutcome> {
        scenarios.par_iter().map(|inputs| self.run(inputs)).collect()
    }

    /// Cartesian grid, monthly procedures outer, billing inner
    pub fn run_grid(
        &self,
        monthly: &SweepRange,
        billing: &SweepRange,
    ) -> Result<Vec<ScenarioOutcome>> {
        let monthly_values = monthly.values()?;
        let billing_values = billing.values()?;

        let size = monthly_values.len() * billing_values.len();
        if size > MAX_GRID_SCENARIOS {
            return Err(RoiError::InvalidSweep(format!(
                "grid of {} scenarios exceeds {}",
                size, MAX_GRID_SCENARIOS
            )));
        }

        let scenarios: Vec<ProjectionInputs> = monthly_values
            .into_iter()
            .flat_map(|m| {
                billing_values.iter().map(move |&b| ProjectionInputs {
                    monthly_procedures_year1: m,
                    billing_per_procedure_inr: b,
                })
            })
            .collect();

        log::info!("Running {} scenarios", scenarios.len());
        Ok(self.run_batch(&scenarios))
    }
}
