//! Core projection engine for the five-year procedure schedule

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::irr::{compute_irr, solve_irr_guarded, IrrMethod};
use super::schedule::{payback_year, ProjectionResult, ProjectionTotals, YearRow};
use crate::investment::InvestmentHandoff;

/// Annual comprehensive maintenance contract charge
pub const DEFAULT_ANNUAL_CMC_INR: f64 = 11_800_000.0;

/// First year the CMC is charged
pub const DEFAULT_CMC_START_YEAR: u32 = 2;

/// Projection horizon in years
pub const DEFAULT_HORIZON_YEARS: u32 = 5;

/// Raw inputs collected on the projection screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectionInputs {
    /// Procedures per month in year 1
    pub monthly_procedures_year1: f64,

    /// Amount billed per procedure in INR
    pub billing_per_procedure_inr: f64,
}

/// Configuration for a projection run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    /// Number of years to project
    pub horizon_years: u32,

    /// Annual CMC charge in INR
    pub annual_cmc_inr: f64,

    /// First year the CMC applies (1-indexed)
    pub cmc_start_year: u32,

    /// IRR routine
    pub irr_method: IrrMethod,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            horizon_years: DEFAULT_HORIZON_YEARS,
            annual_cmc_inr: DEFAULT_ANNUAL_CMC_INR,
            cmc_start_year: DEFAULT_CMC_START_YEAR,
            irr_method: IrrMethod::NewtonRaphson,
        }
    }
}

impl ProjectionConfig {
    /// Number of years in the horizon that carry a CMC charge
    pub fn cmc_years(&self) -> u32 {
        (self.horizon_years + 1).saturating_sub(self.cmc_start_year.max(1))
    }

    fn cmc_for_year(&self, year: u32) -> f64 {
        if year >= self.cmc_start_year {
            self.annual_cmc_inr
        } else {
            0.0
        }
    }
}

/// Main projection engine
#[derive(Debug, Clone, Default)]
pub struct ProjectionEngine {
    config: ProjectionConfig,
}

impl ProjectionEngine {
    /// Create a new projection engine with given config
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Run the projection for one handoff and one set of screen inputs
    pub fn project(
        &self,
        handoff: &InvestmentHandoff,
        inputs: &ProjectionInputs,
    ) -> ProjectionResult {
        let years = self.config.horizon_years as usize;
        let mut rows = Vec::with_capacity(years);
        let mut cashflows = Vec::with_capacity(years);

        let mut total_procedures = 0.0;
        let mut total_revenue = 0.0;
        let mut total_consumables = 0.0;
        let mut total_cmc = 0.0;
        let mut total_profit = 0.0;

        for year in 1..=self.config.horizon_years {
            let row = self.calculate_year(year, handoff, inputs);

            total_procedures += row.procedures;
            total_revenue += row.revenue_inr;
            total_consumables += row.consumables_inr;
            total_cmc += row.cmc_inr;
            total_profit += row.profit_inr;

            // Initial outlay lands in year 1
            let cashflow = if year == 1 {
                -handoff.investment_inr + row.profit_inr
            } else {
                row.profit_inr
            };
            cashflows.push(cashflow);
            rows.push(row);
        }

        let irr_percent = self.irr(&cashflows) * 100.0;
        let total_outflow =
            handoff.investment_inr + self.config.annual_cmc_inr * self.config.cmc_years() as f64;

        debug!(
            "Projected {} years: revenue={} profit={} irr={}%",
            years, total_revenue, total_profit, irr_percent
        );

        let totals = ProjectionTotals {
            total_procedures,
            total_revenue_inr: total_revenue,
            total_consumables_inr: total_consumables,
            total_cmc_inr: total_cmc,
            total_profit_inr: total_profit,
            total_outflow_inr: total_outflow,
            irr_percent,
            payback_year: payback_year(&cashflows),
        };

        ProjectionResult { rows, cashflows, totals }
    }

    /// Calculate the schedule row for a single year
    fn calculate_year(
        &self,
        year: u32,
        handoff: &InvestmentHandoff,
        inputs: &ProjectionInputs,
    ) -> YearRow {
        // Annualised volume scales with the year index itself
        let procedures = inputs.monthly_procedures_year1 * 12.0 * year as f64;
        let revenue_inr = procedures * inputs.billing_per_procedure_inr;
        let consumables_inr = procedures * handoff.consumable_per_procedure_inr;
        let cmc_inr = self.config.cmc_for_year(year);
        let profit_inr = revenue_inr - consumables_inr - cmc_inr;

        YearRow {
            year,
            procedures,
            revenue_inr,
            consumables_inr,
            cmc_inr,
            profit_inr,
        }
    }

    fn irr(&self, cashflows: &[f64]) -> f64 {
        let rate = match self.config.irr_method {
            IrrMethod::NewtonRaphson => compute_irr(cashflows),
            IrrMethod::Guarded => solve_irr_guarded(cashflows).unwrap_or(f64::NAN),
        };

        if !rate.is_finite() {
            warn!(
                "IRR did not resolve to a finite rate ({:?}) for cashflows {:?}",
                rate, cashflows
            );
        }

        rate
    }
}

/// Project with the standard five-year configuration
pub fn project(handoff: &InvestmentHandoff, inputs: &ProjectionInputs) -> ProjectionResult {
    ProjectionEngine::default().project(handoff, inputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn reference_handoff() -> InvestmentHandoff {
        InvestmentHandoff {
            investment_inr: 160_000_000.0,
            consumable_per_procedure_inr: 101_920.0,
        }
    }

    #[test]
    fn test_reference_schedule() {
        let result = project(
            &reference_handoff(),
            &ProjectionInputs {
                monthly_procedures_year1: 100.0,
                billing_per_procedure_inr: 200_000.0,
            },
        );

        assert_eq!(result.rows.len(), 5);

        let y1 = result.row(1).unwrap();
        assert_eq!(y1.procedures, 1200.0);
        assert_eq!(y1.revenue_inr, 240_000_000.0);
        assert_eq!(y1.consumables_inr, 122_304_000.0);
        assert_eq!(y1.cmc_inr, 0.0);
        assert_eq!(y1.profit_inr, 117_696_000.0);

        let y5 = result.row(5).unwrap();
        assert_eq!(y5.procedures, 6000.0);
        assert_eq!(y5.cmc_inr, 11_800_000.0);
        assert_eq!(y5.profit_inr, 576_680_000.0);

        assert_eq!(result.cashflows[0], -42_304_000.0);
        assert_eq!(result.cashflows[1], 223_592_000.0);

        assert_eq!(result.totals.total_procedures, 18_000.0);
        assert_eq!(result.totals.total_cmc_inr, 47_200_000.0);
        assert_eq!(result.totals.total_outflow_inr, 207_200_000.0);
        assert_relative_eq!(result.totals.irr_percent, 576.026_28, epsilon = 1e-3);
        assert_eq!(result.totals.payback_year, Some(2));
    }

    #[test]
    fn test_totals_are_row_sums() {
        let result = project(
            &reference_handoff(),
            &ProjectionInputs {
                monthly_procedures_year1: 37.0,
                billing_per_procedure_inr: 150_000.0,
            },
        );
        let revenue: f64 = result.rows.iter().map(|r| r.revenue_inr).sum();
        let profit: f64 = result.rows.iter().map(|r| r.profit_inr).sum();
        assert_relative_eq!(result.totals.total_revenue_inr, revenue);
        assert_relative_eq!(result.totals.total_profit_inr, profit);
    }

    #[test]
    fn test_custom_cmc_config() {
        let engine = ProjectionEngine::new(ProjectionConfig {
            horizon_years: 7,
            annual_cmc_inr: 1_000_000.0,
            cmc_start_year: 3,
            irr_method: IrrMethod::NewtonRaphson,
        });
        let result = engine.project(&reference_handoff(), &ProjectionInputs::default());

        assert_eq!(result.rows.len(), 7);
        assert_eq!(result.rows[1].cmc_inr, 0.0);
        assert_eq!(result.rows[2].cmc_inr, 1_000_000.0);
        assert_eq!(result.totals.total_outflow_inr, 160_000_000.0 + 5_000_000.0);
    }

    #[test]
    fn test_guarded_irr_unsolvable_is_nan() {
        let engine = ProjectionEngine::new(ProjectionConfig {
            irr_method: IrrMethod::Guarded,
            ..ProjectionConfig::default()
        });
        // Every cash flow is negative: no IRR exists
        let result = engine.project(&reference_handoff(), &ProjectionInputs::default());
        assert!(result.totals.irr_percent.is_nan());
        assert_eq!(result.totals.payback_year, None);
    }

    #[test]
    fn test_cmc_years() {
        assert_eq!(ProjectionConfig::default().cmc_years(), 4);
        let late = ProjectionConfig { cmc_start_year: 9, ..ProjectionConfig::default() };
        assert_eq!(late.cmc_years(), 0);
    }
}
