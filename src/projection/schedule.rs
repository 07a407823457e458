//! Year-by-year schedule and totals produced by a projection

use serde::{Deserialize, Serialize};

/// A single row of the projection schedule for one year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearRow {
    #[serde(rename = "Year")]
    pub year: u32,
    #[serde(rename = "Procedures")]
    pub procedures: f64,
    #[serde(rename = "RevenueINR")]
    pub revenue_inr: f64,
    #[serde(rename = "ConsumablesINR")]
    pub consumables_inr: f64,
    #[serde(rename = "CmcINR")]
    pub cmc_inr: f64,
    #[serde(rename = "ProfitINR")]
    pub profit_inr: f64,
}

/// Aggregates over the whole horizon
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionTotals {
    pub total_procedures: f64,

    /// Inflow over the horizon
    pub total_revenue_inr: f64,
    pub total_consumables_inr: f64,

    /// Sum of all CMC charges
    pub total_cmc_inr: f64,
    pub total_profit_inr: f64,

    /// Investment plus every CMC charge
    pub total_outflow_inr: f64,

    /// IRR of the cash-flow series in percent
    pub irr_percent: f64,

    /// First year whose cumulative cash flow, outlay included, is non-negative
    pub payback_year: Option<u32>,
}

/// Complete projection result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub rows: Vec<YearRow>,

    /// Series the IRR was solved on; index 0 is year 1 net of the investment
    pub cashflows: Vec<f64>,

    pub totals: ProjectionTotals,
}

impl ProjectionResult {
    /// Cumulative cash flow at the end of each year
    pub fn cumulative_cashflows(&self) -> Vec<f64> {
        self.cashflows
            .iter()
            .scan(0.0, |acc, &cf| {
                *acc += cf;
                Some(*acc)
            })
            .collect()
    }

    pub fn row(&self, year: u32) -> Option<&YearRow> {
        self.rows.iter().find(|r| r.year == year)
    }
}

/// First 1-indexed year whose running total is non-negative
pub(crate) fn payback_year(cashflows: &[f64]) -> Option<u32> {
    let mut cumulative = 0.0;
    for (i, cf) in cashflows.iter().enumerate() {
        cumulative += cf;
        if cumulative >= 0.0 {
            return Some(i as u32 + 1);
        }
    }
    None
}
