//! Rendering of screen outputs as text, JSON or CSV

use std::io::Write;

use serde::Serialize;

use crate::error::Result;
use crate::format::{format_fixed2, format_inr, format_percent};
use crate::investment::{InvestmentDerived, InvestmentInputs};
use crate::projection::{ProjectionInputs, ProjectionResult};

/// Everything both screens show, in one serializable record
#[derive(Debug, Serialize)]
pub struct RoiReport<'a> {
    pub investment_inputs: &'a InvestmentInputs,
    pub investment: &'a InvestmentDerived,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection_inputs: Option<&'a ProjectionInputs>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection: Option<&'a ProjectionResult>,
}

/// Investment screen, read-only outputs
pub fn write_investment_text<W: Write>(out: &mut W, derived: &InvestmentDerived) -> Result<()> {
    writeln!(out, "System Investment Details")?;
    writeln!(
        out,
        "  Investment in INR:                    {}",
        format_inr(derived.investment_inr)
    )?;
    writeln!(
        out,
        "  Duties & Taxes (27.4%) in USD:        {}",
        format_fixed2(derived.duties_usd)
    )?;
    writeln!(
        out,
        "  Landed Kit Cost in USD:               {}",
        format_fixed2(derived.landed_kit_cost_usd)
    )?;
    writeln!(
        out,
        "  Consumables Cost per Procedure (INR): {}",
        format_inr(derived.consumable_per_procedure_inr)
    )?;
    Ok(())
}

/// Projection screen: schedule, totals row, inflow/outflow, IRR
pub fn write_projection_text<W: Write>(out: &mut W, result: &ProjectionResult) -> Result<()> {
    writeln!(
        out,
        "{:>5} {:>12} {:>20} {:>20} {:>14} {:>20}",
        "Year", "Procedures", "Revenue (INR)", "Consumables (INR)", "CMC (INR)", "Net Profit (INR)"
    )?;
    writeln!(out, "{}", "-".repeat(96))?;

    for row in &result.rows {
        writeln!(
            out,
            "{:>5} {:>12} {:>20} {:>20} {:>14} {:>20}",
            row.year,
            format_inr(row.procedures),
            format_inr(row.revenue_inr),
            format_inr(row.consumables_inr),
            format_inr(row.cmc_inr),
            format_inr(row.profit_inr),
        )?;
    }

    let totals = &result.totals;
    writeln!(out, "{}", "-".repeat(96))?;
    writeln!(
        out,
        "{:>5} {:>12} {:>20} {:>20} {:>14} {:>20}",
        "TOTAL",
        format_inr(totals.total_procedures),
        format_inr(totals.total_revenue_inr),
        format_inr(totals.total_consumables_inr),
        format_inr(totals.total_cmc_inr),
        format_inr(totals.total_profit_inr),
    )?;

    writeln!(out)?;
    writeln!(
        out,
        "INFLOW in {} Years:  ₹ {}",
        result.rows.len(),
        format_inr(totals.total_revenue_inr)
    )?;
    writeln!(
        out,
        "OUTFLOW in {} Years: ₹ {} (Includes CIF + CMC)",
        result.rows.len(),
        format_inr(totals.total_outflow_inr)
    )?;
    writeln!(out, "IRR: {}", format_percent(totals.irr_percent))?;
    writeln!(
        out,
        "Net Profit in {} Years: ₹ {}",
        result.rows.len(),
        format_inr(totals.total_profit_inr)
    )?;
    match totals.payback_year {
        Some(year) => writeln!(out, "Payback: year {}", year)?,
        None => writeln!(out, "Payback: not within horizon")?,
    }
    Ok(())
}

/// Full-precision JSON
pub fn write_json<W: Write>(out: &mut W, report: &RoiReport<'_>) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)?;
    Ok(())
}

/// Schedule rows as CSV with a header line
pub fn write_schedule_csv<W: Write>(out: W, result: &ProjectionResult) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for row in &result.rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
