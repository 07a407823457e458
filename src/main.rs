//! ROI Calculator CLI
//!
//! Derives the landed investment, projects five years of procedures and
//! reports the IRR. Numeric arguments are read like form fields: anything
//! that is not a number counts as zero.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};

use roi_calculator::config::CalculatorConfig;
use roi_calculator::format::{format_inr, format_percent};
use roi_calculator::input::parse_field;
use roi_calculator::projection::{IrrMethod, ProjectionEngine};
use roi_calculator::report::{self, RoiReport};
use roi_calculator::scenario::{ScenarioRunner, SweepRange};
use roi_calculator::{derive_investment, ui_cli, FlowController, InvestmentInputs, ProjectionInputs};

#[derive(Parser, Debug)]
#[command(name = "roi_calculator", version, about = "Equipment investment ROI and IRR calculator")]
struct Cli {
    /// JSON file overriding the CMC charge, horizon or IRR method
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the investment screen outputs
    Invest {
        #[command(flatten)]
        investment: InvestmentArgs,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Run both screens and print the five-year projection
    Project {
        #[command(flatten)]
        investment: InvestmentArgs,

        #[command(flatten)]
        projection: ProjectionArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Project a grid of procedure volumes and billing rates
    Sweep {
        #[command(flatten)]
        investment: InvestmentArgs,

        /// Monthly procedures as start:end:step
        #[arg(long)]
        monthly_range: String,

        /// Billing per procedure as start:end:step
        #[arg(long)]
        billing_range: String,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Walk through both screens on stdin
    Interactive,
}

#[derive(Args, Debug)]
struct InvestmentArgs {
    /// CIF value in millions of USD
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    cif: String,

    /// Exchange rate, INR per USD
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    rate: String,

    /// Kit cost in USD
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    kit: String,
}

impl InvestmentArgs {
    fn inputs(&self) -> InvestmentInputs {
        InvestmentInputs {
            cif_value_million_usd: parse_field(&self.cif),
            exchange_rate_inr_per_usd: parse_field(&self.rate),
            kit_cost_usd: parse_field(&self.kit),
        }
    }
}

#[derive(Args, Debug)]
struct ProjectionArgs {
    /// Monthly procedures in year 1
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    monthly: String,

    /// Billing per procedure in INR
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    billing: String,
}

impl ProjectionArgs {
    fn inputs(&self) -> ProjectionInputs {
        ProjectionInputs {
            monthly_procedures_year1: parse_field(&self.monthly),
            billing_per_procedure_inr: parse_field(&self.billing),
        }
    }
}

#[derive(Args, Debug)]
struct OutputArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Write to this file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Use the bounded Newton-Raphson solver with bisection fallback
    #[arg(long)]
    guarded_irr: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
    Csv,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = CalculatorConfig::load(cli.config.as_deref())
        .with_context(|| "loading calculator config")?;

    match cli.command {
        Command::Invest { investment, format } => {
            let inputs = investment.inputs();
            let derived = derive_investment(&inputs);
            let stdout = io::stdout();
            let mut out = stdout.lock();
            match format {
                OutputFormat::Text => report::write_investment_text(&mut out, &derived)?,
                OutputFormat::Json => report::write_json(
                    &mut out,
                    &RoiReport {
                        investment_inputs: &inputs,
                        investment: &derived,
                        projection_inputs: None,
                        projection: None,
                    },
                )?,
                OutputFormat::Csv => {
                    return Err(anyhow!("csv output is only available for projections"))
                }
            }
        }
        Command::Project { investment, projection, output } => {
            if output.guarded_irr {
                config.irr_method = IrrMethod::Guarded;
            }
            let inputs = investment.inputs();
            let derived = derive_investment(&inputs);
            let projection_inputs = projection.inputs();
            let engine = ProjectionEngine::new(config.projection_config());
            let result = engine.project(&derived.handoff(), &projection_inputs);

            let mut out = open_output(&output)?;
            match output.format {
                OutputFormat::Text => {
                    report::write_investment_text(&mut out, &derived)?;
                    writeln!(out)?;
                    report::write_projection_text(&mut out, &result)?;
                }
                OutputFormat::Json => report::write_json(
                    &mut out,
                    &RoiReport {
                        investment_inputs: &inputs,
                        investment: &derived,
                        projection_inputs: Some(&projection_inputs),
                        projection: Some(&result),
                    },
                )?,
                OutputFormat::Csv => report::write_schedule_csv(&mut out, &result)?,
            }
            out.flush()?;
        }
        Command::Sweep { investment, monthly_range, billing_range, output } => {
            if output.guarded_irr {
                config.irr_method = IrrMethod::Guarded;
            }
            let monthly = parse_range(&monthly_range).with_context(|| "parsing --monthly-range")?;
            let billing = parse_range(&billing_range).with_context(|| "parsing --billing-range")?;
            let derived = derive_investment(&investment.inputs());
            let runner = ScenarioRunner::new(derived.handoff(), config.projection_config());
            let outcomes = runner.run_grid(&monthly, &billing)?;

            let mut out = open_output(&output)?;
            match output.format {
                OutputFormat::Json => {
                    serde_json::to_writer_pretty(&mut out, &outcomes)?;
                    writeln!(out)?;
                }
                OutputFormat::Csv => {
                    let mut writer = csv::Writer::from_writer(&mut out);
                    writer.write_record([
                        "MonthlyProcedures",
                        "BillingINR",
                        "RevenueINR",
                        "ProfitINR",
                        "IRRPercent",
                    ])?;
                    for o in &outcomes {
                        writer.write_record(&[
                            o.inputs.monthly_procedures_year1.to_string(),
                            o.inputs.billing_per_procedure_inr.to_string(),
                            o.totals.total_revenue_inr.to_string(),
                            o.totals.total_profit_inr.to_string(),
                            o.totals.irr_percent.to_string(),
                        ])?;
                    }
                    writer.flush()?;
                }
                OutputFormat::Text => {
                    writeln!(
                        out,
                        "{:>10} {:>12} {:>20} {:>12}",
                        "Monthly", "Billing", "Net Profit (INR)", "IRR"
                    )?;
                    for o in &outcomes {
                        writeln!(
                            out,
                            "{:>10} {:>12} {:>20} {:>12}",
                            o.inputs.monthly_procedures_year1,
                            format_inr(o.inputs.billing_per_procedure_inr),
                            format_inr(o.totals.total_profit_inr),
                            format_percent(o.totals.irr_percent),
                        )?;
                    }
                }
            }
            out.flush()?;
        }
        Command::Interactive => {
            let mut flow = FlowController::new(config.projection_config());
            let stdin = io::stdin();
            let stdout = io::stdout();
            let mut out = stdout.lock();
            ui_cli::run(&mut flow, stdin.lock(), &mut out)?;
        }
    }

    Ok(())
}

fn open_output(args: &OutputArgs) -> Result<Box<dyn Write>> {
    Ok(match &args.output {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout())),
    })
}

/// Parse `start:end:step`; a bare number is a single point
fn parse_range(text: &str) -> Result<SweepRange> {
    let parts: Vec<&str> = text.split(':').collect();
    let number = |s: &str| -> Result<f64> {
        let value = s
            .trim()
            .parse::<f64>()
            .map_err(|_| anyhow!("invalid number in range: {}", s))?;
        if !value.is_finite() {
            return Err(anyhow!("range values must be finite, got {}", s));
        }
        Ok(value)
    };
    match parts.as_slice() {
        [single] => Ok(SweepRange::single(number(*single)?)),
        [start, end, step] => Ok(SweepRange {
            start: number(*start)?,
            end: number(*end)?,
            step: number(*step)?,
        }),
        _ => Err(anyhow!("expected start:end:step, got {}", text)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_range() {
        let range = parse_range("50:100:25").unwrap();
        assert_eq!(range, SweepRange { start: 50.0, end: 100.0, step: 25.0 });
        assert_eq!(parse_range("7").unwrap(), SweepRange::single(7.0));
        assert!(parse_range("1:2").is_err());
    }

    #[test]
    fn test_parse_range_rejects_non_finite() {
        assert!(parse_range("0:inf:1").is_err());
        assert!(parse_range("NaN").is_err());
    }

    #[test]
    fn test_oversized_range_fails_in_grid() {
        let range = parse_range("0:1e30:1").unwrap();
        let handoff = derive_investment(&InvestmentInputs::default()).handoff();
        let runner = ScenarioRunner::new(handoff, Default::default());
        assert!(runner.run_grid(&range, &SweepRange::single(1.0)).is_err());
    }
}
