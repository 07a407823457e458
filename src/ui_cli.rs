//! Line-driven rendition of the two screens
//!
//! Each line is a command: a field name followed by a raw value, `start`,
//! `help` or `quit`. The active screen is re-rendered after every change.

use std::io::{BufRead, Write};

use crate::error::Result;
use crate::flow::{Field, FlowController, FlowState};
use crate::report::{write_investment_text, write_projection_text};

/// A parsed input line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Set(Field, String),
    Start,
    Help,
    Quit,
    Unknown(String),
}

pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let raw = rest.trim().to_string();

    match word.to_ascii_lowercase().as_str() {
        "cif" => Command::Set(Field::CifValue, raw),
        "rate" => Command::Set(Field::ExchangeRate, raw),
        "kit" => Command::Set(Field::KitCost, raw),
        "monthly" => Command::Set(Field::MonthlyProcedures, raw),
        "billing" => Command::Set(Field::BillingPerProcedure, raw),
        "start" => Command::Start,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    }
}

/// Run the interactive flow until `quit` or end of input
pub fn run<R: BufRead, W: Write>(flow: &mut FlowController, input: R, out: &mut W) -> Result<()> {
    print_help(flow, out)?;
    render(flow, out)?;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        match parse_command(&line) {
            Command::Set(field, raw) => match flow.set_field(field, &raw) {
                Ok(()) => render(flow, out)?,
                Err(err) => writeln!(out, "{err}")?,
            },
            Command::Start => match flow.start() {
                Ok(()) => {
                    print_help(flow, out)?;
                    render(flow, out)?;
                }
                Err(err) => writeln!(out, "{err}")?,
            },
            Command::Help => print_help(flow, out)?,
            Command::Quit => break,
            Command::Unknown(text) => writeln!(out, "Unknown command: {text} (try 'help')")?,
        }
    }
    Ok(())
}

fn render<W: Write>(flow: &FlowController, out: &mut W) -> Result<()> {
    writeln!(out)?;
    match flow.state() {
        FlowState::CollectingInvestment(form) => {
            let inputs = form.inputs();
            writeln!(out, "{}: {}", Field::CifValue.label(), inputs.cif_value_million_usd)?;
            writeln!(out, "{}: {}", Field::ExchangeRate.label(), inputs.exchange_rate_inr_per_usd)?;
            writeln!(out, "{}: {}", Field::KitCost.label(), inputs.kit_cost_usd)?;
            write_investment_text(out, &form.derived())?;
        }
        FlowState::ShowingProjection(form) => {
            let inputs = form.inputs();
            let monthly = inputs.monthly_procedures_year1;
            let billing = inputs.billing_per_procedure_inr;
            writeln!(out, "{}: {}", Field::MonthlyProcedures.label(), monthly)?;
            writeln!(out, "{}: {}", Field::BillingPerProcedure.label(), billing)?;
            write_projection_text(out, &form.result())?;
        }
    }
    Ok(())
}

fn print_help<W: Write>(flow: &FlowController, out: &mut W) -> Result<()> {
    match flow.state() {
        FlowState::CollectingInvestment(_) => {
            writeln!(out, "Commands: cif <value>, rate <value>, kit <value>, start, quit")?;
        }
        FlowState::ShowingProjection(_) => {
            writeln!(out, "Commands: monthly <value>, billing <value>, quit")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_parse_command() {
        assert_eq!(parse_command("cif 2"), Command::Set(Field::CifValue, "2".to_string()));
        assert_eq!(
            parse_command("  RATE   80 "),
            Command::Set(Field::ExchangeRate, "80".to_string())
        );
        assert_eq!(parse_command("kit"), Command::Set(Field::KitCost, String::new()));
        assert_eq!(parse_command("start"), Command::Start);
        assert_eq!(parse_command("q"), Command::Quit);
        assert_eq!(parse_command("foo 1"), Command::Unknown("foo 1".to_string()));
    }

    #[test]
    fn test_scripted_session() {
        let script = concat!(
            "cif 2\nrate 80\nkit 1000\nmonthly 5\nstart\n",
            "monthly 100\nbilling 200000\nquit\nbilling 1\n",
        );
        let mut flow = FlowController::default();
        let mut out = Vec::new();
        run(&mut flow, Cursor::new(script), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("16,00,00,000"));
        // monthly before start is rejected but the session carries on
        assert!(text.contains("not valid while collecting investment"));
        assert!(text.contains("IRR: 576.03%"));

        let FlowState::ShowingProjection(form) = flow.state() else {
            panic!("expected projection screen");
        };
        // input after quit is ignored
        assert_eq!(form.inputs().billing_per_procedure_inr, 200_000.0);
    }
}
