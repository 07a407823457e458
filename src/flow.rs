//! Two-screen flow: collect the investment, then show the projection
//!
//! The controller is a two-state machine. The only data that crosses from
//! the first screen to the second is an [`InvestmentHandoff`], frozen when
//! START is pressed. Derived values are never cached; every read recomputes
//! them from the current field values.

use log::{debug, error};
use serde::{Deserialize, Serialize};

use crate::error::{Result, RoiError};
use crate::input::parse_field;
use crate::investment::{derive_investment, InvestmentDerived, InvestmentHandoff, InvestmentInputs};
use crate::projection::{ProjectionConfig, ProjectionEngine, ProjectionInputs, ProjectionResult};

/// Editable fields across both screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    CifValue,
    ExchangeRate,
    KitCost,
    MonthlyProcedures,
    BillingPerProcedure,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Field::CifValue => "CIF Value (in Million USD)",
            Field::ExchangeRate => "Exchange Rate (INR)",
            Field::KitCost => "Kit Cost (in USD)",
            Field::MonthlyProcedures => "Monthly Procedures (Year 1)",
            Field::BillingPerProcedure => "Billing per Procedure (INR)",
        }
    }
}

/// First screen: the three investment fields
#[derive(Debug, Clone, Default)]
pub struct InvestmentForm {
    inputs: InvestmentInputs,
}

impl InvestmentForm {
    pub fn new(inputs: InvestmentInputs) -> Self {
        Self { inputs }
    }

    pub fn inputs(&self) -> &InvestmentInputs {
        &self.inputs
    }

    /// Store a raw field value; returns false if the field is not on this screen
    pub fn set_field(&mut self, field: Field, raw: &str) -> bool {
        let value = parse_field(raw);
        match field {
            Field::CifValue => self.inputs.cif_value_million_usd = value,
            Field::ExchangeRate => self.inputs.exchange_rate_inr_per_usd = value,
            Field::KitCost => self.inputs.kit_cost_usd = value,
            _ => return false,
        }
        true
    }

    pub fn derived(&self) -> InvestmentDerived {
        derive_investment(&self.inputs)
    }

    /// Hand the derived values to whatever is wired to START.
    ///
    /// With no handler this logs and returns an error; the caller stays on
    /// this screen.
    pub fn proceed(&self, handler: Option<&mut dyn FnMut(InvestmentHandoff)>) -> Result<()> {
        match handler {
            Some(on_continue) => {
                on_continue(self.derived().handoff());
                Ok(())
            }
            None => {
                error!("START pressed but no transition handler is wired");
                Err(RoiError::MissingTransitionHandler)
            }
        }
    }
}

/// Second screen: procedure volume and billing over a frozen handoff
#[derive(Debug, Clone)]
pub struct ProjectionForm {
    handoff: InvestmentHandoff,
    inputs: ProjectionInputs,
    engine: ProjectionEngine,
}

impl ProjectionForm {
    pub fn new(handoff: InvestmentHandoff, engine: ProjectionEngine) -> Self {
        Self {
            handoff,
            inputs: ProjectionInputs::default(),
            engine,
        }
    }

    pub fn handoff(&self) -> &InvestmentHandoff {
        &self.handoff
    }

    pub fn inputs(&self) -> &ProjectionInputs {
        &self.inputs
    }

    pub fn set_field(&mut self, field: Field, raw: &str) -> bool {
        let value = parse_field(raw);
        match field {
            Field::MonthlyProcedures => self.inputs.monthly_procedures_year1 = value,
            Field::BillingPerProcedure => self.inputs.billing_per_procedure_inr = value,
            _ => return false,
        }
        true
    }

    pub fn result(&self) -> ProjectionResult {
        self.engine.project(&self.handoff, &self.inputs)
    }
}

/// Which screen is active
#[derive(Debug, Clone)]
pub enum FlowState {
    CollectingInvestment(InvestmentForm),
    ShowingProjection(ProjectionForm),
}

impl FlowState {
    pub fn name(&self) -> &'static str {
        match self {
            FlowState::CollectingInvestment(_) => "collecting investment",
            FlowState::ShowingProjection(_) => "showing projection",
        }
    }
}

/// Drives the two screens and the single transition between them
#[derive(Debug, Clone)]
pub struct FlowController {
    state: FlowState,
    engine: ProjectionEngine,
}

impl FlowController {
    pub fn new(config: ProjectionConfig) -> Self {
        Self {
            state: FlowState::CollectingInvestment(InvestmentForm::default()),
            engine: ProjectionEngine::new(config),
        }
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    /// Update a field on the active screen
    pub fn set_field(&mut self, field: Field, raw: &str) -> Result<()> {
        let accepted = match &mut self.state {
            FlowState::CollectingInvestment(form) => form.set_field(field, raw),
            FlowState::ShowingProjection(form) => form.set_field(field, raw),
        };

        if !accepted {
            return Err(RoiError::InvalidAction {
                action: "set field",
                state: self.state.name(),
            });
        }

        debug!("{:?} <- {:?}", field, raw);
        Ok(())
    }

    /// The START action: freeze the handoff and switch to the projection
    pub fn start(&mut self) -> Result<()> {
        let form = match &self.state {
            FlowState::CollectingInvestment(form) => form,
            FlowState::ShowingProjection(_) => {
                return Err(RoiError::InvalidAction {
                    action: "start",
                    state: self.state.name(),
                })
            }
        };

        let mut captured = None;
        let mut on_continue = |handoff: InvestmentHandoff| captured = Some(handoff);
        form.proceed(Some(&mut on_continue))?;

        if let Some(handoff) = captured {
            debug!("Handoff frozen: {:?}", handoff);
            let form = ProjectionForm::new(handoff, self.engine.clone());
            self.state = FlowState::ShowingProjection(form);
        }
        Ok(())
    }
}

impl Default for FlowController {
    fn default() -> Self {
        Self::new(ProjectionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_flow() {
        let mut flow = FlowController::default();
        flow.set_field(Field::CifValue, "2").unwrap();
        flow.set_field(Field::ExchangeRate, "80").unwrap();
        flow.set_field(Field::KitCost, "1000").unwrap();
        flow.start().unwrap();

        let FlowState::ShowingProjection(form) = flow.state() else {
            panic!("expected projection screen");
        };
        assert_eq!(form.handoff().investment_inr, 160_000_000.0);

        flow.set_field(Field::MonthlyProcedures, "10").unwrap();
        flow.set_field(Field::BillingPerProcedure, "200000").unwrap();

        let FlowState::ShowingProjection(form) = flow.state() else {
            panic!("expected projection screen");
        };
        let result = form.result();
        assert_eq!(result.rows[2].procedures, 360.0);
    }

    #[test]
    fn test_missing_handler_does_not_advance() {
        let form = InvestmentForm::default();
        let err = form.proceed(None).unwrap_err();
        assert!(matches!(err, RoiError::MissingTransitionHandler));
    }

    #[test]
    fn test_handler_receives_handoff() {
        let mut form = InvestmentForm::default();
        form.set_field(Field::CifValue, "1");
        form.set_field(Field::ExchangeRate, "80");

        let mut received = Vec::new();
        let mut handler = |h: InvestmentHandoff| received.push(h);
        form.proceed(Some(&mut handler)).unwrap();

        assert_eq!(received.len(), 1);
        assert_eq!(received[0].investment_inr, 80_000_000.0);
    }

    #[test]
    fn test_fields_rejected_on_wrong_screen() {
        let mut flow = FlowController::default();
        assert!(flow.set_field(Field::MonthlyProcedures, "10").is_err());

        flow.start().unwrap();
        assert!(flow.set_field(Field::KitCost, "10").is_err());
        assert!(flow.start().is_err());
    }

    #[test]
    fn test_garbage_input_reads_as_zero() {
        let mut form = InvestmentForm::default();
        form.set_field(Field::CifValue, "2");
        form.set_field(Field::CifValue, "two million");
        assert_eq!(form.inputs().cif_value_million_usd, 0.0);
    }

    #[test]
    fn test_derived_tracks_every_change() {
        let mut form = InvestmentForm::default();
        form.set_field(Field::KitCost, "1000");
        assert_eq!(form.derived().duties_usd, 274.0);
        form.set_field(Field::KitCost, "2000");
        assert_eq!(form.derived().duties_usd, 548.0);
    }
}
