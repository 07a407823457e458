//! Capital investment and landed consumable cost
//!
//! First stage of the calculator. Everything here is a pure function of the
//! three raw inputs and is recomputed on every field change.

use serde::{Deserialize, Serialize};

/// USD per million USD of CIF value
pub const USD_PER_MILLION: f64 = 1_000_000.0;

/// Import duties and taxes on consumable kits (27.4% of kit cost)
pub const DUTY_RATE: f64 = 0.274;

/// Raw inputs collected on the investment screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InvestmentInputs {
    /// CIF value of the system in millions of USD
    pub cif_value_million_usd: f64,

    /// Exchange rate, INR per USD
    pub exchange_rate_inr_per_usd: f64,

    /// Consumable kit cost per procedure in USD
    pub kit_cost_usd: f64,
}

/// Values derived from [`InvestmentInputs`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InvestmentDerived {
    pub investment_inr: f64,
    pub duties_usd: f64,
    pub landed_kit_cost_usd: f64,
    pub consumable_per_procedure_inr: f64,
}

/// The part of the first stage that the projection needs
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InvestmentHandoff {
    pub investment_inr: f64,
    pub consumable_per_procedure_inr: f64,
}

impl InvestmentDerived {
    pub fn handoff(&self) -> InvestmentHandoff {
        InvestmentHandoff {
            investment_inr: self.investment_inr,
            consumable_per_procedure_inr: self.consumable_per_procedure_inr,
        }
    }
}

/// Derive investment size and landed consumable cost.
///
/// Total over all inputs: zero or negative values simply flow through the
/// formulas.
pub fn derive_investment(inputs: &InvestmentInputs) -> InvestmentDerived {
    let investment_inr =
        inputs.cif_value_million_usd * USD_PER_MILLION * inputs.exchange_rate_inr_per_usd;
    let duties_usd = inputs.kit_cost_usd * DUTY_RATE;
    let landed_kit_cost_usd = inputs.kit_cost_usd + duties_usd;
    let consumable_per_procedure_inr = landed_kit_cost_usd * inputs.exchange_rate_inr_per_usd;

    InvestmentDerived {
        investment_inr,
        duties_usd,
        landed_kit_cost_usd,
        consumable_per_procedure_inr,
    }
}
