//! Internal Rate of Return (IRR) calculation
//!
//! Used to turn the five-year cash-flow series into a single annual rate.

/// Starting rate for Newton-Raphson
pub const INITIAL_GUESS: f64 = 0.10;

/// Convergence threshold on the change in rate between iterations
pub const PRECISION: f64 = 1e-6;

/// Iteration cap for Newton-Raphson
pub const MAX_ITERATIONS: usize = 1000;

/// Lower bound on the guarded solver's rate (-99%)
const RATE_FLOOR: f64 = -0.99;

/// Upper bound on the guarded solver's rate (1000%)
const RATE_CEILING: f64 = 10.0;

/// Which IRR routine a projection uses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IrrMethod {
    /// Plain Newton-Raphson from 10%, no guards
    #[default]
    NewtonRaphson,
    /// Bounded Newton-Raphson with a bisection fallback
    Guarded,
}

/// Calculate the IRR of annual cash flows using the Newton-Raphson method.
///
/// Starts from 10% and stops as soon as one step moves the rate by less than
/// [`PRECISION`]. There are no guards: if the derivative is exactly zero the
/// step divides by zero and the non-finite rate is returned as-is, and if the
/// iteration never settles the last rate is returned.
///
/// # Returns
/// * `f64` - IRR as a decimal (e.g., 0.05 for 5%)
pub fn compute_irr(cashflows: &[f64]) -> f64 {
    let mut rate = INITIAL_GUESS;

    for _ in 0..MAX_ITERATIONS {
        let (npv, dnpv) = npv_and_derivative(cashflows, rate);
        let new_rate = rate - npv / dnpv;

        if (new_rate - rate).abs() < PRECISION {
            return new_rate;
        }

        rate = new_rate;
    }

    rate
}

/// Calculate the IRR with guards against the failure modes of plain
/// Newton-Raphson.
///
/// # Returns
/// * `Option<f64>` - IRR as a decimal, or None if no solution found
pub fn solve_irr_guarded(cashflows: &[f64]) -> Option<f64> {
    if cashflows.is_empty() {
        return None;
    }

    if cashflows.iter().all(|&cf| cf.abs() < 1e-10) {
        return Some(0.0);
    }

    // At least one sign change is required for an IRR to exist
    let has_positive = cashflows.iter().any(|&cf| cf > 1e-10);
    let has_negative = cashflows.iter().any(|&cf| cf < -1e-10);
    if !has_positive || !has_negative {
        return None;
    }

    let scale = cashflows.iter().fold(0.0_f64, |acc, cf| acc.max(cf.abs()));
    let mut rate = INITIAL_GUESS;

    for _ in 0..MAX_ITERATIONS {
        let (npv, dnpv) = npv_and_derivative(cashflows, rate);

        if dnpv.abs() < 1e-20 || !dnpv.is_finite() {
            return solve_irr_bisection(cashflows);
        }

        let new_rate = (rate - npv / dnpv).clamp(RATE_FLOOR, RATE_CEILING);

        if (new_rate - rate).abs() < PRECISION {
            // Pinned at a bound is not a root
            if new_rate <= RATE_FLOOR || new_rate >= RATE_CEILING {
                break;
            }
            if npv_at_rate(cashflows, new_rate).abs() <= 1e-6 * scale {
                return Some(new_rate);
            }
            break;
        }

        rate = new_rate;
    }

    solve_irr_bisection(cashflows)
}

/// Calculate NPV and its derivative with respect to rate
pub fn npv_and_derivative(cashflows: &[f64], rate: f64) -> (f64, f64) {
    let mut npv = 0.0;
    let mut dnpv = 0.0;

    for (t, &cf) in cashflows.iter().enumerate() {
        npv += cf / (1.0 + rate).powf(t as f64);
        dnpv -= (t as f64) * cf / (1.0 + rate).powf(t as f64 + 1.0);
    }

    (npv, dnpv)
}

/// Calculate NPV at a given annual rate
pub fn npv_at_rate(cashflows: &[f64], rate: f64) -> f64 {
    cashflows
        .iter()
        .enumerate()
        .map(|(t, &cf)| cf / (1.0 + rate).powf(t as f64))
        .sum()
}

/// Fallback IRR calculation using bisection on [-99%, 1000%]
fn solve_irr_bisection(cashflows: &[f64]) -> Option<f64> {
    let mut low = RATE_FLOOR;
    let mut high = RATE_CEILING;
    let tolerance = 1e-10;

    let mut npv_low = npv_at_rate(cashflows, low);
    let npv_high = npv_at_rate(cashflows, high);

    if npv_low * npv_high > 0.0 {
        return None;
    }

    for _ in 0..MAX_ITERATIONS {
        let mid = (low + high) / 2.0;
        let npv_mid = npv_at_rate(cashflows, mid);

        if npv_mid.abs() < tolerance || (high - low) / 2.0 < tolerance {
            return Some(mid);
        }

        if npv_mid * npv_low < 0.0 {
            high = mid;
        } else {
            low = mid;
            npv_low = npv_mid;
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_simple_irr() {
        // Invest 100, get 110 back after one year
        let irr = compute_irr(&[-100.0, 110.0]);
        assert_abs_diff_eq!(irr, 0.10, epsilon = 1e-9);
    }

    #[test]
    fn test_level_cashflows() {
        let cashflows = [-1000.0, 500.0, 500.0, 500.0];
        let irr = compute_irr(&cashflows);
        assert_abs_diff_eq!(irr, 0.233_751_93, epsilon = 1e-6);
        assert!(npv_at_rate(&cashflows, irr).abs() < 1e-4);
    }

    #[test]
    fn test_rising_cashflows() {
        let cashflows = [-1000.0, 300.0, 400.0, 500.0];
        let irr = compute_irr(&cashflows);
        assert_abs_diff_eq!(irr, 0.088_963_39, epsilon = 1e-6);
    }

    #[test]
    fn test_all_zero_is_not_finite() {
        // Zero derivative: 0/0 propagates
        let irr = compute_irr(&[0.0; 5]);
        assert!(irr.is_nan());
    }

    #[test]
    fn test_guarded_all_zero() {
        assert_eq!(solve_irr_guarded(&[0.0; 5]), Some(0.0));
    }

    #[test]
    fn test_guarded_no_sign_change() {
        assert_eq!(solve_irr_guarded(&[-160.0, -11.8, -11.8]), None);
        assert_eq!(solve_irr_guarded(&[]), None);
    }

    #[test]
    fn test_guarded_matches_plain_when_well_behaved() {
        let cashflows = [-1000.0, 500.0, 500.0, 500.0];
        let plain = compute_irr(&cashflows);
        let guarded = solve_irr_guarded(&cashflows).unwrap();
        assert_abs_diff_eq!(plain, guarded, epsilon = 1e-6);
    }

    #[test]
    fn test_guarded_rejects_rate_pinned_at_ceiling() {
        // True IRR is 9900%, outside the bracket
        let cashflows = [-1.0, 100.0];
        assert_abs_diff_eq!(compute_irr(&cashflows), 99.0, epsilon = 1e-6);
        assert_eq!(solve_irr_guarded(&cashflows), None);
    }

    #[test]
    fn test_guarded_result_is_a_root() {
        let cashflows = [-5_000_000.0, 1_000_000.0, 1_500_000.0, 2_000_000.0, 2_500_000.0];
        let irr = solve_irr_guarded(&cashflows).unwrap();
        assert!(npv_at_rate(&cashflows, irr).abs() < 1e-6 * 5_000_000.0);
    }

    #[test]
    fn test_non_convergence_returns_last_iterate() {
        // NPV = 1 + 1/(1+r)^2 never reaches zero
        let cashflows = [1.0, 0.0, 1.0];

        let mut rate = INITIAL_GUESS;
        for _ in 0..MAX_ITERATIONS {
            let (npv, dnpv) = npv_and_derivative(&cashflows, rate);
            let new_rate = rate - npv / dnpv;
            assert!(!((new_rate - rate).abs() < PRECISION));
            rate = new_rate;
        }

        let irr = compute_irr(&cashflows);
        if rate.is_nan() {
            assert!(irr.is_nan());
        } else {
            assert_eq!(irr.to_bits(), rate.to_bits());
        }
        assert!(!irr.is_finite());
    }

    #[test]
    fn test_bisection_finds_root() {
        let cashflows = [-1000.0, 500.0, 500.0, 500.0];
        let irr = solve_irr_bisection(&cashflows).unwrap();
        assert!(npv_at_rate(&cashflows, irr).abs() < 1e-6);
    }

    #[test]
    fn test_derivative_sign() {
        // Positive later flows make NPV fall as the rate rises
        let (_, dnpv) = npv_and_derivative(&[-100.0, 60.0, 60.0], 0.1);
        assert!(dnpv < 0.0);
    }
}
