//! Payoff estimate for the tracked student loan.

use budgetwise_domain::StudentLoan;
use serde::Serialize;

use crate::projection::parse_rate;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanPayoff {
    /// Whole months of payments until the balance reaches zero.
    pub months: u32,
    pub total_interest: f64,
}

/// Estimates how long the loan takes to clear with fixed monthly payments.
///
/// Returns `None` when the payment never covers the monthly interest
/// (or is not positive), since the balance would never reach zero.
pub fn estimate_payoff(loan: &StudentLoan) -> Option<LoanPayoff> {
    if loan.balance <= 0.0 {
        return Some(LoanPayoff {
            months: 0,
            total_interest: 0.0,
        });
    }
    if !loan.monthly_payment.is_finite() || loan.monthly_payment <= 0.0 {
        return None;
    }
    let monthly_rate = parse_rate(loan.interest_rate.as_deref()).unwrap_or(0.0) / 100.0 / 12.0;
    if monthly_rate <= 0.0 {
        let months = (loan.balance / loan.monthly_payment).ceil();
        return Some(LoanPayoff {
            months: months as u32,
            total_interest: 0.0,
        });
    }
    if loan.monthly_payment <= loan.balance * monthly_rate {
        return None;
    }
    let periods = -(1.0 - monthly_rate * loan.balance / loan.monthly_payment).ln()
        / (1.0 + monthly_rate).ln();
    Some(LoanPayoff {
        months: periods.ceil() as u32,
        total_interest: (loan.monthly_payment * periods - loan.balance).max(0.0),
    })
}
