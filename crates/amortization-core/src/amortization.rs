//! Level-payment amortization of a fixed-rate loan.
//!
//! The nominal annual rate is converted to its effective monthly equivalent,
//! the level payment is derived from the annuity formula, and every period
//! splits that payment into interest on the running balance and principal.
//! All arithmetic is carried at full `Decimal` precision; rounding is only
//! applied through [`PaymentPlan::rounded`] at the presentation boundary.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::AmortizationError;
use crate::time_value::{effective_monthly_rate, level_payment, period_discount};
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Rate};
use crate::AmortizationResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Largest end-of-term residual that is silently absorbed by the final row.
const RESIDUAL_TOLERANCE: Decimal = dec!(0.01);

/// Range offered by the calculator front ends. The engine itself accepts
/// anything positive but flags values outside these bounds.
const TYPICAL_MAX_RATE_PERCENT: Decimal = dec!(100);
const TYPICAL_MAX_TERM_MONTHS: u32 = 360;

/// Decimal places used when presenting money.
pub const CURRENCY_DP: u32 = 2;

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Loan terms entered by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanInput {
    /// Nominal annual rate in percent (e.g., 12.5 for 12.5%).
    pub annual_rate_percent: Percent,
    /// Amount borrowed.
    pub principal: Money,
    /// Number of monthly payments.
    pub term_months: u32,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One month of the schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentPlanRow {
    /// 1-based month index.
    pub period: u32,
    pub monthly_payment: Money,
    pub interest: Money,
    pub principal_portion: Money,
    /// Balance after this payment, never negative.
    pub remaining_balance: Money,
}

/// Full schedule with the scalars used to produce it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentPlan {
    /// Effective monthly rate as a decimal (0.0098 = 0.98%).
    pub monthly_rate: Rate,
    pub monthly_payment: Money,
    pub rows: Vec<PaymentPlanRow>,
}

/// Headline figures shown above the schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub principal: Money,
    pub annual_rate_percent: Percent,
    pub monthly_rate: Rate,
    pub monthly_rate_percent: Percent,
    pub monthly_payment: Money,
    pub total_paid: Money,
    pub total_interest: Money,
    pub term_months: u32,
}

/// Summary plus schedule, the payload of [`amortize`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationOutput {
    pub summary: PlanSummary,
    pub schedule: Vec<PaymentPlanRow>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Build the amortization schedule for `input`.
///
/// Fails with `InvalidInput` for a non-positive rate, principal or term and
/// with `CalculationFailure` when an intermediate value overflows. No partial
/// schedule is ever returned.
pub fn compute_plan(input: &LoanInput) -> AmortizationResult<PaymentPlan> {
    build_plan(input).map(|(plan, _)| plan)
}

/// Derive the summary metrics of a plan computed from `input`.
pub fn summarize(input: &LoanInput, plan: &PaymentPlan) -> AmortizationResult<PlanSummary> {
    let total_paid = plan
        .monthly_payment
        .checked_mul(Decimal::from(input.term_months))
        .ok_or_else(|| AmortizationError::overflow("total paid"))?;

    Ok(PlanSummary {
        principal: input.principal,
        annual_rate_percent: input.annual_rate_percent,
        monthly_rate: plan.monthly_rate,
        monthly_rate_percent: plan.monthly_rate * dec!(100),
        monthly_payment: plan.monthly_payment,
        total_paid,
        total_interest: total_paid - input.principal,
        term_months: input.term_months,
    })
}

/// Compute plan and summary, wrapped in the standard output envelope.
pub fn amortize(
    input: &LoanInput,
) -> AmortizationResult<ComputationOutput<AmortizationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let (plan, residual) = build_plan(input)?;
    let summary = summarize(input, &plan)?;

    if input.annual_rate_percent > TYPICAL_MAX_RATE_PERCENT {
        warnings.push(format!(
            "Annual rate of {}% is above the usual {}% ceiling",
            input.annual_rate_percent, TYPICAL_MAX_RATE_PERCENT
        ));
    }
    if input.term_months > TYPICAL_MAX_TERM_MONTHS {
        warnings.push(format!(
            "Term of {} months exceeds the usual {} months",
            input.term_months, TYPICAL_MAX_TERM_MONTHS
        ));
    }
    if residual.abs() > RESIDUAL_TOLERANCE {
        warnings.push(format!(
            "Final balance residual of {} was cleared on the last payment",
            residual.round_dp(CURRENCY_DP + 2)
        ));
    }

    let output = AmortizationOutput {
        summary,
        schedule: plan.rows,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level-payment amortization (effective monthly compounding)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

impl PaymentPlan {
    pub fn term_months(&self) -> u32 {
        self.rows.len() as u32
    }

    /// Sum of the principal portions, equal to the loan amount up to rounding.
    pub fn total_principal(&self) -> Money {
        self.rows.iter().map(|r| r.principal_portion).sum()
    }

    pub fn total_interest(&self) -> Money {
        self.rows.iter().map(|r| r.interest).sum()
    }

    /// Copy with every money column rounded to `dp` places. The rate is kept.
    pub fn rounded(&self, dp: u32) -> PaymentPlan {
        PaymentPlan {
            monthly_rate: self.monthly_rate,
            monthly_payment: self.monthly_payment.round_dp(dp),
            rows: self.rows.iter().map(|r| r.rounded(dp)).collect(),
        }
    }
}

impl PaymentPlanRow {
    pub fn rounded(&self, dp: u32) -> PaymentPlanRow {
        PaymentPlanRow {
            period: self.period,
            monthly_payment: self.monthly_payment.round_dp(dp),
            interest: self.interest.round_dp(dp),
            principal_portion: self.principal_portion.round_dp(dp),
            remaining_balance: self.remaining_balance.round_dp(dp),
        }
    }
}

impl AmortizationOutput {
    /// The schedule as a plan, e.g. for export.
    pub fn plan(&self) -> PaymentPlan {
        PaymentPlan {
            monthly_rate: self.summary.monthly_rate,
            monthly_payment: self.summary.monthly_payment,
            rows: self.schedule.clone(),
        }
    }

    /// Money columns rounded to `dp` places; rates keep full precision.
    pub fn rounded(&self, dp: u32) -> AmortizationOutput {
        let s = &self.summary;
        AmortizationOutput {
            summary: PlanSummary {
                principal: s.principal.round_dp(dp),
                annual_rate_percent: s.annual_rate_percent,
                monthly_rate: s.monthly_rate,
                monthly_rate_percent: s.monthly_rate_percent,
                monthly_payment: s.monthly_payment.round_dp(dp),
                total_paid: s.total_paid.round_dp(dp),
                total_interest: s.total_interest.round_dp(dp),
                term_months: s.term_months,
            },
            schedule: self.schedule.iter().map(|r| r.rounded(dp)).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Schedule construction
// ---------------------------------------------------------------------------

/// Returns the plan and the pre-clamp balance left after the last payment.
///
/// Period `k` repays `P·(1+r)^-(n-k+1)` of principal and the rest of the level
/// payment is interest, which equals `balance·r` on the running balance. Taking
/// the principal from the discount factor keeps rounding error from being
/// compounded by `(1+r)` every period on long or high-rate loans.
fn build_plan(input: &LoanInput) -> AmortizationResult<(PaymentPlan, Money)> {
    validate_loan_input(input)?;

    let monthly_rate = effective_monthly_rate(input.annual_rate_percent)?;
    let monthly_payment = level_payment(monthly_rate, input.term_months, input.principal)?;
    let discounts = discount_powers(monthly_rate, input.term_months)?;

    let mut rows = Vec::with_capacity(input.term_months as usize);
    let mut balance = input.principal;

    for period in 1..=input.term_months {
        let remaining_periods = (input.term_months - period) as usize;
        let principal_portion = monthly_payment
            .checked_mul(discounts[remaining_periods])
            .ok_or_else(|| AmortizationError::overflow(format!("principal for period {period}")))?;
        let interest = monthly_payment
            .checked_sub(principal_portion)
            .ok_or_else(|| AmortizationError::overflow(format!("interest for period {period}")))?;
        balance = balance
            .checked_sub(principal_portion)
            .ok_or_else(|| AmortizationError::overflow(format!("balance for period {period}")))?;

        let remaining_balance = if period == input.term_months {
            Decimal::ZERO
        } else {
            balance.max(Decimal::ZERO)
        };

        rows.push(PaymentPlanRow {
            period,
            monthly_payment,
            interest,
            principal_portion,
            remaining_balance,
        });
    }

    Ok((
        PaymentPlan {
            monthly_rate,
            monthly_payment,
            rows,
        },
        balance,
    ))
}

/// `[(1+r)^-1, (1+r)^-2, ..., (1+r)^-n]`. Far powers underflow to zero.
fn discount_powers(monthly_rate: Rate, term_months: u32) -> AmortizationResult<Vec<Decimal>> {
    let step = period_discount(monthly_rate)?;
    let mut powers = Vec::with_capacity(term_months as usize);
    let mut current = step;
    for _ in 0..term_months {
        powers.push(current);
        current = current
            .checked_mul(step)
            .ok_or_else(|| AmortizationError::overflow("discount factor"))?;
    }
    Ok(powers)
}

fn validate_loan_input(input: &LoanInput) -> AmortizationResult<()> {
    if input.annual_rate_percent <= Decimal::ZERO {
        return Err(AmortizationError::invalid(
            "annual_rate_percent",
            "Annual rate must be greater than zero",
        ));
    }
    if input.principal <= Decimal::ZERO {
        return Err(AmortizationError::invalid(
            "principal",
            "Principal must be positive",
        ));
    }
    if input.term_months == 0 {
        return Err(AmortizationError::invalid(
            "term_months",
            "Term must be at least one month",
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
