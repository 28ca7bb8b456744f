use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::AmortizationError;
use crate::types::{Money, Percent, Rate};
use crate::AmortizationResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Effective monthly rate equivalent to an annual rate given in percent:
/// `(1 + annual/100)^(1/12) - 1`.
pub fn effective_monthly_rate(annual_rate_percent: Percent) -> AmortizationResult<Rate> {
    let annual = annual_rate_percent / dec!(100);
    if annual <= dec!(-1) {
        return Err(AmortizationError::invalid(
            "annual_rate_percent",
            "Annual rate must be greater than -100%",
        ));
    }

    let growth = (Decimal::ONE + annual)
        .checked_powd(Decimal::ONE / MONTHS_PER_YEAR)
        .ok_or_else(|| AmortizationError::overflow("monthly rate conversion"))?;

    Ok(growth - Decimal::ONE)
}

/// Present value of `nper` level payments of `pmt` plus `fv` at the end,
/// discounted at `rate` per period. Inverse of [`pmt`].
pub fn pv(rate: Rate, nper: u32, pmt: Money, fv: Money) -> AmortizationResult<Money> {
    if rate.is_zero() {
        return Ok(without_negative_zero(-(pmt * Decimal::from(nper) + fv)));
    }

    let discount = discount_factor(rate, nper, "PV discount factor")?;
    let annuity_factor = (Decimal::ONE - discount) / rate;

    let annuity = pmt
        .checked_mul(annuity_factor)
        .ok_or_else(|| AmortizationError::overflow("PV annuity"))?;
    let terminal = fv
        .checked_mul(discount)
        .ok_or_else(|| AmortizationError::overflow("PV terminal value"))?;

    Ok(without_negative_zero(-(annuity + terminal)))
}

/// Payment (PMT), with the usual sign convention: a positive loan amount
/// passed as a negative present value yields a positive payment.
///
/// Works from the discount factor `(1+r)^-n`, which only shrinks as the
/// horizon grows, so long terms and high rates do not overflow.
pub fn pmt(rate: Rate, nper: u32, present_value: Money, future_value: Money) -> AmortizationResult<Money> {
    if nper == 0 {
        return Err(AmortizationError::invalid(
            "nper",
            "Number of periods must be > 0",
        ));
    }

    if rate.is_zero() {
        return Ok(without_negative_zero(-(present_value + future_value) / Decimal::from(nper)));
    }

    let discount = discount_factor(rate, nper, "PMT discount factor")?;
    let annuity_factor = (Decimal::ONE - discount) / rate;

    if annuity_factor.is_zero() {
        return Err(AmortizationError::DivisionByZero {
            context: "PMT annuity factor".into(),
        });
    }

    let balance = future_value
        .checked_mul(discount)
        .and_then(|v| v.checked_add(present_value))
        .ok_or_else(|| AmortizationError::overflow("PMT discounted balance"))?;

    balance
        .checked_div(annuity_factor)
        .map(|p| without_negative_zero(-p))
        .ok_or_else(|| AmortizationError::overflow("PMT division"))
}

/// Level payment that retires `principal` in `nper` periods at `rate`.
pub fn level_payment(rate: Rate, nper: u32, principal: Money) -> AmortizationResult<Money> {
    pmt(rate, nper, -principal, Decimal::ZERO)
}

/// One-period discount `1/(1+rate)`.
pub fn period_discount(rate: Rate) -> AmortizationResult<Rate> {
    Decimal::ONE
        .checked_div(Decimal::ONE + rate)
        .ok_or_else(|| AmortizationError::DivisionByZero {
            context: "period discount".into(),
        })
}

/// `(1+rate)^-nper`. Underflows quietly to zero for very long horizons.
fn discount_factor(rate: Rate, nper: u32, context: &str) -> AmortizationResult<Decimal> {
    period_discount(rate)?
        .checked_powu(u64::from(nper))
        .ok_or_else(|| AmortizationError::overflow(context))
}

/// Negating an exact zero leaves a `-0` behind.
fn without_negative_zero(value: Decimal) -> Decimal {
    if value.is_zero() {
        Decimal::ZERO
    } else {
        value
    }
}
