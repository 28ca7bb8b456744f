use amortization_core::amortization::{amortize, compute_plan, LoanInput, PaymentPlan};
use amortization_core::time_value::pv;
use amortization_core::AmortizationError;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Helpers
// ===========================================================================

fn loan(rate: Decimal, principal: Decimal, term: u32) -> LoanInput {
    LoanInput {
        annual_rate_percent: rate,
        principal,
        term_months: term,
    }
}

fn assert_close(actual: Decimal, expected: Decimal, tol: Decimal, msg: &str) {
    assert!(
        (actual - expected).abs() <= tol,
        "{msg}: expected {expected} ± {tol}, got {actual}"
    );
}

fn assert_plan_invariants(input: &LoanInput, plan: &PaymentPlan) {
    assert_eq!(plan.rows.len(), input.term_months as usize);
    assert_close(plan.total_principal(), input.principal, dec!(0.01), "principal sum");
    assert_eq!(plan.rows.last().unwrap().remaining_balance, Decimal::ZERO);

    for (i, row) in plan.rows.iter().enumerate() {
        assert_eq!(row.period, i as u32 + 1);
        assert_eq!(row.monthly_payment, plan.monthly_payment);
        assert!(row.remaining_balance >= Decimal::ZERO);
    }
}

// ===========================================================================
// Scenarios
// ===========================================================================

#[test]
fn test_twelve_month_loan_at_twelve_and_a_half_percent() {
    let input = loan(dec!(12.5), dec!(10000), 12);
    let plan = compute_plan(&input).unwrap();

    // (1.125)^(1/12) - 1
    assert_close(plan.monthly_rate, dec!(0.00986358), dec!(0.0000001), "monthly rate");
    assert_close(plan.monthly_payment, dec!(887.72), dec!(0.005), "payment");
    assert_plan_invariants(&input, &plan);

    // Twelve payments discounted at the monthly rate give back the principal.
    let back = pv(plan.monthly_rate, 12, -plan.monthly_payment, Decimal::ZERO).unwrap();
    assert_close(back, dec!(10000), dec!(0.000001), "present value");
}

#[test]
fn test_single_period_loan() {
    let input = loan(dec!(12.5), dec!(10000), 1);
    let plan = compute_plan(&input).unwrap();

    assert_eq!(plan.rows.len(), 1);
    assert_close(plan.rows[0].principal_portion, dec!(10000), dec!(0.01), "principal");
    assert_eq!(plan.rows[0].remaining_balance, Decimal::ZERO);
    assert_close(
        plan.rows[0].interest,
        dec!(10000) * plan.monthly_rate,
        dec!(0.0000001),
        "interest",
    );
}

#[test]
fn test_zero_term_rejected_without_output() {
    let result = compute_plan(&loan(dec!(12.5), dec!(10000), 0));
    match result {
        Err(AmortizationError::InvalidInput { field, .. }) => assert_eq!(field, "term_months"),
        other => panic!("expected InvalidInput, got {other:?}"),
    }
}

#[test]
fn test_tiny_loan_high_rate_long_term() {
    let input = loan(dec!(100), dec!(1), 360);
    let plan = compute_plan(&input).unwrap();

    assert_plan_invariants(&input, &plan);
    assert_close(plan.monthly_rate, dec!(0.0594630944), dec!(0.0000001), "monthly rate");
    assert_close(plan.monthly_payment, dec!(0.0594630944), dec!(0.0000001), "payment");

    let balances: Vec<Decimal> = plan.rows.iter().map(|r| r.remaining_balance).collect();
    assert!(balances.windows(2).all(|w| w[1] <= w[0]));
}

// ===========================================================================
// Properties
// ===========================================================================

#[test]
fn test_invariants_across_inputs() {
    let cases = [
        (dec!(0.01), dec!(1), 1),
        (dec!(0.01), dec!(250000), 360),
        (dec!(7.25), dec!(180000), 240),
        (dec!(28.5), dec!(3500.75), 36),
        (dec!(99.99), dec!(50000), 60),
        (dec!(15), dec!(1000000000), 120),
    ];

    for (rate, principal, term) in cases {
        let input = loan(rate, principal, term);
        let plan = compute_plan(&input).unwrap();
        assert_plan_invariants(&input, &plan);
    }
}

#[test]
fn test_idempotent() {
    let input = loan(dec!(18.9), dec!(42000), 48);
    assert_eq!(compute_plan(&input).unwrap(), compute_plan(&input).unwrap());
}

#[test]
fn test_zero_rate_is_invalid_input() {
    assert!(matches!(
        compute_plan(&loan(Decimal::ZERO, dec!(1000), 12)),
        Err(AmortizationError::InvalidInput { .. })
    ));
}

#[test]
fn test_interest_declines_principal_grows() {
    let plan = compute_plan(&loan(dec!(24), dec!(20000), 24)).unwrap();
    for w in plan.rows.windows(2) {
        assert!(w[1].interest < w[0].interest);
        assert!(w[1].principal_portion > w[0].principal_portion);
    }
}

#[test]
fn test_interest_is_rate_on_running_balance() {
    for input in [
        loan(dec!(12.5), dec!(10000), 12),
        loan(dec!(100), dec!(1), 1200),
        loan(dec!(1000), dec!(1000), 360),
    ] {
        let plan = compute_plan(&input).unwrap();
        let mut previous = input.principal;
        for row in &plan.rows {
            assert_close(
                row.interest,
                previous * plan.monthly_rate,
                dec!(0.000000001),
                &format!("interest in period {}", row.period),
            );
            previous = row.remaining_balance;
        }
    }
}

#[test]
fn test_long_and_high_rate_loans_do_not_overflow() {
    let cases = [
        loan(dec!(100), dec!(1), 1200),
        loan(dec!(1000), dec!(1000), 360),
        loan(dec!(100), dec!(100000000000000000000), 360),
    ];

    for input in cases {
        let plan = compute_plan(&input).unwrap();
        assert_plan_invariants(&input, &plan);
    }

    // Payment collapses to interest on the balance when (1+r)^-n vanishes.
    let plan = compute_plan(&loan(dec!(1000), dec!(1000), 360)).unwrap();
    assert_close(
        plan.monthly_payment,
        dec!(1000) * plan.monthly_rate,
        dec!(0.000001),
        "interest-only payment",
    );
}

#[test]
fn test_long_horizon_has_no_residual_warning() {
    let out = amortize(&loan(dec!(100), dec!(1), 1200)).unwrap();
    // only the term warning; the schedule closes on its own
    assert_eq!(out.warnings.len(), 1);
    assert!(out.warnings[0].contains("1200 months"));
}

#[test]
fn test_out_of_range_inputs_still_compute() {
    let input = loan(dec!(120), dec!(5000), 420);
    let out = amortize(&input).unwrap();
    assert_eq!(out.result.schedule.len(), 420);
    assert_eq!(out.warnings.len(), 2);
}

#[test]
fn test_summary_consistency() {
    let input = loan(dec!(12.5), dec!(10000), 12);
    let out = amortize(&input).unwrap();
    let s = &out.result.summary;

    assert_eq!(s.total_paid, s.monthly_payment * Decimal::from(12));
    assert_eq!(s.total_interest, s.total_paid - s.principal);

    let rounded = out.result.rounded(2);
    assert_eq!(rounded.summary.monthly_payment, dec!(887.72));
    assert_eq!(rounded.summary.total_paid, dec!(10652.67));
    assert_eq!(rounded.summary.total_interest, dec!(652.67));
}

#[test]
fn test_serialized_shape() {
    let out = amortize(&loan(dec!(12.5), dec!(10000), 2)).unwrap();
    let value = serde_json::to_value(&out).unwrap();

    let row = &value["result"]["schedule"][0];
    for key in ["period", "monthly_payment", "interest", "principal_portion", "remaining_balance"] {
        assert!(row.get(key).is_some(), "missing {key}");
    }
    assert_eq!(value["assumptions"]["annual_rate_percent"], "12.5");
}
