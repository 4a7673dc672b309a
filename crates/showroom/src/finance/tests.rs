use super::*;

fn request(price: f64, down: f64, term_months: u32) -> LoanQuoteRequest {
    LoanQuoteRequest {
        vehicle_price: price,
        down_payment: down,
        term_months,
        nominal_annual_rate_percent: 7.5,
        borrower_age: 30,
        include_vat: true,
    }
}

fn approx(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 0.01,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn quotes_six_year_plan_with_vat() {
    let estimator = LoanEstimator::default();
    let quote = estimator
        .estimate(&request(400_000.0, 0.0, 72))
        .expect("72 months is offered");

    approx(quote.insurance_surcharge_percent, 0.27);
    approx(quote.effective_annual_rate_percent, 7.77);
    approx(quote.principal, 400_000.0);
    approx(quote.total_interest, 186_480.0);
    approx(quote.total_payable, 586_480.0);
    approx(quote.monthly_payment_before_vat, 8_145.56);
    approx(quote.monthly_payment_final, 8_715.74);
    assert_eq!(quote.monthly_payment_rounded, 8_716);
}

#[test]
fn excluding_vat_keeps_flat_installment() {
    let estimator = LoanEstimator::default();
    let mut req = request(400_000.0, 0.0, 72);
    req.include_vat = false;
    let quote = estimator.estimate(&req).expect("quote");
    approx(quote.monthly_payment_final, quote.monthly_payment_before_vat);
    assert_eq!(quote.monthly_payment_rounded, 8_146);
}

#[test]
fn estimate_is_repeatable() {
    let estimator = LoanEstimator::default();
    let req = request(525_000.0, 50_000.0, 48);
    let first = estimator.estimate(&req).expect("quote");
    let second = estimator.estimate(&req).expect("quote");
    assert_eq!(first, second);
}

#[test]
fn larger_down_payment_never_raises_installment() {
    let estimator = LoanEstimator::default();
    let mut previous = f64::MAX;
    for down in (0..=500_000).step_by(25_000) {
        let quote = estimator
            .estimate(&request(450_000.0, down as f64, 60))
            .expect("quote");
        assert!(quote.monthly_payment_final <= previous);
        previous = quote.monthly_payment_final;
    }
}

#[test]
fn longer_terms_never_raise_installment() {
    let estimator = LoanEstimator::default();
    let mut previous = f64::MAX;
    for term in DEFAULT_TERM_OPTIONS {
        let quote = estimator
            .estimate(&request(450_000.0, 45_000.0, term))
            .expect("quote");
        assert!(
            quote.monthly_payment_final <= previous,
            "{term} months raised the installment"
        );
        previous = quote.monthly_payment_final;
    }
}

#[test]
fn down_payment_covering_price_yields_zero() {
    let estimator = LoanEstimator::default();
    let quote = estimator
        .estimate(&request(300_000.0, 350_000.0, 84))
        .expect("quote");
    assert_eq!(quote.principal, 0.0);
    assert_eq!(quote.total_interest, 0.0);
    assert_eq!(quote.monthly_payment_final, 0.0);
    assert_eq!(quote.monthly_payment_rounded, 0);
}

#[test]
fn free_vehicle_yields_zero() {
    let estimator = LoanEstimator::default();
    let quote = estimator.estimate(&request(0.0, 0.0, 12)).expect("quote");
    assert_eq!(quote.monthly_payment_rounded, 0);
}

#[test]
fn rejects_terms_outside_offered_plans() {
    let estimator = LoanEstimator::default();
    assert_eq!(
        estimator.estimate(&request(300_000.0, 0.0, 0)),
        Err(FinanceError::InvalidTerm(0))
    );
    assert_eq!(
        estimator.estimate(&request(300_000.0, 0.0, 30)),
        Err(FinanceError::InvalidTerm(30))
    );
}

#[test]
fn negative_inputs_are_clamped() {
    let estimator = LoanEstimator::default();
    let mut req = request(-10.0, -5_000.0, 12);
    req.nominal_annual_rate_percent = f64::NAN;
    let quote = estimator.estimate(&req).expect("quote");
    assert_eq!(quote.principal, 0.0);
    approx(quote.effective_annual_rate_percent, 0.27);
}

#[test]
fn surcharge_follows_age_bands() {
    let cases = [
        (17, 0.27),
        (20, 0.27),
        (30, 0.27),
        (31, 0.40),
        (40, 0.40),
        (41, 0.62),
        (50, 0.62),
        (51, 1.00),
        (60, 1.00),
        (61, 2.00),
        (70, 2.00),
        (85, 2.00),
    ];
    for (age, expected) in cases {
        approx(insurance_surcharge_percent(age), expected);
    }
}

#[test]
fn down_payment_percent_conversions() {
    assert_eq!(down_payment_from_percent(459_000.0, 15.0), 68_850.0);
    assert_eq!(down_payment_from_percent(459_000.0, 150.0), 459_000.0);
    assert_eq!(down_payment_from_percent(459_000.0, -5.0), 0.0);
    approx(down_payment_percent(400_000.0, 100_000.0), 25.0);
    assert_eq!(down_payment_percent(0.0, 100_000.0), 0.0);
}

#[test]
fn clamp_amount_zeroes_invalid_values() {
    assert_eq!(clamp_amount(-1.0), 0.0);
    assert_eq!(clamp_amount(f64::NAN), 0.0);
    assert_eq!(clamp_amount(f64::INFINITY), 0.0);
    assert_eq!(clamp_amount(12.5), 12.5);
}
