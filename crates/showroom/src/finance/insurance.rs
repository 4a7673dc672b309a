/// Credit-life insurance loading added to the nominal rate, by borrower age.
pub fn insurance_surcharge_percent(age: i32) -> f64 {
    match age {
        i32::MIN..=30 => 0.27,
        31..=40 => 0.40,
        41..=50 => 0.62,
        51..=60 => 1.00,
        _ => 2.00,
    }
}
