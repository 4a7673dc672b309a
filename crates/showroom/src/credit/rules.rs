use super::domain::{CreditProfile, CreditStatus, Occupation};
use super::{CreditFactor, ScoreComponent};
use crate::finance::clamp_amount;

pub(crate) fn score_profile(profile: &CreditProfile) -> (Vec<ScoreComponent>, i32) {
    let mut components = vec![
        age_component(profile.age),
        occupation_component(profile.occupation),
        credit_status_component(profile.credit_status),
        tenure_component(profile.work_years),
    ];

    if profile.registered_business() {
        components.push(ScoreComponent {
            factor: CreditFactor::BusinessRegistration,
            points: 6,
            notes: "registered business".to_string(),
        });
    }

    if profile.holds_farmer_book() {
        components.push(ScoreComponent {
            factor: CreditFactor::FarmerBook,
            points: 6,
            notes: "holds farmer registration book".to_string(),
        });
    }

    if profile.occupation == Occupation::Farmer {
        if let Some(component) = farm_area_component(profile.farm_area()) {
            components.push(component);
        }
    }

    components.push(income_component(profile.derived_monthly_income()));
    components.push(down_payment_component(profile.car_price, profile.down_payment));

    let total = components.iter().map(|component| component.points).sum();
    (components, total)
}

fn age_component(age: i32) -> ScoreComponent {
    let points = match age {
        23..=55 => 20,
        20..=22 | 56..=60 => 14,
        18..=19 => 8,
        _ => 0,
    };
    ScoreComponent {
        factor: CreditFactor::Age,
        points,
        notes: format!("age {age}"),
    }
}

fn occupation_component(occupation: Occupation) -> ScoreComponent {
    let points = match occupation {
        Occupation::Government => 22,
        Occupation::Employee => 18,
        Occupation::Business => 14,
        Occupation::Freelance | Occupation::Farmer => 10,
        Occupation::Student => 6,
        Occupation::Other => 8,
    };
    ScoreComponent {
        factor: CreditFactor::Occupation,
        points,
        notes: occupation.label().to_string(),
    }
}

fn credit_status_component(status: CreditStatus) -> ScoreComponent {
    let points = match status {
        CreditStatus::Good => 28,
        CreditStatus::Normal => 18,
        CreditStatus::NoHistory => 14,
        CreditStatus::Unknown => 12,
        CreditStatus::Bad => 0,
    };
    ScoreComponent {
        factor: CreditFactor::CreditStatus,
        points,
        notes: status.label().to_string(),
    }
}

fn tenure_component(work_years: Option<f64>) -> ScoreComponent {
    let years = work_years.map(clamp_amount).unwrap_or(0.0);
    let points = if years >= 5.0 {
        18
    } else if years >= 2.0 {
        12
    } else if years >= 1.0 {
        8
    } else {
        4
    };
    ScoreComponent {
        factor: CreditFactor::Tenure,
        points,
        notes: format!("{years} year(s) in current role"),
    }
}

fn farm_area_component(farm_area_rai: Option<f64>) -> Option<ScoreComponent> {
    let area = farm_area_rai.map(clamp_amount).unwrap_or(0.0);
    let points = if area >= 20.0 {
        6
    } else if area >= 10.0 {
        4
    } else if area > 0.0 {
        2
    } else {
        return None;
    };
    Some(ScoreComponent {
        factor: CreditFactor::FarmArea,
        points,
        notes: format!("{area} rai under cultivation"),
    })
}

fn income_component(monthly_income: Option<f64>) -> ScoreComponent {
    let income = monthly_income.map(clamp_amount).unwrap_or(0.0);
    let points = if income >= 50_000.0 {
        18
    } else if income >= 30_000.0 {
        14
    } else if income >= 20_000.0 {
        10
    } else if income > 0.0 {
        6
    } else {
        0
    };
    ScoreComponent {
        factor: CreditFactor::Income,
        points,
        notes: if income > 0.0 {
            format!("monthly income {income:.0}")
        } else {
            "no income declared".to_string()
        },
    }
}

fn down_payment_component(car_price: Option<f64>, down_payment: Option<f64>) -> ScoreComponent {
    let down = down_payment.map(clamp_amount).unwrap_or(0.0);
    let price = car_price.map(clamp_amount).unwrap_or(0.0);

    let (points, notes) = if price > 0.0 {
        let ratio = down / price * 100.0;
        let points = if ratio >= 25.0 {
            22
        } else if ratio >= 15.0 {
            16
        } else if ratio >= 5.0 {
            10
        } else {
            4
        };
        (points, format!("down payment {ratio:.1}% of price"))
    } else {
        let points = if down >= 100_000.0 {
            20
        } else if down >= 50_000.0 {
            14
        } else if down > 0.0 {
            8
        } else {
            4
        };
        (points, format!("down payment {down:.0} without a quoted price"))
    };

    ScoreComponent {
        factor: CreditFactor::DownPayment,
        points,
        notes,
    }
}
