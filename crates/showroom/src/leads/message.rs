use serde::Serialize;

use super::domain::{ContactRequest, LeadKind, LeadSubmission, SellCarRequest};
use crate::credit::{CreditAssessment, CreditProfile, Occupation};

const RULE: &str = "--------------------------------";
const BLANK: &str = "-";

/// Notification handed to the relay for the showroom inbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeadMessage {
    pub subject: String,
    pub from_name: String,
    pub body: String,
}

impl LeadMessage {
    /// Renders a submission. Credit pre-screens carry the server-side assessment.
    pub fn compose(submission: &LeadSubmission, assessment: Option<&CreditAssessment>) -> Self {
        let from_name = or_blank(Some(submission.full_name())).to_string();
        let subject = format!("[{}] {}", submission.kind().label(), from_name);
        let body = match submission {
            LeadSubmission::CreditCheck(profile) => credit_check_body(profile, assessment),
            LeadSubmission::SellCar(request) => sell_car_body(request),
            LeadSubmission::Contact(request) => contact_body(request),
        };

        Self {
            subject,
            from_name,
            body,
        }
    }
}

fn credit_check_body(profile: &CreditProfile, assessment: Option<&CreditAssessment>) -> String {
    let mut body = String::new();
    push_line(&mut body, &format!("[{}]", LeadKind::CreditCheck.label()));
    push_line(&mut body, RULE);
    push_line(&mut body, &format!("Name: {}", or_blank(Some(&profile.full_name))));
    push_line(&mut body, &format!("Phone: {}", or_blank(Some(&profile.phone))));
    push_line(&mut body, &format!("Age: {}", profile.age));
    let gender = profile.gender.map_or(BLANK, |gender| gender.label());
    push_line(&mut body, &format!("Gender: {gender}"));
    let province = or_blank(profile.province.as_deref());
    push_line(&mut body, &format!("Province: {province}"));

    push_line(&mut body, "\n[Occupation]");
    push_line(&mut body, &format!("Occupation: {}", profile.occupation.label()));
    if let Some(workplace) = present(profile.workplace_name.as_deref()) {
        push_line(&mut body, &format!("Workplace: {workplace}"));
    }
    if let Some(position) = present(profile.job_position.as_deref()) {
        push_line(&mut body, &format!("Position: {position}"));
    }
    let years = profile
        .work_years
        .map_or(BLANK.to_string(), |years| years.to_string());
    push_line(&mut body, &format!("Years in role: {years}"));
    let income = format_amount(profile.monthly_income);
    push_line(&mut body, &format!("Income: {income} THB/month"));

    match profile.occupation {
        Occupation::Farmer => {
            push_line(&mut body, "\n(Farmer)");
            let farm_type = or_blank(profile.agriculture_type.as_deref());
            push_line(&mut body, &format!("Farm type: {farm_type}"));
            let area = profile
                .farm_area_rai
                .map_or(BLANK.to_string(), |area| area.to_string());
            push_line(&mut body, &format!("Farm area: {area} rai"));
            let yearly = format_amount(profile.yearly_income);
            push_line(&mut body, &format!("Yearly income: {yearly} THB"));
            let book = yes_no(profile.has_farmer_book);
            push_line(&mut body, &format!("Farmer book: {book}"));
        }
        Occupation::Business => {
            push_line(&mut body, "\n(Business owner)");
            let registered = yes_no(profile.has_business_registration);
            push_line(&mut body, &format!("Commercial registration: {registered}"));
        }
        _ => {}
    }

    push_line(&mut body, "\n[Interest]");
    push_line(&mut body, &format!("Car price: {}", format_baht(profile.car_price)));
    push_line(&mut body, &format!("Down payment: {}", format_baht(profile.down_payment)));

    push_line(&mut body, "\n[Assessment]");
    match assessment {
        Some(assessment) => {
            push_line(&mut body, &assessment.title);
            push_line(&mut body, &format!("(Pre-screen score: {}/100)", assessment.score));
        }
        None => push_line(&mut body, "Not assessed"),
    }
    body.push_str(RULE);
    body
}

fn sell_car_body(request: &SellCarRequest) -> String {
    let mut body = String::new();
    push_line(&mut body, &format!("[{}]", LeadKind::SellCar.label()));
    push_line(&mut body, RULE);
    push_line(&mut body, &format!("Name: {}", or_blank(Some(&request.full_name))));
    push_line(&mut body, &format!("Phone: {}", or_blank(Some(&request.phone))));
    push_line(&mut body, &format!("LINE ID: {}", or_blank(request.line_id.as_deref())));
    push_line(&mut body, &format!("Province: {}", or_blank(request.province.as_deref())));

    push_line(&mut body, "\n[Vehicle]");
    push_line(&mut body, &format!("Brand: {}", or_blank(request.brand.as_deref())));
    push_line(&mut body, &format!("Model: {}", or_blank(request.model.as_deref())));
    let year = request.year.map_or(BLANK.to_string(), |year| year.to_string());
    push_line(&mut body, &format!("Year: {year}"));
    let mileage = request
        .mileage_km
        .map_or(BLANK.to_string(), |km| format!("{} km", group_digits(km)));
    push_line(&mut body, &format!("Mileage: {mileage}"));
    let expected = format_baht(request.expected_price);
    push_line(&mut body, &format!("Expected price: {expected}"));
    let photos = or_blank(request.photo_link.as_deref());
    push_line(&mut body, &format!("Photos/video: {photos}"));

    push_line(&mut body, "\n[Notes]");
    push_line(&mut body, or_blank(request.notes.as_deref()));
    body.push_str(RULE);
    body
}

fn contact_body(request: &ContactRequest) -> String {
    let mut body = String::new();
    push_line(&mut body, &format!("[{}]", LeadKind::Contact.label()));
    push_line(&mut body, RULE);
    push_line(&mut body, &format!("Name: {}", or_blank(Some(&request.full_name))));
    push_line(&mut body, &format!("Phone: {}", or_blank(Some(&request.phone))));
    let interest = or_blank(request.interest.as_deref());
    push_line(&mut body, &format!("Interested in: {interest}"));

    push_line(&mut body, "\n[Message]");
    push_line(&mut body, or_blank(request.detail.as_deref()));
    body.push_str(RULE);
    body
}

fn push_line(body: &mut String, text: &str) {
    body.push_str(text);
    body.push('\n');
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|text| !text.is_empty())
}

fn or_blank(value: Option<&str>) -> &str {
    present(value).unwrap_or(BLANK)
}

fn yes_no(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "yes",
        Some(false) => "no",
        None => BLANK,
    }
}

fn format_amount(value: Option<f64>) -> String {
    value.map_or(BLANK.to_string(), group_digits)
}

fn format_baht(value: Option<f64>) -> String {
    value.map_or(BLANK.to_string(), |amount| {
        format!("{} THB", group_digits(amount))
    })
}

/// Whole-unit amount with comma thousands separators.
pub fn group_digits(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded < 0 {
        grouped.push('-');
    }
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}
