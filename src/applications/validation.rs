//! Per-program form rules
//!
//! Each grant program has a static ruleset of `(field, rule)` pairs layered on
//! top of the rules every applicant must satisfy. A form is checked against the
//! full ruleset for its program and every failing field is reported at once.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use super::types::ApplicationType;
use crate::error::FieldError;

/// Raw application form as posted by the public site
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationForm {
    pub application_type: Option<ApplicationType>,
    pub applicant_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub child_name: Option<String>,
    pub child_age: Option<i64>,
    pub relationship: Option<String>,
    pub loss_description: Option<String>,
    pub activity_description: Option<String>,
    pub school_name: Option<String>,
    pub essay: Option<String>,
    pub transcript_url: Option<String>,
    pub recommendation_url: Option<String>,
    pub self_care_plan: Option<String>,
    pub region: Option<String>,
    pub conflict_description: Option<String>,
    pub requested_amount: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    ApplicantName,
    Email,
    Phone,
    Address,
    ChildName,
    ChildAge,
    Relationship,
    LossDescription,
    ActivityDescription,
    SchoolName,
    Essay,
    TranscriptUrl,
    RecommendationUrl,
    SelfCarePlan,
    Region,
    ConflictDescription,
    RequestedAmount,
}

impl Field {
    pub fn name(&self) -> &'static str {
        match self {
            Field::ApplicantName => "applicant_name",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::Address => "address",
            Field::ChildName => "child_name",
            Field::ChildAge => "child_age",
            Field::Relationship => "relationship",
            Field::LossDescription => "loss_description",
            Field::ActivityDescription => "activity_description",
            Field::SchoolName => "school_name",
            Field::Essay => "essay",
            Field::TranscriptUrl => "transcript_url",
            Field::RecommendationUrl => "recommendation_url",
            Field::SelfCarePlan => "self_care_plan",
            Field::Region => "region",
            Field::ConflictDescription => "conflict_description",
            Field::RequestedAmount => "requested_amount",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Rule {
    MinLen(usize),
    Range(i64, i64),
    OneOf(&'static [&'static str]),
    Email,
    Phone,
    Url,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: Field,
    pub rule: Rule,
}

const fn rule(field: Field, rule: Rule) -> FieldRule {
    FieldRule { field, rule }
}

const CHILD_RELATIONSHIPS: &[&str] = &["parent", "guardian", "grandparent", "other_family"];
const SURVIVOR_RELATIONSHIPS: &[&str] = &["spouse", "partner", "parent", "child", "sibling", "other"];

const COMMON_RULES: &[FieldRule] = &[
    rule(Field::ApplicantName, Rule::MinLen(2)),
    rule(Field::Email, Rule::Email),
    rule(Field::Phone, Rule::Phone),
    rule(Field::Address, Rule::MinLen(5)),
    rule(Field::LossDescription, Rule::MinLen(50)),
];

const FUN_GRANT_RULES: &[FieldRule] = &[
    rule(Field::ChildName, Rule::MinLen(2)),
    rule(Field::ChildAge, Rule::Range(1, 17)),
    rule(Field::Relationship, Rule::OneOf(CHILD_RELATIONSHIPS)),
    rule(Field::ActivityDescription, Rule::MinLen(20)),
    rule(Field::RequestedAmount, Rule::Range(25, 500)),
];

const FINANCIAL_AID_RULES: &[FieldRule] = &[
    rule(Field::ChildName, Rule::MinLen(2)),
    rule(Field::ChildAge, Rule::Range(16, 25)),
    rule(Field::SchoolName, Rule::MinLen(2)),
    rule(Field::Essay, Rule::MinLen(100)),
    rule(Field::TranscriptUrl, Rule::Url),
    rule(Field::RecommendationUrl, Rule::Url),
    rule(Field::RequestedAmount, Rule::Range(100, 5000)),
];

const SELF_CARE_RULES: &[FieldRule] = &[
    rule(Field::Relationship, Rule::OneOf(SURVIVOR_RELATIONSHIPS)),
    rule(Field::SelfCarePlan, Rule::MinLen(50)),
    rule(Field::RequestedAmount, Rule::Range(25, 1000)),
];

const REGIONAL_CONFLICT_RULES: &[FieldRule] = &[
    rule(Field::Region, Rule::MinLen(2)),
    rule(Field::Relationship, Rule::OneOf(CHILD_RELATIONSHIPS)),
    rule(Field::ConflictDescription, Rule::MinLen(50)),
    rule(Field::RequestedAmount, Rule::Range(50, 2500)),
];

/// Rules specific to one program, excluding the common contact rules
pub fn category_rules(kind: ApplicationType) -> &'static [FieldRule] {
    match kind {
        ApplicationType::FunGrant => FUN_GRANT_RULES,
        ApplicationType::FinancialAid => FINANCIAL_AID_RULES,
        ApplicationType::SelfCare => SELF_CARE_RULES,
        ApplicationType::RegionalConflict => REGIONAL_CONFLICT_RULES,
    }
}

pub fn rules_for(kind: ApplicationType) -> impl Iterator<Item = &'static FieldRule> {
    COMMON_RULES.iter().chain(category_rules(kind).iter())
}

/// Whether `field` belongs to the insert shape of `kind`
pub fn uses_field(kind: ApplicationType, field: Field) -> bool {
    rules_for(kind).any(|r| r.field == field)
}

/// Requested amount bounds for a program, in whole dollars
pub fn amount_range(kind: ApplicationType) -> (i64, i64) {
    category_rules(kind)
        .iter()
        .find_map(|r| match (r.field, r.rule) {
            (Field::RequestedAmount, Rule::Range(min, max)) => Some((min, max)),
            _ => None,
        })
        .unwrap_or((0, 0))
}

fn text(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

enum FieldValue<'a> {
    Text(Option<&'a str>),
    Number(Option<i64>),
}

impl ApplicationForm {
    fn value(&self, field: Field) -> FieldValue<'_> {
        match field {
            Field::ApplicantName => FieldValue::Text(text(&self.applicant_name)),
            Field::Email => FieldValue::Text(text(&self.email)),
            Field::Phone => FieldValue::Text(text(&self.phone)),
            Field::Address => FieldValue::Text(text(&self.address)),
            Field::ChildName => FieldValue::Text(text(&self.child_name)),
            Field::ChildAge => FieldValue::Number(self.child_age),
            Field::Relationship => FieldValue::Text(text(&self.relationship)),
            Field::LossDescription => FieldValue::Text(text(&self.loss_description)),
            Field::ActivityDescription => FieldValue::Text(text(&self.activity_description)),
            Field::SchoolName => FieldValue::Text(text(&self.school_name)),
            Field::Essay => FieldValue::Text(text(&self.essay)),
            Field::TranscriptUrl => FieldValue::Text(text(&self.transcript_url)),
            Field::RecommendationUrl => FieldValue::Text(text(&self.recommendation_url)),
            Field::SelfCarePlan => FieldValue::Text(text(&self.self_care_plan)),
            Field::Region => FieldValue::Text(text(&self.region)),
            Field::ConflictDescription => FieldValue::Text(text(&self.conflict_description)),
            Field::RequestedAmount => FieldValue::Number(self.requested_amount),
        }
    }
}

/// Validate a form against its program's ruleset.
///
/// Returns every failing field so the page can highlight them together.
pub fn validate(form: &ApplicationForm) -> Result<ApplicationType, Vec<FieldError>> {
    let Some(kind) = form.application_type else {
        return Err(vec![FieldError::new(
            "application_type",
            "Please choose a grant program",
        )]);
    };

    let errors: Vec<FieldError> = rules_for(kind)
        .filter_map(|r| check(r, form.value(r.field)).map(|msg| FieldError::new(r.field.name(), msg)))
        .collect();

    if errors.is_empty() {
        Ok(kind)
    } else {
        Err(errors)
    }
}

fn check(field_rule: &FieldRule, value: FieldValue<'_>) -> Option<String> {
    match (field_rule.rule, value) {
        (_, FieldValue::Text(None)) | (_, FieldValue::Number(None)) => {
            Some("This field is required".to_string())
        }
        (Rule::MinLen(min), FieldValue::Text(Some(v))) => (v.chars().count() < min)
            .then(|| format!("Must be at least {} characters", min)),
        (Rule::Range(min, max), FieldValue::Number(Some(n))) => {
            (n < min || n > max).then(|| format!("Must be between {} and {}", min, max))
        }
        (Rule::OneOf(allowed), FieldValue::Text(Some(v))) => (!allowed.iter().any(|a| *a == v))
            .then(|| format!("Must be one of: {}", allowed.join(", "))),
        (Rule::Email, FieldValue::Text(Some(v))) => {
            (!is_email(v)).then(|| "Please enter a valid email address".to_string())
        }
        (Rule::Phone, FieldValue::Text(Some(v))) => {
            (!is_phone(v)).then(|| "Please enter a valid phone number".to_string())
        }
        (Rule::Url, FieldValue::Text(Some(v))) => {
            (!is_url(v)).then(|| "Please upload the document again".to_string())
        }
        (_, FieldValue::Text(Some(_))) | (_, FieldValue::Number(Some(_))) => {
            Some("Unexpected value".to_string())
        }
    }
}

fn is_email(value: &str) -> bool {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok())
        .as_ref()
        .map_or(false, |re| re.is_match(value))
}

fn is_phone(value: &str) -> bool {
    let digits = value.chars().filter(|c| c.is_ascii_digit()).count();
    let allowed = value
        .chars()
        .all(|c| c.is_ascii_digit() || " +-().".contains(c));
    allowed && (10..=15).contains(&digits)
}

fn is_url(value: &str) -> bool {
    (value.starts_with("https://") || value.starts_with("http://"))
        && value.len() > "https://".len()
        && !value.contains(char::is_whitespace)
}
