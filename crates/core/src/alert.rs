//! Threshold alert definitions: criteria, active days, validation and evaluation.
//!
//! Request bodies arrive as [`AlertFields`], where every field is still
//! loosely typed JSON. [`AlertFields::validate`] is the only way to obtain an
//! [`AlertDefinition`], so nothing unnormalized reaches the repository layer.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::error::{CoreError, FieldErrors};
use crate::weekday::{Weekday, WeekdaySet};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Phone numbers: 8 to 15 characters of digits, `+`, `-`, whitespace and parentheses.
pub const PHONE_PATTERN: &str = r"^[0-9+\-\s()]{8,15}$";

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PHONE_PATTERN).expect("valid regex"));

const REQUIRED: &str = "is required";

// ---------------------------------------------------------------------------
// Criteria
// ---------------------------------------------------------------------------

/// Direction of the threshold comparison.
///
/// Serialized as `"Greater"` / `"Less"`; the longer `"GreaterThan"` /
/// `"LessThan"` spellings are accepted when parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Criteria {
    #[serde(rename = "Greater", alias = "GreaterThan")]
    GreaterThan,
    #[serde(rename = "Less", alias = "LessThan")]
    LessThan,
}

impl Criteria {
    pub fn as_str(self) -> &'static str {
        match self {
            Criteria::GreaterThan => "Greater",
            Criteria::LessThan => "Less",
        }
    }

    /// Whether `reading` is strictly beyond `threshold` in this direction.
    pub fn compare(self, reading: f64, threshold: f64) -> bool {
        match self {
            Criteria::GreaterThan => reading > threshold,
            Criteria::LessThan => reading < threshold,
        }
    }
}

impl fmt::Display for Criteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Criteria {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Greater" | "GreaterThan" => Ok(Criteria::GreaterThan),
            "Less" | "LessThan" => Ok(Criteria::LessThan),
            other => Err(CoreError::Validation(format!(
                "Invalid criteria '{other}'. Must be one of: [\"Greater\", \"Less\"]"
            ))),
        }
    }
}

impl TryFrom<String> for Criteria {
    type Error = CoreError;

    fn try_from(token: String) -> Result<Self, Self::Error> {
        token.parse()
    }
}

// ---------------------------------------------------------------------------
// Request payload
// ---------------------------------------------------------------------------

/// Full field set for creating or replacing an alert.
///
/// Every field is raw JSON at the serde level, so a missing or wrongly typed
/// field is reported through validation instead of a deserialization
/// rejection. The short names used by older clients (`days`, `email`,
/// `phone`) are accepted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlertFields {
    pub name: Option<Value>,
    pub criteria: Option<Value>,
    pub value: Option<Value>,
    #[serde(alias = "days")]
    pub active_days: Option<Value>,
    #[serde(alias = "email")]
    pub notify_email: Option<Value>,
    #[serde(alias = "phone")]
    pub notify_phone: Option<Value>,
}

/// Text fields checked with `validator` once they have been normalized.
#[derive(Debug, Validate)]
struct TextChecks {
    #[validate(length(min = 2, max = 50, message = "must be between 2 and 50 characters"))]
    name: Option<String>,
    #[validate(email(message = "is not a valid email address"))]
    notify_email: Option<String>,
}

impl AlertFields {
    /// Normalize and validate every field, collecting all violations.
    ///
    /// Returns [`CoreError::InvalidFields`] naming each offending field, or
    /// the normalized [`AlertDefinition`] when every rule passes.
    pub fn validate(&self) -> Result<AlertDefinition, CoreError> {
        let mut errors = FieldErrors::new();

        let name = parse_text("name", self.name.as_ref(), &mut errors)
            .map(|s| s.trim().to_string());
        let notify_email = parse_text("notify_email", self.notify_email.as_ref(), &mut errors)
            .map(|s| s.trim().to_lowercase());
        let notify_phone = parse_text("notify_phone", self.notify_phone.as_ref(), &mut errors)
            .map(|s| s.trim().to_string());

        let checks = TextChecks {
            name: name.clone(),
            notify_email: notify_email.clone(),
        };
        if let Err(failed) = checks.validate() {
            for (field, field_errors) in failed.field_errors() {
                let message = field_errors
                    .first()
                    .and_then(|e| e.message.as_ref())
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "is invalid".to_string());
                errors.add(field.to_string(), message);
            }
        }

        if let Some(phone) = notify_phone.as_deref() {
            if !PHONE_RE.is_match(phone) {
                errors.add(
                    "notify_phone",
                    "must be 8-15 characters of digits, '+', '-', spaces or parentheses",
                );
            }
        }

        let criteria = parse_criteria(self.criteria.as_ref(), &mut errors);
        let value = parse_value(self.value.as_ref(), &mut errors);
        let active_days = parse_active_days(self.active_days.as_ref(), &mut errors);

        match (name, criteria, value, active_days, notify_email, notify_phone) {
            (
                Some(name),
                Some(criteria),
                Some(value),
                Some(active_days),
                Some(notify_email),
                Some(notify_phone),
            ) if errors.is_empty() => Ok(AlertDefinition {
                name,
                criteria,
                value,
                active_days,
                notify_email,
                notify_phone,
            }),
            _ => Err(CoreError::InvalidFields(errors)),
        }
    }
}

fn parse_text<'a>(
    field: &'static str,
    raw: Option<&'a Value>,
    errors: &mut FieldErrors,
) -> Option<&'a str> {
    match raw {
        None | Some(Value::Null) => {
            errors.add(field, REQUIRED);
            None
        }
        Some(Value::String(text)) => Some(text),
        Some(_) => {
            errors.add(field, "must be a string");
            None
        }
    }
}

fn parse_criteria(raw: Option<&Value>, errors: &mut FieldErrors) -> Option<Criteria> {
    match raw {
        None | Some(Value::Null) => {
            errors.add("criteria", REQUIRED);
            None
        }
        Some(Value::String(token)) => match token.parse() {
            Ok(criteria) => Some(criteria),
            Err(_) => {
                errors.add("criteria", "must be one of \"Greater\" or \"Less\"");
                None
            }
        },
        Some(_) => {
            errors.add("criteria", "must be a string");
            None
        }
    }
}

fn parse_value(raw: Option<&Value>, errors: &mut FieldErrors) -> Option<f64> {
    let value = match raw {
        None | Some(Value::Null) => {
            errors.add("value", REQUIRED);
            return None;
        }
        Some(Value::Number(n)) => n.as_f64(),
        Some(_) => None,
    };
    match value {
        Some(v) if !v.is_finite() => {
            errors.add("value", "must be a finite number");
            None
        }
        Some(v) if v < 0.0 => {
            errors.add("value", "must be greater than or equal to 0");
            None
        }
        Some(v) => Some(v),
        None => {
            errors.add("value", "must be a number");
            None
        }
    }
}

fn parse_active_days(raw: Option<&Value>, errors: &mut FieldErrors) -> Option<WeekdaySet> {
    let items = match raw {
        None | Some(Value::Null) => {
            errors.add("active_days", REQUIRED);
            return None;
        }
        Some(Value::Array(items)) => items,
        Some(_) => {
            errors.add("active_days", "must be an array of weekday tokens");
            return None;
        }
    };

    if items.is_empty() {
        errors.add("active_days", "must contain at least one day");
        return None;
    }

    let mut days = Vec::with_capacity(items.len());
    for item in items {
        match item.as_str().map(str::parse::<Weekday>) {
            Some(Ok(day)) => days.push(day),
            Some(Err(unknown)) => {
                errors.add(
                    "active_days",
                    format!("contains {unknown}; expected Mon, Tue, Wed, Thu, Fri, Sat or Sun"),
                );
                return None;
            }
            None => {
                errors.add("active_days", "must be an array of weekday tokens");
                return None;
            }
        }
    }
    Some(days.into_iter().collect())
}

// ---------------------------------------------------------------------------
// Validated definition
// ---------------------------------------------------------------------------

/// A fully validated, normalized set of alert fields.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertDefinition {
    pub name: String,
    pub criteria: Criteria,
    pub value: f64,
    pub active_days: WeekdaySet,
    pub notify_email: String,
    pub notify_phone: String,
}

impl AlertDefinition {
    /// Whether a reading taken on `weekday` breaches this alert's threshold.
    ///
    /// Readings equal to the threshold never trigger.
    pub fn is_triggered(&self, reading: f64, weekday: impl Into<Weekday>) -> bool {
        self.active_days.contains(weekday.into()) && self.criteria.compare(reading, self.value)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
