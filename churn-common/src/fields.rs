//! Input field catalog and form collection
//!
//! The catalog is fixed at compile time: 19 fields, each with a widget that
//! declares its domain and default. [`collect`] turns submitted raw strings
//! into a [`CustomerRecord`], applying the same domain checks the browser
//! widgets apply.

use serde::Serialize;
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;

use crate::record::CustomerRecord;

/// Input widget and its domain
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Widget {
    /// Pick one of a fixed list; the first option is the default
    Select { options: &'static [&'static str] },
    /// Bounded number, inclusive on both ends
    Number {
        min: f64,
        max: f64,
        default: f64,
        step: f64,
        integer: bool,
    },
}

/// One labeled input on the Data Input view
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldSpec {
    /// Raw column name, also the form field name
    pub name: &'static str,
    /// Human label
    pub label: &'static str,
    pub widget: Widget,
}

impl FieldSpec {
    /// Default value as the form would submit it
    pub fn default_value(&self) -> String {
        match self.widget {
            Widget::Select { options } => options[0].to_string(),
            Widget::Number { default, .. } => default.to_string(),
        }
    }

    /// Validate a raw submitted value against this field's domain.
    ///
    /// Returns the canonical string for the value (trimmed option, or the
    /// parsed number re-rendered).
    pub fn validate(&self, raw: &str) -> Result<String, FormError> {
        let raw = raw.trim();
        match self.widget {
            Widget::Select { options } => options
                .iter()
                .find(|o| **o == raw)
                .map(|o| o.to_string())
                .ok_or_else(|| FormError::NotAnOption {
                    field: self.name,
                    value: raw.to_string(),
                }),
            Widget::Number { min, max, integer, .. } => {
                let value: f64 = raw
                    .parse()
                    .ok()
                    .filter(|v: &f64| v.is_finite())
                    .ok_or_else(|| FormError::NotANumber {
                        field: self.name,
                        value: raw.to_string(),
                    })?;
                if integer && value.fract() != 0.0 {
                    return Err(FormError::NotAnInteger {
                        field: self.name,
                        value: raw.to_string(),
                    });
                }
                if value < min || value > max {
                    return Err(FormError::OutOfRange {
                        field: self.name,
                        value,
                        min,
                        max,
                    });
                }
                Ok(value.to_string())
            }
        }
    }
}

/// Rejected form input
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("{field}: '{value}' is not one of the allowed options")]
    NotAnOption { field: &'static str, value: String },

    #[error("{field}: '{value}' is not a number")]
    NotANumber { field: &'static str, value: String },

    #[error("{field}: '{value}' must be a whole number")]
    NotAnInteger { field: &'static str, value: String },

    #[error("{field}: {value} is outside the allowed range {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

impl FormError {
    /// Name of the offending field
    pub fn field(&self) -> &'static str {
        match self {
            FormError::NotAnOption { field, .. }
            | FormError::NotANumber { field, .. }
            | FormError::NotAnInteger { field, .. }
            | FormError::OutOfRange { field, .. } => field,
        }
    }
}

const YES_NO: &[&str] = &["Yes", "No"];
const LINES: &[&str] = &["No", "Yes", "No phone service"];
const ADDON: &[&str] = &["No", "Yes", "No internet service"];

const fn select(
    name: &'static str,
    label: &'static str,
    options: &'static [&'static str],
) -> FieldSpec {
    FieldSpec {
        name,
        label,
        widget: Widget::Select { options },
    }
}

/// Whole-number field
const fn whole(
    name: &'static str,
    label: &'static str,
    min: f64,
    max: f64,
    default: f64,
) -> FieldSpec {
    FieldSpec {
        name,
        label,
        widget: Widget::Number {
            min,
            max,
            default,
            step: 1.0,
            integer: true,
        },
    }
}

/// Currency amount, entered to the cent
const fn amount(
    name: &'static str,
    label: &'static str,
    min: f64,
    max: f64,
    default: f64,
) -> FieldSpec {
    FieldSpec {
        name,
        label,
        widget: Widget::Number {
            min,
            max,
            default,
            step: 0.01,
            integer: false,
        },
    }
}

/// Every input field, in display order
pub static FIELDS: [FieldSpec; 19] = [
    select("gender", "Gender", &["Male", "Female"]),
    select("SeniorCitizen", "Senior Citizen", &["0", "1"]),
    select("Partner", "Partner", YES_NO),
    select("Dependents", "Dependents", YES_NO),
    whole("tenure", "Tenure (months)", 0.0, 72.0, 12.0),
    select("PhoneService", "Phone Service", YES_NO),
    select("MultipleLines", "Multiple Lines", LINES),
    select("InternetService", "Internet Service", &["DSL", "Fiber optic", "No"]),
    select("OnlineSecurity", "Online Security", ADDON),
    select("OnlineBackup", "Online Backup", ADDON),
    select("DeviceProtection", "Device Protection", ADDON),
    select("TechSupport", "Tech Support", ADDON),
    select("StreamingTV", "Streaming TV", ADDON),
    select("StreamingMovies", "Streaming Movies", ADDON),
    select("Contract", "Contract", &["Month-to-month", "One year", "Two year"]),
    select("PaperlessBilling", "Paperless Billing", YES_NO),
    select(
        "PaymentMethod",
        "Payment Method",
        &[
            "Electronic check",
            "Mailed check",
            "Bank transfer (automatic)",
            "Credit card (automatic)",
        ],
    ),
    amount("MonthlyCharges", "Monthly Charges", 0.0, 200.0, 70.0),
    amount("TotalCharges", "Total Charges", 0.0, 10000.0, 1400.0),
];

/// Build a record from submitted form values.
///
/// Missing fields take their default. Unknown keys are ignored. The first
/// field failing its domain check aborts collection.
pub fn collect(input: &HashMap<String, String>) -> Result<CustomerRecord, FormError> {
    let mut values: HashMap<&'static str, String> = HashMap::with_capacity(FIELDS.len());
    for spec in FIELDS.iter() {
        let canonical = match input.get(spec.name) {
            Some(raw) => spec.validate(raw)?,
            None => spec.default_value(),
        };
        values.insert(spec.name, canonical);
    }

    let get = |name: &'static str| -> &str {
        values.get(name).map(String::as_str).unwrap_or_default()
    };

    // Options are validated against the catalog above; a parse failure here
    // means the catalog and the record enums disagree.
    fn choice<T: FromStr>(field: &'static str, value: &str) -> Result<T, FormError> {
        value.parse().map_err(|_| FormError::NotAnOption {
            field,
            value: value.to_string(),
        })
    }
    fn number(field: &'static str, value: &str) -> Result<f64, FormError> {
        value.parse().map_err(|_| FormError::NotANumber {
            field,
            value: value.to_string(),
        })
    }

    Ok(CustomerRecord {
        gender: choice("gender", get("gender"))?,
        senior_citizen: get("SeniorCitizen") == "1",
        partner: choice("Partner", get("Partner"))?,
        dependents: choice("Dependents", get("Dependents"))?,
        tenure: number("tenure", get("tenure"))? as u32,
        phone_service: choice("PhoneService", get("PhoneService"))?,
        multiple_lines: choice("MultipleLines", get("MultipleLines"))?,
        internet_service: choice("InternetService", get("InternetService"))?,
        online_security: choice("OnlineSecurity", get("OnlineSecurity"))?,
        online_backup: choice("OnlineBackup", get("OnlineBackup"))?,
        device_protection: choice("DeviceProtection", get("DeviceProtection"))?,
        tech_support: choice("TechSupport", get("TechSupport"))?,
        streaming_tv: choice("StreamingTV", get("StreamingTV"))?,
        streaming_movies: choice("StreamingMovies", get("StreamingMovies"))?,
        contract: choice("Contract", get("Contract"))?,
        paperless_billing: choice("PaperlessBilling", get("PaperlessBilling"))?,
        payment_method: choice("PaymentMethod", get("PaymentMethod"))?,
        monthly_charges: number("MonthlyCharges", get("MonthlyCharges"))?,
        total_charges: number("TotalCharges", get("TotalCharges"))?,
    })
}

/// Record produced by submitting the form untouched
pub fn default_record() -> CustomerRecord {
    use crate::record::*;

    CustomerRecord {
        gender: Gender::Male,
        senior_citizen: false,
        partner: YesNo::Yes,
        dependents: YesNo::Yes,
        tenure: 12,
        phone_service: YesNo::Yes,
        multiple_lines: MultipleLines::No,
        internet_service: InternetService::Dsl,
        online_security: InternetAddon::No,
        online_backup: InternetAddon::No,
        device_protection: InternetAddon::No,
        tech_support: InternetAddon::No,
        streaming_tv: InternetAddon::No,
        streaming_movies: InternetAddon::No,
        contract: Contract::MonthToMonth,
        paperless_billing: YesNo::Yes,
        payment_method: PaymentMethod::ElectronicCheck,
        monthly_charges: 70.0,
        total_charges: 1400.0,
    }
}
