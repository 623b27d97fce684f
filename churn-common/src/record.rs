//! Customer record submitted for a churn prediction
//!
//! A record is one row of 19 named attributes. Categorical attributes are
//! closed enums so an out-of-domain value cannot be represented; numeric
//! attributes are range-checked by [`crate::fields::collect`] before a
//! record is built.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Raw column names, in the order the input form lists them.
pub const FIELD_NAMES: [&str; 19] = [
    "gender",
    "SeniorCitizen",
    "Partner",
    "Dependents",
    "tenure",
    "PhoneService",
    "MultipleLines",
    "InternetService",
    "OnlineSecurity",
    "OnlineBackup",
    "DeviceProtection",
    "TechSupport",
    "StreamingTV",
    "StreamingMovies",
    "Contract",
    "PaperlessBilling",
    "PaymentMethod",
    "MonthlyCharges",
    "TotalCharges",
];

/// Error for a string that names no variant of a choice enum
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownChoice {
    pub value: String,
}

impl fmt::Display for UnknownChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown choice '{}'", self.value)
    }
}

impl std::error::Error for UnknownChoice {}

macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant, in form order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Label as it appears in the form and in processor artifacts
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownChoice;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(UnknownChoice { value: other.to_string() }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

choice_enum! {
    Gender { Male => "Male", Female => "Female" }
}

choice_enum! {
    /// Plain yes/no attribute (Partner, Dependents, PhoneService, PaperlessBilling)
    YesNo { Yes => "Yes", No => "No" }
}

choice_enum! {
    MultipleLines { No => "No", Yes => "Yes", NoPhoneService => "No phone service" }
}

choice_enum! {
    InternetService { Dsl => "DSL", FiberOptic => "Fiber optic", No => "No" }
}

choice_enum! {
    /// Add-on that only exists with an internet subscription
    InternetAddon { No => "No", Yes => "Yes", NoInternetService => "No internet service" }
}

choice_enum! {
    Contract { MonthToMonth => "Month-to-month", OneYear => "One year", TwoYear => "Two year" }
}

choice_enum! {
    PaymentMethod {
        ElectronicCheck => "Electronic check",
        MailedCheck => "Mailed check",
        BankTransfer => "Bank transfer (automatic)",
        CreditCard => "Credit card (automatic)",
    }
}

/// Value of a single column as seen by the feature processor
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Category(&'static str),
    Number(f64),
}

impl FieldValue {
    /// Key used to match the value against artifact category lists.
    ///
    /// Integral numbers render without a fractional part so `SeniorCitizen`
    /// matches categories `"0"` and `"1"`.
    pub fn category_key(&self) -> String {
        match self {
            FieldValue::Category(s) => (*s).to_string(),
            FieldValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                format!("{}", *n as i64)
            }
            FieldValue::Number(n) => n.to_string(),
        }
    }
}

/// One customer, one row. Built fresh per submission and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    pub gender: Gender,
    #[serde(rename = "SeniorCitizen")]
    pub senior_citizen: bool,
    #[serde(rename = "Partner")]
    pub partner: YesNo,
    #[serde(rename = "Dependents")]
    pub dependents: YesNo,
    /// Months with the company, 0..=72
    pub tenure: u32,
    #[serde(rename = "PhoneService")]
    pub phone_service: YesNo,
    #[serde(rename = "MultipleLines")]
    pub multiple_lines: MultipleLines,
    #[serde(rename = "InternetService")]
    pub internet_service: InternetService,
    #[serde(rename = "OnlineSecurity")]
    pub online_security: InternetAddon,
    #[serde(rename = "OnlineBackup")]
    pub online_backup: InternetAddon,
    #[serde(rename = "DeviceProtection")]
    pub device_protection: InternetAddon,
    #[serde(rename = "TechSupport")]
    pub tech_support: InternetAddon,
    #[serde(rename = "StreamingTV")]
    pub streaming_tv: InternetAddon,
    #[serde(rename = "StreamingMovies")]
    pub streaming_movies: InternetAddon,
    #[serde(rename = "Contract")]
    pub contract: Contract,
    #[serde(rename = "PaperlessBilling")]
    pub paperless_billing: YesNo,
    #[serde(rename = "PaymentMethod")]
    pub payment_method: PaymentMethod,
    #[serde(rename = "MonthlyCharges")]
    pub monthly_charges: f64,
    #[serde(rename = "TotalCharges")]
    pub total_charges: f64,
}

impl CustomerRecord {
    /// Look up a column by its raw name. Returns `None` for unknown names.
    pub fn value(&self, column: &str) -> Option<FieldValue> {
        use FieldValue::{Category, Number};

        let value = match column {
            "gender" => Category(self.gender.as_str()),
            "SeniorCitizen" => Number(if self.senior_citizen { 1.0 } else { 0.0 }),
            "Partner" => Category(self.partner.as_str()),
            "Dependents" => Category(self.dependents.as_str()),
            "tenure" => Number(f64::from(self.tenure)),
            "PhoneService" => Category(self.phone_service.as_str()),
            "MultipleLines" => Category(self.multiple_lines.as_str()),
            "InternetService" => Category(self.internet_service.as_str()),
            "OnlineSecurity" => Category(self.online_security.as_str()),
            "OnlineBackup" => Category(self.online_backup.as_str()),
            "DeviceProtection" => Category(self.device_protection.as_str()),
            "TechSupport" => Category(self.tech_support.as_str()),
            "StreamingTV" => Category(self.streaming_tv.as_str()),
            "StreamingMovies" => Category(self.streaming_movies.as_str()),
            "Contract" => Category(self.contract.as_str()),
            "PaperlessBilling" => Category(self.paperless_billing.as_str()),
            "PaymentMethod" => Category(self.payment_method.as_str()),
            "MonthlyCharges" => Number(self.monthly_charges),
            "TotalCharges" => Number(self.total_charges),
            _ => return None,
        };
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choice_round_trip_through_str() {
        for c in Contract::ALL {
            assert_eq!(c.as_str().parse::<Contract>().unwrap(), *c);
        }
        assert_eq!(
            "Bank transfer (automatic)".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::BankTransfer
        );
        assert!("month-to-month".parse::<Contract>().is_err());
    }

    #[test]
    fn test_every_field_name_resolves() {
        let record = crate::fields::default_record();
        for name in FIELD_NAMES {
            assert!(record.value(name).is_some(), "column {} has no value", name);
        }
        assert!(record.value("customerID").is_none());
    }

    #[test]
    fn test_category_key_for_numbers() {
        assert_eq!(FieldValue::Number(0.0).category_key(), "0");
        assert_eq!(FieldValue::Number(1.0).category_key(), "1");
        assert_eq!(FieldValue::Number(70.5).category_key(), "70.5");
        assert_eq!(FieldValue::Category("DSL").category_key(), "DSL");
    }

    #[test]
    fn test_serializes_with_raw_column_names() {
        let record = crate::fields::default_record();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["Contract"], "Month-to-month");
        assert_eq!(json["SeniorCitizen"], false);
        assert_eq!(json["tenure"], 12);
        assert_eq!(json["MultipleLines"], "No");
    }
}
