//! Input validation.
//!
//! The `validate` module turns [`RawInputs`] into [`ValidatedInputs`].
//! Each field goes through a typed parse step ([`parse_field`]) and is
//! then checked against its [`Constraint`].  Fields are checked
//! independently and every failure is collected, so a caller can show
//! all problems at once.  A string that is not a number and a number
//! outside its range are reported identically.

use crate::models::{Basis, RawInputs, ValidatedInputs};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Names of the input fields, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    CalculationBasis,
    AnnualRevenue,
    DowntimeDuration,
    AffectedEmployees,
    HourlyWage,
    AnnualOverhead,
    ProfitMargin,
    PenaltyCost,
}

impl Field {
    pub const REQUIRED: [Field; 4] = [
        Field::AnnualRevenue,
        Field::DowntimeDuration,
        Field::AffectedEmployees,
        Field::HourlyWage,
    ];

    pub const OPTIONAL: [Field; 3] = [Field::AnnualOverhead, Field::ProfitMargin, Field::PenaltyCost];

    /// Wire name of the field.
    pub fn as_str(self) -> &'static str {
        match self {
            Field::CalculationBasis => "calculationBasis",
            Field::AnnualRevenue => "annualRevenue",
            Field::DowntimeDuration => "downtimeDuration",
            Field::AffectedEmployees => "affectedEmployees",
            Field::HourlyWage => "hourlyWage",
            Field::AnnualOverhead => "annualOverhead",
            Field::ProfitMargin => "profitMargin",
            Field::PenaltyCost => "penaltyCost",
        }
    }

    /// The raw text a user supplied for this field.
    pub fn raw(self, raw: &RawInputs) -> &str {
        match self {
            Field::CalculationBasis => &raw.calculation_basis,
            Field::AnnualRevenue => &raw.annual_revenue,
            Field::DowntimeDuration => &raw.downtime_duration,
            Field::AffectedEmployees => &raw.affected_employees,
            Field::HourlyWage => &raw.hourly_wage,
            Field::AnnualOverhead => &raw.annual_overhead,
            Field::ProfitMargin => &raw.profit_margin,
            Field::PenaltyCost => &raw.penalty_cost,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The rule a present value must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    Positive,
    NonNegative,
    NonNegativeInteger,
    Percentage,
    Basis,
}

/// The range check applied to a parsed number.  Each rule reports
/// failure as the matching [`Constraint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumericRule {
    Positive,
    NonNegative,
    NonNegativeInteger,
    Percentage,
}

impl NumericRule {
    fn admits(self, value: f64) -> bool {
        match self {
            NumericRule::Positive => value > 0.0,
            NumericRule::NonNegative => value >= 0.0,
            // Counts must also fit the u64 they are stored in.
            NumericRule::NonNegativeInteger => {
                value >= 0.0 && value.fract() == 0.0 && value < u64::MAX as f64
            }
            NumericRule::Percentage => (0.0..=100.0).contains(&value),
        }
    }

    fn constraint(self) -> Constraint {
        match self {
            NumericRule::Positive => Constraint::Positive,
            NumericRule::NonNegative => Constraint::NonNegative,
            NumericRule::NonNegativeInteger => Constraint::NonNegativeInteger,
            NumericRule::Percentage => Constraint::Percentage,
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Constraint::Positive => "Must be a positive number",
            Constraint::NonNegative => "Must be a non-negative number",
            Constraint::NonNegativeInteger => "Must be a non-negative integer",
            Constraint::Percentage => "Must be between 0 and 100",
            Constraint::Basis => "Must be \"24/7\" or \"business\"",
        })
    }
}

/// Why a single field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    /// A required value is absent.
    #[error("Required")]
    MissingField,
    /// A value is present but is not a number or breaks its constraint.
    #[error("{0}")]
    OutOfRange(Constraint),
}

/// Per-field validation failures.  Empty means the input was valid.
///
/// Serialises as a JSON object of field name to message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<Field, FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: Field, error: FieldError) {
        self.errors.insert(field, error);
    }

    pub fn get(&self, field: Field) -> Option<&FieldError> {
        self.errors.get(&field)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.errors.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Failures in form order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &FieldError)> + '_ {
        self.errors.iter().map(|(field, error)| (*field, error))
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.errors.keys().copied()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, error) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {error}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.errors.len()))?;
        for (field, error) in self.iter() {
            map.serialize_entry(field.as_str(), &error.to_string())?;
        }
        map.end()
    }
}

/// Outcome of the typed parse step for one field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Parsed {
    /// Nothing but whitespace was entered.
    Empty,
    /// A finite decimal number.
    Number(f64),
    /// Something was entered but it is not a finite number.
    Invalid,
}

/// Parse a raw field value.
///
/// Surrounding whitespace is ignored.  Decimal and exponent notation
/// are accepted; `inf`, `NaN` and hexadecimal literals are not.
pub fn parse_field(raw: &str) -> Parsed {
    let text = raw.trim();
    if text.is_empty() {
        return Parsed::Empty;
    }
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Parsed::Number(value),
        _ => Parsed::Invalid,
    }
}

/// Accumulates field results while a [`RawInputs`] is being checked.
struct Checker<'a> {
    raw: &'a RawInputs,
    errors: ValidationErrors,
}

impl<'a> Checker<'a> {
    fn required(&mut self, field: Field, rule: NumericRule) -> Option<f64> {
        match parse_field(field.raw(self.raw)) {
            Parsed::Empty => {
                self.errors.insert(field, FieldError::MissingField);
                None
            }
            parsed => self.constrain(field, parsed, rule),
        }
    }

    fn optional(&mut self, field: Field, rule: NumericRule) -> Option<f64> {
        match parse_field(field.raw(self.raw)) {
            Parsed::Empty => None,
            parsed => self.constrain(field, parsed, rule),
        }
    }

    fn constrain(&mut self, field: Field, parsed: Parsed, rule: NumericRule) -> Option<f64> {
        match parsed {
            Parsed::Number(value) if rule.admits(value) => Some(value),
            _ => {
                self.errors.insert(field, FieldError::OutOfRange(rule.constraint()));
                None
            }
        }
    }

    fn basis(&mut self) -> Option<Basis> {
        match self.raw.calculation_basis.trim() {
            "" | "24/7" => Some(Basis::AroundTheClock),
            "business" => Some(Basis::BusinessHours),
            _ => {
                self.errors
                    .insert(Field::CalculationBasis, FieldError::OutOfRange(Constraint::Basis));
                None
            }
        }
    }
}

/// Validate raw user input.
///
/// Returns the typed inputs when every field passes, otherwise every
/// failing field with its reason and no typed value.
pub fn validate(raw: &RawInputs) -> Result<ValidatedInputs, ValidationErrors> {
    let mut checker = Checker {
        raw,
        errors: ValidationErrors::new(),
    };

    let calculation_basis = checker.basis();
    let annual_revenue = checker.required(Field::AnnualRevenue, NumericRule::Positive);
    let downtime_duration = checker.required(Field::DowntimeDuration, NumericRule::Positive);
    let affected_employees =
        checker.required(Field::AffectedEmployees, NumericRule::NonNegativeInteger);
    let hourly_wage = checker.required(Field::HourlyWage, NumericRule::NonNegative);
    let annual_overhead = checker.optional(Field::AnnualOverhead, NumericRule::NonNegative);
    let profit_margin_percent = checker.optional(Field::ProfitMargin, NumericRule::Percentage);
    let penalty_cost = checker.optional(Field::PenaltyCost, NumericRule::NonNegative);

    match (
        calculation_basis,
        annual_revenue,
        downtime_duration,
        affected_employees,
        hourly_wage,
    ) {
        (Some(calculation_basis), Some(annual_revenue), Some(downtime_duration), Some(employees), Some(hourly_wage))
            if checker.errors.is_empty() =>
        {
            Ok(ValidatedInputs {
                calculation_basis,
                annual_revenue,
                downtime_duration,
                // Integral and non-negative, checked above.
                affected_employees: employees as u64,
                hourly_wage,
                annual_overhead,
                profit_margin_percent,
                penalty_cost,
            })
        }
        _ => {
            tracing::debug!(
                fields = ?checker.errors.fields().map(Field::as_str).collect::<Vec<_>>(),
                "input rejected"
            );
            Err(checker.errors)
        }
    }
}
