use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ServiceId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceKind {
    Utility,
    Tax,
    Maintenance,
    Insurance,
    Other,
}

impl ServiceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Utility => "utility",
            Self::Tax => "tax",
            Self::Maintenance => "maintenance",
            Self::Insurance => "insurance",
            Self::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "utility" => Some(Self::Utility),
            "tax" => Some(Self::Tax),
            "maintenance" => Some(Self::Maintenance),
            "insurance" => Some(Self::Insurance),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecurrenceUnit {
    Days,
    Weeks,
    Months,
    Years,
}

impl RecurrenceUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Days => "days",
            Self::Weeks => "weeks",
            Self::Months => "months",
            Self::Years => "years",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "days" => Some(Self::Days),
            "weeks" => Some(Self::Weeks),
            "months" => Some(Self::Months),
            "years" => Some(Self::Years),
            _ => None,
        }
    }
}

/// How often a service bill comes due: every `every` units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recurrence {
    pub every: u32,
    pub unit: RecurrenceUnit,
}

impl Default for Recurrence {
    fn default() -> Self {
        Self {
            every: 1,
            unit: RecurrenceUnit::Months,
        }
    }
}

/// Billed amount per period. Variable bills carry the per-period estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceAmount {
    Fixed(Decimal),
    Variable(Decimal),
}

impl ServiceAmount {
    pub fn value(&self) -> Decimal {
        match self {
            Self::Fixed(v) | Self::Variable(v) => *v,
        }
    }

    pub fn is_fixed(&self) -> bool {
        matches!(self, Self::Fixed(_))
    }
}

impl Default for ServiceAmount {
    fn default() -> Self {
        Self::Fixed(Decimal::ZERO)
    }
}

/// A recurring billable obligation tied to a property.
///
/// The engine never moves money; services only feed the payment reminder
/// schedule (see [`crate::schedule`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: Option<ServiceId>,
    pub kind: ServiceKind,
    pub name: String,
    pub contract_number: Option<String>,
    pub amount: ServiceAmount,
    pub last_paid: Option<NaiveDate>,
    pub recurrence: Recurrence,
}

impl Service {
    pub fn new(
        kind: ServiceKind,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            kind,
            name: name.into(),
            contract_number: None,
            amount: ServiceAmount::default(),
            last_paid: None,
            recurrence: Recurrence::default(),
        }
    }
}
