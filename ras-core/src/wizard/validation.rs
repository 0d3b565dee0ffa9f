//! Per-step required-field checks.
//!
//! Validation is a pure function of the current draft: nothing is thrown,
//! nothing is mutated. An unsatisfied step is communicated as a list of
//! human-readable missing-field messages for the caller to display.

use rust_decimal::Decimal;

use crate::models::{LifecycleTag, PropertyDraft};

use super::steps::StepKey;

/// Outcome of checking one step against a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub step: StepKey,
    pub missing: Vec<String>,
}

impl StepReport {
    pub fn is_satisfied(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Check whether `step` is satisfied by the current draft.
///
/// Rules:
/// * `general` — name must be non-empty after trimming.
/// * `location` — no hard requirements; all fields optional.
/// * `conditions` — for every lifecycle state present on the draft, the
///   matching sub-record must exist and its required amount must be
///   strictly positive. Sub-records whose tag is absent are ignored.
/// * `spaces` — no hard requirements.
/// * `services` — either no services, or every service has a non-empty
///   name, a last-paid date, and a strictly positive amount.
pub fn check_step(
    step: StepKey,
    draft: &PropertyDraft,
) -> StepReport {
    let missing = match step {
        StepKey::General => check_general(draft),
        StepKey::Location | StepKey::Spaces => Vec::new(),
        StepKey::Conditions => check_conditions(draft),
        StepKey::Services => check_services(draft),
    };
    StepReport { step, missing }
}

fn check_general(draft: &PropertyDraft) -> Vec<String> {
    let mut missing = Vec::new();
    if draft.name.trim().is_empty() {
        missing.push("Property name is required.".to_string());
    }
    missing
}

fn check_conditions(draft: &PropertyDraft) -> Vec<String> {
    let mut missing = Vec::new();

    if draft.has_state(LifecycleTag::LongTermRental) {
        let rent = draft.conditions.rental.as_ref().map(|r| r.monthly_rent);
        if !is_positive(rent) {
            missing.push("A monthly rent is required for long-term rental.".to_string());
        }
    }
    if draft.has_state(LifecycleTag::VacationRental) {
        let rate = draft.conditions.vacation.as_ref().map(|v| v.nightly_rate);
        if !is_positive(rate) {
            missing.push("A nightly rate is required for vacation rental.".to_string());
        }
    }
    if draft.has_state(LifecycleTag::ForSale) {
        let price = draft.conditions.sale.as_ref().map(|s| s.asking_price);
        if !is_positive(price) {
            missing.push("An asking price is required for sale.".to_string());
        }
    }

    missing
}

fn check_services(draft: &PropertyDraft) -> Vec<String> {
    let mut missing = Vec::new();

    for (index, service) in draft.services.iter().enumerate() {
        // Fall back to the list position when the name itself is what is missing.
        let label = if service.name.trim().is_empty() {
            format!("Service #{}", index + 1)
        } else {
            format!("Service '{}'", service.name)
        };

        if service.name.trim().is_empty() {
            missing.push(format!("{label} needs a name."));
        }
        if service.last_paid.is_none() {
            missing.push(format!("{label} needs a last payment date."));
        }
        if service.amount.value() <= Decimal::ZERO {
            missing.push(format!("{label} needs an amount greater than zero."));
        }
    }

    missing
}

fn is_positive(value: Option<Decimal>) -> bool {
    value.is_some_and(|v| v > Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use crate::models::{
        PropertyCategory, RentalTerms, SaleTerms, Service, ServiceAmount, ServiceKind,
        VacationTerms,
    };

    use super::*;

    fn draft(name: &str) -> PropertyDraft {
        PropertyDraft::new(name, PropertyCategory::Apartment)
    }

    fn paid_service(
        name: &str,
        amount: Decimal,
    ) -> Service {
        let mut service = Service::new(ServiceKind::Utility, name);
        service.amount = ServiceAmount::Fixed(amount);
        service.last_paid = NaiveDate::from_ymd_opt(2024, 1, 15);
        service
    }

    #[test]
    fn general_requires_non_empty_name() {
        let report = check_step(StepKey::General, &draft(""));
        assert!(!report.is_satisfied());
        assert_eq!(report.missing, vec!["Property name is required.".to_string()]);

        let report = check_step(StepKey::General, &draft("Casa X"));
        assert!(report.is_satisfied());
    }

    #[test]
    fn general_rejects_whitespace_only_name() {
        assert!(!check_step(StepKey::General, &draft("   ")).is_satisfied());
    }

    #[test]
    fn location_and_spaces_have_no_requirements() {
        let empty = draft("");
        assert!(check_step(StepKey::Location, &empty).is_satisfied());
        assert!(check_step(StepKey::Spaces, &empty).is_satisfied());
    }

    #[test]
    fn for_sale_requires_positive_asking_price() {
        let mut d = draft("Casa X");
        d.states.insert(LifecycleTag::ForSale);

        let report = check_step(StepKey::Conditions, &d);
        assert_eq!(
            report.missing,
            vec!["An asking price is required for sale.".to_string()]
        );

        d.conditions.sale = Some(SaleTerms {
            asking_price: dec!(3500000),
            negotiable: false,
        });
        assert!(check_step(StepKey::Conditions, &d).is_satisfied());
    }

    #[test]
    fn zero_asking_price_is_not_satisfied() {
        let mut d = draft("Casa X");
        d.states.insert(LifecycleTag::ForSale);
        d.conditions.sale = Some(SaleTerms {
            asking_price: dec!(0),
            negotiable: true,
        });

        assert!(!check_step(StepKey::Conditions, &d).is_satisfied());
    }

    #[test]
    fn each_present_state_is_checked_independently() {
        let mut d = draft("Casa X");
        d.states.insert(LifecycleTag::LongTermRental);
        d.states.insert(LifecycleTag::VacationRental);
        d.conditions.rental = Some(RentalTerms {
            monthly_rent: dec!(1200),
            deposit_months: 2,
            min_term_months: None,
        });

        let report = check_step(StepKey::Conditions, &d);
        assert_eq!(
            report.missing,
            vec!["A nightly rate is required for vacation rental.".to_string()]
        );

        d.conditions.vacation = Some(VacationTerms {
            nightly_rate: dec!(85),
            max_guests: Some(4),
            amenities: Default::default(),
        });
        assert!(check_step(StepKey::Conditions, &d).is_satisfied());
    }

    #[test]
    fn stale_sub_record_without_its_tag_is_ignored() {
        let mut d = draft("Casa X");
        // Sale terms populated, then the for-sale state was deselected.
        d.conditions.sale = Some(SaleTerms {
            asking_price: dec!(0),
            negotiable: false,
        });

        assert!(check_step(StepKey::Conditions, &d).is_satisfied());
    }

    #[test]
    fn no_services_is_satisfied() {
        assert!(check_step(StepKey::Services, &draft("Casa X")).is_satisfied());
    }

    #[test]
    fn complete_services_are_satisfied() {
        let mut d = draft("Casa X");
        d.services.push(paid_service("Electricity", dec!(60)));
        d.services.push(paid_service("Water", dec!(25.50)));

        assert!(check_step(StepKey::Services, &d).is_satisfied());
    }

    #[test]
    fn incomplete_service_lists_each_missing_field() {
        let mut d = draft("Casa X");
        d.services.push(Service::new(ServiceKind::Utility, ""));

        let report = check_step(StepKey::Services, &d);
        assert_eq!(
            report.missing,
            vec![
                "Service #1 needs a name.".to_string(),
                "Service #1 needs a last payment date.".to_string(),
                "Service #1 needs an amount greater than zero.".to_string(),
            ]
        );
    }

    #[test]
    fn negative_amount_is_rejected() {
        let mut d = draft("Casa X");
        d.services.push(paid_service("IBI", dec!(-1)));

        let report = check_step(StepKey::Services, &d);
        assert_eq!(
            report.missing,
            vec!["Service 'IBI' needs an amount greater than zero.".to_string()]
        );
    }
}
