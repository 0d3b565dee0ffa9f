//! Payment schedule projection.
//!
//! Services carry a last-paid date and a recurrence rule; the upcoming due
//! dates are computed on demand and never persisted as individual events.
//!
//! Month and year recurrences are anchored to the original last-paid date:
//! occurrence *i* is `last_paid + i * every` months, clamped to the end of
//! shorter months. The anchor day therefore reappears wherever it exists
//! (Jan 31 → Feb 29 → Mar 31 → Apr 30) and there is no cumulative drift.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use ras_core::models::{Service, ServiceKind};
//! use ras_core::schedule::project_due_dates;
//!
//! let mut service = Service::new(ServiceKind::Utility, "Electricity");
//! service.last_paid = NaiveDate::from_ymd_opt(2024, 1, 15);
//!
//! let dates = project_due_dates(&service, 3);
//! assert_eq!(
//!     dates,
//!     vec![
//!         NaiveDate::from_ymd_opt(2024, 2, 15).unwrap(),
//!         NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
//!         NaiveDate::from_ymd_opt(2024, 4, 15).unwrap(),
//!     ]
//! );
//! ```

use chrono::{Days, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{RecurrenceUnit, Service};

/// Project the next `count` due dates of a service.
///
/// Returns exactly `count` strictly increasing dates, or an empty vector
/// when the service has no last-paid date or a zero recurrence interval.
pub fn project_due_dates(
    service: &Service,
    count: usize,
) -> Vec<NaiveDate> {
    let Some(start) = service.last_paid else {
        return Vec::new();
    };
    let every = service.recurrence.every;
    if every == 0 || count == 0 {
        return Vec::new();
    }

    // Dates beyond chrono's representable range (and interval arithmetic
    // overflow) are dropped; with real recurrence data neither is reached.
    (1..=count as u32)
        .filter_map(|i| {
            every
                .checked_mul(i)
                .and_then(|amount| advance(start, amount, service.recurrence.unit))
        })
        .collect()
}

fn advance(
    start: NaiveDate,
    amount: u32,
    unit: RecurrenceUnit,
) -> Option<NaiveDate> {
    match unit {
        RecurrenceUnit::Days => start.checked_add_days(Days::new(u64::from(amount))),
        RecurrenceUnit::Weeks => start.checked_add_days(Days::new(u64::from(amount) * 7)),
        RecurrenceUnit::Months => start.checked_add_months(Months::new(amount)),
        RecurrenceUnit::Years => start.checked_add_months(Months::new(amount.checked_mul(12)?)),
    }
}

/// One upcoming payment of one service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueEntry {
    pub date: NaiveDate,
    pub service_name: String,
    pub amount: Decimal,
}

/// Merged, date-sorted payment calendar across a property's services.
///
/// Each service contributes its next `per_service` due dates; services
/// without a last-paid date are skipped.
pub fn payment_calendar(
    services: &[Service],
    per_service: usize,
) -> Vec<DueEntry> {
    let mut entries: Vec<DueEntry> = services
        .iter()
        .flat_map(|service| {
            project_due_dates(service, per_service)
                .into_iter()
                .map(|date| DueEntry {
                    date,
                    service_name: service.name.clone(),
                    amount: service.amount.value(),
                })
        })
        .collect();

    entries.sort_by(|a, b| (a.date, &a.service_name).cmp(&(b.date, &b.service_name)));
    entries
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use crate::models::{Recurrence, ServiceAmount, ServiceKind};

    use super::*;

    fn ymd(
        y: i32,
        m: u32,
        d: u32,
    ) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn service(
        last_paid: Option<NaiveDate>,
        every: u32,
        unit: RecurrenceUnit,
    ) -> Service {
        let mut s = Service::new(ServiceKind::Utility, "Electricity");
        s.last_paid = last_paid;
        s.recurrence = Recurrence { every, unit };
        s
    }

    #[test]
    fn monthly_projection_keeps_day_of_month() {
        let s = service(Some(ymd(2024, 1, 15)), 1, RecurrenceUnit::Months);

        assert_eq!(
            project_due_dates(&s, 3),
            vec![ymd(2024, 2, 15), ymd(2024, 3, 15), ymd(2024, 4, 15)]
        );
    }

    #[test]
    fn no_last_paid_date_projects_nothing() {
        let s = service(None, 1, RecurrenceUnit::Months);
        assert_eq!(project_due_dates(&s, 6), Vec::<NaiveDate>::new());
    }

    #[test]
    fn six_dates_are_strictly_increasing() {
        for unit in [
            RecurrenceUnit::Days,
            RecurrenceUnit::Weeks,
            RecurrenceUnit::Months,
            RecurrenceUnit::Years,
        ] {
            let s = service(Some(ymd(2024, 1, 15)), 2, unit);
            let dates = project_due_dates(&s, 6);

            assert_eq!(dates.len(), 6, "unit {unit:?}");
            assert!(
                dates.windows(2).all(|w| w[0] < w[1]),
                "not strictly increasing for {unit:?}: {dates:?}"
            );
        }
    }

    #[test]
    fn weeks_advance_by_seven_day_counts() {
        let s = service(Some(ymd(2024, 1, 1)), 2, RecurrenceUnit::Weeks);

        assert_eq!(
            project_due_dates(&s, 2),
            vec![ymd(2024, 1, 15), ymd(2024, 1, 29)]
        );
    }

    #[test]
    fn month_end_anchor_clamps_then_reappears() {
        let s = service(Some(ymd(2024, 1, 31)), 1, RecurrenceUnit::Months);

        assert_eq!(
            project_due_dates(&s, 3),
            vec![ymd(2024, 2, 29), ymd(2024, 3, 31), ymd(2024, 4, 30)]
        );
    }

    #[test]
    fn yearly_from_leap_day_clamps_to_feb_28() {
        let s = service(Some(ymd(2024, 2, 29)), 1, RecurrenceUnit::Years);

        assert_eq!(
            project_due_dates(&s, 4),
            vec![
                ymd(2025, 2, 28),
                ymd(2026, 2, 28),
                ymd(2027, 2, 28),
                ymd(2028, 2, 29),
            ]
        );
    }

    #[test]
    fn zero_interval_projects_nothing() {
        let s = service(Some(ymd(2024, 1, 15)), 0, RecurrenceUnit::Days);
        assert_eq!(project_due_dates(&s, 6), Vec::<NaiveDate>::new());
    }

    #[test]
    fn calendar_merges_and_sorts_across_services() {
        let mut water = service(Some(ymd(2024, 1, 10)), 1, RecurrenceUnit::Months);
        water.name = "Water".to_string();
        water.amount = ServiceAmount::Fixed(dec!(25));
        let mut ibi = service(Some(ymd(2024, 1, 1)), 6, RecurrenceUnit::Months);
        ibi.name = "IBI".to_string();
        ibi.amount = ServiceAmount::Variable(dec!(400));
        let unpaid = service(None, 1, RecurrenceUnit::Months);

        let calendar = payment_calendar(&[water, ibi, unpaid], 2);

        let got: Vec<(NaiveDate, &str)> = calendar
            .iter()
            .map(|e| (e.date, e.service_name.as_str()))
            .collect();
        assert_eq!(
            got,
            vec![
                (ymd(2024, 2, 10), "Water"),
                (ymd(2024, 3, 10), "Water"),
                (ymd(2024, 7, 1), "IBI"),
                (ymd(2025, 1, 1), "IBI"),
            ]
        );
        assert_eq!(calendar[2].amount, dec!(400));
    }
}
