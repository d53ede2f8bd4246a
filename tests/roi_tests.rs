// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use orebook::models::{Investment, Revenue};
use orebook::roi::{RoiStatus, report, roi_metrics, summarize};
use rust_decimal::Decimal;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 5, d).unwrap()
}

#[test]
fn metrics_for_a_paid_off_investment() {
    let m = roi_metrics(Decimal::from(1000), Decimal::from(1500), 10);
    assert_eq!(m.profit, Decimal::from(500));
    assert_eq!(m.roi_percent, Decimal::from(50));
    assert_eq!(m.daily_profit, Decimal::from(50));
    assert_eq!(m.break_even_days, Some(20));
    assert!(m.is_profitable);
}

#[test]
fn losing_investment_never_breaks_even() {
    let m = roi_metrics(Decimal::from(1000), Decimal::from(400), 3);
    assert_eq!(m.break_even_days, None);
    assert_eq!(m.roi_percent, Decimal::from(-60));
    assert!(!m.is_profitable);
}

#[test]
fn free_investment_is_already_even() {
    let m = roi_metrics(Decimal::ZERO, Decimal::from(10), 0);
    assert_eq!(m.break_even_days, Some(0));
    assert_eq!(m.roi_percent, Decimal::ZERO);
}

#[test]
fn reports_sum_revenue_per_investment() {
    let drill = Investment {
        id: 1,
        name: "Drill Rig".into(),
        cost: Decimal::from(2000),
        date: day(1),
    };
    let truck = Investment {
        id: 2,
        name: "Truck".into(),
        cost: Decimal::from(500),
        date: day(1),
    };
    let revenues = vec![
        Revenue {
            id: 1,
            investment_id: 1,
            date: day(2),
            amount: Decimal::from(800),
            note: None,
        },
        Revenue {
            id: 2,
            investment_id: 2,
            date: day(3),
            amount: Decimal::from(600),
            note: Some("first haul".into()),
        },
    ];
    let drill_report = report(&drill, &revenues, day(4));
    assert_eq!(drill_report.revenue, Decimal::from(800));
    assert_eq!(drill_report.status, RoiStatus::Recovering);

    let truck_report = report(&truck, &revenues, day(4));
    assert_eq!(truck_report.status, RoiStatus::PaidOff);

    let s = summarize(&[drill_report, truck_report]);
    assert_eq!(s.total_invested, Decimal::from(2500));
    assert_eq!(s.net_profit, Decimal::from(-1100));
    assert_eq!(s.best.as_deref(), Some("Truck"));
}
