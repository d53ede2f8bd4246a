// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Investment, Revenue};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoiMetrics {
    pub profit: Decimal,
    pub roi_percent: Decimal,
    pub daily_profit: Decimal,
    /// `None` when the investment is not earning its cost back.
    pub break_even_days: Option<i64>,
    pub is_profitable: bool,
}

pub fn roi_metrics(cost: Decimal, revenue: Decimal, days_owned: i64) -> RoiMetrics {
    let days = Decimal::from(days_owned.max(1));
    if cost.is_zero() {
        return RoiMetrics {
            profit: revenue,
            roi_percent: Decimal::ZERO,
            daily_profit: revenue / days,
            break_even_days: Some(0),
            is_profitable: revenue > Decimal::ZERO,
        };
    }
    let profit = revenue - cost;
    let daily_profit = profit / days;
    let break_even_days = if daily_profit > Decimal::ZERO {
        (cost / daily_profit).trunc().to_i64()
    } else {
        None
    };
    RoiMetrics {
        roi_percent: (profit / cost * Decimal::ONE_HUNDRED).round_dp(2),
        daily_profit: daily_profit.round_dp(2),
        is_profitable: profit > Decimal::ZERO,
        profit,
        break_even_days,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RoiStatus {
    PaidOff,
    Recovering,
    NoRevenue,
}

impl fmt::Display for RoiStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RoiStatus::PaidOff => "Paid Off",
            RoiStatus::Recovering => "Recovering",
            RoiStatus::NoRevenue => "No Revenue",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvestmentReport {
    pub id: i64,
    pub name: String,
    pub cost: Decimal,
    pub revenue: Decimal,
    pub status: RoiStatus,
    pub metrics: RoiMetrics,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSummary {
    pub total_invested: Decimal,
    pub total_revenue: Decimal,
    pub net_profit: Decimal,
    pub overall_roi_percent: Decimal,
    pub best: Option<String>,
}

pub fn report(investment: &Investment, revenues: &[Revenue], today: NaiveDate) -> InvestmentReport {
    let revenue: Decimal = revenues
        .iter()
        .filter(|r| r.investment_id == investment.id)
        .map(|r| r.amount)
        .sum();
    let status = if revenue >= investment.cost {
        RoiStatus::PaidOff
    } else if revenue > Decimal::ZERO {
        RoiStatus::Recovering
    } else {
        RoiStatus::NoRevenue
    };
    let days_owned = (today - investment.date).num_days() + 1;
    InvestmentReport {
        id: investment.id,
        name: investment.name.clone(),
        cost: investment.cost,
        revenue,
        status,
        metrics: roi_metrics(investment.cost, revenue, days_owned),
    }
}

pub fn summarize(reports: &[InvestmentReport]) -> PortfolioSummary {
    let total_invested: Decimal = reports.iter().map(|r| r.cost).sum();
    let total_revenue: Decimal = reports.iter().map(|r| r.revenue).sum();
    let net_profit = total_revenue - total_invested;
    let overall_roi_percent = if total_invested > Decimal::ZERO {
        (net_profit / total_invested * Decimal::ONE_HUNDRED).round_dp(2)
    } else {
        Decimal::ZERO
    };
    let best = reports
        .iter()
        .max_by(|a, b| a.metrics.roi_percent.cmp(&b.metrics.roi_percent))
        .map(|r| r.name.clone());
    PortfolioSummary {
        total_invested,
        total_revenue,
        net_profit,
        overall_roi_percent,
        best,
    }
}
